use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::profile::repo_types::{Education, Experience, Profile, ProfileOwnerRow};
use crate::profile::services::ProfileFields;

pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT *
        FROM profiles
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(profile)
}

pub async fn find_with_owner(
    db: &PgPool,
    user_id: Uuid,
) -> anyhow::Result<Option<ProfileOwnerRow>> {
    let row = sqlx::query_as::<_, ProfileOwnerRow>(
        r#"
        SELECT p.*, u.name AS owner_name, u.avatar AS owner_avatar
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        WHERE p.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn list_with_owner(db: &PgPool) -> anyhow::Result<Vec<ProfileOwnerRow>> {
    let rows = sqlx::query_as::<_, ProfileOwnerRow>(
        r#"
        SELECT p.*, u.name AS owner_name, u.avatar AS owner_avatar
        FROM profiles p
        JOIN users u ON u.id = p.user_id
        ORDER BY p.created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Create-or-merge in one statement. Omitted optional scalars COALESCE back
/// to the stored value and the social object merges per platform, so a
/// partial update can never clear existing fields.
pub async fn upsert(db: &PgPool, user_id: Uuid, fields: &ProfileFields) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles (user_id, status, skills, company, website, location, bio, github_username, social)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (user_id) DO UPDATE SET
            status = EXCLUDED.status,
            skills = EXCLUDED.skills,
            company = COALESCE(EXCLUDED.company, profiles.company),
            website = COALESCE(EXCLUDED.website, profiles.website),
            location = COALESCE(EXCLUDED.location, profiles.location),
            bio = COALESCE(EXCLUDED.bio, profiles.bio),
            github_username = COALESCE(EXCLUDED.github_username, profiles.github_username),
            social = profiles.social || EXCLUDED.social,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&fields.status)
    .bind(&fields.skills)
    .bind(&fields.company)
    .bind(&fields.website)
    .bind(&fields.location)
    .bind(&fields.bio)
    .bind(&fields.github_username)
    .bind(Json(&fields.social))
    .fetch_one(db)
    .await?;
    Ok(profile)
}

pub async fn set_experience(
    db: &PgPool,
    user_id: Uuid,
    entries: &[Experience],
) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET experience = $2, updated_at = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(Json(entries))
    .fetch_optional(db)
    .await?;
    Ok(profile)
}

pub async fn set_education(
    db: &PgPool,
    user_id: Uuid,
    entries: &[Education],
) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET education = $2, updated_at = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(Json(entries))
    .fetch_optional(db)
    .await?;
    Ok(profile)
}

/// Deletes the profile and its owning user in one transaction, so a failure
/// mid-sequence can never leave an orphan on either side.
pub async fn delete_account(db: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
