use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    profile::{
        dto::{
            AddEducationRequest, AddExperienceRequest, ProfileResponse, UpsertProfileRequest,
        },
        repo,
        repo_types::Profile,
        services,
    },
    state::AppState,
};

const NO_PROFILE: &str = "There is no profile for this user";

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            post(upsert_profile).get(list_profiles).delete(delete_account),
        )
        .route("/profile/me", get(my_profile))
        .route("/profile/user/:user_id", get(profile_by_user))
        .route("/profile/experience", put(add_experience))
        .route("/profile/experience/:exp_id", delete(remove_experience))
        .route("/profile/education", put(add_education))
        .route("/profile/education/:edu_id", delete(remove_education))
        .route("/profile/github/:username", get(github_repos))
}

#[instrument(skip(state))]
pub async fn my_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let row = repo::find_with_owner(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound(NO_PROFILE))?;
    Ok(Json(ProfileResponse::from(row)))
}

#[instrument(skip(state, payload))]
pub async fn upsert_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    payload.validate()?;
    let fields = services::build_fields(payload);

    let profile = repo::upsert(&state.db, user_id, &fields).await?;
    info!(user_id = %user_id, "profile upserted");
    Ok(Json(profile))
}

#[instrument(skip(state))]
pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    let rows = repo::list_with_owner(&state.db).await?;
    Ok(Json(rows.into_iter().map(ProfileResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn profile_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    // A malformed id gets the same domain-level answer as an unknown one.
    let user_id: Uuid = user_id
        .parse()
        .map_err(|_| ApiError::NotFound("Profile not found"))?;

    let row = repo::find_with_owner(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("Profile not found"))?;
    Ok(Json(ProfileResponse::from(row)))
}

#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    repo::delete_account(&state.db, user_id).await?;
    info!(user_id = %user_id, "account deleted");
    Ok(Json(json!({ "msg": "User deleted" })))
}

#[instrument(skip(state, payload))]
pub async fn add_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddExperienceRequest>,
) -> Result<Json<Profile>, ApiError> {
    let entry = payload.into_entry()?;

    let mut profile = repo::find_by_user(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound(NO_PROFILE))?;
    services::prepend_entry(&mut profile.experience.0, entry);

    let updated = repo::set_experience(&state.db, user_id, &profile.experience.0)
        .await?
        .ok_or(ApiError::NotFound(NO_PROFILE))?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn remove_experience(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(exp_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let mut profile = repo::find_by_user(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound(NO_PROFILE))?;

    // An unparseable or unknown id matches nothing: the list stays unchanged.
    if let Ok(id) = exp_id.parse::<Uuid>() {
        services::remove_entry(&mut profile.experience.0, id);
    } else {
        warn!(%exp_id, "malformed experience id, nothing removed");
    }

    let updated = repo::set_experience(&state.db, user_id, &profile.experience.0)
        .await?
        .ok_or(ApiError::NotFound(NO_PROFILE))?;
    Ok(Json(updated))
}

#[instrument(skip(state, payload))]
pub async fn add_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddEducationRequest>,
) -> Result<Json<Profile>, ApiError> {
    let entry = payload.into_entry()?;

    let mut profile = repo::find_by_user(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound(NO_PROFILE))?;
    services::prepend_entry(&mut profile.education.0, entry);

    let updated = repo::set_education(&state.db, user_id, &profile.education.0)
        .await?
        .ok_or(ApiError::NotFound(NO_PROFILE))?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn remove_education(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(edu_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let mut profile = repo::find_by_user(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound(NO_PROFILE))?;

    if let Ok(id) = edu_id.parse::<Uuid>() {
        services::remove_entry(&mut profile.education.0, id);
    } else {
        warn!(%edu_id, "malformed education id, nothing removed");
    }

    let updated = repo::set_education(&state.db, user_id, &profile.education.0)
        .await?
        .ok_or(ApiError::NotFound(NO_PROFILE))?;
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn github_repos(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let repos = state
        .github
        .repos_for_user(&username)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::UpstreamNotFound("No Github profile found"))?;
    Ok(Json(repos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_github_user_maps_to_not_found() {
        // The fake state's client answers None for every username.
        let state = AppState::fake();
        let err = github_repos(State(state), Path("no-such-user".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::UpstreamNotFound(_)));
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
