use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::error::{ApiError, FieldError};
use crate::profile::repo_types::{Education, Experience, Profile, ProfileOwnerRow};

/// Request body for create-or-update of the caller's profile. Omitted and
/// empty optional fields leave the stored values untouched.
#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    #[serde(default)]
    pub status: String,
    /// Comma-separated tags, e.g. `"rust, sql ,http"`.
    #[serde(default)]
    pub skills: String,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl UpsertProfileRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();
        if self.status.trim().is_empty() {
            errors.push(FieldError::new("status", "Status is required"));
        }
        if self.skills.trim().is_empty() {
            errors.push(FieldError::new("skills", "Skills is required"));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

/// Request body for adding an experience entry.
#[derive(Debug, Deserialize)]
pub struct AddExperienceRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub location: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl AddExperienceRequest {
    /// Validates the mandatory fields and assigns the entry a fresh identity.
    pub fn into_entry(self) -> Result<Experience, ApiError> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if self.company.trim().is_empty() {
            errors.push(FieldError::new("company", "Company is required"));
        }
        let Some(from) = self.from else {
            errors.push(FieldError::new("from", "From date is required"));
            return Err(ApiError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        Ok(Experience {
            id: Uuid::new_v4(),
            title: self.title,
            company: self.company,
            location: self.location,
            from,
            to: self.to,
            current: self.current,
            description: self.description,
        })
    }
}

/// Request body for adding an education entry.
#[derive(Debug, Deserialize)]
pub struct AddEducationRequest {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field_of_study: String,
    pub from: Option<Date>,
    pub to: Option<Date>,
    #[serde(default)]
    pub current: bool,
    pub description: Option<String>,
}

impl AddEducationRequest {
    pub fn into_entry(self) -> Result<Education, ApiError> {
        let mut errors = Vec::new();
        if self.school.trim().is_empty() {
            errors.push(FieldError::new("school", "School is required"));
        }
        if self.degree.trim().is_empty() {
            errors.push(FieldError::new("degree", "Degree is required"));
        }
        if self.field_of_study.trim().is_empty() {
            errors.push(FieldError::new("field_of_study", "Field of study is required"));
        }
        let Some(from) = self.from else {
            errors.push(FieldError::new("from", "From date is required"));
            return Err(ApiError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        Ok(Education {
            id: Uuid::new_v4(),
            school: self.school,
            degree: self.degree,
            field_of_study: self.field_of_study,
            from,
            to: self.to,
            current: self.current,
            description: self.description,
        })
    }
}

/// Owner's public fields attached to a profile.
#[derive(Debug, Serialize)]
pub struct ProfileOwner {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A profile with its owner attached, as returned by the public lookups.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub user: ProfileOwner,
}

impl From<ProfileOwnerRow> for ProfileResponse {
    fn from(row: ProfileOwnerRow) -> Self {
        let user = ProfileOwner {
            id: row.profile.user_id,
            name: row.owner_name,
            avatar: row.owner_avatar,
        };
        Self {
            profile: row.profile,
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn upsert_request() -> UpsertProfileRequest {
        UpsertProfileRequest {
            status: "Developer".into(),
            skills: "rust".into(),
            company: None,
            website: None,
            location: None,
            bio: None,
            github_username: None,
            youtube: None,
            twitter: None,
            facebook: None,
            linkedin: None,
            instagram: None,
        }
    }

    #[test]
    fn upsert_reports_both_missing_fields() {
        let req = UpsertProfileRequest {
            status: "".into(),
            skills: "  ".into(),
            ..upsert_request()
        };
        match req.validate().unwrap_err() {
            ApiError::Validation(errors) => {
                let params: Vec<_> = errors.iter().map(|e| e.param).collect();
                assert_eq!(params, vec!["status", "skills"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn upsert_valid_input_passes() {
        assert!(upsert_request().validate().is_ok());
    }

    #[test]
    fn experience_entry_gets_fresh_identity() {
        let req = AddExperienceRequest {
            title: "Engineer".into(),
            company: "Acme".into(),
            location: None,
            from: Some(date!(2020 - 01 - 01)),
            to: None,
            current: true,
            description: None,
        };
        let entry = req.into_entry().expect("valid entry");
        assert!(!entry.id.is_nil());
        assert_eq!(entry.title, "Engineer");
        assert!(entry.current);
    }

    #[test]
    fn experience_missing_fields_all_reported() {
        let req = AddExperienceRequest {
            title: "".into(),
            company: "".into(),
            location: None,
            from: None,
            to: None,
            current: false,
            description: None,
        };
        match req.into_entry().unwrap_err() {
            ApiError::Validation(errors) => {
                let params: Vec<_> = errors.iter().map(|e| e.param).collect();
                assert_eq!(params, vec!["title", "company", "from"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn education_requires_field_of_study() {
        let req = AddEducationRequest {
            school: "MIT".into(),
            degree: "BSc".into(),
            field_of_study: "".into(),
            from: Some(date!(2018 - 09 - 01)),
            to: None,
            current: false,
            description: None,
        };
        match req.into_entry().unwrap_err() {
            ApiError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].param, "field_of_study");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
