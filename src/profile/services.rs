use uuid::Uuid;

use crate::profile::dto::UpsertProfileRequest;
use crate::profile::repo_types::{Education, Experience, SocialLinks};

/// Field set for an upsert: only provided, non-empty values survive, so
/// omitted fields can never overwrite stored ones with empties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub status: String,
    pub skills: Vec<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: SocialLinks,
}

pub fn build_fields(req: UpsertProfileRequest) -> ProfileFields {
    ProfileFields {
        status: req.status.trim().to_string(),
        skills: parse_skills(&req.skills),
        company: non_empty(req.company),
        website: non_empty(req.website),
        location: non_empty(req.location),
        bio: non_empty(req.bio),
        github_username: non_empty(req.github_username),
        social: SocialLinks {
            youtube: non_empty(req.youtube),
            twitter: non_empty(req.twitter),
            facebook: non_empty(req.facebook),
            linkedin: non_empty(req.linkedin),
            instagram: non_empty(req.instagram),
        },
    }
}

/// Empty and whitespace-only strings count as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Splits a comma-separated tag string, trimming each tag and dropping empty
/// segments, preserving order.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Embedded list entries carry their own identity.
pub trait SubEntry {
    fn entry_id(&self) -> Uuid;
}

impl SubEntry for Experience {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}

impl SubEntry for Education {
    fn entry_id(&self) -> Uuid {
        self.id
    }
}

/// New entries go to the front of the list: most recent first.
pub fn prepend_entry<T: SubEntry>(list: &mut Vec<T>, entry: T) {
    list.insert(0, entry);
}

/// Removing an id that is not in the list leaves it unchanged.
pub fn remove_entry<T: SubEntry>(list: &mut Vec<T>, id: Uuid) {
    list.retain(|e| e.entry_id() != id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn exp(title: &str) -> Experience {
        Experience {
            id: Uuid::new_v4(),
            title: title.into(),
            company: "Acme".into(),
            location: None,
            from: date!(2020 - 01 - 01),
            to: None,
            current: false,
            description: None,
        }
    }

    #[test]
    fn skills_are_split_and_trimmed() {
        assert_eq!(parse_skills("a, b ,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn skills_drop_empty_segments_and_keep_order() {
        assert_eq!(parse_skills("rust,, sql , "), vec!["rust", "sql"]);
        assert_eq!(parse_skills(""), Vec::<String>::new());
    }

    #[test]
    fn empty_strings_count_as_absent() {
        assert_eq!(non_empty(Some("".into())), None);
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".to_string()));
    }

    #[test]
    fn build_fields_keeps_only_provided_values() {
        let req = UpsertProfileRequest {
            status: " Developer ".into(),
            skills: "rust, axum".into(),
            company: Some("".into()),
            website: None,
            location: Some("Berlin".into()),
            bio: None,
            github_username: None,
            youtube: None,
            twitter: Some("https://twitter.com/ada".into()),
            facebook: Some(" ".into()),
            linkedin: None,
            instagram: None,
        };
        let fields = build_fields(req);
        assert_eq!(fields.status, "Developer");
        assert_eq!(fields.skills, vec!["rust", "axum"]);
        assert_eq!(fields.company, None);
        assert_eq!(fields.location, Some("Berlin".to_string()));
        assert_eq!(
            fields.social.twitter,
            Some("https://twitter.com/ada".to_string())
        );
        assert_eq!(fields.social.facebook, None);
        // Only the provided platform lands in the stored JSON.
        let json = serde_json::to_value(&fields.social).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[test]
    fn new_entry_lands_at_index_zero() {
        let mut list = vec![exp("old"), exp("older")];
        prepend_entry(&mut list, exp("new"));
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].title, "new");
        assert_eq!(list[1].title, "old");
    }

    #[test]
    fn removing_a_present_entry_drops_only_it() {
        let target = exp("target");
        let target_id = target.id;
        let mut list = vec![exp("keep"), target, exp("also-keep")];
        remove_entry(&mut list, target_id);
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|e| e.entry_id() != target_id));
    }

    #[test]
    fn removing_an_absent_entry_is_a_noop() {
        let mut list = vec![exp("a"), exp("b")];
        let before: Vec<Uuid> = list.iter().map(|e| e.id).collect();
        remove_entry(&mut list, Uuid::new_v4());
        let after: Vec<Uuid> = list.iter().map(|e| e.id).collect();
        assert_eq!(before, after);
    }
}
