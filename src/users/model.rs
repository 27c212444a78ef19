//! The user record and its validation rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted name, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// A persisted user.
///
/// Serialises flat: `{"id":1,"name":"Alice","email":"","created_at":…,"updated_at":…}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Assigned by the store on insert; never changes.
    pub id: i64,
    #[serde(flatten)]
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The client-controlled fields of a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Request payload for create and update.
///
/// Absent fields leave the target untouched. Anything else in the body,
/// `id` included, is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Why a profile was rejected. The display text is sent to the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name is required")]
    MissingName,

    #[error("name must be at most {} characters", NAME_MAX_CHARS)]
    NameTooLong,

    #[error("email address is invalid")]
    InvalidEmail,
}

impl Profile {
    /// Checks the profile before it is written. Pure; first failure wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.name.chars().count() > NAME_MAX_CHARS {
            return Err(ValidationError::NameTooLong);
        }
        if !self.email.is_empty() && !looks_like_email(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(())
    }

    /// Overwrites the fields present in `patch`.
    pub fn apply(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, email: &str) -> Profile {
        Profile { name: name.to_owned(), email: email.to_owned() }
    }

    #[test]
    fn accepts_name_only() {
        assert_eq!(profile("Alice", "").validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(profile("", "").validate(), Err(ValidationError::MissingName));
        assert_eq!(profile("   ", "").validate(), Err(ValidationError::MissingName));
    }

    #[test]
    fn limits_name_length_in_characters() {
        let at_limit = "é".repeat(NAME_MAX_CHARS);
        assert_eq!(profile(&at_limit, "").validate(), Ok(()));

        let over = "x".repeat(NAME_MAX_CHARS + 1);
        assert_eq!(profile(&over, "").validate(), Err(ValidationError::NameTooLong));
        assert_eq!(
            ValidationError::NameTooLong.to_string(),
            "name must be at most 100 characters"
        );
    }

    #[test]
    fn checks_email_shape() {
        assert_eq!(profile("A", "alice@example.com").validate(), Ok(()));
        for bad in ["alice", "@example.com", "alice@example", "a@b@c.com", "a@.com", "a@com.", "a b@c.com"] {
            assert_eq!(profile("A", bad).validate(), Err(ValidationError::InvalidEmail), "{bad}");
        }
    }

    #[test]
    fn apply_overwrites_only_present_fields() {
        let mut p = profile("Alice", "alice@example.com");
        let patch: ProfilePatch = serde_json::from_str(r#"{"name":"Alicia","id":99}"#).unwrap();

        p.apply(patch);

        assert_eq!(p, profile("Alicia", "alice@example.com"));
    }

    #[test]
    fn user_serialises_flat() {
        let at = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z").unwrap().with_timezone(&Utc);
        let user = User { id: 7, profile: profile("Alice", ""), created_at: at, updated_at: at };

        let v = serde_json::to_value(&user).unwrap();

        assert_eq!(v["id"], 7);
        assert_eq!(v["name"], "Alice");
        assert_eq!(v["email"], "");
        assert!(v.get("profile").is_none());
    }
}
