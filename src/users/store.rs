//! Persistence contract for users.

use super::model::{Profile, User};

/// Failure reported by a [`UserStore`].
///
/// `NotFound` is kept apart from everything else so the controller can map
/// it to `404` while other failures become `500`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("{0}")]
    Backend(String),
}

/// Record store for users.
///
/// Methods are synchronous; the controller runs them on the blocking pool.
/// Implementations own whatever locking their backend needs.
pub trait UserStore: Send + Sync {
    /// Every user, ascending by id.
    fn find_all(&self) -> Result<Vec<User>, StoreError>;

    fn find_by_key(&self, id: i64) -> Result<User, StoreError>;

    /// Persists a new user and returns it with its assigned id and timestamps.
    fn insert(&self, profile: &Profile) -> Result<User, StoreError>;

    /// Overwrites the stored profile of `user.id`, refreshing `updated_at`.
    fn update(&self, user: &User) -> Result<User, StoreError>;

    fn delete(&self, user: &User) -> Result<(), StoreError>;
}
