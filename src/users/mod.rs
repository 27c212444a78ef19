//! The user resource: record, validation, persistence, HTTP entry points.

mod controller;
mod model;
mod sqlite;
mod store;

pub use controller::{ApiError, Deleted, UserController};
pub use model::{NAME_MAX_CHARS, Profile, ProfilePatch, User, ValidationError};
pub use sqlite::SqliteUserStore;
pub use store::{StoreError, UserStore};
