//! Process-level error type.

use crate::config::ConfigError;
use crate::users::StoreError;

/// The error type returned by roster's fallible startup and serving paths.
///
/// Request-level failures (400, 404, 500) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// what stops the process: a bad configuration, a database that cannot be
/// opened, a port that cannot be bound.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}
