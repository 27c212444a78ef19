//! HTTP entry points for the user resource.
//!
//! Each operation turns every failure into a terminal [`ApiError`] at the
//! step where it happens:
//!
//! | Step | Failure | Status |
//! |---|---|---|
//! | `id` parameter | empty / not an integer | 400 |
//! | body | malformed JSON | 400 |
//! | validation | [`ValidationError`](super::ValidationError) | 400 |
//! | lookup | `StoreError::NotFound` | 404 |
//! | any store call | anything else | 500 |
//!
//! Update is the exception: its initial lookup answers 404 for every
//! failure, not just NotFound. Clients depend on that, so it stays.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::model::{Profile, ProfilePatch, User};
use super::store::{StoreError, UserStore};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::status::Status;

const ID_REQUIRED: &str = "ID parameter is required";
const ID_NOT_INTEGER: &str = "ID parameter must be an integer";
const USER_NOT_FOUND: &str = "User not found";

/// A classified request failure. The display text becomes the `error` field.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            Self::BadRequest(_) => Status::BadRequest,
            Self::NotFound(_) => Status::NotFound,
            Self::Internal(_) => Status::InternalServerError,
        }
    }

    fn user_not_found() -> Self {
        Self::NotFound(USER_NOT_FOUND.to_owned())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Response::error(self.status(), self.to_string())
    }
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
}

/// CRUD operations over a [`UserStore`].
pub struct UserController<S> {
    store: Arc<S>,
}

impl<S> Clone for UserController<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store) }
    }
}

impl<S: UserStore + 'static> UserController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// `GET /users`
    pub async fn list(&self, _req: Request) -> Result<Json<Vec<User>>, ApiError> {
        let users = self.run(|s| s.find_all()).await.map_err(|e| {
            warn!(error = %e, "listing users failed");
            ApiError::Internal(e.to_string())
        })?;
        Ok(Json(users))
    }

    /// `GET /users/{id}`
    pub async fn get(&self, req: Request) -> Result<Json<User>, ApiError> {
        let id = key(&req)?;
        let user = self.find(id).await?;
        Ok(Json(user))
    }

    /// `POST /users`
    pub async fn create(&self, req: Request) -> Result<(Status, Json<User>), ApiError> {
        let patch: ProfilePatch = decode(&req)?;
        let mut profile = Profile::default();
        profile.apply(patch);
        profile.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let user = self.run(move |s| s.insert(&profile)).await.map_err(|e| {
            warn!(error = %e, "inserting user failed");
            ApiError::Internal(e.to_string())
        })?;

        info!(id = user.id, "user created");
        Ok((Status::Created, Json(user)))
    }

    /// `PUT /users/{id}`
    pub async fn update(&self, req: Request) -> Result<Json<User>, ApiError> {
        let Ok(id) = key(&req) else {
            return Err(ApiError::user_not_found());
        };
        let mut user = self.run(move |s| s.find_by_key(id)).await.map_err(|e| {
            if e != StoreError::NotFound {
                warn!(id, error = %e, "user lookup before update failed");
            }
            ApiError::user_not_found()
        })?;

        let patch: ProfilePatch = decode(&req)?;
        user.profile.apply(patch);
        user.profile.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let user = self.run(move |s| s.update(&user)).await.map_err(|e| {
            warn!(id, error = %e, "updating user failed");
            ApiError::Internal(e.to_string())
        })?;

        info!(id, "user updated");
        Ok(Json(user))
    }

    /// `DELETE /users/{id}`
    pub async fn delete(&self, req: Request) -> Result<Json<Deleted>, ApiError> {
        let id = key(&req)?;
        let user = self.find(id).await?;

        self.run(move |s| s.delete(&user)).await.map_err(|e| {
            warn!(id, error = %e, "deleting user failed");
            ApiError::Internal(e.to_string())
        })?;

        info!(id, "user deleted");
        Ok(Json(Deleted { message: "User deleted" }))
    }

    /// Lookup shared by get and delete: NotFound → 404, anything else → 500.
    async fn find(&self, id: i64) -> Result<User, ApiError> {
        self.run(move |s| s.find_by_key(id)).await.map_err(|e| match e {
            StoreError::NotFound => ApiError::user_not_found(),
            other => {
                warn!(id, error = %other, "user lookup failed");
                ApiError::Internal(other.to_string())
            }
        })
    }

    /// Runs a store call on the blocking pool.
    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&S) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(&*store))
            .await
            .map_err(|e| StoreError::Backend(format!("store task failed: {e}")))?
    }
}

/// Parses the `id` path parameter.
fn key(req: &Request) -> Result<i64, ApiError> {
    let raw = req.param("id").unwrap_or_default().trim();
    if raw.is_empty() {
        return Err(ApiError::BadRequest(ID_REQUIRED.to_owned()));
    }
    raw.parse()
        .map_err(|_| ApiError::BadRequest(ID_NOT_INTEGER.to_owned()))
}

fn decode(req: &Request) -> Result<ProfilePatch, ApiError> {
    req.json().map_err(|e| ApiError::BadRequest(e.to_string()))
}
