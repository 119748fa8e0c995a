//! # Routing Boundary
//!
//! Maps store results onto the status contract the HTTP routing layer
//! exposes, so that contract is testable without a web framework.
//!
//! ## Status Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation   Store result                 Reply            Status      │
//! │  ─────────   ────────────                 ─────            ──────      │
//! │  get         Ok(Some(entity))             Ok(entity)       200         │
//! │              Ok(None)                     NotFound         404         │
//! │  get_all     Ok(entities)                 Ok(entities)     200         │
//! │  create      Ok(key)                      Created          201         │
//! │  update      route key ≠ body key         BadRequest       400         │
//! │              Ok(0)                        NotFound         404         │
//! │              Ok(1)                        NoContent        204         │
//! │  delete      Ok(0) / Ok(1)                NotFound / NoContent         │
//! │  any         Err(StoreError)              ServerError      500         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store errors are logged in full; the reply only carries a generic message.

use serde::Serialize;
use tracing::error;

use crate::entity::Entity;
use crate::error::{StoreError, StoreResult};
use crate::repository::Repository;

// =============================================================================
// API Error
// =============================================================================

/// Error body returned to clients.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Route id 7 does not match body id 8"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request is inconsistent (400)
    ValidationError,

    /// Backend unreachable (500)
    ConnectionFailed,

    /// Any other store failure (500)
    DatabaseError,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts store errors to client-safe API errors.
impl From<&StoreError> for ApiError {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::ConnectionFailure(_) => {
                ApiError::new(ErrorCode::ConnectionFailed, "Database connection failed")
            }
            StoreError::ConstraintViolation(_)
            | StoreError::DataIntegrity(_)
            | StoreError::QueryFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

// =============================================================================
// Reply
// =============================================================================

/// Outcome of one routed operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<T> {
    Ok(T),
    /// `key` is the new entity's key in display form (for a `Location` header).
    Created { key: String, body: T },
    NoContent,
    NotFound,
    BadRequest(ApiError),
    ServerError(ApiError),
}

impl<T> Reply<T> {
    /// HTTP status code for this reply.
    pub fn status(&self) -> u16 {
        match self {
            Reply::Ok(_) => 200,
            Reply::Created { .. } => 201,
            Reply::NoContent => 204,
            Reply::BadRequest(_) => 400,
            Reply::NotFound => 404,
            Reply::ServerError(_) => 500,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() < 300
    }
}

impl<T: Serialize> Reply<T> {
    /// JSON body, if the reply has one.
    pub fn body(&self) -> Option<serde_json::Result<serde_json::Value>> {
        match self {
            Reply::Ok(body) | Reply::Created { body, .. } => Some(serde_json::to_value(body)),
            Reply::BadRequest(err) | Reply::ServerError(err) => Some(serde_json::to_value(err)),
            Reply::NoContent | Reply::NotFound => None,
        }
    }
}

// =============================================================================
// Result Mapping
// =============================================================================

/// Logs a store failure and turns it into a 500.
pub fn failure<T>(err: StoreError) -> Reply<T> {
    error!(kind = err.kind(), error = %err, "Request failed in store");
    Reply::ServerError(ApiError::from(&err))
}

/// Maps a `get_by_id` result.
pub fn lookup<T>(result: StoreResult<Option<T>>) -> Reply<T> {
    match result {
        Ok(Some(entity)) => Reply::Ok(entity),
        Ok(None) => Reply::NotFound,
        Err(err) => failure(err),
    }
}

/// Maps a `get_all` result.
pub fn listing<T>(result: StoreResult<Vec<T>>) -> Reply<Vec<T>> {
    match result {
        Ok(entities) => Reply::Ok(entities),
        Err(err) => failure(err),
    }
}

/// Maps an `insert` result.
pub fn created<E: Entity>(result: StoreResult<E>) -> Reply<E> {
    match result {
        Ok(entity) => Reply::Created {
            key: entity.key().to_string(),
            body: entity,
        },
        Err(err) => failure(err),
    }
}

/// Maps an `update` or `delete` affected-row count.
pub fn affected<T>(result: StoreResult<u64>) -> Reply<T> {
    match result {
        Ok(0) => Reply::NotFound,
        Ok(_) => Reply::NoContent,
        Err(err) => failure(err),
    }
}

// =============================================================================
// Route Handlers
// =============================================================================

/// `GET /{entity}/{key}`
pub async fn get<E: Entity>(repo: &Repository<E>, key: &E::Key) -> Reply<E> {
    lookup(repo.get_by_id(key).await)
}

/// `GET /{entity}`
pub async fn get_all<E: Entity>(repo: &Repository<E>) -> Reply<Vec<E>> {
    listing(repo.get_all().await)
}

/// `POST /{entity}`
pub async fn create<E: Entity>(repo: &Repository<E>, entity: E) -> Reply<E> {
    created(repo.insert(entity).await)
}

/// `PUT /{entity}/{key}`
///
/// The body's key must equal the route key; otherwise nothing is written.
pub async fn update<E: Entity>(repo: &Repository<E>, route_key: &E::Key, entity: &E) -> Reply<()> {
    let body_key = entity.key();
    if &body_key != route_key {
        return Reply::BadRequest(ApiError::validation(format!(
            "Route id {route_key} does not match body id {body_key}"
        )));
    }
    affected(repo.update(entity).await)
}

/// `DELETE /{entity}/{key}`
pub async fn delete<E: Entity>(repo: &Repository<E>, key: &E::Key) -> Reply<()> {
    affected(repo.delete(key).await)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use hyggy_core::{Asset, Brand};

    #[test]
    fn test_status_codes() {
        assert_eq!(lookup(Ok(Some(1))).status(), 200);
        assert_eq!(lookup::<i32>(Ok(None)).status(), 404);
        assert_eq!(affected::<()>(Ok(0)).status(), 404);
        assert_eq!(affected::<()>(Ok(1)).status(), 204);
        assert_eq!(listing::<i32>(Ok(vec![])).status(), 200);

        let reply = lookup::<i32>(Err(StoreError::QueryFailed("no such table".into())));
        assert_eq!(reply.status(), 500);
        assert!(!reply.is_success());
    }

    #[test]
    fn test_error_body_hides_details() {
        let reply = affected::<()>(Err(StoreError::ConstraintViolation(
            "UNIQUE constraint failed: assets.id".to_string(),
        )));

        let body = reply.body().unwrap().unwrap();
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["message"], "Database operation failed");

        let reply = lookup::<()>(Err(StoreError::ConnectionFailure("refused".to_string())));
        assert_eq!(reply.body().unwrap().unwrap()["code"], "CONNECTION_FAILED");
    }

    #[tokio::test]
    async fn test_brand_routes() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        let brands = db.brands();

        let reply = create(&brands, Brand::new("Acme")).await;
        assert_eq!(reply.status(), 201);
        let Reply::Created { key, body } = reply else {
            panic!("expected Created");
        };
        assert_eq!(key, body.id.to_string());

        assert_eq!(get(&brands, &body.id).await, Reply::Ok(body.clone()));
        assert_eq!(get_all(&brands).await.status(), 200);

        let mut renamed = body.clone();
        renamed.name = "Acme Home".to_string();
        assert_eq!(update(&brands, &body.id, &renamed).await, Reply::NoContent);

        assert_eq!(delete(&brands, &body.id).await, Reply::NoContent);
        assert_eq!(delete(&brands, &body.id).await, Reply::NotFound);
        assert_eq!(get(&brands, &body.id).await, Reply::NotFound);
        assert_eq!(update(&brands, &body.id, &renamed).await, Reply::NotFound);
    }

    #[tokio::test]
    async fn test_update_key_mismatch_is_bad_request() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        let brand = db.brands().insert(Brand::new("Acme")).await.unwrap();

        let reply = update(&db.brands(), &(brand.id + 1), &brand).await;
        assert_eq!(reply.status(), 400);
        assert_eq!(reply.body().unwrap().unwrap()["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_duplicate_asset_is_server_error() {
        let db = Database::open(&DbConfig::in_memory()).await.unwrap();
        let assets = db.assets();

        assert_eq!(create(&assets, Asset::new("a", "/a.png")).await.status(), 201);
        assert_eq!(create(&assets, Asset::new("a", "/b.png")).await.status(), 500);
    }

    #[tokio::test]
    async fn test_unavailable_backend_is_server_error() {
        let db = Database::new(&DbConfig::default());
        assert_eq!(get_all(&db.stores()).await.status(), 500);
    }
}
