//! Validation stages. They run before authentication and before the handler.
//!
//! - `validate_body::<T>`: JSON body -> `T` -> `T::validate()` -> `Validated<T>` in extensions
//! - `validate_path_id::<Tag>`: the route's single path parameter -> `ObjectId` -> `PathId<Tag>`
//!
//! A malformed id or payload stops the chain with a 400 here, so it never reaches the store.

use axum::{
    body::Body,
    extract::{FromRequestParts, Path, Request},
    middleware::Next,
    response::Response,
};
use serde::de::DeserializeOwned;

use crate::api::extractors::{PathId, Validated};
use crate::error::AppError;
use crate::services::object_id::ObjectId;

/// Upper bound for request bodies read by `validate_body`.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shape checks for one route's payload. Returns the first violated constraint.
pub trait Validate {
    fn validate(&self) -> Result<(), &'static str>;
}

pub async fn validate_body<T>(req: Request, next: Next) -> Result<Response, AppError>
where
    T: DeserializeOwned + Validate + Clone + Send + Sync + 'static,
{
    let (mut parts, body) = req.into_parts();

    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| AppError::validation("request body is too large or unreadable"))?;

    let payload: T = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::validation(format!("invalid request body: {e}")))?;

    payload.validate().map_err(AppError::validation)?;

    parts.extensions.insert(Validated(payload));

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

pub async fn validate_path_id<Tag>(req: Request, next: Next) -> Result<Response, AppError>
where
    Tag: 'static,
{
    let (mut parts, body) = req.into_parts();

    let Path(raw) = Path::<String>::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| AppError::validation("invalid id"))?;

    let id = ObjectId::parse(&raw)?;
    parts.extensions.insert(PathId::<Tag>::new(id));

    Ok(next.run(Request::from_parts(parts, body)).await)
}
