use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

/// A payload that already passed its validation stage.
///
/// `validate_body::<T>` parses and checks the body, then stores `Validated<T>`;
/// the handler takes it from here instead of re-reading the body.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<T, S> FromRequestParts<S> for Validated<T>
where
    T: Clone + Send + Sync + 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .remove::<Validated<T>>()
            .ok_or_else(|| AppError::internal("route is missing its body validation stage"))
    }
}
