/*
 * Responsibility
 * - Typed record id taken from the route's path parameter
 * - The validation stage (validate_path_id) parses it and stores PathId<T> in extensions;
 *   this extractor only reads it back
 * - Shared by users and cards; the tag keeps a card id from being passed where a user id is expected
 *
 * Keep out of here
 * - Concrete resource names (see types.rs)
 * - Parsing rules (services::object_id)
 */
use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::services::object_id::ObjectId;

pub struct PathId<T> {
    pub id: ObjectId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PathId<T> {
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

// Manual impls: derives would demand T: Clone / T: Copy from the tag types.
impl<T> Clone for PathId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PathId<T> {}

impl<T, S> FromRequestParts<S> for PathId<T>
where
    T: 'static,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<PathId<T>>()
            .copied()
            .ok_or_else(|| AppError::internal("route is missing its id validation stage"))
    }
}

impl<T> std::fmt::Debug for PathId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathId").field("id", &self.id).finish()
    }
}
