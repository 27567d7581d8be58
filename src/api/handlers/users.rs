/*
 * Responsibility
 * - /users handlers (list, by id, self profile, profile/avatar edit)
 * - Path ids and bodies arrive already validated (PathId / Validated)
 * - "me" routes resolve the user from the session identity, never from the path
 */
use axum::{Json, extract::State};

use crate::{
    api::{
        dto::users::{UpdateAvatarRequest, UpdateProfileRequest, UserResponse},
        extractors::{CurrentUser, UserId, Validated},
    },
    error::AppError,
    repos::UserPatch,
    state::AppState,
};

fn user_not_found() -> AppError {
    AppError::not_found("user not found")
}

pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = state.users.list().await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_me(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .get(identity.user_id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(user.into()))
}

pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    user_id: UserId,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .get(user_id.id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(user.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Validated(req): Validated<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let patch = UserPatch {
        name: Some(req.name.trim().to_string()),
        about: Some(req.about.trim().to_string()),
        ..UserPatch::default()
    };

    let user = state
        .users
        .update(identity.user_id, patch)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(user.into()))
}

pub async fn update_avatar(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Validated(req): Validated<UpdateAvatarRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let patch = UserPatch {
        avatar: Some(req.avatar.trim().to_string()),
        ..UserPatch::default()
    };

    let user = state
        .users
        .update(identity.user_id, patch)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(user.into()))
}
