/*
 * Responsibility
 * - POST /signin: credentials -> session cookie (jwt)
 * - POST /signup: account registration
 * - POST /signout: drop the session cookie
 * - Unknown email and wrong password are the same 401, after the same bcrypt work
 */
use anyhow::Context;
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    api::{
        dto::{
            auth::{DEFAULT_ABOUT, DEFAULT_AVATAR, DEFAULT_NAME, LoginRequest, RegisterRequest},
            users::UserResponse,
        },
        extractors::{CurrentUser, Validated},
    },
    error::AppError,
    middleware::auth::{clear_session_cookie, session_cookie},
    repos::{NewUser, RepoError},
    state::AppState,
};

fn bad_credentials() -> AppError {
    AppError::auth("incorrect email or password")
}

pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    Validated(req): Validated<LoginRequest>,
) -> Result<(CookieJar, Json<UserResponse>), AppError> {
    let email = req.email();
    let Some(user) = state.users.find_by_email(&email).await? else {
        // Same bcrypt work as a wrong password, so timing does not reveal the account.
        state.passwords.verify_unknown(req.password).await?;
        return Err(bad_credentials());
    };

    let matches = state
        .passwords
        .verify(req.password, user.password_hash.clone())
        .await?;
    if !matches {
        return Err(bad_credentials());
    }

    let token = state
        .sessions
        .issue(user.id)
        .context("failed to sign session token")?;

    tracing::info!(user_id = %user.id, "signed in");

    let cookie = session_cookie(token, state.sessions.ttl_seconds(), state.secure_cookies);
    Ok((jar.add(cookie), Json(UserResponse::from(user))))
}

pub async fn signup(
    State(state): State<AppState>,
    Validated(req): Validated<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let email = req.email();
    let password_hash = state.passwords.hash(req.password).await?;

    let user = state
        .users
        .create(NewUser {
            name: trimmed_or(req.name, DEFAULT_NAME),
            about: trimmed_or(req.about, DEFAULT_ABOUT),
            avatar: trimmed_or(req.avatar, DEFAULT_AVATAR),
            email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            RepoError::Conflict => AppError::conflict("user with this email already exists"),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, "registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn signout(
    CurrentUser(identity): CurrentUser,
    jar: CookieJar,
) -> (CookieJar, Json<serde_json::Value>) {
    tracing::info!(user_id = %identity.user_id, "signed out");
    (
        clear_session_cookie(jar),
        Json(serde_json::json!({ "message": "signed out" })),
    )
}

fn trimmed_or(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| default.to_string())
}
