//! Authentication stage: session cookie (`jwt`) -> verified `Identity` in request extensions.
//!
//! - Applied per route in `api::routes`; `/signin` and `/signup` are not wrapped.
//! - Every failure (no cookie, bad signature, expired, malformed subject) becomes the
//!   same 401 so the client cannot tell which check failed. The cause is logged.
//! - Handlers never read the cookie; they take `CurrentUser`, which reads what this stage stored.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::api::extractors::Identity;
use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "jwt";

pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
        .ok_or_else(AppError::unauthenticated)?;

    let user_id = match state.sessions.verify(token) {
        Ok(user_id) => user_id,
        Err(err) => {
            tracing::warn!(error = %err, "session token verification failed");
            return Err(AppError::unauthenticated());
        }
    };

    // middleware -> extractor hand-off, scoped to this request only
    req.extensions_mut().insert(Identity::new(user_id));

    Ok(next.run(req).await)
}

/// `HttpOnly`, `SameSite=Strict`, lives as long as the token inside it.
pub fn session_cookie(token: String, ttl_seconds: u64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl_seconds as i64))
        .build()
}

pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
