/*
 * Responsibility
 * - URL layout of the API
 * - Per-route stage order: validation -> authentication -> handler
 *   (ServiceBuilder: the first layer added runs first)
 * - /signin, /signup and /health are the only routes without the authentication stage
 * - Unknown paths / methods end in the same JSON 404 as everything else
 */
use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post, put},
};
use tower::ServiceBuilder;

use crate::api::dto::{
    auth::{LoginRequest, RegisterRequest},
    cards::CreateCardRequest,
    users::{UpdateAvatarRequest, UpdateProfileRequest},
};
use crate::api::extractors::path_id::{CardTag, UserTag};
use crate::api::handlers::{auth, cards, health::health, users};
use crate::error::AppError;
use crate::middleware::auth::authenticate;
use crate::middleware::validate::{validate_body, validate_path_id};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let authn = from_fn_with_state(state, authenticate);

    Router::new()
        .route("/health", get(health))
        // credential issuance / registration: validation only
        .route(
            "/signin",
            post(auth::signin).layer(from_fn(validate_body::<LoginRequest>)),
        )
        .route(
            "/signup",
            post(auth::signup).layer(from_fn(validate_body::<RegisterRequest>)),
        )
        .route("/signout", post(auth::signout).layer(authn.clone()))
        // users
        .route("/users", get(users::list_users).layer(authn.clone()))
        .route("/users/me", get(users::get_me).layer(authn.clone()))
        .route(
            "/users/me",
            patch(users::update_profile).layer(
                ServiceBuilder::new()
                    .layer(from_fn(validate_body::<UpdateProfileRequest>))
                    .layer(authn.clone()),
            ),
        )
        .route(
            "/users/me/avatar",
            patch(users::update_avatar).layer(
                ServiceBuilder::new()
                    .layer(from_fn(validate_body::<UpdateAvatarRequest>))
                    .layer(authn.clone()),
            ),
        )
        .route(
            "/users/{user_id}",
            get(users::get_user).layer(
                ServiceBuilder::new()
                    .layer(from_fn(validate_path_id::<UserTag>))
                    .layer(authn.clone()),
            ),
        )
        // cards
        .route("/cards", get(cards::list_cards).layer(authn.clone()))
        .route(
            "/cards",
            post(cards::create_card).layer(
                ServiceBuilder::new()
                    .layer(from_fn(validate_body::<CreateCardRequest>))
                    .layer(authn.clone()),
            ),
        )
        .route(
            "/cards/{card_id}",
            delete(cards::delete_card).layer(
                ServiceBuilder::new()
                    .layer(from_fn(validate_path_id::<CardTag>))
                    .layer(authn.clone()),
            ),
        )
        .route(
            "/cards/{card_id}/likes",
            put(cards::like_card).delete(cards::unlike_card).layer(
                ServiceBuilder::new()
                    .layer(from_fn(validate_path_id::<CardTag>))
                    .layer(authn),
            ),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::not_found("requested resource not found")
}
