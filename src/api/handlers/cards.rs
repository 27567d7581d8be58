/*
 * Responsibility
 * - /cards handlers (list, create, delete, like, unlike)
 * - Ownership check for delete happens here, before the store delete call
 * - Missing card is always 404, never a silent success
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::cards::{CardResponse, CreateCardRequest},
        extractors::{CardId, CurrentUser, Validated},
    },
    error::AppError,
    repos::NewCard,
    state::AppState,
};

fn card_not_found() -> AppError {
    AppError::not_found("card not found")
}

pub async fn list_cards(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<CardResponse>>, AppError> {
    let rows = state.cards.list().await?;
    Ok(Json(rows.into_iter().map(CardResponse::from).collect()))
}

pub async fn create_card(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Validated(req): Validated<CreateCardRequest>,
) -> Result<(StatusCode, Json<CardResponse>), AppError> {
    let card = state
        .cards
        .create(NewCard {
            name: req.name.trim().to_string(),
            link: req.link.trim().to_string(),
            owner: identity.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(card.into())))
}

pub async fn delete_card(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    card_id: CardId,
) -> Result<Json<CardResponse>, AppError> {
    let card = state
        .cards
        .get(card_id.id)
        .await?
        .ok_or_else(card_not_found)?;

    if !identity.owns(card.owner) {
        tracing::info!(
            user_id = %identity.user_id,
            card_id = %card.id,
            "refused to delete a card owned by another user"
        );
        return Err(AppError::forbidden("you can only delete your own cards"));
    }

    // Gone between the read and the delete -> still 404
    let deleted = state
        .cards
        .delete(card.id)
        .await?
        .ok_or_else(card_not_found)?;

    Ok(Json(deleted.into()))
}

pub async fn like_card(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    card_id: CardId,
) -> Result<Json<CardResponse>, AppError> {
    let card = state
        .cards
        .like(card_id.id, identity.user_id)
        .await?
        .ok_or_else(card_not_found)?;

    Ok(Json(card.into()))
}

pub async fn unlike_card(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    card_id: CardId,
) -> Result<Json<CardResponse>, AppError> {
    let card = state
        .cards
        .unlike(card_id.id, identity.user_id)
        .await?
        .ok_or_else(card_not_found)?;

    Ok(Json(card.into()))
}
