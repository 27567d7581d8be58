/*
 * Responsibility
 * - Cards request/response DTOs
 * - ids (card, owner, likes) go out as strings
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::dto::rules::{is_http_url, len_between};
use crate::middleware::validate::Validate;
use crate::repos::Card;
use crate::services::object_id::ObjectId;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCardRequest {
    pub name: String,
    pub link: String,
}

impl Validate for CreateCardRequest {
    fn validate(&self) -> Result<(), &'static str> {
        if !len_between(&self.name, 2, 30) {
            return Err("name must be 2 to 30 characters");
        }
        if !is_http_url(&self.link) {
            return Err("link must be an http(s) URL");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CardResponse {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub link: String,
    pub owner: ObjectId,
    pub likes: Vec<ObjectId>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            id: card.id,
            name: card.name,
            link: card.link,
            owner: card.owner,
            likes: card.likes,
            created_at: card.created_at,
        }
    }
}
