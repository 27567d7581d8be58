/*
 * Responsibility
 * - Users request/response DTOs
 * - Profile edit validators (name/about, avatar)
 * - Responses never carry the password hash
 */
use serde::{Deserialize, Serialize};

use crate::api::dto::rules::{is_http_url, len_between};
use crate::middleware::validate::Validate;
use crate::repos::User;
use crate::services::object_id::ObjectId;

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub about: String,
}

impl Validate for UpdateProfileRequest {
    fn validate(&self) -> Result<(), &'static str> {
        if !len_between(&self.name, 2, 30) {
            return Err("name must be 2 to 30 characters");
        }
        if !len_between(&self.about, 2, 200) {
            return Err("about must be 2 to 200 characters");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAvatarRequest {
    pub avatar: String,
}

impl Validate for UpdateAvatarRequest {
    fn validate(&self) -> Result<(), &'static str> {
        if !is_http_url(&self.avatar) {
            return Err("avatar must be an http(s) URL");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub about: String,
    pub avatar: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            about: user.about,
            avatar: user.avatar,
            email: user.email,
        }
    }
}
