/*
 * Responsibility
 * - /signin and /signup request DTOs and their validators
 * - Password is only ever accepted here; it is never part of a response
 */
use serde::Deserialize;

use crate::api::dto::rules::{is_email, is_http_url, is_password, len_between, normalize_email};
use crate::middleware::validate::Validate;

pub const DEFAULT_NAME: &str = "Жак-Ив Кусто";
pub const DEFAULT_ABOUT: &str = "Исследователь";
pub const DEFAULT_AVATAR: &str =
    "https://pictures.s3.yandex.net/resources/jacques-cousteau_1604399756.png";

#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn email(&self) -> String {
        normalize_email(&self.email)
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), &'static str> {
        if !is_email(&self.email) {
            return Err("email must be a valid email address");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        if !is_password(&self.password) {
            return Err("password must be at most 72 bytes");
        }
        Ok(())
    }
}

#[derive(Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub about: Option<String>,
    pub avatar: Option<String>,
}

impl RegisterRequest {
    pub fn email(&self) -> String {
        normalize_email(&self.email)
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), &'static str> {
        if !is_email(&self.email) {
            return Err("email must be a valid email address");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }
        if !is_password(&self.password) {
            return Err("password must be at most 72 bytes");
        }
        if let Some(name) = &self.name
            && !len_between(name, 2, 30)
        {
            return Err("name must be 2 to 30 characters");
        }
        if let Some(about) = &self.about
            && !len_between(about, 2, 200)
        {
            return Err("about must be 2 to 200 characters");
        }
        if let Some(avatar) = &self.avatar
            && !is_http_url(avatar)
        {
            return Err("avatar must be an http(s) URL");
        }
        Ok(())
    }
}

// Keep passwords out of logs.
impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("about", &self.about)
            .field("avatar", &self.avatar)
            .finish_non_exhaustive()
    }
}
