/// Factory: build the session-token and password services from application `Config`.
use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::services::auth::{PasswordHasher, SessionTokenService};

pub fn build_session_service(config: &Config) -> anyhow::Result<Arc<SessionTokenService>> {
    let service = SessionTokenService::new(&config.jwt_secret, config.session_ttl_seconds())
        .context("failed to build session token service")?;

    Ok(Arc::new(service))
}

pub fn build_password_hasher(config: &Config) -> PasswordHasher {
    PasswordHasher::new(config.bcrypt_cost)
}
