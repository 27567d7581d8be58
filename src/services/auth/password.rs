//! Password hashing (bcrypt).
//!
//! bcrypt is deliberately slow, so every operation runs on the blocking pool
//! instead of stalling the async worker that serves other requests.
//!
//! - Non-truncating variants: input past 72 bytes is an error, never silently cut.
//! - `verify_unknown` spends the same bcrypt work for an email with no account,
//!   so signin latency does not reveal which emails are registered.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::OnceCell;

/// Hashed once per hasher, at the configured cost, on first use.
const DUMMY_PASSWORD: &str = "no-such-account";

#[derive(Clone, Debug)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: Arc<OnceCell<String>>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    pub async fn hash(&self, password: String) -> anyhow::Result<String> {
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::non_truncating_hash(password, cost))
            .await
            .context("password hash task failed")?
            .context("failed to hash password")
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    pub async fn verify(&self, password: String, hash: String) -> anyhow::Result<bool> {
        tokio::task::spawn_blocking(move || bcrypt::non_truncating_verify(password, &hash))
            .await
            .context("password verify task failed")?
            .context("failed to verify password")
    }

    /// Same cost as `verify` against a real account. Always `Ok(false)`.
    pub async fn verify_unknown(&self, password: String) -> anyhow::Result<bool> {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.hash(DUMMY_PASSWORD.to_string()))
            .await?
            .clone();

        self.verify(password, dummy).await?;
        Ok(false)
    }
}
