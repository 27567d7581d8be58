/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 *   - store handles, session-token service, password hasher, cookie policy
 * - Clone is cheap (everything inside is Arc / Copy)
 * - Holds no per-request data: identity lives in request extensions only
 */
use std::sync::Arc;

use crate::repos::{CardRepo, MemoryStore, UserRepo};
use crate::services::auth::{PasswordHasher, SessionTokenService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub cards: Arc<dyn CardRepo>,
    pub sessions: Arc<SessionTokenService>,
    pub passwords: PasswordHasher,
    /// Adds `Secure` to the session cookie (production).
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepo>,
        cards: Arc<dyn CardRepo>,
        sessions: Arc<SessionTokenService>,
        passwords: PasswordHasher,
        secure_cookies: bool,
    ) -> Self {
        Self {
            users,
            cards,
            sessions,
            passwords,
            secure_cookies,
        }
    }

    /// Both repos backed by one shared in-memory store.
    pub fn in_memory(
        store: MemoryStore,
        sessions: Arc<SessionTokenService>,
        passwords: PasswordHasher,
    ) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store, sessions, passwords, false)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions)
            .field("passwords", &self.passwords)
            .field("secure_cookies", &self.secure_cookies)
            .finish_non_exhaustive()
    }
}
