/*
 * Responsibility
 * - Store interfaces (UserRepo / CardRepo) and their backends
 * - Handlers only see the traits through AppState
 */
pub mod card_repo;
pub mod error;
pub mod memory;
pub mod user_repo;

pub use card_repo::{Card, CardRepo, NewCard, PgCardRepo};
pub use error::{RepoError, RepoResult};
pub use memory::MemoryStore;
pub use user_repo::{NewUser, PgUserRepo, User, UserPatch, UserRepo};
