/**
 * Responsibility
 *  - Declare one id type per resource
 *  - New resources add a tag + alias here and nothing else
 */
use super::core::PathId;

// users
pub enum UserTag {}
pub type UserId = PathId<UserTag>;

// cards
pub enum CardTag {}
pub type CardId = PathId<CardTag>;
