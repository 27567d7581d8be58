/*
 * Responsibility
 * - Process-level services shared through AppState (tokens, passwords, ids)
 */
pub mod auth;
pub mod object_id;
