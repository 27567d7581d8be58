/*
 * Responsibility
 * - Handler-facing views of what the pipeline stages stored in request extensions
 *   - identity: written by the authentication stage
 *   - path_id / validated: written by the validation stages
 * - A missing value means the route was wired without its stage
 */
pub mod identity;
pub mod path_id;
mod validated;

pub use identity::{CurrentUser, Identity};
pub use path_id::{CardId, PathId, UserId};
pub use validated::Validated;
