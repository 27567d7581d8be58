/*!
 * Authenticated identity extractor
 *
 * Responsibility:
 * - Give handlers the identity the authentication stage verified (Identity)
 * - axum-specific code stays in core, the type itself in types
 *
 * Public API:
 * - Identity
 * - CurrentUser
 */

mod core;
mod types;

pub use self::core::CurrentUser;
pub use types::Identity;
