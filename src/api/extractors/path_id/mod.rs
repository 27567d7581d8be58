/**
 * Responsibility
 *  - Bundle core and types
 *  - Control what handlers can see
 */
mod core;
mod types;

pub use self::core::PathId;
pub use types::*;
