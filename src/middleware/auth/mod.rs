pub mod session;

pub use session::{SESSION_COOKIE, authenticate, clear_session_cookie, session_cookie};
