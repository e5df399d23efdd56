//! Request extractors for the admin handlers.

mod session;
pub use session::{session_token, AdminSession};
