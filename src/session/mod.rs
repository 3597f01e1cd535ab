//! Session state as seen by this service: the `auth` cookie, the identity
//! it proves, and the relay that gets it set or cleared by the backend.

pub mod bridge;
pub mod context;
pub mod cookie;
pub mod schema;

pub use bridge::{Relay, SessionBridge};
pub use context::SessionContext;
pub use cookie::{AUTH_COOKIE_NAME, clear_auth_cookie, read_auth_cookie};
