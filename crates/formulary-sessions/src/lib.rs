//! # Formulary Sessions
//!
//! Per-browser session storage. A session is addressed by an opaque id
//! (typically carried in a cookie) and holds JSON values: the wizard
//! accumulators and whatever the session backends write.
//!
//! Sessions are not locked between load and save. Two concurrent requests
//! for the same session race and the last save wins.

mod session;
mod store;

pub use session::Session;
pub use store::{InMemorySessionStore, SessionId, SessionStore};
