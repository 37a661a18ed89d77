pub mod auth;
pub mod role;

pub use auth::{maybe_auth, require_auth, AuthActor};
