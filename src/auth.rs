//! Credential-domain types: secrets, scopes, the CSRF nonce, and signed payloads.

pub mod scope;
pub mod secret;
pub mod signed;
pub mod state;

pub use scope::*;
pub use secret::*;
pub use signed::*;
pub use state::*;
