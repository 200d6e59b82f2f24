//! Integration identity, credentials, secrets, tokens, and nonces.

pub mod credentials;
pub mod id;
pub mod nonce;
pub mod secret;

pub use credentials::*;
pub use id::*;
pub use nonce::*;
pub use secret::*;
