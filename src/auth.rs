//! Credential primitives: redacted secrets, Basic-auth encoding, and the cached client record.

pub mod basic;
pub mod credentials;
pub mod secret;

pub use basic::*;
pub use credentials::*;
pub use secret::*;
