//! IdP settings consumed by the credential provider.
//!
//! Hosts either build an [`IdpConfig`] directly through [`IdpConfigBuilder`] or deserialize the
//! builder from their own configuration format and call [`IdpConfigBuilder::build`]. The provider
//! reads settings through an [`IdpConfigSource`] on every IdP call, so a source that is not ready
//! yet surfaces as a configuration error on that call instead of failing construction.

/// Builder API for assembling IdP settings.
pub mod builder;
/// Pluggable settings sources.
pub mod source;

pub use builder::*;
pub use source::*;

// crates.io
use zeroize::Zeroizing;
// self
use crate::{
	_prelude::*,
	auth::{self, AdminPassword},
};

/// IdP administrator account used for registration, lookup, and introspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminCredentials {
	/// Administrator username.
	pub username: String,
	/// Administrator password.
	pub password: AdminPassword,
}
impl AdminCredentials {
	/// Creates a new administrator credential pair.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: AdminPassword::new(password) }
	}

	/// Encodes the pair as an HTTP Basic `Authorization` value; recomputed on every call.
	pub fn authorization(&self) -> Zeroizing<String> {
		auth::basic_authorization(&self.username, self.password.expose())
	}
}

/// Endpoint set exposed by the IdP.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdpEndpoints {
	/// Dynamic client registration endpoint, also used for lookups by name.
	pub registration: Url,
	/// Token introspection endpoint.
	pub introspection: Url,
}

/// Validated IdP settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdpConfig {
	/// IdP base URL.
	pub idp_url: Url,
	/// Endpoints derived from (or overriding) the base URL.
	pub endpoints: IdpEndpoints,
	/// Administrator account sent as Basic authentication.
	pub admin: AdminCredentials,
	/// OAuth callback registered as the client's only redirect URI.
	pub callback_url: Url,
	/// Application name registered with the IdP and used for lookups.
	pub client_name: String,
	/// Fixed platform client identifier sent as `ext_param_client_id`.
	pub platform_client_id: String,
}
impl IdpConfig {
	/// Creates a new builder.
	pub fn builder() -> IdpConfigBuilder {
		IdpConfigBuilder::default()
	}
}
