//! Credential provider for one named relying-party application.

pub mod cell;

mod acquisition;
mod introspection;

pub use cell::*;
pub use introspection::*;

// self
use crate::{
	_prelude::*,
	auth::ClientCredentials,
	config::IdpConfigSource,
	http::{IdpHttpClient, TransportErrorMapper},
};
#[cfg(feature = "reqwest")]
use crate::{
	config::{IdpConfig, StaticConfig},
	error::ConfigError,
	http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
};

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport stack.
pub type ReqwestCredentialProvider =
	CredentialProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Lifecycle of the cached credential pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialState {
	/// No acquisition has succeeded yet; the next accessor call will try again.
	Uninitialized,
	/// Client identifier and secret are cached for the rest of the process.
	Populated,
}

/// Owns the client identifier/secret of one application registered with the IdP.
///
/// Construction performs no network I/O. Credentials are acquired on [`warm_up`] or on the first
/// accessor call, either by registering the application or, when the IdP reports it already
/// exists, by looking it up by name. A failed acquisition leaves the provider
/// [`CredentialState::Uninitialized`] so a later call retries. Clones share the same cache and
/// acquisition guard.
///
/// [`warm_up`]: CredentialProvider::warm_up
pub struct CredentialProvider<C, M>
where
	C: ?Sized + IdpHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound IdP request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Source consulted for IdP settings on every call.
	pub config: Arc<dyn IdpConfigSource>,
	credentials: Arc<AcquisitionCell<ClientCredentials>>,
}
impl<C, M> CredentialProvider<C, M>
where
	C: ?Sized + IdpHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a provider that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: Arc<dyn IdpConfigSource>,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			config,
			credentials: Default::default(),
		}
	}

	/// Reports whether credentials are cached, without blocking or calling the IdP.
	pub fn state(&self) -> CredentialState {
		if self.credentials.get().is_some() {
			CredentialState::Populated
		} else {
			CredentialState::Uninitialized
		}
	}
}
#[cfg(feature = "reqwest")]
impl CredentialProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a provider for fixed settings over a [`ReqwestHttpClient::trust_all`] transport.
	///
	/// Only building the HTTP client can fail; the IdP is not contacted.
	pub fn new(config: IdpConfig) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(
			Arc::new(StaticConfig::new(config)),
			ReqwestHttpClient::trust_all()?,
			ReqwestTransportErrorMapper,
		))
	}
}
impl<C, M> Clone for CredentialProvider<C, M>
where
	C: ?Sized + IdpHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			config: self.config.clone(),
			credentials: self.credentials.clone(),
		}
	}
}
impl<C, M> Debug for CredentialProvider<C, M>
where
	C: ?Sized + IdpHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialProvider").field("state", &self.state()).finish()
	}
}
