//! Transport primitives for IdP calls.
//!
//! The module exposes [`IdpHttpClient`] so downstream crates can plug in their own HTTP stack,
//! and [`TransportErrorMapper`] so transport-specific failures are classified consistently
//! before they reach [`IdpError`]. The reqwest-backed [`ReqwestHttpClient`] is the default.

// crates.io
use oauth2::{AsyncHttpClient, HttpClientError};
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, IdpError, TransportError},
	obs::IdpCall,
};

/// Abstraction over HTTP transports capable of executing IdP calls.
///
/// The trait is the provider's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so a provider can be shared across request-handling tasks, and the
/// handles they return must own whatever state is required so their request futures remain
/// `Send` for the lifetime of the in-flight call.
pub trait IdpHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle used for a single IdP call.
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds a handle for one call.
	fn handle(&self) -> Self::Handle;
}

/// Maps HTTP transport failures into [`IdpError`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into an IdP error.
	fn map_transport_error(&self, call: IdpCall, error: HttpClientError<E>) -> IdpError;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// IdP responses are interpreted as returned; configure any custom [`ReqwestClient`] to disable
/// redirect following so a 3xx from the introspection endpoint is observed rather than chased.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that accepts any server certificate and never follows redirects.
	///
	/// This matches IdP deployments that serve self-signed certificates inside a trusted
	/// network; do not use it across untrusted networks.
	pub fn trust_all() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl IdpHttpClient for ReqwestHttpClient {
	type Handle = ReqwestHandle;
	type TransportError = ReqwestError;

	fn handle(&self) -> Self::Handle {
		ReqwestHandle(self.0.clone())
	}
}

/// Handle returned by [`ReqwestHttpClient`] that implements [`AsyncHttpClient`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHandle(ReqwestClient);
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for ReqwestHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.0.clone();

		Box::pin(async move {
			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(&self, call: IdpCall, err: HttpClientError<ReqwestError>) -> IdpError {
		match err {
			HttpClientError::Reqwest(inner) if inner.is_builder() =>
				ConfigError::from(*inner).into(),
			HttpClientError::Reqwest(inner) => TransportError::network(call, *inner).into(),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			other => map_common_transport_error(call, other),
		}
	}
}

/// Classifies the transport-agnostic [`HttpClientError`] variants.
///
/// Custom mappers can delegate here after handling their own transport variant.
pub fn map_common_transport_error<E>(call: IdpCall, err: HttpClientError<E>) -> IdpError
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(call, *inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { call, message }.into(),
		_ => TransportError::Other { call, message: "unclassified transport failure".into() }
			.into(),
	}
}
