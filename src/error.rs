//! Crate-level error types shared by credential acquisition, introspection, and transports.

// self
use crate::{_prelude::*, config::IdpConfigError, obs::IdpCall};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Client credentials could not be registered or looked up; retry later.
	#[error(transparent)]
	Acquisition(#[from] AcquisitionError),
	/// Token validity could not be determined.
	#[error(transparent)]
	Introspection(#[from] IntrospectionError),
}
impl Error {
	/// Returns the IdP-level cause regardless of which operation failed.
	pub fn idp_cause(&self) -> &IdpError {
		match self {
			Self::Acquisition(e) => e.cause(),
			Self::Introspection(e) => &e.source,
		}
	}
}

/// Failure while obtaining the client identifier/secret pair.
#[derive(Debug, ThisError)]
pub enum AcquisitionError {
	/// Dynamic client registration failed.
	#[error("Error occurred while registering the client.")]
	Registration {
		/// Underlying IdP failure.
		#[source]
		source: IdpError,
	},
	/// Registration was rejected and looking up the existing client failed.
	#[error("Error occurred while retrieving the existing client credentials.")]
	Lookup {
		/// Underlying IdP failure.
		#[source]
		source: IdpError,
	},
}
impl AcquisitionError {
	/// Returns the underlying IdP failure.
	pub fn cause(&self) -> &IdpError {
		match self {
			Self::Registration { source } | Self::Lookup { source } => source,
		}
	}
}

/// Failure while calling the introspection endpoint (distinct from an inactive token).
#[derive(Debug, ThisError)]
#[error("Error occurred while calling the introspection endpoint.")]
pub struct IntrospectionError {
	/// Underlying IdP failure.
	#[source]
	pub source: IdpError,
}
impl From<IdpError> for IntrospectionError {
	fn from(source: IdpError) -> Self {
		Self { source }
	}
}

/// Cause attached to every acquisition and introspection failure.
#[derive(Debug, ThisError)]
pub enum IdpError {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// IdP responded with a body that is not the expected JSON document.
	#[error("The {call} endpoint returned malformed JSON (status {status}).")]
	MalformedResponse {
		/// Call that produced the body.
		call: IdpCall,
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Lookup did not return the registered client.
	#[error("Expected client credentials are not found in the response (status {status}).")]
	CredentialsNotFound {
		/// HTTP status code of the lookup response.
		status: u16,
	},
	/// Response omitted a field required to build the credentials.
	#[error("The {call} response is missing the `{field}` field.")]
	MissingField {
		/// Call that produced the response.
		call: IdpCall,
		/// Missing JSON member.
		field: &'static str,
	},
}

/// Configuration and request-construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// IdP settings are missing or invalid.
	#[error("IdP settings are unavailable.")]
	Settings(#[from] IdpConfigError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A header value could not be encoded.
	#[error(transparent)]
	InvalidHeader(#[from] oauth2::http::header::InvalidHeaderValue),
	/// Registration body could not be serialized.
	#[error("Registration request could not be encoded.")]
	RequestEncode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {call} endpoint.")]
	Network {
		/// Call in flight when the failure occurred.
		call: IdpCall,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the IdP.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a typed cause.
	#[error("HTTP client error occurred while calling the {call} endpoint: {message}.")]
	Other {
		/// Call in flight when the failure occurred.
		call: IdpCall,
		/// Transport-supplied message.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(call: IdpCall, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { call, source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn idp_cause_unwraps_both_operations() {
		let err = Error::from(AcquisitionError::Lookup {
			source: IdpError::CredentialsNotFound { status: 404 },
		});

		assert!(matches!(err.idp_cause(), IdpError::CredentialsNotFound { status: 404 }));

		let err = Error::from(IntrospectionError::from(IdpError::from(TransportError::Other {
			call: IdpCall::Introspect,
			message: "refused".into(),
		})));

		assert!(matches!(err.idp_cause(), IdpError::Transport(TransportError::Other { .. })));
		assert_eq!(err.to_string(), "Error occurred while calling the introspection endpoint.");
	}
}
