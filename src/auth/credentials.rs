//! The client identifier/secret pair cached by the provider.

// self
use crate::{_prelude::*, auth::ClientSecret};

/// How the credentials were obtained from the IdP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialSource {
	/// Dynamic client registration issued a fresh client.
	Registered,
	/// Registration was rejected and the existing client was looked up by name.
	Existing,
}
impl CredentialSource {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CredentialSource::Registered => "registered",
			CredentialSource::Existing => "existing",
		}
	}
}
impl Display for CredentialSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Client identifier and secret published together once acquisition succeeds.
#[derive(Clone, Debug)]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: ClientSecret,
	/// Branch of the acquisition protocol that produced the pair.
	pub source: CredentialSource,
	/// Instant the pair was received.
	pub acquired_at: OffsetDateTime,
}
impl ClientCredentials {
	/// Creates a record stamped with the current time.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: ClientSecret,
		source: CredentialSource,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret,
			source,
			acquired_at: OffsetDateTime::now_utc(),
		}
	}
}
