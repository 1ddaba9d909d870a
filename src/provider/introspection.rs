//! Bearer-token validation through the IdP introspection endpoint.

// std
use std::ops::Range;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, IdpError, IntrospectionError},
	http::{IdpHttpClient, TransportErrorMapper},
	idp::{self, IdpClient},
	obs::{self, IdpCall, IntrospectionOutcome},
	provider::CredentialProvider,
};

/// Statuses whose body is interpreted; redirects are not followed and count as answered.
const ANSWERED: Range<u16> = 200..400;

/// Members of an RFC 7662 introspection response surfaced to callers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IntrospectionClaims {
	/// Whether the token is currently active.
	pub active: Option<bool>,
	/// Space-delimited scopes granted to the token.
	pub scope: Option<String>,
	/// Client the token was issued to.
	pub client_id: Option<String>,
	/// Resource owner that authorized the token.
	pub username: Option<String>,
	/// Token type, e.g. `Bearer`.
	pub token_type: Option<String>,
	/// Subject of the token.
	pub sub: Option<String>,
	/// Expiry as seconds since the Unix epoch.
	pub exp: Option<i64>,
	/// Issue time as seconds since the Unix epoch.
	pub iat: Option<i64>,
}
impl IntrospectionClaims {
	/// Returns the expiry instant, if the IdP reported a representable one.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.exp.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
	}
}

/// Outcome of introspecting a token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenStatus {
	/// The IdP reports the token as active.
	Active(IntrospectionClaims),
	/// The token is expired, revoked, unknown, or the IdP did not say it is active.
	Inactive,
	/// The introspection endpoint answered with a status outside `200..400`.
	Unavailable {
		/// HTTP status returned by the endpoint.
		status: u16,
	},
}
impl TokenStatus {
	/// Fail-closed validity: only [`TokenStatus::Active`] counts as valid.
	pub fn is_valid(&self) -> bool {
		matches!(self, Self::Active(_))
	}

	fn from_claims(claims: IntrospectionClaims) -> Self {
		match claims.active {
			Some(true) => Self::Active(claims),
			Some(false) => Self::Inactive,
			None => {
				tracing::warn!(
					"Introspection response omitted `active`; treating the token as inactive."
				);

				Self::Inactive
			},
		}
	}
}

impl From<&TokenStatus> for IntrospectionOutcome {
	fn from(status: &TokenStatus) -> Self {
		match status {
			TokenStatus::Active(_) => IntrospectionOutcome::Active,
			TokenStatus::Inactive => IntrospectionOutcome::Inactive,
			TokenStatus::Unavailable { .. } => IntrospectionOutcome::Unavailable,
		}
	}
}

impl<C, M> CredentialProvider<C, M>
where
	C: ?Sized + IdpHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns whether `token` is currently valid.
	///
	/// An inactive token and an introspection endpoint answering with an error status both yield
	/// `Ok(false)`. `Err` means validity could not be determined at all (transport, TLS,
	/// configuration, or an unreadable body).
	pub async fn validate_token(&self, token: &str) -> Result<bool> {
		Ok(self.introspect(token).await?.is_valid())
	}

	/// Introspects `token` with the IdP administrator credentials.
	///
	/// Does not read or acquire the managed client credentials.
	pub async fn introspect(&self, token: &str) -> Result<TokenStatus> {
		let result = self.introspect_once(token).await;

		obs::record_introspection(match &result {
			Ok(status) => status.into(),
			Err(_) => IntrospectionOutcome::Failed,
		});

		result
	}

	async fn introspect_once(&self, token: &str) -> Result<TokenStatus> {
		let config = self
			.config
			.load()
			.map_err(|e| IntrospectionError::from(IdpError::from(ConfigError::from(e))))?;
		let idp = IdpClient::new(&config, self.http_client.as_ref(), self.transport_mapper.as_ref());
		let response = idp.introspect(token).await.map_err(IntrospectionError::from)?;
		let status = response.status().as_u16();

		if !ANSWERED.contains(&status) {
			tracing::error!(
				status,
				"Failed to connect to the introspection endpoint of the IdP; treating the token as invalid."
			);

			return Ok(TokenStatus::Unavailable { status });
		}

		let claims = idp::parse_json::<IntrospectionClaims>(IdpCall::Introspect, response)
			.map_err(IntrospectionError::from)?;

		Ok(TokenStatus::from_claims(claims))
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn claims(json: &str) -> IntrospectionClaims {
		serde_json::from_str(json).expect("Claims should deserialize.")
	}

	#[test]
	fn active_flag_drives_status() {
		let status = TokenStatus::from_claims(claims(r#"{"active":true,"scope":"openid"}"#));

		assert!(status.is_valid());
		assert!(matches!(
			status,
			TokenStatus::Active(IntrospectionClaims { scope: Some(ref s), .. }) if s == "openid"
		));
		assert_eq!(TokenStatus::from_claims(claims(r#"{"active":false}"#)), TokenStatus::Inactive);
	}

	#[test]
	fn missing_active_is_inactive() {
		let status = TokenStatus::from_claims(claims(r#"{"scope":"openid"}"#));

		assert_eq!(status, TokenStatus::Inactive);
		assert!(!status.is_valid());
	}

	#[test]
	fn unavailable_is_not_valid() {
		let status = TokenStatus::Unavailable { status: 500 };

		assert!(!status.is_valid());
		assert_eq!(IntrospectionOutcome::from(&status), IntrospectionOutcome::Unavailable);
	}

	#[test]
	fn metric_outcome_labels_the_verdict() {
		let active = TokenStatus::from_claims(claims(r#"{"active":true}"#));

		assert_eq!(IntrospectionOutcome::from(&active).as_str(), "active");
		assert_eq!(IntrospectionOutcome::from(&TokenStatus::Inactive).as_str(), "inactive");
	}

	#[test]
	fn expiry_converts_to_instant() {
		let claims = claims(r#"{"active":true,"exp":1700000000}"#);

		assert_eq!(
			claims.expires_at().map(OffsetDateTime::unix_timestamp),
			Some(1_700_000_000)
		);
		assert_eq!(IntrospectionClaims::default().expires_at(), None);
	}
}
