//! Observability helpers for IdP calls.
//!
//! # Feature Flags
//!
//! - Every IdP call runs inside an `oauth2_rp.idp` span carrying `call`
//!   (register/lookup/introspect) and `stage`; spans are always emitted through `tracing`.
//! - Enable `metrics` to count what callers actually observe:
//!   `oauth2_rp_acquisition_total{outcome}` (registered/existing/failed) and
//!   `oauth2_rp_introspection_total{outcome}` (active/inactive/unavailable/failed).

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::{_prelude::*, auth::CredentialSource};

/// IdP endpoints called by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdpCall {
	/// Dynamic client registration.
	Register,
	/// Lookup of an already registered client by name.
	Lookup,
	/// Token introspection.
	Introspect,
}
impl IdpCall {
	/// Returns the span label.
	pub const fn as_str(self) -> &'static str {
		match self {
			IdpCall::Register => "register",
			IdpCall::Lookup => "lookup",
			IdpCall::Introspect => "introspect",
		}
	}
}
impl Display for IdpCall {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// How a credential acquisition attempt ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcquisitionOutcome {
	/// Registration issued a fresh client.
	Registered,
	/// Registration was rejected and the existing client was looked up.
	Existing,
	/// Nothing was cached; the next access retries.
	Failed,
}
impl AcquisitionOutcome {
	/// Returns the metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			AcquisitionOutcome::Registered => "registered",
			AcquisitionOutcome::Existing => "existing",
			AcquisitionOutcome::Failed => "failed",
		}
	}
}
impl From<CredentialSource> for AcquisitionOutcome {
	fn from(source: CredentialSource) -> Self {
		match source {
			CredentialSource::Registered => AcquisitionOutcome::Registered,
			CredentialSource::Existing => AcquisitionOutcome::Existing,
		}
	}
}

/// Verdict of one token introspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrospectionOutcome {
	/// The token is active.
	Active,
	/// The IdP reported the token as inactive (or did not say).
	Inactive,
	/// The endpoint answered with an error status; the token was rejected.
	Unavailable,
	/// Validity could not be determined.
	Failed,
}
impl IntrospectionOutcome {
	/// Returns the metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			IntrospectionOutcome::Active => "active",
			IntrospectionOutcome::Inactive => "inactive",
			IntrospectionOutcome::Unavailable => "unavailable",
			IntrospectionOutcome::Failed => "failed",
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn acquisition_outcome_follows_credential_source() {
		assert_eq!(
			AcquisitionOutcome::from(CredentialSource::Registered).as_str(),
			CredentialSource::Registered.as_str()
		);
		assert_eq!(
			AcquisitionOutcome::from(CredentialSource::Existing).as_str(),
			CredentialSource::Existing.as_str()
		);
	}
}
