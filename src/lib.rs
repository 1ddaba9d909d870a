//! Self-healing OAuth 2.0 relying-party credentials: lazily register (or look up) the client with
//! your IdP, keep the secret in a zeroizing buffer, and introspect bearer tokens fail-closed.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod http;
pub mod obs;
pub mod provider;

mod idp;

#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::{IdpConfig, IdpConfigBuilder, StaticConfig},
		http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
		provider::ReqwestCredentialProvider,
	};

	/// Application name registered by the test helpers.
	pub const TEST_CLIENT_NAME: &str = "observability-portal";
	/// Platform client identifier sent by the test helpers.
	pub const TEST_PLATFORM_CLIENT_ID: &str = "observability-portal-client";
	/// IdP administrator username used by the test helpers.
	pub const TEST_ADMIN_USERNAME: &str = "admin";
	/// IdP administrator password used by the test helpers.
	pub const TEST_ADMIN_PASSWORD: &str = "admin-password";
	/// Callback URL registered by the test helpers.
	pub const TEST_CALLBACK_URL: &str = "https://portal.example.com/auth/callback";

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		ReqwestHttpClient::trust_all().expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Returns a builder pre-filled with the test constants for the IdP at `idp_url`.
	pub fn test_config_builder(idp_url: &str) -> IdpConfigBuilder {
		IdpConfig::builder()
			.idp_url(Url::parse(idp_url).expect("Test IdP URL should parse."))
			.admin_credentials(TEST_ADMIN_USERNAME, TEST_ADMIN_PASSWORD)
			.callback_url(Url::parse(TEST_CALLBACK_URL).expect("Test callback URL should parse."))
			.client_name(TEST_CLIENT_NAME)
			.platform_client_id(TEST_PLATFORM_CLIENT_ID)
	}

	/// Constructs a [`ReqwestCredentialProvider`] for the IdP at `idp_url`.
	pub fn build_reqwest_test_provider(idp_url: &str) -> ReqwestCredentialProvider {
		let config = test_config_builder(idp_url).build().expect("Test IdP settings should build.");

		ReqwestCredentialProvider::with_http_client(
			Arc::new(StaticConfig::new(config)),
			test_reqwest_http_client(),
			ReqwestTransportErrorMapper,
		)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2::http as http_types;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
#[cfg(test)] use oauth2_rp_provisioner as _;
