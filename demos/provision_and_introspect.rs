//! Provisions the portal's OAuth client against a mocked IdP (the name is already taken, so the
//! provider falls back to a lookup) and then validates a bearer token.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use oauth2_rp_provisioner::{
	config::{IdpConfig, StaticConfig},
	http::{ReqwestHttpClient, ReqwestTransportErrorMapper},
	provider::ReqwestCredentialProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let register_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/register");
			then.status(400).json_body(json!({
				"error": "invalid_client_metadata",
				"error_description": "Application with the name observability-portal already exists."
			}));
		})
		.await;
	let lookup_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/register").query_param("client_name", "observability-portal");
			then.status(200)
				.json_body(json!({ "client_id": "portal-id", "client_secret": "portal-secret" }));
		})
		.await;
	let introspect_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/introspect").body("token=demo-token");
			then.status(200).json_body(json!({ "active": true, "username": "alice" }));
		})
		.await;
	let config = IdpConfig::builder()
		.idp_url(Url::parse(&server.url(""))?)
		.admin_credentials("admin", "admin-password")
		.callback_url(Url::parse("https://portal.example.com/auth/callback")?)
		.client_name("observability-portal")
		.platform_client_id("observability-portal-client")
		.build()?;
	let provider = ReqwestCredentialProvider::with_http_client(
		Arc::new(StaticConfig::new(config)),
		ReqwestHttpClient::trust_all()?,
		ReqwestTransportErrorMapper,
	);

	println!("Warm-up left the provider {:?}.", provider.warm_up().await);
	println!("Client identifier: {}.", provider.client_id().await?);
	println!("Token is valid: {}.", provider.validate_token("demo-token").await?);

	register_mock.assert_async().await;
	lookup_mock.assert_async().await;
	introspect_mock.assert_async().await;

	Ok(())
}
