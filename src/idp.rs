//! IdP wire layer: request construction and response parsing for dynamic client registration,
//! lookup by client name, and token introspection.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpRequest, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue},
		request::Builder as RequestBuilder,
	},
};
use serde::de::DeserializeOwned;
use zeroize::Zeroizing;
// self
use crate::{
	_prelude::*,
	auth::ClientSecret,
	config::IdpConfig,
	error::{ConfigError, IdpError},
	http::{IdpHttpClient, TransportErrorMapper},
	obs::{IdpCall, IdpSpan},
};

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
const AUTHORIZATION_CODE_GRANT: &str = "authorization_code";

#[derive(Serialize)]
struct RegistrationRequest<'a> {
	ext_param_client_id: &'a str,
	client_name: &'a str,
	redirect_uris: [&'a str; 1],
	grant_types: [&'static str; 1],
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClientDocument {
	error: Option<serde_json::Value>,
	error_description: Option<String>,
	client_id: Option<String>,
	client_secret: Option<ClientSecret>,
}
impl ClientDocument {
	fn into_issued(self, call: IdpCall) -> Result<IssuedClient, IdpError> {
		let client_id = self
			.client_id
			.filter(|id| !id.trim().is_empty())
			.ok_or(IdpError::MissingField { call, field: "client_id" })?;
		let client_secret = self
			.client_secret
			.filter(|secret| !secret.expose().trim().is_empty())
			.ok_or(IdpError::MissingField { call, field: "client_secret" })?;

		Ok(IssuedClient { client_id, client_secret })
	}
}

/// Client identifier/secret pair extracted from a registration or lookup response.
#[derive(Debug)]
pub(crate) struct IssuedClient {
	pub(crate) client_id: String,
	pub(crate) client_secret: ClientSecret,
}

/// Result of a dynamic client registration attempt.
#[derive(Debug)]
pub(crate) enum Registration {
	/// The IdP created the client and returned its credentials.
	Issued(IssuedClient),
	/// The IdP answered with an `error` member, typically because the name is taken.
	Rejected { error: String, description: Option<String> },
}

/// Borrowed view over the settings and transport used for one logical operation.
pub(crate) struct IdpClient<'a, C, M>
where
	C: ?Sized + IdpHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	config: &'a IdpConfig,
	http_client: &'a C,
	mapper: &'a M,
}
impl<'a, C, M> IdpClient<'a, C, M>
where
	C: ?Sized + IdpHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn new(config: &'a IdpConfig, http_client: &'a C, mapper: &'a M) -> Self {
		Self { config, http_client, mapper }
	}

	/// Registers the configured application through dynamic client registration.
	///
	/// The HTTP status is not inspected: the IdP rejects duplicates with an `error` body.
	pub(crate) async fn register(&self) -> Result<Registration, IdpError> {
		let config = self.config;
		let payload = RegistrationRequest {
			ext_param_client_id: &config.platform_client_id,
			client_name: &config.client_name,
			redirect_uris: [config.callback_url.as_str()],
			grant_types: [AUTHORIZATION_CODE_GRANT],
		};
		let body = serde_json::to_vec(&payload)
			.map_err(|source| ConfigError::RequestEncode { source })?;
		let request = self
			.authorized(Method::POST, config.endpoints.registration.as_str())?
			.header(CONTENT_TYPE, CONTENT_TYPE_JSON)
			.body(body)
			.map_err(ConfigError::from)?;

		tracing::debug!(client_name = %config.client_name, "Creating new client.");

		let response = self.send(IdpCall::Register, request).await?;
		let document = parse_json::<ClientDocument>(IdpCall::Register, response)?;

		if let Some(error) = document.error {
			let error = match error {
				serde_json::Value::String(code) => code,
				other => other.to_string(),
			};

			return Ok(Registration::Rejected { error, description: document.error_description });
		}

		document.into_issued(IdpCall::Register).map(Registration::Issued)
	}

	/// Fetches the credentials of the client already registered under the configured name.
	pub(crate) async fn lookup(&self) -> Result<IssuedClient, IdpError> {
		let config = self.config;
		let mut url = config.endpoints.registration.clone();

		url.query_pairs_mut().append_pair("client_name", &config.client_name);

		let request =
			self.authorized(Method::GET, url.as_str())?.body(Vec::new()).map_err(ConfigError::from)?;
		let response = self.send(IdpCall::Lookup, request).await?;
		let status = response.status();

		if !status.is_success() {
			return Err(IdpError::CredentialsNotFound { status: status.as_u16() });
		}

		let document = parse_json::<ClientDocument>(IdpCall::Lookup, response)?;

		if document.client_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
			return Err(IdpError::CredentialsNotFound { status: status.as_u16() });
		}

		document.into_issued(IdpCall::Lookup)
	}

	/// Posts `token` to the introspection endpoint and returns the raw response.
	pub(crate) async fn introspect(&self, token: &str) -> Result<HttpResponse, IdpError> {
		let body = Zeroizing::new(
			url::form_urlencoded::Serializer::new(String::new())
				.append_pair("token", token)
				.finish(),
		);
		let request = self
			.authorized(Method::POST, self.config.endpoints.introspection.as_str())?
			.header(CONTENT_TYPE, CONTENT_TYPE_FORM)
			.body(body.as_bytes().to_vec())
			.map_err(ConfigError::from)?;

		self.send(IdpCall::Introspect, request).await
	}

	fn authorized(&self, method: Method, uri: &str) -> Result<RequestBuilder, IdpError> {
		let mut authorization =
			HeaderValue::from_str(&self.config.admin.authorization()).map_err(ConfigError::from)?;

		authorization.set_sensitive(true);

		Ok(Request::builder()
			.method(method)
			.uri(uri)
			.header(AUTHORIZATION, authorization)
			.header(ACCEPT, CONTENT_TYPE_JSON))
	}

	async fn send(&self, call: IdpCall, request: HttpRequest) -> Result<HttpResponse, IdpError> {
		let span = IdpSpan::new(call, "send");
		let handle = self.http_client.handle();
		let result = span
			.instrument(handle.call(request))
			.await
			.map_err(|e| self.mapper.map_transport_error(call, e));

		match &result {
			Ok(response) =>
				tracing::debug!(%call, status = response.status().as_u16(), "IdP responded."),
			Err(e) => tracing::debug!(%call, error = %e, "IdP call failed."),
		}

		result
	}
}

/// Parses a JSON response body, wiping the raw bytes afterwards.
pub(crate) fn parse_json<T>(call: IdpCall, response: HttpResponse) -> Result<T, IdpError>
where
	T: DeserializeOwned,
{
	let status = response.status().as_u16();
	let body = Zeroizing::new(response.into_body());
	let mut deserializer = serde_json::Deserializer::from_slice(&body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| IdpError::MalformedResponse { call, status, source })
}
