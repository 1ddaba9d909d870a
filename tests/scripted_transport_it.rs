// std
use std::collections::VecDeque;
// crates.io
use parking_lot::Mutex;
// self
use oauth2_rp_provisioner::{
	_preludet::*,
	config::{IdpConfig, IdpConfigError, IdpConfigSource, StaticConfig},
	error::{AcquisitionError, ConfigError, IdpError, TransportError},
	http::{IdpHttpClient, TransportErrorMapper, map_common_transport_error},
	http_types::{Method, StatusCode, header::AUTHORIZATION},
	obs::IdpCall,
	provider::{CredentialProvider, CredentialState},
};
use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};

const ADMIN_AUTHORIZATION: &str = "Basic YWRtaW46YWRtaW4tcGFzc3dvcmQ=";
const IDP_URL: &str = "https://idp.test/oauth2";

#[derive(Debug, ThisError)]
enum ScriptedTransportError {
	#[error("Connection refused.")]
	Refused,
}

enum Reply {
	Json(u16, &'static str),
	Refused,
}

#[derive(Clone, Debug)]
struct Recorded {
	method: Method,
	uri: String,
	authorization: Option<String>,
	body: String,
}

#[derive(Default)]
struct ScriptedState {
	replies: Mutex<VecDeque<Reply>>,
	requests: Mutex<Vec<Recorded>>,
}

#[derive(Clone, Default)]
struct ScriptedIdp(Arc<ScriptedState>);
impl ScriptedIdp {
	fn with_replies(replies: impl IntoIterator<Item = Reply>) -> Self {
		let idp = Self::default();

		idp.0.replies.lock().extend(replies);

		idp
	}

	fn requests(&self) -> Vec<Recorded> {
		self.0.requests.lock().clone()
	}
}
impl IdpHttpClient for ScriptedIdp {
	type Handle = ScriptedHandle;
	type TransportError = ScriptedTransportError;

	fn handle(&self) -> Self::Handle {
		ScriptedHandle(self.0.clone())
	}
}

struct ScriptedHandle(Arc<ScriptedState>);
impl<'c> AsyncHttpClient<'c> for ScriptedHandle {
	type Error = HttpClientError<ScriptedTransportError>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let state = self.0.clone();

		Box::pin(async move {
			state.requests.lock().push(Recorded {
				method: request.method().clone(),
				uri: request.uri().to_string(),
				authorization: request
					.headers()
					.get(AUTHORIZATION)
					.and_then(|value| value.to_str().ok())
					.map(str::to_owned),
				body: String::from_utf8_lossy(request.body()).into_owned(),
			});

			let reply = state.replies.lock().pop_front().expect("Unexpected IdP call.");

			match reply {
				Reply::Json(status, body) => {
					let mut response = HttpResponse::new(body.as_bytes().to_vec());

					*response.status_mut() =
						StatusCode::from_u16(status).expect("Scripted status should be valid.");

					Ok(response)
				},
				Reply::Refused =>
					Err(HttpClientError::Reqwest(Box::new(ScriptedTransportError::Refused))),
			}
		})
	}
}

struct ScriptedMapper;
impl TransportErrorMapper<ScriptedTransportError> for ScriptedMapper {
	fn map_transport_error(
		&self,
		call: IdpCall,
		error: HttpClientError<ScriptedTransportError>,
	) -> IdpError {
		map_common_transport_error(call, error)
	}
}

type ScriptedProvider = CredentialProvider<ScriptedIdp, ScriptedMapper>;

fn provider(idp: &ScriptedIdp) -> ScriptedProvider {
	let config = test_config_builder(IDP_URL).build().expect("Test settings should build.");

	ScriptedProvider::with_http_client(
		Arc::new(StaticConfig::new(config)),
		idp.clone(),
		ScriptedMapper,
	)
}

#[tokio::test]
async fn registration_then_lookup_requests_are_well_formed() {
	let idp = ScriptedIdp::with_replies([
		Reply::Json(400, r#"{"error":"invalid_client_metadata"}"#),
		Reply::Json(200, r#"{"client_id":"existing-id","client_secret":"existing-secret"}"#),
	]);
	let provider = provider(&idp);

	assert_eq!(provider.client_id().await.expect("Lookup should succeed."), "existing-id");

	let requests = idp.requests();

	assert_eq!(requests.len(), 2);
	assert_eq!(requests[0].method, Method::POST);
	assert_eq!(requests[0].uri, "https://idp.test/oauth2/register");
	assert_eq!(requests[0].authorization.as_deref(), Some(ADMIN_AUTHORIZATION));

	let payload: serde_json::Value =
		serde_json::from_str(&requests[0].body).expect("Registration body should be JSON.");

	assert_eq!(payload["client_name"], TEST_CLIENT_NAME);
	assert_eq!(payload["ext_param_client_id"], TEST_PLATFORM_CLIENT_ID);
	assert_eq!(payload["redirect_uris"][0], TEST_CALLBACK_URL);
	assert_eq!(payload["grant_types"][0], "authorization_code");
	assert_eq!(requests[1].method, Method::GET);
	assert_eq!(
		requests[1].uri,
		format!("https://idp.test/oauth2/register?client_name={TEST_CLIENT_NAME}")
	);
	assert_eq!(requests[1].authorization.as_deref(), Some(ADMIN_AUTHORIZATION));
}

#[tokio::test]
async fn refused_registration_is_retried_on_next_access() {
	let idp = ScriptedIdp::with_replies([
		Reply::Refused,
		Reply::Json(201, r#"{"client_id":"fresh-id","client_secret":"fresh-secret"}"#),
	]);
	let provider = provider(&idp);
	let err = provider.client_id().await.expect_err("Refused connection should fail.");

	assert!(matches!(
		err,
		Error::Acquisition(AcquisitionError::Registration {
			source: IdpError::Transport(TransportError::Network { call: IdpCall::Register, .. })
		})
	));
	assert_eq!(provider.state(), CredentialState::Uninitialized);
	assert_eq!(
		provider.client_secret().await.expect("Second attempt should succeed.").expose(),
		"fresh-secret"
	);
	assert_eq!(idp.requests().len(), 2);
}

#[tokio::test]
async fn registration_missing_secret_is_reported() {
	let idp = ScriptedIdp::with_replies([Reply::Json(201, r#"{"client_id":"half"}"#)]);
	let provider = provider(&idp);
	let err = provider.credentials().await.expect_err("Secret is required.");

	assert!(matches!(
		err.idp_cause(),
		IdpError::MissingField { call: IdpCall::Register, field: "client_secret" }
	));
	assert_eq!(provider.state(), CredentialState::Uninitialized);
}

#[tokio::test]
async fn unavailable_settings_surface_as_configuration_errors() {
	let idp = ScriptedIdp::default();
	let source: Arc<dyn IdpConfigSource> =
		Arc::new(|| -> Result<Arc<IdpConfig>, IdpConfigError> {
			Err(IdpConfigError::Missing { setting: "idp_url" })
		});
	let provider = ScriptedProvider::with_http_client(source, idp.clone(), ScriptedMapper);
	let err = provider.client_id().await.expect_err("Missing settings should fail.");

	assert!(matches!(
		err,
		Error::Acquisition(AcquisitionError::Registration {
			source: IdpError::Config(ConfigError::Settings(IdpConfigError::Missing {
				setting: "idp_url"
			}))
		})
	));

	let err = provider.validate_token("token").await.expect_err("Missing settings should fail.");

	assert!(matches!(err.idp_cause(), IdpError::Config(ConfigError::Settings(_))));
	assert!(idp.requests().is_empty());
}

#[tokio::test]
async fn refused_introspection_is_an_error_and_ignores_credentials() {
	let idp = ScriptedIdp::with_replies([Reply::Refused]);
	let provider = provider(&idp);
	let err = provider.validate_token("token").await.expect_err("Refused connection should fail.");

	assert!(matches!(err, Error::Introspection(_)));

	let requests = idp.requests();

	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].uri, "https://idp.test/oauth2/introspect");
	assert_eq!(requests[0].body, "token=token");
	assert_eq!(provider.state(), CredentialState::Uninitialized);
}

#[tokio::test]
async fn clones_share_the_cached_credentials() {
	let idp = ScriptedIdp::with_replies([Reply::Json(
		201,
		r#"{"client_id":"shared","client_secret":"shared-secret"}"#,
	)]);
	let provider = provider(&idp);
	let clone = provider.clone();

	assert_eq!(provider.client_id().await.expect("Registration should succeed."), "shared");
	assert_eq!(clone.state(), CredentialState::Populated);
	assert_eq!(clone.client_id().await.expect("Clone should reuse the cache."), "shared");
	assert_eq!(idp.requests().len(), 1);
	assert_eq!(format!("{clone:?}"), "CredentialProvider { state: Populated }");
}

#[tokio::test]
async fn blank_lookup_credentials_are_not_cached() {
	let idp = ScriptedIdp::with_replies([
		Reply::Json(400, r#"{"error":"duplicate"}"#),
		Reply::Json(200, r#"{"client_id":"","client_secret":""}"#),
		Reply::Json(201, r#"{"client_id":"healed-id","client_secret":"healed-secret"}"#),
	]);
	let provider = provider(&idp);
	let err = provider.client_id().await.expect_err("Blank client_id should not be accepted.");

	assert!(matches!(
		err,
		Error::Acquisition(AcquisitionError::Lookup {
			source: IdpError::CredentialsNotFound { status: 200 }
		})
	));
	assert_eq!(provider.state(), CredentialState::Uninitialized);
	assert_eq!(provider.client_id().await.expect("Next access should retry."), "healed-id");
	assert_eq!(idp.requests().len(), 3);
}

#[tokio::test]
async fn blank_registered_secret_is_reported() {
	let idp = ScriptedIdp::with_replies([Reply::Json(
		201,
		r#"{"client_id":"half","client_secret":"  "}"#,
	)]);
	let provider = provider(&idp);
	let err = provider.credentials().await.expect_err("Blank secret should not be accepted.");

	assert!(matches!(
		err.idp_cause(),
		IdpError::MissingField { call: IdpCall::Register, field: "client_secret" }
	));
	assert_eq!(provider.state(), CredentialState::Uninitialized);
}
