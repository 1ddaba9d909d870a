//! Response interceptor that stamps CORS headers on every outgoing response.
//!
//! Browsers still send an `OPTIONS` preflight first, so hosts must also route `OPTIONS` for
//! every endpoint; this interceptor only decorates the response.

// crates.io
use oauth2::http::{
	HeaderMap, HeaderValue, Request, Response,
	header::{
		ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
		ACCESS_CONTROL_MAX_AGE, ORIGIN,
	},
};

/// Decision returned by a [`RequestInterceptor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interception {
	/// Hand the request to the next handler.
	Continue,
	/// Stop processing; the response is final.
	Halt,
}

/// Hook run before a request reaches its handler.
pub trait RequestInterceptor
where
	Self: Send + Sync,
{
	/// Inspects the request headers and decorates the response headers.
	fn intercept(&self, request: &HeaderMap, response: &mut HeaderMap) -> Interception;
}

/// Fixed CORS values stamped on every response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsPolicy {
	/// `Access-Control-Allow-Methods` value.
	pub allowed_methods: HeaderValue,
	/// `Access-Control-Allow-Headers` value.
	pub allowed_headers: HeaderValue,
	/// `Access-Control-Max-Age` in seconds.
	pub max_age: u32,
}
impl Default for CorsPolicy {
	fn default() -> Self {
		Self {
			allowed_methods: HeaderValue::from_static("GET, POST, PUT, DELETE"),
			allowed_headers: HeaderValue::from_static("Content-Type"),
			max_age: 3600,
		}
	}
}

/// Echoes a non-blank `Origin` back as the allowed origin, otherwise allows `*`.
#[derive(Clone, Debug, Default)]
pub struct CorsInterceptor {
	/// Values applied to every response.
	pub policy: CorsPolicy,
}
impl CorsInterceptor {
	/// Creates an interceptor with a custom policy.
	pub fn with_policy(policy: CorsPolicy) -> Self {
		Self { policy }
	}

	/// Applies [`RequestInterceptor::intercept`] to full `http` messages.
	pub fn intercept_message<B, R>(
		&self,
		request: &Request<B>,
		response: &mut Response<R>,
	) -> Interception {
		self.intercept(request.headers(), response.headers_mut())
	}
}
impl RequestInterceptor for CorsInterceptor {
	fn intercept(&self, request: &HeaderMap, response: &mut HeaderMap) -> Interception {
		let policy = &self.policy;

		response.insert(ACCESS_CONTROL_ALLOW_METHODS, policy.allowed_methods.clone());
		response.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(policy.max_age));
		response.insert(ACCESS_CONTROL_ALLOW_HEADERS, policy.allowed_headers.clone());

		let origin = request
			.get(ORIGIN)
			.filter(|origin| !origin.as_bytes().iter().all(u8::is_ascii_whitespace))
			.cloned()
			.unwrap_or_else(|| HeaderValue::from_static("*"));

		response.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);

		Interception::Continue
	}
}
