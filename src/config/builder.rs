// self
use crate::{
	_prelude::*,
	auth::AdminPassword,
	config::{AdminCredentials, IdpConfig, IdpEndpoints},
};

const REGISTRATION_SEGMENT: &str = "register";
const INTROSPECTION_SEGMENT: &str = "introspect";

/// Errors raised while constructing or validating IdP settings.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum IdpConfigError {
	/// A required setting was not provided or is blank.
	#[error("Missing required IdP setting `{setting}`.")]
	Missing {
		/// Name of the missing setting.
		setting: &'static str,
	},
	/// IdP endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The base URL cannot carry path segments (e.g. `mailto:`).
	#[error("The IdP URL cannot be used as a base for endpoints: {url}.")]
	CannotBeABase {
		/// Offending URL.
		url: String,
	},
	/// A settings source could not produce settings.
	#[error("IdP settings are unavailable: {reason}.")]
	Unavailable {
		/// Source-supplied reason string.
		reason: String,
	},
}

/// Builder for [`IdpConfig`] values.
///
/// Every field is optional until [`build`](Self::build) validates the set, which lets hosts
/// deserialize the builder straight from their own configuration files.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdpConfigBuilder {
	/// IdP base URL.
	pub idp_url: Option<Url>,
	/// Overrides the `{idp_url}/register` endpoint.
	pub registration_endpoint: Option<Url>,
	/// Overrides the `{idp_url}/introspect` endpoint.
	pub introspection_endpoint: Option<Url>,
	/// Administrator username.
	pub admin_username: Option<String>,
	/// Administrator password.
	pub admin_password: Option<AdminPassword>,
	/// OAuth callback URL.
	pub callback_url: Option<Url>,
	/// Application name registered with the IdP.
	pub client_name: Option<String>,
	/// Fixed platform client identifier.
	pub platform_client_id: Option<String>,
}
impl IdpConfigBuilder {
	/// Sets the IdP base URL.
	pub fn idp_url(mut self, url: Url) -> Self {
		self.idp_url = Some(url);

		self
	}

	/// Overrides the registration endpoint.
	pub fn registration_endpoint(mut self, url: Url) -> Self {
		self.registration_endpoint = Some(url);

		self
	}

	/// Overrides the introspection endpoint.
	pub fn introspection_endpoint(mut self, url: Url) -> Self {
		self.introspection_endpoint = Some(url);

		self
	}

	/// Sets the administrator account.
	pub fn admin_credentials(
		mut self,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		self.admin_username = Some(username.into());
		self.admin_password = Some(AdminPassword::new(password));

		self
	}

	/// Sets the OAuth callback URL.
	pub fn callback_url(mut self, url: Url) -> Self {
		self.callback_url = Some(url);

		self
	}

	/// Sets the application name.
	pub fn client_name(mut self, name: impl Into<String>) -> Self {
		self.client_name = Some(name.into());

		self
	}

	/// Sets the fixed platform client identifier.
	pub fn platform_client_id(mut self, id: impl Into<String>) -> Self {
		self.platform_client_id = Some(id.into());

		self
	}

	/// Consumes the builder and validates the resulting settings.
	pub fn build(self) -> Result<IdpConfig, IdpConfigError> {
		let idp_url = self.idp_url.ok_or(IdpConfigError::Missing { setting: "idp_url" })?;
		let registration = match self.registration_endpoint {
			Some(url) => url,
			None => endpoint_under(&idp_url, REGISTRATION_SEGMENT)?,
		};
		let introspection = match self.introspection_endpoint {
			Some(url) => url,
			None => endpoint_under(&idp_url, INTROSPECTION_SEGMENT)?,
		};
		let username = required("admin_username", self.admin_username)?;
		let password = self
			.admin_password
			.filter(|password| !password.is_empty())
			.ok_or(IdpConfigError::Missing { setting: "admin_password" })?;
		let callback_url =
			self.callback_url.ok_or(IdpConfigError::Missing { setting: "callback_url" })?;
		let client_name = required("client_name", self.client_name)?;
		let platform_client_id = required("platform_client_id", self.platform_client_id)?;
		let config = IdpConfig {
			idp_url,
			endpoints: IdpEndpoints { registration, introspection },
			admin: AdminCredentials { username, password },
			callback_url,
			client_name,
			platform_client_id,
		};

		config.validate()?;

		Ok(config)
	}
}

impl IdpConfig {
	fn validate(&self) -> Result<(), IdpConfigError> {
		validate_endpoint("registration", &self.endpoints.registration)?;
		validate_endpoint("introspection", &self.endpoints.introspection)?;

		Ok(())
	}
}

fn required(setting: &'static str, value: Option<String>) -> Result<String, IdpConfigError> {
	value.filter(|v| !v.trim().is_empty()).ok_or(IdpConfigError::Missing { setting })
}

fn endpoint_under(base: &Url, segment: &str) -> Result<Url, IdpConfigError> {
	let mut url = base.clone();

	url.path_segments_mut()
		.map_err(|_| IdpConfigError::CannotBeABase { url: base.to_string() })?
		.pop_if_empty()
		.push(segment);

	Ok(url)
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), IdpConfigError> {
	if url.scheme() != "https" {
		Err(IdpConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}
