//! Lazy client-credential acquisition: register the application, fall back to a lookup by name
//! when the IdP reports it already exists.

// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, ClientSecret, CredentialSource},
	error::{AcquisitionError, ConfigError},
	http::{IdpHttpClient, TransportErrorMapper},
	idp::{IdpClient, Registration},
	obs::{self, AcquisitionOutcome},
	provider::{CredentialProvider, CredentialState},
};

impl<C, M> CredentialProvider<C, M>
where
	C: ?Sized + IdpHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Attempts acquisition once and absorbs any failure.
	///
	/// Call this right after construction to keep the eager start-up attempt without letting an
	/// unavailable IdP block or fail process start.
	pub async fn warm_up(&self) -> CredentialState {
		match self.credentials().await {
			Ok(_) => CredentialState::Populated,
			Err(e) => {
				tracing::warn!(
					error = %e,
					cause = %e.idp_cause(),
					"Fetching client credentials failed due to IdP unavailability; will be re-attempted on next access."
				);

				CredentialState::Uninitialized
			},
		}
	}

	/// Returns the cached credential record, acquiring it first when necessary.
	///
	/// At most one acquisition runs at a time per provider; concurrent callers wait for it and
	/// observe the same record.
	pub async fn credentials(&self) -> Result<Arc<ClientCredentials>> {
		self.credentials.get_or_try_init(|| self.acquire()).await.map_err(Error::from)
	}

	/// Returns the OAuth 2.0 client identifier.
	pub async fn client_id(&self) -> Result<String> {
		Ok(self.credentials().await?.client_id.clone())
	}

	/// Returns a copy of the client secret; the copy is wiped when dropped.
	pub async fn client_secret(&self) -> Result<ClientSecret> {
		Ok(self.credentials().await?.client_secret.clone())
	}

	async fn acquire(&self) -> Result<ClientCredentials, AcquisitionError> {
		let result = self.register_or_look_up().await;

		obs::record_acquisition(match &result {
			Ok(credentials) => credentials.source.into(),
			Err(_) => AcquisitionOutcome::Failed,
		});

		result
	}

	async fn register_or_look_up(&self) -> Result<ClientCredentials, AcquisitionError> {
		let config = self
			.config
			.load()
			.map_err(|e| AcquisitionError::Registration { source: ConfigError::from(e).into() })?;
		let idp = IdpClient::new(&config, self.http_client.as_ref(), self.transport_mapper.as_ref());
		let registration =
			idp.register().await.map_err(|source| AcquisitionError::Registration { source })?;
		let (issued, source) = match registration {
			Registration::Issued(issued) => (issued, CredentialSource::Registered),
			Registration::Rejected { error, description } => {
				tracing::info!(
					client_name = %config.client_name,
					%error,
					description = description.as_deref().unwrap_or_default(),
					"Fetching the credentials of the already existing client."
				);

				let issued =
					idp.lookup().await.map_err(|source| AcquisitionError::Lookup { source })?;

				(issued, CredentialSource::Existing)
			},
		};

		tracing::info!(
			client_name = %config.client_name,
			client_id = %issued.client_id,
			%source,
			"Client credentials acquired."
		);

		Ok(ClientCredentials::new(issued.client_id, issued.client_secret, source))
	}
}
