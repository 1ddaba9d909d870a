// self
use crate::{
	_prelude::*,
	config::{IdpConfig, IdpConfigError},
};

/// Supplies IdP settings to the provider on every IdP call.
pub trait IdpConfigSource
where
	Self: Send + Sync,
{
	/// Returns the current settings or the reason they are unavailable.
	fn load(&self) -> Result<Arc<IdpConfig>, IdpConfigError>;
}

/// Settings fixed at construction time.
#[derive(Clone, Debug)]
pub struct StaticConfig(Arc<IdpConfig>);
impl StaticConfig {
	/// Wraps already validated settings.
	pub fn new(config: IdpConfig) -> Self {
		Self(Arc::new(config))
	}
}
impl IdpConfigSource for StaticConfig {
	fn load(&self) -> Result<Arc<IdpConfig>, IdpConfigError> {
		Ok(self.0.clone())
	}
}
impl From<IdpConfig> for StaticConfig {
	fn from(config: IdpConfig) -> Self {
		Self::new(config)
	}
}

impl<F> IdpConfigSource for F
where
	F: Send + Sync + Fn() -> Result<Arc<IdpConfig>, IdpConfigError>,
{
	fn load(&self) -> Result<Arc<IdpConfig>, IdpConfigError> {
		self()
	}
}
