//! Zeroizing secret wrappers that redact sensitive material.

// crates.io
use serde::Deserializer;
use zeroize::Zeroizing;
// self
use crate::_prelude::*;

macro_rules! def_secret {
	($name:ident, $doc:literal) => {
		#[doc = $doc]
		///
		/// The buffer is wiped when the value is dropped; `Debug` and `Display` never print it.
		#[derive(Clone, PartialEq, Eq)]
		pub struct $name(Zeroizing<String>);
		impl $name {
			/// Wraps a secret string, taking ownership of its buffer.
			pub fn new(value: impl Into<String>) -> Self {
				Self(Zeroizing::new(value.into()))
			}

			/// Returns the inner value. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}

			/// Reports whether the secret is empty.
			pub fn is_empty(&self) -> bool {
				self.0.is_empty()
			}
		}
		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
			where
				D: Deserializer<'de>,
			{
				String::deserialize(deserializer).map(Self::new)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

def_secret! { ClientSecret, "OAuth 2.0 client secret issued by the IdP." }
def_secret! { AdminPassword, "Password of the IdP administrator used for Basic authentication." }
