//! HTTP Basic authentication helpers for IdP administrator calls.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use zeroize::Zeroizing;

const BASIC_PREFIX: &str = "Basic ";

/// Builds an `Authorization` header value: `Basic base64(username:password)`.
///
/// Both the joined plaintext and the returned value are wiped on drop.
pub fn basic_authorization(username: &str, password: &str) -> Zeroizing<String> {
	let mut plain = Zeroizing::new(String::with_capacity(username.len() + password.len() + 1));

	plain.push_str(username);
	plain.push(':');
	plain.push_str(password);

	let mut header =
		Zeroizing::new(String::with_capacity(BASIC_PREFIX.len() + plain.len().div_ceil(3) * 4));

	header.push_str(BASIC_PREFIX);
	STANDARD.encode_string(plain.as_bytes(), &mut *header);

	header
}
