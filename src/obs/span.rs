// crates.io
use tracing::{Span, instrument::Instrumented};
// self
use crate::{_prelude::*, obs::IdpCall};

/// A span builder used around IdP calls.
#[derive(Clone, Debug)]
pub struct IdpSpan {
	span: Span,
}
impl IdpSpan {
	/// Creates a new span tagged with the provided call + stage.
	pub fn new(call: IdpCall, stage: &'static str) -> Self {
		Self { span: tracing::info_span!("oauth2_rp.idp", call = call.as_str(), stage) }
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		use tracing::Instrument;

		fut.instrument(self.span.clone())
	}
}
