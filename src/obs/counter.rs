// self
use crate::obs::{AcquisitionOutcome, IntrospectionOutcome};

/// Counts one finished acquisition attempt (when `metrics` is enabled).
pub fn record_acquisition(outcome: AcquisitionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_rp_acquisition_total", "outcome" => outcome.as_str()).increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Counts one introspection verdict (when `metrics` is enabled).
pub fn record_introspection(outcome: IntrospectionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_rp_introspection_total", "outcome" => outcome.as_str()).increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_recorder_is_a_noop() {
		record_acquisition(AcquisitionOutcome::Failed);
		record_introspection(IntrospectionOutcome::Unavailable);
	}
}
