//! Phase counters exported through the `metrics` facade.

// self
use crate::{
	_prelude::*,
	obs::{Phase, PhaseOutcome},
};

/// Counter incremented once per phase report.
pub const PHASE_COUNTER: &str = "session_gateway_phase_total";

/// Reports `outcome` for `phase` to the global recorder, if one is installed.
pub fn record_phase_outcome(phase: Phase, outcome: PhaseOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(PHASE_COUNTER, "phase" => phase.as_str(), "outcome" => outcome.as_str())
			.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (phase, outcome);
	}
}

/// Reports the end of `phase` from its result.
pub fn record_phase_result<T, E>(phase: Phase, result: &Result<T, E>) {
	record_phase_outcome(phase, PhaseOutcome::of(result));
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn every_phase_and_outcome_can_be_reported() {
		for phase in Phase::ALL {
			record_phase_outcome(phase, PhaseOutcome::Attempt);
			record_phase_result(phase, &Ok::<_, ()>(()));
			record_phase_result(phase, &Err::<(), _>(()));
		}
	}
}
