//! Observability for the phases a request moves through.
//!
//! Each phase reports one attempt, then exactly one success or failure. With the `tracing` feature
//! the gateway opens a `session_gateway.request` span per phase carrying `phase`, `stage`, and
//! `path`. With `metrics`, every report increments [`PHASE_COUNTER`] labelled by `phase` and
//! `outcome`. Without either feature the helpers compile away.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

macro_rules! label_display {
	($($ty:ty),+) => {
		$(
			impl Display for $ty {
				fn fmt(&self, f: &mut Formatter) -> FmtResult {
					f.write_str(self.as_str())
				}
			}
		)+
	};
}

/// Stage of a request inside the gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
	/// The caller's request, from first send to final result.
	Execute,
	/// The one refresh call of a cycle.
	Refresh,
	/// The second send of a request after its session was refreshed.
	Replay,
}
impl Phase {
	/// Every phase, in the order a replayed request passes through them.
	pub const ALL: [Self; 3] = [Self::Execute, Self::Refresh, Self::Replay];

	/// Span and metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Execute => "execute",
			Self::Refresh => "refresh",
			Self::Replay => "replay",
		}
	}
}

/// What a phase report says.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseOutcome {
	/// The phase started.
	Attempt,
	/// The phase finished with a usable result.
	Success,
	/// The phase finished with an error.
	Failure,
}
impl PhaseOutcome {
	/// Reads the terminal outcome off a finished phase.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { Self::Success } else { Self::Failure }
	}

	/// Span and metric label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Attempt => "attempt",
			Self::Success => "success",
			Self::Failure => "failure",
		}
	}
}

label_display!(Phase, PhaseOutcome);
