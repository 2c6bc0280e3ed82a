// self
use crate::{_prelude::*, obs::Phase};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedPhase<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedPhase<F> = F;

/// A span builder used by gateway phases.
#[derive(Clone, Debug)]
pub struct GatewaySpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl GatewaySpan {
	/// Creates a new span tagged with the provided phase, stage, and request path.
	pub fn new(phase: Phase, stage: &'static str, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("session_gateway.request", phase = phase.as_str(), stage, path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (phase, stage, path);

			Self {}
		}
	}

	/// Records an event inside the span (no-op without tracing).
	pub fn note(&self, message: &'static str) {
		#[cfg(feature = "tracing")]
		{
			self.span.in_scope(|| tracing::debug!("{message}"));
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = message;
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedPhase<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn gateway_span_noop_without_tracing() {
		GatewaySpan::new(Phase::Execute, "test", "/auth/check").note("smoke");
		// Compile-time smoke test ensures spans build even when tracing is disabled.
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = GatewaySpan::new(Phase::Replay, "instrument_wraps_future", "/playlist/");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
