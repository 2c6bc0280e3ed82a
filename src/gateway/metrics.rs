// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for gateway activity.
#[derive(Debug, Default)]
pub struct GatewayMetrics {
	executions: AtomicU64,
	refresh_calls: AtomicU64,
	refresh_successes: AtomicU64,
	refresh_failures: AtomicU64,
	queued: AtomicU64,
	replays: AtomicU64,
	replay_successes: AtomicU64,
	replay_failures: AtomicU64,
	session_expirations: AtomicU64,
}
impl GatewayMetrics {
	/// Returns the number of requests handed to the gateway.
	pub fn executions(&self) -> u64 {
		self.executions.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh calls issued to the identity provider.
	pub fn refresh_calls(&self) -> u64 {
		self.refresh_calls.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh calls that extended the session.
	pub fn refresh_successes(&self) -> u64 {
		self.refresh_successes.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh calls that failed.
	pub fn refresh_failures(&self) -> u64 {
		self.refresh_failures.load(Ordering::Relaxed)
	}

	/// Returns the number of callers that waited on an in-flight refresh.
	pub fn queued(&self) -> u64 {
		self.queued.load(Ordering::Relaxed)
	}

	/// Returns the number of requests replayed after a refresh.
	pub fn replays(&self) -> u64 {
		self.replays.load(Ordering::Relaxed)
	}

	/// Returns the number of replays the API accepted.
	pub fn replay_successes(&self) -> u64 {
		self.replay_successes.load(Ordering::Relaxed)
	}

	/// Returns the number of replays that failed, including those rejected as expired again.
	pub fn replay_failures(&self) -> u64 {
		self.replay_failures.load(Ordering::Relaxed)
	}

	/// Returns the number of requests that ended with a session-expired error.
	pub fn session_expirations(&self) -> u64 {
		self.session_expirations.load(Ordering::Relaxed)
	}

	pub(crate) fn record_execution(&self) {
		self.executions.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_call(&self) {
		self.refresh_calls.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_success(&self) {
		self.refresh_successes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_failure(&self) {
		self.refresh_failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_queued(&self) {
		self.queued.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_replay(&self) {
		self.replays.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_replay_result(&self, accepted: bool) {
		let counter = if accepted { &self.replay_successes } else { &self.replay_failures };

		counter.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_session_expired(&self) {
		self.session_expirations.fetch_add(1, Ordering::Relaxed);
	}
}
