//! Refresh coordination with a single-flight guarantee and FIFO fan-out.
//!
//! The first caller that observes an expired session becomes the initiator of a refresh cycle
//! and issues the one refresh call. Every caller that hits the expiry while that call is in flight
//! joins the [`RetryQueue`] instead. When the call settles the coordinator returns to
//! [`RefreshState::Idle`] and drains the queue in the same critical section, so no caller can
//! observe an idle coordinator with a non-empty queue.

pub mod queue;

pub use queue::*;

// self
use crate::{
	_prelude::*,
	config::GatewayConfig,
	error::RefreshError,
	gateway::GatewayMetrics,
	http::{ChannelError, OutboundRequest, RequestChannel},
	obs::{self, GatewaySpan, Phase, PhaseOutcome},
};

/// Lifecycle of the coordinator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefreshState {
	/// No refresh call in flight.
	#[default]
	Idle,
	/// A refresh call is in flight.
	Refreshing {
		/// Monotonic cycle number, starting at 1.
		cycle: u64,
	},
}

/// Result of one refresh cycle, identical for every caller of that cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
	/// Session extended; callers replay their requests.
	Refreshed,
	/// Refresh failed; callers surface a session-expired error.
	Failed(RefreshError),
}
impl RefreshOutcome {
	/// Returns `true` when the session was extended.
	pub fn is_refreshed(&self) -> bool {
		matches!(self, Self::Refreshed)
	}
}

/// How a caller took part in a refresh cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshRole {
	/// Issued the refresh call.
	Initiator,
	/// Waited on the retry queue.
	Queued {
		/// Arrival ticket.
		ticket: u64,
	},
}

/// Outcome of [`RefreshCoordinator::request_refresh`] together with the caller's role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshSettlement {
	/// Caller's role in the cycle.
	pub role: RefreshRole,
	/// Shared cycle outcome.
	pub outcome: RefreshOutcome,
}

/// Entry point into a refresh cycle returned by [`RefreshCoordinator::begin`].
#[derive(Debug)]
pub enum RefreshTicket<'a> {
	/// The caller must run the refresh call.
	Initiator(RefreshCycle<'a>),
	/// A refresh is already in flight; wait for it.
	Queued(QueuedRefresh),
}

#[derive(Debug, Default)]
struct CoordinatorState {
	phase: RefreshState,
	queue: RetryQueue,
	cycles: u64,
}

/// Guarantees at most one outstanding refresh call per gateway.
#[derive(Debug)]
pub struct RefreshCoordinator {
	endpoint: OutboundRequest,
	metrics: Arc<GatewayMetrics>,
	state: Mutex<CoordinatorState>,
}
impl RefreshCoordinator {
	/// Creates an idle coordinator that refreshes through `config.refresh_endpoint`.
	pub fn new(config: &GatewayConfig, metrics: Arc<GatewayMetrics>) -> Self {
		let endpoint = OutboundRequest::new(
			config.refresh_endpoint.method.clone(),
			config.refresh_endpoint.path.clone(),
		)
		.with_timeout(config.refresh_timeout);

		Self { endpoint, metrics, state: Default::default() }
	}

	/// Current lifecycle state.
	pub fn state(&self) -> RefreshState {
		self.state.lock().phase
	}

	/// Number of callers waiting on the in-flight refresh.
	pub fn queued(&self) -> usize {
		self.state.lock().queue.len()
	}

	/// Enters the current refresh cycle, starting one when idle.
	pub fn begin(&self) -> RefreshTicket<'_> {
		let mut state = self.state.lock();

		match state.phase {
			RefreshState::Idle => {
				state.cycles += 1;

				let cycle = state.cycles;

				state.phase = RefreshState::Refreshing { cycle };

				RefreshTicket::Initiator(RefreshCycle { coordinator: self, cycle, settled: false })
			},
			RefreshState::Refreshing { .. } => {
				self.metrics.record_queued();

				RefreshTicket::Queued(state.queue.enqueue())
			},
		}
	}

	/// Joins the current refresh cycle and resolves once it settles.
	///
	/// Exactly one caller per cycle issues the refresh call through `channel`; everybody else
	/// shares its outcome.
	pub async fn request_refresh<C>(&self, channel: &C) -> RefreshSettlement
	where
		C: ?Sized + RequestChannel,
	{
		match self.begin() {
			RefreshTicket::Initiator(cycle) =>
				RefreshSettlement { role: RefreshRole::Initiator, outcome: cycle.run(channel).await },
			RefreshTicket::Queued(waiter) => {
				let ticket = waiter.ticket();

				RefreshSettlement { role: RefreshRole::Queued { ticket }, outcome: waiter.wait().await }
			},
		}
	}

	fn settle(&self, outcome: &RefreshOutcome) -> usize {
		let mut state = self.state.lock();

		state.phase = RefreshState::Idle;

		state.queue.drain_all(outcome)
	}
}

/// A refresh cycle owned by its initiator.
///
/// Dropping the cycle before [`run`](Self::run) completes settles it as
/// [`RefreshError::Abandoned`], so waiters never hang on a refresh nobody drives.
#[derive(Debug)]
pub struct RefreshCycle<'a> {
	coordinator: &'a RefreshCoordinator,
	cycle: u64,
	settled: bool,
}
impl RefreshCycle<'_> {
	/// Cycle number.
	pub fn cycle(&self) -> u64 {
		self.cycle
	}

	/// Issues the refresh call, settles the cycle, and releases every queued caller.
	pub async fn run<C>(mut self, channel: &C) -> RefreshOutcome
	where
		C: ?Sized + RequestChannel,
	{
		const PHASE: Phase = Phase::Refresh;

		let coordinator = self.coordinator;
		let span = GatewaySpan::new(PHASE, "refresh_cycle", coordinator.endpoint.path());

		obs::record_phase_outcome(PHASE, PhaseOutcome::Attempt);
		coordinator.metrics.record_refresh_call();

		let outcome = span
			.instrument(async {
				match channel.send(&coordinator.endpoint).await {
					Ok(_) => RefreshOutcome::Refreshed,
					Err(ChannelError::Status(response)) =>
						RefreshOutcome::Failed(RefreshError::Rejected { status: response.status }),
					Err(err) =>
						RefreshOutcome::Failed(RefreshError::Transport { message: err.to_string() }),
				}
			})
			.await;

		if outcome.is_refreshed() {
			coordinator.metrics.record_refresh_success();
			obs::record_phase_outcome(PHASE, PhaseOutcome::Success);
		} else {
			coordinator.metrics.record_refresh_failure();
			obs::record_phase_outcome(PHASE, PhaseOutcome::Failure);
		}

		self.settle(&outcome);

		outcome
	}

	fn settle(&mut self, outcome: &RefreshOutcome) -> usize {
		self.settled = true;

		self.coordinator.settle(outcome)
	}
}
impl Drop for RefreshCycle<'_> {
	fn drop(&mut self) {
		if !self.settled {
			self.settle(&RefreshOutcome::Failed(RefreshError::Abandoned));
		}
	}
}
