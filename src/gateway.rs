//! Gateway façade: every outbound API call of the host application goes through here.
//!
//! [`Gateway::execute`] sends a request through the [`RequestChannel`]. When the answer is the
//! configured expiry status the request is marked retried and the caller joins the current refresh
//! cycle, either as its initiator or as a queued waiter. A successful refresh replays the original
//! request once; a failed one ends every request of the cycle with
//! [`Error::SessionExpired`]. Everything else comes back unchanged.

mod metrics;

pub use metrics::GatewayMetrics;

// self
use crate::{
	_prelude::*,
	config::GatewayConfig,
	error::{RefreshError, SessionExpiredReason},
	http::{ChannelError, OutboundRequest, RequestChannel, Response},
	obs::{self, GatewaySpan, Phase, PhaseOutcome},
	refresh::{RefreshCoordinator, RefreshOutcome, RefreshRole, RefreshSettlement},
	session::{SessionExpiredEvent, SessionListener, SessionState},
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestChannel};

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport.
pub type ReqwestGateway = Gateway<ReqwestChannel>;

/// Single-flight session refresh gateway.
///
/// The gateway owns the refresh state and the retry queue for its whole lifetime. It is not
/// `Clone`: share one instance behind an [`Arc`] so every caller coordinates on the same state.
/// Independent instances (for example one per base URL) refresh independently.
pub struct Gateway<C>
where
	C: ?Sized + RequestChannel,
{
	channel: Arc<C>,
	config: GatewayConfig,
	coordinator: RefreshCoordinator,
	metrics: Arc<GatewayMetrics>,
	session: SessionState,
	listener: Option<Arc<dyn SessionListener>>,
}
impl<C> Gateway<C>
where
	C: ?Sized + RequestChannel,
{
	/// Creates a gateway on top of a caller-provided channel.
	pub fn with_channel(config: GatewayConfig, channel: impl Into<Arc<C>>) -> Self {
		let metrics = Arc::new(GatewayMetrics::default());
		let coordinator = RefreshCoordinator::new(&config, metrics.clone());

		Self {
			channel: channel.into(),
			config,
			coordinator,
			metrics,
			session: SessionState::default(),
			listener: None,
		}
	}

	/// Registers the listener that receives the session-expired signal.
	pub fn with_listener(mut self, listener: impl 'static + SessionListener) -> Self {
		self.listener = Some(Arc::new(listener));

		self
	}

	/// Channel used for every outbound call.
	pub fn channel(&self) -> &Arc<C> {
		&self.channel
	}

	/// Validated configuration.
	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}

	/// Refresh coordinator, exposed for introspection.
	pub fn coordinator(&self) -> &RefreshCoordinator {
		&self.coordinator
	}

	/// Activity counters.
	pub fn metrics(&self) -> &Arc<GatewayMetrics> {
		&self.metrics
	}

	/// Identity currently signed in.
	pub fn session(&self) -> &SessionState {
		&self.session
	}

	/// Sends `request`, refreshing the session and replaying once when it has expired.
	pub async fn execute(&self, request: OutboundRequest) -> Result<Response> {
		const PHASE: Phase = Phase::Execute;

		let span = GatewaySpan::new(PHASE, "execute", request.path());

		obs::record_phase_outcome(PHASE, PhaseOutcome::Attempt);
		self.metrics.record_execution();

		let result = span.instrument(self.drive(request, &span)).await;

		obs::record_phase_result(PHASE, &result);

		result
	}

	async fn drive(&self, mut request: OutboundRequest, span: &GatewaySpan) -> Result<Response> {
		loop {
			let sent = self.channel.send(&request).await;

			// Only a refreshed request carries the marker on its way out.
			if request.is_retried() {
				obs::record_phase_result(Phase::Replay, &sent);
				self.metrics.record_replay_result(sent.is_ok());
			}

			let response = match sent {
				Ok(response) => return Ok(response),
				Err(ChannelError::Status(response)) => response,
				Err(ChannelError::Transport(err)) => return Err(err.into()),
				Err(ChannelError::Request(err)) => return Err(err.into()),
			};
			let path = request.path().to_owned();

			if response.status != self.config.expiry_status {
				return Err(Error::Status { path, response });
			}
			if self.config.is_refresh_exempt(&path) {
				return Err(Error::Unauthorized { path, response });
			}
			if request.is_retried() {
				span.note("replay rejected as unauthorized");

				return Err(self.expire(SessionExpiredReason::ReplayUnauthorized));
			}

			request.mark_retried();

			let settlement = self.await_refresh(span).await;

			match settlement.outcome {
				RefreshOutcome::Refreshed => {
					span.note("replaying after refresh");
					obs::record_phase_outcome(Phase::Replay, PhaseOutcome::Attempt);
					self.metrics.record_replay();
				},
				RefreshOutcome::Failed(err) => {
					let reason = SessionExpiredReason::RefreshFailed(err);

					// Only the initiator signals the host; queued callers share its cycle.
					return Err(match settlement.role {
						RefreshRole::Initiator => self.expire(reason),
						RefreshRole::Queued { .. } => {
							self.metrics.record_session_expired();

							Error::SessionExpired { reason }
						},
					});
				},
			}
		}
	}

	/// Joins refresh cycles until one settles with a verdict on the session.
	///
	/// An abandoned cycle says nothing about the session: its initiator went away before the
	/// refresh call finished. Queued callers released that way enter the next cycle instead, and
	/// the first of them becomes its initiator.
	async fn await_refresh(&self, span: &GatewaySpan) -> RefreshSettlement {
		loop {
			let settlement = self.coordinator.request_refresh(self.channel.as_ref()).await;

			if settlement.outcome != RefreshOutcome::Failed(RefreshError::Abandoned) {
				return settlement;
			}

			span.note("refresh cycle abandoned, rejoining");
		}
	}

	fn expire(&self, reason: SessionExpiredReason) -> Error {
		self.metrics.record_session_expired();
		self.session.sign_out();

		if let Some(listener) = &self.listener {
			listener.session_expired(&SessionExpiredEvent {
				login_path: self.config.login_path.clone(),
				reason: reason.clone(),
				at: OffsetDateTime::now_utc(),
			});
		}

		Error::SessionExpired { reason }
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestChannel> {
	/// Creates a gateway backed by its own cookie-aware reqwest channel.
	pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
		let channel = ReqwestChannel::new(&config)?;

		Ok(Self::with_channel(config, channel))
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + RequestChannel,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway")
			.field("base_url", &self.config.base_url.as_str())
			.field("refresh_state", &self.coordinator.state())
			.field("queued", &self.coordinator.queued())
			.field("listener_set", &self.listener.is_some())
			.finish()
	}
}
