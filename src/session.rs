//! Client-side view of the authenticated session and the expiry signal sent to the host.

// self
use crate::{_prelude::*, error::SessionExpiredReason, identity::Identity};

/// Emitted once the gateway gives up on restoring the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionExpiredEvent {
	/// Host route that should take over (the login entry point).
	pub login_path: String,
	/// Why the session is considered expired.
	pub reason: SessionExpiredReason,
	/// Instant the gateway declared the session expired.
	pub at: OffsetDateTime,
}

/// Receives the session-expired signal.
///
/// The gateway never navigates by itself; the host application decides what "go to login"
/// means. Closures of the shape `Fn(&SessionExpiredEvent)` implement the trait directly.
pub trait SessionListener
where
	Self: Send + Sync,
{
	/// Called after the session state has been cleared.
	fn session_expired(&self, event: &SessionExpiredEvent);
}
impl<F> SessionListener for F
where
	F: Fn(&SessionExpiredEvent) + Send + Sync,
{
	fn session_expired(&self, event: &SessionExpiredEvent) {
		self(event)
	}
}

/// Identity currently signed in through the gateway, if any.
#[derive(Debug, Default)]
pub struct SessionState(RwLock<Option<Identity>>);
impl SessionState {
	/// Returns a copy of the signed-in identity.
	pub fn identity(&self) -> Option<Identity> {
		self.0.read().clone()
	}

	/// Returns `true` when an identity is signed in.
	pub fn is_authenticated(&self) -> bool {
		self.0.read().is_some()
	}

	/// Records `identity` as signed in, replacing any previous one.
	pub fn sign_in(&self, identity: Identity) {
		*self.0.write() = Some(identity);
	}

	/// Forgets the signed-in identity, returning it.
	pub fn sign_out(&self) -> Option<Identity> {
		self.0.write().take()
	}
}
