//! FIFO queue of callers blocked on the in-flight refresh.

// std
use std::collections::VecDeque;
// crates.io
use tokio::sync::oneshot::{self, Receiver, Sender};
// self
use crate::{_prelude::*, error::RefreshError, refresh::RefreshOutcome};

/// One caller blocked on the current refresh cycle.
///
/// The entry is the caller's pair of continuations: [`resolve`](Self::resolve) lets it replay,
/// [`reject`](Self::reject) fails it. Both consume the entry, so it can be released only once.
#[derive(Debug)]
pub struct RetryEntry {
	ticket: u64,
	sender: Sender<RefreshOutcome>,
}
impl RetryEntry {
	/// Arrival ticket; lower tickets arrived earlier.
	pub fn ticket(&self) -> u64 {
		self.ticket
	}

	/// Releases the caller to replay its request. Returns `false` if the caller is gone.
	pub fn resolve(self) -> bool {
		self.sender.send(RefreshOutcome::Refreshed).is_ok()
	}

	/// Releases the caller with the refresh failure. Returns `false` if the caller is gone.
	pub fn reject(self, error: RefreshError) -> bool {
		self.sender.send(RefreshOutcome::Failed(error)).is_ok()
	}
}

/// Caller side of a [`RetryEntry`].
#[derive(Debug)]
pub struct QueuedRefresh {
	ticket: u64,
	receiver: Receiver<RefreshOutcome>,
}
impl QueuedRefresh {
	/// Arrival ticket shared with the matching [`RetryEntry`].
	pub fn ticket(&self) -> u64 {
		self.ticket
	}

	/// Suspends until the cycle settles.
	///
	/// An entry dropped without release (its coordinator went away) reads as an abandoned cycle.
	pub async fn wait(self) -> RefreshOutcome {
		self.receiver.await.unwrap_or(RefreshOutcome::Failed(RefreshError::Abandoned))
	}
}

/// Ordered set of callers waiting on the in-flight refresh.
#[derive(Debug, Default)]
pub struct RetryQueue {
	entries: VecDeque<RetryEntry>,
	next_ticket: u64,
}
impl RetryQueue {
	/// Appends a new caller to the tail and returns its side of the entry.
	pub fn enqueue(&mut self) -> QueuedRefresh {
		let (sender, receiver) = oneshot::channel();
		let ticket = self.next_ticket;

		self.next_ticket += 1;
		self.entries.push_back(RetryEntry { ticket, sender });

		QueuedRefresh { ticket, receiver }
	}

	/// Releases every entry in arrival order with the same `outcome`, leaving the queue empty.
	///
	/// Returns the number of entries released, including callers that already went away.
	pub fn drain_all(&mut self, outcome: &RefreshOutcome) -> usize {
		let released = self.entries.len();

		while let Some(entry) = self.entries.pop_front() {
			match outcome {
				RefreshOutcome::Refreshed => entry.resolve(),
				RefreshOutcome::Failed(error) => entry.reject(error.clone()),
			};
		}

		released
	}

	/// Number of waiting callers.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` when nobody is waiting.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
