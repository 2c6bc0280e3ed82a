//! Gateway-level error types shared across the channel, coordinator, and identity helpers.

// self
use crate::{_prelude::*, config::GatewayConfigError, http::Response};

/// Gateway-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gateway error exposed by [`Gateway::execute`](crate::gateway::Gateway::execute).
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout). Not related to session state.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Upstream answered with a non-2xx status that is not a session expiry.
	#[error("Request to `{path}` failed with HTTP {}.", .response.status)]
	Status {
		/// Path of the failed request.
		path: String,
		/// Failed response, returned unchanged.
		response: Response,
	},
	/// Upstream answered with the expiry status on a path that never triggers a refresh.
	#[error("Request to `{path}` was rejected as unauthorized.")]
	Unauthorized {
		/// Path of the rejected request.
		path: String,
		/// Rejection response, returned unchanged.
		response: Response,
	},
	/// Session could not be restored; the host must prompt for re-authentication.
	#[error("Session expired: {reason}.")]
	SessionExpired {
		/// Why the session is considered expired.
		reason: SessionExpiredReason,
	},
	/// Response body did not match the expected JSON shape.
	#[error("Response body could not be decoded (HTTP {status}).")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status of the decoded response.
		status: u16,
	},
}
impl Error {
	/// Returns `true` for the terminal session-expired error.
	pub fn is_session_expired(&self) -> bool {
		matches!(self, Self::SessionExpired { .. })
	}

	/// HTTP status carried by the error, when one was observed.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { response, .. } | Self::Unauthorized { response, .. } =>
				Some(response.status),
			Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Reason attached to [`Error::SessionExpired`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SessionExpiredReason {
	/// The refresh cycle this request waited on failed.
	#[error("{0}")]
	RefreshFailed(#[from] RefreshError),
	/// The replayed request was rejected as expired again.
	#[error("the replayed request was rejected as unauthorized")]
	ReplayUnauthorized,
}

/// Failure of a single refresh cycle, delivered to every caller waiting on it.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefreshError {
	/// Identity provider answered the refresh call with a non-2xx status.
	#[error("identity provider rejected the refresh with HTTP {status}")]
	Rejected {
		/// HTTP status returned by the refresh endpoint.
		status: u16,
	},
	/// Refresh call failed before a response arrived.
	#[error("refresh call failed in transport: {message}")]
	Transport {
		/// Rendered transport failure.
		message: String,
	},
	/// The refresh future was dropped before it settled.
	#[error("refresh cycle was abandoned before it settled")]
	Abandoned,
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Gateway configuration failed validation.
	#[error(transparent)]
	Invalid(#[from] GatewayConfigError),
	/// Request target could not be resolved to a URL.
	#[error("Request target `{target}` is not a valid URL.")]
	InvalidUrl {
		/// Target that failed to resolve.
		target: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Header name or value is not valid HTTP.
	#[error("Header `{name}` is invalid.")]
	InvalidHeader {
		/// Offending header name.
		name: String,
	},
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be encoded as JSON.")]
	BodyEncode(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the timeout enforced by the transport.
	#[error("Request timed out while calling the API.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
