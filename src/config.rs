//! Gateway configuration shared by the channel, coordinator, and identity helpers.
//!
//! Configuration is assembled through [`GatewayConfigBuilder`] and validated once, so the rest of
//! the crate can treat every field as trustworthy.

/// Builder API for assembling gateway configuration.
pub mod builder;

pub use builder::*;

// crates.io
use http::Method;
// self
use crate::_prelude::*;

/// Endpoint used to extend the ambient session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshEndpoint {
	/// HTTP method of the refresh call.
	pub method: Method,
	/// Path of the refresh call, relative to the base URL.
	pub path: String,
}
impl Default for RefreshEndpoint {
	fn default() -> Self {
		Self { method: Method::POST, path: "/auth/refreshToken".into() }
	}
}

/// Paths of the identity provider operations exposed by [`crate::identity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentityEndpoints {
	/// Password login (`POST`).
	pub login: String,
	/// Account registration (`POST`).
	pub register: String,
	/// Session termination (`GET`).
	pub logout: String,
	/// Current-identity lookup (`GET`).
	pub check: String,
	/// Verification email resend (`POST`).
	pub resend_verification: String,
}
impl Default for IdentityEndpoints {
	fn default() -> Self {
		Self {
			login: "/auth/login".into(),
			register: "/auth/register".into(),
			logout: "/auth/logout".into(),
			check: "/auth/check".into(),
			resend_verification: "/auth/resendVerification".into(),
		}
	}
}

/// Validated gateway configuration.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
	/// Base URL every relative request path is appended to.
	pub base_url: Url,
	/// Refresh call issued once per refresh cycle.
	pub refresh_endpoint: RefreshEndpoint,
	/// Status that signals an expired session.
	pub expiry_status: u16,
	/// Bound on the single refresh attempt, enforced by the transport.
	pub refresh_timeout: Duration,
	/// Default bound on regular requests; `None` leaves the transport default in place.
	pub request_timeout: Option<Duration>,
	/// Host route the application should navigate to once the session is gone.
	pub login_path: String,
	/// Identity provider operation paths.
	pub identity: IdentityEndpoints,
	refresh_exempt: Vec<String>,
}
impl GatewayConfig {
	/// Default bound on the refresh attempt.
	pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::seconds(10);
	/// Default expiry status.
	pub const DEFAULT_EXPIRY_STATUS: u16 = 401;

	/// Returns a builder seeded with defaults for `base_url`.
	pub fn builder(base_url: Url) -> GatewayConfigBuilder {
		GatewayConfigBuilder::new(base_url)
	}

	/// Whether an expiry status on `path` is surfaced as-is instead of triggering a refresh.
	///
	/// The refresh, login, and registration endpoints are always exempt: a 401 there means bad
	/// credentials, not an expired session. Query strings, fragments, surrounding slashes, and an
	/// absolute URL under [`base_url`](Self::base_url) do not affect the answer.
	pub fn is_refresh_exempt(&self, path: &str) -> bool {
		let Some(path) = self.api_path(path) else {
			return false;
		};
		let matches = |candidate: &str| bare_path(candidate) == path;

		matches(self.refresh_endpoint.path.as_str())
			|| matches(self.identity.login.as_str())
			|| matches(self.identity.register.as_str())
			|| self.refresh_exempt.iter().any(|exempt| matches(exempt.as_str()))
	}

	/// Reduces a request target to its path relative to the base URL.
	///
	/// Returns `None` for absolute URLs that point outside the API.
	fn api_path<'a>(&self, target: &'a str) -> Option<&'a str> {
		let target = target.split(['?', '#']).next().unwrap_or(target);
		let relative = if target.starts_with("http://") || target.starts_with("https://") {
			let rest = target.strip_prefix(self.base_url.as_str().trim_end_matches('/'))?;

			if !rest.is_empty() && !rest.starts_with('/') {
				return None;
			}

			rest
		} else {
			target
		};

		Some(bare_path(relative))
	}
}

fn bare_path(path: &str) -> &str {
	path.trim_matches('/')
}
