// crates.io
use http::Method;
// self
use crate::{
	_prelude::*,
	config::{GatewayConfig, IdentityEndpoints, RefreshEndpoint},
};

/// Errors raised while constructing or validating gateway configuration.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum GatewayConfigError {
	/// Base URL must be an `http` or `https` URL that can carry paths.
	#[error("Base URL must be an absolute http(s) URL: {url}.")]
	InvalidBaseUrl {
		/// Base URL that failed validation.
		url: String,
	},
	/// Configured paths must be absolute.
	#[error("The {name} path must start with `/`: {path}.")]
	RelativePath {
		/// Which path failed validation.
		name: &'static str,
		/// Offending path.
		path: String,
	},
	/// Expiry status must be a client error.
	#[error("Expiry status must be a 4xx code, got {status}.")]
	ExpiryStatusOutOfRange {
		/// Offending status.
		status: u16,
	},
	/// Timeouts must be positive.
	#[error("The {name} timeout must be positive.")]
	NonPositiveTimeout {
		/// Which timeout failed validation.
		name: &'static str,
	},
}

/// Builder for [`GatewayConfig`] values.
#[derive(Debug)]
pub struct GatewayConfigBuilder {
	/// Base URL for relative request paths.
	pub base_url: Url,
	/// Refresh endpoint.
	pub refresh_endpoint: RefreshEndpoint,
	/// Status that signals an expired session.
	pub expiry_status: u16,
	/// Bound on the refresh attempt.
	pub refresh_timeout: Duration,
	/// Default bound on regular requests.
	pub request_timeout: Option<Duration>,
	/// Login entry point reported to the host.
	pub login_path: String,
	/// Identity provider paths.
	pub identity: IdentityEndpoints,
	/// Extra paths that never trigger a refresh.
	pub refresh_exempt: Vec<String>,
}
impl GatewayConfigBuilder {
	/// Creates a new builder seeded with defaults.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			refresh_endpoint: RefreshEndpoint::default(),
			expiry_status: GatewayConfig::DEFAULT_EXPIRY_STATUS,
			refresh_timeout: GatewayConfig::DEFAULT_REFRESH_TIMEOUT,
			request_timeout: None,
			login_path: "/login".into(),
			identity: IdentityEndpoints::default(),
			refresh_exempt: Vec::new(),
		}
	}

	/// Overrides the refresh call.
	pub fn refresh_endpoint(mut self, method: Method, path: impl Into<String>) -> Self {
		self.refresh_endpoint = RefreshEndpoint { method, path: path.into() };

		self
	}

	/// Overrides the status treated as session expiry.
	pub fn expiry_status(mut self, status: u16) -> Self {
		self.expiry_status = status;

		self
	}

	/// Overrides the refresh timeout.
	pub fn refresh_timeout(mut self, timeout: Duration) -> Self {
		self.refresh_timeout = timeout;

		self
	}

	/// Sets a default timeout for regular requests.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Overrides the login entry point reported on session expiry.
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Overrides the identity provider paths.
	pub fn identity(mut self, identity: IdentityEndpoints) -> Self {
		self.identity = identity;

		self
	}

	/// Adds a path whose expiry status is surfaced without a refresh.
	pub fn exempt_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_exempt.push(path.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<GatewayConfig, GatewayConfigError> {
		let config = GatewayConfig {
			base_url: self.base_url,
			refresh_endpoint: self.refresh_endpoint,
			expiry_status: self.expiry_status,
			refresh_timeout: self.refresh_timeout,
			request_timeout: self.request_timeout,
			login_path: self.login_path,
			identity: self.identity,
			refresh_exempt: self.refresh_exempt,
		};

		config.validate()?;

		Ok(config)
	}
}

impl GatewayConfig {
	fn validate(&self) -> Result<(), GatewayConfigError> {
		if !matches!(self.base_url.scheme(), "http" | "https") || self.base_url.cannot_be_a_base() {
			return Err(GatewayConfigError::InvalidBaseUrl { url: self.base_url.to_string() });
		}
		if !(400..500).contains(&self.expiry_status) {
			return Err(GatewayConfigError::ExpiryStatusOutOfRange { status: self.expiry_status });
		}

		validate_timeout("refresh", self.refresh_timeout)?;

		if let Some(timeout) = self.request_timeout {
			validate_timeout("request", timeout)?;
		}

		validate_path("refresh", &self.refresh_endpoint.path)?;
		validate_path("login", &self.login_path)?;
		validate_path("identity login", &self.identity.login)?;
		validate_path("identity register", &self.identity.register)?;
		validate_path("identity logout", &self.identity.logout)?;
		validate_path("identity check", &self.identity.check)?;
		validate_path("identity resend verification", &self.identity.resend_verification)?;

		for path in &self.refresh_exempt {
			validate_path("exempt", path)?;
		}

		Ok(())
	}
}

fn validate_path(name: &'static str, path: &str) -> Result<(), GatewayConfigError> {
	if path.starts_with('/') {
		Ok(())
	} else {
		Err(GatewayConfigError::RelativePath { name, path: path.to_owned() })
	}
}

fn validate_timeout(name: &'static str, timeout: Duration) -> Result<(), GatewayConfigError> {
	if timeout.is_positive() {
		Ok(())
	} else {
		Err(GatewayConfigError::NonPositiveTimeout { name })
	}
}
