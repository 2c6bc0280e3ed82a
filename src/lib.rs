//! Single-flight session refresh gateway for REST clients.
//!
//! Route every call through [`gateway::Gateway::execute`]. When the API reports an expired session,
//! the first caller issues one refresh call while later callers queue behind it; once the refresh
//! settles, every queued request is replayed in arrival order or fails with the same error.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod identity;
pub mod obs;
pub mod refresh;
pub mod session;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::config::GatewayConfig;

	/// Builds a default configuration for an API mounted at `{origin}/api/v1`.
	pub fn test_gateway_config(origin: &str) -> GatewayConfig {
		let base = Url::parse(&format!("{}/api/v1", origin.trim_end_matches('/')))
			.expect("Test origin should form a valid base URL.");

		GatewayConfig::builder(base).build().expect("Default test configuration should validate.")
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
