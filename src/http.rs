//! Request channel: the stateless transport underneath the gateway.
//!
//! The module exposes [`RequestChannel`] alongside [`OutboundRequest`] and [`Response`] so
//! downstream crates can plug in custom HTTP stacks (or in-process fakes) without touching the
//! refresh machinery. A channel performs exactly one network call per [`RequestChannel::send`]
//! and knows nothing about sessions: any non-2xx answer comes back as
//! [`ChannelError::Status`], and the gateway decides what an expiry status means.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};
#[cfg(feature = "reqwest")] use crate::config::GatewayConfig;

/// Boxed future returned by [`RequestChannel::send`].
pub type ChannelFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Response, ChannelError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of issuing one outbound request.
///
/// Implementations must be `Send + Sync + 'static` so a single channel can back a shared
/// [`Gateway`](crate::gateway::Gateway), and the returned future must be `Send` so gateway calls can
/// hop executors.
pub trait RequestChannel
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` once and reports the buffered response or a typed failure.
	fn send<'a>(&'a self, request: &'a OutboundRequest) -> ChannelFuture<'a>;
}

/// Failure reported by a [`RequestChannel`].
#[derive(Debug, ThisError)]
pub enum ChannelError {
	/// Upstream answered with a non-2xx status.
	#[error("Upstream answered with HTTP {}.", .0.status)]
	Status(Response),
	/// No response arrived.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Request could not be built locally.
	#[error(transparent)]
	Request(#[from] ConfigError),
}
impl ChannelError {
	/// HTTP status, when a response arrived.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status(response) => Some(response.status),
			_ => None,
		}
	}
}

/// reqwest-backed [`RequestChannel`].
///
/// The client keeps a cookie store so the session cookie issued by the identity provider rides
/// along on every call, including replays issued after a refresh rotated it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestChannel {
	client: ReqwestClient,
	base_url: Url,
	default_timeout: Option<Duration>,
}
#[cfg(feature = "reqwest")]
impl ReqwestChannel {
	/// Builds a cookie-aware reqwest client for `config`.
	pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().cookie_store(true).build()?;

		Ok(Self::with_client(client, config))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// Enable the cookie store on custom clients when the API authenticates with cookies.
	pub fn with_client(client: ReqwestClient, config: &GatewayConfig) -> Self {
		Self {
			client,
			base_url: config.base_url.clone(),
			default_timeout: config.request_timeout,
		}
	}

	/// Base URL relative paths are resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestChannel {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
#[cfg(feature = "reqwest")]
impl RequestChannel for ReqwestChannel {
	fn send<'a>(&'a self, request: &'a OutboundRequest) -> ChannelFuture<'a> {
		Box::pin(async move {
			let url = request.resolve(&self.base_url)?;
			let mut builder = self
				.client
				.request(request.method().clone(), url)
				.headers(request.headers().clone());

			if let Some(body) = request.body() {
				builder = builder.body(body.to_vec());
			}
			if let Some(timeout) = request
				.timeout()
				.or(self.default_timeout)
				.and_then(|value| std::time::Duration::try_from(value).ok())
			{
				builder = builder.timeout(timeout);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status().as_u16();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();
			let response = Response::with_headers(status, headers, body);

			if response.is_success() { Ok(response) } else { Err(ChannelError::Status(response)) }
		})
	}
}
