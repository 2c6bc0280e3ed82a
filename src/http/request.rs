//! Outbound request description handed to the gateway.

// crates.io
use http::{
	HeaderMap, HeaderName, HeaderValue, Method,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{_prelude::*, error::ConfigError};

/// Opaque description of one outbound API call.
///
/// The gateway owns the request while it is in flight. It may set the `retried` marker before a
/// replay but never touches the method, path, query, or body, so a replay is byte-for-byte the
/// original call.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	method: Method,
	path: String,
	query: Vec<(String, String)>,
	headers: HeaderMap,
	body: Option<Vec<u8>>,
	timeout: Option<Duration>,
	retried: bool,
}
impl OutboundRequest {
	/// Creates a request for `path`, relative to the gateway base URL or absolute.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: HeaderMap::new(),
			body: None,
			timeout: None,
			retried: false,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Shorthand for a `PUT` request.
	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Appends a query parameter.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Inserts a header, replacing any previous value for the same name.
	pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, ConfigError> {
		let invalid = || ConfigError::InvalidHeader { name: name.to_owned() };
		let name_parsed = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
		let value_parsed = HeaderValue::from_str(value).map_err(|_| invalid())?;

		self.headers.insert(name_parsed, value_parsed);

		Ok(self)
	}

	/// Sets a raw body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Serializes `value` as the JSON body and sets the matching content headers.
	pub fn with_json<T>(mut self, value: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(value).map_err(ConfigError::BodyEncode)?;

		self.headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		self.headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
		self.body = Some(body);

		Ok(self)
	}

	/// Bounds this request with a transport-enforced timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// HTTP method.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// Path (or absolute URL) as supplied by the caller.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Query parameters in insertion order.
	pub fn query(&self) -> &[(String, String)] {
		&self.query
	}

	/// Request headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// Request body, if any.
	pub fn body(&self) -> Option<&[u8]> {
		self.body.as_deref()
	}

	/// Per-request timeout, if any.
	pub fn timeout(&self) -> Option<Duration> {
		self.timeout
	}

	/// Whether the request was already replayed after a refresh.
	pub fn is_retried(&self) -> bool {
		self.retried
	}

	pub(crate) fn mark_retried(&mut self) {
		self.retried = true;
	}

	/// Resolves the request target against `base`.
	///
	/// Relative paths are appended to the base path (`https://host/api/v1` + `/auth/check` becomes
	/// `https://host/api/v1/auth/check`); absolute `http(s)` URLs are used as-is.
	pub fn resolve(&self, base: &Url) -> Result<Url, ConfigError> {
		let mut url = if self.path.starts_with("http://") || self.path.starts_with("https://") {
			Url::parse(&self.path)
				.map_err(|source| ConfigError::InvalidUrl { target: self.path.clone(), source })?
		} else {
			let (path, query) = match self.path.split_once('?') {
				Some((path, query)) => (path, Some(query)),
				None => (self.path.as_str(), None),
			};
			let mut url = base.clone();

			url.set_path(&format!(
				"{}/{}",
				base.path().trim_end_matches('/'),
				path.trim_start_matches('/')
			));
			url.set_query(query);

			url
		};

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		Ok(url)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn base() -> Url {
		Url::parse("https://api.example.com/api/v1").expect("Base URL fixture should parse.")
	}

	#[test]
	fn resolve_appends_to_base_path() {
		let url = OutboundRequest::get("/auth/check")
			.resolve(&base())
			.expect("Relative path should resolve.");

		assert_eq!(url.as_str(), "https://api.example.com/api/v1/auth/check");

		let with_slash = Url::parse("https://api.example.com/api/v1/")
			.expect("Base URL fixture should parse.");
		let url = OutboundRequest::delete("playlist/42")
			.resolve(&with_slash)
			.expect("Relative path should resolve.");

		assert_eq!(url.as_str(), "https://api.example.com/api/v1/playlist/42");
	}

	#[test]
	fn resolve_keeps_absolute_urls_and_encodes_query() {
		let url = OutboundRequest::post("http://localhost:8080/api/v1/problems/createProblem")
			.resolve(&base())
			.expect("Absolute URL should resolve.");

		assert_eq!(url.as_str(), "http://localhost:8080/api/v1/problems/createProblem");

		let url = OutboundRequest::get("/submission/getAllSubmissions")
			.with_query("userId", "u 1")
			.resolve(&base())
			.expect("Query parameters should resolve.");

		assert_eq!(
			url.as_str(),
			"https://api.example.com/api/v1/submission/getAllSubmissions?userId=u+1"
		);

		let url = OutboundRequest::get("/problems?page=2")
			.with_query("tag", "dp")
			.resolve(&base())
			.expect("Inline query should be preserved.");

		assert_eq!(url.as_str(), "https://api.example.com/api/v1/problems?page=2&tag=dp");
	}

	#[test]
	fn json_body_sets_content_headers() {
		let request = OutboundRequest::post("/playlist/create")
			.with_json(&serde_json::json!({ "name": "Graphs" }))
			.expect("JSON body should encode.");

		assert_eq!(request.body(), Some(br#"{"name":"Graphs"}"#.as_slice()));
		assert_eq!(
			request.headers().get(CONTENT_TYPE).map(|value| value.as_bytes()),
			Some(b"application/json".as_slice())
		);
		assert!(!request.is_retried());
	}

	#[test]
	fn invalid_headers_are_rejected() {
		let err = OutboundRequest::get("/")
			.with_header("x-bad header", "value")
			.expect_err("Header names with spaces must be rejected.");

		assert!(matches!(err, ConfigError::InvalidHeader { name } if name == "x-bad header"));
	}
}
