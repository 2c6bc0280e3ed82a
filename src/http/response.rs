//! Response captured by a request channel.

// crates.io
use http::HeaderMap;
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Fully buffered HTTP response.
#[derive(Clone, Debug)]
pub struct Response {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
	/// Instant the response was received.
	pub received_at: OffsetDateTime,
}
impl Response {
	/// Creates a response stamped with the current UTC instant and no headers.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self::with_headers(status, HeaderMap::new(), body)
	}

	/// Creates a response with explicit headers, stamped with the current UTC instant.
	pub fn with_headers(status: u16, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers, body: body.into(), received_at: OffsetDateTime::now_utc() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { source, status: self.status })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Envelope {
		user: User,
	}

	#[derive(Debug, Deserialize)]
	struct User {
		email: String,
	}

	#[test]
	fn json_decoding_reports_path() {
		let ok = Response::new(200, br#"{"user":{"email":"ada@example.com"}}"#.to_vec());
		let envelope: Envelope = ok.json().expect("Envelope fixture should decode.");

		assert_eq!(envelope.user.email, "ada@example.com");

		let bad = Response::new(200, br#"{"user":{"email":7}}"#.to_vec());
		let err = bad.json::<Envelope>().expect_err("Numeric email must be rejected.");

		match err {
			Error::Decode { source, status } => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "user.email");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn success_range_is_2xx() {
		assert!(Response::new(204, Vec::new()).is_success());
		assert!(!Response::new(301, Vec::new()).is_success());
		assert!(!Response::new(401, Vec::new()).is_success());
		assert_eq!(Response::new(500, b"oops".to_vec()).text(), "oops");
	}
}
