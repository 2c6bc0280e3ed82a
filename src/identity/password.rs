//! Account password that stays out of logs.

// self
use crate::_prelude::*;

/// Password sent to the identity provider.
///
/// Formatting never reveals the value. Serialization writes it verbatim since it has to travel in
/// the login and registration bodies.
#[derive(Clone, Serialize)]
#[serde(transparent)]
pub struct Password(Box<str>);
impl Password {
	/// Wraps a plain-text password.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into().into_boxed_str())
	}

	/// Plain text. Never log it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Whether the password is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl From<&str> for Password {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for Password {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl Debug for Password {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(if self.is_empty() { "Password(<empty>)" } else { "Password(<hidden>)" })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_hides_the_value_but_json_carries_it() {
		let password = Password::from("hunter22");

		assert_eq!(format!("{password:?}"), "Password(<hidden>)");
		assert_eq!(format!("{:?}", Password::new("")), "Password(<empty>)");
		assert_eq!(
			serde_json::to_string(&password).expect("Password should serialize."),
			"\"hunter22\""
		);
		assert_eq!(password.expose(), "hunter22");
	}
}
