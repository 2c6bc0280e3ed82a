//! Identity provider operations routed through the gateway.
//!
//! Login and registration are refresh-exempt, so a rejected password surfaces as
//! [`Error::Unauthorized`] instead of starting a refresh cycle. The session check and logout go
//! through the regular expiry handling like any other call.

pub mod password;

pub use password::*;

// self
use crate::{
	_prelude::*,
	gateway::Gateway,
	http::{OutboundRequest, RequestChannel},
};

/// User identity reported by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	/// Stable user identifier.
	#[serde(alias = "_id")]
	pub id: String,
	/// Display name.
	pub name: String,
	/// Account email.
	pub email: String,
	/// Account role, when the API reports one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub role: Option<String>,
}

/// Password login payload.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: Password,
}
impl Credentials {
	/// Creates a login payload.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: Password::new(password) }
	}
}

/// Account registration payload.
#[derive(Clone, Debug, Serialize)]
pub struct Registration {
	/// Display name.
	pub name: String,
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: Password,
}
impl Registration {
	/// Creates a registration payload.
	pub fn new(
		name: impl Into<String>,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self { name: name.into(), email: email.into(), password: Password::new(password) }
	}
}

#[derive(Deserialize)]
struct IdentityEnvelope {
	user: Identity,
}

#[derive(Serialize)]
struct VerificationRequest<'a> {
	email: &'a str,
}

impl<C> Gateway<C>
where
	C: ?Sized + RequestChannel,
{
	/// Signs in with a password and records the returned identity in the session.
	pub async fn login(&self, credentials: &Credentials) -> Result<Identity> {
		let request =
			OutboundRequest::post(self.config().identity.login.clone()).with_json(credentials)?;
		let identity = self.execute(request).await?.json::<IdentityEnvelope>()?.user;

		self.session().sign_in(identity.clone());

		Ok(identity)
	}

	/// Registers a new account. The API sends a verification email; no session is opened.
	pub async fn register(&self, registration: &Registration) -> Result<()> {
		let request =
			OutboundRequest::post(self.config().identity.register.clone()).with_json(registration)?;

		self.execute(request).await?;

		Ok(())
	}

	/// Asks the API to resend the verification email for `email`.
	pub async fn resend_verification(&self, email: &str) -> Result<()> {
		let request = OutboundRequest::post(self.config().identity.resend_verification.clone())
			.with_json(&VerificationRequest { email })?;

		self.execute(request).await?;

		Ok(())
	}

	/// Looks up the current identity and refreshes the session view with it.
	pub async fn check_session(&self) -> Result<Identity> {
		let request = OutboundRequest::get(self.config().identity.check.clone());
		let identity = self.execute(request).await?.json::<IdentityEnvelope>()?.user;

		self.session().sign_in(identity.clone());

		Ok(identity)
	}

	/// Ends the session on the API and forgets the local identity.
	pub async fn logout(&self) -> Result<()> {
		let request = OutboundRequest::get(self.config().identity.logout.clone());

		self.execute(request).await?;
		self.session().sign_out();

		Ok(())
	}
}
