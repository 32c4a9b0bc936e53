//! Platform descriptor and credential validation.
//!
//! Both types are constructed once at startup and refuse to exist in an invalid
//! state: the base origin must be an absolute HTTPS URL with a host, and the
//! credential pair must be non-empty. Runtime code can therefore assume a
//! well-formed configuration and never re-validate it.

// self
use crate::{_prelude::*, error::ConfigError, secret::Secret};

const IDENTITY_PATH: &str = "/identity/oauth/token";

/// Validated description of one Marketo instance (the per-tenant REST origin).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformDescriptor {
	base: Url,
	identity: Url,
}
impl PlatformDescriptor {
	/// Parses and validates the instance base origin (e.g. `https://x.mktorest.com`).
	pub fn new(base: impl AsRef<str>) -> Result<Self, ConfigError> {
		let base =
			Url::parse(base.as_ref()).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if base.scheme() != "https" {
			return Err(ConfigError::InsecureBaseUrl { url: base.to_string() });
		}
		if base.host_str().is_none() {
			return Err(ConfigError::MissingHost { url: base.to_string() });
		}

		let identity = base
			.join(IDENTITY_PATH)
			.map_err(|_| ConfigError::InvalidEndpoint { endpoint: IDENTITY_PATH.into() })?;

		Ok(Self { base, identity })
	}

	/// Returns the validated base origin.
	pub fn base(&self) -> &Url {
		&self.base
	}

	/// Returns the identity endpoint used for client-credentials grants.
	pub fn identity_endpoint(&self) -> &Url {
		&self.identity
	}

	/// Joins a business endpoint path onto the base origin.
	///
	/// The endpoint must be an absolute path on the same origin; anything that
	/// would redirect the request elsewhere (scheme-relative paths and the like)
	/// is rejected.
	pub(crate) fn api_endpoint(&self, endpoint: &str) -> Result<Url, ConfigError> {
		if !endpoint.starts_with('/') || endpoint.starts_with("//") {
			return Err(ConfigError::InvalidEndpoint { endpoint: endpoint.into() });
		}

		let url = self
			.base
			.join(endpoint)
			.map_err(|_| ConfigError::InvalidEndpoint { endpoint: endpoint.into() })?;

		if url.host_str() != self.base.host_str() {
			return Err(ConfigError::InvalidEndpoint { endpoint: endpoint.into() });
		}

		Ok(url)
	}
}

/// Client-credentials pair for one integration identity.
///
/// Immutable for the process lifetime; the secret half is wrapped in [`Secret`]
/// so it never reaches a log line or `Debug` rendering.
#[derive(Clone, Debug)]
pub struct Credential {
	client_id: String,
	client_secret: Secret,
}
impl Credential {
	/// Validates and wraps the credential pair.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let client_id = client_id.into();
		let client_secret = client_secret.into();

		if client_id.trim().is_empty() {
			return Err(ConfigError::MissingClientId);
		}
		if client_secret.trim().is_empty() {
			return Err(ConfigError::MissingClientSecret);
		}

		Ok(Self { client_id, client_secret: Secret::new(client_secret) })
	}

	/// Returns the client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Returns the redacted client secret.
	pub fn client_secret(&self) -> &Secret {
		&self.client_secret
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn descriptor_requires_https() {
		assert!(matches!(
			PlatformDescriptor::new("http://x.mktorest.com"),
			Err(ConfigError::InsecureBaseUrl { .. }),
		));
		assert!(matches!(
			PlatformDescriptor::new("not a url"),
			Err(ConfigError::InvalidBaseUrl { .. }),
		));
		assert!(PlatformDescriptor::new("https://x.mktorest.com").is_ok());
	}

	#[test]
	fn descriptor_derives_the_identity_endpoint() {
		let platform = PlatformDescriptor::new("https://x.mktorest.com")
			.expect("Descriptor fixture should be valid.");

		assert_eq!(
			platform.identity_endpoint().as_str(),
			"https://x.mktorest.com/identity/oauth/token",
		);
	}

	#[test]
	fn api_endpoint_stays_on_origin() {
		let platform = PlatformDescriptor::new("https://x.mktorest.com")
			.expect("Descriptor fixture should be valid.");
		let url = platform
			.api_endpoint("/rest/v1/leads.json?batchSize=10")
			.expect("Relative endpoint should join onto the base origin.");

		assert_eq!(url.as_str(), "https://x.mktorest.com/rest/v1/leads.json?batchSize=10");
		assert!(platform.api_endpoint("rest/v1/leads.json").is_err());
		assert!(platform.api_endpoint("//attacker.example/steal").is_err());
	}

	#[test]
	fn credential_rejects_empty_fields() {
		assert!(matches!(Credential::new("", "secret"), Err(ConfigError::MissingClientId)));
		assert!(matches!(Credential::new("id", "  "), Err(ConfigError::MissingClientSecret)));

		let credential =
			Credential::new("id", "hunter2").expect("Credential fixture should be valid.");

		assert_eq!(credential.client_id(), "id");
		assert_eq!(credential.client_secret().expose(), "hunter2");
		assert!(!format!("{credential:?}").contains("hunter2"));
	}
}
