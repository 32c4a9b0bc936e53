//! Client-credentials token lifecycle with caching and single-flight refresh.
//!
//! [`TokenManager`] owns the only mutable shared state in the crate: the cached
//! [`AccessToken`] and the pending-refresh slot. A cached token is reused
//! without network access while it stays outside the freshness margin; once it
//! enters the margin (or no token exists), exactly one grant request is issued
//! no matter how many callers overlap. All concurrent callers await the same
//! shared handle and observe the same outcome, success or failure. A failed
//! refresh clears the slot so the next caller can retry, and leaves any cached
//! token untouched so a stale-but-unexpired token can still serve requests.

// crates.io
use futures::{
	FutureExt,
	future::{BoxFuture, Shared},
};
// self
use crate::{
	_prelude::*,
	dispatch,
	error::ConfigError,
	platform::{Credential, PlatformDescriptor},
	secret::Secret,
};

/// Safety margin subtracted from `expires_at` when judging freshness.
///
/// Absorbs clock skew and in-flight request latency; a token inside the margin
/// is treated as absent rather than raced against its exact expiry instant.
pub const FRESHNESS_MARGIN: Duration = Duration::seconds(60);

/// Bearer token value object; replaced wholesale on refresh, never mutated.
#[derive(Clone)]
pub struct AccessToken {
	/// Redacted bearer secret.
	pub secret: Secret,
	/// Expiry instant computed from the grant's `expires_in`.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Returns `true` while the token is outside the freshness margin.
	pub fn is_fresh_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at - FRESHNESS_MARGIN
	}

	/// Returns `true` while the token has not reached its actual expiry instant.
	pub fn is_live_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessToken")
			.field("secret", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Cloneable refresh failure broadcast to every waiter of a shared refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RefreshError {
	/// Identity endpoint rejected the grant (4xx); retrying will not help.
	Rejected,
	/// Identity endpoint reported a server-side failure (5xx).
	Unavailable,
	/// Identity endpoint could not be reached.
	Unreachable,
	/// Grant request exceeded the request timeout.
	Timeout,
	/// Grant response body could not be interpreted.
	Malformed,
}
impl From<RefreshError> for Error {
	fn from(e: RefreshError) -> Self {
		match e {
			RefreshError::Rejected => Self::AuthFailed,
			RefreshError::Unavailable => Self::UpstreamUnavailable,
			RefreshError::Unreachable => Self::NetworkUnreachable,
			RefreshError::Timeout => Self::Timeout,
			RefreshError::Malformed => Self::Unknown { status: None },
		}
	}
}

type RefreshOutcome = Result<AccessToken, RefreshError>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

#[derive(Default)]
struct TokenState {
	cached: RwLock<Option<AccessToken>>,
	pending: Mutex<Option<SharedRefresh>>,
}

/// Shape of the identity endpoint's grant response.
#[derive(Deserialize)]
struct TokenGrant {
	access_token: String,
	expires_in: i64,
}

/// Owns the lifecycle of a single bearer credential for one client identity.
#[derive(Clone)]
pub struct TokenManager {
	http: ReqwestClient,
	platform: PlatformDescriptor,
	credential: Credential,
	state: Arc<TokenState>,
}
impl TokenManager {
	/// Creates a manager with its own HTTP client bound to the fixed request timeout.
	pub fn new(platform: PlatformDescriptor, credential: Credential) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(platform, credential, dispatch::default_http_client()?))
	}

	/// Creates a manager that reuses a caller-provided HTTP client.
	pub fn with_http_client(
		platform: PlatformDescriptor,
		credential: Credential,
		http: ReqwestClient,
	) -> Self {
		Self { http, platform, credential, state: Default::default() }
	}

	/// Produces a currently-valid bearer token, refreshing over the network only
	/// when the cached token is absent or inside the freshness margin.
	pub async fn bearer_token(&self) -> Result<Secret> {
		let refresh = {
			let now = OffsetDateTime::now_utc();

			if let Some(secret) = self.fresh_secret_at(now) {
				return Ok(secret);
			}

			let mut pending = self.state.pending.lock();

			// A refresh may have settled between the cache check and taking the
			// slot; re-check before starting a new one.
			if let Some(secret) = self.fresh_secret_at(now) {
				return Ok(secret);
			}

			match pending.as_ref() {
				Some(shared) => shared.clone(),
				None => {
					let shared = self.start_refresh();

					*pending = Some(shared.clone());

					shared
				},
			}
		};

		match refresh.await {
			Ok(token) => Ok(token.secret),
			Err(e) => {
				let now = OffsetDateTime::now_utc();

				if let Some(token) =
					self.state.cached.read().as_ref().filter(|token| token.is_live_at(now))
				{
					tracing::warn!(
						kind = Error::from(e).kind(),
						"token refresh failed; reusing the cached token until it expires",
					);

					return Ok(token.secret.clone());
				}

				Err(e.into())
			},
		}
	}

	fn fresh_secret_at(&self, instant: OffsetDateTime) -> Option<Secret> {
		self.state
			.cached
			.read()
			.as_ref()
			.filter(|token| token.is_fresh_at(instant))
			.map(|token| token.secret.clone())
	}

	/// Builds the shared refresh handle. The grant request runs once no matter
	/// how many callers poll the handle; it settles the cache and clears the
	/// pending slot before any waiter resumes.
	fn start_refresh(&self) -> SharedRefresh {
		let http = self.http.clone();
		let identity = self.platform.identity_endpoint().clone();
		let credential = self.credential.clone();
		let state = Arc::clone(&self.state);

		async move {
			tracing::debug!("refreshing the access token");

			let outcome = request_grant(http, identity, credential).await;
			let mut pending = state.pending.lock();

			if let Ok(token) = &outcome {
				*state.cached.write() = Some(token.clone());
			}

			*pending = None;

			outcome
		}
		.boxed()
		.shared()
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("platform", &self.platform)
			.field("client_id", &self.credential.client_id())
			.finish()
	}
}

/// Performs one client-credentials grant against the identity endpoint.
async fn request_grant(
	http: ReqwestClient,
	identity: Url,
	credential: Credential,
) -> RefreshOutcome {
	let response = http
		.post(identity)
		.form(&[
			("grant_type", "client_credentials"),
			("client_id", credential.client_id()),
			("client_secret", credential.client_secret().expose()),
		])
		.send()
		.await
		.map_err(classify_transport)?;
	let status = response.status();

	if !status.is_success() {
		tracing::debug!(status = status.as_u16(), "identity endpoint rejected the grant");

		return Err(if status.is_server_error() {
			RefreshError::Unavailable
		} else {
			RefreshError::Rejected
		});
	}

	let bytes = response.bytes().await.map_err(classify_transport)?;
	let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
	let grant: TokenGrant =
		serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
			tracing::debug!(path = %e.path(), "grant response could not be decoded");

			RefreshError::Malformed
		})?;

	if grant.expires_in <= 0 {
		return Err(RefreshError::Malformed);
	}

	Ok(AccessToken {
		secret: Secret::new(grant.access_token),
		expires_at: OffsetDateTime::now_utc() + Duration::seconds(grant.expires_in),
	})
}

fn classify_transport(e: ReqwestError) -> RefreshError {
	if e.is_timeout() {
		RefreshError::Timeout
	} else {
		RefreshError::Unreachable
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn token_expiring_at(expires_at: OffsetDateTime) -> AccessToken {
		AccessToken { secret: Secret::new("raw-bearer-value"), expires_at }
	}

	#[test]
	fn freshness_respects_the_margin() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let fresh = token_expiring_at(now + Duration::seconds(120));
		let inside_margin = token_expiring_at(now + Duration::seconds(30));
		let expired = token_expiring_at(now - Duration::seconds(1));

		assert!(fresh.is_fresh_at(now));
		assert!(!inside_margin.is_fresh_at(now));
		assert!(inside_margin.is_live_at(now));
		assert!(!expired.is_fresh_at(now));
		assert!(!expired.is_live_at(now));
	}

	#[test]
	fn margin_boundary_is_exclusive() {
		let now = macros::datetime!(2025-01-01 00:00 UTC);
		let at_margin = token_expiring_at(now + FRESHNESS_MARGIN);

		assert!(!at_margin.is_fresh_at(now));
		assert!(at_margin.is_fresh_at(now - Duration::seconds(1)));
	}

	#[test]
	fn refresh_errors_map_onto_the_taxonomy() {
		assert!(matches!(Error::from(RefreshError::Rejected), Error::AuthFailed));
		assert!(matches!(Error::from(RefreshError::Unavailable), Error::UpstreamUnavailable));
		assert!(matches!(Error::from(RefreshError::Unreachable), Error::NetworkUnreachable));
		assert!(matches!(Error::from(RefreshError::Timeout), Error::Timeout));
		assert!(matches!(Error::from(RefreshError::Malformed), Error::Unknown { status: None }));
	}

	#[test]
	fn access_token_debug_redacts_the_secret() {
		let token = token_expiring_at(macros::datetime!(2025-01-01 00:00 UTC));

		assert!(!format!("{token:?}").contains("raw-bearer-value"));
	}
}
