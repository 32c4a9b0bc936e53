//! Authenticated request dispatch against the platform's business endpoints.
//!
//! [`RequestDispatcher`] composes the [`TokenManager`] with an HTTP transport:
//! it obtains a bearer token (possibly triggering a refresh), attaches it as an
//! `Authorization` header, performs the call, and returns either the decoded
//! response payload unmodified or a sanitized [`Error`]. The platform's own
//! envelope (`success` flags, `result`/`errors` arrays) is not reinterpreted
//! here; inspecting it is the calling operation's responsibility. On failure
//! exactly one diagnostic line is emitted, carrying only the method, endpoint,
//! and error kind.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	platform::{Credential, PlatformDescriptor},
	token::TokenManager,
};

/// Fixed timeout applied to every outbound call, token and business alike.
pub const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Builds the crate's default HTTP client bound to [`REQUEST_TIMEOUT`].
pub(crate) fn default_http_client() -> Result<ReqwestClient, ConfigError> {
	ReqwestClient::builder().timeout(REQUEST_TIMEOUT).build().map_err(ConfigError::from)
}

/// Request body plus its wire encoding.
#[derive(Clone, Debug)]
pub enum Payload {
	/// JSON body, passed through as-is.
	Json(Value),
	/// Form-urlencoded body serialized as percent-encoded `key=value` pairs.
	Form(Vec<(String, String)>),
}

/// Performs authenticated HTTP calls and enforces the failure-sanitization contract.
#[derive(Clone)]
pub struct RequestDispatcher {
	http: ReqwestClient,
	platform: PlatformDescriptor,
	tokens: TokenManager,
}
impl RequestDispatcher {
	/// Creates a dispatcher with its own HTTP client bound to the fixed timeout.
	pub fn new(
		platform: PlatformDescriptor,
		credential: Credential,
	) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(platform, credential, default_http_client()?))
	}

	/// Creates a dispatcher that shares a caller-provided HTTP client with its
	/// token manager.
	pub fn with_http_client(
		platform: PlatformDescriptor,
		credential: Credential,
		http: ReqwestClient,
	) -> Self {
		let tokens = TokenManager::with_http_client(platform.clone(), credential, http.clone());

		Self { http, platform, tokens }
	}

	/// Returns the token manager owning this dispatcher's bearer credential.
	pub fn token_manager(&self) -> &TokenManager {
		&self.tokens
	}

	/// Performs one authenticated call against `base + endpoint`.
	///
	/// A 401 is surfaced as [`Error::AuthFailed`] without forcing a token
	/// refresh; the pipeline fails fast rather than retrying business calls.
	pub async fn request(
		&self,
		method: Method,
		endpoint: &str,
		payload: Option<Payload>,
	) -> Result<Value> {
		let outcome = self.dispatch(method.clone(), endpoint, payload).await;

		if let Err(e) = &outcome {
			tracing::warn!(method = %method, endpoint, kind = e.kind(), "platform request failed");
		}

		outcome
	}

	async fn dispatch(
		&self,
		method: Method,
		endpoint: &str,
		payload: Option<Payload>,
	) -> Result<Value> {
		let url = self.platform.api_endpoint(endpoint)?;
		let bearer = self.tokens.bearer_token().await?;
		let request = self.http.request(method, url).bearer_auth(bearer.expose());
		let request = match payload {
			Some(Payload::Json(body)) => request.json(&body),
			Some(Payload::Form(pairs)) => request.form(&pairs),
			None => request,
		};
		let response = request.send().await.map_err(|e| classify_transport(&e))?;
		let status = response.status();

		if !status.is_success() {
			// The response body is dropped unread; only the status participates
			// in the mapped error.
			return Err(Error::from_status(status.as_u16()));
		}

		let bytes = response.bytes().await.map_err(|e| classify_transport(&e))?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|_| Error::Unknown { status: Some(status.as_u16()) })
	}
}
impl Debug for RequestDispatcher {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestDispatcher").field("platform", &self.platform).finish()
	}
}

fn classify_transport(e: &ReqwestError) -> Error {
	if e.is_timeout() {
		Error::Timeout
	} else if e.is_connect() {
		Error::NetworkUnreachable
	} else {
		Error::Unknown { status: e.status().map(|status| status.as_u16()) }
	}
}
