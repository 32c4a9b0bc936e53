//! Sanitized error vocabulary shared by the token pipeline and the dispatcher.
//!
//! Every raw transport or HTTP failure is mapped onto exactly one [`Error`] kind
//! before it reaches a caller. The rendered messages are deliberately generic:
//! no upstream response body, header, or credential value ever crosses this
//! boundary. Construction-time misconfiguration lives in [`ConfigError`] and is
//! fatal rather than runtime-recoverable.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Bounded failure taxonomy surfaced by the request pipeline.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Fatal local misconfiguration; prevents construction, never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The identity endpoint rejected the credentials, or a business call returned 401.
	#[error("Authentication with the platform failed.")]
	AuthFailed,
	/// The platform denied access to the requested resource (403).
	#[error("Access to the requested resource was denied.")]
	Forbidden,
	/// The requested resource does not exist (404).
	#[error("The requested resource was not found.")]
	NotFound,
	/// The platform rate limit was hit (429).
	#[error("The platform rate limit was exceeded; retry later.")]
	RateLimited,
	/// The platform reported a server-side failure (5xx).
	#[error("The platform service is unavailable; retry later.")]
	UpstreamUnavailable,
	/// The platform could not be reached (connection refused, DNS failure).
	#[error("Cannot connect to the platform; check network and configuration.")]
	NetworkUnreachable,
	/// The call exceeded the fixed request timeout.
	#[error("The platform request timed out.")]
	Timeout,
	/// Fallback for anything else; carries the status code only, never a body.
	#[error(
		"The platform returned an unexpected response{}.",
		.status.map(|status| format!(" (status {status})")).unwrap_or_default()
	)]
	Unknown {
		/// HTTP status code, when one was observed.
		status: Option<u16>,
	},
}
impl Error {
	/// Maps a non-success HTTP status onto its taxonomy kind.
	pub fn from_status(status: u16) -> Self {
		match status {
			401 => Self::AuthFailed,
			403 => Self::Forbidden,
			404 => Self::NotFound,
			429 => Self::RateLimited,
			500..=599 => Self::UpstreamUnavailable,
			status => Self::Unknown { status: Some(status) },
		}
	}

	/// Stable machine-readable code used in diagnostic log lines.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Config(_) => "config",
			Self::AuthFailed => "auth_failed",
			Self::Forbidden => "forbidden",
			Self::NotFound => "not_found",
			Self::RateLimited => "rate_limited",
			Self::UpstreamUnavailable => "upstream_unavailable",
			Self::NetworkUnreachable => "network_unreachable",
			Self::Timeout => "timeout",
			Self::Unknown { .. } => "unknown",
		}
	}
}

/// Configuration and validation failures raised while assembling the pipeline.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Base URL could not be parsed at all.
	#[error("Base URL is not a valid absolute URL.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL must use the HTTPS scheme.
	#[error("Base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Base URL carries no host component.
	#[error("Base URL must include a host: {url}.")]
	MissingHost {
		/// Offending URL.
		url: String,
	},
	/// Client identifier was empty.
	#[error("Client identifier must not be empty.")]
	MissingClientId,
	/// Client secret was empty.
	#[error("Client secret must not be empty.")]
	MissingClientSecret,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint path could not be joined onto the base origin.
	#[error("Endpoint is not a valid path relative to the base origin: {endpoint}.")]
	InvalidEndpoint {
		/// Offending endpoint path.
		endpoint: String,
	},
}
impl ConfigError {
	/// Wraps a transport builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
