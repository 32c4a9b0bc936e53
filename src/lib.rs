//! Schema-validated agent tools over the Marketo REST API, built around a
//! single-flight client-credentials token pipeline.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod dispatch;
pub mod error;
pub mod platform;
pub mod secret;
pub mod token;
pub mod tools;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::time::Duration as StdDuration;
	// self
	use crate::{
		dispatch::RequestDispatcher,
		platform::{Credential, PlatformDescriptor},
	};

	/// Builds a reqwest HTTP client that accepts the self-signed certificates
	/// produced by `httpmock` during tests, bound to the provided timeout.
	pub fn test_http_client(timeout: StdDuration) -> ReqwestClient {
		ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.timeout(timeout)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.")
	}

	/// Constructs a [`RequestDispatcher`] pointed at a mock server origin.
	pub fn build_test_dispatcher(
		base: &str,
		client_id: &str,
		client_secret: &str,
		timeout: StdDuration,
	) -> RequestDispatcher {
		let platform =
			PlatformDescriptor::new(base).expect("Mock server origin should be a valid base URL.");
		let credential = Credential::new(client_id, client_secret)
			.expect("Test credential pair should be valid.");

		RequestDispatcher::with_http_client(platform, credential, test_http_client(timeout))
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, Method};
	pub use serde::Deserialize;
	pub use serde_json::{Value, json};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, marketo_bridge as _, tokio as _};
