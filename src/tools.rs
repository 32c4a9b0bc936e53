//! Schema-validated operation surface mapped 1:1 onto platform endpoints.
//!
//! Each tool is a named operation with a typed, unknown-field-rejecting input
//! and a JSON schema published through [`catalog`]. [`invoke`] decodes the
//! arguments, runs the operation through the dispatcher, and renders a
//! [`ToolReply`]: the pretty-printed upstream payload on success, or a
//! single-line error string. Business-level failures that the platform reports
//! inside HTTP 200 envelopes (`"success": false`) are surfaced here, not in the
//! dispatcher.

pub mod assets;
pub mod campaigns;
pub mod leads;
pub mod lists;

// crates.io
use serde::de::DeserializeOwned;
use url::form_urlencoded;
// self
use crate::{_prelude::*, dispatch::RequestDispatcher};

/// Catalog entry describing one callable tool.
#[derive(Clone, Debug)]
pub struct ToolSpec {
	/// Unique tool name.
	pub name: &'static str,
	/// Human-readable description shown to the calling agent.
	pub description: &'static str,
	/// JSON schema for the tool's input object.
	pub input_schema: Value,
}

/// Uniform tool output: a text block plus an error flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolReply {
	/// Pretty-printed payload or a single-line error description.
	pub content: String,
	/// `true` when `content` describes a failure.
	pub is_error: bool,
}
impl ToolReply {
	fn success(payload: &Value) -> Self {
		let content =
			serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());

		Self { content, is_error: false }
	}

	fn failure(message: impl Display) -> Self {
		Self { content: message.to_string(), is_error: true }
	}
}

/// Failures raised at the tool boundary.
#[derive(Debug, ThisError)]
pub(crate) enum ToolError {
	/// Arguments did not match the tool's schema.
	#[error("Invalid arguments: {detail}.")]
	Arguments {
		/// Decode failure with the offending path.
		detail: String,
	},
	/// No tool is registered under the requested name.
	#[error("Unknown tool: {name}.")]
	UnknownTool {
		/// Requested tool name.
		name: String,
	},
	/// The request pipeline failed; already sanitized.
	#[error(transparent)]
	Request(#[from] Error),
	/// The platform's envelope reported a business-level error.
	#[error("The platform reported an error: {detail}.")]
	Platform {
		/// Error codes and messages from the envelope's `errors` array.
		detail: String,
	},
}

/// Lists every tool this crate exposes.
pub fn catalog() -> Vec<ToolSpec> {
	let mut specs = leads::specs();

	specs.extend(lists::specs());
	specs.extend(campaigns::specs());
	specs.extend(assets::specs());

	specs
}

/// Invokes a tool by name with JSON arguments and renders its reply.
pub async fn invoke(dispatcher: &RequestDispatcher, name: &str, arguments: Value) -> ToolReply {
	match run(dispatcher, name, arguments).await {
		Ok(payload) => ToolReply::success(&payload),
		Err(e) => ToolReply::failure(e),
	}
}

async fn run(
	dispatcher: &RequestDispatcher,
	name: &str,
	arguments: Value,
) -> Result<Value, ToolError> {
	match name {
		leads::GET_LEAD_BY_ID => leads::get_lead_by_id(dispatcher, decode(arguments)?).await,
		leads::QUERY_LEADS => leads::query_leads(dispatcher, decode(arguments)?).await,
		leads::UPSERT_LEADS => leads::upsert_leads(dispatcher, decode(arguments)?).await,
		lists::GET_LISTS => lists::get_lists(dispatcher, decode(arguments)?).await,
		lists::GET_LIST_LEADS => lists::get_list_leads(dispatcher, decode(arguments)?).await,
		lists::ADD_LEADS_TO_LIST => lists::add_leads_to_list(dispatcher, decode(arguments)?).await,
		lists::REMOVE_LEADS_FROM_LIST =>
			lists::remove_leads_from_list(dispatcher, decode(arguments)?).await,
		campaigns::GET_CAMPAIGNS => campaigns::get_campaigns(dispatcher, decode(arguments)?).await,
		campaigns::REQUEST_CAMPAIGN =>
			campaigns::request_campaign(dispatcher, decode(arguments)?).await,
		campaigns::SCHEDULE_CAMPAIGN =>
			campaigns::schedule_campaign(dispatcher, decode(arguments)?).await,
		assets::GET_EMAILS => assets::get_emails(dispatcher, decode(arguments)?).await,
		assets::GET_PROGRAMS => assets::get_programs(dispatcher, decode(arguments)?).await,
		assets::CREATE_FOLDER => assets::create_folder(dispatcher, decode(arguments)?).await,
		_ => Err(ToolError::UnknownTool { name: name.to_owned() }),
	}
}

fn decode<T>(arguments: Value) -> Result<T, ToolError>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(arguments)
		.map_err(|e| ToolError::Arguments { detail: format!("{} at {}", e.inner(), e.path()) })
}

/// Surfaces `{"success": false, "errors": [...]}` envelopes as tool errors and
/// passes every other payload through unmodified.
pub(crate) fn inspect_envelope(payload: Value) -> Result<Value, ToolError> {
	if payload.get("success").and_then(Value::as_bool) == Some(false) {
		let detail = payload
			.get("errors")
			.and_then(Value::as_array)
			.map(|errors| {
				errors
					.iter()
					.map(|error| {
						let code = error
							.get("code")
							.map(|code| code.to_string())
							.unwrap_or_else(|| "?".into());
						let message =
							error.get("message").and_then(Value::as_str).unwrap_or("no message");

						format!("{}: {message}", code.trim_matches('"'))
					})
					.collect::<Vec<_>>()
					.join("; ")
			})
			.filter(|detail| !detail.is_empty())
			.unwrap_or_else(|| "no error detail supplied".into());

		return Err(ToolError::Platform { detail });
	}

	Ok(payload)
}

/// Appends percent-encoded query pairs to an endpoint path.
pub(crate) fn endpoint_with_query(path: &str, pairs: &[(&str, String)]) -> String {
	if pairs.is_empty() {
		return path.to_owned();
	}

	let mut query = form_urlencoded::Serializer::new(String::new());

	for (key, value) in pairs {
		query.append_pair(key, value);
	}

	format!("{path}?{}", query.finish())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashSet;
	// self
	use super::*;

	#[test]
	fn catalog_names_are_unique() {
		let specs = catalog();
		let names = specs.iter().map(|spec| spec.name).collect::<HashSet<_>>();

		assert_eq!(names.len(), specs.len());
		assert!(names.contains("get_lead_by_id"));
		assert!(names.contains("create_folder"));
	}

	#[test]
	fn envelope_failures_surface_codes_and_messages() {
		let payload = json!({
			"success": false,
			"errors": [
				{ "code": "1013", "message": "Lead not found" },
				{ "code": 612, "message": "Invalid content type" },
			],
		});
		let e = inspect_envelope(payload).expect_err("Failed envelopes should surface errors.");

		assert_eq!(
			e.to_string(),
			"The platform reported an error: 1013: Lead not found; 612: Invalid content type.",
		);
	}

	#[test]
	fn envelope_success_passes_through() {
		let payload = json!({ "success": true, "result": [{ "id": 1 }] });

		assert_eq!(
			inspect_envelope(payload.clone()).expect("Successful envelopes should pass through."),
			payload,
		);

		// Payloads without an envelope at all are forwarded untouched.
		let bare = json!([1, 2, 3]);

		assert_eq!(
			inspect_envelope(bare.clone()).expect("Bare payloads should pass through."),
			bare,
		);
	}

	#[test]
	fn query_pairs_are_percent_encoded() {
		let endpoint = endpoint_with_query("/rest/v1/leads.json", &[
			("filterType", "email".into()),
			("filterValues", "a@x.io,b y@x.io".into()),
		]);

		assert_eq!(
			endpoint,
			"/rest/v1/leads.json?filterType=email&filterValues=a%40x.io%2Cb+y%40x.io",
		);
	}

	#[test]
	fn decoding_rejects_unknown_fields() {
		let e = decode::<leads::GetLeadById>(json!({ "leadId": 1, "bogus": true }))
			.expect_err("Unknown fields should be rejected.");

		assert!(matches!(e, ToolError::Arguments { .. }));
	}
}
