//! Asset-database operations (`/rest/asset/v1/*`).
//!
//! Asset creation endpoints take form-urlencoded bodies per the platform's
//! contract, unlike the JSON bodies used by the lead database.

// self
use crate::{
	_prelude::*,
	dispatch::{Payload, RequestDispatcher},
	tools::{ToolError, ToolSpec, endpoint_with_query, inspect_envelope},
};

/// Tool name for [`get_emails`].
pub const GET_EMAILS: &str = "get_emails";
/// Tool name for [`get_programs`].
pub const GET_PROGRAMS: &str = "get_programs";
/// Tool name for [`create_folder`].
pub const CREATE_FOLDER: &str = "create_folder";

/// Arguments for [`get_emails`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GetEmails {
	/// Restrict to approved or draft emails.
	#[serde(default)]
	pub status: Option<String>,
	/// Restrict to a folder identifier.
	#[serde(default)]
	pub folder: Option<i64>,
	/// Paging offset.
	#[serde(default)]
	pub offset: Option<u32>,
	/// Page size; the platform caps this at 200.
	#[serde(default)]
	pub max_return: Option<u16>,
}

/// Arguments for [`get_programs`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GetPrograms {
	/// Paging offset.
	#[serde(default)]
	pub offset: Option<u32>,
	/// Page size; the platform caps this at 200.
	#[serde(default)]
	pub max_return: Option<u16>,
}

/// Arguments for [`create_folder`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateFolder {
	/// Folder name.
	pub name: String,
	/// Parent folder identifier.
	pub parent_id: i64,
	/// Optional description.
	#[serde(default)]
	pub description: Option<String>,
}

/// Fetches emails from the asset database.
pub(crate) async fn get_emails(
	dispatcher: &RequestDispatcher,
	input: GetEmails,
) -> Result<Value, ToolError> {
	let mut pairs = Vec::new();

	if let Some(status) = &input.status {
		pairs.push(("status", status.clone()));
	}
	if let Some(folder) = input.folder {
		pairs.push(("folder", folder.to_string()));
	}
	if let Some(offset) = input.offset {
		pairs.push(("offset", offset.to_string()));
	}
	if let Some(max_return) = input.max_return {
		pairs.push(("maxReturn", max_return.to_string()));
	}

	let endpoint = endpoint_with_query("/rest/asset/v1/emails.json", &pairs);

	inspect_envelope(dispatcher.request(Method::GET, &endpoint, None).await?)
}

/// Fetches programs from the asset database.
pub(crate) async fn get_programs(
	dispatcher: &RequestDispatcher,
	input: GetPrograms,
) -> Result<Value, ToolError> {
	let mut pairs = Vec::new();

	if let Some(offset) = input.offset {
		pairs.push(("offset", offset.to_string()));
	}
	if let Some(max_return) = input.max_return {
		pairs.push(("maxReturn", max_return.to_string()));
	}

	let endpoint = endpoint_with_query("/rest/asset/v1/programs.json", &pairs);

	inspect_envelope(dispatcher.request(Method::GET, &endpoint, None).await?)
}

/// Creates a folder in the asset database.
pub(crate) async fn create_folder(
	dispatcher: &RequestDispatcher,
	input: CreateFolder,
) -> Result<Value, ToolError> {
	let mut pairs = vec![
		("name".to_owned(), input.name),
		("parent".to_owned(), input.parent_id.to_string()),
	];

	if let Some(description) = input.description {
		pairs.push(("description".to_owned(), description));
	}

	inspect_envelope(
		dispatcher
			.request(Method::POST, "/rest/asset/v1/folders.json", Some(Payload::Form(pairs)))
			.await?,
	)
}

pub(crate) fn specs() -> Vec<ToolSpec> {
	vec![
		ToolSpec {
			name: GET_EMAILS,
			description: "Fetch emails from the asset database.",
			input_schema: json!({
				"type": "object",
				"properties": {
					"status": { "type": "string", "enum": ["approved", "draft"] },
					"folder": { "type": "integer", "description": "Folder identifier." },
					"offset": { "type": "integer", "minimum": 0 },
					"maxReturn": { "type": "integer", "minimum": 1, "maximum": 200 },
				},
				"additionalProperties": false,
			}),
		},
		ToolSpec {
			name: GET_PROGRAMS,
			description: "Fetch programs from the asset database.",
			input_schema: json!({
				"type": "object",
				"properties": {
					"offset": { "type": "integer", "minimum": 0 },
					"maxReturn": { "type": "integer", "minimum": 1, "maximum": 200 },
				},
				"additionalProperties": false,
			}),
		},
		ToolSpec {
			name: CREATE_FOLDER,
			description: "Create a folder in the asset database.",
			input_schema: json!({
				"type": "object",
				"properties": {
					"name": { "type": "string" },
					"parentId": { "type": "integer", "description": "Parent folder identifier." },
					"description": { "type": "string" },
				},
				"required": ["name", "parentId"],
				"additionalProperties": false,
			}),
		},
	]
}
