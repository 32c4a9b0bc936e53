//! Static-list operations (`/rest/v1/lists*`).

// self
use crate::{
	_prelude::*,
	dispatch::{Payload, RequestDispatcher},
	tools::{ToolError, ToolSpec, endpoint_with_query, inspect_envelope},
};

/// Tool name for [`get_lists`].
pub const GET_LISTS: &str = "get_lists";
/// Tool name for [`get_list_leads`].
pub const GET_LIST_LEADS: &str = "get_list_leads";
/// Tool name for [`add_leads_to_list`].
pub const ADD_LEADS_TO_LIST: &str = "add_leads_to_list";
/// Tool name for [`remove_leads_from_list`].
pub const REMOVE_LEADS_FROM_LIST: &str = "remove_leads_from_list";

/// Arguments for [`get_lists`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GetLists {
	/// Restrict to these list identifiers.
	#[serde(default)]
	pub id: Option<Vec<i64>>,
	/// Restrict to these list names.
	#[serde(default)]
	pub name: Option<Vec<String>>,
	/// Page size.
	#[serde(default)]
	pub batch_size: Option<u16>,
	/// Paging token from a previous response.
	#[serde(default)]
	pub next_page_token: Option<String>,
}

/// Arguments for [`get_list_leads`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GetListLeads {
	/// Static list identifier.
	pub list_id: i64,
	/// Optional field projection.
	#[serde(default)]
	pub fields: Option<Vec<String>>,
	/// Page size.
	#[serde(default)]
	pub batch_size: Option<u16>,
	/// Paging token from a previous response.
	#[serde(default)]
	pub next_page_token: Option<String>,
}

/// Arguments for [`add_leads_to_list`] and [`remove_leads_from_list`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ListMembership {
	/// Static list identifier.
	pub list_id: i64,
	/// Lead identifiers to add or remove.
	pub lead_ids: Vec<i64>,
}

/// Fetches static lists, optionally filtered by id or name.
pub(crate) async fn get_lists(
	dispatcher: &RequestDispatcher,
	input: GetLists,
) -> Result<Value, ToolError> {
	let mut pairs = Vec::new();

	if let Some(id) = &input.id {
		pairs.push(("id", id.iter().map(i64::to_string).collect::<Vec<_>>().join(",")));
	}
	if let Some(name) = &input.name {
		pairs.push(("name", name.join(",")));
	}
	if let Some(batch_size) = input.batch_size {
		pairs.push(("batchSize", batch_size.to_string()));
	}
	if let Some(token) = &input.next_page_token {
		pairs.push(("nextPageToken", token.clone()));
	}

	let endpoint = endpoint_with_query("/rest/v1/lists.json", &pairs);

	inspect_envelope(dispatcher.request(Method::GET, &endpoint, None).await?)
}

/// Fetches the leads belonging to a static list.
pub(crate) async fn get_list_leads(
	dispatcher: &RequestDispatcher,
	input: GetListLeads,
) -> Result<Value, ToolError> {
	let mut pairs = Vec::new();

	if let Some(fields) = &input.fields {
		pairs.push(("fields", fields.join(",")));
	}
	if let Some(batch_size) = input.batch_size {
		pairs.push(("batchSize", batch_size.to_string()));
	}
	if let Some(token) = &input.next_page_token {
		pairs.push(("nextPageToken", token.clone()));
	}

	let endpoint =
		endpoint_with_query(&format!("/rest/v1/lists/{}/leads.json", input.list_id), &pairs);

	inspect_envelope(dispatcher.request(Method::GET, &endpoint, None).await?)
}

/// Adds leads to a static list.
pub(crate) async fn add_leads_to_list(
	dispatcher: &RequestDispatcher,
	input: ListMembership,
) -> Result<Value, ToolError> {
	let endpoint = format!("/rest/v1/lists/{}/leads.json", input.list_id);

	inspect_envelope(
		dispatcher
			.request(Method::POST, &endpoint, Some(Payload::Json(lead_id_rows(&input.lead_ids))))
			.await?,
	)
}

/// Removes leads from a static list.
pub(crate) async fn remove_leads_from_list(
	dispatcher: &RequestDispatcher,
	input: ListMembership,
) -> Result<Value, ToolError> {
	let endpoint = format!("/rest/v1/lists/{}/leads.json", input.list_id);

	inspect_envelope(
		dispatcher
			.request(Method::DELETE, &endpoint, Some(Payload::Json(lead_id_rows(&input.lead_ids))))
			.await?,
	)
}

fn lead_id_rows(lead_ids: &[i64]) -> Value {
	json!({ "input": lead_ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>() })
}

pub(crate) fn specs() -> Vec<ToolSpec> {
	let membership_schema = json!({
		"type": "object",
		"properties": {
			"listId": { "type": "integer", "description": "Static list identifier." },
			"leadIds": {
				"type": "array",
				"items": { "type": "integer" },
				"description": "Lead identifiers.",
			},
		},
		"required": ["listId", "leadIds"],
		"additionalProperties": false,
	});

	vec![
		ToolSpec {
			name: GET_LISTS,
			description: "Fetch static lists, optionally filtered by id or name.",
			input_schema: json!({
				"type": "object",
				"properties": {
					"id": { "type": "array", "items": { "type": "integer" } },
					"name": { "type": "array", "items": { "type": "string" } },
					"batchSize": { "type": "integer", "minimum": 1, "maximum": 300 },
					"nextPageToken": { "type": "string" },
				},
				"additionalProperties": false,
			}),
		},
		ToolSpec {
			name: GET_LIST_LEADS,
			description: "Fetch the leads belonging to a static list.",
			input_schema: json!({
				"type": "object",
				"properties": {
					"listId": { "type": "integer", "description": "Static list identifier." },
					"fields": { "type": "array", "items": { "type": "string" } },
					"batchSize": { "type": "integer", "minimum": 1, "maximum": 300 },
					"nextPageToken": { "type": "string" },
				},
				"required": ["listId"],
				"additionalProperties": false,
			}),
		},
		ToolSpec {
			name: ADD_LEADS_TO_LIST,
			description: "Add leads to a static list.",
			input_schema: membership_schema.clone(),
		},
		ToolSpec {
			name: REMOVE_LEADS_FROM_LIST,
			description: "Remove leads from a static list.",
			input_schema: membership_schema,
		},
	]
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn membership_rows_wrap_lead_ids() {
		assert_eq!(
			lead_id_rows(&[1, 2]),
			json!({ "input": [{ "id": 1 }, { "id": 2 }] }),
		);
	}
}
