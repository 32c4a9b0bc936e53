//! Lead-database operations (`/rest/v1/lead*`).

// self
use crate::{
	_prelude::*,
	dispatch::{Payload, RequestDispatcher},
	tools::{ToolError, ToolSpec, endpoint_with_query, inspect_envelope},
};

/// Tool name for [`get_lead_by_id`].
pub const GET_LEAD_BY_ID: &str = "get_lead_by_id";
/// Tool name for [`query_leads`].
pub const QUERY_LEADS: &str = "query_leads";
/// Tool name for [`upsert_leads`].
pub const UPSERT_LEADS: &str = "upsert_leads";

/// Arguments for [`get_lead_by_id`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GetLeadById {
	/// Lead identifier.
	pub lead_id: i64,
	/// Optional field projection.
	#[serde(default)]
	pub fields: Option<Vec<String>>,
}

/// Arguments for [`query_leads`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct QueryLeads {
	/// Field to filter on (e.g. `email`, `id`).
	pub filter_type: String,
	/// Values to match against the filter field.
	pub filter_values: Vec<String>,
	/// Optional field projection.
	#[serde(default)]
	pub fields: Option<Vec<String>>,
	/// Page size; the platform caps this at 300.
	#[serde(default)]
	pub batch_size: Option<u16>,
	/// Paging token from a previous response, forwarded as-is.
	#[serde(default)]
	pub next_page_token: Option<String>,
}

/// Upsert mode for [`upsert_leads`].
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpsertAction {
	/// Create new leads only; matching rows fail.
	CreateOnly,
	/// Update existing leads only; unmatched rows fail.
	UpdateOnly,
	/// Create or update depending on the lookup match.
	CreateOrUpdate,
}
impl UpsertAction {
	fn as_str(self) -> &'static str {
		match self {
			Self::CreateOnly => "createOnly",
			Self::UpdateOnly => "updateOnly",
			Self::CreateOrUpdate => "createOrUpdate",
		}
	}
}

/// Arguments for [`upsert_leads`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UpsertLeads {
	/// Upsert mode; the platform defaults to create-or-update.
	#[serde(default)]
	pub action: Option<UpsertAction>,
	/// Deduplication field used to match existing leads.
	#[serde(default)]
	pub lookup_field: Option<String>,
	/// Lead attribute rows to upsert.
	pub input: Vec<Value>,
}

/// Fetches a single lead by identifier.
pub(crate) async fn get_lead_by_id(
	dispatcher: &RequestDispatcher,
	input: GetLeadById,
) -> Result<Value, ToolError> {
	let mut pairs = Vec::new();

	if let Some(fields) = &input.fields {
		pairs.push(("fields", fields.join(",")));
	}

	let endpoint =
		endpoint_with_query(&format!("/rest/v1/lead/{}.json", input.lead_id), &pairs);

	inspect_envelope(dispatcher.request(Method::GET, &endpoint, None).await?)
}

/// Queries leads by filter field and values.
pub(crate) async fn query_leads(
	dispatcher: &RequestDispatcher,
	input: QueryLeads,
) -> Result<Value, ToolError> {
	let mut pairs = vec![
		("filterType", input.filter_type.clone()),
		("filterValues", input.filter_values.join(",")),
	];

	if let Some(fields) = &input.fields {
		pairs.push(("fields", fields.join(",")));
	}
	if let Some(batch_size) = input.batch_size {
		pairs.push(("batchSize", batch_size.to_string()));
	}
	if let Some(token) = &input.next_page_token {
		pairs.push(("nextPageToken", token.clone()));
	}

	let endpoint = endpoint_with_query("/rest/v1/leads.json", &pairs);

	inspect_envelope(dispatcher.request(Method::GET, &endpoint, None).await?)
}

/// Creates or updates leads in bulk.
pub(crate) async fn upsert_leads(
	dispatcher: &RequestDispatcher,
	input: UpsertLeads,
) -> Result<Value, ToolError> {
	let mut body = serde_json::Map::new();

	if let Some(action) = input.action {
		body.insert("action".into(), json!(action.as_str()));
	}
	if let Some(lookup_field) = input.lookup_field {
		body.insert("lookupField".into(), json!(lookup_field));
	}

	body.insert("input".into(), Value::Array(input.input));

	inspect_envelope(
		dispatcher
			.request(Method::POST, "/rest/v1/leads.json", Some(Payload::Json(Value::Object(body))))
			.await?,
	)
}

pub(crate) fn specs() -> Vec<ToolSpec> {
	vec![
		ToolSpec {
			name: GET_LEAD_BY_ID,
			description: "Fetch a single Marketo lead by its identifier.",
			input_schema: json!({
				"type": "object",
				"properties": {
					"leadId": { "type": "integer", "description": "Lead identifier." },
					"fields": {
						"type": "array",
						"items": { "type": "string" },
						"description": "Optional field projection.",
					},
				},
				"required": ["leadId"],
				"additionalProperties": false,
			}),
		},
		ToolSpec {
			name: QUERY_LEADS,
			description: "Query leads by a filter field and one or more values.",
			input_schema: json!({
				"type": "object",
				"properties": {
					"filterType": { "type": "string", "description": "Field to filter on." },
					"filterValues": {
						"type": "array",
						"items": { "type": "string" },
						"description": "Values to match.",
					},
					"fields": { "type": "array", "items": { "type": "string" } },
					"batchSize": { "type": "integer", "minimum": 1, "maximum": 300 },
					"nextPageToken": { "type": "string" },
				},
				"required": ["filterType", "filterValues"],
				"additionalProperties": false,
			}),
		},
		ToolSpec {
			name: UPSERT_LEADS,
			description: "Create or update leads in bulk.",
			input_schema: json!({
				"type": "object",
				"properties": {
					"action": {
						"type": "string",
						"enum": ["createOnly", "updateOnly", "createOrUpdate"],
					},
					"lookupField": { "type": "string" },
					"input": {
						"type": "array",
						"items": { "type": "object" },
						"description": "Lead attribute rows.",
					},
				},
				"required": ["input"],
				"additionalProperties": false,
			}),
		},
	]
}
