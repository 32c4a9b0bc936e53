//! Smart-campaign operations (`/rest/v1/campaigns*`).

// crates.io
use serde::Serialize;
// self
use crate::{
	_prelude::*,
	dispatch::{Payload, RequestDispatcher},
	tools::{ToolError, ToolSpec, endpoint_with_query, inspect_envelope},
};

/// Tool name for [`get_campaigns`].
pub const GET_CAMPAIGNS: &str = "get_campaigns";
/// Tool name for [`request_campaign`].
pub const REQUEST_CAMPAIGN: &str = "request_campaign";
/// Tool name for [`schedule_campaign`].
pub const SCHEDULE_CAMPAIGN: &str = "schedule_campaign";

/// My-token override passed along with a campaign trigger or schedule.
#[derive(Debug, Deserialize, Serialize)]
pub struct CampaignToken {
	/// Token name, including the `{{my.…}}` wrapper.
	pub name: String,
	/// Replacement value.
	pub value: String,
}

/// Arguments for [`get_campaigns`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct GetCampaigns {
	/// Restrict to these campaign identifiers.
	#[serde(default)]
	pub id: Option<Vec<i64>>,
	/// Restrict to these campaign names.
	#[serde(default)]
	pub name: Option<Vec<String>>,
	/// Page size.
	#[serde(default)]
	pub batch_size: Option<u16>,
	/// Paging token from a previous response.
	#[serde(default)]
	pub next_page_token: Option<String>,
}

/// Arguments for [`request_campaign`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RequestCampaign {
	/// Smart campaign identifier.
	pub campaign_id: i64,
	/// Leads to run through the campaign.
	pub lead_ids: Vec<i64>,
	/// Optional my-token overrides.
	#[serde(default)]
	pub tokens: Option<Vec<CampaignToken>>,
}

/// Arguments for [`schedule_campaign`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ScheduleCampaign {
	/// Smart campaign identifier.
	pub campaign_id: i64,
	/// ISO-8601 instant to run at; the platform defaults to five minutes out.
	#[serde(default)]
	pub run_at: Option<String>,
	/// Optional my-token overrides.
	#[serde(default)]
	pub tokens: Option<Vec<CampaignToken>>,
}

/// Fetches smart campaigns, optionally filtered by id or name.
pub(crate) async fn get_campaigns(
	dispatcher: &RequestDispatcher,
	input: GetCampaigns,
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

	let endpoint = endpoint_with_query("/rest/v1/campaigns.json", &pairs);

	inspect_envelope(dispatcher.request(Method::GET, &endpoint, None).await?)
}

/// Triggers a smart campaign for the given leads.
pub(crate) async fn request_campaign(
	dispatcher: &RequestDispatcher,
	input: RequestCampaign,
) -> Result<Value, ToolError> {
	let mut body = serde_json::Map::new();

	body.insert(
		"leads".into(),
		Value::Array(input.lead_ids.iter().map(|id| json!({ "id": id })).collect()),
	);

	if let Some(tokens) = &input.tokens {
		body.insert("tokens".into(), token_rows(tokens)?);
	}

	let endpoint = format!("/rest/v1/campaigns/{}/trigger.json", input.campaign_id);

	inspect_envelope(
		dispatcher
			.request(Method::POST, &endpoint, Some(Payload::Json(json!({ "input": body }))))
			.await?,
	)
}

/// Schedules a batch campaign run.
pub(crate) async fn schedule_campaign(
	dispatcher: &RequestDispatcher,
	input: ScheduleCampaign,
) -> Result<Value, ToolError> {
	let mut body = serde_json::Map::new();

	if let Some(run_at) = &input.run_at {
		body.insert("runAt".into(), json!(run_at));
	}
	if let Some(tokens) = &input.tokens {
		body.insert("tokens".into(), token_rows(tokens)?);
	}

	let endpoint = format!("/rest/v1/campaigns/{}/schedule.json", input.campaign_id);

	inspect_envelope(
		dispatcher
			.request(Method::POST, &endpoint, Some(Payload::Json(json!({ "input": body }))))
			.await?,
	)
}

fn token_rows(tokens: &[CampaignToken]) -> Result<Value, ToolError> {
	serde_json::to_value(tokens)
		.map_err(|e| ToolError::Arguments { detail: e.to_string() })
}

pub(crate) fn specs() -> Vec<ToolSpec> {
	let tokens_schema = json!({
		"type": "array",
		"items": {
			"type": "object",
			"properties": {
				"name": { "type": "string", "description": "Token name, e.g. {{my.Promo}}." },
				"value": { "type": "string" },
			},
			"required": ["name", "value"],
		},
		"description": "Optional my-token overrides.",
	});

	vec![
		ToolSpec {
			name: GET_CAMPAIGNS,
			description: "Fetch smart campaigns, optionally filtered by id or name.",
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
			name: REQUEST_CAMPAIGN,
			description: "Trigger a smart campaign for the given leads.",
			input_schema: json!({
				"type": "object",
				"properties": {
					"campaignId": { "type": "integer" },
					"leadIds": { "type": "array", "items": { "type": "integer" } },
					"tokens": tokens_schema.clone(),
				},
				"required": ["campaignId", "leadIds"],
				"additionalProperties": false,
			}),
		},
		ToolSpec {
			name: SCHEDULE_CAMPAIGN,
			description: "Schedule a batch campaign run.",
			input_schema: json!({
				"type": "object",
				"properties": {
					"campaignId": { "type": "integer" },
					"runAt": { "type": "string", "description": "ISO-8601 instant." },
					"tokens": tokens_schema,
				},
				"required": ["campaignId"],
				"additionalProperties": false,
			}),
		},
	]
}
