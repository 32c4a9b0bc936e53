// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::{Mock, prelude::*};
// self
use marketo_bridge::{_preludet::*, tools};

const CLIENT_ID: &str = "bridge-client";
const CLIENT_SECRET: &str = "bridge-secret";
const TIMEOUT: StdDuration = StdDuration::from_secs(5);

async fn mock_grant<'a>(server: &'a MockServer, token: &str, expires_in: i64) -> Mock<'a> {
	let body = json!({ "access_token": token, "expires_in": expires_in });

	server
		.mock_async(move |when, then| {
			when.method(POST)
				.path("/identity/oauth/token")
				.header("content-type", "application/x-www-form-urlencoded")
				.body(format!(
					"grant_type=client_credentials&client_id={CLIENT_ID}&client_secret={CLIENT_SECRET}"
				));
			then.status(200).header("content-type", "application/json").json_body(body);
		})
		.await
}

#[tokio::test]
async fn invoke_renders_the_payload_pretty_printed() {
	let server = MockServer::start_async().await;
	let _grant = mock_grant(&server, "T1", 3600).await;
	let payload = json!({
		"success": true,
		"result": [{ "id": 42, "email": "jane@example.com", "firstName": "Jane" }],
	});
	let body = payload.clone();
	let business = server
		.mock_async(move |when, then| {
			when.method(GET)
				.path("/rest/v1/lead/42.json")
				.query_param("fields", "email,firstName")
				.header("authorization", "Bearer T1");
			then.status(200).header("content-type", "application/json").json_body(body);
		})
		.await;
	let dispatcher = build_test_dispatcher(&server.base_url(), CLIENT_ID, CLIENT_SECRET, TIMEOUT);
	let reply = tools::invoke(
		&dispatcher,
		"get_lead_by_id",
		json!({ "leadId": 42, "fields": ["email", "firstName"] }),
	)
	.await;

	assert!(!reply.is_error);
	assert_eq!(
		reply.content,
		serde_json::to_string_pretty(&payload).expect("Payload fixture should pretty-print."),
	);

	business.assert_async().await;
}

#[tokio::test]
async fn envelope_failures_become_error_replies() {
	let server = MockServer::start_async().await;
	let _grant = mock_grant(&server, "T1", 3600).await;
	let business = server
		.mock_async(|when, then| {
			when.method(GET).path("/rest/v1/lead/7.json");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"success": false,
				"errors": [{ "code": "1013", "message": "Lead not found" }],
			}));
		})
		.await;
	let dispatcher = build_test_dispatcher(&server.base_url(), CLIENT_ID, CLIENT_SECRET, TIMEOUT);
	let reply = tools::invoke(&dispatcher, "get_lead_by_id", json!({ "leadId": 7 })).await;

	assert!(reply.is_error);
	assert_eq!(reply.content, "The platform reported an error: 1013: Lead not found.");

	business.assert_async().await;
}

#[tokio::test]
async fn invalid_arguments_never_reach_the_network() {
	let server = MockServer::start_async().await;
	let grant = mock_grant(&server, "T1", 3600).await;
	let dispatcher = build_test_dispatcher(&server.base_url(), CLIENT_ID, CLIENT_SECRET, TIMEOUT);
	let missing = tools::invoke(&dispatcher, "get_lead_by_id", json!({})).await;
	let unknown_field =
		tools::invoke(&dispatcher, "get_lead_by_id", json!({ "leadId": 1, "bogus": true })).await;

	assert!(missing.is_error);
	assert!(missing.content.starts_with("Invalid arguments:"));
	assert!(unknown_field.is_error);
	assert!(unknown_field.content.starts_with("Invalid arguments:"));

	grant.assert_calls_async(0).await;
}

#[tokio::test]
async fn unknown_tool_names_are_reported() {
	let server = MockServer::start_async().await;
	let grant = mock_grant(&server, "T1", 3600).await;
	let dispatcher = build_test_dispatcher(&server.base_url(), CLIENT_ID, CLIENT_SECRET, TIMEOUT);
	let reply = tools::invoke(&dispatcher, "does_not_exist", json!({})).await;

	assert!(reply.is_error);
	assert_eq!(reply.content, "Unknown tool: does_not_exist.");

	grant.assert_calls_async(0).await;
}

#[tokio::test]
async fn create_folder_submits_a_form_body() {
	let server = MockServer::start_async().await;
	let _grant = mock_grant(&server, "T1", 3600).await;
	let business = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/rest/asset/v1/folders.json")
				.header("content-type", "application/x-www-form-urlencoded")
				.body("name=Launch+Assets&parent=115&description=Q3+collateral");
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "success": true, "result": [{ "id": 981 }] }));
		})
		.await;
	let dispatcher = build_test_dispatcher(&server.base_url(), CLIENT_ID, CLIENT_SECRET, TIMEOUT);
	let reply = tools::invoke(
		&dispatcher,
		"create_folder",
		json!({ "name": "Launch Assets", "parentId": 115, "description": "Q3 collateral" }),
	)
	.await;

	assert!(!reply.is_error);

	business.assert_async().await;
}

#[tokio::test]
async fn sanitized_request_failures_render_generic_replies() {
	let server = MockServer::start_async().await;
	let _grant = mock_grant(&server, "T1", 3600).await;
	let business = server
		.mock_async(|when, then| {
			when.method(GET).path("/rest/v1/lead/9.json");
			then.status(403)
				.header("content-type", "application/json")
				.json_body(json!({ "secret_detail": "leak-canary" }));
		})
		.await;
	let dispatcher = build_test_dispatcher(&server.base_url(), CLIENT_ID, CLIENT_SECRET, TIMEOUT);
	let reply = tools::invoke(&dispatcher, "get_lead_by_id", json!({ "leadId": 9 })).await;

	assert!(reply.is_error);
	assert_eq!(reply.content, "Access to the requested resource was denied.");
	assert!(!reply.content.contains("leak-canary"));

	business.assert_async().await;
}
