// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use fiscal_open_api::{
	auth::{CommandId, Credentials},
	engine::RequestEngine,
	error::Error,
	http::ReqwestTransport,
	obs::NoopLogger,
	store::{MemoryStore, TokenStore},
};

const APP_ID: &str = "app-it";
const SECRET: &str = "secret-it";

fn build_engine(server: &MockServer, store: MemoryStore) -> RequestEngine {
	let credentials = Credentials::builder()
		.account(server.url("/open-api/v1"))
		.app_id(APP_ID)
		.secret(SECRET)
		.build()
		.expect("Loopback credentials should be valid.");

	RequestEngine::builder(credentials)
		.transport(ReqwestTransport::default())
		.store(std::sync::Arc::new(store))
		.logger(NoopLogger)
		.build()
		.expect("Engine should build.")
}

#[tokio::test]
async fn cold_cache_fetches_token_before_state_system() {
	let server = MockServer::start_async().await;
	let store = MemoryStore::default();
	let engine = build_engine(&server, store.clone());
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/open-api/v1/Token")
				.query_param("app_id", APP_ID)
				.query_param_exists("nonce")
				.header_exists("sign");
			then.status(200).header("content-type", "application/json").body(r#"{"token":"tok-1"}"#);
		})
		.await;
	let state_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/open-api/v1/StateSystem")
				.query_param("token", "tok-1")
				.query_param("app_id", APP_ID)
				.header_exists("sign");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"kkt":"ready","shift":"open"}"#);
		})
		.await;
	let state = engine.state_system().await.expect("State request should succeed.");

	assert_eq!(state, json!({ "kkt": "ready", "shift": "open" }));

	token_mock.assert_calls_async(1).await;
	state_mock.assert_calls_async(1).await;

	assert_eq!(
		store.get(engine.cache_key()).await.expect("Token should be cached after the fetch."),
		"tok-1"
	);
}

#[tokio::test]
async fn expired_token_is_refreshed_once() {
	let server = MockServer::start_async().await;
	let store = MemoryStore::default();
	let engine = build_engine(&server, store.clone());

	store.set(engine.cache_key(), "stale".into()).await.expect("Seeding the cache should succeed.");

	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/open-api/v1/Token");
			then.status(200).header("content-type", "application/json").body(r#"{"token":"fresh"}"#);
		})
		.await;
	let stale_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/open-api/v1/Command/c-42").query_param("token", "stale");
			then.status(401).body(r#"{"message":"token expired"}"#);
		})
		.await;
	let fresh_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/open-api/v1/Command/c-42").query_param("token", "fresh");
			then.status(200).header("content-type", "application/json").body(r#"{"status":"done"}"#);
		})
		.await;
	let id = CommandId::new("c-42").expect("Command identifier should be valid.");
	let status = engine.command_status(&id).await.expect("Status request should succeed.");

	assert_eq!(status["status"], "done");

	token_mock.assert_calls_async(1).await;
	stale_mock.assert_calls_async(1).await;
	fresh_mock.assert_calls_async(1).await;

	assert_eq!(store.get(engine.cache_key()).await.expect("Token should be cached."), "fresh");
	assert_eq!(engine.metrics.retries(), 1);
}

#[tokio::test]
async fn commands_post_json_and_surface_application_errors() {
	let server = MockServer::start_async().await;
	let store = MemoryStore::default();
	let engine = build_engine(&server, store.clone());

	store.set(engine.cache_key(), "cached".into()).await.expect("Seeding the cache should succeed.");

	let command_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/open-api/v1/Command")
				.header("content-type", "application/json")
				.header_exists("sign");
			then.status(422)
				.header("content-type", "application/json")
				.body(r#"{"message":"Смена не открыта"}"#);
		})
		.await;
	let body = engine
		.print_check(&json!({ "c_num": 1, "goods": [{ "name": "Чай", "price": 120 }] }))
		.await
		.expect("Application errors should be returned as values.");

	assert_eq!(body["message"], "Смена не открыта");

	command_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn server_failure_is_not_retried() {
	let server = MockServer::start_async().await;
	let store = MemoryStore::default();
	let engine = build_engine(&server, store.clone());

	store.set(engine.cache_key(), "cached".into()).await.expect("Seeding the cache should succeed.");

	let state_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/open-api/v1/StateSystem");
			then.status(500).body("internal error");
		})
		.await;
	let err = engine.state_system().await.expect_err("Server failures should surface.");

	assert!(matches!(err, Error::Server { status: 500, .. }));

	state_mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn rejected_token_request_fails_without_retry() {
	let server = MockServer::start_async().await;
	let engine = build_engine(&server, MemoryStore::default());
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/open-api/v1/Token");
			then.status(401).body(r#"{"message":"unknown app"}"#);
		})
		.await;
	let err = engine.ensure_token().await.expect_err("Token rejection should surface.");

	assert!(matches!(err, Error::Auth { status: Some(401), .. }));

	token_mock.assert_calls_async(1).await;
}
