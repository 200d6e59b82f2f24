//! Demonstrates the engine's lazy token fetch, a signed `StateSystem` query, and a shift command
//! against a local mock of the register service, using a file-backed token cache.

// std
use std::{env, sync::Arc, time::Duration};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use fiscal_open_api::{
	auth::Credentials,
	engine::RequestEngine,
	http::ReqwestTransport,
	store::{FileStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/open-api/v1/Token").header_exists("sign");
			then.status(200).header("content-type", "application/json").body(r#"{"token":"demo"}"#);
		})
		.await;
	let state_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/open-api/v1/StateSystem").query_param("token", "demo");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"status":"ready","shift":"closed"}"#);
		})
		.await;
	let shift_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/open-api/v1/Command");
			then.status(200).header("content-type", "application/json").body(r#"{"command_id":"42"}"#);
		})
		.await;
	let credentials = Credentials::builder()
		.account(server.url("/open-api/v1"))
		.app_id("demo-app")
		.secret("demo-secret")
		.build()?;
	let store = FileStore::open(env::temp_dir().join("fiscal_open_api_demo"))?;
	let engine = RequestEngine::builder(credentials)
		.transport(ReqwestTransport::builder().timeout(Duration::from_secs(5)).build()?)
		.store(Arc::new(store.clone()))
		.build()?;

	// Start from a cold cache so the token fetch is visible.
	store.delete(engine.cache_key()).await?;
	engine.ensure_token().await?;

	let state = engine.state_system().await?;
	let shift = engine.open_shift(Some("Demo cashier")).await?;

	println!("Register state: {state}.");
	println!("Shift command accepted: {shift}.");

	token_mock.assert_async().await;
	state_mock.assert_async().await;
	shift_mock.assert_async().await;

	Ok(())
}
