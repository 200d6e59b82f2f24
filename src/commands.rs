//! Register operations layered over [`RequestEngine::request`].
//!
//! These helpers only assemble parameters; signing, token handling, and status classification
//! stay in the engine.

pub mod filter;
pub mod payload;

pub use filter::*;
pub use payload::*;

// self
use crate::{
	_prelude::*,
	auth::CommandId,
	engine::{RequestEngine, Resource},
	http::Method,
	params::RequestParams,
};

impl RequestEngine {
	/// Returns register and connectivity status (`GET StateSystem`).
	pub async fn state_system(&self) -> Result<Value> {
		self.request(Method::Get, Resource::StateSystem, RequestParams::new()).await
	}

	/// Opens a shift; `author` defaults to [`DEFAULT_AUTHOR`].
	pub async fn open_shift(&self, author: Option<&str>) -> Result<Value> {
		self.submit(CommandType::OpenShift, &ShiftCommand::new(author)).await
	}

	/// Closes the current shift; `author` defaults to [`DEFAULT_AUTHOR`].
	pub async fn close_shift(&self, author: Option<&str>) -> Result<Value> {
		self.submit(CommandType::CloseShift, &ShiftCommand::new(author)).await
	}

	/// Prints a sale receipt described by `command`.
	///
	/// The response normally carries the `command_id` to poll with [`Self::command_status`].
	pub async fn print_check<T>(&self, command: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		self.submit(CommandType::PrintCheck, command).await
	}

	/// Prints a purchase-return receipt described by `command`.
	pub async fn print_purchase_return<T>(&self, command: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		self.submit(CommandType::PrintPurchaseReturn, command).await
	}

	/// Returns the state of one submitted command (`GET Command/{id}`).
	pub async fn command_status(&self, id: &CommandId) -> Result<Value> {
		self.request(Method::Get, Resource::CommandStatus(id.clone()), RequestParams::new()).await
	}

	/// Lists submitted commands matching `filter` (`GET Command`).
	pub async fn data_commands(&self, filter: &DataCommandFilter) -> Result<Value> {
		let params = RequestParams::from_serialize(filter)?;

		self.request(Method::Get, Resource::Command, params).await
	}

	async fn submit<T>(&self, kind: CommandType, command: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		let params = command_params(kind, command)?;

		self.request(Method::Post, Resource::Command, params).await
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{
		_preludet::*,
		http::RequestBody,
		sign::SIGN_HEADER,
		store::{CacheKey, MemoryStore, TokenStore},
	};

	const ACCOUNT: &str = "https://check.example.com/open-api/v1";

	async fn engine(transport: &ScriptedTransport) -> RequestEngine {
		let credentials = test_credentials(ACCOUNT);
		let store = Arc::new(MemoryStore::default());
		let key = CacheKey::token(&credentials.app_id);

		store.set(&key, "cached".into()).await.expect("Seeding the store should succeed.");

		RequestEngine::builder(credentials)
			.transport(transport.clone())
			.store(store)
			.logger(RecordingLogger::default())
			.build()
			.expect("Engine should build.")
	}

	fn json_body(transport: &ScriptedTransport, idx: usize) -> Value {
		match &transport.requests()[idx].body {
			RequestBody::Json(bytes) => serde_json::from_slice(bytes).expect("Body should be JSON."),
			RequestBody::Query(_) => panic!("Expected a JSON body."),
		}
	}

	#[tokio::test]
	async fn shift_commands_post_report_type_and_author() {
		let transport = ScriptedTransport::default()
			.reply("/Command", ScriptedReply::json(200, r#"{"command_id":"c-1"}"#));
		let engine = engine(&transport).await;

		engine.open_shift(None).await.expect("Open shift should succeed.");
		engine.close_shift(Some("Кассир")).await.expect("Close shift should succeed.");

		let open = json_body(&transport, 0);
		let close = json_body(&transport, 1);

		assert_eq!(open["type"], "openShift");
		assert_eq!(open["command"], json!({ "report_type": "false", "author": "name" }));
		assert_eq!(close["type"], "closeShift");
		assert_eq!(close["command"]["author"], "Кассир");
		assert_eq!(close["token"], "cached");
		assert_eq!(close["app_id"], "app-test");
	}

	#[tokio::test]
	async fn receipts_embed_the_caller_command() {
		let transport = ScriptedTransport::default()
			.reply("/Command", ScriptedReply::json(200, r#"{"command_id":"c-2"}"#));
		let engine = engine(&transport).await;
		let check = json!({ "c_num": 17, "goods": [{ "name": "Хлеб", "count": 1, "price": 45 }] });
		let receipt = engine.print_check(&check).await.expect("Print check should succeed.");

		engine.print_purchase_return(&check).await.expect("Purchase return should succeed.");

		assert_eq!(receipt["command_id"], "c-2");
		assert_eq!(json_body(&transport, 0)["type"], "printCheck");
		assert_eq!(json_body(&transport, 0)["command"], check);
		assert_eq!(json_body(&transport, 1)["type"], "printPurchaseReturn");
	}

	#[tokio::test]
	async fn command_status_targets_the_command_path() {
		let transport = ScriptedTransport::default()
			.reply("/Command/c-9", ScriptedReply::json(200, r#"{"status":"done"}"#));
		let engine = engine(&transport).await;
		let id = CommandId::new("c-9").expect("Command fixture should be valid.");
		let status = engine.command_status(&id).await.expect("Status should be returned.");

		assert_eq!(status["status"], "done");
		assert_eq!(transport.requests()[0].url.path(), "/open-api/v1/Command/c-9");
		assert!(matches!(transport.requests()[0].body, RequestBody::Query(_)));
	}

	#[tokio::test]
	async fn data_commands_send_only_set_filter_fields() {
		let transport = ScriptedTransport::default().reply("/Command", ScriptedReply::json(200, "[]"));
		let engine = engine(&transport).await;
		let filter = DataCommandFilter::default().created("2024-01-01 00:00:00", "").page(3);

		engine.data_commands(&filter).await.expect("Listing should succeed.");

		let request = &transport.requests()[0];

		assert_eq!(request.param("filter_date_create_from").as_deref(), Some("2024-01-01 00:00:00"));
		assert_eq!(request.param("page").as_deref(), Some("3"));
		assert!(request.param("filter_date_create_to").is_none());
		assert!(request.param("c_num").is_none());
	}

	#[tokio::test]
	async fn state_system_is_a_signed_get() {
		let transport =
			ScriptedTransport::default().reply("/StateSystem", ScriptedReply::json(200, "{}"));
		let engine = engine(&transport).await;

		engine.state_system().await.expect("State should be returned.");

		let request = &transport.requests()[0];

		assert_eq!(request.method, Method::Get);
		assert!(request.header(SIGN_HEADER).is_some());
		assert_eq!(request.param("token").as_deref(), Some("cached"));
	}
}
