//! Successful Web API response bodies.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::TransportError};

/// Error code reported when a failed response carries no `error` field.
pub const UNKNOWN_ERROR: &str = "unknown_error";

/// Parsed body of a call that returned `"ok": true`.
///
/// The JSON is kept exactly as Slack sent it; accessors are conveniences layered on top.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiResponse(Value);
impl ApiResponse {
	/// Decodes a raw body and classifies it by its `ok` flag.
	///
	/// Only a literal JSON `true` counts as success; truthy values such as `1` or `"yes"` and a
	/// missing `ok` are failures. Failures surface as [`Error::Api`] with the body's `error` code
	/// (or [`UNKNOWN_ERROR`]).
	pub fn from_body(status: u16, body: &[u8]) -> Result<Self> {
		let de = &mut serde_json::Deserializer::from_slice(body);
		let value: Value = serde_path_to_error::deserialize(de)
			.map_err(|source| TransportError::Decode { source, status: Some(status) })?;

		if value.get("ok").and_then(Value::as_bool).unwrap_or(false) {
			return Ok(Self(value));
		}

		let code = value.get("error").and_then(Value::as_str).unwrap_or(UNKNOWN_ERROR);

		Err(Error::Api { code: code.to_owned() })
	}

	/// Borrows the raw JSON body.
	pub fn as_value(&self) -> &Value {
		&self.0
	}

	/// Returns the raw JSON body.
	pub fn into_inner(self) -> Value {
		self.0
	}

	/// Looks up a top-level field.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	/// Message timestamp (`ts`) returned by `chat.postMessage` and `chat.update`.
	pub fn ts(&self) -> Option<&str> {
		self.get("ts").and_then(Value::as_str)
	}

	/// Channel identifier echoed back by message methods.
	pub fn channel(&self) -> Option<&str> {
		self.get("channel").and_then(Value::as_str)
	}

	/// Deserializes the body into a method-specific type.
	pub fn deserialize<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let typed = serde_path_to_error::deserialize(self.0.clone())
			.map_err(|source| TransportError::Decode { source, status: None })?;

		Ok(typed)
	}

	/// Extracts the `(channel, ts)` pair identifying a posted or updated message.
	pub fn message_ref(&self) -> Result<MessageRef> {
		self.deserialize()
	}
}
impl PartialEq<Value> for ApiResponse {
	fn eq(&self, other: &Value) -> bool {
		&self.0 == other
	}
}
impl From<ApiResponse> for Value {
	fn from(response: ApiResponse) -> Self {
		response.0
	}
}

/// Location of a message, as needed by `chat.update`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
	/// Channel identifier, e.g. `C1234567890`.
	pub channel: String,
	/// Message timestamp, e.g. `1405894322.002768`.
	pub ts: String,
}
