//! Slack credential wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Slack API token (bot, user, or legacy) kept out of logs and debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlackToken(String);
impl SlackToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl From<String> for SlackToken {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for SlackToken {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for SlackToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SlackToken").field(&"<redacted>").finish()
	}
}
impl Display for SlackToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
