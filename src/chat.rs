//! `chat.*` helpers layered on [`SlackClient::call`].

// self
use crate::{_prelude::*, client::SlackClient, http::SlackTransport, response::ApiResponse};

/// Web API method that posts a message.
pub const POST_MESSAGE: &str = "chat.postMessage";
/// Web API method that edits a message.
pub const UPDATE_MESSAGE: &str = "chat.update";

/// Extra method-specific arguments (`username`, `icon_emoji`, `thread_ts`, ...), passed through
/// verbatim.
pub type MessageOptions = BTreeMap<String, String>;

/// Capability to post a message to a channel.
///
/// This is the seam logging adapters depend on, so they can be exercised without a network.
pub trait MessagePoster
where
	Self: Send + Sync,
{
	/// Posts `text` to `channel` with `options` merged in; `channel` and `text` win on collision.
	fn post_message(
		&self,
		channel: &str,
		text: &str,
		options: &MessageOptions,
	) -> Result<ApiResponse>;
}

impl<T> SlackClient<T>
where
	T: ?Sized + SlackTransport,
{
	/// Calls `chat.postMessage`.
	///
	/// `options` are sent as-is except that `channel` and `text` always take the values given
	/// here, and `token` is always the client's own.
	pub fn post_message<I, K, V>(
		&self,
		channel: &str,
		text: &str,
		options: I,
	) -> Result<ApiResponse>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let mut params: MessageOptions =
			options.into_iter().map(|(key, value)| (key.into(), value.into())).collect();

		params.insert("channel".into(), channel.into());
		params.insert("text".into(), text.into());

		self.call(POST_MESSAGE, params)
	}

	/// Calls `chat.update` to replace the text of the message at `ts` in `channel`.
	///
	/// Only `channel`, `text`, and `ts` are sent (plus the token).
	pub fn update_message(&self, channel: &str, text: &str, ts: &str) -> Result<ApiResponse> {
		self.call(UPDATE_MESSAGE, [("channel", channel), ("text", text), ("ts", ts)])
	}
}
impl<T> MessagePoster for SlackClient<T>
where
	T: ?Sized + SlackTransport,
{
	fn post_message(
		&self,
		channel: &str,
		text: &str,
		options: &MessageOptions,
	) -> Result<ApiResponse> {
		SlackClient::post_message(self, channel, text, options)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, http::HttpResponse};

	fn form_keys(form: &BTreeMap<String, String>) -> Vec<&str> {
		form.keys().map(String::as_str).collect()
	}

	#[test]
	fn post_message_merges_options_and_required_fields_win() {
		let (client, transport, _clock) = build_recording_client([HttpResponse::new(
			200,
			r#"{"ok":true,"channel":"C123","ts":"1234.5678"}"#,
		)]);
		let options = MessageOptions::from([
			("channel".to_owned(), "C999".to_owned()),
			("text".to_owned(), "stale".to_owned()),
			("icon_emoji".to_owned(), ":robot_face:".to_owned()),
		]);
		let response = client
			.post_message("C123", "hello", &options)
			.expect("Scripted ok response should succeed.");

		assert_eq!(response.ts(), Some("1234.5678"));

		let requests = transport.requests();
		let form = &requests[0].form;

		assert_eq!(requests[0].url.as_str(), "https://slack.test/api/chat.postMessage");
		assert_eq!(form_keys(form), ["channel", "icon_emoji", "text", "token"]);
		assert_eq!(form["channel"], "C123");
		assert_eq!(form["text"], "hello");
		assert_eq!(form["icon_emoji"], ":robot_face:");
		assert_eq!(form["token"], TEST_TOKEN);
	}

	#[test]
	fn update_message_sends_exactly_channel_text_ts() {
		let (client, transport, _clock) = build_recording_client([ok_response(), ok_response()]);

		client
			.post_message("C123", "first", [("username", "bot")])
			.expect("Scripted ok response should succeed.");
		client
			.update_message("C123", "hi", "1405894322.002768")
			.expect("Scripted ok response should succeed.");

		let requests = transport.requests();
		let form = &requests[1].form;

		assert_eq!(requests[1].url.as_str(), "https://slack.test/api/chat.update");
		assert_eq!(form_keys(form), ["channel", "text", "token", "ts"]);
		assert_eq!(form["ts"], "1405894322.002768");
		assert_eq!(form["text"], "hi");
	}

	#[test]
	fn poster_trait_is_usable_as_object() {
		let (client, transport, _clock) = build_recording_client([ok_response()]);
		let poster: Arc<dyn MessagePoster> = Arc::new(client);

		poster
			.post_message("C123", "via trait", &MessageOptions::new())
			.expect("Scripted ok response should succeed.");

		assert_eq!(transport.requests()[0].form["text"], "via trait");
	}
}
