//! `tracing` layer that posts log events to a Slack channel.
//!
//! [`SlackLayer`] formats each qualifying event and hands the text to a [`MessagePoster`]
//! (normally a [`SlackClient`](crate::SlackClient)). Layers cannot return errors, so failed posts
//! (throttling included) are reported on stderr and otherwise dropped: a logging side effect must
//! never take the host application down.
//!
//! Posting happens synchronously on the thread that emitted the event, so keep the minimum level
//! high (the default is `WARN`) on latency-sensitive paths.

// std
use std::cell::Cell;
// crates.io
use tracing::{
	Event, Level, Subscriber,
	field::{Field, Visit},
};
use tracing_subscriber::{Layer, layer::Context};
// self
use crate::{
	_prelude::*,
	chat::{MessageOptions, MessagePoster},
};
#[cfg(feature = "reqwest")] use crate::{client::ReqwestSlackClient, token::SlackToken};

/// Target prefix of this crate's own events; they are never forwarded.
const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

thread_local! {
	static POSTING: Cell<bool> = const { Cell::new(false) };
}

/// Formats a captured event into message text.
pub type RecordFormatter = dyn Fn(&LogRecord) -> String + Send + Sync;

/// Snapshot of a `tracing` event handed to the formatter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRecord {
	/// Event level.
	pub level: Level,
	/// Event target (usually the module path).
	pub target: String,
	/// Rendered `message` field; empty when the event has none.
	pub message: String,
	/// Remaining fields in declaration order, rendered with `Debug`.
	pub fields: Vec<(String, String)>,
}
impl LogRecord {
	/// Captures `event`.
	pub fn capture(event: &Event<'_>) -> Self {
		let metadata = event.metadata();
		let mut visitor = FieldVisitor::default();

		event.record(&mut visitor);

		Self {
			level: *metadata.level(),
			target: metadata.target().to_owned(),
			message: visitor.message,
			fields: visitor.fields,
		}
	}
}

/// Default layout: `[LEVEL] target: message key=value ...`.
pub fn default_format(record: &LogRecord) -> String {
	let mut text = format!("[{}] {}: {}", record.level, record.target, record.message);

	for (key, value) in &record.fields {
		text.push(' ');
		text.push_str(key);
		text.push('=');
		text.push_str(value);
	}

	text
}

/// Layer that forwards events at or above a minimum level to one Slack channel.
pub struct SlackLayer<P>
where
	P: ?Sized + MessagePoster,
{
	poster: Arc<P>,
	channel: String,
	options: MessageOptions,
	min_level: Level,
	formatter: Arc<RecordFormatter>,
}
impl<P> SlackLayer<P>
where
	P: ?Sized + MessagePoster,
{
	/// Creates a layer posting to `channel` through `poster`, forwarding `WARN` and above.
	pub fn new(poster: impl Into<Arc<P>>, channel: impl Into<String>) -> Self {
		Self {
			poster: poster.into(),
			channel: channel.into(),
			options: MessageOptions::new(),
			min_level: Level::WARN,
			formatter: Arc::new(default_format),
		}
	}

	/// Replaces the fixed options sent with every message.
	pub fn with_options(mut self, options: MessageOptions) -> Self {
		self.options = options;

		self
	}

	/// Adds one fixed option (e.g. `username`, `icon_emoji`).
	pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.options.insert(key.into(), value.into());

		self
	}

	/// Sets the least severe level that is forwarded.
	pub fn with_min_level(mut self, level: Level) -> Self {
		self.min_level = level;

		self
	}

	/// Replaces the record formatter.
	pub fn with_formatter<F>(mut self, formatter: F) -> Self
	where
		F: 'static + Fn(&LogRecord) -> String + Send + Sync,
	{
		self.formatter = Arc::new(formatter);

		self
	}

	/// Channel every record is posted to.
	pub fn channel(&self) -> &str {
		&self.channel
	}

	fn forwards(&self, level: &Level, target: &str) -> bool {
		// `tracing` orders levels by verbosity, so "more severe" compares as smaller.
		*level <= self.min_level && !is_own_target(target)
	}

	fn emit(&self, record: &LogRecord) {
		let text = (self.formatter)(record);

		if let Err(e) = self.poster.post_message(&self.channel, &text, &self.options) {
			eprintln!("slack-gate: failed to post log record to `{}`: {e}", self.channel);
		}
	}
}
#[cfg(feature = "reqwest")]
impl SlackLayer<ReqwestSlackClient> {
	/// Builds a layer backed by its own production client for `token`.
	pub fn from_token(token: impl Into<SlackToken>, channel: impl Into<String>) -> Result<Self> {
		Ok(Self::new(ReqwestSlackClient::new(token)?, channel))
	}
}
impl<S, P> Layer<S> for SlackLayer<P>
where
	S: Subscriber,
	P: 'static + ?Sized + MessagePoster,
{
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let metadata = event.metadata();

		if !self.forwards(metadata.level(), metadata.target()) {
			return;
		}

		let Some(_guard) = PostingGuard::acquire() else {
			return;
		};

		self.emit(&LogRecord::capture(event));
	}
}
impl<P> Debug for SlackLayer<P>
where
	P: ?Sized + MessagePoster,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SlackLayer")
			.field("channel", &self.channel)
			.field("options", &self.options)
			.field("min_level", &self.min_level)
			.finish()
	}
}

/// Marks the current thread as posting so events raised by the poster itself are dropped.
struct PostingGuard;
impl PostingGuard {
	fn acquire() -> Option<Self> {
		if POSTING.with(|posting| posting.replace(true)) { None } else { Some(Self) }
	}
}
impl Drop for PostingGuard {
	fn drop(&mut self) {
		POSTING.with(|posting| posting.set(false));
	}
}

#[derive(Default)]
struct FieldVisitor {
	message: String,
	fields: Vec<(String, String)>,
}
impl Visit for FieldVisitor {
	fn record_str(&mut self, field: &Field, value: &str) {
		if field.name() == "message" {
			self.message = value.to_owned();
		} else {
			self.fields.push((field.name().to_owned(), value.to_owned()));
		}
	}

	fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
		if field.name() == "message" {
			self.message = format!("{value:?}");
		} else {
			self.fields.push((field.name().to_owned(), format!("{value:?}")));
		}
	}
}

fn is_own_target(target: &str) -> bool {
	target == CRATE_TARGET
		|| target.strip_prefix(CRATE_TARGET).is_some_and(|rest| rest.starts_with("::"))
}

#[cfg(test)]
mod tests {
	// crates.io
	use tracing_subscriber::layer::SubscriberExt;
	// self
	use super::*;
	use crate::{_preludet::*, error::RateLimited, response::ApiResponse};

	#[derive(Default)]
	struct RecordingPoster {
		posts: Mutex<Vec<(String, String, MessageOptions)>>,
		log_while_posting: bool,
		fail: bool,
	}
	impl RecordingPoster {
		fn posts(&self) -> Vec<(String, String, MessageOptions)> {
			self.posts.lock().clone()
		}
	}
	impl MessagePoster for RecordingPoster {
		fn post_message(
			&self,
			channel: &str,
			text: &str,
			options: &MessageOptions,
		) -> Result<ApiResponse> {
			self.posts.lock().push((channel.to_owned(), text.to_owned(), options.clone()));

			if self.log_while_posting {
				tracing::error!(target: "app::transport", "nested event while posting");
			}
			if self.fail {
				return Err(RateLimited::Throttled { retry_after: Duration::seconds(1) }.into());
			}

			ApiResponse::from_body(200, br#"{"ok":true}"#)
		}
	}

	fn with_layer(layer: SlackLayer<RecordingPoster>, f: impl FnOnce()) {
		let subscriber = tracing_subscriber::registry().with(layer);

		tracing::subscriber::with_default(subscriber, f);
	}

	#[test]
	fn forwards_warn_and_above_with_fixed_options() {
		let poster = Arc::new(RecordingPoster::default());
		let layer = SlackLayer::<RecordingPoster>::new(Arc::clone(&poster), "C-alerts")
			.with_option("username", "logger");

		with_layer(layer, || {
			tracing::info!(target: "app", "ignored");
			tracing::warn!(target: "app", "disk at {}%", 91);
			tracing::error!(target: "app::db", attempts = 3, "query failed");
		});

		let posts = poster.posts();

		assert_eq!(posts.len(), 2);
		assert_eq!(posts[0].0, "C-alerts");
		assert_eq!(posts[0].1, "[WARN] app: disk at 91%");
		assert_eq!(posts[1].1, "[ERROR] app::db: query failed attempts=3");
		assert_eq!(posts[1].2.get("username").map(String::as_str), Some("logger"));
	}

	#[test]
	fn custom_formatter_and_level() {
		let poster = Arc::new(RecordingPoster::default());
		let layer = SlackLayer::<RecordingPoster>::new(Arc::clone(&poster), "C-debug")
			.with_min_level(Level::DEBUG)
			.with_formatter(|record| format!("{}|{}", record.level, record.message));

		with_layer(layer, || {
			tracing::trace!(target: "app", "too chatty");
			tracing::debug!(target: "app", "cache miss");
		});

		let posts = poster.posts();

		assert_eq!(posts.len(), 1);
		assert_eq!(posts[0].1, "DEBUG|cache miss");
	}

	#[test]
	fn skips_own_and_nested_events() {
		let poster = Arc::new(RecordingPoster { log_while_posting: true, ..Default::default() });
		let layer = SlackLayer::<RecordingPoster>::new(Arc::clone(&poster), "C-alerts");

		with_layer(layer, || {
			tracing::error!(target: "slack_gate::client", "internal");
			tracing::error!(target: "app", "outer");
		});

		let posts = poster.posts();

		assert_eq!(posts.len(), 1, "Nested events must not re-enter the layer.");
		assert_eq!(posts[0].1, "[ERROR] app: outer");
	}

	#[test]
	fn post_failures_do_not_panic_or_wedge_the_layer() {
		let poster = Arc::new(RecordingPoster { fail: true, ..Default::default() });
		let layer = SlackLayer::<RecordingPoster>::new(Arc::clone(&poster), "C-alerts");

		with_layer(layer, || {
			tracing::error!(target: "app", "first");
			tracing::error!(target: "app", "second");
		});

		assert_eq!(poster.posts().len(), 2);
	}

	#[test]
	fn own_target_matching_respects_path_boundaries() {
		assert!(is_own_target("slack_gate"));
		assert!(is_own_target("slack_gate::gate"));
		assert!(!is_own_target("slack_gateway"));
		assert!(!is_own_target("app"));
	}

	#[test]
	fn layer_works_with_the_recording_client() {
		let (client, transport, _clock) = build_recording_client([ok_response()]);
		let layer = SlackLayer::<dyn MessagePoster>::new(
			Arc::new(client) as Arc<dyn MessagePoster>,
			"C-ops",
		);
		let subscriber = tracing_subscriber::registry().with(layer);

		tracing::subscriber::with_default(subscriber, || {
			tracing::error!(target: "app", "boom");
		});

		let requests = transport.requests();

		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].form["channel"], "C-ops");
		assert_eq!(requests[0].form["text"], "[ERROR] app: boom");
	}
}
