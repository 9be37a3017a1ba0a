//! Slack Web API client built around a single gated call primitive.
//!
//! Every request, whatever the method, flows through [`SlackClient::call`]:
//!
//! 1. the [`RequestGate`] refuses the call locally while a cool-down is active;
//! 2. the stored token is injected into the form, replacing any caller-supplied `token`;
//! 3. the form is posted through the configured [`SlackTransport`];
//! 4. HTTP 429 arms the cool-down, any other response is decoded and classified by its `ok` flag.
//!
//! Nothing is retried automatically; callers decide when to try again.

// self
use crate::{
	_prelude::*,
	clock::Clock,
	config::ClientConfig,
	gate::RequestGate,
	http::{Params, SlackTransport},
	obs::{self, CallOutcome, CallSpan},
	response::ApiResponse,
	token::SlackToken,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// HTTP status Slack uses to signal throttling.
pub const TOO_MANY_REQUESTS: u16 = 429;
/// Form field carrying the credential.
pub const TOKEN_FIELD: &str = "token";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default blocking reqwest transport.
pub type ReqwestSlackClient = SlackClient<ReqwestTransport>;

/// Credential-bound Slack client.
///
/// The client owns the only piece of mutable state in the crate, the cool-down held by its
/// [`RequestGate`]. Share one instance (e.g. behind `Arc`) between every caller that uses the
/// same token so they all honor the same throttling signal.
pub struct SlackClient<T>
where
	T: ?Sized + SlackTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	config: ClientConfig,
	token: SlackToken,
	gate: RequestGate,
}
impl<T> SlackClient<T>
where
	T: ?Sized + SlackTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	///
	/// Only [`ClientConfig::base_url`] is consulted here; TLS and timeout settings belong to the
	/// transport.
	pub fn with_transport(
		token: impl Into<SlackToken>,
		config: ClientConfig,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			config,
			token: token.into(),
			gate: RequestGate::default(),
		}
	}

	/// Replaces the clock used by the cool-down gate. Any active cool-down is discarded.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.gate = RequestGate::new(clock);

		self
	}

	/// Configuration this client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Instant before which calls are refused locally, if a 429 has been seen.
	pub fn blocked_until(&self) -> Option<OffsetDateTime> {
		self.gate.blocked_until()
	}

	/// Calls an arbitrary Web API method with form parameters.
	///
	/// The stored token always wins over a `token` entry in `params`.
	pub fn call<I, K, V>(&self, method: &str, params: I) -> Result<ApiResponse>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let _span = CallSpan::new(method, "call").entered();

		obs::record_call_outcome(method, CallOutcome::Attempt);

		let form = params.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
		let result = self.dispatch(method, form);

		obs::record_call_outcome(method, CallOutcome::of(&result));

		result
	}

	fn dispatch(&self, method: &str, mut form: Params) -> Result<ApiResponse> {
		let url = self.config.endpoint(method)?;

		self.gate.check()?;

		form.insert(TOKEN_FIELD.into(), self.token.expose().into());

		let response = self.transport.post_form(&url, &form)?;

		if response.status == TOO_MANY_REQUESTS {
			return Err(self.gate.throttle(response.retry_after).into());
		}

		ApiResponse::from_body(response.status, &response.body)
	}
}
#[cfg(feature = "reqwest")]
impl SlackClient<ReqwestTransport> {
	/// Creates a client for the production Slack API with default settings.
	pub fn new(token: impl Into<SlackToken>) -> Result<Self> {
		Self::from_config(token, ClientConfig::builder().build()?)
	}

	/// Creates a client whose reqwest transport honors `config`.
	pub fn from_config(token: impl Into<SlackToken>, config: ClientConfig) -> Result<Self> {
		let transport = ReqwestTransport::from_config(&config)?;

		Ok(Self::with_transport(token, config, transport))
	}
}
impl<T> Debug for SlackClient<T>
where
	T: ?Sized + SlackTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SlackClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("token", &self.token)
			.field("gate", &self.gate)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::*,
		error::{ConfigError, RateLimited, TransportError},
		http::HttpResponse,
	};

	#[test]
	fn token_is_injected_and_overrides_caller_value() {
		let (client, transport, _clock) = build_recording_client([ok_response()]);

		client
			.call("api.test", [("token", "xoxb-caller"), ("foo", "bar")])
			.expect("Recorded ok response should succeed.");

		let requests = transport.requests();

		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].url.as_str(), "https://slack.test/api/api.test");
		assert_eq!(requests[0].form.get("token").map(String::as_str), Some(TEST_TOKEN));
		assert_eq!(requests[0].form.get("foo").map(String::as_str), Some("bar"));
	}

	#[test]
	fn cooling_down_skips_transport() {
		let (client, transport, clock) = build_recording_client([
			HttpResponse::new(429, "").with_retry_after(Duration::seconds(5)),
			ok_response(),
		]);
		let start = clock.now_utc();
		let err = client.call("api.test", Params::new()).expect_err("429 should surface.");

		assert!(matches!(
			err,
			Error::RateLimited(RateLimited::Throttled { retry_after }) if retry_after == Duration::seconds(5)
		));
		assert_eq!(client.blocked_until(), Some(start + Duration::seconds(5)));

		let err = client.call("api.test", Params::new()).expect_err("Cool-down should refuse.");

		assert!(matches!(err, Error::RateLimited(RateLimited::CoolingDown { .. })));
		assert_eq!(transport.requests().len(), 1, "Refused calls must not reach the transport.");

		clock.advance(Duration::seconds(5));
		client.call("api.test", Params::new()).expect("Cool-down should have expired.");

		assert_eq!(transport.requests().len(), 2);
	}

	#[test]
	fn empty_method_fails_before_io() {
		let (client, transport, _clock) = build_recording_client([]);
		let err = client.call("", Params::new()).expect_err("Empty method should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::EmptyMethod)));
		assert!(transport.requests().is_empty());
	}

	#[test]
	fn transport_failures_propagate_untouched() {
		let (client, _transport, _clock) = build_recording_client([]);
		let err = client
			.call("api.test", Params::new())
			.expect_err("Exhausted recording transport should fail.");

		assert!(matches!(err, Error::Transport(TransportError::Network { .. })));
		assert_eq!(client.blocked_until(), None);
	}

	#[test]
	fn debug_output_redacts_token() {
		let (client, _transport, _clock) = build_recording_client([]);
		let rendered = format!("{client:?}");

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains(TEST_TOKEN));
	}
}
