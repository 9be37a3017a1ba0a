//! Transport primitives for Slack Web API calls.
//!
//! The module exposes [`SlackTransport`] alongside [`HttpResponse`] so downstream crates can
//! plug in their own HTTP stack (or a fake, in tests) without losing the gate's rate-limit
//! handling. Implementations only move bytes: they post a form and report the status, the
//! parsed `retry-after` hint, and the raw body. Interpreting the body is the client's job.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::{header::RETRY_AFTER, redirect::Policy};
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::{config::ClientConfig, error::ConfigError};

/// Form fields posted to an API method.
pub type Params = BTreeMap<String, String>;

/// Abstraction over blocking HTTP transports able to post a form to a Slack API method.
///
/// Implementations must be `Send + Sync + 'static` so a single client can be shared between the
/// application and a logging layer.
pub trait SlackTransport
where
	Self: 'static + Send + Sync,
{
	/// Posts `form` as `application/x-www-form-urlencoded` to `url` and blocks until the full
	/// response body has been read.
	///
	/// Non-success HTTP statuses are not errors at this level; only failures that prevent a
	/// response from being read are reported through [`TransportError`].
	fn post_form(&self, url: &Url, form: &Params) -> Result<HttpResponse, TransportError>;
}

/// Response captured by a [`SlackTransport`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// `retry-after` hint, when present and parseable as whole seconds.
	pub retry_after: Option<Duration>,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Builds a response with the given status and body and no retry hint.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, retry_after: None, body: body.into() }
	}

	/// Attaches a retry hint.
	pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
		self.retry_after = Some(retry_after);

		self
	}
}

/// Parses a `retry-after` header value expressed in whole seconds.
///
/// Any integer is honored; negative values clamp to zero. HTTP-date forms and fractions are
/// treated as absent and the caller falls back to its default.
pub fn parse_retry_after(raw: &str) -> Option<Duration> {
	let secs = raw.trim().parse::<i64>().ok()?;

	Some(Duration::seconds(secs.max(0)))
}

/// Blocking reqwest transport used by default.
///
/// Redirects are disabled: Web API methods answer directly and a redirect would replay the
/// token-bearing form against another origin.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing blocking reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a transport honoring the TLS and timeout settings in `config`.
	pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
		let mut builder = ReqwestClient::builder()
			.redirect(Policy::none())
			.timeout(config.timeout)
			.connect_timeout(config.connect_timeout);

		if config.danger_accept_invalid_certs {
			builder =
				builder.danger_accept_invalid_certs(true).danger_accept_invalid_hostnames(true);
		}
		if let Some(user_agent) = &config.user_agent {
			builder = builder.user_agent(user_agent.as_str());
		}

		Ok(Self(builder.build()?))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl SlackTransport for ReqwestTransport {
	fn post_form(&self, url: &Url, form: &Params) -> Result<HttpResponse, TransportError> {
		let response = self.0.post(url.clone()).form(form).send()?;
		let status = response.status().as_u16();
		let retry_after = response
			.headers()
			.get(RETRY_AFTER)
			.and_then(|value| value.to_str().ok())
			.and_then(parse_retry_after);
		let body = response.bytes()?.to_vec();

		Ok(HttpResponse { status, retry_after, body })
	}
}
