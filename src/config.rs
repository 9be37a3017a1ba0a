//! Client configuration: endpoint base, TLS policy, and transport timeouts.

// self
use crate::{_prelude::*, error::ConfigError};

/// Production Slack Web API base.
pub const SLACK_API_BASE: &str = "https://slack.com/api";
/// Default end-to-end request timeout.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);
/// Default TCP/TLS connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Validated settings shared by the client and its default transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL; API methods are appended as the final path segment.
	pub base_url: Url,
	/// Skip TLS certificate and hostname verification.
	///
	/// Only meant for endpoints with known-broken certificate chains. Leaving this `false` is
	/// strongly recommended; enabling it exposes the token to interception.
	pub danger_accept_invalid_certs: bool,
	/// End-to-end request timeout; `None` waits indefinitely.
	pub timeout: Option<StdDuration>,
	/// Connect timeout; `None` defers to the OS.
	pub connect_timeout: Option<StdDuration>,
	/// Optional `User-Agent` header override.
	pub user_agent: Option<String>,
}
impl ClientConfig {
	/// Starts a builder seeded with production defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Resolves the endpoint URL for `method`.
	pub fn endpoint(&self, method: &str) -> Result<Url, ConfigError> {
		if method.is_empty() {
			return Err(ConfigError::EmptyMethod);
		}

		let mut url = self.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::CannotBeABase { url: self.base_url.to_string() })?
			.pop_if_empty()
			.push(method);

		Ok(url)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	/// Raw base URL, parsed during [`build`](Self::build).
	pub base_url: String,
	/// See [`ClientConfig::danger_accept_invalid_certs`].
	pub danger_accept_invalid_certs: bool,
	/// See [`ClientConfig::timeout`].
	pub timeout: Option<StdDuration>,
	/// See [`ClientConfig::connect_timeout`].
	pub connect_timeout: Option<StdDuration>,
	/// See [`ClientConfig::user_agent`].
	pub user_agent: Option<String>,
}
impl ClientConfigBuilder {
	/// Overrides the base URL (proxies, mock servers).
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();

		self
	}

	/// Disables TLS verification when `accept` is `true`.
	pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
		self.danger_accept_invalid_certs = accept;

		self
	}

	/// Sets or clears the request timeout.
	pub fn timeout(mut self, timeout: impl Into<Option<StdDuration>>) -> Self {
		self.timeout = timeout.into();

		self
	}

	/// Sets or clears the connect timeout.
	pub fn connect_timeout(mut self, timeout: impl Into<Option<StdDuration>>) -> Self {
		self.connect_timeout = timeout.into();

		self
	}

	/// Sets the `User-Agent` header.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let base_url = Url::parse(&self.base_url)
			.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { url: base_url.to_string() });
		}
		if base_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: base_url.to_string() });
		}

		Ok(ClientConfig {
			base_url,
			danger_accept_invalid_certs: self.danger_accept_invalid_certs,
			timeout: self.timeout,
			connect_timeout: self.connect_timeout,
			user_agent: self.user_agent,
		})
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self {
			base_url: SLACK_API_BASE.into(),
			danger_accept_invalid_certs: false,
			timeout: Some(DEFAULT_TIMEOUT),
			connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
			user_agent: None,
		}
	}
}
