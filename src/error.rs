//! Client-level error types shared by the request gate, message helpers, and transports.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport or decoding failure; the request outcome is unknown or unreadable.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Slack is throttling this client, either remotely (HTTP 429) or through the local cool-down.
	#[error(transparent)]
	RateLimited(#[from] RateLimited),

	/// Slack parsed the request but reported a logical failure (`"ok": false`).
	#[error("Slack API call failed: {code}.")]
	Api {
		/// Error code from the response body, e.g. `channel_not_found`.
		code: String,
	},
}
impl Error {
	/// Returns `true` for both local cool-down refusals and upstream 429 responses.
	pub fn is_rate_limited(&self) -> bool {
		matches!(self, Self::RateLimited(_))
	}

	/// Returns the Slack error code when the failure was reported by the API itself.
	pub fn api_code(&self) -> Option<&str> {
		match self {
			Self::Api { code } => Some(code.as_str()),
			_ => None,
		}
	}
}

/// Rate-limit rejections raised before or after a request.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RateLimited {
	/// The local cool-down is still active; no request was sent.
	#[error("Too many requests; wait until {until}.")]
	CoolingDown {
		/// Instant (UTC) when the cool-down ends.
		until: OffsetDateTime,
	},
	/// Slack answered with HTTP 429; the cool-down has been armed.
	#[error("Too many requests; retry after {} second(s).", .retry_after.whole_seconds())]
	Throttled {
		/// Delay advertised by the `retry-after` header (or the default).
		retry_after: Duration,
	},
}
impl RateLimited {
	/// Returns how long the caller should wait, measured from `now`.
	///
	/// Never negative; an already expired cool-down yields [`Duration::ZERO`].
	pub fn wait_hint(&self, now: OffsetDateTime) -> Duration {
		let wait = match self {
			Self::CoolingDown { until } => *until - now,
			Self::Throttled { retry_after } => *retry_after,
		};

		if wait.is_negative() { Duration::ZERO } else { wait }
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than HTTP(S).
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL cannot carry a path (e.g. `mailto:`), so methods cannot be appended.
	#[error("Base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// API method identifier is empty.
	#[error("API method must not be empty.")]
	EmptyMethod,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, TLS, malformed responses).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the Slack API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Slack responded with a body that is not the expected JSON.
	#[error("Slack API returned malformed JSON.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
