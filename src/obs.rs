//! Optional observability helpers for API calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `slack_gate.call` with the `method` (Web API
//!   method) and `stage` (call site) fields.
//! - Enable `metrics` to increment the `slack_gate_call_total` counter for every attempt and
//!   outcome, labeled by `method` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to the gate.
	Attempt,
	/// Slack returned `"ok": true`.
	Success,
	/// Slack returned `"ok": false`.
	ApiError,
	/// Refused locally or throttled with HTTP 429.
	RateLimited,
	/// Configuration, transport, or decoding failure.
	Failure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::ApiError => "api_error",
			CallOutcome::RateLimited => "rate_limited",
			CallOutcome::Failure => "failure",
		}
	}

	/// Classifies a finished call.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => CallOutcome::Success,
			Err(Error::Api { .. }) => CallOutcome::ApiError,
			Err(Error::RateLimited(_)) => CallOutcome::RateLimited,
			Err(_) => CallOutcome::Failure,
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
