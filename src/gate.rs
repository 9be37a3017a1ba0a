//! Process-local cool-down gate consulted before every outbound call.
//!
//! The gate holds a single optional "blocked until" instant. It is armed only when Slack answers
//! with HTTP 429 and read only by the pre-flight check, so it behaves as a one-field circuit
//! breaker: no backoff curve, no cross-process coordination, and no automatic retry.

// crates.io
use time::PrimitiveDateTime;
// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	error::RateLimited,
};

/// Cool-down applied when a 429 response carries no usable `retry-after` header.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::seconds(1);

/// Single choke point that refuses calls while a cool-down is active.
///
/// Concurrent callers race on the cool-down with last-writer-wins semantics; the value is
/// advisory, so a slightly stale read costs at most one extra 429.
pub struct RequestGate {
	blocked_until: Mutex<Option<OffsetDateTime>>,
	clock: Arc<dyn Clock>,
}
impl RequestGate {
	/// Creates an open gate driven by `clock`.
	pub fn new(clock: Arc<dyn Clock>) -> Self {
		Self { blocked_until: Mutex::new(None), clock }
	}

	/// Returns the active (or expired but not yet cleared) cool-down instant.
	pub fn blocked_until(&self) -> Option<OffsetDateTime> {
		*self.blocked_until.lock()
	}

	/// Current time according to the gate's clock.
	pub fn now_utc(&self) -> OffsetDateTime {
		self.clock.now_utc()
	}

	/// Pre-flight check; pure read with no I/O.
	///
	/// Fails with [`RateLimited::CoolingDown`] while `now < blocked_until`. The instant itself is
	/// already open.
	pub fn check(&self) -> Result<(), RateLimited> {
		let now = self.clock.now_utc();

		match self.blocked_until() {
			Some(until) if now < until => Err(RateLimited::CoolingDown { until }),
			_ => Ok(()),
		}
	}

	/// Arms the cool-down after a 429 and returns the error to surface to the caller.
	///
	/// A delay past the representable range saturates at the latest representable instant.
	pub(crate) fn throttle(&self, retry_after: Option<Duration>) -> RateLimited {
		let retry_after = retry_after.unwrap_or(DEFAULT_RETRY_AFTER);
		let until = self
			.clock
			.now_utc()
			.checked_add(retry_after)
			.unwrap_or_else(|| PrimitiveDateTime::MAX.assume_utc());

		*self.blocked_until.lock() = Some(until);

		RateLimited::Throttled { retry_after }
	}
}
impl Default for RequestGate {
	fn default() -> Self {
		Self::new(Arc::new(SystemClock))
	}
}
impl Debug for RequestGate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestGate").field("blocked_until", &self.blocked_until()).finish()
	}
}
