//! Wall-clock sources consulted by the request gate.

// self
use crate::_prelude::*;

/// Source of the current UTC time.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current instant in UTC.
	fn now_utc(&self) -> OffsetDateTime;
}

/// Clock backed by the operating system's real time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now_utc(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::ManualClock;

	#[test]
	fn manual_clock_clones_share_time() {
		let start = time::macros::datetime!(2024-05-01 12:00 UTC);
		let clock = ManualClock::new(start);
		let handle = clock.clone();

		handle.advance(Duration::seconds(90));

		assert_eq!(clock.now_utc(), start + Duration::seconds(90));
	}

	#[test]
	fn system_clock_reports_utc() {
		assert!(SystemClock.now_utc().offset().is_utc());
	}
}
