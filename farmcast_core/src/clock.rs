//! Source of "now" for expiry decisions.
//!
//! The store never owns the notion of current time; the cache service asks a
//! [`Clock`]. Production code uses [`SystemClock`], tests drive a [`ManualClock`].

use parking_lot::Mutex;
use std::fmt::Debug;
use time::{Duration, OffsetDateTime};

pub trait Clock: Debug + Send + Sync {
	fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time in UTC.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
	now: Mutex<OffsetDateTime>,
}

impl ManualClock {
	pub fn new(start: OffsetDateTime) -> Self {
		ManualClock { now: Mutex::new(start) }
	}

	pub fn set(&self, now: OffsetDateTime) {
		*self.now.lock() = now;
	}

	pub fn advance(&self, by: Duration) {
		let mut now = self.now.lock();
		*now += by;
	}
}

impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.now.lock()
	}
}
