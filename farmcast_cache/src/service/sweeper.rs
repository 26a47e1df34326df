//! Periodic removal of expired entries on a background thread.

use crate::EntryStore;
use anyhow::Result;
use farmcast_core::Clock;
use std::{
	sync::{
		Arc,
		mpsc::{self, RecvTimeoutError, Sender},
	},
	thread::{self, JoinHandle},
	time::Duration,
};

/// Sweeps the store every `interval` until stopped or dropped.
#[derive(Debug)]
pub struct Sweeper {
	stop: Option<Sender<()>>,
	handle: Option<JoinHandle<()>>,
}

impl Sweeper {
	pub fn start(store: Arc<dyn EntryStore>, clock: Arc<dyn Clock>, interval: Duration) -> Result<Self> {
		let (stop, signal) = mpsc::channel::<()>();
		let handle = thread::Builder::new()
			.name("farmcast-sweeper".to_string())
			.spawn(move || {
				log::debug!("sweeper started, interval {interval:?}");
				loop {
					match signal.recv_timeout(interval) {
						Err(RecvTimeoutError::Timeout) => match store.sweep_expired(clock.now()) {
							Ok(0) => log::trace!("periodic sweep removed nothing"),
							Ok(removed) => log::info!("periodic sweep removed {removed} expired entries"),
							Err(err) => log::warn!("periodic sweep failed: {err}"),
						},
						Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
					}
				}
				log::debug!("sweeper stopped");
			})?;
		Ok(Sweeper {
			stop: Some(stop),
			handle: Some(handle),
		})
	}

	/// Signals the thread and waits for it to finish its current sweep.
	pub fn stop(&mut self) {
		if let Some(stop) = self.stop.take() {
			let _ = stop.send(());
		}
		if let Some(handle) = self.handle.take()
			&& handle.join().is_err()
		{
			log::warn!("sweeper thread panicked");
		}
	}

	pub fn is_running(&self) -> bool {
		self.handle.as_ref().is_some_and(|h| !h.is_finished())
	}
}

impl Drop for Sweeper {
	fn drop(&mut self) {
		self.stop();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{CacheEntry, InMemoryEntryStore};
	use farmcast_core::ManualClock;
	use time::macros::datetime;

	#[test]
	fn sweeps_until_stopped() {
		let t0 = datetime!(2024-06-01 06:00 UTC);
		let store = Arc::new(InMemoryEntryStore::new());
		store
			.upsert(&CacheEntry::new("k", "{}".into(), "weather_current", "b", t0, time::Duration::hours(1)).unwrap())
			.unwrap();
		let clock = Arc::new(ManualClock::new(t0 + time::Duration::hours(2)));

		let mut sweeper = Sweeper::start(store.clone(), clock, Duration::from_millis(10)).unwrap();
		assert!(sweeper.is_running());

		let deadline = std::time::Instant::now() + Duration::from_secs(5);
		while !store.is_empty() && std::time::Instant::now() < deadline {
			thread::sleep(Duration::from_millis(10));
		}
		assert!(store.is_empty());

		sweeper.stop();
		assert!(!sweeper.is_running());
		sweeper.stop();
	}
}
