//! The cache service: typed store and retrieve operations per payload kind.
//!
//! Every operation follows the same path. The location is mapped onto its
//! bucket, the key is composed from data type, bucket and (for crop
//! recommendations) the season, and the entry store is consulted. Reads never
//! return an entry past its `expires_at`; such entries are deleted on the spot
//! unless a newer write has already replaced them.
//!
//! The `store_*` and `get_*` methods never fail: write failures are logged and
//! dropped, read failures become misses. [`CacheService::put`] and
//! [`CacheService::lookup`] expose the same operations with their outcome.

mod lookup;
mod sweeper;

pub use lookup::{Lookup, MissReason};
pub use sweeper::Sweeper;

use crate::{CacheEntry, CacheError, EntryStats, EntryStore, SqliteOptions, StoreError, StoreType, open_store};
use anyhow::Result;
use farmcast_core::{
	CacheKey, Clock, CropRecommendation, CropRecommendationSet, DataType, GeoPoint, HistoricalPattern,
	HistoricalPatternSet, LocationData, LocationHasher, Payload, SoilData, SystemClock, TtlPolicy, WeatherData,
};
use std::{fmt::Debug, sync::Arc, time::Duration};

/// Tunables of a [`CacheService`].
#[derive(Clone, Debug, PartialEq)]
pub struct CacheOptions {
	/// Decimal places kept when bucketing coordinates.
	pub precision: u8,
	pub ttl: TtlPolicy,
	pub sqlite: SqliteOptions,
	/// Run a background sweep at this interval; `None` sweeps only at open and close.
	pub sweep_interval: Option<Duration>,
}

impl Default for CacheOptions {
	fn default() -> Self {
		CacheOptions {
			precision: farmcast_core::DEFAULT_PRECISION,
			ttl: TtlPolicy::default(),
			sqlite: SqliteOptions::default(),
			sweep_interval: None,
		}
	}
}

pub struct CacheService {
	store: Arc<dyn EntryStore>,
	clock: Arc<dyn Clock>,
	ttl: TtlPolicy,
	hasher: LocationHasher,
	sweeper: Option<Sweeper>,
}

impl CacheService {
	/// Opens the store described by `store_type` and runs the startup sweep.
	pub fn open(store_type: &StoreType, options: CacheOptions) -> Result<Self> {
		let store = open_store(store_type, &options.sqlite)?;
		Self::new(store, Arc::new(SystemClock), options)
	}

	/// Builds a service over an existing store and clock.
	///
	/// Expired entries are swept once before the service is returned; a failing
	/// sweep is logged and does not prevent construction.
	pub fn new(store: Arc<dyn EntryStore>, clock: Arc<dyn Clock>, options: CacheOptions) -> Result<Self> {
		let CacheOptions {
			precision,
			ttl,
			sweep_interval,
			..
		} = options;

		let mut service = CacheService {
			store,
			clock,
			ttl,
			hasher: LocationHasher::new(precision),
			sweeper: None,
		};

		if let Err(err) = service.cleanup_expired() {
			log::warn!("startup sweep failed: {err}");
		}

		if let Some(interval) = sweep_interval {
			service.sweeper = Some(Sweeper::start(service.store.clone(), service.clock.clone(), interval)?);
		}

		Ok(service)
	}

	/// Stops the background sweeper and runs a final sweep.
	pub fn close(mut self) {
		if let Some(mut sweeper) = self.sweeper.take() {
			sweeper.stop();
		}
		if let Err(err) = self.cleanup_expired() {
			log::warn!("shutdown sweep failed: {err}");
		}
	}

	pub fn store(&self) -> &Arc<dyn EntryStore> {
		&self.store
	}

	pub fn ttl_policy(&self) -> &TtlPolicy {
		&self.ttl
	}

	pub fn precision(&self) -> u8 {
		self.hasher.precision()
	}

	/// Only crop recommendations carry a discriminator; it is ignored for every other type.
	fn key_for(&self, location: &GeoPoint, data_type: DataType, discriminator: &str) -> Result<(CacheKey, String), CacheError> {
		let discriminator = if data_type == DataType::CropRecommendations {
			discriminator
		} else {
			""
		};
		let bucket = self.hasher.hash_point(location);
		let key = CacheKey::build(data_type.as_str(), bucket.as_str(), discriminator)?;
		Ok((key, bucket.as_str().to_string()))
	}

	/// Writes `payload` for `location`, replacing any entry under the same key.
	///
	/// Crop recommendations are keyed by their season as well.
	pub fn put(&self, location: &GeoPoint, payload: &Payload) -> Result<(), CacheError> {
		let data_type = payload.data_type();
		let discriminator = match payload {
			Payload::CropRecommendations(set) => set.season.as_str(),
			_ => "",
		};
		let (key, bucket) = self.key_for(location, data_type, discriminator)?;
		let text = payload.encode()?;
		let ttl = self.ttl.ttl_for(data_type.as_str());
		let entry = CacheEntry::new(key.as_str(), text, data_type.as_str(), &bucket, self.clock.now(), ttl).ok_or_else(
			|| CacheError::ExpiryOutOfRange {
				cache_key: key.to_string(),
			},
		)?;
		self.store.upsert(&entry)?;
		log::debug!("cached {key} until {}", entry.expires_at);
		Ok(())
	}

	/// Reads the live entry of `data_type` for `location`.
	pub fn lookup(&self, location: &GeoPoint, data_type: DataType, discriminator: &str) -> Lookup<Payload> {
		let key = match self.key_for(location, data_type, discriminator) {
			Ok((key, _)) => key,
			Err(err) => {
				log::warn!("cannot look up {data_type} at {location}: {err}");
				return Lookup::Miss(MissReason::StoreFailure);
			}
		};

		let entry = match self.store.get(key.as_str()) {
			Ok(Some(entry)) => entry,
			Ok(None) => return Lookup::Miss(MissReason::Absent),
			Err(StoreError::Corrupt { reason, .. }) => {
				log::warn!("discarding corrupt entry {key}: {reason}");
				self.discard(&key);
				return Lookup::Miss(MissReason::Malformed);
			}
			Err(err) => {
				log::warn!("cache read of {key} failed: {err}");
				return Lookup::Miss(MissReason::StoreFailure);
			}
		};

		let now = self.clock.now();
		if entry.is_expired_at(now) {
			log::debug!("{key} expired at {}", entry.expires_at);
			self.discard_unchanged(&entry);
			return Lookup::Miss(MissReason::Expired);
		}

		match Payload::decode(data_type, &entry.payload) {
			Ok(payload) => Lookup::Hit(payload),
			Err(err) => {
				log::warn!("discarding undecodable entry {key}: {err}");
				self.discard_unchanged(&entry);
				Lookup::Miss(MissReason::Malformed)
			}
		}
	}

	fn discard(&self, key: &CacheKey) {
		if let Err(err) = self.store.delete(key.as_str()) {
			log::warn!("could not delete {key}: {err}");
		}
	}

	/// Deletes `entry` unless a concurrent write has replaced it since it was read.
	fn discard_unchanged(&self, entry: &CacheEntry) {
		match self.store.delete_if_unchanged(entry) {
			Ok(true) => {}
			Ok(false) => log::debug!("{} was replaced before it could be discarded", entry.cache_key),
			Err(err) => log::warn!("could not delete {}: {err}", entry.cache_key),
		}
	}

	fn store_quietly(&self, location: &GeoPoint, payload: &Payload) {
		if let Err(err) = self.put(location, payload) {
			log::warn!("failed to cache {} at {location}: {err}", payload.data_type());
		}
	}

	/// Caches reverse-geocoding results under their own coordinates.
	pub fn store_location(&self, location: &LocationData) {
		self.store_quietly(&location.point(), &Payload::Location(location.clone()));
	}

	pub fn get_location(&self, location: &GeoPoint) -> Option<LocationData> {
		match self.lookup(location, DataType::LocationData, "") {
			Lookup::Hit(Payload::Location(data)) => Some(data),
			_ => None,
		}
	}

	pub fn store_weather(&self, location: &GeoPoint, weather: &WeatherData, is_forecast: bool) {
		self.store_quietly(location, &Payload::weather(weather.clone(), is_forecast));
	}

	pub fn get_weather(&self, location: &GeoPoint, is_forecast: bool) -> Option<WeatherData> {
		match self.lookup(location, DataType::weather(is_forecast), "") {
			Lookup::Hit(Payload::WeatherCurrent(data) | Payload::WeatherForecast(data)) => Some(data),
			_ => None,
		}
	}

	pub fn store_soil(&self, location: &GeoPoint, soil: &SoilData) {
		self.store_quietly(location, &Payload::Soil(soil.clone()));
	}

	pub fn get_soil(&self, location: &GeoPoint) -> Option<SoilData> {
		match self.lookup(location, DataType::SoilData, "") {
			Lookup::Hit(Payload::Soil(data)) => Some(data),
			_ => None,
		}
	}

	/// Caches the recommendations for one season; seasons are matched case-insensitively.
	pub fn store_crop_recommendations(&self, location: &GeoPoint, season: &str, recommendations: &[CropRecommendation]) {
		let set = CropRecommendationSet {
			recommendations: recommendations.to_vec(),
			season: season.to_string(),
			location: *location,
		};
		self.store_quietly(location, &Payload::CropRecommendations(set));
	}

	pub fn get_crop_recommendations(&self, location: &GeoPoint, season: &str) -> Option<Vec<CropRecommendation>> {
		match self.lookup(location, DataType::CropRecommendations, season) {
			Lookup::Hit(Payload::CropRecommendations(set)) => Some(set.recommendations),
			_ => None,
		}
	}

	pub fn store_historical_data(&self, location: &GeoPoint, patterns: &[HistoricalPattern]) {
		let set = HistoricalPatternSet {
			patterns: patterns.to_vec(),
			location: *location,
		};
		self.store_quietly(location, &Payload::HistoricalPatterns(set));
	}

	pub fn get_historical_data(&self, location: &GeoPoint) -> Option<Vec<HistoricalPattern>> {
		match self.lookup(location, DataType::HistoricalData, "") {
			Lookup::Hit(Payload::HistoricalPatterns(set)) => Some(set.patterns),
			_ => None,
		}
	}

	/// Removes the recommendations of one season at `location`, leaving other seasons intact.
	pub fn invalidate_crop_recommendations(&self, location: &GeoPoint, season: &str) -> Result<(), CacheError> {
		let (key, _) = self.key_for(location, DataType::CropRecommendations, season)?;
		self.store.delete(key.as_str())?;
		log::info!("invalidated {key}");
		Ok(())
	}

	/// Removes entries of `data_type` and/or in the bucket of `location`.
	/// Without filters every entry is removed.
	pub fn invalidate(&self, data_type: Option<DataType>, location: Option<&GeoPoint>) -> Result<u64, CacheError> {
		let bucket = location.map(|l| self.hasher.hash_point(l));
		let removed = self
			.store
			.delete_where(data_type.map(|t| t.as_str()), bucket.as_ref().map(|b| b.as_str()))?;
		log::info!(
			"invalidated {removed} entries (data type: {}, bucket: {})",
			data_type.map_or("any", |t| t.as_str()),
			bucket.as_ref().map_or("any", |b| b.as_str())
		);
		Ok(removed)
	}

	/// Deletes every entry that expired before now.
	pub fn cleanup_expired(&self) -> Result<u64, CacheError> {
		let removed = self.store.sweep_expired(self.clock.now())?;
		log::info!("removed {removed} expired entries");
		Ok(removed)
	}

	pub fn get_statistics(&self) -> Result<EntryStats, CacheError> {
		Ok(self.store.stats(self.clock.now())?)
	}
}

impl Debug for CacheService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CacheService")
			.field("store", &self.store)
			.field("precision", &self.hasher.precision())
			.field("sweeper", &self.sweeper.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::InMemoryEntryStore;
	use farmcast_core::{ManualClock, testing::*};
	use parking_lot::Mutex;
	use pretty_assertions::assert_eq;
	use time::macros::datetime;

	/// Lets another writer slip in between a read and the following delete.
	#[derive(Debug, Default)]
	struct InterleavingStore {
		inner: InMemoryEntryStore,
		pending: Mutex<Option<CacheEntry>>,
	}

	impl EntryStore for InterleavingStore {
		fn upsert(&self, entry: &CacheEntry) -> Result<(), StoreError> {
			self.inner.upsert(entry)
		}

		fn get(&self, cache_key: &str) -> Result<Option<CacheEntry>, StoreError> {
			let found = self.inner.get(cache_key)?;
			if let Some(entry) = self.pending.lock().take() {
				self.inner.upsert(&entry)?;
			}
			Ok(found)
		}

		fn delete(&self, cache_key: &str) -> Result<(), StoreError> {
			self.inner.delete(cache_key)
		}

		fn delete_if_unchanged(&self, entry: &CacheEntry) -> Result<bool, StoreError> {
			self.inner.delete_if_unchanged(entry)
		}

		fn delete_where(&self, data_type: Option<&str>, location_bucket: Option<&str>) -> Result<u64, StoreError> {
			self.inner.delete_where(data_type, location_bucket)
		}

		fn sweep_expired(&self, now: time::OffsetDateTime) -> Result<u64, StoreError> {
			self.inner.sweep_expired(now)
		}

		fn stats(&self, now: time::OffsetDateTime) -> Result<EntryStats, StoreError> {
			self.inner.stats(now)
		}
	}

	fn service() -> (Arc<InMemoryEntryStore>, Arc<ManualClock>, CacheService) {
		let store = Arc::new(InMemoryEntryStore::new());
		let clock = Arc::new(ManualClock::new(datetime!(2024-06-01 06:00 UTC)));
		let service = CacheService::new(store.clone(), clock.clone(), CacheOptions::default()).unwrap();
		(store, clock, service)
	}

	#[test]
	fn keys_follow_the_bucket_layout() {
		let (store, _, service) = service();
		service.store_soil(&BENGALURU, &sample_soil());
		service.store_crop_recommendations(&BENGALURU, "Kharif", &sample_crops("kharif").recommendations);
		service.store_location(&sample_location());

		assert!(store.get("soil_data_12.971_77.594").unwrap().is_some());
		assert!(store.get("crop_recommendations_12.971_77.594_kharif").unwrap().is_some());
		assert!(store.get("location_data_12.971_77.594").unwrap().is_some());
	}

	#[test]
	fn lookup_reports_why_it_missed() {
		let (store, clock, service) = service();
		assert_eq!(
			service.lookup(&BENGALURU, DataType::SoilData, "").miss_reason(),
			Some(MissReason::Absent)
		);

		service.put(&BENGALURU, &Payload::weather(sample_weather(), false)).unwrap();
		clock.advance(time::Duration::hours(1));
		assert_eq!(
			service.lookup(&BENGALURU, DataType::WeatherCurrent, "").miss_reason(),
			Some(MissReason::Expired)
		);
		assert!(store.is_empty());

		service.put(&BENGALURU, &Payload::Soil(sample_soil())).unwrap();
		let mut entry = store.get("soil_data_12.971_77.594").unwrap().unwrap();
		entry.payload = "{\"ph\":".to_string();
		store.upsert(&entry).unwrap();
		assert_eq!(
			service.lookup(&BENGALURU, DataType::SoilData, "").miss_reason(),
			Some(MissReason::Malformed)
		);
		assert!(store.is_empty());
	}

	#[test]
	fn weather_kinds_are_separate() {
		let (_, _, service) = service();
		service.store_weather(&BENGALURU, &sample_weather(), true);
		assert_eq!(service.get_weather(&BENGALURU, true), Some(sample_weather()));
		assert_eq!(service.get_weather(&BENGALURU, false), None);
	}

	#[test]
	fn ttl_overrides_apply() {
		let store = Arc::new(InMemoryEntryStore::new());
		let clock = Arc::new(ManualClock::new(datetime!(2024-06-01 06:00 UTC)));
		let mut options = CacheOptions::default();
		options.ttl.set_hours("soil_data", 2).unwrap();
		let service = CacheService::new(store, clock.clone(), options).unwrap();

		service.store_soil(&BENGALURU, &sample_soil());
		clock.advance(time::Duration::hours(2));
		assert_eq!(service.get_soil(&BENGALURU), None);
	}

	#[test]
	fn store_failures_degrade_to_misses() {
		let clock = Arc::new(ManualClock::new(datetime!(2024-06-01 06:00 UTC)));
		let service = CacheService::new(Arc::new(crate::testing::FailingStore), clock, CacheOptions::default()).unwrap();

		service.store_soil(&BENGALURU, &sample_soil());
		assert_eq!(service.get_soil(&BENGALURU), None);
		assert_eq!(
			service.lookup(&BENGALURU, DataType::SoilData, "").miss_reason(),
			Some(MissReason::StoreFailure)
		);
		assert!(matches!(
			service.put(&BENGALURU, &Payload::Soil(sample_soil())),
			Err(CacheError::Store(StoreError::Backend(_)))
		));
		assert!(service.cleanup_expired().is_err());
		assert!(service.get_statistics().is_err());
		service.close();
	}

	#[test]
	fn lazy_expiry_spares_a_concurrent_write() {
		let store = Arc::new(InterleavingStore::default());
		let clock = Arc::new(ManualClock::new(datetime!(2024-06-01 06:00 UTC)));
		let service = CacheService::new(store.clone(), clock.clone(), CacheOptions::default()).unwrap();
		service.store_weather(&BENGALURU, &sample_weather(), false);

		clock.advance(time::Duration::hours(2));
		let mut fresh = store.inner.get("weather_current_12.971_77.594").unwrap().unwrap();
		fresh.created_at = clock.now();
		fresh.expires_at = clock.now() + time::Duration::hours(1);
		*store.pending.lock() = Some(fresh);

		assert_eq!(
			service.lookup(&BENGALURU, DataType::WeatherCurrent, "").miss_reason(),
			Some(MissReason::Expired)
		);
		assert_eq!(service.get_weather(&BENGALURU, false), Some(sample_weather()));
	}

	#[test]
	fn discriminator_only_applies_to_crop_recommendations() {
		let (store, _, service) = service();
		service.store_soil(&BENGALURU, &sample_soil());
		assert!(service.lookup(&BENGALURU, DataType::SoilData, "kharif").is_hit());
		assert!(!service.lookup(&BENGALURU, DataType::CropRecommendations, "kharif").is_hit());
		assert_eq!(store.len(), 1);
	}

	#[test]
	fn unrepresentable_expiry_is_not_written() {
		let store = Arc::new(InMemoryEntryStore::new());
		let clock = Arc::new(ManualClock::new(datetime!(9999-12-20 00:00 UTC)));
		let service = CacheService::new(store.clone(), clock, CacheOptions::default()).unwrap();

		service.store_soil(&BENGALURU, &sample_soil());
		assert_eq!(service.get_soil(&BENGALURU), None);
		assert!(matches!(
			service.put(&BENGALURU, &Payload::Soil(sample_soil())),
			Err(CacheError::ExpiryOutOfRange { ref cache_key }) if cache_key == "soil_data_12.971_77.594"
		));
		assert!(store.is_empty());

		service.store_weather(&BENGALURU, &sample_weather(), false);
		assert_eq!(service.get_weather(&BENGALURU, false), Some(sample_weather()));
	}

	#[test]
	fn startup_sweep_removes_stale_entries() {
		let store = Arc::new(InMemoryEntryStore::new());
		let t0 = datetime!(2024-06-01 06:00 UTC);
		store
			.upsert(&CacheEntry::new("k", "{}".into(), "weather_current", "b", t0, time::Duration::hours(1)).unwrap())
			.unwrap();
		let clock = Arc::new(ManualClock::new(t0 + time::Duration::days(1)));
		let service = CacheService::new(store.clone(), clock, CacheOptions::default()).unwrap();
		assert!(store.is_empty());
		assert!(format!("{service:?}").starts_with("CacheService { store: InMemoryEntryStore"));
		service.close();
	}
}
