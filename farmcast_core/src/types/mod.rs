//! Contains geographic points, location buckets, data-type tags, cache keys and TTL policies.

mod cache_key;
pub use cache_key::*;

mod data_type;
pub use data_type::*;

mod geo_point;
pub use geo_point::*;

mod location_bucket;
pub use location_bucket::*;

mod ttl_policy;
pub use ttl_policy::*;
