//! Infrastructure services - composed behavior over backends

mod lookup_cache_service;

pub use lookup_cache_service::{
    CacheStats, CacheStatus, Fetched, LookupCache, LookupCacheConfig,
};
