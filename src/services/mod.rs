// Service exports
pub mod cache;

pub use cache::{
    connect_or_degrade, CacheError, CacheKey, CacheManager, KeyValueCache, MemoryCache, NoopCache,
};
