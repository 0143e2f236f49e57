//! Integration tests for BoundaryCache.
//!
//! These tests verify single-flight loading and the no-caching-of-failures rule.

use std::sync::Arc;
use std::time::Duration;

use crate::integration::common::{MockBoundarySource, sample_boundaries};
use shokuhi_core::BoundaryCache;

#[tokio::test]
async fn test_cache_loads_once() {
    let source = MockBoundarySource::new(sample_boundaries());
    let cache = BoundaryCache::new(source.clone());
    assert!(!cache.is_loaded());

    let first = cache.get().await.unwrap();
    let second = cache.get().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.load_count(), 1);
    assert!(cache.is_loaded());
}

/// Concurrent first callers wait for a single load.
#[tokio::test]
async fn test_concurrent_callers_share_one_load() {
    let source = MockBoundarySource::new(sample_boundaries()).with_delay(Duration::from_millis(50));
    let cache = BoundaryCache::new(source.clone());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get().await.map(|set| set.features().len()) })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 4);
    }
    assert_eq!(source.load_count(), 1);
}

/// A failed load is not kept; the next call tries again.
#[tokio::test]
async fn test_failure_is_not_cached() {
    let source = MockBoundarySource::failing();
    let cache = BoundaryCache::new(source.clone());

    assert!(cache.get().await.is_err());
    assert!(cache.get().await.is_err());

    assert_eq!(source.load_count(), 2);
    assert!(!cache.is_loaded());
}
