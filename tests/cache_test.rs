//! Integration tests for the spec cache against the real loader.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use oas_validate::{CacheConfig, LoaderOptions, SpecCache, SpecDocument, SpecError};
use tempfile::TempDir;

#[test]
fn cache_backed_by_resource_loader() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("items.json"),
        r#"{"basePath":"/v1","paths":{"/items":{"get":{}}}}"#,
    )
    .unwrap();

    let cache = SpecCache::new(
        CacheConfig::default(),
        LoaderOptions {
            resource_root: dir.path().to_path_buf(),
            ..LoaderOptions::default()
        },
    );

    let doc = cache.get("items.json").unwrap();
    assert_eq!(doc.base_path.as_deref(), Some("/v1"));

    // A second get must serve the same parsed document.
    let again = cache.get("items.json").unwrap();
    assert!(Arc::ptr_eq(&doc, &again));
}

#[test]
fn load_failure_is_surfaced_and_retried() {
    let dir = TempDir::new().unwrap();
    let cache = SpecCache::new(
        CacheConfig::default(),
        LoaderOptions {
            resource_root: dir.path().to_path_buf(),
            ..LoaderOptions::default()
        },
    );

    let err = cache.get("missing.json").unwrap_err();
    assert!(matches!(err, SpecError::ResourceNotFound { .. }));

    // Creating the resource afterwards makes the next get succeed: the
    // failure was not cached.
    fs::write(dir.path().join("missing.json"), r#"{"paths":{}}"#).unwrap();
    assert!(cache.get("missing.json").is_ok());
}

#[test]
fn many_concurrent_gets_trigger_one_load() {
    const THREADS: usize = 16;

    let loads = Arc::new(AtomicUsize::new(0));
    let loads_in_cache = loads.clone();
    let cache = Arc::new(SpecCache::with_load_fn(CacheConfig::default(), move |_| {
        loads_in_cache.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(40));
        SpecDocument::from_json_str(r#"{"basePath":"/shared","paths":{}}"#)
    }));

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = cache.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                cache.get("the-one-spec")
            })
        })
        .collect();

    for handle in handles {
        let doc = handle.join().unwrap().unwrap();
        assert_eq!(doc.base_path.as_deref(), Some("/shared"));
    }
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_failures_share_one_outcome_then_retry() {
    const THREADS: usize = 8;

    let loads = Arc::new(AtomicUsize::new(0));
    let loads_in_cache = loads.clone();
    let cache = Arc::new(SpecCache::with_load_fn(CacheConfig::default(), move |_| {
        loads_in_cache.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(40));
        Err(SpecError::InvalidJson {
            message: "broken".into(),
        })
    }));

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = cache.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                cache.get("broken-spec")
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_err());
    }
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    // The failure was not cached: a later get loads again.
    assert!(cache.get("broken-spec").is_err());
    assert_eq!(loads.load(Ordering::SeqCst), 2);
}

#[test]
fn inline_specs_are_cached_by_identifier() {
    let loads = Arc::new(AtomicUsize::new(0));
    let loads_in_cache = loads.clone();
    let cache = SpecCache::with_load_fn(CacheConfig::default(), move |id| {
        loads_in_cache.fetch_add(1, Ordering::SeqCst);
        SpecDocument::from_json_str(id)
    });

    let id = r#"{"basePath":"/inline","paths":{}}"#;
    cache.get(id).unwrap();
    cache.get(id).unwrap();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}
