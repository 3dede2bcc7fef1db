//! Unit tests for the filesystem fetcher.

use crate::helpers::SALES_CSV;
use funnel_deck::data::{DataFetcher, DataOrigin, DataResolver, FetchError, FsFetcher};
use funnel_deck::types::SourceFormat;
use futures::executor::block_on;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_reads_below_root() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data/csv")).unwrap();
    fs::write(dir.path().join("data/csv/sales.csv"), SALES_CSV).unwrap();

    let fetcher = FsFetcher::new(dir.path());
    let text = block_on(fetcher.fetch_text("data/csv/sales.csv")).unwrap();
    assert_eq!(text, SALES_CSV);
}

#[test]
fn test_missing_file_is_not_found_status() {
    let dir = tempdir().unwrap();
    let fetcher = FsFetcher::new(dir.path());

    match block_on(fetcher.fetch_text("data/json/nope.json")) {
        Err(FetchError::Status { path, status }) => {
            assert_eq!(path, "data/json/nope.json");
            assert_eq!(status, 404);
        }
        other => panic!("expected a 404, got {other:?}"),
    }
}

#[test]
fn test_directory_is_io_error() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data/json/folder.json")).unwrap();
    let fetcher = FsFetcher::new(dir.path());

    assert!(matches!(
        block_on(fetcher.fetch_text("data/json/folder.json")),
        Err(FetchError::Io { .. })
    ));
}

#[test]
fn test_resolver_over_filesystem() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data/json")).unwrap();
    fs::write(
        dir.path().join("data/json/signups.json"),
        r#"{"labels": ["Visit", "Signup"], "subLabels": [], "values": [[120], [30]]}"#,
    )
    .unwrap();

    let resolver = DataResolver::new(FsFetcher::new(dir.path()));
    let resolved = block_on(resolver.resolve_source("signups", SourceFormat::Json)).unwrap();

    assert_eq!(resolved.origin, DataOrigin::Fetched);
    assert_eq!(resolved.data.values, vec![vec![120.0], vec![30.0]]);
}
