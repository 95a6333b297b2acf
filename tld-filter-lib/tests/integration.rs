// tld-filter-lib/tests/integration.rs

//! Integration tests for tld-filter-lib exports and batch behaviour

use std::collections::HashSet;
use std::time::Duration;
use tld_filter_lib::{
    classify, filter_and_classify, sample_batch, BatchProcessor, FailureKind, FilterConfig,
    LocalizationTable, Record, TldFilter, TldFilterError, UNKNOWN_REF_COUNT,
};

#[test]
fn test_classify_exports() {
    assert_eq!(classify("google.com"), (".com".to_string(), ".co.id".to_string()));
    assert_eq!(classify("golang.org"), (".org".to_string(), ".org.id".to_string()));
    assert_eq!(classify("whitehouse.gov"), (".gov".to_string(), ".go.id".to_string()));
    assert_eq!(classify("docs.rs"), (".rs".to_string(), ".rs".to_string()));
    assert_eq!(classify("intranet"), (String::new(), String::new()));
}

#[test]
fn test_localized_tld_matches_table_or_identity() {
    let table = LocalizationTable::builtin();
    for domain in ["a.com", "b.org", "c.gov", "d.net", "e.io", "f.co.uk"] {
        let (tld, localized) = classify(domain);
        match table.lookup(&tld) {
            Some(mapped) => assert_eq!(localized, mapped),
            None => assert_eq!(localized, tld),
        }
    }
}

#[tokio::test]
async fn test_google_com_accepted() {
    let accepted = filter_and_classify(".com", vec![Record::new(1, "google.com", true, 100)])
        .await
        .unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].tld(), ".com");
    assert_eq!(accepted[0].localized_tld(), ".co.id");
}

#[tokio::test]
async fn test_golang_org_filtered_out_without_error() {
    let accepted = filter_and_classify(".com", vec![Record::new(1, "golang.org", true, 100)])
        .await
        .unwrap();
    assert!(accepted.is_empty());
}

#[tokio::test]
async fn test_empty_domain_fails_batch() {
    let err = filter_and_classify(".org", vec![Record::new(1, "", true, 100)])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("domain name is empty"));
}

#[tokio::test]
async fn test_invalid_flag_fails_batch() {
    let err = filter_and_classify(".com", vec![Record::new(5, "invalid.com", false, 100)])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("domain not valid"));
    assert_eq!(err.failures()[0].domain, "invalid.com");
}

#[tokio::test]
async fn test_unknown_ref_count_fails_batch() {
    let err = filter_and_classify(".com", vec![Record::new(1, "x.com", true, UNKNOWN_REF_COUNT)])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("domain RefIPs not valid"));
    assert_eq!(err.failures()[0].kind, FailureKind::InvalidReferenceCount);
}

#[tokio::test]
async fn test_mixed_batch_is_all_or_nothing() {
    let mut records: Vec<Record> = ["a.com", "b.com", "c.org", "d.com", "e.gov"]
        .iter()
        .enumerate()
        .map(|(i, d)| Record::new(i as u32 + 1, *d, true, 10))
        .collect();
    records.push(Record::new(6, "broken.com", false, 10));

    let result = filter_and_classify(".com", records).await;
    match result {
        Err(TldFilterError::BatchFailed { failures }) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].rank, 6);
        }
        other => panic!("expected batch failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sample_batch_reports_every_failure() {
    let err = filter_and_classify(".com", sample_batch()).await.unwrap_err();
    let ranks: HashSet<u32> = err.failures().iter().map(|f| f.rank).collect();
    assert_eq!(ranks, HashSet::from([4, 5, 6]));
}

#[tokio::test]
async fn test_sample_batch_valid_subset() {
    let valid_only: Vec<Record> = sample_batch().into_iter().take(3).collect();
    let accepted = filter_and_classify(".com", valid_only).await.unwrap();

    let domains: HashSet<&str> = accepted.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(domains, HashSet::from(["google.com", "facebook.com"]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_repeated_batches_never_hang() {
    let processor = BatchProcessor::new();
    for size in [0usize, 1, 2, 7, 64, 500] {
        let records: Vec<Record> = (0..size)
            .map(|i| Record::new(i as u32 + 1, format!("n{}.com", i), true, 1))
            .collect();
        let accepted = tokio::time::timeout(
            Duration::from_secs(10),
            processor.process(".com", records),
        )
        .await
        .expect("batch did not complete")
        .unwrap();
        assert_eq!(accepted.len(), size);
    }
}

#[tokio::test]
async fn test_tld_filter_with_config() {
    let filter = TldFilter::with_config(
        FilterConfig::default()
            .with_target_suffix(".id")
            .with_localized_tld(".id", ".id"),
    )
    .unwrap();

    let accepted = filter
        .filter_and_classify(vec![
            Record::new(1, "example.co.id", true, 1),
            Record::new(2, "google.com", true, 1),
        ])
        .await
        .unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].domain, "example.co.id");
}

#[test]
fn test_blocking_caller() {
    let accepted = tokio_test::block_on(filter_and_classify(
        ".gov",
        vec![Record::new(1, "usa.gov", true, 3), Record::new(2, "golang.org", true, 3)],
    ))
    .unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].localized_tld(), ".go.id");
}
