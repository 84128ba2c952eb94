//! End-to-end ingest and verification against in-memory backends.

use hashmark::core::fingerprint;
use hashmark::store::Ledger;
use hashmark::{ClientInputError, Disposition, HashmarkError};
use hashmark_testkit::generators::content;
use hashmark_testkit::TestFixture;
use proptest::prelude::*;

const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

#[tokio::test]
async fn test_hello_ingested_once() {
    let fixture = TestFixture::new();

    let first = fixture.ingest("uploads/hello.txt", b"hello").await;
    assert_eq!(first.disposition, Disposition::Committed);
    assert_eq!(first.record.primary_hash.to_hex(), HELLO_SHA256);

    let second = fixture.ingest("uploads/hello-again.txt", b"hello").await;
    assert_eq!(second.disposition, Disposition::DuplicateDiscarded);
    assert!(second.staged_copy_removed);

    let all = fixture
        .ledger()
        .find_all_by_primary_hash(&first.fingerprint.primary)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].original_filename, "uploads/hello.txt");
    assert!(fixture.staging().is_empty());
}

#[tokio::test]
async fn test_ingest_then_verify_by_hash() {
    let fixture = TestFixture::new();
    fixture.ingest("report.pdf", b"quarterly numbers").await;

    let hash = fingerprint(b"quarterly numbers").primary.to_hex();
    let verification = fixture
        .hashmark
        .verification()
        .verify_hash_str(&hash)
        .await
        .unwrap();

    assert!(verification.result.exists);
    let details = verification.result.file_details.unwrap();
    assert_eq!(details.original_filename, "report.pdf");
    assert_eq!(details.file_size, 17);
    assert_eq!(details.verification_count, 1);
}

#[tokio::test]
async fn test_counter_tracks_verifications() {
    let fixture = TestFixture::new();
    let outcome = fixture.ingest("a.bin", &[1, 2, 3]).await;
    let service = fixture.hashmark.verification();

    let mut last = 0;
    for _ in 0..4 {
        let result = service.verify(&outcome.fingerprint.primary).await.unwrap();
        last = result.file_details.unwrap().verification_count;
    }
    assert_eq!(last, 4);

    let stored = fixture
        .ledger()
        .find_by_primary_hash(&outcome.fingerprint.primary)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.verification_count, 4);
    assert!(stored.last_verified.is_some());
}

#[tokio::test]
async fn test_short_hash_skips_ledger() {
    let fixture = TestFixture::new();

    let err = fixture
        .hashmark
        .verification()
        .verify_hash_str("deadbeef")
        .await
        .unwrap_err();

    assert!(err.is_client_error());
    assert!(matches!(
        err,
        HashmarkError::ClientInput(ClientInputError::MalformedHash { received_length: 8 })
    ));
    assert_eq!(fixture.ledger().lookups(), 0);
}

#[tokio::test]
async fn test_store_outage_during_ingest_keeps_upload() {
    let fixture = TestFixture::new();
    let object = fixture.stage("uploads/keep.txt", b"keep me").await;

    fixture.ledger().fail_reads(true);
    let err = fixture.hashmark.ingest().ingest(&object).await.unwrap_err();
    assert!(matches!(err, HashmarkError::StoreUnavailable(_)));
    assert!(fixture.staging().contains("keep.txt"));

    fixture.ledger().fail_reads(false);
    let outcome = fixture.hashmark.ingest().ingest(&object).await.unwrap();
    assert_eq!(outcome.disposition, Disposition::Committed);
    assert!(fixture.staging().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_ingested_content_always_verifies(data in content(2048)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let fixture = TestFixture::new();
            fixture.ingest("blob.bin", &data).await;
            fixture.ingest("blob-copy.bin", &data).await;

            let verification = fixture
                .hashmark
                .verification()
                .verify_bytes(&data)
                .await
                .unwrap();
            assert!(verification.result.exists);
            assert_eq!(fixture.ledger().inner().count().await.unwrap(), 1);
        });
    }
}
