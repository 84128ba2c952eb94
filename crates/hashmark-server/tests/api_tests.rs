//! HTTP contract tests for the verification API.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hashmark::store::Ledger;
use hashmark::HashmarkConfig;
use hashmark_server::error::INTERNAL_ERROR_MESSAGE;
use hashmark_server::{create_router, AppState};
use hashmark_testkit::TestFixture;
use serde_json::{json, Value};
use tower::ServiceExt;

const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
const BOUNDARY: &str = "hashmark-test-boundary";

fn router_for(fixture: &TestFixture) -> Router {
    let ledger: Arc<dyn Ledger> = fixture.ledger().clone();
    create_router(AppState::new(ledger, fixture.hashmark.config()))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}

async fn post_json(router: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/verify")
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(router, request).await
}

fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn post_multipart(
    router: &Router,
    parts: &[(&str, Option<&str>, &[u8])],
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/verify")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(router, request).await
}

#[tokio::test]
async fn test_verify_known_hash() {
    let fixture = TestFixture::new();
    fixture.ingest("uploads/hello.txt", b"hello").await;
    let router = router_for(&fixture);

    let (status, body) = post_json(&router, json!({ "hash": HELLO_SHA256 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let verification = &body["verification"];
    assert_eq!(verification["exists"], true);
    assert_eq!(
        verification["message"],
        "File verified successfully! This file existed in our system."
    );
    assert_eq!(
        verification["file_details"]["original_filename"],
        "uploads/hello.txt"
    );
    assert_eq!(verification["file_details"]["file_size"], 5);
    assert_eq!(verification["file_details"]["sha256_hash"], HELLO_SHA256);
    assert_eq!(verification["file_details"]["verification_count"], 1);
    assert!(verification["proof_details"]["row_key"]
        .as_str()
        .unwrap()
        .ends_with("_2cf24dba"));
    assert_eq!(verification["proof_details"]["storage_status"], "verified");

    assert_eq!(body["request_info"]["provided_hash"], HELLO_SHA256);
    assert_eq!(body["request_info"]["mode"], "hash");
    assert!(body["request_info"]["verification_timestamp"].is_string());
}

#[tokio::test]
async fn test_verify_unknown_hash() {
    let fixture = TestFixture::new();
    let router = router_for(&fixture);

    let (status, body) = post_json(&router, json!({ "hash": HELLO_SHA256 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verification"]["exists"], false);
    assert_eq!(
        body["verification"]["message"],
        "This file hash was not found in our records."
    );
    assert_eq!(body["verification"]["searched_hash"], HELLO_SHA256);
    assert!(body["verification"].get("file_details").is_none());
}

#[tokio::test]
async fn test_short_hash_rejected_without_lookup() {
    let fixture = TestFixture::new();
    let router = router_for(&fixture);

    let (status, body) = post_json(&router, json!({ "hash": "deadbeef" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["received_length"], 8);
    assert_eq!(
        body["error"],
        "Invalid hash format. SHA-256 hashes should be 64 hexadecimal characters."
    );
    assert_eq!(fixture.ledger().lookups(), 0);
}

#[tokio::test]
async fn test_off_by_one_lengths_rejected() {
    let fixture = TestFixture::new();
    let router = router_for(&fixture);

    for len in [63, 65] {
        let (status, body) = post_json(&router, json!({ "hash": "a".repeat(len) })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["received_length"], len);
    }
    assert_eq!(fixture.ledger().lookups(), 0);
}

#[tokio::test]
async fn test_non_hex_hash_rejected() {
    let fixture = TestFixture::new();
    let router = router_for(&fixture);

    let (status, body) = post_json(&router, json!({ "hash": "z".repeat(64) })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(fixture.ledger().lookups(), 0);
}

#[tokio::test]
async fn test_non_string_hash_has_zero_length() {
    let fixture = TestFixture::new();
    let router = router_for(&fixture);

    let (status, body) = post_json(&router, json!({ "hash": 12345 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["received_length"], 0);
}

#[tokio::test]
async fn test_missing_hash_field() {
    let fixture = TestFixture::new();
    let router = router_for(&fixture);

    let (status, body) = post_json(&router, json!({ "sha": HELLO_SHA256 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing 'hash' field in JSON request body");
    assert_eq!(body["example"], json!({ "hash": "abc123..." }));
}

#[tokio::test]
async fn test_invalid_json_is_client_error() {
    let fixture = TestFixture::new();
    let router = router_for(&fixture);

    let request = Request::builder()
        .method("POST")
        .uri("/verify")
        .header("Content-Type", "application/json")
        .body(Body::from("{\"hash\": "))
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_unsupported_content_type() {
    let fixture = TestFixture::new();
    let router = router_for(&fixture);

    for content_type in [Some("text/plain"), None] {
        let mut builder = Request::builder().method("POST").uri("/verify");
        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        let request = builder.body(Body::from(HELLO_SHA256)).unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["supported_types"],
            json!(["multipart/form-data", "application/json"])
        );
    }
}

#[tokio::test]
async fn test_content_type_parameters_and_case() {
    let fixture = TestFixture::new();
    fixture.ingest("hello.txt", b"hello").await;
    let router = router_for(&fixture);

    let request = Request::builder()
        .method("POST")
        .uri("/verify")
        .header("Content-Type", "Application/JSON; charset=utf-8")
        .body(Body::from(json!({ "hash": HELLO_SHA256 }).to_string()))
        .unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verification"]["exists"], true);
}

#[tokio::test]
async fn test_verify_by_file_upload() {
    let fixture = TestFixture::new();
    fixture.ingest("uploads/hello.txt", b"hello").await;
    let router = router_for(&fixture);

    let (status, body) = post_multipart(
        &router,
        &[
            ("note", None, b"not a file".as_slice()),
            ("file", Some("copy-of-hello.txt"), b"hello".as_slice()),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verification"]["exists"], true);
    assert_eq!(
        body["verification"]["file_details"]["original_filename"],
        "uploads/hello.txt"
    );
    assert_eq!(body["request_info"]["provided_hash"], HELLO_SHA256);
    assert_eq!(body["request_info"]["mode"], "file");
}

#[tokio::test]
async fn test_multipart_without_file_part() {
    let fixture = TestFixture::new();
    let router = router_for(&fixture);

    let (status, body) =
        post_multipart(&router, &[("hash", None, HELLO_SHA256.as_bytes())]).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file found in multipart request");
    assert_eq!(fixture.ledger().lookups(), 0);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let fixture = TestFixture::with_config(HashmarkConfig {
        max_upload_bytes: 1024,
        ..HashmarkConfig::default()
    });
    let router = router_for(&fixture);

    let big = vec![b'x'; 8 * 1024];
    let (status, _) =
        post_multipart(&router, &[("file", Some("big.bin"), big.as_slice())]).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(fixture.ledger().lookups(), 0);
}

#[tokio::test]
async fn test_store_failure_is_generic_500() {
    let fixture = TestFixture::new();
    fixture.ledger().fail_reads(true);
    let router = router_for(&fixture);

    let (status, body) = post_json(&router, json!({ "hash": HELLO_SHA256 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], INTERNAL_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_counter_failure_still_succeeds() {
    let fixture = TestFixture::new();
    fixture.ingest("hello.txt", b"hello").await;
    fixture.ledger().fail_writes(true);
    let router = router_for(&fixture);

    let (status, body) = post_json(&router, json!({ "hash": HELLO_SHA256 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verification"]["exists"], true);
    assert_eq!(body["verification"]["file_details"]["verification_count"], 1);
}

#[tokio::test]
async fn test_health() {
    let fixture = TestFixture::new();
    fixture.ingest("a.txt", b"alpha").await;
    fixture.ingest("b.txt", b"beta").await;
    let router = router_for(&fixture);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "records": 2 }));

    fixture.ledger().fail_reads(true);
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
}
