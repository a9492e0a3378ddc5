//! Feed source tests
//!
//! HTTP endpoint via mockito, JSON files via tempfile.

use std::io::Write;

use mockito::Server;
use jobtok::feed::{FeedSource, FeedSpec, HttpFeedSource, JsonFileSource};
use jobtok::models::SubmissionStatus;

const FEED_BODY: &str = r#"{
    "videos": [
        {
            "videoId": "3Fq9xYb2",
            "userId": "kx81Lmq0PzR",
            "uri": "https://firebasestorage.example.com/v/3Fq9xYb2.mp4",
            "description": "Barista wanted, show us your latte art",
            "tags": ["barista", "coffee"],
            "likes": 1520,
            "views": 40210,
            "submissions": 2,
            "duration": 12.5
        },
        {
            "videoId": "Zt0c11Aa",
            "userId": "m2Hh88Qw",
            "uri": "https://firebasestorage.example.com/v/Zt0c11Aa.mp4",
            "originalVideoId": "3Fq9xYb2",
            "submissionStatus": "accepted"
        }
    ]
}"#;

// =============================================================================
// HTTP Source
// =============================================================================

#[tokio::test]
async fn test_http_fetch_wrapped_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/videos.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(FEED_BODY)
        .create_async()
        .await;

    let source = HttpFeedSource::new(server.url());
    let posts = source.fetch().await.unwrap();

    mock.assert_async().await;

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, "3Fq9xYb2");
    assert_eq!(posts[0].tags, vec!["barista", "coffee"]);
    assert_eq!(posts[0].likes, 1520);
    assert!(!posts[0].is_submission());
    assert_eq!(posts[1].original_video_id.as_deref(), Some("3Fq9xYb2"));
    assert_eq!(posts[1].review_status(), Some(SubmissionStatus::Accepted));
    // Omitted fields fall back to defaults
    assert!(posts[1].is_active);
    assert_eq!(posts[1].likes, 0);
}

#[tokio::test]
async fn test_http_fetch_list_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/videos.json")
        .with_status(200)
        .with_body(r#"[{"videoId": "a1", "userId": "u1", "uri": "https://cdn/a1.mp4"}]"#)
        .create_async()
        .await;

    // Trailing slash is trimmed before the path is appended
    let source = HttpFeedSource::new(format!("{}/", server.url()));
    let posts = source.fetch().await.unwrap();

    mock.assert_async().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, "a1");
}

#[tokio::test]
async fn test_http_fetch_explicit_json_url() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/exports/today.json")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let source = FeedSpec::parse(&format!("{}/exports/today.json", server.url()));
    assert!(source.is_remote());
    let posts = source.fetch().await.unwrap();

    mock.assert_async().await;
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_http_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/videos.json")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let source = HttpFeedSource::new(server.url());
    let err = source.fetch().await.unwrap_err();

    assert!(err.to_string().contains("500"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_http_malformed_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/videos.json")
        .with_status(200)
        .with_body(r#"{"items": 3}"#)
        .create_async()
        .await;

    let source = HttpFeedSource::new(server.url());
    let err = source.fetch().await.unwrap_err();

    assert!(err.to_string().contains("parse"), "unexpected error: {}", err);
}

// =============================================================================
// File Source
// =============================================================================

#[tokio::test]
async fn test_file_fetch() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(FEED_BODY.as_bytes()).unwrap();

    let source = JsonFileSource::new(file.path());
    let posts = source.fetch().await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].duration_secs, 12.5);
}

#[tokio::test]
async fn test_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let source = FeedSpec::parse(dir.path().join("nope.json").to_str().unwrap());

    assert!(!source.is_remote());
    let err = source.fetch().await.unwrap_err();
    assert!(err.to_string().contains("Failed to read feed file"));
}

#[test]
fn test_spec_display() {
    let spec = FeedSpec::parse("  https://example.com/feed  ");
    assert_eq!(spec.to_string(), "https://example.com/feed");

    let spec = FeedSpec::parse("/tmp/videos.json");
    assert_eq!(spec.to_string(), "/tmp/videos.json");
}
