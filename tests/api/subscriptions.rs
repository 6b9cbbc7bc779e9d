use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::helpers::TestApp;

#[tokio::test]
async fn subscribe_returns_200_when_body_is_valid() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_subscription(&json!({ "email": "frank@test.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse body.");

    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn subscribe_creates_the_file_with_a_header_on_first_subscription() {
    let test_app = TestApp::spawn_app().await;

    assert!(!test_app.subscribers_file_exists());

    let before = Utc::now();
    test_app
        .post_subscription(&json!({ "email": "a@example.com" }))
        .await;
    let after = Utc::now();

    let content = test_app.read_subscribers_file();
    let mut lines = content.lines();

    assert_eq!(lines.next(), Some("email,subscribed_at"));

    let row = lines.next().expect("Missing subscriber row.");
    let (email, timestamp) = row.split_once(',').expect("Row is not comma separated.");

    assert_eq!(email, "a@example.com");

    let subscribed_at: DateTime<Utc> = DateTime::parse_from_rfc3339(timestamp)
        .expect("Timestamp is not valid RFC 3339.")
        .with_timezone(&Utc);

    assert!(before.timestamp_millis() <= subscribed_at.timestamp_millis());
    assert!(subscribed_at.timestamp_millis() <= after.timestamp_millis());
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn subscribe_appends_to_an_existing_file_without_touching_the_header() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_subscription(&json!({ "email": "a@example.com" }))
        .await;
    let response = test_app
        .post_subscription(&json!({ "email": "b@example.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());

    let content = test_app.read_subscribers_file();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "email,subscribed_at");
    assert!(lines[1].starts_with("a@example.com,"));
    assert!(lines[2].starts_with("b@example.com,"));
}

#[tokio::test]
async fn subscribe_does_not_deduplicate_emails() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_subscription(&json!({ "email": "frank@test.com" }))
        .await;
    test_app
        .post_subscription(&json!({ "email": "frank@test.com" }))
        .await;

    let content = test_app.read_subscribers_file();
    let rows = content
        .lines()
        .filter(|line| line.starts_with("frank@test.com,"))
        .count();

    assert_eq!(rows, 2);
}

#[tokio::test]
async fn concurrent_subscriptions_write_one_header_and_intact_rows() {
    let test_app = TestApp::spawn_app().await;
    let url = format!("{}/subscriptions", test_app.address);
    let request_count = 20;

    let mut handles = Vec::new();
    for i in 0..request_count {
        let url = url.clone();

        handles.push(tokio::spawn(async move {
            let client = reqwest::Client::new();
            let response = client
                .post(&url)
                .json(&json!({ "email": format!("user{}@test.com", i) }))
                .send()
                .await
                .expect("Failed to execute request.");

            assert_eq!(200, response.status().as_u16());
        }));
    }
    for handle in handles {
        handle.await.expect("Request task failed.");
    }

    let content = test_app.read_subscribers_file();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), request_count + 1);
    assert_eq!(lines[0], "email,subscribed_at");

    let header_count = lines
        .iter()
        .filter(|line| **line == "email,subscribed_at")
        .count();

    assert_eq!(header_count, 1);

    // Every row must be a well-formed email,timestamp pair, no interleaving
    for row in &lines[1..] {
        let (email, timestamp) = row.split_once(',').expect("Row is not comma separated.");

        assert!(email.starts_with("user") && email.ends_with("@test.com"));
        DateTime::parse_from_rfc3339(timestamp).expect("Timestamp is not valid RFC 3339.");
    }
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_missing() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases: Vec<(Value, &str)> = vec![
        (json!({}), "missing email parameter"),
        (json!({ "email": "" }), "empty email parameter"),
        (json!({ "email": null }), "null email parameter"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscription(&invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );

        let body: Value = response.json().await.expect("Failed to parse body.");

        assert_eq!(body, json!({ "error": "Email required" }));
    }

    assert!(!test_app.subscribers_file_exists());
}

#[tokio::test]
async fn subscribe_returns_405_for_non_post_requests() {
    let test_app = TestApp::spawn_app().await;
    let client = reqwest::Client::new();
    let url = format!("{}/subscriptions", test_app.address);

    let response = client
        .get(&url)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(405, response.status().as_u16());
    assert_eq!(Some(0), response.content_length());
    assert!(!test_app.subscribers_file_exists());
}

#[tokio::test]
async fn subscribe_rejects_a_malformed_body() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_subscription_raw(String::from("this is not json"))
        .await;

    assert!(response.status().is_client_error());
    assert!(!test_app.subscribers_file_exists());
}
