use serde_json::{json, Value};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

fn retailer_feed() -> Value {
    json!({
        "products": [
            {
                "product_id": "PLID123",
                "title": "55\" Smart TV",
                "url": "https://retailer.test/plid123",
                "price": "R 4,999",
                "list_price": "R 6,999",
                "image": "https://retailer.test/tv.jpg"
            },
            {
                "product_id": null,
                "title": "Untracked product",
                "url": "https://retailer.test/unknown",
                "price": "R 100"
            }
        ]
    })
}

async fn mount_retailer_feed(test_app: &TestApp) {
    Mock::given(method("GET"))
        .and(path("/all-deals.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(retailer_feed()))
        .mount(&test_app.retailer_server)
        .await;
}

#[tokio::test]
async fn refresh_ingests_deals_from_the_retailer_feed() {
    let test_app = TestApp::spawn_app().await;

    mount_retailer_feed(&test_app).await;

    let response = test_app.post_deals_refresh().await;

    assert_eq!(200, response.status().as_u16());

    let body: Value = response.json().await.expect("Failed to parse body.");

    assert_eq!(body, json!({ "inserted": 1 }));

    let deals: Vec<Value> = test_app
        .get_today_deals()
        .await
        .json()
        .await
        .expect("Failed to parse body.");

    assert_eq!(deals.len(), 1);
    assert_eq!(deals[0]["title"], "55\" Smart TV");
    assert_eq!(deals[0]["price"], "R 4,999");
    assert_eq!(deals[0]["orig_price"], "R 6,999");
    assert_eq!(deals[0]["category"], "Electronics");
    assert_eq!(deals[0]["is_new_low"], true);
}

#[tokio::test]
async fn refresh_ignores_deals_already_recorded_today() {
    let test_app = TestApp::spawn_app().await;

    mount_retailer_feed(&test_app).await;

    test_app.post_deals_refresh().await;
    let response = test_app.post_deals_refresh().await;

    let body: Value = response.json().await.expect("Failed to parse body.");

    assert_eq!(body, json!({ "inserted": 0 }));

    let deals: Vec<Value> = test_app
        .get_today_deals()
        .await
        .json()
        .await
        .expect("Failed to parse body.");

    assert_eq!(deals.len(), 1);
}

#[tokio::test]
async fn refresh_returns_500_when_the_feed_is_down() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&test_app.retailer_server)
        .await;

    let response = test_app.post_deals_refresh().await;

    assert_eq!(500, response.status().as_u16());
}

#[tokio::test]
async fn digest_is_delivered_to_all_subscribers() {
    let test_app = TestApp::spawn_app().await;

    test_app
        .post_subscription(&json!({ "email": "a@example.com" }))
        .await;
    test_app
        .post_subscription(&json!({ "email": "b@example.com" }))
        .await;

    mount_retailer_feed(&test_app).await;
    test_app.post_deals_refresh().await;

    Mock::given(method("POST"))
        .and(path("/mail/send"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.post_deals_digest().await;

    assert_eq!(200, response.status().as_u16());

    let received_requests = test_app.email_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received_requests[0].body).unwrap();

    assert_eq!(body["personalizations"].as_array().unwrap().len(), 2);
    assert!(body["content"][0]["value"]
        .as_str()
        .unwrap()
        .contains("55\" Smart TV"));
}

#[tokio::test]
async fn digest_sends_nothing_when_there_are_no_subscribers() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.post_deals_digest().await;

    assert_eq!(200, response.status().as_u16());
}
