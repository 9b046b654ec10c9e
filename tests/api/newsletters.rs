use serde_json::json;
use sqlx::Row;

use crate::helpers::{body_json, email_recipient, TestApp};

#[tokio::test]
async fn subscribe_returns_201_for_a_new_address() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;

    let response = test_app
        .post_subscribe(json!({ "email": "Awa@Example.com", "name": "Awa" }))
        .await;

    assert_eq!(201, response.status().as_u16());
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "awa@example.com");
}

#[tokio::test]
async fn subscribe_persists_the_lowercased_address() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;

    test_app
        .post_subscribe(json!({ "email": "Awa@Example.com", "name": "Awa" }))
        .await;

    let row = sqlx::query("SELECT email, name, subscribed FROM subscriptions")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Query to fetch subscriptions failed.");

    assert_eq!(row.get::<String, _>("email"), "awa@example.com");
    assert_eq!(row.get::<Option<String>, _>("name").as_deref(), Some("Awa"));
    assert!(row.get::<bool, _>("subscribed"));
}

#[tokio::test]
async fn subscribe_sends_a_welcome_email() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;

    test_app
        .post_subscribe(json!({ "email": "awa@example.com" }))
        .await;

    let received = test_app.wait_for_emails(1).await;
    assert_eq!(received.len(), 1);
    assert_eq!(email_recipient(&received[0]), "awa@example.com");
}

#[tokio::test]
async fn subscribe_succeeds_even_if_the_welcome_email_fails() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(500).await;

    let response = test_app
        .post_subscribe(json!({ "email": "awa@example.com" }))
        .await;

    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn subscribe_returns_400_when_already_subscribed() {
    let test_app = TestApp::spawn_app().await;
    test_app.insert_subscriber("awa@example.com", true).await;

    let response = test_app
        .post_subscribe(json!({ "email": "awa@example.com" }))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email already subscribed");
}

#[tokio::test]
async fn subscribe_returns_200_when_resubscribing() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    test_app.insert_subscriber("awa@example.com", false).await;

    let response = test_app
        .post_subscribe(json!({ "email": "awa@example.com", "name": "Awa" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let row = sqlx::query("SELECT name, subscribed, unsubscribed_at FROM subscriptions")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Query to fetch subscriptions failed.");
    assert!(row.get::<bool, _>("subscribed"));
    assert_eq!(row.get::<Option<String>, _>("name").as_deref(), Some("Awa"));
    assert!(row
        .get::<Option<chrono::DateTime<chrono::Utc>>, _>("unsubscribed_at")
        .is_none());
}

#[tokio::test]
async fn subscribe_returns_400_when_body_is_present_but_not_valid() {
    let test_app = TestApp::spawn_app().await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases = vec![
        (json!({}), "missing email parameter"),
        (json!({ "email": "" }), "empty email parameter"),
        (json!({ "email": "test.com" }), "invalid email parameter"),
        (
            json!({ "email": "test@test.com", "name": "{Frank}" }),
            "invalid name parameter",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscribe(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn unsubscribe_marks_the_address_as_unsubscribed() {
    let test_app = TestApp::spawn_app().await;
    test_app.insert_subscriber("awa@example.com", true).await;

    let response = test_app
        .post_json("/newsletters/unsubscribe", &json!({ "email": "AWA@example.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let row = sqlx::query("SELECT subscribed, unsubscribed_at FROM subscriptions")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Query to fetch subscriptions failed.");
    assert!(!row.get::<bool, _>("subscribed"));
    assert!(row
        .get::<Option<chrono::DateTime<chrono::Utc>>, _>("unsubscribed_at")
        .is_some());
}

#[tokio::test]
async fn unsubscribe_returns_404_for_an_unknown_address() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_json("/newsletters/unsubscribe", &json!({ "email": "nobody@example.com" }))
        .await;

    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn subscribers_can_be_filtered_by_status() {
    let test_app = TestApp::spawn_app().await;
    test_app.insert_subscriber("a@x.com", true).await;
    test_app.insert_subscriber("b@x.com", false).await;

    let all = body_json(test_app.get("/newsletters").await).await;
    let subscribed = body_json(test_app.get("/newsletters?subscribed=true").await).await;
    let unsubscribed = body_json(test_app.get("/newsletters?subscribed=false").await).await;
    let public = body_json(test_app.get("/newsletters/public").await).await;

    assert_eq!(all["count"], 2);
    assert_eq!(subscribed["count"], 1);
    assert_eq!(subscribed["data"][0]["email"], "a@x.com");
    assert_eq!(unsubscribed["data"][0]["email"], "b@x.com");
    assert_eq!(public["count"], 1);
}

#[tokio::test]
async fn deleting_a_subscriber_removes_it() {
    let test_app = TestApp::spawn_app().await;
    test_app.insert_subscriber("a@x.com", true).await;
    let id: uuid::Uuid = sqlx::query("SELECT id FROM subscriptions")
        .fetch_one(&test_app.db_pool)
        .await
        .expect("Query to fetch subscriptions failed.")
        .get("id");

    let first = test_app.delete(&format!("/newsletters/{}", id)).await;
    let second = test_app.delete(&format!("/newsletters/{}", id)).await;

    assert_eq!(200, first.status().as_u16());
    assert_eq!(404, second.status().as_u16());
}

#[tokio::test]
async fn concurrent_subscribes_of_one_address_store_it_once() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    let client = reqwest::Client::new();
    let endpoint = format!("{}/newsletters/subscribe", test_app.address);

    let mut requests = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let request = client.post(&endpoint).json(&json!({ "email": "race@x.com" }));
        requests.spawn(async move {
            request
                .send()
                .await
                .expect("Failed to execute request.")
                .status()
                .as_u16()
        });
    }
    let mut statuses = Vec::new();
    while let Some(status) = requests.join_next().await {
        statuses.push(status.expect("Subscribe request panicked."));
    }
    statuses.sort();

    assert_eq!(statuses, vec![201, 400, 400, 400, 400, 400, 400, 400, 400, 400]);
    let stored = sqlx::query("SELECT id FROM subscriptions")
        .fetch_all(&test_app.db_pool)
        .await
        .expect("Query to fetch subscriptions failed.");
    assert_eq!(stored.len(), 1);
}
