use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{body_json, email_body, email_recipient, TestApp};

fn news_body(is_published: bool) -> serde_json::Value {
    json!({
        "title": "Water Project Launch",
        "description": "A new borehole in Ségou",
        "author": "A",
        "date": "2024-03-12",
        "isPublished": is_published
    })
}

#[tokio::test]
async fn creating_published_news_emails_every_subscribed_address() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    test_app.insert_subscriber("a@x.com", true).await;
    test_app.insert_subscriber("b@x.com", true).await;
    test_app.insert_subscriber("gone@x.com", false).await;

    let response = test_app.post_json("/news", &news_body(true)).await;

    assert_eq!(201, response.status().as_u16());
    let received = test_app.wait_for_emails(2).await;
    let mut recipients: Vec<String> = received.iter().map(email_recipient).collect();
    recipients.sort();
    assert_eq!(recipients, vec!["a@x.com", "b@x.com"]);
    // A late delivery to the unsubscribed address would show up here
    assert_eq!(test_app.emails_after_a_while().await.len(), 2);

    let email = email_body(&received[0]);
    let organisation = &test_app.config.notification.organisation_name;
    assert_eq!(email["subject"], "Latest News: Water Project Launch");
    let html = email["content"][0]["value"].as_str().unwrap();
    assert!(html.contains(&format!("Latest News from {}", organisation)));
    assert!(html.contains("12 March 2024"));
}

#[tokio::test]
async fn a_failing_delivery_does_not_stop_the_others_nor_the_creation() {
    let test_app = TestApp::spawn_app().await;
    test_app.insert_subscriber("a@x.com", true).await;
    test_app.insert_subscriber("b@x.com", true).await;
    // Mounted first so it takes precedence over the catch-all below
    Mock::given(path("/mail/send"))
        .and(method("POST"))
        .and(body_string_contains("b@x.com"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.email_server)
        .await;
    test_app.mount_email_provider(200).await;

    let response = test_app.post_json("/news", &news_body(true)).await;

    assert_eq!(201, response.status().as_u16());
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Water Project Launch");
    assert_eq!(test_app.wait_for_emails(2).await.len(), 2);
}

#[tokio::test]
async fn creating_a_draft_sends_nothing() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    test_app.insert_subscriber("a@x.com", true).await;

    let response = test_app.post_json("/news", &news_body(false)).await;

    assert_eq!(201, response.status().as_u16());
    assert!(test_app.emails_after_a_while().await.is_empty());
}

#[tokio::test]
async fn publishing_through_an_update_sends_nothing() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    test_app.insert_subscriber("a@x.com", true).await;
    let draft = body_json(test_app.post_json("/news", &news_body(false)).await).await;
    let endpoint = format!("/news/{}", draft["data"]["id"].as_str().unwrap());

    let response = test_app
        .put_json(&endpoint, &json!({ "isPublished": true, "title": "Updated" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert!(test_app.emails_after_a_while().await.is_empty());
}

#[tokio::test]
async fn creation_succeeds_when_nobody_is_subscribed() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;

    let response = test_app
        .post_json(
            "/projects",
            &json!({ "title": "Clean water", "description": "Boreholes" }),
        )
        .await;

    assert_eq!(201, response.status().as_u16());
    assert!(test_app.emails_after_a_while().await.is_empty());
}

#[tokio::test]
async fn preview_renders_the_email_without_sending_it() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    let news = body_json(test_app.post_json("/news", &news_body(false)).await).await;
    let id = news["data"]["id"].as_str().unwrap();

    let response = test_app
        .get(&format!("/notifications/preview/news/{}", id))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|value| value.to_str().ok()),
        Some("text/html; charset=utf-8")
    );
    let html = response.text().await.unwrap();
    assert!(html.contains("Read the Article"));
    assert!(html.contains(&format!("/news/{}", id)));
    assert!(test_app.emails_after_a_while().await.is_empty());
}

#[tokio::test]
async fn preview_rejects_an_unknown_content_type() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .get(&format!("/notifications/preview/event/{}", uuid::Uuid::new_v4()))
        .await;

    assert_eq!(400, response.status().as_u16());
    let body = body_json(response).await;
    assert_eq!(body["message"], "Unknown content type: event");
}

#[tokio::test]
async fn preview_returns_404_for_a_job_requested_as_a_proposal() {
    let test_app = TestApp::spawn_app().await;
    let job = body_json(
        test_app
            .post_json(
                "/jobs",
                &json!({
                    "title": "Field Officer",
                    "description": "Coordinate water projects",
                    "location": "Bamako",
                    "deadline": "2024-04-30",
                    "published": false
                }),
            )
            .await,
    )
    .await;
    let id = job["data"]["id"].as_str().unwrap();

    let as_job = test_app.get(&format!("/notifications/preview/job/{}", id)).await;
    let as_proposal = test_app
        .get(&format!("/notifications/preview/proposal/{}", id))
        .await;

    assert_eq!(200, as_job.status().as_u16());
    assert_eq!(404, as_proposal.status().as_u16());
}
