use serde_json::json;

use crate::helpers::{body_json, TestApp};

fn news_body() -> serde_json::Value {
    json!({
        "title": "Water Project Launch",
        "description": "A new borehole in Ségou",
        "author": "A",
        "date": "2024-03-12"
    })
}

async fn create_news(test_app: &TestApp, body: serde_json::Value) -> serde_json::Value {
    let response = test_app.post_json("/news", &body).await;
    assert_eq!(201, response.status().as_u16());

    body_json(response).await["data"].clone()
}

#[tokio::test]
async fn create_news_returns_the_stored_record() {
    let test_app = TestApp::spawn_app().await;

    let news = create_news(&test_app, news_body()).await;

    assert_eq!(news["title"], "Water Project Launch");
    assert_eq!(news["date"], "2024-03-12");
    assert_eq!(news["isPublished"], true);
}

#[tokio::test]
async fn create_news_returns_400_when_a_required_field_is_blank() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (json!({ "title": " ", "description": "d", "author": "A" }), "blank title"),
        (json!({ "title": "t", "description": "", "author": "A" }), "blank description"),
        (json!({ "title": "t", "description": "d" }), "missing author"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_json("/news", &invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload was {}",
            error_message
        );
    }
}

#[tokio::test]
async fn published_listing_excludes_drafts() {
    let test_app = TestApp::spawn_app().await;
    create_news(&test_app, news_body()).await;
    let mut draft = news_body();
    draft["isPublished"] = json!(false);
    create_news(&test_app, draft).await;

    let all = body_json(test_app.get("/news").await).await;
    let published = body_json(test_app.get("/news/published").await).await;

    assert_eq!(all["count"], 2);
    assert_eq!(published["count"], 1);
}

#[tokio::test]
async fn news_can_be_fetched_updated_and_deleted() {
    let test_app = TestApp::spawn_app().await;
    let news = create_news(&test_app, news_body()).await;
    let endpoint = format!("/news/{}", news["id"].as_str().unwrap());

    let fetched = test_app.get(&endpoint).await;
    assert_eq!(200, fetched.status().as_u16());

    let updated = test_app
        .put_json(&endpoint, &json!({ "title": "Borehole inaugurated" }))
        .await;
    assert_eq!(200, updated.status().as_u16());
    let updated = body_json(updated).await;
    assert_eq!(updated["data"]["title"], "Borehole inaugurated");
    assert_eq!(updated["data"]["author"], "A");

    assert_eq!(200, test_app.delete(&endpoint).await.status().as_u16());
    assert_eq!(404, test_app.get(&endpoint).await.status().as_u16());
}

#[tokio::test]
async fn updating_with_a_blank_title_returns_400() {
    let test_app = TestApp::spawn_app().await;
    let news = create_news(&test_app, news_body()).await;

    let response = test_app
        .put_json(
            &format!("/news/{}", news["id"].as_str().unwrap()),
            &json!({ "title": "" }),
        )
        .await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn unknown_news_returns_404() {
    let test_app = TestApp::spawn_app().await;
    let endpoint = format!("/news/{}", uuid::Uuid::new_v4());

    assert_eq!(404, test_app.get(&endpoint).await.status().as_u16());
    assert_eq!(404, test_app.delete(&endpoint).await.status().as_u16());
    assert_eq!(
        404,
        test_app
            .put_json(&endpoint, &json!({ "title": "x" }))
            .await
            .status()
            .as_u16()
    );
}

#[tokio::test]
async fn create_news_with_a_missing_field_answers_with_the_json_envelope() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.post_json("/news", &json!({ "title": "x" })).await;

    assert_eq!(400, response.status().as_u16());
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("missing field `description`"));
}

#[tokio::test]
async fn malformed_id_returns_400_with_the_json_envelope() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get("/news/not-a-uuid").await;

    assert_eq!(400, response.status().as_u16());
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}
