use serde_json::json;

use crate::helpers::{body_json, TestApp};

fn partner_body() -> serde_json::Value {
    json!({
        "name": "Water Aid",
        "logo": "https://media.example/wateraid.png",
        "website": "https://wateraid.example",
        "category": "funding",
        "partnershipStartDate": "2019-03-01"
    })
}

#[tokio::test]
async fn create_partner_applies_defaults() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_json(
            "/partners",
            &json!({ "name": "Commune de Mopti", "logo": "https://media.example/mopti.png" }),
        )
        .await;

    assert_eq!(201, response.status().as_u16());
    let partner = body_json(response).await["data"].clone();
    assert_eq!(partner["category"], "other");
    assert_eq!(partner["active"], true);
}

#[tokio::test]
async fn create_partner_returns_400_without_a_logo() {
    let test_app = TestApp::spawn_app().await;
    let mut body = partner_body();
    body["logo"] = json!("");

    let response = test_app.post_json("/partners", &body).await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn partners_can_be_filtered_by_category_and_activity() {
    let test_app = TestApp::spawn_app().await;
    test_app.post_json("/partners", &partner_body()).await;
    let mut inactive = partner_body();
    inactive["active"] = json!(false);
    test_app.post_json("/partners", &inactive).await;
    let mut technical = partner_body();
    technical["category"] = json!("technical");
    test_app.post_json("/partners", &technical).await;

    let funding = body_json(test_app.get("/partners?category=funding").await).await;
    let active_funding =
        body_json(test_app.get("/partners?category=funding&active=true").await).await;

    assert_eq!(funding["count"], 2);
    assert_eq!(active_funding["count"], 1);
}

#[tokio::test]
async fn update_clears_the_partnership_start_date_sent_as_null() {
    let test_app = TestApp::spawn_app().await;
    let created = body_json(test_app.post_json("/partners", &partner_body()).await).await;
    let endpoint = format!("/partners/{}", created["data"]["id"].as_str().unwrap());

    let response = test_app
        .put_json(
            &endpoint,
            &json!({ "partnershipStartDate": null, "active": false }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let partner = body_json(response).await["data"].clone();
    assert_eq!(partner["partnershipStartDate"], serde_json::Value::Null);
    assert_eq!(partner["active"], false);
    assert_eq!(partner["category"], "funding");
}

#[tokio::test]
async fn deleted_partner_is_gone() {
    let test_app = TestApp::spawn_app().await;
    let created = body_json(test_app.post_json("/partners", &partner_body()).await).await;
    let endpoint = format!("/partners/{}", created["data"]["id"].as_str().unwrap());

    let response = test_app.delete(&endpoint).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(404, test_app.get(&endpoint).await.status().as_u16());
    assert_eq!(404, test_app.delete(&endpoint).await.status().as_u16());
}
