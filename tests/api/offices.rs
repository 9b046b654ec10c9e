use serde_json::json;

use crate::helpers::{body_json, TestApp};

fn office_body() -> serde_json::Value {
    json!({
        "name": "Mopti regional office",
        "type": "regional",
        "address": { "street": "Rue 12", "city": "Mopti", "country": "Mali" },
        "contact": { "phone": "+223 21 43 00 00", "email": "Mopti@Imadel.org" },
        "coordinates": { "latitude": 14.49, "longitude": -4.19 }
    })
}

#[tokio::test]
async fn create_office_keeps_its_address_and_contact() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.post_json("/offices", &office_body()).await;

    assert_eq!(201, response.status().as_u16());
    let office = body_json(response).await["data"].clone();
    assert_eq!(office["type"], "regional");
    assert_eq!(office["address"]["city"], "Mopti");
    assert_eq!(office["contact"]["email"], "mopti@imadel.org");
    assert_eq!(office["coordinates"]["latitude"], 14.49);
    assert_eq!(office["active"], true);
}

#[tokio::test]
async fn create_office_returns_400_for_out_of_range_coordinates() {
    let test_app = TestApp::spawn_app().await;
    let mut body = office_body();
    body["coordinates"]["longitude"] = json!(-204.19);

    let response = test_app.post_json("/offices", &body).await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn offices_can_be_filtered_by_type_and_activity() {
    let test_app = TestApp::spawn_app().await;
    test_app.post_json("/offices", &office_body()).await;
    let mut closed = office_body();
    closed["active"] = json!(false);
    test_app.post_json("/offices", &closed).await;
    test_app
        .post_json("/offices", &json!({ "name": "Bamako headquarters", "type": "headquarters" }))
        .await;

    let regional = body_json(test_app.get("/offices?type=regional&active=true").await).await;
    let all = body_json(test_app.get("/offices").await).await;

    assert_eq!(regional["count"], 1);
    assert_eq!(all["count"], 3);
}

#[tokio::test]
async fn update_removes_coordinates_sent_as_null() {
    let test_app = TestApp::spawn_app().await;
    let created = body_json(test_app.post_json("/offices", &office_body()).await).await;
    let endpoint = format!("/offices/{}", created["data"]["id"].as_str().unwrap());

    let response = test_app
        .put_json(&endpoint, &json!({ "coordinates": null }))
        .await;

    assert_eq!(200, response.status().as_u16());
    let office = body_json(response).await["data"].clone();
    assert_eq!(office["coordinates"], serde_json::Value::Null);
    assert_eq!(office["address"]["city"], "Mopti");
}

#[tokio::test]
async fn unknown_office_returns_404() {
    let test_app = TestApp::spawn_app().await;
    let created = body_json(test_app.post_json("/offices", &office_body()).await).await;
    let endpoint = format!("/offices/{}", created["data"]["id"].as_str().unwrap());
    test_app.delete(&endpoint).await;

    let response = test_app.get(&endpoint).await;

    assert_eq!(404, response.status().as_u16());
    assert_eq!(body_json(response).await["message"], "Office not found");
}
