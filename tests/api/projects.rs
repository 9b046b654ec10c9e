use serde_json::json;

use crate::helpers::{body_json, TestApp};

fn project_body() -> serde_json::Value {
    json!({
        "title": "Clean water for Ségou",
        "description": "Boreholes and hygiene training",
        "images": ["https://cdn.example/borehole.jpg"],
        "areasOfIntervention": ["Water", "Hygiene"],
        "startDate": "2024-01-01",
        "endDate": "2024-12-31"
    })
}

#[tokio::test]
async fn create_project_applies_defaults() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.post_json("/projects", &project_body()).await;

    assert_eq!(201, response.status().as_u16());
    let project = body_json(response).await["data"].clone();
    assert_eq!(project["category"], "current");
    assert_eq!(project["status"], "active");
    assert_eq!(project["areasOfIntervention"], json!(["Water", "Hygiene"]));
}

#[tokio::test]
async fn create_project_returns_400_when_it_ends_before_it_starts() {
    let test_app = TestApp::spawn_app().await;
    let mut body = project_body();
    body["endDate"] = json!("2023-01-01");

    let response = test_app.post_json("/projects", &body).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn project_can_be_fetched_updated_and_deleted() {
    let test_app = TestApp::spawn_app().await;
    let project =
        body_json(test_app.post_json("/projects", &project_body()).await).await["data"].clone();
    let endpoint = format!("/projects/{}", project["id"].as_str().unwrap());

    assert_eq!(200, test_app.get(&endpoint).await.status().as_u16());

    let updated = body_json(
        test_app
            .put_json(&endpoint, &json!({ "status": "completed", "location": "Ségou" }))
            .await,
    )
    .await;
    assert_eq!(updated["data"]["status"], "completed");
    assert_eq!(updated["data"]["location"], "Ségou");

    assert_eq!(200, test_app.delete(&endpoint).await.status().as_u16());
    assert_eq!(404, test_app.delete(&endpoint).await.status().as_u16());
}

#[tokio::test]
async fn projects_can_be_filtered_by_publication() {
    let test_app = TestApp::spawn_app().await;
    let mut draft = project_body();
    draft["published"] = json!(false);
    test_app.post_json("/projects", &project_body()).await;
    test_app.post_json("/projects", &draft).await;

    let published = body_json(test_app.get("/projects?published=true").await).await;
    let drafts = body_json(test_app.get("/projects?published=false").await).await;

    assert_eq!(published["count"], 1);
    assert_eq!(drafts["count"], 1);
}

#[tokio::test]
async fn update_clears_a_date_sent_as_null() {
    let test_app = TestApp::spawn_app().await;
    let project =
        body_json(test_app.post_json("/projects", &project_body()).await).await["data"].clone();
    let endpoint = format!("/projects/{}", project["id"].as_str().unwrap());

    let updated = body_json(test_app.put_json(&endpoint, &json!({ "endDate": null })).await).await;

    assert_eq!(updated["data"]["endDate"], serde_json::Value::Null);
    assert_eq!(updated["data"]["startDate"], "2024-01-01");
}
