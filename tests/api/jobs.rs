use serde_json::json;

use crate::helpers::{body_json, email_body, TestApp};

fn job_body() -> serde_json::Value {
    json!({
        "title": "Field Officer",
        "description": "Coordinate water projects",
        "location": "Bamako",
        "type": "full-time",
        "deadline": "2024-04-30",
        "salary": { "min": 150000, "max": 300000 }
    })
}

#[tokio::test]
async fn create_job_applies_defaults() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.post_json("/jobs", &job_body()).await;

    assert_eq!(201, response.status().as_u16());
    let job = body_json(response).await["data"].clone();
    assert_eq!(job["status"], "open");
    assert_eq!(job["listingType"], "job");
    assert_eq!(job["salary"]["currency"], "CFA");
    assert_eq!(job["published"], true);
}

#[tokio::test]
async fn create_job_returns_400_for_an_inverted_salary() {
    let test_app = TestApp::spawn_app().await;
    let mut body = job_body();
    body["salary"] = json!({ "min": 300000, "max": 150000 });

    let response = test_app.post_json("/jobs", &body).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn jobs_can_be_filtered_by_publication() {
    let test_app = TestApp::spawn_app().await;
    let mut draft = job_body();
    draft["published"] = json!(false);
    test_app.post_json("/jobs", &job_body()).await;
    test_app.post_json("/jobs", &draft).await;

    let all = body_json(test_app.get("/jobs").await).await;
    let published = body_json(test_app.get("/jobs?published=true").await).await;

    assert_eq!(all["count"], 2);
    assert_eq!(published["count"], 1);
}

#[tokio::test]
async fn proposal_creation_announces_a_call_for_proposals() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    test_app.insert_subscriber("a@x.com", true).await;
    let mut body = job_body();
    body["listingType"] = json!("proposal");
    body["budget"] = json!({ "max": 5000000 });

    let response = test_app.post_json("/jobs", &body).await;

    assert_eq!(201, response.status().as_u16());
    let received = test_app.wait_for_emails(1).await;
    assert_eq!(received.len(), 1);
    let email = email_body(&received[0]);
    assert_eq!(email["subject"], "New Call for Proposals: Field Officer");
    let html = email["content"][0]["value"].as_str().unwrap();
    assert!(html.contains("up to 5000000 CFA"));
    assert!(!html.contains("Salary"));
}

#[tokio::test]
async fn job_can_be_updated_and_deleted() {
    let test_app = TestApp::spawn_app().await;
    let job = body_json(test_app.post_json("/jobs", &job_body()).await).await["data"].clone();
    let endpoint = format!("/jobs/{}", job["id"].as_str().unwrap());

    let updated = body_json(
        test_app
            .put_json(&endpoint, &json!({ "status": "closed" }))
            .await,
    )
    .await;

    assert_eq!(updated["data"]["status"], "closed");
    assert_eq!(200, test_app.delete(&endpoint).await.status().as_u16());
    assert_eq!(404, test_app.get(&endpoint).await.status().as_u16());
}

#[tokio::test]
async fn malformed_query_string_returns_400_with_the_json_envelope() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get("/jobs?published=maybe").await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(body_json(response).await["success"], false);
}
