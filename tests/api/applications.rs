use serde_json::json;
use uuid::Uuid;

use crate::helpers::{body_json, email_body, email_recipient, TestApp};

async fn create_job(test_app: &TestApp, deadline: &str, status: &str) -> String {
    let response = test_app
        .post_json(
            "/jobs",
            &json!({
                "title": "Field Officer",
                "description": "Coordinate water projects",
                "location": "Mopti",
                "deadline": deadline,
                "status": status
            }),
        )
        .await;
    assert_eq!(201, response.status().as_u16());

    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

fn application_body(job_id: &str) -> serde_json::Value {
    json!({
        "jobId": job_id,
        "fullName": "Awa Traoré",
        "email": "Awa@Example.com",
        "phone": "+223 70 00 00 00",
        "address": "Bamako",
        "resume": "https://media.example/cv.pdf",
        "coverLetter": "I coordinated three borehole projects."
    })
}

async fn submit(test_app: &TestApp, job_id: &str) -> serde_json::Value {
    let response = test_app
        .post_json("/applications", &application_body(job_id))
        .await;
    assert_eq!(201, response.status().as_u16());

    body_json(response).await["data"].clone()
}

#[tokio::test]
async fn submitting_an_application_stores_it_as_pending() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    let job_id = create_job(&test_app, "2099-12-31", "open").await;

    let application = submit(&test_app, &job_id).await;

    assert_eq!(application["jobTitle"], "Field Officer");
    assert_eq!(application["email"], "awa@example.com");
    assert_eq!(application["status"], "pending");
}

#[tokio::test]
async fn submitting_an_application_emails_the_candidate_and_the_staff() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    let job_id = create_job(&test_app, "2099-12-31", "open").await;

    submit(&test_app, &job_id).await;

    let received = test_app.wait_for_emails(2).await;
    let mut recipients: Vec<String> = received.iter().map(email_recipient).collect();
    recipients.sort();
    let mut expected = vec![
        String::from("awa@example.com"),
        test_app.config.notification.admin_email.clone(),
    ];
    expected.sort();
    assert_eq!(recipients, expected);
    assert_eq!(test_app.emails_after_a_while().await.len(), 2);
}

#[tokio::test]
async fn application_is_stored_even_if_the_emails_fail() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(500).await;
    let job_id = create_job(&test_app, "2099-12-31", "open").await;

    let response = test_app
        .post_json("/applications", &application_body(&job_id))
        .await;

    assert_eq!(201, response.status().as_u16());
}

#[tokio::test]
async fn applying_twice_to_the_same_job_returns_400() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    let job_id = create_job(&test_app, "2099-12-31", "open").await;
    submit(&test_app, &job_id).await;

    let response = test_app
        .post_json("/applications", &application_body(&job_id))
        .await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        body_json(response).await["message"],
        "You have already applied for this position"
    );
}

#[tokio::test]
async fn closed_or_expired_jobs_refuse_applications() {
    let test_app = TestApp::spawn_app().await;
    let expired = create_job(&test_app, "2020-01-31", "open").await;
    let filled = create_job(&test_app, "2099-12-31", "filled").await;

    for job_id in [expired, filled] {
        let response = test_app
            .post_json("/applications", &application_body(&job_id))
            .await;

        assert_eq!(400, response.status().as_u16());
        assert_eq!(
            body_json(response).await["message"],
            "This job is no longer accepting applications"
        );
    }
}

#[tokio::test]
async fn applying_to_an_unknown_job_returns_404() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_json("/applications", &application_body(&Uuid::new_v4().to_string()))
        .await;

    assert_eq!(404, response.status().as_u16());
    assert_eq!(body_json(response).await["message"], "Job not found");
}

#[tokio::test]
async fn missing_applicant_fields_return_400() {
    let test_app = TestApp::spawn_app().await;
    let job_id = create_job(&test_app, "2099-12-31", "open").await;
    let mut body = application_body(&job_id);
    body["coverLetter"] = json!(" ");

    let response = test_app.post_json("/applications", &body).await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn moving_an_application_forward_emails_the_candidate() {
    let test_app = TestApp::spawn_app().await;
    let job_id = create_job(&test_app, "2099-12-31", "open").await;
    let application = submit(&test_app, &job_id).await;
    let endpoint = format!("/applications/{}", application["id"].as_str().unwrap());
    test_app.wait_for_emails(2).await;
    test_app.email_server.reset().await;
    test_app.mount_email_provider(200).await;

    let response = test_app
        .put_json(
            &endpoint,
            &json!({ "status": "shortlisted", "adminNotes": "Strong field experience" }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["status"], "shortlisted");
    assert_eq!(updated["adminNotes"], "Strong field experience");
    let received = test_app.wait_for_emails(1).await;
    assert_eq!(received.len(), 1);
    assert_eq!(email_recipient(&received[0]), "awa@example.com");
    assert!(email_body(&received[0])["subject"]
        .as_str()
        .unwrap()
        .starts_with("Congratulations"));
}

#[tokio::test]
async fn notes_without_a_status_change_send_nothing() {
    let test_app = TestApp::spawn_app().await;
    let job_id = create_job(&test_app, "2099-12-31", "open").await;
    let application = submit(&test_app, &job_id).await;
    let endpoint = format!("/applications/{}", application["id"].as_str().unwrap());
    test_app.wait_for_emails(2).await;
    test_app.email_server.reset().await;
    test_app.mount_email_provider(200).await;

    let response = test_app
        .put_json(&endpoint, &json!({ "adminNotes": "Call back next week" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert!(test_app.emails_after_a_while().await.is_empty());
}

#[tokio::test]
async fn applications_can_be_filtered_fetched_and_deleted() {
    let test_app = TestApp::spawn_app().await;
    test_app.mount_email_provider(200).await;
    let job_id = create_job(&test_app, "2099-12-31", "open").await;
    let other_job_id = create_job(&test_app, "2099-12-31", "open").await;
    let application = submit(&test_app, &job_id).await;
    submit(&test_app, &other_job_id).await;
    let endpoint = format!("/applications/{}", application["id"].as_str().unwrap());

    let for_job = body_json(test_app.get(&format!("/applications?jobId={}", job_id)).await).await;
    let shortlisted = body_json(test_app.get("/applications?status=shortlisted").await).await;

    assert_eq!(for_job["count"], 1);
    assert_eq!(shortlisted["count"], 0);
    assert_eq!(200, test_app.get(&endpoint).await.status().as_u16());
    assert_eq!(200, test_app.delete(&endpoint).await.status().as_u16());
    assert_eq!(404, test_app.get(&endpoint).await.status().as_u16());
}
