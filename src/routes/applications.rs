use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::application::{
    accepts_applications, Application, ApplicationReview, ApplicationStatus, NewApplication,
    NewApplicationBody,
};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::notification::directory::decode_error;
use crate::notification::{MailDispatcher, TemplateGenerator};
use crate::routes::api_response::ApiResponse;
use crate::routes::errors::error_chain_fmt;
use crate::routes::jobs::fetch_job;
use crate::startup::AdminEmail;

#[derive(thiserror::Error)]
pub enum ApplicationError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("This job is no longer accepting applications")]
    ClosedJob,
    #[error("You have already applied for this position")]
    AlreadyApplied,
    #[error("Failed to access the applications table.")]
    DatabaseError(#[from] sqlx::Error),
}

impl std::fmt::Debug for ApplicationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ApplicationError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApplicationError::ValidationError(_)
            | ApplicationError::ClosedJob
            | ApplicationError::AlreadyApplied => StatusCode::BAD_REQUEST,
            ApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
            ApplicationError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        ApiResponse::failure(self.to_string()).respond(self.status_code())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub job_id: Option<Uuid>,
}

/// Stores the application, then acknowledges it to the candidate and alerts the staff inbox.
/// Neither email delays nor fails the request.
#[tracing::instrument(
    name = "Submitting a job application handler",
    skip(body, db_pool, dispatcher, templates, admin_email),
    fields(job_id = %body.job_id)
)]
pub async fn handle_submit_application(
    body: web::Json<NewApplicationBody>,
    db_pool: web::Data<PgPool>,
    dispatcher: web::Data<MailDispatcher>,
    templates: web::Data<TemplateGenerator>,
    admin_email: web::Data<AdminEmail>,
) -> Result<HttpResponse, ApplicationError> {
    let new_application: NewApplication =
        body.try_into().map_err(ApplicationError::ValidationError)?;
    let job = fetch_job(&db_pool, new_application.job_id)
        .await?
        .ok_or(ApplicationError::NotFound("Job"))?;

    if !accepts_applications(&job, Utc::now().date_naive()) {
        return Err(ApplicationError::ClosedJob);
    }

    let application = insert_application(&db_pool, &new_application, &job.title)
        .await?
        .ok_or(ApplicationError::AlreadyApplied)?;

    dispatcher.send_in_background(
        application.email.clone(),
        templates.application_received(&application, &job.location),
    );
    dispatcher.send_in_background(
        admin_email.0.clone(),
        templates.application_alert(&application, &job.location),
    );

    Ok(ApiResponse::data(application)
        .with_message("Application submitted successfully")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Listing job applications handler", skip(db_pool))]
pub async fn handle_list_applications(
    filter: web::Query<ApplicationFilter>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApplicationError> {
    let status = filter.status.map(|status| status.as_ref().to_string());
    let applications = sqlx::query(
        r#"
        SELECT id, job_id, job_title, full_name, email, phone, address, resume, cover_letter,
            status, admin_notes, applied_at, updated_at
        FROM applications
        WHERE ($1::text IS NULL OR status = $1) AND ($2::uuid IS NULL OR job_id = $2)
        ORDER BY applied_at DESC
        "#,
    )
    .bind(status)
    .bind(filter.job_id)
    .try_map(|row: PgRow| parse_application_row(&row))
    .fetch_all(db_pool.get_ref())
    .await?;

    Ok(ApiResponse::list(applications).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Fetching a job application handler", skip(db_pool))]
pub async fn handle_get_application(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApplicationError> {
    let application = fetch_application(&db_pool, path.into_inner())
        .await?
        .ok_or(ApplicationError::NotFound("Application"))?;

    Ok(ApiResponse::data(application).respond(StatusCode::OK))
}

/// Records the staff review. A status change is announced to the candidate.
#[tracing::instrument(
    name = "Reviewing a job application handler",
    skip(body, db_pool, dispatcher, templates)
)]
pub async fn handle_review_application(
    path: web::Path<Uuid>,
    body: web::Json<ApplicationReview>,
    db_pool: web::Data<PgPool>,
    dispatcher: web::Data<MailDispatcher>,
    templates: web::Data<TemplateGenerator>,
) -> Result<HttpResponse, ApplicationError> {
    let mut application = fetch_application(&db_pool, path.into_inner())
        .await?
        .ok_or(ApplicationError::NotFound("Application"))?;
    let status_changed = application.apply(body.into_inner()).is_some();
    let application = update_application(&db_pool, &application).await?;

    if status_changed {
        if let Some(email) = templates.application_status(&application) {
            dispatcher.send_in_background(application.email.clone(), email);
        }
    }

    Ok(ApiResponse::data(application)
        .with_message("Application updated successfully")
        .respond(StatusCode::OK))
}

#[tracing::instrument(name = "Deleting a job application handler", skip(db_pool))]
pub async fn handle_delete_application(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ApplicationError> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1")
        .bind(path.into_inner())
        .execute(db_pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApplicationError::NotFound("Application"));
    }

    Ok(ApiResponse::message("Application deleted successfully").respond(StatusCode::OK))
}

/// Yields `None` when the candidate already applied to this job.
#[tracing::instrument(
    name = "Insert a job application into the database",
    skip(db_pool, new_application)
)]
async fn insert_application(
    db_pool: &PgPool,
    new_application: &NewApplication,
    job_title: &str,
) -> Result<Option<Application>, sqlx::Error> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO applications (id, job_id, job_title, full_name, email, phone, address,
            resume, cover_letter, status, applied_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10, $10)
        ON CONFLICT (job_id, email) DO NOTHING
        RETURNING id, job_id, job_title, full_name, email, phone, address, resume, cover_letter,
            status, admin_notes, applied_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_application.job_id)
    .bind(job_title)
    .bind(new_application.full_name.as_ref())
    .bind(new_application.email.as_ref())
    .bind(new_application.phone.as_ref())
    .bind(new_application.address.as_ref())
    .bind(new_application.resume.as_ref())
    .bind(new_application.cover_letter.as_ref())
    .bind(now)
    .try_map(|row: PgRow| parse_application_row(&row))
    .fetch_optional(db_pool)
    .await
}

#[tracing::instrument(name = "Fetching a job application from the database", skip(db_pool))]
async fn fetch_application(
    db_pool: &PgPool,
    id: Uuid,
) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, job_id, job_title, full_name, email, phone, address, resume, cover_letter,
            status, admin_notes, applied_at, updated_at
        FROM applications WHERE id = $1
        "#,
    )
    .bind(id)
    .try_map(|row: PgRow| parse_application_row(&row))
    .fetch_optional(db_pool)
    .await
}

#[tracing::instrument(
    name = "Updating a job application in the database",
    skip(db_pool, application)
)]
async fn update_application(
    db_pool: &PgPool,
    application: &Application,
) -> Result<Application, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE applications
        SET status = $2, admin_notes = $3, updated_at = $4
        WHERE id = $1
        RETURNING id, job_id, job_title, full_name, email, phone, address, resume, cover_letter,
            status, admin_notes, applied_at, updated_at
        "#,
    )
    .bind(application.id)
    .bind(application.status.as_ref())
    .bind(application.admin_notes.as_deref())
    .bind(Utc::now())
    .try_map(|row: PgRow| parse_application_row(&row))
    .fetch_one(db_pool)
    .await
}

fn parse_application_row(row: &PgRow) -> Result<Application, sqlx::Error> {
    Ok(Application {
        id: row.try_get("id")?,
        job_id: row.try_get("job_id")?,
        job_title: row.try_get("job_title")?,
        full_name: row.try_get("full_name")?,
        email: SubscriberEmail::parse(row.try_get("email")?).map_err(decode_error)?,
        phone: row.try_get("phone")?,
        address: row.try_get("address")?,
        resume: row.try_get("resume")?,
        cover_letter: row.try_get("cover_letter")?,
        status: ApplicationStatus::parse(row.try_get("status")?).map_err(decode_error)?,
        admin_notes: row.try_get("admin_notes")?,
        applied_at: row.try_get("applied_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
