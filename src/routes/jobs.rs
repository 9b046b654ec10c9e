use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::amount_range::AmountRange;
use crate::domain::job::{Job, JobChanges, JobStatus, JobType, ListingType, NewJob, NewJobBody};
use crate::notification::directory::decode_error;
use crate::notification::PublishHook;
use crate::routes::api_response::ApiResponse;
use crate::routes::errors::ContentError;

#[derive(Debug, Deserialize)]
pub struct PublishedFilter {
    pub published: Option<bool>,
}

#[tracing::instrument(name = "Listing jobs handler", skip(db_pool))]
pub async fn handle_list_jobs(
    filter: web::Query<PublishedFilter>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let jobs = sqlx::query(
        r#"
        SELECT id, title, description, requirements, responsibilities, location, job_type,
            category, deadline, status, listing_type, salary_min, salary_max, salary_currency,
            budget_min, budget_max, budget_currency, published, created_at, updated_at
        FROM jobs
        WHERE ($1::boolean IS NULL OR published = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(filter.published)
    .try_map(|row: PgRow| parse_job_row(&row))
    .fetch_all(db_pool.get_ref())
    .await?;

    Ok(ApiResponse::list(jobs).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Fetching a job handler", skip(db_pool))]
pub async fn handle_get_job(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let job = fetch_job(&db_pool, path.into_inner())
        .await?
        .ok_or(ContentError::NotFound("Job"))?;

    Ok(ApiResponse::data(job).respond(StatusCode::OK))
}

#[tracing::instrument(
    name = "Creating a job handler",
    skip(body, db_pool, publish_hook),
    fields(job_title = %body.title)
)]
pub async fn handle_create_job(
    body: web::Json<NewJobBody>,
    db_pool: web::Data<PgPool>,
    publish_hook: web::Data<PublishHook>,
) -> Result<HttpResponse, ContentError> {
    let new_job: NewJob = body.try_into().map_err(ContentError::ValidationError)?;
    let (job, newly_created) = insert_job(&db_pool, &new_job).await?;

    publish_hook.trigger(job.clone().into(), newly_created);

    Ok(ApiResponse::data(job)
        .with_message("Job created successfully")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Updating a job handler", skip(body, db_pool))]
pub async fn handle_update_job(
    path: web::Path<Uuid>,
    body: web::Json<JobChanges>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let mut job = fetch_job(&db_pool, path.into_inner())
        .await?
        .ok_or(ContentError::NotFound("Job"))?;
    job.apply(body.into_inner())
        .map_err(ContentError::ValidationError)?;
    let job = update_job(&db_pool, &job).await?;

    Ok(ApiResponse::data(job)
        .with_message("Job updated successfully")
        .respond(StatusCode::OK))
}

#[tracing::instrument(name = "Deleting a job handler", skip(db_pool))]
pub async fn handle_delete_job(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(path.into_inner())
        .execute(db_pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ContentError::NotFound("Job"));
    }

    Ok(ApiResponse::message("Job deleted successfully").respond(StatusCode::OK))
}

#[tracing::instrument(name = "Insert a job into the database", skip(db_pool, new_job))]
async fn insert_job(db_pool: &PgPool, new_job: &NewJob) -> Result<(Job, bool), sqlx::Error> {
    let (salary_min, salary_max, salary_currency) = range_columns(new_job.salary.as_ref());
    let (budget_min, budget_max, budget_currency) = range_columns(new_job.budget.as_ref());

    sqlx::query(
        r#"
        INSERT INTO jobs (id, title, description, requirements, responsibilities, location,
            job_type, category, deadline, status, listing_type, salary_min, salary_max,
            salary_currency, budget_min, budget_max, budget_currency, published,
            created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
            $18, $19, $19)
        RETURNING id, title, description, requirements, responsibilities, location, job_type,
            category, deadline, status, listing_type, salary_min, salary_max, salary_currency,
            budget_min, budget_max, budget_currency, published, created_at, updated_at,
            (xmax = 0) AS newly_created
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_job.title.as_ref())
    .bind(new_job.description.as_ref())
    .bind(&new_job.requirements)
    .bind(&new_job.responsibilities)
    .bind(new_job.location.as_ref())
    .bind(new_job.job_type.as_ref())
    .bind(new_job.category.as_deref())
    .bind(new_job.deadline)
    .bind(new_job.status.as_ref())
    .bind(new_job.listing_type.as_ref())
    .bind(salary_min)
    .bind(salary_max)
    .bind(salary_currency)
    .bind(budget_min)
    .bind(budget_max)
    .bind(budget_currency)
    .bind(new_job.published)
    .bind(Utc::now())
    .try_map(|row: PgRow| Ok((parse_job_row(&row)?, row.try_get("newly_created")?)))
    .fetch_one(db_pool)
    .await
}

#[tracing::instrument(name = "Fetching a job from the database", skip(db_pool))]
pub(crate) async fn fetch_job(db_pool: &PgPool, id: Uuid) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, title, description, requirements, responsibilities, location, job_type,
            category, deadline, status, listing_type, salary_min, salary_max, salary_currency,
            budget_min, budget_max, budget_currency, published, created_at, updated_at
        FROM jobs WHERE id = $1
        "#,
    )
    .bind(id)
    .try_map(|row: PgRow| parse_job_row(&row))
    .fetch_optional(db_pool)
    .await
}

#[tracing::instrument(name = "Updating a job in the database", skip(db_pool, job))]
async fn update_job(db_pool: &PgPool, job: &Job) -> Result<Job, sqlx::Error> {
    let (salary_min, salary_max, salary_currency) = range_columns(job.salary.as_ref());
    let (budget_min, budget_max, budget_currency) = range_columns(job.budget.as_ref());

    sqlx::query(
        r#"
        UPDATE jobs
        SET title = $2, description = $3, requirements = $4, responsibilities = $5,
            location = $6, job_type = $7, category = $8, deadline = $9, status = $10,
            listing_type = $11, salary_min = $12, salary_max = $13, salary_currency = $14,
            budget_min = $15, budget_max = $16, budget_currency = $17, published = $18,
            updated_at = $19
        WHERE id = $1
        RETURNING id, title, description, requirements, responsibilities, location, job_type,
            category, deadline, status, listing_type, salary_min, salary_max, salary_currency,
            budget_min, budget_max, budget_currency, published, created_at, updated_at
        "#,
    )
    .bind(job.id)
    .bind(&job.title)
    .bind(&job.description)
    .bind(&job.requirements)
    .bind(&job.responsibilities)
    .bind(&job.location)
    .bind(job.job_type.as_ref())
    .bind(job.category.as_deref())
    .bind(job.deadline)
    .bind(job.status.as_ref())
    .bind(job.listing_type.as_ref())
    .bind(salary_min)
    .bind(salary_max)
    .bind(salary_currency)
    .bind(budget_min)
    .bind(budget_max)
    .bind(budget_currency)
    .bind(job.published)
    .bind(Utc::now())
    .try_map(|row: PgRow| parse_job_row(&row))
    .fetch_one(db_pool)
    .await
}

fn range_columns(range: Option<&AmountRange>) -> (Option<i64>, Option<i64>, Option<&str>) {
    match range {
        Some(range) => (range.min, range.max, Some(range.currency.as_str())),
        None => (None, None, None),
    }
}

fn range_from_columns(
    row: &PgRow,
    prefix: &str,
) -> Result<Option<AmountRange>, sqlx::Error> {
    let min: Option<i64> = row.try_get(format!("{}_min", prefix).as_str())?;
    let max: Option<i64> = row.try_get(format!("{}_max", prefix).as_str())?;
    let currency: Option<String> = row.try_get(format!("{}_currency", prefix).as_str())?;

    if min.is_none() && max.is_none() {
        return Ok(None);
    }

    Ok(Some(AmountRange::new(min, max, currency)))
}

fn parse_job_row(row: &PgRow) -> Result<Job, sqlx::Error> {
    Ok(Job {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        requirements: row.try_get("requirements")?,
        responsibilities: row.try_get("responsibilities")?,
        location: row.try_get("location")?,
        job_type: JobType::parse(row.try_get("job_type")?).map_err(decode_error)?,
        category: row.try_get("category")?,
        deadline: row.try_get("deadline")?,
        status: JobStatus::parse(row.try_get("status")?).map_err(decode_error)?,
        listing_type: ListingType::parse(row.try_get("listing_type")?).map_err(decode_error)?,
        salary: range_from_columns(row, "salary")?,
        budget: range_from_columns(row, "budget")?,
        published: row.try_get("published")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
