use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::project::{
    NewProject, NewProjectBody, Project, ProjectCategory, ProjectChanges, ProjectStatus,
};
use crate::notification::directory::decode_error;
use crate::notification::PublishHook;
use crate::routes::api_response::ApiResponse;
use crate::routes::errors::ContentError;
use crate::routes::jobs::PublishedFilter;

#[tracing::instrument(name = "Listing projects handler", skip(db_pool))]
pub async fn handle_list_projects(
    filter: web::Query<PublishedFilter>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let projects = sqlx::query(
        r#"
        SELECT id, title, description, full_description, category, images, location,
            areas_of_intervention, start_date, end_date, status, published, created_at, updated_at
        FROM projects
        WHERE ($1::boolean IS NULL OR published = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(filter.published)
    .try_map(|row: PgRow| parse_project_row(&row))
    .fetch_all(db_pool.get_ref())
    .await?;

    Ok(ApiResponse::list(projects).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Fetching a project handler", skip(db_pool))]
pub async fn handle_get_project(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let project = fetch_project(&db_pool, path.into_inner())
        .await?
        .ok_or(ContentError::NotFound("Project"))?;

    Ok(ApiResponse::data(project).respond(StatusCode::OK))
}

#[tracing::instrument(
    name = "Creating a project handler",
    skip(body, db_pool, publish_hook),
    fields(project_title = %body.title)
)]
pub async fn handle_create_project(
    body: web::Json<NewProjectBody>,
    db_pool: web::Data<PgPool>,
    publish_hook: web::Data<PublishHook>,
) -> Result<HttpResponse, ContentError> {
    let new_project: NewProject = body.try_into().map_err(ContentError::ValidationError)?;
    let (project, newly_created) = insert_project(&db_pool, &new_project).await?;

    publish_hook.trigger(project.clone().into(), newly_created);

    Ok(ApiResponse::data(project)
        .with_message("Project created successfully")
        .respond(StatusCode::CREATED))
}

#[tracing::instrument(name = "Updating a project handler", skip(body, db_pool))]
pub async fn handle_update_project(
    path: web::Path<Uuid>,
    body: web::Json<ProjectChanges>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let mut project = fetch_project(&db_pool, path.into_inner())
        .await?
        .ok_or(ContentError::NotFound("Project"))?;
    project
        .apply(body.into_inner())
        .map_err(ContentError::ValidationError)?;
    let project = update_project(&db_pool, &project).await?;

    Ok(ApiResponse::data(project)
        .with_message("Project updated successfully")
        .respond(StatusCode::OK))
}

#[tracing::instrument(name = "Deleting a project handler", skip(db_pool))]
pub async fn handle_delete_project(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(path.into_inner())
        .execute(db_pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ContentError::NotFound("Project"));
    }

    Ok(ApiResponse::message("Project deleted successfully").respond(StatusCode::OK))
}

#[tracing::instrument(name = "Insert a project into the database", skip(db_pool, new_project))]
async fn insert_project(
    db_pool: &PgPool,
    new_project: &NewProject,
) -> Result<(Project, bool), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO projects (id, title, description, full_description, category, images,
            location, areas_of_intervention, start_date, end_date, status, published,
            created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $13)
        RETURNING id, title, description, full_description, category, images, location,
            areas_of_intervention, start_date, end_date, status, published, created_at,
            updated_at, (xmax = 0) AS newly_created
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_project.title.as_ref())
    .bind(new_project.description.as_ref())
    .bind(new_project.full_description.as_deref())
    .bind(new_project.category.as_ref())
    .bind(&new_project.images)
    .bind(new_project.location.as_deref())
    .bind(&new_project.areas_of_intervention)
    .bind(new_project.start_date)
    .bind(new_project.end_date)
    .bind(new_project.status.as_ref())
    .bind(new_project.published)
    .bind(Utc::now())
    .try_map(|row: PgRow| Ok((parse_project_row(&row)?, row.try_get("newly_created")?)))
    .fetch_one(db_pool)
    .await
}

#[tracing::instrument(name = "Fetching a project from the database", skip(db_pool))]
pub(crate) async fn fetch_project(
    db_pool: &PgPool,
    id: Uuid,
) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, title, description, full_description, category, images, location,
            areas_of_intervention, start_date, end_date, status, published, created_at, updated_at
        FROM projects WHERE id = $1
        "#,
    )
    .bind(id)
    .try_map(|row: PgRow| parse_project_row(&row))
    .fetch_optional(db_pool)
    .await
}

#[tracing::instrument(name = "Updating a project in the database", skip(db_pool, project))]
async fn update_project(db_pool: &PgPool, project: &Project) -> Result<Project, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE projects
        SET title = $2, description = $3, full_description = $4, category = $5, images = $6,
            location = $7, areas_of_intervention = $8, start_date = $9, end_date = $10,
            status = $11, published = $12, updated_at = $13
        WHERE id = $1
        RETURNING id, title, description, full_description, category, images, location,
            areas_of_intervention, start_date, end_date, status, published, created_at, updated_at
        "#,
    )
    .bind(project.id)
    .bind(&project.title)
    .bind(&project.description)
    .bind(project.full_description.as_deref())
    .bind(project.category.as_ref())
    .bind(&project.images)
    .bind(project.location.as_deref())
    .bind(&project.areas_of_intervention)
    .bind(project.start_date)
    .bind(project.end_date)
    .bind(project.status.as_ref())
    .bind(project.published)
    .bind(Utc::now())
    .try_map(|row: PgRow| parse_project_row(&row))
    .fetch_one(db_pool)
    .await
}

fn parse_project_row(row: &PgRow) -> Result<Project, sqlx::Error> {
    Ok(Project {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        full_description: row.try_get("full_description")?,
        category: ProjectCategory::parse(row.try_get("category")?).map_err(decode_error)?,
        images: row.try_get("images")?,
        location: row.try_get("location")?,
        areas_of_intervention: row.try_get("areas_of_intervention")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        status: ProjectStatus::parse(row.try_get("status")?).map_err(decode_error)?,
        published: row.try_get("published")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
