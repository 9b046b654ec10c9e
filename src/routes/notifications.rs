use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::content::{ContentKind, PublishableContent};
use crate::notification::TemplateGenerator;
use crate::routes::errors::ContentError;
use crate::routes::jobs::fetch_job;
use crate::routes::news::fetch_news;
use crate::routes::projects::fetch_project;

/// Renders the notification email of a stored record without sending it.
#[tracing::instrument(name = "Previewing a notification email handler", skip(db_pool, templates))]
pub async fn handle_preview_notification(
    path: web::Path<(String, Uuid)>,
    db_pool: web::Data<PgPool>,
    templates: web::Data<TemplateGenerator>,
) -> Result<HttpResponse, ContentError> {
    let (content_type, id) = path.into_inner();
    let kind = content_type
        .parse::<ContentKind>()
        .map_err(|err| ContentError::ValidationError(err.to_string()))?;

    let content = load_content(&db_pool, kind, id)
        .await?
        .ok_or(ContentError::NotFound("Content"))?;
    let email = templates
        .generate(&content)
        .map_err(|err| ContentError::ValidationError(err.to_string()))?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(email.html))
}

/// A job listed as a proposal (or the other way round) is not found under the other kind.
async fn load_content(
    db_pool: &PgPool,
    kind: ContentKind,
    id: Uuid,
) -> Result<Option<PublishableContent>, sqlx::Error> {
    let content = match kind {
        ContentKind::Job | ContentKind::Proposal => fetch_job(db_pool, id)
            .await?
            .map(PublishableContent::from)
            .filter(|content| content.kind() == kind),
        ContentKind::News => fetch_news(db_pool, id).await?.map(PublishableContent::from),
        ContentKind::Project => fetch_project(db_pool, id)
            .await?
            .map(PublishableContent::from),
    };

    Ok(content)
}
