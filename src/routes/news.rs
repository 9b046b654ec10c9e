use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::news::{NewNews, NewNewsBody, News, NewsChanges};
use crate::notification::PublishHook;
use crate::routes::api_response::ApiResponse;
use crate::routes::errors::ContentError;

#[tracing::instrument(name = "Listing news handler", skip(db_pool))]
pub async fn handle_list_news(db_pool: web::Data<PgPool>) -> Result<HttpResponse, ContentError> {
    let news = list_news(&db_pool, false).await?;

    Ok(ApiResponse::list(news).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Listing published news handler", skip(db_pool))]
pub async fn handle_list_published_news(
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let news = list_news(&db_pool, true).await?;

    Ok(ApiResponse::list(news).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Fetching a news item handler", skip(db_pool))]
pub async fn handle_get_news(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let news = fetch_news(&db_pool, path.into_inner())
        .await?
        .ok_or(ContentError::NotFound("News"))?;

    Ok(ApiResponse::data(news).respond(StatusCode::OK))
}

#[tracing::instrument(
    name = "Creating a news item handler",
    skip(body, db_pool, publish_hook),
    fields(news_title = %body.title)
)]
pub async fn handle_create_news(
    body: web::Json<NewNewsBody>,
    db_pool: web::Data<PgPool>,
    publish_hook: web::Data<PublishHook>,
) -> Result<HttpResponse, ContentError> {
    let new_news: NewNews = body.try_into().map_err(ContentError::ValidationError)?;
    let (news, newly_created) = insert_news(&db_pool, &new_news).await?;

    publish_hook.trigger(news.clone().into(), newly_created);

    Ok(ApiResponse::data(news)
        .with_message("News created successfully")
        .respond(StatusCode::CREATED))
}

/// Updates never notify subscribers, even when a draft becomes published.
#[tracing::instrument(name = "Updating a news item handler", skip(body, db_pool))]
pub async fn handle_update_news(
    path: web::Path<Uuid>,
    body: web::Json<NewsChanges>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let mut news = fetch_news(&db_pool, path.into_inner())
        .await?
        .ok_or(ContentError::NotFound("News"))?;
    news.apply(body.into_inner())
        .map_err(ContentError::ValidationError)?;
    let news = update_news(&db_pool, &news).await?;

    Ok(ApiResponse::data(news)
        .with_message("News updated successfully")
        .respond(StatusCode::OK))
}

#[tracing::instrument(name = "Deleting a news item handler", skip(db_pool))]
pub async fn handle_delete_news(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ContentError> {
    let result = sqlx::query("DELETE FROM news WHERE id = $1")
        .bind(path.into_inner())
        .execute(db_pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ContentError::NotFound("News"));
    }

    Ok(ApiResponse::message("News deleted successfully").respond(StatusCode::OK))
}

/// Stores a news item and reports whether this call created the row.
#[tracing::instrument(name = "Insert a news item into the database", skip(db_pool, new_news))]
async fn insert_news(db_pool: &PgPool, new_news: &NewNews) -> Result<(News, bool), sqlx::Error> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO news (id, title, description, author, image, date, is_published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING id, title, description, author, image, date, is_published, created_at, updated_at,
            (xmax = 0) AS newly_created
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_news.title.as_ref())
    .bind(new_news.description.as_ref())
    .bind(new_news.author.as_ref())
    .bind(new_news.image.as_deref())
    .bind(new_news.date)
    .bind(new_news.is_published)
    .bind(now)
    .try_map(|row: PgRow| Ok((parse_news_row(&row)?, row.try_get("newly_created")?)))
    .fetch_one(db_pool)
    .await
}

#[tracing::instrument(name = "Fetching a news item from the database", skip(db_pool))]
pub(crate) async fn fetch_news(db_pool: &PgPool, id: Uuid) -> Result<Option<News>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, title, description, author, image, date, is_published, created_at, updated_at
        FROM news WHERE id = $1
        "#,
    )
    .bind(id)
    .try_map(|row: PgRow| parse_news_row(&row))
    .fetch_optional(db_pool)
    .await
}

#[tracing::instrument(name = "Listing news from the database", skip(db_pool))]
async fn list_news(db_pool: &PgPool, published_only: bool) -> Result<Vec<News>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, title, description, author, image, date, is_published, created_at, updated_at
        FROM news
        WHERE ($1 = false OR is_published = true)
        ORDER BY date DESC, created_at DESC
        "#,
    )
    .bind(published_only)
    .try_map(|row: PgRow| parse_news_row(&row))
    .fetch_all(db_pool)
    .await
}

#[tracing::instrument(name = "Updating a news item in the database", skip(db_pool, news))]
async fn update_news(db_pool: &PgPool, news: &News) -> Result<News, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE news
        SET title = $2, description = $3, author = $4, image = $5, date = $6,
            is_published = $7, updated_at = $8
        WHERE id = $1
        RETURNING id, title, description, author, image, date, is_published, created_at, updated_at
        "#,
    )
    .bind(news.id)
    .bind(&news.title)
    .bind(&news.description)
    .bind(&news.author)
    .bind(news.image.as_deref())
    .bind(news.date)
    .bind(news.is_published)
    .bind(Utc::now())
    .try_map(|row: PgRow| parse_news_row(&row))
    .fetch_one(db_pool)
    .await
}

fn parse_news_row(row: &PgRow) -> Result<News, sqlx::Error> {
    Ok(News {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        author: row.try_get("author")?,
        image: row.try_get("image")?,
        date: row.try_get("date")?,
        is_published: row.try_get("is_published")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
