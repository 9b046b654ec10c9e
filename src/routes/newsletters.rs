use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::Utc;
use serde::Deserialize;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::new_subscriber::{NewSubscriber, NewSubscriberBody};
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::notification::directory::parse_subscriber_row;
use crate::notification::{MailDispatcher, TemplateGenerator};
use crate::routes::api_response::ApiResponse;
use crate::routes::errors::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum SubscriptionError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Email already subscribed")]
    AlreadySubscribed,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Failed to access the subscriptions table.")]
    DatabaseError(#[from] sqlx::Error),
}

impl std::fmt::Debug for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscriptionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscriptionError::ValidationError(_) | SubscriptionError::AlreadySubscribed => {
                StatusCode::BAD_REQUEST
            }
            SubscriptionError::NotFound(_) => StatusCode::NOT_FOUND,
            SubscriptionError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        ApiResponse::failure(self.to_string()).respond(self.status_code())
    }
}

#[derive(Deserialize)]
pub struct UnsubscribeBody {
    pub email: String,
}

#[derive(Deserialize)]
pub struct SubscriberFilter {
    pub subscribed: Option<bool>,
}

#[tracing::instrument(
    name = "Subscribing to the newsletter handler",
    skip(body, db_pool, dispatcher, templates),
    fields(subscriber_email = %body.email)
)]
pub async fn handle_subscribe(
    body: web::Json<NewSubscriberBody>,
    db_pool: web::Data<PgPool>,
    dispatcher: web::Data<MailDispatcher>,
    templates: web::Data<TemplateGenerator>,
) -> Result<HttpResponse, SubscriptionError> {
    let new_subscriber: NewSubscriber =
        body.try_into().map_err(SubscriptionError::ValidationError)?;

    let (subscriber, newly_created) = upsert_subscriber(&db_pool, &new_subscriber)
        .await?
        .ok_or(SubscriptionError::AlreadySubscribed)?;
    let (status, message) = if newly_created {
        (StatusCode::CREATED, "Successfully subscribed to newsletter")
    } else {
        (StatusCode::OK, "Successfully resubscribed to newsletter")
    };

    send_welcome_email(&dispatcher, &templates, &subscriber);

    Ok(ApiResponse::data(subscriber)
        .with_message(message)
        .respond(status))
}

#[tracing::instrument(
    name = "Unsubscribing from the newsletter handler",
    skip(body, db_pool),
    fields(subscriber_email = %body.email)
)]
pub async fn handle_unsubscribe(
    body: web::Json<UnsubscribeBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubscriptionError> {
    let email = SubscriberEmail::parse(body.into_inner().email)
        .map_err(SubscriptionError::ValidationError)?;

    let subscriber = sqlx::query(
        r#"
        UPDATE subscriptions SET subscribed = false, unsubscribed_at = $2
        WHERE email = $1
        RETURNING id, email, name, subscribed, subscribed_at, unsubscribed_at
        "#,
    )
    .bind(email.as_ref())
    .bind(Utc::now())
    .try_map(|row: PgRow| parse_subscriber_row(&row))
    .fetch_optional(db_pool.get_ref())
    .await?
    .ok_or(SubscriptionError::NotFound("Email not found"))?;

    Ok(ApiResponse::data(subscriber)
        .with_message("Successfully unsubscribed from newsletter")
        .respond(StatusCode::OK))
}

#[tracing::instrument(name = "Listing newsletter subscribers handler", skip(filter, db_pool))]
pub async fn handle_list_subscribers(
    filter: web::Query<SubscriberFilter>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubscriptionError> {
    let subscribers = sqlx::query(
        r#"
        SELECT id, email, name, subscribed, subscribed_at, unsubscribed_at
        FROM subscriptions
        WHERE ($1::boolean IS NULL OR subscribed = $1)
        ORDER BY subscribed_at DESC
        "#,
    )
    .bind(filter.subscribed)
    .try_map(|row: PgRow| parse_subscriber_row(&row))
    .fetch_all(db_pool.get_ref())
    .await?;

    Ok(ApiResponse::list(subscribers).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Listing public newsletter subscribers handler", skip(db_pool))]
pub async fn handle_public_subscribers(
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubscriptionError> {
    let subscribers = sqlx::query(
        r#"
        SELECT id, email, name, subscribed, subscribed_at, unsubscribed_at
        FROM subscriptions
        WHERE subscribed = true
        ORDER BY subscribed_at DESC
        "#,
    )
    .try_map(|row: PgRow| parse_subscriber_row(&row))
    .fetch_all(db_pool.get_ref())
    .await?;

    Ok(ApiResponse::list(subscribers).respond(StatusCode::OK))
}

#[tracing::instrument(name = "Deleting a newsletter subscriber handler", skip(db_pool))]
pub async fn handle_delete_subscriber(
    path: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubscriptionError> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
        .bind(path.into_inner())
        .execute(db_pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(SubscriptionError::NotFound("Subscriber not found"));
    }

    Ok(ApiResponse::message("Subscriber deleted successfully").respond(StatusCode::OK))
}

/// Inserts a new address or opts an unsubscribed one back in with a single statement.
/// Yields `None` when the address is already subscribed. A missing name keeps the stored one.
#[tracing::instrument(name = "Upserting a subscriber in the database", skip(db_pool, new_subscriber))]
async fn upsert_subscriber(
    db_pool: &PgPool,
    new_subscriber: &NewSubscriber,
) -> Result<Option<(Subscriber, bool)>, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO subscriptions (id, email, name, subscribed, subscribed_at)
        VALUES ($1, $2, $3, true, $4)
        ON CONFLICT (email) DO UPDATE
        SET subscribed = true, subscribed_at = EXCLUDED.subscribed_at, unsubscribed_at = NULL,
            name = COALESCE(EXCLUDED.name, subscriptions.name)
        WHERE subscriptions.subscribed = false
        RETURNING id, email, name, subscribed, subscribed_at, unsubscribed_at,
            (xmax = 0) AS newly_created
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_subscriber.email.as_ref())
    .bind(new_subscriber.name.as_ref().map(|name| name.as_ref()))
    .bind(Utc::now())
    .try_map(|row: PgRow| Ok((parse_subscriber_row(&row)?, row.try_get("newly_created")?)))
    .fetch_optional(db_pool)
    .await
}

/// The welcome email never delays nor fails the subscription request.
fn send_welcome_email(
    dispatcher: &MailDispatcher,
    templates: &TemplateGenerator,
    subscriber: &Subscriber,
) {
    let email = templates.welcome(subscriber.name.as_ref().map(|name| name.as_ref()));

    dispatcher.send_in_background(subscriber.email.clone(), email);
}
