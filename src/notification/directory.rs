use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_name::SubscriberName;

#[derive(Debug, thiserror::Error)]
#[error("Failed to load the subscribed addresses from the database.")]
pub struct DirectoryError(#[from] sqlx::Error);

/// Read-only view over the newsletter subscribers.
#[async_trait]
pub trait SubscriberDirectory: Send + Sync {
    /// Every subscriber currently opted in. Empty when nobody is subscribed.
    async fn list_subscribed(&self) -> Result<Vec<Subscriber>, DirectoryError>;
}

pub struct PgSubscriberDirectory {
    db_pool: PgPool,
}

impl PgSubscriberDirectory {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriberDirectory for PgSubscriberDirectory {
    #[tracing::instrument(name = "Loading subscribed addresses", skip(self))]
    async fn list_subscribed(&self) -> Result<Vec<Subscriber>, DirectoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, name, subscribed, subscribed_at, unsubscribed_at
            FROM subscriptions
            WHERE subscribed = true
            ORDER BY subscribed_at
            "#,
        )
        .fetch_all(&self.db_pool)
        .await?;

        let subscribers = rows
            .iter()
            .filter_map(|row| match parse_subscriber_row(row) {
                Ok(subscriber) => Some(subscriber),
                Err(err) => {
                    tracing::warn!(
                        error.message = %err,
                        "Skipping a subscriber. Their stored contact details are invalid"
                    );
                    None
                }
            })
            .collect();

        Ok(subscribers)
    }
}

/// Maps a `subscriptions` row, validating the stored address and name again.
pub fn parse_subscriber_row(row: &PgRow) -> Result<Subscriber, sqlx::Error> {
    let email = SubscriberEmail::parse(row.try_get("email")?).map_err(decode_error)?;
    let name = SubscriberName::parse_optional(row.try_get("name")?).map_err(decode_error)?;

    Ok(Subscriber {
        id: row.try_get("id")?,
        email,
        name,
        subscribed: row.try_get("subscribed")?,
        subscribed_at: row.try_get("subscribed_at")?,
        unsubscribed_at: row.try_get("unsubscribed_at")?,
    })
}

pub(crate) fn decode_error(message: String) -> sqlx::Error {
    sqlx::Error::Decode(message.into())
}
