use actix_web::web;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::required_text::{optional_text, RequiredText};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author: String,
    /// Media host URL of the cover picture.
    pub image: Option<String>,
    pub date: NaiveDate,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewNews {
    pub title: RequiredText,
    pub description: RequiredText,
    pub author: RequiredText,
    pub image: Option<String>,
    pub date: NaiveDate,
    pub is_published: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNewsBody {
    pub title: String,
    pub description: String,
    pub author: String,
    pub image: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_published: Option<bool>,
}

impl TryFrom<web::Json<NewNewsBody>> for NewNews {
    type Error = String;

    fn try_from(body: web::Json<NewNewsBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();

        Ok(NewNews {
            title: RequiredText::parse("title", body.title)?,
            description: RequiredText::parse("description", body.description)?,
            author: RequiredText::parse("author", body.author)?,
            image: optional_text(body.image),
            date: body.date.unwrap_or_else(|| Utc::now().date_naive()),
            is_published: body.is_published.unwrap_or(true),
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewsChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub date: Option<NaiveDate>,
    pub is_published: Option<bool>,
}

impl News {
    pub fn apply(&mut self, changes: NewsChanges) -> Result<(), String> {
        if let Some(title) = changes.title {
            self.title = RequiredText::parse("title", title)?.as_ref().to_string();
        }
        if let Some(description) = changes.description {
            self.description = RequiredText::parse("description", description)?
                .as_ref()
                .to_string();
        }
        if let Some(author) = changes.author {
            self.author = RequiredText::parse("author", author)?.as_ref().to_string();
        }
        if changes.image.is_some() {
            self.image = optional_text(changes.image);
        }
        self.date = changes.date.unwrap_or(self.date);
        self.is_published = changes.is_published.unwrap_or(self.is_published);

        Ok(())
    }
}
