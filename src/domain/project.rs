use actix_web::web;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::required_text::{clean_list, nullable, optional_text, RequiredText};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Current,
    Completed,
    News,
}

impl ProjectCategory {
    pub fn parse(category: String) -> Result<ProjectCategory, String> {
        match category.as_str() {
            "current" => Ok(ProjectCategory::Current),
            "completed" => Ok(ProjectCategory::Completed),
            "news" => Ok(ProjectCategory::News),
            _ => Err(format!("{} is not a valid project category", category)),
        }
    }
}

impl AsRef<str> for ProjectCategory {
    fn as_ref(&self) -> &str {
        match self {
            ProjectCategory::Current => "current",
            ProjectCategory::Completed => "completed",
            ProjectCategory::News => "news",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Completed,
    Upcoming,
    Archived,
}

impl ProjectStatus {
    pub fn parse(status: String) -> Result<ProjectStatus, String> {
        match status.as_str() {
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            "upcoming" => Ok(ProjectStatus::Upcoming),
            "archived" => Ok(ProjectStatus::Archived),
            _ => Err(format!("{} is not a valid project status", status)),
        }
    }
}

impl AsRef<str> for ProjectStatus {
    fn as_ref(&self) -> &str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Upcoming => "upcoming",
            ProjectStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub full_description: Option<String>,
    pub category: ProjectCategory,
    /// Media host URLs, the first one is the cover.
    pub images: Vec<String>,
    pub location: Option<String>,
    pub areas_of_intervention: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewProject {
    pub title: RequiredText,
    pub description: RequiredText,
    pub full_description: Option<String>,
    pub category: ProjectCategory,
    pub images: Vec<String>,
    pub location: Option<String>,
    pub areas_of_intervention: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub published: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectBody {
    pub title: String,
    pub description: String,
    pub full_description: Option<String>,
    pub category: Option<ProjectCategory>,
    #[serde(default)]
    pub images: Vec<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub areas_of_intervention: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<ProjectStatus>,
    pub published: Option<bool>,
}

impl TryFrom<web::Json<NewProjectBody>> for NewProject {
    type Error = String;

    fn try_from(body: web::Json<NewProjectBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();
        validate_period(body.start_date, body.end_date)?;

        Ok(NewProject {
            title: RequiredText::parse("title", body.title)?,
            description: RequiredText::parse("description", body.description)?,
            full_description: optional_text(body.full_description),
            category: body.category.unwrap_or(ProjectCategory::Current),
            images: clean_list(body.images),
            location: optional_text(body.location),
            areas_of_intervention: clean_list(body.areas_of_intervention),
            start_date: body.start_date,
            end_date: body.end_date,
            status: body.status.unwrap_or(ProjectStatus::Active),
            published: body.published.unwrap_or(true),
        })
    }
}

/// Partial update of a stored project. A date sent as `null` is cleared.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    pub category: Option<ProjectCategory>,
    pub images: Option<Vec<String>>,
    pub location: Option<String>,
    pub areas_of_intervention: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<NaiveDate>>,
    pub status: Option<ProjectStatus>,
    pub published: Option<bool>,
}

impl Project {
    pub fn apply(&mut self, changes: ProjectChanges) -> Result<(), String> {
        if let Some(title) = changes.title {
            self.title = RequiredText::parse("title", title)?.as_ref().to_string();
        }
        if let Some(description) = changes.description {
            self.description = RequiredText::parse("description", description)?
                .as_ref()
                .to_string();
        }
        if changes.full_description.is_some() {
            self.full_description = optional_text(changes.full_description);
        }
        if changes.location.is_some() {
            self.location = optional_text(changes.location);
        }
        if let Some(images) = changes.images {
            self.images = clean_list(images);
        }
        if let Some(areas) = changes.areas_of_intervention {
            self.areas_of_intervention = clean_list(areas);
        }
        if let Some(start_date) = changes.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = changes.end_date {
            self.end_date = end_date;
        }
        validate_period(self.start_date, self.end_date)?;
        self.category = changes.category.unwrap_or(self.category);
        self.status = changes.status.unwrap_or(self.status);
        self.published = changes.published.unwrap_or(self.published);

        Ok(())
    }
}

fn validate_period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), String> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(format!(
            "project end date {} is before its start date {}",
            end, start
        )),
        _ => Ok(()),
    }
}
