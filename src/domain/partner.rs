use actix_web::web;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::required_text::{nullable, optional_text, RequiredText};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerCategory {
    Funding,
    Implementation,
    Technical,
    Government,
    Community,
    Other,
}

impl PartnerCategory {
    pub fn parse(category: String) -> Result<PartnerCategory, String> {
        match category.as_str() {
            "funding" => Ok(PartnerCategory::Funding),
            "implementation" => Ok(PartnerCategory::Implementation),
            "technical" => Ok(PartnerCategory::Technical),
            "government" => Ok(PartnerCategory::Government),
            "community" => Ok(PartnerCategory::Community),
            "other" => Ok(PartnerCategory::Other),
            _ => Err(format!("{} is not a valid partner category", category)),
        }
    }
}

impl AsRef<str> for PartnerCategory {
    fn as_ref(&self) -> &str {
        match self {
            PartnerCategory::Funding => "funding",
            PartnerCategory::Implementation => "implementation",
            PartnerCategory::Technical => "technical",
            PartnerCategory::Government => "government",
            PartnerCategory::Community => "community",
            PartnerCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    /// Media host URL of the logo.
    pub logo: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub category: PartnerCategory,
    pub partnership_start_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewPartner {
    pub name: RequiredText,
    pub logo: RequiredText,
    pub description: Option<String>,
    pub website: Option<String>,
    pub category: PartnerCategory,
    pub partnership_start_date: Option<NaiveDate>,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPartnerBody {
    pub name: String,
    pub logo: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub category: Option<PartnerCategory>,
    pub partnership_start_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

impl TryFrom<web::Json<NewPartnerBody>> for NewPartner {
    type Error = String;

    fn try_from(body: web::Json<NewPartnerBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();

        Ok(NewPartner {
            name: RequiredText::parse("name", body.name)?,
            logo: RequiredText::parse("logo", body.logo)?,
            description: optional_text(body.description),
            website: optional_text(body.website),
            category: body.category.unwrap_or(PartnerCategory::Other),
            partnership_start_date: body.partnership_start_date,
            active: body.active.unwrap_or(true),
        })
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PartnerChanges {
    pub name: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub category: Option<PartnerCategory>,
    #[serde(default, deserialize_with = "nullable")]
    pub partnership_start_date: Option<Option<NaiveDate>>,
    pub active: Option<bool>,
}

impl Partner {
    pub fn apply(&mut self, changes: PartnerChanges) -> Result<(), String> {
        if let Some(name) = changes.name {
            self.name = RequiredText::parse("name", name)?.as_ref().to_string();
        }
        if let Some(logo) = changes.logo {
            self.logo = RequiredText::parse("logo", logo)?.as_ref().to_string();
        }
        if changes.description.is_some() {
            self.description = optional_text(changes.description);
        }
        if changes.website.is_some() {
            self.website = optional_text(changes.website);
        }
        if let Some(start_date) = changes.partnership_start_date {
            self.partnership_start_date = start_date;
        }
        self.category = changes.category.unwrap_or(self.category);
        self.active = changes.active.unwrap_or(self.active);

        Ok(())
    }
}
