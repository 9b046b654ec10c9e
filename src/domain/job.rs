use actix_web::web;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::amount_range::AmountRange;
use crate::domain::required_text::{clean_list, optional_text, RequiredText};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Volunteer,
    Internship,
}

impl JobType {
    pub fn parse(job_type: String) -> Result<JobType, String> {
        match job_type.as_str() {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "volunteer" => Ok(JobType::Volunteer),
            "internship" => Ok(JobType::Internship),
            _ => Err(format!("{} is not a valid job type", job_type)),
        }
    }
}

impl AsRef<str> for JobType {
    fn as_ref(&self) -> &str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Contract => "contract",
            JobType::Volunteer => "volunteer",
            JobType::Internship => "internship",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Open,
    Closed,
    Filled,
}

impl JobStatus {
    pub fn parse(status: String) -> Result<JobStatus, String> {
        match status.as_str() {
            "open" => Ok(JobStatus::Open),
            "closed" => Ok(JobStatus::Closed),
            "filled" => Ok(JobStatus::Filled),
            _ => Err(format!("{} is not a valid job status", status)),
        }
    }
}

impl AsRef<str> for JobStatus {
    fn as_ref(&self) -> &str {
        match self {
            JobStatus::Open => "open",
            JobStatus::Closed => "closed",
            JobStatus::Filled => "filled",
        }
    }
}

/// Discriminator between job offers and calls for proposals, which share the `jobs` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Job,
    Proposal,
}

impl ListingType {
    pub fn parse(listing_type: String) -> Result<ListingType, String> {
        match listing_type.as_str() {
            "job" => Ok(ListingType::Job),
            "proposal" => Ok(ListingType::Proposal),
            _ => Err(format!("{} is not a valid listing type", listing_type)),
        }
    }
}

impl AsRef<str> for ListingType {
    fn as_ref(&self) -> &str {
        match self {
            ListingType::Job => "job",
            ListingType::Proposal => "proposal",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub category: Option<String>,
    pub deadline: NaiveDate,
    pub status: JobStatus,
    pub listing_type: ListingType,
    pub salary: Option<AmountRange>,
    pub budget: Option<AmountRange>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewJob {
    pub title: RequiredText,
    pub description: RequiredText,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub location: RequiredText,
    pub job_type: JobType,
    pub category: Option<String>,
    pub deadline: NaiveDate,
    pub status: JobStatus,
    pub listing_type: ListingType,
    pub salary: Option<AmountRange>,
    pub budget: Option<AmountRange>,
    pub published: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobBody {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: Option<JobType>,
    pub category: Option<String>,
    pub deadline: NaiveDate,
    pub status: Option<JobStatus>,
    pub listing_type: Option<ListingType>,
    pub salary: Option<AmountRange>,
    pub budget: Option<AmountRange>,
    pub published: Option<bool>,
}

impl TryFrom<web::Json<NewJobBody>> for NewJob {
    type Error = String;

    fn try_from(body: web::Json<NewJobBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();
        let salary = validate_range(body.salary)?;
        let budget = validate_range(body.budget)?;

        Ok(NewJob {
            title: RequiredText::parse("title", body.title)?,
            description: RequiredText::parse("description", body.description)?,
            requirements: clean_list(body.requirements),
            responsibilities: clean_list(body.responsibilities),
            location: RequiredText::parse("location", body.location)?,
            job_type: body.job_type.unwrap_or(JobType::FullTime),
            category: optional_text(body.category),
            deadline: body.deadline,
            status: body.status.unwrap_or(JobStatus::Open),
            listing_type: body.listing_type.unwrap_or(ListingType::Job),
            salary,
            budget,
            published: body.published.unwrap_or(true),
        })
    }
}

/// Partial update of a stored job; absent fields keep their current value.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<JobType>,
    pub category: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<JobStatus>,
    pub listing_type: Option<ListingType>,
    pub salary: Option<AmountRange>,
    pub budget: Option<AmountRange>,
    pub published: Option<bool>,
}

impl Job {
    pub fn apply(&mut self, changes: JobChanges) -> Result<(), String> {
        if let Some(title) = changes.title {
            self.title = RequiredText::parse("title", title)?.as_ref().to_string();
        }
        if let Some(description) = changes.description {
            self.description = RequiredText::parse("description", description)?
                .as_ref()
                .to_string();
        }
        if let Some(location) = changes.location {
            self.location = RequiredText::parse("location", location)?.as_ref().to_string();
        }
        if let Some(requirements) = changes.requirements {
            self.requirements = clean_list(requirements);
        }
        if let Some(responsibilities) = changes.responsibilities {
            self.responsibilities = clean_list(responsibilities);
        }
        if changes.category.is_some() {
            self.category = optional_text(changes.category);
        }
        if changes.salary.is_some() {
            self.salary = validate_range(changes.salary)?;
        }
        if changes.budget.is_some() {
            self.budget = validate_range(changes.budget)?;
        }
        self.job_type = changes.job_type.unwrap_or(self.job_type);
        self.deadline = changes.deadline.unwrap_or(self.deadline);
        self.status = changes.status.unwrap_or(self.status);
        self.listing_type = changes.listing_type.unwrap_or(self.listing_type);
        self.published = changes.published.unwrap_or(self.published);

        Ok(())
    }
}

fn validate_range(range: Option<AmountRange>) -> Result<Option<AmountRange>, String> {
    match range {
        Some(range) => {
            range.validate()?;
            Ok(Some(AmountRange::new(range.min, range.max, Some(range.currency))))
        }
        None => Ok(None),
    }
}
