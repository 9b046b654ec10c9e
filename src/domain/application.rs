use actix_web::web;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::{Job, JobStatus};
use crate::domain::required_text::{optional_text, RequiredText};
use crate::domain::subscriber_email::SubscriberEmail;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewing,
    Shortlisted,
    Interviewed,
    Rejected,
    Accepted,
}

impl ApplicationStatus {
    pub fn parse(status: String) -> Result<ApplicationStatus, String> {
        match status.as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "reviewing" => Ok(ApplicationStatus::Reviewing),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "interviewed" => Ok(ApplicationStatus::Interviewed),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "accepted" => Ok(ApplicationStatus::Accepted),
            _ => Err(format!("{} is not a valid application status", status)),
        }
    }
}

impl AsRef<str> for ApplicationStatus {
    fn as_ref(&self) -> &str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewing => "reviewing",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interviewed => "interviewed",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Accepted => "accepted",
        }
    }
}

/// A candidate's answer to a job listing. The job title is copied at submission time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub full_name: String,
    pub email: SubscriberEmail,
    pub phone: String,
    pub address: String,
    /// Media host URL of the uploaded resume.
    pub resume: String,
    pub cover_letter: String,
    pub status: ApplicationStatus,
    pub admin_notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub full_name: RequiredText,
    pub email: SubscriberEmail,
    pub phone: RequiredText,
    pub address: RequiredText,
    pub resume: RequiredText,
    pub cover_letter: RequiredText,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplicationBody {
    pub job_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub resume: String,
    pub cover_letter: String,
}

impl TryFrom<web::Json<NewApplicationBody>> for NewApplication {
    type Error = String;

    fn try_from(body: web::Json<NewApplicationBody>) -> Result<Self, Self::Error> {
        let body = body.into_inner();

        Ok(NewApplication {
            job_id: body.job_id,
            full_name: RequiredText::parse("full name", body.full_name)?,
            email: SubscriberEmail::parse(body.email)?,
            phone: RequiredText::parse("phone", body.phone)?,
            address: RequiredText::parse("address", body.address)?,
            resume: RequiredText::parse("resume", body.resume)?,
            cover_letter: RequiredText::parse("cover letter", body.cover_letter)?,
        })
    }
}

/// Only open jobs whose deadline has not passed accept applications.
pub fn accepts_applications(job: &Job, today: NaiveDate) -> bool {
    job.status == JobStatus::Open && job.deadline >= today
}

/// Review of an application by the staff. Absent fields keep their current value.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReview {
    pub status: Option<ApplicationStatus>,
    pub admin_notes: Option<String>,
}

impl Application {
    /// Returns the new status when the review moved the application to another one.
    pub fn apply(&mut self, review: ApplicationReview) -> Option<ApplicationStatus> {
        if review.admin_notes.is_some() {
            self.admin_notes = optional_text(review.admin_notes);
        }

        match review.status {
            Some(status) if status != self.status => {
                self.status = status;
                Some(status)
            }
            _ => None,
        }
    }
}
