use chrono::NaiveDate;
use htmlescape::encode_minimal;

use crate::domain::application::{Application, ApplicationStatus};
use crate::domain::content::{ContentKind, PublishableContent};
use crate::domain::job::{Job, ListingType};
use crate::domain::news::News;
use crate::domain::project::Project;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEmail {
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Cannot build a {kind} notification: {reason}")]
    InvalidRecord { kind: ContentKind, reason: String },
}

/// Renders the "new content" email sent to subscribers.
///
/// Rendering is pure: the same record always produces the same subject and body.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    frontend_url: String,
    organisation_name: String,
}

/// Everything that differs between content kinds; the HTML skeleton is shared.
struct Layout<'a> {
    header: String,
    subject_prefix: &'static str,
    button_label: &'static str,
    detail_path: &'static str,
    image_url: Option<&'a str>,
    details: Vec<Detail>,
}

struct Detail {
    label: &'static str,
    value: String,
}

impl Detail {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

impl TemplateGenerator {
    pub fn new(frontend_url: String, organisation_name: String) -> Self {
        Self {
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
            organisation_name,
        }
    }

    pub fn generate(&self, content: &PublishableContent) -> Result<NotificationEmail, TemplateError> {
        let kind = content.kind();
        require(kind, "title", content.title())?;
        require(kind, "description", content.description())?;

        let layout = match content {
            PublishableContent::Job(job) => self.job_layout(job)?,
            PublishableContent::News(news) => self.news_layout(news)?,
            PublishableContent::Project(project) => self.project_layout(project),
        };

        let title = content.title().trim();
        let detail_url = format!("{}/{}/{}", self.frontend_url, layout.detail_path, content.id());

        Ok(NotificationEmail {
            subject: format!("{}: {}", layout.subject_prefix, title),
            html: self.render(&layout, title, content.description().trim(), &detail_url),
        })
    }

    fn job_layout<'a>(&self, job: &'a Job) -> Result<Layout<'a>, TemplateError> {
        let kind = match job.listing_type {
            ListingType::Job => ContentKind::Job,
            ListingType::Proposal => ContentKind::Proposal,
        };
        require(kind, "location", &job.location)?;

        let mut details = vec![Detail::new("Location", job.location.trim())];
        if kind == ContentKind::Job {
            details.push(Detail::new("Type", job.job_type.as_ref()));
        }
        details.push(Detail::new("Deadline", format_long_date(job.deadline)));
        if let Some(category) = &job.category {
            details.push(Detail::new("Category", category.as_str()));
        }
        let (label, amount) = match kind {
            ContentKind::Job => ("Salary", job.salary.as_ref()),
            _ => ("Budget", job.budget.as_ref()),
        };
        if let Some(value) = amount.and_then(|range| range.describe()) {
            details.push(Detail::new(label, value));
        }

        let layout = match kind {
            ContentKind::Job => Layout {
                header: format!("New Job Opportunity at {}", self.organisation_name),
                subject_prefix: "New Job Opportunity",
                button_label: "Apply Now",
                detail_path: "job",
                image_url: None,
                details,
            },
            _ => Layout {
                header: format!("New Call for Proposals from {}", self.organisation_name),
                subject_prefix: "New Call for Proposals",
                button_label: "Submit a Proposal",
                detail_path: "job",
                image_url: None,
                details,
            },
        };

        Ok(layout)
    }

    fn news_layout<'a>(&self, news: &'a News) -> Result<Layout<'a>, TemplateError> {
        require(ContentKind::News, "author", &news.author)?;

        Ok(Layout {
            header: format!("Latest News from {}", self.organisation_name),
            subject_prefix: "Latest News",
            button_label: "Read the Article",
            detail_path: "news",
            image_url: news.image.as_deref(),
            details: vec![
                Detail::new("Author", news.author.trim()),
                Detail::new("Date", format_long_date(news.date)),
            ],
        })
    }

    fn project_layout<'a>(&self, project: &'a Project) -> Layout<'a> {
        let mut details = Vec::new();
        if let Some(location) = &project.location {
            details.push(Detail::new("Location", location.as_str()));
        }
        if !project.areas_of_intervention.is_empty() {
            details.push(Detail::new(
                "Areas of intervention",
                project.areas_of_intervention.join(", "),
            ));
        }
        details.push(Detail::new("Category", project.category.as_ref()));
        details.push(Detail::new("Status", project.status.as_ref()));

        Layout {
            header: format!("New Project from {}", self.organisation_name),
            subject_prefix: "New Project",
            button_label: "View the Project",
            detail_path: "project",
            image_url: project.images.first().map(String::as_str),
            details,
        }
    }

    /// Sent once to a new or returning newsletter subscriber.
    pub fn welcome(&self, name: Option<&str>) -> NotificationEmail {
        let greeting = match name.map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => format!("Welcome {}!", encode_minimal(name)),
            None => String::from("Welcome!"),
        };
        let organisation = encode_minimal(&self.organisation_name);

        NotificationEmail {
            subject: format!("Welcome to the {} newsletter", self.organisation_name),
            html: format!(
                r#"<h1>{greeting}</h1>
<p>Thank you for subscribing to the {organisation} newsletter.</p>
<p>From now on you will receive our latest news, projects and opportunities.</p>
<p>Kind regards,<br><strong>The {organisation} Team</strong></p>
"#,
                greeting = greeting,
                organisation = organisation,
            ),
        }
    }

    /// Acknowledges a submitted application to the candidate.
    pub fn application_received(
        &self,
        application: &Application,
        job_location: &str,
    ) -> NotificationEmail {
        NotificationEmail {
            subject: format!("Application received: {}", application.job_title),
            html: format!(
                r#"<h1>We received your application</h1>
<p>Hello {name},</p>
<p>Thank you for applying for the <strong>{job_title}</strong> position at {organisation}.</p>
<p>Your application has been recorded and will be reviewed by our recruitment team. We will contact you if your profile matches our needs.</p>
<ul>
<li>Position: {job_title}</li>
<li>Location: {location}</li>
<li>Applied on: {applied_on}</li>
</ul>
<p>Kind regards,<br><strong>The {organisation} Team</strong></p>
"#,
                name = encode_minimal(&application.full_name),
                job_title = encode_minimal(&application.job_title),
                location = encode_minimal(job_location),
                applied_on = format_long_date(application.applied_at.date_naive()),
                organisation = encode_minimal(&self.organisation_name),
            ),
        }
    }

    /// Alerts the staff inbox about a new application.
    pub fn application_alert(
        &self,
        application: &Application,
        job_location: &str,
    ) -> NotificationEmail {
        NotificationEmail {
            subject: format!("New application received: {}", application.job_title),
            html: format!(
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
<h2 style="color: #2563eb;">New application received</h2>
<div style="background-color: #f3f4f6; padding: 20px; border-radius: 8px; margin: 20px 0;">
<h3 style="color: #1f2937; margin-top: 0;">Position</h3>
<p><strong>Position:</strong> {job_title}</p>
<p><strong>Location:</strong> {location}</p>
<p><strong>Applied on:</strong> {applied_on}</p>
</div>
<div style="background-color: #f3f4f6; padding: 20px; border-radius: 8px; margin: 20px 0;">
<h3 style="color: #1f2937; margin-top: 0;">Candidate</h3>
<p><strong>Full name:</strong> {name}</p>
<p><strong>Email:</strong> <a href="mailto:{email}">{email}</a></p>
<p><strong>Phone:</strong> {phone}</p>
<p><strong>Address:</strong> {address}</p>
</div>
<div style="background-color: #f3f4f6; padding: 20px; border-radius: 8px; margin: 20px 0;">
<h3 style="color: #1f2937; margin-top: 0;">Cover letter</h3>
<p style="white-space: pre-wrap;">{cover_letter}</p>
</div>
<div style="margin: 30px 0;">
<a href="{resume}" style="display: inline-block; background-color: #2563eb; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; font-weight: bold;">Download the resume</a>
</div>
<hr style="border: none; border-top: 1px solid #e5e7eb; margin: 30px 0;">
<p style="color: #6b7280; font-size: 14px;">Manage this application from the <a href="{admin_url}">administration panel</a>.</p>
</div>
"#,
                job_title = encode_minimal(&application.job_title),
                location = encode_minimal(job_location),
                applied_on = format_long_date(application.applied_at.date_naive()),
                name = encode_minimal(&application.full_name),
                email = encode_minimal(application.email.as_ref()),
                phone = encode_minimal(&application.phone),
                address = encode_minimal(&application.address),
                cover_letter = encode_minimal(&application.cover_letter),
                resume = encode_minimal(&application.resume),
                admin_url = encode_minimal(&format!("{}/admin", self.frontend_url)),
            ),
        }
    }

    /// Tells the candidate where their application stands. Nothing is sent for `pending`.
    pub fn application_status(&self, application: &Application) -> Option<NotificationEmail> {
        let (subject, heading, message) = match application.status {
            ApplicationStatus::Pending => return None,
            ApplicationStatus::Reviewing => (
                "Update on your application",
                "Update on your application",
                "Your application for the <strong>{job}</strong> position is now being reviewed. We will keep you informed of the next steps.",
            ),
            ApplicationStatus::Shortlisted => (
                "Congratulations, you have been shortlisted",
                "Congratulations!",
                "We are happy to let you know that you have been shortlisted for the <strong>{job}</strong> position. We will contact you soon about the next step of the recruitment process.",
            ),
            ApplicationStatus::Interviewed => (
                "Interview scheduled",
                "Interview scheduled",
                "We would like to meet you for an interview about the <strong>{job}</strong> position. We will contact you shortly with the details.",
            ),
            ApplicationStatus::Accepted => (
                "Job offer, congratulations",
                "Congratulations!",
                "We are delighted to offer you the <strong>{job}</strong> position at {organisation}. We will contact you with the details of the offer.",
            ),
            ApplicationStatus::Rejected => (
                "Update on your application",
                "Update on your application",
                "Thank you for your interest in the <strong>{job}</strong> position. After review, we decided to move forward with other candidates. We encourage you to apply to future opportunities at {organisation}.",
            ),
        };
        let organisation = encode_minimal(&self.organisation_name);
        let message = message
            .replace("{job}", &encode_minimal(&application.job_title))
            .replace("{organisation}", &organisation);

        Some(NotificationEmail {
            subject: format!("{}: {}", subject, application.job_title),
            html: format!(
                r#"<h1>{heading}</h1>
<p>Hello {name},</p>
<p>{message}</p>
<p>Kind regards,<br><strong>The {organisation} Team</strong></p>
"#,
                heading = heading,
                name = encode_minimal(&application.full_name),
                message = message,
                organisation = organisation,
            ),
        })
    }

    fn render(&self, layout: &Layout, title: &str, description: &str, detail_url: &str) -> String {
        let image_block = layout
            .image_url
            .map(|url| {
                format!(
                    r#"<div style="text-align: center; margin-bottom: 25px;"><img src="{}" alt="{}" style="max-width: 100%; height: auto; border-radius: 8px;"></div>"#,
                    encode_minimal(url),
                    encode_minimal(title)
                )
            })
            .unwrap_or_default();
        let details_block: String = layout
            .details
            .iter()
            .map(|detail| {
                format!(
                    r#"<p style="margin: 8px 0;"><strong style="color: #667eea;">{}:</strong> {}</p>"#,
                    detail.label,
                    encode_minimal(&detail.value)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
<div style="background: #667eea; padding: 30px; text-align: center; border-radius: 10px 10px 0 0;">
<h1 style="color: white; margin: 0; font-size: 28px;">{header}</h1>
</div>
<div style="background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px;">
{image_block}
<h2 style="color: #667eea; margin-top: 0; font-size: 24px;">{title}</h2>
<p style="font-size: 16px; color: #555; margin-bottom: 20px;">{description}</p>
<div style="background: white; padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #667eea;">
{details_block}
</div>
<div style="text-align: center; margin: 30px 0;">
<a href="{detail_url}" style="display: inline-block; background: #667eea; color: white; padding: 15px 30px; text-decoration: none; border-radius: 5px; font-weight: bold; font-size: 16px;">{button_label}</a>
</div>
<hr style="border: none; border-top: 1px solid #ddd; margin: 30px 0;">
<p style="color: #777; font-size: 14px; margin: 0;">Kind regards,<br><strong style="color: #667eea;">The {organisation} Team</strong></p>
</div>
</body>
</html>
"#,
            header = encode_minimal(&layout.header),
            image_block = image_block,
            title = encode_minimal(title),
            description = encode_minimal(description),
            details_block = details_block,
            detail_url = encode_minimal(detail_url),
            button_label = layout.button_label,
            organisation = encode_minimal(&self.organisation_name),
        )
    }
}

/// "12 March 2024"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

fn require(kind: ContentKind, field: &str, value: &str) -> Result<(), TemplateError> {
    if value.trim().is_empty() {
        return Err(TemplateError::InvalidRecord {
            kind,
            reason: format!("{} is empty", field),
        });
    }

    Ok(())
}
