use std::str::FromStr;

use uuid::Uuid;

use crate::domain::job::{Job, ListingType};
use crate::domain::news::News;
use crate::domain::project::Project;

/// Kind of content a notification is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Job,
    Proposal,
    News,
    Project,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Job => "job",
            ContentKind::Proposal => "proposal",
            ContentKind::News => "news",
            ContentKind::Project => "project",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown content type: {0}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentKind {
    type Err = UnknownContentType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "job" => Ok(ContentKind::Job),
            "proposal" => Ok(ContentKind::Proposal),
            "news" => Ok(ContentKind::News),
            "project" => Ok(ContentKind::Project),
            unknown => Err(UnknownContentType(unknown.to_string())),
        }
    }
}

/// A stored record whose creation may be announced to newsletter subscribers.
#[derive(Debug, Clone)]
pub enum PublishableContent {
    Job(Job),
    News(News),
    Project(Project),
}

impl PublishableContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            PublishableContent::Job(job) => match job.listing_type {
                ListingType::Job => ContentKind::Job,
                ListingType::Proposal => ContentKind::Proposal,
            },
            PublishableContent::News(_) => ContentKind::News,
            PublishableContent::Project(_) => ContentKind::Project,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            PublishableContent::Job(job) => job.id,
            PublishableContent::News(news) => news.id,
            PublishableContent::Project(project) => project.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            PublishableContent::Job(job) => &job.title,
            PublishableContent::News(news) => &news.title,
            PublishableContent::Project(project) => &project.title,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            PublishableContent::Job(job) => &job.description,
            PublishableContent::News(news) => &news.description,
            PublishableContent::Project(project) => &project.description,
        }
    }

    pub fn is_published(&self) -> bool {
        match self {
            PublishableContent::Job(job) => job.published,
            PublishableContent::News(news) => news.is_published,
            PublishableContent::Project(project) => project.published,
        }
    }

    /// Subscribers hear about a record once: when it is first inserted already published.
    /// Publishing it later through an update does not notify.
    pub fn is_eligible_for_notification(&self, newly_created: bool) -> bool {
        newly_created && self.is_published()
    }
}

impl From<Job> for PublishableContent {
    fn from(job: Job) -> Self {
        PublishableContent::Job(job)
    }
}

impl From<News> for PublishableContent {
    fn from(news: News) -> Self {
        PublishableContent::News(news)
    }
}

impl From<Project> for PublishableContent {
    fn from(project: Project) -> Self {
        PublishableContent::Project(project)
    }
}
