mod api_response;
mod applications;
mod errors;
mod health_check;
mod jobs;
mod news;
mod newsletters;
mod notifications;
mod offices;
mod partners;
mod projects;

pub use api_response::ApiResponse;
pub use applications::{
    handle_delete_application, handle_get_application, handle_list_applications,
    handle_review_application, handle_submit_application, ApplicationError,
};
pub use errors::{json_error_handler, path_error_handler, query_error_handler, ContentError};
pub use health_check::health_check;
pub use jobs::{
    handle_create_job, handle_delete_job, handle_get_job, handle_list_jobs, handle_update_job,
};
pub use news::{
    handle_create_news, handle_delete_news, handle_get_news, handle_list_news,
    handle_list_published_news, handle_update_news,
};
pub use newsletters::{
    handle_delete_subscriber, handle_list_subscribers, handle_public_subscribers,
    handle_subscribe, handle_unsubscribe, SubscriptionError,
};
pub use notifications::handle_preview_notification;
pub use offices::{
    handle_create_office, handle_delete_office, handle_get_office, handle_list_offices,
    handle_update_office,
};
pub use partners::{
    handle_create_partner, handle_delete_partner, handle_get_partner, handle_list_partners,
    handle_update_partner,
};
pub use projects::{
    handle_create_project, handle_delete_project, handle_get_project, handle_list_projects,
    handle_update_project,
};
