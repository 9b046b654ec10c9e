pub mod amount_range;
pub mod application;
pub mod content;
pub mod job;
pub mod new_subscriber;
pub mod news;
pub mod office;
pub mod partner;
pub mod project;
pub mod required_text;
pub mod subscriber;
pub mod subscriber_email;
pub mod subscriber_name;
