//! Announces newly published content to the newsletter subscribers.
//!
//! A creation handler hands the stored record to [`PublishHook::trigger`]. When the
//! record is eligible the hook renders one email with the [`TemplateGenerator`],
//! loads the [`SubscriberDirectory`] and sends the email to every subscriber
//! through the [`MailDispatcher`], each delivery independent from the others.
//! Nothing from this pipeline reaches the HTTP response of the creation request.

pub mod directory;
pub mod dispatcher;
pub mod publish_hook;
pub mod template;

pub use directory::{DirectoryError, PgSubscriberDirectory, SubscriberDirectory};
pub use dispatcher::{MailDispatcher, MailTransport, NotificationOutcome, TransportError};
pub use publish_hook::{FanOutReport, PublishError, PublishHook};
pub use template::{NotificationEmail, TemplateError, TemplateGenerator};
