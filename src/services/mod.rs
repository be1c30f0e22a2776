//! Business logic services.

pub mod access;
pub mod attachments;
pub mod dashboard;
pub mod evaluation;
pub mod mailer;
pub mod placement;
pub mod reminders;
pub mod request_workflow;
pub mod results;
pub mod storage;
pub mod weekly_log;

pub use mailer::Mailer;
pub use reminders::{ReminderConfig, start_reminder_task};
pub use storage::{ObjectStore, Storage};
