//! Missing-log reminder scan.
//!
//! A periodic, read-only, idempotent sweep: every placement missing a
//! countable log for the current week earns its student a reminder mail.
//! Re-running within the same week merely repeats notifications, which is
//! acceptable; no state is written.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;
use tracing::{error, info};

use crate::db::DbPool;
use crate::error::AppResult;
use crate::services::mailer::{Mailer, OutboundMail};
use crate::services::weekly_log::find_missing_placements;

/// Configuration for the reminder service.
#[derive(Clone)]
pub struct ReminderConfig {
    /// How often to run the scan (in seconds)
    pub interval_secs: u64,
}

/// Start the reminder background task.
pub fn start_reminder_task(pool: Arc<DbPool>, mailer: Arc<Mailer>, config: ReminderConfig) {
    tokio::spawn(async move {
        info!(
            "Starting missing-log reminder service (interval: {} seconds)",
            config.interval_secs
        );

        let mut ticker = interval(Duration::from_secs(config.interval_secs));

        loop {
            ticker.tick().await;

            match run_reminder_scan(&pool, &mailer).await {
                Ok(sent) => {
                    if sent > 0 {
                        info!("Missing-log reminders sent: {}", sent);
                    }
                }
                Err(e) => error!("Reminder scan error: {}", e),
            }
        }
    });
}

/// Run a single reminder scan. Returns the number of mails relayed.
pub async fn run_reminder_scan(pool: &DbPool, mailer: &Mailer) -> AppResult<usize> {
    if !mailer.is_enabled() {
        return Ok(0);
    }

    let today = Utc::now().date_naive();
    let (week_start, week_end, missing, _) = find_missing_placements(pool, today).await?;

    let mut sent = 0;
    for display in missing {
        if display.student_email.is_empty() {
            continue;
        }

        let subject = format!(
            "Reminder: Weekly internship log missing ({} to {})",
            week_start, week_end
        );
        let body = format!(
            "Hello {},\n\n\
             Our records show you have not submitted your weekly internship log for the week \
             {} to {}.\n\
             Company: {}\n\n\
             Please log in and submit your weekly log.\n\
             Thank you.",
            display.student_name, week_start, week_end, display.company_name
        );

        if mailer
            .send(OutboundMail {
                to: display.student_email,
                subject,
                body,
            })
            .await
        {
            sent += 1;
        }
    }

    Ok(sent)
}
