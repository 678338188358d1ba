use async_trait::async_trait;
use tracing::info;

use crate::{app_error::AppResult, use_cases::user::EmailSender};

/// Writes outgoing mail to the log. Used when no provider key is configured.
#[derive(Default, Clone)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        info!(to, subject, html, "Email not sent (no provider configured)");
        Ok(())
    }
}
