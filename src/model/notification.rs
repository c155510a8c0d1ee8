use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Notification {
    pub id: u64,
    pub recipient_id: u64,
    pub message: String,
    #[sqlx(rename = "is_read")]
    pub read: bool,
    /// deep link into the UI, absent for adjudication notices
    pub link: Option<String>,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub recipient_id: u64,
    pub message: String,
    pub link: Option<String>,
}

/// Selects notifications for the cancellation clean-up.
#[derive(Debug, Clone)]
pub struct NotificationMatch {
    pub recipient_id: u64,
    pub link: String,
    pub message_contains: String,
}

impl NotificationMatch {
    pub fn matches(&self, n: &Notification) -> bool {
        n.recipient_id == self.recipient_id
            && n.link.as_deref() == Some(self.link.as_str())
            && n.message.contains(&self.message_contains)
    }
}
