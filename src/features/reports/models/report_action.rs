use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Append-only audit entry for a report. Never updated or deleted.
#[derive(Debug, Clone, FromRow)]
pub struct ReportAction {
    pub id: Uuid,
    pub report_id: Uuid,
    pub actor_user_id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Audit entry joined with the acting user's display name
#[derive(Debug, Clone, FromRow)]
pub struct ReportActionWithActor {
    #[sqlx(flatten)]
    pub action: ReportAction,
    pub actor_name: Option<String>,
}

/// Data for appending an audit entry
#[derive(Debug, Clone)]
pub struct CreateReportAction {
    pub id: Uuid,
    pub report_id: Uuid,
    pub actor_user_id: Uuid,
    pub description: String,
}
