use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::ReportCategory;

/// Report status enum matching database enum
///
/// Any status may move to any other status; every change is audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Received,
    InProgress,
    Completed,
    Rejected,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 5] = [
        ReportStatus::Pending,
        ReportStatus::Received,
        ReportStatus::InProgress,
        ReportStatus::Completed,
        ReportStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Received => "received",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Completed => "completed",
            ReportStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid status '{}'. Allowed: pending, received, in_progress, completed, rejected",
                    s
                )
            })
    }
}

/// Domain model for report; `images` is always the decoded URL list
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ReportCategory,
    pub address: String,
    pub rt: String,
    pub rw: String,
    pub images: Vec<String>,
    pub status: ReportStatus,
    pub owner_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for report, `images` holds the serialized URL list
#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ReportCategory,
    pub address: String,
    pub rt: String,
    pub rw: String,
    pub images: String,
    pub status: ReportStatus,
    pub owner_user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = AppError;

    fn try_from(row: ReportRow) -> Result<Self> {
        Ok(Self {
            images: decode_images(&row.images)?,
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            address: row.address,
            rt: row.rt,
            rw: row.rw,
            status: row.status,
            owner_user_id: row.owner_user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Report joined with the owning citizen's display name (read-only)
#[derive(Debug, Clone)]
pub struct ReportWithOwner {
    pub report: Report,
    pub owner_name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ReportWithOwnerRow {
    #[sqlx(flatten)]
    pub report: ReportRow,
    pub owner_name: Option<String>,
}

impl TryFrom<ReportWithOwnerRow> for ReportWithOwner {
    type Error = AppError;

    fn try_from(row: ReportWithOwnerRow) -> Result<Self> {
        Ok(Self {
            report: row.report.try_into()?,
            owner_name: row.owner_name,
        })
    }
}

/// Data for inserting a report; status is always `pending` on insert
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ReportCategory,
    pub address: String,
    pub rt: String,
    pub rw: String,
    pub images: Vec<String>,
    pub owner_user_id: Uuid,
}

/// Citizen edit of a pending report; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateReportContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ReportCategory>,
    pub address: Option<String>,
    pub rt: Option<String>,
    pub rw: Option<String>,
}

/// Serialize the image URL list for the `reports.images` text column
pub fn encode_images(images: &[String]) -> Result<String> {
    serde_json::to_string(images)
        .map_err(|e| AppError::Internal(format!("Failed to encode report images: {}", e)))
}

/// Inverse of [`encode_images`]; an empty column reads as no images
pub fn decode_images(raw: &str) -> Result<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw)
        .map_err(|e| AppError::Internal(format!("Failed to decode report images: {}", e)))
}
