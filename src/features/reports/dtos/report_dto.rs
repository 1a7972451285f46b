use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{
    Report, ReportActionWithActor, ReportCategory, ReportStatus, ReportWithOwner,
};
use crate::features::reports::services::ReportDetail;
use crate::shared::validation::not_blank;

/// Response DTO for report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: ReportCategory,
    pub address: String,
    pub rt: String,
    pub rw: String,
    /// Public URLs of the attached images, in upload order
    pub images: Vec<String>,
    pub status: ReportStatus,
    pub owner_user_id: Uuid,
    /// Reporter's display name, present on staff/admin views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            category: r.category,
            address: r.address,
            rt: r.rt,
            rw: r.rw,
            images: r.images,
            status: r.status,
            owner_user_id: r.owner_user_id,
            owner_name: None,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<ReportWithOwner> for ReportResponseDto {
    fn from(r: ReportWithOwner) -> Self {
        Self {
            owner_name: r.owner_name,
            ..r.report.into()
        }
    }
}

/// Response DTO for an audit entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportActionResponseDto {
    pub id: Uuid,
    pub report_id: Uuid,
    pub actor_user_id: Uuid,
    pub actor_name: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<ReportActionWithActor> for ReportActionResponseDto {
    fn from(a: ReportActionWithActor) -> Self {
        Self {
            id: a.action.id,
            report_id: a.action.report_id,
            actor_user_id: a.action.actor_user_id,
            actor_name: a.actor_name,
            description: a.action.description,
            created_at: a.action.created_at,
        }
    }
}

/// Response DTO for report with its audit trail
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDetailResponseDto {
    #[serde(flatten)]
    pub report: ReportResponseDto,
    /// Oldest first
    pub actions: Vec<ReportActionResponseDto>,
}

impl From<ReportDetail> for ReportDetailResponseDto {
    fn from(d: ReportDetail) -> Self {
        Self {
            report: d.report.into(),
            actions: d.actions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Text fields of the report creation form
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateReportDto {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    /// One of road_damage, garbage, flood, street_light, other
    pub category: String,
    #[validate(custom(function = "not_blank"))]
    pub address: String,
    #[validate(custom(function = "not_blank"), length(max = 10))]
    pub rt: String,
    #[validate(custom(function = "not_blank"), length(max = 10))]
    pub rw: String,
}

/// Report creation form for OpenAPI documentation
/// Note: the handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateReportForm {
    #[schema(example = "Jalan Berlubang")]
    pub title: String,
    pub description: String,
    #[schema(example = "road_damage")]
    pub category: String,
    pub address: String,
    #[schema(example = "001")]
    pub rt: String,
    #[schema(example = "002")]
    pub rw: String,
    /// Up to 5 image files (jpeg, jpg, png, gif), 5MB each, sent as repeated `images` parts
    pub images: Option<Vec<String>>,
}

/// Request DTO for a citizen editing their pending report
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportDto {
    #[validate(custom(function = "not_blank"), length(max = 255))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    #[schema(example = "garbage")]
    pub category: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub address: Option<String>,
    #[validate(custom(function = "not_blank"), length(max = 10))]
    pub rt: Option<String>,
    #[validate(custom(function = "not_blank"), length(max = 10))]
    pub rw: Option<String>,
}

/// Request DTO for updating report status
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportStatusDto {
    #[serde(default)]
    #[schema(example = "in_progress")]
    pub status: String,
    /// Mandatory rationale, recorded in the audit trail
    #[serde(default)]
    #[schema(example = "Tim survei dikirim")]
    pub action_description: String,
}

/// Request DTO for adding a note without changing status
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddReportActionDto {
    #[serde(default)]
    pub description: String,
}
