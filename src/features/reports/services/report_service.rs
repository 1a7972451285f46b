use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::{FileService, UploadedFile};
use crate::features::reports::dtos::{CreateReportDto, UpdateReportDto};
use crate::features::reports::models::{
    CreateReport, CreateReportAction, Report, ReportActionWithActor, ReportCategory,
    ReportStatus, ReportWithOwner, UpdateReportContent,
};
use crate::features::reports::repositories::ReportRepository;
use crate::shared::constants::MAX_REPORT_IMAGES;

/// A report with its owner's name and its full audit trail (oldest first)
#[derive(Debug, Clone)]
pub struct ReportDetail {
    pub report: ReportWithOwner,
    pub actions: Vec<ReportActionWithActor>,
}

/// Report lifecycle: submission, scoped visibility, status changes and notes.
///
/// Every operation takes the resolved actor explicitly and checks its role
/// before touching storage.
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    files: Arc<FileService>,
}

fn parse_category(value: &str) -> Result<ReportCategory> {
    value.parse().map_err(AppError::Validation)
}

fn require_description(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportRepository>, files: Arc<FileService>) -> Self {
        Self { reports, files }
    }

    fn require_citizen(actor: &AuthenticatedUser) -> Result<()> {
        if !actor.is_citizen() {
            return Err(AppError::Forbidden(
                "Only citizens can submit reports".to_string(),
            ));
        }
        Ok(())
    }

    fn require_staff(actor: &AuthenticatedUser) -> Result<()> {
        if !actor.has_staff_access() {
            return Err(AppError::Forbidden(
                "Village staff or admin access required".to_string(),
            ));
        }
        Ok(())
    }

    /// Submit a new report. Status is always `pending` and no action is logged.
    ///
    /// Fields and images are fully validated before any file is written; if
    /// the insert fails the stored images are removed again.
    pub async fn create_report(
        &self,
        actor: &AuthenticatedUser,
        input: CreateReportDto,
        images: Vec<UploadedFile>,
    ) -> Result<Report> {
        Self::require_citizen(actor)?;

        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let category = parse_category(&input.category)?;

        // validates every image before the first write
        let image_urls = self.files.store_images(&images, MAX_REPORT_IMAGES).await?;

        let data = CreateReport {
            id: Uuid::now_v7(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            category,
            address: input.address.trim().to_string(),
            rt: input.rt.trim().to_string(),
            rw: input.rw.trim().to_string(),
            images: image_urls,
            owner_user_id: actor.id,
        };

        let report = match self.reports.create(&data).await {
            Ok(report) => report,
            Err(e) => {
                self.files.remove_images(&data.images).await;
                return Err(e);
            }
        };

        tracing::info!(
            "Created report: {} by citizen: {} with {} image(s)",
            report.id,
            actor.id,
            report.images.len()
        );

        Ok(report)
    }

    /// Citizens see their own reports; staff and admins see all with owner names.
    /// Newest first either way.
    pub async fn list_reports(&self, actor: &AuthenticatedUser) -> Result<Vec<ReportWithOwner>> {
        if actor.is_citizen() {
            let reports = self.reports.list_by_owner(actor.id).await?;
            return Ok(reports
                .into_iter()
                .map(|report| ReportWithOwner {
                    report,
                    owner_name: None,
                })
                .collect());
        }

        Self::require_staff(actor)?;
        self.reports.list_all().await
    }

    pub async fn list_my_reports(&self, actor: &AuthenticatedUser) -> Result<Vec<Report>> {
        Self::require_citizen(actor)?;
        self.reports.list_by_owner(actor.id).await
    }

    /// Fetch a report with its audit trail. Citizens may only read their own.
    pub async fn get_report(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<ReportDetail> {
        let detail = self.load_detail(id).await?;

        if actor.is_citizen() && detail.report.report.owner_user_id != actor.id {
            return Err(AppError::Forbidden(
                "You do not have permission to view this report".to_string(),
            ));
        }

        Ok(detail)
    }

    /// Whether the user owns any report. Report owners must stay citizens.
    pub async fn owner_has_reports(&self, owner_user_id: Uuid) -> Result<bool> {
        self.reports.exists_for_owner(owner_user_id).await
    }

    /// Citizen edit of their own report while it is still `pending`.
    /// Status, owner and images are never touched and no action is logged.
    pub async fn update_report(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        input: UpdateReportDto,
    ) -> Result<Report> {
        Self::require_citizen(actor)?;

        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let category = input.category.as_deref().map(parse_category).transpose()?;

        let data = UpdateReportContent {
            title: trimmed(input.title),
            description: trimmed(input.description),
            category,
            address: trimmed(input.address),
            rt: trimmed(input.rt),
            rw: trimmed(input.rw),
        };

        // Ownership and `pending` are enforced by the write itself
        let Some(report) = self.reports.update_content(id, actor.id, &data).await? else {
            return Err(self.edit_rejection(actor, id).await);
        };

        tracing::info!("Report {} edited by owner {}", id, actor.id);

        Ok(report)
    }

    /// Explains why a conditional content update matched no row
    async fn edit_rejection(&self, actor: &AuthenticatedUser, id: Uuid) -> AppError {
        let existing = match self.reports.find_by_id(id).await {
            Ok(Some(existing)) => existing.report,
            Ok(None) => return AppError::NotFound(format!("Report {} not found", id)),
            Err(e) => return e,
        };

        if existing.owner_user_id != actor.id {
            AppError::Forbidden("You can only edit your own reports".to_string())
        } else if existing.status != ReportStatus::Pending {
            AppError::BadRequest("Only pending reports can be edited".to_string())
        } else {
            AppError::Conflict("Report changed while it was being edited".to_string())
        }
    }

    /// Move a report to any status and record the rationale, as one unit.
    ///
    /// Transitions are not restricted; repeating the same status still
    /// appends a new action.
    pub async fn update_status(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        status: &str,
        action_description: &str,
    ) -> Result<ReportDetail> {
        Self::require_staff(actor)?;

        let status: ReportStatus = status.parse().map_err(AppError::Validation)?;
        let description = require_description(action_description, "actionDescription")?;

        let action = CreateReportAction {
            id: Uuid::now_v7(),
            report_id: id,
            actor_user_id: actor.id,
            description,
        };

        if !self
            .reports
            .update_status_with_action(id, status, &action)
            .await?
        {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::info!("Report {} moved to {} by {}", id, status, actor.id);

        self.load_detail(id).await
    }

    /// Append a note to the audit trail without changing status
    pub async fn add_action(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        description: &str,
    ) -> Result<ReportDetail> {
        Self::require_staff(actor)?;

        let action = CreateReportAction {
            id: Uuid::now_v7(),
            report_id: id,
            actor_user_id: actor.id,
            description: require_description(description, "description")?,
        };

        if !self.reports.add_action(&action).await? {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        tracing::info!("Action added to report {} by {}", id, actor.id);

        self.load_detail(id).await
    }

    pub async fn count_by_status(&self) -> Result<Vec<(ReportStatus, i64)>> {
        self.reports.count_by_status().await
    }

    async fn load_detail(&self, id: Uuid) -> Result<ReportDetail> {
        let report = self
            .reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;
        let actions = self.reports.list_actions(id).await?;

        Ok(ReportDetail { report, actions })
    }
}
