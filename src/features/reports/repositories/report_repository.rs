use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    encode_images, CreateReport, CreateReportAction, Report, ReportActionWithActor, ReportRow,
    ReportStatus, ReportWithOwner, ReportWithOwnerRow, UpdateReportContent,
};

/// Persistence port for reports and their audit trail
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, data: &CreateReport) -> Result<Report>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReportWithOwner>>;
    /// Reports owned by one user, newest first
    async fn list_by_owner(&self, owner_user_id: Uuid) -> Result<Vec<Report>>;
    /// Every report with the owner's name, newest first
    async fn list_all(&self) -> Result<Vec<ReportWithOwner>>;
    /// Whether the user owns at least one report
    async fn exists_for_owner(&self, owner_user_id: Uuid) -> Result<bool>;
    /// Rewrites content only while the report belongs to `owner_user_id` and
    /// is still `pending`. Returns `None` when no row matched.
    async fn update_content(
        &self,
        id: Uuid,
        owner_user_id: Uuid,
        data: &UpdateReportContent,
    ) -> Result<Option<Report>>;
    /// Sets the status and appends the action as one unit of work.
    /// Returns `false` (and writes nothing) when the report does not exist.
    async fn update_status_with_action(
        &self,
        id: Uuid,
        status: ReportStatus,
        action: &CreateReportAction,
    ) -> Result<bool>;
    /// Appends a note. Returns `false` when the report does not exist.
    async fn add_action(&self, action: &CreateReportAction) -> Result<bool>;
    /// Audit entries of a report in creation order
    async fn list_actions(&self, report_id: Uuid) -> Result<Vec<ReportActionWithActor>>;
    async fn count_by_status(&self) -> Result<Vec<(ReportStatus, i64)>>;
}

const REPORT_COLUMNS: &str = "r.id, r.title, r.description, r.category, r.address, r.rt, r.rw, \
                              r.images, r.status, r.owner_user_id, r.created_at, r.updated_at";

pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_action<'e, E>(executor: E, action: &CreateReportAction) -> Result<()>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO report_actions (id, report_id, actor_user_id, description)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(action.id)
    .bind(action.report_id)
    .bind(action.actor_user_id)
    .bind(&action.description)
    .execute(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert report action: {:?}", e);
        AppError::Database(e)
    })?;

    Ok(())
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn create(&self, data: &CreateReport) -> Result<Report> {
        let images = encode_images(&data.images)?;
        let sql = format!(
            r#"
            INSERT INTO reports AS r (id, title, description, category, address, rt, rw, images, status, owner_user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9)
            RETURNING {REPORT_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ReportRow>(&sql)
            .bind(data.id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.category)
            .bind(&data.address)
            .bind(&data.rt)
            .bind(&data.rw)
            .bind(images)
            .bind(data.owner_user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create report: {:?}", e);
                AppError::Database(e)
            })?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReportWithOwner>> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}, u.full_name AS owner_name
            FROM reports r
            LEFT JOIN users u ON u.id = r.owner_user_id
            WHERE r.id = $1
            "#
        );

        sqlx::query_as::<_, ReportWithOwnerRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get report: {:?}", e);
                AppError::Database(e)
            })?
            .map(ReportWithOwner::try_from)
            .transpose()
    }

    async fn list_by_owner(&self, owner_user_id: Uuid) -> Result<Vec<Report>> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}
            FROM reports r
            WHERE r.owner_user_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            "#
        );

        sqlx::query_as::<_, ReportRow>(&sql)
            .bind(owner_user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports by owner: {:?}", e);
                AppError::Database(e)
            })?
            .into_iter()
            .map(Report::try_from)
            .collect()
    }

    async fn list_all(&self) -> Result<Vec<ReportWithOwner>> {
        let sql = format!(
            r#"
            SELECT {REPORT_COLUMNS}, u.full_name AS owner_name
            FROM reports r
            LEFT JOIN users u ON u.id = r.owner_user_id
            ORDER BY r.created_at DESC, r.id DESC
            "#
        );

        sqlx::query_as::<_, ReportWithOwnerRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list reports: {:?}", e);
                AppError::Database(e)
            })?
            .into_iter()
            .map(ReportWithOwner::try_from)
            .collect()
    }

    async fn exists_for_owner(&self, owner_user_id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM reports WHERE owner_user_id = $1)",
        )
        .bind(owner_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check report ownership: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn update_content(
        &self,
        id: Uuid,
        owner_user_id: Uuid,
        data: &UpdateReportContent,
    ) -> Result<Option<Report>> {
        let sql = format!(
            r#"
            UPDATE reports AS r
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                address = COALESCE($5, address),
                rt = COALESCE($6, rt),
                rw = COALESCE($7, rw),
                updated_at = NOW()
            WHERE id = $1 AND owner_user_id = $8 AND status = 'pending'
            RETURNING {REPORT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, ReportRow>(&sql)
            .bind(id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(data.category)
            .bind(&data.address)
            .bind(&data.rt)
            .bind(&data.rw)
            .bind(owner_user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update report content: {:?}", e);
                AppError::Database(e)
            })?
            .map(Report::try_from)
            .transpose()
    }

    async fn update_status_with_action(
        &self,
        id: Uuid,
        status: ReportStatus,
        action: &CreateReportAction,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        let updated = sqlx::query(
            r#"
            UPDATE reports
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report status: {:?}", e);
            AppError::Database(e)
        })?;

        if updated.rows_affected() == 0 {
            // Dropping the transaction rolls it back
            return Ok(false);
        }

        insert_action(&mut *tx, action).await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit status update: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(true)
    }

    async fn add_action(&self, action: &CreateReportAction) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction: {:?}", e);
            AppError::Database(e)
        })?;

        // Lock the report row so the note cannot race a concurrent delete
        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM reports WHERE id = $1 FOR UPDATE")
            .bind(action.report_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to lock report: {:?}", e);
                AppError::Database(e)
            })?
            .is_some();

        if !exists {
            return Ok(false);
        }

        sqlx::query("UPDATE reports SET updated_at = NOW() WHERE id = $1")
            .bind(action.report_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to touch report: {:?}", e);
                AppError::Database(e)
            })?;

        insert_action(&mut *tx, action).await?;

        tx.commit().await.map_err(|e| {
            tracing::error!("Failed to commit report action: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(true)
    }

    async fn list_actions(&self, report_id: Uuid) -> Result<Vec<ReportActionWithActor>> {
        sqlx::query_as::<_, ReportActionWithActor>(
            r#"
            SELECT
                a.id, a.report_id, a.actor_user_id, a.description, a.created_at,
                u.full_name AS actor_name
            FROM report_actions a
            LEFT JOIN users u ON u.id = a.actor_user_id
            WHERE a.report_id = $1
            ORDER BY a.created_at ASC, a.id ASC
            "#,
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list report actions: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn count_by_status(&self) -> Result<Vec<(ReportStatus, i64)>> {
        sqlx::query_as::<_, (ReportStatus, i64)>(
            "SELECT status, COUNT(*) FROM reports GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count reports: {:?}", e);
            AppError::Database(e)
        })
    }
}
