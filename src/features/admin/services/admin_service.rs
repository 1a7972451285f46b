use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{
    ArticleStatsDto, CreateUserDto, ReportStatsDto, StatsResponseDto, UpdateUserDto,
    UserStatsDto,
};
use crate::features::articles::models::ArticleStatus;
use crate::features::articles::ArticleService;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::models::ReportStatus;
use crate::features::reports::ReportService;
use crate::features::users::models::{User, UserRole};
use crate::features::users::services::{NewUser, UserChanges, UserService};

/// Service for admin user management and statistics
pub struct AdminService {
    users: Arc<UserService>,
    reports: Arc<ReportService>,
    articles: Arc<ArticleService>,
}

fn parse_role(value: &str) -> Result<UserRole> {
    value.parse().map_err(AppError::Validation)
}

impl AdminService {
    pub fn new(
        users: Arc<UserService>,
        reports: Arc<ReportService>,
        articles: Arc<ArticleService>,
    ) -> Self {
        Self {
            users,
            reports,
            articles,
        }
    }

    fn require_admin(actor: &AuthenticatedUser) -> Result<()> {
        if !actor.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // USERS
    // =========================================================================

    pub async fn list_users(
        &self,
        actor: &AuthenticatedUser,
        role: Option<&str>,
    ) -> Result<Vec<User>> {
        Self::require_admin(actor)?;
        let role = role
            .filter(|r| !r.trim().is_empty())
            .map(parse_role)
            .transpose()?;
        self.users.list_users(role).await
    }

    pub async fn get_user(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<User> {
        Self::require_admin(actor)?;
        self.users.get_user(id).await
    }

    pub async fn create_user(&self, actor: &AuthenticatedUser, dto: CreateUserDto) -> Result<User> {
        Self::require_admin(actor)?;
        let role = match dto.role.as_deref() {
            Some(role) => parse_role(role)?,
            None => UserRole::Citizen,
        };

        let user = self
            .users
            .create_user(NewUser {
                full_name: dto.full_name,
                email: dto.email,
                password: dto.password,
                phone_number: dto.phone_number,
                address: dto.address,
                rt: dto.rt,
                rw: dto.rw,
                role,
            })
            .await?;

        tracing::info!("Admin {} created user {} as {}", actor.id, user.id, user.role);
        Ok(user)
    }

    pub async fn update_user(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<User> {
        Self::require_admin(actor)?;
        let role = dto.role.as_deref().map(parse_role).transpose()?;

        let leaves_citizen = role.is_some_and(|r| r != UserRole::Citizen);
        if leaves_citizen && self.reports.owner_has_reports(id).await? {
            return Err(AppError::Conflict(
                "User owns reports and must remain a citizen".to_string(),
            ));
        }

        self.users
            .update_user(
                id,
                UserChanges {
                    full_name: dto.full_name,
                    email: dto.email,
                    password: dto.password,
                    phone_number: dto.phone_number,
                    address: dto.address,
                    rt: dto.rt,
                    rw: dto.rw,
                    role,
                },
            )
            .await
    }

    /// Hard delete. Admins cannot delete themselves; users still referenced
    /// by reports or report actions are a conflict.
    pub async fn delete_user(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        Self::require_admin(actor)?;
        if actor.id == id {
            return Err(AppError::BadRequest(
                "You cannot delete your own account".to_string(),
            ));
        }
        self.users.delete_user(id).await
    }

    // =========================================================================
    // STATS
    // =========================================================================

    pub async fn stats(&self, actor: &AuthenticatedUser) -> Result<StatsResponseDto> {
        Self::require_admin(actor)?;

        let mut users = UserStatsDto::default();
        for (role, count) in self.users.count_by_role().await? {
            users.total += count;
            match role {
                UserRole::Citizen => users.citizens += count,
                UserRole::VillageStaff => users.village_staff += count,
                UserRole::Admin => users.admins += count,
            }
        }

        let mut reports = ReportStatsDto::default();
        for (status, count) in self.reports.count_by_status().await? {
            reports.total += count;
            match status {
                ReportStatus::Pending => reports.pending += count,
                ReportStatus::Received => reports.received += count,
                ReportStatus::InProgress => reports.in_progress += count,
                ReportStatus::Completed => reports.completed += count,
                ReportStatus::Rejected => reports.rejected += count,
            }
        }

        let mut articles = ArticleStatsDto::default();
        for (status, count) in self.articles.count_by_status().await? {
            articles.total += count;
            match status {
                ArticleStatus::Pending => articles.pending += count,
                ArticleStatus::Approved => articles.approved += count,
                ArticleStatus::Rejected => articles.rejected += count,
            }
        }

        Ok(StatsResponseDto {
            users,
            reports,
            articles,
        })
    }
}
