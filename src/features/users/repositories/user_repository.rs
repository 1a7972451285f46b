use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::database::{foreign_key_violation, unique_violation};
use crate::core::error::{AppError, Result};
use crate::features::users::models::{CreateUser, UpdateUser, User, UserRole};

/// Persistence port for user records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered
    async fn create(&self, data: &CreateUser) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Newest first, optionally restricted to one role
    async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>>;
    async fn update(&self, id: Uuid, data: &UpdateUser) -> Result<Option<User>>;
    /// Hard delete. Fails with `Conflict` while reports or actions still reference the user
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn count_by_role(&self) -> Result<Vec<(UserRole, i64)>>;
}

const USER_COLUMNS: &str = "id, full_name, email, password_hash, phone_number, address, rt, rw, \
                            role, created_at, updated_at";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, data: &CreateUser) -> Result<User> {
        let sql = format!(
            r#"
            INSERT INTO users (id, full_name, email, password_hash, phone_number, address, rt, rw, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(data.id)
            .bind(&data.full_name)
            .bind(&data.email)
            .bind(&data.password_hash)
            .bind(&data.phone_number)
            .bind(&data.address)
            .bind(&data.rt)
            .bind(&data.rw)
            .bind(data.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if unique_violation(&e) {
                    return AppError::Conflict(format!("Email {} is already registered", data.email));
                }
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get user by email: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list(&self, role: Option<UserRole>) -> Result<Vec<User>> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
            ORDER BY created_at DESC, id DESC
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(role)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list users: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn update(&self, id: Uuid, data: &UpdateUser) -> Result<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
            SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                phone_number = COALESCE($5, phone_number),
                address = COALESCE($6, address),
                rt = COALESCE($7, rt),
                rw = COALESCE($8, rw),
                role = COALESCE($9, role),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&data.full_name)
            .bind(&data.email)
            .bind(&data.password_hash)
            .bind(&data.phone_number)
            .bind(&data.address)
            .bind(&data.rt)
            .bind(&data.rw)
            .bind(data.role)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                if unique_violation(&e) {
                    return AppError::Conflict("Email is already registered".to_string());
                }
                tracing::error!("Failed to update user: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if foreign_key_violation(&e) {
                    return AppError::Conflict(
                        "User still owns reports or report actions and cannot be deleted"
                            .to_string(),
                    );
                }
                tracing::error!("Failed to delete user: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_role(&self) -> Result<Vec<(UserRole, i64)>> {
        sqlx::query_as::<_, (UserRole, i64)>(
            "SELECT role, COUNT(*) FROM users GROUP BY role",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to count users: {:?}", e);
            AppError::Database(e)
        })
    }
}
