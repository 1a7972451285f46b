use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::password::hash_password;
use crate::features::users::models::{CreateUser, UpdateUser, User, UserRole};
use crate::features::users::repositories::UserRepository;

/// Plaintext input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub rt: Option<String>,
    pub rw: Option<String>,
    pub role: UserRole,
}

/// Plaintext changes to a user; `password` is hashed before the write
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub rt: Option<String>,
    pub rw: Option<String>,
    pub role: Option<UserRole>,
}

/// Service for user records shared by auth, profile and admin flows
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn create_user(&self, input: NewUser) -> Result<User> {
        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Email {} is already registered",
                email
            )));
        }

        let data = CreateUser {
            id: Uuid::now_v7(),
            full_name: input.full_name.trim().to_string(),
            email,
            password_hash: hash_password(&input.password)?,
            phone_number: trimmed(input.phone_number),
            address: trimmed(input.address),
            rt: trimmed(input.rt),
            rw: trimmed(input.rw),
            role: input.role,
        };

        let user = self.users.create(&data).await?;
        tracing::info!("Created user: {} with role {}", user.id, user.role);
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users.find_by_email(&normalize_email(email)).await
    }

    pub async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>> {
        self.users.list(role).await
    }

    pub async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<User> {
        let email = changes.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.id != id {
                    return Err(AppError::Conflict(format!(
                        "Email {} is already registered",
                        email
                    )));
                }
            }
        }

        let password_hash = match changes.password.as_deref() {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let data = UpdateUser {
            full_name: trimmed(changes.full_name),
            email,
            password_hash,
            phone_number: trimmed(changes.phone_number),
            address: trimmed(changes.address),
            rt: trimmed(changes.rt),
            rw: trimmed(changes.rw),
            role: changes.role,
        };

        let user = self
            .users
            .update(id, &data)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        tracing::info!("Updated user: {}", id);
        Ok(user)
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<()> {
        if !self.users.delete(id).await? {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        tracing::info!("Deleted user: {}", id);
        Ok(())
    }

    pub async fn count_by_role(&self) -> Result<Vec<(UserRole, i64)>> {
        self.users.count_by_role().await
    }
}
