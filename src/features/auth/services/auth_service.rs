use std::sync::Arc;

use crate::core::config::SeedConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::password::verify_password;
use crate::features::auth::services::TokenService;
use crate::features::users::models::{User, UserRole};
use crate::features::users::services::{NewUser, UserService};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Service for authentication operations (register, login, token resolution)
pub struct AuthService {
    users: Arc<UserService>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<UserService>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    fn auth_response(&self, user: User) -> Result<AuthResponseDto> {
        let issued = self.tokens.issue(&user)?;
        Ok(AuthResponseDto {
            token: issued.access_token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
            user: user.into(),
        })
    }

    /// Register a citizen account. The role is never chosen by the client.
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
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
                role: UserRole::Citizen,
            })
            .await?;

        tracing::info!("Citizen registered: {}", user.id);
        self.auth_response(user)
    }

    /// Login with email and password. Unknown email and wrong password fail alike.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .users
            .find_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&dto.password, &user.password_hash)? {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        tracing::info!("User logged in: {}", user.id);
        self.auth_response(user)
    }

    /// Resolve a bearer token to the current state of its user.
    ///
    /// The user is re-read on every call, so deleted accounts lose access and
    /// role changes apply immediately.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.tokens.verify(token)?;

        let user = self
            .users
            .get_user(claims.sub)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::Unauthorized("User no longer exists".to_string())
                }
                other => other,
            })?;

        Ok(AuthenticatedUser::from(&user))
    }

    /// Full record of the signed-in user (for /me)
    pub async fn current_user(&self, actor: &AuthenticatedUser) -> Result<User> {
        self.users.get_user(actor.id).await
    }

    /// Create the configured admin account if its email is still free
    pub async fn seed_admin(&self, config: &SeedConfig) -> Result<()> {
        let Some((email, password)) = config.admin_credentials() else {
            tracing::info!("Admin seeding skipped (ADMIN_EMAIL/ADMIN_PASSWORD not set)");
            return Ok(());
        };

        if self.users.find_by_email(email).await?.is_some() {
            tracing::info!("Admin account {} already exists", email);
            return Ok(());
        }

        let admin = self
            .users
            .create_user(NewUser {
                full_name: config.admin_name.clone(),
                email: email.to_string(),
                password: password.to_string(),
                phone_number: None,
                address: None,
                rt: None,
                rw: None,
                role: UserRole::Admin,
            })
            .await?;

        tracing::info!("Seeded admin account: {} ({})", admin.email, admin.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{auth_config, new_user, InMemoryStore, TEST_PASSWORD};

    fn service() -> (AuthService, Arc<UserService>) {
        let users = Arc::new(UserService::new(Arc::new(InMemoryStore::default())));
        let tokens = Arc::new(TokenService::new(&auth_config()));
        (AuthService::new(users.clone(), tokens), users)
    }

    fn register_dto(email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            full_name: "Siti Aminah".to_string(),
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            phone_number: None,
            address: Some("Jl. Melati 3".to_string()),
            rt: Some("001".to_string()),
            rw: Some("002".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_creates_citizen_and_token() {
        let (service, _) = service();

        let response = service.register(register_dto("siti@desa.id")).await.unwrap();

        assert_eq!(response.user.role, UserRole::Citizen);
        assert_eq!(response.token_type, "Bearer");
        let actor = service.authenticate(&response.token).await.unwrap();
        assert_eq!(actor.id, response.user.id);
        assert_eq!(actor.full_name, "Siti Aminah");
    }

    #[tokio::test]
    async fn test_login_failures_share_one_message() {
        let (service, _) = service();
        service.register(register_dto("siti@desa.id")).await.unwrap();

        let wrong_password = service
            .login(LoginRequestDto {
                email: "siti@desa.id".to_string(),
                password: "salah".to_string(),
            })
            .await
            .unwrap_err();
        let unknown_email = service
            .login(LoginRequestDto {
                email: "nobody@desa.id".to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_login_is_case_insensitive_on_email() {
        let (service, _) = service();
        service.register(register_dto("siti@desa.id")).await.unwrap();

        let response = service
            .login(LoginRequestDto {
                email: "Siti@Desa.ID".to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(response.user.email, "siti@desa.id");
    }

    #[tokio::test]
    async fn test_token_of_deleted_user_is_rejected() {
        let (service, users) = service();
        let response = service.register(register_dto("siti@desa.id")).await.unwrap();

        users.delete_user(response.user.id).await.unwrap();

        assert!(matches!(
            service.authenticate(&response.token).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_role_change_applies_to_existing_token() {
        let (service, users) = service();
        let user = users
            .create_user(new_user("Pak RT", "rt@desa.id", UserRole::Citizen))
            .await
            .unwrap();
        let token = service.auth_response(user.clone()).unwrap().token;

        users
            .update_user(
                user.id,
                crate::features::users::services::UserChanges {
                    role: Some(UserRole::VillageStaff),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let actor = service.authenticate(&token).await.unwrap();
        assert_eq!(actor.role, UserRole::VillageStaff);
    }

    #[tokio::test]
    async fn test_seed_admin_runs_once() {
        let (service, users) = service();
        let config = SeedConfig {
            admin_email: Some("admin@desa.id".to_string()),
            admin_password: Some("admin123".to_string()),
            admin_name: "Administrator".to_string(),
        };

        service.seed_admin(&config).await.unwrap();
        service.seed_admin(&config).await.unwrap();

        let admins = users.list_users(Some(UserRole::Admin)).await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, "admin@desa.id");
    }
}
