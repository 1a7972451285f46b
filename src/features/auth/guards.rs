//! Role-based authorization guards for the application.
//!
//! These guards extract the authenticated user and verify they have the required roles.
//!
//! Roles:
//! - admin: manages users, moderates articles, triages reports
//! - village_staff: triages reports and writes articles
//! - citizen: submits reports and tracks their own reports
//!
//! Admin includes every staff permission. Citizen-only operations are not
//! inherited by staff or admins.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

fn authenticated(parts: &Parts) -> Result<AuthenticatedUser, AppError> {
    parts
        .extensions
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))
}

/// Guard for checking if user is an admin.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user))
    }
}

/// Guard for checking if user has staff level access.
///
/// Allows users with "village_staff" or "admin" roles.
/// Use this for report triage and article authoring.
pub struct RequireStaff(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.has_staff_access() {
            return Err(AppError::Forbidden(
                "Village staff or admin access required".to_string(),
            ));
        }

        Ok(RequireStaff(user))
    }
}

/// Guard for checking if user is a citizen.
///
/// Only the "citizen" role passes; reports are always owned by citizens.
pub struct RequireCitizen(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireCitizen
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = authenticated(parts)?;

        if !user.is_citizen() {
            return Err(AppError::Forbidden("Citizen access required".to_string()));
        }

        Ok(RequireCitizen(user))
    }
}
