use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::users::models::{User, UserRole};

/// The resolved actor of a request, inserted by the auth middleware
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_citizen(&self) -> bool {
        self.role == UserRole::Citizen
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Check if user has staff-level access (village_staff or admin)
    pub fn has_staff_access(&self) -> bool {
        self.role.is_staff_or_admin()
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
