//! User accounts and self-service profile.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | PUT | `/api/auth/profile` | Update own name, contact details, RT/RW or password |
//!
//! Account creation lives in `auth` (registration) and `admin` (any role).

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::UserService;
