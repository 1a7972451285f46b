//! Administration: user management and aggregate statistics.
//!
//! Every route is nested under `/api/admin` and requires the admin role.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;
