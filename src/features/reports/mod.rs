//! Report lifecycle: citizen submissions, staff triage and the audit trail.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Role |
//! |--------|----------|------|
//! | POST | `/api/reports` (multipart) | citizen |
//! | GET | `/api/reports` | any (scoped) |
//! | GET | `/api/reports/my-reports` | citizen |
//! | GET | `/api/reports/{id}` | any (owner or staff) |
//! | PUT | `/api/reports/{id}` | citizen owner, pending only |
//! | PUT | `/api/reports/{id}/status` | village_staff, admin |
//! | POST | `/api/reports/{id}/actions` | village_staff, admin |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::ReportService;
