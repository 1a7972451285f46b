mod report_service;

pub use report_service::{ReportDetail, ReportService};
