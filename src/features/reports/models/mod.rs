mod report;
pub mod report_action;
mod report_category;

pub use report::{
    encode_images, CreateReport, Report, ReportRow, ReportStatus, ReportWithOwner,
    ReportWithOwnerRow, UpdateReportContent,
};
pub use report_action::{CreateReportAction, ReportActionWithActor};
pub use report_category::ReportCategory;
