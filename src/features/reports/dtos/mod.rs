mod report_dto;

pub use report_dto::{
    AddReportActionDto, CreateReportDto, CreateReportForm, ReportActionResponseDto,
    ReportDetailResponseDto, ReportResponseDto, UpdateReportDto, UpdateReportStatusDto,
};
