//! Domain models for the internship placement server.

pub mod company;
pub mod evaluation;
pub mod placement;
pub mod principal;
pub mod request;
pub mod results;
pub mod weekly_log;

// Re-export commonly used types
pub use company::{CompanyResponse, CompanyStatus, CreateCompanyRequest, UpdateCompanyStatusRequest};
pub use evaluation::{
    AcademicEvaluationBody, EvaluationResponse, EvaluationStatus, IndustryEvaluationBody,
    PlacementScores, RatedItem, ScoreSummary, StudentEvaluationBody, StudentEvaluationResponse,
    average_100, score_summary,
    validate_rating, within_entry_window, ACADEMIC_ITEMS, INDUSTRY_ITEMS,
};
pub use placement::{
    AssignSupervisorsBody, PlacementResponse, PlacementStatus, SupervisorStudentRow,
    UpdatePlacementStatusBody,
};
pub use principal::{Principal, Role, SessionClaims};
pub use request::{
    RequestResponse, RequestSource, RequestStatus, ReturnForAcceptanceBody, ReviewRequestBody,
    UpdateRequestBody, VerifyAcceptanceBody, validate_company_choice,
};
pub use results::{
    render_results_document, ReportStatus, ResultRow, ResultsReportListResponse,
    ResultsReportResponse, ResultsReportSummary,
};
pub use weekly_log::{
    compose_summary, overlaps_week, week_bounds, CompanyLogAction, CompanyLogActionBody,
    DayEntryContent, LogEntryResponse, MissingLogRow, MissingLogsResponse, UpdateLogEntryBody,
    UpdateWeeklyLogBody, Weekday, WeeklyLogResponse, WeeklyLogStatus, DEFAULT_RETURN_REASON,
};
