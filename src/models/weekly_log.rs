//! Weekly log domain models: status machine, weekday entries, week math.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Default reason applied when a company returns a log without one.
pub const DEFAULT_RETURN_REASON: &str = "Please revise and resubmit.";

/// Weekly log workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyLogStatus {
    Draft,
    Submitted,
    ReturnedForEdit,
    ApprovedByCompany,
}

impl WeeklyLogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::ReturnedForEdit => "returned_for_edit",
            Self::ApprovedByCompany => "approved_by_company",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "returned_for_edit" => Some(Self::ReturnedForEdit),
            "approved_by_company" => Some(Self::ApprovedByCompany),
            _ => None,
        }
    }

    /// A log counts toward weekly coverage once the student has submitted it.
    pub fn counts_as_submitted(&self) -> bool {
        matches!(self, Self::Submitted | Self::ApprovedByCompany)
    }

    /// Single source of truth for legal weekly-log transitions.
    pub fn can_transition(self, to: WeeklyLogStatus) -> bool {
        use WeeklyLogStatus::*;
        matches!(
            (self, to),
            (Draft, Submitted)
                | (Submitted, ApprovedByCompany)
                | (Submitted, ReturnedForEdit)
                | (ReturnedForEdit, Submitted)
        )
    }
}

impl std::fmt::Display for WeeklyLogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Weekdays covered by a log's per-day entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Weekday {
    /// All entry days, Monday first.
    pub const ALL: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mon" => Some(Self::Mon),
            "tue" => Some(Self::Tue),
            "wed" => Some(Self::Wed),
            "thu" => Some(Self::Thu),
            "fri" => Some(Self::Fri),
            _ => None,
        }
    }

    /// Display name used in the derived summary text.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mon => "Monday",
            Self::Tue => "Tuesday",
            Self::Wed => "Wednesday",
            Self::Thu => "Thursday",
            Self::Fri => "Friday",
        }
    }

    /// Ordering key, Monday = 0.
    pub fn order(&self) -> u8 {
        match self {
            Self::Mon => 0,
            Self::Tue => 1,
            Self::Wed => 2,
            Self::Thu => 3,
            Self::Fri => 4,
        }
    }
}

/// Bounds of the ISO week (Monday..Sunday) containing `today`.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let end = start + Duration::days(6);
    (start, end)
}

/// Inclusive date-range overlap test between a log and a week.
pub fn overlaps_week(
    log_from: NaiveDate,
    log_to: NaiveDate,
    week_start: NaiveDate,
    week_end: NaiveDate,
) -> bool {
    log_from <= week_end && log_to >= week_start
}

/// One per-day entry's content, used when recomputing the summary.
#[derive(Debug, Clone)]
pub struct DayEntryContent {
    pub day: Weekday,
    pub work_assignment: String,
    pub activities_steps: String,
}

/// Recompute the legacy free-text summary from the per-day entries.
///
/// Each day with content contributes one line; days are ordered Monday
/// first regardless of input order, and blank days are skipped.
pub fn compose_summary(entries: &[DayEntryContent]) -> String {
    let mut ordered: Vec<&DayEntryContent> = entries.iter().collect();
    ordered.sort_by_key(|e| e.day.order());

    let mut lines = Vec::new();
    for entry in ordered {
        let wa = entry.work_assignment.trim();
        let st = entry.activities_steps.trim();
        if !wa.is_empty() || !st.is_empty() {
            lines.push(format!("{}: {} | {}", entry.day.display_name(), wa, st));
        }
    }
    lines.join("\n")
}

/// Student-editable log fields.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateWeeklyLogBody {
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[serde(default)]
    pub challenges: Option<String>,
    #[serde(default)]
    pub lessons: Option<String>,
    /// Per-day entries; days not listed keep their stored content.
    #[serde(default)]
    pub entries: Vec<UpdateLogEntryBody>,
}

/// One editable per-day entry.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateLogEntryBody {
    pub day: Weekday,
    #[serde(default)]
    pub work_assignment: Option<String>,
    #[serde(default)]
    pub activities_steps: Option<String>,
}

/// Company action on a submitted log.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CompanyLogActionBody {
    pub action: CompanyLogAction,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Approve or return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompanyLogAction {
    Approve,
    Return,
}

/// Weekly log response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WeeklyLogResponse {
    pub id: Uuid,
    pub placement_id: Uuid,
    pub week_no: i32,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub activities: String,
    pub challenges: Option<String>,
    pub lessons: Option<String>,
    pub attachment_key: Option<String>,
    pub status: WeeklyLogStatus,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub return_reason: Option<String>,
    pub entries: Vec<LogEntryResponse>,
}

/// Per-day entry response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogEntryResponse {
    pub day: Weekday,
    pub work_assignment: String,
    pub activities_steps: String,
}

/// Row in the coordinator's missing-log view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MissingLogRow {
    pub placement_id: Uuid,
    pub student_reg_no: String,
    pub student_name: String,
    pub company_name: String,
}

/// Coordinator missing-log view response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MissingLogsResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub missing: Vec<MissingLogRow>,
    pub count_missing: usize,
    pub count_active: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_transitions() {
        use WeeklyLogStatus::*;
        assert!(Draft.can_transition(Submitted));
        assert!(Submitted.can_transition(ApprovedByCompany));
        assert!(Submitted.can_transition(ReturnedForEdit));
        assert!(ReturnedForEdit.can_transition(Submitted));

        assert!(!ApprovedByCompany.can_transition(Submitted));
        assert!(!ApprovedByCompany.can_transition(ReturnedForEdit));
        assert!(!Draft.can_transition(ApprovedByCompany));
        assert!(!ReturnedForEdit.can_transition(ApprovedByCompany));
    }

    #[test]
    fn test_week_bounds_monday_to_sunday() {
        // 2026-08-05 is a Wednesday
        let wednesday = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
        let (start, end) = week_bounds(wednesday);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 8, 9).unwrap());

        // A Monday is its own week start
        let (start, end) = week_bounds(start);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 3).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 8, 9).unwrap());
    }

    #[test]
    fn test_overlap_is_inclusive() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 8, day).unwrap();
        let (wk_start, wk_end) = (d(3), d(9));

        // log ending exactly on week start still overlaps
        assert!(overlaps_week(d(1), d(3), wk_start, wk_end));
        // log starting exactly on week end still overlaps
        assert!(overlaps_week(d(9), d(13), wk_start, wk_end));
        // fully inside
        assert!(overlaps_week(d(4), d(8), wk_start, wk_end));
        // fully before / fully after
        assert!(!overlaps_week(d(1), d(2), wk_start, wk_end));
        assert!(!overlaps_week(d(10), d(14), wk_start, wk_end));
    }

    #[test]
    fn test_compose_summary_skips_blank_days_and_orders() {
        let entries = vec![
            DayEntryContent {
                day: Weekday::Wed,
                work_assignment: "Deploy".to_string(),
                activities_steps: "Staged rollout".to_string(),
            },
            DayEntryContent {
                day: Weekday::Mon,
                work_assignment: "Onboarding".to_string(),
                activities_steps: "".to_string(),
            },
            DayEntryContent {
                day: Weekday::Tue,
                work_assignment: "   ".to_string(),
                activities_steps: "".to_string(),
            },
        ];

        let summary = compose_summary(&entries);
        assert_eq!(summary, "Monday: Onboarding | \nWednesday: Deploy | Staged rollout");
    }

    #[test]
    fn test_compose_summary_empty() {
        assert_eq!(compose_summary(&[]), "");
    }
}
