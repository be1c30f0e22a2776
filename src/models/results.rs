//! Supervisor results report models: snapshot rows, status, export rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Results report lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    Submitted,
    Received,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Received => "received",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "received" => Some(Self::Received),
            _ => None,
        }
    }

    /// Single source of truth for legal report transitions.
    pub fn can_transition(self, to: ReportStatus) -> bool {
        use ReportStatus::*;
        matches!((self, to), (Draft, Submitted) | (Submitted, Received))
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One per-student score row, captured into the report's JSONB snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ResultRow {
    pub placement_id: Uuid,
    pub reg_no: String,
    pub name: String,
    pub company: String,
    pub industry_100: Option<f64>,
    pub academic_100: Option<f64>,
    pub average_100: Option<f64>,
}

/// Results report response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResultsReportResponse {
    pub id: Uuid,
    pub supervisor_user_id: Uuid,
    pub supervisor_name: String,
    pub status: ReportStatus,
    pub rows: Vec<ResultRow>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Summary of a report for the coordinator's list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResultsReportSummary {
    pub id: Uuid,
    pub supervisor_name: String,
    pub status: ReportStatus,
    pub row_count: usize,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Coordinator list response with pending/received counts.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResultsReportListResponse {
    pub reports: Vec<ResultsReportSummary>,
    pub pending_count: usize,
    pub received_count: usize,
}

/// Render a score cell: nearest integer, "-" when absent.
fn score_cell(score: Option<f64>) -> String {
    match score {
        Some(v) => format!("{}", v.round() as i64),
        None => "-".to_string(),
    }
}

/// Truncate a display value to `max` characters.
fn truncated(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Render the results rows as a plain-text document artifact.
///
/// Columns are fixed: reg_no (14 chars), student name (28 chars),
/// Ind/100, Acad/100, Avg/100.
pub fn render_results_document(title: &str, subtitle: &str, rows: &[ResultRow]) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(subtitle);
    out.push_str("\n\n");
    out.push_str(&format!(
        "{:<16}{:<30}{:>8}{:>9}{:>8}\n",
        "Reg No", "Student", "Ind/100", "Acad/100", "Avg/100"
    ));

    for row in rows {
        out.push_str(&format!(
            "{:<16}{:<30}{:>8}{:>9}{:>8}\n",
            truncated(&row.reg_no, 14),
            truncated(&row.name, 28),
            score_cell(row.industry_100),
            score_cell(row.academic_100),
            score_cell(row.average_100),
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_transitions() {
        use ReportStatus::*;
        assert!(Draft.can_transition(Submitted));
        assert!(Submitted.can_transition(Received));
        assert!(!Received.can_transition(Submitted));
        assert!(!Received.can_transition(Draft));
        assert!(!Submitted.can_transition(Draft));
        assert!(!Draft.can_transition(Received));
    }

    fn row(reg_no: &str, name: &str, ind: Option<f64>, ac: Option<f64>) -> ResultRow {
        let avg = crate::models::evaluation::average_100(ind, ac);
        ResultRow {
            placement_id: Uuid::new_v4(),
            reg_no: reg_no.to_string(),
            name: name.to_string(),
            company: "Acme Ltd".to_string(),
            industry_100: ind,
            academic_100: ac,
            average_100: avg,
        }
    }

    #[test]
    fn test_render_rounds_and_dashes() {
        let rows = vec![
            row("REG-001", "Amina Okafor", Some(80.0), Some(90.0)),
            row("REG-002", "Brian Chen", Some(76.5), None),
        ];
        let doc = render_results_document("Results", "Week 1", &rows);

        let lines: Vec<&str> = doc.lines().collect();
        assert_eq!(lines[0], "Results");
        // header + two data rows after the blank line
        assert!(lines[3].contains("Reg No"));
        assert!(lines[4].contains("80"));
        assert!(lines[4].contains("90"));
        assert!(lines[4].contains("85"));
        // 76.5 rounds to 77; missing academic and average render as "-"
        assert!(lines[5].contains("77"));
        assert!(lines[5].matches('-').count() >= 2);
    }

    #[test]
    fn test_render_truncates_long_fields() {
        let rows = vec![row(
            "REGISTRATION-NUMBER-TOO-LONG",
            "A Student With A Very Long Display Name Indeed",
            None,
            None,
        )];
        let doc = render_results_document("Results", "", &rows);
        let data_line = doc.lines().nth(4).unwrap();
        assert!(data_line.contains("REGISTRATION-N"));
        assert!(!data_line.contains("REGISTRATION-NU"));
        assert!(data_line.contains("A Student With A Very Long D"));
        assert!(!data_line.contains("A Student With A Very Long Di"));
    }
}
