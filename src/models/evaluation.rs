//! Evaluation domain models: rating items, scoring, averages, DTOs.
//!
//! Scores are pure functions of the stored ratings and are computed on
//! read, never persisted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Each rated item scores 1..=5.
pub const MAX_RATING: i16 = 5;

/// Industry evaluation rating items, in form order.
pub const INDUSTRY_ITEMS: [&str; 13] = [
    "basic_work_expectations",
    "knowledge_and_learning",
    "ethical_awareness",
    "interpersonal_relations",
    "communication_skills",
    "attendance",
    "punctuality",
    "flexibility",
    "dependability",
    "culture_fit",
    "dress_code",
    "behaviour",
    "work_productivity",
];

/// Academic evaluation rating items, in form order.
pub const ACADEMIC_ITEMS: [&str; 5] = [
    "understanding_of_internship",
    "support_framework",
    "culture_fit",
    "work_output",
    "general_presentation",
];

/// Draft/submitted lifecycle shared by all three evaluation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Draft,
    Submitted,
}

impl EvaluationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            _ => None,
        }
    }
}

impl std::fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived score breakdown over a set of ratings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ScoreSummary {
    pub total: i32,
    pub max: i32,
    pub out_of_100: f64,
    pub out_of_10: f64,
}

/// Compute the score breakdown for a fixed item count.
///
/// Unset ratings count as zero; `max` is item_count x 5 even when some
/// items are unset.
pub fn score_summary(ratings: &[Option<i16>]) -> ScoreSummary {
    let total: i32 = ratings.iter().map(|r| r.unwrap_or(0) as i32).sum();
    let max = ratings.len() as i32 * MAX_RATING as i32;
    let out_of_100 = if max == 0 {
        0.0
    } else {
        total as f64 / max as f64 * 100.0
    };
    ScoreSummary {
        total,
        max,
        out_of_100,
        out_of_10: out_of_100 / 10.0,
    }
}

/// Combined average over both evaluations of a placement.
///
/// Defined only when both the industry and academic evaluations are
/// submitted; absent otherwise (never zero).
pub fn average_100(industry: Option<f64>, academic: Option<f64>) -> Option<f64> {
    match (industry, academic) {
        (Some(ind), Some(ac)) => Some((ind + ac) / 2.0),
        _ => None,
    }
}

/// Validate a single rating value, with field-level detail on failure.
pub fn validate_rating(field: &str, value: i16) -> Result<i16, String> {
    if (1..=MAX_RATING).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{}: rating must be between 1 and {}", field, MAX_RATING))
    }
}

/// Whether an evaluation may still be entered for a placement ending on
/// `end_date`: allowed once within `window_days` of the end.
pub fn within_entry_window(end_date: NaiveDate, today: NaiveDate, window_days: i64) -> bool {
    (end_date - today).num_days() <= window_days
}

/// One rated item with its optional comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatedItem {
    /// Item key, e.g. "attendance".
    pub item: String,
    #[serde(default)]
    pub rating: Option<i16>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Industry evaluation save/submit payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IndustryEvaluationBody {
    #[serde(default)]
    pub items: Vec<RatedItem>,
    #[serde(default)]
    pub recommend_employment: Option<bool>,
    #[serde(default)]
    pub recommend_comment: Option<String>,
    #[serde(default)]
    pub other_comments: Option<String>,
    #[serde(default)]
    pub supervisor_name: Option<String>,
    #[serde(default)]
    pub supervisor_signature: Option<String>,
}

/// Academic evaluation save/submit payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AcademicEvaluationBody {
    #[serde(default)]
    pub items: Vec<RatedItem>,
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub supervisor_name: Option<String>,
    #[serde(default)]
    pub supervisor_signature: Option<String>,
}

/// Student self-evaluation payload: ten free-text answers.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StudentEvaluationBody {
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub answers: Vec<String>,
}

/// Evaluation response with derived scores.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EvaluationResponse {
    pub id: Uuid,
    pub placement_id: Uuid,
    pub status: EvaluationStatus,
    pub items: Vec<RatedItem>,
    pub score: ScoreSummary,
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommend_employment: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub supervisor_name: Option<String>,
}

/// Student self-evaluation response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentEvaluationResponse {
    pub id: Uuid,
    pub placement_id: Uuid,
    pub status: EvaluationStatus,
    pub program: Option<String>,
    pub internship_site: Option<String>,
    pub eval_date: NaiveDate,
    pub answers: Vec<Option<String>>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Scores attached to a placement row in supervisor-facing views.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlacementScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<ScoreSummary>,
    pub industry_status: Option<EvaluationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub academic: Option<ScoreSummary>,
    pub academic_status: Option<EvaluationStatus>,
    /// Defined only when both evaluations are submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_100: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_all_fours() {
        let ratings = vec![Some(4i16); 13];
        let s = score_summary(&ratings);
        assert_eq!(s.total, 52);
        assert_eq!(s.max, 65);
        assert_eq!(s.out_of_100, 80.0);
        assert_eq!(s.out_of_10, 8.0);
    }

    #[test]
    fn test_unset_ratings_count_as_zero() {
        let mut ratings = vec![Some(5i16); 5];
        ratings[2] = None;
        let s = score_summary(&ratings);
        assert_eq!(s.total, 20);
        assert_eq!(s.max, 25);
        assert_eq!(s.out_of_100, 80.0);
    }

    #[test]
    fn test_score_bounds_and_tenths() {
        for filled in 0..=13 {
            let mut ratings = vec![None; 13];
            for r in ratings.iter_mut().take(filled) {
                *r = Some(5);
            }
            let s = score_summary(&ratings);
            assert!(s.out_of_100 >= 0.0 && s.out_of_100 <= 100.0);
            assert_eq!(s.out_of_10, s.out_of_100 / 10.0);
        }
    }

    #[test]
    fn test_empty_item_set() {
        let s = score_summary(&[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.max, 0);
        assert_eq!(s.out_of_100, 0.0);
    }

    #[test]
    fn test_average_requires_both() {
        assert_eq!(average_100(Some(80.0), Some(90.0)), Some(85.0));
        assert_eq!(average_100(Some(80.0), None), None);
        assert_eq!(average_100(None, Some(90.0)), None);
        assert_eq!(average_100(None, None), None);
    }

    #[test]
    fn test_rating_validation() {
        assert_eq!(validate_rating("attendance", 1), Ok(1));
        assert_eq!(validate_rating("attendance", 5), Ok(5));
        assert!(validate_rating("attendance", 0).is_err());
        assert!(validate_rating("attendance", 6).is_err());
        assert!(
            validate_rating("punctuality", 9)
                .unwrap_err()
                .starts_with("punctuality:")
        );
    }

    #[test]
    fn test_entry_window() {
        let end = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap();
        let far = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let near = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        assert!(!within_entry_window(end, far, 234));
        assert!(within_entry_window(end, near, 234));
        // after the placement ended the window stays open
        let past = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
        assert!(within_entry_window(end, past, 234));
    }
}
