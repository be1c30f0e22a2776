//! Internship request domain models: status machine, source, and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// How the request's company was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestSource {
    StudentSelected,
    StudentProposed,
    UniversityAssigned,
}

impl RequestSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StudentSelected => "student_selected",
            Self::StudentProposed => "student_proposed",
            Self::UniversityAssigned => "university_assigned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student_selected" => Some(Self::StudentSelected),
            "student_proposed" => Some(Self::StudentProposed),
            "university_assigned" => Some(Self::UniversityAssigned),
            _ => None,
        }
    }
}

/// Internship request workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Draft,
    Submitted,
    UnderReview,
    Recommended,
    AcceptanceUploaded,
    AcceptanceVerified,
    Rejected,
    ReturnedForAcceptance,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Recommended => "recommended",
            Self::AcceptanceUploaded => "acceptance_uploaded",
            Self::AcceptanceVerified => "acceptance_verified",
            Self::Rejected => "rejected",
            Self::ReturnedForAcceptance => "returned_for_acceptance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            "under_review" => Some(Self::UnderReview),
            "recommended" => Some(Self::Recommended),
            "acceptance_uploaded" => Some(Self::AcceptanceUploaded),
            "acceptance_verified" => Some(Self::AcceptanceVerified),
            "rejected" => Some(Self::Rejected),
            "returned_for_acceptance" => Some(Self::ReturnedForAcceptance),
            _ => None,
        }
    }

    /// Single source of truth for legal request transitions.
    pub fn can_transition(self, to: RequestStatus) -> bool {
        use RequestStatus::*;
        matches!(
            (self, to),
            (Draft, Submitted)
                | (Submitted, UnderReview)
                | (UnderReview, UnderReview)
                | (UnderReview, Rejected)
                | (UnderReview, Recommended)
                | (Recommended, AcceptanceUploaded)
                | (Recommended, ReturnedForAcceptance)
                | (ReturnedForAcceptance, AcceptanceUploaded)
                | (ReturnedForAcceptance, ReturnedForAcceptance)
                | (AcceptanceUploaded, AcceptanceUploaded)
                | (AcceptanceUploaded, AcceptanceVerified)
        )
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of the submit-time company-choice guard.
///
/// A request may be submitted with exactly one of: an approved company
/// picked from the directory, or a proposed (unregistered) company name.
pub fn validate_company_choice(
    preferred_company: Option<Uuid>,
    proposed_company_name: &str,
) -> Result<RequestSource, &'static str> {
    let proposed = !proposed_company_name.trim().is_empty();
    match (preferred_company.is_some(), proposed) {
        (true, false) => Ok(RequestSource::StudentSelected),
        (false, true) => Ok(RequestSource::StudentProposed),
        (false, false) => {
            Err("Select an approved company or propose a company before submitting")
        }
        (true, true) => Err("Pick either an approved company or a proposed company, not both"),
    }
}

/// Student-editable request fields.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateRequestBody {
    #[serde(default)]
    pub preferred_company_id: Option<Uuid>,
    #[serde(default)]
    pub proposed_company_name: Option<String>,
    #[serde(default)]
    pub proposed_company_district: Option<String>,
    #[serde(default)]
    pub proposed_company_address: Option<String>,
    #[serde(default)]
    pub proposed_company_contact: Option<String>,
    #[serde(default)]
    pub preferred_field: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Coordinator review actions.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReviewRequestBody {
    /// Review notes; required when rejecting.
    #[serde(default)]
    pub review_notes: Option<String>,
}

/// Coordinator return-for-acceptance comment.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ReturnForAcceptanceBody {
    pub coordinator_comment: String,
}

/// Coordinator verify + assign payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VerifyAcceptanceBody {
    /// Staff profile of the university supervisor to assign.
    pub university_supervisor_id: Uuid,
}

/// Internship request response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestResponse {
    pub id: Uuid,
    pub period_id: Uuid,
    pub student_reg_no: String,
    pub source: RequestSource,
    pub status: RequestStatus,
    pub preferred_company_id: Option<Uuid>,
    pub preferred_company_name: Option<String>,
    pub proposed_company_name: Option<String>,
    pub proposed_company_district: Option<String>,
    pub proposed_company_address: Option<String>,
    pub proposed_company_contact: Option<String>,
    pub preferred_field: Option<String>,
    pub notes: Option<String>,
    pub cv_key: Option<String>,
    pub request_letter_key: Option<String>,
    pub recommendation_letter_key: Option<String>,
    pub acceptance_letter_key: Option<String>,
    pub coordinator_comment: Option<String>,
    pub review_notes: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub recommendation_issued_at: Option<DateTime<Utc>>,
    pub acceptance_uploaded_at: Option<DateTime<Utc>>,
    pub acceptance_verified: bool,
    pub acceptance_verified_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        use RequestStatus::*;
        assert!(Draft.can_transition(Submitted));
        assert!(Submitted.can_transition(UnderReview));
        assert!(UnderReview.can_transition(Recommended));
        assert!(Recommended.can_transition(AcceptanceUploaded));
        assert!(AcceptanceUploaded.can_transition(AcceptanceVerified));
    }

    #[test]
    fn test_side_branches() {
        use RequestStatus::*;
        assert!(UnderReview.can_transition(Rejected));
        assert!(Recommended.can_transition(ReturnedForAcceptance));
        assert!(ReturnedForAcceptance.can_transition(AcceptanceUploaded));
        // re-upload while waiting for verification
        assert!(AcceptanceUploaded.can_transition(AcceptanceUploaded));
    }

    #[test]
    fn test_illegal_transitions_refused() {
        use RequestStatus::*;
        assert!(!Draft.can_transition(Recommended));
        assert!(!Submitted.can_transition(AcceptanceVerified));
        assert!(!AcceptanceVerified.can_transition(AcceptanceUploaded));
        assert!(!Rejected.can_transition(Submitted));
        assert!(!Submitted.can_transition(Draft));
        assert!(!AcceptanceVerified.can_transition(ReturnedForAcceptance));
    }

    #[test]
    fn test_company_choice_is_exclusive() {
        let company = Some(Uuid::new_v4());
        assert_eq!(
            validate_company_choice(company, ""),
            Ok(RequestSource::StudentSelected)
        );
        assert_eq!(
            validate_company_choice(None, "Acme Ltd"),
            Ok(RequestSource::StudentProposed)
        );
        assert!(validate_company_choice(None, "   ").is_err());
        assert!(validate_company_choice(company, "Acme Ltd").is_err());
    }
}
