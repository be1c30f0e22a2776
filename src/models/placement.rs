//! Placement lifecycle models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Placement lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStatus {
    PendingStudentAck,
    Active,
    OnHold,
    Completed,
    Terminated,
}

impl PlacementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingStudentAck => "pending_student_ack",
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Terminated => "terminated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending_student_ack" => Some(Self::PendingStudentAck),
            "active" => Some(Self::Active),
            "on_hold" => Some(Self::OnHold),
            "completed" => Some(Self::Completed),
            "terminated" => Some(Self::Terminated),
            _ => None,
        }
    }

    /// Completed and terminated placements accept no further activity.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Terminated)
    }

    /// Single source of truth for legal placement transitions.
    pub fn can_transition(self, to: PlacementStatus) -> bool {
        use PlacementStatus::*;
        matches!(
            (self, to),
            (PendingStudentAck, Active)
                | (Active, OnHold)
                | (Active, Completed)
                | (Active, Terminated)
                | (OnHold, Active)
        )
    }
}

impl std::fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Placement response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlacementResponse {
    pub id: Uuid,
    pub request_id: Uuid,
    pub student_reg_no: String,
    pub student_name: String,
    pub company_id: Uuid,
    pub company_name: String,
    pub industry_supervisor_id: Option<Uuid>,
    pub university_supervisor_id: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PlacementStatus,
    pub created_at: DateTime<Utc>,
}

/// One row in the supervisor-facing students view: the placement joined
/// with both evaluations' derived scores.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SupervisorStudentRow {
    pub placement: PlacementResponse,
    pub scores: crate::models::evaluation::PlacementScores,
}

/// Coordinator placement status update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePlacementStatusBody {
    pub status: PlacementStatus,
}

/// Coordinator supervisor assignment.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignSupervisorsBody {
    #[serde(default)]
    pub industry_supervisor_id: Option<Uuid>,
    #[serde(default)]
    pub university_supervisor_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_edges() {
        use PlacementStatus::*;
        assert!(PendingStudentAck.can_transition(Active));
        assert!(Active.can_transition(OnHold));
        assert!(Active.can_transition(Completed));
        assert!(Active.can_transition(Terminated));
        assert!(OnHold.can_transition(Active));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        use PlacementStatus::*;
        for to in [PendingStudentAck, Active, OnHold, Completed, Terminated] {
            assert!(!Completed.can_transition(to));
            assert!(!Terminated.can_transition(to));
        }
        assert!(Completed.is_terminal());
        assert!(Terminated.is_terminal());
        assert!(!OnHold.is_terminal());
    }

    #[test]
    fn test_no_shortcut_from_pending() {
        use PlacementStatus::*;
        assert!(!PendingStudentAck.can_transition(Completed));
        assert!(!PendingStudentAck.can_transition(OnHold));
        assert!(!OnHold.can_transition(Completed));
    }
}
