//! Company directory domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Company vetting status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    PendingVerification,
    Approved,
    Rejected,
    Inactive,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingVerification => "pending_verification",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Inactive => "inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending_verification" => Some(Self::PendingVerification),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request to register a company in the directory.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCompanyRequest {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Company record response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: String,
    pub industry: Option<String>,
    pub district: Option<String>,
    pub address: Option<String>,
    pub status: CompanyStatus,
    pub created_at: DateTime<Utc>,
}

/// Request to change a company's vetting status.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateCompanyStatusRequest {
    pub status: CompanyStatus,
}
