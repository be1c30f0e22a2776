//! Authenticated principal and role predicates.
//!
//! Role membership comes from the session token issued by the identity
//! provider. Every operation gates on one of the predicates below instead
//! of checking memberships inline.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Role membership carried by a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Coordinator,
    UniversitySupervisor,
    IndustrySupervisor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Coordinator => "coordinator",
            Self::UniversitySupervisor => "university_supervisor",
            Self::IndustrySupervisor => "industry_supervisor",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Self::Student),
            "coordinator" => Some(Self::Coordinator),
            "university_supervisor" => Some(Self::UniversitySupervisor),
            "industry_supervisor" => Some(Self::IndustrySupervisor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated caller, derived from verified session claims.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: String,
    pub roles: Vec<Role>,
}

impl Principal {
    fn has_any(&self, roles: &[Role]) -> bool {
        self.roles.iter().any(|r| roles.contains(r))
    }

    /// Coordinator-level access (Coordinator or Admin).
    pub fn is_coordinator(&self) -> bool {
        self.has_any(&[Role::Coordinator, Role::Admin])
    }

    /// University supervisor access (UniversitySupervisor or Admin).
    pub fn is_university_supervisor(&self) -> bool {
        self.has_any(&[Role::UniversitySupervisor, Role::Admin])
    }

    /// Industry supervisor access (IndustrySupervisor or Admin).
    pub fn is_industry_supervisor(&self) -> bool {
        self.has_any(&[Role::IndustrySupervisor, Role::Admin])
    }

    /// Student access.
    pub fn is_student(&self) -> bool {
        self.has_any(&[Role::Student])
    }
}

/// Session JWT claims, as issued by the identity provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(roles: Vec<Role>) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            email: "user@example.edu".to_string(),
            display_name: "Test User".to_string(),
            roles,
        }
    }

    #[test]
    fn test_admin_satisfies_staff_predicates() {
        let p = principal(vec![Role::Admin]);
        assert!(p.is_coordinator());
        assert!(p.is_university_supervisor());
        assert!(p.is_industry_supervisor());
        assert!(!p.is_student());
    }

    #[test]
    fn test_student_is_only_student() {
        let p = principal(vec![Role::Student]);
        assert!(p.is_student());
        assert!(!p.is_coordinator());
        assert!(!p.is_university_supervisor());
        assert!(!p.is_industry_supervisor());
    }

    #[test]
    fn test_role_round_trip() {
        for role in [
            Role::Student,
            Role::Coordinator,
            Role::UniversitySupervisor,
            Role::IndustrySupervisor,
            Role::Admin,
        ] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("dean"), None);
    }
}
