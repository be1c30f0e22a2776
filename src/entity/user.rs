//! User entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Full name, falling back to the email address.
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::student_profile::Entity")]
    StudentProfile,
    #[sea_orm(has_one = "super::staff_profile::Entity")]
    StaffProfile,
    #[sea_orm(has_one = "super::industry_supervisor_profile::Entity")]
    IndustryProfile,
}

impl Related<super::student_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentProfile.def()
    }
}

impl Related<super::staff_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StaffProfile.def()
    }
}

impl Related<super::industry_supervisor_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IndustryProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
