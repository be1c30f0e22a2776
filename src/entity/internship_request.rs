//! Internship request entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "internship_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub student_id: Uuid,
    pub period_id: Uuid,
    pub request_source: String,
    pub preferred_company_id: Option<Uuid>,
    pub proposed_company_name: Option<String>,
    pub proposed_company_district: Option<String>,
    pub proposed_company_address: Option<String>,
    pub proposed_company_contact: Option<String>,
    pub preferred_field: Option<String>,
    pub notes: Option<String>,
    /// Storage keys for the student's uploaded documents
    pub cv_key: Option<String>,
    pub request_letter_key: Option<String>,
    pub recommendation_letter_key: Option<String>,
    pub acceptance_letter_key: Option<String>,
    pub status: String,
    pub submitted_at: Option<DateTimeUtc>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTimeUtc>,
    pub review_notes: Option<String>,
    pub coordinator_comment: Option<String>,
    pub coordinator_commented_at: Option<DateTimeUtc>,
    pub recommendation_issued_at: Option<DateTimeUtc>,
    pub acceptance_uploaded_at: Option<DateTimeUtc>,
    pub acceptance_verified: bool,
    pub acceptance_verified_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student_profile::Entity",
        from = "Column::StudentId",
        to = "super::student_profile::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::internship_period::Entity",
        from = "Column::PeriodId",
        to = "super::internship_period::Column::Id",
        on_delete = "Restrict"
    )]
    Period,
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::PreferredCompanyId",
        to = "super::company::Column::Id",
        on_delete = "SetNull"
    )]
    PreferredCompany,
    #[sea_orm(has_one = "super::placement::Entity")]
    Placement,
}

impl Related<super::student_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::internship_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Period.def()
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PreferredCompany.def()
    }
}

impl Related<super::placement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Placement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
