//! Placement entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "placements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// 1:1 with the internship request; the unique index is the
    /// concurrency guard for get-or-create.
    #[sea_orm(unique)]
    pub request_id: Uuid,
    pub company_id: Uuid,
    pub industry_supervisor_id: Option<Uuid>,
    pub university_supervisor_id: Option<Uuid>,
    pub start_date: Date,
    pub end_date: Date,
    pub placement_letter_key: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::internship_request::Entity",
        from = "Column::RequestId",
        to = "super::internship_request::Column::Id",
        on_delete = "Restrict"
    )]
    Request,
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_delete = "Restrict"
    )]
    Company,
    #[sea_orm(
        belongs_to = "super::company_contact::Entity",
        from = "Column::IndustrySupervisorId",
        to = "super::company_contact::Column::Id",
        on_delete = "SetNull"
    )]
    IndustrySupervisor,
    #[sea_orm(
        belongs_to = "super::staff_profile::Entity",
        from = "Column::UniversitySupervisorId",
        to = "super::staff_profile::Column::Id",
        on_delete = "SetNull"
    )]
    UniversitySupervisor,
    #[sea_orm(has_many = "super::weekly_log::Entity")]
    WeeklyLogs,
    #[sea_orm(has_many = "super::site_visit::Entity")]
    SiteVisits,
    #[sea_orm(has_one = "super::industry_evaluation::Entity")]
    IndustryEvaluation,
    #[sea_orm(has_one = "super::academic_evaluation::Entity")]
    AcademicEvaluation,
    #[sea_orm(has_one = "super::student_evaluation::Entity")]
    StudentEvaluation,
}

impl Related<super::internship_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::staff_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UniversitySupervisor.def()
    }
}

impl Related<super::weekly_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeeklyLogs.def()
    }
}

impl Related<super::site_visit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SiteVisits.def()
    }
}

impl Related<super::industry_evaluation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IndustryEvaluation.def()
    }
}

impl Related<super::academic_evaluation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicEvaluation.def()
    }
}

impl Related<super::student_evaluation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentEvaluation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
