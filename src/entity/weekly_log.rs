//! Weekly log entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "weekly_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub placement_id: Uuid,
    /// Sequential per placement; UNIQUE (placement_id, week_no).
    pub week_no: i32,
    pub from_date: Date,
    pub to_date: Date,
    /// Derived summary text, recomputed from the per-day entries on submit.
    pub activities: String,
    pub challenges: Option<String>,
    pub lessons: Option<String>,
    pub attachment_key: Option<String>,
    pub status: String,
    pub submitted_at: Option<DateTimeUtc>,
    pub company_action_by: Option<Uuid>,
    pub company_action_at: Option<DateTimeUtc>,
    pub return_reason: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::placement::Entity",
        from = "Column::PlacementId",
        to = "super::placement::Column::Id",
        on_delete = "Cascade"
    )]
    Placement,
    #[sea_orm(has_many = "super::weekly_log_entry::Entity")]
    Entries,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CompanyActionBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    CompanyActor,
}

impl Related<super::placement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Placement.def()
    }
}

impl Related<super::weekly_log_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
