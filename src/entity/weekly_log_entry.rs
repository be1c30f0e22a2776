//! Weekly log per-day entry entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "weekly_log_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub weekly_log_id: Uuid,
    /// Weekday key (mon..fri); UNIQUE (weekly_log_id, day).
    pub day: String,
    pub work_assignment: String,
    pub activities_steps: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::weekly_log::Entity",
        from = "Column::WeeklyLogId",
        to = "super::weekly_log::Column::Id",
        on_delete = "Cascade"
    )]
    WeeklyLog,
}

impl Related<super::weekly_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WeeklyLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
