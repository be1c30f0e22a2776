//! Supervisor results report entity for SeaORM.
//!
//! The per-student score rows are a point-in-time snapshot stored as
//! JSONB, captured at submit time.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "results_reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub supervisor_user_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub rows: JsonValue,
    pub status: String,
    pub submitted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::SupervisorUserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Supervisor,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supervisor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
