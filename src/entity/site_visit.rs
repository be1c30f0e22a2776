//! Site visit entity for SeaORM.
//!
//! Append-only; site visits have no status machine.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "site_visits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub placement_id: Uuid,
    pub supervisor_id: Uuid,
    pub visit_date: Date,
    pub findings: String,
    pub recommendations: Option<String>,
    pub attachment_key: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::staff_profile::Entity",
        from = "Column::SupervisorId",
        to = "super::staff_profile::Column::Id",
        on_delete = "Restrict"
    )]
    Supervisor,
}

impl Related<super::placement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Placement.def()
    }
}

impl Related<super::staff_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supervisor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
