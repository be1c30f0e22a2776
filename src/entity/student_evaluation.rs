//! Student self-evaluation entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub placement_id: Uuid,
    pub student_user_id: Uuid,
    pub program: Option<String>,
    pub internship_site: Option<String>,
    pub eval_date: Date,
    pub q1: Option<String>,
    pub q2: Option<String>,
    pub q3: Option<String>,
    pub q4: Option<String>,
    pub q5: Option<String>,
    pub q6: Option<String>,
    pub q7: Option<String>,
    pub q8: Option<String>,
    pub q9: Option<String>,
    pub q10: Option<String>,
    pub status: String,
    pub submitted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// The ten answers in question order.
    pub fn answers(&self) -> Vec<Option<String>> {
        vec![
            self.q1.clone(),
            self.q2.clone(),
            self.q3.clone(),
            self.q4.clone(),
            self.q5.clone(),
            self.q6.clone(),
            self.q7.clone(),
            self.q8.clone(),
            self.q9.clone(),
            self.q10.clone(),
        ]
    }
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
        belongs_to = "super::user::Entity",
        from = "Column::StudentUserId",
        to = "super::user::Column::Id",
        on_delete = "Restrict"
    )]
    StudentUser,
}

impl Related<super::placement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Placement.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
