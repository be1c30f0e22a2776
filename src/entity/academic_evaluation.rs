//! Academic evaluation entity for SeaORM.
//!
//! Five 1-5 ratings entered by the university supervisor.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "academic_evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub placement_id: Uuid,
    pub supervisor_user_id: Option<Uuid>,

    pub understanding_of_internship: Option<i16>,
    pub support_framework: Option<i16>,
    pub culture_fit: Option<i16>,
    pub work_output: Option<i16>,
    pub general_presentation: Option<i16>,

    pub understanding_of_internship_comment: Option<String>,
    pub support_framework_comment: Option<String>,
    pub culture_fit_comment: Option<String>,
    pub work_output_comment: Option<String>,
    pub general_presentation_comment: Option<String>,

    pub recommendation: Option<String>,
    pub supervisor_name: Option<String>,
    pub supervisor_signature: Option<String>,

    pub status: String,
    pub submitted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Rating values in form order (`models::evaluation::ACADEMIC_ITEMS`).
    pub fn ratings(&self) -> Vec<Option<i16>> {
        vec![
            self.understanding_of_internship,
            self.support_framework,
            self.culture_fit,
            self.work_output,
            self.general_presentation,
        ]
    }

    /// Per-item comments in form order.
    pub fn comments(&self) -> Vec<Option<String>> {
        vec![
            self.understanding_of_internship_comment.clone(),
            self.support_framework_comment.clone(),
            self.culture_fit_comment.clone(),
            self.work_output_comment.clone(),
            self.general_presentation_comment.clone(),
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
}

impl Related<super::placement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Placement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
