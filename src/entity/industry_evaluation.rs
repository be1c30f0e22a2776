//! Industry evaluation entity for SeaORM.
//!
//! Thirteen 1-5 ratings with per-item comments. Scores are derived on
//! read (see `models::evaluation`), never stored.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "industry_evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub placement_id: Uuid,
    pub company_id: Uuid,
    pub supervisor_user_id: Option<Uuid>,

    pub basic_work_expectations: Option<i16>,
    pub knowledge_and_learning: Option<i16>,
    pub ethical_awareness: Option<i16>,
    pub interpersonal_relations: Option<i16>,
    pub communication_skills: Option<i16>,
    pub attendance: Option<i16>,
    pub punctuality: Option<i16>,
    pub flexibility: Option<i16>,
    pub dependability: Option<i16>,
    pub culture_fit: Option<i16>,
    pub dress_code: Option<i16>,
    pub behaviour: Option<i16>,
    pub work_productivity: Option<i16>,

    pub basic_work_expectations_comment: Option<String>,
    pub knowledge_and_learning_comment: Option<String>,
    pub ethical_awareness_comment: Option<String>,
    pub interpersonal_relations_comment: Option<String>,
    pub communication_skills_comment: Option<String>,
    pub attendance_comment: Option<String>,
    pub punctuality_comment: Option<String>,
    pub flexibility_comment: Option<String>,
    pub dependability_comment: Option<String>,
    pub culture_fit_comment: Option<String>,
    pub dress_code_comment: Option<String>,
    pub behaviour_comment: Option<String>,
    pub work_productivity_comment: Option<String>,

    pub recommend_employment: Option<bool>,
    pub recommend_comment: Option<String>,
    pub other_comments: Option<String>,
    pub supervisor_name: Option<String>,
    pub supervisor_signature: Option<String>,

    pub status: String,
    pub submitted_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Rating values in form order (`models::evaluation::INDUSTRY_ITEMS`).
    pub fn ratings(&self) -> Vec<Option<i16>> {
        vec![
            self.basic_work_expectations,
            self.knowledge_and_learning,
            self.ethical_awareness,
            self.interpersonal_relations,
            self.communication_skills,
            self.attendance,
            self.punctuality,
            self.flexibility,
            self.dependability,
            self.culture_fit,
            self.dress_code,
            self.behaviour,
            self.work_productivity,
        ]
    }

    /// Per-item comments in form order.
    pub fn comments(&self) -> Vec<Option<String>> {
        vec![
            self.basic_work_expectations_comment.clone(),
            self.knowledge_and_learning_comment.clone(),
            self.ethical_awareness_comment.clone(),
            self.interpersonal_relations_comment.clone(),
            self.communication_skills_comment.clone(),
            self.attendance_comment.clone(),
            self.punctuality_comment.clone(),
            self.flexibility_comment.clone(),
            self.dependability_comment.clone(),
            self.culture_fit_comment.clone(),
            self.dress_code_comment.clone(),
            self.behaviour_comment.clone(),
            self.work_productivity_comment.clone(),
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
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_delete = "Restrict"
    )]
    Company,
}

impl Related<super::placement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Placement.def()
    }
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
