//! Database queries for the three evaluation kinds.
//!
//! Each evaluation is 1:1 with its placement; creation goes through
//! insert-then-refetch-on-conflict so the unique index is the guard.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::entity::academic_evaluation::{self as academic, Entity as AcademicEvaluation};
use crate::entity::industry_evaluation::{self as industry, Entity as IndustryEvaluation};
use crate::entity::placement;
use crate::entity::student_evaluation::{self as student_eval, Entity as StudentEvaluation};
use crate::error::{AppError, AppResult};
use crate::models::{
    AcademicEvaluationBody, EvaluationStatus, IndustryEvaluationBody, StudentEvaluationBody,
    validate_rating,
};

use super::{is_unique_violation, DbPool};

impl DbPool {
    // ------------------------------------------------------------------
    // Industry evaluations
    // ------------------------------------------------------------------

    /// Get the industry evaluation for a placement.
    pub async fn get_industry_evaluation_by_placement(
        &self,
        placement_id: Uuid,
    ) -> AppResult<Option<industry::Model>> {
        let result = IndustryEvaluation::find()
            .filter(industry::Column::PlacementId.eq(placement_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get industry evaluation: {}", e)))?;

        Ok(result)
    }

    /// Get or create the industry evaluation for a placement.
    pub async fn get_or_create_industry_evaluation(
        &self,
        placement_id: Uuid,
        company_id: Uuid,
        supervisor_user_id: Uuid,
        supervisor_name: &str,
    ) -> AppResult<industry::Model> {
        if let Some(existing) = self
            .get_industry_evaluation_by_placement(placement_id)
            .await?
        {
            return Ok(existing);
        }

        let now = Utc::now();
        let model = industry::ActiveModel {
            id: Set(Uuid::now_v7()),
            placement_id: Set(placement_id),
            company_id: Set(company_id),
            supervisor_user_id: Set(Some(supervisor_user_id)),
            supervisor_name: Set(Some(supervisor_name.to_string())),
            status: Set(EvaluationStatus::Draft.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(self.connection()).await {
            Ok(created) => Ok(created),
            Err(e) if is_unique_violation(&e) => self
                .get_industry_evaluation_by_placement(placement_id)
                .await?
                .ok_or_else(|| {
                    AppError::Database("Industry evaluation vanished after conflict".to_string())
                }),
            Err(e) => Err(AppError::Database(format!(
                "Failed to create industry evaluation: {}",
                e
            ))),
        }
    }

    /// Apply a save/submit payload to an industry evaluation.
    pub async fn apply_industry_evaluation(
        &self,
        evaluation: industry::Model,
        body: &IndustryEvaluationBody,
        supervisor_user_id: Uuid,
        submit: bool,
    ) -> AppResult<industry::Model> {
        let mut active: industry::ActiveModel = evaluation.into();

        for item in &body.items {
            let rating = match item.rating {
                Some(value) => Some(
                    validate_rating(&item.item, value).map_err(AppError::InvalidInput)?,
                ),
                None => None,
            };
            let comment = item.comment.clone();

            match item.item.as_str() {
                "basic_work_expectations" => {
                    active.basic_work_expectations = Set(rating);
                    active.basic_work_expectations_comment = Set(comment);
                }
                "knowledge_and_learning" => {
                    active.knowledge_and_learning = Set(rating);
                    active.knowledge_and_learning_comment = Set(comment);
                }
                "ethical_awareness" => {
                    active.ethical_awareness = Set(rating);
                    active.ethical_awareness_comment = Set(comment);
                }
                "interpersonal_relations" => {
                    active.interpersonal_relations = Set(rating);
                    active.interpersonal_relations_comment = Set(comment);
                }
                "communication_skills" => {
                    active.communication_skills = Set(rating);
                    active.communication_skills_comment = Set(comment);
                }
                "attendance" => {
                    active.attendance = Set(rating);
                    active.attendance_comment = Set(comment);
                }
                "punctuality" => {
                    active.punctuality = Set(rating);
                    active.punctuality_comment = Set(comment);
                }
                "flexibility" => {
                    active.flexibility = Set(rating);
                    active.flexibility_comment = Set(comment);
                }
                "dependability" => {
                    active.dependability = Set(rating);
                    active.dependability_comment = Set(comment);
                }
                "culture_fit" => {
                    active.culture_fit = Set(rating);
                    active.culture_fit_comment = Set(comment);
                }
                "dress_code" => {
                    active.dress_code = Set(rating);
                    active.dress_code_comment = Set(comment);
                }
                "behaviour" => {
                    active.behaviour = Set(rating);
                    active.behaviour_comment = Set(comment);
                }
                "work_productivity" => {
                    active.work_productivity = Set(rating);
                    active.work_productivity_comment = Set(comment);
                }
                other => {
                    return Err(AppError::InvalidInput(format!(
                        "{}: unknown evaluation item",
                        other
                    )));
                }
            }
        }

        if let Some(recommend) = body.recommend_employment {
            active.recommend_employment = Set(Some(recommend));
        }
        if let Some(ref comment) = body.recommend_comment {
            active.recommend_comment = Set(Some(comment.clone()));
        }
        if let Some(ref other) = body.other_comments {
            active.other_comments = Set(Some(other.clone()));
        }
        if let Some(ref name) = body.supervisor_name {
            active.supervisor_name = Set(Some(name.clone()));
        }
        if let Some(ref signature) = body.supervisor_signature {
            active.supervisor_signature = Set(Some(signature.clone()));
        }

        active.supervisor_user_id = Set(Some(supervisor_user_id));
        if submit {
            active.status = Set(EvaluationStatus::Submitted.as_str().to_string());
            active.submitted_at = Set(Some(Utc::now()));
        }
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to save industry evaluation: {}", e)))?;

        Ok(result)
    }

    /// Submitted industry evaluations for a company.
    pub async fn list_submitted_industry_evaluations_for_company(
        &self,
        company_id: Uuid,
    ) -> AppResult<Vec<industry::Model>> {
        let results = IndustryEvaluation::find()
            .filter(industry::Column::CompanyId.eq(company_id))
            .filter(industry::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .order_by_desc(industry::Column::SubmittedAt)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to list industry evaluations: {}", e))
            })?;

        Ok(results)
    }

    /// Submitted industry evaluations across a university supervisor's placements.
    pub async fn list_submitted_industry_evaluations_for_supervisor(
        &self,
        staff_id: Uuid,
    ) -> AppResult<Vec<industry::Model>> {
        let results = IndustryEvaluation::find()
            .join(JoinType::InnerJoin, industry::Relation::Placement.def())
            .filter(placement::Column::UniversitySupervisorId.eq(staff_id))
            .filter(industry::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .order_by_desc(industry::Column::SubmittedAt)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to list industry evaluations: {}", e))
            })?;

        Ok(results)
    }

    /// Submitted industry evaluations keyed by placement, for score joins.
    pub async fn get_submitted_industry_for_placements(
        &self,
        placement_ids: &[Uuid],
    ) -> AppResult<Vec<industry::Model>> {
        if placement_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = IndustryEvaluation::find()
            .filter(industry::Column::PlacementId.is_in(placement_ids.iter().copied()))
            .filter(industry::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get industry evaluations: {}", e))
            })?;

        Ok(results)
    }

    /// Count submitted industry evaluations.
    pub async fn count_submitted_industry_evaluations(&self) -> AppResult<u64> {
        let count = IndustryEvaluation::find()
            .filter(industry::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to count industry evaluations: {}", e))
            })?;

        Ok(count)
    }

    // ------------------------------------------------------------------
    // Academic evaluations
    // ------------------------------------------------------------------

    /// Get the academic evaluation for a placement.
    pub async fn get_academic_evaluation_by_placement(
        &self,
        placement_id: Uuid,
    ) -> AppResult<Option<academic::Model>> {
        let result = AcademicEvaluation::find()
            .filter(academic::Column::PlacementId.eq(placement_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get academic evaluation: {}", e)))?;

        Ok(result)
    }

    /// Get or create the academic evaluation for a placement.
    pub async fn get_or_create_academic_evaluation(
        &self,
        placement_id: Uuid,
        supervisor_user_id: Uuid,
        supervisor_name: &str,
    ) -> AppResult<academic::Model> {
        if let Some(existing) = self
            .get_academic_evaluation_by_placement(placement_id)
            .await?
        {
            return Ok(existing);
        }

        let now = Utc::now();
        let model = academic::ActiveModel {
            id: Set(Uuid::now_v7()),
            placement_id: Set(placement_id),
            supervisor_user_id: Set(Some(supervisor_user_id)),
            supervisor_name: Set(Some(supervisor_name.to_string())),
            status: Set(EvaluationStatus::Draft.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(self.connection()).await {
            Ok(created) => Ok(created),
            Err(e) if is_unique_violation(&e) => self
                .get_academic_evaluation_by_placement(placement_id)
                .await?
                .ok_or_else(|| {
                    AppError::Database("Academic evaluation vanished after conflict".to_string())
                }),
            Err(e) => Err(AppError::Database(format!(
                "Failed to create academic evaluation: {}",
                e
            ))),
        }
    }

    /// Apply a save/submit payload to an academic evaluation.
    pub async fn apply_academic_evaluation(
        &self,
        evaluation: academic::Model,
        body: &AcademicEvaluationBody,
        supervisor_user_id: Uuid,
        submit: bool,
    ) -> AppResult<academic::Model> {
        let mut active: academic::ActiveModel = evaluation.into();

        for item in &body.items {
            let rating = match item.rating {
                Some(value) => Some(
                    validate_rating(&item.item, value).map_err(AppError::InvalidInput)?,
                ),
                None => None,
            };
            let comment = item.comment.clone();

            match item.item.as_str() {
                "understanding_of_internship" => {
                    active.understanding_of_internship = Set(rating);
                    active.understanding_of_internship_comment = Set(comment);
                }
                "support_framework" => {
                    active.support_framework = Set(rating);
                    active.support_framework_comment = Set(comment);
                }
                "culture_fit" => {
                    active.culture_fit = Set(rating);
                    active.culture_fit_comment = Set(comment);
                }
                "work_output" => {
                    active.work_output = Set(rating);
                    active.work_output_comment = Set(comment);
                }
                "general_presentation" => {
                    active.general_presentation = Set(rating);
                    active.general_presentation_comment = Set(comment);
                }
                other => {
                    return Err(AppError::InvalidInput(format!(
                        "{}: unknown evaluation item",
                        other
                    )));
                }
            }
        }

        if let Some(ref recommendation) = body.recommendation {
            active.recommendation = Set(Some(recommendation.clone()));
        }
        if let Some(ref name) = body.supervisor_name {
            active.supervisor_name = Set(Some(name.clone()));
        }
        if let Some(ref signature) = body.supervisor_signature {
            active.supervisor_signature = Set(Some(signature.clone()));
        }

        active.supervisor_user_id = Set(Some(supervisor_user_id));
        if submit {
            active.status = Set(EvaluationStatus::Submitted.as_str().to_string());
            active.submitted_at = Set(Some(Utc::now()));
        }
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to save academic evaluation: {}", e)))?;

        Ok(result)
    }

    /// Submitted academic evaluations authored by a supervisor across their
    /// assigned placements.
    pub async fn list_submitted_academic_evaluations_for_supervisor(
        &self,
        staff_id: Uuid,
        supervisor_user_id: Uuid,
    ) -> AppResult<Vec<academic::Model>> {
        let results = AcademicEvaluation::find()
            .join(JoinType::InnerJoin, academic::Relation::Placement.def())
            .filter(placement::Column::UniversitySupervisorId.eq(staff_id))
            .filter(academic::Column::SupervisorUserId.eq(supervisor_user_id))
            .filter(academic::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .order_by_desc(academic::Column::SubmittedAt)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to list academic evaluations: {}", e))
            })?;

        Ok(results)
    }

    /// Submitted academic evaluations by this supervisor, keyed by placement.
    pub async fn get_submitted_academic_for_placements(
        &self,
        placement_ids: &[Uuid],
        supervisor_user_id: Uuid,
    ) -> AppResult<Vec<academic::Model>> {
        if placement_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = AcademicEvaluation::find()
            .filter(academic::Column::PlacementId.is_in(placement_ids.iter().copied()))
            .filter(academic::Column::SupervisorUserId.eq(supervisor_user_id))
            .filter(academic::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get academic evaluations: {}", e))
            })?;

        Ok(results)
    }

    /// Count submitted academic evaluations.
    pub async fn count_submitted_academic_evaluations(&self) -> AppResult<u64> {
        let count = AcademicEvaluation::find()
            .filter(academic::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to count academic evaluations: {}", e))
            })?;

        Ok(count)
    }

    // ------------------------------------------------------------------
    // Student self-evaluations
    // ------------------------------------------------------------------

    /// Get the student self-evaluation for a placement.
    pub async fn get_student_evaluation_by_placement(
        &self,
        placement_id: Uuid,
    ) -> AppResult<Option<student_eval::Model>> {
        let result = StudentEvaluation::find()
            .filter(student_eval::Column::PlacementId.eq(placement_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get student evaluation: {}", e)))?;

        Ok(result)
    }

    /// Get a student self-evaluation by ID.
    pub async fn get_student_evaluation_by_id(
        &self,
        id: Uuid,
    ) -> AppResult<Option<student_eval::Model>> {
        let result = StudentEvaluation::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get student evaluation: {}", e)))?;

        Ok(result)
    }

    /// Get or create the student self-evaluation for a placement.
    pub async fn get_or_create_student_evaluation(
        &self,
        placement_id: Uuid,
        student_user_id: Uuid,
        internship_site: &str,
    ) -> AppResult<student_eval::Model> {
        if let Some(existing) = self
            .get_student_evaluation_by_placement(placement_id)
            .await?
        {
            return Ok(existing);
        }

        let now = Utc::now();
        let model = student_eval::ActiveModel {
            id: Set(Uuid::now_v7()),
            placement_id: Set(placement_id),
            student_user_id: Set(student_user_id),
            internship_site: Set(Some(internship_site.to_string())),
            eval_date: Set(now.date_naive()),
            status: Set(EvaluationStatus::Draft.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        match model.insert(self.connection()).await {
            Ok(created) => Ok(created),
            Err(e) if is_unique_violation(&e) => self
                .get_student_evaluation_by_placement(placement_id)
                .await?
                .ok_or_else(|| {
                    AppError::Database("Student evaluation vanished after conflict".to_string())
                }),
            Err(e) => Err(AppError::Database(format!(
                "Failed to create student evaluation: {}",
                e
            ))),
        }
    }

    /// Apply a save/submit payload to a student self-evaluation.
    pub async fn apply_student_evaluation(
        &self,
        evaluation: student_eval::Model,
        body: &StudentEvaluationBody,
        submit: bool,
    ) -> AppResult<student_eval::Model> {
        if body.answers.len() > 10 {
            return Err(AppError::InvalidInput(
                "answers: at most 10 answers are accepted".to_string(),
            ));
        }

        let mut active: student_eval::ActiveModel = evaluation.into();

        if let Some(ref program) = body.program {
            active.program = Set(Some(program.clone()));
        }

        let answer = |idx: usize| body.answers.get(idx).cloned().map(Some);
        if let Some(v) = answer(0) {
            active.q1 = Set(v);
        }
        if let Some(v) = answer(1) {
            active.q2 = Set(v);
        }
        if let Some(v) = answer(2) {
            active.q3 = Set(v);
        }
        if let Some(v) = answer(3) {
            active.q4 = Set(v);
        }
        if let Some(v) = answer(4) {
            active.q5 = Set(v);
        }
        if let Some(v) = answer(5) {
            active.q6 = Set(v);
        }
        if let Some(v) = answer(6) {
            active.q7 = Set(v);
        }
        if let Some(v) = answer(7) {
            active.q8 = Set(v);
        }
        if let Some(v) = answer(8) {
            active.q9 = Set(v);
        }
        if let Some(v) = answer(9) {
            active.q10 = Set(v);
        }

        if submit {
            active.status = Set(EvaluationStatus::Submitted.as_str().to_string());
            active.submitted_at = Set(Some(Utc::now()));
        }
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to save student evaluation: {}", e)))?;

        Ok(result)
    }

    /// Submitted student self-evaluations across a supervisor's placements.
    pub async fn list_submitted_student_evaluations_for_supervisor(
        &self,
        staff_id: Uuid,
    ) -> AppResult<Vec<student_eval::Model>> {
        let results = StudentEvaluation::find()
            .join(JoinType::InnerJoin, student_eval::Relation::Placement.def())
            .filter(placement::Column::UniversitySupervisorId.eq(staff_id))
            .filter(student_eval::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .order_by_desc(student_eval::Column::SubmittedAt)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to list student evaluations: {}", e))
            })?;

        Ok(results)
    }

    /// All submitted student self-evaluations (coordinator view).
    pub async fn list_submitted_student_evaluations(
        &self,
    ) -> AppResult<Vec<student_eval::Model>> {
        let results = StudentEvaluation::find()
            .filter(student_eval::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .order_by_desc(student_eval::Column::SubmittedAt)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to list student evaluations: {}", e))
            })?;

        Ok(results)
    }

    /// Count submitted student self-evaluations.
    pub async fn count_submitted_student_evaluations(&self) -> AppResult<u64> {
        let count = StudentEvaluation::find()
            .filter(student_eval::Column::Status.eq(EvaluationStatus::Submitted.as_str()))
            .count(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to count student evaluations: {}", e))
            })?;

        Ok(count)
    }
}
