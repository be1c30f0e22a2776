//! Database queries for the company directory.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::company::{self, ActiveModel, Entity as Company};
use crate::entity::company_contact::{self, Entity as CompanyContact};
use crate::error::{AppError, AppResult};
use crate::models::CompanyStatus;

use super::{is_unique_violation, DbPool};

impl DbPool {
    /// Insert a company record.
    pub async fn insert_company(
        &self,
        name: &str,
        industry: Option<String>,
        district: Option<String>,
        address: Option<String>,
        status: CompanyStatus,
    ) -> AppResult<company::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.trim().to_string()),
            industry: Set(industry),
            district: Set(district),
            address: Set(address),
            status: Set(status.as_str().to_string()),
            created_at: Set(Utc::now()),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert company: {}", e)))?;

        Ok(result)
    }

    /// Get a company by ID.
    pub async fn get_company_by_id(&self, id: Uuid) -> AppResult<Option<company::Model>> {
        let result = Company::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get company: {}", e)))?;

        Ok(result)
    }

    /// Get a company by its unique name.
    pub async fn get_company_by_name(&self, name: &str) -> AppResult<Option<company::Model>> {
        let result = Company::find()
            .filter(company::Column::Name.eq(name.trim()))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get company by name: {}", e)))?;

        Ok(result)
    }

    /// Get or create a company by name.
    ///
    /// Insert first; on a unique violation re-fetch the winner's row. Used
    /// when a coordinator recommends a request carrying a proposed company.
    pub async fn get_or_create_company(
        &self,
        name: &str,
        district: Option<String>,
        address: Option<String>,
        status: CompanyStatus,
    ) -> AppResult<company::Model> {
        if let Some(existing) = self.get_company_by_name(name).await? {
            return Ok(existing);
        }

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.trim().to_string()),
            industry: Set(None),
            district: Set(district),
            address: Set(address),
            status: Set(status.as_str().to_string()),
            created_at: Set(Utc::now()),
        };

        match model.insert(self.connection()).await {
            Ok(created) => Ok(created),
            Err(e) if is_unique_violation(&e) => self
                .get_company_by_name(name)
                .await?
                .ok_or_else(|| AppError::Database("Company vanished after conflict".to_string())),
            Err(e) => Err(AppError::Database(format!(
                "Failed to create company: {}",
                e
            ))),
        }
    }

    /// List companies, optionally restricted to a status.
    pub async fn list_companies(
        &self,
        status: Option<CompanyStatus>,
    ) -> AppResult<Vec<company::Model>> {
        let mut select = Company::find();

        if let Some(status) = status {
            select = select.filter(company::Column::Status.eq(status.as_str()));
        }

        let companies = select
            .order_by_asc(company::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list companies: {}", e)))?;

        Ok(companies)
    }

    /// Update a company's vetting status.
    pub async fn update_company_status(
        &self,
        id: Uuid,
        status: CompanyStatus,
    ) -> AppResult<company::Model> {
        let company = self
            .get_company_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company {}", id)))?;

        let mut active: ActiveModel = company.into();
        active.status = Set(status.as_str().to_string());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update company status: {}", e)))?;

        Ok(result)
    }

    /// Get a company contact by ID.
    pub async fn get_company_contact_by_id(
        &self,
        id: Uuid,
    ) -> AppResult<Option<company_contact::Model>> {
        let result = CompanyContact::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get company contact: {}", e)))?;

        Ok(result)
    }

    /// List contacts for a company.
    pub async fn list_company_contacts(
        &self,
        company_id: Uuid,
    ) -> AppResult<Vec<company_contact::Model>> {
        let contacts = CompanyContact::find()
            .filter(company_contact::Column::CompanyId.eq(company_id))
            .order_by_asc(company_contact::Column::Name)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list company contacts: {}", e)))?;

        Ok(contacts)
    }
}
