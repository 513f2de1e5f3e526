// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adoption applications and their effect on pet status.

use pawmatch_core::query::{Direction, Query, Table};
use pawmatch_core::types::{
    Application, ApplicationRecord, ApplicationStatus, NewApplication, OwnershipType, PetStatus,
};
use pawmatch_core::{ApiError, ApiResult};
use pawmatch_store::Gateway;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::join::{attach, pets_by_id};
use crate::pets::PetService;

/// Narrows [`ApplicationService::get_all_applications`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    pub user_email: Option<String>,
    pub status: Option<ApplicationStatus>,
}

/// Applicant input for a new application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub pet_id: String,
    pub user_name: String,
    pub user_email: String,
    #[serde(default)]
    pub user_phone: String,
    #[serde(default)]
    pub house_type: String,
    #[serde(default)]
    pub ownership_type: OwnershipType,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub reason: String,
    /// Ignored: new applications always start in review.
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
}

impl ApplicationForm {
    /// Checks required fields. Phone, housing, experience and reason are optional.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.pet_id.trim().is_empty() {
            return Err(ApiError::validation("a pet must be selected"));
        }
        if self.user_name.trim().is_empty() {
            return Err(ApiError::validation("applicant name is required"));
        }
        if !self.user_email.contains('@') {
            return Err(ApiError::validation("a valid email address is required"));
        }
        Ok(())
    }

    fn into_insert(self) -> NewApplication {
        NewApplication {
            pet_id: self.pet_id.trim().to_string(),
            user_name: self.user_name.trim().to_string(),
            user_email: self.user_email.trim().to_string(),
            user_phone: self.user_phone,
            house_type: self.house_type,
            ownership_type: self.ownership_type,
            experience: self.experience,
            reason: self.reason,
            status: ApplicationStatus::InReview,
        }
    }
}

/// Reads and writes the `applications` table.
#[derive(Clone)]
pub struct ApplicationService {
    gateway: Gateway,
    pets: PetService,
}

impl ApplicationService {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            pets: PetService::new(gateway.clone()),
            gateway,
        }
    }

    /// Applications newest first, each with its pet attached.
    pub async fn get_all_applications(
        &self,
        filter: Option<&ApplicationFilter>,
    ) -> ApiResult<Vec<Application>> {
        let mut query = Query::new().order_by("created_at", Direction::Desc);
        if let Some(filter) = filter {
            if let Some(email) = filter.user_email.as_deref().filter(|e| !e.is_empty()) {
                query = query.eq("user_email", email);
            }
            if let Some(status) = filter.status {
                query = query.eq("status", status.to_string());
            }
        }

        let records: Vec<ApplicationRecord> = self
            .gateway
            .select(Table::Applications, query)
            .await
            .map_err(|e| e.relabel("failed to fetch application list"))?;

        let pets = pets_by_id(&self.gateway, records.iter().map(|r| r.pet_id.as_str())).await;
        Ok(records
            .into_iter()
            .map(|record| {
                let pet = attach(&pets, &record.pet_id, &record.id);
                Application { record, pet }
            })
            .collect())
    }

    pub async fn get_application_by_id(&self, id: &str) -> ApiResult<Application> {
        let record: ApplicationRecord = self
            .gateway
            .select_single(Table::Applications, Query::new().eq("id", id))
            .await
            .map_err(|e| e.relabel("failed to fetch application details"))?;
        Ok(self.with_pet(record).await)
    }

    /// Files an application and marks its pet as under review.
    ///
    /// The two writes are not atomic. If the pet update fails the
    /// application is still returned.
    pub async fn create_application(&self, form: ApplicationForm) -> ApiResult<Application> {
        form.validate()?;
        let insert = form.into_insert();

        let record: ApplicationRecord = self
            .gateway
            .insert(Table::Applications, &insert)
            .await
            .map_err(|e| e.relabel("failed to create application"))?;
        info!(application_id = %record.id, pet_id = %record.pet_id, "application created");

        if let Err(err) = self
            .pets
            .advance_status(&record.pet_id, PetStatus::UnderReview)
            .await
        {
            warn!(
                application_id = %record.id,
                pet_id = %record.pet_id,
                error = %err,
                "pet status not moved to under-review"
            );
        }

        Ok(self.with_pet(record).await)
    }

    /// Sets an application's status. Approval or completion also approves the pet.
    pub async fn update_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> ApiResult<Application> {
        if status == ApplicationStatus::Unknown {
            return Err(ApiError::validation("unknown application status"));
        }

        let record: ApplicationRecord = self
            .gateway
            .update(
                Table::Applications,
                Query::new().eq("id", id),
                &json!({ "status": status }),
            )
            .await
            .map_err(|e| e.relabel("failed to update application status"))?;
        info!(application_id = id, %status, "application status updated");

        if matches!(
            status,
            ApplicationStatus::Approved | ApplicationStatus::Completed
        ) && let Err(err) = self
            .pets
            .advance_status(&record.pet_id, PetStatus::Approved)
            .await
        {
            warn!(
                application_id = id,
                pet_id = %record.pet_id,
                error = %err,
                "pet status not moved to approved"
            );
        }

        Ok(self.with_pet(record).await)
    }

    /// Removes an application. The pet's status is left as it is.
    pub async fn delete_application(&self, id: &str) -> ApiResult<()> {
        self.gateway
            .delete(Table::Applications, Query::new().eq("id", id))
            .await
            .map_err(|e| e.relabel("failed to delete application"))
    }

    async fn with_pet(&self, record: ApplicationRecord) -> Application {
        let pets = pets_by_id(&self.gateway, [record.pet_id.as_str()]).await;
        let pet = attach(&pets, &record.pet_id, &record.id);
        Application { record, pet }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pawmatch_test_utils::{pet_row, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn form_validation() {
        let valid = ApplicationForm {
            pet_id: "P001".into(),
            user_name: "Ada".into(),
            user_email: "ada@example.com".into(),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let no_at = ApplicationForm {
            user_email: "ada.example.com".into(),
            ..valid.clone()
        };
        assert_eq!(
            no_at.validate().unwrap_err().code.as_deref(),
            Some("validation")
        );

        let no_name = ApplicationForm {
            user_name: " ".into(),
            ..valid.clone()
        };
        assert!(no_name.validate().is_err());

        let no_pet = ApplicationForm {
            pet_id: String::new(),
            ..valid
        };
        assert!(no_pet.validate().is_err());
    }

    #[test]
    fn insert_forces_in_review() {
        let form = ApplicationForm {
            pet_id: "P001".into(),
            user_name: "Ada".into(),
            user_email: "ada@example.com".into(),
            status: Some(ApplicationStatus::Completed),
            ..Default::default()
        };
        assert_eq!(form.into_insert().status, ApplicationStatus::InReview);
    }

    #[tracing_test::traced_test]
    #[tokio::test]
    async fn missing_pet_is_logged_not_fatal() {
        let store = Arc::new(MemoryStore::new().with_rows(
            Table::Pets,
            vec![pet_row("P001", "Luna", "Ragdoll")],
        ));
        let service = ApplicationService::new(Gateway::new(store.clone()));
        let app = service
            .create_application(ApplicationForm {
                pet_id: "P404".into(),
                user_name: "Ada".into(),
                user_email: "ada@example.com".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(app.pet.is_none());
        assert!(logs_contain("referenced pet not found"));
        assert!(logs_contain("pet status not moved to under-review"));
    }
}
