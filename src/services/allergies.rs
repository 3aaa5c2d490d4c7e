// ABOUTME: Allergy catalogue operations shared by every restaurant
// ABOUTME: Any authenticated actor may read and maintain allergies; there is no tenant scoping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{info, instrument};

use super::validation::{require_non_empty, require_non_empty_if_present};
use crate::database::allergies::{
    Allergy, CreateAllergyRequest, ListAllergiesFilter, UpdateAllergyRequest,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Actor;
use crate::pagination::{Page, Pagination};

/// Allergy operations
#[derive(Clone)]
pub struct AllergyService {
    database: Database,
}

impl AllergyService {
    /// Create the service
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Create an allergy
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty name
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn create(&self, actor: &Actor, request: CreateAllergyRequest) -> AppResult<Allergy> {
        require_non_empty("allergyName", &request.allergy_name)?;
        let allergy = self.database.allergies().create(&request).await?;
        info!(allergy_id = %allergy.allergy_id, "Allergy created");
        Ok(allergy)
    }

    /// List allergies
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_all(
        &self,
        filter: &ListAllergiesFilter,
        pagination: Pagination,
    ) -> AppResult<Page<Allergy>> {
        let (allergies, total) = self.database.allergies().list(filter, pagination).await?;
        Ok(Page::new(allergies, total, pagination))
    }

    /// Get one allergy
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when absent
    pub async fn find_one(&self, allergy_id: &str) -> AppResult<Allergy> {
        self.database
            .allergies()
            .get(allergy_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Allergy {allergy_id}")))
    }

    /// Partially update an allergy
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` or `InvalidInput`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &Actor,
        allergy_id: &str,
        request: UpdateAllergyRequest,
    ) -> AppResult<Allergy> {
        require_non_empty_if_present("allergyName", request.allergy_name.as_deref())?;
        let updated = self
            .database
            .allergies()
            .update(allergy_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Allergy {allergy_id}")))?;
        info!(allergy_id, "Allergy updated");
        Ok(updated)
    }

    /// Delete an allergy
    ///
    /// Ingredients that still list the id keep it; enrichment drops names it
    /// cannot resolve.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when absent
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Actor, allergy_id: &str) -> AppResult<()> {
        if !self.database.allergies().delete(allergy_id).await? {
            return Err(AppError::not_found(format!("Allergy {allergy_id}")));
        }
        info!(allergy_id, "Allergy deleted");
        Ok(())
    }
}
