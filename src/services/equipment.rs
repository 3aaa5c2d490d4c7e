// ABOUTME: Equipment catalogue operations shared by every restaurant
// ABOUTME: Reads are open to any authenticated actor; writes require the admin role
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::{info, instrument};

use super::validation::{require_non_empty, require_non_empty_if_present};
use crate::database::equipment::{
    CreateEquipmentRequest, Equipment, ListEquipmentFilter, UpdateEquipmentRequest,
};
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::middleware::admin_guard::require_admin;
use crate::models::Actor;
use crate::pagination::{Page, Pagination};

/// Equipment operations
#[derive(Clone)]
pub struct EquipmentService {
    database: Database,
}

impl EquipmentService {
    /// Create the service
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Create equipment (admin only)
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for non-admins or `InvalidInput` for an empty name
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateEquipmentRequest,
    ) -> AppResult<Equipment> {
        require_admin(actor)?;
        require_non_empty("equipmentName", &request.equipment_name)?;
        let equipment = self.database.equipment().create(&request).await?;
        info!(equipment_id = %equipment.equipment_id, "Equipment created");
        Ok(equipment)
    }

    /// List equipment
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_all(
        &self,
        filter: &ListEquipmentFilter,
        pagination: Pagination,
    ) -> AppResult<Page<Equipment>> {
        let (equipment, total) = self.database.equipment().list(filter, pagination).await?;
        Ok(Page::new(equipment, total, pagination))
    }

    /// Get one piece of equipment
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when absent
    pub async fn find_one(&self, equipment_id: &str) -> AppResult<Equipment> {
        self.database
            .equipment()
            .get(equipment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Equipment {equipment_id}")))
    }

    /// Partially update equipment (admin only)
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `ResourceNotFound` or `InvalidInput`
    #[instrument(skip(self, request), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &Actor,
        equipment_id: &str,
        request: UpdateEquipmentRequest,
    ) -> AppResult<Equipment> {
        require_admin(actor)?;
        require_non_empty_if_present("equipmentName", request.equipment_name.as_deref())?;
        let updated = self
            .database
            .equipment()
            .update(equipment_id, &request)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Equipment {equipment_id}")))?;
        info!(equipment_id, "Equipment updated");
        Ok(updated)
    }

    /// Delete equipment (admin only)
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `ResourceNotFound`
    #[instrument(skip(self), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Actor, equipment_id: &str) -> AppResult<()> {
        require_admin(actor)?;
        if !self.database.equipment().delete(equipment_id).await? {
            return Err(AppError::not_found(format!("Equipment {equipment_id}")));
        }
        info!(equipment_id, "Equipment deleted");
        Ok(())
    }
}
