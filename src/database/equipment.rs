// ABOUTME: Database operations for the global kitchen equipment catalogue (EQP-###### identifiers)
// ABOUTME: Equipment ids are referenced from recipe steps; this module only owns the catalogue rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::filters::{count_rows, fetch_page, fold_search_key, WhereClause};
use super::{deserialize_nullable, parse_timestamp};
use super::sequence::{next_business_id, EntityKind};
use crate::errors::{AppError, AppResult};
use crate::pagination::Pagination;

const EQUIPMENT_COLUMNS: &str =
    "equipment_id, equipment_name, equipment_image_url, created_at, updated_at";

/// A piece of kitchen equipment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    /// Business id (`EQP-######`)
    pub equipment_id: String,
    /// Display name
    pub equipment_name: String,
    /// Optional image reference
    pub equipment_image_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create equipment
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentRequest {
    /// Display name
    pub equipment_name: String,
    /// Optional image reference
    pub equipment_image_url: Option<String>,
}

/// Partial update of equipment
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipmentRequest {
    /// New display name
    pub equipment_name: Option<String>,
    /// New image reference; `null` clears it
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub equipment_image_url: Option<Option<String>>,
}

/// Filter for listing equipment
#[derive(Debug, Clone, Default)]
pub struct ListEquipmentFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,
}

/// Equipment database operations manager
pub struct EquipmentManager {
    pool: SqlitePool,
}

impl EquipmentManager {
    /// Create a new equipment manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create equipment with the next `EQP-` id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, request: &CreateEquipmentRequest) -> AppResult<Equipment> {
        let equipment_id = next_business_id(&self.pool, EntityKind::Equipment).await?;
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO equipment (
                equipment_id, equipment_name, search_key, equipment_image_url,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&equipment_id)
        .bind(&request.equipment_name)
        .bind(fold_search_key(&request.equipment_name))
        .bind(&request.equipment_image_url)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create equipment: {e}")))?;

        Ok(Equipment {
            equipment_id,
            equipment_name: request.equipment_name.clone(),
            equipment_image_url: request.equipment_image_url.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get equipment by business id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, equipment_id: &str) -> AppResult<Option<Equipment>> {
        let row = sqlx::query(&format!(
            "SELECT {EQUIPMENT_COLUMNS} FROM equipment WHERE equipment_id = $1"
        ))
        .bind(equipment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get equipment: {e}")))?;

        row.map(|r| row_to_equipment(&r)).transpose()
    }

    /// List equipment ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        filter: &ListEquipmentFilter,
        pagination: Pagination,
    ) -> AppResult<(Vec<Equipment>, u64)> {
        let mut clause = WhereClause::new();
        if let Some(name) = filter.name.as_deref() {
            clause.name_contains(name);
        }

        let total = count_rows(&self.pool, "equipment", &clause).await?;
        let rows = fetch_page(
            &self.pool,
            EQUIPMENT_COLUMNS,
            "equipment",
            &clause,
            "equipment_id ASC",
            pagination,
        )
        .await?;
        let equipment = rows.iter().map(row_to_equipment).collect::<AppResult<_>>()?;
        Ok((equipment, total))
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        equipment_id: &str,
        request: &UpdateEquipmentRequest,
    ) -> AppResult<Option<Equipment>> {
        let Some(existing) = self.get(equipment_id).await? else {
            return Ok(None);
        };

        let name = request
            .equipment_name
            .as_ref()
            .unwrap_or(&existing.equipment_name);
        let image = request
            .equipment_image_url
            .clone()
            .unwrap_or(existing.equipment_image_url);

        let result = sqlx::query(
            r"
            UPDATE equipment
            SET equipment_name = $1, search_key = $2, equipment_image_url = $3, updated_at = $4
            WHERE equipment_id = $5
            ",
        )
        .bind(name)
        .bind(fold_search_key(name))
        .bind(&image)
        .bind(Utc::now().to_rfc3339())
        .bind(equipment_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update equipment: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(equipment_id).await
    }

    /// Delete equipment
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, equipment_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM equipment WHERE equipment_id = $1")
            .bind(equipment_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete equipment: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_equipment(row: &SqliteRow) -> AppResult<Equipment> {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Equipment {
        equipment_id: row.get("equipment_id"),
        equipment_name: row.get("equipment_name"),
        equipment_image_url: row.get("equipment_image_url"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
