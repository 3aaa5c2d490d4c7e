// ABOUTME: Database operations for the global allergy catalogue (ALG-###### identifiers)
// ABOUTME: Handles CRUD, name filtering and batched id lookups used by menu item enrichment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::filters::{count_rows, fetch_by_ids, fetch_page, fold_search_key, WhereClause};
use super::{deserialize_nullable, parse_timestamp};
use super::sequence::{next_business_id, EntityKind};
use crate::errors::{AppError, AppResult};
use crate::pagination::Pagination;

const ALLERGY_COLUMNS: &str = "allergy_id, allergy_name, allergy_logo_url, created_at, updated_at";

/// An allergen that ingredients may declare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allergy {
    /// Business id (`ALG-######`)
    pub allergy_id: String,
    /// Display name
    pub allergy_name: String,
    /// Optional logo reference
    pub allergy_logo_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Request to create an allergy
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAllergyRequest {
    /// Display name
    pub allergy_name: String,
    /// Optional logo reference
    pub allergy_logo_url: Option<String>,
}

/// Partial update of an allergy
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAllergyRequest {
    /// New display name
    pub allergy_name: Option<String>,
    /// New logo reference; `null` clears it
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub allergy_logo_url: Option<Option<String>>,
}

/// Filter for listing allergies
#[derive(Debug, Clone, Default)]
pub struct ListAllergiesFilter {
    /// Case-insensitive name substring
    pub name: Option<String>,
}

/// Allergy database operations manager
pub struct AllergiesManager {
    pool: SqlitePool,
}

impl AllergiesManager {
    /// Create a new allergies manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an allergy with the next `ALG-` id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, request: &CreateAllergyRequest) -> AppResult<Allergy> {
        let allergy_id = next_business_id(&self.pool, EntityKind::Allergy).await?;
        let now = Utc::now();

        sqlx::query(
            r"
            INSERT INTO allergies (
                allergy_id, allergy_name, search_key, allergy_logo_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&allergy_id)
        .bind(&request.allergy_name)
        .bind(fold_search_key(&request.allergy_name))
        .bind(&request.allergy_logo_url)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create allergy: {e}")))?;

        Ok(Allergy {
            allergy_id,
            allergy_name: request.allergy_name.clone(),
            allergy_logo_url: request.allergy_logo_url.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an allergy by business id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, allergy_id: &str) -> AppResult<Option<Allergy>> {
        let row = sqlx::query(&format!(
            "SELECT {ALLERGY_COLUMNS} FROM allergies WHERE allergy_id = $1"
        ))
        .bind(allergy_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get allergy: {e}")))?;

        row.map(|r| row_to_allergy(&r)).transpose()
    }

    /// Batched lookup; unknown ids are absent from the result
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn find_by_ids(&self, allergy_ids: &[String]) -> AppResult<Vec<Allergy>> {
        let rows = fetch_by_ids(
            &self.pool,
            ALLERGY_COLUMNS,
            "allergies",
            "allergy_id",
            allergy_ids,
        )
        .await?;
        rows.iter().map(row_to_allergy).collect()
    }

    /// List allergies ordered by id
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(
        &self,
        filter: &ListAllergiesFilter,
        pagination: Pagination,
    ) -> AppResult<(Vec<Allergy>, u64)> {
        let mut clause = WhereClause::new();
        if let Some(name) = filter.name.as_deref() {
            clause.name_contains(name);
        }

        let total = count_rows(&self.pool, "allergies", &clause).await?;
        let rows = fetch_page(
            &self.pool,
            ALLERGY_COLUMNS,
            "allergies",
            &clause,
            "allergy_id ASC",
            pagination,
        )
        .await?;
        let allergies = rows.iter().map(row_to_allergy).collect::<AppResult<_>>()?;
        Ok((allergies, total))
    }

    /// Apply a partial update
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update(
        &self,
        allergy_id: &str,
        request: &UpdateAllergyRequest,
    ) -> AppResult<Option<Allergy>> {
        let Some(existing) = self.get(allergy_id).await? else {
            return Ok(None);
        };

        let name = request
            .allergy_name
            .as_ref()
            .unwrap_or(&existing.allergy_name);
        let logo = request
            .allergy_logo_url
            .clone()
            .unwrap_or(existing.allergy_logo_url);

        let result = sqlx::query(
            r"
            UPDATE allergies
            SET allergy_name = $1, search_key = $2, allergy_logo_url = $3, updated_at = $4
            WHERE allergy_id = $5
            ",
        )
        .bind(name)
        .bind(fold_search_key(name))
        .bind(&logo)
        .bind(Utc::now().to_rfc3339())
        .bind(allergy_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update allergy: {e}")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(allergy_id).await
    }

    /// Delete an allergy
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn delete(&self, allergy_id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM allergies WHERE allergy_id = $1")
            .bind(allergy_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete allergy: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_allergy(row: &SqliteRow) -> AppResult<Allergy> {
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Allergy {
        allergy_id: row.get("allergy_id"),
        allergy_name: row.get("allergy_name"),
        allergy_logo_url: row.get("allergy_logo_url"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
