// ABOUTME: SQLite implementation of the allergy lookup used to name menu item allergy rollups
// ABOUTME: Delegates to AllergiesManager's single-query IN lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use super::AllergyRepository;
use crate::database::allergies::Allergy;
use crate::database::Database;
use crate::errors::AppResult;

/// SQLite implementation of `AllergyRepository`
pub struct AllergyRepositoryImpl {
    db: Database,
}

impl AllergyRepositoryImpl {
    /// Create a new `AllergyRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AllergyRepository for AllergyRepositoryImpl {
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Allergy>> {
        self.db.allergies().find_by_ids(ids).await
    }
}
