// ABOUTME: SQLite implementation of the ingredient lookup used by allergy enrichment
// ABOUTME: Delegates to IngredientsManager's single-query IN lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use super::IngredientRepository;
use crate::database::ingredients::Ingredient;
use crate::database::Database;
use crate::errors::AppResult;

/// SQLite implementation of `IngredientRepository`
pub struct IngredientRepositoryImpl {
    db: Database,
}

impl IngredientRepositoryImpl {
    /// Create a new `IngredientRepository` with the given database connection
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IngredientRepository for IngredientRepositoryImpl {
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Ingredient>> {
        self.db.ingredients().find_by_ids(ids).await
    }
}
