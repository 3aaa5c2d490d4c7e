// ABOUTME: Repository traits isolating read-time enrichment from the SQLite managers
// ABOUTME: Lets enrichment run against any batched lookup source, including counting fakes in tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// `AllergyRepository` backed by the allergies table
pub mod allergy_repository;
/// `IngredientRepository` backed by the ingredients table
pub mod ingredient_repository;

pub use allergy_repository::AllergyRepositoryImpl;
pub use ingredient_repository::IngredientRepositoryImpl;

use async_trait::async_trait;

use super::allergies::Allergy;
use super::ingredients::Ingredient;
use crate::errors::AppResult;

/// Batched ingredient lookup, unrestricted by owning restaurant
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Fetch every ingredient whose id is in `ids`; missing ids are simply absent
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Ingredient>>;
}

/// Batched allergy lookup
#[async_trait]
pub trait AllergyRepository: Send + Sync {
    /// Fetch every allergy whose id is in `ids`; missing ids are simply absent
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Allergy>>;
}
