// ABOUTME: Read-time enrichment of ingredients, menu items and recipes with names and allergy rollups
// ABOUTME: Loads the referenced ingredient graph in batched levels, then derives everything in memory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Enrichment
//!
//! Every batch is resolved with one ingredient lookup per graph level (the
//! referenced ids, then their not-yet-loaded sub-ingredients, and so on until
//! nothing new is referenced) plus at most one allergy lookup. Nothing is
//! fetched per item or per ingredient. Unknown ingredient ids degrade to their
//! raw id as name and contribute no allergies.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::allergy_graph::{AllergyMemo, IngredientGraph};
use crate::constants::tenancy::is_core_restaurant;
use crate::database::ingredients::Ingredient;
use crate::database::menu_items::MenuItem;
use crate::database::recipes::{Recipe, RecipeStep, StepIngredientItem};
use crate::database::repositories::{
    AllergyRepository, AllergyRepositoryImpl, IngredientRepository, IngredientRepositoryImpl,
};
use crate::database::Database;
use crate::errors::AppResult;

/// `{id, name}` reference to another entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Business id
    pub id: String,
    /// Display name
    pub name: String,
}

/// Ingredient with its derived fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientView {
    /// Stored ingredient
    #[serde(flatten)]
    pub ingredient: Ingredient,
    /// Allergies inherited through sub-ingredients only
    pub derived_allergies: Vec<String>,
    /// Names of the sub-ingredients that exist
    pub sub_ingredient_details: Vec<NamedRef>,
    /// Owned by the core restaurant
    pub is_core_ingredient: bool,
}

/// Full and derived allergy sets of one ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergyClosure {
    /// Ingredient business id
    pub ingredient_id: String,
    /// Direct plus inherited allergy ids
    pub allergies: Vec<String>,
    /// Inherited allergy ids only
    pub derived_allergies: Vec<String>,
}

/// Menu item with resolved ingredient names and allergy rollup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMenuItem {
    /// Stored menu item
    #[serde(flatten)]
    pub item: MenuItem,
    /// Names parallel to `menuItemIngredients`, raw id when unknown
    pub ingredient_names: Vec<String>,
    /// Union of every referenced ingredient's full allergy set
    pub allergies: Vec<NamedRef>,
}

/// Step ingredient quantity with the resolved ingredient name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedStepIngredientItem {
    /// Stored quantity
    #[serde(flatten)]
    pub item: StepIngredientItem,
    /// Ingredient name, raw id when unknown
    pub ingredient_name: String,
}

/// Recipe step with enriched ingredient items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecipeStep {
    /// Instruction text
    pub step_text: String,
    /// Equipment ids
    pub step_equipment: Vec<String>,
    /// Enriched ingredient quantities
    pub step_ingredient_items: Vec<EnrichedStepIngredientItem>,
    /// Optional image reference
    pub step_image_url: Option<String>,
    /// Position
    pub order: Option<u32>,
}

/// Recipe with enriched steps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecipe {
    /// Business id
    pub recipe_id: String,
    /// Display name
    pub recipe_name: String,
    /// Optional description
    pub recipe_description: Option<String>,
    /// Optional image reference
    pub recipe_image_url: Option<String>,
    /// Number of servings
    pub recipe_servings: i64,
    /// Preparation time in minutes
    pub recipe_prep_time: i64,
    /// Total time in minutes
    pub recipe_total_time: i64,
    /// Enriched steps
    pub recipe_steps: Vec<EnrichedRecipeStep>,
    /// Owning restaurant
    pub restaurant_id: String,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last update timestamp
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Batched cross-reference resolver
#[derive(Clone)]
pub struct Enricher {
    ingredients: Arc<dyn IngredientRepository>,
    allergies: Arc<dyn AllergyRepository>,
}

impl Enricher {
    /// Build from repository implementations
    #[must_use]
    pub fn new(
        ingredients: Arc<dyn IngredientRepository>,
        allergies: Arc<dyn AllergyRepository>,
    ) -> Self {
        Self {
            ingredients,
            allergies,
        }
    }

    /// Build on top of the SQLite managers
    #[must_use]
    pub fn from_database(database: &Database) -> Self {
        Self::new(
            Arc::new(IngredientRepositoryImpl::new(database.clone())),
            Arc::new(AllergyRepositoryImpl::new(database.clone())),
        )
    }

    /// Load `roots` and everything reachable from them
    ///
    /// # Errors
    ///
    /// Returns an error if a batched lookup fails
    pub async fn load_graph(&self, roots: &[String]) -> AppResult<IngredientGraph> {
        let mut graph = IngredientGraph::new();
        self.expand(&mut graph, roots.iter().cloned()).await?;
        Ok(graph)
    }

    /// Fetch `seeds` not yet in `graph`, then their sub-ingredients, level by level
    async fn expand(
        &self,
        graph: &mut IngredientGraph,
        seeds: impl IntoIterator<Item = String>,
    ) -> AppResult<()> {
        let mut requested: HashSet<String> = HashSet::new();
        let mut frontier: Vec<String> = seeds
            .into_iter()
            .filter(|id| !graph.contains(id) && requested.insert(id.clone()))
            .collect();
        let mut rounds = 0_usize;

        while !frontier.is_empty() {
            rounds += 1;
            let fetched = self.ingredients.find_by_ids(&frontier).await?;
            for ingredient in &fetched {
                graph.insert_ingredient(ingredient);
            }

            frontier = fetched
                .iter()
                .flat_map(|ingredient| ingredient.sub_ingredients.iter())
                .filter(|id| !graph.contains(id) && requested.insert((*id).clone()))
                .cloned()
                .collect();
        }

        debug!(
            rounds,
            requested = requested.len(),
            loaded = graph.len(),
            "Ingredient graph loaded"
        );
        Ok(())
    }

    /// Attach ingredient names and allergy rollups to a batch of menu items
    ///
    /// # Errors
    ///
    /// Returns an error if a batched lookup fails
    pub async fn enrich_menu_items(
        &self,
        items: Vec<MenuItem>,
    ) -> AppResult<Vec<EnrichedMenuItem>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let roots = unique_in_order(items.iter().flat_map(|i| i.menu_item_ingredients.iter()));
        let graph = self.load_graph(&roots).await?;
        let mut memo = AllergyMemo::new();

        let per_item: Vec<Vec<String>> = items
            .iter()
            .map(|item| {
                let closures: Vec<Vec<String>> = item
                    .menu_item_ingredients
                    .iter()
                    .map(|id| graph.all_allergies(id, &mut memo))
                    .collect();
                unique_in_order(closures.iter().flatten())
            })
            .collect();

        let allergy_ids = unique_in_order(per_item.iter().flatten());
        let allergy_names: HashMap<String, String> = if allergy_ids.is_empty() {
            HashMap::new()
        } else {
            self.allergies
                .find_by_ids(&allergy_ids)
                .await?
                .into_iter()
                .map(|a| (a.allergy_id, a.allergy_name))
                .collect()
        };

        Ok(items
            .into_iter()
            .zip(per_item)
            .map(|(item, allergy_ids)| {
                let ingredient_names = item
                    .menu_item_ingredients
                    .iter()
                    .map(|id| graph.name(id).unwrap_or(id).to_owned())
                    .collect();
                let allergies = allergy_ids
                    .into_iter()
                    .filter_map(|id| {
                        allergy_names
                            .get(&id)
                            .map(|name| NamedRef { name: name.clone(), id })
                    })
                    .collect();
                EnrichedMenuItem {
                    item,
                    ingredient_names,
                    allergies,
                }
            })
            .collect())
    }

    /// Attach ingredient names to every step ingredient item of a batch of recipes
    ///
    /// # Errors
    ///
    /// Returns an error if the batched lookup fails
    pub async fn enrich_recipes(&self, recipes: Vec<Recipe>) -> AppResult<Vec<EnrichedRecipe>> {
        let ids = unique_in_order(
            recipes
                .iter()
                .flat_map(|r| r.recipe_steps.iter())
                .flat_map(|s| s.step_ingredient_items.iter())
                .map(|item| &item.ingredient_id),
        );

        let names: HashMap<String, String> = if ids.is_empty() {
            HashMap::new()
        } else {
            self.ingredients
                .find_by_ids(&ids)
                .await?
                .into_iter()
                .map(|i| (i.ingredient_id, i.ingredient_name))
                .collect()
        };

        Ok(recipes
            .into_iter()
            .map(|recipe| enrich_recipe(recipe, &names))
            .collect())
    }

    /// Derived views for a batch of already-loaded ingredients
    ///
    /// # Errors
    ///
    /// Returns an error if a batched lookup fails
    pub async fn ingredient_views(
        &self,
        ingredients: Vec<Ingredient>,
    ) -> AppResult<Vec<IngredientView>> {
        let mut graph = IngredientGraph::from_ingredients(&ingredients);
        let seeds: Vec<String> = ingredients
            .iter()
            .flat_map(|i| i.sub_ingredients.iter().cloned())
            .collect();
        self.expand(&mut graph, seeds).await?;

        let mut memo = AllergyMemo::new();
        Ok(ingredients
            .into_iter()
            .map(|ingredient| {
                let derived_allergies =
                    graph.derived_allergies(&ingredient.ingredient_id, &mut memo);
                let sub_ingredient_details = ingredient
                    .sub_ingredients
                    .iter()
                    .filter_map(|id| {
                        graph.name(id).map(|name| NamedRef {
                            id: id.clone(),
                            name: name.to_owned(),
                        })
                    })
                    .collect();
                IngredientView {
                    is_core_ingredient: is_core_restaurant(&ingredient.restaurant_id),
                    derived_allergies,
                    sub_ingredient_details,
                    ingredient,
                }
            })
            .collect())
    }

    /// Full and derived allergy sets for one ingredient
    ///
    /// # Errors
    ///
    /// Returns an error if a batched lookup fails
    pub async fn allergy_closure(&self, ingredient: &Ingredient) -> AppResult<AllergyClosure> {
        let mut graph = IngredientGraph::from_ingredients([ingredient]);
        let seeds = ingredient.sub_ingredients.iter().cloned();
        self.expand(&mut graph, seeds).await?;

        let mut memo = AllergyMemo::new();
        Ok(AllergyClosure {
            ingredient_id: ingredient.ingredient_id.clone(),
            allergies: graph.all_allergies(&ingredient.ingredient_id, &mut memo),
            derived_allergies: graph.derived_allergies(&ingredient.ingredient_id, &mut memo),
        })
    }
}

fn enrich_recipe(recipe: Recipe, names: &HashMap<String, String>) -> EnrichedRecipe {
    EnrichedRecipe {
        recipe_id: recipe.recipe_id,
        recipe_name: recipe.recipe_name,
        recipe_description: recipe.recipe_description,
        recipe_image_url: recipe.recipe_image_url,
        recipe_servings: recipe.recipe_servings,
        recipe_prep_time: recipe.recipe_prep_time,
        recipe_total_time: recipe.recipe_total_time,
        recipe_steps: recipe
            .recipe_steps
            .into_iter()
            .map(|step| enrich_step(step, names))
            .collect(),
        restaurant_id: recipe.restaurant_id,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    }
}

fn enrich_step(step: RecipeStep, names: &HashMap<String, String>) -> EnrichedRecipeStep {
    EnrichedRecipeStep {
        step_text: step.step_text,
        step_equipment: step.step_equipment,
        step_ingredient_items: step
            .step_ingredient_items
            .into_iter()
            .map(|item| EnrichedStepIngredientItem {
                ingredient_name: names
                    .get(&item.ingredient_id)
                    .cloned()
                    .unwrap_or_else(|| item.ingredient_id.clone()),
                item,
            })
            .collect(),
        step_image_url: step.step_image_url,
        order: step.order,
    }
}

fn unique_in_order<'a>(ids: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut seen: HashSet<&String> = HashSet::new();
    ids.filter(|id| seen.insert(*id)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_in_order() {
        let ids: Vec<String> = ["b", "a", "b", "c", "a"].iter().map(|s| (*s).to_owned()).collect();
        assert_eq!(unique_in_order(ids.iter()), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_step_enrichment_falls_back_to_raw_id() {
        let step = RecipeStep {
            step_text: "Toast".to_owned(),
            step_equipment: vec!["EQP-000001".to_owned()],
            step_ingredient_items: vec![
                StepIngredientItem {
                    ingredient_id: "ING-000001".to_owned(),
                    ingredient_measure: Some("slice".to_owned()),
                    ingredient_units: 2.0,
                },
                StepIngredientItem {
                    ingredient_id: "ING-999999".to_owned(),
                    ingredient_measure: None,
                    ingredient_units: 1.0,
                },
            ],
            step_image_url: None,
            order: Some(0),
        };
        let names: HashMap<String, String> =
            [("ING-000001".to_owned(), "Bun".to_owned())].into_iter().collect();

        let enriched = enrich_step(step, &names);
        assert_eq!(enriched.step_ingredient_items[0].ingredient_name, "Bun");
        assert_eq!(enriched.step_ingredient_items[1].ingredient_name, "ING-999999");
        assert_eq!(enriched.step_equipment, vec!["EQP-000001".to_owned()]);
    }
}
