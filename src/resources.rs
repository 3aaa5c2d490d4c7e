// ABOUTME: Shared server state handed to every route module as axum State
// ABOUTME: Wires the database, bearer token verifier, configuration and one instance of each domain service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::errors::AppResult;
use crate::middleware::auth::authenticate;
use crate::models::Actor;
use crate::services::access::AccessPolicy;
use crate::services::allergies::AllergyService;
use crate::services::enrichment::Enricher;
use crate::services::equipment::EquipmentService;
use crate::services::ingredients::IngredientService;
use crate::services::menu_items::MenuItemService;
use crate::services::menu_sections::MenuSectionService;
use crate::services::menus::MenuService;
use crate::services::recipes::RecipeService;
use crate::services::restaurants::RestaurantService;

/// Centralized resource container shared across requests
#[derive(Clone)]
pub struct ServerResources {
    /// Persistent store
    pub database: Database,
    /// Bearer token verification
    pub auth_manager: Arc<AuthManager>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Allergy catalogue
    pub allergies: AllergyService,
    /// Equipment catalogue
    pub equipment: EquipmentService,
    /// Ingredients with core sharing
    pub ingredients: IngredientService,
    /// Menu items
    pub menu_items: MenuItemService,
    /// Menu sections
    pub menu_sections: MenuSectionService,
    /// Menus
    pub menus: MenuService,
    /// Recipes
    pub recipes: RecipeService,
    /// Restaurants and membership
    pub restaurants: RestaurantService,
}

impl ServerResources {
    /// Build every service on top of one database handle
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        let access = AccessPolicy::new(database.clone());
        let enricher = Enricher::from_database(&database);

        Self {
            allergies: AllergyService::new(database.clone()),
            equipment: EquipmentService::new(database.clone()),
            ingredients: IngredientService::new(
                database.clone(),
                access.clone(),
                enricher.clone(),
            ),
            menu_items: MenuItemService::new(database.clone(), access.clone(), enricher.clone()),
            menu_sections: MenuSectionService::new(database.clone(), access.clone()),
            menus: MenuService::new(database.clone(), access.clone()),
            recipes: RecipeService::new(database.clone(), access.clone(), enricher),
            restaurants: RestaurantService::new(database.clone(), access),
            auth_manager: Arc::new(auth_manager),
            config,
            database,
        }
    }

    /// Resolve the acting user from request headers
    ///
    /// # Errors
    ///
    /// Returns an auth error when the bearer credential is missing or invalid
    pub fn authenticate(&self, headers: &HeaderMap) -> AppResult<Actor> {
        authenticate(headers, &self.auth_manager)
    }
}
