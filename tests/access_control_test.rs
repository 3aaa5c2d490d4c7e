// ABOUTME: Integration tests for restaurant-scoped access to ingredients and menu items
// ABOUTME: Covers core catalogue visibility, tenant isolation and owning restaurant immutability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use menu_training_server::constants::tenancy::CORE_RESTAURANT_ID;
use menu_training_server::database::allergies::CreateAllergyRequest;
use menu_training_server::database::ingredients::{
    CreateIngredientRequest, ListIngredientsFilter, UpdateIngredientRequest,
};
use menu_training_server::database::menu_items::{
    CreateMenuItemRequest, ListMenuItemsFilter, UpdateMenuItemRequest,
};
use menu_training_server::errors::ErrorCode;
use menu_training_server::models::UserRole;
use menu_training_server::pagination::Pagination;

fn ingredient_request(name: &str, restaurant_id: Option<&str>) -> CreateIngredientRequest {
    CreateIngredientRequest {
        ingredient_name: name.to_owned(),
        ingredient_allergies: Vec::new(),
        ingredient_image_url: None,
        sub_ingredients: Vec::new(),
        categories: Vec::new(),
        restaurant_id: restaurant_id.map(str::to_owned),
    }
}

#[tokio::test]
async fn test_restaurants_get_sequential_ids_after_core() {
    let resources = common::create_test_resources().await.unwrap();
    let owner = common::seed_user(&resources.database, "owner", UserRole::Manager)
        .await
        .unwrap();

    let first = common::seed_restaurant(&resources, &owner, "North").await.unwrap();
    let second = common::seed_restaurant(&resources, &owner, "South").await.unwrap();
    assert_eq!(first, "RST-000002");
    assert_eq!(second, "RST-000003");
}

#[tokio::test]
async fn test_ingredient_listing_is_core_plus_own_restaurants() {
    let resources = common::create_test_resources().await.unwrap();
    let admin = common::seed_user(&resources.database, "admin", UserRole::Admin)
        .await
        .unwrap();
    let alice = common::seed_user(&resources.database, "alice", UserRole::User)
        .await
        .unwrap();
    let bob = common::seed_user(&resources.database, "bob", UserRole::User)
        .await
        .unwrap();
    let r2 = common::seed_restaurant(&resources, &alice, "Alice's").await.unwrap();
    let r3 = common::seed_restaurant(&resources, &bob, "Bob's").await.unwrap();

    resources
        .ingredients
        .create(&admin, ingredient_request("Salt", None))
        .await
        .unwrap();
    resources
        .ingredients
        .create(&alice, ingredient_request("House Sauce", Some(&r2)))
        .await
        .unwrap();
    resources
        .ingredients
        .create(&bob, ingredient_request("Secret Rub", Some(&r3)))
        .await
        .unwrap();

    let page = resources
        .ingredients
        .find_all(&alice, &ListIngredientsFilter::default(), None, Pagination::default())
        .await
        .unwrap();
    let mut names: Vec<&str> = page
        .data
        .iter()
        .map(|v| v.ingredient.ingredient_name.as_str())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["House Sauce", "Salt"]);

    let err = resources
        .ingredients
        .find_all(&alice, &ListIngredientsFilter::default(), Some(&r3), Pagination::default())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let all = resources
        .ingredients
        .find_all(&admin, &ListIngredientsFilter::default(), None, Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 3);
}

#[tokio::test]
async fn test_core_ingredients_readable_by_all_but_admin_only_writes() {
    let resources = common::create_test_resources().await.unwrap();
    let admin = common::seed_user(&resources.database, "admin", UserRole::Admin)
        .await
        .unwrap();
    let manager = common::seed_user(&resources.database, "mgr", UserRole::Manager)
        .await
        .unwrap();

    let salt = resources
        .ingredients
        .create(&admin, ingredient_request("Salt", None))
        .await
        .unwrap();
    let salt_id = salt.ingredient.ingredient_id.clone();
    assert_eq!(salt.ingredient.restaurant_id, CORE_RESTAURANT_ID);
    assert!(salt.is_core_ingredient);

    let read = resources.ingredients.find_one(&manager, &salt_id).await.unwrap();
    assert_eq!(read.ingredient.ingredient_name, "Salt");

    let create_err = resources
        .ingredients
        .create(&manager, ingredient_request("Pepper", None))
        .await
        .unwrap_err();
    assert_eq!(create_err.code, ErrorCode::PermissionDenied);

    let update_err = resources
        .ingredients
        .update(
            &manager,
            &salt_id,
            UpdateIngredientRequest {
                ingredient_name: Some("Sea Salt".to_owned()),
                ..UpdateIngredientRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(update_err.code, ErrorCode::PermissionDenied);

    let delete_err = resources
        .ingredients
        .delete(&manager, &salt_id)
        .await
        .unwrap_err();
    assert_eq!(delete_err.code, ErrorCode::PermissionDenied);

    resources.ingredients.delete(&admin, &salt_id).await.unwrap();
}

#[tokio::test]
async fn test_owning_restaurant_cannot_change_on_update() {
    let resources = common::create_test_resources().await.unwrap();
    let alice = common::seed_user(&resources.database, "alice", UserRole::Manager)
        .await
        .unwrap();
    let r2 = common::seed_restaurant(&resources, &alice, "First").await.unwrap();
    let r3 = common::seed_restaurant(&resources, &alice, "Second").await.unwrap();

    let item = resources
        .menu_items
        .create(
            &alice,
            CreateMenuItemRequest {
                menu_item_name: "Burger".to_owned(),
                menu_item_description: None,
                menu_item_ingredients: Vec::new(),
                menu_item_url: None,
                restaurant_id: r2.clone(),
            },
        )
        .await
        .unwrap();
    let item_id = item.item.menu_item_id.clone();

    let err = resources
        .menu_items
        .update(
            &alice,
            &item_id,
            UpdateMenuItemRequest {
                menu_item_name: Some("Moved Burger".to_owned()),
                restaurant_id: Some(r3),
                ..UpdateMenuItemRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let stored = resources.menu_items.find_one(&alice, &item_id).await.unwrap();
    assert_eq!(stored.item.restaurant_id, r2);
    assert_eq!(stored.item.menu_item_name, "Burger");

    // Restating the current restaurant is allowed
    let updated = resources
        .menu_items
        .update(
            &alice,
            &item_id,
            UpdateMenuItemRequest {
                menu_item_name: Some("Cheeseburger".to_owned()),
                restaurant_id: Some(r2),
                ..UpdateMenuItemRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.item.menu_item_name, "Cheeseburger");
}

#[tokio::test]
async fn test_non_member_cannot_read_tenant_records() {
    let resources = common::create_test_resources().await.unwrap();
    let alice = common::seed_user(&resources.database, "alice", UserRole::User)
        .await
        .unwrap();
    let mallory = common::seed_user(&resources.database, "mallory", UserRole::Manager)
        .await
        .unwrap();
    let r2 = common::seed_restaurant(&resources, &alice, "Alice's").await.unwrap();

    let ingredient = resources
        .ingredients
        .create(&alice, ingredient_request("House Sauce", Some(&r2)))
        .await
        .unwrap();
    let ingredient_id = ingredient.ingredient.ingredient_id;

    let err = resources
        .ingredients
        .find_one(&mallory, &ingredient_id)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let missing = resources
        .ingredients
        .find_one(&mallory, "ING-999999")
        .await
        .unwrap_err();
    assert_eq!(missing.code, ErrorCode::ResourceNotFound);

    // A user with no memberships sees no tenant records at all
    let page = resources
        .menu_items
        .find_all(&mallory, &ListMenuItemsFilter::default(), None, Pagination::default())
        .await
        .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_ingredient_allergy_closure_through_database() {
    let resources = common::create_test_resources().await.unwrap();
    let admin = common::seed_user(&resources.database, "admin", UserRole::Admin)
        .await
        .unwrap();

    let sesame_allergy = resources
        .allergies
        .create(
            &admin,
            CreateAllergyRequest {
                allergy_name: "Sesame".to_owned(),
                allergy_logo_url: None,
            },
        )
        .await
        .unwrap();
    let gluten_allergy = resources
        .allergies
        .create(
            &admin,
            CreateAllergyRequest {
                allergy_name: "Gluten".to_owned(),
                allergy_logo_url: None,
            },
        )
        .await
        .unwrap();

    let mut seed = ingredient_request("Sesame Seeds", None);
    seed.ingredient_allergies = vec![sesame_allergy.allergy_id.clone()];
    let seeds = resources.ingredients.create(&admin, seed).await.unwrap();

    let mut bun = ingredient_request("Bun", None);
    bun.ingredient_allergies = vec![gluten_allergy.allergy_id.clone()];
    bun.sub_ingredients = vec![seeds.ingredient.ingredient_id.clone()];
    let bun = resources.ingredients.create(&admin, bun).await.unwrap();

    assert_eq!(bun.derived_allergies, vec![sesame_allergy.allergy_id.clone()]);

    let closure = resources
        .ingredients
        .allergy_closure(&admin, &bun.ingredient.ingredient_id)
        .await
        .unwrap();
    assert_eq!(
        closure.allergies,
        vec![gluten_allergy.allergy_id, sesame_allergy.allergy_id.clone()]
    );
    assert_eq!(closure.derived_allergies, vec![sesame_allergy.allergy_id]);
}
