// ABOUTME: Integration tests for page-number pagination across list operations
// ABOUTME: Checks offsets, totals and the filtered tenant-scoped listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use menu_training_server::database::allergies::{CreateAllergyRequest, ListAllergiesFilter};
use menu_training_server::database::menu_items::{CreateMenuItemRequest, ListMenuItemsFilter};
use menu_training_server::models::UserRole;
use menu_training_server::pagination::Pagination;

#[tokio::test]
async fn test_second_page_holds_items_eleven_to_twenty() {
    let resources = common::create_test_resources().await.unwrap();
    let actor = common::seed_user(&resources.database, "cook", UserRole::User)
        .await
        .unwrap();

    for n in 1..=25 {
        resources
            .allergies
            .create(
                &actor,
                CreateAllergyRequest {
                    allergy_name: format!("Allergy {n:02}"),
                    allergy_logo_url: None,
                },
            )
            .await
            .unwrap();
    }

    let first = resources
        .allergies
        .find_all(&ListAllergiesFilter::default(), Pagination::new(Some(1), None))
        .await
        .unwrap();
    assert_eq!(first.data.len(), 10);
    assert_eq!(first.total, 25);
    assert_eq!(first.total_pages, 3);

    let second = resources
        .allergies
        .find_all(&ListAllergiesFilter::default(), Pagination::new(Some(2), Some(10)))
        .await
        .unwrap();
    let ids: Vec<&str> = second.data.iter().map(|a| a.allergy_id.as_str()).collect();
    let expected: Vec<String> = (11..=20).map(|n| format!("ALG-{n:06}")).collect();
    assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());

    let last = resources
        .allergies
        .find_all(&ListAllergiesFilter::default(), Pagination::new(Some(3), Some(10)))
        .await
        .unwrap();
    assert_eq!(last.data.len(), 5);

    let beyond = resources
        .allergies
        .find_all(&ListAllergiesFilter::default(), Pagination::new(Some(9), Some(10)))
        .await
        .unwrap();
    assert!(beyond.data.is_empty());
    assert_eq!(beyond.total, 25);
}

#[test]
fn test_pagination_clamps_out_of_range_values() {
    let p = Pagination::new(Some(0), Some(0));
    assert_eq!((p.page, p.limit), (1, 1));
    let p = Pagination::new(None, Some(10_000));
    assert_eq!((p.page, p.limit), (1, 100));
}

#[tokio::test]
async fn test_filtered_tenant_listing_counts_only_matches() {
    let resources = common::create_test_resources().await.unwrap();
    let owner = common::seed_user(&resources.database, "owner", UserRole::Manager)
        .await
        .unwrap();
    let rid = common::seed_restaurant(&resources, &owner, "Harbour Grill").await.unwrap();

    for name in ["Fish Taco", "Fish Burger", "Chicken Wrap", "Fish Soup"] {
        resources
            .menu_items
            .create(
                &owner,
                CreateMenuItemRequest {
                    menu_item_name: name.to_owned(),
                    menu_item_description: None,
                    menu_item_ingredients: Vec::new(),
                    menu_item_url: None,
                    restaurant_id: rid.clone(),
                },
            )
            .await
            .unwrap();
    }

    let filter = ListMenuItemsFilter {
        name: Some("fish".to_owned()),
        ..ListMenuItemsFilter::default()
    };
    let page = resources
        .menu_items
        .find_all(&owner, &filter, Some(&rid), Pagination::new(Some(1), Some(2)))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.total_pages, 2);
}
