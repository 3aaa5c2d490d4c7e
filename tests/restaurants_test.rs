// ABOUTME: Integration tests for restaurant membership and its mirror on user records
// ABOUTME: Covers creator protection, idempotent adds, manager rights and delete cascade
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use menu_training_server::database::restaurants::{ListRestaurantsFilter, UpdateRestaurantRequest};
use menu_training_server::database::Database;
use menu_training_server::errors::ErrorCode;
use menu_training_server::models::UserRole;
use menu_training_server::pagination::Pagination;

async fn memberships(database: &Database, user_id: &str) -> Vec<String> {
    database
        .users()
        .get(user_id)
        .await
        .unwrap()
        .unwrap()
        .associated_restaurants
}

#[tokio::test]
async fn test_create_links_creator_on_both_sides() {
    let resources = common::create_test_resources().await.unwrap();
    let owner = common::seed_user(&resources.database, "owner", UserRole::Manager)
        .await
        .unwrap();

    let rid = common::seed_restaurant(&resources, &owner, "Harbour Grill").await.unwrap();
    let restaurant = resources.restaurants.find_one(&owner, &rid).await.unwrap();

    assert_eq!(restaurant.created_by, "owner");
    assert_eq!(restaurant.associated_users, vec!["owner"]);
    assert_eq!(memberships(&resources.database, "owner").await, vec![rid]);
}

#[tokio::test]
async fn test_creator_cannot_be_removed() {
    let resources = common::create_test_resources().await.unwrap();
    let u1 = common::seed_user(&resources.database, "u1", UserRole::Manager)
        .await
        .unwrap();
    common::seed_user(&resources.database, "u2", UserRole::User)
        .await
        .unwrap();
    let rid = common::seed_restaurant(&resources, &u1, "Harbour Grill").await.unwrap();

    let restaurant = resources.restaurants.add_user(&u1, &rid, "u2").await.unwrap();
    assert_eq!(restaurant.associated_users, vec!["u1", "u2"]);
    assert_eq!(memberships(&resources.database, "u2").await, vec![rid.clone()]);

    let err = resources
        .restaurants
        .remove_user(&u1, &rid, "u1")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let restaurant = resources.restaurants.remove_user(&u1, &rid, "u2").await.unwrap();
    assert_eq!(restaurant.associated_users, vec!["u1"]);
    assert!(memberships(&resources.database, "u2").await.is_empty());
    assert_eq!(memberships(&resources.database, "u1").await, vec![rid]);
}

#[tokio::test]
async fn test_adding_existing_member_is_noop() {
    let resources = common::create_test_resources().await.unwrap();
    let owner = common::seed_user(&resources.database, "owner", UserRole::Manager)
        .await
        .unwrap();
    common::seed_user(&resources.database, "cook", UserRole::User)
        .await
        .unwrap();
    let rid = common::seed_restaurant(&resources, &owner, "Harbour Grill").await.unwrap();

    resources.restaurants.add_user(&owner, &rid, "cook").await.unwrap();
    let again = resources.restaurants.add_user(&owner, &rid, "cook").await.unwrap();

    assert_eq!(again.associated_users, vec!["owner", "cook"]);
    assert_eq!(memberships(&resources.database, "cook").await, vec![rid]);
}

#[tokio::test]
async fn test_add_unknown_user_is_not_found() {
    let resources = common::create_test_resources().await.unwrap();
    let owner = common::seed_user(&resources.database, "owner", UserRole::Manager)
        .await
        .unwrap();
    let rid = common::seed_restaurant(&resources, &owner, "Harbour Grill").await.unwrap();

    let err = resources
        .restaurants
        .add_user(&owner, &rid, "ghost")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let err = resources
        .restaurants
        .add_user(&owner, "RST-999999", "owner")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_only_member_managers_or_admins_manage_users() {
    let resources = common::create_test_resources().await.unwrap();
    let owner = common::seed_user(&resources.database, "owner", UserRole::Manager)
        .await
        .unwrap();
    let cook = common::seed_user(&resources.database, "cook", UserRole::User)
        .await
        .unwrap();
    let outsider = common::seed_user(&resources.database, "outsider", UserRole::Manager)
        .await
        .unwrap();
    let admin = common::seed_user(&resources.database, "admin", UserRole::Admin)
        .await
        .unwrap();
    common::seed_user(&resources.database, "server", UserRole::User)
        .await
        .unwrap();
    let rid = common::seed_restaurant(&resources, &owner, "Harbour Grill").await.unwrap();
    resources.restaurants.add_user(&owner, &rid, "cook").await.unwrap();

    let err = resources
        .restaurants
        .add_user(&cook, &rid, "server")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let err = resources
        .restaurants
        .add_user(&outsider, &rid, "server")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let restaurant = resources.restaurants.add_user(&admin, &rid, "server").await.unwrap();
    assert_eq!(restaurant.associated_users, vec!["owner", "cook", "server"]);
}

#[tokio::test]
async fn test_list_users_returns_member_profiles() {
    let resources = common::create_test_resources().await.unwrap();
    let owner = common::seed_user(&resources.database, "owner", UserRole::Manager)
        .await
        .unwrap();
    common::seed_user(&resources.database, "cook", UserRole::User)
        .await
        .unwrap();
    let outsider = common::seed_user(&resources.database, "outsider", UserRole::User)
        .await
        .unwrap();
    let rid = common::seed_restaurant(&resources, &owner, "Harbour Grill").await.unwrap();
    resources.restaurants.add_user(&owner, &rid, "cook").await.unwrap();

    let users = resources.restaurants.list_users(&owner, &rid).await.unwrap();
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["owner", "cook"]);
    assert_eq!(users[1].email, "cook@example.com");
    assert_eq!(users[1].role, UserRole::User);

    let err = resources
        .restaurants
        .list_users(&outsider, &rid)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_delete_is_admin_only_and_clears_memberships() {
    let resources = common::create_test_resources().await.unwrap();
    let owner = common::seed_user(&resources.database, "owner", UserRole::Manager)
        .await
        .unwrap();
    let admin = common::seed_user(&resources.database, "admin", UserRole::Admin)
        .await
        .unwrap();
    common::seed_user(&resources.database, "cook", UserRole::User)
        .await
        .unwrap();
    let keep = common::seed_restaurant(&resources, &owner, "Keep").await.unwrap();
    let doomed = common::seed_restaurant(&resources, &owner, "Doomed").await.unwrap();
    resources.restaurants.add_user(&owner, &doomed, "cook").await.unwrap();

    let err = resources.restaurants.delete(&owner, &doomed).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    resources.restaurants.delete(&admin, &doomed).await.unwrap();

    assert_eq!(memberships(&resources.database, "owner").await, vec![keep]);
    assert!(memberships(&resources.database, "cook").await.is_empty());
    let err = resources.restaurants.find_one(&admin, &doomed).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_listing_and_updates_follow_membership() {
    let resources = common::create_test_resources().await.unwrap();
    let alice = common::seed_user(&resources.database, "alice", UserRole::Manager)
        .await
        .unwrap();
    let bob = common::seed_user(&resources.database, "bob", UserRole::Manager)
        .await
        .unwrap();
    let admin = common::seed_user(&resources.database, "admin", UserRole::Admin)
        .await
        .unwrap();
    let r_alice = common::seed_restaurant(&resources, &alice, "Alice's").await.unwrap();
    common::seed_restaurant(&resources, &bob, "Bob's").await.unwrap();

    let page = resources
        .restaurants
        .find_all(&alice, &ListRestaurantsFilter::default(), Pagination::default())
        .await
        .unwrap();
    let ids: Vec<&str> = page.data.iter().map(|r| r.restaurant_id.as_str()).collect();
    assert_eq!(ids, vec![r_alice.as_str()]);

    // Admins also see the core catalogue restaurant
    let all = resources
        .restaurants
        .find_all(&admin, &ListRestaurantsFilter::default(), Pagination::default())
        .await
        .unwrap();
    assert_eq!(all.total, 3);

    let err = resources
        .restaurants
        .update(
            &bob,
            &r_alice,
            UpdateRestaurantRequest {
                name: Some("Hijacked".to_owned()),
                ..UpdateRestaurantRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    let updated = resources
        .restaurants
        .update(
            &alice,
            &r_alice,
            UpdateRestaurantRequest {
                phone: Some(Some("555-0100".to_owned())),
                ..UpdateRestaurantRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Alice's");
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));

    // explicit null clears, absent keeps
    let cleared = resources
        .restaurants
        .update(
            &alice,
            &r_alice,
            UpdateRestaurantRequest {
                phone: Some(None),
                ..UpdateRestaurantRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.phone, None);
    assert_eq!(cleared.name, "Alice's");
}
