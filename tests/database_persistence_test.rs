// ABOUTME: Integration tests for the file-backed SQLite store
// ABOUTME: Verifies migrations are idempotent and business id sequences survive a reopen
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use menu_training_server::constants::tenancy::CORE_RESTAURANT_ID;
use menu_training_server::database::allergies::CreateAllergyRequest;
use menu_training_server::database::Database;
use tempfile::TempDir;

fn allergy(name: &str) -> CreateAllergyRequest {
    CreateAllergyRequest {
        allergy_name: name.to_owned(),
        allergy_logo_url: None,
    }
}

#[tokio::test]
async fn test_sequences_continue_after_reopen() {
    common::init_test_logging();
    let temp_dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", temp_dir.path().join("menu.db").display());

    {
        let database = Database::new(&url).await.unwrap();
        let first = database.allergies().create(&allergy("Peanut")).await.unwrap();
        let second = database.allergies().create(&allergy("Soy")).await.unwrap();
        assert_eq!(first.allergy_id, "ALG-000001");
        assert_eq!(second.allergy_id, "ALG-000002");
        database.pool().close().await;
    }

    let reopened = Database::new(&url).await.unwrap();
    let third = reopened.allergies().create(&allergy("Milk")).await.unwrap();
    assert_eq!(third.allergy_id, "ALG-000003");

    let peanut = reopened.allergies().get("ALG-000001").await.unwrap().unwrap();
    assert_eq!(peanut.allergy_name, "Peanut");

    // The seeded core restaurant is not duplicated by the second migration run
    let core = reopened.restaurants().get(CORE_RESTAURANT_ID).await.unwrap();
    assert!(core.is_some());
}
