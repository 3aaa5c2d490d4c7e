// ABOUTME: Generates human readable business identifiers such as ING-000001 per entity table
// ABOUTME: Reads the greatest existing id, increments its numeric suffix and zero pads to six digits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Business identifier sequence
//!
//! The next id is derived from the current maximum, so two concurrent creates
//! on the same table can compute the same id. The primary key constraint turns
//! the loser into a `DatabaseError`; there is no retry. This matches the low
//! concurrency of the back office and is a known limitation.

use sqlx::{Row, SqlitePool};

use crate::constants::id_prefixes::{self, SEQUENCE_WIDTH};
use crate::errors::{AppError, AppResult};

/// Entity kinds that carry a business identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// `ALG-`
    Allergy,
    /// `EQP-`
    Equipment,
    /// `ING-`
    Ingredient,
    /// `MID-`
    MenuItem,
    /// `MSC-`
    MenuSection,
    /// `MNU-`
    Menu,
    /// `RCP-`
    Recipe,
    /// `RST-`
    Restaurant,
}

impl EntityKind {
    /// Identifier prefix
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Allergy => id_prefixes::ALLERGY,
            Self::Equipment => id_prefixes::EQUIPMENT,
            Self::Ingredient => id_prefixes::INGREDIENT,
            Self::MenuItem => id_prefixes::MENU_ITEM,
            Self::MenuSection => id_prefixes::MENU_SECTION,
            Self::Menu => id_prefixes::MENU,
            Self::Recipe => id_prefixes::RECIPE,
            Self::Restaurant => id_prefixes::RESTAURANT,
        }
    }

    const fn table(self) -> &'static str {
        match self {
            Self::Allergy => "allergies",
            Self::Equipment => "equipment",
            Self::Ingredient => "ingredients",
            Self::MenuItem => "menu_items",
            Self::MenuSection => "menu_sections",
            Self::Menu => "menus",
            Self::Recipe => "recipes",
            Self::Restaurant => "restaurants",
        }
    }

    const fn id_column(self) -> &'static str {
        match self {
            Self::Allergy => "allergy_id",
            Self::Equipment => "equipment_id",
            Self::Ingredient => "ingredient_id",
            Self::MenuItem => "menu_item_id",
            Self::MenuSection => "menu_section_id",
            Self::Menu => "menu_id",
            Self::Recipe => "recipe_id",
            Self::Restaurant => "restaurant_id",
        }
    }
}

/// Format `PREFIX-000042`
#[must_use]
pub fn format_business_id(prefix: &str, sequence: u64) -> String {
    format!("{prefix}-{sequence:0width$}", width = SEQUENCE_WIDTH)
}

/// Numeric suffix of a business id, `None` when the id is not `PREFIX-digits`
#[must_use]
pub fn parse_sequence(business_id: &str) -> Option<u64> {
    let (_, digits) = business_id.split_once('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Successor of the lexicographically greatest id, or `PREFIX-000001` for an empty table
///
/// # Errors
///
/// Returns an error if the stored maximum is not a well-formed id
pub fn next_after(kind: EntityKind, last_id: Option<&str>) -> AppResult<String> {
    let next = match last_id {
        None => 1,
        Some(last) => {
            parse_sequence(last).ok_or_else(|| {
                AppError::internal(format!("Malformed business id '{last}' in {}", kind.table()))
            })? + 1
        }
    };
    Ok(format_business_id(kind.prefix(), next))
}

/// Compute the next business id for `kind`
///
/// # Errors
///
/// Returns an error if the database query fails or the stored maximum is malformed
pub async fn next_business_id(pool: &SqlitePool, kind: EntityKind) -> AppResult<String> {
    let column = kind.id_column();
    let query = format!(
        "SELECT {column} FROM {} ORDER BY {column} DESC LIMIT 1",
        kind.table()
    );

    let row = sqlx::query(&query)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read {} sequence: {e}", kind.table())))?;

    let last: Option<String> = row.map(|r| r.get(0));
    next_after(kind, last.as_deref())
}
