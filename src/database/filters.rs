// ABOUTME: Translates typed per-resource list filters into SQL WHERE predicates with positional binds
// ABOUTME: Supports equality, case-insensitive substring, JSON array membership and restaurant scoping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Sqlite, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::pagination::Pagination;

/// Which restaurants' rows a listing may return
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RestaurantScope {
    /// No restriction (admin without an explicit restaurant filter)
    #[default]
    All,
    /// Only rows owned by one of these restaurants; empty means nothing
    Only(Vec<String>),
}

impl RestaurantScope {
    /// Scope to a single restaurant
    pub fn single(restaurant_id: impl Into<String>) -> Self {
        Self::Only(vec![restaurant_id.into()])
    }

    /// Whether the scope can never match a row
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Only(ids) if ids.is_empty())
    }
}

/// Column holding the case-folded display name of every searchable table
pub const SEARCH_KEY_COLUMN: &str = "search_key";

/// Unicode lowercase of a display name, as stored in `search_key`
#[must_use]
pub fn fold_search_key(name: &str) -> String {
    name.to_lowercase()
}

#[derive(Debug, Clone)]
enum BindValue {
    Text(String),
    Int(i64),
}

/// Accumulates `AND`-joined predicates and their bind values in order
#[derive(Debug, Clone, Default)]
pub struct WhereClause {
    clauses: Vec<String>,
    binds: Vec<BindValue>,
}

impl WhereClause {
    /// Empty clause (matches everything)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `column = ?`
    pub fn eq(&mut self, column: &str, value: impl Into<String>) -> &mut Self {
        self.clauses.push(format!("{column} = ?"));
        self.binds.push(BindValue::Text(value.into()));
        self
    }

    /// Case-insensitive substring match on the row's folded `search_key`
    ///
    /// SQLite's `LOWER()` only folds ASCII, so both sides are folded in Rust:
    /// managers store [`fold_search_key`] of the display name and the needle
    /// goes through the same function here.
    pub fn name_contains(&mut self, needle: &str) -> &mut Self {
        self.clauses.push(format!("{SEARCH_KEY_COLUMN} LIKE ? ESCAPE '\\'"));
        let folded = escape_like(&fold_search_key(needle));
        self.binds.push(BindValue::Text(format!("%{folded}%")));
        self
    }

    /// JSON array column contains `value`
    pub fn json_array_contains(&mut self, column: &str, value: impl Into<String>) -> &mut Self {
        self.clauses.push(format!(
            "EXISTS (SELECT 1 FROM json_each({column}) WHERE json_each.value = ?)"
        ));
        self.binds.push(BindValue::Text(value.into()));
        self
    }

    /// `column <= ?`
    pub fn at_most(&mut self, column: &str, value: i64) -> &mut Self {
        self.clauses.push(format!("{column} <= ?"));
        self.binds.push(BindValue::Int(value));
        self
    }

    /// Arbitrary predicate with a single text bind
    pub fn raw(&mut self, predicate: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.clauses.push(predicate.into());
        self.binds.push(BindValue::Text(value.into()));
        self
    }

    /// Restrict `column` to the scope's restaurant ids
    pub fn restaurant_scope(&mut self, column: &str, scope: &RestaurantScope) -> &mut Self {
        match scope {
            RestaurantScope::All => {}
            RestaurantScope::Only(ids) if ids.is_empty() => {
                self.clauses.push("1 = 0".to_owned());
            }
            RestaurantScope::Only(ids) => {
                let placeholders = vec!["?"; ids.len()].join(", ");
                self.clauses.push(format!("{column} IN ({placeholders})"));
                self.binds
                    .extend(ids.iter().cloned().map(BindValue::Text));
            }
        }
        self
    }

    /// `WHERE ...` fragment, empty when there are no predicates
    #[must_use]
    pub fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    /// Bind all values onto a query in declaration order
    pub fn bind<'q>(
        &self,
        mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        for value in &self.binds {
            query = match value {
                BindValue::Text(text) => query.bind(text.clone()),
                BindValue::Int(int) => query.bind(*int),
            };
        }
        query
    }

    /// Bind all values onto a `query_as` in declaration order
    pub fn bind_as<'q, O>(
        &self,
        mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
        for value in &self.binds {
            query = match value {
                BindValue::Text(text) => query.bind(text.clone()),
                BindValue::Int(int) => query.bind(*int),
            };
        }
        query
    }
}

/// `SELECT {columns} FROM {table} {where} ORDER BY {order} LIMIT ? OFFSET ?`
#[must_use]
pub fn paged_select(
    columns: &str,
    table: &str,
    filter: &WhereClause,
    order_by: &str,
) -> String {
    format!(
        "SELECT {columns} FROM {table} {} ORDER BY {order_by} LIMIT ? OFFSET ?",
        filter.sql()
    )
}

/// `SELECT COUNT(*) FROM {table} {where}`
#[must_use]
pub fn count_select(table: &str, filter: &WhereClause) -> String {
    format!("SELECT COUNT(*) FROM {table} {}", filter.sql())
}

/// Append `LIMIT`/`OFFSET` binds after the filter binds
pub fn bind_page<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    pagination: Pagination,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    query
        .bind(pagination.sql_limit())
        .bind(pagination.sql_offset())
}

/// Count the rows of `table` matching `filter`
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn count_rows(pool: &SqlitePool, table: &str, filter: &WhereClause) -> AppResult<u64> {
    let query = count_select(table, filter);
    let (count,): (i64,) = filter
        .bind_as(sqlx::query_as(&query))
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count {table}: {e}")))?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Fetch one page of `table` rows matching `filter`
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn fetch_page(
    pool: &SqlitePool,
    columns: &str,
    table: &str,
    filter: &WhereClause,
    order_by: &str,
    pagination: Pagination,
) -> AppResult<Vec<SqliteRow>> {
    let query = paged_select(columns, table, filter, order_by);
    bind_page(filter.bind(sqlx::query(&query)), pagination)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list {table}: {e}")))
}

/// Fetch every row of `table` whose `id_column` is in `ids`, in one round trip
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn fetch_by_ids(
    pool: &SqlitePool,
    columns: &str,
    table: &str,
    id_column: &str,
    ids: &[String],
) -> AppResult<Vec<SqliteRow>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "SELECT {columns} FROM {table} WHERE {id_column} IN ({})",
        placeholders(ids.len())
    );
    let mut q = sqlx::query(&query);
    for id in ids {
        q = q.bind(id);
    }
    q.fetch_all(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to batch load {table}: {e}")))
}

/// `?, ?, ?` for an `IN` list
#[must_use]
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
