// ABOUTME: Core identity models shared by every resource: roles, the acting user and user records
// ABOUTME: Defines UserRole, Actor and the User side of the restaurant membership relation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Identity Models
//!
//! Every service operation receives an [`Actor`] resolved from the bearer
//! token. The [`User`] record is owned by the identity collaborator; this
//! service only reads it and maintains its `associated_restaurants` list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role carried by the actor's credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Global administrator, bypasses restaurant membership checks
    Admin,
    /// Restaurant manager, may manage membership of their restaurants
    Manager,
    /// Regular staff member
    #[default]
    User,
}

impl UserRole {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            _ => Self::User,
        }
    }

    /// Whether the role is the global administrator
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// The caller of an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User id (JWT `sub`)
    pub id: String,
    /// Role from the credential
    pub role: UserRole,
}

impl Actor {
    /// Create an actor
    pub fn new(id: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Shorthand for `self.role.is_admin()`
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// User record as seen by the membership component
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id
    pub id: String,
    /// Login email
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Role
    pub role: UserRole,
    /// Restaurants the user belongs to (business ids)
    pub associated_restaurants: Vec<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new user record with no restaurant associations
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            name: None,
            role,
            associated_restaurants: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Admin, UserRole::Manager, UserRole::User] {
            assert_eq!(UserRole::parse(role.as_str()), role);
        }
        assert_eq!(UserRole::parse("ADMIN"), UserRole::Admin);
        assert_eq!(UserRole::parse("chef"), UserRole::User);
    }

    #[test]
    fn test_actor_admin() {
        assert!(Actor::new("a", UserRole::Admin).is_admin());
        assert!(!Actor::new("m", UserRole::Manager).is_admin());
    }
}
