//! Owner kinds - which entity type holds subscriptions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Entity type that owns subscriptions in a deployment.
///
/// Exactly one kind is active per deployment; it selects the owner table
/// and the current-owner accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    /// Subscriptions belong directly to users.
    #[default]
    User,
    Account,
    Company,
    Organization,
    Team,
}

impl OwnerKind {
    /// All supported kinds.
    pub const ALL: [OwnerKind; 5] = [
        OwnerKind::User,
        OwnerKind::Account,
        OwnerKind::Company,
        OwnerKind::Organization,
        OwnerKind::Team,
    ];

    /// Singular snake_case name (`account`).
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerKind::User => "user",
            OwnerKind::Account => "account",
            OwnerKind::Company => "company",
            OwnerKind::Organization => "organization",
            OwnerKind::Team => "team",
        }
    }

    /// Table holding records of this kind.
    pub fn table_name(&self) -> &'static str {
        match self {
            OwnerKind::User => "users",
            OwnerKind::Account => "accounts",
            OwnerKind::Company => "companies",
            OwnerKind::Organization => "organizations",
            OwnerKind::Team => "teams",
        }
    }

    /// Conventional name of the current-owner accessor (`current_account`).
    pub fn default_accessor(&self) -> String {
        format!("current_{}", self.as_str())
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OwnerKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        OwnerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ValidationError::invalid_format("owner_kind", format!("unknown kind '{}'", s)))
    }
}
