//! Strongly-typed identifier value objects.
//!
//! Owners, subscriptions and plans are keyed by database-assigned integers.
//! Principals are keyed by the opaque subject string of the identity provider.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use super::ValidationError;

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database identifier.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw database identifier.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

integer_id!(
    /// Identifier of an owner record (user, account, company, ...).
    OwnerId
);

integer_id!(
    /// Identifier of a subscription record.
    SubscriptionId
);

integer_id!(
    /// Identifier of a pricing plan.
    PlanId
);

/// Principal identifier (the `sub` claim from the identity provider).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Creates a new PrincipalId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("principal_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_parses_from_decimal_string() {
        let id: OwnerId = "42".parse().unwrap();
        assert_eq!(id, OwnerId::new(42));
    }

    #[test]
    fn owner_id_parse_tolerates_surrounding_whitespace() {
        let id: OwnerId = " 7 ".parse().unwrap();
        assert_eq!(id.value(), 7);
    }

    #[test]
    fn owner_id_rejects_slugs() {
        assert!("acme-inc".parse::<OwnerId>().is_err());
    }

    #[test]
    fn ids_display_as_raw_integer() {
        assert_eq!(SubscriptionId::new(12).to_string(), "12");
        assert_eq!(PlanId::new(3).to_string(), "3");
    }

    #[test]
    fn ids_serialize_transparently() {
        let json = serde_json::to_string(&PlanId::new(9)).unwrap();
        assert_eq!(json, "9");

        let id: SubscriptionId = serde_json::from_str("15").unwrap();
        assert_eq!(id.value(), 15);
    }

    #[test]
    fn principal_id_rejects_empty() {
        assert!(PrincipalId::new("").is_err());
        assert!(PrincipalId::new("   ").is_err());
    }

    #[test]
    fn principal_id_keeps_subject() {
        let id = PrincipalId::new("auth0|abc").unwrap();
        assert_eq!(id.as_str(), "auth0|abc");
    }
}
