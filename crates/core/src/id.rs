//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identity of a catalog entry: `lowercase(name) + "|" + lowercase(weight)`.
///
/// Both halves are trimmed before lowercasing, so `" Томаты "` and `"томаты"`
/// address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogKey(String);

/// Identifier of a customer (the nickname the operator types or pastes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

macro_rules! impl_string_newtype {
    ($t:ty) => {
        impl $t {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_string_newtype!(CatalogKey);
impl_string_newtype!(CustomerId);

impl CatalogKey {
    pub fn new(name: &str, weight: &str) -> Self {
        Self(format!(
            "{}|{}",
            name.trim().to_lowercase(),
            weight.trim().to_lowercase()
        ))
    }

    /// The lowercased name half of the key.
    pub fn name_part(&self) -> &str {
        self.0.split_once('|').map_or(self.0.as_str(), |(name, _)| name)
    }
}

impl CustomerId {
    /// Build a customer id from operator input; blank input is rejected.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("customer id cannot be blank"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl FromStr for CustomerId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
