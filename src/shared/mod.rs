//! Shared newtypes used across domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize
//! identically to the raw strings the node sends.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── DefiadId ────────────────────────────────────────────────────────────────

/// Network-assigned ad identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefiadId(String);

impl DefiadId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DefiadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DefiadId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DefiadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for DefiadId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DefiadId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DefiadId(s.to_string()))
    }
}

impl Serialize for DefiadId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DefiadId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(DefiadId(s))
    }
}
