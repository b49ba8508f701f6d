use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of entity a feature record (and any flag raised against it) describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Provider,
    Supplier,
    Service,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Provider => "provider",
            EntityType::Supplier => "supplier",
            EntityType::Service => "service",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "provider" => Ok(EntityType::Provider),
            "supplier" => Ok(EntityType::Supplier),
            "service" => Ok(EntityType::Service),
            other => Err(format!("unknown entity type '{}'", other)),
        }
    }
}
