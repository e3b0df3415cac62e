//! The closed set of biological products.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A recommendable product. Declaration order is the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Product {
    StressBuster,
    YieldBooster,
    NutrientBooster,
}

impl Product {
    pub const ALL: [Product; 3] = [Self::StressBuster, Self::YieldBooster, Self::NutrientBooster];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StressBuster => "StressBuster",
            Self::YieldBooster => "YieldBooster",
            Self::NutrientBooster => "NutrientBooster",
        }
    }

    /// Dense index into a `BeliefTable` row.
    pub fn index(&self) -> usize {
        match self {
            Self::StressBuster => 0,
            Self::YieldBooster => 1,
            Self::NutrientBooster => 2,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Product {
    type Err = String;

    /// Accepts the canonical name or its lowercase form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s || p.as_str().to_ascii_lowercase() == s)
            .ok_or_else(|| format!("unknown product: {s}"))
    }
}
