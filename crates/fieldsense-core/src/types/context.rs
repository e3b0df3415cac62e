//! Decision context: the stress/quality signals behind one recommendation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Context types indexing the belief table.
///
/// Declaration order is the tie-break order used when two factors are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextType {
    HeatStress,
    FrostStress,
    DroughtStress,
    SoilQualityLow,
}

impl ContextType {
    pub const ALL: [ContextType; 4] = [
        Self::HeatStress,
        Self::FrostStress,
        Self::DroughtStress,
        Self::SoilQualityLow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeatStress => "heat_stress",
            Self::FrostStress => "frost_stress",
            Self::DroughtStress => "drought_stress",
            Self::SoilQualityLow => "soil_quality_low",
        }
    }

    /// Dense index into a `BeliefTable`.
    pub fn index(&self) -> usize {
        match self {
            Self::HeatStress => 0,
            Self::FrostStress => 1,
            Self::DroughtStress => 2,
            Self::SoilQualityLow => 3,
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown context type: {s}"))
    }
}

/// The raw factor picked from a `Context`.
///
/// Differs from `ContextType` only in naming soil quality by its field
/// (`soil_quality`) rather than by the belief row it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextFactor {
    HeatStress,
    FrostStress,
    DroughtStress,
    SoilQuality,
}

impl ContextFactor {
    /// Tie-break order.
    pub const ALL: [ContextFactor; 4] = [
        Self::HeatStress,
        Self::FrostStress,
        Self::DroughtStress,
        Self::SoilQuality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeatStress => "heat_stress",
            Self::FrostStress => "frost_stress",
            Self::DroughtStress => "drought_stress",
            Self::SoilQuality => "soil_quality",
        }
    }

    /// The belief row this factor is credited to.
    pub fn context_type(&self) -> ContextType {
        match self {
            Self::HeatStress => ContextType::HeatStress,
            Self::FrostStress => ContextType::FrostStress,
            Self::DroughtStress => ContextType::DroughtStress,
            Self::SoilQuality => ContextType::SoilQualityLow,
        }
    }
}

impl fmt::Display for ContextFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the signals driving one decision.
///
/// Absent fields deserialize as 0. `soil_quality` is a field score, not a
/// 0-9 stress value, but is compared against the stresses as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    pub heat_stress: f64,
    pub frost_stress: f64,
    pub drought_stress: f64,
    pub soil_quality: i64,
}

impl Context {
    pub fn new(heat_stress: f64, frost_stress: f64, drought_stress: f64, soil_quality: i64) -> Self {
        Self {
            heat_stress,
            frost_stress,
            drought_stress,
            soil_quality,
        }
    }

    /// Value of one factor, soil quality widened to f64.
    pub fn factor(&self, factor: ContextFactor) -> f64 {
        match factor {
            ContextFactor::HeatStress => self.heat_stress,
            ContextFactor::FrostStress => self.frost_stress,
            ContextFactor::DroughtStress => self.drought_stress,
            ContextFactor::SoilQuality => self.soil_quality as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_type_round_trip_names() {
        for ct in ContextType::ALL {
            assert_eq!(ct.as_str().parse::<ContextType>().unwrap(), ct);
        }
        assert!("soil_quality".parse::<ContextType>().is_err());
    }

    #[test]
    fn test_soil_factor_maps_to_low_row() {
        assert_eq!(
            ContextFactor::SoilQuality.context_type(),
            ContextType::SoilQualityLow
        );
        assert_eq!(ContextFactor::SoilQuality.to_string(), "soil_quality");
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let ctx: Context = serde_json::from_str(r#"{"frost_stress": 3.5}"#).unwrap();
        assert_eq!(ctx.heat_stress, 0.0);
        assert_eq!(ctx.frost_stress, 3.5);
        assert_eq!(ctx.drought_stress, 0.0);
        assert_eq!(ctx.soil_quality, 0);
    }
}
