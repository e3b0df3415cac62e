//! Crop temperature limits.

use std::fmt;
use std::str::FromStr;

/// Crops with known temperature limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crop {
    Soybean,
    Corn,
    Cotton,
    Rice,
    Wheat,
}

/// Heat limits in °C: stress starts above `optimum` and saturates at `limit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatLimits {
    pub optimum: f64,
    pub limit: f64,
}

/// Frost limits in °C: stress starts below `no_frost` and saturates at
/// `frost`, which is the lower of the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrostLimits {
    pub no_frost: f64,
    pub frost: f64,
}

impl Crop {
    pub const ALL: [Crop; 5] = [
        Self::Soybean,
        Self::Corn,
        Self::Cotton,
        Self::Rice,
        Self::Wheat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soybean => "soybean",
            Self::Corn => "corn",
            Self::Cotton => "cotton",
            Self::Rice => "rice",
            Self::Wheat => "wheat",
        }
    }

    pub fn heat_limits(&self) -> HeatLimits {
        let (optimum, limit) = match self {
            Self::Soybean => (32.0, 45.0),
            Self::Corn => (33.0, 44.0),
            Self::Cotton | Self::Rice => (32.0, 38.0),
            Self::Wheat => (25.0, 32.0),
        };
        HeatLimits { optimum, limit }
    }

    /// `None` for crops without a frost model.
    pub fn frost_limits(&self) -> Option<FrostLimits> {
        match self {
            Self::Soybean | Self::Corn | Self::Cotton => Some(FrostLimits {
                no_frost: 4.0,
                frost: -3.0,
            }),
            Self::Rice | Self::Wheat => None,
        }
    }
}

impl fmt::Display for Crop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Crop {
    type Err = String;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| format!("unknown crop: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Soybean".parse::<Crop>().unwrap(), Crop::Soybean);
        assert_eq!("WHEAT".parse::<Crop>().unwrap(), Crop::Wheat);
        assert!("barley".parse::<Crop>().is_err());
    }

    #[test]
    fn test_rice_and_wheat_have_no_frost_model() {
        assert!(Crop::Rice.frost_limits().is_none());
        assert!(Crop::Wheat.frost_limits().is_none());
        assert_eq!(
            Crop::Corn.frost_limits(),
            Some(FrostLimits { no_frost: 4.0, frost: -3.0 })
        );
    }
}
