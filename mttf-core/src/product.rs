use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PredictError;

/// Equipment categories the form offers. The set is closed: every variant
/// must be known to the fitted `ProductType` encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductType {
    #[default]
    #[serde(rename = "Gauge Machine")]
    GaugeMachine,
    #[serde(rename = "Extruder")]
    Extruder,
    #[serde(rename = "Pump")]
    Pump,
    #[serde(rename = "Coil Oven")]
    CoilOven,
    #[serde(rename = "Pressure Cutter")]
    PressureCutter,
}

impl ProductType {
    /// Form order. The first entry is the default selection.
    pub const ALL: [ProductType; 5] = [
        ProductType::GaugeMachine,
        ProductType::Extruder,
        ProductType::Pump,
        ProductType::CoilOven,
        ProductType::PressureCutter,
    ];

    /// Category label exactly as the encoder was fitted on it.
    pub fn label(&self) -> &'static str {
        match self {
            ProductType::GaugeMachine => "Gauge Machine",
            ProductType::Extruder => "Extruder",
            ProductType::Pump => "Pump",
            ProductType::CoilOven => "Coil Oven",
            ProductType::PressureCutter => "Pressure Cutter",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ProductType::GaugeMachine => 0,
            ProductType::Extruder => 1,
            ProductType::Pump => 2,
            ProductType::CoilOven => 3,
            ProductType::PressureCutter => 4,
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProductType {
    type Err = PredictError;

    /// Exact match only, the encoder never saw trimmed or case-folded labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProductType::ALL
            .iter()
            .copied()
            .find(|p| p.label() == s)
            .ok_or_else(|| PredictError::unrecognized("ProductType", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_parse_known_labels() {
        for product in ProductType::ALL {
            assert_eq!(product.label().parse::<ProductType>().unwrap(), product);
        }
        assert_eq!("Coil Oven".parse::<ProductType>().unwrap(), ProductType::CoilOven);
    }

    #[test]
    fn test_parse_unknown_label() {
        let err = "Unknown Machine".parse::<ProductType>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedCategory);

        // Case and whitespace are significant.
        assert!("pump".parse::<ProductType>().is_err());
        assert!(" Pump".parse::<ProductType>().is_err());
    }

    #[test]
    fn test_indices_follow_form_order() {
        for (i, product) in ProductType::ALL.iter().enumerate() {
            assert_eq!(product.index(), i);
        }
        assert_eq!(ProductType::default(), ProductType::GaugeMachine);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&ProductType::PressureCutter).unwrap();
        assert_eq!(json, "\"Pressure Cutter\"");
        let parsed: ProductType = serde_json::from_str("\"Gauge Machine\"").unwrap();
        assert_eq!(parsed, ProductType::GaugeMachine);
    }
}
