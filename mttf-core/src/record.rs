use serde::Serialize;

use crate::{PredictError, PredictResult, ProductType};

/// Column order the regression model was fitted on.
pub const FEATURE_NAMES: [&str; 5] = ["ProductType", "Humidity", "Temperature", "Age", "Quantity"];

/// Columns that must pass through a label encoder before prediction.
pub const CATEGORICAL_FEATURES: [&str; 1] = ["ProductType"];

pub const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);
pub const TEMPERATURE_RANGE: (f64, f64) = (-50.0, 150.0);
pub const AGE_RANGE: (i64, i64) = (0, 100);
pub const MIN_QUANTITY: i64 = 1;

/// One submission's worth of equipment telemetry. Only built through
/// [`FeatureRecord::new`], so every record is within range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureRecord {
    pub product_type: ProductType,
    /// Relative humidity, percent
    pub humidity: f64,
    /// Degrees Celsius
    pub temperature: f64,
    /// Equipment age in years
    pub age: u32,
    pub quantity: u64,
}

impl FeatureRecord {
    /// Builds a record, rejecting values outside the ranges the input form allows.
    pub fn new(
        product_type: ProductType,
        humidity: f64,
        temperature: f64,
        age: i64,
        quantity: i64,
    ) -> PredictResult<Self> {
        check_float("Humidity", humidity, HUMIDITY_RANGE)?;
        check_float("Temperature", temperature, TEMPERATURE_RANGE)?;

        if age < AGE_RANGE.0 || age > AGE_RANGE.1 {
            return Err(PredictError::invalid_input(
                "Age",
                format!("must be between {} and {}, got {}", AGE_RANGE.0, AGE_RANGE.1, age),
            ));
        }
        if quantity < MIN_QUANTITY {
            return Err(PredictError::invalid_input(
                "Quantity",
                format!("must be at least {}, got {}", MIN_QUANTITY, quantity),
            ));
        }
        Ok(Self {
            product_type,
            humidity,
            temperature,
            age: age as u32,
            quantity: quantity as u64,
        })
    }

    /// Numeric columns in model order, everything after `ProductType`.
    pub fn numeric_features(&self) -> [f64; 4] {
        [
            self.humidity,
            self.temperature,
            self.age as f64,
            self.quantity as f64,
        ]
    }
}

fn check_float(field: &str, value: f64, (min, max): (f64, f64)) -> PredictResult<()> {
    if !value.is_finite() {
        return Err(PredictError::invalid_input(field, "must be a finite number"));
    }
    if value < min || value > max {
        return Err(PredictError::invalid_input(
            field,
            format!("must be between {:.1} and {:.1}, got {}", min, max, value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_boundary_values_accepted() {
        let low = FeatureRecord::new(ProductType::Pump, 0.0, -50.0, 0, 1).unwrap();
        assert_eq!(low.age, 0);
        assert_eq!(low.quantity, 1);

        let high = FeatureRecord::new(ProductType::Extruder, 100.0, 150.0, 100, 10_000).unwrap();
        assert_eq!(high.humidity, 100.0);
        assert_eq!(high.temperature, 150.0);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let cases = [
            FeatureRecord::new(ProductType::Pump, -0.1, 20.0, 1, 1),
            FeatureRecord::new(ProductType::Pump, 100.1, 20.0, 1, 1),
            FeatureRecord::new(ProductType::Pump, 50.0, -50.1, 1, 1),
            FeatureRecord::new(ProductType::Pump, 50.0, 150.5, 1, 1),
            FeatureRecord::new(ProductType::Pump, 50.0, 20.0, -1, 1),
            FeatureRecord::new(ProductType::Pump, 50.0, 20.0, 101, 1),
            FeatureRecord::new(ProductType::Pump, 50.0, 20.0, 5, 0),
            FeatureRecord::new(ProductType::Pump, f64::NAN, 20.0, 5, 1),
        ];
        for case in cases {
            assert_eq!(case.unwrap_err().kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn test_large_quantity_accepted() {
        let record = FeatureRecord::new(ProductType::Pump, 50.0, 20.0, 5, 99_999_999_999).unwrap();
        assert_eq!(record.quantity, 99_999_999_999);
        assert_eq!(record.numeric_features()[3], 99_999_999_999.0);
    }

    #[test]
    fn test_error_names_field() {
        let err = FeatureRecord::new(ProductType::Pump, 50.0, 20.0, 5, 0).unwrap_err();
        assert_eq!(err.to_string(), "Invalid Quantity: must be at least 1, got 0");
    }

    #[test]
    fn test_numeric_features_order() {
        let record = FeatureRecord::new(ProductType::Pump, 45.0, 22.5, 3, 10).unwrap();
        assert_eq!(record.numeric_features(), [45.0, 22.5, 3.0, 10.0]);
        assert_eq!(FEATURE_NAMES.len(), record.numeric_features().len() + CATEGORICAL_FEATURES.len());
    }
}
