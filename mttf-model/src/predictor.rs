use mttf_core::{
    FeatureRecord, Prediction, PredictError, PredictResult, ProductType, CATEGORICAL_FEATURES,
    FEATURE_NAMES,
};

use crate::encoder::EncoderSet;
use crate::forest::RandomForestRegressor;

const PRODUCT_TYPE_FIELD: &str = "ProductType";

/// Regression model plus the category codes its encoders assign, checked
/// against the feature schema once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Predictor {
    product_codes: [u32; ProductType::ALL.len()],
    model: RandomForestRegressor,
}

impl Predictor {
    pub fn new(encoders: EncoderSet, model: RandomForestRegressor) -> PredictResult<Self> {
        model.validate()?;
        encoders.validate()?;

        if model.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(PredictError::SchemaMismatch(format!(
                "model features {:?} do not match expected {:?}",
                model.feature_names, FEATURE_NAMES
            )));
        }

        if let Some(field) = encoders.fields().find(|f| !CATEGORICAL_FEATURES.contains(f)) {
            return Err(PredictError::SchemaMismatch(format!(
                "encoder provided for non-categorical field {}",
                field
            )));
        }

        let encoder = encoders.get(PRODUCT_TYPE_FIELD).ok_or_else(|| {
            PredictError::SchemaMismatch(format!("no encoder for field {}", PRODUCT_TYPE_FIELD))
        })?;

        // Resolve every variant now so a typed ProductType can never miss at request time.
        let mut product_codes = [0u32; ProductType::ALL.len()];
        for product in ProductType::ALL {
            product_codes[product.index()] = encoder
                .transform(PRODUCT_TYPE_FIELD, product.label())
                .map_err(|_| {
                    PredictError::SchemaMismatch(format!(
                        "{} encoder was not fitted on '{}'",
                        PRODUCT_TYPE_FIELD, product
                    ))
                })?;
        }

        tracing::info!(
            "Predictor ready: {} trees, {} features, {} encoders",
            model.n_trees(),
            model.n_features(),
            encoders.len()
        );

        Ok(Self { product_codes, model })
    }

    pub fn product_code(&self, product_type: ProductType) -> u32 {
        self.product_codes[product_type.index()]
    }

    /// Replaces categorical fields by their trained codes, in model column order.
    pub fn encode(&self, record: &FeatureRecord) -> [f64; FEATURE_NAMES.len()] {
        let [humidity, temperature, age, quantity] = record.numeric_features();
        [
            self.product_code(record.product_type) as f64,
            humidity,
            temperature,
            age,
            quantity,
        ]
    }

    /// One encode-then-predict pass.
    pub fn predict(&self, record: &FeatureRecord) -> PredictResult<Prediction> {
        let row = self.encode(record);
        let hours = self.model.predict(&row)?;
        Ok(Prediction::new(hours))
    }

    pub fn model(&self) -> &RandomForestRegressor {
        &self.model
    }
}
