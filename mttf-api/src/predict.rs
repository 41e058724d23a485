use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mttf_core::{FeatureRecord, Prediction, PredictResult, ProductType, FEATURE_NAMES};
use mttf_model::Predictor;
use mttf_store::ArtifactInfo;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Raw submission. `product_type` stays a string so an unknown category is
/// reported as such instead of as a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub product_type: String,
    pub humidity: f64,
    pub temperature: f64,
    pub age: i64,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction_id: Uuid,
    pub mttf_hours: f64,
    pub display: String,
    pub product_type: ProductType,
    pub product_type_code: u32,
    pub predicted_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ProductCode {
    pub product_type: ProductType,
    pub code: u32,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub n_trees: usize,
    pub feature_names: Vec<String>,
    pub product_types: Vec<ProductCode>,
    pub artifacts: Option<ArtifactInfo>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/predict", post(predict))
        .route("/v1/model", get(model_info))
}

// ============================================================================
// Inference
// ============================================================================

/// The single submit action: build a record from raw input, then encode and
/// predict. Every failure comes back as a tagged [`mttf_core::PredictError`].
pub fn submit(
    predictor: &Predictor,
    req: &PredictRequest,
) -> PredictResult<(FeatureRecord, Prediction)> {
    let product_type: ProductType = req.product_type.parse()?;
    let record = FeatureRecord::new(
        product_type,
        req.humidity,
        req.temperature,
        req.age,
        req.quantity,
    )?;
    let prediction = predictor.predict(&record)?;
    Ok((record, prediction))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/predict
async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    let Json(req) = payload?;
    let predictor = state.predictor()?;
    let (record, prediction) = submit(predictor, &req)?;

    let prediction_id = Uuid::new_v4();
    tracing::debug!(
        "Prediction {} for {}: {}",
        prediction_id,
        record.product_type,
        prediction
    );

    Ok(Json(PredictResponse {
        prediction_id,
        mttf_hours: prediction.hours,
        display: prediction.to_string(),
        product_type: record.product_type,
        product_type_code: predictor.product_code(record.product_type),
        predicted_at: Utc::now(),
    }))
}

/// GET /v1/model
async fn model_info(State(state): State<AppState>) -> Result<Json<ModelInfoResponse>, AppError> {
    let predictor = state
        .predictor()
        .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;

    Ok(Json(ModelInfoResponse {
        n_trees: predictor.model().n_trees(),
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        product_types: ProductType::ALL
            .iter()
            .map(|&product_type| ProductCode {
                product_type,
                code: predictor.product_code(product_type),
            })
            .collect(),
        artifacts: state.artifacts.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mttf_core::ErrorKind;
    use mttf_model::{DecisionTree, EncoderSet, LabelEncoder, RandomForestRegressor};

    fn predictor() -> Predictor {
        let mut encoders = EncoderSet::new();
        encoders.insert(
            "ProductType",
            LabelEncoder::fit(ProductType::ALL.iter().map(|p| p.label())),
        );
        let model = RandomForestRegressor::new(
            FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            vec![DecisionTree::constant(321.0)],
        );
        Predictor::new(encoders, model).unwrap()
    }

    fn request(product_type: &str) -> PredictRequest {
        PredictRequest {
            product_type: product_type.to_string(),
            humidity: 45.0,
            temperature: 22.5,
            age: 3,
            quantity: 10,
        }
    }

    #[test]
    fn test_submit_known_category() {
        let (record, prediction) = submit(&predictor(), &request("Pump")).unwrap();
        assert_eq!(record.product_type, ProductType::Pump);
        assert_eq!(prediction.to_string(), "321.00 Hours");
    }

    #[test]
    fn test_submit_unknown_category() {
        let err = submit(&predictor(), &request("Unknown Machine")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedCategory);
    }

    #[test]
    fn test_submit_out_of_range() {
        let mut req = request("Pump");
        req.quantity = 0;
        let err = submit(&predictor(), &req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
