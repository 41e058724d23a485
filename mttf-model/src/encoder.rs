use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use mttf_core::{PredictError, PredictResult};

/// Fitted single-column label encoder.
///
/// `classes` is kept sorted and unique, and a category's code is its index
/// in that list. This matches how the training pipeline assigns codes, so the
/// exported class list is all that is needed to reproduce them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> PredictResult<Self> {
        let encoder = Self { classes };
        encoder.validate("<unnamed>")?;
        Ok(encoder)
    }

    /// Fits an encoder on observed values.
    pub fn fit<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = values.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn transform(&self, field: &str, value: &str) -> PredictResult<u32> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(value))
            .map(|idx| idx as u32)
            .map_err(|_| PredictError::unrecognized(field, value))
    }

    pub fn inverse_transform(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// Deserialized encoders are not trusted to be sorted; lookups rely on it.
    pub fn validate(&self, field: &str) -> PredictResult<()> {
        if self.classes.is_empty() {
            return Err(PredictError::SchemaMismatch(format!(
                "encoder for {} has no classes",
                field
            )));
        }
        if let Some(pair) = self.classes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(PredictError::SchemaMismatch(format!(
                "encoder for {} has unsorted or duplicate classes near '{}'",
                field, pair[1]
            )));
        }
        Ok(())
    }
}

/// Field name to fitted encoder, as exported next to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderSet {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl EncoderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, encoder: LabelEncoder) {
        self.encoders.insert(field.into(), encoder);
    }

    pub fn get(&self, field: &str) -> Option<&LabelEncoder> {
        self.encoders.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    pub fn transform(&self, field: &str, value: &str) -> PredictResult<u32> {
        let encoder = self.encoders.get(field).ok_or_else(|| {
            PredictError::SchemaMismatch(format!("no encoder for field {}", field))
        })?;
        encoder.transform(field, value)
    }

    pub fn validate(&self) -> PredictResult<()> {
        for (field, encoder) in &self.encoders {
            encoder.validate(field)?;
        }
        Ok(())
    }
}
