use serde::{Deserialize, Serialize};

use mttf_core::{PredictError, PredictResult};

/// Child index marking a leaf node.
pub const TREE_LEAF: i64 = -1;

/// Regression tree stored as parallel per-node arrays, root at index 0.
///
/// Internal nodes send a sample left when `x[feature] <= threshold`. Leaves
/// carry their prediction in `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    pub fn new(
        children_left: Vec<i64>,
        children_right: Vec<i64>,
        feature: Vec<i64>,
        threshold: Vec<f64>,
        value: Vec<f64>,
    ) -> Self {
        Self { children_left, children_right, feature, threshold, value }
    }

    /// Single-leaf tree.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![TREE_LEAF], vec![TREE_LEAF], vec![-2], vec![-2.0], vec![value])
    }

    pub fn is_leaf(&self, node: usize) -> bool {
        self.children_left[node] == TREE_LEAF
    }

    /// Structural checks that make [`DecisionTree::predict`] total: children
    /// point forward so every walk ends at a leaf, and every split reads an
    /// existing feature column.
    pub fn validate(&self, n_features: usize) -> PredictResult<()> {
        let n = self.children_left.len();
        if n == 0 {
            return Err(PredictError::SchemaMismatch("tree has no nodes".to_string()));
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(PredictError::SchemaMismatch(
                "tree node arrays have different lengths".to_string(),
            ));
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == TREE_LEAF || right == TREE_LEAF {
                if left != right {
                    return Err(PredictError::SchemaMismatch(format!(
                        "node {} has only one child",
                        node
                    )));
                }
                if !self.value[node].is_finite() {
                    return Err(PredictError::SchemaMismatch(format!(
                        "leaf {} has a non-finite value",
                        node
                    )));
                }
                continue;
            }

            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(PredictError::SchemaMismatch(format!(
                        "node {} has invalid child index {}",
                        node, child
                    )));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(PredictError::SchemaMismatch(format!(
                    "node {} splits on feature {} but the model has {} features",
                    node, feature, n_features
                )));
            }
            if self.threshold[node].is_nan() {
                return Err(PredictError::SchemaMismatch(format!(
                    "node {} has a NaN threshold",
                    node
                )));
            }
        }
        Ok(())
    }

    /// Walks a validated tree down to a leaf.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut node = 0;
        while !self.is_leaf(node) {
            // Splits were learned on single-precision inputs.
            let x = features[self.feature[node] as usize] as f32 as f64;
            node = if x <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        self.value[node]
    }
}

/// Bagged ensemble of regression trees; the prediction is the mean of its trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    pub feature_names: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForestRegressor {
    pub fn new(feature_names: Vec<String>, trees: Vec<DecisionTree>) -> Self {
        Self { feature_names, trees }
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn validate(&self) -> PredictResult<()> {
        if self.trees.is_empty() {
            return Err(PredictError::SchemaMismatch("model has no trees".to_string()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features()).map_err(|e| match e {
                PredictError::SchemaMismatch(msg) => {
                    PredictError::SchemaMismatch(format!("tree {}: {}", idx, msg))
                }
                other => other,
            })?;
        }
        Ok(())
    }

    pub fn predict(&self, features: &[f64]) -> PredictResult<f64> {
        if features.len() != self.n_features() {
            return Err(PredictError::SchemaMismatch(format!(
                "model expects {} features, got {}",
                self.n_features(),
                features.len()
            )));
        }
        let total: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        Ok(total / self.trees.len() as f64)
    }
}
