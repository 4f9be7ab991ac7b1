//! Random-forest regression artifact loaded from JSON.
//!
//! Encoding of one record: the sixteen numeric columns in training order,
//! followed by a one-hot block over `team_categories`. A team the artifact
//! never saw encodes as all zeros.
//!
//! Trees are flat node arrays rooted at index 0. A split sends the sample left
//! when `x[feature] <= threshold`. Child indices must point forward, which
//! rules out cycles. The forest prediction is the mean of the leaf values.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{Scorer, ScoringError};
use crate::features::{FeatureValue, PlayerFeatureRecord, FEATURE_COLUMNS};

const NUMERIC_FEATURES: usize = FEATURE_COLUMNS.len() - 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    /// Column names the model was trained on, in order.
    pub feature_names: Vec<String>,
    pub team_categories: Vec<String>,
    pub trees: Vec<Tree>,

    /// Optional free-form metadata (versioning, training info, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ForestModel {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScoringError> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ScoringError> {
        let model: Self = serde_json::from_str(content)?;
        model.validate()?;
        Ok(model)
    }

    pub fn input_dim(&self) -> usize {
        NUMERIC_FEATURES + self.team_categories.len()
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_COLUMNS) {
            return Err(ScoringError::FeatureMismatch {
                expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: self.feature_names.clone(),
            });
        }
        if self.trees.is_empty() {
            return Err(invalid("trees must not be empty"));
        }

        let dim = self.input_dim();
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(invalid(format!("tree[{t}] has no nodes")));
            }
            let n = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Leaf { value } => {
                        if !value.is_finite() {
                            return Err(invalid(format!("tree[{t}] node {i} leaf is non-finite")));
                        }
                    }
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= dim {
                            return Err(invalid(format!(
                                "tree[{t}] node {i} feature {feature} >= input dim {dim}"
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(invalid(format!(
                                "tree[{t}] node {i} threshold is non-finite"
                            )));
                        }
                        for child in [left, right] {
                            if *child <= i || *child >= n {
                                return Err(invalid(format!(
                                    "tree[{t}] node {i} child {child} must be in ({i}, {n})"
                                )));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Encode a record into the model's input vector.
    pub fn encode(&self, record: &PlayerFeatureRecord) -> Vec<f64> {
        let mut x = Vec::with_capacity(self.input_dim());
        let mut team = "";
        for (_, value) in record.columns() {
            match value {
                FeatureValue::Number(v) => x.push(v),
                FeatureValue::Category(code) => team = code,
            }
        }
        x.extend(
            self.team_categories
                .iter()
                .map(|c| if c == team { 1.0 } else { 0.0 }),
        );
        x
    }

    pub fn predict_record(&self, record: &PlayerFeatureRecord) -> f64 {
        let x = self.encode(record);
        let sum: f64 = self.trees.iter().map(|t| t.evaluate(&x)).sum();
        sum / self.trees.len() as f64
    }
}

fn invalid(msg: impl Into<String>) -> ScoringError {
    ScoringError::InvalidModel(msg.into())
}

#[async_trait]
impl Scorer for ForestModel {
    async fn predict(&self, record: &PlayerFeatureRecord) -> Result<f64, ScoringError> {
        let salary = self.predict_record(record);
        if !salary.is_finite() {
            return Err(ScoringError::NonFinite(salary));
        }
        Ok(salary)
    }

    fn name(&self) -> &str {
        "random-forest"
    }
}
