pub mod forest;
pub mod remote;

pub use forest::ForestModel;
pub use remote::RemoteScorer;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::PlayerFeatureRecord;

/// Failures at the scoring seam.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("model feature order {found:?} does not match training columns {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("scoring service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("scoring service error {status}: {body}")]
    Service { status: u16, body: String },

    #[error("malformed scoring response: {0}")]
    MalformedResponse(String),

    #[error("scorer returned a non-finite value ({0})")]
    NonFinite(f64),
}

/// Anything that can turn a feature record into a salary estimate.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn predict(&self, record: &PlayerFeatureRecord) -> Result<f64, ScoringError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
