use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{Scorer, ScoringError};
use crate::features::PlayerFeatureRecord;

/// Scorer backed by an HTTP model-serving endpoint.
///
/// The record is POSTed as a JSON object keyed by training column name.
#[derive(Clone)]
pub struct RemoteScorer {
    http: Client,
    url: String,
}

impl RemoteScorer {
    pub fn new(url: &str) -> Result<Self, ScoringError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(RemoteScorer {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl Scorer for RemoteScorer {
    async fn predict(&self, record: &PlayerFeatureRecord) -> Result<f64, ScoringError> {
        debug!("POST {} for season {} team {}", self.url, record.season, record.team);

        let resp = self.http.post(&self.url).json(record).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ScoringError::Service { status, body });
        }

        let raw: serde_json::Value = resp.json().await?;
        parse_score_response(&raw)
    }

    fn name(&self) -> &str {
        "remote"
    }
}

/// Accepts `{"prediction": x}`, `{"predictions": [x, ..]}` or a bare number.
fn parse_score_response(raw: &serde_json::Value) -> Result<f64, ScoringError> {
    let value = raw
        .as_f64()
        .or_else(|| raw["prediction"].as_f64())
        .or_else(|| raw["predictions"].get(0).and_then(|v| v.as_f64()))
        .ok_or_else(|| ScoringError::MalformedResponse(raw.to_string()))?;

    if !value.is_finite() {
        return Err(ScoringError::NonFinite(value));
    }
    Ok(value)
}
