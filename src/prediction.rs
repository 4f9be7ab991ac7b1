//! Predict action and salary display.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::features::{FormState, PlayerFeatureRecord};
use crate::scoring::{Scorer, ScoringError};

/// Shown in the output area until the first predict action.
pub const PLACEHOLDER: &str = "Click the button to predict the salary.";

/// Result of one predict action.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub salary: f64,
    pub message: String,
    pub record: PlayerFeatureRecord,
    pub predicted_at: DateTime<Utc>,
}

/// Runs the predict action against an injected scorer.
#[derive(Clone)]
pub struct PredictionService {
    scorer: Arc<dyn Scorer>,
}

impl PredictionService {
    pub fn new(scorer: Arc<dyn Scorer>) -> Self {
        PredictionService { scorer }
    }

    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }

    /// Build a fresh record from the form, score it and format the result.
    pub async fn predict(&self, form: &FormState) -> Result<Prediction, ScoringError> {
        let record = PlayerFeatureRecord::from_form(form);
        let salary = match self.scorer.predict(&record).await {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(v) => Err(ScoringError::NonFinite(v)),
            Err(e) => Err(e),
        }
        .map_err(|e| {
            warn!("{} scorer failed: {}", self.scorer.name(), e);
            e
        })?;
        debug!(
            "Predicted ${:.2} for {} age {} ({})",
            salary, record.team, record.age, record.season
        );
        Ok(Prediction {
            salary,
            message: salary_message(Some(salary)),
            record,
            predicted_at: Utc::now(),
        })
    }
}

/// Output-area text: the placeholder before any prediction, else the salary.
pub fn salary_message(salary: Option<f64>) -> String {
    match salary {
        Some(v) => format!("Predicted Salary: {}", format_currency(v)),
        None => PLACEHOLDER.to_string(),
    }
}

/// `1234567.8` → `"$1,234,567.80"`. Negative values render as `"$-1,234.50"`.
pub fn format_currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // Rounding can turn a tiny negative into zero; no sign then.
    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("${sign}{grouped}.{frac_part}")
}
