//! Engineered inputs computed from raw season totals.
//!
//! The form keeps these as independent sliders; these helpers only suggest a
//! value the user can then set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw season totals for one player.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeasonTotals {
    pub games: u32,
    pub points: f64,
    pub assists: f64,
    pub offensive_rebounds: f64,
    pub defensive_rebounds: f64,
    pub steals: f64,
    pub blocks: f64,
    pub turnovers: f64,
    pub field_goals_made: f64,
    pub field_goal_attempts: f64,
    pub free_throws_made: f64,
    pub free_throw_attempts: f64,
    /// Field-goal percentage in [0, 1]. Computed from makes/attempts when absent.
    pub field_goal_pct: Option<f64>,
    pub effective_field_goal_pct: f64,
}

/// Totals the formulas cannot turn into a usable slider value.
#[derive(Debug, Error, PartialEq)]
pub enum DeriveError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidTotal { field: &'static str, value: f64 },

    #[error("{made} = {made_value} exceeds {attempts} = {attempts_value}")]
    MadeExceedsAttempts {
        made: &'static str,
        made_value: f64,
        attempts: &'static str,
        attempts_value: f64,
    },

    #[error("{field} must be within [0, 1] (got {value})")]
    PercentageOutOfRange { field: &'static str, value: f64 },

    #[error("{0} does not fit in a finite number")]
    NonFinite(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedStats {
    pub shooting_efficiency: f64,
    pub weighted_efficiency: f64,
    pub offensive_contribution: f64,
    pub defensive_contribution: f64,
}

pub fn shooting_efficiency(field_goal_pct: f64, effective_field_goal_pct: f64) -> f64 {
    (field_goal_pct + effective_field_goal_pct) / 2.0
}

pub fn offensive_contribution(points: f64, assists: f64, offensive_rebounds: f64) -> f64 {
    points + 1.5 * assists + offensive_rebounds
}

pub fn defensive_contribution(defensive_rebounds: f64, steals: f64, blocks: f64) -> f64 {
    defensive_rebounds + steals + blocks
}

/// WEFF, normalized by games played. Zero games yields zero.
pub fn weighted_efficiency(t: &SeasonTotals) -> f64 {
    if t.games == 0 {
        return 0.0;
    }
    let total_rebounds = t.offensive_rebounds + t.defensive_rebounds;
    let missed_fg = t.field_goal_attempts - t.field_goals_made;
    let missed_ft = t.free_throw_attempts - t.free_throws_made;
    let raw = 2.0 * t.points + 1.5 * t.assists + 1.2 * total_rebounds + t.steals + t.blocks
        - 0.5 * missed_fg
        - 0.5 * missed_ft
        - t.turnovers;
    raw / t.games as f64
}

impl SeasonTotals {
    fn fg_pct(&self) -> f64 {
        match self.field_goal_pct {
            Some(p) => p,
            None if self.field_goal_attempts > 0.0 => {
                self.field_goals_made / self.field_goal_attempts
            }
            None => 0.0,
        }
    }

    fn check(&self) -> Result<(), DeriveError> {
        let totals = [
            ("points", self.points),
            ("assists", self.assists),
            ("offensive_rebounds", self.offensive_rebounds),
            ("defensive_rebounds", self.defensive_rebounds),
            ("steals", self.steals),
            ("blocks", self.blocks),
            ("turnovers", self.turnovers),
            ("field_goals_made", self.field_goals_made),
            ("field_goal_attempts", self.field_goal_attempts),
            ("free_throws_made", self.free_throws_made),
            ("free_throw_attempts", self.free_throw_attempts),
        ];
        for (field, value) in totals {
            if !value.is_finite() || value < 0.0 {
                return Err(DeriveError::InvalidTotal { field, value });
            }
        }

        let pairs = [
            ("field_goals_made", self.field_goals_made, "field_goal_attempts", self.field_goal_attempts),
            ("free_throws_made", self.free_throws_made, "free_throw_attempts", self.free_throw_attempts),
        ];
        for (made, made_value, attempts, attempts_value) in pairs {
            if made_value > attempts_value {
                return Err(DeriveError::MadeExceedsAttempts {
                    made,
                    made_value,
                    attempts,
                    attempts_value,
                });
            }
        }

        let percentages = [
            ("field_goal_pct", self.field_goal_pct.unwrap_or(0.0)),
            ("effective_field_goal_pct", self.effective_field_goal_pct),
        ];
        for (field, value) in percentages {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(DeriveError::PercentageOutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Compute all four engineered inputs, rejecting totals that cannot
    /// produce an in-domain suggestion.
    pub fn derive(&self) -> Result<DerivedStats, DeriveError> {
        self.check()?;
        let stats = DerivedStats {
            shooting_efficiency: shooting_efficiency(
                self.fg_pct(),
                self.effective_field_goal_pct,
            ),
            weighted_efficiency: weighted_efficiency(self),
            offensive_contribution: offensive_contribution(
                self.points,
                self.assists,
                self.offensive_rebounds,
            ),
            defensive_contribution: defensive_contribution(
                self.defensive_rebounds,
                self.steals,
                self.blocks,
            ),
        };

        let outputs = [
            ("shooting_efficiency", stats.shooting_efficiency),
            ("weighted_efficiency", stats.weighted_efficiency),
            ("offensive_contribution", stats.offensive_contribution),
            ("defensive_contribution", stats.defensive_contribution),
        ];
        if let Some((field, _)) = outputs.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(DeriveError::NonFinite(field));
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shooting_efficiency_is_mean_of_percentages() {
        assert_relative_eq!(shooting_efficiency(0.48, 0.56), 0.52, epsilon = 1e-12);
    }

    #[test]
    fn test_contributions() {
        assert_relative_eq!(offensive_contribution(1800.0, 400.0, 90.0), 2490.0);
        assert_relative_eq!(defensive_contribution(420.0, 80.0, 35.0), 535.0);
    }

    #[test]
    fn test_weighted_efficiency() {
        let t = SeasonTotals {
            games: 10,
            points: 200.0,
            assists: 50.0,
            offensive_rebounds: 20.0,
            defensive_rebounds: 60.0,
            steals: 10.0,
            blocks: 5.0,
            turnovers: 25.0,
            field_goals_made: 80.0,
            field_goal_attempts: 160.0,
            free_throws_made: 30.0,
            free_throw_attempts: 40.0,
            ..Default::default()
        };
        // (400 + 75 + 96 + 10 + 5 - 40 - 5 - 25) / 10
        assert_relative_eq!(weighted_efficiency(&t), 51.6, epsilon = 1e-9);
    }

    #[test]
    fn test_weighted_efficiency_zero_games() {
        let t = SeasonTotals {
            points: 100.0,
            ..Default::default()
        };
        assert_eq!(weighted_efficiency(&t), 0.0);
    }

    #[test]
    fn test_derive_computes_fg_pct_when_absent() {
        let t = SeasonTotals {
            games: 1,
            field_goals_made: 5.0,
            field_goal_attempts: 10.0,
            effective_field_goal_pct: 0.6,
            ..Default::default()
        };
        let d = t.derive().unwrap();
        assert_relative_eq!(d.shooting_efficiency, 0.55, epsilon = 1e-12);

        let explicit = SeasonTotals {
            field_goal_pct: Some(0.4),
            ..t
        };
        assert_relative_eq!(explicit.derive().unwrap().shooting_efficiency, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_derive_rejects_negative_totals() {
        let t = SeasonTotals {
            games: 3,
            steals: -1.0,
            ..Default::default()
        };
        assert_eq!(
            t.derive(),
            Err(DeriveError::InvalidTotal {
                field: "steals",
                value: -1.0,
            })
        );
    }

    #[test]
    fn test_derive_rejects_makes_above_attempts() {
        let t = SeasonTotals {
            field_goals_made: 900.0,
            field_goal_attempts: 100.0,
            effective_field_goal_pct: 0.9,
            ..Default::default()
        };
        assert!(matches!(
            t.derive(),
            Err(DeriveError::MadeExceedsAttempts { made: "field_goals_made", .. })
        ));

        let t = SeasonTotals {
            free_throws_made: 12.0,
            free_throw_attempts: 10.0,
            ..Default::default()
        };
        assert!(matches!(
            t.derive(),
            Err(DeriveError::MadeExceedsAttempts { made: "free_throws_made", .. })
        ));
    }

    #[test]
    fn test_derive_rejects_out_of_range_percentages() {
        let t = SeasonTotals {
            field_goal_pct: Some(1.4),
            ..Default::default()
        };
        assert!(matches!(
            t.derive(),
            Err(DeriveError::PercentageOutOfRange { field: "field_goal_pct", .. })
        ));
    }

    #[test]
    fn test_derive_rejects_overflowing_results() {
        let t = SeasonTotals {
            games: 1,
            points: 1e308,
            assists: 1e308,
            ..Default::default()
        };
        assert!(matches!(t.derive(), Err(DeriveError::NonFinite(_))));
    }
}
