//! Form state, field domains and the fixed-order feature record.
//!
//! The model was trained on seventeen columns in a fixed order. Everything that
//! hands a record to a scorer goes through [`PlayerFeatureRecord::columns`] or
//! the record's JSON form, both of which follow [`FEATURE_COLUMNS`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::teams::{TeamDirectory, DEFAULT_TEAM};

/// Training column order. Changing this silently changes what the model sees.
pub const FEATURE_COLUMNS: [&str; 17] = [
    "Season",
    "Tm",
    "Age",
    "GS",
    "FG",
    "FGA",
    "eFG%",
    "WEFF",
    "PPG",
    "RPG",
    "TPG",
    "APG",
    "ShootingEfficiency",
    "OffensiveContribution",
    "DefensiveContribution",
    "GS%",
    "MPG",
];

/// Domain and presentation of one numeric input.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldSpec {
    /// Key used in the form state JSON and in element ids.
    pub key: &'static str,
    pub column: &'static str,
    pub label: &'static str,
    /// Prefix of the live readout under the slider.
    pub readout: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    pub integer: bool,
    /// Fraction fields are shown with one decimal.
    pub fraction: bool,
}

impl FieldSpec {
    const fn int(
        key: &'static str,
        column: &'static str,
        label: &'static str,
        readout: &'static str,
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        FieldSpec {
            key,
            column,
            label,
            readout,
            min,
            max,
            step,
            default: min,
            integer: true,
            fraction: false,
        }
    }

    const fn real(
        key: &'static str,
        column: &'static str,
        label: &'static str,
        readout: &'static str,
        max: f64,
        step: f64,
    ) -> Self {
        FieldSpec {
            key,
            column,
            label,
            readout,
            min: 0.0,
            max,
            step,
            default: 0.0,
            integer: false,
            fraction: false,
        }
    }

    const fn fraction(
        key: &'static str,
        column: &'static str,
        label: &'static str,
        readout: &'static str,
    ) -> Self {
        FieldSpec {
            fraction: true,
            ..Self::real(key, column, label, readout, 1.0, 0.1)
        }
    }

    /// Live readout text, e.g. `"Selected Age: 27"`.
    pub fn display(&self, value: f64) -> String {
        if self.fraction {
            format!("{}: {:.1}", self.readout, value)
        } else {
            format!("{}: {}", self.readout, value)
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && (self.min..=self.max).contains(&value)
    }
}

/// The sixteen numeric inputs, in training column order (the team column is
/// the only one missing).
pub const FIELDS: [FieldSpec; 16] = [
    FieldSpec::int("season", "Season", "Season:", "Selected Season", 1990.0, 2030.0, 1.0),
    FieldSpec::int("age", "Age", "Player's Age:", "Selected Age", 18.0, 50.0, 1.0),
    FieldSpec::int("games_started", "GS", "Games Started:", "Selected Games Started", 0.0, 83.0, 1.0),
    FieldSpec::int("field_goals_made", "FG", "Field Goals Made:", "Selected Field Goals Made", 0.0, 830.0, 50.0),
    FieldSpec::int("field_goal_attempts", "FGA", "Field Goal Attempts:", "Selected Field Goal Attempts", 0.0, 1724.0, 100.0),
    FieldSpec::fraction("effective_field_goal_pct", "eFG%", "Effective Field Goal Percentage:", "Selected Effective Field Goal %"),
    FieldSpec::real("weighted_efficiency", "WEFF", "Weighted Efficiency:", "Selected Weighted Efficiency", 72.0, 5.0),
    FieldSpec::real("points_per_game", "PPG", "Points Per Game:", "Selected Points Per Game", 31.0, 1.0),
    FieldSpec::real("rebounds_per_game", "RPG", "Rebounds Per Game:", "Selected Rebounds Per Game", 16.0, 0.1),
    FieldSpec::real("turnovers_per_game", "TPG", "Turnovers Per Game:", "Selected Turnovers Per Game", 6.0, 0.1),
    FieldSpec::real("assists_per_game", "APG", "Assists Per Game:", "Selected Assists Per Game", 13.0, 0.1),
    FieldSpec::fraction("shooting_efficiency", "ShootingEfficiency", "Shooting Efficiency:", "Selected Shooting Efficiency"),
    FieldSpec::real("offensive_contribution", "OffensiveContribution", "Offensive Contribution:", "Selected Offensive Contribution", 3042.0, 100.0),
    FieldSpec::real("defensive_contribution", "DefensiveContribution", "Defensive Contribution:", "Selected Defensive Contribution", 973.0, 50.0),
    FieldSpec::fraction("games_started_pct", "GS%", "Games Started Percentage:", "Selected GS Percentage"),
    FieldSpec::real("minutes_per_game", "MPG", "Minutes Played Per Game:", "Selected Minutes Per Game", 44.0, 0.1),
];

/// Rejections at the HTTP input boundary.
#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfDomain {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("unknown team code '{0}'")]
    UnknownTeam(String),
}

/// Current value of every input in one user's form.
///
/// Missing keys in incoming JSON take the same defaults the form starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormState {
    pub team: String,
    pub season: u32,
    pub age: u32,
    pub games_started: u32,
    pub field_goals_made: u32,
    pub field_goal_attempts: u32,
    pub effective_field_goal_pct: f64,
    pub weighted_efficiency: f64,
    pub points_per_game: f64,
    pub rebounds_per_game: f64,
    pub turnovers_per_game: f64,
    pub assists_per_game: f64,
    pub shooting_efficiency: f64,
    pub offensive_contribution: f64,
    pub defensive_contribution: f64,
    pub games_started_pct: f64,
    pub minutes_per_game: f64,
}

impl Default for FormState {
    fn default() -> Self {
        FormState {
            team: DEFAULT_TEAM.to_string(),
            season: 1990,
            age: 18,
            games_started: 0,
            field_goals_made: 0,
            field_goal_attempts: 0,
            effective_field_goal_pct: 0.0,
            weighted_efficiency: 0.0,
            points_per_game: 0.0,
            rebounds_per_game: 0.0,
            turnovers_per_game: 0.0,
            assists_per_game: 0.0,
            shooting_efficiency: 0.0,
            offensive_contribution: 0.0,
            defensive_contribution: 0.0,
            games_started_pct: 0.0,
            minutes_per_game: 0.0,
        }
    }
}

impl FormState {
    /// Numeric inputs in [`FIELDS`] order.
    pub fn numeric_values(&self) -> [f64; 16] {
        [
            self.season as f64,
            self.age as f64,
            self.games_started as f64,
            self.field_goals_made as f64,
            self.field_goal_attempts as f64,
            self.effective_field_goal_pct,
            self.weighted_efficiency,
            self.points_per_game,
            self.rebounds_per_game,
            self.turnovers_per_game,
            self.assists_per_game,
            self.shooting_efficiency,
            self.offensive_contribution,
            self.defensive_contribution,
            self.games_started_pct,
            self.minutes_per_game,
        ]
    }

    /// Enforce what the sliders and dropdown enforce in the browser.
    pub fn check_domains(&self) -> Result<(), FormError> {
        if !TeamDirectory::global().contains(&self.team) {
            return Err(FormError::UnknownTeam(self.team.clone()));
        }
        for (spec, value) in FIELDS.iter().zip(self.numeric_values()) {
            if !spec.contains(value) {
                return Err(FormError::OutOfDomain {
                    field: spec.key,
                    value,
                    min: spec.min,
                    max: spec.max,
                });
            }
        }
        Ok(())
    }
}

/// One cell of a feature record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue<'a> {
    Number(f64),
    Category(&'a str),
}

/// The fixed-schema row handed to a scorer.
///
/// Field declaration order is the training column order; serde emits JSON keys
/// in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerFeatureRecord {
    #[serde(rename = "Season")]
    pub season: u32,
    #[serde(rename = "Tm")]
    pub team: String,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "GS")]
    pub games_started: u32,
    #[serde(rename = "FG")]
    pub field_goals_made: u32,
    #[serde(rename = "FGA")]
    pub field_goal_attempts: u32,
    #[serde(rename = "eFG%")]
    pub effective_field_goal_pct: f64,
    #[serde(rename = "WEFF")]
    pub weighted_efficiency: f64,
    #[serde(rename = "PPG")]
    pub points_per_game: f64,
    #[serde(rename = "RPG")]
    pub rebounds_per_game: f64,
    #[serde(rename = "TPG")]
    pub turnovers_per_game: f64,
    #[serde(rename = "APG")]
    pub assists_per_game: f64,
    #[serde(rename = "ShootingEfficiency")]
    pub shooting_efficiency: f64,
    #[serde(rename = "OffensiveContribution")]
    pub offensive_contribution: f64,
    #[serde(rename = "DefensiveContribution")]
    pub defensive_contribution: f64,
    #[serde(rename = "GS%")]
    pub games_started_pct: f64,
    #[serde(rename = "MPG")]
    pub minutes_per_game: f64,
}

impl PlayerFeatureRecord {
    /// Build a record from the form. No bounds are re-checked here.
    pub fn from_form(form: &FormState) -> Self {
        PlayerFeatureRecord {
            season: form.season,
            team: form.team.clone(),
            age: form.age,
            games_started: form.games_started,
            field_goals_made: form.field_goals_made,
            field_goal_attempts: form.field_goal_attempts,
            effective_field_goal_pct: form.effective_field_goal_pct,
            weighted_efficiency: form.weighted_efficiency,
            points_per_game: form.points_per_game,
            rebounds_per_game: form.rebounds_per_game,
            turnovers_per_game: form.turnovers_per_game,
            assists_per_game: form.assists_per_game,
            shooting_efficiency: form.shooting_efficiency,
            offensive_contribution: form.offensive_contribution,
            defensive_contribution: form.defensive_contribution,
            games_started_pct: form.games_started_pct,
            minutes_per_game: form.minutes_per_game,
        }
    }

    /// `(column, value)` pairs in training order.
    pub fn columns(&self) -> [(&'static str, FeatureValue<'_>); 17] {
        use FeatureValue::{Category, Number};
        [
            (FEATURE_COLUMNS[0], Number(self.season as f64)),
            (FEATURE_COLUMNS[1], Category(&self.team)),
            (FEATURE_COLUMNS[2], Number(self.age as f64)),
            (FEATURE_COLUMNS[3], Number(self.games_started as f64)),
            (FEATURE_COLUMNS[4], Number(self.field_goals_made as f64)),
            (FEATURE_COLUMNS[5], Number(self.field_goal_attempts as f64)),
            (FEATURE_COLUMNS[6], Number(self.effective_field_goal_pct)),
            (FEATURE_COLUMNS[7], Number(self.weighted_efficiency)),
            (FEATURE_COLUMNS[8], Number(self.points_per_game)),
            (FEATURE_COLUMNS[9], Number(self.rebounds_per_game)),
            (FEATURE_COLUMNS[10], Number(self.turnovers_per_game)),
            (FEATURE_COLUMNS[11], Number(self.assists_per_game)),
            (FEATURE_COLUMNS[12], Number(self.shooting_efficiency)),
            (FEATURE_COLUMNS[13], Number(self.offensive_contribution)),
            (FEATURE_COLUMNS[14], Number(self.defensive_contribution)),
            (FEATURE_COLUMNS[15], Number(self.games_started_pct)),
            (FEATURE_COLUMNS[16], Number(self.minutes_per_game)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEAM_COLUMN: &str = "Tm";

    fn field(key: &str) -> Option<&'static FieldSpec> {
        FIELDS.iter().find(|f| f.key == key)
    }

    fn sample_form() -> FormState {
        FormState {
            team: "BOS".to_string(),
            season: 2019,
            age: 27,
            games_started: 70,
            field_goals_made: 650,
            field_goal_attempts: 1300,
            effective_field_goal_pct: 0.55,
            weighted_efficiency: 25.0,
            points_per_game: 24.0,
            rebounds_per_game: 7.2,
            turnovers_per_game: 2.8,
            assists_per_game: 5.1,
            shooting_efficiency: 0.52,
            offensive_contribution: 2400.0,
            defensive_contribution: 480.0,
            games_started_pct: 0.9,
            minutes_per_game: 34.5,
        }
    }

    #[test]
    fn fields_follow_training_order_without_team() {
        let numeric: Vec<&str> = FEATURE_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != TEAM_COLUMN)
            .collect();
        let specs: Vec<&str> = FIELDS.iter().map(|f| f.column).collect();
        assert_eq!(numeric, specs);
    }

    #[test]
    fn record_columns_match_training_order() {
        let record = PlayerFeatureRecord::from_form(&sample_form());
        let names: Vec<&str> = record.columns().iter().map(|(c, _)| *c).collect();
        assert_eq!(names, FEATURE_COLUMNS);

        let cols = record.columns();
        assert_eq!(cols[0].1, FeatureValue::Number(2019.0));
        assert_eq!(cols[1].1, FeatureValue::Category("BOS"));
        assert_eq!(cols[16].1, FeatureValue::Number(34.5));
    }

    #[test]
    fn record_json_keys_are_in_training_order() {
        let record = PlayerFeatureRecord::from_form(&sample_form());
        let json = serde_json::to_string(&record).unwrap();

        let positions: Vec<usize> = FEATURE_COLUMNS
            .iter()
            .map(|c| json.find(&format!("\"{c}\":")).expect("column present"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    }

    #[test]
    fn default_form_builds_a_record() {
        let form = FormState::default();
        assert!(form.check_domains().is_ok());

        let record = PlayerFeatureRecord::from_form(&form);
        assert_eq!(record.team, "LAL");
        assert_eq!(record.season, 1990);
        assert_eq!(record.age, 18);
        for (spec, value) in FIELDS.iter().zip(form.numeric_values()) {
            assert_eq!(spec.default, value, "{}", spec.key);
        }
    }

    #[test]
    fn missing_json_keys_take_defaults() {
        let form: FormState = serde_json::from_str(r#"{"age": 30, "team": "MIA"}"#).unwrap();
        assert_eq!(form.age, 30);
        assert_eq!(form.team, "MIA");
        assert_eq!(form.season, 1990);
        assert_eq!(form.minutes_per_game, 0.0);
    }

    #[test]
    fn builder_does_not_recheck_bounds() {
        let mut form = sample_form();
        form.age = 99;
        let record = PlayerFeatureRecord::from_form(&form);
        assert_eq!(record.age, 99);
    }

    #[test]
    fn every_field_at_its_maximum_is_in_domain() {
        let form = FormState {
            team: "CHO".to_string(),
            season: 2030,
            age: 50,
            games_started: 83,
            field_goals_made: 830,
            field_goal_attempts: 1724,
            effective_field_goal_pct: 1.0,
            weighted_efficiency: 72.0,
            points_per_game: 31.0,
            rebounds_per_game: 16.0,
            turnovers_per_game: 6.0,
            assists_per_game: 13.0,
            shooting_efficiency: 1.0,
            offensive_contribution: 3042.0,
            defensive_contribution: 973.0,
            games_started_pct: 1.0,
            minutes_per_game: 44.0,
        };
        for (spec, value) in FIELDS.iter().zip(form.numeric_values()) {
            assert_eq!(value, spec.max, "{} not at max", spec.key);
        }
        assert_eq!(form.check_domains(), Ok(()));

        let record = PlayerFeatureRecord::from_form(&form);
        let cols = record.columns();
        let names: Vec<&str> = cols.iter().map(|(c, _)| *c).collect();
        assert_eq!(names, FEATURE_COLUMNS);
        assert_eq!(cols[1].1, FeatureValue::Category("CHO"));

        let numeric = cols
            .iter()
            .filter(|(c, _)| *c != TEAM_COLUMN)
            .map(|(_, v)| *v);
        for (spec, value) in FIELDS.iter().zip(numeric) {
            assert_eq!(value, FeatureValue::Number(spec.max), "{}", spec.column);
        }
    }

    #[test]
    fn domain_check_rejects_out_of_range_and_unknown_team() {
        let mut form = sample_form();
        form.games_started_pct = 1.2;
        assert_eq!(
            form.check_domains(),
            Err(FormError::OutOfDomain {
                field: "games_started_pct",
                value: 1.2,
                min: 0.0,
                max: 1.0,
            })
        );

        let mut form = sample_form();
        form.minutes_per_game = f64::NAN;
        assert!(form.check_domains().is_err());

        let mut form = sample_form();
        form.team = "ZZZ".to_string();
        assert_eq!(
            form.check_domains(),
            Err(FormError::UnknownTeam("ZZZ".to_string()))
        );
    }

    #[test]
    fn readouts_use_one_decimal_for_fractions() {
        assert_eq!(field("season").unwrap().display(2001.0), "Selected Season: 2001");
        assert_eq!(
            field("effective_field_goal_pct").unwrap().display(0.5),
            "Selected Effective Field Goal %: 0.5"
        );
        assert_eq!(
            field("games_started_pct").unwrap().display(1.0),
            "Selected GS Percentage: 1.0"
        );
        assert_eq!(
            field("rebounds_per_game").unwrap().display(7.3),
            "Selected Rebounds Per Game: 7.3"
        );
        assert!(field("team").is_none());
    }
}
