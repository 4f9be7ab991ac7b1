//! Static directory of league team codes and franchise names.
//!
//! The table covers every code that appears in the training data, including
//! relocated franchises and the `TOT` sentinel used for players traded
//! mid-season. `CHO` (current) and `CHH` (legacy) both name the Charlotte
//! Hornets; every other name is unique.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Team code and franchise name, in the order the dropdown is built from.
const TEAMS: [(&str, &str); 39] = [
    ("LAL", "Los Angeles Lakers"),
    ("PHO", "Phoenix Suns"),
    ("DAL", "Dallas Mavericks"),
    ("WSB", "Washington Bullets"),
    ("BOS", "Boston Celtics"),
    ("HOU", "Houston Rockets"),
    ("SAC", "Sacramento Kings"),
    ("DEN", "Denver Nuggets"),
    ("CHI", "Chicago Bulls"),
    ("IND", "Indiana Pacers"),
    ("ORL", "Orlando Magic"),
    ("NOH", "New Orleans Hornets"),
    ("TOR", "Toronto Raptors"),
    ("CHO", "Charlotte Hornets"),
    ("POR", "Portland Trail Blazers"),
    ("DET", "Detroit Pistons"),
    ("PHI", "Philadelphia 76ers"),
    ("VAN", "Vancouver Grizzlies"),
    ("SEA", "Seattle SuperSonics"),
    ("WAS", "Washington Wizards"),
    ("NJN", "New Jersey Nets"),
    ("NOK", "New Orleans/Oklahoma City Hornets"),
    ("LAC", "Los Angeles Clippers"),
    ("OKC", "Oklahoma City Thunder"),
    ("MIL", "Milwaukee Bucks"),
    ("ATL", "Atlanta Hawks"),
    ("GSW", "Golden State Warriors"),
    ("CHA", "Charlotte Bobcats"),
    ("UTA", "Utah Jazz"),
    ("MEM", "Memphis Grizzlies"),
    ("MIN", "Minnesota Timberwolves"),
    ("NYK", "New York Knicks"),
    ("NOP", "New Orleans Pelicans"),
    ("BRK", "Brooklyn Nets"),
    ("CLE", "Cleveland Cavaliers"),
    ("MIA", "Miami Heat"),
    ("SAS", "San Antonio Spurs"),
    ("CHH", "Charlotte Hornets"),
    ("TOT", "Multiple Teams"),
];

/// Code preselected in the form.
pub const DEFAULT_TEAM: &str = "LAL";

static DIRECTORY: OnceLock<TeamDirectory> = OnceLock::new();

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamOption {
    pub name: &'static str,
    pub code: &'static str,
}

/// Read-only bidirectional code ↔ name lookup.
#[derive(Debug)]
pub struct TeamDirectory {
    by_code: HashMap<&'static str, &'static str>,
    by_name: HashMap<&'static str, &'static str>,
    options: Vec<TeamOption>,
}

impl TeamDirectory {
    /// The process-wide directory, built on first access.
    pub fn global() -> &'static TeamDirectory {
        DIRECTORY.get_or_init(|| Self::build(&TEAMS))
    }

    fn build(table: &[(&'static str, &'static str)]) -> Self {
        let mut by_code = HashMap::with_capacity(table.len());
        let mut by_name: HashMap<&'static str, &'static str> = HashMap::new();
        let mut order: Vec<&'static str> = Vec::new();

        for &(code, name) in table {
            by_code.insert(code, name);
            // Later codes overwrite earlier ones for a shared name, but the
            // name keeps the slot of its first appearance.
            if by_name.insert(name, code).is_none() {
                order.push(name);
            }
        }

        let options = order
            .into_iter()
            .map(|name| TeamOption {
                name,
                code: by_name[name],
            })
            .collect();

        TeamDirectory {
            by_code,
            by_name,
            options,
        }
    }

    pub fn name_for(&self, code: &str) -> Option<&'static str> {
        self.by_code.get(code).copied()
    }

    /// Reverse lookup; for a shared name the later table entry wins.
    #[allow(dead_code)]
    pub fn code_for(&self, name: &str) -> Option<&'static str> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Dropdown options, one per distinct franchise name.
    pub fn options(&self) -> &[TeamOption] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }
}
