// Read-only player reference data.
//
// Loaded once from a CSV (`Name,Position,Team,ADP,Points,Injury`) or a JSON
// array of records. Extra CSV columns are ignored; malformed rows are skipped.

pub mod resolver;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::draft::position::Position;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One player in the reference dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub position: String,
    pub pro_team: String,
    /// Average draft position.
    #[serde(default)]
    pub adp: Option<f64>,
    #[serde(default)]
    pub projected_points: Option<f64>,
    #[serde(default)]
    pub injury_status: Option<String>,
}

impl PlayerRecord {
    /// Enrichment line shown after a successful pick, e.g.
    /// `ADP 4.5 | 312.0 proj pts | Injury: Q`. `None` without any data.
    pub fn enrichment(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(adp) = self.adp {
            parts.push(format!("ADP {adp:.1}"));
        }
        if let Some(points) = self.projected_points {
            parts.push(format!("{points:.1} proj pts"));
        }
        if let Some(injury) = self.injury_status.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("Injury: {injury}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }
}

/// The reference dataset.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    players: Vec<PlayerRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum PlayerDataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported player data format: {path} (expected .csv or .json)")]
    UnsupportedFormat { path: String },
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerRow {
    #[serde(alias = "Player")]
    Name: String,
    #[serde(alias = "Pos")]
    Position: String,
    #[serde(default, alias = "Tm")]
    Team: String,
    #[serde(default)]
    ADP: Option<f64>,
    #[serde(default, alias = "FPTS")]
    Points: Option<f64>,
    #[serde(default)]
    Injury: Option<String>,
}

impl PlayerPool {
    pub fn new(players: Vec<PlayerRecord>) -> Self {
        PlayerPool { players }
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Case-insensitive full-name lookup.
    pub fn find_exact(&self, name: &str) -> Option<&PlayerRecord> {
        let wanted = collapse_whitespace(name).to_lowercase();
        self.players
            .iter()
            .find(|p| p.name.to_lowercase() == wanted)
    }

    /// Load from a CSV reader.
    pub fn from_csv_reader<R: Read>(rdr: R) -> Result<Self, PlayerDataError> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
        let mut players = Vec::new();
        for result in reader.deserialize::<RawPlayerRow>() {
            match result {
                Ok(raw) => {
                    let record = PlayerRecord {
                        name: raw.Name,
                        position: raw.Position,
                        pro_team: raw.Team.to_uppercase(),
                        adp: raw.ADP.filter(|v| v.is_finite()),
                        projected_points: raw.Points.filter(|v| v.is_finite()),
                        injury_status: raw.Injury.filter(|s| !s.is_empty()),
                    };
                    if let Some(record) = accept(record) {
                        players.push(record);
                    }
                }
                Err(e) => {
                    warn!("skipping malformed player row: {}", e);
                }
            }
        }
        Ok(PlayerPool::new(players))
    }

    /// Load from a JSON array of [`PlayerRecord`]s.
    pub fn from_json_reader<R: Read>(rdr: R) -> Result<Self, PlayerDataError> {
        let records: Vec<PlayerRecord> = serde_json::from_reader(rdr)?;
        Ok(PlayerPool::new(records.into_iter().filter_map(accept).collect()))
    }

    /// Load from a `.csv` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, PlayerDataError> {
        let file = File::open(path).map_err(|e| PlayerDataError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Self::from_csv_reader(file),
            Some("json") => Self::from_json_reader(file),
            _ => Err(PlayerDataError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// Normalize a record, or drop it when it cannot be used for resolution.
fn accept(mut record: PlayerRecord) -> Option<PlayerRecord> {
    record.name = collapse_whitespace(&record.name);
    if record.name.is_empty() {
        warn!("skipping player row with empty name");
        return None;
    }
    match Position::from_str_pos(&record.position) {
        Some(pos) => record.position = pos.display_str().to_string(),
        None => {
            warn!(
                "skipping player '{}': unrecognised position '{}'",
                record.name, record.position
            );
            return None;
        }
    }
    Some(record)
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
