// Football roster positions and their board abbreviations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Positions tracked for roster needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
}

impl Position {
    /// Parse a position string into a Position enum.
    ///
    /// Handles the abbreviations draft boards use:
    /// - "K" and "PK" -> Kicker
    /// - "DST", "D/ST" and "DEF" -> Defense
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            "K" | "PK" => Some(Position::Kicker),
            "DST" | "D/ST" | "DEF" => Some(Position::Defense),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "DST",
        }
    }

    /// Long-form name, used in needs summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Position::Quarterback => "quarterback",
            Position::RunningBack => "running back",
            Position::WideReceiver => "wide receiver",
            Position::TightEnd => "tight end",
            Position::Kicker => "kicker",
            Position::Defense => "team defense",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}
