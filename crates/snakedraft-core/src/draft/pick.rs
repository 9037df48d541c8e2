// Individual pick representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::position::Position;
use super::snake::to_round_and_pick;

/// A single recorded draft pick. Never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    /// Absolute pick number (1-indexed).
    pub pick_number: u32,
    /// Draft team that made the pick.
    pub team_id: u32,
    /// Canonical player name, or the caller's text when unresolved.
    pub player_name: String,
    /// Position abbreviation (e.g. "RB"). Empty when unknown.
    pub position: String,
    /// Pro team abbreviation (e.g. "SF").
    #[serde(default)]
    pub pro_team: Option<String>,
    /// Recorded without validating the player against the reference data.
    #[serde(default)]
    pub forced: bool,
    pub created_at: DateTime<Utc>,
}

impl DraftPick {
    /// Parsed position, if the stored abbreviation is recognised.
    pub fn position(&self) -> Option<Position> {
        Position::from_str_pos(&self.position)
    }

    /// `(round, pick_in_round)` for this pick.
    pub fn round_and_pick(&self, league_size: u32) -> (u32, u32) {
        to_round_and_pick(self.pick_number, league_size)
    }

    /// One-line description, e.g. `#21 (3.05) Josh Allen QB BUF`.
    pub fn describe(&self, league_size: u32) -> String {
        let (round, pick) = self.round_and_pick(league_size);
        let mut out = format!("#{} ({}.{:02}) {}", self.pick_number, round, pick, self.player_name);
        if !self.position.is_empty() {
            out.push(' ');
            out.push_str(&self.position);
        }
        if let Some(team) = &self.pro_team {
            out.push(' ');
            out.push_str(team);
        }
        if self.forced {
            out.push_str(" [unverified]");
        }
        out
    }
}

/// The caller-supplied part of a pick. The state assigns the number and
/// timestamp when it is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPick {
    pub player_name: String,
    pub position: String,
    pub pro_team: Option<String>,
    pub team_id: u32,
    pub forced: bool,
}

impl NewPick {
    pub(crate) fn into_pick(self, pick_number: u32) -> DraftPick {
        DraftPick {
            pick_number,
            team_id: self.team_id,
            player_name: self.player_name,
            position: self.position,
            pro_team: self.pro_team,
            forced: self.forced,
            created_at: Utc::now(),
        }
    }
}
