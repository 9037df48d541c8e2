// Roster needs for one draft team: positional buckets compared against the
// starting lineup requirements.

use crate::draft::position::Position;
use crate::draft::state::DraftState;

/// Starters required per position.
pub const STARTING_REQUIREMENTS: [(Position, usize); 6] = [
    (Position::Quarterback, 1),
    (Position::RunningBack, 2),
    (Position::WideReceiver, 2),
    (Position::TightEnd, 1),
    (Position::Kicker, 1),
    (Position::Defense, 1),
];

/// Positions worth stacking once every starter is in place.
const DEPTH_POSITIONS: [Position; 4] = [
    Position::RunningBack,
    Position::WideReceiver,
    Position::Quarterback,
    Position::TightEnd,
];

/// Players drafted at one position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionBucket {
    pub position: Position,
    pub required: usize,
    pub players: Vec<String>,
}

impl PositionBucket {
    /// Starters still missing at this position.
    pub fn shortfall(&self) -> usize {
        self.required.saturating_sub(self.players.len())
    }
}

/// Derived roster view for one team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamNeeds {
    pub team_id: u32,
    /// One bucket per position, in display order.
    pub buckets: Vec<PositionBucket>,
    /// Picks whose position is unknown or unrecognised.
    pub unassigned: Vec<String>,
}

/// Bucket a team's picks by position and compare against the requirements.
///
/// Forced picks count like any other pick: they carry an explicit position.
pub fn analyze_team_needs(state: &DraftState, team_id: u32) -> TeamNeeds {
    let mut buckets: Vec<PositionBucket> = STARTING_REQUIREMENTS
        .iter()
        .map(|&(position, required)| PositionBucket {
            position,
            required,
            players: Vec::new(),
        })
        .collect();
    let mut unassigned = Vec::new();

    for pick in state.picks_for_team(team_id) {
        match pick.position() {
            Some(pos) => {
                if let Some(bucket) = buckets.iter_mut().find(|b| b.position == pos) {
                    bucket.players.push(pick.player_name.clone());
                }
            }
            None => unassigned.push(pick.player_name.clone()),
        }
    }

    TeamNeeds {
        team_id,
        buckets,
        unassigned,
    }
}

impl TeamNeeds {
    pub fn bucket(&self, position: Position) -> Option<&PositionBucket> {
        self.buckets.iter().find(|b| b.position == position)
    }

    /// Positions still short of their starting requirement, with the count missing.
    pub fn deficiencies(&self) -> Vec<(Position, usize)> {
        self.buckets
            .iter()
            .filter(|b| b.shortfall() > 0)
            .map(|b| (b.position, b.shortfall()))
            .collect()
    }

    pub fn starters_filled(&self) -> bool {
        self.buckets.iter().all(|b| b.shortfall() == 0)
    }

    /// Whether drafting a player at `position` would fill a missing starter.
    pub fn fills_need(&self, position: Position) -> bool {
        self.bucket(position).is_some_and(|b| b.shortfall() > 0)
    }

    /// One line per position, e.g. `RB (1/2): Bijan Robinson` or `TE (0/1): EMPTY`.
    pub fn roster_breakdown(&self) -> String {
        let mut lines: Vec<String> = self
            .buckets
            .iter()
            .map(|b| {
                let players = if b.players.is_empty() {
                    "EMPTY".to_string()
                } else {
                    b.players.join(", ")
                };
                format!(
                    "{} ({}/{}): {}",
                    b.position.display_str(),
                    b.players.len(),
                    b.required,
                    players
                )
            })
            .collect();
        if !self.unassigned.is_empty() {
            lines.push(format!("Other: {}", self.unassigned.join(", ")));
        }
        lines.join("\n")
    }

    /// Deficiency summary, or a depth suggestion once every starter is drafted.
    pub fn summary(&self) -> String {
        let missing = self.deficiencies();
        if missing.is_empty() {
            return format!(
                "All starting spots filled. Build depth at {}.",
                self.depth_targets()
                    .iter()
                    .map(|p| p.display_str())
                    .collect::<Vec<_>>()
                    .join(" and ")
            );
        }
        let parts: Vec<String> = missing
            .iter()
            .map(|(pos, n)| {
                if *n == 1 {
                    format!("{} ({})", pos.display_str(), pos.label())
                } else {
                    format!("{} x{} ({}s)", pos.display_str(), n, pos.label())
                }
            })
            .collect();
        format!("Still need: {}", parts.join(", "))
    }

    /// The two depth positions with the thinnest cover beyond their starters.
    fn depth_targets(&self) -> Vec<Position> {
        let mut ranked: Vec<(usize, Position)> = DEPTH_POSITIONS
            .iter()
            .filter_map(|&pos| {
                self.bucket(pos)
                    .map(|b| (b.players.len().saturating_sub(b.required), pos))
            })
            .collect();
        // Stable sort keeps RB/WR ahead on ties.
        ranked.sort_by_key(|(extra, _)| *extra);
        ranked.into_iter().take(2).map(|(_, pos)| pos).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::pick::NewPick;
    use crate::draft::state::{DraftSettings, DraftState};

    fn add(state: &mut DraftState, name: &str, position: &str, team_id: u32) {
        state.record_pick(NewPick {
            player_name: name.to_string(),
            position: position.to_string(),
            pro_team: None,
            team_id,
            forced: false,
        });
    }

    fn full_lineup(state: &mut DraftState) {
        for (name, pos) in [
            ("QB One", "QB"),
            ("RB One", "RB"),
            ("RB Two", "RB"),
            ("WR One", "WR"),
            ("WR Two", "WR"),
            ("TE One", "TE"),
            ("K One", "K"),
            ("DST One", "DST"),
        ] {
            add(state, name, pos, 1);
        }
    }

    #[test]
    fn empty_team_needs_everything() {
        let state = DraftState::new(&DraftSettings::new(10));
        let needs = analyze_team_needs(&state, 1);
        assert_eq!(
            needs.deficiencies(),
            vec![
                (Position::Quarterback, 1),
                (Position::RunningBack, 2),
                (Position::WideReceiver, 2),
                (Position::TightEnd, 1),
                (Position::Kicker, 1),
                (Position::Defense, 1),
            ]
        );
        assert!(needs.roster_breakdown().contains("TE (0/1): EMPTY"));
    }

    #[test]
    fn only_the_requested_team_is_counted() {
        let mut state = DraftState::new(&DraftSettings::new(10));
        add(&mut state, "Christian McCaffrey", "RB", 1);
        add(&mut state, "Bijan Robinson", "RB", 2);
        let needs = analyze_team_needs(&state, 1);
        let rb = needs.bucket(Position::RunningBack).unwrap();
        assert_eq!(rb.players, vec!["Christian McCaffrey"]);
        assert_eq!(rb.shortfall(), 1);
        assert!(needs.fills_need(Position::RunningBack));
        assert!(needs
            .roster_breakdown()
            .contains("RB (1/2): Christian McCaffrey"));
    }

    #[test]
    fn summary_lists_shortfalls() {
        let mut state = DraftState::new(&DraftSettings::new(10));
        add(&mut state, "Josh Allen", "QB", 1);
        add(&mut state, "CeeDee Lamb", "WR", 1);
        let needs = analyze_team_needs(&state, 1);
        assert_eq!(
            needs.summary(),
            "Still need: RB x2 (running backs), WR (wide receiver), TE (tight end), \
             K (kicker), DST (team defense)"
        );
    }

    #[test]
    fn full_lineup_suggests_depth() {
        let mut state = DraftState::new(&DraftSettings::new(10));
        full_lineup(&mut state);
        let needs = analyze_team_needs(&state, 1);
        assert!(needs.starters_filled());
        assert!(needs.deficiencies().is_empty());
        assert_eq!(needs.summary(), "All starting spots filled. Build depth at RB and WR.");
    }

    #[test]
    fn depth_prefers_thinnest_position() {
        let mut state = DraftState::new(&DraftSettings::new(10));
        full_lineup(&mut state);
        add(&mut state, "RB Three", "RB", 1);
        add(&mut state, "WR Three", "WR", 1);
        let needs = analyze_team_needs(&state, 1);
        assert_eq!(needs.summary(), "All starting spots filled. Build depth at QB and TE.");
    }

    #[test]
    fn unknown_positions_are_listed_separately() {
        let mut state = DraftState::new(&DraftSettings::new(10));
        add(&mut state, "Mystery Man", "", 1);
        let needs = analyze_team_needs(&state, 1);
        assert_eq!(needs.unassigned, vec!["Mystery Man"]);
        assert!(needs.roster_breakdown().ends_with("Other: Mystery Man"));
    }

    #[test]
    fn forced_picks_count_toward_buckets() {
        let mut state = DraftState::new(&DraftSettings::new(10));
        state.record_pick(NewPick {
            player_name: "Rookie Kicker".into(),
            position: "K".into(),
            pro_team: Some("NYJ".into()),
            team_id: 1,
            forced: true,
        });
        let needs = analyze_team_needs(&state, 1);
        assert!(!needs.fills_need(Position::Kicker));
    }
}
