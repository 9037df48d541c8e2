// Draft state: recorded picks, the next-pick pointer and team identities.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::pick::{DraftPick, NewPick};
use super::snake::{next_pick_for_slot, to_round_and_pick};
use super::teams::TeamIdentityMap;
use crate::error::DraftError;

/// Bulk imports longer than this many lines are refused.
pub const DEFAULT_IMPORT_LINE_LIMIT: usize = 20;

/// Highest team number `.team` accepts.
pub const MAX_TEAM_NUMBER: u32 = 12;

/// Per-league settings a draft state is created from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSettings {
    /// Number of teams, i.e. picks per round. Always explicit.
    pub league_size: u32,
    /// The caller's team number at the start of a draft.
    pub my_team_id: u32,
    pub import_line_limit: usize,
    /// Known team labels and the ids they map to.
    pub team_aliases: HashMap<String, u32>,
    /// How many recent picks the recommendation context shows.
    pub recent_picks: usize,
    /// How many available players the recommendation context lists.
    pub best_available: usize,
}

impl DraftSettings {
    pub fn new(league_size: u32) -> Self {
        DraftSettings {
            league_size,
            my_team_id: 1,
            import_line_limit: DEFAULT_IMPORT_LINE_LIMIT,
            team_aliases: HashMap::new(),
            recent_picks: 8,
            best_available: 10,
        }
    }
}

/// The complete state of one draft session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftState {
    /// All recorded picks in insertion order.
    pub picks: Vec<DraftPick>,
    /// Number the next sequential pick receives.
    next_pick: u32,
    my_team_id: u32,
    league_size: u32,
    teams: TeamIdentityMap,
}

impl DraftState {
    /// Create an empty draft from league settings.
    pub fn new(settings: &DraftSettings) -> Self {
        let mut teams = TeamIdentityMap::new(&settings.team_aliases);
        teams.reserve(settings.my_team_id);
        DraftState {
            picks: Vec::new(),
            next_pick: 1,
            my_team_id: settings.my_team_id,
            league_size: settings.league_size,
            teams,
        }
    }

    pub fn next_pick(&self) -> u32 {
        self.next_pick
    }

    /// `(round, pick_in_round)` of the next pick.
    pub fn current_round_pick(&self) -> (u32, u32) {
        to_round_and_pick(self.next_pick, self.league_size)
    }

    pub fn league_size(&self) -> u32 {
        self.league_size
    }

    pub fn my_team_id(&self) -> u32 {
        self.my_team_id
    }

    /// Change the caller's team number. The previous number stays out of
    /// sequential label assignment.
    pub fn set_my_team(&mut self, team_id: u32) {
        self.my_team_id = team_id;
        self.teams.reserve(team_id);
    }

    pub fn teams(&self) -> &TeamIdentityMap {
        &self.teams
    }

    /// Resolve a free-text team label through this draft's identity map.
    pub fn resolve_team(&mut self, label: &str) -> u32 {
        self.teams.resolve(label)
    }

    /// Display name for a team id: "your team", the first label seen, or "Team N".
    pub fn team_display(&self, team_id: u32) -> String {
        if team_id == self.my_team_id {
            return format!("your team (Team {team_id})");
        }
        match self.teams.label_for(team_id) {
            Some(label) if !label.eq_ignore_ascii_case(&format!("team {team_id}")) => {
                format!("{label} (Team {team_id})")
            }
            _ => format!("Team {team_id}"),
        }
    }

    /// Record a pick at the next sequential number and advance the pointer.
    pub fn record_pick(&mut self, new_pick: NewPick) -> &DraftPick {
        let number = self.next_pick;
        self.push(new_pick.into_pick(number))
    }

    /// Record a pick at an explicit number (e.g. from round/pick notation on
    /// an imported board). The pointer moves to at least one past it.
    pub fn record_pick_at(
        &mut self,
        new_pick: NewPick,
        pick_number: u32,
    ) -> Result<&DraftPick, DraftError> {
        if pick_number == 0 {
            return Err(DraftError::Validation {
                message: "Pick numbers start at 1.".to_string(),
            });
        }
        if let Some(existing) = self.picks.iter().find(|p| p.pick_number == pick_number) {
            return Err(DraftError::Validation {
                message: format!(
                    "Pick #{} is already recorded ({}).",
                    pick_number, existing.player_name
                ),
            });
        }
        Ok(self.push(new_pick.into_pick(pick_number)))
    }

    fn push(&mut self, pick: DraftPick) -> &DraftPick {
        info!(
            "Recording pick #{}: {} ({}) -> team {}{}",
            pick.pick_number,
            pick.player_name,
            if pick.position.is_empty() { "?" } else { pick.position.as_str() },
            pick.team_id,
            if pick.forced { " [forced]" } else { "" }
        );
        self.next_pick = self.next_pick.max(pick.pick_number + 1);
        self.teams.reserve(pick.team_id);
        self.picks.push(pick);
        &self.picks[self.picks.len() - 1]
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    /// The pick that took a player, matched case-insensitively.
    pub fn drafted_pick(&self, player_name: &str) -> Option<&DraftPick> {
        let wanted = player_name.trim().to_lowercase();
        self.picks
            .iter()
            .find(|p| p.player_name.to_lowercase() == wanted)
    }

    /// Whether a player (case-insensitive) has already been recorded.
    pub fn is_drafted(&self, player_name: &str) -> bool {
        self.drafted_pick(player_name).is_some()
    }

    /// Picks made by one team, in insertion order.
    pub fn picks_for_team(&self, team_id: u32) -> Vec<&DraftPick> {
        self.picks.iter().filter(|p| p.team_id == team_id).collect()
    }

    pub fn my_picks(&self) -> Vec<&DraftPick> {
        self.picks_for_team(self.my_team_id)
    }

    /// The last `n` recorded picks.
    pub fn recent_picks(&self, n: usize) -> &[DraftPick] {
        let start = self.picks.len().saturating_sub(n);
        &self.picks[start..]
    }

    /// The caller's next turn in snake order, treating their team number as
    /// their draft seat. `None` when the team number is outside the league.
    pub fn my_next_turn(&self) -> Option<u32> {
        if self.my_team_id == 0 || self.my_team_id > self.league_size {
            return None;
        }
        Some(next_pick_for_slot(
            self.next_pick,
            self.my_team_id,
            self.league_size,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> DraftSettings {
        DraftSettings::new(10)
    }

    fn new_pick(name: &str, position: &str, team_id: u32) -> NewPick {
        NewPick {
            player_name: name.to_string(),
            position: position.to_string(),
            pro_team: None,
            team_id,
            forced: false,
        }
    }

    #[test]
    fn draft_state_creation() {
        let state = DraftState::new(&settings());
        assert!(state.is_empty());
        assert_eq!(state.next_pick(), 1);
        assert_eq!(state.my_team_id(), 1);
        assert_eq!(state.league_size(), 10);
        assert_eq!(state.current_round_pick(), (1, 1));
    }

    #[test]
    fn record_pick_numbers_sequentially() {
        let mut state = DraftState::new(&settings());
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            let pick = state.record_pick(new_pick(name, "RB", 2));
            assert_eq!(pick.pick_number, i as u32 + 1);
        }
        assert_eq!(state.next_pick(), 5);
        let numbers: Vec<u32> = state.picks.iter().map(|p| p.pick_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn record_pick_at_advances_past_gap() {
        let mut state = DraftState::new(&settings());
        state.record_pick(new_pick("A", "QB", 1));
        state
            .record_pick_at(new_pick("B", "WR", 3), 15)
            .unwrap();
        assert_eq!(state.next_pick(), 16);
        assert_eq!(state.current_round_pick(), (2, 6));
    }

    #[test]
    fn record_pick_at_earlier_number_keeps_pointer() {
        let mut state = DraftState::new(&settings());
        for name in ["A", "B", "C"] {
            state.record_pick(new_pick(name, "QB", 1));
        }
        state.record_pick_at(new_pick("Z", "K", 4), 10).unwrap();
        state.record_pick_at(new_pick("Y", "K", 5), 7).unwrap();
        assert_eq!(state.next_pick(), 11);
    }

    #[test]
    fn record_pick_at_rejects_taken_number() {
        let mut state = DraftState::new(&settings());
        state.record_pick(new_pick("A", "QB", 1));
        let err = state.record_pick_at(new_pick("B", "QB", 2), 1).unwrap_err();
        assert!(matches!(err, DraftError::Validation { .. }));
        assert_eq!(state.picks.len(), 1);
        assert_eq!(state.next_pick(), 2);
    }

    #[test]
    fn my_picks_filters_by_team() {
        let mut state = DraftState::new(&settings());
        state.record_pick(new_pick("A", "QB", 1));
        state.record_pick(new_pick("B", "RB", 2));
        state.record_pick(new_pick("C", "WR", 1));
        let mine: Vec<&str> = state.my_picks().iter().map(|p| p.player_name.as_str()).collect();
        assert_eq!(mine, vec!["A", "C"]);
    }

    #[test]
    fn is_drafted_ignores_case() {
        let mut state = DraftState::new(&settings());
        state.record_pick(new_pick("Josh Allen", "QB", 1));
        assert!(state.is_drafted("josh allen"));
        assert!(!state.is_drafted("Keenan Allen"));
    }

    #[test]
    fn drafted_pick_folds_non_ascii_case() {
        let mut state = DraftState::new(&settings());
        state.record_pick(new_pick("Élie Durand", "K", 4));
        let pick = state.drafted_pick("ÉLIE DURAND").unwrap();
        assert_eq!(pick.pick_number, 1);
        assert!(state.is_drafted("élie durand"));
    }

    #[test]
    fn recent_picks_returns_tail() {
        let mut state = DraftState::new(&settings());
        for name in ["A", "B", "C"] {
            state.record_pick(new_pick(name, "TE", 3));
        }
        let recent: Vec<&str> = state.recent_picks(2).iter().map(|p| p.player_name.as_str()).collect();
        assert_eq!(recent, vec!["B", "C"]);
        assert_eq!(state.recent_picks(10).len(), 3);
    }

    #[test]
    fn my_team_id_is_reserved_from_sequential_labels() {
        let mut s = settings();
        s.my_team_id = 1;
        let mut state = DraftState::new(&s);
        assert_eq!(state.resolve_team("Gridiron Gurus"), 2);
    }

    #[test]
    fn former_team_number_is_not_reused_after_switch() {
        let mut state = DraftState::new(&settings());
        state.record_pick(new_pick("Josh Allen", "QB", state.my_team_id()));
        state.set_my_team(5);
        let gurus = state.resolve_team("Gurus");
        assert_ne!(gurus, 1);
        assert_ne!(gurus, 5);
        state.record_pick(new_pick("Christian McCaffrey", "RB", gurus));
        let team_one: Vec<&str> = state
            .picks_for_team(1)
            .iter()
            .map(|p| p.player_name.as_str())
            .collect();
        assert_eq!(team_one, vec!["Josh Allen"]);
    }

    #[test]
    fn ids_owning_picks_are_not_reused() {
        let mut state = DraftState::new(&settings());
        // A pick recorded straight to team 2 without going through a label.
        state.record_pick(new_pick("A", "WR", 2));
        assert_eq!(state.resolve_team("Alpha"), 3);
    }

    #[test]
    fn team_display_variants() {
        let mut state = DraftState::new(&settings());
        let gurus = state.resolve_team("Gridiron Gurus");
        let five = state.resolve_team("Team 5");
        assert_eq!(state.team_display(1), "your team (Team 1)");
        assert_eq!(state.team_display(gurus), format!("Gridiron Gurus (Team {gurus})"));
        assert_eq!(state.team_display(five), "Team 5");
        assert_eq!(state.team_display(9), "Team 9");
    }

    #[test]
    fn my_next_turn_follows_snake_order() {
        let mut s = settings();
        s.my_team_id = 3;
        let mut state = DraftState::new(&s);
        assert_eq!(state.my_next_turn(), Some(3));
        for i in 0..4 {
            state.record_pick(new_pick(&format!("P{i}"), "WR", 9));
        }
        assert_eq!(state.my_next_turn(), Some(18));
    }

    #[test]
    fn my_next_turn_none_outside_league() {
        let mut s = DraftSettings::new(8);
        s.my_team_id = 12;
        let state = DraftState::new(&s);
        assert_eq!(state.my_next_turn(), None);
    }
}
