// Recommendation context for `.who` / `.next`.
//
// Collects everything the recommendation service needs into one value and
// renders it as a compact sectioned prompt. The numbers are pre-computed so
// whatever consumes the prompt only has to weigh trade-offs.

use std::cmp::Ordering;

use crate::draft::pick::DraftPick;
use crate::draft::position::Position;
use crate::draft::snake::format_round_pick;
use crate::draft::state::{DraftSettings, DraftState};
use crate::needs::{analyze_team_needs, TeamNeeds};
use crate::players::{PlayerPool, PlayerRecord};

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// An undrafted reference player.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailablePlayer {
    pub name: String,
    pub position: String,
    pub pro_team: String,
    pub adp: Option<f64>,
    pub projected_points: Option<f64>,
    /// Drafting this player fills a missing starter for the caller.
    pub fills_need: bool,
}

/// Derived context for a recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationContext {
    pub league_size: u32,
    pub next_pick: u32,
    pub my_team_id: u32,
    pub my_next_turn: Option<u32>,
    pub needs: TeamNeeds,
    pub recent_picks: Vec<DraftPick>,
    pub best_available: Vec<AvailablePlayer>,
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build the context from the current state and the reference dataset.
pub fn build_context(
    state: &DraftState,
    players: &PlayerPool,
    settings: &DraftSettings,
) -> RecommendationContext {
    let needs = analyze_team_needs(state, state.my_team_id());
    let best_available = best_available(state, players, &needs, settings.best_available);

    RecommendationContext {
        league_size: state.league_size(),
        next_pick: state.next_pick(),
        my_team_id: state.my_team_id(),
        my_next_turn: state.my_next_turn(),
        recent_picks: state.recent_picks(settings.recent_picks).to_vec(),
        needs,
        best_available,
    }
}

/// Undrafted players by ADP (missing ADP last), then projected points.
fn best_available(
    state: &DraftState,
    players: &PlayerPool,
    needs: &TeamNeeds,
    limit: usize,
) -> Vec<AvailablePlayer> {
    let mut undrafted: Vec<&PlayerRecord> = players
        .players()
        .iter()
        .filter(|p| !state.is_drafted(&p.name))
        .collect();
    undrafted.sort_by(|a, b| compare_adp(a.adp, b.adp).then_with(|| compare_points(a, b)));

    undrafted
        .into_iter()
        .take(limit)
        .map(|p| AvailablePlayer {
            name: p.name.clone(),
            position: p.position.clone(),
            pro_team: p.pro_team.clone(),
            adp: p.adp,
            projected_points: p.projected_points,
            fills_need: Position::from_str_pos(&p.position).is_some_and(|pos| needs.fills_need(pos)),
        })
        .collect()
}

fn compare_adp(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_points(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    let a = a.projected_points.unwrap_or(f64::NEG_INFINITY);
    let b = b.projected_points.unwrap_or(f64::NEG_INFINITY);
    b.total_cmp(&a)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl RecommendationContext {
    /// Sectioned prompt text.
    pub fn render(&self) -> String {
        let mut prompt = String::with_capacity(1024);

        prompt.push_str("## DRAFT POSITION\n");
        prompt.push_str(&format!(
            "On the clock: #{} ({})\n",
            self.next_pick,
            format_round_pick(self.next_pick, self.league_size)
        ));
        match self.my_next_turn {
            Some(turn) if turn == self.next_pick => {
                prompt.push_str(&format!("You are on the clock (Team {}).\n", self.my_team_id));
            }
            Some(turn) => prompt.push_str(&format!(
                "Your next turn: #{} ({}), {} picks away\n",
                turn,
                format_round_pick(turn, self.league_size),
                turn - self.next_pick
            )),
            None => prompt.push_str(&format!(
                "Your next turn: unknown (Team {} is outside a {}-team league)\n",
                self.my_team_id, self.league_size
            )),
        }
        prompt.push('\n');

        prompt.push_str("## MY ROSTER\n");
        prompt.push_str(&self.needs.roster_breakdown());
        prompt.push_str("\n\n## NEEDS\n");
        prompt.push_str(&self.needs.summary());
        prompt.push_str("\n\n");

        if !self.recent_picks.is_empty() {
            prompt.push_str("## RECENT PICKS\n");
            for pick in &self.recent_picks {
                prompt.push_str(&format!(
                    "{} -> Team {}\n",
                    pick.describe(self.league_size),
                    pick.team_id
                ));
            }
            prompt.push('\n');
        }

        prompt.push_str("## BEST AVAILABLE\n");
        if self.best_available.is_empty() {
            prompt.push_str("(no undrafted players in the player list)\n");
        }
        for (i, player) in self.best_available.iter().enumerate() {
            prompt.push_str(&format_available(i + 1, player));
        }

        prompt.trim_end().to_string()
    }
}

fn format_available(rank: usize, player: &AvailablePlayer) -> String {
    let mut line = format!("{}. {} {} {}", rank, player.name, player.position, player.pro_team);
    if let Some(adp) = player.adp {
        line.push_str(&format!(" | ADP {adp:.1}"));
    }
    if let Some(points) = player.projected_points {
        line.push_str(&format!(" | {points:.1} pts"));
    }
    if player.fills_need {
        line.push_str(" | fills need");
    }
    line.push('\n');
    line
}
