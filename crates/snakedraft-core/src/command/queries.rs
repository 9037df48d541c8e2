// Read-only commands.

use regex::Captures;

use super::{CommandContext, Response};
use crate::draft::snake::format_round_pick;
use crate::draft::state::DraftState;
use crate::error::DraftError;
use crate::needs::analyze_team_needs;
use crate::recommend::build_context;

pub const HELP_TEXT: &str = "\
Commands:
  .my <player>                   record a pick for your team
  .p <player> t<N>               record a pick for team N
  .<N> <player>                  same as .p <player> t<N>
  .force <player> <POS> <TEAM>   record a player missing from the player list
  .team <N>                      set your team number (1-12)
  .import <board>                import a pasted draft board (also .<board>)
  .who / .next                   recommendation context for your next pick
  .status / .draft               draft position and your roster
  .clear                         start the draft over";

/// `.help`
pub(super) fn help(
    _state: &mut DraftState,
    _caps: &Captures<'_>,
    _ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    Ok(Response::Message(HELP_TEXT.to_string()))
}

/// `.status` / `.draft`
pub(super) fn status(
    state: &mut DraftState,
    _caps: &Captures<'_>,
    _ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    if state.is_empty() {
        return Err(DraftError::State {
            message: "No picks recorded yet. Record one with .my <player> or paste the \
                      board with .import."
                .to_string(),
        });
    }

    let league_size = state.league_size();
    let next = state.next_pick();
    let mut lines = vec![
        format!("Next pick: #{} ({})", next, format_round_pick(next, league_size)),
        format!("Picks recorded: {}", state.picks.len()),
    ];
    match state.my_next_turn() {
        Some(turn) if turn == next => lines.push("You are on the clock.".to_string()),
        Some(turn) => lines.push(format!(
            "Your next turn: #{} ({})",
            turn,
            format_round_pick(turn, league_size)
        )),
        None => {}
    }

    lines.push(format!("Your picks (Team {}):", state.my_team_id()));
    let mine = state.my_picks();
    if mine.is_empty() {
        lines.push("  (none yet)".to_string());
    }
    for pick in mine {
        lines.push(format!("  {}", pick.describe(league_size)));
    }

    let needs = analyze_team_needs(state, state.my_team_id());
    lines.push(needs.roster_breakdown());
    lines.push(needs.summary());
    Ok(Response::Message(lines.join("\n")))
}

/// `.who` / `.next`
pub(super) fn who(
    state: &mut DraftState,
    _caps: &Captures<'_>,
    ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    if state.is_empty() {
        return Err(DraftError::State {
            message: "The draft has not started. Record the first pick with .my <player> \
                      or .<N> <player>, or paste the board with .import."
                .to_string(),
        });
    }
    Ok(Response::Recommendation(build_context(
        state,
        ctx.players,
        ctx.settings,
    )))
}
