// Handlers that change the draft: single picks, team selection, reset and
// board import.

use regex::Captures;
use tracing::info;

use super::{capture, CommandContext, Response, HELP_TEXT};
use crate::draft::pick::NewPick;
use crate::draft::position::Position;
use crate::draft::snake::format_round_pick;
use crate::draft::state::{DraftState, MAX_TEAM_NUMBER};
use crate::error::DraftError;
use crate::import::{import_board, parse_board};
use crate::players::resolver::resolve_player;

const FORCE_USAGE: &str = "Usage: .force <player> <POS> <TEAM> [t<N>], e.g. .force Rookie Guy WR NYJ";

// ---------------------------------------------------------------------------
// Single picks
// ---------------------------------------------------------------------------

/// `.my <player>`
pub(super) fn my_pick(
    state: &mut DraftState,
    caps: &Captures<'_>,
    ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    let team_id = state.my_team_id();
    record_resolved(state, ctx, capture(caps, 1), team_id)
}

/// `.p <player> t<N>`
pub(super) fn team_pick(
    state: &mut DraftState,
    caps: &Captures<'_>,
    ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    let team_id = team_number(state, capture(caps, 2))?;
    record_resolved(state, ctx, capture(caps, 1), team_id)
}

/// `.<N> <player>`, shorthand for `.p <player> t<N>`.
pub(super) fn team_shorthand(
    state: &mut DraftState,
    caps: &Captures<'_>,
    ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    let team_id = team_number(state, capture(caps, 1))?;
    record_resolved(state, ctx, capture(caps, 2), team_id)
}

/// `.force <player> <POS> <TEAM> [t<N>]`: recorded verbatim, no player lookup.
/// The pick goes to the caller's team unless a `t<N>` suffix names another.
pub(super) fn forced_pick(
    state: &mut DraftState,
    caps: &Captures<'_>,
    _ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    let mut tokens: Vec<&str> = capture(caps, 1).split_whitespace().collect();

    let mut team_id = state.my_team_id();
    if let Some(&last) = tokens.last() {
        let digits = last
            .strip_prefix(['t', 'T'])
            .filter(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()));
        if let Some(n) = digits {
            team_id = team_number(state, n)?;
            tokens.pop();
        }
    }

    let (Some(pro_team), Some(position)) = (tokens.pop(), tokens.pop()) else {
        return Err(DraftError::format(FORCE_USAGE));
    };
    let is_code = |s: &str| s.chars().all(|c| c.is_ascii_alphabetic());
    let is_position = position.chars().all(|c| c.is_ascii_alphabetic() || c == '/');
    if tokens.is_empty() || !is_position || !is_code(pro_team) {
        return Err(DraftError::format(FORCE_USAGE));
    }
    // Codes outside the six categories are kept as typed.
    let position = match Position::from_str_pos(position) {
        Some(known) => known.display_str().to_string(),
        None => position.to_uppercase(),
    };
    let player_name = tokens.join(" ");
    ensure_not_drafted(state, &player_name)?;

    let new_pick = NewPick {
        player_name,
        position,
        pro_team: Some(pro_team.to_uppercase()),
        team_id,
        forced: true,
    };
    let confirmation = confirm(state, new_pick);
    Ok(Response::Message(format!(
        "{confirmation}\nNot in the player list; recorded as entered."
    )))
}

fn record_resolved(
    state: &mut DraftState,
    ctx: &CommandContext<'_>,
    player_text: &str,
    team_id: u32,
) -> Result<Response, DraftError> {
    let resolution = resolve_player(ctx.players, player_text)?;
    let record = resolution.record;
    ensure_not_drafted(state, &record.name)?;

    let new_pick = NewPick {
        player_name: record.name.clone(),
        position: record.position.clone(),
        pro_team: Some(record.pro_team.clone()).filter(|t| !t.is_empty()),
        team_id,
        forced: false,
    };

    let mut lines = Vec::new();
    if let Some(note) = resolution.correction_note() {
        lines.push(note);
    }
    lines.push(confirm(state, new_pick));
    if let Some(enrichment) = record.enrichment() {
        lines.push(enrichment);
    }
    Ok(Response::Message(lines.join("\n")))
}

/// Record the pick and describe it along with the new pointer.
fn confirm(state: &mut DraftState, new_pick: NewPick) -> String {
    let league_size = state.league_size();
    let team_id = new_pick.team_id;
    let description = state.record_pick(new_pick).describe(league_size);
    let next = state.next_pick();
    format!(
        "Recorded {} for {}.\nNext pick: #{} ({})",
        description,
        state.team_display(team_id),
        next,
        format_round_pick(next, league_size)
    )
}

fn ensure_not_drafted(state: &DraftState, player_name: &str) -> Result<(), DraftError> {
    match state.drafted_pick(player_name) {
        Some(existing) => Err(DraftError::validation(format!(
            "{} was already drafted at pick #{} by {}.",
            existing.player_name,
            existing.pick_number,
            state.team_display(existing.team_id)
        ))),
        None => Ok(()),
    }
}

/// A team number from `t<N>` or `.<N>`, bounded by the league size, resolved
/// through the team identity map so it is remembered as "Team N".
fn team_number(state: &mut DraftState, digits: &str) -> Result<u32, DraftError> {
    let league_size = state.league_size();
    match digits.parse::<u32>() {
        Ok(n) if (1..=league_size).contains(&n) => Ok(state.resolve_team(&format!("Team {n}"))),
        _ => Err(DraftError::validation(format!(
            "Team numbers run 1 to {league_size}."
        ))),
    }
}

// ---------------------------------------------------------------------------
// Team and reset
// ---------------------------------------------------------------------------

/// `.team <N>`
pub(super) fn set_team(
    state: &mut DraftState,
    caps: &Captures<'_>,
    _ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    let arg = capture(caps, 1);
    let team_id = match arg.parse::<u32>() {
        Ok(n) if (1..=MAX_TEAM_NUMBER).contains(&n) => n,
        _ => {
            return Err(DraftError::validation(format!(
                "Usage: .team <N> with N from 1 to {MAX_TEAM_NUMBER}."
            )))
        }
    };
    state.set_my_team(team_id);
    info!("Caller's team set to {}", team_id);

    let mut reply = format!("You are now Team {team_id}.");
    if let Some(turn) = state.my_next_turn() {
        reply.push_str(&format!(
            " Your next turn: #{} ({}).",
            turn,
            format_round_pick(turn, state.league_size())
        ));
    }
    Ok(Response::Message(reply))
}

/// `.clear`
pub(super) fn clear(
    state: &mut DraftState,
    _caps: &Captures<'_>,
    ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    let discarded = state.picks.len();
    *state = DraftState::new(ctx.settings);
    info!("Draft state reset ({} picks discarded)", discarded);
    Ok(Response::Message(format!(
        "Draft cleared ({discarded} picks discarded). Next pick: #1 (Round 1, Pick 1)"
    )))
}

// ---------------------------------------------------------------------------
// Board import
// ---------------------------------------------------------------------------

/// `.import <board>`
pub(super) fn import(
    state: &mut DraftState,
    caps: &Captures<'_>,
    ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    let report = import_board(
        state,
        ctx.players,
        capture(caps, 1),
        ctx.settings.import_line_limit,
    )?;
    Ok(Response::Message(report.render(state)))
}

/// `.<board>`: a pasted board behind a bare dot. A single line that reads as
/// no board entry is an unknown command.
pub(super) fn board(
    state: &mut DraftState,
    caps: &Captures<'_>,
    ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    let text = capture(caps, 1);
    if !text.contains('\n') && parse_board(text, state.league_size()).entries.is_empty() {
        return Err(DraftError::format(format!(
            "Unrecognised command '.{text}'.\n{HELP_TEXT}"
        )));
    }
    import(state, caps, ctx)
}
