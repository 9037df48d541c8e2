// Bulk import of a pasted draft board.
//
// A board mixes three line groupings without saying which is which:
//
//   single line:  Christian McCaffrey RB SF - Team 3
//   two lines:    Justin Jefferson WR MIN
//                 Round 1, Pick 2 - Gridiron Gurus
//   four lines:   CeeDee Lamb
//                 DAL
//                 WR
//                 Team 4
//
// The scanner tries each grouping at the cursor in that order and advances
// by the width of the first one that matches.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::draft::pick::{DraftPick, NewPick};
use crate::draft::position::Position;
use crate::draft::snake::{format_round_pick, to_absolute_pick};
use crate::draft::state::DraftState;
use crate::error::DraftError;
use crate::players::resolver::resolve_player;
use crate::players::PlayerPool;

/// Unparseable lines echoed back in a report.
pub const MAX_ERROR_LINES_SHOWN: usize = 5;

/// Highest round number accepted in round/pick notation.
const MAX_ROUNDS: u32 = 40;

/// Pro team abbreviations recognised on a board.
const PRO_TEAMS: &[&str] = &[
    "ARI", "ATL", "BAL", "BUF", "CAR", "CHI", "CIN", "CLE", "DAL", "DEN", "DET", "GB", "HOU",
    "IND", "JAC", "JAX", "KC", "LA", "LAC", "LAR", "LV", "MIA", "MIN", "NE", "NO", "NYG", "NYJ",
    "PHI", "PIT", "SEA", "SF", "TB", "TEN", "WAS", "WSH", "FA",
];

/// Separators between a pick and its team label on a single line.
static LABEL_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:\||\t|->|→)\s*|\s+[-–—]\s+").expect("static regex must compile")
});

/// A trailing parenthesised team label: `... (Gridiron Gurus)`.
static TRAILING_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*\S)\s*\(([^()]*)\)$").expect("static regex must compile")
});

/// Round/pick notation, optionally followed by a team label:
/// `Round 3, Pick 5 - Team 4`, `R3 P5 Team 4`, `Rd 3 Pk 5: Team 4`, `3.05 Team 4`.
static SLOT_NOTATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:round|rnd|rd|r)\s*(\d+)\s*[,.:/-]?\s*(?:pick|pk|p)\s*#?\s*(\d+)|(\d{1,2})\.(\d{1,2}))\b\s*(?:[-:|,]\s*)?(.*)$",
    )
    .expect("static regex must compile")
});

// ---------------------------------------------------------------------------
// Line groupings
// ---------------------------------------------------------------------------

/// One pick read off the board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardEntry {
    pub player: String,
    pub position: Position,
    pub pro_team: String,
    pub team_label: String,
    /// Explicit `(round, pick_in_round)`, when the board gave one.
    pub slot: Option<(u32, u32)>,
    /// First board line of the grouping, for error reporting.
    pub source: String,
}

/// Result of matching the lines at the cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum LineGroup {
    SingleLine(BoardEntry),
    TwoLine(BoardEntry),
    FourLine(BoardEntry),
    NoMatch,
}

impl LineGroup {
    /// Lines consumed by this grouping.
    pub fn width(&self) -> usize {
        match self {
            LineGroup::SingleLine(_) => 1,
            LineGroup::TwoLine(_) => 2,
            LineGroup::FourLine(_) => 4,
            LineGroup::NoMatch => 0,
        }
    }

    pub fn into_entry(self) -> Option<BoardEntry> {
        match self {
            LineGroup::SingleLine(e) | LineGroup::TwoLine(e) | LineGroup::FourLine(e) => Some(e),
            LineGroup::NoMatch => None,
        }
    }
}

type Matcher = fn(&[&str], u32) -> Option<LineGroup>;

/// Groupings in the order they are tried.
const MATCHERS: [Matcher; 3] = [match_single_line, match_two_line, match_four_line];

/// Match the grouping starting at `lines[0]`.
pub fn match_group(lines: &[&str], league_size: u32) -> LineGroup {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(lines, league_size))
        .unwrap_or(LineGroup::NoMatch)
}

fn match_single_line(lines: &[&str], league_size: u32) -> Option<LineGroup> {
    let line = *lines.first()?;

    let mut splits: Vec<(&str, &str)> = LABEL_SEPARATOR_RE
        .find_iter(line)
        .map(|m| (&line[..m.start()], &line[m.end()..]))
        .collect();
    if let Some(caps) = TRAILING_LABEL_RE.captures(line) {
        if let (Some(head), Some(label)) = (caps.get(1), caps.get(2)) {
            splits.push((head.as_str(), label.as_str()));
        }
    }

    splits.into_iter().find_map(|(head, label)| {
        let (player, position, pro_team) = parse_head(head)?;
        let (slot, team_label) = parse_label(label, league_size)?;
        Some(LineGroup::SingleLine(BoardEntry {
            player,
            position,
            pro_team,
            team_label,
            slot,
            source: line.to_string(),
        }))
    })
}

fn match_two_line(lines: &[&str], league_size: u32) -> Option<LineGroup> {
    let [first, second, ..] = lines else {
        return None;
    };
    let (player, position, pro_team) = parse_head(first)?;
    let notation = parse_slot_notation(second)?;
    if notation.rest.is_empty() || !slot_in_league(notation.round, notation.pick, league_size) {
        return None;
    }
    Some(LineGroup::TwoLine(BoardEntry {
        player,
        position,
        pro_team,
        team_label: notation.rest,
        slot: Some((notation.round, notation.pick)),
        source: first.to_string(),
    }))
}

fn match_four_line(lines: &[&str], league_size: u32) -> Option<LineGroup> {
    let [name, a, b, label, ..] = lines else {
        return None;
    };
    if !is_player_name_line(name) {
        return None;
    }
    let (pro_team, position) = match (pro_team_code(a), Position::from_str_pos(b)) {
        (Some(team), Some(pos)) => (team, pos),
        _ => match (Position::from_str_pos(a), pro_team_code(b)) {
            (Some(pos), Some(team)) => (team, pos),
            _ => return None,
        },
    };
    if parse_head(label).is_some() {
        return None;
    }
    let (slot, team_label) = parse_label(label, league_size)?;
    Some(LineGroup::FourLine(BoardEntry {
        player: name.trim().to_string(),
        position,
        pro_team,
        team_label,
        slot,
        source: name.to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Line pieces
// ---------------------------------------------------------------------------

struct SlotNotation {
    round: u32,
    pick: u32,
    rest: String,
}

fn parse_slot_notation(line: &str) -> Option<SlotNotation> {
    let caps = SLOT_NOTATION_RE.captures(line.trim())?;
    let (round, pick) = match (caps.get(1), caps.get(2)) {
        (Some(r), Some(p)) => (r, p),
        _ => (caps.get(3)?, caps.get(4)?),
    };
    Some(SlotNotation {
        round: round.as_str().parse().ok()?,
        pick: pick.as_str().parse().ok()?,
        rest: caps.get(5).map_or("", |m| m.as_str()).trim().to_string(),
    })
}

fn slot_in_league(round: u32, pick: u32, league_size: u32) -> bool {
    (1..=MAX_ROUNDS).contains(&round) && pick >= 1 && pick <= league_size
}

/// `player POS TEAM` (or `player TEAM POS`), with commas, parentheses and
/// stray separators ignored.
fn parse_head(text: &str) -> Option<(String, Position, String)> {
    let cleaned: String = text
        .chars()
        .map(|c| if matches!(c, ',' | '(' | ')' | '[' | ']') { ' ' } else { c })
        .collect();
    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .collect();
    if tokens.len() < 3 {
        return None;
    }
    let (a, b) = (tokens[tokens.len() - 2], tokens[tokens.len() - 1]);
    let (position, pro_team) = match (Position::from_str_pos(a), pro_team_code(b)) {
        (Some(pos), Some(team)) => (pos, team),
        _ => match (pro_team_code(a), Position::from_str_pos(b)) {
            (Some(team), Some(pos)) => (pos, team),
            _ => return None,
        },
    };
    let player = tokens[..tokens.len() - 2].join(" ");
    if !player.chars().any(char::is_alphabetic) {
        return None;
    }
    Some((player, position, pro_team))
}

/// A team label, possibly led by round/pick notation.
fn parse_label(text: &str, league_size: u32) -> Option<(Option<(u32, u32)>, String)> {
    let text = text.trim();
    if let Some(notation) = parse_slot_notation(text) {
        if notation.rest.is_empty() || !slot_in_league(notation.round, notation.pick, league_size) {
            return None;
        }
        return Some((Some((notation.round, notation.pick)), notation.rest));
    }
    if text.is_empty() || is_bare_code(text) {
        return None;
    }
    Some((None, text.to_string()))
}

fn pro_team_code(s: &str) -> Option<String> {
    let upper = s.trim().to_uppercase();
    PRO_TEAMS.contains(&upper.as_str()).then_some(upper)
}

fn is_bare_code(line: &str) -> bool {
    Position::from_str_pos(line).is_some() || pro_team_code(line).is_some()
}

fn is_player_name_line(line: &str) -> bool {
    line.chars().any(char::is_alphabetic)
        && !is_bare_code(line)
        && parse_slot_notation(line).is_none()
        && parse_head(line).is_none()
        && match_single_line(&[line], u32::MAX).is_none()
}

/// Lines that belong to a grouping but carry nothing on their own: round/pick
/// notation alone, or a bare position code.
fn is_continuation_fragment(line: &str) -> bool {
    if Position::from_str_pos(line).is_some() {
        return true;
    }
    parse_slot_notation(line).is_some_and(|n| n.rest.is_empty())
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Everything read off a board, before it touches any draft state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBoard {
    pub entries: Vec<BoardEntry>,
    /// Lines no grouping accepted, verbatim.
    pub errors: Vec<String>,
}

/// Scan a board with a cursor, one grouping at a time.
pub fn parse_board(text: &str, league_size: u32) -> ParsedBoard {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut board = ParsedBoard::default();
    let mut cursor = 0;
    while cursor < lines.len() {
        let group = match_group(&lines[cursor..], league_size);
        let width = group.width();
        match group.into_entry() {
            Some(entry) => {
                debug!("Board line {} matched {} line(s): {}", cursor + 1, width, entry.player);
                board.entries.push(entry);
                cursor += width;
            }
            None => {
                let line = lines[cursor];
                if !is_continuation_fragment(line) {
                    warn!("Unparseable board line: {}", line);
                    board.errors.push(line.to_string());
                }
                cursor += 1;
            }
        }
    }
    board
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Outcome of a bulk import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Picks recorded, in board order.
    pub imported: Vec<DraftPick>,
    /// Players skipped because they were already recorded.
    pub already_recorded: Vec<String>,
    /// Lines that could not be imported, verbatim.
    pub errors: Vec<String>,
}

/// Import a pasted board into `state`.
///
/// Boards over `line_limit` lines are refused without touching the state.
/// Blank lines between picks count; blank lines around the paste do not. Unresolvable players keep the board's spelling and are flagged as
/// unverified. Picks with round/pick notation take that number; the rest are
/// numbered sequentially.
pub fn import_board(
    state: &mut DraftState,
    players: &PlayerPool,
    text: &str,
    line_limit: usize,
) -> Result<ImportReport, DraftError> {
    let line_count = text.trim().lines().count();
    if line_count == 0 {
        return Err(DraftError::format(
            "Nothing to import. Paste the board lines after .import",
        ));
    }
    if line_count > line_limit {
        return Err(DraftError::validation(format!(
            "That board has {line_count} lines. Import at most {line_limit} lines at a time; \
             split the paste into smaller batches."
        )));
    }

    let league_size = state.league_size();
    let board = parse_board(text, league_size);
    let mut report = ImportReport {
        errors: board.errors,
        ..ImportReport::default()
    };

    for entry in board.entries {
        let (player_name, forced) = match resolve_player(players, &entry.player) {
            Ok(resolution) => (resolution.record.name.clone(), false),
            Err(e) => {
                debug!("Keeping board spelling for '{}': {}", entry.player, e);
                (entry.player.clone(), true)
            }
        };
        if state.is_drafted(&player_name) {
            report.already_recorded.push(player_name);
            continue;
        }

        let team_id = state.resolve_team(&entry.team_label);
        let new_pick = NewPick {
            player_name,
            position: entry.position.display_str().to_string(),
            pro_team: Some(entry.pro_team.clone()),
            team_id,
            forced,
        };
        let recorded = match entry.slot {
            Some((round, pick)) => {
                match state.record_pick_at(new_pick, to_absolute_pick(round, pick, league_size)) {
                    Ok(pick) => pick.clone(),
                    Err(e) => {
                        report.errors.push(format!("{} ({})", entry.source, e));
                        continue;
                    }
                }
            }
            None => state.record_pick(new_pick).clone(),
        };
        report.imported.push(recorded);
    }

    if report.imported.is_empty() && !report.errors.is_empty() {
        return Err(DraftError::format(format!(
            "Could not import any picks from that board.\n{}",
            render_error_lines(&report.errors)
        )));
    }

    info!(
        "Imported {} picks ({} already recorded, {} unparseable lines)",
        report.imported.len(),
        report.already_recorded.len(),
        report.errors.len()
    );
    Ok(report)
}

impl ImportReport {
    /// Caller-facing summary.
    pub fn render(&self, state: &DraftState) -> String {
        let league_size = state.league_size();
        let next = state.next_pick();
        let mut out = vec![
            format!("Imported {} picks.", self.imported.len()),
            format!(
                "Next pick: #{} ({})",
                next,
                format_round_pick(next, league_size)
            ),
        ];

        let mine: Vec<&DraftPick> = self
            .imported
            .iter()
            .filter(|p| p.team_id == state.my_team_id())
            .collect();
        if !mine.is_empty() {
            out.push("Your new picks:".to_string());
            for pick in mine {
                out.push(format!("  {}", pick.describe(league_size)));
            }
        }

        if !self.already_recorded.is_empty() {
            out.push(format!(
                "Skipped {} already recorded: {}",
                self.already_recorded.len(),
                self.already_recorded.join(", ")
            ));
        }

        if !self.errors.is_empty() {
            out.push(render_error_lines(&self.errors));
        }
        out.join("\n")
    }
}

fn render_error_lines(errors: &[String]) -> String {
    let mut out = format!("Could not parse {} line(s):", errors.len());
    for line in errors.iter().take(MAX_ERROR_LINES_SHOWN) {
        out.push_str(&format!("\n  {line}"));
    }
    if errors.len() > MAX_ERROR_LINES_SHOWN {
        out.push_str(&format!("\n  ...and {} more", errors.len() - MAX_ERROR_LINES_SHOWN));
    }
    out
}
