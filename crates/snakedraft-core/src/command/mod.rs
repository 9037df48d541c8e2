// Command dispatch.
//
// One text command in, one reply out. Commands are matched against an ordered
// registry of (pattern, handler) entries; the first entry whose pattern
// matches handles the command. Handlers work on a copy of the draft state, and
// the copy only replaces the caller's state when the handler succeeds.

mod picks;
mod queries;

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::draft::state::{DraftSettings, DraftState};
use crate::error::DraftError;
use crate::players::PlayerPool;
use crate::recommend::RecommendationContext;

pub use queries::HELP_TEXT;

/// Read-only inputs every handler may use.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub players: &'a PlayerPool,
    pub settings: &'a DraftSettings,
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Plain text for the caller.
    Message(String),
    /// Context to hand to the recommendation service.
    Recommendation(RecommendationContext),
}

impl Response {
    /// Text form of the reply. Recommendation context renders as its prompt.
    pub fn text(&self) -> String {
        match self {
            Response::Message(text) => text.clone(),
            Response::Recommendation(ctx) => ctx.render(),
        }
    }
}

type Handler = fn(&mut DraftState, &Captures<'_>, &CommandContext<'_>) -> Result<Response, DraftError>;

struct CommandEntry {
    name: &'static str,
    pattern: Regex,
    handler: Handler,
}

impl CommandEntry {
    fn new(name: &'static str, pattern: &str, handler: Handler) -> Self {
        CommandEntry {
            name,
            pattern: Regex::new(pattern).expect("static regex must compile"),
            handler,
        }
    }
}

/// Registry in priority order. Single-line commands use `[ \t]` for
/// separators so they never match across a newline; the two import entries
/// come last and accept multi-line text.
static REGISTRY: LazyLock<Vec<CommandEntry>> = LazyLock::new(|| {
    vec![
        CommandEntry::new("help", r"^\.help[ \t]*$", queries::help),
        CommandEntry::new("clear", r"^\.clear[ \t]*$", picks::clear),
        CommandEntry::new("status", r"^\.(?:status|draft)[ \t]*$", queries::status),
        CommandEntry::new("who", r"^\.(?:who|next)[ \t]*$", queries::who),
        CommandEntry::new("team", r"^\.team(?:[ \t]+([^\n]*))?$", picks::set_team),
        CommandEntry::new("my", r"^\.my[ \t]+([^\n]+)$", picks::my_pick),
        CommandEntry::new("force", r"^\.force[ \t]+([^\n]+)$", picks::forced_pick),
        CommandEntry::new(
            "team-pick",
            r"^\.p[ \t]+([^\n]+?)[ \t]+[tT](\d+)[ \t]*$",
            picks::team_pick,
        ),
        CommandEntry::new("team-shorthand", r"^\.(\d+)[ \t]+([^\n]+)$", picks::team_shorthand),
        CommandEntry::new("import", r"(?s)^\.import\b[ \t]*(.*)$", picks::import),
        CommandEntry::new("board", r"(?s)^\.(\S.*)$", picks::board),
    ]
});

/// Apply one command to a draft state.
///
/// Returns the state to keep and the reply. When the command fails the reply
/// is the error's guidance text and the returned state is `state` unchanged.
pub fn dispatch(
    state: DraftState,
    text: &str,
    ctx: &CommandContext<'_>,
) -> (DraftState, Response) {
    let mut working = state.clone();
    match try_dispatch(&mut working, text, ctx) {
        Ok(response) => (working, response),
        Err(e) => {
            debug!("Command failed: {}", e);
            (state, Response::Message(e.to_string()))
        }
    }
}

/// Apply one command in place. On error `state` may be partially updated;
/// use [`dispatch`] to get all-or-nothing behaviour.
pub fn try_dispatch(
    state: &mut DraftState,
    text: &str,
    ctx: &CommandContext<'_>,
) -> Result<Response, DraftError> {
    let text = text.trim();
    if !text.starts_with('.') {
        return Err(DraftError::format(format!(
            "Commands start with '.'.\n{HELP_TEXT}"
        )));
    }

    for entry in REGISTRY.iter() {
        if let Some(caps) = entry.pattern.captures(text) {
            debug!("Routing command to '{}'", entry.name);
            return (entry.handler)(state, &caps, ctx);
        }
    }

    Err(DraftError::format(format!(
        "Unrecognised command '{text}'.\n{HELP_TEXT}"
    )))
}

/// Capture group `i`, trimmed, or "".
fn capture<'t>(caps: &Captures<'t>, i: usize) -> &'t str {
    caps.get(i).map_or("", |m| m.as_str().trim())
}
