// Draft states keyed by session.
//
// Each session owns an independent draft state, created lazily from the
// league settings on first use.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::command::{dispatch, CommandContext, Response};
use crate::draft::state::{DraftSettings, DraftState};
use crate::players::PlayerPool;

/// Identifies one draft session (a chat channel, a terminal, a test).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        SessionId(id.into())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owns the player reference data, the league settings and every session's
/// draft state.
#[derive(Debug)]
pub struct SessionRegistry {
    settings: DraftSettings,
    players: PlayerPool,
    sessions: HashMap<SessionId, DraftState>,
}

impl SessionRegistry {
    pub fn new(settings: DraftSettings, players: PlayerPool) -> Self {
        SessionRegistry {
            settings,
            players,
            sessions: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &DraftSettings {
        &self.settings
    }

    pub fn players(&self) -> &PlayerPool {
        &self.players
    }

    /// The state for `session`, if it has been used.
    pub fn state(&self, session: &SessionId) -> Option<&DraftState> {
        self.sessions.get(session)
    }

    /// Run one command against a session's draft state.
    pub fn execute(&mut self, session: &SessionId, text: &str) -> Response {
        let state = match self.sessions.remove(session) {
            Some(state) => state,
            None => {
                info!("Starting draft session '{}'", session);
                DraftState::new(&self.settings)
            }
        };
        let ctx = CommandContext {
            players: &self.players,
            settings: &self.settings,
        };
        let (state, response) = dispatch(state, text, &ctx);
        self.sessions.insert(session.clone(), state);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::PlayerRecord;

    fn registry() -> SessionRegistry {
        let players = PlayerPool::new(vec![PlayerRecord {
            name: "Josh Allen".into(),
            position: "QB".into(),
            pro_team: "BUF".into(),
            adp: None,
            projected_points: None,
            injury_status: None,
        }]);
        SessionRegistry::new(DraftSettings::new(12), players)
    }

    #[test]
    fn sessions_are_created_lazily() {
        let mut reg = registry();
        let id = SessionId::new("draft-room");
        assert!(reg.state(&id).is_none());
        reg.execute(&id, ".help");
        assert_eq!(reg.state(&id).map(|s| s.next_pick()), Some(1));
        assert!(reg.state(&SessionId::new("other-room")).is_none());
    }

    #[test]
    fn sessions_are_independent() {
        let mut reg = registry();
        let a = SessionId::new("a");
        let b = SessionId::new("b");
        reg.execute(&a, ".my Josh Allen");
        reg.execute(&b, ".team 6");
        assert_eq!(reg.state(&a).map(|s| s.picks.len()), Some(1));
        assert_eq!(reg.state(&b).map(|s| s.picks.len()), Some(0));
        assert_eq!(reg.state(&a).map(|s| s.my_team_id()), Some(1));
        assert_eq!(reg.state(&b).map(|s| s.my_team_id()), Some(6));
    }

    #[test]
    fn failed_command_keeps_session_state() {
        let mut reg = registry();
        let id = SessionId::new("room");
        reg.execute(&id, ".my Josh Allen");
        let reply = reg.execute(&id, ".my Josh Allen").text();
        assert!(reply.contains("already drafted"));
        assert_eq!(reg.state(&id).map(|s| s.picks.len()), Some(1));
    }
}
