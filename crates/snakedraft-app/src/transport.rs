// Line-oriented transport: commands in on a reader, replies out on a writer.
//
// Most commands are one line and are dispatched as soon as they arrive. A
// board paste (`.import` or a bare `.`) keeps collecting the lines that follow
// until a blank line or the next command, so the whole board is one message.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use snakedraft_core::command::Response;
use snakedraft_core::session::{SessionId, SessionRegistry};

use crate::recommender::Recommender;

/// Command words that never continue onto following lines.
const SINGLE_LINE_COMMANDS: &[&str] = &[
    "my", "force", "p", "team", "clear", "who", "next", "status", "draft", "help",
];

// ---------------------------------------------------------------------------
// Message assembly
// ---------------------------------------------------------------------------

/// Groups input lines into command messages.
#[derive(Debug, Default)]
pub struct MessageAssembler {
    pending: Option<String>,
}

impl MessageAssembler {
    /// Feed one input line. Returns the messages it completed, in order.
    pub fn push_line(&mut self, line: &str) -> Vec<String> {
        let line = line.trim_end();
        let mut ready = Vec::new();

        if line.trim().is_empty() {
            ready.extend(self.pending.take());
            return ready;
        }

        if line.trim_start().starts_with('.') {
            ready.extend(self.pending.take());
            if is_single_line_command(line) {
                ready.push(line.trim().to_string());
            } else {
                self.pending = Some(line.trim().to_string());
            }
            return ready;
        }

        match self.pending.as_mut() {
            Some(message) => {
                message.push('\n');
                message.push_str(line.trim());
            }
            // Not part of any message; the dispatcher explains the syntax.
            None => ready.push(line.trim().to_string()),
        }
        ready
    }

    /// Flush whatever is still being collected.
    pub fn finish(&mut self) -> Option<String> {
        self.pending.take()
    }
}

fn is_single_line_command(line: &str) -> bool {
    let Some(rest) = line.trim_start().strip_prefix('.') else {
        return false;
    };
    let word = rest.split_whitespace().next().unwrap_or("");
    SINGLE_LINE_COMMANDS.contains(&word)
        || (!word.is_empty() && word.chars().all(|c| c.is_ascii_digit()))
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// Read commands until EOF, answering each one on `writer`.
pub async fn run<R, W>(
    reader: R,
    mut writer: W,
    registry: &mut SessionRegistry,
    session: &SessionId,
    recommender: &dyn Recommender,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut assembler = MessageAssembler::default();

    while let Some(line) = lines.next_line().await? {
        for message in assembler.push_line(&line) {
            let reply = respond(registry, session, recommender, &message).await;
            write_reply(&mut writer, &reply).await?;
        }
    }
    if let Some(message) = assembler.finish() {
        let reply = respond(registry, session, recommender, &message).await;
        write_reply(&mut writer, &reply).await?;
    }

    info!("Input closed; transport loop finished");
    Ok(())
}

/// Run one message through the registry, handing recommendation context to
/// the recommender.
pub async fn respond(
    registry: &mut SessionRegistry,
    session: &SessionId,
    recommender: &dyn Recommender,
    message: &str,
) -> String {
    debug!("Message for session '{}': {} line(s)", session, message.lines().count());
    match registry.execute(session, message) {
        Response::Message(text) => text,
        Response::Recommendation(context) => match recommender.recommend(&context).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Recommender failed: {}", e);
                format!("{}\n\n({e})", context.render())
            }
        },
    }
}

async fn write_reply<W: AsyncWrite + Unpin>(writer: &mut W, reply: &str) -> std::io::Result<()> {
    writer.write_all(reply.as_bytes()).await?;
    writer.write_all(b"\n\n").await?;
    writer.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommender::{OfflineRecommender, RecommendError};
    use async_trait::async_trait;
    use snakedraft_core::draft::state::DraftSettings;
    use snakedraft_core::players::{PlayerPool, PlayerRecord};
    use snakedraft_core::recommend::RecommendationContext;

    fn registry() -> SessionRegistry {
        let players = PlayerPool::new(vec![
            PlayerRecord {
                name: "Josh Allen".into(),
                position: "QB".into(),
                pro_team: "BUF".into(),
                adp: Some(20.0),
                projected_points: None,
                injury_status: None,
            },
            PlayerRecord {
                name: "CeeDee Lamb".into(),
                position: "WR".into(),
                pro_team: "DAL".into(),
                adp: Some(2.0),
                projected_points: None,
                injury_status: None,
            },
        ]);
        SessionRegistry::new(DraftSettings::new(10), players)
    }

    #[test]
    fn single_line_commands_complete_immediately() {
        let mut asm = MessageAssembler::default();
        assert_eq!(asm.push_line(".my Josh Allen"), vec![".my Josh Allen"]);
        assert_eq!(asm.push_line(".4 CeeDee Lamb"), vec![".4 CeeDee Lamb"]);
        assert_eq!(asm.push_line(".status"), vec![".status"]);
        assert_eq!(asm.finish(), None);
    }

    #[test]
    fn board_collects_until_blank_line() {
        let mut asm = MessageAssembler::default();
        assert!(asm.push_line(".import Josh Allen QB BUF").is_empty());
        assert!(asm.push_line("Round 1, Pick 2 - Team 2").is_empty());
        assert_eq!(
            asm.push_line(""),
            vec![".import Josh Allen QB BUF\nRound 1, Pick 2 - Team 2"]
        );
    }

    #[test]
    fn next_command_closes_a_board() {
        let mut asm = MessageAssembler::default();
        asm.push_line(".CeeDee Lamb");
        asm.push_line("DAL");
        asm.push_line("WR");
        asm.push_line("Team 4");
        assert_eq!(
            asm.push_line(".status"),
            vec![".CeeDee Lamb\nDAL\nWR\nTeam 4", ".status"]
        );
    }

    #[test]
    fn finish_flushes_pending_board() {
        let mut asm = MessageAssembler::default();
        asm.push_line(".import");
        asm.push_line("Josh Allen QB BUF - Team 3");
        assert_eq!(asm.finish().as_deref(), Some(".import\nJosh Allen QB BUF - Team 3"));
    }

    #[test]
    fn stray_text_is_its_own_message() {
        let mut asm = MessageAssembler::default();
        assert_eq!(asm.push_line("hello"), vec!["hello"]);
    }

    #[tokio::test]
    async fn run_answers_each_message() {
        let input = ".my Josh Allen\n.import\nCeeDee Lamb WR DAL - Team 4\n\n.status\n";
        let mut output = Vec::new();
        let mut reg = registry();
        let session = SessionId::new("stdin");
        run(
            input.as_bytes(),
            &mut output,
            &mut reg,
            &session,
            &OfflineRecommender,
        )
        .await
        .unwrap();

        let text = String::from_utf8(output).unwrap();
        let replies: Vec<&str> = text.trim_end().split("\n\n").collect();
        assert!(replies[0].starts_with("Recorded #1 (1.01) Josh Allen QB BUF"));
        assert!(replies[1].starts_with("Imported 1 picks."));
        assert!(replies[2].starts_with("Next pick: #3 (Round 1, Pick 3)"));
        assert_eq!(reg.state(&session).map(|s| s.picks.len()), Some(2));
    }

    struct FailingRecommender;

    #[async_trait]
    impl Recommender for FailingRecommender {
        async fn recommend(&self, _: &RecommendationContext) -> Result<String, RecommendError> {
            Err(RecommendError::Unavailable("offline".into()))
        }
    }

    #[tokio::test]
    async fn recommender_failure_falls_back_to_context() {
        let mut reg = registry();
        let session = SessionId::new("stdin");
        respond(&mut reg, &session, &FailingRecommender, ".my Josh Allen").await;
        let reply = respond(&mut reg, &session, &FailingRecommender, ".who").await;
        assert!(reply.starts_with("## DRAFT POSITION"));
        assert!(reply.ends_with("(recommendation service unavailable: offline)"));
    }

    #[tokio::test]
    async fn who_before_any_pick_is_guidance_not_context() {
        let mut reg = registry();
        let session = SessionId::new("stdin");
        let reply = respond(&mut reg, &session, &FailingRecommender, ".who").await;
        assert!(reply.starts_with("The draft has not started."));
        assert!(!reply.contains("## DRAFT POSITION"));
    }
}
