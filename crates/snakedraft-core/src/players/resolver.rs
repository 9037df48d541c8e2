// Player identity resolution against the reference dataset.
//
// Order: exact full name, then token matching (unique -> auto-correct,
// several -> ambiguous), then the nickname table (suggestion only).

use thiserror::Error;

use super::{collapse_whitespace, PlayerPool, PlayerRecord};

/// Most candidates an ambiguous-match failure names.
pub const MAX_AMBIGUOUS_CANDIDATES: usize = 3;

/// Shortest candidate token that may match inside a longer input token, so
/// "ra" or "st" do not match "Mostert".
const MIN_EMBEDDED_TOKEN_LEN: usize = 3;

/// Common nicknames and shorthands -> canonical names. Only ever used to
/// suggest a name, never to resolve one.
const NICKNAMES: &[(&str, &str)] = &[
    ("cmc", "Christian McCaffrey"),
    ("ajb", "A.J. Brown"),
    ("arsb", "Amon-Ra St. Brown"),
    ("jjetta", "Justin Jefferson"),
    ("jj", "Justin Jefferson"),
    ("kw3", "Kenneth Walker III"),
    ("mhj", "Marvin Harrison Jr."),
    ("hollywood", "Marquise Brown"),
    ("ekeler", "Austin Ekeler"),
    ("tk", "Travis Kelce"),
    ("dk", "DK Metcalf"),
    ("olave", "Chris Olave"),
    ("jt", "Jonathan Taylor"),
    ("swift", "D'Andre Swift"),
    ("etn", "Travis Etienne Jr."),
    ("jsn", "Jaxon Smith-Njigba"),
    ("tmac", "Terry McLaurin"),
    ("amon", "Amon-Ra St. Brown"),
    ("bijan", "Bijan Robinson"),
];

/// How a player name was matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    /// The input was the full name (ignoring case).
    Direct,
    /// The input was corrected to the record's canonical name.
    AutoCorrected { input: String },
}

/// A successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    pub record: &'a PlayerRecord,
    pub kind: MatchKind,
}

impl Resolution<'_> {
    /// "Auto-corrected 'mccaffrey' to Christian McCaffrey", when applicable.
    pub fn correction_note(&self) -> Option<String> {
        match &self.kind {
            MatchKind::Direct => None,
            MatchKind::AutoCorrected { input } => Some(format!(
                "Auto-corrected '{}' to {}",
                input, self.record.name
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("'{query}' matches several players: {}.", .candidates.join(", "))]
    Ambiguous {
        query: String,
        candidates: Vec<String>,
    },

    #[error("Player '{query}' not found. Did you mean {suggestion}?")]
    Suggestion { query: String, suggestion: String },

    #[error("Player '{query}' not found.")]
    NotFound { query: String },
}

/// Resolve free-text player input to a reference record.
pub fn resolve_player<'a>(pool: &'a PlayerPool, input: &str) -> Result<Resolution<'a>, ResolveError> {
    let query = collapse_whitespace(input);
    if query.is_empty() {
        return Err(ResolveError::NotFound { query });
    }

    if let Some(record) = pool.find_exact(&query) {
        return Ok(Resolution {
            record,
            kind: MatchKind::Direct,
        });
    }

    let input_tokens = tokenize(&query);
    if !input_tokens.is_empty() {
        let mut matches: Vec<&PlayerRecord> = Vec::new();
        for record in pool.players() {
            let candidate_tokens = tokenize(&record.name);
            let qualifies = input_tokens.iter().all(|t| {
                candidate_tokens
                    .iter()
                    .any(|c| {
                        c.contains(t.as_str())
                            || (c.chars().count() >= MIN_EMBEDDED_TOKEN_LEN && t.contains(c.as_str()))
                    })
            });
            if qualifies && !matches.iter().any(|m| m.name == record.name) {
                matches.push(record);
            }
        }

        match matches.len() {
            0 => {}
            1 => {
                return Ok(Resolution {
                    record: matches[0],
                    kind: MatchKind::AutoCorrected { input: query },
                });
            }
            _ => {
                let candidates = matches
                    .iter()
                    .take(MAX_AMBIGUOUS_CANDIDATES)
                    .map(|r| r.name.clone())
                    .collect();
                return Err(ResolveError::Ambiguous { query, candidates });
            }
        }
    }

    if let Some(suggestion) = nickname_for(&query) {
        return Err(ResolveError::Suggestion {
            query,
            suggestion: suggestion.to_string(),
        });
    }

    Err(ResolveError::NotFound { query })
}

/// Lowercased alphanumeric tokens; punctuation inside a token is dropped so
/// "A.J." and "aj" compare equal.
fn tokenize(name: &str) -> Vec<String> {
    name.split(|c: char| c.is_whitespace() || c == '-')
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

fn nickname_for(query: &str) -> Option<&'static str> {
    let key: String = query
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    NICKNAMES
        .iter()
        .find(|(nick, _)| nick.to_lowercase() == key)
        .map(|(_, name)| *name)
}
