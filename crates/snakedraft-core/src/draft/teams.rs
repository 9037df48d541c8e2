// Draft-team identity: free-text team labels -> small stable integer ids.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static TEAM_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bteam\s*#?\s*(\d+)\b").expect("static regex must compile")
});

/// Label -> team id map owned by one draft state.
///
/// Ids are assigned lazily the first time a label is seen and never change
/// afterwards. Resolution order for an unseen label:
/// 1. an explicit "Team N" inside the label
/// 2. the league's alias table
/// 3. the next unused sequential id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamIdentityMap {
    ids: HashMap<String, u32>,
    /// First label seen for each id, as typed (trimmed).
    display: BTreeMap<u32, String>,
    aliases: HashMap<String, u32>,
    /// Next candidate for sequential assignment.
    next_id: u32,
    /// Ids kept out of sequential assignment: every team number the caller
    /// has held and every id that already owns a pick.
    reserved: BTreeSet<u32>,
}

impl TeamIdentityMap {
    /// Create an empty map with a fixed alias table. Alias keys are
    /// normalized the same way as labels; zero ids are ignored.
    pub fn new(aliases: &HashMap<String, u32>) -> Self {
        let aliases = aliases
            .iter()
            .filter(|&(_, &id)| id > 0)
            .map(|(label, &id)| (normalize_label(label), id))
            .collect();
        TeamIdentityMap {
            ids: HashMap::new(),
            display: BTreeMap::new(),
            aliases,
            next_id: 1,
            reserved: BTreeSet::new(),
        }
    }

    /// Keep `id` out of sequential assignment. Reservations are never lifted.
    pub fn reserve(&mut self, id: u32) {
        self.reserved.insert(id);
    }

    /// Resolve a label to its team id, assigning one if the label is new.
    pub fn resolve(&mut self, label: &str) -> u32 {
        let key = normalize_label(label);
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }

        let id = if let Some(n) = explicit_team_number(&key) {
            n
        } else if let Some(&n) = self.aliases.get(&key) {
            n
        } else {
            self.next_unused_id()
        };

        debug!("Team label '{}' -> {}", label.trim(), id);
        self.ids.insert(key, id);
        self.display
            .entry(id)
            .or_insert_with(|| label.trim().to_string());
        id
    }

    /// Look up a label without assigning.
    pub fn get(&self, label: &str) -> Option<u32> {
        self.ids.get(&normalize_label(label)).copied()
    }

    /// The first label recorded for `id`.
    pub fn label_for(&self, id: u32) -> Option<&str> {
        self.display.get(&id).map(String::as_str)
    }

    fn next_unused_id(&mut self) -> u32 {
        let mut id = self.next_id.max(1);
        while self.is_taken(id) {
            id += 1;
        }
        self.next_id = id + 1;
        id
    }

    fn is_taken(&self, id: u32) -> bool {
        self.reserved.contains(&id)
            || self.ids.values().any(|&v| v == id)
            || self.aliases.values().any(|&v| v == id)
    }
}

/// Lookup key for a team label: trimmed, lowercased, inner whitespace collapsed.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn explicit_team_number(label: &str) -> Option<u32> {
    let caps = TEAM_NUMBER_RE.captures(label)?;
    caps.get(1)?.as_str().parse::<u32>().ok().filter(|&n| n > 0)
}
