// Snake-draft pick arithmetic.
//
// Absolute pick numbers are 1-based across the whole draft. Rounds and
// picks-within-round are 1-based too. Odd rounds run seat 1..N, even rounds
// run N..1.

/// Split an absolute pick number into `(round, pick_in_round)`.
///
/// Both arguments must be positive.
pub fn to_round_and_pick(absolute_pick: u32, league_size: u32) -> (u32, u32) {
    debug_assert!(absolute_pick > 0, "absolute pick numbers start at 1");
    debug_assert!(league_size > 0, "league size must be positive");
    let round = absolute_pick.div_ceil(league_size);
    let pick_in_round = 1 + (absolute_pick - 1) % league_size;
    (round, pick_in_round)
}

/// Inverse of [`to_round_and_pick`].
pub fn to_absolute_pick(round: u32, pick_in_round: u32, league_size: u32) -> u32 {
    debug_assert!(round > 0 && pick_in_round > 0, "rounds and picks start at 1");
    debug_assert!(pick_in_round <= league_size, "pick in round exceeds league size");
    (round - 1) * league_size + pick_in_round
}

/// Render an absolute pick as "Round R, Pick P".
pub fn format_round_pick(absolute_pick: u32, league_size: u32) -> String {
    let (round, pick) = to_round_and_pick(absolute_pick, league_size);
    format!("Round {round}, Pick {pick}")
}

/// The draft seat (1..=league_size) that owns an absolute pick in snake order.
pub fn drafting_slot(absolute_pick: u32, league_size: u32) -> u32 {
    let (round, pick_in_round) = to_round_and_pick(absolute_pick, league_size);
    if round % 2 == 1 {
        pick_in_round
    } else {
        league_size + 1 - pick_in_round
    }
}

/// First absolute pick at or after `from_pick` that belongs to `slot`.
pub fn next_pick_for_slot(from_pick: u32, slot: u32, league_size: u32) -> u32 {
    debug_assert!(slot > 0 && slot <= league_size, "slot outside the league");
    let (round, _) = to_round_and_pick(from_pick.max(1), league_size);
    let in_round = |round: u32| {
        let pick_in_round = if round % 2 == 1 {
            slot
        } else {
            league_size + 1 - slot
        };
        to_absolute_pick(round, pick_in_round, league_size)
    };
    let candidate = in_round(round);
    if candidate >= from_pick {
        candidate
    } else {
        in_round(round + 1)
    }
}
