//! Seeded whole-match simulation.
//!
//! RULE: The simulator is just another scorer. It goes through the same
//! toss, selection and `apply_ball` transitions a human scorer does and
//! never writes match fields directly.

use crate::{
    ball_processor::apply_ball,
    error::ScoreResult,
    match_state::{Match, MatchSetup, MatchStatus},
    rng::DeliveryRng,
    types::{PlayerId, SelectionSlot},
};

/// The selection an automatic scorer would make next, if one is pending.
///
/// Batsmen come in batting order. Bowlers are drawn from the tail of the
/// roster: whoever has bowled the fewest balls, never the bowler of the
/// previous over when someone else is available.
pub fn next_selection(m: &Match) -> Option<(SelectionSlot, PlayerId)> {
    let slot = m.pending_selection()?;
    match slot {
        SelectionSlot::Striker | SelectionSlot::NonStriker => {
            m.available_batsmen(slot).first().map(|&id| (slot, id))
        }
        SelectionSlot::Bowler => {
            let inning = m.current_inning()?;
            let previous = m
                .last_event
                .as_ref()
                .filter(|_| inning.legal_balls() > 0)
                .map(|e| e.bowler_name.as_str());
            inning
                .bowlers
                .iter()
                .rev()
                .filter(|b| Some(b.name.as_str()) != previous)
                .min_by_key(|b| b.legal_balls())
                .map(|b| (slot, b.id))
        }
    }
}

/// Names of the fielding side in the current inning.
pub fn fielders(m: &Match) -> Vec<String> {
    m.current_inning()
        .map(|inning| inning.bowlers.iter().map(|b| b.name.clone()).collect())
        .unwrap_or_default()
}

/// Fill every pending crease slot with `next_selection`.
pub fn auto_select(mut m: Match) -> ScoreResult<Match> {
    while let Some((slot, id)) = next_selection(&m) {
        m = m.select_player(slot, id)?;
    }
    Ok(m)
}

/// Play a complete match from setup to result. Same seed, same match.
pub fn simulate_match(setup: MatchSetup, seed: u64) -> ScoreResult<Match> {
    let mut rng = DeliveryRng::new(seed);
    let mut m = Match::new(setup)?;
    let toss = rng.toss(&m.team_a, &m.team_b);
    m = m.resolve_toss(&toss.winner, toss.decision)?;

    let mut balls = 0u32;
    while m.status != MatchStatus::Complete {
        m = auto_select(m)?;
        let delivery = rng.next_delivery(&fielders(&m));
        let (next, _) = apply_ball(&m, &delivery)?;
        m = next;
        balls += 1;
    }
    log::info!(
        "simulated {} (seed {seed}): {} deliveries, {}",
        m.id,
        balls,
        m.result()
    );
    Ok(m)
}
