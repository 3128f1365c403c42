//! The ball event processor. Applies one delivery to a match.
//!
//! EXECUTION ORDER (fixed, never reordered):
//!   1. Free-hit carry-in         (capture before any mutation)
//!   2. Free-hit transition       (clear on a non-extra, re-arm on a no-ball)
//!   3. Score crediting           (inning, extras, striker, bowler)
//!   4. Wicket handling           (nullified on a free hit unless run out)
//!   5. Strike rotation           (odd runs, no wicket)
//!   6. Over completion           (rollover, end-of-over swap, clear bowler)
//!   7. Event record              (last-event descriptor)
//!   8. Innings / match transition
//!
//! RULES:
//!   - `apply_ball` never mutates its input. It validates against the borrowed
//!     match, then works on a clone. Rejection leaves no trace.
//!   - `wickets` and the batsmen's `is_out` flags change together, here and
//!     nowhere else.
//!   - Crease slots hold roster ids. Accumulators live in the roster entries.

use crate::{
    delivery::{Delivery, ExtraKind, Wicket},
    error::{ScoreError, ScoreResult},
    event::{BallEventKind, LastEvent, TransitionSignal},
    inning::{FallOfWicket, Inning},
    match_state::{Match, MatchStatus},
    types::{PlayerId, SelectionSlot, BALLS_PER_OVER, MAX_WICKETS},
};

/// Roster positions of the three players involved in this ball.
#[derive(Debug, Clone, Copy)]
struct Crease {
    striker:     usize,
    non_striker: usize,
    bowler:      usize,
}

/// Apply one delivery. Returns the next match value and what the caller
/// must do next.
pub fn apply_ball(current: &Match, delivery: &Delivery) -> ScoreResult<(Match, TransitionSignal)> {
    delivery.validate()?;
    let crease = check_ready(current)?;

    let mut next = current.clone();

    // 1–2. Free hit.
    let was_free_hit = next.is_free_hit;
    if was_free_hit && delivery.extra.is_none() {
        next.is_free_hit = false;
    }
    if delivery.extra_kind() == Some(ExtraKind::NoBall) {
        next.is_free_hit = true;
    }

    let inning_index = next.current_inning;
    let inning = &mut next.innings[inning_index];
    let batsman_name = inning.batsmen[crease.striker].name.clone();
    let bowler_name = inning.bowlers[crease.bowler].name.clone();

    // 3.
    credit_runs(inning, crease, delivery);
    let over = inning.over_marker();

    // 4.
    let recorded = delivery
        .wicket
        .as_ref()
        .filter(|w| !was_free_hit || w.method.stands_on_free_hit());
    if let Some(wicket) = recorded {
        let non_striker_id = inning.batsmen[crease.non_striker].id;
        next.striker = take_wicket(inning, crease, wicket, non_striker_id);
    } else if let Some(nullified) = &delivery.wicket {
        log::debug!(
            "{} nullified on a free hit ({} not out)",
            nullified.method,
            batsman_name
        );
    }
    let wicket_fell = recorded.is_some();

    // 5.
    if delivery.runs_for_rotation() % 2 == 1 && !wicket_fell {
        swap_strike(&mut next);
    }

    // 6.
    let inning = &mut next.innings[inning_index];
    if inning.balls == BALLS_PER_OVER {
        inning.balls = 0;
        inning.overs += 1;
        let bowler = &mut inning.bowlers[crease.bowler];
        bowler.overs += 1;
        bowler.balls = 0;
        log::debug!(
            "over {} complete: {}/{} ({} {}-{}-{})",
            inning.overs,
            inning.score,
            inning.wickets,
            bowler.name,
            bowler.overs,
            bowler.runs_conceded,
            bowler.wickets
        );
        if !wicket_fell {
            swap_strike(&mut next);
        }
        next.bowler = None;
    }

    // 7.
    next.version += 1;
    next.last_event = Some(LastEvent {
        id: next.version,
        kind: classify(delivery, wicket_fell),
        over,
        runs: delivery.runs_off_bat,
        wicket_method: recorded.map(|w| w.method),
        batsman_name,
        bowler_name,
    });

    // 8.
    let signal = close_if_finished(&mut next);
    Ok((next, signal))
}

/// Guard the selection precondition and resolve crease ids to roster slots.
fn check_ready(m: &Match) -> ScoreResult<Crease> {
    match m.status {
        MatchStatus::AwaitingToss => return Err(ScoreError::MatchNotStarted),
        MatchStatus::Complete => return Err(ScoreError::MatchComplete),
        MatchStatus::InProgress => {}
    }
    let inning = m.current_inning().ok_or(ScoreError::MatchNotStarted)?;
    if inning.is_all_out() || inning.overs >= m.overs {
        return Err(ScoreError::InningsClosed);
    }

    let missing = |slot| ScoreError::PreconditionViolation { missing: slot };
    let striker = m.striker.ok_or_else(|| missing(SelectionSlot::Striker))?;
    let non_striker = m.non_striker.ok_or_else(|| missing(SelectionSlot::NonStriker))?;
    let bowler = m.bowler.ok_or_else(|| missing(SelectionSlot::Bowler))?;

    let not_found = |slot, player_id: PlayerId| ScoreError::PlayerNotFound { slot, player_id };
    Ok(Crease {
        striker: inning
            .batsman_index(striker)
            .ok_or_else(|| not_found(SelectionSlot::Striker, striker))?,
        non_striker: inning
            .batsman_index(non_striker)
            .ok_or_else(|| not_found(SelectionSlot::NonStriker, non_striker))?,
        bowler: inning
            .bowler_index(bowler)
            .ok_or_else(|| not_found(SelectionSlot::Bowler, bowler))?,
    })
}

fn credit_runs(inning: &mut Inning, crease: Crease, delivery: &Delivery) {
    let off_bat = delivery.runs_off_bat;
    inning.score += delivery.total_runs();

    let striker = &mut inning.batsmen[crease.striker];
    let bowler = &mut inning.bowlers[crease.bowler];
    match delivery.extra {
        None => {
            striker.runs += off_bat;
            striker.balls += 1;
            match off_bat {
                4 => striker.fours += 1,
                6 => striker.sixes += 1,
                _ => {}
            }
            bowler.runs_conceded += off_bat;
            bowler.balls += 1;
            inning.balls += 1;
        }
        Some(extra) => match extra.kind {
            // Bat runs on a wide go to the score and the bowler, not the striker.
            ExtraKind::Wide => {
                inning.extras.wides += extra.runs;
                bowler.runs_conceded += off_bat + extra.runs;
            }
            ExtraKind::NoBall => {
                // One no-ball per delivery, whatever `extra.runs` says.
                inning.extras.no_balls += 1;
                bowler.runs_conceded += off_bat + extra.runs;
                striker.runs += off_bat;
                striker.balls += 1;
            }
            // Bat runs on a bye or leg-bye count toward the score only.
            ExtraKind::Bye | ExtraKind::LegBye => {
                if extra.kind == ExtraKind::Bye {
                    inning.extras.byes += extra.runs;
                } else {
                    inning.extras.leg_byes += extra.runs;
                }
                striker.balls += 1;
                bowler.balls += 1;
                inning.balls += 1;
            }
        },
    }
}

/// Record the dismissal and return the id of the incoming batsman, or
/// `None` when nobody is left.
fn take_wicket(
    inning: &mut Inning,
    crease: Crease,
    wicket: &Wicket,
    non_striker_id: PlayerId,
) -> Option<PlayerId> {
    inning.wickets += 1;
    let bowler = &mut inning.bowlers[crease.bowler];
    bowler.wickets += 1;
    let bowler_name = bowler.name.clone();

    let striker = &mut inning.batsmen[crease.striker];
    striker.is_out = true;
    striker.out_by = Some(wicket.dismissal_text(&bowler_name));
    let striker_id = striker.id;
    let batsman_name = striker.name.clone();

    let over = inning.over_marker();
    log::debug!(
        "wicket {} at {}: {} {}",
        inning.wickets,
        over,
        batsman_name,
        inning.batsmen[crease.striker].out_by.as_deref().unwrap_or_default()
    );
    inning.fall_of_wickets.push(FallOfWicket {
        score: inning.score,
        wicket: inning.wickets,
        batsman_name,
        over,
        bowler_name,
        dismissal_type: wicket.method,
        fielder_name: wicket.fielder_name.clone(),
    });

    inning
        .batsmen
        .iter()
        .find(|p| !p.is_out && p.id != non_striker_id && p.id != striker_id)
        .map(|p| p.id)
}

fn swap_strike(m: &mut Match) {
    std::mem::swap(&mut m.striker, &mut m.non_striker);
}

/// wicket > boundary > run > extra > dot
fn classify(delivery: &Delivery, wicket_fell: bool) -> BallEventKind {
    let plain = delivery.extra.is_none();
    if wicket_fell {
        BallEventKind::Wicket
    } else if plain && matches!(delivery.runs_off_bat, 4 | 6) {
        BallEventKind::Boundary
    } else if plain && delivery.runs_off_bat > 0 {
        BallEventKind::Run
    } else if !plain {
        BallEventKind::Extra
    } else {
        BallEventKind::Dot
    }
}

/// Detect the end of the current inning and move the match on.
fn close_if_finished(m: &mut Match) -> TransitionSignal {
    let Some(inning) = m.current_inning() else {
        return TransitionSignal::None;
    };
    let all_out = inning.wickets >= MAX_WICKETS;
    let overs_done = inning.overs >= m.overs;
    let chased = m.is_chasing() && inning.score >= m.target;

    if !m.is_chasing() && (all_out || overs_done) {
        let first_score = inning.score;
        let next_batting = inning.bowling_team.clone();
        m.target = first_score + 1;
        let second = m.build_inning(&next_batting);
        m.innings.push(second);
        m.current_inning = 1;
        clear_crease(m);
        log::info!(
            "innings break in {}: {} need {} to win",
            m.id,
            next_batting,
            m.target
        );
        TransitionSignal::InningsBreak
    } else if m.is_chasing() && (all_out || overs_done || chased) {
        m.status = MatchStatus::Complete;
        clear_crease(m);
        log::info!("match {} complete: {}", m.id, m.result());
        TransitionSignal::MatchComplete
    } else {
        TransitionSignal::None
    }
}

fn clear_crease(m: &mut Match) {
    m.striker = None;
    m.non_striker = None;
    m.bowler = None;
    // A no-ball on the last delivery of an inning does not carry over.
    m.is_free_hit = false;
}
