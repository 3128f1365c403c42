//! Per-ball transitions: crediting, extras, wickets, free hits, rotation,
//! over completion and rejection.

use crease_core::{
    ball_processor::apply_ball,
    delivery::{Delivery, DismissalMethod, Wicket},
    error::ScoreError,
    event::{BallEventKind, TransitionSignal},
    match_state::{Match, MatchSetup},
    simulation::auto_select,
    toss::TossDecision,
    types::SelectionSlot,
};

fn new_match(overs: u32) -> Match {
    Match::new(MatchSetup {
        team_a: "Lions".into(),
        team_b: "Tigers".into(),
        overs,
        ..MatchSetup::default()
    })
    .expect("valid setup")
}

/// Lions batting, striker 1, non-striker 2, Tigers Player 11 bowling.
fn ready_match() -> Match {
    let m = new_match(20)
        .resolve_toss("Lions", TossDecision::Bat)
        .expect("toss");
    auto_select(m).expect("selection")
}

fn bowl(m: &Match, delivery: Delivery) -> Match {
    let (next, signal) = apply_ball(m, &delivery).expect("ball accepted");
    assert_eq!(signal, TransitionSignal::None, "no transition expected");
    next
}

#[test]
fn ready_match_has_expected_crease() {
    let m = ready_match();
    assert_eq!(m.striker, Some(1));
    assert_eq!(m.non_striker, Some(2));
    assert_eq!(m.bowler, Some(11));
    assert_eq!(m.pending_selection(), None);
}

#[test]
fn no_ball_with_four_off_the_bat() {
    let before = ready_match();
    let m = bowl(&before, Delivery::no_ball(4, 1));
    let inning = m.current_inning().expect("inning");
    let striker = inning.batsman(1).expect("striker");

    assert_eq!(striker.runs, 4);
    assert_eq!(striker.balls, 1, "a no-ball counts as a faced ball");
    assert_eq!(inning.extras.no_balls, 1);
    assert_eq!(inning.balls, 0, "no-ball never advances the over");
    assert_eq!(inning.score, 5);
    assert!(m.is_free_hit, "next ball is a free hit");
    assert_eq!(inning.bowler(11).expect("bowler").runs_conceded, 5);
    assert_eq!(m.striker, Some(1), "even runs, no rotation");
}

#[test]
fn no_ball_extras_count_one_whatever_the_runs() {
    let m = bowl(&ready_match(), Delivery::no_ball(0, 3));
    let inning = m.current_inning().expect("inning");
    assert_eq!(inning.extras.no_balls, 1);
    assert_eq!(inning.score, 3);
}

#[test]
fn wide_conceding_one() {
    let m = bowl(&ready_match(), Delivery::wide(1));
    let inning = m.current_inning().expect("inning");

    assert_eq!(inning.score, 1);
    assert_eq!(inning.extras.wides, 1);
    assert_eq!(inning.bowler(11).expect("bowler").runs_conceded, 1);
    assert_eq!(inning.balls, 0);
    assert_eq!(inning.batsman(1).expect("striker").balls, 0);
    assert!(!m.is_free_hit);
    assert_eq!(
        m.last_event.as_ref().map(|e| e.kind),
        Some(BallEventKind::Extra)
    );
}

#[test]
fn single_bye_rotates_strike_without_charging_the_bowler() {
    let m = bowl(&ready_match(), Delivery::byes(1));
    let inning = m.current_inning().expect("inning");

    assert_eq!(inning.extras.byes, 1);
    assert_eq!(inning.balls, 1, "a bye is a legal ball");
    assert_eq!(inning.batsman(1).expect("batsman").balls, 1);
    assert_eq!(inning.batsman(1).expect("batsman").runs, 0);
    assert_eq!(inning.bowler(11).expect("bowler").runs_conceded, 0);
    assert_eq!(m.striker, Some(2));
    assert_eq!(m.non_striker, Some(1));
}

#[test]
fn bat_runs_on_a_wide_are_charged_to_the_bowler() {
    let m = bowl(&ready_match(), Delivery { runs_off_bat: 4, ..Delivery::wide(1) });
    let inning = m.current_inning().expect("inning");

    assert_eq!(inning.score, 5);
    assert_eq!(inning.extras.wides, 1);
    assert_eq!(inning.batsman(1).map(|p| (p.runs, p.balls, p.fours)), Some((0, 0, 0)));
    assert_eq!(inning.bowler(11).map(|b| (b.runs_conceded, b.balls)), Some((5, 0)));
    assert_eq!(inning.balls, 0);
    assert_eq!(m.last_event.as_ref().map(|e| e.kind), Some(BallEventKind::Extra));
}

#[test]
fn bat_runs_on_a_bye_reach_only_the_score() {
    let m = bowl(&ready_match(), Delivery { runs_off_bat: 1, ..Delivery::byes(2) });
    let inning = m.current_inning().expect("inning");

    assert_eq!(inning.score, 3);
    assert_eq!(inning.extras.byes, 2);
    assert_eq!(inning.batsman(1).map(|p| (p.runs, p.balls)), Some((0, 1)));
    assert_eq!(inning.bowler(11).map(|b| (b.runs_conceded, b.balls)), Some((0, 1)));
    assert_eq!((m.striker, m.non_striker), (Some(1), Some(2)), "two byes, no swap");
}

#[test]
fn odd_runs_swap_strike_even_runs_do_not() {
    let m = bowl(&ready_match(), Delivery::runs(1));
    assert_eq!((m.striker, m.non_striker), (Some(2), Some(1)));

    let m = bowl(&m, Delivery::runs(2));
    assert_eq!((m.striker, m.non_striker), (Some(2), Some(1)));

    let m = bowl(&m, Delivery::runs(3));
    assert_eq!((m.striker, m.non_striker), (Some(1), Some(2)));
}

#[test]
fn boundaries_are_counted_and_classified() {
    let m = bowl(&ready_match(), Delivery::runs(6));
    let striker = m.current_inning().and_then(|i| i.batsman(1)).expect("striker");
    assert_eq!(striker.sixes, 1);
    assert_eq!(striker.runs, 6);
    assert_eq!(
        m.last_event.as_ref().map(|e| e.kind),
        Some(BallEventKind::Boundary)
    );

    let m = bowl(&m, Delivery::runs(4));
    let striker = m.current_inning().and_then(|i| i.batsman(1)).expect("striker");
    assert_eq!(striker.fours, 1);
}

#[test]
fn caught_dismissal_text_and_incoming_batsman() {
    let m = bowl(
        &ready_match(),
        Delivery::dot().with_wicket(Wicket::by(DismissalMethod::Caught, "Tigers Player 3")),
    );
    let inning = m.current_inning().expect("inning");
    let out = inning.batsman(1).expect("dismissed batsman");

    assert!(out.is_out);
    assert_eq!(out.out_by.as_deref(), Some("c Tigers Player 3 b Tigers Player 11"));
    assert_eq!(inning.wickets, 1);
    assert_eq!(inning.bowler(11).expect("bowler").wickets, 1);
    assert_eq!(m.striker, Some(3), "next not-out batsman walks in");
    assert_eq!(m.non_striker, Some(2));

    let fow = &inning.fall_of_wickets[0];
    assert_eq!(fow.score, 0);
    assert_eq!(fow.wicket, 1);
    assert_eq!(fow.batsman_name, "Lions Player 1");
    assert_eq!(fow.bowler_name, "Tigers Player 11");
    assert_eq!(fow.over, "0.1");
    assert_eq!(fow.dismissal_type, DismissalMethod::Caught);
    assert_eq!(fow.fielder_name.as_deref(), Some("Tigers Player 3"));
}

#[test]
fn dismissal_text_without_fielder_degrades() {
    let m = bowl(
        &ready_match(),
        Delivery::dot().with_wicket(Wicket::new(DismissalMethod::Stumped)),
    );
    let out = m.current_inning().and_then(|i| i.batsman(1)).expect("batsman");
    assert_eq!(out.out_by.as_deref(), Some("Stumped b Tigers Player 11"));

    let m = bowl(&m, Delivery::dot().with_wicket(Wicket::new(DismissalMethod::Lbw)));
    let out = m.current_inning().and_then(|i| i.batsman(3)).expect("batsman");
    assert_eq!(out.out_by.as_deref(), Some("LBW b Tigers Player 11"));
}

#[test]
fn free_hit_nullifies_bowled() {
    let m = bowl(&ready_match(), Delivery::no_ball(0, 1));
    assert!(m.is_free_hit);

    let m = bowl(&m, Delivery::dot().with_wicket(Wicket::new(DismissalMethod::Bowled)));
    let inning = m.current_inning().expect("inning");
    assert_eq!(inning.wickets, 0);
    assert!(!inning.batsman(1).expect("batsman").is_out);
    assert!(inning.fall_of_wickets.is_empty());
    assert!(!m.is_free_hit, "free hit consumed by a legal ball");
    assert_eq!(m.last_event.as_ref().map(|e| e.kind), Some(BallEventKind::Dot));
    assert_eq!(m.last_event.as_ref().and_then(|e| e.wicket_method), None);
}

#[test]
fn run_out_stands_on_free_hit() {
    let m = bowl(&ready_match(), Delivery::no_ball(0, 1));
    let m = bowl(
        &m,
        Delivery::runs(1).with_wicket(Wicket::by(DismissalMethod::RunOut, "Tigers Player 5")),
    );
    let inning = m.current_inning().expect("inning");
    assert_eq!(inning.wickets, 1);
    assert_eq!(
        inning.batsman(1).and_then(|p| p.out_by.as_deref()),
        Some("run out (Tigers Player 5)")
    );
    assert_eq!(inning.batsman(1).map(|p| p.runs), Some(1));
    assert_eq!(m.striker, Some(3), "no rotation when a wicket falls");
}

#[test]
fn cancelled_wicket_on_a_free_hit_scores_as_an_ordinary_ball() {
    let m = bowl(&ready_match(), Delivery::no_ball(0, 1));
    let m = bowl(&m, Delivery::runs(1).with_wicket(Wicket::new(DismissalMethod::Bowled)));
    let inning = m.current_inning().expect("inning");

    assert_eq!(inning.wickets, 0);
    assert_eq!(inning.batsman(1).map(|p| (p.runs, p.is_out)), Some((1, false)));
    assert_eq!((m.striker, m.non_striker), (Some(2), Some(1)), "odd run still rotates");
    let event = m.last_event.as_ref().expect("event");
    assert_eq!(event.kind, BallEventKind::Run);
    assert_eq!(event.wicket_method, None);
}

#[test]
fn free_hit_survives_a_wide_and_rearms_on_a_no_ball() {
    let m = bowl(&ready_match(), Delivery::no_ball(0, 1));
    let m = bowl(&m, Delivery::wide(1));
    assert!(m.is_free_hit, "an extra keeps the free hit armed");
    let m = bowl(&m, Delivery::no_ball(1, 1));
    assert!(m.is_free_hit);
    let m = bowl(&m, Delivery::runs(2));
    assert!(!m.is_free_hit);
}

#[test]
fn six_legal_balls_complete_an_over() {
    let mut m = ready_match();
    for _ in 0..5 {
        m = bowl(&m, Delivery::dot());
        assert!(m.current_inning().expect("inning").balls <= 5);
    }
    m = bowl(&m, Delivery::wide(1));
    assert_eq!(m.current_inning().expect("inning").balls, 5, "wide does not finish the over");

    m = bowl(&m, Delivery::dot());
    let inning = m.current_inning().expect("inning");
    assert_eq!(inning.overs, 1);
    assert_eq!(inning.balls, 0);
    let bowler = inning.bowler(11).expect("bowler");
    assert_eq!((bowler.overs, bowler.balls), (1, 0));
    assert_eq!(m.bowler, None, "a new bowler must be chosen");
    assert_eq!((m.striker, m.non_striker), (Some(2), Some(1)), "end-of-over swap");
    assert_eq!(m.last_event.as_ref().map(|e| e.over.as_str()), Some("0.6"));
    assert_eq!(m.pending_selection(), Some(SelectionSlot::Bowler));

    let err = apply_ball(&m, &Delivery::dot()).expect_err("bowler missing");
    assert!(matches!(
        err,
        ScoreError::PreconditionViolation { missing: SelectionSlot::Bowler }
    ));
}

#[test]
fn single_off_the_last_ball_cancels_the_end_of_over_swap() {
    let mut m = ready_match();
    for _ in 0..5 {
        m = bowl(&m, Delivery::dot());
    }
    m = bowl(&m, Delivery::runs(1));
    assert_eq!((m.striker, m.non_striker), (Some(1), Some(2)));
}

#[test]
fn wicket_on_the_last_ball_keeps_the_new_batsman_on_strike() {
    let mut m = ready_match();
    for _ in 0..5 {
        m = bowl(&m, Delivery::dot());
    }
    m = bowl(&m, Delivery::dot().with_wicket(Wicket::new(DismissalMethod::Bowled)));
    let inning = m.current_inning().expect("inning");
    assert_eq!(inning.fall_of_wickets[0].over, "0.6");
    assert_eq!(inning.overs, 1);
    assert_eq!((m.striker, m.non_striker), (Some(3), Some(2)));
    assert_eq!(m.bowler, None);
}

#[test]
fn invalid_runs_leave_the_match_unchanged() {
    let before = ready_match();
    let snapshot = before.clone();
    let err = apply_ball(&before, &Delivery::runs(5)).expect_err("5 is not a valid value");
    assert!(matches!(err, ScoreError::InvalidRuns { runs: 5 }));
    assert!(err.is_user_actionable());

    let err = apply_ball(&before, &Delivery::no_ball(4, u32::MAX))
        .expect_err("absurd extra runs");
    assert!(matches!(err, ScoreError::InvalidDelivery { .. }));
    assert_eq!(before, snapshot, "rejection leaves no trace");
}

#[test]
fn missing_striker_is_a_precondition_violation() {
    let m = new_match(20)
        .resolve_toss("Tigers", TossDecision::Bowl)
        .expect("toss");
    let err = apply_ball(&m, &Delivery::dot()).expect_err("no striker");
    assert!(matches!(
        err,
        ScoreError::PreconditionViolation { missing: SelectionSlot::Striker }
    ));
    assert_eq!(m.version, 1, "only the toss bumped the version");
}

#[test]
fn ball_before_toss_is_rejected() {
    let err = apply_ball(&new_match(20), &Delivery::dot()).expect_err("toss pending");
    assert!(matches!(err, ScoreError::MatchNotStarted));
}

#[test]
fn every_accepted_ball_bumps_version_and_event_id() {
    let m0 = ready_match();
    let m1 = bowl(&m0, Delivery::runs(1));
    let m2 = bowl(&m1, Delivery::dot());
    assert_eq!(m1.version, m0.version + 1);
    assert_eq!(m2.version, m1.version + 1);
    assert_eq!(m2.last_event.as_ref().map(|e| e.id), Some(m2.version));
}
