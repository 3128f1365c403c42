//! Scoreboard views and narrative briefs derived from a frozen match.

use crease_core::{
    ball_processor::apply_ball,
    delivery::{Delivery, DismissalMethod, Wicket},
    match_state::{Match, MatchSetup},
    narrative::{commentary_brief, query_context, summary_brief, NarrativeService, TemplateNarrator},
    simulation::auto_select,
    stats::Scoreboard,
    toss::TossDecision,
};

fn play(mut m: Match, deliveries: &[Delivery]) -> Match {
    for d in deliveries {
        m = auto_select(m).expect("selection");
        m = apply_ball(&m, d).expect("ball accepted").0;
    }
    m
}

/// Lions 24/0 off two overs, then Tigers 7/1 off 1.2.
fn chase_in_progress() -> Match {
    let m = Match::new(MatchSetup {
        team_a: "Lions".into(),
        team_b: "Tigers".into(),
        overs: 2,
        ..MatchSetup::default()
    })
    .expect("setup")
    .resolve_toss("Lions", TossDecision::Bat)
    .expect("toss");
    let m = play(m, &vec![Delivery::runs(2); 12]);
    play(
        m,
        &[
            Delivery::runs(4),
            Delivery::runs(1),
            Delivery::wide(1),
            Delivery::dot().with_wicket(Wicket::by(DismissalMethod::Caught, "Lions Player 4")),
            Delivery::runs(1),
            Delivery::dot(),
            Delivery::dot(),
            Delivery::dot(),
            Delivery::dot(),
        ],
    )
}

#[test]
fn scoreboard_for_a_chase() {
    let m = chase_in_progress();
    let board = Scoreboard::from_match(&m).expect("scoreboard");

    assert_eq!(board.batting_team, "Tigers");
    assert_eq!((board.score, board.wickets), (7, 1));
    assert_eq!(board.overs, "1.2");
    assert_eq!(board.extras, 1);
    assert_eq!(board.balls_remaining, 4);
    assert_eq!(board.runs_needed, Some(18));
    assert!((board.required_run_rate.expect("chasing") - 27.0).abs() < 1e-9);
    assert!((board.current_run_rate - 5.25).abs() < 1e-9);

    let names: Vec<&str> = board.top_batsmen.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names[0], "Tigers Player 1");
    assert_eq!(board.top_batsmen[0].runs, 5);
    assert_eq!(names.len(), 3, "dismissed for a duck still counts as batted");
    assert!(board.top_batsmen.len() <= Scoreboard::TOP_N);
    assert_eq!(board.top_bowlers[0].wickets, 1);
}

#[test]
fn first_innings_scoreboard_has_no_chase() {
    let m = Match::new(MatchSetup {
        team_a: "Lions".into(),
        team_b: "Tigers".into(),
        overs: 2,
        ..MatchSetup::default()
    })
    .expect("setup")
    .resolve_toss("Lions", TossDecision::Bat)
    .expect("toss");
    let m = play(m, &[Delivery::runs(6)]);
    let board = Scoreboard::from_match(&m).expect("scoreboard");
    assert_eq!(board.required_run_rate, None);
    assert_eq!(board.runs_needed, None);
    assert!((board.current_run_rate - 36.0).abs() < 1e-9);
}

#[test]
fn briefs_describe_the_snapshot() {
    let m = chase_in_progress();

    let summary = summary_brief(&m);
    assert!(summary.starts_with("Lions vs Tigers, 2 overs a side."));
    assert!(summary.contains("Innings 1: Lions 24/0 in 2.0 overs."));
    assert!(summary.contains("Target: 25."));
    assert!(summary.ends_with("Result: Match Incomplete."));

    let context = query_context(&m);
    assert!(context.contains("c Lions Player 4 b Lions Player 11"), "{context}");
    assert!(context.contains("not out"));

    let brief = commentary_brief(&m).expect("a ball has been bowled");
    assert!(brief.contains("Need 18 from 4 balls."), "{brief}");
}

#[test]
fn commentary_brief_is_empty_before_the_first_ball() {
    let m = Match::new(MatchSetup {
        team_a: "Lions".into(),
        team_b: "Tigers".into(),
        overs: 2,
        ..MatchSetup::default()
    })
    .expect("setup");
    assert_eq!(commentary_brief(&m), None);
}

#[test]
fn template_narrator_answers_about_named_players() {
    let m = chase_in_progress();
    let narrator = TemplateNarrator;

    let answer = narrator
        .answer_query("How did tigers player 1 do?", &m)
        .expect("answer");
    assert!(answer.contains("Tigers Player 1 scored 5 off 4 balls for Tigers"), "{answer}");

    let fallback = narrator.answer_query("Who is winning?", &m).expect("answer");
    assert_eq!(fallback, "Tigers 7/1 in 1.2 overs.");

    let line = narrator.commentate_on_last_ball(&m).expect("commentary");
    assert!(line.starts_with("1.2 Dot ball."), "{line}");
}
