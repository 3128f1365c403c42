//! Match setup, toss resolution and player-selection gating.

use crease_core::{
    error::ScoreError,
    inning::create_inning,
    match_state::{Match, MatchSetup, MatchStatus},
    roster::TeamSheetEntry,
    toss::TossDecision,
    types::{SelectionSlot, SQUAD_SIZE},
};

fn setup() -> MatchSetup {
    MatchSetup {
        team_a: "Lions".into(),
        team_b: "Tigers".into(),
        overs: 20,
        ..MatchSetup::default()
    }
}

fn started() -> Match {
    Match::new(setup())
        .expect("setup")
        .resolve_toss("Lions", TossDecision::Bat)
        .expect("toss")
}

#[test]
fn new_match_awaits_the_toss() {
    let m = Match::new(setup()).expect("setup");
    assert!(m.id.starts_with("match_"));
    assert_eq!(m.status, MatchStatus::AwaitingToss);
    assert!(m.innings.is_empty());
    assert_eq!(m.target, 0);
    assert_eq!(m.pending_selection(), None);
}

#[test]
fn setup_validation() {
    let cases: Vec<(&str, MatchSetup)> = vec![
        ("blank team", MatchSetup { team_a: "  ".into(), ..setup() }),
        ("same team twice", MatchSetup { team_b: "Lions".into(), ..setup() }),
        ("zero overs", MatchSetup { overs: 0, ..setup() }),
        (
            "twelve players",
            MatchSetup {
                team_a_players: (1..=12).map(|i| TeamSheetEntry::named(format!("P{i}"))).collect(),
                ..setup()
            },
        ),
        (
            "two captains",
            MatchSetup {
                team_b_players: vec![
                    TeamSheetEntry { is_captain: true, ..TeamSheetEntry::named("A") },
                    TeamSheetEntry { is_captain: true, ..TeamSheetEntry::named("B") },
                ],
                ..setup()
            },
        ),
    ];
    for (label, bad) in cases {
        let result = Match::new(bad);
        assert!(
            matches!(result, Err(ScoreError::InvalidSetup { .. })),
            "{label} should be rejected"
        );
    }
}

#[test]
fn create_inning_fills_placeholders_and_roles() {
    let batting = vec![
        TeamSheetEntry {
            photo: Some("asha.png".into()),
            is_captain: true,
            ..TeamSheetEntry::named("Asha")
        },
        TeamSheetEntry::named(""),
        TeamSheetEntry { is_wicket_keeper: true, ..TeamSheetEntry::named("Chen") },
    ];
    let bowling = vec![TeamSheetEntry { is_wicket_keeper: true, ..TeamSheetEntry::named("Ravi") }];
    let inning = create_inning("Lions", "Tigers", &batting, &bowling);

    assert_eq!(inning.batsmen.len(), SQUAD_SIZE);
    assert_eq!(inning.bowlers.len(), SQUAD_SIZE);
    assert_eq!(inning.batsmen[0].name, "Asha");
    assert_eq!(inning.batsmen[0].photo.as_deref(), Some("asha.png"));
    assert!(inning.batsmen[0].is_captain);
    assert_eq!(inning.batsmen[1].name, "Lions Player 2", "blank name becomes a placeholder");
    assert!(inning.batsmen[2].is_wicket_keeper);
    assert_eq!(inning.batsmen[10].name, "Lions Player 11");
    assert!(!inning.batsmen[10].is_captain);
    assert!(inning.bowlers[0].is_wicket_keeper);
    assert_eq!(inning.bowlers[1].name, "Tigers Player 2");

    let ids: Vec<u32> = inning.batsmen.iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=11).collect::<Vec<u32>>());
    assert_eq!((inning.score, inning.wickets, inning.overs, inning.balls), (0, 0, 0, 0));
}

#[test]
fn toss_decides_who_bats_first() {
    let m = Match::new(setup()).expect("setup");

    let bat = m.resolve_toss("Tigers", TossDecision::Bat).expect("toss");
    assert_eq!(bat.current_inning().map(|i| i.batting_team.as_str()), Some("Tigers"));

    let bowl = m.resolve_toss("Tigers", TossDecision::Bowl).expect("toss");
    let inning = bowl.current_inning().expect("inning");
    assert_eq!(inning.batting_team, "Lions");
    assert_eq!(inning.bowling_team, "Tigers");
    assert_eq!(bowl.status, MatchStatus::InProgress);
    assert_eq!(bowl.toss.as_ref().map(|t| t.winner.as_str()), Some("Tigers"));
}

#[test]
fn toss_errors() {
    let m = Match::new(setup()).expect("setup");
    let err = m.resolve_toss("Eagles", TossDecision::Bat).expect_err("not playing");
    assert!(matches!(err, ScoreError::InvalidToss { .. }));

    let started = m.resolve_toss("Lions", TossDecision::Bat).expect("toss");
    let err = started.resolve_toss("Lions", TossDecision::Bowl).expect_err("already tossed");
    assert!(matches!(err, ScoreError::MatchAlreadyStarted));
}

#[test]
fn selection_is_prompted_in_order() {
    let m = started();
    assert_eq!(m.pending_selection(), Some(SelectionSlot::Striker));
    assert_eq!(m.available_batsmen(SelectionSlot::Striker).len(), 11);

    let m = m.select_player(SelectionSlot::Striker, 4).expect("striker");
    assert_eq!(m.pending_selection(), Some(SelectionSlot::NonStriker));
    assert!(!m.available_batsmen(SelectionSlot::NonStriker).contains(&4));

    let m = m.select_player(SelectionSlot::NonStriker, 7).expect("non-striker");
    assert_eq!(m.pending_selection(), Some(SelectionSlot::Bowler));
    assert_eq!(m.available_bowlers().len(), 11);

    let m = m.select_player(SelectionSlot::Bowler, 9).expect("bowler");
    assert_eq!(m.pending_selection(), None);
    assert_eq!((m.striker, m.non_striker, m.bowler), (Some(4), Some(7), Some(9)));
}

#[test]
fn selection_errors() {
    let m = started();
    let err = m.select_player(SelectionSlot::Striker, 12).expect_err("no such player");
    assert!(matches!(err, ScoreError::PlayerNotFound { player_id: 12, .. }));

    let m = m.select_player(SelectionSlot::Striker, 1).expect("striker");
    let err = m.select_player(SelectionSlot::NonStriker, 1).expect_err("same batsman");
    assert!(matches!(err, ScoreError::PlayerAlreadySelected { player_id: 1 }));

    let err = Match::new(setup())
        .expect("setup")
        .select_player(SelectionSlot::Bowler, 1)
        .expect_err("toss pending");
    assert!(matches!(err, ScoreError::MatchNotStarted));
}

#[test]
fn dismissed_batsman_cannot_return() {
    use crease_core::{
        ball_processor::apply_ball,
        delivery::{Delivery, DismissalMethod, Wicket},
        simulation::auto_select,
    };

    let m = auto_select(started()).expect("selection");
    let (m, _) = apply_ball(&m, &Delivery::dot().with_wicket(Wicket::new(DismissalMethod::Bowled)))
        .expect("ball");
    let err = m.select_player(SelectionSlot::Striker, 1).expect_err("already out");
    assert!(matches!(err, ScoreError::PlayerAlreadyOut { player_id: 1 }));
    assert!(!m.available_batsmen(SelectionSlot::Striker).contains(&1));
}

#[test]
fn bowler_cannot_change_mid_over() {
    use crease_core::{ball_processor::apply_ball, delivery::Delivery, simulation::auto_select};

    let m = auto_select(started()).expect("selection");
    let (m, _) = apply_ball(&m, &Delivery::dot()).expect("ball");
    let err = m.select_player(SelectionSlot::Bowler, 3).expect_err("mid-over");
    assert!(matches!(err, ScoreError::OverInProgress { bowler_id: 11 }));
    assert!(m.select_player(SelectionSlot::Bowler, 11).is_ok(), "re-selecting is harmless");
}
