//! Narrative-generation port.
//!
//! RULE: Narrative text is decorative. Scoring never waits on it, and a
//! failing or absent service must not change match state.
//!
//! The briefs below describe a frozen snapshot in plain text. A remote
//! service would send them as prompts; `TemplateNarrator` renders them
//! offline.

use crate::{
    error::{ScoreError, ScoreResult},
    event::BallEventKind,
    inning::Inning,
    match_state::{Match, MatchResult},
    stats,
};
use std::fmt::Write as _;

pub trait NarrativeService: Send {
    /// Unique stable name, used in log lines.
    fn name(&self) -> &'static str;

    fn summarize(&self, m: &Match) -> ScoreResult<String>;

    fn answer_query(&self, question: &str, m: &Match) -> ScoreResult<String>;

    fn commentate_on_last_ball(&self, m: &Match) -> ScoreResult<String>;
}

// ── Briefs ─────────────────────────────────────────────────────

fn inning_line(inning: &Inning) -> String {
    format!(
        "{} {}/{} in {} overs",
        inning.batting_team,
        inning.score,
        inning.wickets,
        inning.over_marker()
    )
}

/// Highest scorer of an inning, if anyone scored.
fn top_scorer(inning: &Inning) -> Option<String> {
    inning
        .batsmen
        .iter()
        .filter(|p| p.has_batted())
        .max_by_key(|p| p.runs)
        .map(|p| format!("{} {} ({})", p.name, p.runs, p.balls))
}

/// Most wickets, fewest runs as the tie-break.
fn top_wicket_taker(inning: &Inning) -> Option<String> {
    stats::top_bowlers(inning, 1)
        .into_iter()
        .next()
        .map(|b| format!("{} {}/{}", b.name, b.wickets, b.runs_conceded))
}

/// Full-match summary brief.
pub fn summary_brief(m: &Match) -> String {
    let mut brief = format!("{} vs {}, {} overs a side.\n", m.team_a, m.team_b, m.overs);
    for (i, inning) in m.innings.iter().enumerate() {
        let _ = writeln!(brief, "Innings {}: {}.", i + 1, inning_line(inning));
        if let Some(bat) = top_scorer(inning) {
            let _ = writeln!(brief, "  Top batsman: {bat}.");
        }
        if let Some(bowl) = top_wicket_taker(inning) {
            let _ = writeln!(brief, "  Top bowler from {}: {bowl}.", inning.bowling_team);
        }
    }
    if m.target > 0 {
        let _ = writeln!(brief, "Target: {}.", m.target);
    }
    let _ = write!(brief, "Result: {}.", m.result());
    brief
}

/// Scorecard context for answering free-form questions.
pub fn query_context(m: &Match) -> String {
    let mut ctx = String::new();
    for inning in &m.innings {
        let _ = writeln!(ctx, "{}:", inning_line(inning));
        for p in inning.batsmen.iter().filter(|p| p.has_batted()) {
            let status = p.out_by.as_deref().unwrap_or("not out");
            let _ = writeln!(
                ctx,
                "  {} {} ({}b, {}x4, {}x6) {}",
                p.name, p.runs, p.balls, p.fours, p.sixes, status
            );
        }
        for b in inning.bowlers.iter().filter(|b| b.has_bowled()) {
            let _ = writeln!(
                ctx,
                "  {} {}-{}-{}-{}",
                b.name,
                stats::overs_display(b.overs, b.balls),
                b.maidens,
                b.runs_conceded,
                b.wickets
            );
        }
    }
    ctx
}

/// Situation plus the latest ball. None before the first ball.
pub fn commentary_brief(m: &Match) -> Option<String> {
    let event = m.last_event.as_ref()?;
    let inning = m.current_inning()?;
    let mut brief = format!(
        "{} {} to {}: {:?}, {} off the bat",
        event.over, event.bowler_name, event.batsman_name, event.kind, event.runs
    );
    if let Some(method) = event.wicket_method {
        let _ = write!(brief, ", out {method}");
    }
    let _ = write!(brief, ". {}.", inning_line(inning));
    if m.is_chasing() && m.target > 0 {
        let _ = write!(
            brief,
            " Need {} from {} balls.",
            m.target.saturating_sub(inning.score),
            m.balls_remaining()
        );
    }
    Some(brief)
}

// ── Implementations ────────────────────────────────────────────

/// Offline narrator. Deterministic plain text built from the briefs.
#[derive(Debug, Default, Clone)]
pub struct TemplateNarrator;

impl NarrativeService for TemplateNarrator {
    fn name(&self) -> &'static str {
        "template"
    }

    fn summarize(&self, m: &Match) -> ScoreResult<String> {
        let mut text = summary_brief(m);
        if let MatchResult::WonByWickets { team, wickets } = m.result() {
            let _ = write!(text, " {team} chased it down with {wickets} wickets in hand.");
        }
        Ok(text)
    }

    fn answer_query(&self, question: &str, m: &Match) -> ScoreResult<String> {
        let q = question.to_lowercase();
        let mut lines: Vec<String> = Vec::new();
        for inning in &m.innings {
            for p in inning.batsmen.iter().filter(|p| q.contains(&p.name.to_lowercase())) {
                lines.push(format!(
                    "{} scored {} off {} balls for {}.",
                    p.name, p.runs, p.balls, inning.batting_team
                ));
            }
            for b in inning.bowlers.iter().filter(|b| q.contains(&b.name.to_lowercase())) {
                if b.has_bowled() {
                    lines.push(format!(
                        "{} took {}/{} in {} overs.",
                        b.name,
                        b.wickets,
                        b.runs_conceded,
                        stats::overs_display(b.overs, b.balls)
                    ));
                }
            }
        }
        if lines.is_empty() {
            return Ok(m
                .current_inning()
                .map(|i| format!("{}.", inning_line(i)))
                .unwrap_or_else(|| "The match has not started yet.".to_string()));
        }
        Ok(lines.join(" "))
    }

    fn commentate_on_last_ball(&self, m: &Match) -> ScoreResult<String> {
        let Some(event) = m.last_event.as_ref() else {
            return Ok(String::new());
        };
        let (bat, bowl) = (&event.batsman_name, &event.bowler_name);
        let line = match event.kind {
            BallEventKind::Wicket => match event.wicket_method {
                Some(method) => format!("OUT! {bat} is gone, {method}, {bowl} strikes."),
                None => format!("OUT! {bowl} removes {bat}."),
            },
            BallEventKind::Boundary if event.runs == 6 => {
                format!("SIX! {bat} sends {bowl} over the rope.")
            }
            BallEventKind::Boundary => format!("FOUR! {bat} finds the gap off {bowl}."),
            BallEventKind::Run => format!("{bat} works {bowl} away for {}.", event.runs),
            BallEventKind::Extra => format!("Extras: {bowl} gives one away to {bat}."),
            BallEventKind::Dot => format!("Dot ball. {bowl} keeps {bat} quiet."),
        };
        Ok(format!("{} {line}", event.over))
    }
}

/// Always fails. Stands in for an unreachable remote service.
#[derive(Debug, Default, Clone)]
pub struct UnavailableNarrator;

impl NarrativeService for UnavailableNarrator {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn summarize(&self, _m: &Match) -> ScoreResult<String> {
        Err(ScoreError::Narrative("service unreachable".into()))
    }

    fn answer_query(&self, _question: &str, _m: &Match) -> ScoreResult<String> {
        Err(ScoreError::Narrative("service unreachable".into()))
    }

    fn commentate_on_last_ball(&self, _m: &Match) -> ScoreResult<String> {
        Err(ScoreError::Narrative("service unreachable".into()))
    }
}
