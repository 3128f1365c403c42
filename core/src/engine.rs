//! The scoring session: one live match wired to its ports.
//!
//! EXECUTION ORDER per accepted ball (fixed, never reordered):
//!   1. Pure transition          (`apply_ball`; a rejection stops here)
//!   2. Replace the held match
//!   3. Event log                (ball, then innings break / completion)
//!   4. Save the live match
//!   5. Commentary               (narrative port, feed trimmed to config)
//!
//! RULES:
//!   - Steps 3–5 are best-effort. A failing port is logged and skipped;
//!     it never rolls back or blocks the transition in step 2.
//!   - The session is the only caller of `MatchRepository` and
//!     `NarrativeService`. The engine functions never see them.

use crate::{
    ball_processor::apply_ball,
    config::ScorerConfig,
    delivery::Delivery,
    error::{ScoreError, ScoreResult},
    event::{BallEventKind, EventLogEntry, MatchEvent, TransitionSignal},
    match_state::{Match, MatchSetup, MatchStatus},
    narrative::NarrativeService,
    profile::fold_match_into_profiles,
    repository::MatchRepository,
    toss::TossDecision,
    types::{PlayerId, SelectionSlot},
};
use std::collections::VecDeque;

pub struct ScoringSession {
    config:     ScorerConfig,
    current:    Match,
    store:      Box<dyn MatchRepository>,
    narrator:   Option<Box<dyn NarrativeService>>,
    commentary: VecDeque<String>,
    /// Set once `finish` has archived the match.
    finished:   bool,
}

impl ScoringSession {
    /// Create a new match and register it as live.
    /// `setup.overs == 0` takes the configured default.
    pub fn start(
        config: ScorerConfig,
        mut setup: MatchSetup,
        store: Box<dyn MatchRepository>,
        narrator: Option<Box<dyn NarrativeService>>,
    ) -> ScoreResult<Self> {
        if setup.overs == 0 {
            setup.overs = config.match_format.default_overs;
        }
        if setup.overs > config.match_format.max_overs {
            return Err(ScoreError::InvalidSetup {
                reason: format!(
                    "{} overs exceeds the limit of {}",
                    setup.overs, config.match_format.max_overs
                ),
            });
        }
        let current = Match::new(setup)?;
        log::info!(
            "match {} created: {} vs {}, {} overs",
            current.id,
            current.team_a,
            current.team_b,
            current.overs
        );

        let session = Self::wire(config, current, store, narrator);
        session.record(&MatchEvent::MatchCreated {
            team_a: session.current.team_a.clone(),
            team_b: session.current.team_b.clone(),
            overs:  session.current.overs,
        });
        session.persist_live();
        Ok(session)
    }

    /// Pick a live match back up from the store.
    pub fn resume(
        config: ScorerConfig,
        match_id: &str,
        store: Box<dyn MatchRepository>,
        narrator: Option<Box<dyn NarrativeService>>,
    ) -> ScoreResult<Self> {
        let current = store
            .load_live_matches()?
            .into_iter()
            .find(|m| m.id == match_id)
            .ok_or_else(|| ScoreError::MatchNotFound {
                match_id: match_id.to_string(),
            })?;
        log::info!("match {} resumed at version {}", current.id, current.version);
        Ok(Self::wire(config, current, store, narrator))
    }

    fn wire(
        config: ScorerConfig,
        current: Match,
        store: Box<dyn MatchRepository>,
        narrator: Option<Box<dyn NarrativeService>>,
    ) -> Self {
        let narrator = narrator.filter(|_| config.narrative.enabled);
        Self {
            config,
            current,
            store,
            narrator,
            commentary: VecDeque::new(),
            finished: false,
        }
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn match_state(&self) -> &Match {
        &self.current
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Commentary lines, newest first.
    pub fn commentary(&self) -> impl Iterator<Item = &str> {
        self.commentary.iter().map(String::as_str)
    }

    /// For inspection in tests and tooling.
    pub fn repository(&self) -> &dyn MatchRepository {
        self.store.as_ref()
    }

    // ── Transitions ────────────────────────────────────────────

    pub fn resolve_toss(&mut self, winner: &str, decision: TossDecision) -> ScoreResult<()> {
        self.current = self.current.resolve_toss(winner, decision)?;
        log::info!("{} won the toss and chose to {:?}", winner, decision);
        self.record(&MatchEvent::TossResolved {
            winner: winner.to_string(),
            decision,
        });
        self.persist_live();
        Ok(())
    }

    pub fn select(&mut self, slot: SelectionSlot, player_id: PlayerId) -> ScoreResult<()> {
        self.current = self.current.select_player(slot, player_id)?;
        let name = self.selected_name(slot, player_id);
        log::debug!("{slot}: {name}");
        self.record(&MatchEvent::PlayerSelected { slot, player_id, name });
        self.persist_live();
        Ok(())
    }

    /// Score one delivery. Returns what the caller must do next.
    pub fn bowl(&mut self, delivery: &Delivery) -> ScoreResult<TransitionSignal> {
        let inning_index = self.current.current_inning;
        let (next, signal) = apply_ball(&self.current, delivery)?;
        self.current = next;

        let inning = &self.current.innings[inning_index];
        let (over, kind) = self
            .current
            .last_event
            .as_ref()
            .map_or((String::new(), BallEventKind::Dot), |e| (e.over.clone(), e.kind));
        self.record(&MatchEvent::BallBowled {
            inning: inning_index,
            over,
            delivery: delivery.clone(),
            kind,
            score: inning.score,
            wickets: inning.wickets,
            signal,
        });
        match signal {
            TransitionSignal::InningsBreak => self.record(&MatchEvent::InningsBreak {
                target: self.current.target,
            }),
            TransitionSignal::MatchComplete => self.record(&MatchEvent::MatchCompleted {
                result: self.current.result().to_string(),
            }),
            TransitionSignal::None => {}
        }
        self.persist_live();
        self.refresh_commentary();
        Ok(signal)
    }

    /// Close out a completed match: award, fold profiles, archive.
    /// Runs once; profiles are folded exactly once per match.
    pub fn finish(&mut self, man_of_the_match: Option<&str>) -> ScoreResult<()> {
        if self.current.status != MatchStatus::Complete {
            return Err(ScoreError::MatchNotComplete);
        }
        if self.finished {
            return Err(ScoreError::MatchAlreadyFinished);
        }
        if let Some(name) = man_of_the_match {
            self.current = self.current.award_man_of_the_match(name)?;
            if let Some(motm) = &self.current.man_of_the_match {
                self.record(&MatchEvent::ManOfTheMatchAwarded {
                    name:      motm.name.clone(),
                    team_name: motm.team_name.clone(),
                });
            }
        }

        match self.store.load_player_profiles() {
            Ok(profiles) => {
                let folded = fold_match_into_profiles(&self.current, profiles);
                self.best_effort("save player profiles", |s| s.save_player_profiles(&folded));
            }
            Err(e) => log::warn!(
                "match {}: profiles not updated, load failed: {e}",
                self.current.id
            ),
        }
        let current = &self.current;
        self.best_effort("save completed match", |s| s.save_completed_match(current));
        self.best_effort("remove live match", |s| s.remove_live_match(&current.id));
        log::info!("match {} archived: {}", current.id, current.result());
        self.finished = true;
        Ok(())
    }

    /// Drop the match without a result.
    pub fn abandon(self) {
        self.record(&MatchEvent::MatchAbandoned);
        let id = &self.current.id;
        self.best_effort("remove live match", |s| s.remove_live_match(id));
        log::info!("match {id} abandoned");
    }

    // ── Narrative ──────────────────────────────────────────────

    pub fn summarize(&self) -> ScoreResult<String> {
        self.narrator()?.summarize(&self.current)
    }

    pub fn ask(&self, question: &str) -> ScoreResult<String> {
        self.narrator()?.answer_query(question, &self.current)
    }

    fn narrator(&self) -> ScoreResult<&dyn NarrativeService> {
        self.narrator
            .as_deref()
            .ok_or_else(|| ScoreError::Narrative("no narrative service configured".into()))
    }

    fn refresh_commentary(&mut self) {
        let Some(narrator) = self.narrator.as_deref() else {
            return;
        };
        let line = match narrator.commentate_on_last_ball(&self.current) {
            Ok(line) if !line.is_empty() => line,
            Ok(_) => return,
            Err(e) => {
                log::warn!("{} commentary failed: {e}", narrator.name());
                match &self.config.narrative.fallback_line {
                    Some(fallback) => fallback.clone(),
                    None => return,
                }
            }
        };
        self.commentary.push_front(line);
        self.commentary.truncate(self.config.narrative.commentary_feed_len);
    }

    // ── Side effects ───────────────────────────────────────────

    fn selected_name(&self, slot: SelectionSlot, player_id: PlayerId) -> String {
        let inning = self.current.current_inning();
        let name = match slot {
            SelectionSlot::Bowler => inning.and_then(|i| i.bowler(player_id)).map(|b| &b.name),
            _ => inning.and_then(|i| i.batsman(player_id)).map(|p| &p.name),
        };
        name.cloned().unwrap_or_default()
    }

    fn record(&self, event: &MatchEvent) {
        if !self.config.store.event_log {
            return;
        }
        let entry = match EventLogEntry::new(&self.current.id, self.current.version, event) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("match {}: {} not logged: {e}", self.current.id, event.type_name());
                return;
            }
        };
        self.best_effort(event.type_name(), |s| s.append_event(&entry));
    }

    fn persist_live(&self) {
        self.best_effort("save live match", |s| s.save_live_match(&self.current));
    }

    /// Run one port call. Failures are logged and swallowed.
    fn best_effort<F>(&self, what: &str, call: F)
    where
        F: FnOnce(&dyn MatchRepository) -> ScoreResult<()>,
    {
        if let Err(e) = call(self.store.as_ref()) {
            log::warn!("match {}: {what} failed: {e}", self.current.id);
        }
    }
}
