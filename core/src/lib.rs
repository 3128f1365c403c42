//! Ball-by-ball scoring for limited-overs cricket.
//!
//! LAYERS (leaves first):
//!   roster, inning, match_state   the match document
//!   ball_processor                the pure per-ball transition
//!   stats, profile                derived views and career aggregates
//!   repository, narrative         ports to the outside world
//!   store                         SQLite implementation of the repository
//!   engine                        `ScoringSession`, the only port caller

pub mod ball_processor;
pub mod config;
pub mod delivery;
pub mod engine;
pub mod error;
pub mod event;
pub mod inning;
pub mod match_state;
pub mod narrative;
pub mod profile;
pub mod repository;
pub mod rng;
pub mod roster;
pub mod simulation;
pub mod stats;
pub mod store;
pub mod toss;
pub mod tournament;
pub mod types;

pub use ball_processor::apply_ball;
pub use delivery::{Delivery, DismissalMethod, Extra, ExtraKind, Wicket};
pub use engine::ScoringSession;
pub use error::{ScoreError, ScoreResult};
pub use event::{BallEventKind, LastEvent, MatchEvent, TransitionSignal};
pub use inning::{create_inning, Inning};
pub use match_state::{Match, MatchResult, MatchSetup, MatchStatus};
pub use profile::{fold_match_into_profiles, rebuild_profiles, PlayerProfile};
pub use toss::{Toss, TossDecision};
pub use types::{PlayerId, SelectionSlot};
