//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulator may call any platform RNG.
//! All randomness flows through a `DeliveryRng` seeded from one u64,
//! so a seed fully reproduces a simulated match.

use crate::{
    delivery::{Delivery, DismissalMethod, Wicket},
    toss::{Toss, TossDecision},
};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Outcome weights for one simulated delivery, in percent.
/// Must sum to 100.
const OUTCOME_WEIGHTS: [(Outcome, u32); 11] = [
    (Outcome::Dot, 30),
    (Outcome::Runs(1), 25),
    (Outcome::Runs(2), 9),
    (Outcome::Runs(3), 2),
    (Outcome::Runs(4), 10),
    (Outcome::Runs(6), 5),
    (Outcome::Wide, 4),
    (Outcome::NoBall, 2),
    (Outcome::Bye, 2),
    (Outcome::LegBye, 6),
    (Outcome::Wicket, 5),
];

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Dot,
    Runs(u32),
    Wide,
    NoBall,
    Bye,
    LegBye,
    Wicket,
}

pub struct DeliveryRng {
    inner: Pcg64Mcg,
}

impl DeliveryRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Draw one delivery. `fielders` names the fielding side; a catch,
    /// stumping or run out credits one of them.
    pub fn next_delivery(&mut self, fielders: &[String]) -> Delivery {
        match self.pick_outcome() {
            Outcome::Dot => Delivery::dot(),
            Outcome::Runs(r) => Delivery::runs(r),
            Outcome::Wide => Delivery::wide(1),
            Outcome::NoBall => {
                let off_bat = if self.chance(0.3) { 1 } else { 0 };
                Delivery::no_ball(off_bat, 1)
            }
            Outcome::Bye => Delivery::byes(1 + self.next_u64_below(2) as u32),
            Outcome::LegBye => Delivery::leg_byes(1),
            Outcome::Wicket => Delivery::dot().with_wicket(self.next_wicket(fielders)),
        }
    }

    /// Coin toss between two teams, with a random decision.
    pub fn toss(&mut self, team_a: &str, team_b: &str) -> Toss {
        let winner = if self.chance(0.5) { team_a } else { team_b };
        let decision = if self.chance(0.5) {
            TossDecision::Bat
        } else {
            TossDecision::Bowl
        };
        Toss {
            winner: winner.to_string(),
            decision,
        }
    }

    fn pick_outcome(&mut self) -> Outcome {
        let mut roll = self.next_u64_below(100) as u32;
        for (outcome, weight) in OUTCOME_WEIGHTS {
            if roll < weight {
                return outcome;
            }
            roll -= weight;
        }
        Outcome::Dot
    }

    fn next_wicket(&mut self, fielders: &[String]) -> Wicket {
        let all = DismissalMethod::ALL;
        let method = all[self.next_u64_below(all.len() as u64) as usize];
        if !method.involves_fielder() || fielders.is_empty() {
            return Wicket::new(method);
        }
        let fielder = &fielders[self.next_u64_below(fielders.len() as u64) as usize];
        Wicket::by(method, fielder.clone())
    }
}
