//! Round-based bargaining game engine.
//!
//! Two players alternate between proposer and receiver roles. Each round
//! the proposer makes an offer, the receiver accepts or rejects, utilities
//! settle, and control of the game may switch hands. Rejection can bump the
//! switch probability up for subsequent rounds; acceptance optionally
//! resets it to the baseline.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::dynamics::config::ConfigError;
use crate::game::proposers::ProposerStrategy;
use crate::game::responders::ResponderStrategy;

/// Seat identifiers for the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    /// Player 1 (starts as proposer).
    Player1,
    /// Player 2 (starts as receiver).
    Player2,
}

impl Seat {
    /// The opposite seat.
    pub fn other(&self) -> Seat {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }

    fn index(&self) -> usize {
        match self {
            Seat::Player1 => 0,
            Seat::Player2 => 1,
        }
    }
}

/// Structural parameters of the round game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Baseline probability that control switches after a round.
    pub p_switch: f64,

    /// Added to the current switch probability on each rejection (capped
    /// at 1.0).
    pub p_reject_bump: f64,

    /// Whether acceptance resets the switch probability to the baseline.
    pub p_reset_on_accept: bool,

    /// Player 1's base penalty when a round ends in rejection.
    pub player1_bad: f64,

    /// Player 2's base penalty when a round ends in rejection.
    pub player2_bad: f64,

    /// Extra rejection cost borne by whoever proposed that round.
    pub proposer_bad: f64,

    /// Extra rejection cost (typically positive, a relative gain) for
    /// whoever received the offer.
    pub receiver_bad: f64,

    /// Smallest admissible offer.
    pub min_offer: f64,

    /// Largest admissible offer.
    pub max_offer: f64,

    /// Uniform random penalty range added to the proposer on rejection.
    /// `(0.0, 0.0)` disables it.
    pub proposer_penalty_range: (f64, f64),

    /// Uniform random penalty range added to the receiver on rejection.
    pub receiver_penalty_range: (f64, f64),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            p_switch: 0.3,
            p_reject_bump: 0.0,
            p_reset_on_accept: true,
            player1_bad: -75.0,
            player2_bad: -75.0,
            proposer_bad: -10.0,
            receiver_bad: 10.0,
            min_offer: 0.0,
            max_offer: 100.0,
            proposer_penalty_range: (0.0, 0.0),
            receiver_penalty_range: (0.0, 0.0),
        }
    }
}

impl GameConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.p_switch) || !self.p_switch.is_finite() {
            return Err(ConfigError::InvalidProbability("p_switch", self.p_switch));
        }
        if self.p_reject_bump < 0.0 || !self.p_reject_bump.is_finite() {
            return Err(ConfigError::InvalidProbability(
                "p_reject_bump",
                self.p_reject_bump,
            ));
        }
        if self.min_offer >= self.max_offer
            || !self.min_offer.is_finite()
            || !self.max_offer.is_finite()
        {
            return Err(ConfigError::InvalidBounds(
                "offer range",
                self.min_offer,
                self.max_offer,
            ));
        }
        for (name, range) in [
            ("proposer_penalty_range", self.proposer_penalty_range),
            ("receiver_penalty_range", self.receiver_penalty_range),
        ] {
            if range.0 > range.1 || !range.0.is_finite() || !range.1.is_finite() {
                return Err(ConfigError::InvalidBounds(name, range.0, range.1));
            }
        }
        Ok(())
    }
}

/// What an acting strategy is allowed to see of the game each call.
///
/// Built fresh per call for the acting player and its current role, so
/// strategies never hold a reference into the game itself.
#[derive(Debug, Clone, Copy)]
pub struct RoundContext {
    /// Smallest admissible offer.
    pub min_offer: f64,
    /// Largest admissible offer.
    pub max_offer: f64,
    /// The acting player's payoff if this round ends in rejection, for its
    /// current role (base penalty plus the role-specific cost).
    pub reject_utility: f64,
    /// Baseline switch probability.
    pub p_base: f64,
    /// Switch probability in effect this round.
    pub p_current: f64,
    /// Rejection bump on the switch probability.
    pub p_reject_bump: f64,
}

/// A participant with a name, two strategies, and accumulated utility.
pub struct Player {
    /// Display name.
    pub name: String,
    /// Offer-making strategy, used while this player holds control.
    pub proposer: Box<dyn ProposerStrategy>,
    /// Accept/reject strategy, used while the opponent holds control.
    pub responder: Box<dyn ResponderStrategy>,
    /// Cumulative utility across all rounds played.
    pub utility: f64,
}

impl Player {
    /// Create a player from a name and a strategy pair.
    pub fn new(
        name: impl Into<String>,
        proposer: Box<dyn ProposerStrategy>,
        responder: Box<dyn ResponderStrategy>,
    ) -> Self {
        Self {
            name: name.into(),
            proposer,
            responder,
            utility: 0.0,
        }
    }
}

/// One round of history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number.
    pub round: u32,
    /// Name of that round's proposer.
    pub proposer: String,
    /// The offer made.
    pub offer: f64,
    /// Whether the receiver accepted.
    pub accepted: bool,
    /// Player 1's cumulative utility after the round.
    pub player1_utility: f64,
    /// Player 2's cumulative utility after the round.
    pub player2_utility: f64,
    /// Switch probability in effect for the next round.
    pub next_switch_prob: f64,
}

/// The two-player round game.
pub struct Game {
    config: GameConfig,
    players: [Player; 2],
    proposer_seat: Seat,
    p_current: f64,
    history: Vec<RoundRecord>,
    rng: StdRng,
}

impl Game {
    /// Create a game. A seed makes the run reproducible; `None` draws one
    /// from entropy.
    pub fn new(
        config: GameConfig,
        player1: Player,
        player2: Player,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let p_current = config.p_switch;
        Ok(Self {
            config,
            players: [player1, player2],
            proposer_seat: Seat::Player1,
            p_current,
            history: Vec::new(),
            rng,
        })
    }

    /// Play a single round: offer, response, settlement, history, feedback,
    /// and a chance for control to switch.
    pub fn play_round(&mut self) {
        let pi = self.proposer_seat.index();
        let ri = self.proposer_seat.other().index();

        let proposer_ctx = self.context_for(pi, true);
        let offer = self.players[pi].proposer.propose(&proposer_ctx, &mut self.rng);

        // Some proposer strategies key off what the other side proposes.
        self.players[ri].proposer.observe_opponent_offer(offer);

        let receiver_ctx = self.context_for(ri, false);
        let accepted = self.players[ri]
            .responder
            .respond(offer, &receiver_ctx, &mut self.rng);

        if accepted {
            if self.config.p_reset_on_accept {
                self.p_current = self.config.p_switch;
            }
            self.players[pi].utility += offer;
            self.players[ri].utility -= offer;
        } else {
            self.p_current = (self.p_current + self.config.p_reject_bump).min(1.0);

            let proposer_penalty = self.bad_utility(pi, true)
                + sample_uniform(self.config.proposer_penalty_range, &mut self.rng);
            let receiver_penalty = self.bad_utility(ri, false)
                + sample_uniform(self.config.receiver_penalty_range, &mut self.rng);

            self.players[pi].utility += proposer_penalty;
            self.players[ri].utility += receiver_penalty;
        }

        self.history.push(RoundRecord {
            round: self.history.len() as u32 + 1,
            proposer: self.players[pi].name.clone(),
            offer,
            accepted,
            player1_utility: self.players[0].utility,
            player2_utility: self.players[1].utility,
            next_switch_prob: self.p_current,
        });

        self.players[pi].proposer.feedback(accepted, offer, &proposer_ctx);
        self.players[ri].responder.feedback(offer, accepted);

        self.maybe_switch_roles();
    }

    /// Play a fixed number of rounds.
    pub fn run(&mut self, n_rounds: u32) {
        for _ in 0..n_rounds {
            self.play_round();
        }
    }

    /// Control switches with the current switch probability.
    fn maybe_switch_roles(&mut self) {
        if self.rng.gen::<f64>() < self.p_current {
            self.proposer_seat = self.proposer_seat.other();
        }
    }

    /// A player's total rejection payoff for the given role.
    fn bad_utility(&self, index: usize, is_proposer: bool) -> f64 {
        let base = if index == 0 {
            self.config.player1_bad
        } else {
            self.config.player2_bad
        };
        let role_cost = if is_proposer {
            self.config.proposer_bad
        } else {
            self.config.receiver_bad
        };
        base + role_cost
    }

    fn context_for(&self, index: usize, is_proposer: bool) -> RoundContext {
        RoundContext {
            min_offer: self.config.min_offer,
            max_offer: self.config.max_offer,
            reject_utility: self.bad_utility(index, is_proposer),
            p_base: self.config.p_switch,
            p_current: self.p_current,
            p_reject_bump: self.config.p_reject_bump,
        }
    }

    /// Seat currently holding proposer control.
    pub fn proposer_seat(&self) -> Seat {
        self.proposer_seat
    }

    /// Round history so far.
    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    /// Cumulative utilities as (player 1, player 2).
    pub fn utilities(&self) -> (f64, f64) {
        (self.players[0].utility, self.players[1].utility)
    }

    /// Number of rejected offers so far.
    pub fn rejections(&self) -> u32 {
        self.history.iter().filter(|r| !r.accepted).count() as u32
    }
}

fn sample_uniform((lo, hi): (f64, f64), rng: &mut StdRng) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
