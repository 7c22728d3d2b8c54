//! Round-robin strategy tournament.
//!
//! Every (proposer, responder) strategy pair for seat 1 is matched against
//! every pair for seat 2, with a configurable number of independent trials
//! per matchup. Trials run in parallel; each gets its own game seeded from
//! the tournament seed, so a run is reproducible end to end.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dynamics::config::ConfigError;
use crate::game::proposers::{
    BinarySearchProposer, ConcedingProposer, ForwardLookingProposer, LearningProposer,
    ProposerStrategy, RandomProposer, RiskAwareProposer, TitForTatProposer,
};
use crate::game::responders::{
    ProbabilisticResponder, ResponderStrategy, StrategicRejectorResponder, TitForTatResponder,
    UtilitarianResponder,
};
use crate::game::round::{Game, GameConfig, Player};

/// Buildable proposer strategies for tournament play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProposerKind {
    /// [`ConcedingProposer`] with a start offer and decrement.
    Conceding {
        /// Opening offer.
        start: f64,
        /// Concession per rejection.
        decrement: f64,
    },
    /// [`RandomProposer`] drawing uniformly over the offer range.
    RandomUniform,
    /// [`RandomProposer`] drawing from a normal distribution.
    RandomNormal {
        /// Distribution mean.
        mean: f64,
        /// Distribution standard deviation.
        stddev: f64,
    },
    /// [`TitForTatProposer`].
    TitForTat,
    /// [`LearningProposer`] with a start offer and step size.
    Learning {
        /// Opening offer.
        start: f64,
        /// Step applied after each round.
        step: f64,
    },
    /// [`BinarySearchProposer`] over the game's offer range.
    BinarySearch,
    /// [`RiskAwareProposer`] over the default offer grid.
    RiskAware,
    /// [`ForwardLookingProposer`] with default priors.
    ForwardLooking,
}

impl ProposerKind {
    /// Name used in match records.
    pub fn name(&self) -> &'static str {
        match self {
            ProposerKind::Conceding { .. } => "conceding",
            ProposerKind::RandomUniform => "random_uniform",
            ProposerKind::RandomNormal { .. } => "random_normal",
            ProposerKind::TitForTat => "tit_for_tat",
            ProposerKind::Learning { .. } => "learning",
            ProposerKind::BinarySearch => "binary_search",
            ProposerKind::RiskAware => "risk_aware",
            ProposerKind::ForwardLooking => "forward_looking",
        }
    }

    /// Build a fresh strategy instance for one game.
    pub fn build(&self, game: &GameConfig) -> Result<Box<dyn ProposerStrategy>, ConfigError> {
        Ok(match self {
            ProposerKind::Conceding { start, decrement } => {
                Box::new(ConcedingProposer::new(*start, *decrement))
            }
            ProposerKind::RandomUniform => Box::new(RandomProposer::uniform()),
            ProposerKind::RandomNormal { mean, stddev } => {
                Box::new(RandomProposer::normal(*mean, *stddev)?)
            }
            ProposerKind::TitForTat => Box::new(TitForTatProposer::new()),
            ProposerKind::Learning { start, step } => {
                Box::new(LearningProposer::new(*start, *step))
            }
            ProposerKind::BinarySearch => {
                Box::new(BinarySearchProposer::new(game.min_offer, game.max_offer))
            }
            ProposerKind::RiskAware => Box::new(RiskAwareProposer::new()),
            ProposerKind::ForwardLooking => Box::new(ForwardLookingProposer::new()),
        })
    }
}

/// Buildable responder strategies for tournament play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResponderKind {
    /// [`UtilitarianResponder`].
    Utilitarian,
    /// [`TitForTatResponder`].
    TitForTat,
    /// [`ProbabilisticResponder`] at a given decisiveness.
    Probabilistic {
        /// Logistic decisiveness parameter.
        alpha: f64,
    },
    /// [`StrategicRejectorResponder`] with default tolerance.
    StrategicRejector,
}

impl ResponderKind {
    /// Name used in match records.
    pub fn name(&self) -> &'static str {
        match self {
            ResponderKind::Utilitarian => "utilitarian",
            ResponderKind::TitForTat => "tit_for_tat",
            ResponderKind::Probabilistic { .. } => "probabilistic",
            ResponderKind::StrategicRejector => "strategic_rejector",
        }
    }

    /// Build a fresh strategy instance for one game.
    pub fn build(&self) -> Box<dyn ResponderStrategy> {
        match self {
            ResponderKind::Utilitarian => Box::new(UtilitarianResponder),
            ResponderKind::TitForTat => Box::new(TitForTatResponder::new()),
            ResponderKind::Probabilistic { alpha } => {
                Box::new(ProbabilisticResponder::new(*alpha))
            }
            ResponderKind::StrategicRejector => Box::new(StrategicRejectorResponder::new()),
        }
    }
}

/// Tournament parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentConfig {
    /// Rounds played per game.
    pub rounds_per_game: u32,
    /// Independent games per matchup.
    pub trials_per_match: u32,
    /// Base seed; each trial derives its own from it.
    pub seed: u64,
    /// Structural parameters shared by every game.
    pub game: GameConfig,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            rounds_per_game: 100,
            trials_per_match: 50,
            seed: 0,
            game: GameConfig::default(),
        }
    }
}

/// Result of one trial of one matchup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Player 1's proposer strategy name.
    pub p1_proposer: String,
    /// Player 1's responder strategy name.
    pub p1_responder: String,
    /// Player 2's proposer strategy name.
    pub p2_proposer: String,
    /// Player 2's responder strategy name.
    pub p2_responder: String,
    /// Trial index within the matchup.
    pub trial: u32,
    /// Player 1's final utility.
    pub p1_utility: f64,
    /// Player 2's final utility.
    pub p2_utility: f64,
    /// Rejected offers over the whole game.
    pub rejections: u32,
}

/// Number of trials a tournament over these strategy sets will run.
pub fn trial_count(
    proposers: &[ProposerKind],
    responders: &[ResponderKind],
    config: &TournamentConfig,
) -> u64 {
    let pairs = (proposers.len() * responders.len()) as u64;
    pairs * pairs * config.trials_per_match as u64
}

/// Run the full round-robin tournament.
pub fn run_tournament(
    proposers: &[ProposerKind],
    responders: &[ResponderKind],
    config: &TournamentConfig,
) -> Result<Vec<MatchRecord>, ConfigError> {
    run_tournament_with(proposers, responders, config, |_| {})
}

/// Run the tournament, invoking `on_record` as each trial finishes.
///
/// The callback runs on worker threads; it is meant for progress tracking,
/// not for collecting results (those are returned).
pub fn run_tournament_with<F>(
    proposers: &[ProposerKind],
    responders: &[ResponderKind],
    config: &TournamentConfig,
    on_record: F,
) -> Result<Vec<MatchRecord>, ConfigError>
where
    F: Fn(&MatchRecord) + Sync,
{
    config.game.validate()?;

    // Strategy pairs per seat, then the full matchup product.
    let pairs: Vec<(&ProposerKind, &ResponderKind)> = proposers
        .iter()
        .flat_map(|p| responders.iter().map(move |r| (p, r)))
        .collect();

    let mut trials = Vec::new();
    for (m, p1_pair) in pairs.iter().enumerate() {
        for (n, p2_pair) in pairs.iter().enumerate() {
            for trial in 0..config.trials_per_match {
                let matchup_index = (m * pairs.len() + n) as u64;
                trials.push((*p1_pair, *p2_pair, trial, matchup_index));
            }
        }
    }

    trials
        .par_iter()
        .map(|&((p1_prop, p1_resp), (p2_prop, p2_resp), trial, matchup_index)| {
            // Distinct, stable seed per trial.
            let seed = config
                .seed
                .wrapping_add(matchup_index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
                .wrapping_add(trial as u64);

            let player1 = Player::new(
                "Player 1",
                p1_prop.build(&config.game)?,
                p1_resp.build(),
            );
            let player2 = Player::new(
                "Player 2",
                p2_prop.build(&config.game)?,
                p2_resp.build(),
            );

            let mut game = Game::new(config.game.clone(), player1, player2, Some(seed))?;
            game.run(config.rounds_per_game);

            let (p1_utility, p2_utility) = game.utilities();
            let record = MatchRecord {
                p1_proposer: p1_prop.name().to_string(),
                p1_responder: p1_resp.name().to_string(),
                p2_proposer: p2_prop.name().to_string(),
                p2_responder: p2_resp.name().to_string(),
                trial,
                p1_utility,
                p2_utility,
                rejections: game.rejections(),
            };
            on_record(&record);
            Ok(record)
        })
        .collect()
}
