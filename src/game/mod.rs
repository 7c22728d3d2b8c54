//! Round-based bargaining game implementations.
//!
//! Where the [`dynamics`] module studies strategy parameters analytically,
//! this module actually plays the game: named players with pluggable
//! proposer and responder strategies, round-by-round settlement with role
//! switching, and a round-robin tournament harness for comparing strategy
//! populations.
//!
//! [`dynamics`]: crate::dynamics

pub mod proposers;
pub mod responders;
pub mod round;
pub mod tournament;

// Re-export main types for convenient access
pub use proposers::{
    BinarySearchProposer, ConcedingProposer, ForwardLookingProposer, LearningProposer,
    ProposerStrategy, RandomProposer, RiskAwareProposer, TitForTatProposer,
};
pub use responders::{
    ProbabilisticResponder, ResponderStrategy, StrategicRejectorResponder, TitForTatResponder,
    UtilitarianResponder,
};
pub use round::{Game, GameConfig, Player, RoundContext, RoundRecord, Seat};
pub use tournament::{
    run_tournament, run_tournament_with, trial_count, MatchRecord, ProposerKind, ResponderKind,
    TournamentConfig,
};
