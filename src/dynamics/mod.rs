//! Best-response dynamics for the bilateral bargaining game.
//!
//! # Overview
//!
//! A Proposer (Player 1) repeatedly offers a transfer `offer`; a Responder
//! (Player 2) accepts with a logistic probability whose decisiveness is set
//! by its parameter `alpha`. Each side's strategy parameter is re-optimized
//! in turn against the other's most recent value:
//!
//! 1. Score a candidate parameter with a finite-horizon expected-utility
//!    recursion (backward induction over the accept/reject tree).
//! 2. Maximize that score over the parameter's admissible interval with a
//!    bounded one-dimensional optimizer.
//! 3. Alternate offer and alpha updates for a fixed number of steps and
//!    record the trajectory.
//!
//! Level-k variants replace a player's plain best response with one that
//! anticipates the opponent's best-response function: the objective for a
//! candidate parameter is evaluated at the reply the opponent would choose
//! against it, nesting one scalar optimization inside another.
//!
//! # Usage
//!
//! ```
//! use bargain_solver::dynamics::{BargainConfig, BestResponseDynamics, UpdateRule};
//!
//! let config = BargainConfig::default().with_p_bump(0.1);
//! let dynamics = BestResponseDynamics::new(config, UpdateRule::LevelKBoth).unwrap();
//! let trajectory = dynamics.run(50.0, 0.1, 20).unwrap();
//!
//! let last = trajectory.last();
//! println!("offer = {:.3}, alpha = {:.4}", last.offer, last.alpha);
//! ```
//!
//! # Update rules
//!
//! | Rule               | Offer update                  | Alpha update            |
//! |--------------------|-------------------------------|-------------------------|
//! | `Myopic`           | horizon recursion, fixed p    | one-shot best response  |
//! | `RejectBump`       | horizon recursion, bumped p   | one-shot best response  |
//! | `LevelKResponder`  | horizon recursion, bumped p   | level-k (anticipating)  |
//! | `LevelKBoth`       | level-k (anticipating)        | level-k (anticipating)  |
//!
//! The driver never checks for convergence; it runs exactly the requested
//! number of steps and leaves convergence as a property of the recorded
//! trajectory.

pub mod accept;
pub mod best_response;
pub mod config;
pub mod driver;
pub mod optimize;
pub mod utility;

// Re-export main types for convenient access
pub use accept::{p_accept, responder_utility, sigmoid};
pub use best_response::{
    best_alpha, best_alpha_given_offer, best_alpha_level_k, best_offer, best_offer_level_k,
};
pub use config::{BargainConfig, ConfigError, TrajectoryStats, MAX_DEPTH};
pub use driver::{
    BestResponseDynamics, DynamicsError, Trajectory, TrajectoryPoint, UpdateRule,
};
pub use optimize::{maximize_scalar, minimize_scalar, OptimizeError, ScalarOptimum};
pub use utility::{proposer_utility, responder_utility_horizon, SwitchRule};
