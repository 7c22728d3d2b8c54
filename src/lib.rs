//! # Bargain Solver
//!
//! Best-response dynamics for a bilateral bargaining game under
//! uncertainty: a Proposer picks an offer, a Responder accepts with a
//! logistic probability controlled by a decisiveness parameter `alpha`,
//! and each side's parameter is re-optimized in turn against the other's,
//! optionally with "level-k" awareness of the opponent's best-response
//! function.
//!
//! ## Features
//!
//! - **Finite-horizon valuation**: backward induction over the
//!   accept/reject tree, with a pluggable rule for how rejection shifts the
//!   control-switch probability
//! - **Bounded scalar optimization**: a derivative-free Brent minimizer all
//!   best responses share
//! - **Level-k composition**: best responses that anticipate the opponent's
//!   best response, nesting one optimization inside another
//! - **Alternating-update driver**: records the (offer, alpha) trajectory
//!   of the Gauss-Seidel iteration under four update rules
//! - **Round game & tournament**: play the game against concrete strategy
//!   populations and compare them round-robin
//!
//! ## Quick Start
//!
//! ```
//! use bargain_solver::dynamics::{BargainConfig, BestResponseDynamics, UpdateRule};
//!
//! // 1. Describe the game
//! let config = BargainConfig::default().with_p_bump(0.1);
//!
//! // 2. Pick an update rule and run the dynamics
//! let dynamics = BestResponseDynamics::new(config, UpdateRule::Myopic).unwrap();
//! let trajectory = dynamics.run(50.0, 0.1, 20).unwrap();
//!
//! // 3. Inspect the trailing values for apparent convergence
//! let last = trajectory.last();
//! assert!(trajectory.fixed_point(1e-4).is_some());
//! println!("offer = {:.3}, alpha = {:.3}", last.offer, last.alpha);
//! ```
//!
//! ## Modules
//!
//! - [`dynamics`]: acceptance model, utility recursions, optimizers, driver
//! - [`game`]: round-based game engine, strategies, tournament
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Alternating-Update Driver                       │
//! │  - offer update (even steps)   - alpha update (odd steps)       │
//! │  - trajectory recording        - four update rules              │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ best responses
//!                               ▼
//!         ┌─────────────────────┼─────────────────────┐
//!         │                     │                     │
//!         ▼                     ▼                     ▼
//!    ┌─────────┐         ┌───────────┐         ┌───────────┐
//!    │ Myopic  │         │  Horizon  │         │  Level-k  │
//!    │ (1-shot)│         │ recursion │         │  (nested) │
//!    └─────────┘         └───────────┘         └───────────┘
//!                               │
//!                               │ shared scalar optimizer
//!                               ▼
//!                      ┌─────────────────┐
//!                      │  Bounded Brent  │
//!                      └─────────────────┘
//! ```

#![warn(missing_docs)]

/// Best-response dynamics module.
///
/// This is the core module: acceptance model, finite-horizon recursions,
/// scalar optimization, and the alternating-update driver.
pub mod dynamics;

/// Game implementations module.
///
/// Round-based play of the bargaining game with concrete strategies, plus
/// the tournament harness.
pub mod game;

// Re-export commonly used types at crate root for convenience
pub use dynamics::{
    BargainConfig, BestResponseDynamics, SwitchRule, Trajectory, TrajectoryPoint, UpdateRule,
};
pub use game::{Game, GameConfig, Player};
