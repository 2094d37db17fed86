//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod scoring;
pub mod state;
pub mod tick;

pub use collision::{bounce_floor, bounce_walls, circles_overlap};
pub use scoring::{
    LevelState, ShotStats, compute_accuracy, is_winner, required_score, MIN_ACCURACY_PCT,
    POINTS_PER_STAR,
};
pub use state::{GameEvent, GamePhase, GameState, Missile, Particle, Rocket, Star};
pub use tick::{TickInput, tick};
