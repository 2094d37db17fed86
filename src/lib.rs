//! Shooting the Star - a browser arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (star physics, scoring, session state)
//! - `renderer`: WebGPU rendering pipeline
//! - `leaderboard`: Local top-10 leaderboard with mock seed data
//! - `session`: Demo-credential login and LocalStorage session
//! - `facts`: Constellation facts shown between levels
//! - `settings`: Graphics/audio preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod facts;
pub mod leaderboard;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use leaderboard::Leaderboard;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Simulation tick rate in Hz
    pub const TICK_RATE: u32 = 120;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Level duration before the session ends on its own (30 seconds)
    pub const LEVEL_DURATION_TICKS: u32 = 30 * TICK_RATE;

    /// Stars seeded at the start of every level attempt
    pub const INITIAL_STARS: u32 = 6;
    /// One new star per second while playing
    pub const STAR_SPAWN_INTERVAL_TICKS: u32 = TICK_RATE;
    /// Stars despawn after 10 seconds
    pub const STAR_TTL_TICKS: u32 = 10 * TICK_RATE;
    /// Star collision radius
    pub const STAR_RADIUS: f32 = 16.0;
    /// Horizontal margin for star spawn positions
    pub const STAR_SPAWN_MARGIN: f32 = 50.0;
    /// Downward gravity on stars (pixels/s²)
    pub const STAR_GRAVITY: f32 = 200.0;
    /// Star spawn horizontal speed range: [-STAR_VX_MAX, STAR_VX_MAX]
    pub const STAR_VX_MAX: f32 = 60.0;
    /// Star spawn downward speed range
    pub const STAR_VY_MIN: f32 = 50.0;
    pub const STAR_VY_MAX: f32 = 150.0;
    /// Floor bounce restitution range (per star)
    pub const STAR_BOUNCE_MIN: f32 = 0.4;
    pub const STAR_BOUNCE_MAX: f32 = 0.8;

    /// Missile upward speed (pixels/s)
    pub const MISSILE_SPEED: f32 = 400.0;
    /// Missile collision radius
    pub const MISSILE_RADIUS: f32 = 6.0;
    /// Missiles spawn this far above the rocket nose
    pub const MISSILE_SPAWN_OFFSET: f32 = 25.0;

    /// Rocket horizontal speed (pixels/s)
    pub const ROCKET_SPEED: f32 = 200.0;
    /// Half-width of the rocket for clamping and rendering
    pub const ROCKET_HALF_WIDTH: f32 = 20.0;
    /// Rocket hull height above its anchor point
    pub const ROCKET_HEIGHT: f32 = 40.0;
    /// Rocket anchor sits this far above the bottom edge
    pub const ROCKET_BOTTOM_MARGIN: f32 = 30.0;
}
