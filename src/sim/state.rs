//! Game state and core simulation types
//!
//! All state that must survive a level attempt lives here; visual-only
//! fields (particles, pending events) are serde-skipped.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::scoring::{self, LevelState, ShotStats};
use crate::consts::*;

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level select / "Ready to shoot?" screen, nothing simulated
    Ready,
    /// Active gameplay, level timer running
    Playing,
    /// Game is paused (level timer frozen)
    Paused,
    /// Attempt over - winner advances, loser returns to the menu
    Ended { winner: bool },
}

/// One-shot events drained by the shell for audio/UX
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Fired,
    StarHit { pos: Vec2 },
    LevelWon,
    LevelLost,
}

/// The player's rocket, fixed to a row near the bottom edge
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rocket {
    /// Horizontal position (center)
    pub x: f32,
    /// Current horizontal velocity
    pub vel_x: f32,
}

impl Rocket {
    /// Anchor position given the field size
    pub fn pos(&self, field: Vec2) -> Vec2 {
        Vec2::new(self.x, field.y - ROCKET_BOTTOM_MARGIN)
    }
}

/// A falling star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Floor restitution, rolled once at spawn
    pub bounce: f32,
    /// Ticks until despawn
    pub ttl_ticks: u32,
}

/// A missile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Missile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A particle for hit bursts (not gameplay-affecting)
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub size: f32,
}

/// Maximum particles kept alive
pub const MAX_PARTICLES: usize = 256;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Current level (1-based)
    pub level: u32,
    /// Score for the current attempt
    pub score: u32,
    /// Shot counters for the current attempt
    pub shots: ShotStats,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter (whole session)
    pub time_ticks: u64,
    /// Ticks elapsed in the current attempt
    pub level_ticks: u32,
    /// Ticks since the last star spawn
    pub spawn_ticks: u32,
    /// Stars spawned so far, drives the per-star RNG stream
    star_counter: u64,
    /// Play field size in logical pixels
    pub field: Vec2,
    /// Player rocket
    pub rocket: Rocket,
    /// Falling stars (sorted by id for determinism)
    pub stars: Vec<Star>,
    /// Missiles in flight (sorted by id for determinism)
    pub missiles: Vec<Missile>,
    /// Visual particles
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh session at level 1, waiting on the start screen
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        Self {
            seed,
            level: 1,
            score: 0,
            shots: ShotStats::default(),
            phase: GamePhase::Ready,
            time_ticks: 0,
            level_ticks: 0,
            spawn_ticks: 0,
            star_counter: 0,
            field: Vec2::new(width, height),
            rocket: Rocket {
                x: width / 2.0,
                vel_x: 0.0,
            },
            stars: Vec::new(),
            missiles: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current accuracy percentage
    pub fn accuracy(&self) -> u32 {
        self.shots.accuracy()
    }

    /// Score needed to clear the current level
    pub fn required_score(&self) -> u32 {
        scoring::required_score(self.level)
    }

    /// Snapshot for the presentation layer
    pub fn level_state(&self) -> LevelState {
        LevelState {
            level: self.level,
            score: self.score,
            accuracy: self.accuracy(),
            is_playing: matches!(self.phase, GamePhase::Playing | GamePhase::Paused),
            is_paused: self.phase == GamePhase::Paused,
            is_winner: matches!(self.phase, GamePhase::Ended { winner: true }),
        }
    }

    /// RNG stream for the next spawned star, derived from the run seed and
    /// the spawn counter so a given seed replays identically.
    fn star_rng(&mut self) -> Pcg32 {
        let n = self.star_counter;
        self.star_counter += 1;
        Pcg32::seed_from_u64(self.seed.wrapping_add(n.wrapping_mul(2654435761)))
    }

    /// Spawn one star just above the top edge
    pub fn spawn_star(&mut self) {
        let mut rng = self.star_rng();
        let x = rng.random_range(STAR_SPAWN_MARGIN..=self.field.x - STAR_SPAWN_MARGIN);
        let vx = rng.random_range(-STAR_VX_MAX..=STAR_VX_MAX);
        let vy = rng.random_range(STAR_VY_MIN..=STAR_VY_MAX);
        let bounce = rng.random_range(STAR_BOUNCE_MIN..=STAR_BOUNCE_MAX);

        let id = self.next_entity_id();
        self.stars.push(Star {
            id,
            pos: Vec2::new(x, -STAR_RADIUS),
            vel: Vec2::new(vx, vy),
            radius: STAR_RADIUS,
            bounce,
            ttl_ticks: STAR_TTL_TICKS,
        });
    }

    /// Fire one missile from the rocket nose and count the shot.
    ///
    /// This is the single firing path - pointer and keyboard input both
    /// land here, so the shot counter can never drift between the two.
    pub fn fire_missile(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let nose = self.rocket.pos(self.field) - Vec2::new(0.0, MISSILE_SPAWN_OFFSET);
        let id = self.next_entity_id();
        self.missiles.push(Missile {
            id,
            pos: nose,
            vel: Vec2::new(0.0, -MISSILE_SPEED),
        });
        self.shots.record_fired();
        self.events.push(GameEvent::Fired);
    }

    /// Register one missile-star hit: score, hit counter, and the win
    /// check all move together so no intermediate state is observable.
    pub fn register_hit(&mut self, pos: Vec2) {
        self.score += scoring::POINTS_PER_STAR;
        self.shots.record_hit();
        self.events.push(GameEvent::StarHit { pos });

        // Immediate win - do not wait for the timer
        if scoring::is_winner(self.score, self.accuracy(), self.level) {
            self.phase = GamePhase::Ended { winner: true };
            self.events.push(GameEvent::LevelWon);
        }
    }

    /// End the attempt because the level timer elapsed
    pub fn end_by_timer(&mut self) {
        let winner = scoring::is_winner(self.score, self.accuracy(), self.level);
        self.phase = GamePhase::Ended { winner };
        self.events.push(if winner {
            GameEvent::LevelWon
        } else {
            GameEvent::LevelLost
        });
    }

    /// Begin the current level from the start screen
    pub fn start_level(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        self.reset_attempt();
        self.phase = GamePhase::Playing;
    }

    /// Advance to the next level. Permitted only after a win.
    pub fn advance_level(&mut self) {
        if self.phase != (GamePhase::Ended { winner: true }) {
            return;
        }
        self.level += 1;
        self.reset_attempt();
        self.phase = GamePhase::Playing;
    }

    /// Back to the start screen without touching the level counter
    pub fn return_to_menu(&mut self) {
        self.reset_attempt();
        self.phase = GamePhase::Ready;
    }

    /// Wipe per-attempt state and seed the opening stars
    fn reset_attempt(&mut self) {
        self.score = 0;
        self.shots = ShotStats::default();
        self.level_ticks = 0;
        self.spawn_ticks = 0;
        self.stars.clear();
        self.missiles.clear();
        self.particles.clear();
        self.rocket = Rocket {
            x: self.field.x / 2.0,
            vel_x: 0.0,
        };
        for _ in 0..INITIAL_STARS {
            self.spawn_star();
        }
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.stars.sort_by_key(|s| s.id);
        self.missiles.sort_by_key(|m| m.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_waits_on_start_screen() {
        let state = GameState::new(7, 800.0, 600.0);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert!(state.stars.is_empty());
        assert_eq!(state.accuracy(), 100);
    }

    #[test]
    fn test_start_level_seeds_stars() {
        let mut state = GameState::new(7, 800.0, 600.0);
        state.start_level();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stars.len(), INITIAL_STARS as usize);
        for star in &state.stars {
            assert!(star.pos.x >= STAR_SPAWN_MARGIN);
            assert!(star.pos.x <= 800.0 - STAR_SPAWN_MARGIN);
            assert!(star.bounce >= STAR_BOUNCE_MIN && star.bounce <= STAR_BOUNCE_MAX);
        }
    }

    #[test]
    fn test_fire_only_while_playing() {
        let mut state = GameState::new(7, 800.0, 600.0);
        state.fire_missile();
        assert!(state.missiles.is_empty());
        assert_eq!(state.shots.shots_fired, 0);

        state.start_level();
        state.fire_missile();
        assert_eq!(state.missiles.len(), 1);
        assert_eq!(state.shots.shots_fired, 1);
    }

    #[test]
    fn test_advance_only_from_winner() {
        let mut state = GameState::new(7, 800.0, 600.0);
        state.start_level();
        state.phase = GamePhase::Ended { winner: false };
        state.advance_level();
        assert_eq!(state.level, 1);

        state.phase = GamePhase::Ended { winner: true };
        state.advance_level();
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.shots, ShotStats::default());
    }

    #[test]
    fn test_loser_returns_without_increment() {
        let mut state = GameState::new(7, 800.0, 600.0);
        state.level = 3;
        state.start_level();
        state.phase = GamePhase::Ended { winner: false };
        state.return_to_menu();
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_register_hit_wins_immediately() {
        let mut state = GameState::new(7, 800.0, 600.0);
        state.start_level();
        // 10 points needed at level 1; one perfect shot away
        state.fire_missile();
        state.register_hit(Vec2::new(100.0, 100.0));
        assert_eq!(state.score, 10);
        assert_eq!(state.phase, GamePhase::Ended { winner: true });
        assert!(state.events.contains(&GameEvent::LevelWon));
    }

    #[test]
    fn test_level_state_snapshot() {
        let mut state = GameState::new(7, 800.0, 600.0);
        state.start_level();
        let snap = state.level_state();
        assert!(snap.is_playing);
        assert!(!snap.is_paused);
        assert!(!snap.is_winner);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.accuracy, 100);
    }
}
