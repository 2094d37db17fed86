//! Fixed timestep simulation tick
//!
//! Core game loop that advances one attempt deterministically. The shell
//! calls this at 120 Hz from the accumulator; nothing here touches the
//! platform.

use glam::Vec2;

use super::collision;
use super::state::{GamePhase, GameState, Particle, MAX_PARTICLES};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Move the rocket left (held)
    pub left: bool,
    /// Move the rocket right (held)
    pub right: bool,
    /// Fire a missile (one-shot; pointer and keyboard both set this)
    pub fire: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
            }
            _ => {}
        }
    }

    // Only the Playing phase simulates; the level timer freezes elsewhere
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    state.level_ticks += 1;

    // Rocket movement
    state.rocket.vel_x = match (input.left, input.right) {
        (true, false) => -ROCKET_SPEED,
        (false, true) => ROCKET_SPEED,
        _ => 0.0,
    };
    state.rocket.x = (state.rocket.x + state.rocket.vel_x * dt)
        .clamp(ROCKET_HALF_WIDTH, state.field.x - ROCKET_HALF_WIDTH);

    // Shared firing path for pointer and keyboard
    if input.fire {
        state.fire_missile();
    }

    // Missiles fly straight up, gone once fully off the top
    for missile in &mut state.missiles {
        missile.pos += missile.vel * dt;
    }
    state.missiles.retain(|m| m.pos.y > -MISSILE_RADIUS * 2.0);

    // Stars: gravity, floor bounce, wall reflection, lifetime
    let field = state.field;
    for star in &mut state.stars {
        star.vel.y += STAR_GRAVITY * dt;
        star.pos += star.vel * dt;

        if let Some((pos, vel)) =
            collision::bounce_floor(star.pos, star.vel, star.radius, field.y, star.bounce)
        {
            star.pos = pos;
            star.vel = vel;
        }
        if let Some((pos, vel)) = collision::bounce_walls(star.pos, star.vel, star.radius, field.x)
        {
            star.pos = pos;
            star.vel = vel;
        }

        star.ttl_ticks = star.ttl_ticks.saturating_sub(1);
    }
    state.stars.retain(|s| s.ttl_ticks > 0);

    // Continuous spawning
    state.spawn_ticks += 1;
    if state.spawn_ticks >= STAR_SPAWN_INTERVAL_TICKS {
        state.spawn_ticks = 0;
        state.spawn_star();
    }

    // Missile-star collisions. Each missile consumes at most one star and
    // each star dies to at most one missile per tick.
    let mut hits: Vec<(u32, u32, Vec2)> = Vec::new();
    for missile in &state.missiles {
        for star in &state.stars {
            if hits.iter().any(|&(_, sid, _)| sid == star.id) {
                continue;
            }
            if collision::circles_overlap(missile.pos, MISSILE_RADIUS, star.pos, star.radius) {
                hits.push((missile.id, star.id, star.pos));
                break;
            }
        }
    }
    for (missile_id, star_id, pos) in hits {
        state.missiles.retain(|m| m.id != missile_id);
        state.stars.retain(|s| s.id != star_id);
        spawn_hit_burst(state, pos);
        state.register_hit(pos);
        // Winning ends the attempt on the spot
        if !matches!(state.phase, GamePhase::Playing) {
            break;
        }
    }

    // Particles drift, fall a little, fade
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * dt;
        particle.vel.y += 60.0 * dt;
        particle.vel *= 0.985;
        particle.life -= dt * 1.5;
        particle.size *= 0.995;
    }
    state.particles.retain(|p| p.life > 0.0);

    // Level completion after 30 seconds
    if state.phase == GamePhase::Playing && state.level_ticks >= LEVEL_DURATION_TICKS {
        state.end_by_timer();
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Burst of sparks where a star was destroyed.
/// Deterministic "randomness" hashed from the tick count.
fn spawn_hit_burst(state: &mut GameState, pos: Vec2) {
    let burst = 12u32;
    for i in 0..burst {
        let hash = (state.time_ticks as u32)
            .wrapping_mul(2654435761)
            .wrapping_add(i * 31337);
        let rand1 = (hash % 1000) as f32 / 1000.0;
        let rand2 = ((hash >> 10) % 1000) as f32 / 1000.0;

        let angle = std::f32::consts::TAU * (i as f32 / burst as f32) + rand1 * 0.4;
        let speed = 80.0 + rand2 * 120.0;
        state.particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 0.6 + rand1 * 0.4,
            size: 3.0 + rand2 * 3.0,
        });
    }
    if state.particles.len() > MAX_PARTICLES {
        let excess = state.particles.len() - MAX_PARTICLES;
        state.particles.drain(0..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GameEvent, Missile, Star};

    fn playing_state() -> GameState {
        let mut state = GameState::new(12345, 800.0, 600.0);
        state.start_level();
        state
    }

    #[test]
    fn test_tick_idle_on_start_screen() {
        let mut state = GameState::new(12345, 800.0, 600.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.phase, GamePhase::Ready);
    }

    #[test]
    fn test_tick_pause_freezes_level_timer() {
        let mut state = playing_state();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.level_ticks, 1);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.level_ticks, 1);

        // Unpause resumes on the same tick
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level_ticks, 2);
    }

    #[test]
    fn test_fire_spawns_one_missile_and_counts_shot() {
        let mut state = playing_state();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.missiles.len(), 1);
        assert_eq!(state.shots.shots_fired, 1);
        assert!(state.events.contains(&GameEvent::Fired));
        // Missile heads straight up
        assert!(state.missiles[0].vel.y < 0.0);
    }

    #[test]
    fn test_missiles_removed_off_top() {
        let mut state = playing_state();
        state.stars.clear();
        let id = state.next_entity_id();
        state.missiles.push(Missile {
            id,
            pos: Vec2::new(400.0, 1.0),
            vel: Vec2::new(0.0, -MISSILE_SPEED),
        });
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.missiles.is_empty());
    }

    #[test]
    fn test_hit_scores_and_wins_level_one() {
        let mut state = playing_state();
        state.stars.clear();

        // One fired missile with a star right on top of it
        state.fire_missile();
        let missile_pos = state.missiles[0].pos;
        let id = state.next_entity_id();
        state.stars.push(Star {
            id,
            pos: missile_pos,
            vel: Vec2::ZERO,
            radius: STAR_RADIUS,
            bounce: 0.5,
            ttl_ticks: STAR_TTL_TICKS,
        });

        tick(&mut state, &TickInput::default(), SIM_DT);

        // 10 points at 100% accuracy clears level 1 immediately
        assert_eq!(state.score, 10);
        assert_eq!(state.shots.shots_hit, 1);
        assert_eq!(state.accuracy(), 100);
        assert_eq!(state.phase, GamePhase::Ended { winner: true });
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_hit_updates_score_and_accuracy_together() {
        let mut state = playing_state();
        state.level = 2; // needs 20 points, one hit cannot end it
        state.stars.clear();

        state.fire_missile();
        let missile_pos = state.missiles[0].pos;
        let id = state.next_entity_id();
        state.stars.push(Star {
            id,
            pos: missile_pos,
            vel: Vec2::ZERO,
            radius: STAR_RADIUS,
            bounce: 0.5,
            ttl_ticks: STAR_TTL_TICKS,
        });

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 10);
        assert_eq!(state.shots.shots_hit, 1);
        assert_eq!(state.level_state().accuracy, 100);
    }

    #[test]
    fn test_timer_elapse_ends_as_loser() {
        let mut state = playing_state();
        state.level_ticks = LEVEL_DURATION_TICKS - 1;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Ended { winner: false });
        assert!(state.events.contains(&GameEvent::LevelLost));
    }

    #[test]
    fn test_stars_spawn_on_interval() {
        let mut state = playing_state();
        let before = state.stars.len();
        for _ in 0..STAR_SPAWN_INTERVAL_TICKS {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.stars.len(), before + 1);
    }

    #[test]
    fn test_rocket_clamped_to_field() {
        let mut state = playing_state();
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        for _ in 0..2_000 {
            tick(&mut state, &left, SIM_DT);
        }
        assert_eq!(state.rocket.x, ROCKET_HALF_WIDTH);
    }

    #[test]
    fn test_determinism() {
        // Two states with the same seed and inputs stay identical
        let mut state1 = GameState::new(99999, 800.0, 600.0);
        let mut state2 = GameState::new(99999, 800.0, 600.0);
        state1.start_level();
        state2.start_level();

        for i in 0..600u32 {
            let input = TickInput {
                left: i % 7 < 3,
                right: i % 11 < 4,
                fire: i % 30 == 0,
                ..Default::default()
            };
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.shots, state2.shots);
        assert_eq!(state1.stars.len(), state2.stars.len());
        for (a, b) in state1.stars.iter().zip(&state2.stars) {
            assert_eq!(a.id, b.id);
            assert!((a.pos - b.pos).length() < 1e-6);
        }
    }

    #[test]
    fn test_hits_never_exceed_shots() {
        let mut state = playing_state();
        for i in 0..2_000u32 {
            let input = TickInput {
                fire: i % 10 == 0,
                left: i % 50 < 25,
                right: i % 50 >= 25,
                ..Default::default()
            };
            tick(&mut state, &input, SIM_DT);
            assert!(state.shots.shots_hit <= state.shots.shots_fired);
            if !matches!(state.phase, GamePhase::Playing) {
                break;
            }
        }
    }
}
