//! Collision helpers
//!
//! The play field is axis-aligned, so everything reduces to circle
//! overlap tests and component reflection.

use glam::Vec2;

/// True if two circles overlap (touching counts)
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let r = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= r * r
}

/// Reflect a falling body off the floor at `floor_y`.
///
/// Returns the corrected (pos, vel) if the body penetrated the floor,
/// applying the restitution factor to the vertical component only.
pub fn bounce_floor(pos: Vec2, vel: Vec2, radius: f32, floor_y: f32, restitution: f32) -> Option<(Vec2, Vec2)> {
    if pos.y + radius < floor_y || vel.y <= 0.0 {
        return None;
    }
    let corrected = Vec2::new(pos.x, floor_y - radius);
    let reflected = Vec2::new(vel.x, -vel.y * restitution);
    Some((corrected, reflected))
}

/// Reflect a body off the side walls at x=0 and x=`width`.
///
/// Returns the corrected (pos, vel) if the body crossed either wall.
pub fn bounce_walls(pos: Vec2, vel: Vec2, radius: f32, width: f32) -> Option<(Vec2, Vec2)> {
    if pos.x - radius < 0.0 {
        Some((Vec2::new(radius, pos.y), Vec2::new(vel.x.abs(), vel.y)))
    } else if pos.x + radius > width {
        Some((Vec2::new(width - radius, pos.y), Vec2::new(-vel.x.abs(), vel.y)))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap_hit() {
        assert!(circles_overlap(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(15.0, 0.0),
            6.0
        ));
    }

    #[test]
    fn test_circles_overlap_miss() {
        assert!(!circles_overlap(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(20.0, 0.0),
            6.0
        ));
    }

    #[test]
    fn test_circles_overlap_touching() {
        assert!(circles_overlap(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(16.0, 0.0),
            6.0
        ));
    }

    #[test]
    fn test_bounce_floor_reflects_and_damps() {
        let (pos, vel) = bounce_floor(
            Vec2::new(50.0, 598.0),
            Vec2::new(10.0, 100.0),
            16.0,
            600.0,
            0.5,
        )
        .expect("should bounce");
        assert_eq!(pos.y, 584.0);
        assert_eq!(vel.y, -50.0);
        assert_eq!(vel.x, 10.0);
    }

    #[test]
    fn test_bounce_floor_ignores_rising_bodies() {
        // Already moving up after a previous bounce - leave it alone
        let result = bounce_floor(
            Vec2::new(50.0, 598.0),
            Vec2::new(0.0, -40.0),
            16.0,
            600.0,
            0.5,
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_bounce_walls_both_sides() {
        let (pos, vel) = bounce_walls(
            Vec2::new(-2.0, 50.0),
            Vec2::new(-30.0, 10.0),
            16.0,
            800.0,
        )
        .expect("left wall");
        assert_eq!(pos.x, 16.0);
        assert!(vel.x > 0.0);

        let (pos, vel) = bounce_walls(
            Vec2::new(799.0, 50.0),
            Vec2::new(30.0, 10.0),
            16.0,
            800.0,
        )
        .expect("right wall");
        assert_eq!(pos.x, 784.0);
        assert!(vel.x < 0.0);
    }

    #[test]
    fn test_bounce_walls_inside_field() {
        assert!(bounce_walls(Vec2::new(400.0, 50.0), Vec2::new(30.0, 0.0), 16.0, 800.0).is_none());
    }
}
