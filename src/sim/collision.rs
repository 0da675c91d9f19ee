//! Collision detection and the land-on-top mount interaction
//!
//! Everything is axis-aligned: the rover's hitbox is an inset fraction of its
//! sprite box, obstacles collide with their full bounding box.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::{ObstacleKind, ObstacleSet};
use super::vehicle::Vehicle;
use crate::tuning::Tuning;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict AABB overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.right()
            && self.right() > other.pos.x
            && self.pos.y < other.bottom()
            && self.bottom() > other.pos.y
    }

    /// Horizontal extents overlap
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.pos.x < other.right() && self.right() > other.pos.x
    }

    /// `other` lies entirely inside `self`
    pub fn contains(&self, other: &Rect) -> bool {
        other.pos.x >= self.pos.x
            && other.pos.y >= self.pos.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Shrink a sprite box to its collision hitbox.
///
/// The hitbox is `ratio` of the sprite size, centered unless an explicit
/// offset is given. Offsets are clamped so the hitbox never leaves the sprite.
pub fn hitbox(sprite: Rect, ratio: f32, offset: Option<Vec2>) -> Rect {
    let ratio = ratio.clamp(0.0, 1.0);
    let size = sprite.size * ratio;
    let slack = (sprite.size - size).max(Vec2::ZERO);
    let offset = offset.unwrap_or(slack * 0.5).clamp(Vec2::ZERO, slack);
    Rect::new(sprite.pos + offset, size)
}

/// A falling rover touches down on `top` within the tolerance band
pub fn lands_on_top(vehicle: Rect, falling: bool, top: Rect, above: f32, below: f32) -> bool {
    if !falling || !vehicle.overlaps_x(&top) {
        return false;
    }
    let feet = vehicle.bottom();
    feet >= top.pos.y - above && feet <= top.pos.y + below
}

/// Result of one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Ground obstacle the rover landed on this tick
    pub mounted: Option<u32>,
    /// The ridden obstacle vanished and the rover was dropped
    pub dropped_mount: bool,
    /// First obstacle hit; the run is over
    pub hit: Option<ObstacleKind>,
}

/// Test the rover against every obstacle: ground first, then aerial.
///
/// Mounting takes priority over the overlap test for mountable obstacles. The
/// first overlap ends the pass.
pub fn resolve(vehicle: &mut Vehicle, obstacles: &ObstacleSet, tuning: &Tuning) -> Resolution {
    let mut resolution = Resolution::default();

    if let Some(id) = vehicle.mount {
        if obstacles.ground_by_id(id).is_none() {
            vehicle.dismount();
            resolution.dropped_mount = true;
        }
    }

    for obstacle in &obstacles.ground {
        if vehicle.mount == Some(obstacle.id) {
            continue;
        }
        let rect = obstacle.rect();
        let body = vehicle.hitbox(tuning);

        if obstacle.mountable()
            && !vehicle.is_riding()
            && lands_on_top(
                body,
                vehicle.is_falling(),
                rect,
                tuning.mount_tolerance_above,
                tuning.mount_tolerance_below,
            )
        {
            vehicle.mount_on(obstacle, tuning);
            resolution.mounted = Some(obstacle.id);
            continue;
        }

        if body.overlaps(&rect) {
            resolution.hit = Some(ObstacleKind::Ground(obstacle.kind));
            return resolution;
        }
    }

    let body = vehicle.hitbox(tuning);
    if obstacles.aerial.iter().any(|f| body.overlaps(&f.rect())) {
        resolution.hit = Some(ObstacleKind::Flyer);
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacle::{FlyingObstacle, GroundKind, Obstacle};
    use proptest::prelude::*;

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
        Rect::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_overlap_and_touching() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&rect(5.0, 5.0, 10.0, 10.0)));
        // Shared edge is not an overlap
        assert!(!a.overlaps(&rect(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&rect(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_hitbox_centered_by_default() {
        let sprite = rect(50.0, 200.0, 40.0, 50.0);
        let hb = hitbox(sprite, 0.5, None);
        assert_eq!(hb, rect(60.0, 212.5, 20.0, 25.0));
    }

    #[test]
    fn test_hitbox_offset_is_clamped() {
        let sprite = rect(0.0, 0.0, 40.0, 40.0);
        let hb = hitbox(sprite, 0.5, Some(Vec2::new(100.0, -5.0)));
        assert_eq!(hb.pos, Vec2::new(20.0, 0.0));
        assert!(sprite.contains(&hb));
    }

    #[test]
    fn test_falling_onto_truck_mounts_instead_of_game_over() {
        let tuning = Tuning::default();
        let mut vehicle = Vehicle::new(&tuning);
        let mut obstacles = ObstacleSet::new();
        let truck = Obstacle::new(1, GroundKind::Truck, 40.0, tuning.ground_line);
        let truck_top = truck.rect().pos.y;
        obstacles.ground.push(truck);

        // Hitbox bottom 3px below the truck's top edge, falling
        vehicle.jumping = true;
        vehicle.vel_y = 4.0;
        let inset = vehicle.sprite_rect().bottom() - vehicle.hitbox(&tuning).bottom();
        vehicle.pos.y = truck_top + 3.0 - inset - tuning.vehicle_height;
        assert!(vehicle.hitbox(&tuning).overlaps(&obstacles.ground[0].rect()));

        let resolution = resolve(&mut vehicle, &obstacles, &tuning);
        assert_eq!(resolution.mounted, Some(1));
        assert!(resolution.hit.is_none());
        assert!(vehicle.is_riding());
        assert!(!vehicle.jumping);
        assert_eq!(vehicle.vel_y, 0.0);
    }

    #[test]
    fn test_rising_into_truck_is_a_hit() {
        let tuning = Tuning::default();
        let mut vehicle = Vehicle::new(&tuning);
        let mut obstacles = ObstacleSet::new();
        let truck = Obstacle::new(1, GroundKind::Truck, 40.0, tuning.ground_line);
        let truck_top = truck.rect().pos.y;
        obstacles.ground.push(truck);

        vehicle.jumping = true;
        vehicle.vel_y = -4.0;
        vehicle.pos.y = truck_top - 20.0;

        let resolution = resolve(&mut vehicle, &obstacles, &tuning);
        assert_eq!(resolution.hit, Some(ObstacleKind::Ground(GroundKind::Truck)));
        assert!(!vehicle.is_riding());
    }

    #[test]
    fn test_ground_checked_before_aerial() {
        let tuning = Tuning::default();
        let mut vehicle = Vehicle::new(&tuning);
        let mut obstacles = ObstacleSet::new();
        obstacles
            .aerial
            .push(FlyingObstacle::new(2, 50.0, 25.0, tuning.ground_line));
        obstacles
            .ground
            .push(Obstacle::new(1, GroundKind::Small, 55.0, tuning.ground_line));

        let resolution = resolve(&mut vehicle, &obstacles, &tuning);
        assert_eq!(resolution.hit, Some(ObstacleKind::Ground(GroundKind::Small)));
    }

    #[test]
    fn test_ducking_under_flyer_is_safe() {
        let tuning = Tuning::default();
        let mut vehicle = Vehicle::new(&tuning);
        vehicle.duck(&tuning);
        let mut obstacles = ObstacleSet::new();
        obstacles
            .aerial
            .push(FlyingObstacle::new(1, tuning.vehicle_x, 25.0, tuning.ground_line));

        let flyer = obstacles.aerial[0].rect();
        assert!(flyer.bottom() <= vehicle.hitbox(&tuning).pos.y);
        assert!(resolve(&mut vehicle, &obstacles, &tuning).hit.is_none());

        // Standing up into the same flyer is fatal
        vehicle.stand(&tuning);
        assert_eq!(
            resolve(&mut vehicle, &obstacles, &tuning).hit,
            Some(ObstacleKind::Flyer)
        );
    }

    #[test]
    fn test_missing_mount_forces_dismount() {
        let tuning = Tuning::default();
        let mut vehicle = Vehicle::new(&tuning);
        vehicle.mount = Some(42);
        let resolution = resolve(&mut vehicle, &ObstacleSet::new(), &tuning);
        assert!(resolution.dropped_mount);
        assert!(!vehicle.is_riding());
        assert!(vehicle.jumping);
        assert_eq!(vehicle.vel_y, 0.0);
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| rect(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_hitbox_inside_sprite(
            sprite in arb_rect(),
            ratio in 0.0f32..1.0,
            offset in proptest::option::of((-100.0f32..100.0, -100.0f32..100.0)),
        ) {
            let hb = hitbox(sprite, ratio, offset.map(|(x, y)| Vec2::new(x, y)));
            let eps = 1e-3;
            prop_assert!(hb.pos.x >= sprite.pos.x - eps);
            prop_assert!(hb.pos.y >= sprite.pos.y - eps);
            prop_assert!(hb.right() <= sprite.right() + eps);
            prop_assert!(hb.bottom() <= sprite.bottom() + eps);
        }
    }
}
