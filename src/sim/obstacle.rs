//! Obstacle archetypes and the two scrolling collections

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;

/// Ground obstacle archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundKind {
    /// Low rock, easy hop
    Small,
    /// Cactus cluster
    Medium,
    /// Narrow rock pillar
    Tall,
    /// Slow hauler the rover can land on and ride
    Truck,
}

impl GroundKind {
    /// Every ground archetype, in unlock order
    pub const ALL: [GroundKind; 4] = [
        GroundKind::Small,
        GroundKind::Medium,
        GroundKind::Tall,
        GroundKind::Truck,
    ];

    /// Archetypes available from the first frame
    pub const COMMON: [GroundKind; 3] = [GroundKind::Small, GroundKind::Medium, GroundKind::Tall];

    /// Sprite box size
    pub fn size(self) -> Vec2 {
        match self {
            GroundKind::Small => Vec2::new(20.0, 30.0),
            GroundKind::Medium => Vec2::new(30.0, 45.0),
            GroundKind::Tall => Vec2::new(25.0, 60.0),
            GroundKind::Truck => Vec2::new(90.0, 40.0),
        }
    }

    /// Whether the vehicle may land on top and ride it
    pub fn mountable(self) -> bool {
        matches!(self, GroundKind::Truck)
    }

    /// Points credited once the obstacle scrolls off the left edge
    pub fn points(self) -> u64 {
        match self {
            GroundKind::Small | GroundKind::Medium => 5,
            GroundKind::Tall => 8,
            GroundKind::Truck => 10,
        }
    }
}

/// Every obstacle archetype, ground and aerial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Ground(GroundKind),
    Flyer,
}

/// Flyer sprite box size
pub const FLYER_SIZE: Vec2 = Vec2::new(40.0, 30.0);
/// Points for letting a flyer pass
pub const FLYER_POINTS: u64 = 10;

/// A ground obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: GroundKind,
    pub pos: Vec2,
}

impl Obstacle {
    /// Create an obstacle resting on the ground line at `x`
    pub fn new(id: u32, kind: GroundKind, x: f32, ground_line: f32) -> Self {
        let size = kind.size();
        Self {
            id,
            kind,
            pos: Vec2::new(x, ground_line - size.y),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.kind.size()
    }

    #[inline]
    pub fn mountable(&self) -> bool {
        self.kind.mountable()
    }

    /// Full bounding box (obstacle hitboxes are not inset)
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size())
    }
}

/// An aerial obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyingObstacle {
    pub id: u32,
    pub pos: Vec2,
    /// 2-frame flap cycle (0 or 1)
    pub flap: u8,
}

impl FlyingObstacle {
    /// Create a flyer whose bottom edge sits `height` above the ground line
    pub fn new(id: u32, x: f32, height: f32, ground_line: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, ground_line - height - FLYER_SIZE.y),
            flap: 0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, FLYER_SIZE)
    }
}

/// Outcome of advancing the obstacle collections by one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvanceResult {
    /// Points credited for obstacles that left the screen this tick
    pub points: u64,
    /// Ids of every obstacle removed this tick
    pub removed: Vec<u32>,
}

/// The two independent, spawn-ordered obstacle collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSet {
    pub ground: Vec<Obstacle>,
    pub aerial: Vec<FlyingObstacle>,
}

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ground.clear();
        self.aerial.clear();
    }

    /// Look up a ground obstacle by id
    pub fn ground_by_id(&self, id: u32) -> Option<&Obstacle> {
        self.ground.iter().find(|o| o.id == id)
    }

    /// Scroll every obstacle left, drop the ones fully past the left edge and
    /// credit their points exactly once.
    pub fn advance(
        &mut self,
        ground_speed: f32,
        aerial_speed: f32,
        frame: u64,
        flap_frames: u32,
    ) -> AdvanceResult {
        let mut result = AdvanceResult::default();

        for obstacle in &mut self.ground {
            obstacle.pos.x -= ground_speed;
        }
        self.ground.retain(|o| {
            if o.pos.x + o.size().x < 0.0 {
                result.points += o.kind.points();
                result.removed.push(o.id);
                false
            } else {
                true
            }
        });

        let flap_toggle = flap_frames > 0 && frame.is_multiple_of(u64::from(flap_frames));
        for flyer in &mut self.aerial {
            flyer.pos.x -= aerial_speed;
            if flap_toggle {
                flyer.flap ^= 1;
            }
        }
        self.aerial.retain(|f| {
            if f.pos.x + FLYER_SIZE.x < 0.0 {
                result.points += FLYER_POINTS;
                result.removed.push(f.id);
                false
            } else {
                true
            }
        });

        result
    }
}
