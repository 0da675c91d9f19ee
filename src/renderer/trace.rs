//! Headless renderer that logs a summary line every few frames

use super::{Renderer, Snapshot};
use crate::sim::GamePhase;

#[derive(Debug, Clone)]
pub struct TraceRenderer {
    /// Log every N rendered frames (0 = never)
    every: u64,
    pub frames: u64,
    pub last_score: u64,
    pub last_phase: Option<GamePhase>,
    /// Most obstacles seen on screen at once
    pub peak_obstacles: usize,
}

impl TraceRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every,
            frames: 0,
            last_score: 0,
            last_phase: None,
            peak_obstacles: 0,
        }
    }
}

impl Renderer for TraceRenderer {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        self.frames += 1;
        self.last_score = snapshot.score;
        self.last_phase = Some(snapshot.phase);
        self.peak_obstacles = self
            .peak_obstacles
            .max(snapshot.ground.len() + snapshot.aerial.len());

        if self.every > 0 && self.frames.is_multiple_of(self.every) {
            log::debug!(
                "frame {} score {} speed {:.1} pose {:?} obstacles {}+{} particles {}",
                snapshot.frame,
                snapshot.score,
                snapshot.speed,
                snapshot.vehicle_pose,
                snapshot.ground.len(),
                snapshot.aerial.len(),
                snapshot.particles.len()
            );
        }
    }
}
