//! Canvas 2D renderer for the browser build
//!
//! Flat-colored shapes stand in for sprites; each archetype has its own
//! silhouette and palette.

use std::f64::consts::TAU;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Renderer, Snapshot};
use crate::settings::Settings;
use crate::sim::{FLYER_SIZE, GamePhase, GroundKind, Pose, Rect};

const DAY_SKY: (f32, f32, f32) = (247.0, 236.0, 214.0);
const NIGHT_SKY: (f32, f32, f32) = (32.0, 36.0, 58.0);

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    settings: Settings,
}

impl CanvasRenderer {
    /// Grab the 2D context of `canvas`; `None` if the browser refuses
    pub fn new(canvas: &HtmlCanvasElement, settings: Settings) -> Option<Self> {
        use wasm_bindgen::JsCast;

        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx, settings })
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    fn fill(&self, color: &str, rect: &Rect) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            rect.pos.x as f64,
            rect.pos.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn text(&self, text: &str, x: f32, y: f32) {
        let _ = self.ctx.fill_text(text, x as f64, y as f64);
    }

    /// Sky color blended toward night as the cycle approaches midnight
    fn sky_color(&self, day_phase: f32) -> String {
        let t = if self.settings.day_night {
            // 0 at noon, 1 at midnight
            1.0 - ((day_phase * std::f32::consts::TAU).cos() * 0.5 + 0.5)
        } else {
            0.0
        };
        let mix = |a: f32, b: f32| (a + (b - a) * t) as u8;
        format!(
            "rgb({}, {}, {})",
            mix(DAY_SKY.0, NIGHT_SKY.0),
            mix(DAY_SKY.1, NIGHT_SKY.1),
            mix(DAY_SKY.2, NIGHT_SKY.2)
        )
    }

    fn draw_ground(&self, snapshot: &Snapshot<'_>) {
        self.ctx.set_fill_style_str("#8a6d45");
        self.ctx.fill_rect(
            0.0,
            snapshot.ground_line as f64,
            snapshot.width as f64,
            (snapshot.height - snapshot.ground_line) as f64,
        );
        // Scrolling pebbles sell the motion
        self.ctx.set_fill_style_str("#6b532f");
        let offset = (snapshot.frame as f32 * snapshot.speed) % 40.0;
        let mut x = -offset;
        while x < snapshot.width {
            self.ctx
                .fill_rect(x as f64, snapshot.ground_line as f64 + 8.0, 6.0, 2.0);
            x += 40.0;
        }
    }

    fn draw_obstacles(&self, snapshot: &Snapshot<'_>) {
        for obstacle in snapshot.ground {
            let rect = obstacle.rect();
            match obstacle.kind {
                GroundKind::Small => self.fill("#7d7468", &rect),
                GroundKind::Medium => {
                    self.fill("#3f7d3a", &rect);
                    // Arms
                    let arm = Rect::new(
                        rect.pos + glam::Vec2::new(-6.0, rect.size.y * 0.3),
                        glam::Vec2::new(rect.size.x + 12.0, 6.0),
                    );
                    self.fill("#3f7d3a", &arm);
                }
                GroundKind::Tall => self.fill("#5e5248", &rect),
                GroundKind::Truck => {
                    let bed = Rect::new(rect.pos, glam::Vec2::new(rect.size.x, rect.size.y - 10.0));
                    self.fill("#b0412e", &bed);
                    self.ctx.set_fill_style_str("#222");
                    for wheel_x in [rect.pos.x + 15.0, rect.right() - 15.0] {
                        self.ctx.begin_path();
                        let _ = self.ctx.arc(
                            wheel_x as f64,
                            (rect.bottom() - 8.0) as f64,
                            8.0,
                            0.0,
                            TAU,
                        );
                        self.ctx.fill();
                    }
                }
            }
        }

        for flyer in snapshot.aerial {
            let rect = flyer.rect();
            let body = Rect::new(
                rect.pos + glam::Vec2::new(0.0, FLYER_SIZE.y * 0.35),
                glam::Vec2::new(FLYER_SIZE.x, FLYER_SIZE.y * 0.3),
            );
            self.fill("#4a4a6a", &body);
            // Wings up on frame 0, down on frame 1
            let wing_y = if flyer.flap == 0 {
                rect.pos.y
            } else {
                rect.pos.y + FLYER_SIZE.y * 0.65
            };
            let wing = Rect::new(
                glam::Vec2::new(rect.pos.x + FLYER_SIZE.x * 0.3, wing_y),
                glam::Vec2::new(FLYER_SIZE.x * 0.35, FLYER_SIZE.y * 0.35),
            );
            self.fill("#6a6a8a", &wing);
        }
    }

    fn draw_vehicle(&self, snapshot: &Snapshot<'_>) {
        let rect = snapshot.vehicle_rect;
        let body_color = match snapshot.vehicle_pose {
            Pose::Riding => "#d98c1f",
            _ => "#e0a030",
        };
        let cabin = Rect::new(rect.pos, glam::Vec2::new(rect.size.x * 0.6, rect.size.y * 0.5));
        let chassis = Rect::new(
            rect.pos + glam::Vec2::new(0.0, rect.size.y * 0.4),
            glam::Vec2::new(rect.size.x, rect.size.y * 0.45),
        );
        self.fill(body_color, &chassis);
        self.fill("#9fc7d8", &cabin);

        self.ctx.set_fill_style_str("#222");
        for wheel_x in [rect.pos.x + 9.0, rect.right() - 9.0] {
            self.ctx.begin_path();
            let _ = self
                .ctx
                .arc(wheel_x as f64, (rect.bottom() - 6.0) as f64, 6.0, 0.0, TAU);
            self.ctx.fill();
        }
    }

    fn draw_particles(&self, snapshot: &Snapshot<'_>) {
        self.ctx.set_fill_style_str("#a88a5c");
        for particle in snapshot.particles {
            self.ctx.set_global_alpha(particle.life.clamp(0.0, 1.0) as f64);
            self.ctx.fill_rect(
                particle.pos.x as f64,
                particle.pos.y as f64,
                particle.size as f64,
                particle.size as f64,
            );
        }
        self.ctx.set_global_alpha(1.0);
    }

    fn draw_hitboxes(&self, snapshot: &Snapshot<'_>) {
        self.ctx.set_stroke_style_str("#ff00ff");
        self.ctx.set_line_width(1.0);
        let stroke = |r: &Rect| {
            self.ctx.stroke_rect(
                r.pos.x as f64,
                r.pos.y as f64,
                r.size.x as f64,
                r.size.y as f64,
            )
        };
        stroke(&snapshot.vehicle_hitbox);
        for obstacle in snapshot.ground {
            stroke(&obstacle.rect());
        }
        for flyer in snapshot.aerial {
            stroke(&flyer.rect());
        }
    }

    fn draw_hud(&self, snapshot: &Snapshot<'_>) {
        let ink = if self.settings.day_night && snapshot.is_night() {
            "#eeeeee"
        } else {
            "#333333"
        };
        self.ctx.set_fill_style_str(ink);
        self.ctx.set_font("bold 16px monospace");
        self.ctx.set_text_align("right");
        self.text(
            &format!("HI {:05}  {:05}", snapshot.high_score, snapshot.score),
            snapshot.width - 12.0,
            24.0,
        );

        self.ctx.set_text_align("center");
        let center = snapshot.width * 0.5;
        match snapshot.phase {
            GamePhase::Waiting => {
                self.ctx.set_font("bold 22px monospace");
                self.text("ROVER DASH", center, snapshot.height * 0.35);
                self.ctx.set_font("14px monospace");
                self.text("Space / tap to start", center, snapshot.height * 0.35 + 26.0);
            }
            GamePhase::GameOver => {
                self.ctx.set_font("bold 22px monospace");
                self.text("GAME OVER", center, snapshot.height * 0.35);
                self.ctx.set_font("14px monospace");
                self.text(
                    &format!("Score {}  -  Space / tap to retry", snapshot.score),
                    center,
                    snapshot.height * 0.35 + 26.0,
                );
            }
            GamePhase::Playing => {}
        }
    }
}

impl Renderer for CanvasRenderer {
    fn render(&mut self, snapshot: &Snapshot<'_>) {
        self.ctx.set_fill_style_str(&self.sky_color(snapshot.day_phase));
        self.ctx
            .fill_rect(0.0, 0.0, snapshot.width as f64, snapshot.height as f64);

        self.draw_ground(snapshot);
        self.draw_obstacles(snapshot);
        self.draw_vehicle(snapshot);
        self.draw_particles(snapshot);
        if self.settings.show_hitboxes {
            self.draw_hitboxes(snapshot);
        }
        self.draw_hud(snapshot);
    }
}
