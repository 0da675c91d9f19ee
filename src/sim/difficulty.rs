//! Difficulty curve
//!
//! Difficulty is never stored: speed and spawn windows are pure functions of
//! the elapsed frame count.

use crate::tuning::{IntervalTuning, Tuning};

/// Number of completed difficulty steps at `frame`
#[inline]
pub fn speed_factor(frame: u64, speed_increase_interval: u32) -> u64 {
    frame / u64::from(speed_increase_interval.max(1))
}

/// Spawn interval window `(min, max)` in frames for one obstacle class.
///
/// The window shrinks by `decrease_rate` per difficulty step, but `min` never
/// drops below `floor_cap` and `max` always stays `min_spacing` above `min`.
pub fn interval_bounds(
    frame: u64,
    base_min: u32,
    base_max: u32,
    floor_cap: u32,
    min_spacing: u32,
    speed_increase_interval: u32,
    decrease_rate: u32,
) -> (u32, u32) {
    let step = speed_factor(frame, speed_increase_interval).saturating_mul(u64::from(decrease_rate));
    let step = u32::try_from(step).unwrap_or(u32::MAX);

    let adj_min = floor_cap.max(base_min.saturating_sub(step));
    let adj_max = adj_min
        .saturating_add(min_spacing)
        .max(base_max.saturating_sub(step));
    (adj_min, adj_max)
}

/// Interval window for a class using the balance table
pub fn class_bounds(frame: u64, class: &IntervalTuning, tuning: &Tuning) -> (u32, u32) {
    interval_bounds(
        frame,
        class.base_min,
        class.base_max,
        class.floor_cap,
        class.min_spacing,
        tuning.speed_increase_interval,
        tuning.interval_decrease_rate,
    )
}

/// Forward scroll speed at `frame` (pixels per tick, unbounded)
pub fn speed_at(frame: u64, tuning: &Tuning) -> f32 {
    let steps = speed_factor(frame, tuning.speed_increase_interval);
    tuning.base_speed + steps as f32 * tuning.speed_increment
}

/// Position within the day/night cycle in `[0, 1)`; 0 is noon, 0.5 midnight.
pub fn day_phase(frame: u64, cycle_frames: u32) -> f32 {
    let cycle = u64::from(cycle_frames.max(1));
    (frame % cycle) as f32 / cycle as f32
}
