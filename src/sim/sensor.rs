//! Vision sensor
//!
//! Each player sees a ring of fixed landmark flags around the field border plus
//! whatever dynamic centers (ball, other players) the match hands it. Readings
//! are direction vectors from the player to each target, in pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Pose, normalize_or_x};
use crate::config::SimConfig;

/// Reading reported for a target outside the vision cone
pub const NOT_SENSED: Vec2 = Vec2::INFINITY;

/// True if a sensor reading is a real bearing
#[inline]
pub fn is_sensed(reading: Vec2) -> bool {
    reading.is_finite()
}

/// Landmark points ringing the field, `resolution` per edge
///
/// Walks top, right, bottom, left so consecutive flags are neighbors and
/// corners appear once.
pub fn generate_flags(width: f32, height: f32, resolution: usize) -> Vec<Vec2> {
    let n = resolution as f32;
    let mut flags = Vec::with_capacity(resolution * 4);
    for i in 0..resolution {
        flags.push(Vec2::new(width * i as f32 / n, 0.0));
    }
    for i in 0..resolution {
        flags.push(Vec2::new(width, height * i as f32 / n));
    }
    for i in 0..resolution {
        flags.push(Vec2::new(width - width * i as f32 / n, height));
    }
    for i in 0..resolution {
        flags.push(Vec2::new(0.0, height - height * i as f32 / n));
    }
    flags
}

/// Field-of-view distance sensor bound to one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    flags: Vec<Vec2>,
    full_vision: bool,
    half_angle: f32,
    pixels_per_meter: f32,
}

impl Sensor {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            flags: generate_flags(config.field_width, config.field_height, config.flag_resolution),
            full_vision: false,
            half_angle: config.vision_half_angle,
            pixels_per_meter: config.pixels_per_meter,
        }
    }

    pub fn flags(&self) -> &[Vec2] {
        &self.flags
    }

    pub fn full_vision(&self) -> bool {
        self.full_vision
    }

    /// Skip the cone test and report every target
    pub fn set_full_vision(&mut self, full_vision: bool) {
        self.full_vision = full_vision;
    }

    /// Whether `target` lies inside the cone around the heading of `origin`
    pub fn in_view(&self, origin: &Pose, target: Vec2) -> bool {
        let dir = normalize_or_x(target - origin.position);
        let cos = origin.heading_vector().dot(dir).clamp(-1.0, 1.0);
        cos.acos() <= self.half_angle
    }

    /// One reading per flag, then one per dynamic center in caller order
    pub fn calculate_distance(&self, origin: &Pose, others: &[Vec2]) -> Vec<Vec2> {
        self.flags
            .iter()
            .chain(others.iter())
            .map(|&target| self.read(origin, target))
            .collect()
    }

    fn read(&self, origin: &Pose, target: Vec2) -> Vec2 {
        if !self.full_vision && !self.in_view(origin, target) {
            return NOT_SENSED;
        }
        (target - origin.position) * self.pixels_per_meter
    }
}
