use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::core::{Camera, CameraPose};
use crate::options::ControlOptions;

/// Keeps the polar angle off the poles so `look_at` stays well defined.
const POLAR_EPSILON: f32 = 1e-3;
/// Per-notch dolly ratio before the zoom speed multiplier.
const DOLLY_STEP: f32 = 0.95;
/// Pending motion below this is treated as settled.
const SETTLE_EPSILON: f32 = 1e-5;

/// Damped orbit controls around a target point.
///
/// Input methods queue motion; [`update`](Self::update) applies a damped
/// fraction of it to the camera once per frame. While disabled, input is
/// ignored but queued motion still settles.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    /// Whether user input is accepted.
    pub enabled: bool,
    min_distance: f32,
    max_distance: f32,
    max_polar_angle: f32,
    damping: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    pan_speed: f32,
    /// Pending (azimuth, polar) change in radians.
    spherical_delta: Vec2,
    pan_offset: Vec3,
    scale: f32,
}

impl OrbitControls {
    /// Disabled controls targeting the origin.
    #[must_use]
    pub fn new(options: &ControlOptions) -> Self {
        let mut controls = Self {
            target: Vec3::ZERO,
            enabled: false,
            min_distance: 0.0,
            max_distance: f32::MAX,
            max_polar_angle: options.max_polar_angle,
            damping: options.damping.clamp(0.0, 1.0),
            rotate_speed: options.rotate_speed,
            zoom_speed: options.zoom_speed,
            pan_speed: options.pan_speed,
            spherical_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        };
        controls.set_distance_limits(options.min_distance, options.max_distance);
        controls
    }

    /// Current `(min, max)` orbit distance.
    #[must_use]
    pub fn distance_limits(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    /// Set the orbit distance limits. A `min` above `max` collapses to
    /// `max`.
    pub fn set_distance_limits(&mut self, min: f32, max: f32) {
        self.min_distance = min.min(max);
        self.max_distance = max;
    }

    /// Queue an orbit from a pointer drag of `delta` pixels in a viewport
    /// `viewport_height` pixels tall.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        if !self.enabled || viewport_height <= 0.0 {
            return;
        }
        let per_pixel = TAU / viewport_height * self.rotate_speed;
        self.spherical_delta -= delta * per_pixel;
    }

    /// Queue a pan from a pointer drag. Panning moves the target in the
    /// horizontal plane: sideways for x and forward/back for y.
    pub fn pan(&mut self, delta: Vec2, camera: &Camera, viewport_height: f32) {
        if !self.enabled || viewport_height <= 0.0 {
            return;
        }
        let offset = camera.eye - self.target;
        let visible = 2.0 * offset.length() * (camera.fovy.to_radians() * 0.5).tan();
        let per_pixel = visible / viewport_height * self.pan_speed;

        let forward = offset.normalize_or_zero();
        let right = camera.up.cross(forward).normalize_or_zero();
        let ahead = Vec3::Y.cross(right).normalize_or_zero();
        self.pan_offset += (-right * delta.x + ahead * delta.y) * per_pixel;
    }

    /// Queue a dolly. Positive `amount` moves toward the target.
    pub fn dolly(&mut self, amount: f32) {
        if !self.enabled {
            return;
        }
        self.scale *= DOLLY_STEP.powf(amount * self.zoom_speed);
    }

    /// Drop all queued motion.
    pub fn stop(&mut self) {
        self.spherical_delta = Vec2::ZERO;
        self.pan_offset = Vec3::ZERO;
        self.scale = 1.0;
    }

    /// Whether no queued motion remains.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.spherical_delta.length() < SETTLE_EPSILON
            && self.pan_offset.length() < SETTLE_EPSILON
            && (self.scale - 1.0).abs() < SETTLE_EPSILON
    }

    /// Point the camera at `pose` and drop queued motion.
    pub fn apply_pose(&mut self, camera: &mut Camera, pose: CameraPose) {
        self.stop();
        self.target = pose.target;
        camera.eye = pose.position;
        camera.target = pose.target;
    }

    /// Apply one frame of damped motion and distance/polar limits to
    /// `camera`.
    pub fn update(&mut self, camera: &mut Camera) {
        let offset = camera.eye - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, std::f32::consts::FRAC_PI_2)
        };

        theta += self.spherical_delta.x * self.damping;
        phi += self.spherical_delta.y * self.damping;
        phi = phi.clamp(
            POLAR_EPSILON,
            (self.max_polar_angle - POLAR_EPSILON).max(POLAR_EPSILON),
        );

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * self.damping;

        let (sin_phi, cos_phi) = phi.sin_cos();
        let (sin_theta, cos_theta) = theta.sin_cos();
        camera.eye = self.target
            + Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * radius;
        camera.target = self.target;

        let decay = 1.0 - self.damping;
        self.spherical_delta *= decay;
        self.pan_offset *= decay;
        self.scale = 1.0;
    }
}
