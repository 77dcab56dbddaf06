use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
    window::PrimaryWindow,
};
use std::f32::consts::{PI, TAU};

use crate::constants::scene_settings::{
    LOOK_TARGET, ORBIT_DAMPING_FACTOR, ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE,
};
use crate::engine::camera::SceneCamera;

/// Keeps the polar angle off the poles so `looking_at` stays well defined.
const POLAR_EPSILON: f32 = 1e-6;

/// Pixel-unit wheel deltas are divided by this to approximate line steps.
const PIXELS_PER_SCROLL_LINE: f32 = 100.0;

/// Damped orbit controls around a fixed target point.
///
/// Input accumulates into pending deltas; `update` applies a damped share of
/// them to whatever pose the camera currently has, so poses written by other
/// systems (the intro animation) are picked up on the next update.
#[derive(Resource, Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_pan: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_scale: f32,
    pending_pan: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: LOOK_TARGET,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            enable_damping: true,
            damping_factor: ORBIT_DAMPING_FACTOR,
            enable_pan: false,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_scale: 1.0,
            pending_pan: Vec3::ZERO,
        }
    }
}

impl OrbitCamera {
    /// Queue a drag rotation. A drag across the full viewport height turns
    /// the camera one full revolution.
    pub fn rotate(&mut self, drag: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.pending_yaw -= TAU * drag.x / viewport_height * self.rotate_speed;
        self.pending_pitch -= TAU * drag.y / viewport_height * self.rotate_speed;
    }

    /// Queue a dolly. Positive notches move the camera toward the target.
    pub fn dolly(&mut self, notches: f32) {
        self.pending_scale *= 0.95_f32.powf(self.zoom_speed * notches);
    }

    /// Queue a screen-space pan. Ignored unless panning is enabled.
    pub fn pan(&mut self, drag: Vec2, viewport_height: f32, camera_transform: &Transform) {
        if !self.enable_pan || viewport_height <= 0.0 {
            return;
        }
        let distance = (camera_transform.translation - self.target).length();
        let scale = distance / viewport_height * self.pan_speed;
        let right = camera_transform.right();
        let up = camera_transform.up();
        self.pending_pan += right * -drag.x * scale + up * drag.y * scale;
    }

    /// Apply pending input to `transform` and re-aim it at the target.
    ///
    /// Returns true when the camera moved.
    pub fn update(&mut self, transform: &mut Transform) -> bool {
        let before = transform.translation;
        let offset = transform.translation - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.pending_yaw * share;
        phi = (phi + self.pending_pitch * share).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.target += self.pending_pan * share;

        let radius = (radius * self.pending_scale).clamp(self.min_distance, self.max_distance);
        let offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );

        transform.translation = self.target + offset;
        transform.look_at(self.target, Vec3::Y);

        if self.enable_damping {
            let decay = 1.0 - self.damping_factor;
            self.pending_yaw *= decay;
            self.pending_pitch *= decay;
            self.pending_pan *= decay;
        } else {
            self.pending_yaw = 0.0;
            self.pending_pitch = 0.0;
            self.pending_pan = Vec3::ZERO;
        }
        self.pending_scale = 1.0;

        transform.translation.distance_squared(before) > f32::EPSILON * f32::EPSILON
    }
}

/// Collect drag and wheel input into the orbit controls.
pub fn orbit_input_system(
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<&Transform, With<SceneCamera>>,
) {
    let viewport_height = windows.single().map(|w| w.height()).unwrap_or(0.0);

    let total_motion: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    if total_motion != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            orbit.rotate(total_motion, viewport_height);
        } else if mouse_button.pressed(MouseButton::Right) {
            if let Ok(transform) = camera_query.single() {
                orbit.pan(total_motion, viewport_height, transform);
            }
        }
    }

    for scroll in scroll_events.read() {
        let notches = match scroll.unit {
            MouseScrollUnit::Line => scroll.y,
            MouseScrollUnit::Pixel => scroll.y / PIXELS_PER_SCROLL_LINE,
        };
        orbit.dolly(notches);
    }
}

/// Per-frame orbit controls refresh.
pub fn orbit_update_system(
    mut orbit: ResMut<OrbitCamera>,
    mut camera_query: Query<&mut Transform, With<SceneCamera>>,
) {
    if let Ok(mut transform) = camera_query.single_mut() {
        orbit.update(&mut transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::scene_settings::CAMERA_REST_POSITION;

    fn rest_transform() -> Transform {
        Transform::from_translation(CAMERA_REST_POSITION).looking_at(LOOK_TARGET, Vec3::Y)
    }

    #[test]
    fn idle_update_keeps_pose_within_band() {
        let mut orbit = OrbitCamera::default();
        let mut transform = rest_transform();

        assert!(!orbit.update(&mut transform));
        assert!(transform.translation.distance(CAMERA_REST_POSITION) < 1e-5);
        assert!(transform.forward().dot((LOOK_TARGET - CAMERA_REST_POSITION).normalize()) > 0.9999);
    }

    #[test]
    fn distance_is_clamped_to_band() {
        let mut orbit = OrbitCamera::default();
        let mut far = Transform::from_xyz(0.0, 0.03, 5.0);
        orbit.update(&mut far);
        assert!((far.translation.distance(LOOK_TARGET) - ORBIT_MAX_DISTANCE).abs() < 1e-5);

        let mut near = Transform::from_xyz(0.0, 0.03, 0.001);
        orbit.update(&mut near);
        assert!((near.translation.distance(LOOK_TARGET) - ORBIT_MIN_DISTANCE).abs() < 1e-5);
    }

    #[test]
    fn damped_rotation_keeps_moving_after_input_stops() {
        let mut orbit = OrbitCamera::default();
        let mut transform = rest_transform();
        orbit.rotate(Vec2::new(100.0, 0.0), 800.0);

        let mut steps = Vec::new();
        for _ in 0..5 {
            let before = transform.translation;
            orbit.update(&mut transform);
            steps.push(transform.translation.distance(before));
        }

        assert!(steps.iter().all(|step| *step > 0.0));
        assert!(steps.windows(2).all(|pair| pair[1] < pair[0]));
        assert!((transform.translation.distance(LOOK_TARGET) - 0.1).abs() < 1e-4);
    }

    #[test]
    fn undamped_rotation_applies_in_one_update() {
        let mut orbit = OrbitCamera {
            enable_damping: false,
            ..default()
        };
        let mut transform = rest_transform();
        // A quarter of the viewport height is a quarter turn.
        orbit.rotate(Vec2::new(-200.0, 0.0), 800.0);
        orbit.update(&mut transform);

        let offset = transform.translation - LOOK_TARGET;
        assert!((offset.x - 0.1).abs() < 1e-4);
        assert!(offset.z.abs() < 1e-4);
        assert!(!orbit.update(&mut transform));
    }

    #[test]
    fn pan_is_ignored_when_disabled() {
        let mut orbit = OrbitCamera::default();
        let mut transform = rest_transform();
        orbit.pan(Vec2::new(50.0, 50.0), 800.0, &transform);
        orbit.update(&mut transform);
        assert_eq!(orbit.target, LOOK_TARGET);
    }

    #[test]
    fn dolly_in_shrinks_distance() {
        let mut orbit = OrbitCamera::default();
        let mut transform = rest_transform();
        orbit.dolly(2.0);
        orbit.update(&mut transform);
        let expected = 0.1 * 0.95_f32.powi(2);
        assert!((transform.translation.distance(LOOK_TARGET) - expected).abs() < 1e-5);
    }
}
