use bevy::prelude::*;

use crate::constants::scene_settings::{FOLLOW_PITCH_RANGE, FOLLOW_SMOOTHING, FOLLOW_YAW_RANGE};
use crate::engine::core::app_state::MouseFollow;
use crate::engine::systems::pointer_tracking::PointerPosition;

/// Root of the loaded mask model and its smoothed rotation.
///
/// Rotation is kept as pitch/yaw rather than read back from the transform so
/// the smoothing never has to decompose a quaternion.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct MaskModel {
    pub pitch: f32,
    pub yaw: f32,
}

impl MaskModel {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.pitch, self.yaw, 0.0)
    }

    /// Move `factor` of the remaining distance toward the pointer target.
    pub fn follow(&mut self, pointer: Vec2, factor: f32) {
        let target = follow_target(pointer);
        self.pitch = smooth_towards(self.pitch, target.x, factor);
        self.yaw = smooth_towards(self.yaw, target.y, factor);
    }
}

/// Target (pitch, yaw) for a normalized pointer position.
pub fn follow_target(pointer: Vec2) -> Vec2 {
    Vec2::new(
        (pointer.y - 0.5) * FOLLOW_PITCH_RANGE,
        (pointer.x - 0.5) * FOLLOW_YAW_RANGE,
    )
}

pub fn smooth_towards(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Applied once per frame; the smoothing is deliberately not scaled by delta time.
pub fn model_follow_system(
    mouse_follow: Res<MouseFollow>,
    pointer: Res<PointerPosition>,
    mut models: Query<(&mut MaskModel, &mut Transform)>,
) {
    if !mouse_follow.enabled() {
        return;
    }
    for (mut model, mut transform) in &mut models {
        model.follow(pointer.0, FOLLOW_SMOOTHING);
        transform.rotation = model.rotation();
    }
}
