use bevy::prelude::*;

use crate::constants::render_settings::{KEY_LIGHT_ILLUMINANCE, KEY_LIGHT_POSITION};
use crate::engine::scene::SceneEntity;

pub fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: KEY_LIGHT_ILLUMINANCE,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(KEY_LIGHT_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
        SceneEntity,
    ));
}
