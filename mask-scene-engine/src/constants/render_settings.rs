use bevy::prelude::*;

/// Directional key light placement; it aims at the world origin.
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(1.0, 0.05, 0.7);
pub const KEY_LIGHT_ILLUMINANCE: f32 = 3_000.0;

pub const SKYBOX_BRIGHTNESS: f32 = 1_000.0;
pub const ENVIRONMENT_LIGHT_INTENSITY: f32 = 900.0;

/// Upper bound on the generated cubemap face edge, in texels.
pub const MAX_CUBEMAP_FACE_SIZE: u32 = 512;
