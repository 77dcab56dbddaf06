//! Scene contents: the key light and the pointer-driven mask model.

use bevy::prelude::*;

/// Directional key light aimed at the model.
pub mod lighting;

/// Exponentially smoothed model rotation toward the pointer target.
pub mod model_follow;

/// Everything spawned for the scene; despawned together on unmount.
#[derive(Component, Debug, Default)]
pub struct SceneEntity;
