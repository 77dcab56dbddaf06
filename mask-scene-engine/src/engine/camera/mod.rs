//! Scene camera: intro fly-in, damped orbit controls and projection upkeep.
//!
//! The camera is spawned by the bootstrapper, driven by the intro animation
//! until it completes, then left to the orbit controls.

use bevy::prelude::*;

/// One-shot eased camera flight from the start offset to the frontal pose.
pub mod intro_animation;

/// Damped orbit controls constrained to a distance band around the look target.
pub mod orbit_camera;

/// Viewport resize handling for the perspective projection.
pub mod projection;

/// Marks the single camera that renders the mask scene.
#[derive(Component, Debug, Default)]
pub struct SceneCamera;
