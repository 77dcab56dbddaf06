//! Compile-time configuration for the mask scene.

/// Asset locations relative to the asset root, and the canvas mount point.
pub mod path;

/// Lighting and environment brightness for the camera and scene.
pub mod render_settings;

/// Camera poses, intro timing, orbit limits and pointer-follow gains.
pub mod scene_settings;
