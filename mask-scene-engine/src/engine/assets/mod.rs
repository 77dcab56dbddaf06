//! Scene asset handles and environment map preparation.
//!
//! The environment arrives as an equirectangular HDR and is resampled into a
//! cubemap before it is used as background and image-based lighting.

/// Equirectangular to cubemap conversion for skybox and environment lighting.
pub mod environment_map;

/// Handles for the environment image, the model scene and the derived cubemap.
pub mod scene_assets;
