//! Asset loading and scene attachment.
//!
//! Both the environment map and the model are requested at startup. Their
//! load states are polled each frame into `LoadingProgress`; once both are
//! ready the scene is attached, and a failure of either ends loading for good.

/// Startup requests and per-frame load state polling.
pub mod asset_loader;

/// Loading progress, the combined outcome of both loads, and load errors.
pub mod progress;

/// Attaches model and environment to the scene once both loads succeed.
pub mod scene_attach;
