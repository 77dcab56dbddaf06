//! Core application setup and state management.
//!
//! Handles application lifecycle, window configuration, state transitions,
//! and plugin initialisation for both native and WASM targets.

/// Application setup and system scheduling for the Bevy engine.
pub mod app_setup;

/// Scene state machine, the pointer-follow mode flag and scene milestones.
pub mod app_state;

/// Cancellation and teardown of the scene on unmount.
pub mod lifecycle;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
