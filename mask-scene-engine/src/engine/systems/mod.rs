//! Runtime systems for input tracking and diagnostics.

/// FPS notifications to the host page and the native overlay text.
pub mod fps_tracking;

/// Normalized pointer position, read by the model follow effect.
pub mod pointer_tracking;
