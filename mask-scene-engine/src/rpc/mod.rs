//! JSON-RPC 2.0 bridge between the scene and the page hosting its canvas.
//!
//! Messages travel over `window.postMessage`. The host can query the scene
//! and ask it to unmount; the scene pushes lifecycle notifications back.
//!
//! ```text
//! Host page  <──postMessage──>  Scene canvas (wasm)
//!     │                               │
//!     ├─ Request (with ID) ─────────> │
//!     │ <──────── Response (with ID) ─┤
//!     │ <────── Notification (no ID) ─┤
//! ```
//!
//! ## Requests
//! - `get_scene_state`: `{ state, mouse_follow, model_loaded }`
//! - `get_fps`: `{ fps }`
//! - `unmount`: tear the scene down, `{ success: true }`
//!
//! ## Notifications
//! - `assets_loaded`, `asset_load_failed { reason }`, `intro_complete`
//! - `fps_update { fps }` every half second
//!
//! ## Error codes
//! - `-32601`: Method not found
//! - `-32603`: Internal error
//!
//! On native targets the bridge is inert: nothing listens and outgoing
//! messages are dropped.

/// Request handling, notification forwarding and the wasm message listener.
pub mod web_rpc;
