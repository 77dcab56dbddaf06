/// Equirectangular HDR used as both background and environment lighting.
pub const ENVIRONMENT_MAP_PATH: &str = "textures/venice_sunset_1k.hdr";

/// Mask model. Loaded through the first scene of the glTF binary.
pub const MODEL_PATH: &str = "models/venice_mask.glb";

/// Canvas the wasm build renders into (see `index.html`).
pub const CANVAS_SELECTOR: &str = "#mask-scene";
