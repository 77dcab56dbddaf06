use bevy::gltf::Gltf;
use bevy::prelude::*;

/// Asset handles owned by the scene for its whole lifetime.
#[derive(Resource, Default, Debug, Clone)]
pub struct SceneAssets {
    pub environment: Handle<Image>,
    pub model: Handle<Scene>,
    /// Whole glTF file. Decode errors are only reported on this handle,
    /// never on the labeled scene.
    pub model_source: Handle<Gltf>,
    /// Set once the environment has been converted and attached.
    pub environment_cubemap: Option<Handle<Image>>,
}

impl SceneAssets {
    pub fn is_attached(&self) -> bool {
        self.environment_cubemap.is_some()
    }
}
