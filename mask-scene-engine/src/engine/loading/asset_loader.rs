use bevy::asset::{LoadState, RecursiveDependencyLoadState, UntypedAssetId};
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;

use crate::constants::path::{ENVIRONMENT_MAP_PATH, MODEL_PATH};
use crate::engine::assets::scene_assets::SceneAssets;
use crate::engine::loading::progress::{AssetStatus, LoadingProgress};

/// Request the environment map and the model together.
pub fn start_loading(mut assets: ResMut<SceneAssets>, asset_server: Res<AssetServer>) {
    info!("Loading environment: {}", ENVIRONMENT_MAP_PATH);
    info!("Loading model: {}", MODEL_PATH);
    assets.environment = asset_server.load(ENVIRONMENT_MAP_PATH);
    assets.model_source = asset_server.load(MODEL_PATH);
    assets.model = asset_server.load(GltfAssetLabel::Scene(0).from_asset(MODEL_PATH));
}

/// Status of an asset including everything it depends on.
pub fn asset_status(asset_server: &AssetServer, id: impl Into<UntypedAssetId>) -> AssetStatus {
    match asset_server.get_load_states(id) {
        Some((LoadState::Failed(err), _, _)) => AssetStatus::Failed(err.to_string()),
        Some((_, _, RecursiveDependencyLoadState::Failed(err))) => {
            AssetStatus::Failed(err.to_string())
        }
        Some((_, _, RecursiveDependencyLoadState::Loaded)) => AssetStatus::Ready,
        _ => AssetStatus::Pending,
    }
}

/// Status of a labeled sub-asset. Loader errors only fail the handle of the
/// whole file, so `source` is consulted first.
pub fn labeled_asset_status(
    asset_server: &AssetServer,
    source: impl Into<UntypedAssetId>,
    labeled: impl Into<UntypedAssetId>,
) -> AssetStatus {
    match asset_status(asset_server, source) {
        AssetStatus::Failed(reason) => AssetStatus::Failed(reason),
        _ => asset_status(asset_server, labeled),
    }
}

pub fn check_scene_loading(
    mut loading_progress: ResMut<LoadingProgress>,
    assets: Res<SceneAssets>,
    asset_server: Res<AssetServer>,
) {
    let progress = LoadingProgress {
        environment: asset_status(&asset_server, assets.environment.id()),
        model: labeled_asset_status(
            &asset_server,
            assets.model_source.id(),
            assets.model.id(),
        ),
    };

    if *loading_progress == progress {
        return;
    }
    if progress.environment == AssetStatus::Ready && loading_progress.environment != AssetStatus::Ready {
        info!("✓ Environment map loaded");
    }
    if progress.model == AssetStatus::Ready && loading_progress.model != AssetStatus::Ready {
        info!("✓ Model loaded");
    }
    *loading_progress = progress;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::io::Reader;
    use bevy::asset::{AssetLoader, LoadContext};
    use bevy::gltf::Gltf;
    use std::time::Duration;

    #[derive(Asset, TypePath, Debug)]
    struct Document;

    /// Rejects every file the way a corrupt glb is rejected.
    #[derive(Default)]
    struct CorruptDocumentLoader;

    impl AssetLoader for CorruptDocumentLoader {
        type Asset = Document;
        type Settings = ();
        type Error = std::io::Error;

        async fn load(
            &self,
            _reader: &mut dyn Reader,
            _settings: &(),
            _load_context: &mut LoadContext<'_>,
        ) -> Result<Document, Self::Error> {
            Err(std::io::Error::other("unsupported document"))
        }

        fn extensions(&self) -> &[&str] {
            &["md"]
        }
    }

    fn loader_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Document>()
            .register_asset_loader(CorruptDocumentLoader);
        app
    }

    fn settle(app: &mut App, status: impl Fn(&AssetServer) -> AssetStatus) -> AssetStatus {
        for _ in 0..500 {
            app.update();
            let current = status(app.world().resource::<AssetServer>());
            if current != AssetStatus::Pending {
                return current;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        AssetStatus::Pending
    }

    #[test]
    fn missing_file_is_a_failure() {
        let mut app = loader_app();
        let handle: Handle<Document> = app
            .world()
            .resource::<AssetServer>()
            .load("textures/does_not_exist.md");

        let status = settle(&mut app, |server| asset_status(server, handle.id()));
        assert!(matches!(status, AssetStatus::Failed(_)));
    }

    #[test]
    fn decode_error_fails_the_labeled_scene() {
        let mut app = loader_app();
        let server = app.world().resource::<AssetServer>().clone();
        let source: Handle<Document> = server.load("README.md");
        let labeled: Handle<Document> = server.load("README.md#Scene0");

        let status = settle(&mut app, |server| {
            labeled_asset_status(server, source.id(), labeled.id())
        });
        assert!(matches!(status, AssetStatus::Failed(_)));
    }

    #[test]
    fn missing_file_fails_the_labeled_scene() {
        let mut app = loader_app();
        let server = app.world().resource::<AssetServer>().clone();
        let source: Handle<Document> = server.load("models/does_not_exist.md");
        let labeled: Handle<Document> = server.load("models/does_not_exist.md#Scene0");

        let status = settle(&mut app, |server| {
            labeled_asset_status(server, source.id(), labeled.id())
        });
        assert!(matches!(status, AssetStatus::Failed(_)));
    }

    /// Stands in for the glTF loader failing on an undecodable file.
    #[derive(Default)]
    struct CorruptGltfLoader;

    impl AssetLoader for CorruptGltfLoader {
        type Asset = Gltf;
        type Settings = ();
        type Error = std::io::Error;

        async fn load(
            &self,
            _reader: &mut dyn Reader,
            _settings: &(),
            _load_context: &mut LoadContext<'_>,
        ) -> Result<Gltf, Self::Error> {
            Err(std::io::Error::other("required extension not supported"))
        }

        fn extensions(&self) -> &[&str] {
            &["md"]
        }
    }

    #[test]
    fn undecodable_model_reaches_loading_progress() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()))
            .init_asset::<Gltf>()
            .init_asset::<Scene>()
            .init_asset::<Image>()
            .register_asset_loader(CorruptGltfLoader)
            .init_resource::<LoadingProgress>()
            .add_systems(Update, check_scene_loading);

        let server = app.world().resource::<AssetServer>().clone();
        app.insert_resource(SceneAssets {
            model_source: server.load("README.md"),
            model: server.load(GltfAssetLabel::Scene(0).from_asset("README.md")),
            ..default()
        });

        for _ in 0..500 {
            app.update();
            if app.world().resource::<LoadingProgress>().model != AssetStatus::Pending {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }

        let progress = app.world().resource::<LoadingProgress>();
        assert!(matches!(progress.model, AssetStatus::Failed(_)));
        assert_eq!(progress.environment, AssetStatus::Pending);
    }
}
