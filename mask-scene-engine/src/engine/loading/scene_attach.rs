use bevy::core_pipeline::Skybox;
use bevy::prelude::*;

use crate::constants::render_settings::{
    ENVIRONMENT_LIGHT_INTENSITY, MAX_CUBEMAP_FACE_SIZE, SKYBOX_BRIGHTNESS,
};
use crate::engine::assets::environment_map::equirect_to_cubemap;
use crate::engine::assets::scene_assets::SceneAssets;
use crate::engine::camera::SceneCamera;
use crate::engine::camera::intro_animation::CameraIntro;
use crate::engine::core::app_state::{AppState, SceneEvent};
use crate::engine::core::lifecycle::SceneLifecycle;
use crate::engine::loading::progress::{LoadOutcome, LoadingProgress, SceneLoadError};
use crate::engine::scene::SceneEntity;
use crate::engine::scene::model_follow::MaskModel;

/// Background and image-based lighting, both sampling the same cubemap.
pub fn environment_components(cubemap: Handle<Image>) -> (Skybox, EnvironmentMapLight) {
    (
        Skybox {
            image: cubemap.clone(),
            brightness: SKYBOX_BRIGHTNESS,
            rotation: Quat::IDENTITY,
        },
        EnvironmentMapLight {
            diffuse_map: cubemap.clone(),
            specular_map: cubemap,
            intensity: ENVIRONMENT_LIGHT_INTENSITY,
            ..default()
        },
    )
}

fn prepare_environment(
    assets: &SceneAssets,
    images: &mut Assets<Image>,
) -> Result<Handle<Image>, SceneLoadError> {
    let source = images
        .get(&assets.environment)
        .ok_or(SceneLoadError::EnvironmentMissing)?;
    let cubemap = equirect_to_cubemap(source, MAX_CUBEMAP_FACE_SIZE)?;
    Ok(images.add(cubemap))
}

fn report_load_failure(
    err: SceneLoadError,
    next_state: &mut NextState<AppState>,
    scene_events: &mut EventWriter<SceneEvent>,
) {
    error!("Scene assets failed: {}", err);
    next_state.set(AppState::LoadFailed);
    scene_events.write(SceneEvent::LoadFailed {
        reason: err.to_string(),
    });
}

pub fn attach_scene_when_ready(
    mut commands: Commands,
    loading_progress: Res<LoadingProgress>,
    lifecycle: Res<SceneLifecycle>,
    mut assets: ResMut<SceneAssets>,
    mut images: ResMut<Assets<Image>>,
    mut next_state: ResMut<NextState<AppState>>,
    mut scene_events: EventWriter<SceneEvent>,
    mut camera_query: Query<(Entity, &mut Camera), With<SceneCamera>>,
) {
    if lifecycle.is_cancelled() || assets.is_attached() {
        return;
    }

    match loading_progress.outcome() {
        LoadOutcome::Pending => return,
        LoadOutcome::Failed(err) => {
            report_load_failure(err, &mut next_state, &mut scene_events);
            return;
        }
        LoadOutcome::Ready => {}
    }

    // Checked before conversion so a missing camera never adds cubemaps.
    let Ok((camera_entity, mut camera)) = camera_query.single_mut() else {
        warn!("Scene assets ready but no scene camera to attach them to");
        return;
    };

    let cubemap = match prepare_environment(&assets, &mut images) {
        Ok(cubemap) => cubemap,
        Err(err) => {
            report_load_failure(err, &mut next_state, &mut scene_events);
            return;
        }
    };

    commands
        .entity(camera_entity)
        .insert(environment_components(cubemap.clone()));
    camera.is_active = true;

    commands.spawn((
        SceneRoot(assets.model.clone()),
        Transform::default(),
        MaskModel::default(),
        SceneEntity,
    ));

    assets.environment_cubemap = Some(cubemap);
    commands.insert_resource(CameraIntro::default());

    info!("→ Scene attached, starting camera intro");
    next_state.set(AppState::Intro);
    scene_events.write(SceneEvent::AssetsLoaded);
}
