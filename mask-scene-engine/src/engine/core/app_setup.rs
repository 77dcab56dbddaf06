use bevy::asset::AssetMetaCheck;
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
// Crate engine modules
use crate::constants::scene_settings::{
    CAMERA_FAR, CAMERA_FOV_DEGREES, CAMERA_NEAR, CAMERA_START_POSITION, LOOK_TARGET,
};
use crate::engine::assets::scene_assets::SceneAssets;
use crate::engine::camera::{
    SceneCamera,
    intro_animation::{CameraIntro, camera_intro_system},
    orbit_camera::{OrbitCamera, orbit_input_system, orbit_update_system},
    projection::{ViewportSize, viewport_resize_system},
};
use crate::engine::core::app_state::{AppState, MouseFollow, SceneEvent, scene_is_live};
use crate::engine::core::lifecycle::{
    SceneLifecycle, UnmountRequest, forward_window_close_requests, handle_unmount_requests,
    teardown_scene,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::asset_loader::{check_scene_loading, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::scene_attach::attach_scene_when_ready;
use crate::engine::scene::SceneEntity;
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::scene::model_follow::model_follow_system;
use crate::engine::systems::fps_tracking::fps_notification_system;
use crate::engine::systems::pointer_tracking::{PointerPosition, pointer_tracking_system};
#[cfg(not(target_arch = "wasm32"))]
use crate::engine::{core::app_state::FpsText, systems::fps_tracking::fps_text_update_system};
// Host bridge
use crate::rpc::web_rpc::WebRpcPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(WebRpcPlugin);

    app.init_resource::<SceneAssets>()
        .init_resource::<LoadingProgress>()
        .init_resource::<SceneLifecycle>()
        .init_resource::<MouseFollow>()
        .init_resource::<OrbitCamera>()
        .init_resource::<PointerPosition>()
        .init_resource::<ViewportSize>()
        .add_event::<SceneEvent>()
        .add_event::<UnmountRequest>();

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (check_scene_loading, attach_scene_when_ready)
                .chain()
                .run_if(in_state(AppState::Loading)),
        );

    // Handlers that stay registered for the scene's whole lifetime.
    app.add_systems(
        Update,
        (
            viewport_resize_system,
            pointer_tracking_system,
            forward_window_close_requests,
            handle_unmount_requests,
        )
            .chain()
            .run_if(not(in_state(AppState::Unmounted))),
    );

    // Per-frame camera/model update cycle; rendering follows in the engine.
    app.add_systems(
        Update,
        (
            camera_intro_system.run_if(in_state(AppState::Intro)),
            model_follow_system,
            orbit_input_system,
            orbit_update_system,
        )
            .chain()
            .run_if(scene_is_live),
    )
    .add_systems(Update, fps_notification_system.run_if(scene_is_live));

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app.add_systems(OnEnter(AppState::Intro), log_state_entered)
        .add_systems(OnEnter(AppState::Interactive), log_state_entered)
        .add_systems(OnEnter(AppState::LoadFailed), log_state_entered)
        .add_systems(OnExit(AppState::Intro), drop_camera_intro)
        .add_systems(OnEnter(AppState::Unmounted), teardown_scene);

    app
}

fn log_state_entered(state: Res<State<AppState>>) {
    info!("→ Entered {} state", state.get().as_str());
}

fn drop_camera_intro(mut commands: Commands) {
    commands.remove_resource::<CameraIntro>();
}

fn spawn_scene_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            // Nothing is drawn until both assets are attached.
            is_active: false,
            hdr: true,
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: CAMERA_FOV_DEGREES.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Tonemapping::AgX,
        Transform::from_translation(CAMERA_START_POSITION).looking_at(LOOK_TARGET, Vec3::Y),
        SceneCamera,
        SceneEntity,
    ));
}

fn setup(mut commands: Commands, windows: Query<&Window>) {
    info!("=== MASK SCENE ===");

    if let Ok(window) = windows.single() {
        commands.insert_resource(ViewportSize {
            width: window.width(),
            height: window.height(),
        });
    }

    spawn_lighting(&mut commands);
    spawn_scene_camera(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
            SceneEntity,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        // Closing goes through the unmount path first.
        close_when_requested: false,
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        level: Level::INFO,
        filter: "wgpu=error,naga=warn".to_string(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
