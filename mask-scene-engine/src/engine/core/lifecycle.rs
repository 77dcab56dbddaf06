use bevy::prelude::*;
use bevy::window::WindowCloseRequested;

use crate::engine::core::app_state::AppState;
use crate::engine::scene::SceneEntity;

/// Cancellation token for the scene. Once cancelled, late asset loads are
/// dropped instead of attached.
#[derive(Resource, Default, Debug)]
pub struct SceneLifecycle {
    cancelled: bool,
}

impl SceneLifecycle {
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Returns true only for the call that cancelled the scene.
    pub fn cancel(&mut self) -> bool {
        let switched = !self.cancelled;
        self.cancelled = true;
        switched
    }
}

/// Ask the scene to tear itself down.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct UnmountRequest;

/// Native window close behaves like the host unmounting the canvas.
pub fn forward_window_close_requests(
    mut close_requests: EventReader<WindowCloseRequested>,
    mut unmount: EventWriter<UnmountRequest>,
) {
    if close_requests.read().count() > 0 {
        unmount.write(UnmountRequest);
    }
}

pub fn handle_unmount_requests(
    mut requests: EventReader<UnmountRequest>,
    mut lifecycle: ResMut<SceneLifecycle>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if requests.read().count() == 0 {
        return;
    }
    if lifecycle.cancel() {
        info!("→ Unmount requested, tearing down scene");
        next_state.set(AppState::Unmounted);
    }
}

/// Despawn the scene, detach the canvas and stop the frame loop.
pub fn teardown_scene(
    mut commands: Commands,
    scene_entities: Query<Entity, With<SceneEntity>>,
    mut exit: EventWriter<AppExit>,
) {
    let mut despawned = 0;
    for entity in &scene_entities {
        commands.entity(entity).despawn();
        despawned += 1;
    }
    info!("Scene torn down ({} entities)", despawned);

    #[cfg(target_arch = "wasm32")]
    detach_canvas();

    exit.write(AppExit::Success);
}

#[cfg(target_arch = "wasm32")]
fn detach_canvas() {
    use crate::constants::path::CANVAS_SELECTOR;

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        error!("Document not available, canvas left attached");
        return;
    };
    match document.query_selector(CANVAS_SELECTOR) {
        Ok(Some(canvas)) => canvas.remove(),
        Ok(None) => warn!("Canvas {} already detached", CANVAS_SELECTOR),
        Err(e) => error!("Failed to query canvas {}: {:?}", CANVAS_SELECTOR, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    fn lifecycle_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .add_event::<UnmountRequest>()
            .add_event::<WindowCloseRequested>()
            .init_resource::<SceneLifecycle>()
            .add_systems(
                Update,
                (forward_window_close_requests, handle_unmount_requests).chain(),
            )
            .add_systems(OnEnter(AppState::Unmounted), teardown_scene);
        app
    }

    #[test]
    fn cancel_reports_first_call_only() {
        let mut lifecycle = SceneLifecycle::default();
        assert!(lifecycle.cancel());
        assert!(!lifecycle.cancel());
        assert!(lifecycle.is_cancelled());
    }

    #[test]
    fn unmount_despawns_scene_and_requests_exit() {
        let mut app = lifecycle_app();
        for _ in 0..3 {
            app.world_mut().spawn((SceneEntity, Transform::default()));
        }
        let unrelated = app.world_mut().spawn(Transform::default()).id();

        app.update();
        assert!(app.should_exit().is_none());

        app.world_mut().send_event(UnmountRequest);
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Unmounted
        );
        assert!(app.world().resource::<SceneLifecycle>().is_cancelled());
        let mut remaining = app.world_mut().query_filtered::<Entity, With<SceneEntity>>();
        assert_eq!(remaining.iter(app.world()).count(), 0);
        assert!(app.world().get_entity(unrelated).is_ok());
        assert_eq!(app.should_exit(), Some(AppExit::Success));
    }

    #[test]
    fn window_close_counts_as_unmount() {
        let mut app = lifecycle_app();
        let window = app.world_mut().spawn_empty().id();
        app.world_mut().send_event(WindowCloseRequested { window });
        app.update();
        app.update();

        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Unmounted
        );
    }
}
