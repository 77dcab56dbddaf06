use bevy::prelude::*;

use crate::constants::scene_settings::{
    CAMERA_REST_POSITION, CAMERA_START_POSITION, INTRO_DURATION_SECS, LOOK_TARGET,
};
use crate::engine::camera::SceneCamera;
use crate::engine::camera::orbit_camera::OrbitCamera;
use crate::engine::core::app_state::{AppState, MouseFollow, SceneEvent};

/// Quadratic ease-in-out over `t` in [0, 1].
pub fn ease_power2_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntroStep {
    Animating(Vec3),
    /// Emitted once, on the step that reaches the full duration.
    Completed(Vec3),
    Idle,
}

/// One-shot camera fly-in from the start offset to the frontal pose.
#[derive(Resource, Debug, Clone)]
pub struct CameraIntro {
    pub from: Vec3,
    pub to: Vec3,
    pub look_target: Vec3,
    pub duration: f32,
    elapsed: f32,
    finished: bool,
}

impl Default for CameraIntro {
    fn default() -> Self {
        Self::new(CAMERA_START_POSITION, CAMERA_REST_POSITION, INTRO_DURATION_SECS)
    }
}

impl CameraIntro {
    pub fn new(from: Vec3, to: Vec3, duration: f32) -> Self {
        Self {
            from,
            to,
            look_target: LOOK_TARGET,
            duration,
            elapsed: 0.0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn advance(&mut self, delta_secs: f32) -> IntroStep {
        if self.finished {
            return IntroStep::Idle;
        }

        self.elapsed += delta_secs.max(0.0);
        let position = self.from.lerp(self.to, ease_power2_in_out(self.progress()));

        if self.progress() >= 1.0 {
            self.finished = true;
            IntroStep::Completed(self.to)
        } else {
            IntroStep::Animating(position)
        }
    }
}

/// Drive the intro, then hand the camera over to pointer-follow mode.
pub fn camera_intro_system(
    mut intro: ResMut<CameraIntro>,
    mut orbit: ResMut<OrbitCamera>,
    mut mouse_follow: ResMut<MouseFollow>,
    mut next_state: ResMut<NextState<AppState>>,
    mut scene_events: EventWriter<SceneEvent>,
    mut camera_query: Query<&mut Transform, With<SceneCamera>>,
    time: Res<Time>,
) {
    if intro.is_finished() {
        return;
    }
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };

    let position = match intro.advance(time.delta_secs()) {
        IntroStep::Animating(position) => position,
        IntroStep::Completed(position) => {
            if mouse_follow.enable() {
                info!("→ Camera intro complete, enabling pointer follow");
                next_state.set(AppState::Interactive);
                scene_events.write(SceneEvent::IntroCompleted);
            }
            position
        }
        IntroStep::Idle => return,
    };

    transform.translation = position;
    transform.look_at(intro.look_target, Vec3::Y);
    orbit.update(&mut transform);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_power2_in_out(0.0), 0.0);
        assert_eq!(ease_power2_in_out(0.5), 0.5);
        assert_eq!(ease_power2_in_out(1.0), 1.0);
        assert!(ease_power2_in_out(0.25) < 0.25);
        assert!(ease_power2_in_out(0.75) > 0.75);
    }

    #[test]
    fn completes_exactly_once_after_full_duration() {
        let mut intro = CameraIntro::default();
        let dt = 1.0 / 60.0;
        let mut elapsed = 0.0;
        let mut completions = 0;

        for _ in 0..(60 * 14) {
            elapsed += dt;
            match intro.advance(dt) {
                IntroStep::Animating(_) => assert!(elapsed < INTRO_DURATION_SECS + dt),
                IntroStep::Completed(position) => {
                    completions += 1;
                    assert!(elapsed >= INTRO_DURATION_SECS - 1e-3);
                    assert_eq!(position, CAMERA_REST_POSITION);
                }
                IntroStep::Idle => assert!(intro.is_finished()),
            }
        }

        assert_eq!(completions, 1);
    }

    #[test]
    fn path_starts_at_offset_and_ends_frontal() {
        let mut intro = CameraIntro::default();
        match intro.advance(0.0) {
            IntroStep::Animating(position) => assert_eq!(position, CAMERA_START_POSITION),
            step => panic!("unexpected step {step:?}"),
        }
        match intro.advance(INTRO_DURATION_SECS) {
            IntroStep::Completed(position) => assert_eq!(position, CAMERA_REST_POSITION),
            step => panic!("unexpected step {step:?}"),
        }
    }

    fn intro_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<AppState>()
            .add_event::<SceneEvent>()
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)))
            .init_resource::<OrbitCamera>()
            .init_resource::<MouseFollow>()
            .init_resource::<CameraIntro>()
            .add_systems(Update, camera_intro_system);
        app.world_mut().spawn((
            SceneCamera,
            Transform::from_translation(CAMERA_START_POSITION).looking_at(LOOK_TARGET, Vec3::Y),
        ));
        app
    }

    #[test]
    fn pointer_follow_stays_off_during_intro() {
        let mut app = intro_app();

        for _ in 0..10 {
            app.update();
            assert!(!app.world().resource::<MouseFollow>().enabled());
        }

        for _ in 0..70 {
            app.update();
        }
        assert!(app.world().resource::<MouseFollow>().enabled());
        assert_eq!(
            *app.world().resource::<State<AppState>>().get(),
            AppState::Interactive
        );

        let mut camera = app
            .world_mut()
            .query_filtered::<&Transform, With<SceneCamera>>();
        let transform = camera.single(app.world()).unwrap();
        assert!(transform.translation.distance(CAMERA_REST_POSITION) < 1e-4);
    }
}
