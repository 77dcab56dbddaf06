use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Intro,
    Interactive,
    LoadFailed,
    Unmounted,
}

impl AppState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppState::Loading => "loading",
            AppState::Intro => "intro",
            AppState::Interactive => "interactive",
            AppState::LoadFailed => "load_failed",
            AppState::Unmounted => "unmounted",
        }
    }
}

/// Run condition for the per-frame camera/model update cycle.
pub fn scene_is_live(state: Res<State<AppState>>) -> bool {
    matches!(state.get(), AppState::Intro | AppState::Interactive)
}

/// Whether the model follows the pointer. Only ever goes from off to on.
#[derive(Resource, Default, Debug)]
pub struct MouseFollow {
    enabled: bool,
}

impl MouseFollow {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns true only for the call that actually switched the flag on.
    pub fn enable(&mut self) -> bool {
        let switched = !self.enabled;
        self.enabled = true;
        switched
    }
}

/// Scene milestones, consumed by the host RPC bridge.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum SceneEvent {
    AssetsLoaded,
    LoadFailed { reason: String },
    IntroCompleted,
}

#[derive(Component)]
pub struct FpsText;
