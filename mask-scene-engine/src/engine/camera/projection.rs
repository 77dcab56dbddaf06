use bevy::{prelude::*, window::WindowResized};

use crate::engine::camera::SceneCamera;

/// Last known container size in logical pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
        }
    }
}

impl ViewportSize {
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }
}

/// Set the perspective aspect ratio for the given viewport.
///
/// Returns false when there is nothing to update.
pub fn apply_viewport_resize(viewport: ViewportSize, projection: Option<&mut Projection>) -> bool {
    let Some(aspect_ratio) = viewport.aspect_ratio() else {
        return false;
    };
    match projection {
        Some(Projection::Perspective(perspective)) => {
            perspective.aspect_ratio = aspect_ratio;
            true
        }
        _ => false,
    }
}

pub fn viewport_resize_system(
    mut resize_events: EventReader<WindowResized>,
    mut viewport: ResMut<ViewportSize>,
    mut camera_query: Query<&mut Projection, With<SceneCamera>>,
) {
    let Some(resized) = resize_events.read().last() else {
        return;
    };

    *viewport = ViewportSize {
        width: resized.width,
        height: resized.height,
    };

    let mut projection = camera_query.single_mut().ok();
    apply_viewport_resize(*viewport, projection.as_deref_mut());
}
