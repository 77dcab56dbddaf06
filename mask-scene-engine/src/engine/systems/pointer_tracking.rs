use bevy::prelude::*;

/// Pointer position normalized to the viewport, (0, 0) top-left.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition(pub Vec2);

impl Default for PointerPosition {
    fn default() -> Self {
        Self(Vec2::splat(0.5))
    }
}

/// Divide a cursor position by the viewport size.
pub fn normalize_pointer(cursor: Vec2, viewport: Vec2) -> Option<Vec2> {
    (viewport.x > 0.0 && viewport.y > 0.0).then(|| cursor / viewport)
}

pub fn pointer_tracking_system(
    mut cursor_moved: EventReader<CursorMoved>,
    windows: Query<&Window>,
    mut pointer: ResMut<PointerPosition>,
) {
    for cursor in cursor_moved.read() {
        let Ok(window) = windows.get(cursor.window) else {
            continue;
        };
        let viewport = Vec2::new(window.width(), window.height());
        if let Some(normalized) = normalize_pointer(cursor.position, viewport) {
            pointer.0 = normalized;
        }
    }
}
