use bevy::prelude::*;

/// Point the camera orbits and the intro keeps it aimed at.
pub const LOOK_TARGET: Vec3 = Vec3::new(0.0, 0.03, 0.0);

/// Camera position before the intro starts.
pub const CAMERA_START_POSITION: Vec3 = Vec3::new(0.1, 0.03, 0.09);

/// Frontal resting pose reached when the intro completes.
pub const CAMERA_REST_POSITION: Vec3 = Vec3::new(0.0, 0.03, 0.1);

pub const CAMERA_FOV_DEGREES: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.01;
pub const CAMERA_FAR: f32 = 10.0;

pub const INTRO_DURATION_SECS: f32 = 12.0;

pub const ORBIT_MIN_DISTANCE: f32 = 0.03;
pub const ORBIT_MAX_DISTANCE: f32 = 0.2;
pub const ORBIT_DAMPING_FACTOR: f32 = 0.05;

/// Maximum model pitch/yaw swing, in radians, across the full viewport.
pub const FOLLOW_PITCH_RANGE: f32 = 0.3;
pub const FOLLOW_YAW_RANGE: f32 = 0.6;

/// Fraction of the remaining rotation covered each frame.
pub const FOLLOW_SMOOTHING: f32 = 0.05;
