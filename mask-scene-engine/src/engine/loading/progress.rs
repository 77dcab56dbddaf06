use bevy::prelude::*;
use thiserror::Error;

use crate::engine::assets::environment_map::EnvironmentMapError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneLoadError {
    #[error("environment map failed to load: {0}")]
    EnvironmentFailed(String),
    #[error("model failed to load: {0}")]
    ModelFailed(String),
    #[error("environment map was reported loaded but is not in the image store")]
    EnvironmentMissing,
    #[error("environment map could not be converted: {0}")]
    Environment(#[from] EnvironmentMapError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum AssetStatus {
    #[default]
    Pending,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Pending,
    Ready,
    Failed(SceneLoadError),
}

#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct LoadingProgress {
    pub environment: AssetStatus,
    pub model: AssetStatus,
}

impl LoadingProgress {
    /// Combined result: ready only when both are, failed as soon as either fails.
    pub fn outcome(&self) -> LoadOutcome {
        if let AssetStatus::Failed(reason) = &self.environment {
            return LoadOutcome::Failed(SceneLoadError::EnvironmentFailed(reason.clone()));
        }
        if let AssetStatus::Failed(reason) = &self.model {
            return LoadOutcome::Failed(SceneLoadError::ModelFailed(reason.clone()));
        }
        match (&self.environment, &self.model) {
            (AssetStatus::Ready, AssetStatus::Ready) => LoadOutcome::Ready,
            _ => LoadOutcome::Pending,
        }
    }
}
