//! Error types
//!
//! Gameplay never fails. Only malformed scenes and level loading produce errors.

use thiserror::Error;

use crate::level::LevelId;

/// Structural problems found while building a scene
#[derive(Debug, Error)]
pub enum SceneError {
    /// A node the session cannot run without is absent from the level data
    #[error("level data is missing required node `{0}`")]
    MissingNode(&'static str),
}

/// Failure to produce the layout of a requested level
#[derive(Debug, Error)]
pub enum LevelLoadError {
    #[error("level {0} is not available")]
    NotFound(LevelId),

    #[error("failed to read level {id}: {source}")]
    Io {
        id: LevelId,
        #[source]
        source: std::io::Error,
    },

    #[error("level {id} is malformed: {source}")]
    Parse {
        id: LevelId,
        #[source]
        source: serde_json::Error,
    },

    #[error("request for level {0} was dropped before completing")]
    Cancelled(LevelId),

    #[error(transparent)]
    Scene(#[from] SceneError),
}
