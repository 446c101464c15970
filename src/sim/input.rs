//! Input intents
//!
//! Touch handling is reduced to three gestures. What a gesture means depends
//! on the session state; the mapping lives in `Session::handle_intent`.

use glam::Vec2;

use crate::level::LevelId;

/// A discrete input gesture in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Finger down / primary click
    Tap { at: Vec2 },
    /// Finger moved by `delta` since the last report
    Drag { delta: Vec2 },
    /// Finger lifted
    Release,
}

/// Request from a session for the host to replace the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest {
    /// Load the given level as the next scene
    LoadLevel(LevelId),
    /// Start a new run from the first level
    Restart,
}

/// Clamp a paddle centre so the whole paddle stays on screen
pub fn clamp_paddle_x(x: f32, paddle_width: f32, scene_width: f32) -> f32 {
    let half = paddle_width / 2.0;
    x.max(half).min(scene_width - half)
}
