//! Render and audio requests issued by the session
//!
//! Every call is fire-and-forget: the session never waits for an effect to
//! finish and never reads anything back.

use glam::Vec2;

use super::body::NodeHandle;
use crate::audio::SoundEffect;

/// Timed action run on a scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeAction {
    /// Scale to `to` over `duration` seconds
    Scale { to: f32, duration: f32 },
    /// Swap texture, then scale to `to` over `duration` seconds
    SetTextureThenScale {
        texture: &'static str,
        to: f32,
        duration: f32,
    },
}

/// Particle emitter presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emitter {
    /// Splinters from a broken block
    BrokenPlatform,
}

/// On-screen text prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    NextLevel,
}

impl Prompt {
    pub fn text(&self) -> &'static str {
        match self {
            Prompt::NextLevel => "TAP TO PLAY NEXT LEVEL",
        }
    }
}

/// Transition used when a new scene replaces the current one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneTransition {
    FlipHorizontal { duration: f32 },
}

/// Render/audio collaborator
pub trait Effects {
    fn play_sound(&mut self, sound: SoundEffect);
    fn run_action(&mut self, node: NodeHandle, action: NodeAction);
    /// Spawn an emitter at `at`, removed again after `lifetime` seconds
    fn spawn_emitter(&mut self, emitter: Emitter, at: Vec2, lifetime: f32);
    fn remove_node(&mut self, node: NodeHandle);
    fn show_prompt(&mut self, prompt: Prompt);
    /// Dismissible alert
    fn present_alert(&mut self, title: &str, message: &str);
    fn present_scene(&mut self, transition: SceneTransition);
}

/// A recorded effect request
#[derive(Debug, Clone, PartialEq)]
pub enum EffectCommand {
    Sound(SoundEffect),
    Action(NodeHandle, NodeAction),
    Emitter(Emitter, Vec2, f32),
    RemoveNode(NodeHandle),
    Prompt(Prompt),
    Alert { title: String, message: String },
    Scene(SceneTransition),
}

/// Effects sink that records every request in order
///
/// Used by headless hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct EffectLog {
    commands: Vec<EffectCommand>,
}

impl EffectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[EffectCommand] {
        &self.commands
    }

    /// Take all recorded commands, leaving the log empty
    pub fn drain(&mut self) -> Vec<EffectCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn sounds(&self) -> Vec<SoundEffect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                EffectCommand::Sound(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, command: &EffectCommand) -> bool {
        self.commands.contains(command)
    }

    fn push(&mut self, command: EffectCommand) {
        log::trace!("effect: {:?}", command);
        self.commands.push(command);
    }
}

impl Effects for EffectLog {
    fn play_sound(&mut self, sound: SoundEffect) {
        self.push(EffectCommand::Sound(sound));
    }

    fn run_action(&mut self, node: NodeHandle, action: NodeAction) {
        self.push(EffectCommand::Action(node, action));
    }

    fn spawn_emitter(&mut self, emitter: Emitter, at: Vec2, lifetime: f32) {
        self.push(EffectCommand::Emitter(emitter, at, lifetime));
    }

    fn remove_node(&mut self, node: NodeHandle) {
        self.push(EffectCommand::RemoveNode(node));
    }

    fn show_prompt(&mut self, prompt: Prompt) {
        self.push(EffectCommand::Prompt(prompt));
    }

    fn present_alert(&mut self, title: &str, message: &str) {
        self.push(EffectCommand::Alert {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn present_scene(&mut self, transition: SceneTransition) {
        self.push(EffectCommand::Scene(transition));
    }
}
