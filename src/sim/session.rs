//! Game session: state machine plus contact and input handling
//!
//! A session lives exactly as long as one scene. It starts in
//! `WaitingForTap`, and once it reaches `LevelOver` or `GameOver` only the
//! host can move play along by building a new session.

use glam::Vec2;

use super::body::{BodyCategory, NodeHandle};
use super::contact::{ContactEvent, ContactRule, classify};
use super::effects::{Effects, Emitter, NodeAction, Prompt};
use super::input::{Intent, SceneRequest, clamp_paddle_x};
use super::progress::{LevelDescriptor, LevelStatus};
use super::regulator::{RandomSource, VelocityRegulator};
use super::state::{Outcome, SessionState};
use super::world::PhysicsWorld;
use crate::audio::SoundEffect;
use crate::consts::{BREAK_EMITTER_SECS, MESSAGE_HIDE_SECS, MESSAGE_REVEAL_SECS};
use crate::error::{LevelLoadError, SceneError};

/// Typed handles to the nodes the session drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNodes {
    pub ball: NodeHandle,
    pub paddle: NodeHandle,
    /// Centred message sprite
    pub message: NodeHandle,
}

impl SceneNodes {
    /// Look up the ball and paddle once, failing if either is missing
    pub fn resolve(world: &impl PhysicsWorld) -> Result<Self, SceneError> {
        let ball = world
            .first_of(BodyCategory::Ball)
            .ok_or(SceneError::MissingNode("ball"))?;
        let paddle = world
            .first_of(BodyCategory::Paddle)
            .ok_or(SceneError::MissingNode("paddle"))?;
        Ok(Self {
            ball,
            paddle,
            message: NodeHandle::GAME_MESSAGE,
        })
    }
}

/// One scene's worth of gameplay
#[derive(Debug)]
pub struct Session<W, R> {
    world: W,
    rng: R,
    nodes: SceneNodes,
    level: LevelDescriptor,
    regulator: VelocityRegulator,
    state: SessionState,
    outcome: Option<Outcome>,
    finger_on_paddle: bool,
}

impl<W: PhysicsWorld, R: RandomSource> Session<W, R> {
    /// Create a session and run the `WaitingForTap` entry action
    pub fn start(
        world: W,
        nodes: SceneNodes,
        level: LevelDescriptor,
        regulator: VelocityRegulator,
        rng: R,
        fx: &mut impl Effects,
    ) -> Self {
        let mut session = Self {
            world,
            rng,
            nodes,
            level,
            regulator,
            state: SessionState::WaitingForTap,
            outcome: None,
            finger_on_paddle: false,
        };
        log::info!(
            "Session started: next level {} of {}, {} blocks",
            level.next_level,
            level.total_levels,
            session.remaining_blocks()
        );
        session.did_enter(SessionState::WaitingForTap, None, fx);
        session
    }

    pub fn current_state(&self) -> SessionState {
        self.state
    }

    /// Set once, when the session enters `GameOver`
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn level(&self) -> &LevelDescriptor {
        &self.level
    }

    pub fn nodes(&self) -> &SceneNodes {
        &self.nodes
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn finger_on_paddle(&self) -> bool {
        self.finger_on_paddle
    }

    pub fn remaining_blocks(&self) -> usize {
        self.level.remaining_blocks(&self.world)
    }

    pub fn is_game_won(&self) -> bool {
        self.level.is_game_won(&self.world)
    }

    /// Attempt a transition. Illegal targets are ignored and return false.
    ///
    /// GameOver is only reachable once an outcome has been recorded, which
    /// happens when the ball is lost or the final block breaks.
    pub fn enter(&mut self, next: SessionState, fx: &mut impl Effects) -> bool {
        let previous = self.state;
        if !previous.is_valid_next_state(next) {
            log::debug!("Ignoring transition {} -> {}", previous.name(), next.name());
            return false;
        }
        if next == SessionState::GameOver && self.outcome.is_none() {
            log::debug!("Ignoring transition {} -> GameOver without an outcome", previous.name());
            return false;
        }

        self.will_exit(previous, next, fx);
        self.state = next;
        log::info!("Session {} -> {}", previous.name(), next.name());
        self.did_enter(next, Some(previous), fx);
        true
    }

    /// Per-tick hook of the active state
    pub fn update(&mut self, _dt: f32) {
        if !self.state.runs_tick() {
            return;
        }
        self.regulator
            .regulate(&mut self.world, self.nodes.ball, &mut self.rng);
    }

    /// React to one contact reported by the physics world
    pub fn handle_contact(&mut self, event: &ContactEvent, fx: &mut impl Effects) -> ContactRule {
        if !self.state.accepts_contacts() {
            return ContactRule::Ignore;
        }

        let rule = classify(event);
        log::debug!("Contact {:?} -> {:?}", event, rule);
        match rule {
            ContactRule::BallLost => {
                self.end_game(Outcome::Lost, fx);
            }
            ContactRule::BlockHit { block } => {
                self.break_block(block, fx);
                match self.level.status(&self.world) {
                    LevelStatus::GameWon => {
                        self.end_game(Outcome::Won, fx);
                    }
                    LevelStatus::Cleared => {
                        self.enter(SessionState::LevelOver, fx);
                    }
                    LevelStatus::InProgress => {}
                }
            }
            ContactRule::BorderBounce => fx.play_sound(SoundEffect::Blip),
            ContactRule::PaddleBounce => fx.play_sound(SoundEffect::PaddleBlip),
            ContactRule::Ignore => {}
        }
        rule
    }

    /// Route an input gesture according to the active state
    pub fn handle_intent(&mut self, intent: Intent, fx: &mut impl Effects) -> Option<SceneRequest> {
        match intent {
            Intent::Tap { at } => match self.state {
                SessionState::WaitingForTap => {
                    self.enter(SessionState::Playing, fx);
                    self.finger_on_paddle = true;
                    None
                }
                SessionState::Playing => {
                    if self.world.body_at(at) == Some(self.nodes.paddle) {
                        self.finger_on_paddle = true;
                    }
                    None
                }
                SessionState::LevelOver => Some(SceneRequest::LoadLevel(self.level.next_level_id())),
                SessionState::GameOver => Some(SceneRequest::Restart),
            },
            Intent::Drag { delta } => {
                if self.finger_on_paddle {
                    self.move_paddle(delta.x);
                }
                None
            }
            Intent::Release => {
                self.finger_on_paddle = false;
                None
            }
        }
    }

    /// Tell the player a scene load failed. The session state is untouched.
    pub fn report_load_failure(&mut self, error: &LevelLoadError, fx: &mut impl Effects) {
        log::warn!("Level load failed in {}: {}", self.state.name(), error);
        fx.present_alert("Error", "There was a problem");
    }

    fn end_game(&mut self, outcome: Outcome, fx: &mut impl Effects) -> bool {
        if !self.state.is_valid_next_state(SessionState::GameOver) {
            return false;
        }
        self.outcome = Some(outcome);
        self.enter(SessionState::GameOver, fx)
    }

    fn will_exit(&mut self, from: SessionState, to: SessionState, fx: &mut impl Effects) {
        if from == SessionState::WaitingForTap && to == SessionState::Playing {
            fx.run_action(
                self.nodes.message,
                NodeAction::Scale {
                    to: 0.0,
                    duration: MESSAGE_HIDE_SECS,
                },
            );
        }
    }

    fn did_enter(&mut self, state: SessionState, from: Option<SessionState>, fx: &mut impl Effects) {
        match state {
            SessionState::WaitingForTap => {
                fx.run_action(
                    self.nodes.message,
                    NodeAction::Scale {
                        to: 1.0,
                        duration: MESSAGE_REVEAL_SECS,
                    },
                );
            }
            SessionState::Playing => {
                // Launch kick only when play starts from rest
                if from == Some(SessionState::WaitingForTap) {
                    let impulse = self.regulator.launch_impulse(&mut self.rng);
                    self.world.apply_impulse(self.nodes.ball, impulse);
                    log::debug!("Launch impulse {:?}", impulse);
                }
            }
            SessionState::LevelOver => {
                fx.show_prompt(Prompt::NextLevel);
            }
            SessionState::GameOver => {
                let won = self.outcome.is_some_and(Outcome::is_won);
                let texture = if won { "YouWon" } else { "GameOver" };
                fx.run_action(
                    self.nodes.message,
                    NodeAction::SetTextureThenScale {
                        texture,
                        to: 1.0,
                        duration: MESSAGE_REVEAL_SECS,
                    },
                );
                fx.play_sound(SoundEffect::for_outcome(won));
                log::info!("Game over: {}", if won { "won" } else { "lost" });
            }
        }
    }

    fn break_block(&mut self, block: NodeHandle, fx: &mut impl Effects) {
        let Some(pos) = self.world.position(block) else {
            log::debug!("Block {:?} already removed", block);
            return;
        };
        fx.play_sound(SoundEffect::BambooBreak);
        fx.spawn_emitter(Emitter::BrokenPlatform, pos, BREAK_EMITTER_SECS);
        self.world.remove_body(block);
        fx.remove_node(block);
    }

    fn move_paddle(&mut self, dx: f32) {
        let paddle = self.nodes.paddle;
        let (Some(pos), Some(extent)) = (self.world.position(paddle), self.world.extent(paddle))
        else {
            return;
        };
        let width = self.world.scene_size().x;
        let x = clamp_paddle_x(pos.x + dx, extent.x, width);
        self.world.set_position(paddle, Vec2::new(x, pos.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::contact::Contact;
    use crate::sim::effects::{EffectCommand, EffectLog};
    use crate::sim::regulator::tests::ScriptedRandom;
    use crate::sim::world::ArenaWorld;
    use crate::level::LevelId;
    use proptest::prelude::*;

    type TestSession = Session<ArenaWorld, ScriptedRandom>;

    struct Fixture {
        session: TestSession,
        fx: EffectLog,
        blocks: Vec<NodeHandle>,
        bottom: NodeHandle,
        border: NodeHandle,
    }

    fn fixture(blocks: usize, level: LevelDescriptor) -> Fixture {
        let mut world = ArenaWorld::new(Vec2::new(320.0, 480.0));
        let bottom = world.add_rect(BodyCategory::Bottom, Vec2::new(160.0, 0.5), Vec2::new(320.0, 1.0));
        world.add_ball(Vec2::new(160.0, 80.0), 8.0, 1.0);
        world.add_rect(BodyCategory::Paddle, Vec2::new(160.0, 40.0), Vec2::new(80.0, 12.0));
        let blocks = (0..blocks)
            .map(|i| {
                world.add_rect(
                    BodyCategory::Block,
                    Vec2::new(30.0 + i as f32 * 45.0, 420.0),
                    Vec2::new(40.0, 16.0),
                )
            })
            .collect();
        let border = world.first_of(BodyCategory::Border).unwrap();
        let nodes = SceneNodes::resolve(&world).unwrap();
        let mut fx = EffectLog::new();
        let session = Session::start(
            world,
            nodes,
            level,
            VelocityRegulator::default(),
            ScriptedRandom::new(&[0.2]),
            &mut fx,
        );
        Fixture {
            session,
            fx,
            blocks,
            bottom,
            border,
        }
    }

    fn contact(a: (NodeHandle, BodyCategory), b: (NodeHandle, BodyCategory)) -> ContactEvent {
        ContactEvent::new(Contact::new(a.0, a.1), Contact::new(b.0, b.1))
    }

    impl Fixture {
        fn ball(&self) -> (NodeHandle, BodyCategory) {
            (self.session.nodes().ball, BodyCategory::Ball)
        }

        fn play(&mut self) {
            self.session
                .handle_intent(Intent::Tap { at: Vec2::new(10.0, 300.0) }, &mut self.fx);
            assert_eq!(self.session.current_state(), SessionState::Playing);
            self.fx.drain();
        }

        fn hit_block(&mut self, i: usize) -> ContactRule {
            let event = contact(self.ball(), (self.blocks[i], BodyCategory::Block));
            self.session.handle_contact(&event, &mut self.fx)
        }

        fn hit_bottom(&mut self) -> ContactRule {
            let event = contact((self.bottom, BodyCategory::Bottom), self.ball());
            self.session.handle_contact(&event, &mut self.fx)
        }
    }

    #[test]
    fn test_starts_waiting_with_prompt() {
        let f = fixture(3, LevelDescriptor::default());
        assert_eq!(f.session.current_state(), SessionState::WaitingForTap);
        assert_eq!(
            f.fx.commands(),
            &[EffectCommand::Action(
                NodeHandle::GAME_MESSAGE,
                NodeAction::Scale { to: 1.0, duration: 0.25 }
            )]
        );
        assert_eq!(f.session.outcome(), None);
    }

    #[test]
    fn test_tap_starts_play_with_single_launch_impulse() {
        let mut f = fixture(3, LevelDescriptor::default());
        f.fx.drain();
        let ball = f.session.nodes().ball;

        f.session
            .handle_intent(Intent::Tap { at: Vec2::new(10.0, 300.0) }, &mut f.fx);
        assert_eq!(f.session.current_state(), SessionState::Playing);
        assert!(f.session.finger_on_paddle());
        assert_eq!(f.session.world().velocity(ball), Some(Vec2::new(3.0, 3.0)));
        assert_eq!(
            f.fx.commands(),
            &[EffectCommand::Action(
                NodeHandle::GAME_MESSAGE,
                NodeAction::Scale { to: 0.0, duration: 0.4 }
            )]
        );

        // No second kick: Playing cannot be re-entered and taps do not relaunch
        assert!(!f.session.enter(SessionState::Playing, &mut f.fx));
        f.session
            .handle_intent(Intent::Tap { at: Vec2::new(10.0, 300.0) }, &mut f.fx);
        assert_eq!(f.session.world().velocity(ball), Some(Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn test_waiting_cannot_jump_to_game_over() {
        let mut f = fixture(3, LevelDescriptor::default());
        assert!(!f.session.enter(SessionState::GameOver, &mut f.fx));
        assert!(!f.session.enter(SessionState::LevelOver, &mut f.fx));
        assert_eq!(f.session.current_state(), SessionState::WaitingForTap);
    }

    #[test]
    fn test_game_over_requires_outcome() {
        let mut f = fixture(3, LevelDescriptor::default());
        f.play();
        assert!(!f.session.enter(SessionState::GameOver, &mut f.fx));
        assert_eq!(f.session.current_state(), SessionState::Playing);
        assert_eq!(f.session.outcome(), None);
        assert!(f.fx.commands().is_empty());

        // The ball-lost path still records the outcome and ends the game
        f.hit_bottom();
        assert_eq!(f.session.current_state(), SessionState::GameOver);
        assert_eq!(f.session.outcome(), Some(Outcome::Lost));
    }

    #[test]
    fn test_contacts_ignored_unless_playing() {
        let mut f = fixture(1, LevelDescriptor::new(5, 6));
        f.fx.drain();
        assert_eq!(f.hit_block(0), ContactRule::Ignore);
        assert_eq!(f.hit_bottom(), ContactRule::Ignore);
        assert_eq!(f.session.remaining_blocks(), 1);
        assert_eq!(f.session.current_state(), SessionState::WaitingForTap);
        assert!(f.fx.commands().is_empty());
    }

    #[test]
    fn test_ball_lost_ends_game() {
        let mut f = fixture(3, LevelDescriptor::default());
        f.play();
        assert_eq!(f.hit_bottom(), ContactRule::BallLost);
        assert_eq!(f.session.current_state(), SessionState::GameOver);
        assert_eq!(f.session.outcome(), Some(Outcome::Lost));
        assert_eq!(f.session.remaining_blocks(), 3);
        assert!(f.fx.contains(&EffectCommand::Action(
            NodeHandle::GAME_MESSAGE,
            NodeAction::SetTextureThenScale {
                texture: "GameOver",
                to: 1.0,
                duration: 0.25
            }
        )));
        assert_eq!(f.fx.sounds(), vec![SoundEffect::GameOver]);
    }

    #[test]
    fn test_block_break_effects() {
        let mut f = fixture(3, LevelDescriptor::default());
        f.play();
        let block = f.blocks[1];
        assert_eq!(f.hit_block(1), ContactRule::BlockHit { block });
        assert_eq!(f.session.remaining_blocks(), 2);
        assert_eq!(f.session.current_state(), SessionState::Playing);
        assert_eq!(
            f.fx.commands(),
            &[
                EffectCommand::Sound(SoundEffect::BambooBreak),
                EffectCommand::Emitter(Emitter::BrokenPlatform, Vec2::new(75.0, 420.0), 1.0),
                EffectCommand::RemoveNode(block),
            ]
        );
    }

    #[test]
    fn test_last_block_on_middle_level_is_level_over() {
        let mut f = fixture(1, LevelDescriptor::new(4, 6));
        f.play();
        f.hit_block(0);
        assert_eq!(f.session.remaining_blocks(), 0);
        assert!(!f.session.is_game_won());
        assert_eq!(f.session.current_state(), SessionState::LevelOver);
        assert_eq!(f.session.outcome(), None);
        assert!(f.fx.contains(&EffectCommand::Prompt(Prompt::NextLevel)));

        let request = f
            .session
            .handle_intent(Intent::Tap { at: Vec2::ZERO }, &mut f.fx);
        assert_eq!(request, Some(SceneRequest::LoadLevel(LevelId(4))));
        assert_eq!(f.session.current_state(), SessionState::LevelOver);
    }

    #[test]
    fn test_last_block_on_final_level_wins() {
        let mut f = fixture(1, LevelDescriptor::new(5, 6));
        f.play();
        f.hit_block(0);
        assert!(f.session.is_game_won());
        assert_eq!(f.session.current_state(), SessionState::GameOver);
        assert_eq!(f.session.outcome(), Some(Outcome::Won));
        assert_eq!(
            f.fx.sounds(),
            vec![SoundEffect::BambooBreak, SoundEffect::GameWon]
        );

        let request = f
            .session
            .handle_intent(Intent::Tap { at: Vec2::ZERO }, &mut f.fx);
        assert_eq!(request, Some(SceneRequest::Restart));
    }

    #[test]
    fn test_paddle_contact_order_independent() {
        let mut f = fixture(2, LevelDescriptor::default());
        f.play();
        let paddle = (f.session.nodes().paddle, BodyCategory::Paddle);
        let forward = contact(f.ball(), paddle);
        let reversed = contact(paddle, f.ball());

        let rule_a = f.session.handle_contact(&forward, &mut f.fx);
        let effects_a = f.fx.drain();
        let rule_b = f.session.handle_contact(&reversed, &mut f.fx);
        let effects_b = f.fx.drain();

        assert_eq!(rule_a, ContactRule::PaddleBounce);
        assert_eq!(rule_a, rule_b);
        assert_eq!(effects_a, effects_b);
        assert_eq!(effects_a, vec![EffectCommand::Sound(SoundEffect::PaddleBlip)]);
    }

    #[test]
    fn test_border_contact_blips() {
        let mut f = fixture(2, LevelDescriptor::default());
        f.play();
        let event = contact((f.border, BodyCategory::Border), f.ball());
        assert_eq!(f.session.handle_contact(&event, &mut f.fx), ContactRule::BorderBounce);
        assert_eq!(f.fx.sounds(), vec![SoundEffect::Blip]);
        assert_eq!(f.session.current_state(), SessionState::Playing);
    }

    #[test]
    fn test_only_first_transition_in_a_tick_counts() {
        let mut f = fixture(1, LevelDescriptor::new(5, 6));
        f.play();
        f.hit_bottom();
        assert_eq!(f.hit_block(0), ContactRule::Ignore);
        assert_eq!(f.session.outcome(), Some(Outcome::Lost));
        assert_eq!(f.session.remaining_blocks(), 1);
    }

    #[test]
    fn test_drag_moves_paddle_only_with_finger_down() {
        let mut f = fixture(1, LevelDescriptor::default());
        let paddle = f.session.nodes().paddle;

        f.session
            .handle_intent(Intent::Drag { delta: Vec2::new(30.0, 5.0) }, &mut f.fx);
        assert_eq!(f.session.world().position(paddle), Some(Vec2::new(160.0, 40.0)));

        f.play();
        f.session
            .handle_intent(Intent::Drag { delta: Vec2::new(30.0, 5.0) }, &mut f.fx);
        assert_eq!(f.session.world().position(paddle), Some(Vec2::new(190.0, 40.0)));

        f.session
            .handle_intent(Intent::Drag { delta: Vec2::new(500.0, 0.0) }, &mut f.fx);
        assert_eq!(f.session.world().position(paddle), Some(Vec2::new(280.0, 40.0)));

        f.session.handle_intent(Intent::Release, &mut f.fx);
        assert!(!f.session.finger_on_paddle());
        f.session
            .handle_intent(Intent::Drag { delta: Vec2::new(-50.0, 0.0) }, &mut f.fx);
        assert_eq!(f.session.world().position(paddle), Some(Vec2::new(280.0, 40.0)));
    }

    #[test]
    fn test_tap_on_paddle_grabs_it() {
        let mut f = fixture(1, LevelDescriptor::default());
        f.play();
        f.session.handle_intent(Intent::Release, &mut f.fx);

        f.session
            .handle_intent(Intent::Tap { at: Vec2::new(10.0, 300.0) }, &mut f.fx);
        assert!(!f.session.finger_on_paddle());
        f.session
            .handle_intent(Intent::Tap { at: Vec2::new(170.0, 42.0) }, &mut f.fx);
        assert!(f.session.finger_on_paddle());
    }

    #[test]
    fn test_update_regulates_only_while_playing() {
        let mut f = fixture(1, LevelDescriptor::default());
        let ball = f.session.nodes().ball;
        f.session.world_mut().set_velocity(ball, Vec2::new(300.0, 300.0));
        f.session.update(1.0 / 60.0);
        assert_eq!(f.session.world().damping(ball), Some(0.0));

        f.play();
        f.session.update(1.0 / 60.0);
        assert_eq!(f.session.world().damping(ball), Some(0.4));

        f.hit_bottom();
        f.session.world_mut().set_linear_damping(ball, 0.0);
        f.session.update(1.0 / 60.0);
        assert_eq!(f.session.world().damping(ball), Some(0.0));
    }

    #[test]
    fn test_load_failure_keeps_state() {
        let mut f = fixture(1, LevelDescriptor::new(3, 6));
        f.play();
        f.hit_block(0);
        assert_eq!(f.session.current_state(), SessionState::LevelOver);
        f.fx.drain();

        let error = LevelLoadError::NotFound(LevelId(3));
        f.session.report_load_failure(&error, &mut f.fx);
        assert_eq!(f.session.current_state(), SessionState::LevelOver);
        assert_eq!(
            f.fx.commands(),
            &[EffectCommand::Alert {
                title: "Error".to_string(),
                message: "There was a problem".to_string()
            }]
        );
    }

    #[test]
    fn test_missing_nodes_fail_fast() {
        let mut world = ArenaWorld::new(Vec2::new(320.0, 480.0));
        world.add_ball(Vec2::new(160.0, 80.0), 8.0, 1.0);
        let err = SceneNodes::resolve(&world).unwrap_err();
        assert!(matches!(err, SceneError::MissingNode("paddle")));
        assert!(err.to_string().contains("paddle"));

        let world = ArenaWorld::new(Vec2::new(320.0, 480.0));
        assert!(matches!(
            SceneNodes::resolve(&world),
            Err(SceneError::MissingNode("ball"))
        ));
    }

    fn state() -> impl Strategy<Value = SessionState> {
        prop::sample::select(SessionState::ALL.to_vec())
    }

    proptest! {
        /// Every `enter` either leaves the state alone or moves to a listed successor
        #[test]
        fn prop_enter_respects_table(targets in prop::collection::vec(state(), 0..16)) {
            let mut f = fixture(2, LevelDescriptor::default());
            for target in targets {
                let before = f.session.current_state();
                let moved = f.session.enter(target, &mut f.fx);
                let after = f.session.current_state();
                if moved {
                    prop_assert!(before.is_valid_next_state(after));
                    prop_assert_eq!(after, target);
                } else {
                    prop_assert_eq!(after, before);
                }
            }
        }
    }
}
