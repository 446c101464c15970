//! Host loop
//!
//! Owns the current session and swaps it for a fresh one when a level load
//! completes. Simulation runs on a fixed timestep; render/audio output goes
//! to whatever `Effects` sink the host was built with.

use crate::consts::{MAX_SUBSTEPS, SCENE_FLIP_SECS, SIM_DT};
use crate::error::{LevelLoadError, SceneError};
use crate::level::{LevelId, LevelLayout, LevelLoader, LevelRequest, LevelSource};
use crate::settings::Settings;
use crate::sim::{
    ArenaWorld, ContactEvent, ContactRule, Effects, Intent, LevelDescriptor, PcgRandom,
    PhysicsWorld, SceneNodes, SceneRequest, SceneTransition, Session, VelocityRegulator,
};

/// Session type driven by the host
pub type GameSession = Session<ArenaWorld, PcgRandom>;

/// Level load in flight, with the descriptor the new scene will carry
#[derive(Debug)]
struct PendingScene {
    request: LevelRequest,
    level: LevelDescriptor,
}

/// Game instance holding the session, loader and effects sink
pub struct Game<E, S> {
    session: GameSession,
    effects: E,
    loader: LevelLoader<S>,
    settings: Settings,
    pending: Option<PendingScene>,
    accumulator: f32,
    contacts: Vec<ContactEvent>,
    seed: u64,
    scenes_built: u64,
}

impl<E: Effects, S: LevelSource> Game<E, S> {
    /// Build the first scene synchronously
    pub fn new(settings: Settings, source: S, mut effects: E) -> Result<Self, LevelLoadError> {
        let loader = LevelLoader::new(source);
        let seed = settings.effective_seed();
        log::info!("Starting run with seed {}", seed);

        let layout = loader.source().fetch(LevelId::FIRST)?;
        let (world, nodes) = build_scene(&layout)?;
        let session = Session::start(
            world,
            nodes,
            LevelDescriptor::first(settings.total_levels),
            VelocityRegulator::new(settings.regulator),
            PcgRandom::seeded(seed),
            &mut effects,
        );

        Ok(Self {
            session,
            effects,
            loader,
            settings,
            pending: None,
            accumulator: 0.0,
            contacts: Vec::new(),
            seed,
            scenes_built: 1,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn effects(&self) -> &E {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut E {
        &mut self.effects
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Level currently being fetched
    pub fn pending_level(&self) -> Option<LevelId> {
        self.pending.as_ref().map(|p| p.request.id())
    }

    /// Advance by a frame's worth of wall time. Returns the number of ticks run.
    pub fn frame(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_nan() { 0.0 } else { dt.clamp(0.0, 0.1) };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// One fixed simulation step
    pub fn tick(&mut self, dt: f32) {
        self.poll_load();
        self.session.update(dt);

        self.contacts.clear();
        self.session.world_mut().step(dt, &mut self.contacts);
        for event in &self.contacts {
            self.session.handle_contact(event, &mut self.effects);
        }
    }

    /// Deliver one contact to the session
    pub fn contact(&mut self, event: &ContactEvent) -> ContactRule {
        self.session.handle_contact(event, &mut self.effects)
    }

    /// Deliver an input gesture; scene requests start a level load
    pub fn input(&mut self, intent: Intent) {
        if let Some(request) = self.session.handle_intent(intent, &mut self.effects) {
            self.begin_load(request);
        }
    }

    fn begin_load(&mut self, request: SceneRequest) {
        if let Some(pending) = &self.pending {
            log::warn!(
                "Dropping {:?}: level {} is still loading",
                request,
                pending.request.id()
            );
            return;
        }

        let (id, level) = match request {
            SceneRequest::LoadLevel(id) => (id, self.session.level().advanced()),
            SceneRequest::Restart => (
                LevelId::FIRST,
                LevelDescriptor::first(self.settings.total_levels),
            ),
        };
        log::info!("Loading {} ({})", id.scene_name(), id.tag());
        self.pending = Some(PendingScene {
            request: self.loader.request(id),
            level,
        });
    }

    fn poll_load(&mut self) {
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let Some(result) = pending.request.poll() else {
            return;
        };
        let id = pending.request.id();
        let level = pending.level;
        self.pending = None;

        let scene = result.and_then(|layout| build_scene(&layout).map_err(LevelLoadError::from));
        match scene {
            Ok((world, nodes)) => {
                log::info!("Presenting {}", id.scene_name());
                self.effects.present_scene(SceneTransition::FlipHorizontal {
                    duration: SCENE_FLIP_SECS,
                });
                let rng = PcgRandom::seeded(self.seed.wrapping_add(self.scenes_built));
                self.scenes_built += 1;
                self.session = Session::start(
                    world,
                    nodes,
                    level,
                    VelocityRegulator::new(self.settings.regulator),
                    rng,
                    &mut self.effects,
                );
            }
            Err(e) => self.session.report_load_failure(&e, &mut self.effects),
        }
    }
}

/// Build a world from a layout and resolve the nodes the session needs
fn build_scene(layout: &LevelLayout) -> Result<(ArenaWorld, SceneNodes), SceneError> {
    let world = ArenaWorld::from_layout(layout);
    let nodes = SceneNodes::resolve(&world)?;
    Ok((world, nodes))
}
