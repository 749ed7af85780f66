// ── Game context ────────────────────────────────────────────────────────────
//
// Explicit bundle of every shared subsystem: scheduler, tweens, stage,
// camera, audio, controls, storage, world, particles, and the event manager.
// There are no hidden globals; components receive the context by reference at
// construction, and tests get clean isolation by building a fresh one each.

use std::cell::RefCell;
use std::rc::Rc;

use crate::audio::Audio;
use crate::camera::Camera;
use crate::controls::ControlManager;
use crate::events::manager::GameEventManager;
use crate::particles::ParticlesWrapper;
use crate::scheduler::Scheduler;
use crate::stage::Stage;
use crate::tween::TweenRunner;
use crate::world::{Storage, World};
use crate::{GAME_HEIGHT, GAME_WIDTH};

pub struct GameContext {
    pub scheduler: Scheduler,
    pub tweens: TweenRunner,
    pub stage: Stage,
    pub camera: RefCell<Camera>,
    pub audio: Audio,
    pub controls: ControlManager,
    pub storage: Storage,
    pub world: World,
    pub particles: ParticlesWrapper,
    pub events: GameEventManager,
}

impl GameContext {
    pub fn new() -> Rc<Self> {
        let scheduler = Scheduler::new();
        let stage = Stage::new();
        let particles = ParticlesWrapper::new(&stage, &scheduler);
        Rc::new(Self {
            scheduler: scheduler.clone(),
            tweens: TweenRunner::new(),
            stage,
            camera: RefCell::new(Camera::new(GAME_WIDTH / 2.0, GAME_HEIGHT / 2.0)),
            audio: Audio::new(),
            controls: ControlManager::new(),
            storage: Storage::new(),
            world: World::new(),
            particles,
            events: GameEventManager::new(),
        })
    }

    /// Advance one frame by `dt_ms`: the per-frame particle buffers are
    /// cleared, due timers and tweens fire, the camera shake advances, and
    /// the event manager's per-frame render callbacks run last so they draw
    /// into the freshly cleared buffers.
    pub fn update(&self, dt_ms: f32) {
        self.stage.clear_particles();
        self.scheduler.update(dt_ms);
        self.tweens.update(dt_ms);
        self.camera.borrow_mut().tick(dt_ms / 1000.0);
        self.events.run_callbacks();
    }

    /// True while any scripted event graph is still resolving.
    pub fn is_busy(&self) -> bool {
        self.events.events_running_count() > 0
    }
}
