// ── Scripted game events ────────────────────────────────────────────────────
//
// A game event is a fireable unit of scripted behavior with an activation
// gate, an optional registry label, and an origin actor for self-relative
// targeting. Variants share the lifecycle (`fire`/`destroy`) and differ in
// fire-time side effects; branching variants own child events resolved
// eagerly from their descriptors at construction.
//
// Asynchronous variants increment the manager's running counter when their
// async portion starts and decrement it exactly once when it resolves, on
// every path. Destroying an event while a fire is pending leaves that pending
// completion to run orphaned; there is no mid-flight cancellation.

pub mod camera_shake;
pub mod char_activation;
pub mod descriptor;
pub mod io_collision;
pub mod item_check;
pub mod manager;
pub mod particles_event;
pub mod party_join;
pub mod set_value;
pub mod tile_event_manage;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::context::GameContext;
use crate::world::FieldCharRef;

pub use descriptor::{get_event_instance, parse_event, DescriptorError, EventDescriptor};
pub use manager::{CallbackId, GameEventManager};

use camera_shake::CameraShakeEvent;
use char_activation::CharActivationEvent;
use io_collision::IoCollisionEvent;
use item_check::ItemCheckEvent;
use particles_event::ParticlesEvent;
use party_join::PartyJoinEvent;
use set_value::SetValueEvent;
use tile_event_manage::TileEventManageEvent;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventId(pub(crate) u64);

/// Variant payload dispatched by [`GameEvent::fire`].
pub enum EventKind {
    SetValue(SetValueEvent),
    ItemCheck(ItemCheckEvent),
    IoCollision(IoCollisionEvent),
    Particles(ParticlesEvent),
    PartyJoin(PartyJoinEvent),
    TileEventManage(TileEventManageEvent),
    CharActivation(CharActivationEvent),
    CameraShake(CameraShakeEvent),
}

/// A scripted event instance. Constructed through the descriptor factory
/// ([`get_event_instance`]); registered under its `key_name` for the whole of
/// its live span.
pub struct GameEvent {
    id: EventId,
    active: Cell<bool>,
    key_name: Option<String>,
    ctx: Rc<GameContext>,
    origin: RefCell<Option<FieldCharRef>>,
    kind: EventKind,
}

impl GameEvent {
    pub(crate) fn new(
        ctx: &Rc<GameContext>,
        active: bool,
        key_name: Option<String>,
        kind: EventKind,
    ) -> Rc<Self> {
        let event = Rc::new(Self {
            id: ctx.events.allocate_id(),
            active: Cell::new(active),
            key_name,
            ctx: ctx.clone(),
            origin: RefCell::new(None),
            kind,
        });
        if let Some(key) = &event.key_name {
            ctx.events.register(key, &event);
        }
        event
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn key_name(&self) -> Option<&str> {
        self.key_name.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Gate future fires; an in-flight asynchronous fire is unaffected.
    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    pub fn event_type(&self) -> &'static str {
        match &self.kind {
            EventKind::SetValue(_) => "set_value",
            EventKind::ItemCheck(_) => "item_check",
            EventKind::IoCollision(_) => "io_collision",
            EventKind::Particles(_) => "particles",
            EventKind::PartyJoin(_) => "party_join",
            EventKind::TileEventManage(_) => "tile_event_manage",
            EventKind::CharActivation(_) => "char_activation",
            EventKind::CameraShake(_) => "camera_shake",
        }
    }

    pub fn origin(&self) -> Option<FieldCharRef> {
        self.origin.borrow().clone()
    }

    pub(crate) fn context(&self) -> &Rc<GameContext> {
        &self.ctx
    }

    pub(crate) fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Fire the event on behalf of `origin`. The origin is recorded even when
    /// the event is inactive so a later activation fires with current
    /// provenance; an inactive event otherwise does nothing.
    pub fn fire(self: &Rc<Self>, origin: Option<&FieldCharRef>) {
        *self.origin.borrow_mut() = origin.cloned();
        if !self.active.get() {
            return;
        }
        match &self.kind {
            EventKind::SetValue(ev) => ev.fire(self),
            EventKind::ItemCheck(ev) => ev.fire(self),
            EventKind::IoCollision(ev) => ev.fire(self),
            EventKind::Particles(ev) => ev.fire(self),
            EventKind::PartyJoin(ev) => ev.fire(self),
            EventKind::TileEventManage(ev) => ev.fire(self),
            EventKind::CharActivation(ev) => ev.fire(self),
            EventKind::CameraShake(ev) => ev.fire(self),
        }
    }

    /// Release child events and drop this event's registration. The label is
    /// only removed while this instance still owns it, so destroying a stale
    /// event never evicts a newer one registered under the same key.
    pub fn destroy(self: &Rc<Self>) {
        for child in self.children() {
            child.destroy();
        }
        if let EventKind::PartyJoin(ev) = &self.kind {
            ev.teardown(self);
        }
        if let Some(key) = &self.key_name {
            self.ctx.events.unregister(key, self.id);
        }
    }

    fn children(&self) -> Vec<Rc<GameEvent>> {
        match &self.kind {
            EventKind::ItemCheck(ev) => ev.children(),
            EventKind::PartyJoin(ev) => ev.children(),
            _ => Vec::new(),
        }
    }
}

/// Fire `events` in sequence order on behalf of `origin` (fire-and-continue;
/// each child's own async work resolves independently).
pub(crate) fn fire_all(events: &[Rc<GameEvent>], origin: Option<&FieldCharRef>) {
    for event in events {
        event.fire(origin);
    }
}
