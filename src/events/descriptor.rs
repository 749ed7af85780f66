// ── Event descriptors ───────────────────────────────────────────────────────
//
// The serialized form of a scripted event: a JSON object tagged by `type`,
// with nested descriptor lists for the branching variants. `parse_event`
// deserializes one descriptor; `get_event_instance` resolves a descriptor
// tree into live, registered events — children are constructed eagerly so
// their registrations happen before the root ever fires.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;

use crate::context::GameContext;
use crate::particles::EmitterInfo;
use crate::stage::ParticleLayer;

use super::camera_shake::CameraShakeEvent;
use super::char_activation::{CharActivationEvent, CharTarget};
use super::io_collision::{CollisionControl, IoCollisionEvent};
use super::item_check::{ItemCheckEvent, ItemCheckType};
use super::particles_event::ParticlesEvent;
use super::party_join::PartyJoinEvent;
use super::set_value::{EventValue, SetValueEvent};
use super::tile_event_manage::{DirectionSpec, OneOrMany, TileEventManageEvent};
use super::{EventKind, GameEvent};

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("malformed event descriptor: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse one serialized event descriptor.
pub fn parse_event(raw: &str) -> Result<EventDescriptor, DescriptorError> {
    Ok(serde_json::from_str(raw)?)
}

fn default_true() -> bool {
    true
}

fn default_layer() -> ParticleLayer {
    ParticleLayer::Middle
}

/// One scripted event, possibly with nested descriptor lists.
#[derive(Clone, Debug, Deserialize)]
pub struct EventDescriptor {
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub key_name: Option<String>,
    #[serde(flatten)]
    pub params: EventParams,
}

/// Variant-specific descriptor parameters, tagged by `type`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventParams {
    SetValue {
        value: EventValue,
        #[serde(default)]
        check_npc_storage_values: bool,
    },
    ItemCheck {
        char_key_name: String,
        check_type: ItemCheckType,
        #[serde(default)]
        slot_index: Option<usize>,
        #[serde(default)]
        item_key_name: Option<String>,
        #[serde(default)]
        quantity: Option<u32>,
        #[serde(default)]
        check_ok_events: Vec<EventDescriptor>,
        #[serde(default)]
        check_fail_events: Vec<EventDescriptor>,
    },
    IoCollision {
        io_label: String,
        control: CollisionControl,
    },
    Particles {
        emitters: Vec<EmitterInfo>,
        #[serde(default = "default_layer")]
        layer: ParticleLayer,
    },
    PartyJoin {
        char_key_name: String,
        #[serde(default = "default_true")]
        join: bool,
        #[serde(default = "default_true")]
        show_dialog: bool,
        #[serde(default)]
        finish_events: Vec<EventDescriptor>,
    },
    TileEventManage {
        tile_event_label: String,
        #[serde(default = "default_true")]
        activate: bool,
        #[serde(default)]
        directions: Option<DirectionSpec>,
        #[serde(default)]
        collision_layers: Option<OneOrMany>,
        #[serde(default)]
        pos_x: Option<i32>,
        #[serde(default)]
        pos_y: Option<i32>,
    },
    CharActivation {
        target: CharTarget,
        #[serde(default)]
        npc_label: Option<String>,
        #[serde(default = "default_true")]
        activate: bool,
    },
    CameraShake {
        #[serde(default = "default_true")]
        enable: bool,
    },
}

/// Resolve a descriptor tree into a live event graph rooted at the returned
/// instance. Every node with a `key_name` registers on construction.
pub fn get_event_instance(ctx: &Rc<GameContext>, descriptor: &EventDescriptor) -> Rc<GameEvent> {
    let resolve_all = |descriptors: &[EventDescriptor]| -> Vec<Rc<GameEvent>> {
        descriptors.iter().map(|d| get_event_instance(ctx, d)).collect()
    };

    let kind = match &descriptor.params {
        EventParams::SetValue { value, check_npc_storage_values } => {
            EventKind::SetValue(SetValueEvent {
                value: value.clone(),
                check_npc_storage_values: *check_npc_storage_values,
            })
        }
        EventParams::ItemCheck {
            char_key_name,
            check_type,
            slot_index,
            item_key_name,
            quantity,
            check_ok_events,
            check_fail_events,
        } => EventKind::ItemCheck(ItemCheckEvent {
            char_key_name: char_key_name.clone(),
            check_type: *check_type,
            slot_index: *slot_index,
            item_key_name: item_key_name.clone(),
            quantity: *quantity,
            check_ok_events: resolve_all(check_ok_events),
            check_fail_events: resolve_all(check_fail_events),
        }),
        EventParams::IoCollision { io_label, control } => {
            EventKind::IoCollision(IoCollisionEvent { io_label: io_label.clone(), control: *control })
        }
        EventParams::Particles { emitters, layer } => {
            EventKind::Particles(ParticlesEvent { emitters: emitters.clone(), layer: *layer })
        }
        EventParams::PartyJoin { char_key_name, join, show_dialog, finish_events } => {
            EventKind::PartyJoin(PartyJoinEvent {
                char_key_name: char_key_name.clone(),
                join: *join,
                show_dialog: *show_dialog,
                finish_events: resolve_all(finish_events),
                dialog: RefCell::new(None),
                control_binding: Cell::new(None),
                control_enabled: Cell::new(false),
            })
        }
        EventParams::TileEventManage {
            tile_event_label,
            activate,
            directions,
            collision_layers,
            pos_x,
            pos_y,
        } => EventKind::TileEventManage(TileEventManageEvent {
            tile_event_label: tile_event_label.clone(),
            activate: *activate,
            directions: directions.clone(),
            collision_layers: collision_layers.clone().map(OneOrMany::into_vec),
            pos_x: *pos_x,
            pos_y: *pos_y,
        }),
        EventParams::CharActivation { target, npc_label, activate } => {
            EventKind::CharActivation(CharActivationEvent {
                target: *target,
                npc_label: npc_label.clone(),
                activate: *activate,
            })
        }
        EventParams::CameraShake { enable } => {
            EventKind::CameraShake(CameraShakeEvent { enable: *enable })
        }
    };

    GameEvent::new(ctx, descriptor.active, descriptor.key_name.clone(), kind)
}
