//! Tile-Event-Reconfigure: re-arms a labeled tile event's per-direction
//! activation flags (with an "all" shorthand), its collision-layer set,
//! and/or its world position.

use std::rc::Rc;

use serde::Deserialize;
use tracing::warn;

use crate::world::Direction;

use super::GameEvent;

/// Scripted direction selector: the literal `"all"`, or an explicit list.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum DirectionSpec {
    Word(String),
    List(Vec<Direction>),
}

/// Collision layers given either as one layer or a list.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(u32),
    Many(Vec<u32>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<u32> {
        match self {
            OneOrMany::One(layer) => vec![layer],
            OneOrMany::Many(layers) => layers,
        }
    }
}

pub struct TileEventManageEvent {
    pub(crate) tile_event_label: String,
    pub(crate) activate: bool,
    pub(crate) directions: Option<DirectionSpec>,
    pub(crate) collision_layers: Option<Vec<u32>>,
    pub(crate) pos_x: Option<i32>,
    pub(crate) pos_y: Option<i32>,
}

impl TileEventManageEvent {
    pub(crate) fn fire(&self, event: &Rc<GameEvent>) {
        let ctx = event.context();
        let Some(tile_event) = ctx.world.tile_event_by_label(&self.tile_event_label) else {
            warn!(target: "events", "tile_event_manage: unknown tile event \"{}\"", self.tile_event_label);
            return;
        };
        let mut tile_event = tile_event.borrow_mut();

        match &self.directions {
            Some(DirectionSpec::Word(word)) if word == "all" => {
                if self.activate {
                    tile_event.activate();
                } else {
                    tile_event.deactivate();
                }
            }
            Some(DirectionSpec::Word(word)) => match Direction::parse(word) {
                Some(direction) => {
                    if self.activate {
                        tile_event.activate_at(direction);
                    } else {
                        tile_event.deactivate_at(direction);
                    }
                }
                None => warn!(target: "events", "tile_event_manage: bad direction \"{word}\""),
            },
            Some(DirectionSpec::List(directions)) => {
                for &direction in directions {
                    if self.activate {
                        tile_event.activate_at(direction);
                    } else {
                        tile_event.deactivate_at(direction);
                    }
                }
            }
            None => {}
        }

        if let Some(layers) = &self.collision_layers {
            tile_event.set_activation_collision_layers(layers);
        }
        if self.pos_x.is_some() || self.pos_y.is_some() {
            let x = self.pos_x.unwrap_or(tile_event.position.x);
            let y = self.pos_y.unwrap_or(tile_event.position.y);
            tile_event.set_position(x, y);
        }
    }
}
