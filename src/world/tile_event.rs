//! Tile-triggered events: map squares that fire behavior when stepped on
//! from particular directions. Scripted events can re-point, re-layer, and
//! re-arm them at runtime.

use std::collections::HashSet;

use glam::IVec2;
use serde::Deserialize;
use serde_json::Value;

use super::path;

/// The eight facing directions a tile event can be armed for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Parse the snake_case name used in scripted activation maps.
    pub fn parse(name: &str) -> Option<Direction> {
        Some(match name {
            "up" => Direction::Up,
            "down" => Direction::Down,
            "left" => Direction::Left,
            "right" => Direction::Right,
            "up_left" => Direction::UpLeft,
            "up_right" => Direction::UpRight,
            "down_left" => Direction::DownLeft,
            "down_right" => Direction::DownRight,
            _ => return None,
        })
    }
}

pub struct TileEvent {
    pub index: usize,
    pub label: Option<String>,
    pub position: IVec2,
    /// Directions the event currently fires for.
    activations: HashSet<Direction>,
    /// Collision layers on which the event is active.
    pub collision_layers: Vec<u32>,
    pub props: Value,
}

impl TileEvent {
    pub fn new(label: Option<&str>, x: i32, y: i32) -> Self {
        Self {
            index: 0,
            label: label.map(str::to_owned),
            position: IVec2::new(x, y),
            activations: HashSet::new(),
            collision_layers: vec![0],
            props: Value::Null,
        }
    }

    /// Arm the event for every direction.
    pub fn activate(&mut self) {
        self.activations.extend(Direction::ALL);
    }

    /// Disarm the event entirely.
    pub fn deactivate(&mut self) {
        self.activations.clear();
    }

    pub fn activate_at(&mut self, direction: Direction) {
        self.activations.insert(direction);
    }

    pub fn deactivate_at(&mut self, direction: Direction) {
        self.activations.remove(&direction);
    }

    pub fn is_active_at(&self, direction: Direction) -> bool {
        self.activations.contains(&direction)
    }

    pub fn is_active(&self) -> bool {
        !self.activations.is_empty()
    }

    pub fn set_activation_collision_layers(&mut self, layers: &[u32]) {
        self.collision_layers = layers.to_vec();
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = IVec2::new(x, y);
    }

    /// Dotted-path write. Position components are real fields; anything else
    /// lands in the property bag.
    pub fn set_property(&mut self, property: &str, value: Value) {
        match property {
            "position.x" => {
                if let Some(x) = value.as_i64() {
                    self.position.x = x as i32;
                }
            }
            "position.y" => {
                if let Some(y) = value.as_i64() {
                    self.position.y = y as i32;
                }
            }
            _ => path::set(&mut self.props, property, value),
        }
    }
}
