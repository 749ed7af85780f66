pub mod audio;
pub mod battle_log;
pub mod camera;
pub mod context;
pub mod controls;
pub mod dialog;
pub mod events;
pub mod particles;
pub mod scheduler;
pub mod signal;
pub mod stage;
pub mod tween;
pub mod typewriter;
pub mod window;
pub mod world;

/// Logical screen size in pixels (GBA-class RPG viewport).
pub const GAME_WIDTH: f32 = 240.0;
pub const GAME_HEIGHT: f32 = 160.0;

/// Bitmap font metrics. Text layout in this layer is monospace-approximate;
/// the real glyph advance lives in the renderer.
pub const FONT_SIZE: f32 = 8.0;
pub const SPACE_BETWEEN_LINES: f32 = 2.0;

pub const DEFAULT_FONT_COLOR: u32 = 0xF8F8F8;
