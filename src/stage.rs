// ── Stage objects ───────────────────────────────────────────────────────────
//
// Retained display objects standing in for the renderer surface: positioned
// text with a settable string and tint, positioned graphics, and three
// immediate-mode particle layers. The real renderer walks these each frame;
// this layer only mutates them, so everything here is plain data and fully
// testable headless.

use std::cell::RefCell;
use std::rc::Rc;

use crate::tween::{TweenProp, Tweenable};

pub type TextRef = Rc<RefCell<TextObject>>;
pub type GraphicRef = Rc<RefCell<GraphicObject>>;

/// Positioned text with an optional drop-shadow copy.
///
/// The shadow string is kept byte-identical to the primary string at all
/// times; the renderer draws it offset by (+1, +1) and tinted black.
pub struct TextObject {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub tint: u32,
    pub visible: bool,
    text: String,
    shadow_text: Option<String>,
}

impl TextObject {
    pub fn new(x: f32, y: f32, with_shadow: bool) -> Self {
        Self {
            x,
            y,
            scale_x: 1.0,
            scale_y: 1.0,
            tint: crate::DEFAULT_FONT_COLOR,
            visible: true,
            text: String::new(),
            shadow_text: with_shadow.then(String::new),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn shadow_text(&self) -> Option<&str> {
        self.shadow_text.as_deref()
    }

    pub fn has_shadow(&self) -> bool {
        self.shadow_text.is_some()
    }

    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        if let Some(shadow) = &mut self.shadow_text {
            shadow.clear();
            shadow.push_str(text);
        }
    }

    pub fn append_text(&mut self, chunk: &str) {
        self.text.push_str(chunk);
        if let Some(shadow) = &mut self.shadow_text {
            shadow.push_str(chunk);
        }
    }
}

impl Tweenable for TextObject {
    fn get(&self, prop: TweenProp) -> f32 {
        match prop {
            TweenProp::X => self.x,
            TweenProp::Y => self.y,
            TweenProp::ScaleX | TweenProp::Scale => self.scale_x,
            TweenProp::ScaleY => self.scale_y,
            // Text has no intrinsic box to animate.
            TweenProp::Width | TweenProp::Height => 0.0,
        }
    }

    fn set(&mut self, prop: TweenProp, value: f32) {
        match prop {
            TweenProp::X => self.x = value,
            TweenProp::Y => self.y = value,
            TweenProp::ScaleX => self.scale_x = value,
            TweenProp::ScaleY => self.scale_y = value,
            TweenProp::Scale => {
                self.scale_x = value;
                self.scale_y = value;
            }
            TweenProp::Width | TweenProp::Height => {}
        }
    }
}

/// Positioned solid-color rectangle (window chrome, avatars, masks).
pub struct GraphicObject {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub color: u32,
    pub visible: bool,
}

impl GraphicObject {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            color: 0x000000,
            visible: true,
        }
    }
}

impl Tweenable for GraphicObject {
    fn get(&self, prop: TweenProp) -> f32 {
        match prop {
            TweenProp::X => self.x,
            TweenProp::Y => self.y,
            TweenProp::ScaleX | TweenProp::Scale => self.scale_x,
            TweenProp::ScaleY => self.scale_y,
            TweenProp::Width => self.width,
            TweenProp::Height => self.height,
        }
    }

    fn set(&mut self, prop: TweenProp, value: f32) {
        match prop {
            TweenProp::X => self.x = value,
            TweenProp::Y => self.y = value,
            TweenProp::ScaleX => self.scale_x = value,
            TweenProp::ScaleY => self.scale_y = value,
            TweenProp::Scale => {
                self.scale_x = value;
                self.scale_y = value;
            }
            TweenProp::Width => self.width = value,
            TweenProp::Height => self.height = value,
        }
    }
}

/// Particle render layer, back to front.
#[derive(Copy, Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleLayer {
    Lower,
    Middle,
    Over,
}

impl ParticleLayer {
    fn index(self) -> usize {
        match self {
            ParticleLayer::Lower => 0,
            ParticleLayer::Middle => 1,
            ParticleLayer::Over => 2,
        }
    }
}

/// A queued particle quad; cleared at the start of every frame.
#[derive(Copy, Clone, Debug)]
pub struct ParticleQuad {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

struct StageState {
    texts: Vec<TextRef>,
    graphics: Vec<GraphicRef>,
    particles: [Vec<ParticleQuad>; 3],
}

/// Clonable handle to the retained display list.
#[derive(Clone)]
pub struct Stage {
    state: Rc<RefCell<StageState>>,
}

impl Stage {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(StageState {
                texts: Vec::new(),
                graphics: Vec::new(),
                particles: [Vec::new(), Vec::new(), Vec::new()],
            })),
        }
    }

    pub fn add_text(&self, x: f32, y: f32, with_shadow: bool) -> TextRef {
        let text = Rc::new(RefCell::new(TextObject::new(x, y, with_shadow)));
        self.state.borrow_mut().texts.push(text.clone());
        text
    }

    pub fn add_graphic(&self, x: f32, y: f32, width: f32, height: f32) -> GraphicRef {
        let graphic = Rc::new(RefCell::new(GraphicObject::new(x, y, width, height)));
        self.state.borrow_mut().graphics.push(graphic.clone());
        graphic
    }

    /// Remove a text object from the display list. Removing an object that is
    /// already gone is a no-op (it is in its desired end state).
    pub fn remove_text(&self, text: &TextRef) {
        self.state.borrow_mut().texts.retain(|t| !Rc::ptr_eq(t, text));
    }

    pub fn remove_graphic(&self, graphic: &GraphicRef) {
        self.state.borrow_mut().graphics.retain(|g| !Rc::ptr_eq(g, graphic));
    }

    /// Queue a particle quad for the current frame.
    pub fn draw_particle(&self, layer: ParticleLayer, x: f32, y: f32, size: f32) {
        self.state.borrow_mut().particles[layer.index()].push(ParticleQuad { x, y, size });
    }

    /// Clear the per-frame particle buffers. Call once per frame before drawing.
    pub fn clear_particles(&self) {
        for layer in &mut self.state.borrow_mut().particles {
            layer.clear();
        }
    }

    pub fn text_count(&self) -> usize {
        self.state.borrow().texts.len()
    }

    pub fn graphic_count(&self) -> usize {
        self.state.borrow().graphics.len()
    }

    pub fn particle_count(&self, layer: ParticleLayer) -> usize {
        self.state.borrow().particles[layer.index()].len()
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}
