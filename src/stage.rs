//! The visual collaborator: where sprites and HUD text live.
//!
//! The core never draws anything itself. It asks a [`Stage`] to create,
//! move and delete sprites, and a [`Hud`] to show text. [`Canvas`] is a
//! retained in-memory implementation of both; the terminal front-end renders
//! it every frame and the tests inspect it directly.

use std::collections::{BTreeMap, HashMap};

use crate::entities::{EnemyKind, Position};
use crate::error::{StageError, StageResult};

// ── Sprites ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Player,
    Bullet,
    Enemy(EnemyKind),
}

/// One frame of one sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub frame: usize,
}

impl Sprite {
    pub fn first(kind: SpriteKind) -> Self {
        Sprite { kind, frame: 0 }
    }
}

/// Opaque reference to a placed sprite. Stale once deleted or cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteHandle {
    index: u32,
    generation: u32,
}

// ── Collaborator traits ───────────────────────────────────────────────────────

pub trait Stage {
    /// Frames available for a sprite sheet; 0 means the asset is missing.
    fn frame_count(&self, kind: SpriteKind) -> usize;
    fn create(&mut self, at: Position, sprite: Sprite) -> SpriteHandle;
    fn move_by(&mut self, handle: SpriteHandle, dx: f32, dy: f32) -> StageResult<()>;
    fn set_position(&mut self, handle: SpriteHandle, at: Position) -> StageResult<()>;
    fn position(&self, handle: SpriteHandle) -> StageResult<Position>;
    fn set_sprite(&mut self, handle: SpriteHandle, sprite: Sprite) -> StageResult<()>;
    /// Deleting a stale handle is a no-op.
    fn delete(&mut self, handle: SpriteHandle);
    /// Removes every sprite, invalidating all handles.
    fn clear(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextField {
    Hp,
    Score,
    Wave,
    Title,
    HighScore,
    Controls,
    Banner,
}

pub trait Hud {
    fn set_text(&mut self, field: TextField, text: &str);
    fn clear_text(&mut self);
    /// Start / exit buttons of the start screen.
    fn show_menu_buttons(&mut self, visible: bool);
}

/// Everything the session needs from its host.
pub trait Host: Stage + Hud {}

impl<T: Stage + Hud> Host for T {}

// ── In-memory canvas ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placed {
    pub pos: Position,
    pub sprite: Sprite,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    placed: Option<Placed>,
}

#[derive(Clone, Debug)]
pub struct Canvas {
    slots: Vec<Slot>,
    free: Vec<u32>,
    frames: HashMap<SpriteKind, usize>,
    texts: BTreeMap<TextField, String>,
    buttons_visible: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas::new()
    }
}

impl Canvas {
    /// A canvas with the stock sprite catalogue.
    pub fn new() -> Self {
        let frames = HashMap::from([
            (SpriteKind::Player, 2),
            (SpriteKind::Bullet, 1),
            (SpriteKind::Enemy(EnemyKind::Normal), 1),
            (SpriteKind::Enemy(EnemyKind::Fast), 2),
            (SpriteKind::Enemy(EnemyKind::Tank), 1),
            (SpriteKind::Enemy(EnemyKind::Boss), 2),
        ]);
        Canvas {
            slots: Vec::new(),
            free: Vec::new(),
            frames,
            texts: BTreeMap::new(),
            buttons_visible: false,
        }
    }

    pub fn set_frame_count(&mut self, kind: SpriteKind, frames: usize) {
        self.frames.insert(kind, frames);
    }

    /// Live sprites in slot order.
    pub fn sprites(&self) -> impl Iterator<Item = &Placed> {
        self.slots.iter().filter_map(|s| s.placed.as_ref())
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites().count()
    }

    pub fn get(&self, handle: SpriteHandle) -> Option<&Placed> {
        self.slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.placed.as_ref())
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        self.texts.get(&field).map(String::as_str)
    }

    pub fn buttons_visible(&self) -> bool {
        self.buttons_visible
    }

    fn resolve_mut(&mut self, handle: SpriteHandle) -> StageResult<&mut Placed> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.placed.as_mut())
            .ok_or(StageError::StaleHandle(handle))
    }
}

impl Stage for Canvas {
    fn frame_count(&self, kind: SpriteKind) -> usize {
        self.frames.get(&kind).copied().unwrap_or(0)
    }

    fn create(&mut self, at: Position, sprite: Sprite) -> SpriteHandle {
        let placed = Some(Placed { pos: at, sprite });
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.placed = placed;
                SpriteHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    placed,
                });
                SpriteHandle {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        }
    }

    fn move_by(&mut self, handle: SpriteHandle, dx: f32, dy: f32) -> StageResult<()> {
        let placed = self.resolve_mut(handle)?;
        placed.pos = placed.pos.offset(dx, dy);
        Ok(())
    }

    fn set_position(&mut self, handle: SpriteHandle, at: Position) -> StageResult<()> {
        self.resolve_mut(handle)?.pos = at;
        Ok(())
    }

    fn position(&self, handle: SpriteHandle) -> StageResult<Position> {
        self.get(handle)
            .map(|p| p.pos)
            .ok_or(StageError::StaleHandle(handle))
    }

    fn set_sprite(&mut self, handle: SpriteHandle, sprite: Sprite) -> StageResult<()> {
        self.resolve_mut(handle)?.sprite = sprite;
        Ok(())
    }

    fn delete(&mut self, handle: SpriteHandle) {
        if let Some(slot) = self.slots.get_mut(handle.index as usize) {
            if slot.generation == handle.generation && slot.placed.is_some() {
                slot.placed = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(handle.index);
            }
        }
    }

    fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.placed.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
    }
}

impl Hud for Canvas {
    fn set_text(&mut self, field: TextField, text: &str) {
        self.texts.insert(field, text.to_string());
    }

    fn clear_text(&mut self) {
        self.texts.clear();
    }

    fn show_menu_buttons(&mut self, visible: bool) {
        self.buttons_visible = visible;
    }
}
