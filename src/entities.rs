/// All game entity types. Plain data; the rules live in `compute`.

use crate::stage::SpriteHandle;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// A point in playfield units; y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Position::new(self.x + dx, self.y + dy)
    }
}

// ── Kinds & ids ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnemyKind {
    Normal,
    Fast,
    Tank,
    Boss,
}

impl EnemyKind {
    /// Kinds drawn at random for a regular wave.
    pub const REGULAR: [EnemyKind; 3] = [EnemyKind::Normal, EnemyKind::Fast, EnemyKind::Tank];

    pub fn is_boss(self) -> bool {
        self == EnemyKind::Boss
    }
}

/// Stable key of a bullet or enemy in the entity store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

// ── Player, bullets, enemies ─────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub handle: SpriteHandle,
    pub pos: Position,
    pub speed: f32,
    /// Signed so every escaped enemy is counted even past zero.
    pub hp: i32,
    pub attack: i32,
    pub frame: usize,
    pub last_frame_at: f64,
    /// `None` until the first shot, so the opening shot is never blocked.
    pub last_fire_at: Option<f64>,
    pub fire_cooldown: f64,
}

impl Player {
    pub fn can_fire(&self, now: f64) -> bool {
        match self.last_fire_at {
            Some(last) => now - last >= self.fire_cooldown,
            None => true,
        }
    }

    pub fn is_down(&self) -> bool {
        self.hp <= 0
    }
}

#[derive(Clone, Debug)]
pub struct Bullet {
    pub id: EntityId,
    pub handle: SpriteHandle,
    pub pos: Position,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub handle: SpriteHandle,
    pub kind: EnemyKind,
    pub pos: Position,
    /// Always > 0 while the enemy is in the live set.
    pub hp: i32,
    pub frame: usize,
    pub last_frame_at: f64,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Held inputs for the current tick, already mapped from raw keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub confirm: bool,
    pub cancel: bool,
}

// ── Session lifecycle ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Start screen.
    Idle,
    Running,
    /// Score is frozen until the return-to-idle timer fires.
    GameOver,
}
