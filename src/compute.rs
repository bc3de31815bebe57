//! Per-tick game logic.
//!
//! [`tick`] runs the pipeline in a fixed order: animation, player, bullets,
//! enemies, collision, wave check. Each stage scans the entity store, marks
//! what has to go and compacts before the next stage runs, so no stage ever
//! sees an entity an earlier stage destroyed. Randomness comes through an
//! injected `Rng` and time through `now`, which keeps tests deterministic.

pub mod animation;
pub mod combat;
pub mod motion;
pub mod wave;

use rand::Rng;

use crate::config::Rules;
use crate::entities::{InputState, Player};
use crate::stage::{Sprite, SpriteKind, Stage};
use crate::store::EntityStore;

// ── World ─────────────────────────────────────────────────────────────────────

/// Everything a running session mutates each tick.
#[derive(Debug)]
pub struct World {
    pub player: Player,
    pub store: EntityStore,
    pub score: u32,
    pub wave: u32,
    pub difficulty: u32,
    pub enemy_speed: f32,
}

/// The values shown on the HUD while playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stats {
    pub hp: i32,
    pub score: u32,
    pub wave: u32,
}

impl World {
    /// Fresh world for wave 1; places the player sprite but spawns no enemies.
    pub fn new(stage: &mut impl Stage, rules: &Rules, now: f64) -> Self {
        let pos = rules.player_start;
        let handle = stage.create(pos, Sprite::first(SpriteKind::Player));
        World {
            player: Player {
                handle,
                pos,
                speed: rules.player_speed,
                hp: rules.player_hp,
                attack: rules.player_attack,
                frame: 0,
                last_frame_at: now,
                last_fire_at: None,
                fire_cooldown: rules.fire_cooldown,
            },
            store: EntityStore::new(),
            score: 0,
            wave: 1,
            difficulty: 1,
            enemy_speed: rules.enemy_base_speed,
        }
    }

    pub fn stats(&self) -> Stats {
        Stats {
            hp: self.player.hp,
            score: self.score,
            wave: self.wave,
        }
    }

    /// Deletes every sprite this world owns.
    pub fn teardown(mut self, stage: &mut impl Stage) {
        self.store.clear(stage);
        stage.delete(self.player.handle);
    }
}

// ── Tick ──────────────────────────────────────────────────────────────────────

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub fired: bool,
    /// Bullets that left through the top edge.
    pub bullets_expired: usize,
    /// Enemies that crossed the bottom edge; each cost one hit point.
    pub escaped: u32,
    pub hits: u32,
    pub kills: u32,
    pub score_gained: u32,
    /// Entities dropped because their sprite handle went stale.
    pub stale: usize,
    pub wave_advanced: bool,
    pub player_down: bool,
}

/// Advance the world by one tick.
///
/// Stops right after enemy motion when the player runs out of hit points:
/// collision and wave progression are skipped so the final score is the
/// one the player had when the game ended.
pub fn tick(
    world: &mut World,
    stage: &mut impl Stage,
    input: &InputState,
    now: f64,
    rules: &Rules,
    rng: &mut impl Rng,
) -> TickReport {
    let mut report = TickReport::default();

    // ── 1. Animation ─────────────────────────────────────────────────────────
    report.stale += animation::advance(world, stage, now, rules);

    // ── 2. Motion: player (and fire), bullets, enemies ───────────────────────
    report.fired = motion::move_player(world, stage, input, now, rules);

    let bullets = motion::move_bullets(world, stage, rules);
    report.bullets_expired = bullets.expired;
    report.stale += bullets.stale;

    let enemies = motion::move_enemies(world, stage, now, rules);
    report.escaped = enemies.escaped;
    report.stale += enemies.stale;

    if world.player.is_down() {
        report.player_down = true;
        return report;
    }

    // ── 3. Collision ─────────────────────────────────────────────────────────
    let combat = combat::resolve(world, stage, rules);
    report.hits = combat.hits;
    report.kills = combat.kills;
    report.score_gained = combat.score_gained;
    report.stale += combat.stale;

    // ── 4. Wave check ────────────────────────────────────────────────────────
    if world.store.enemies().is_empty() {
        wave::advance(world, stage, rules, rng, now);
        report.wave_advanced = true;
    }

    report
}
