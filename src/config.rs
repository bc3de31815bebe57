/// Tunable game rules.
///
/// `Rules::default()` reproduces the arcade feel the game was designed
/// around; the binary only overrides a handful of fields from the command
/// line and then calls [`Rules::validate`].

use crate::entities::Position;
use crate::error::ConfigError;

pub const MAX_TICK_HZ: u32 = 240;

#[derive(Clone, Debug, PartialEq)]
pub struct Rules {
    // ── Playfield & clock ────────────────────────────────────────────────────
    pub width: f32,
    pub height: f32,
    pub tick_hz: u32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_start: Position,
    pub player_hp: i32,
    pub player_speed: f32,
    pub player_attack: i32,
    /// Seconds between two shots while fire is held.
    pub fire_cooldown: f64,
    /// Bullets appear this far above the player's centre.
    pub muzzle_offset: f32,
    pub bullet_speed: f32,

    // ── Enemies & waves ──────────────────────────────────────────────────────
    pub enemy_base_speed: f32,
    pub enemy_speed_step: f32,
    /// Horizontal spawn positions keep this distance from both edges.
    pub spawn_margin: u32,
    pub spawn_y: f32,
    /// Regular enemies get this plus the difficulty level as hit points.
    pub regular_base_hp: i32,
    pub boss_spawn: Position,
    pub boss_base_hp: i32,
    pub boss_hp_per_level: i32,
    pub boss_every: u32,

    // ── Combat ───────────────────────────────────────────────────────────────
    /// Half-side of the square hitbox shared by every enemy.
    pub hit_threshold: f32,
    pub score_regular: u32,
    pub score_boss: u32,

    // ── Timing ───────────────────────────────────────────────────────────────
    pub frame_interval: f64,
    pub game_over_delay: f64,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            width: 480.0,
            height: 640.0,
            tick_hz: 30,

            player_start: Position::new(240.0, 580.0),
            player_hp: 3,
            player_speed: 6.0,
            player_attack: 1,
            fire_cooldown: 0.5,
            muzzle_offset: 20.0,
            bullet_speed: 12.0,

            enemy_base_speed: 2.0,
            enemy_speed_step: 0.5,
            spawn_margin: 40,
            spawn_y: 40.0,
            regular_base_hp: 1,
            boss_spawn: Position::new(240.0, 60.0),
            boss_base_hp: 30,
            boss_hp_per_level: 5,
            boss_every: 5,

            hit_threshold: 30.0,
            score_regular: 10,
            score_boss: 200,

            frame_interval: 0.2,
            game_over_delay: 2.0,
        }
    }
}

impl Rules {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_hz == 0 || self.tick_hz > MAX_TICK_HZ {
            return Err(ConfigError::TickRate {
                got: self.tick_hz,
                max: MAX_TICK_HZ,
            });
        }
        if self.player_hp <= 0 {
            return Err(ConfigError::NotPositive { field: "player_hp" });
        }
        if self.player_attack <= 0 {
            return Err(ConfigError::NotPositive { field: "player_attack" });
        }
        if self.regular_base_hp <= 0 {
            return Err(ConfigError::NotPositive { field: "regular_base_hp" });
        }
        if self.frame_interval <= 0.0 {
            return Err(ConfigError::NotPositive { field: "frame_interval" });
        }
        if self.boss_every < 2 {
            return Err(ConfigError::BossInterval(self.boss_every));
        }
        if (self.spawn_margin as f32) * 2.0 >= self.width {
            return Err(ConfigError::SpawnMargin {
                margin: self.spawn_margin,
                width: self.width,
            });
        }
        Ok(())
    }

    /// Hit points of a regular enemy at the given difficulty level.
    pub fn regular_hp(&self, difficulty: u32) -> i32 {
        self.regular_base_hp + difficulty as i32
    }

    pub fn boss_hp(&self, difficulty: u32) -> i32 {
        self.boss_base_hp + difficulty as i32 * self.boss_hp_per_level
    }

    pub fn is_boss_wave(&self, wave: u32) -> bool {
        wave % self.boss_every == 0
    }

    /// Waves right after a boss wave bump the difficulty level.
    pub fn raises_difficulty(&self, wave: u32) -> bool {
        wave % self.boss_every == 1
    }

    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_hz as f64
    }
}
