//! Sprite frame cycling. Player and every enemy run on their own timers.

use crate::compute::World;
use crate::config::Rules;
use crate::stage::{Sprite, SpriteKind, Stage};
use crate::store::Marks;

/// Next frame index if `interval` has passed since the last switch.
/// Sheets with a single frame (or none) never animate.
pub fn next_frame(frame: usize, frames: usize, last_at: f64, now: f64, interval: f64) -> Option<usize> {
    if frames <= 1 || now - last_at <= interval {
        return None;
    }
    Some((frame + 1) % frames)
}

/// Cycles frames for the player and all enemies.
/// Returns the number of enemies dropped because their sprite went stale.
pub fn advance(world: &mut World, stage: &mut impl Stage, now: f64, rules: &Rules) -> usize {
    let player = &mut world.player;
    let frames = stage.frame_count(SpriteKind::Player);
    if let Some(frame) = next_frame(player.frame, frames, player.last_frame_at, now, rules.frame_interval) {
        let sprite = Sprite { kind: SpriteKind::Player, frame };
        if let Err(err) = stage.set_sprite(player.handle, sprite) {
            tracing::debug!(%err, "player sprite unavailable");
        }
        player.frame = frame;
        player.last_frame_at = now;
    }

    let mut marks = Marks::new();
    for enemy in world.store.enemies_mut() {
        let kind = SpriteKind::Enemy(enemy.kind);
        let frames = stage.frame_count(kind);
        let Some(frame) = next_frame(enemy.frame, frames, enemy.last_frame_at, now, rules.frame_interval) else {
            continue;
        };
        match stage.set_sprite(enemy.handle, Sprite { kind, frame }) {
            Ok(()) => {
                enemy.frame = frame;
                enemy.last_frame_at = now;
            }
            Err(err) => {
                tracing::debug!(%err, id = ?enemy.id, "dropping enemy with stale sprite");
                marks.mark(enemy.id);
            }
        }
    }
    world.store.sweep_enemies(&marks, stage)
}
