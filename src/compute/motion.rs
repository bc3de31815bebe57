//! Motion Engine: player steering and firing, bullet flight, enemy descent.

use crate::compute::World;
use crate::config::Rules;
use crate::entities::{EnemyKind, InputState};
use crate::stage::Stage;
use crate::store::Marks;

/// Per-tick displacement `(dx, dy)` of an enemy at time `t` (seconds).
///
/// The boss always sinks at the same pace; every other kind follows the
/// current `enemy_speed`.
pub fn enemy_step(kind: EnemyKind, t: f64, enemy_speed: f32) -> (f32, f32) {
    match kind {
        EnemyKind::Normal => (0.0, enemy_speed),
        EnemyKind::Fast => ((3.0 * (5.0 * t).sin()) as f32, enemy_speed),
        EnemyKind::Tank => ((2.0 * (2.0 * t).sin()) as f32, enemy_speed / 2.0),
        EnemyKind::Boss => ((2.0 * t.sin()) as f32, 0.5),
    }
}

/// Moves the player along x and fires if allowed. Returns `true` if a bullet
/// was spawned.
///
/// The player is not clamped to the playfield; it can be steered past
/// either edge.
pub fn move_player(
    world: &mut World,
    stage: &mut impl Stage,
    input: &InputState,
    now: f64,
    rules: &Rules,
) -> bool {
    let player = &mut world.player;
    let mut dx = 0.0;
    if input.left {
        dx -= player.speed;
    }
    if input.right {
        dx += player.speed;
    }
    if dx != 0.0 {
        player.pos = player.pos.offset(dx, 0.0);
        if let Err(err) = stage.move_by(player.handle, dx, 0.0) {
            tracing::debug!(%err, "player sprite unavailable");
        }
    }

    if !input.fire || !player.can_fire(now) {
        return false;
    }
    player.last_fire_at = Some(now);
    let muzzle = player.pos.offset(0.0, -rules.muzzle_offset);
    world.store.spawn_bullet(stage, muzzle);
    true
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BulletSweep {
    pub expired: usize,
    pub stale: usize,
}

/// Bullets fly straight up; those above the top edge are removed.
pub fn move_bullets(world: &mut World, stage: &mut impl Stage, rules: &Rules) -> BulletSweep {
    let mut sweep = BulletSweep::default();
    let mut marks = Marks::new();
    for bullet in world.store.bullets_mut() {
        if let Err(err) = stage.move_by(bullet.handle, 0.0, -rules.bullet_speed) {
            tracing::debug!(%err, id = ?bullet.id, "dropping bullet with stale sprite");
            marks.mark(bullet.id);
            sweep.stale += 1;
            continue;
        }
        bullet.pos = bullet.pos.offset(0.0, -rules.bullet_speed);
        if bullet.pos.y < 0.0 {
            marks.mark(bullet.id);
            sweep.expired += 1;
        }
    }
    world.store.sweep_bullets(&marks, stage);
    sweep
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnemySweep {
    pub escaped: u32,
    pub stale: usize,
}

/// Moves every enemy by its kind's rule. Each enemy that ends up below the
/// bottom edge is removed and costs the player exactly one hit point.
pub fn move_enemies(world: &mut World, stage: &mut impl Stage, now: f64, rules: &Rules) -> EnemySweep {
    let mut sweep = EnemySweep::default();
    let mut marks = Marks::new();
    let speed = world.enemy_speed;
    for enemy in world.store.enemies_mut() {
        let (dx, dy) = enemy_step(enemy.kind, now, speed);
        if let Err(err) = stage.move_by(enemy.handle, dx, dy) {
            tracing::debug!(%err, id = ?enemy.id, "dropping enemy with stale sprite");
            marks.mark(enemy.id);
            sweep.stale += 1;
            continue;
        }
        enemy.pos = enemy.pos.offset(dx, dy);
        if enemy.pos.y > rules.height {
            marks.mark(enemy.id);
            sweep.escaped += 1;
        }
    }

    if sweep.escaped > 0 {
        world.player.hp -= sweep.escaped as i32;
        tracing::debug!(escaped = sweep.escaped, hp = world.player.hp, "enemies broke through");
    }
    world.store.sweep_enemies(&marks, stage);
    sweep
}
