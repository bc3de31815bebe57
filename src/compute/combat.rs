//! Collision & Combat Resolver.
//!
//! Enemies are visited in spawn order and each one scans the live bullets.
//! The first bullet inside the square hitbox hits: the bullet is consumed,
//! the enemy loses `attack` hit points and its scan ends. A consumed bullet
//! is never offered to a later enemy, so the first enemy found wins rather
//! than the closest.

use crate::compute::World;
use crate::config::Rules;
use crate::entities::{EnemyKind, Position};
use crate::stage::Stage;
use crate::store::Marks;

/// Both axis distances strictly below `threshold`.
pub fn overlaps(a: Position, b: Position, threshold: f32) -> bool {
    (a.x - b.x).abs() < threshold && (a.y - b.y).abs() < threshold
}

/// Score awarded per enemy destroyed.
pub fn score_for(kind: EnemyKind, rules: &Rules) -> u32 {
    match kind {
        EnemyKind::Boss => rules.score_boss,
        EnemyKind::Normal | EnemyKind::Fast | EnemyKind::Tank => rules.score_regular,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombatReport {
    pub hits: u32,
    pub kills: u32,
    pub score_gained: u32,
    pub stale: usize,
}

pub fn resolve(world: &mut World, stage: &mut impl Stage, rules: &Rules) -> CombatReport {
    let mut report = CombatReport::default();
    let mut spent = Marks::new();
    let mut dead = Marks::new();

    // Positions come from the stage; a handle that no longer resolves means
    // the entity is already gone.
    let mut bullets = Vec::with_capacity(world.store.bullets().len());
    for bullet in world.store.bullets() {
        match stage.position(bullet.handle) {
            Ok(pos) => bullets.push((bullet.id, pos)),
            Err(err) => {
                tracing::debug!(%err, id = ?bullet.id, "dropping bullet with stale sprite");
                spent.mark(bullet.id);
                report.stale += 1;
            }
        }
    }

    let attack = world.player.attack;
    for enemy in world.store.enemies_mut() {
        let enemy_pos = match stage.position(enemy.handle) {
            Ok(pos) => pos,
            Err(err) => {
                tracing::debug!(%err, id = ?enemy.id, "dropping enemy with stale sprite");
                dead.mark(enemy.id);
                report.stale += 1;
                continue;
            }
        };

        let hit = bullets
            .iter()
            .find(|(id, pos)| !spent.contains(*id) && overlaps(*pos, enemy_pos, rules.hit_threshold));
        let Some(&(bullet_id, _)) = hit else {
            continue;
        };

        spent.mark(bullet_id);
        report.hits += 1;
        enemy.hp -= attack;
        if enemy.hp <= 0 {
            dead.mark(enemy.id);
            report.kills += 1;
            report.score_gained += score_for(enemy.kind, rules);
        }
    }

    world.store.sweep_bullets(&spent, stage);
    world.store.sweep_enemies(&dead, stage);
    world.score += report.score_gained;
    report
}
