//! Entity Store: the live bullets and enemies.
//!
//! Scans never remove entities while iterating. They record ids in a
//! [`Marks`] set and the store compacts once the scan is finished, deleting
//! the matching sprites from the stage in the same pass.

use std::collections::HashSet;

use crate::entities::{Bullet, Enemy, EnemyKind, EntityId, Position};
use crate::stage::{Sprite, SpriteKind, Stage};

/// Ids scheduled for removal at the end of a scan.
#[derive(Debug, Default)]
pub struct Marks {
    ids: HashSet<EntityId>,
}

impl Marks {
    pub fn new() -> Self {
        Marks::default()
    }

    /// Returns `false` if the id was already marked.
    pub fn mark(&mut self, id: EntityId) -> bool {
        self.ids.insert(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

#[derive(Debug, Default)]
pub struct EntityStore {
    bullets: Vec<Bullet>,
    enemies: Vec<Enemy>,
    next_id: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        EntityStore::default()
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    // ── Access ───────────────────────────────────────────────────────────────

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets_mut(&mut self) -> &mut [Bullet] {
        &mut self.bullets
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    // ── Spawning ─────────────────────────────────────────────────────────────

    pub fn spawn_bullet(&mut self, stage: &mut impl Stage, at: Position) -> EntityId {
        let id = self.allocate_id();
        let handle = stage.create(at, Sprite::first(SpriteKind::Bullet));
        self.bullets.push(Bullet { id, handle, pos: at });
        id
    }

    /// Returns `None` when the stage has no frames for this kind.
    pub fn spawn_enemy(
        &mut self,
        stage: &mut impl Stage,
        kind: EnemyKind,
        at: Position,
        hp: i32,
        now: f64,
    ) -> Option<EntityId> {
        let sheet = SpriteKind::Enemy(kind);
        if stage.frame_count(sheet) == 0 {
            tracing::warn!(?kind, "no sprite frames for enemy, skipping spawn");
            return None;
        }
        debug_assert!(hp > 0, "enemy spawned with {hp} hp");
        let id = self.allocate_id();
        let handle = stage.create(at, Sprite::first(sheet));
        self.enemies.push(Enemy {
            id,
            handle,
            kind,
            pos: at,
            hp: hp.max(1),
            frame: 0,
            last_frame_at: now,
        });
        Some(id)
    }

    // ── Compaction ───────────────────────────────────────────────────────────

    /// Drops every marked bullet; returns how many were removed.
    pub fn sweep_bullets(&mut self, marks: &Marks, stage: &mut impl Stage) -> usize {
        if marks.is_empty() {
            return 0;
        }
        let before = self.bullets.len();
        self.bullets.retain(|b| {
            if marks.contains(b.id) {
                stage.delete(b.handle);
                false
            } else {
                true
            }
        });
        before - self.bullets.len()
    }

    /// Drops every marked enemy; returns how many were removed.
    pub fn sweep_enemies(&mut self, marks: &Marks, stage: &mut impl Stage) -> usize {
        let before = self.enemies.len();
        self.enemies.retain_mut(|e| {
            if marks.contains(e.id) {
                stage.delete(e.handle);
                return false;
            }
            debug_assert!(e.hp > 0, "enemy {:?} kept with {} hp", e.id, e.hp);
            e.hp = e.hp.max(1);
            true
        });
        before - self.enemies.len()
    }

    pub fn clear(&mut self, stage: &mut impl Stage) {
        for b in self.bullets.drain(..) {
            stage.delete(b.handle);
        }
        for e in self.enemies.drain(..) {
            stage.delete(e.handle);
        }
    }
}
