//! Session State Machine.
//!
//! `Idle` (start screen) → `Running` → `GameOver` → back to `Idle` after a
//! short delay. The session is the explicit context threaded through every
//! update: it owns the rules, the running [`World`], the high score and the
//! timer queue. Only `Running` executes the per-tick pipeline.

use rand::Rng;

use crate::compute::{self, Stats, TickReport, World};
use crate::config::Rules;
use crate::entities::{InputState, Phase};
use crate::stage::{Host, TextField};
use crate::timer::{TimerEvent, TimerQueue};

pub const TITLE: &str = "Shooting";
pub const CONTROLS_HINT: &str = "← → / A D : Move   SPACE : Shoot";
pub const GAME_OVER_BANNER: &str = "GAME OVER";

/// What the host loop should do after an update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

#[derive(Debug)]
pub struct Session {
    rules: Rules,
    phase: Phase,
    world: Option<World>,
    high_score: u32,
    timers: TimerQueue,
    /// Stats currently on the HUD, to only rewrite text when it changes.
    shown: Option<Stats>,
}

impl Session {
    /// Creates the session and draws the start screen.
    pub fn open(rules: Rules, host: &mut impl Host) -> Self {
        let session = Session {
            rules,
            phase: Phase::Idle,
            world: None,
            high_score: 0,
            timers: TimerQueue::new(),
            shown: None,
        };
        session.show_start_screen(host);
        session
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // ── Per-tick entry point ─────────────────────────────────────────────────

    /// Handles one tick of the host loop.
    ///
    /// Due timers fire first. In `Idle`, confirm starts a run and cancel
    /// exits; in `Running`, cancel exits and everything else drives the game;
    /// in `GameOver`, input is ignored.
    pub fn update(
        &mut self,
        host: &mut impl Host,
        input: &InputState,
        now: f64,
        rng: &mut impl Rng,
    ) -> Control {
        for event in self.timers.drain_due(now) {
            tracing::debug!(?event, now, "timer fired");
            match event {
                TimerEvent::ReturnToIdle => self.return_to_idle(host),
            }
        }

        match self.phase {
            Phase::Idle => {
                if input.cancel {
                    return Control::Exit;
                }
                if input.confirm {
                    self.start(host, now, rng);
                }
            }
            Phase::Running => {
                if input.cancel {
                    return Control::Exit;
                }
                self.step(host, input, now, rng);
            }
            Phase::GameOver => {}
        }
        Control::Continue
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// `Idle → Running`: fresh player and counters, then wave 1.
    /// Ignored in any other phase.
    pub fn start(&mut self, host: &mut impl Host, now: f64, rng: &mut impl Rng) {
        if self.phase != Phase::Idle {
            tracing::warn!(phase = ?self.phase, "start requested outside the start screen");
            return;
        }
        host.clear();
        host.clear_text();
        host.show_menu_buttons(false);

        let mut world = World::new(host, &self.rules, now);
        compute::wave::populate(&mut world, host, &self.rules, rng, now);
        self.world = Some(world);
        self.phase = Phase::Running;
        self.shown = None;
        self.refresh_hud(host);
        tracing::info!(high_score = self.high_score, "session started");
    }

    /// Runs the pipeline once; `None` outside `Running`.
    pub fn step(
        &mut self,
        host: &mut impl Host,
        input: &InputState,
        now: f64,
        rng: &mut impl Rng,
    ) -> Option<TickReport> {
        if self.phase != Phase::Running {
            return None;
        }
        let world = self.world.as_mut()?;
        let report = compute::tick(world, host, input, now, &self.rules, rng);
        if report.stale > 0 {
            tracing::debug!(stale = report.stale, "dropped entities with stale sprites");
        }
        self.refresh_hud(host);
        if report.player_down {
            self.game_over(host, now);
        }
        Some(report)
    }

    /// `Running → GameOver`: freeze the score, keep the best one and schedule
    /// the return to the start screen.
    fn game_over(&mut self, host: &mut impl Host, now: f64) {
        let score = self.world.as_ref().map_or(0, |w| w.score);
        self.high_score = self.high_score.max(score);
        self.phase = Phase::GameOver;
        host.set_text(TextField::Banner, GAME_OVER_BANNER);
        self.timers
            .schedule(now + self.rules.game_over_delay, TimerEvent::ReturnToIdle);
        tracing::info!(score, high_score = self.high_score, "game over");
    }

    /// `GameOver → Idle`.
    fn return_to_idle(&mut self, host: &mut impl Host) {
        if let Some(world) = self.world.take() {
            world.teardown(host);
        }
        self.phase = Phase::Idle;
        self.shown = None;
        self.show_start_screen(host);
    }

    // ── HUD ──────────────────────────────────────────────────────────────────

    fn show_start_screen(&self, host: &mut impl Host) {
        host.clear();
        host.clear_text();
        host.set_text(TextField::Title, TITLE);
        if self.high_score > 0 {
            host.set_text(TextField::HighScore, &format!("High score: {}", self.high_score));
        }
        host.set_text(TextField::Controls, CONTROLS_HINT);
        host.show_menu_buttons(true);
    }

    fn refresh_hud(&mut self, host: &mut impl Host) {
        let Some(world) = self.world.as_ref() else {
            return;
        };
        let stats = world.stats();
        if self.shown == Some(stats) {
            return;
        }
        host.set_text(TextField::Hp, &format!("HP : {}", stats.hp.max(0)));
        host.set_text(TextField::Score, &format!("Score : {}", stats.score));
        host.set_text(TextField::Wave, &format!("Wave : {}", stats.wave));
        self.shown = Some(stats);
    }
}
