/// One-shot deferred events, polled at the start of every tick.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// Leave the game-over screen for the start screen.
    ReturnToIdle,
}

#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    /// Sorted by due time; ties keep scheduling order.
    entries: Vec<(f64, TimerEvent)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        TimerQueue::default()
    }

    pub fn schedule(&mut self, due: f64, event: TimerEvent) {
        let at = self.entries.partition_point(|(t, _)| *t <= due);
        self.entries.insert(at, (due, event));
    }

    /// Removes and returns every event due at or before `now`.
    pub fn drain_due(&mut self, now: f64) -> Vec<TimerEvent> {
        let due = self.entries.partition_point(|(t, _)| *t <= now);
        self.entries.drain(..due).map(|(_, e)| e).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
