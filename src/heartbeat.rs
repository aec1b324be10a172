//! 1 Hz heartbeat scheduling

use std::time::Instant;

/// Tracks the next whole-second publication boundary.
///
/// A late tick catches up one boundary at a time, so a stalled loop emits
/// one heartbeat per elapsed second rather than silently skipping them.
pub struct HeartbeatClock {
    started: Instant,
    next_due_secs: u64,
}

impl HeartbeatClock {
    pub fn new(now: Instant) -> Self {
        Self {
            started: now,
            next_due_secs: 0,
        }
    }

    /// Returns the current uptime in whole seconds when a heartbeat is due,
    /// advancing the boundary by exactly one second.
    pub fn due(&mut self, now: Instant) -> Option<u32> {
        let elapsed_secs = now.duration_since(self.started).as_secs();
        if self.next_due_secs < elapsed_secs {
            self.next_due_secs += 1;
            Some(elapsed_secs.min(u32::MAX as u64) as u32)
        } else {
            None
        }
    }
}
