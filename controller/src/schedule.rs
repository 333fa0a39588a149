//! One-shot deferred actions keyed to simulation time.
//!
//! Entries are drained at the start of the tick whose timestamp has reached their due
//! time. Nothing here blocks or sleeps.

use crate::constants::TIME_EPS;

/// Actions the controller can defer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    /// Turn body gravity back on after a step-up grace period.
    EnableGravity,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Scheduled {
    due: f32,
    action: DeferredAction,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    entries: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Due time of the pending `action`, if any.
    pub fn due_time(&self, action: DeferredAction) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.action == action)
            .map(|e| e.due)
    }

    pub fn schedule(&mut self, due: f32, action: DeferredAction) {
        self.entries.push(Scheduled { due, action });
    }

    /// Schedule `action`, replacing any pending entry for the same action.
    pub fn schedule_unique(&mut self, due: f32, action: DeferredAction) {
        self.entries.retain(|e| e.action != action);
        self.schedule(due, action);
    }

    /// Remove and return every action due at `now`, earliest first.
    pub fn drain_due(&mut self, now: f32) -> Vec<DeferredAction> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.entries.retain(|e| {
            if e.due <= now + TIME_EPS {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|e| e.action).collect()
    }

    pub fn cancel_all(&mut self) {
        if !self.entries.is_empty() {
            log::debug!("cancelling {} deferred action(s)", self.entries.len());
        }
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_fires_before_due_time() {
        let mut s = Scheduler::new();
        s.schedule(1.0, DeferredAction::EnableGravity);
        assert!(s.drain_due(0.5).is_empty());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn fires_once_at_due_time() {
        let mut s = Scheduler::new();
        s.schedule(1.0, DeferredAction::EnableGravity);
        assert_eq!(s.drain_due(1.0), vec![DeferredAction::EnableGravity]);
        assert!(s.drain_due(2.0).is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn accumulated_float_error_does_not_delay_firing() {
        let mut s = Scheduler::new();
        s.schedule(0.2, DeferredAction::EnableGravity);
        let now: f32 = (0..10).map(|_| 0.02_f32).sum();
        assert_eq!(s.drain_due(now).len(), 1);
    }

    #[test]
    fn schedule_unique_replaces_pending_entry() {
        let mut s = Scheduler::new();
        s.schedule_unique(1.0, DeferredAction::EnableGravity);
        s.schedule_unique(2.0, DeferredAction::EnableGravity);

        assert_eq!(s.len(), 1);
        assert_eq!(s.due_time(DeferredAction::EnableGravity), Some(2.0));
        assert!(s.drain_due(1.5).is_empty());
    }

    #[test]
    fn cancel_all_drops_everything() {
        let mut s = Scheduler::new();
        s.schedule(0.1, DeferredAction::EnableGravity);
        s.cancel_all();
        assert!(s.drain_due(10.0).is_empty());
    }
}
