//! Phase timeline: an ordered list of (deadline, action) entries.
//!
//! The timeline is armed once per playback and polled from the frame tick:
//! an explicit single-threaded scheduler instead of free-floating timers.
//! Each entry fires at most once, in deadline order. [`Timeline::clear`]
//! drops everything pending, so nothing can fire after a cancel.
//!
//! The default schedule drives the full reveal sequence:
//!
//! | Deadline | Action |
//! |----------|--------|
//! | 0.9s | [`Action::Scatter`]: hide the source, burst into particles |
//! | 2.2s | [`Action::Gather`]: steer particles onto the glyph targets |
//! | 5.0s | [`Action::Finalize`]: force the reveal if convergence never did |
//! | 5.6s | [`Action::Settle`]: start restoring the backdrop |
//! | 6.2s | [`Action::Secondary`]: fade in secondary content |
//!
//! [`Action::Finalize`] is the liveness guarantee: it completes the reveal
//! unconditionally, independent of the physics heuristic.

/// A scheduled phase transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Spawn the scatter burst and start hiding the source display.
    Scatter,
    /// Re-query targets and steer particles toward them.
    Gather,
    /// Force the fully revealed state regardless of convergence.
    Finalize,
    /// Begin restoring the backdrop.
    Settle,
    /// Fade in the secondary content.
    Secondary,
    /// Drop any residual particles. Scheduled dynamically after a
    /// convergence-triggered reveal.
    Purge,
}

#[derive(Clone, Debug)]
struct Entry {
    deadline: f32,
    action: Action,
}

/// Ordered pending phase transitions for one playback.
#[derive(Clone, Debug)]
pub struct Timeline {
    entries: Vec<Entry>,
}

impl Timeline {
    /// An empty timeline. Build a schedule with [`Timeline::at`].
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// The standard reveal schedule (see module docs).
    pub fn standard() -> Self {
        Self::new()
            .at(0.9, Action::Scatter)
            .at(2.2, Action::Gather)
            .at(5.0, Action::Finalize)
            .at(5.6, Action::Settle)
            .at(6.2, Action::Secondary)
    }

    /// Add an entry firing `deadline` seconds into the playback.
    pub fn at(mut self, deadline: f32, action: Action) -> Self {
        self.push(deadline, action);
        self
    }

    /// Insert an entry, keeping the list sorted by deadline.
    pub fn push(&mut self, deadline: f32, action: Action) {
        let idx = self
            .entries
            .iter()
            .position(|e| e.deadline > deadline)
            .unwrap_or(self.entries.len());
        self.entries.insert(idx, Entry { deadline, action });
    }

    /// Remove and return every entry due at `elapsed`, in deadline order.
    pub fn take_due(&mut self, elapsed: f32) -> Vec<Action> {
        let mut due = Vec::new();
        while let Some(first) = self.entries.first() {
            if first.deadline <= elapsed {
                due.push(self.entries.remove(0).action);
            } else {
                break;
            }
        }
        due
    }

    /// Drop every pending entry. Nothing fires afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries still pending.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Deadline of the first pending entry for `action`, if any.
    pub fn deadline_of(&self, action: Action) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.action == action)
            .map(|e| e.deadline)
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_fire_in_deadline_order() {
        let mut tl = Timeline::new()
            .at(2.0, Action::Gather)
            .at(1.0, Action::Scatter)
            .at(3.0, Action::Finalize);
        assert_eq!(tl.take_due(2.5), vec![Action::Scatter, Action::Gather]);
        assert_eq!(tl.take_due(2.5), Vec::<Action>::new());
        assert_eq!(tl.take_due(3.0), vec![Action::Finalize]);
        assert_eq!(tl.pending(), 0);
    }

    #[test]
    fn test_entry_fires_at_most_once() {
        let mut tl = Timeline::new().at(1.0, Action::Scatter);
        assert_eq!(tl.take_due(1.0).len(), 1);
        for _ in 0..10 {
            assert!(tl.take_due(100.0).is_empty());
        }
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut tl = Timeline::standard();
        assert!(tl.pending() > 0);
        tl.clear();
        assert_eq!(tl.pending(), 0);
        assert!(tl.take_due(100.0).is_empty());
    }

    #[test]
    fn test_dynamic_push_after_partial_fire() {
        let mut tl = Timeline::new().at(1.0, Action::Scatter).at(5.0, Action::Finalize);
        assert_eq!(tl.take_due(1.5), vec![Action::Scatter]);
        tl.push(2.0, Action::Purge);
        assert_eq!(tl.take_due(2.5), vec![Action::Purge]);
        assert_eq!(tl.deadline_of(Action::Finalize), Some(5.0));
    }

    #[test]
    fn test_standard_schedule_shape() {
        let tl = Timeline::standard();
        let scatter = tl.deadline_of(Action::Scatter).unwrap();
        let gather = tl.deadline_of(Action::Gather).unwrap();
        let finalize = tl.deadline_of(Action::Finalize).unwrap();
        assert!(scatter < gather && gather < finalize);
    }
}
