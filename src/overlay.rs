use std::time::{Duration, Instant};

/// Text banner whose visibility is only its opacity.
#[derive(Clone, Debug)]
pub(crate) struct MessageOverlay {
    pub(crate) text: String,
    opacity: f32,
}

impl MessageOverlay {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            opacity: 0.0,
        }
    }

    pub(crate) fn show(&mut self) {
        self.opacity = 1.0;
    }

    pub(crate) fn hide(&mut self) {
        self.opacity = 0.0;
    }

    pub(crate) fn opacity(&self) -> f32 {
        self.opacity
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// "Run this after N milliseconds". Entries cannot be cancelled.
#[derive(Debug)]
pub(crate) struct DelayQueue<T> {
    pending: Vec<(Instant, u64, T)>,
    seq: u64,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            seq: 0,
        }
    }
}

impl<T> DelayQueue<T> {
    pub(crate) fn schedule(&mut self, now: Instant, delay: Duration, action: T) {
        self.pending.push((now + delay, self.seq, action));
        self.seq += 1;
    }

    /// Remove and return every action due at `now`, earliest first;
    /// ties keep scheduling order.
    pub(crate) fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].0 <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|(at, seq, _)| (*at, *seq));
        due.into_iter().map(|(_, _, action)| action).collect()
    }
}
