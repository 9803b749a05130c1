use std::time::{Duration, Instant};

/// Work to run once its delay has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// present the next round after a correct answer
    NewRound,
    /// empty the input after an incorrect answer
    ClearInput,
    /// put the prompt back on the status line
    RevertStatus,
    /// release highlighted key caps when the terminal sends no key-up
    ReleaseKeys,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: Instant,
    action: Deferred,
}

/// Pending deferred actions, fired from the tick loop
#[derive(Debug, Default)]
pub struct Timers {
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, action: Deferred) {
        self.pending.push(Pending {
            due: now + delay,
            action,
        });
    }

    /// Schedule `action`, dropping any earlier pending one of the same kind
    pub fn replace(&mut self, now: Instant, delay: Duration, action: Deferred) {
        self.cancel(action);
        self.schedule(now, delay, action);
    }

    pub fn cancel(&mut self, action: Deferred) {
        self.pending.retain(|p| p.action != action);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, action: Deferred) -> bool {
        self.pending.iter().any(|p| p.action == action)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return the actions due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<Deferred> {
        let (mut due, rest): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| p.due);
        due.into_iter().map(|p| p.action).collect()
    }
}
