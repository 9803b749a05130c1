/// Rounds needed to win
pub const TOTAL_ROUNDS: u32 = 10;

/// Rounds per level step
const ROUNDS_PER_LEVEL: u32 = 3;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Complete,
}

/// What happened when a round was scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// round recorded, another one follows
    NextRound,
    /// the final round was recorded
    Completed,
    /// not running, nothing recorded
    Ignored,
}

pub fn level_for(round: u32) -> u32 {
    1 + round / ROUNDS_PER_LEVEL
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub started: bool,
    pub round: u32,
    pub target_text: String,
}

impl Session {
    pub fn phase(&self) -> Phase {
        if !self.started {
            Phase::Idle
        } else if self.round >= TOTAL_ROUNDS {
            Phase::Complete
        } else {
            Phase::Running
        }
    }

    pub fn level(&self) -> u32 {
        level_for(self.round)
    }

    /// Fraction of the progress bar to fill, 0.0..=1.0
    pub fn progress(&self) -> f64 {
        self.round.min(TOTAL_ROUNDS) as f64 / TOTAL_ROUNDS as f64
    }

    pub fn start(&mut self, target_text: String) {
        self.started = true;
        self.target_text = target_text;
    }

    pub fn set_target(&mut self, target_text: String) {
        self.target_text = target_text;
    }

    /// Record a correct answer. Only counts while running, so the round
    /// counter stops at the total and completion is reported once.
    pub fn record_success(&mut self) -> Advance {
        if self.phase() != Phase::Running {
            return Advance::Ignored;
        }

        self.round += 1;
        if self.round >= TOTAL_ROUNDS {
            Advance::Completed
        } else {
            Advance::NextRound
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> Session {
        let mut s = Session::default();
        s.start("abcde fghij klmno".to_string());
        s
    }

    #[test]
    fn test_level_examples() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(2), 1);
        assert_eq!(level_for(3), 2);
        assert_eq!(level_for(9), 4);
        assert_eq!(level_for(10), 4);
    }

    #[test]
    fn test_default_is_idle() {
        let s = Session::default();
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.round, 0);
        assert_eq!(s.level(), 1);
        assert!(s.target_text.is_empty());
        assert_eq!(s.progress(), 0.0);
    }

    #[test]
    fn test_start_runs_with_target() {
        let s = running();
        assert_eq!(s.phase(), Phase::Running);
        assert!(!s.target_text.is_empty());
    }

    #[test]
    fn test_success_advances_until_complete_once() {
        let mut s = running();
        for expected in 1..TOTAL_ROUNDS {
            assert_eq!(s.record_success(), Advance::NextRound);
            assert_eq!(s.round, expected);
        }
        assert_eq!(s.record_success(), Advance::Completed);
        assert_eq!(s.phase(), Phase::Complete);
        assert_eq!(s.progress(), 1.0);

        assert_eq!(s.record_success(), Advance::Ignored);
        assert_eq!(s.round, TOTAL_ROUNDS);
    }

    #[test]
    fn test_idle_success_is_ignored() {
        let mut s = Session::default();
        assert_eq!(s.record_success(), Advance::Ignored);
        assert_eq!(s.round, 0);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = running();
        s.record_success();
        s.record_success();
        s.reset();
        assert_eq!(s, Session::default());
        assert_eq!(s.round, 0);
        assert!(s.target_text.is_empty());
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn test_progress_is_proportional() {
        let mut s = running();
        for _ in 0..4 {
            s.record_success();
        }
        assert!((s.progress() - 0.4).abs() < 1e-9);
        assert_eq!(s.level(), 2);
    }
}
