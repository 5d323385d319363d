//! A time budget for loops that must not run away.

use std::time::{Duration, Instant};

/// Default reconciliation budget.
pub const DEFAULT_BUDGET: Duration = Duration::from_millis(500);

/// Tracks elapsed time against a budget.
///
/// Once [`Watchdog::expired`] has returned true it keeps returning true.
#[derive(Debug, Clone)]
pub struct Watchdog {
    started: Instant,
    budget: Duration,
    fired: bool,
}

impl Watchdog {
    /// Starts the clock.
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
            fired: false,
        }
    }

    /// Returns true once the budget is used up.
    pub fn expired(&mut self) -> bool {
        if !self.fired && self.started.elapsed() >= self.budget {
            self.fired = true;
        }
        self.fired
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Whether the budget was found expired by an earlier check.
    pub fn fired(&self) -> bool {
        self.fired
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::start(DEFAULT_BUDGET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_budget_expires_immediately() {
        let mut watchdog = Watchdog::start(Duration::ZERO);
        assert!(!watchdog.fired());
        assert!(watchdog.expired());
        assert!(watchdog.fired());
    }

    #[test]
    fn test_generous_budget_does_not_expire() {
        let mut watchdog = Watchdog::start(Duration::from_secs(3600));
        assert!(!watchdog.expired());
        assert!(!watchdog.fired());
    }

    #[test]
    fn test_expiry_sticks() {
        let mut watchdog = Watchdog::start(Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(watchdog.expired());
        assert!(watchdog.expired());
        assert!(watchdog.elapsed() >= watchdog.budget());
    }
}
