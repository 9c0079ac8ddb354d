//! Fixed-rate tick source, decoupled from how often the host renders.
//!
//! Time is measured against a fixed grid of deadlines (`k * period`). When
//! the host falls behind, surplus deadlines are dropped rather than run in a
//! burst, and the leftover fraction of a period is kept so later ticks stay
//! on the same grid.

use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use swarm_core::config::tick_period;
use swarm_core::{SwarmConfig, SwarmError};

/// Outcome of advancing the scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickBudget {
    /// Ticks that should run now (or did run, for `run_for`).
    pub run: u64,
    /// Due ticks skipped because the host fell behind.
    pub dropped: u64,
}

impl TickBudget {
    fn merge(&mut self, other: TickBudget) {
        self.run = self.run.saturating_add(other.run);
        self.dropped = self.dropped.saturating_add(other.dropped);
    }
}

/// Fixed-rate tick scheduler.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    period: Duration,
    max_catch_up: u64,
    pending: Duration,
    totals: TickBudget,
}

impl FrameScheduler {
    /// Creates a scheduler ticking `tick_hz` times per second. The period is
    /// `1 / tick_hz` rounded to the nearest nanosecond.
    ///
    /// `max_catch_up` caps how many due ticks a single `advance` may return;
    /// it is raised to 1 if given as 0.
    pub fn new(tick_hz: f64, max_catch_up: u32) -> Result<Self, SwarmError> {
        let period = tick_period(tick_hz)?;
        Ok(Self {
            period,
            max_catch_up: u64::from(max_catch_up.max(1)),
            pending: Duration::ZERO,
            totals: TickBudget::default(),
        })
    }

    pub fn from_config(config: &SwarmConfig) -> Result<Self, SwarmError> {
        Self::new(config.tick_hz, config.max_catch_up)
    }

    /// Interval between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time accumulated toward the next tick.
    pub fn pending(&self) -> Duration {
        self.pending
    }

    /// Running totals across every `advance` and `run_for` call.
    pub fn totals(&self) -> TickBudget {
        self.totals
    }

    /// Accounts for `elapsed` wall time and reports how many ticks to run.
    pub fn advance(&mut self, elapsed: Duration) -> TickBudget {
        self.pending = self.pending.saturating_add(elapsed);
        let period_ns = self.period.as_nanos();
        let due = u64::try_from(self.pending.as_nanos() / period_ns).unwrap_or(u64::MAX);
        self.pending = nanos(self.pending.as_nanos() % period_ns);

        let run = due.min(self.max_catch_up);
        let budget = TickBudget {
            run,
            dropped: due - run,
        };
        if budget.dropped > 0 {
            debug!("dropped {} ticks after a {:?} gap", budget.dropped, elapsed);
        }
        self.totals.merge(budget);
        budget
    }

    /// Runs `on_tick` on the deadline grid until `duration` has passed.
    ///
    /// Blocks the calling thread, sleeping until each deadline. A deadline
    /// that has already passed when the previous tick returns is run right
    /// away; any further deadlines it overran are dropped. Ticks run one at
    /// a time in deadline order. `on_tick` receives the deadline index.
    pub fn run_for<F: FnMut(u64)>(&mut self, duration: Duration, mut on_tick: F) -> TickBudget {
        let start = Instant::now();
        let period_ns = self.period.as_nanos();
        let last = (duration.as_nanos() / period_ns) as u64;
        let mut budget = TickBudget::default();
        let mut k = 1u64;

        while k <= last {
            let deadline = start + nanos(period_ns * u128::from(k));
            let now = Instant::now();
            if now < deadline {
                thread::sleep(deadline - now);
            } else {
                let overrun = ((now - deadline).as_nanos() / period_ns) as u64;
                let skip = overrun.min(last - k);
                budget.dropped += skip;
                k += skip;
            }
            on_tick(k);
            budget.run += 1;
            k += 1;
        }

        if budget.dropped > 0 {
            debug!(
                "realtime run: {} ticks, {} dropped over {:?}",
                budget.run, budget.dropped, duration
            );
        }
        self.totals.merge(budget);
        budget
    }
}

fn nanos(n: u128) -> Duration {
    Duration::new((n / 1_000_000_000) as u64, (n % 1_000_000_000) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hz120() -> FrameScheduler {
        FrameScheduler::new(120.0, 1).unwrap()
    }

    #[test]
    fn period_at_120_hz() {
        let s = hz120();
        assert_eq!(s.period(), Duration::from_nanos(8_333_333));
    }

    #[test]
    fn rejects_bad_rates() {
        assert!(FrameScheduler::new(0.0, 1).is_err());
        assert!(FrameScheduler::new(-1.0, 1).is_err());
        assert!(FrameScheduler::new(f64::NAN, 1).is_err());
        assert!(FrameScheduler::new(1e12, 1).is_err());
    }

    #[test]
    fn tiny_rate_is_an_error_not_a_panic() {
        assert!(matches!(
            FrameScheduler::new(1e-300, 1),
            Err(SwarmError::InvalidConfig(_))
        ));
        let config = SwarmConfig {
            tick_hz: 1e-300,
            ..SwarmConfig::default()
        };
        assert!(FrameScheduler::from_config(&config).is_err());
    }

    #[test]
    fn huge_elapsed_saturates_instead_of_overflowing() {
        let mut s = hz120();
        s.advance(Duration::from_millis(5));
        let b = s.advance(Duration::MAX);
        assert_eq!(b.run, 1);
        assert!(s.pending() < s.period());
        s.advance(Duration::MAX);
        assert_eq!(s.totals().run, 2);
    }

    #[test]
    fn from_config_uses_rate_and_catch_up() {
        let config = SwarmConfig {
            tick_hz: 60.0,
            max_catch_up: 3,
            ..SwarmConfig::default()
        };
        let mut s = FrameScheduler::from_config(&config).unwrap();
        assert_eq!(s.period(), Duration::from_secs_f64(1.0 / 60.0));
        assert_eq!(s.period(), Duration::from_nanos(16_666_667));
        assert_eq!(s.advance(Duration::from_millis(100)).run, 3);
    }

    #[test]
    fn short_elapsed_accumulates_until_a_tick_is_due() {
        let mut s = hz120();
        assert_eq!(s.advance(Duration::from_millis(5)), TickBudget::default());
        let b = s.advance(Duration::from_millis(5));
        assert_eq!(b, TickBudget { run: 1, dropped: 0 });
        // 10ms - 8.333333ms carried over.
        assert_eq!(s.pending(), Duration::from_nanos(1_666_667));
    }

    #[test]
    fn exactly_one_period_runs_one_tick() {
        let mut s = hz120();
        let b = s.advance(s.period());
        assert_eq!(b, TickBudget { run: 1, dropped: 0 });
        assert_eq!(s.pending(), Duration::ZERO);
    }

    #[test]
    fn long_stall_drops_surplus_ticks() {
        let mut s = hz120();
        let b = s.advance(Duration::from_millis(100));
        // 100ms holds 12 whole periods; one runs, the rest are dropped.
        assert_eq!(b, TickBudget { run: 1, dropped: 11 });
    }

    #[test]
    fn phase_is_kept_after_a_stall() {
        let mut s = hz120();
        s.advance(Duration::from_millis(100));
        let remainder = s.pending();
        assert!(remainder < s.period());
        // Exactly one more tick once the grid catches up.
        let b = s.advance(s.period() - remainder);
        assert_eq!(b.run, 1);
        assert_eq!(s.pending(), Duration::ZERO);
    }

    #[test]
    fn zero_catch_up_is_raised_to_one() {
        let mut s = FrameScheduler::new(120.0, 0).unwrap();
        assert_eq!(s.advance(Duration::from_millis(50)).run, 1);
    }

    #[test]
    fn totals_accumulate() {
        let mut s = hz120();
        s.advance(Duration::from_millis(100));
        s.advance(Duration::from_millis(10));
        assert_eq!(s.totals(), TickBudget { run: 2, dropped: 11 });
    }

    #[test]
    fn run_for_visits_every_deadline_in_order() {
        let mut s = hz120();
        let mut seen = Vec::new();
        let b = s.run_for(Duration::from_millis(50), |k| seen.push(k));
        // 50ms holds six deadlines; each is either run or dropped.
        assert_eq!(b.run + b.dropped, 6);
        assert!(b.run >= 1);
        assert_eq!(seen.len() as u64, b.run);
        assert!(seen.windows(2).all(|w| w[0] < w[1]), "out of order: {seen:?}");
        assert_eq!(seen.last(), Some(&6));
    }

    #[test]
    fn run_for_drops_ticks_when_callback_overruns() {
        let mut s = hz120();
        let b = s.run_for(Duration::from_millis(60), |k| {
            if k == 1 {
                thread::sleep(Duration::from_millis(30));
            }
        });
        assert!(b.dropped >= 2, "expected drops, got {b:?}");
        assert_eq!(b.run + b.dropped, 7);
    }

    #[test]
    fn run_for_shorter_than_a_period_does_nothing() {
        let mut s = hz120();
        let b = s.run_for(Duration::from_millis(1), |_| panic!("no tick expected"));
        assert_eq!(b, TickBudget::default());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_due_tick_is_run_or_dropped(
                steps in prop::collection::vec(0u64..50_000_000, 1..40),
                catch_up in 1u32..5,
            ) {
                let mut s = FrameScheduler::new(120.0, catch_up).unwrap();
                let period_ns = s.period().as_nanos() as u64;
                for &ns in &steps {
                    let b = s.advance(Duration::from_nanos(ns));
                    prop_assert!(b.run <= u64::from(catch_up));
                    prop_assert!(s.pending() < s.period());
                }
                let total: u64 = steps.iter().sum();
                let t = s.totals();
                prop_assert_eq!(t.run + t.dropped, total / period_ns);
                prop_assert_eq!(s.pending(), Duration::from_nanos(total % period_ns));
            }
        }
    }
}
