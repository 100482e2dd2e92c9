//! Reschedule scheduler for the next crawl pass
//!
//! This module handles:
//! - Computing the delay to the next pass with a business-hours heuristic
//! - Arming exactly one pending pass at a time on a tokio timer
//!
//! All wall-clock values are in the local time zone of the host.

use crate::state::ScheduleState;
use chrono::{Datelike, Duration, Local, Timelike};
use std::future::Future;
use std::ops::Add;
use std::sync::Arc;

/// `number_from_sunday()` of Saturday
const SATURDAY: u32 = 7;

/// `number_from_sunday()` of Sunday
const SUNDAY: u32 = 1;

/// Computes the delay until the next pass
///
/// # Rules
///
/// | Condition            | Adds                      |
/// |----------------------|---------------------------|
/// | always               | `15 - minute` minutes     |
/// | `8 < hour < 18`      | 1 hour                    |
/// | otherwise            | `9 + 24 - hour` hours     |
/// | Saturday             | 2 days                    |
/// | Sunday               | 1 day                     |
///
/// The quarter-hour term may be negative. The hour window excludes both 8
/// and 18. The terms are summed as-is, so a Saturday evening lands on
/// Tuesday morning rather than Monday.
///
/// # Example
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use lecture_crawler::crawler::compute_next_delay;
///
/// // Wednesday 10:30
/// let now = NaiveDate::from_ymd_opt(2018, 12, 12).unwrap().and_hms_opt(10, 30, 0).unwrap();
/// assert_eq!(compute_next_delay(&now), Duration::minutes(45));
/// ```
pub fn compute_next_delay<T: Datelike + Timelike>(now: &T) -> Duration {
    let minute = i64::from(now.minute());
    let hour = i64::from(now.hour());

    let mut delay = Duration::minutes(15 - minute);

    if hour < 18 && hour > 8 {
        delay = delay + Duration::hours(1);
    } else {
        delay = delay + Duration::hours(9 + 24 - hour);
    }

    match now.weekday().number_from_sunday() {
        SATURDAY => delay + Duration::days(2),
        SUNDAY => delay + Duration::days(1),
        _ => delay,
    }
}

/// Wall-clock time of the next pass when computed at `now`
pub fn next_fire_time<T>(now: T) -> T
where
    T: Datelike + Timelike + Add<Duration, Output = T>,
{
    let delay = compute_next_delay(&now);
    now + delay
}

/// Arms future passes, at most one at a time
#[derive(Debug, Clone, Default)]
pub struct RescheduleScheduler {
    state: Arc<ScheduleState>,
}

impl RescheduleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheduler sharing an existing schedule state
    pub fn with_state(state: Arc<ScheduleState>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Arc<ScheduleState> {
        &self.state
    }

    /// Returns true if a pass is armed and has not fired yet
    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    /// Arms `action` to run after `delay`
    ///
    /// Returns `false` and drops `action` if a run is already armed. When the
    /// timer fires, the armed flag is cleared before `action` starts, so the
    /// action may arm its successor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm_next_run<F, Fut>(&self, delay: Duration, action: F) -> bool
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let fire_at = Local::now() + delay;
        if !self.state.try_arm(fire_at) {
            tracing::debug!(
                "Run already armed for {:?}; ignoring arm request",
                self.state.armed_until()
            );
            return false;
        }

        let sleep = delay.to_std().unwrap_or(std::time::Duration::ZERO);
        tracing::info!("Next pass armed for {} (in {:?})", fire_at.format("%Y-%m-%d %H:%M:%S"), sleep);

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep(sleep).await;
            state.clear_armed();
            action().await;
        });

        true
    }
}
