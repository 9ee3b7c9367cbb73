//! Interval scheduler
//!
//! Owns every repeating interval and fires them as time advances.
//! Time is virtual: hosts either move it explicitly with `advance()` (tests,
//! scripted scenarios) or by real elapsed time with `tick()`.
//! Components receive a weak `SchedulerHandle` and never keep the scheduler
//! alive on their own.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::{Duration, Instant};

use carousel_core::{TimerAccess, TimerId};
use slotmap::{new_key_type, Key, SlotMap};

/// Shortest period an interval may have; shorter requests are raised to it
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

new_key_type! {
    /// Handle to a registered interval
    pub struct IntervalId;
}

impl IntervalId {
    /// Convert to raw u64 for type-erased storage
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Reconstruct from raw u64
    ///
    /// The raw value must have been created by `to_raw()`; anything else yields
    /// an id that simply matches no interval.
    pub fn from_raw(raw: u64) -> Self {
        IntervalId::from(slotmap::KeyData::from_ffi(raw))
    }
}

impl From<IntervalId> for TimerId {
    fn from(id: IntervalId) -> Self {
        TimerId::from_raw(id.to_raw())
    }
}

impl From<TimerId> for IntervalId {
    fn from(id: TimerId) -> Self {
        IntervalId::from_raw(id.to_raw())
    }
}

#[derive(Debug, Clone, Copy)]
struct Interval {
    period: Duration,
    next_due: Duration,
    fired: u64,
}

/// Internal state of the scheduler
struct SchedulerInner {
    intervals: SlotMap<IntervalId, Interval>,
    /// Virtual time elapsed since the scheduler was created
    now: Duration,
    /// Wall-clock instant of the last `tick()`
    last_tick: Instant,
}

impl SchedulerInner {
    fn insert(&mut self, period: Duration) -> IntervalId {
        let period = period.max(MIN_PERIOD);
        let next_due = self.now + period;
        self.intervals.insert(Interval {
            period,
            next_due,
            fired: 0,
        })
    }

    /// Earliest interval due at or before `deadline` (first registered wins ties)
    fn earliest_due(&self, deadline: Duration) -> Option<IntervalId> {
        self.intervals
            .iter()
            .filter(|(_, interval)| interval.next_due <= deadline)
            .min_by_key(|(_, interval)| interval.next_due)
            .map(|(id, _)| id)
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The scheduler that fires all registered intervals
///
/// Typically owned by the host's event loop and shared with widgets via
/// `SchedulerHandle`.
///
/// ```
/// use std::time::Duration;
/// use carousel_timer::TimerScheduler;
///
/// let scheduler = TimerScheduler::new();
/// let id = scheduler.set_interval(Duration::from_millis(100));
///
/// let fired = scheduler.advance(Duration::from_millis(250));
/// assert_eq!(fired, vec![id, id]);
/// ```
pub struct TimerScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl std::fmt::Debug for TimerScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("TimerScheduler")
            .field("now", &inner.now)
            .field("intervals", &inner.intervals.len())
            .finish()
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                intervals: SlotMap::with_key(),
                now: Duration::ZERO,
                last_tick: Instant::now(),
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        lock(&self.inner).now
    }

    /// Number of live intervals
    pub fn active_count(&self) -> usize {
        lock(&self.inner).intervals.len()
    }

    /// Time until the next interval fires, if any is live
    pub fn next_deadline(&self) -> Option<Duration> {
        let inner = lock(&self.inner);
        inner
            .intervals
            .values()
            .map(|interval| interval.next_due)
            .min()
            .map(|due| due.saturating_sub(inner.now))
    }

    /// How many times an interval has fired (None once cancelled)
    pub fn fired_count(&self, id: IntervalId) -> Option<u64> {
        lock(&self.inner).intervals.get(id).map(|interval| interval.fired)
    }

    // =========================================================================
    // Interval Registration
    // =========================================================================

    pub fn set_interval(&self, period: Duration) -> IntervalId {
        let id = lock(&self.inner).insert(period);
        tracing::trace!(?id, ?period, "interval registered");
        id
    }

    pub fn clear_interval(&self, id: IntervalId) -> bool {
        lock(&self.inner).intervals.remove(id).is_some()
    }

    pub fn is_active(&self, id: IntervalId) -> bool {
        lock(&self.inner).intervals.contains_key(id)
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Advance virtual time by `dt`, firing due intervals in chronological order
    ///
    /// `on_fire` runs without the scheduler lock held, so it may start or cancel
    /// intervals (including the one firing). Intervals started from a callback
    /// are scheduled relative to the firing time and can fire within the same
    /// advance. Returns the number of firings.
    pub fn advance_with<F>(&self, dt: Duration, mut on_fire: F) -> usize
    where
        F: FnMut(IntervalId),
    {
        let deadline = lock(&self.inner).now + dt;
        let mut fired = 0;

        loop {
            let due = {
                let mut inner = lock(&self.inner);
                let Some(id) = inner.earliest_due(deadline) else {
                    inner.now = deadline;
                    break;
                };
                let Some(interval) = inner.intervals.get_mut(id) else {
                    break;
                };
                let fire_time = interval.next_due;
                interval.next_due += interval.period;
                interval.fired += 1;
                inner.now = fire_time;
                id
            };

            on_fire(due);
            fired += 1;
        }

        fired
    }

    /// Advance virtual time by `dt` and return the fired intervals in order
    pub fn advance(&self, dt: Duration) -> Vec<IntervalId> {
        let mut fired = Vec::new();
        self.advance_with(dt, |id| fired.push(id));
        fired
    }

    /// Advance by the wall-clock time elapsed since the previous tick
    pub fn tick_with<F>(&self, on_fire: F) -> usize
    where
        F: FnMut(IntervalId),
    {
        let dt = {
            let mut inner = lock(&self.inner);
            let now = Instant::now();
            let dt = now - inner.last_tick;
            inner.last_tick = now;
            dt
        };
        self.advance_with(dt, on_fire)
    }

    /// Wall-clock tick returning the fired intervals
    pub fn tick(&self) -> Vec<IntervalId> {
        let mut fired = Vec::new();
        self.tick_with(|id| fired.push(id));
        fired
    }
}

/// A weak handle to the scheduler
///
/// Passed to components that need to register intervals. It won't prevent the
/// scheduler from being dropped; once it is, every request is refused.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl SchedulerHandle {
    /// Register an interval and return its ID
    pub fn register_interval(&self, period: Duration) -> Option<IntervalId> {
        self.inner.upgrade().map(|inner| lock(&inner).insert(period))
    }

    /// Cancel an interval
    pub fn cancel_interval(&self, id: IntervalId) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| lock(&inner).intervals.remove(id).is_some())
    }

    /// Check if an interval is still registered
    pub fn is_interval_active(&self, id: IntervalId) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| lock(&inner).intervals.contains_key(id))
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

/// Implement TimerAccess for SchedulerHandle
///
/// This lets widgets hold the handle as an opaque timer backend.
impl TimerAccess for SchedulerHandle {
    fn set_interval(&self, period: Duration) -> Option<TimerId> {
        self.register_interval(period).map(TimerId::from)
    }

    fn clear_interval(&self, id: TimerId) -> bool {
        self.cancel_interval(IntervalId::from(id))
    }

    fn is_active(&self, id: TimerId) -> bool {
        self.is_interval_active(IntervalId::from(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_interval_fires_each_period() {
        let scheduler = TimerScheduler::new();
        let id = scheduler.set_interval(ms(100));

        assert!(scheduler.advance(ms(99)).is_empty());
        assert_eq!(scheduler.advance(ms(1)), vec![id]);
        assert_eq!(scheduler.advance(ms(350)).len(), 3);
        assert_eq!(scheduler.fired_count(id), Some(4));
        assert_eq!(scheduler.now(), ms(450));
    }

    #[test]
    fn test_chronological_order() {
        let scheduler = TimerScheduler::new();
        let slow = scheduler.set_interval(ms(300));
        let fast = scheduler.set_interval(ms(100));

        let fired = scheduler.advance(ms(300));
        // fast at 100, 200, 300; slow at 300 (registered first, wins the tie)
        assert_eq!(fired, vec![fast, fast, slow, fast]);
    }

    #[test]
    fn test_cancel_from_callback() {
        let scheduler = TimerScheduler::new();
        let id = scheduler.set_interval(ms(10));

        let fired = scheduler.advance_with(ms(100), |fired_id| {
            scheduler.clear_interval(fired_id);
        });

        assert_eq!(fired, 1);
        assert!(!scheduler.is_active(id));
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(scheduler.now(), ms(100));
    }

    #[test]
    fn test_restart_from_callback_is_relative_to_fire_time() {
        let scheduler = TimerScheduler::new();
        scheduler.set_interval(ms(40));
        let mut restarted = None;

        scheduler.advance_with(ms(50), |fired_id| {
            if restarted.is_none() {
                scheduler.clear_interval(fired_id);
                restarted = Some(scheduler.set_interval(ms(40)));
            }
        });

        // Fired at 40, restarted to fire next at 80
        assert_eq!(scheduler.next_deadline(), Some(ms(30)));
    }

    #[test]
    fn test_zero_period_is_raised() {
        let scheduler = TimerScheduler::new();
        let id = scheduler.set_interval(Duration::ZERO);

        assert_eq!(scheduler.advance(ms(3)), vec![id, id, id]);
    }

    #[test]
    fn test_handle_timer_access() {
        let scheduler = TimerScheduler::new();
        let handle = scheduler.handle();

        let timer = TimerAccess::set_interval(&handle, ms(50)).unwrap();
        assert!(handle.is_active(timer));
        assert_eq!(scheduler.active_count(), 1);

        let fired = scheduler.advance(ms(50));
        assert_eq!(fired.into_iter().map(TimerId::from).collect::<Vec<_>>(), vec![timer]);

        assert!(handle.clear_interval(timer));
        assert!(!handle.clear_interval(timer));
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_handle_outlived_scheduler() {
        let scheduler = TimerScheduler::new();
        let handle = scheduler.handle();
        assert!(handle.is_alive());

        drop(scheduler);

        assert!(!handle.is_alive());
        assert!(TimerAccess::set_interval(&handle, ms(10)).is_none());
    }

    #[test]
    fn test_raw_round_trip() {
        let scheduler = TimerScheduler::new();
        let id = scheduler.set_interval(ms(5));
        assert_eq!(IntervalId::from_raw(id.to_raw()), id);
        assert_eq!(IntervalId::from(TimerId::from(id)), id);
    }
}
