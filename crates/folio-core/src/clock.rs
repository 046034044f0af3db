//! Scheduling substrate.
//!
//! Every animated or polling component in this crate is driven through the
//! [`Scheduler`] trait instead of reading wall-clock time directly. The web
//! frontend backs it with `setTimeout`/`setInterval`; tests use
//! [`VirtualClock`] and advance time explicitly.

use fnv::FnvHashMap;
use std::cell::RefCell;
use std::time::Duration;

/// Opaque identifier for a registered timeout or interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// One-shot and repeating timer registration plus a monotonic clock.
///
/// Implementations are single-threaded: callbacks run to completion on the
/// thread that owns the scheduler and may themselves register or cancel
/// timers.
pub trait Scheduler {
    /// Time elapsed since the scheduler's origin.
    fn now(&self) -> Duration;

    /// Run `callback` once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle;

    /// Run `callback` every `period`, first after one full period.
    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) -> TimerHandle;

    /// Cancel a pending timer. Unknown or already fired handles are ignored.
    fn cancel(&self, handle: TimerHandle);
}

enum Task {
    Once(Box<dyn FnOnce()>),
    Repeat(Box<dyn FnMut()>),
}

struct Entry {
    due: Duration,
    seq: u64,
    period: Option<Duration>,
    // None while the callback is executing
    task: Option<Task>,
}

#[derive(Default)]
struct VirtualState {
    now: Duration,
    next_handle: u64,
    next_seq: u64,
    timers: FnvHashMap<TimerHandle, Entry>,
}

/// Deterministic [`Scheduler`] whose time only moves when told to.
#[derive(Default)]
pub struct VirtualClock {
    state: RefCell<VirtualState>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live timers (fired one-shots and cancelled timers excluded).
    pub fn pending(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Advance time by `delta`, firing everything that becomes due.
    pub fn advance(&self, delta: Duration) {
        let target = self.now() + delta;
        self.advance_to(target);
    }

    /// Advance time to `target`, firing due callbacks in (due, registration) order.
    ///
    /// `now()` observed inside a callback equals that callback's due time.
    pub fn advance_to(&self, target: Duration) {
        while let Some((handle, due)) = self.next_due(target) {
            let task = {
                let mut st = self.state.borrow_mut();
                st.now = due;
                match st.timers.get_mut(&handle).and_then(|e| e.task.take()) {
                    Some(t) => t,
                    None => continue,
                }
            };
            log::trace!("[clock] fire {:?} at {:?}", handle, due);
            match task {
                Task::Once(f) => {
                    self.state.borrow_mut().timers.remove(&handle);
                    f();
                }
                Task::Repeat(mut f) => {
                    f();
                    let mut st = self.state.borrow_mut();
                    let seq = st.next_seq;
                    st.next_seq += 1;
                    // Cancelled from inside its own callback: entry is gone.
                    if let Some(entry) = st.timers.get_mut(&handle) {
                        let period = entry.period.unwrap_or_default();
                        entry.due = due + period;
                        entry.seq = seq;
                        entry.task = Some(Task::Repeat(f));
                    }
                }
            }
        }
        let mut st = self.state.borrow_mut();
        if st.now < target {
            st.now = target;
        }
    }

    fn next_due(&self, target: Duration) -> Option<(TimerHandle, Duration)> {
        let st = self.state.borrow();
        st.timers
            .iter()
            .filter(|(_, e)| e.task.is_some() && e.due <= target)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(h, e)| (*h, e.due))
    }

    fn register(&self, delay: Duration, period: Option<Duration>, task: Task) -> TimerHandle {
        let mut st = self.state.borrow_mut();
        let handle = TimerHandle(st.next_handle);
        st.next_handle += 1;
        let seq = st.next_seq;
        st.next_seq += 1;
        let due = st.now + delay;
        st.timers.insert(
            handle,
            Entry {
                due,
                seq,
                period,
                task: Some(task),
            },
        );
        handle
    }
}

impl Scheduler for VirtualClock {
    fn now(&self) -> Duration {
        self.state.borrow().now
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerHandle {
        self.register(delay, None, Task::Once(callback))
    }

    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) -> TimerHandle {
        // A zero period would spin forever inside advance_to
        let period = period.max(Duration::from_millis(1));
        self.register(period, Some(period), Task::Repeat(callback))
    }

    fn cancel(&self, handle: TimerHandle) {
        self.state.borrow_mut().timers.remove(&handle);
    }
}

#[inline]
pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn timeouts_fire_in_due_order() {
        let clock = VirtualClock::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, tag) in [(30, "c"), (10, "a"), (20, "b")] {
            let log = log.clone();
            clock.set_timeout(ms(delay), Box::new(move || log.borrow_mut().push(tag)));
        }
        clock.advance(ms(25));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        clock.advance(ms(5));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn interval_cancelled_inside_callback_stops() {
        let clock = Rc::new(VirtualClock::new());
        let hits = Rc::new(RefCell::new(0));
        let handle = Rc::new(RefCell::new(None::<TimerHandle>));
        let (c, h, hd) = (clock.clone(), hits.clone(), handle.clone());
        let id = clock.set_interval(
            ms(100),
            Box::new(move || {
                *h.borrow_mut() += 1;
                if *h.borrow() == 3 {
                    if let Some(id) = *hd.borrow() {
                        c.cancel(id);
                    }
                }
            }),
        );
        *handle.borrow_mut() = Some(id);
        clock.advance(ms(1_000));
        assert_eq!(*hits.borrow(), 3);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn now_inside_callback_is_due_time() {
        let clock = Rc::new(VirtualClock::new());
        let seen = Rc::new(RefCell::new(None));
        let (c, s) = (clock.clone(), seen.clone());
        clock.set_timeout(ms(42), Box::new(move || *s.borrow_mut() = Some(c.now())));
        clock.advance(ms(100));
        assert_eq!(*seen.borrow(), Some(ms(42)));
        assert_eq!(clock.now(), ms(100));
    }
}
