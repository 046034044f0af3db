//! Local like state kept in step with the shared remote counter.
//!
//! A client increments the shared counter at most once: the `likedLocally`
//! flag is persisted through [`KeyValueStore`] and, once set, never reverts.
//! Network failures never surface; they leave the last known count in place
//! or, for the increment, fall back to a local `count + 1`.

use crate::clock::{Scheduler, TimerHandle};
use crate::config::FeedbackConfig;
use crate::counter::{CountResult, CounterService};
use crate::effects::EffectScheduler;
use crate::store::{read_flag, KeyValueStore, FLAG_TRUE};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LikeState {
    pub count: u64,
    pub liked_locally: bool,
}

/// What a `like()` call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LikeOutcome {
    /// First like from this client; one increment request was issued.
    Incremented,
    /// Already liked (or an increment is still in flight); effects only.
    AlreadyLiked,
    /// Not initialized or torn down; nothing happened.
    Inactive,
}

struct LikeInner {
    state: LikeState,
    active: bool,
    increment_in_flight: bool,
    poll_timer: Option<TimerHandle>,
}

#[derive(Clone)]
pub struct LikeSync {
    inner: Rc<RefCell<LikeInner>>,
    service: Rc<dyn CounterService>,
    store: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Scheduler>,
    effects: EffectScheduler,
    storage_key: String,
    poll_interval: Duration,
}

impl LikeSync {
    pub fn new(
        config: &FeedbackConfig,
        service: Rc<dyn CounterService>,
        store: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Scheduler>,
        effects: EffectScheduler,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(LikeInner {
                state: LikeState::default(),
                active: false,
                increment_in_flight: false,
                poll_timer: None,
            })),
            service,
            store,
            clock,
            effects,
            storage_key: config.storage_key.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    /// Load the persisted flag, fetch the count once and start polling.
    pub fn initialize(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.active {
                return;
            }
            inner.active = true;
            if read_flag(self.store.as_ref(), &self.storage_key) {
                inner.state.liked_locally = true;
            }
            log::info!(
                "[likes] initialize liked_locally={}",
                inner.state.liked_locally
            );
        }
        self.poll();

        let weak = Rc::downgrade(&self.inner);
        let service = self.service.clone();
        let handle = self.clock.set_interval(
            self.poll_interval,
            Box::new(move || refresh(&weak, service.as_ref())),
        );
        self.inner.borrow_mut().poll_timer = Some(handle);
    }

    /// Re-fetch the shared count; whichever fetch completes last wins.
    pub fn poll(&self) {
        refresh(&Rc::downgrade(&self.inner), self.service.as_ref());
    }

    pub fn like(&self) -> LikeOutcome {
        let first_like = {
            let mut inner = self.inner.borrow_mut();
            if !inner.active {
                log::debug!("[likes] like ignored while inactive");
                return LikeOutcome::Inactive;
            }
            if inner.state.liked_locally || inner.increment_in_flight {
                false
            } else {
                inner.increment_in_flight = true;
                true
            }
        };

        self.effects.spawn_heart();
        self.effects.schedule_peek();

        if !first_like {
            return LikeOutcome::AlreadyLiked;
        }

        let weak = Rc::downgrade(&self.inner);
        let store = self.store.clone();
        let key = self.storage_key.clone();
        self.service.increment(Box::new(move |result: CountResult| {
            // Persist even after teardown so a later session cannot increment again.
            store.set(&key, FLAG_TRUE);
            let Some(inner) = weak.upgrade() else { return };
            let mut inner = inner.borrow_mut();
            inner.increment_in_flight = false;
            if !inner.active {
                return;
            }
            match result {
                Ok(count) => inner.state.count = count,
                Err(e) => {
                    log::warn!("[likes] increment failed, counting locally: {}", e);
                    inner.state.count = inner.state.count.saturating_add(1);
                }
            }
            inner.state.liked_locally = true;
        }));
        LikeOutcome::Incremented
    }

    /// Stop polling and ignore any completion that arrives afterwards.
    pub fn teardown(&self) {
        let handle = {
            let mut inner = self.inner.borrow_mut();
            inner.active = false;
            inner.poll_timer.take()
        };
        if let Some(handle) = handle {
            self.clock.cancel(handle);
        }
        log::info!("[likes] torn down");
    }

    pub fn state(&self) -> LikeState {
        self.inner.borrow().state
    }

    pub fn is_active(&self) -> bool {
        self.inner.borrow().active
    }
}

fn refresh(inner: &Weak<RefCell<LikeInner>>, service: &dyn CounterService) {
    match inner.upgrade() {
        Some(rc) if rc.borrow().active => {}
        _ => return,
    }
    let weak = inner.clone();
    service.fetch_count(Box::new(move |result: CountResult| {
        let Some(inner) = weak.upgrade() else { return };
        let mut inner = inner.borrow_mut();
        if !inner.active {
            return;
        }
        match result {
            Ok(count) => inner.state.count = count,
            Err(e) => log::warn!("[likes] fetch failed, keeping {}: {}", inner.state.count, e),
        }
    }));
}
