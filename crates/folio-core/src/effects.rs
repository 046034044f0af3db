//! Ephemeral visual effects: flame bursts on click, heart bursts on like and
//! a mascot that peeks in from a screen edge.
//!
//! Each effect removes itself when its TTL elapses. Removal timers are held
//! by the scheduler and cancelled on [`EffectScheduler::teardown`].

use crate::clock::{Scheduler, TimerHandle};
use crate::config::FeedbackConfig;
use crate::constants::HEART_BURST_LIMIT;
use fnv::FnvHashMap;
use rand::rngs::StdRng;
use rand::Rng;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

pub type EffectId = u64;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlameBurst {
    pub id: EffectId,
    pub x: f32,
    pub y: f32,
    pub created_at: Duration,
    pub ttl: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeartBurst {
    pub id: EffectId,
    pub created_at: Duration,
    pub ttl: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeekSide {
    Left,
    Right,
}

impl PeekSide {
    pub fn as_str(self) -> &'static str {
        match self {
            PeekSide::Left => "left",
            PeekSide::Right => "right",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeekMascot {
    pub id: EffectId,
    pub side: PeekSide,
    pub top_percent: f32,
    pub created_at: Duration,
    pub ttl: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EphemeralEffect {
    FlameBurst(FlameBurst),
    HeartBurst(HeartBurst),
    PeekMascot(PeekMascot),
}

impl EphemeralEffect {
    pub fn id(&self) -> EffectId {
        match self {
            EphemeralEffect::FlameBurst(f) => f.id,
            EphemeralEffect::HeartBurst(h) => h.id,
            EphemeralEffect::PeekMascot(p) => p.id,
        }
    }

    pub fn expires_at(&self) -> Duration {
        match self {
            EphemeralEffect::FlameBurst(f) => f.created_at + f.ttl,
            EphemeralEffect::HeartBurst(h) => h.created_at + h.ttl,
            EphemeralEffect::PeekMascot(p) => p.created_at + p.ttl,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct EffectTimings {
    flame_ttl: Duration,
    heart_ttl: Duration,
    heart_cooldown: Duration,
    heart_limit: usize,
    peek_ttl: Duration,
    peek_interval: Duration,
    peek_top: (f32, f32),
}

impl From<&FeedbackConfig> for EffectTimings {
    fn from(cfg: &FeedbackConfig) -> Self {
        let (lo, hi) = if cfg.peek_top_min <= cfg.peek_top_max {
            (cfg.peek_top_min, cfg.peek_top_max)
        } else {
            (cfg.peek_top_max, cfg.peek_top_min)
        };
        Self {
            flame_ttl: Duration::from_millis(cfg.flame_ttl_ms),
            heart_ttl: Duration::from_millis(cfg.heart_ttl_ms),
            heart_cooldown: Duration::from_millis(cfg.heart_cooldown_ms),
            heart_limit: cfg.heart_limit.clamp(1, HEART_BURST_LIMIT),
            peek_ttl: Duration::from_millis(cfg.peek_ttl_ms),
            peek_interval: Duration::from_millis(cfg.peek_interval_ms),
            peek_top: (lo, hi),
        }
    }
}

struct EffectState {
    timings: EffectTimings,
    rng: StdRng,
    next_id: EffectId,
    active: bool,
    flames: Vec<FlameBurst>,
    hearts: SmallVec<[HeartBurst; HEART_BURST_LIMIT]>,
    last_heart_at: Option<Duration>,
    peek: Option<PeekMascot>,
    peek_hide: Option<TimerHandle>,
    peek_interval: Option<TimerHandle>,
    // removal timers for flames and hearts, keyed by effect id
    removals: FnvHashMap<EffectId, TimerHandle>,
}

impl EffectState {
    fn fresh_id(&mut self) -> EffectId {
        self.next_id += 1;
        self.next_id
    }
}

/// Owner of every live ephemeral effect. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct EffectScheduler {
    state: Rc<RefCell<EffectState>>,
    clock: Rc<dyn Scheduler>,
}

impl EffectScheduler {
    pub fn new(config: &FeedbackConfig, clock: Rc<dyn Scheduler>, rng: StdRng) -> Self {
        Self {
            state: Rc::new(RefCell::new(EffectState {
                timings: EffectTimings::from(config),
                rng,
                next_id: 0,
                active: true,
                flames: Vec::new(),
                hearts: SmallVec::new(),
                last_heart_at: None,
                peek: None,
                peek_hide: None,
                peek_interval: None,
                removals: FnvHashMap::default(),
            })),
            clock,
        }
    }

    /// Show the first peek and start re-peeking on the configured interval.
    ///
    /// Also re-arms a scheduler that was torn down (page restored from cache).
    pub fn activate(&self) {
        let period = {
            let mut st = self.state.borrow_mut();
            if st.active && st.peek_interval.is_some() {
                return;
            }
            st.active = true;
            st.timings.peek_interval
        };
        self.schedule_peek();
        let weak = Rc::downgrade(&self.state);
        let clock = Rc::downgrade(&self.clock);
        let handle = self.clock.set_interval(
            period,
            Box::new(move || {
                if let (Some(state), Some(clock)) = (weak.upgrade(), clock.upgrade()) {
                    EffectScheduler { state, clock }.schedule_peek();
                }
            }),
        );
        self.state.borrow_mut().peek_interval = Some(handle);
        log::info!("[effects] activated, peek every {:?}", period);
    }

    /// Spawn a flame at client coordinates; it is removed after the flame TTL.
    pub fn spawn_flame(&self, x: f32, y: f32) -> Option<EffectId> {
        let now = self.clock.now();
        let (id, ttl) = {
            let mut st = self.state.borrow_mut();
            if !st.active {
                return None;
            }
            let id = st.fresh_id();
            let ttl = st.timings.flame_ttl;
            st.flames.push(FlameBurst {
                id,
                x,
                y,
                created_at: now,
                ttl,
            });
            (id, ttl)
        };
        self.schedule_removal(id, ttl, |st, id| st.flames.retain(|f| f.id != id));
        log::debug!("[effects] flame {} at ({:.0},{:.0})", id, x, y);
        Some(id)
    }

    /// Spawn a heart unless one was accepted within the cooldown. Dropped calls return `None`.
    pub fn spawn_heart(&self) -> Option<EffectId> {
        let now = self.clock.now();
        let (id, ttl, evicted) = {
            let mut st = self.state.borrow_mut();
            if !st.active {
                return None;
            }
            if let Some(last) = st.last_heart_at {
                if now.saturating_sub(last) < st.timings.heart_cooldown {
                    log::trace!("[effects] heart dropped by cooldown");
                    return None;
                }
            }
            st.last_heart_at = Some(now);
            let id = st.fresh_id();
            let ttl = st.timings.heart_ttl;
            let mut evicted = None;
            if st.hearts.len() >= st.timings.heart_limit {
                let oldest = st.hearts.remove(0);
                evicted = st.removals.remove(&oldest.id);
            }
            st.hearts.push(HeartBurst {
                id,
                created_at: now,
                ttl,
            });
            (id, ttl, evicted)
        };
        if let Some(handle) = evicted {
            self.clock.cancel(handle);
        }
        self.schedule_removal(id, ttl, |st, id| st.hearts.retain(|h| h.id != id));
        log::debug!("[effects] heart {}", id);
        Some(id)
    }

    /// Replace any visible mascot with a freshly placed one.
    pub fn schedule_peek(&self) -> Option<EffectId> {
        let now = self.clock.now();
        let (id, ttl, previous_hide) = {
            let mut st = self.state.borrow_mut();
            if !st.active {
                return None;
            }
            let id = st.fresh_id();
            let (lo, hi) = st.timings.peek_top;
            let side = if st.rng.gen_bool(0.5) {
                PeekSide::Left
            } else {
                PeekSide::Right
            };
            let top_percent = if hi > lo {
                st.rng.gen_range(lo..=hi)
            } else {
                lo
            };
            let ttl = st.timings.peek_ttl;
            st.peek = Some(PeekMascot {
                id,
                side,
                top_percent,
                created_at: now,
                ttl,
            });
            (id, ttl, st.peek_hide.take())
        };
        if let Some(handle) = previous_hide {
            self.clock.cancel(handle);
        }

        let weak = Rc::downgrade(&self.state);
        let handle = self.clock.set_timeout(
            ttl,
            Box::new(move || {
                let Some(state) = weak.upgrade() else { return };
                let mut st = state.borrow_mut();
                if st.active && st.peek.map(|p| p.id) == Some(id) {
                    st.peek = None;
                    st.peek_hide = None;
                }
            }),
        );
        self.state.borrow_mut().peek_hide = Some(handle);
        log::debug!("[effects] peek {}", id);
        Some(id)
    }

    fn schedule_removal(
        &self,
        id: EffectId,
        ttl: Duration,
        remove: fn(&mut EffectState, EffectId),
    ) {
        let weak: Weak<RefCell<EffectState>> = Rc::downgrade(&self.state);
        let handle = self.clock.set_timeout(
            ttl,
            Box::new(move || {
                let Some(state) = weak.upgrade() else { return };
                let mut st = state.borrow_mut();
                if !st.active {
                    return;
                }
                st.removals.remove(&id);
                remove(&mut *st, id);
            }),
        );
        self.state.borrow_mut().removals.insert(id, handle);
    }

    /// Cancel every pending timer and drop all live effects. `activate` undoes this.
    pub fn teardown(&self) {
        let handles: Vec<TimerHandle> = {
            let mut st = self.state.borrow_mut();
            if !st.active {
                return;
            }
            st.active = false;
            st.flames.clear();
            st.hearts.clear();
            st.peek = None;
            st.last_heart_at = None;
            let mut handles: Vec<TimerHandle> = st.removals.drain().map(|(_, h)| h).collect();
            handles.extend(st.peek_hide.take());
            handles.extend(st.peek_interval.take());
            handles
        };
        for handle in handles {
            self.clock.cancel(handle);
        }
        log::info!("[effects] torn down");
    }

    pub fn flames(&self) -> Vec<FlameBurst> {
        self.state.borrow().flames.clone()
    }

    pub fn hearts(&self) -> Vec<HeartBurst> {
        self.state.borrow().hearts.to_vec()
    }

    pub fn peek(&self) -> Option<PeekMascot> {
        self.state.borrow().peek
    }

    /// All live effects: flames, then hearts, then the mascot.
    pub fn effects(&self) -> Vec<EphemeralEffect> {
        let st = self.state.borrow();
        st.flames
            .iter()
            .copied()
            .map(EphemeralEffect::FlameBurst)
            .chain(st.hearts.iter().copied().map(EphemeralEffect::HeartBurst))
            .chain(st.peek.map(EphemeralEffect::PeekMascot))
            .collect()
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().active
    }
}
