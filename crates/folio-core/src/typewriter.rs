//! Cyclic type / pause / delete text reveal with an independently blinking cursor.

use crate::clock::{Scheduler, TimerHandle};
use crate::config::TypewriterTimings;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypewriterPhase {
    Typing,
    Pausing,
    Deleting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypewriterState {
    pub revealed: String,
    pub phase: TypewriterPhase,
    pub cursor_visible: bool,
}

/// The reveal state machine without any timers attached.
///
/// `step()` applies one transition and returns how long to wait before the
/// next one, so a full cycle over `L` characters lasts
/// `type_step·L + pause + delete_step·L`.
#[derive(Clone, Debug)]
pub struct TypewriterMachine {
    target: String,
    char_count: usize,
    revealed: usize,
    phase: TypewriterPhase,
    timings: TypewriterTimings,
}

impl TypewriterMachine {
    pub fn new(target: impl Into<String>, timings: TypewriterTimings) -> Self {
        let target = target.into();
        let char_count = target.chars().count();
        Self {
            target,
            char_count,
            revealed: 0,
            phase: TypewriterPhase::Typing,
            timings,
        }
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    pub fn revealed_len(&self) -> usize {
        self.revealed
    }

    /// Revealed prefix, cut on a char boundary.
    pub fn revealed(&self) -> &str {
        let end = self
            .target
            .char_indices()
            .nth(self.revealed)
            .map(|(i, _)| i)
            .unwrap_or(self.target.len());
        &self.target[..end]
    }

    /// Delay before the first `step()` from the current phase.
    pub fn initial_delay(&self) -> Duration {
        match self.phase {
            TypewriterPhase::Typing => self.timings.type_step,
            TypewriterPhase::Pausing => self.timings.pause,
            TypewriterPhase::Deleting => self.timings.delete_step,
        }
    }

    pub fn step(&mut self) -> Duration {
        match self.phase {
            TypewriterPhase::Typing => {
                if self.revealed < self.char_count {
                    self.revealed += 1;
                }
                if self.revealed >= self.char_count {
                    self.phase = TypewriterPhase::Pausing;
                    self.timings.pause
                } else {
                    self.timings.type_step
                }
            }
            TypewriterPhase::Pausing => {
                self.phase = TypewriterPhase::Deleting;
                self.timings.delete_step
            }
            TypewriterPhase::Deleting => {
                self.revealed = self.revealed.saturating_sub(1);
                if self.revealed == 0 {
                    self.phase = TypewriterPhase::Typing;
                    self.timings.type_step
                } else {
                    self.timings.delete_step
                }
            }
        }
    }

    pub fn cycle_duration(&self) -> Duration {
        let l = self.char_count as u32;
        self.timings.type_step * l + self.timings.pause + self.timings.delete_step * l
    }
}

struct Inner {
    machine: TypewriterMachine,
    cursor_visible: bool,
    active: bool,
    step_timer: Option<TimerHandle>,
    cursor_timer: Option<TimerHandle>,
}

/// Timer-driven typewriter. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Typewriter {
    inner: Rc<RefCell<Inner>>,
    clock: Rc<dyn Scheduler>,
}

impl Typewriter {
    pub fn new(
        target: impl Into<String>,
        timings: TypewriterTimings,
        clock: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                machine: TypewriterMachine::new(target, timings),
                cursor_visible: true,
                active: false,
                step_timer: None,
                cursor_timer: None,
            })),
            clock,
        }
    }

    pub fn start(&self) {
        let (delay, blink) = {
            let mut inner = self.inner.borrow_mut();
            if inner.active {
                return;
            }
            inner.active = true;
            (inner.machine.initial_delay(), inner.machine.timings.cursor_blink)
        };
        schedule_step(&self.inner, &self.clock, delay);

        let weak = Rc::downgrade(&self.inner);
        let cursor = self.clock.set_interval(
            blink,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    let mut inner = inner.borrow_mut();
                    if inner.active {
                        inner.cursor_visible = !inner.cursor_visible;
                    }
                }
            }),
        );
        self.inner.borrow_mut().cursor_timer = Some(cursor);
    }

    /// Cancel both timers; state freezes where it is.
    pub fn teardown(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.active = false;
        for handle in [inner.step_timer.take(), inner.cursor_timer.take()]
            .into_iter()
            .flatten()
        {
            self.clock.cancel(handle);
        }
    }

    pub fn state(&self) -> TypewriterState {
        let inner = self.inner.borrow();
        TypewriterState {
            revealed: inner.machine.revealed().to_owned(),
            phase: inner.machine.phase(),
            cursor_visible: inner.cursor_visible,
        }
    }

    pub fn cycle_duration(&self) -> Duration {
        self.inner.borrow().machine.cycle_duration()
    }
}

fn schedule_step(inner: &Rc<RefCell<Inner>>, clock: &Rc<dyn Scheduler>, delay: Duration) {
    let weak: Weak<RefCell<Inner>> = Rc::downgrade(inner);
    let clock_next = Rc::downgrade(clock);
    let handle = clock.set_timeout(
        delay,
        Box::new(move || {
            let (Some(inner), Some(clock)) = (weak.upgrade(), clock_next.upgrade()) else {
                return;
            };
            let next = {
                let mut st = inner.borrow_mut();
                if !st.active {
                    return;
                }
                st.step_timer = None;
                st.machine.step()
            };
            schedule_step(&inner, &clock, next);
        }),
    );
    inner.borrow_mut().step_timer = Some(handle);
}
