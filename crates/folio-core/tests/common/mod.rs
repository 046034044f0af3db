// Shared fakes for host-side tests.
#![allow(dead_code)]

use folio_core::{CountCallback, CountResult, CounterError, CounterService};
use std::cell::RefCell;
use std::collections::VecDeque;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// How the fake answers the next request.
pub enum Reply {
    Now(CountResult),
    /// Keep the callback until `complete_pending` is called.
    Hold,
}

/// Scripted counter service. Unscripted requests fail with a network error.
#[derive(Default)]
pub struct FakeCounter {
    fetch_replies: RefCell<VecDeque<Reply>>,
    increment_replies: RefCell<VecDeque<Reply>>,
    pending: RefCell<VecDeque<CountCallback>>,
    pub fetch_calls: RefCell<usize>,
    pub increment_calls: RefCell<usize>,
}

impl FakeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_fetch(&self, reply: Reply) -> &Self {
        self.fetch_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn on_increment(&self, reply: Reply) -> &Self {
        self.increment_replies.borrow_mut().push_back(reply);
        self
    }

    /// Resolve the oldest held request.
    pub fn complete_pending(&self, result: CountResult) {
        let done = self.pending.borrow_mut().pop_front();
        if let Some(done) = done {
            done(result);
        }
    }

    /// Resolve the most recently held request.
    pub fn complete_latest(&self, result: CountResult) {
        let done = self.pending.borrow_mut().pop_back();
        if let Some(done) = done {
            done(result);
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    fn answer(&self, reply: Option<Reply>, done: CountCallback) {
        match reply {
            Some(Reply::Now(result)) => done(result),
            Some(Reply::Hold) => self.pending.borrow_mut().push_back(done),
            None => done(Err(CounterError::Network("unreachable".into()))),
        }
    }
}

impl CounterService for FakeCounter {
    fn fetch_count(&self, done: CountCallback) {
        *self.fetch_calls.borrow_mut() += 1;
        let reply = self.fetch_replies.borrow_mut().pop_front();
        self.answer(reply, done);
    }

    fn increment(&self, done: CountCallback) {
        *self.increment_calls.borrow_mut() += 1;
        let reply = self.increment_replies.borrow_mut().pop_front();
        self.answer(reply, done);
    }
}
