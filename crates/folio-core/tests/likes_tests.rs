// Host-side tests for like synchronization against a scripted counter service.

mod common;

use common::{FakeCounter, Reply};
use folio_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::rc::Rc;

struct Harness {
    clock: Rc<VirtualClock>,
    counter: Rc<FakeCounter>,
    store: Rc<MemoryStore>,
    effects: EffectScheduler,
    likes: LikeSync,
}

fn harness_with(store: MemoryStore) -> Harness {
    common::init_logging();
    let cfg = FeedbackConfig::default();
    let clock = Rc::new(VirtualClock::new());
    let counter = Rc::new(FakeCounter::new());
    let store = Rc::new(store);
    let effects = EffectScheduler::new(&cfg, clock.clone(), StdRng::seed_from_u64(3));
    let likes = LikeSync::new(
        &cfg,
        counter.clone(),
        store.clone(),
        clock.clone(),
        effects.clone(),
    );
    Harness {
        clock,
        counter,
        store,
        effects,
        likes,
    }
}

fn harness() -> Harness {
    harness_with(MemoryStore::new())
}

#[test]
fn initialize_against_failing_network_keeps_default() {
    let h = harness();
    h.likes.initialize();
    assert_eq!(h.likes.state(), LikeState::default());
    assert_eq!(*h.counter.fetch_calls.borrow(), 1);
}

#[test]
fn initialize_reads_flag_and_count() {
    let h = harness_with(MemoryStore::with_entry(LIKED_STORAGE_KEY, "true"));
    h.counter.on_fetch(Reply::Now(Ok(41)));
    h.likes.initialize();
    assert_eq!(
        h.likes.state(),
        LikeState {
            count: 41,
            liked_locally: true
        }
    );
}

#[test]
fn unexpected_flag_value_reads_as_not_liked() {
    let h = harness_with(MemoryStore::with_entry(LIKED_STORAGE_KEY, "yes"));
    h.likes.initialize();
    assert!(!h.likes.state().liked_locally);
}

#[test]
fn malformed_poll_keeps_previous_count() {
    let h = harness();
    h.counter
        .on_fetch(Reply::Now(Ok(10)))
        .on_fetch(Reply::Now(Err(CounterError::Malformed("count".into()))))
        .on_fetch(Reply::Now(Ok(12)));
    h.likes.initialize();
    assert_eq!(h.likes.state().count, 10);
    h.clock.advance(ms(LIKE_POLL_INTERVAL_MS));
    assert_eq!(h.likes.state().count, 10);
    h.clock.advance(ms(LIKE_POLL_INTERVAL_MS));
    assert_eq!(h.likes.state().count, 12);
    assert_eq!(*h.counter.fetch_calls.borrow(), 3);
}

#[test]
fn last_completed_fetch_wins() {
    let h = harness();
    h.counter.on_fetch(Reply::Hold).on_fetch(Reply::Hold);
    h.likes.initialize();
    h.likes.poll();
    assert_eq!(h.counter.pending_len(), 2);
    // the newer request answers first; the older one completes last and wins
    h.counter.complete_latest(Ok(7));
    assert_eq!(h.likes.state().count, 7);
    h.counter.complete_pending(Ok(5));
    assert_eq!(h.likes.state().count, 5);
}

#[test]
fn first_like_adopts_server_count_and_persists() {
    let h = harness();
    h.counter
        .on_fetch(Reply::Now(Ok(3)))
        .on_increment(Reply::Now(Ok(9)));
    h.likes.initialize();
    assert_eq!(h.likes.like(), LikeOutcome::Incremented);
    assert_eq!(
        h.likes.state(),
        LikeState {
            count: 9,
            liked_locally: true
        }
    );
    assert_eq!(h.store.get(LIKED_STORAGE_KEY).as_deref(), Some("true"));
}

#[test]
fn second_like_changes_nothing_but_effects() {
    let h = harness();
    h.counter
        .on_fetch(Reply::Now(Ok(3)))
        .on_increment(Reply::Now(Ok(4)));
    h.likes.initialize();
    h.likes.like();
    let before = h.likes.state();
    let peek_before = h.effects.peek().map(|p| p.id);

    h.clock.advance(ms(HEART_COOLDOWN_MS));
    assert_eq!(h.likes.like(), LikeOutcome::AlreadyLiked);
    assert_eq!(h.likes.state(), before);
    assert_eq!(*h.counter.increment_calls.borrow(), 1);
    assert_eq!(h.effects.hearts().len(), 2);
    assert_ne!(h.effects.peek().map(|p| p.id), peek_before);
}

#[test]
fn failed_increment_falls_back_to_local_count() {
    let h = harness();
    h.counter
        .on_fetch(Reply::Now(Ok(20)))
        .on_increment(Reply::Now(Err(CounterError::Status(503))));
    h.likes.initialize();
    h.likes.like();
    assert_eq!(
        h.likes.state(),
        LikeState {
            count: 21,
            liked_locally: true
        }
    );
    assert!(read_flag(h.store.as_ref(), LIKED_STORAGE_KEY));
    // never retried
    h.clock.advance(ms(60_000));
    assert_eq!(*h.counter.increment_calls.borrow(), 1);
}

#[test]
fn like_while_increment_in_flight_does_not_increment_twice() {
    let h = harness();
    h.counter.on_increment(Reply::Hold);
    h.likes.initialize();
    assert_eq!(h.likes.like(), LikeOutcome::Incremented);
    assert_eq!(h.likes.like(), LikeOutcome::AlreadyLiked);
    assert_eq!(*h.counter.increment_calls.borrow(), 1);
    assert!(!h.likes.state().liked_locally);

    h.counter.complete_pending(Ok(1));
    assert_eq!(
        h.likes.state(),
        LikeState {
            count: 1,
            liked_locally: true
        }
    );
}

#[test]
fn persisted_like_is_never_incremented_again() {
    let h = harness_with(MemoryStore::with_entry(LIKED_STORAGE_KEY, "true"));
    h.counter.on_fetch(Reply::Now(Ok(5)));
    h.likes.initialize();
    assert_eq!(h.likes.like(), LikeOutcome::AlreadyLiked);
    assert_eq!(*h.counter.increment_calls.borrow(), 0);
    assert_eq!(h.likes.state().count, 5);
}

#[test]
fn like_before_initialize_is_inert() {
    let h = harness();
    assert_eq!(h.likes.like(), LikeOutcome::Inactive);
    assert_eq!(*h.counter.increment_calls.borrow(), 0);
    assert!(h.effects.hearts().is_empty());
}

#[test]
fn teardown_stops_polling_and_ignores_late_results() {
    let h = harness();
    h.counter.on_fetch(Reply::Now(Ok(2))).on_increment(Reply::Hold);
    h.likes.initialize();
    h.likes.like();
    h.effects.teardown();
    h.likes.teardown();
    assert_eq!(h.clock.pending(), 0);

    h.counter.complete_pending(Ok(100));
    assert_eq!(h.likes.state().count, 2);
    // the flag still lands so the next session cannot increment again
    assert!(read_flag(h.store.as_ref(), LIKED_STORAGE_KEY));

    h.clock.advance(ms(LIKE_POLL_INTERVAL_MS * 4));
    assert_eq!(*h.counter.fetch_calls.borrow(), 1);
}

#[test]
fn fetch_completing_after_teardown_is_ignored() {
    let h = harness();
    h.counter.on_fetch(Reply::Hold);
    h.likes.initialize();
    assert_eq!(h.counter.pending_len(), 1);
    h.likes.teardown();

    h.counter.complete_pending(Ok(99));
    assert_eq!(h.likes.state().count, 0);
    assert_eq!(h.likes.state(), LikeState::default());
}

#[test]
fn initialize_after_teardown_polls_again() {
    let h = harness();
    h.counter
        .on_fetch(Reply::Now(Ok(4)))
        .on_fetch(Reply::Now(Ok(6)))
        .on_fetch(Reply::Now(Ok(9)));
    h.likes.initialize();
    h.likes.teardown();
    assert_eq!(h.clock.pending(), 0);

    h.likes.initialize();
    assert!(h.likes.is_active());
    assert_eq!(*h.counter.fetch_calls.borrow(), 2);
    assert_eq!(h.likes.state().count, 6);

    h.clock.advance(ms(LIKE_POLL_INTERVAL_MS));
    assert_eq!(*h.counter.fetch_calls.borrow(), 3);
    assert_eq!(h.likes.state().count, 9);
}
