//! Chaos testing for concurrent access.
//!
//! Many threads hammer the tracker at once:
//! - Identical keys racing at the same instant
//! - Distinct keys interleaved with sweeps and resets

// Chaos tests use expect/unwrap/panic for simplicity - panics are acceptable in tests
// Excessive nesting is acceptable in concurrent test code with thread spawns
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::excessive_nesting
)]

use sitewatch::{ManualClock, NotificationTracker, ViolationCategory};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// Test: Racing callers with one key get exactly one allowed decision.
#[test]
fn test_identical_key_race_allows_exactly_one() {
    for _ in 0..20 {
        let clock = ManualClock::new(0);
        let tracker = Arc::new(NotificationTracker::with_clock(
            Duration::from_secs(10),
            Arc::new(clock),
        ));
        let num_threads = 16;
        let barrier = Arc::new(Barrier::new(num_threads));
        let allowed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..num_threads)
            .map(|t| {
                let tracker = Arc::clone(&tracker);
                let barrier = Arc::clone(&barrier);
                let allowed = Arc::clone(&allowed);
                thread::spawn(move || {
                    // Mixed casing still hits the same key.
                    let subject = if t % 2 == 0 { "John Doe" } else { "JOHN DOE" };
                    barrier.wait();
                    if tracker.should_send(ViolationCategory::Ppe, subject, "Site A") {
                        allowed.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(allowed.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.len(), 1);
    }
}

/// Test: One allowed decision per window across repeated bursts.
#[test]
fn test_one_allowed_per_window_across_bursts() {
    let clock = ManualClock::new(0);
    let tracker = Arc::new(NotificationTracker::with_clock(
        Duration::from_secs(10),
        Arc::new(clock.clone()),
    ));
    let allowed = Arc::new(AtomicUsize::new(0));

    for _ in 0..5 {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                let allowed = Arc::clone(&allowed);
                thread::spawn(move || {
                    for _ in 0..50 {
                        if tracker.should_send(ViolationCategory::Zone, "Jane", "Site B") {
                            allowed.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        clock.advance(Duration::from_secs(10));
    }

    assert_eq!(allowed.load(Ordering::SeqCst), 5);
}

/// Test: Checks, sweeps, and resets interleave without deadlock.
#[test]
fn test_mixed_workload_no_deadlock() {
    let clock = ManualClock::new(0);
    let tracker = Arc::new(NotificationTracker::with_clock(
        Duration::from_secs(10),
        Arc::new(clock.clone()),
    ));
    let completed = Arc::new(AtomicUsize::new(0));
    let num_threads = 8;
    let ops_per_thread = 200;

    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let tracker = Arc::clone(&tracker);
            let clock = clock.clone();
            let completed = Arc::clone(&completed);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    match (t + i) % 10 {
                        0 => {
                            let _ = tracker.sweep(Duration::from_secs(30));
                        },
                        1 if t == 0 => tracker.reset(),
                        2 => clock.advance(Duration::from_millis(250)),
                        _ => {
                            let subject = format!("worker-{}", i % 17);
                            let _ = tracker.should_send(ViolationCategory::Ppe, &subject, "Site A");
                        },
                    }
                }
                completed.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(completed.load(Ordering::SeqCst), num_threads);
    assert!(tracker.len() <= 17);
}
