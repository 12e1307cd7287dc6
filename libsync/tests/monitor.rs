use libsync::Monitor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn late_waiter_returns_immediately() {
    let monitor = Monitor::new();
    monitor.signal();
    // Must not block.
    monitor.wait();
    assert!(monitor.is_signaled());
}

#[test]
fn signal_is_idempotent() {
    let monitor = Monitor::new();
    monitor.signal();
    monitor.signal();
    monitor.wait();
    assert!(monitor.is_signaled());
}

#[test]
fn reset_rearms() {
    let monitor = Arc::new(Monitor::new());
    monitor.signal();
    monitor.wait();
    monitor.reset();
    assert!(!monitor.is_signaled());

    let waiter = thread::spawn({
        let monitor = Arc::clone(&monitor);
        move || monitor.wait()
    });

    // The re-armed monitor holds the waiter until the next signal.
    thread::sleep(Duration::from_millis(50));
    assert!(!waiter.is_finished());

    monitor.signal();
    waiter.join().unwrap();
}

#[test]
fn releases_all_waiters() {
    let monitor = Arc::new(Monitor::new());
    let released = Arc::new(AtomicUsize::new(0));

    let waiters: Vec<_> = (0..8)
        .map(|_| {
            let monitor = Arc::clone(&monitor);
            let released = Arc::clone(&released);
            thread::spawn(move || {
                monitor.wait();
                released.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    assert_eq!(released.load(Ordering::SeqCst), 0, "No waiter before signal");

    monitor.signal();
    for waiter in waiters {
        waiter.join().unwrap();
    }
    assert_eq!(released.load(Ordering::SeqCst), 8, "All waiters after signal");
}

#[test]
fn released_waiter_survives_reset() {
    let monitor = Arc::new(Monitor::new());

    let waiter = thread::spawn({
        let monitor = Arc::clone(&monitor);
        move || monitor.wait()
    });

    monitor.signal();
    waiter.join().unwrap();

    // Resetting afterwards does not disturb the already-returned waiter.
    monitor.reset();
    assert!(!monitor.is_signaled());
}
