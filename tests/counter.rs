use std::time::Duration;

use stream_guard_io::{Count, Counter, GuardError};

#[test]
fn zero_ticks_is_invalid() {
    assert_eq!(
        Counter::new(Duration::from_secs(1), 0),
        Err(GuardError::InvalidParams)
    );
}

#[test]
fn zero_interval_is_invalid() {
    assert_eq!(
        Counter::new(Duration::ZERO, 10),
        Err(GuardError::InvalidParams)
    );
}

#[test]
fn fill_up_to_cap_zero_cps_always_zero() {
    let c = Counter::new(Duration::from_millis(300), 10).unwrap();
    assert_eq!(c.fill_up_to_cap(100, 0), 0);
    assert_eq!(c.fill_up_to_cap(1, 0), 0);
}

#[test]
fn fill_up_to_cap_unlimited_admits_all() {
    let c = Counter::new(Duration::from_millis(300), 10).unwrap();
    assert_eq!(c.fill_up_to_cap(12345, Count::MAX), 12345);
}

#[test]
fn fill_up_to_cap_clips_to_remaining() {
    let c = Counter::new(Duration::from_secs(1), 10).unwrap();
    // cps=100 over a 1s window -> cap 100.
    assert_eq!(c.fill_up_to_cap(60, 100), 60);
    assert_eq!(c.fill_up_to_cap(60, 100), 40);
    assert_eq!(c.fill_up_to_cap(1, 100), 0);
}

#[test]
fn refund_is_unconditional_and_can_go_negative_in_tick() {
    let c = Counter::new(Duration::from_secs(1), 10).unwrap();
    assert_eq!(c.fill_up(50), 50);
    assert_eq!(c.fill_up(-50), 0);
}

#[test]
fn reset_seeds_every_bucket_but_zeroes_the_head() {
    let c = Counter::new(Duration::from_secs(1), 10).unwrap();
    c.reset(100);
    // Every bucket but head holds cap/ticks=10; head is zeroed, so
    // immediately after reset the window total is 9*10 = 90, leaving
    // room for at least 10 more before hitting the 100 cap.
    assert_eq!(c.fill_up_to_cap(10, 100), 10);
    assert_eq!(c.fill_up_to_cap(1, 100), 0);
}

#[test]
fn long_silence_wipes_the_window() {
    let c = Counter::new(Duration::from_millis(50), 5).unwrap();
    assert_eq!(c.fill_up(30), 30);
    std::thread::sleep(Duration::from_millis(120));
    // A full window (50ms) of silence has passed; the next fill_up
    // should reflect only its own contribution.
    assert_eq!(c.fill_up(5), 5);
}
