use std::sync::Arc;
use std::time::{Duration, Instant};

use stream_guard_io::io::Writer;
use stream_guard_io::{Controller, Count, FlowError, Limiter};

fn limiter(common: Count, per_child: Count) -> Arc<Limiter> {
    let controller = Controller::new(Duration::from_secs(1), 10, common, per_child).unwrap();
    Arc::new(controller.born_limiter().unwrap())
}

#[test]
fn empty_write_is_a_no_op() {
    let l = limiter(1, 1);
    let mut w = Writer::new(Vec::new(), l, true);
    let (n, result) = w.write_flow(&[]);
    assert_eq!(n, 0);
    assert!(result.is_ok());
}

#[test]
fn unlimited_writer_drains_whole_buffer() {
    let l = limiter(-1, -1);
    let mut w = Writer::new(Vec::new(), l, true);
    let (n, result) = w.write_flow(b"hello world");
    assert_eq!(n, 11);
    assert!(result.is_ok());
    assert_eq!(w.into_inner(), b"hello world");
}

#[test]
fn fragile_writer_stops_at_the_cap() {
    let l = limiter(5, 5);
    let mut w = Writer::new(Vec::new(), l, true);
    let (n, result) = w.write_flow(&[0u8; 100]);
    assert_eq!(n, 5);
    assert!(matches!(result, Err(FlowError::Exceeded)));
}

#[test]
fn deadline_in_the_past_stops_a_non_fragile_writer() {
    let l = limiter(5, 5);
    let mut w = Writer::new(Vec::new(), l, false);
    // Drain the budget, then set an already-past deadline so the retry
    // loop returns instead of blocking forever.
    assert_eq!(w.write_flow(&[0u8; 5]).0, 5);
    w.set_deadline(Some(Instant::now() - Duration::from_millis(1)));
    let (n, result) = w.write_flow(&[0u8; 10]);
    assert_eq!(n, 0);
    assert!(matches!(result, Err(FlowError::Deadline)));
}
