use std::io::{Cursor, Read};
use std::sync::Arc;
use std::time::{Duration, Instant};

use stream_guard_io::io::Reader;
use stream_guard_io::{Controller, Count, FlowError, Limiter};

fn limiter(common: Count, per_child: Count) -> Arc<Limiter> {
    let controller = Controller::new(Duration::from_secs(1), 10, common, per_child).unwrap();
    Arc::new(controller.born_limiter().unwrap())
}

#[test]
fn empty_buffer_returns_ok_without_touching_limiter() {
    let l = limiter(1, 1);
    let mut r = Reader::new(Cursor::new(b"hello".to_vec()), l, true);
    let (n, result) = r.read_flow(&mut []);
    assert_eq!(n, 0);
    assert!(result.is_ok());
}

#[test]
fn fragile_reader_reports_exceeded_immediately() {
    let l = limiter(1, 1);
    // Drain the tiny budget first.
    l.fill_up(1);
    let mut r = Reader::new(Cursor::new(vec![0u8; 1000]), l, true);
    let mut buf = [0u8; 1000];
    let (n, result) = r.read_flow(&mut buf);
    assert_eq!(n, 0);
    assert!(matches!(result, Err(FlowError::Exceeded)));
}

#[test]
fn deadline_in_the_past_fires_on_next_iteration() {
    let l = limiter(-1, -1);
    let mut r = Reader::new(Cursor::new(vec![0u8; 10]), l, false);
    r.set_deadline(Some(Instant::now() - Duration::from_secs(1)));
    let mut buf = [0u8; 10];
    let (n, result) = r.read_flow(&mut buf);
    assert_eq!(n, 0);
    assert!(matches!(result, Err(FlowError::Deadline)));
}

#[test]
fn unlimited_reader_reads_fully_via_std_read_trait() {
    let l = limiter(-1, -1);
    let mut r = Reader::new(Cursor::new(b"hello world".to_vec()), l, true);
    let mut out = Vec::new();
    r.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"hello world");
}

#[test]
fn short_underlying_read_is_refunded() {
    let l = limiter(-1, -1);
    let mut r = Reader::new(Cursor::new(b"ab".to_vec()), l.clone(), true);
    let mut buf = [0u8; 10];
    let (n, result) = r.read_flow(&mut buf);
    assert_eq!(n, 2);
    assert!(result.is_ok());
    // The 8-byte shortfall was refunded; a fresh request for exactly 8
    // more should still be admitted within the same tick.
    assert_eq!(l.fill_up(8), 8);
}
