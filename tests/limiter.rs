use std::sync::Arc;
use std::time::Duration;

use stream_guard_io::{Controller, Count};

fn controller(common: Count, per_child: Count) -> Arc<Controller> {
    Controller::new(Duration::from_secs(1), 10, common, per_child).unwrap()
}

#[test]
fn unlimited_admits_everything() {
    let c = controller(-1, -1);
    let l = c.clone().born_limiter().unwrap();
    assert_eq!(l.fill_up(1_000_000), 1_000_000);
}

#[test]
fn per_child_default_caps_new_limiters() {
    let c = controller(-1, 100);
    let l = c.clone().born_limiter().unwrap();
    assert_eq!(l.fill_up(60), 60);
    assert_eq!(l.fill_up(60), 40);
    assert_eq!(l.fill_up(1), 0);
}

#[test]
fn own_cps_can_tighten_below_per_child() {
    let c = controller(-1, 1000);
    let l = c.clone().born_limiter().unwrap();
    l.set_cps(10);
    assert_eq!(l.fill_up(5), 5);
    assert_eq!(l.fill_up(5), 5);
    assert_eq!(l.fill_up(1), 0);
}

#[test]
fn aggregate_shortfall_is_refunded_to_local() {
    let c = controller(50, -1);
    let l1 = c.clone().born_limiter().unwrap();
    let l2 = c.clone().born_limiter().unwrap();
    // l1 exhausts the whole aggregate budget.
    assert_eq!(l1.fill_up(50), 50);
    // l2's local counter has room, but the aggregate is exhausted, so
    // l2 must be refunded its local admission back down to 0.
    assert_eq!(l2.fill_up(50), 0);
}

#[test]
fn zero_fill_up_is_a_no_op() {
    let c = controller(-1, -1);
    let l = c.clone().born_limiter().unwrap();
    assert_eq!(l.fill_up(0), 0);
}

#[test]
fn negative_fill_up_is_an_unconditional_refund() {
    let c = controller(-1, -1);
    let l = c.clone().born_limiter().unwrap();
    assert_eq!(l.fill_up(100), 100);
    assert_eq!(l.fill_up(-40), -40);
}
