//! Capture and fan-out of diagnostic output.

mod common;

use common::*;
use parking_lot::Mutex;
use std::sync::Arc;
use vmcalc::output::{DiagnosticChannel, MarkerSet, OutputInterceptor, SubscriptionId};

#[test]
fn result_line_reaches_every_subscriber_in_order() {
    let (_spy, interceptor) = spy_interceptor();
    let order = Arc::new(Mutex::new(Vec::new()));

    let first = Arc::clone(&order);
    interceptor.subscribe(move |line| first.lock().push(format!("L1 {line}")));
    let second = Arc::clone(&order);
    interceptor.subscribe(move |line| second.lock().push(format!("L2 {line}")));

    interceptor.log(&["RESULT: 30"]);

    assert_eq!(*order.lock(), vec!["L1 RESULT: 30", "L2 RESULT: 30"]);
}

#[test]
fn unmarked_line_is_not_delivered() {
    let (spy, interceptor) = spy_interceptor();
    let (l1, cb1) = recorder();
    let (l2, cb2) = recorder();
    interceptor.subscribe(cb1);
    interceptor.subscribe(cb2);

    interceptor.log(&["debug: tick"]);

    assert!(l1.lock().is_empty());
    assert!(l2.lock().is_empty());
    assert_eq!(spy.lines(), vec!["debug: tick"]);
}

#[test]
fn every_call_reaches_original_sink_unchanged() {
    let (spy, interceptor) = spy_interceptor();
    let (_received, callback) = recorder();
    interceptor.subscribe(callback);

    interceptor.log(&["hello"]);
    interceptor.log(&["RESULT:", "42"]);

    assert_eq!(
        spy.calls(),
        vec![vec!["hello".to_string()], vec!["RESULT:".to_string(), "42".to_string()]]
    );
}

#[test]
fn arguments_are_joined_with_a_space_before_matching() {
    let (_spy, interceptor) = spy_interceptor();
    let (received, callback) = recorder();
    interceptor.subscribe(callback);

    interceptor.log(&["Startup", "Check:", "10 + 20 = 30"]);

    assert_eq!(*received.lock(), vec!["Startup Check: 10 + 20 = 30"]);
}

#[test]
fn startup_check_marker_is_captured() {
    let (_spy, interceptor) = spy_interceptor();
    let (received, callback) = recorder();
    interceptor.subscribe(callback);

    interceptor.log(&["Startup Check: 10 + 20 = 30"]);

    assert_eq!(received.lock().len(), 1);
}

#[test]
fn markers_are_case_sensitive() {
    let (_spy, interceptor) = spy_interceptor();
    let (received, callback) = recorder();
    interceptor.subscribe(callback);

    interceptor.log(&["result: 30"]);
    interceptor.log(&["STARTUP CHECK: ok"]);

    assert!(received.lock().is_empty());
}

#[test]
fn unsubscribe_removes_only_that_callback() {
    let (_spy, interceptor) = spy_interceptor();
    let (l1, cb1) = recorder();
    let (l2, cb2) = recorder();
    let id1 = interceptor.subscribe(cb1);
    interceptor.subscribe(cb2);

    interceptor.log(&["RESULT: 1"]);
    interceptor.unsubscribe(id1);
    interceptor.log(&["RESULT: 2"]);

    assert_eq!(*l1.lock(), vec!["RESULT: 1"]);
    assert_eq!(*l2.lock(), vec!["RESULT: 1", "RESULT: 2"]);
    assert_eq!(interceptor.subscriber_count(), 1);
}

#[test]
fn unsubscribe_unknown_or_twice_is_noop() {
    let (_spy, interceptor) = spy_interceptor();
    let (received, callback) = recorder();
    let id = interceptor.subscribe(callback);

    interceptor.unsubscribe(id);
    interceptor.unsubscribe(id);
    interceptor.log(&["RESULT: 3"]);

    assert!(received.lock().is_empty());
    assert_eq!(interceptor.subscriber_count(), 0);
}

#[test]
fn unsubscribing_self_during_delivery_keeps_others_intact() {
    let (_spy, interceptor) = spy_interceptor();
    let own_id: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
    let first_calls = Arc::new(Mutex::new(0usize));

    let weak = Arc::downgrade(&interceptor);
    let slot = Arc::clone(&own_id);
    let count = Arc::clone(&first_calls);
    let id = interceptor.subscribe(move |_| {
        *count.lock() += 1;
        if let (Some(interceptor), Some(id)) = (weak.upgrade(), *slot.lock()) {
            interceptor.unsubscribe(id);
        }
    });
    *own_id.lock() = Some(id);

    let (l2, cb2) = recorder();
    let (l3, cb3) = recorder();
    interceptor.subscribe(cb2);
    interceptor.subscribe(cb3);

    interceptor.log(&["RESULT: 1"]);
    interceptor.log(&["RESULT: 2"]);

    assert_eq!(*first_calls.lock(), 1);
    assert_eq!(*l2.lock(), vec!["RESULT: 1", "RESULT: 2"]);
    assert_eq!(*l3.lock(), vec!["RESULT: 1", "RESULT: 2"]);
}

#[test]
fn subscriber_added_during_delivery_starts_with_next_line() {
    let (_spy, interceptor) = spy_interceptor();
    let (late, late_cb) = recorder();
    let late_cb = Arc::new(Mutex::new(Some(late_cb)));

    let weak = Arc::downgrade(&interceptor);
    interceptor.subscribe(move |_| {
        if let (Some(interceptor), Some(cb)) = (weak.upgrade(), late_cb.lock().take()) {
            interceptor.subscribe(cb);
        }
    });

    interceptor.log(&["RESULT: 1"]);
    interceptor.log(&["RESULT: 2"]);

    assert_eq!(*late.lock(), vec!["RESULT: 2"]);
}

#[test]
fn duplicate_registration_is_not_suppressed() {
    let (_spy, interceptor) = spy_interceptor();
    let received = Arc::new(Mutex::new(Vec::new()));
    let callback = {
        let received = Arc::clone(&received);
        Arc::new(move |line: &str| received.lock().push(line.to_string()))
    };
    let a = Arc::clone(&callback);
    interceptor.subscribe(move |line| a(line));
    let b = Arc::clone(&callback);
    interceptor.subscribe(move |line| b(line));

    interceptor.log(&["RESULT: 7"]);

    assert_eq!(received.lock().len(), 2);
}

#[test]
fn extra_markers_are_captured() {
    let spy = SpyChannel::new();
    let interceptor = OutputInterceptor::wrap(spy.clone(), MarkerSet::with_extra(["WARN:"]));
    let (received, callback) = recorder();
    interceptor.subscribe(callback);

    interceptor.log(&["WARN: overflow"]);
    interceptor.log(&["RESULT: 1"]);
    interceptor.log(&["INFO: nothing"]);

    assert_eq!(*received.lock(), vec!["WARN: overflow", "RESULT: 1"]);
    assert_eq!(spy.lines().len(), 3);
}

#[test]
fn original_returns_wrapped_sink() {
    let (spy, interceptor) = spy_interceptor();
    let (received, callback) = recorder();
    interceptor.subscribe(callback);

    interceptor.original().log(&["RESULT: bypass"]);

    assert!(received.lock().is_empty());
    assert_eq!(spy.lines(), vec!["RESULT: bypass"]);
}
