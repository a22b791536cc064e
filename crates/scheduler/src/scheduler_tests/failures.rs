// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    error = { FakeBehavior::Fail },
    panic = { FakeBehavior::Panic },
)]
fn failing_target_does_not_disturb_others(behavior: FakeBehavior) {
    let h = Harness::started();
    h.scheduler
        .add_trigger("bad", every(15), h.failing("bad", behavior))
        .unwrap();
    h.scheduler
        .add_trigger("good", every(15), h.target("good"))
        .unwrap();

    assert!(h.wait_for_count("good", 3));
    assert!(h.wait_for_count("bad", 3), "failing entry keeps its schedule");
    assert_eq!(h.scheduler.state(), Lifecycle::Running);
    assert!(h.scheduler.contains("bad"));
}

#[yare::parameterized(
    error = { FakeBehavior::Fail,  DispatchFailure::Error("bad failed".to_string()) },
    panic = { FakeBehavior::Panic, DispatchFailure::Panic("bad panicked".to_string()) },
)]
fn listeners_receive_failures(behavior: FakeBehavior, expected: DispatchFailure) {
    let h = Harness::started();
    let recorder = Arc::new(Recorder::default());
    h.scheduler.add_failure_listener(recorder.clone());

    h.scheduler
        .add_trigger("job", once_after(10), h.failing("bad", behavior))
        .unwrap();

    assert!(wait_for(TIMEOUT, || !recorder.seen.lock().is_empty()));
    assert_eq!(*recorder.seen.lock(), vec![("job".to_string(), expected)]);
}

#[test]
fn successful_targets_are_not_reported() {
    let h = Harness::started();
    let recorder = Arc::new(Recorder::default());
    h.scheduler.add_failure_listener(recorder.clone());

    h.scheduler
        .add_trigger("ok", once_after(10), h.target("ok"))
        .unwrap();

    assert!(h.wait_for_count("ok", 1));
    std::thread::sleep(ms(20));
    assert!(recorder.seen.lock().is_empty());
}

#[test]
fn removed_listener_is_not_notified() {
    let h = Harness::started();
    let recorder = Arc::new(Recorder::default());
    let listener: Arc<dyn FailureListener> = recorder.clone();
    h.scheduler.add_failure_listener(Arc::clone(&listener));

    assert!(h.scheduler.remove_failure_listener(&listener));
    assert!(!h.scheduler.remove_failure_listener(&listener));

    h.scheduler
        .add_trigger("job", once_after(10), h.failing("bad", FakeBehavior::Fail))
        .unwrap();
    assert!(h.wait_for_count("bad", 1));
    std::thread::sleep(ms(20));
    assert!(recorder.seen.lock().is_empty());
}

#[test]
fn pool_rejection_still_reschedules() {
    let rt = runtime();
    // The only accepted job is the dispatch loop itself.
    let pool = Arc::new(RejectingPool::new(&rt, 1));
    let rejected = Arc::clone(&pool.rejected);
    let h = Harness::with_pool(rt, pool);
    h.scheduler.start().unwrap();

    h.scheduler
        .add_trigger("tick", every(15), h.target("tick"))
        .unwrap();

    assert!(wait_for(TIMEOUT, || rejected.load(Ordering::SeqCst) >= 3));
    assert!(h.log.is_empty());
    assert!(h.scheduler.contains("tick"));
    assert_eq!(h.scheduler.state(), Lifecycle::Running);
}

#[test]
fn saturated_pool_drops_dispatch_but_not_entry() {
    let rt = runtime();
    let pool = Arc::new(TokioPool::new(rt.handle().clone()).with_max_in_flight(1));
    let h = Harness::with_pool(rt, pool);
    h.scheduler.start().unwrap();

    h.scheduler
        .add_trigger("tick", every(15), h.target("tick"))
        .unwrap();
    std::thread::sleep(SETTLE);

    assert!(h.log.is_empty());
    assert_eq!(
        h.scheduler.entries()[0].name,
        "tick",
        "entry survives rejected dispatches"
    );
    assert!(h.scheduler.entries()[0].next_fire_time.is_some());
}

/// Answers normally once, then panics on every evaluation.
#[derive(Debug)]
struct PanicsAfterFirst {
    calls: usize,
}

impl TimeTrigger for PanicsAfterFirst {
    fn next_fire_time(&mut self, now_ms: u64) -> Option<u64> {
        self.calls += 1;
        if self.calls > 1 {
            panic!("trigger arithmetic blew up");
        }
        Some(now_ms + 10)
    }
}

#[test]
fn panicking_trigger_does_not_stop_the_loop() {
    let h = Harness::started();
    h.scheduler
        .add_trigger("good", every(15), h.target("good"))
        .unwrap();
    assert!(h.wait_for_count("good", 2));

    h.scheduler
        .add_trigger("broken", PanicsAfterFirst { calls: 0 }, h.target("broken"))
        .unwrap();
    assert!(h.wait_for_count("broken", 1));

    let before = h.log.count("good");
    assert!(
        h.wait_for_count("good", before + 3),
        "dispatch loop keeps firing after a trigger panic"
    );
    assert_eq!(h.scheduler.state(), Lifecycle::Running);

    // Registered but unscheduled, like an exhausted trigger
    assert!(h.scheduler.contains("broken"));
    let broken = h
        .scheduler
        .entries()
        .into_iter()
        .find(|e| e.name == "broken")
        .unwrap();
    assert_eq!(broken.next_fire_time, None);
    assert_eq!(h.log.count("broken"), 1);
}

#[test]
fn trigger_panicking_on_add_is_not_queued() {
    let h = Harness::started();
    h.scheduler
        .add_trigger("broken", PanicsAfterFirst { calls: 1 }, h.target("broken"))
        .unwrap();
    h.scheduler
        .add_trigger("good", once_after(10), h.target("good"))
        .unwrap();

    assert!(h.wait_for_count("good", 1));
    assert_eq!(h.log.count("broken"), 0);
    assert!(h.scheduler.contains("broken"));
}
