// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chime_core::test_support::CountdownTrigger;
use chime_core::FakeClock;

#[test]
fn lifecycle_moves_forward_only() {
    let h = Harness::new();
    assert_eq!(h.scheduler.state(), Lifecycle::Initialized);

    h.scheduler.start().unwrap();
    assert_eq!(h.scheduler.state(), Lifecycle::Running);
    assert!(matches!(
        h.scheduler.start(),
        Err(SchedulerError::AlreadyRunning)
    ));

    h.scheduler.stop();
    h.scheduler.stop();
    assert_eq!(h.scheduler.state(), Lifecycle::Stopped);
    assert!(matches!(h.scheduler.start(), Err(SchedulerError::Stopped)));
}

#[test]
fn stop_before_start_prevents_running() {
    let h = Harness::new();
    h.scheduler.stop();
    assert!(matches!(h.scheduler.start(), Err(SchedulerError::Stopped)));
}

#[test]
fn rejected_start_leaves_scheduler_startable() {
    let rt = runtime();
    let pool = Arc::new(RejectingPool::new(&rt, 0));
    let rejected = Arc::clone(&pool.rejected);
    let h = Harness::with_pool(rt, pool);

    let err = h.scheduler.start().unwrap_err();
    assert!(matches!(err, SchedulerError::Pool(PoolError::Rejected(_))));
    assert_eq!(h.scheduler.state(), Lifecycle::Initialized);
    assert_eq!(rejected.load(Ordering::SeqCst), 1);
}

#[test]
fn stop_halts_further_firings() {
    let h = Harness::started();
    h.scheduler
        .add_trigger("tick", every(15), h.target("tick"))
        .unwrap();
    assert!(h.wait_for_count("tick", 2));

    h.scheduler.stop();
    std::thread::sleep(ms(40));
    let after_stop = h.log.count("tick");
    std::thread::sleep(SETTLE);

    assert_eq!(h.log.count("tick"), after_stop);
}

#[test]
fn dropping_the_scheduler_stops_the_loop() {
    let rt = runtime();
    let log = FiringLog::new();
    {
        let scheduler = TimeScheduler::new(Arc::new(TokioPool::new(rt.handle().clone())));
        scheduler
            .add_trigger("tick", every(15), Arc::new(FakeTarget::new("tick", &log)))
            .unwrap();
        scheduler.start().unwrap();
        assert!(wait_for(TIMEOUT, || log.count("tick") >= 1));
    }

    std::thread::sleep(ms(40));
    let after_drop = log.count("tick");
    std::thread::sleep(SETTLE);
    assert_eq!(log.count("tick"), after_drop);
}

#[test]
fn add_after_stop_is_rejected() {
    let h = Harness::started();
    h.scheduler.stop();

    let err = h
        .scheduler
        .add_trigger("late", once_after(10), h.target("late"))
        .unwrap_err();
    assert!(matches!(err, SchedulerError::Stopped));
    assert!(!h.scheduler.contains("late"));
}

#[test]
fn remove_after_stop_still_unregisters() {
    let h = Harness::started();
    h.scheduler
        .add_trigger("a", once_after(60_000), h.target("a"))
        .unwrap();
    h.scheduler.stop();

    h.scheduler.remove_trigger("a").unwrap();
    assert!(h.scheduler.is_empty());
}

#[test]
fn exhausted_trigger_stays_registered_but_unqueued() {
    let h = Harness::started();
    h.scheduler
        .add_trigger("thrice", CountdownTrigger::new(ms(10), 3), h.target("t"))
        .unwrap();

    assert!(h.wait_for_count("t", 3));
    std::thread::sleep(SETTLE);

    assert_eq!(h.log.count("t"), 3);
    assert!(h.scheduler.contains("thrice"));
    assert_eq!(h.scheduler.entries()[0].next_fire_time, None);
}

#[test]
fn removed_trigger_never_fires() {
    let h = Harness::new();
    h.scheduler
        .add_trigger("gone", once_after(30), h.target("gone"))
        .unwrap();
    h.scheduler
        .add_trigger("kept", once_after(60), h.target("kept"))
        .unwrap();
    h.scheduler.remove_trigger("gone").unwrap();
    h.scheduler.start().unwrap();

    assert!(h.wait_for_count("kept", 1));
    std::thread::sleep(SETTLE);
    assert_eq!(h.log.labels(), ["kept"]);
}

#[test]
fn unknown_names_are_not_found_and_change_nothing() {
    let h = Harness::new();
    h.scheduler
        .add_trigger("a", once_after(60_000), h.target("a"))
        .unwrap();
    let before = h.scheduler.entries();

    let removed = h.scheduler.remove_trigger("ghost").unwrap_err();
    assert!(matches!(removed, SchedulerError::NotFound(ref n) if n == "ghost"));
    assert_eq!(removed.to_string(), "trigger not found: ghost");

    let reset = h.scheduler.reset_trigger("ghost").unwrap_err();
    assert!(matches!(reset, SchedulerError::NotFound(_)));

    assert_eq!(h.scheduler.entries(), before);
}

#[test]
fn reset_requeues_without_double_firing() {
    let h = Harness::new();
    let trigger = CountdownTrigger::new(ms(40), 1);
    let resets = trigger.reset_counter();
    h.scheduler
        .add_trigger("once", trigger, h.target("once"))
        .unwrap();
    h.scheduler.reset_trigger("once").unwrap();
    h.scheduler.start().unwrap();

    assert!(h.wait_for_count("once", 1));
    std::thread::sleep(SETTLE);

    assert_eq!(h.log.count("once"), 1);
    assert_eq!(resets.load(Ordering::SeqCst), 1);
}

#[test]
fn reset_revives_an_exhausted_one_shot() {
    let h = Harness::started();
    h.scheduler
        .add_trigger("again", once_after(10), h.target("again"))
        .unwrap();
    assert!(h.wait_for_count("again", 1));
    assert!(wait_for(TIMEOUT, || h.scheduler.entries()[0]
        .next_fire_time
        .is_none()));

    h.scheduler.reset_trigger("again").unwrap();
    assert!(h.wait_for_count("again", 2));
}

#[test]
fn entries_report_next_fire_time_from_clock() {
    let rt = runtime();
    let clock = FakeClock::new();
    let scheduler = TimeScheduler::with_clock(
        Arc::new(TokioPool::new(rt.handle().clone())),
        clock.clone(),
        SchedulerConfig::new().with_name("test"),
    );
    let log = FiringLog::new();

    scheduler
        .add_trigger("ten", every(10_000), Arc::new(FakeTarget::new("t", &log)))
        .unwrap();
    clock.advance(ms(5_000));
    scheduler
        .add_trigger("five", once_after(1_000), Arc::new(FakeTarget::new("f", &log)))
        .unwrap();

    let entries = scheduler.entries();
    let start = FakeClock::START_EPOCH_MS;
    assert_eq!(entries[0].name, "five");
    assert_eq!(entries[0].next_fire_time, Some(start + 6_000));
    assert_eq!(entries[1].name, "ten");
    assert_eq!(entries[1].next_fire_time, Some(start + 10_000));
}

#[test]
fn dispose_forgets_entries_and_stops() {
    let h = Harness::started();
    h.scheduler
        .add_trigger("a", once_after(60_000), h.target("a"))
        .unwrap();
    h.scheduler
        .add_failure_listener(Arc::new(Recorder::default()));

    h.scheduler.dispose();

    assert!(h.scheduler.is_empty());
    assert_eq!(h.scheduler.state(), Lifecycle::Stopped);
}
