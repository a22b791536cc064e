// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Instant;

#[test]
fn earlier_one_shot_fires_first() {
    let h = Harness::new();
    h.scheduler
        .add_trigger("A", once_after(50), h.target("A"))
        .unwrap();
    h.scheduler
        .add_trigger("B", once_after(10), h.target("B"))
        .unwrap();
    h.scheduler.start().unwrap();

    assert!(wait_for(TIMEOUT, || h.log.len() == 2));
    std::thread::sleep(SETTLE);
    assert_eq!(h.log.labels(), ["B", "A"]);
}

#[test]
fn firings_follow_fire_time_order() {
    let h = Harness::new();
    for (label, delay) in [("d", 120), ("a", 30), ("e", 150), ("c", 90), ("b", 60)] {
        h.scheduler
            .add_trigger(label, once_after(delay), h.target(label))
            .unwrap();
    }
    h.scheduler.start().unwrap();

    assert!(wait_for(TIMEOUT, || h.log.len() == 5));
    assert_eq!(h.log.labels(), ["a", "b", "c", "d", "e"]);
}

#[test]
fn nothing_fires_before_it_is_due() {
    let h = Harness::started();
    let added = Instant::now();
    h.scheduler
        .add_trigger("later", once_after(80), h.target("later"))
        .unwrap();

    assert!(h.wait_for_count("later", 1));
    let firing = &h.log.firings()[0];
    assert!(firing.at.duration_since(added) >= ms(80));
    assert_eq!(firing.name, "later");
}

#[test]
fn earlier_insert_wakes_sleeping_loop() {
    let h = Harness::started();
    h.scheduler
        .add_trigger("late", once_after(60_000), h.target("late"))
        .unwrap();
    // Let the loop settle into its long wait.
    std::thread::sleep(ms(30));

    let added = Instant::now();
    h.scheduler
        .add_trigger("early", once_after(20), h.target("early"))
        .unwrap();

    assert!(h.wait_for_count("early", 1));
    assert!(added.elapsed() < ms(1_000));
    assert_eq!(h.log.count("late"), 0);
}

#[test]
fn idle_loop_wakes_on_first_trigger() {
    let h = Harness::started();
    std::thread::sleep(ms(30));

    h.scheduler
        .add_trigger("first", once_after(10), h.target("first"))
        .unwrap();

    assert!(h.wait_for_count("first", 1));
}

#[test]
fn periodic_trigger_keeps_firing() {
    let h = Harness::started();
    h.scheduler
        .add_trigger("tick", every(20), h.target("tick"))
        .unwrap();

    assert!(h.wait_for_count("tick", 3));
    assert!(h.scheduler.contains("tick"));
}
