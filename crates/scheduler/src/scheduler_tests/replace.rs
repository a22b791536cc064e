// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    replacement_is_earlier = { 50, 10 },
    replacement_is_later   = { 10, 50 },
)]
fn only_the_replacement_fires(first_ms: u64, second_ms: u64) {
    let h = Harness::new();
    h.scheduler
        .add_trigger("x", once_after(first_ms), h.target("C"))
        .unwrap();
    h.scheduler
        .add_trigger("x", once_after(second_ms), h.target("D"))
        .unwrap();
    assert_eq!(h.scheduler.len(), 1);

    h.scheduler.start().unwrap();
    assert!(h.wait_for_count("D", 1));
    std::thread::sleep(SETTLE);

    assert_eq!(h.log.labels(), ["D"]);
}

#[test]
fn replacing_a_running_periodic_entry() {
    let h = Harness::started();
    h.scheduler
        .add_trigger("x", every(15), h.target("old"))
        .unwrap();
    assert!(h.wait_for_count("old", 1));

    h.scheduler
        .add_trigger("x", every(15), h.target("new"))
        .unwrap();
    std::thread::sleep(ms(20));
    let old_count = h.log.count("old");

    assert!(h.wait_for_count("new", 3));
    assert_eq!(h.log.count("old"), old_count);
}

#[test]
fn replacement_summary_reflects_new_trigger() {
    let h = Harness::new();
    h.scheduler
        .add_trigger("x", once_after(10), h.target("C"))
        .unwrap();
    h.scheduler
        .add_trigger("x", every(1_000), h.target("D"))
        .unwrap();

    let entries = h.scheduler.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].trigger.contains("period: Some(1s)"));
}
