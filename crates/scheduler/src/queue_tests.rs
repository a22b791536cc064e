// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[test]
fn empty_queue_reports_empty() {
    let mut queue: PriorityQueue<u64> = PriorityQueue::new();
    assert!(queue.is_empty());
    assert_eq!(queue.peek(), Err(QueueError::Empty));
    assert_eq!(queue.pop(), Err(QueueError::Empty));
}

#[test]
fn peek_yields_earliest_without_removing() {
    let mut queue = PriorityQueue::new();
    queue.insert(50);
    queue.insert(10);
    queue.insert(30);

    assert_eq!(queue.peek(), Ok(&10));
    assert_eq!(queue.len(), 3);
}

#[test]
fn clear_empties_queue() {
    let mut queue = PriorityQueue::new();
    queue.insert(1);
    queue.insert(2);
    queue.clear();
    assert!(queue.is_empty());
    assert_eq!(queue.pop(), Err(QueueError::Empty));
}

proptest! {
    #[test]
    fn pops_in_nondecreasing_order(items in proptest::collection::vec(any::<u64>(), 0..200)) {
        let mut queue = PriorityQueue::new();
        for item in &items {
            queue.insert(*item);
        }

        let mut popped = Vec::with_capacity(items.len());
        while let Ok(item) = queue.pop() {
            popped.push(item);
        }

        let mut expected = items.clone();
        expected.sort_unstable();
        prop_assert_eq!(popped, expected);
    }
}
