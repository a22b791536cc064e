// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Min-heap priority queue

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("priority queue is empty")]
    Empty,
}

/// Priority queue whose top is the smallest element.
///
/// Elements that compare equal come out in unspecified order.
#[derive(Debug)]
pub struct PriorityQueue<T: Ord> {
    heap: BinaryHeap<Reverse<T>>,
}

impl<T: Ord> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn insert(&mut self, item: T) {
        self.heap.push(Reverse(item));
    }

    /// Smallest element, left in place.
    pub fn peek(&self) -> Result<&T, QueueError> {
        self.heap
            .peek()
            .map(|Reverse(item)| item)
            .ok_or(QueueError::Empty)
    }

    /// Remove and return the smallest element.
    pub fn pop(&mut self) -> Result<T, QueueError> {
        self.heap
            .pop()
            .map(|Reverse(item)| item)
            .ok_or(QueueError::Empty)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
