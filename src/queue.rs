//! Stable min-priority queue used while building Huffman trees.
//!
//! Unlike [`std::collections::BinaryHeap`], equal weights come out in the
//! order they went in. Encoder and decoder both rely on that to grow the
//! same tree from the same counts.

use std::collections::VecDeque;

use crate::error::{Error, Result};

/// Anything with a weight the queue can order by.
pub trait Weighted {
    /// Ordering key; lower comes out first.
    fn weight(&self) -> u64;
}

/// Sorted queue with FIFO tie-breaking.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    items: VecDeque<T>,
}

impl<T: Weighted> PriorityQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Insert a node after every queued node of lower or equal weight.
    ///
    /// Accepts either a node or an `Option`; `None` is rejected.
    ///
    /// # Errors
    /// Returns `Error::InvalidArgument` if `node` is `None`.
    pub fn insert(&mut self, node: impl Into<Option<T>>) -> Result<()> {
        let node = node
            .into()
            .ok_or(Error::InvalidArgument("cannot enqueue an absent node"))?;
        self.push(node);
        Ok(())
    }

    /// Infallible form of [`PriorityQueue::insert`] for a present node.
    pub fn push(&mut self, node: T) {
        let w = node.weight();
        let idx = self.items.partition_point(|item| item.weight() <= w);
        self.items.insert(idx, node);
    }

    /// Insert `node` and remove the lowest-weight node in one step.
    ///
    /// Same result as `push` followed by `extract_min`, but never empty.
    pub fn push_pop(&mut self, node: T) -> T {
        match self.items.pop_front() {
            Some(front) if front.weight() <= node.weight() => {
                self.push(node);
                front
            }
            Some(front) => {
                self.items.push_front(front);
                node
            }
            None => node,
        }
    }

    /// Remove and return the lowest-weight node, or `None` if empty.
    pub fn extract_min(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// The node `extract_min` would return next.
    pub fn peek_min(&self) -> Option<&T> {
        self.items.front()
    }

    /// Number of queued nodes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no nodes are queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Weighted> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
