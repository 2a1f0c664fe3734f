//! Node-index containers deciding the visiting order of a traversal.

use std::cmp::Ordering;
use std::collections::VecDeque;

/// Pending nodes of a traversal.
pub(crate) trait NodeQueue {
    /// Whether edges of a popped node are walked back to front.
    const REVERSE: bool;

    fn push(&mut self, node: usize);

    fn pop(&mut self) -> Option<usize>;
}

/// First in, first out: breadth-first order.
#[derive(Debug, Default)]
pub(crate) struct Fifo(VecDeque<usize>);

impl NodeQueue for Fifo {
    const REVERSE: bool = false;

    #[inline]
    fn push(&mut self, node: usize) {
        self.0.push_back(node);
    }

    #[inline]
    fn pop(&mut self) -> Option<usize> {
        self.0.pop_front()
    }
}

/// Last in, first out: depth-first order.
#[derive(Debug, Default)]
pub(crate) struct Lifo(Vec<usize>);

impl NodeQueue for Lifo {
    const REVERSE: bool = true;

    #[inline]
    fn push(&mut self, node: usize) {
        self.0.push(node);
    }

    #[inline]
    fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }
}

/// Binary max-heap of node indices keyed by `compare`.
///
/// The node whose key compares greatest pops first; among equal keys the lower index wins,
/// so the order is deterministic.
pub(crate) struct PriorityQueue<C> {
    data: Vec<usize>,
    compare: C,
}

impl<C> PriorityQueue<C>
where
    C: Fn(usize, usize) -> Ordering,
{
    pub(crate) fn new(compare: C) -> Self {
        Self {
            data: Vec::new(),
            compare,
        }
    }

    fn less(&self, a: usize, b: usize) -> bool {
        let (x, y) = (self.data[a], self.data[b]);
        (self.compare)(x, y).then_with(|| y.cmp(&x)) == Ordering::Less
    }

    fn sift_up(&mut self, mut node: usize) {
        while node > 0 {
            let parent = (node - 1) / 2;
            if !self.less(parent, node) {
                break;
            }
            self.data.swap(parent, node);
            node = parent;
        }
    }

    fn sift_down(&mut self, mut node: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * node + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let greater = if right < len && self.less(left, right) { right } else { left };
            if !self.less(node, greater) {
                break;
            }
            self.data.swap(node, greater);
            node = greater;
        }
    }
}

impl<C> NodeQueue for PriorityQueue<C>
where
    C: Fn(usize, usize) -> Ordering,
{
    const REVERSE: bool = false;

    fn push(&mut self, node: usize) {
        self.data.push(node);
        self.sift_up(self.data.len() - 1);
    }

    fn pop(&mut self) -> Option<usize> {
        let last = self.data.len().checked_sub(1)?;
        self.data.swap(0, last);
        let top = self.data.pop();
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        top
    }
}
