//! The open list shared by the priority-driven policies.
//!
//! A d-ary min-heap of `(rank, arrival, node)` entries plus a `node → slot`
//! index kept in sync on every swap, so a node's entry can be found and
//! improved in place instead of pushing a duplicate.

use std::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::space::Node;

type HeapIndex = usize;

const HEAP_ARITY: usize = 8usize;

/// The parent slot.
///
/// ```text
///  0
///  1 2 3 4 5 6 7 8
///  9..=16 17..=24 ...
/// ```
#[inline(always)]
#[must_use]
fn up(i: HeapIndex) -> HeapIndex {
    (i - 1) / HEAP_ARITY
}
/// The first child slot.
#[inline(always)]
#[must_use]
fn down_left(i: HeapIndex) -> HeapIndex {
    (HEAP_ARITY * i) + 1
}
/// The last child slot.
#[inline(always)]
#[must_use]
fn down_right(i: HeapIndex) -> HeapIndex {
    HEAP_ARITY * (i + 1)
}

/// What happened to a candidate offered to the frontier.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The node was not in the frontier.
    Inserted,
    /// The node was there with a worse rank and got re-ranked.
    Improved,
    /// The node was there with an equal or better rank.
    Ignored,
}

#[derive(Clone, Debug)]
pub struct FrontierEntry<N, R> {
    pub rank: R,
    /// Insertion stamp. Breaks ties between equal ranks, first come first served.
    pub arrival: u64,
    pub node: N,
}

impl<N, R: Ord> FrontierEntry<N, R> {
    #[inline(always)]
    fn before(&self, other: &Self) -> bool {
        (&self.rank, self.arrival) < (&other.rank, other.arrival)
    }
}

/// Priority-ordered frontier holding at most one entry per node.
#[derive(Debug)]
pub struct Frontier<N, R>
where
    N: Node,
    R: Ord + Copy + Debug,
{
    heap: Vec<FrontierEntry<N, R>>,
    /// Where each node currently sits in `heap`.
    ///
    /// ```pseudocode
    /// for (i, e) in self.heap.enumerate():
    ///   assert_eq(self.slots[e.node], i)
    /// ```
    slots: FxHashMap<N, HeapIndex>,
    arrivals: u64,
}

impl<N, R> Frontier<N, R>
where
    N: Node,
    R: Ord + Copy + Debug,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: vec![],
            slots: FxHashMap::default(),
            arrivals: 0,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    #[inline(always)]
    pub fn contains(&self, n: &N) -> bool {
        self.slots.contains_key(n)
    }
    pub fn rank_of(&self, n: &N) -> Option<R> {
        self.slots.get(n).map(|&i| self.heap[i].rank)
    }
    pub fn peek(&self) -> Option<(&N, R)> {
        self.heap.first().map(|e| (&e.node, e.rank))
    }

    #[cfg(feature = "inspect")]
    pub fn entries(&self) -> &[FrontierEntry<N, R>] {
        &self.heap
    }

    /// Offers `node` at `rank`.
    ///
    /// A node already in the frontier only moves when `rank` is strictly
    /// better; it then gets a fresh arrival stamp as if it was re-inserted.
    pub fn push_or_improve(&mut self, node: N, rank: R) -> Admission {
        #[cfg(feature = "coz_profile")]
        coz::scope!("FrontierPush");

        self.verify_heap();
        let arrival = self.arrivals;
        self.arrivals += 1;

        if let Some(&i) = self.slots.get(&node) {
            if rank >= self.heap[i].rank {
                return Admission::Ignored;
            }
            self.heap[i].rank = rank;
            self.heap[i].arrival = arrival;
            self._sift_up(i);
            self.verify_heap();
            return Admission::Improved;
        }

        let heap_index = self.heap.len(); // Future heap_index
        self.slots.insert(node.clone(), heap_index);
        self.heap.push(FrontierEntry {
            rank,
            arrival,
            node,
        });
        self._sift_up(heap_index);

        self.verify_heap();
        Admission::Inserted
    }

    /// Removes the best entry.
    pub fn pop(&mut self) -> Option<(N, R)> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("FrontierPop");

        self.verify_heap();
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        if last != 0 {
            self._swap(0, last);
        }
        let entry = self.heap.pop()?;
        self.slots.remove(&entry.node);
        if !self.heap.is_empty() {
            self._sift_down(0);
        }

        self.verify_heap();
        Some((entry.node, entry.rank))
    }

    /// Keeps only the `k` best entries, returning how many were dropped.
    pub fn retain_best(&mut self, k: usize) -> usize {
        if self.heap.len() <= k {
            return 0;
        }

        let mut entries = std::mem::take(&mut self.heap);
        entries.sort_by(|a, b| (&a.rank, a.arrival).cmp(&(&b.rank, b.arrival)));
        let dropped = entries.len() - k;
        for e in entries.drain(k..) {
            self.slots.remove(&e.node);
        }

        // A sorted array is already a heap.
        for (i, e) in entries.iter().enumerate() {
            self.slots.insert(e.node.clone(), i);
        }
        self.heap = entries;

        self.verify_heap();
        dropped
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        // All good... (hopefully)
    }

    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        debug_assert_eq!(self.heap.len(), self.slots.len());
        // Every entry,
        for (i, e) in self.heap.iter().enumerate() {
            // - Has the right slot recorded.
            debug_assert_eq!(self.slots.get(&e.node), Some(&i));

            // - Goes after its parent entry, if any.
            if i == 0 {
                continue;
            }
            let p = up(i);
            debug_assert!(
                !e.before(&self.heap[p]),
                "Entry[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={}",
                self.heap[p],
                e,
                self.heap.len(),
            );
        }
    }

    // Implementation details

    /// Index of the best child of `i`, if `i` has children.
    #[inline(always)]
    fn best_child(&self, i: HeapIndex) -> Option<HeapIndex> {
        let first = down_left(i);
        let len = self.heap.len();
        if first >= len {
            return None;
        }
        let last = std::cmp::min(down_right(i), len - 1);
        let mut best = first;
        for c in (first + 1)..=last {
            if self.heap[c].before(&self.heap[best]) {
                best = c;
            }
        }
        Some(best)
    }

    /// Raises an entry.
    /// Returns its new index.
    fn _sift_up(&mut self, index: HeapIndex) -> HeapIndex {
        debug_assert!(index < self.heap.len(), "Index out of bounds...");

        let mut pos = index;
        while pos != 0 {
            let parent = up(pos);
            if !self.heap[pos].before(&self.heap[parent]) {
                break;
            }
            self._swap(parent, pos);
            pos = parent;
        }
        pos
    }

    /// Lowers an entry.
    /// Returns its new index.
    fn _sift_down(&mut self, mut index: HeapIndex) -> HeapIndex {
        debug_assert!(index < self.heap.len(), "Index out of bounds...");

        while let Some(child) = self.best_child(index) {
            if !self.heap[child].before(&self.heap[index]) {
                break;
            }
            self._swap(index, child);
            index = child;
        }
        index
    }

    /// Swaps two entries keeping `slots` in sync.
    ///
    /// For consistency in calling code `l < r` is checked.
    #[inline(always)]
    fn _swap(&mut self, l: HeapIndex, r: HeapIndex) {
        debug_assert!(l < r, "Swap({l}, {r}) uses wrong argument order");

        self.heap.swap(l, r);
        if let Some(slot) = self.slots.get_mut(&self.heap[l].node) {
            *slot = l;
        }
        if let Some(slot) = self.slots.get_mut(&self.heap[r].node) {
            *slot = r;
        }
    }
}

impl<N, R> Default for Frontier<N, R>
where
    N: Node,
    R: Ord + Copy + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontier_works() {
        let mut frontier = Frontier::<&str, u32>::new();

        assert_eq!(frontier.push_or_improve("aoeu", 3), Admission::Inserted);
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.pop(), Some(("aoeu", 3)));
        assert!(frontier.is_empty());
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn frontier_sorts() {
        let mut frontier = Frontier::<String, u32>::new();

        // Enough entries to fill more than one level of an 8-ary heap.
        for (i, name) in "qwertyuiopasdfghjklzxcvbnm".chars().enumerate() {
            frontier.push_or_improve(name.to_string(), (name as u32) * 2 + (i as u32 % 2));
        }

        let mut popped = vec![];
        while let Some((n, _)) = frontier.pop() {
            popped.push(n);
        }
        let expected: Vec<String> = ('a'..='z').map(|c| c.to_string()).collect();
        assert_eq!(popped, expected);
    }

    #[test]
    fn ties_go_by_arrival() {
        let mut frontier = Frontier::<char, u32>::new();
        for c in ['d', 'b', 'a', 'c'] {
            frontier.push_or_improve(c, 1);
        }
        frontier.push_or_improve('z', 0);

        let order: Vec<char> = std::iter::from_fn(|| frontier.pop().map(|(n, _)| n)).collect();
        assert_eq!(order, vec!['z', 'd', 'b', 'a', 'c']);
    }

    #[test]
    fn improving_in_place() {
        let mut frontier = Frontier::<char, u32>::new();
        frontier.push_or_improve('a', 5);
        frontier.push_or_improve('b', 3);

        assert_eq!(frontier.push_or_improve('a', 7), Admission::Ignored);
        assert_eq!(frontier.push_or_improve('a', 5), Admission::Ignored);
        assert_eq!(frontier.rank_of(&'a'), Some(5));

        assert_eq!(frontier.push_or_improve('a', 1), Admission::Improved);
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.peek(), Some((&'a', 1)));
        assert_eq!(frontier.pop(), Some(('a', 1)));
        assert_eq!(frontier.pop(), Some(('b', 3)));
    }

    #[test]
    fn improved_entries_queue_behind_equal_ranks() {
        let mut frontier = Frontier::<char, u32>::new();
        frontier.push_or_improve('a', 9);
        frontier.push_or_improve('b', 2);
        frontier.push_or_improve('a', 2);

        assert_eq!(frontier.pop(), Some(('b', 2)));
        assert_eq!(frontier.pop(), Some(('a', 2)));
    }

    #[test]
    fn retain_best() {
        let mut frontier = Frontier::<u32, u32>::new();
        for n in [7, 3, 9, 1, 5, 8] {
            frontier.push_or_improve(n, n * 10);
        }

        assert_eq!(frontier.retain_best(10), 0);
        assert_eq!(frontier.retain_best(3), 3);
        assert_eq!(frontier.len(), 3);
        assert!(!frontier.contains(&9));
        assert!(frontier.contains(&5));

        // Still a working heap afterwards.
        frontier.push_or_improve(0, 0);
        let order: Vec<u32> = std::iter::from_fn(|| frontier.pop().map(|(n, _)| n)).collect();
        assert_eq!(order, vec![0, 1, 3, 5]);
    }
}
