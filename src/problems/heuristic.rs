use rustc_hash::FxHashMap;

use crate::cost::Cost;
use crate::space::Heuristic;
use crate::space::Node;

/// Per-node estimates, as written down next to a textbook graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeuristicTable<N, C>
where
    N: Node,
    C: Cost,
{
    values: FxHashMap<N, C>,
}

impl<N, C> HeuristicTable<N, C>
where
    N: Node,
    C: Cost,
{
    pub fn new() -> Self {
        Self {
            values: FxHashMap::default(),
        }
    }

    /// Sets the estimate for `n`, returning the previous one.
    pub fn insert(&mut self, n: N, h: C) -> Option<C> {
        self.values.insert(n, h)
    }
    pub fn get(&self, n: &N) -> Option<C> {
        self.values.get(n).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<N, C> Default for HeuristicTable<N, C>
where
    N: Node,
    C: Cost,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, C> FromIterator<(N, C)> for HeuristicTable<N, C>
where
    N: Node,
    C: Cost,
{
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<N, C> Heuristic<N, C> for HeuristicTable<N, C>
where
    N: Node,
    C: Cost,
{
    #[inline(always)]
    fn h(&self, n: &N) -> Option<C> {
        self.get(n)
    }
}

/// `h = 0` everywhere. Turns A* into uniform-cost search.
#[derive(Copy, Clone, Debug, Default)]
pub struct ZeroHeuristic;

impl<N, C> Heuristic<N, C> for ZeroHeuristic
where
    N: Node,
    C: Cost,
{
    #[inline(always)]
    fn h(&self, _n: &N) -> Option<C> {
        Some(C::zero())
    }
}
