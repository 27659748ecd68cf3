use std::fmt::Debug;
use std::hash::Hash;

use crate::cost::Cost;

/// An opaque node identifier.
pub trait Node: Clone + Debug + Eq + Hash {}
impl<T> Node for T where T: Clone + Debug + Eq + Hash {}

/// A graph the search can walk.
///
/// Graphs are read-only during a search, and `neighbours` must enumerate in a
/// stable order so searches are reproducible.
pub trait Graph<N, C>
where
    N: Node,
    C: Cost,
{
    /// Whether `n` is part of this graph.
    fn contains(&self, n: &N) -> bool;

    /// Expands a node into `(neighbour, edge weight)` pairs.
    // TODO: Offer a SmallVec<[(N, C); 8]> once maze expansion shows up in profiles.
    fn neighbours(&self, n: &N) -> Vec<(N, C)>;

    /// Number of nodes, when known upfront.
    fn size(&self) -> Option<usize> {
        None
    }
}

/// An estimate of the remaining cost to the goal.
///
/// `None` means the source has no estimate for the node, which the search
/// reports as a configuration error.
pub trait Heuristic<N, C>
where
    N: Node,
    C: Cost,
{
    fn h(&self, n: &N) -> Option<C>;
}

impl<N, C, F> Heuristic<N, C> for F
where
    N: Node,
    C: Cost,
    F: Fn(&N) -> Option<C>,
{
    #[inline(always)]
    fn h(&self, n: &N) -> Option<C> {
        self(n)
    }
}

/// A start→goal path and its accumulated edge cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<N, C>
where
    N: Node,
    C: Cost,
{
    pub nodes: Vec<N>,
    pub cost: C,
}

impl<N, C> Path<N, C>
where
    N: Node,
    C: Cost,
{
    #[inline(always)]
    pub fn new_from_start(start: N) -> Self {
        Self {
            nodes: vec![start],
            cost: C::zero(),
        }
    }

    pub fn start(&self) -> Option<&N> {
        self.nodes.first()
    }
    pub fn end(&self) -> Option<&N> {
        self.nodes.last()
    }

    /// Number of edges along the path.
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks every step is an edge of `graph` and the cost adds up.
    pub fn valid_in<G: Graph<N, C>>(&self, graph: &G) -> bool {
        let mut cost = C::zero();
        for step in self.nodes.windows(2) {
            let (from, to) = (&step[0], &step[1]);
            match graph.neighbours(from).into_iter().find(|(n, _)| n == to) {
                Some((_, w)) => cost = cost.saturating_add(&w),
                None => return false,
            }
        }
        !self.nodes.is_empty() && cost == self.cost
    }
}

impl<N, C> std::fmt::Display for Path<N, C>
where
    N: Node,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Path({}, ", self.cost)?;
        for (i, n) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, " → ")?;
            }
            write!(f, "{n:?}")?;
        }
        write!(f, ")")
    }
}
