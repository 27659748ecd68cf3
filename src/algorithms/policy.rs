use derive_more::Display;

use crate::cost::Cost;

/// Hill-climbing keeps no closed set and may cycle, so it always gets a limit.
pub const HILL_CLIMBING_MAX_STEPS: usize = 10_000;

/// How candidates are ranked and admitted to the frontier.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Rank by `g + h`, improve entries on cheaper paths, reconstruct the path.
    ///
    /// Expanded nodes are never reopened, so the path is only guaranteed to be
    /// cheapest when the heuristic is consistent (`h(a) <= w(a, b) + h(b)`).
    /// An admissible but inconsistent heuristic may give a costlier path.
    #[display("A*")]
    AStar,
    /// Rank by `h` alone.
    #[display("greedy best-first")]
    GreedyBestFirst,
    /// Sort each node's neighbours by `h` and put them ahead of the queue.
    #[display("hill-climbing")]
    HillClimbing,
    /// Rank by accumulated edge weight, keep only the `width` best candidates.
    #[display("beam(width={width})")]
    Beam { width: usize },
}

impl Policy {
    pub fn needs_heuristic(&self) -> bool {
        !matches!(self, Policy::Beam { .. })
    }

    /// Whether expanded nodes are final.
    pub fn tracks_closed(&self) -> bool {
        !matches!(self, Policy::HillClimbing)
    }

    pub fn reconstructs_path(&self) -> bool {
        matches!(self, Policy::AStar)
    }

    pub fn default_max_steps(&self) -> Option<usize> {
        match self {
            Policy::HillClimbing => Some(HILL_CLIMBING_MAX_STEPS),
            _ => None,
        }
    }
}

/// Engine configuration for a single run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub policy: Policy,
    /// Maximum number of expansions before giving up.
    pub max_steps: Option<usize>,
}

impl SearchConfig {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            max_steps: policy.default_max_steps(),
        }
    }

    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }
}

impl From<Policy> for SearchConfig {
    fn from(policy: Policy) -> Self {
        Self::new(policy)
    }
}

/// The ranking tuple of a frontier entry.
///
/// Entries are ordered by `key`, then by `tie`. Arrival order settles whatever
/// is left (see `Frontier`).
///
/// For A* the key is `f = g + h` and ties prefer lower `h`, which keeps the raw
/// `h` around for free.
///
/// ```
/// use informed_search::algorithms::Rank;
///
/// // Same f, the entry closer to the goal goes first.
/// assert!(Rank::a_star(3u32, 1) < Rank::a_star(1u32, 3));
/// assert!(Rank::greedy(1u32) < Rank::greedy(2));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rank<C: Cost> {
    pub key: C,
    pub tie: C,
}

impl<C> Rank<C>
where
    C: Cost,
{
    pub fn a_star(g: C, h: C) -> Self {
        Self {
            key: g.saturating_add(&h),
            tie: h,
        }
    }
    pub fn greedy(h: C) -> Self {
        Self {
            key: h,
            tie: C::zero(),
        }
    }
    pub fn beam(g: C) -> Self {
        Self {
            key: g,
            tie: C::zero(),
        }
    }
}
