//! The traversal skeleton shared by every policy.

use std::collections::VecDeque;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::algorithms::error::HeuristicFault;
use crate::algorithms::error::SearchError;
use crate::algorithms::outcome::SearchOutcome;
use crate::algorithms::outcome::SearchStats;
use crate::algorithms::outcome::Termination;
use crate::algorithms::policy::Policy;
use crate::algorithms::policy::Rank;
use crate::algorithms::policy::SearchConfig;
use crate::cost::Cost;
use crate::frontier::Admission;
use crate::frontier::Frontier;
use crate::space::Graph;
use crate::space::Heuristic;
use crate::space::Node;
use crate::space::Path;

/// Placeholder heuristic for engines built without one.
///
/// Never has an estimate, so heuristic-guided policies fail with
/// `SearchError::MissingHeuristic` before looking at it.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoHeuristic;

impl<N, C> Heuristic<N, C> for NoHeuristic
where
    N: Node,
    C: Cost,
{
    fn h(&self, _n: &N) -> Option<C> {
        None
    }
}

/// Runs `policy` from `start` to `goal`.
///
/// Uses the policy's default step limit, see `SearchConfig::new`.
pub fn search<G, H, N, C>(
    graph: &G,
    heuristic: Option<&H>,
    start: &N,
    goal: &N,
    policy: Policy,
) -> Result<SearchOutcome<N, C>, SearchError<N>>
where
    G: Graph<N, C>,
    H: Heuristic<N, C>,
    N: Node,
    C: Cost,
{
    SearchEngine {
        graph,
        heuristic,
        config: SearchConfig::new(policy),
        _phantom_node: PhantomData,
        _phantom_cost: PhantomData,
    }
    .run(start, goal)
}

/// A reusable search setup over borrowed inputs.
///
/// The engine holds no per-run state, every `run` starts from scratch, so it
/// can be shared across threads whenever the graph and heuristic can.
#[derive(Debug)]
pub struct SearchEngine<'a, G, H, N, C>
where
    G: Graph<N, C>,
    H: Heuristic<N, C>,
    N: Node,
    C: Cost,
{
    graph: &'a G,
    heuristic: Option<&'a H>,
    config: SearchConfig,

    _phantom_node: PhantomData<N>,
    _phantom_cost: PhantomData<C>,
}

impl<'a, G, N, C> SearchEngine<'a, G, NoHeuristic, N, C>
where
    G: Graph<N, C>,
    N: Node,
    C: Cost,
{
    #[must_use]
    pub fn new(graph: &'a G, config: impl Into<SearchConfig>) -> Self {
        Self {
            graph,
            heuristic: None,
            config: config.into(),
            _phantom_node: PhantomData,
            _phantom_cost: PhantomData,
        }
    }
}

impl<'a, G, H, N, C> SearchEngine<'a, G, H, N, C>
where
    G: Graph<N, C>,
    H: Heuristic<N, C>,
    N: Node,
    C: Cost,
{
    #[must_use]
    pub fn with_heuristic<H2>(self, heuristic: &'a H2) -> SearchEngine<'a, G, H2, N, C>
    where
        H2: Heuristic<N, C>,
    {
        SearchEngine {
            graph: self.graph,
            heuristic: Some(heuristic),
            config: self.config,
            _phantom_node: PhantomData,
            _phantom_cost: PhantomData,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches from `start` until `goal` is taken off the frontier.
    ///
    /// Running out of frontier is not an error: the outcome then has no path
    /// and lists every visited node.
    pub fn run(&self, start: &N, goal: &N) -> Result<SearchOutcome<N, C>, SearchError<N>> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("Search");

        let policy = self.config.policy;
        for n in [start, goal] {
            if !self.graph.contains(n) {
                return Err(SearchError::UnknownNode { node: n.clone() });
            }
        }
        if let Policy::Beam { width: 0 } = policy {
            return Err(SearchError::InvalidBeamWidth { width: 0 });
        }
        if policy.needs_heuristic() && self.heuristic.is_none() {
            return Err(SearchError::MissingHeuristic { policy });
        }

        log::debug!("Searching {start:?} → {goal:?} with {policy}");
        let mut run = Run::<N, C>::new(policy);
        self.seed(&mut run, start)?;

        let termination = loop {
            let Some((node, rank)) = run.pop() else {
                break Termination::FrontierExhausted;
            };
            log::trace!("Visiting {node:?} ({rank:?})");
            run.visited.push(node.clone());

            if node == *goal {
                break Termination::GoalReached;
            }
            if let Some(max_steps) = self.config.max_steps {
                if run.stats.expansions >= max_steps {
                    log::warn!("Giving up after {max_steps} expansions");
                    break Termination::StepLimit;
                }
            }

            self.expand(&mut run, node, rank)?;
            run.stats.expansions += 1;
            run.stats.max_frontier = std::cmp::max(run.stats.max_frontier, run.len());
        };

        let path = match termination {
            Termination::GoalReached if policy.reconstructs_path() => Some(run.path_to(goal)),
            _ => None,
        };
        log::debug!(
            "Search {start:?} → {goal:?} with {policy}: {termination} after {} expansions",
            run.stats.expansions
        );

        Ok(SearchOutcome {
            policy,
            path,
            visited: run.visited,
            termination,
            stats: run.stats,
        })
    }

    /// A validated heuristic estimate.
    fn h(&self, n: &N) -> Result<C, SearchError<N>> {
        let heuristic = self.heuristic.ok_or(SearchError::MissingHeuristic {
            policy: self.config.policy,
        })?;
        let fault = |fault| SearchError::InvalidHeuristic {
            node: n.clone(),
            fault,
        };

        let h = heuristic.h(n).ok_or_else(|| fault(HeuristicFault::Missing))?;
        if !h.valid() {
            return Err(fault(HeuristicFault::NonFinite));
        }
        if !h.is_non_negative() {
            return Err(fault(HeuristicFault::Negative));
        }
        Ok(h)
    }

    /// Expands a node into validated `(neighbour, weight)` pairs.
    fn neighbours(&self, n: &N) -> Result<Vec<(N, C)>, SearchError<N>> {
        let neighbours = self.graph.neighbours(n);
        for (m, w) in &neighbours {
            if !w.valid() || !w.is_non_negative() {
                return Err(SearchError::InvalidWeight {
                    from: n.clone(),
                    to: m.clone(),
                });
            }
        }
        Ok(neighbours)
    }

    /// `g + w`, failing once the sum reaches the unreachable bound.
    fn extend(from: &N, to: &N, g: C, w: C) -> Result<C, SearchError<N>> {
        let sum = g.saturating_add(&w);
        if !sum.valid() {
            return Err(SearchError::CostOverflow {
                from: from.clone(),
                to: to.clone(),
            });
        }
        Ok(sum)
    }

    fn seed(&self, run: &mut Run<N, C>, start: &N) -> Result<(), SearchError<N>> {
        match self.config.policy {
            Policy::AStar => {
                let h = self.h(start)?;
                run.g.insert(start.clone(), C::zero());
                run.offer(start.clone(), Rank::a_star(C::zero(), h));
            }
            Policy::GreedyBestFirst => {
                let h = self.h(start)?;
                run.offer(start.clone(), Rank::greedy(h));
            }
            Policy::Beam { .. } => {
                run.offer(start.clone(), Rank::beam(C::zero()));
            }
            Policy::HillClimbing => {
                run.queue.push_back(start.clone());
                run.stats.pushes += 1;
            }
        }
        Ok(())
    }

    fn expand(&self, run: &mut Run<N, C>, node: N, rank: Option<Rank<C>>) -> Result<(), SearchError<N>> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("NodeExpansion");

        let neighbours = self.neighbours(&node)?;
        if self.config.policy.tracks_closed() {
            run.closed.insert(node.clone());
        }

        match self.config.policy {
            Policy::AStar => {
                let g = run.g.get(&node).copied().unwrap_or_else(C::zero);
                for (n, w) in neighbours {
                    if run.closed.contains(&n) {
                        continue;
                    }
                    let h = self.h(&n)?;
                    let new_g = Self::extend(&node, &n, g, w)?;
                    let rank = Rank::a_star(new_g, h);
                    if !rank.key.valid() {
                        return Err(SearchError::CostOverflow { from: node, to: n });
                    }
                    if run.g.get(&n).is_none_or(|&known| new_g < known) {
                        // Found a better path to this node
                        run.g.insert(n.clone(), new_g);
                        run.came_from.insert(n.clone(), node.clone());
                        run.offer(n, rank);
                    }
                }
            }
            Policy::GreedyBestFirst => {
                for (n, _w) in neighbours {
                    if run.closed.contains(&n) {
                        continue;
                    }
                    let h = self.h(&n)?;
                    run.offer(n, Rank::greedy(h));
                }
            }
            Policy::Beam { width } => {
                let g = rank.map_or_else(C::zero, |r| r.key);
                for (n, w) in neighbours {
                    if run.closed.contains(&n) {
                        continue;
                    }
                    let new_g = Self::extend(&node, &n, g, w)?;
                    run.offer(n, Rank::beam(new_g));
                }
                run.stats.dropped += run.frontier.retain_best(width);
            }
            Policy::HillClimbing => {
                // Sorted by (h, enumeration order), then put ahead of the queue.
                let mut candidates = SmallVec::<[(C, usize, N); 8]>::new();
                for (i, (n, _w)) in neighbours.into_iter().enumerate() {
                    candidates.push((self.h(&n)?, i, n));
                }
                candidates.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
                for (_h, _i, n) in candidates.into_iter().rev() {
                    run.queue.push_front(n);
                    run.stats.pushes += 1;
                }
            }
        }
        Ok(())
    }
}

/// Per-run bookkeeping. Dropped when the run ends.
struct Run<N, C>
where
    N: Node,
    C: Cost,
{
    policy: Policy,
    /// Open list of the ranked policies.
    frontier: Frontier<N, Rank<C>>,
    /// Open list of hill-climbing.
    queue: VecDeque<N>,
    closed: FxHashSet<N>,
    /// Best known cost from the start.
    g: FxHashMap<N, C>,
    came_from: FxHashMap<N, N>,
    visited: Vec<N>,
    stats: SearchStats,
}

impl<N, C> Run<N, C>
where
    N: Node,
    C: Cost,
{
    fn new(policy: Policy) -> Self {
        Self {
            policy,
            frontier: Frontier::new(),
            queue: VecDeque::new(),
            closed: FxHashSet::default(),
            g: FxHashMap::default(),
            came_from: FxHashMap::default(),
            visited: vec![],
            stats: SearchStats::default(),
        }
    }

    fn len(&self) -> usize {
        match self.policy {
            Policy::HillClimbing => self.queue.len(),
            _ => self.frontier.len(),
        }
    }

    fn pop(&mut self) -> Option<(N, Option<Rank<C>>)> {
        match self.policy {
            Policy::HillClimbing => self.queue.pop_front().map(|n| (n, None)),
            _ => self.frontier.pop().map(|(n, r)| (n, Some(r))),
        }
    }

    fn offer(&mut self, n: N, rank: Rank<C>) {
        match self.frontier.push_or_improve(n, rank) {
            Admission::Inserted => self.stats.pushes += 1,
            Admission::Improved => self.stats.improvements += 1,
            Admission::Ignored => {}
        }
    }

    /// Follows predecessors back from `goal`.
    ///
    /// Each predecessor was closed before its successor, so the chain ends at
    /// the start.
    fn path_to(&self, goal: &N) -> Path<N, C> {
        let mut nodes = vec![goal.clone()];
        let mut current = goal;
        while let Some(parent) = self.came_from.get(current) {
            debug_assert!(nodes.len() <= self.came_from.len());
            nodes.push(parent.clone());
            current = parent;
        }
        nodes.reverse();

        Path {
            nodes,
            cost: self.g.get(goal).copied().unwrap_or_else(C::zero),
        }
    }
}
