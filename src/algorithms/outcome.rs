use derive_more::Display;
use thousands::Separable;

use crate::algorithms::policy::Policy;
use crate::cost::Cost;
use crate::space::Node;
use crate::space::Path;

/// How a search ended.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Termination {
    #[display("goal reached")]
    GoalReached,
    /// The goal is not reachable (or was pruned away by the beam).
    #[display("frontier exhausted")]
    FrontierExhausted,
    #[display("step limit reached")]
    StepLimit,
}

/// Counters collected during a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub expansions: usize,
    /// New frontier entries.
    pub pushes: usize,
    /// Frontier entries re-ranked in place.
    pub improvements: usize,
    /// Frontier entries dropped by beam truncation.
    pub dropped: usize,
    /// Largest frontier observed right after an expansion.
    pub max_frontier: usize,
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "  - Expansions:    {}", self.expansions.separate_with_commas())?;
        writeln!(f, "  - Pushes:        {}", self.pushes.separate_with_commas())?;
        writeln!(
            f,
            "  - Improvements:  {}",
            self.improvements.separate_with_commas()
        )?;
        writeln!(f, "  - Dropped:       {}", self.dropped.separate_with_commas())?;
        write!(
            f,
            "  - Max frontier:  {}",
            self.max_frontier.separate_with_commas()
        )
    }
}

/// The result of one search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome<N, C>
where
    N: Node,
    C: Cost,
{
    pub policy: Policy,
    /// Only A* reconstructs a path, and only when the goal was reached.
    pub path: Option<Path<N, C>>,
    /// Nodes in the order they were taken off the frontier.
    pub visited: Vec<N>,
    pub termination: Termination,
    pub stats: SearchStats,
}

/// A step for an animation sink.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Frame<'a, N> {
    Visit(&'a N),
    Path(&'a N),
}

impl<N, C> SearchOutcome<N, C>
where
    N: Node,
    C: Cost,
{
    pub fn reached_goal(&self) -> bool {
        self.termination == Termination::GoalReached
    }

    /// Visitations in order, then the path nodes.
    ///
    /// Borrowing the outcome, so it can be replayed as many times as needed.
    pub fn frames(&self) -> impl Iterator<Item = Frame<'_, N>> + '_ {
        let path = self
            .path
            .as_ref()
            .map(|p| p.nodes.as_slice())
            .unwrap_or_default();
        self.visited
            .iter()
            .map(Frame::Visit)
            .chain(path.iter().map(Frame::Path))
    }
}
