use derive_more::Display;
use thiserror::Error;

use crate::algorithms::policy::Policy;
use crate::space::Node;

/// Why a heuristic estimate was rejected.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum HeuristicFault {
    #[display("no estimate")]
    Missing,
    #[display("negative estimate")]
    Negative,
    #[display("non-finite estimate")]
    NonFinite,
}

/// Configuration errors found while searching.
///
/// Inputs are checked lazily: a node's heuristic and edges are only validated
/// when the search first looks at it.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError<N: Node> {
    #[error("Unknown node {node:?}")]
    UnknownNode { node: N },
    #[error("The {policy} policy needs a heuristic")]
    MissingHeuristic { policy: Policy },
    #[error("Invalid heuristic for {node:?}: {fault}")]
    InvalidHeuristic { node: N, fault: HeuristicFault },
    #[error("Invalid weight on edge {from:?} → {to:?}")]
    InvalidWeight { from: N, to: N },
    #[error("Path cost overflows on edge {from:?} → {to:?}")]
    CostOverflow { from: N, to: N },
    #[error("Invalid beam width {width}, it must be positive")]
    InvalidBeamWidth { width: usize },
}
