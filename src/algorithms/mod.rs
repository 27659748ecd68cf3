//! Implementation of the search algorithms.
//!
//! A*, greedy best-first, hill-climbing and beam search all run on the same
//! traversal skeleton (`engine`). The `Policy` picks the priority of each
//! candidate and how the frontier admits it.

pub mod engine;
pub mod error;
pub mod outcome;
pub mod policy;

pub use engine::NoHeuristic;
pub use engine::SearchEngine;
pub use engine::search;
pub use error::HeuristicFault;
pub use error::SearchError;
pub use outcome::Frame;
pub use outcome::SearchOutcome;
pub use outcome::SearchStats;
pub use outcome::Termination;
pub use policy::Policy;
pub use policy::Rank;
pub use policy::SearchConfig;
