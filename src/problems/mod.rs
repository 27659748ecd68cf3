//! Search spaces and problems to run the policies against.
//!
//! String-labelled graphs come from a small text format, grid mazes come from
//! text or PNG files, and `textbook` bundles the worked examples.

pub mod graph;
pub mod heuristic;
pub mod maze_2d;
pub mod textbook;
