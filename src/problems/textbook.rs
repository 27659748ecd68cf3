//! Small worked examples that every policy is checked against.

use indoc::indoc;

use crate::float_cost::Weight;
use crate::problems::graph::GraphInstance;
use crate::problems::graph::GraphParseError;
use crate::problems::graph::GraphSpec;
use crate::problems::maze_2d::Maze2DInstance;
use crate::problems::maze_2d::Maze2DParseError;
use crate::problems::maze_2d::Maze2DProblem;

pub const GREEDY_BEST_FIRST: &str = indoc! {"
    directed
    edge S A
    edge A B
    edge A D
    edge B C
    edge D T
    edge E D
    edge A E
    edge D T

    h A 5
    h B 6
    h C 7
    h D 2
    h E 1
    h S 6
    h T 0

    start S
    goal T
"};

pub const HILL_CLIMBING: &str = indoc! {"
    undirected
    edge S A
    edge S D
    edge A B
    edge A D
    edge B C
    edge B E
    edge D E
    edge E F
    edge F G

    h S 11
    h A 10.4
    h B 6.7
    h C 4
    h D 8.9
    h E 6.9
    h F 3
    h G 0

    start S
    goal G
"};

pub const BEAM: &str = indoc! {"
    undirected
    edge S A 3
    edge S D 4
    edge A B 4
    edge A D 5
    edge B C 4
    edge B E 5
    edge D E 2
    edge E F 4
    edge F G 3

    start S
    goal G
"};

pub const A_STAR_MAZE: &str = indoc! {"
    1111111111111111111111111111
    1S00000000110000000010000001
    1011111110111110111010111101
    1000000000000000111010111101
    1011111110111110011010111101
    1000001000000110000000000001
    1010111011110111011011011101
    1000000011110111000010010001
    1011111011110111011011011101
    1000000000000000000010000G01
    1111111111111111111111111111
"};

fn instance(text: &str) -> Result<GraphInstance<Weight>, GraphParseError> {
    GraphSpec::<Weight>::try_from(text)?.instance(None, None)
}

/// Directed graph from `S` to `T` with integer estimates.
pub fn greedy_best_first() -> Result<GraphInstance<Weight>, GraphParseError> {
    instance(GREEDY_BEST_FIRST)
}

/// Undirected unit-weight graph from `S` to `G` with fractional estimates.
pub fn hill_climbing() -> Result<GraphInstance<Weight>, GraphParseError> {
    instance(HILL_CLIMBING)
}

/// Undirected weighted graph from `S` to `G`, no estimates.
pub fn beam() -> Result<GraphInstance<Weight>, GraphParseError> {
    instance(BEAM)
}

/// 28x11 maze from `(1,1)` to `(25,9)`.
pub fn a_star_maze() -> Result<Maze2DInstance, Maze2DParseError> {
    Maze2DProblem::try_from(A_STAR_MAZE)?.instance()
}
