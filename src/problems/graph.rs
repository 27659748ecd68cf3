//! Explicit graphs and their text format.

use std::str::FromStr;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::cost::Cost;
use crate::problems::heuristic::HeuristicTable;
use crate::space::Graph;
use crate::space::Node;

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Invalid weight {weight}, weights must be finite and non-negative")]
    InvalidWeight { weight: String },
}

/// An adjacency-list graph.
///
/// Nodes and neighbours are kept in insertion order, which is the order the
/// search sees them in.
#[derive(Clone, Debug)]
pub struct AdjacencyGraph<N, C>
where
    N: Node,
    C: Cost,
{
    directed: bool,
    nodes: Vec<N>,
    index: FxHashMap<N, usize>,
    edges: Vec<Vec<(usize, C)>>,
}

impl<N, C> AdjacencyGraph<N, C>
where
    N: Node,
    C: Cost,
{
    pub fn new_directed() -> Self {
        Self::new(true)
    }
    pub fn new_undirected() -> Self {
        Self::new(false)
    }
    fn new(directed: bool) -> Self {
        Self {
            directed,
            nodes: vec![],
            index: FxHashMap::default(),
            edges: vec![],
        }
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }
    /// Number of stored arcs; undirected edges count twice, loops once.
    pub fn arc_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    /// Adds `n` if missing, returning its index.
    pub fn add_node(&mut self, n: N) -> usize {
        if let Some(&i) = self.index.get(&n) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(n.clone(), i);
        self.nodes.push(n);
        self.edges.push(vec![]);
        i
    }

    /// Adds an edge, in both directions for undirected graphs.
    ///
    /// Adding an existing edge again replaces its weight.
    pub fn add_edge(&mut self, from: N, to: N, weight: C) -> Result<(), GraphError> {
        if !weight.valid() || !weight.is_non_negative() {
            return Err(GraphError::InvalidWeight {
                weight: weight.to_string(),
            });
        }

        let from = self.add_node(from);
        let to = self.add_node(to);
        self.add_arc(from, to, weight);
        if !self.directed && from != to {
            self.add_arc(to, from, weight);
        }
        Ok(())
    }

    fn add_arc(&mut self, from: usize, to: usize, weight: C) {
        let arcs = &mut self.edges[from];
        match arcs.iter_mut().find(|(n, _)| *n == to) {
            Some(arc) => arc.1 = weight,
            None => arcs.push((to, weight)),
        }
    }
}

impl<N, C> Graph<N, C> for AdjacencyGraph<N, C>
where
    N: Node,
    C: Cost,
{
    #[inline(always)]
    fn contains(&self, n: &N) -> bool {
        self.index.contains_key(n)
    }

    fn neighbours(&self, n: &N) -> Vec<(N, C)> {
        match self.index.get(n) {
            Some(&i) => self.edges[i]
                .iter()
                .map(|&(m, w)| (self.nodes[m].clone(), w))
                .collect(),
            None => vec![],
        }
    }

    fn size(&self) -> Option<usize> {
        Some(self.len())
    }
}

#[derive(Debug, Error)]
pub enum GraphParseError {
    #[error("Line {line}: unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },
    #[error("Line {line}: '{directive}' expects {expected}")]
    WrongArguments {
        line: usize,
        directive: &'static str,
        expected: &'static str,
    },
    #[error("Line {line}: invalid number '{value}'")]
    InvalidNumber { line: usize, value: String },
    #[error("Line {line}: '{directive}' must come before any edge")]
    LateDirection {
        line: usize,
        directive: &'static str,
    },
    #[error("Line {line}: {e}")]
    InvalidEdge { line: usize, e: GraphError },
    #[error("No start node given")]
    MissingStart,
    #[error("No goal node given")]
    MissingGoal,
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
}

/// A graph file: the graph plus its heuristic table and default endpoints.
///
/// ```text
/// # comment
/// directed            # or `undirected` (default), before any edge
/// edge S A 3          # weight is optional and defaults to 1
/// node X              # a node without edges
/// h S 11              # heuristic estimate
/// start S
/// goal G
/// ```
#[derive(Clone, Debug)]
pub struct GraphSpec<C>
where
    C: Cost,
{
    pub graph: AdjacencyGraph<String, C>,
    pub heuristic: HeuristicTable<String, C>,
    pub start: Option<String>,
    pub goal: Option<String>,
}

/// A graph file with both endpoints set.
#[derive(Clone, Debug)]
pub struct GraphInstance<C>
where
    C: Cost,
{
    pub graph: AdjacencyGraph<String, C>,
    pub heuristic: HeuristicTable<String, C>,
    pub start: String,
    pub goal: String,
}

impl<C> GraphSpec<C>
where
    C: Cost,
{
    /// Fills in the endpoints, preferring the given overrides.
    pub fn instance(
        self,
        start: Option<String>,
        goal: Option<String>,
    ) -> Result<GraphInstance<C>, GraphParseError> {
        Ok(GraphInstance {
            start: start.or(self.start).ok_or(GraphParseError::MissingStart)?,
            goal: goal.or(self.goal).ok_or(GraphParseError::MissingGoal)?,
            graph: self.graph,
            heuristic: self.heuristic,
        })
    }
}

fn parse_number<C: FromStr>(line: usize, value: &str) -> Result<C, GraphParseError> {
    value.parse::<C>().map_err(|_| GraphParseError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

impl<C> std::convert::TryFrom<&str> for GraphSpec<C>
where
    C: Cost + FromStr,
{
    type Error = GraphParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut directed = false;
        let mut seen_edges = false;
        let mut nodes: Vec<String> = vec![];
        let mut edges: Vec<(usize, String, String, C)> = vec![];
        let mut heuristic = HeuristicTable::new();
        let mut start = None;
        let mut goal = None;

        for (i, raw) in s.lines().enumerate() {
            let line = i + 1;
            let content = raw.split('#').next().unwrap_or_default();
            let words: Vec<&str> = content.split_whitespace().collect();
            let wrong = |directive, expected| GraphParseError::WrongArguments {
                line,
                directive,
                expected,
            };

            match words.as_slice() {
                [] => {}
                [d @ ("directed" | "undirected"), rest @ ..] => {
                    let directive = if *d == "directed" { "directed" } else { "undirected" };
                    if !rest.is_empty() {
                        return Err(wrong(directive, "no arguments"));
                    }
                    if seen_edges {
                        return Err(GraphParseError::LateDirection { line, directive });
                    }
                    directed = *d == "directed";
                }
                ["edge", from, to] => {
                    seen_edges = true;
                    edges.push((line, from.to_string(), to.to_string(), C::one()));
                }
                ["edge", from, to, w] => {
                    seen_edges = true;
                    let w = parse_number::<C>(line, w)?;
                    edges.push((line, from.to_string(), to.to_string(), w));
                }
                ["edge", ..] => return Err(wrong("edge", "2 nodes and an optional weight")),
                ["node", n] => nodes.push(n.to_string()),
                ["node", ..] => return Err(wrong("node", "1 node")),
                ["h", n, h] => {
                    let h = parse_number::<C>(line, h)?;
                    heuristic.insert(n.to_string(), h);
                }
                ["h", ..] => return Err(wrong("h", "a node and an estimate")),
                ["start", n] => start = Some(n.to_string()),
                ["start", ..] => return Err(wrong("start", "1 node")),
                ["goal", n] => goal = Some(n.to_string()),
                ["goal", ..] => return Err(wrong("goal", "1 node")),
                [directive, ..] => {
                    return Err(GraphParseError::UnknownDirective {
                        line,
                        directive: directive.to_string(),
                    });
                }
            }
        }

        let mut graph = if directed {
            AdjacencyGraph::new_directed()
        } else {
            AdjacencyGraph::new_undirected()
        };
        for (line, from, to, w) in edges {
            graph
                .add_edge(from, to, w)
                .map_err(|e| GraphParseError::InvalidEdge { line, e })?;
        }
        for n in nodes {
            graph.add_node(n);
        }
        log::debug!(
            "Parsed graph with {} nodes, {} arcs and {} estimates",
            graph.len(),
            graph.arc_count(),
            heuristic.len()
        );

        Ok(GraphSpec {
            graph,
            heuristic,
            start,
            goal,
        })
    }
}

impl<C> std::convert::TryFrom<&std::path::Path> for GraphSpec<C>
where
    C: Cost + FromStr,
{
    type Error = GraphParseError;

    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        let s = std::fs::read_to_string(p).map_err(|e| GraphParseError::IOError {
            p: p.to_path_buf(),
            e,
        })?;
        GraphSpec::try_from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;

    use crate::float_cost::Weight;

    fn neighbour_names<C: Cost>(g: &AdjacencyGraph<String, C>, n: &str) -> Vec<String> {
        g.neighbours(&n.to_string())
            .into_iter()
            .map(|(m, _)| m)
            .collect()
    }

    #[test]
    fn undirected_edges_go_both_ways() {
        let mut g = AdjacencyGraph::<&str, u32>::new_undirected();
        g.add_edge("a", "b", 2).unwrap();
        g.add_edge("b", "c", 3).unwrap();
        g.add_edge("c", "c", 1).unwrap();

        assert_eq!(g.neighbours(&"b"), vec![("a", 2), ("c", 3)]);
        assert_eq!(g.neighbours(&"c"), vec![("b", 3), ("c", 1)]);
        assert_eq!(g.arc_count(), 5);
        assert!(g.contains(&"a"));
        assert!(!g.contains(&"z"));
        assert!(g.neighbours(&"z").is_empty());
        assert_eq!(g.size(), Some(3));
    }

    #[test]
    fn repeated_edges_replace_the_weight() {
        let mut g = AdjacencyGraph::<u32, u32>::new_directed();
        g.add_edge(1, 2, 5).unwrap();
        g.add_edge(1, 2, 7).unwrap();
        assert_eq!(g.neighbours(&1), vec![(2, 7)]);
        assert!(g.neighbours(&2).is_empty());
    }

    #[test]
    fn rejects_bad_weights() {
        let mut g = AdjacencyGraph::<&str, Weight>::new_directed();
        assert!(g.add_edge("a", "b", Weight::new(-1.0)).is_err());
        assert!(g.add_edge("a", "b", Weight::infinity()).is_err());
        assert!(g.add_edge("a", "b", Weight::new(0.0)).is_ok());
    }

    #[test]
    fn parse_graph_text() {
        let spec = GraphSpec::<Weight>::try_from(indoc! {"
            # The beam search example
            undirected
            edge S A 3
            edge S D 4   # trailing comment
            edge A B

            node Z
            h S 11
            h A 10.4
            start S
            goal B
        "})
        .unwrap();

        assert!(!spec.graph.is_directed());
        assert_eq!(spec.graph.len(), 5);
        assert_eq!(neighbour_names(&spec.graph, "S"), vec!["A", "D"]);
        assert_eq!(neighbour_names(&spec.graph, "A"), vec!["S", "B"]);
        assert_eq!(
            spec.graph.neighbours(&"A".to_string())[1].1,
            Weight::new(1.0)
        );
        assert!(spec.graph.contains(&"Z".to_string()));
        assert_eq!(spec.heuristic.get(&"A".to_string()), Some(Weight::new(10.4)));

        let instance = spec.instance(None, Some("Z".to_string())).unwrap();
        assert_eq!(instance.start, "S");
        assert_eq!(instance.goal, "Z");
    }

    #[test]
    fn parse_directed() {
        let spec = GraphSpec::<u32>::try_from("directed\nedge a b 2").unwrap();
        assert!(spec.graph.is_directed());
        assert!(spec.graph.neighbours(&"b".to_string()).is_empty());
        assert!(matches!(
            spec.instance(None, None),
            Err(GraphParseError::MissingStart)
        ));
    }

    #[test]
    fn parse_errors() {
        let err = |s: &str| GraphSpec::<u32>::try_from(s).unwrap_err();

        assert!(matches!(
            err("edge a b\ndirected"),
            GraphParseError::LateDirection { line: 2, .. }
        ));
        assert!(matches!(
            err("edge a"),
            GraphParseError::WrongArguments { line: 1, directive: "edge", .. }
        ));
        assert!(matches!(
            err("\nedge a b x"),
            GraphParseError::InvalidNumber { line: 2, .. }
        ));
        assert!(matches!(
            err("edge a b -1"),
            GraphParseError::InvalidNumber { line: 1, .. }
        ));
        assert!(matches!(
            err("vertex a"),
            GraphParseError::UnknownDirective { line: 1, .. }
        ));
        assert!(matches!(
            GraphSpec::<Weight>::try_from("edge a b -1").unwrap_err(),
            GraphParseError::InvalidEdge { line: 1, .. }
        ));
        assert!(matches!(
            GraphSpec::<u32>::try_from(std::path::Path::new("/nonexistent/graph.txt")),
            Err(GraphParseError::IOError { .. })
        ));
    }
}
