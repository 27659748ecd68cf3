use std::path::PathBuf;

use anstream::eprintln;
use anstream::println;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use thiserror::Error;

use informed_search::algorithms::Frame;
use informed_search::algorithms::NoHeuristic;
use informed_search::algorithms::Policy;
use informed_search::algorithms::SearchConfig;
use informed_search::algorithms::SearchEngine;
use informed_search::cost::Cost;
use informed_search::float_cost::Weight;
use informed_search::problems::graph::GraphParseError;
use informed_search::problems::graph::GraphSpec;
use informed_search::problems::maze_2d::Maze2DGenerationError;
use informed_search::problems::maze_2d::Maze2DInstance;
use informed_search::problems::maze_2d::Maze2DParseError;
use informed_search::problems::maze_2d::Maze2DProblem;
use informed_search::problems::maze_2d::Maze2DSpace;
use informed_search::problems::maze_2d::Maze2DState;
use informed_search::problems::textbook;
use informed_search::space::Graph;
use informed_search::space::Heuristic;
use informed_search::space::Node;

#[cfg(feature = "mem_profile")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;
#[cfg(all(not(feature = "mem_profile"), not(target_env = "msvc")))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    AStar,
    Greedy,
    HillClimbing,
    Beam,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TextbookArg {
    Greedy,
    HillClimbing,
    Beam,
    Maze,
}

impl TextbookArg {
    /// The policy each worked example was written for.
    fn policy(&self) -> PolicyArg {
        match self {
            TextbookArg::Greedy => PolicyArg::Greedy,
            TextbookArg::HillClimbing => PolicyArg::HillClimbing,
            TextbookArg::Beam => PolicyArg::Beam,
            TextbookArg::Maze => PolicyArg::AStar,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Source {
    /// Runs one of the built-in worked examples
    Textbook {
        #[arg(value_enum)]
        which: TextbookArg,
    },
    /// Loads a graph file (`edge`, `h`, `start`, `goal` directives)
    Graph {
        path: PathBuf,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        goal: Option<String>,
    },
    /// Loads a maze from a text or PNG file
    Maze { path: PathBuf },
    /// Generates a random maze and searches it corner to corner
    Generate {
        #[arg(long, default_value_t = 41usize)]
        width: usize,
        #[arg(long, default_value_t = 21usize)]
        height: usize,
        #[arg(long, env = "SEARCH_SEED", default_value_t = 0u64)]
        seed: u64,
    },
}

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = informed_search::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    source: Source,

    /// Defaults to A*, or to the example's own policy for textbook runs
    #[arg(short, long, value_enum, env = "SEARCH_POLICY")]
    policy: Option<PolicyArg>,

    #[arg(long, env = "SEARCH_BEAM_WIDTH", default_value_t = 2usize)]
    beam_width: usize,

    /// Overrides the policy's default step limit
    #[arg(long, env = "SEARCH_MAX_STEPS")]
    max_steps: Option<usize>,

    /// Prints the frame sequence a renderer would replay
    #[arg(long)]
    frames: bool,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Graph(#[from] GraphParseError),
    #[error(transparent)]
    Maze(#[from] Maze2DParseError),
    #[error(transparent)]
    Generation(#[from] Maze2DGenerationError),
    #[error(transparent)]
    Search(Box<dyn std::error::Error>),
}

impl Args {
    fn config(&self, default: PolicyArg) -> SearchConfig {
        let policy = match self.policy.unwrap_or(default) {
            PolicyArg::AStar => Policy::AStar,
            PolicyArg::Greedy => Policy::GreedyBestFirst,
            PolicyArg::HillClimbing => Policy::HillClimbing,
            PolicyArg::Beam => Policy::Beam {
                width: self.beam_width,
            },
        };
        let config = SearchConfig::new(policy);
        match self.max_steps {
            Some(limit) => config.with_max_steps(Some(limit)),
            None => config,
        }
    }
}

fn run<G, H, N, C>(
    graph: &G,
    heuristic: Option<&H>,
    start: &N,
    goal: &N,
    config: SearchConfig,
    frames: bool,
) -> Result<(), CliError>
where
    G: Graph<N, C>,
    H: Heuristic<N, C>,
    N: Node + std::fmt::Display + 'static,
    C: Cost,
{
    println!(
        "Running {} from {} to {}",
        config.policy.cyan(),
        start.green(),
        goal.green()
    );

    let engine: SearchEngine<'_, G, NoHeuristic, N, C> = SearchEngine::new(graph, config);
    let outcome = match heuristic {
        Some(h) => engine.with_heuristic(h).run(start, goal),
        None => engine.run(start, goal),
    }
    .map_err(|e| CliError::Search(Box::new(e)))?;

    let order: Vec<String> = outcome.visited.iter().map(|n| n.to_string()).collect();
    println!("- Visited: {}", order.join(", "));
    match &outcome.path {
        Some(path) => println!("- Path: {}", path.yellow()),
        None if outcome.reached_goal() => println!("- Path: {}", "not tracked".dimmed()),
        None => println!("- Path: {}", "none".red()),
    }
    if outcome.reached_goal() {
        println!("- Termination: {}", outcome.termination.green());
    } else {
        println!("- Termination: {}", outcome.termination.red());
    }
    println!("- Stats:\n{}", outcome.stats);

    if frames {
        println!("- Frames:");
        for (i, frame) in outcome.frames().enumerate() {
            match frame {
                Frame::Visit(n) => println!("  {i:5} visit {n}"),
                Frame::Path(n) => println!("  {i:5} path  {}", n.yellow()),
            }
        }
    }

    Ok(())
}

fn run_graph(
    args: &Args,
    spec: GraphSpec<Weight>,
    start: Option<String>,
    goal: Option<String>,
    default: PolicyArg,
) -> Result<(), CliError> {
    let instance = spec.instance(start, goal)?;
    let heuristic = (!instance.heuristic.is_empty()).then_some(&instance.heuristic);
    run(
        &instance.graph,
        heuristic,
        &instance.start,
        &instance.goal,
        args.config(default),
        args.frames,
    )
}

fn run_maze(args: &Args, maze: Maze2DInstance) -> Result<(), CliError> {
    log::info!("{:?}", maze.space);
    println!("{}", maze.space);
    run(
        &maze.space,
        Some(&maze.heuristic),
        &maze.start,
        &maze.goal,
        args.config(PolicyArg::AStar),
        args.frames,
    )
}

fn main_impl(args: &Args) -> Result<(), CliError> {
    match &args.source {
        Source::Textbook { which } => {
            let default = which.policy();
            let text = match which {
                TextbookArg::Greedy => textbook::GREEDY_BEST_FIRST,
                TextbookArg::HillClimbing => textbook::HILL_CLIMBING,
                TextbookArg::Beam => textbook::BEAM,
                TextbookArg::Maze => {
                    let maze = textbook::a_star_maze()?;
                    return run(
                        &maze.space,
                        Some(&maze.heuristic),
                        &maze.start,
                        &maze.goal,
                        args.config(default),
                        args.frames,
                    );
                }
            };
            run_graph(args, GraphSpec::try_from(text)?, None, None, default)
        }
        Source::Graph { path, start, goal } => run_graph(
            args,
            GraphSpec::try_from(path.as_path())?,
            start.clone(),
            goal.clone(),
            PolicyArg::AStar,
        ),
        Source::Maze { path } => {
            run_maze(args, Maze2DProblem::try_from(path.as_path())?.instance()?)
        }
        Source::Generate {
            width,
            height,
            seed,
        } => {
            let mut rng = ChaCha8Rng::seed_from_u64(*seed);
            let space = Maze2DSpace::generate(*width, *height, &mut rng)?;
            let start = Maze2DState::new(1, 1);
            let goal = Maze2DState::new_from_usize(width - 2, height - 2);
            let problem = Maze2DProblem {
                space,
                start,
                goal,
            };
            run_maze(args, problem.instance()?)
        }
    }
}

fn main() -> std::process::ExitCode {
    env_logger::init();
    let args = Args::parse();
    args.color.write_global();
    log::debug!("{args:?}");

    #[cfg(feature = "mem_profile")]
    let _profiler = dhat::Profiler::new_heap();

    match main_impl(&args) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            std::process::ExitCode::FAILURE
        }
    }
}
