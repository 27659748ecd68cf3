use std::time::Duration;

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use glob::glob;
use hrsw::Stopwatch;
use human_duration::human_duration;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use informed_search::algorithms::Policy;
use informed_search::algorithms::search;
use informed_search::problems::maze_2d::Maze2DInstance;
use informed_search::problems::maze_2d::Maze2DProblem;
use informed_search::problems::maze_2d::Maze2DSpace;
use informed_search::problems::maze_2d::Maze2DState;

const MAX_INSTANCE_TIME: Duration = Duration::from_millis(500);
const POLICIES: [Policy; 4] = [
    Policy::AStar,
    Policy::GreedyBestFirst,
    Policy::HillClimbing,
    Policy::Beam { width: 8 },
];

fn solve(maze: &Maze2DInstance, policy: Policy) -> usize {
    search(
        &maze.space,
        Some(&maze.heuristic),
        &maze.start,
        &maze.goal,
        policy,
    )
    .map(|outcome| outcome.visited.len())
    .unwrap_or_default()
}

fn instances() -> Vec<(String, Maze2DInstance)> {
    let mut instances = vec![];
    for path in glob("data/mazes/*.txt")
        .unwrap()
        .filter_map(std::result::Result::ok)
    {
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        let maze = Maze2DProblem::try_from(path.as_path())
            .unwrap()
            .instance()
            .unwrap();
        instances.push((name, maze));
    }

    for (seed, (x, y)) in [(41usize, 21usize), (101, 101), (301, 301)].into_iter().enumerate() {
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        let space = Maze2DSpace::generate(x, y, &mut rng).unwrap();
        let maze = Maze2DProblem {
            space,
            start: Maze2DState::new(1, 1),
            goal: Maze2DState::new_from_usize(x - 2, y - 2),
        }
        .instance()
        .unwrap();
        instances.push((format!("generated[{x}x{y}]:{seed}"), maze));
    }
    instances
}

fn compare_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("Maze2D Policies");

    for (name, maze) in instances() {
        for policy in POLICIES {
            let mut stopwatch = Stopwatch::new_started();
            let visited = solve(&maze, policy);
            stopwatch.stop();
            let elapsed = stopwatch.elapsed();
            if elapsed > MAX_INSTANCE_TIME {
                log::warn!(
                    "Skipping {name} as it takes too long with {policy} ({})",
                    human_duration(&elapsed)
                );
                continue;
            }
            println!("{policy} on {name}: {visited} visited");

            group.bench_with_input(
                BenchmarkId::new(policy.to_string(), &name),
                &maze,
                |b, m| b.iter(|| solve(m, policy)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, compare_policies);
criterion_main!(benches);
