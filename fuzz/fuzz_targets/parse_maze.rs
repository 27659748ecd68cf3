#![no_main]

use libfuzzer_sys::fuzz_target;

use informed_search::algorithms::Policy;
use informed_search::algorithms::search;
use informed_search::problems::maze_2d::Maze2DProblem;

fuzz_target!(|data: &str| {
    let Ok(problem) = Maze2DProblem::try_from(data) else {
        return;
    };
    let Ok(maze) = problem.instance() else {
        return;
    };

    let outcome = search(
        &maze.space,
        Some(&maze.heuristic),
        &maze.start,
        &maze.goal,
        Policy::AStar,
    );
    if let Ok(outcome) = outcome {
        assert_eq!(
            outcome.path.map(|p| p.cost),
            maze.space.bfs_distance(&maze.start, &maze.goal)
        );
    }
});
