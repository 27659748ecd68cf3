#![no_main]

use libfuzzer_sys::fuzz_target;

use informed_search::algorithms::Policy;
use informed_search::algorithms::SearchConfig;
use informed_search::algorithms::SearchEngine;
use informed_search::float_cost::Weight;
use informed_search::problems::graph::GraphSpec;

fuzz_target!(|data: &str| {
    let Ok(spec) = GraphSpec::<Weight>::try_from(data) else {
        return;
    };
    let Ok(instance) = spec.instance(None, None) else {
        return;
    };

    // Whatever parses must search without panicking.
    for policy in [
        Policy::AStar,
        Policy::GreedyBestFirst,
        Policy::HillClimbing,
        Policy::Beam { width: 2 },
    ] {
        let config = SearchConfig::new(policy).with_max_steps(Some(1_000));
        let _ = SearchEngine::new(&instance.graph, config)
            .with_heuristic(&instance.heuristic)
            .run(&instance.start, &instance.goal);
    }
});
