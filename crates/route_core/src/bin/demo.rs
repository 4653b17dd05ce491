use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use indicatif::ProgressBar;
use rand::prelude::*;
use route_core::{prelude::*, util::cli};

fn main() -> Result<()> {
    env_logger::init();

    let cfg = cli::parse();

    let g = generate_grid_graph(cfg.width, cfg.height, cfg.seed);
    g.print_info();

    let mut bar = ProgressBar::new(0);
    let table = {
        let mut control = Control::new().with_observer(&mut bar);
        select_landmarks(&g, &cfg.landmark_params, &mut control)
            .context("Landmark selection failed")?
    };
    bar.finish_and_clear();
    println!(
        "Landmarks ({:?}): {:?}",
        cfg.landmark_params.policy,
        table.landmarks()
    );

    let mut bar = ProgressBar::new(g.num_nodes() as u64);
    let hierarchy = {
        let mut control = Control::new().with_observer(&mut bar);
        NodeContractor::new(g.clone(), cfg.contraction_params)
            .run(&mut control)
            .context("Contraction failed")?
    };
    bar.finish_and_clear();
    hierarchy.print_info();
    println!("{}", hierarchy.stats());

    let router = Router::new(&g)
        .with_landmarks(&table)
        .with_hierarchy(&hierarchy)
        .with_weight_per_km(cfg.weight_per_km);

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let pairs: Vec<(NodeIndex, NodeIndex)> = (0..cfg.queries)
        .map(|_| {
            (
                node_index(rng.gen_range(0..g.num_nodes())),
                node_index(rng.gen_range(0..g.num_nodes())),
            )
        })
        .collect();

    for algorithm in Algorithm::ALL {
        let mut time_total = Duration::ZERO;
        let mut settled_total = 0;
        let mut found = 0;

        for (s, t) in &pairs {
            let now = Instant::now();
            let res = router.search(algorithm, *s, *t)?;
            time_total += now.elapsed();
            settled_total += res.nodes_settled();
            if res.is_reachable() {
                found += 1;
            }
        }

        println!(
            "{:>15}: {:>8.1} settled/query, {:>10?}/query, {} of {} reachable",
            algorithm.to_string(),
            settled_total as f64 / pairs.len().max(1) as f64,
            time_total / pairs.len().max(1) as u32,
            found,
            pairs.len()
        );
    }

    Ok(())
}
