//! Interactive shell to query a road graph loaded from CSV files.
use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use indicatif::ProgressBar;
use rand::Rng;
use reedline_repl_rs::clap::{value_parser, Arg, ArgMatches, Command};
use reedline_repl_rs::Repl;
use route_core::{
    landmarks::coverage,
    prelude::*,
};
use thiserror::Error;

mod loader;

#[derive(Debug, Error)]
enum ReplError {
    #[error(transparent)]
    Repl(#[from] reedline_repl_rs::Error),
    #[error("Search failed: {0}")]
    Search(#[from] SearchError),
    #[error("Preprocessing failed: {0}")]
    Preprocess(#[from] PreprocessError),
    #[error("{0:#}")]
    Load(anyhow::Error),
    #[error("{0}")]
    Usage(String),
}

type Result<T> = std::result::Result<T, ReplError>;

struct Context {
    graph: Graph,
    landmarks: Option<LandmarkTable>,
    hierarchy: Option<ContractionArtifacts>,
    weight_per_km: f64,
}

impl Context {
    fn new(graph: Graph) -> Self {
        Self {
            graph,
            landmarks: None,
            hierarchy: None,
            weight_per_km: 0.0,
        }
    }

    fn router(&self) -> Router<'_> {
        let mut router = Router::new(&self.graph).with_weight_per_km(self.weight_per_km);
        if let Some(table) = &self.landmarks {
            router = router.with_landmarks(table);
        }
        if let Some(hierarchy) = &self.hierarchy {
            router = router.with_hierarchy(hierarchy);
        }
        router
    }
}

fn arg<T: Clone + Send + Sync + 'static>(args: &ArgMatches, name: &str) -> Result<T> {
    args.get_one::<T>(name)
        .cloned()
        .ok_or_else(|| ReplError::Usage(format!("Missing argument <{}>", name)))
}

fn parse_algorithm(name: &str) -> Result<Algorithm> {
    match name {
        "dijkstra" => Ok(Algorithm::Dijkstra),
        "bidir" => Ok(Algorithm::BidirDijkstra),
        "astar" => Ok(Algorithm::AStar),
        "bidir-astar" => Ok(Algorithm::BidirAStar),
        "alt" => Ok(Algorithm::Alt),
        "bidir-alt" => Ok(Algorithm::BidirAlt),
        "ch" => Ok(Algorithm::ContractionHierarchy),
        _ => Err(ReplError::Usage(format!("Unknown algorithm `{}`", name))),
    }
}

fn parse_policy(name: &str) -> Result<SelectionPolicy> {
    match name {
        "random" => Ok(SelectionPolicy::Random),
        "farthest" => Ok(SelectionPolicy::Farthest),
        "avoid" => Ok(SelectionPolicy::Avoid),
        "maxcover" => Ok(SelectionPolicy::MaxCover),
        _ => Err(ReplError::Usage(format!("Unknown policy `{}`", name))),
    }
}

fn node_arg(args: &ArgMatches, name: &str, context: &Context) -> Result<NodeIndex> {
    let idx: usize = arg(args, name)?;
    if idx >= context.graph.num_nodes() {
        return Err(ReplError::Usage(format!(
            "Node {} does not exist, graph has {} nodes",
            idx,
            context.graph.num_nodes()
        )));
    }
    Ok(node_index(idx))
}

/// Print graph info
fn info(_args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let mut out = format!(
        "Graph has {} nodes and {} edges",
        context.graph.num_nodes(),
        context.graph.num_edges()
    );
    match &context.landmarks {
        Some(table) => out.push_str(&format!("\nLandmarks: {:?}", table.landmarks())),
        None => out.push_str("\nLandmarks: none"),
    }
    match &context.hierarchy {
        Some(hierarchy) => out.push_str(&format!("\nHierarchy: {}", hierarchy.stats())),
        None => out.push_str("\nHierarchy: none"),
    }
    Ok(Some(out))
}

fn run_query(args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let algorithm = parse_algorithm(&arg::<String>(&args, "algo")?)?;
    let src = node_arg(&args, "src", context)?;
    let dst = node_arg(&args, "dst", context)?;

    let res = context.router().search(algorithm, src, dst)?;

    match res.distance {
        Some(distance) => {
            let mut path = String::new();
            for node in &res.path {
                path.push_str(&format!("{}\n", node));
            }
            path.push_str(&format!(
                "Costs: {}\nSettled: {}\nTook: {:?}",
                distance,
                res.nodes_settled(),
                res.stats.duration
            ));
            Ok(Some(path))
        }
        None => Ok(Some("No path found".to_string())),
    }
}

fn build_landmarks(args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let count: usize = arg(&args, "count")?;
    let policy = match args.get_one::<String>("policy") {
        Some(name) => parse_policy(name)?,
        None => SelectionPolicy::default(),
    };
    let seed = args.get_one::<u64>("seed").copied().unwrap_or(0);
    let params = LandmarkParams::new(count).policy(policy).seed(seed);

    let mut bar = ProgressBar::new(0);
    let now = Instant::now();
    let table = {
        let mut control = Control::new().with_observer(&mut bar);
        select_landmarks(&context.graph, &params, &mut control)?
    };
    bar.finish_and_clear();

    let report = coverage(&context.graph, &table, params.cover_tolerance);
    let out = format!(
        "Selected {:?} with {:?} in {:?}\n{}",
        table.landmarks(),
        policy,
        now.elapsed(),
        report
    );
    context.landmarks = Some(table);
    Ok(Some(out))
}

fn contract(args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let mut priority_params = PriorityParams::default();
    if let Some(ed) = args.get_one::<i32>("ed") {
        priority_params = priority_params.edge_difference_coeff(*ed);
    }
    if let Some(cn) = args.get_one::<i32>("cn") {
        priority_params = priority_params.contracted_neighbors_coeff(*cn);
    }
    if let Some(lvl) = args.get_one::<i32>("lvl") {
        priority_params = priority_params.level_coeff(*lvl);
    }
    let params = ContractionParams::new()
        .priority_params(priority_params)
        .witness_settle_limit(args.get_one::<usize>("limit").copied());

    let mut bar = ProgressBar::new(context.graph.num_nodes() as u64);
    let hierarchy = {
        let mut control = Control::new().with_observer(&mut bar);
        NodeContractor::new(context.graph.clone(), params).run(&mut control)?
    };
    bar.finish_and_clear();

    let out = hierarchy.stats().to_string();
    context.hierarchy = Some(hierarchy);
    Ok(Some(out))
}

fn set_weight_per_km(args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let weight_per_km: f64 = arg(&args, "factor")?;
    if !weight_per_km.is_finite() || weight_per_km < 0.0 {
        return Err(ReplError::Usage(format!(
            "Invalid factor {}, expected a finite value >= 0",
            weight_per_km
        )));
    }
    context.weight_per_km = weight_per_km;
    Ok(None)
}

/// Runs `n` random queries with every algorithm whose artifacts are available.
fn measure(args: ArgMatches, context: &mut Context) -> Result<Option<String>> {
    let n = args.get_one::<usize>("n").copied().unwrap_or(10);
    let num_nodes = context.graph.num_nodes();

    // Select n random start and end nodes
    let mut rng = rand::thread_rng();
    let pairs: Vec<(NodeIndex, NodeIndex)> = (0..n)
        .map(|_| {
            (
                node_index(rng.gen_range(0..num_nodes)),
                node_index(rng.gen_range(0..num_nodes)),
            )
        })
        .collect();

    let router = context.router();
    let mut res = String::new();
    for algorithm in Algorithm::ALL {
        let mut time_total = Duration::ZERO;
        let mut settled_total = 0;
        let mut skipped = false;

        for (src, dst) in &pairs {
            match router.search(algorithm, *src, *dst) {
                Ok(sp) => {
                    time_total += sp.stats.duration.unwrap_or_default();
                    settled_total += sp.nodes_settled();
                }
                Err(SearchError::MissingArtifact(_)) => {
                    skipped = true;
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        if skipped {
            res.push_str(&format!("{}: skipped, run preprocessing first\n", algorithm));
        } else {
            res.push_str(&format!(
                "{}: {:?} avg, {} settled avg\n",
                algorithm,
                time_total / n.max(1) as u32,
                settled_total / n.max(1)
            ));
        }
    }

    Ok(Some(res))
}

fn main() -> Result<()> {
    env_logger::init();

    let dir = std::env::args()
        .nth(1)
        .ok_or_else(|| ReplError::Usage("Usage: repl <dir with nodes.csv and edges.csv>".into()))?;
    let dir = Path::new(&dir);
    let graph = loader::from_csv(&dir.join("nodes.csv"), &dir.join("edges.csv"))
        .map_err(ReplError::Load)?;
    if graph.num_nodes() == 0 {
        return Err(ReplError::Usage("Graph has no nodes".into()));
    }
    let context = Context::new(graph);

    let mut repl = Repl::new(context)
        .with_name("Pathfinder")
        .with_version("v0.1.0")
        .with_description("Simple REPL to test graph search algorithms")
        .with_banner("Welcome to Pathfinder")
        .with_history(PathBuf::from("history"), 100)
        .with_command(Command::new("info").about("Print graph info"), info)
        .with_command(
            Command::new("query")
                .arg(
                    Arg::new("algo")
                        .value_parser([
                            "dijkstra",
                            "bidir",
                            "astar",
                            "bidir-astar",
                            "alt",
                            "bidir-alt",
                            "ch",
                        ])
                        .required(true)
                        .help("Search algorithm"),
                )
                .arg(
                    Arg::new("src")
                        .value_parser(value_parser!(usize))
                        .required(true)
                        .help("Index of source node"),
                )
                .arg(
                    Arg::new("dst")
                        .value_parser(value_parser!(usize))
                        .required(true)
                        .help("Index of destination node"),
                )
                .about("Calculate a shortest path with the given algorithm"),
            run_query,
        )
        .with_command(
            Command::new("landmarks")
                .arg(
                    Arg::new("count")
                        .value_parser(value_parser!(usize))
                        .required(true)
                        .help("Number of landmarks"),
                )
                .arg(
                    Arg::new("policy")
                        .value_parser(["random", "farthest", "avoid", "maxcover"])
                        .required(false)
                        .help("Selection policy"),
                )
                .arg(
                    Arg::new("seed")
                        .value_parser(value_parser!(u64))
                        .required(false)
                        .help("Seed of the selection"),
                )
                .about("Select landmarks for ALT"),
            build_landmarks,
        )
        .with_command(
            Command::new("contract")
                .arg(
                    Arg::new("ed")
                        .long("ed")
                        .value_parser(value_parser!(i32))
                        .help("Coefficient of the edge difference term"),
                )
                .arg(
                    Arg::new("cn")
                        .long("cn")
                        .value_parser(value_parser!(i32))
                        .help("Coefficient of the contracted neighbors term"),
                )
                .arg(
                    Arg::new("lvl")
                        .long("lvl")
                        .value_parser(value_parser!(i32))
                        .help("Coefficient of the level term"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .help("Settle limit of witness searches"),
                )
                .about("Build a contraction hierarchy"),
            contract,
        )
        .with_command(
            Command::new("speed")
                .arg(
                    Arg::new("factor")
                        .value_parser(value_parser!(f64))
                        .required(true)
                        .help("Edge weight per km of straight line distance"),
                )
                .about("Scale of the A* straight line heuristic"),
            set_weight_per_km,
        )
        .with_command(
            Command::new("measure")
                .arg(
                    Arg::new("n")
                        .value_parser(value_parser!(usize))
                        .required(false)
                        .help("Number of random shortest paths to calculate"),
                )
                .about("Measure `n` random shortest path calculations per algorithm"),
            measure,
        );

    Ok(repl.run()?)
}
