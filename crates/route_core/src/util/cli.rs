use clap::Parser;

use crate::{
    constants::Weight,
    contraction_params::{ContractionParams, PriorityParams},
    landmarks::{LandmarkParams, SelectionPolicy},
};

#[derive(Parser)]
#[command(author = "Daniel Holzner", version, about, long_about = None)]
struct Cli {
    /// Width of the generated grid network
    #[arg(long, default_value_t = 40)]
    width: usize,

    /// Height of the generated grid network
    #[arg(long, default_value_t = 40)]
    height: usize,

    /// Seed for the grid weights, the landmark selection and the queries
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of landmarks for ALT
    #[arg(short, long, default_value_t = 8)]
    landmarks: usize,

    /// Landmark selection policy
    #[arg(short, long, value_enum, default_value_t = SelectionPolicy::Avoid)]
    policy: SelectionPolicy,

    /// Set the coefficient for the edge difference term
    #[arg(short, long, value_name = "coeff")]
    ed: Option<i32>,

    /// Set the coefficient for the contracted neighbors term
    #[arg(short, long, value_name = "coeff")]
    cn: Option<i32>,

    /// Set the coefficient for the level term
    #[arg(long, value_name = "coeff")]
    lvl: Option<i32>,

    /// Stop witness searches after this many settled nodes
    #[arg(long, value_name = "nodes")]
    settle_limit: Option<usize>,

    /// Number of random queries to run
    #[arg(short, long, default_value_t = 100)]
    queries: usize,

    /// Edge weight per km of straight line distance, used by A*
    #[arg(long, default_value_t = 1.0)]
    weight_per_km: Weight,
}

#[derive(Debug, Clone)]
pub struct Cfg {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    pub landmark_params: LandmarkParams,
    pub contraction_params: ContractionParams,
    pub queries: usize,
    pub weight_per_km: Weight,
}

pub fn parse() -> Cfg {
    let cli = Cli::parse();

    let mut priority_params = PriorityParams::default();

    if let Some(ed) = cli.ed {
        priority_params = priority_params.edge_difference_coeff(ed);
    }
    if let Some(cn) = cli.cn {
        priority_params = priority_params.contracted_neighbors_coeff(cn);
    }
    if let Some(lvl) = cli.lvl {
        priority_params = priority_params.level_coeff(lvl);
    }

    Cfg {
        width: cli.width,
        height: cli.height,
        seed: cli.seed,
        landmark_params: LandmarkParams::new(cli.landmarks)
            .policy(cli.policy)
            .seed(cli.seed),
        contraction_params: ContractionParams::new()
            .priority_params(priority_params)
            .witness_settle_limit(cli.settle_limit),
        queries: cli.queries,
        weight_per_km: cli.weight_per_km,
    }
}
