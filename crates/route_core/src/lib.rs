//! Shortest path queries on road networks.
//!
//! Offers plain and bidirectional Dijkstra, A* with a straight line
//! heuristic, ALT with several landmark selection policies and contraction
//! hierarchies. All query algorithms run through one generic search loop.
//!
//! # Basic usage
//! ```ignore
//! use route_core::prelude::*;
//!
//! let graph = generate_simple_graph();
//!
//! // Landmarks for ALT
//! let params = LandmarkParams::new(2).policy(SelectionPolicy::Avoid);
//! let table = select_landmarks(&graph, &params, &mut Control::new())?;
//!
//! // Contraction hierarchy, the contractor works on its own copy
//! let hierarchy = NodeContractor::new(graph.clone(), ContractionParams::default())
//!     .run(&mut Control::new())?;
//!
//! let router = Router::new(&graph)
//!     .with_landmarks(&table)
//!     .with_hierarchy(&hierarchy);
//! let res = router.search(Algorithm::ContractionHierarchy, node_index(4), node_index(1))?;
//! println!("Costs: {:?}", res.distance);
//!```
//! [`Graph`]: crate::graph::Graph
pub mod constants;
pub mod contraction_params;
pub mod contraction_strategy;
pub mod control;
pub mod error;
pub mod graph;
pub mod landmarks;
pub mod node_contraction;
pub mod overlay_graph;
pub mod prelude;
pub mod search;
pub mod statistics;
pub mod util;
pub(crate) mod witness_search;
