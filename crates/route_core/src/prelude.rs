//! Re-exports of the most commonly used items in `route_core`.
pub use crate::contraction_params::{ContractionParams, PriorityParams};
pub use crate::contraction_strategy::ContractionStrategy;
pub use crate::control::{CancellationToken, Control, ProgressObserver};
pub use crate::error::{GraphError, PreprocessError, SearchError};
pub use crate::landmarks::{select_landmarks, LandmarkParams, LandmarkTable, SelectionPolicy};
pub use crate::node_contraction::NodeContractor;
pub use crate::overlay_graph::ContractionArtifacts;

pub use crate::search;
pub use crate::search::{Algorithm, Router, SearchOptions, ShortestPathResult};

pub use crate::graph::node_index;
pub use crate::graph::{Edge, Graph, Node, NodeIndex};
pub use crate::util::test_graphs::{generate_grid_graph, generate_simple_graph};
