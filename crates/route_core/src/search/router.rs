//! Runtime selection of the query algorithm.
use std::fmt::Display;

use log::{info, warn};

use crate::{
    constants::Weight,
    error::{Artifact, SearchError},
    graph::{Graph, NodeIndex},
    landmarks::LandmarkTable,
    overlay_graph::ContractionArtifacts,
};

use super::{
    engine::search,
    heuristic::StraightLine,
    strategy::{AStarStrategy, BidirAStarStrategy, BidirDijkstraStrategy, ChStrategy, DijkstraStrategy},
    MissingArtifactPolicy, SearchOptions, ShortestPathResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Dijkstra,
    BidirDijkstra,
    AStar,
    BidirAStar,
    Alt,
    BidirAlt,
    ContractionHierarchy,
}

impl Algorithm {
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Dijkstra,
        Algorithm::BidirDijkstra,
        Algorithm::AStar,
        Algorithm::BidirAStar,
        Algorithm::Alt,
        Algorithm::BidirAlt,
        Algorithm::ContractionHierarchy,
    ];

    /// Artifact the algorithm cannot run without.
    pub fn required_artifact(self) -> Option<Artifact> {
        match self {
            Algorithm::Alt | Algorithm::BidirAlt => Some(Artifact::LandmarkTable),
            Algorithm::ContractionHierarchy => Some(Artifact::ContractionHierarchy),
            _ => None,
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Algorithm::Dijkstra => "DIJKSTRA",
            Algorithm::BidirDijkstra => "BIDIR DIJKSTRA",
            Algorithm::AStar => "A*",
            Algorithm::BidirAStar => "BIDIR A*",
            Algorithm::Alt => "ALT",
            Algorithm::BidirAlt => "BIDIR ALT",
            Algorithm::ContractionHierarchy => "CH",
        };
        write!(f, "{}", name)
    }
}

/// Answers queries on one graph with any [`Algorithm`], using whatever
/// preprocessing artifacts were handed in.
///
/// ```ignore
/// let router = Router::new(&graph)
///     .with_landmarks(&table)
///     .with_hierarchy(&artifacts);
/// let res = router.search(Algorithm::BidirAlt, source, target)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Router<'a> {
    graph: &'a Graph,
    landmarks: Option<&'a LandmarkTable>,
    hierarchy: Option<&'a ContractionArtifacts>,
    options: SearchOptions,
    weight_per_km: Weight,
}

impl<'a> Router<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Router {
            graph,
            landmarks: None,
            hierarchy: None,
            options: SearchOptions::default(),
            weight_per_km: 0.0,
        }
    }

    pub fn with_landmarks(mut self, table: &'a LandmarkTable) -> Self {
        self.landmarks = Some(table);
        self
    }

    pub fn with_hierarchy(mut self, artifacts: &'a ContractionArtifacts) -> Self {
        self.hierarchy = Some(artifacts);
        self
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Scale of the straight line heuristic used by A*. The default of 0
    /// is admissible for any weight unit but gives no guidance.
    pub fn with_weight_per_km(mut self, weight_per_km: Weight) -> Self {
        self.weight_per_km = weight_per_km;
        self
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn search(
        &self,
        algorithm: Algorithm,
        source: NodeIndex,
        target: NodeIndex,
    ) -> Result<ShortestPathResult, SearchError> {
        if let Err(err) = self.check_artifact(algorithm) {
            match (err, self.options.missing_artifact) {
                (SearchError::MissingArtifact(artifact), MissingArtifactPolicy::FallbackToDijkstra) => {
                    warn!("No {} available for {}, falling back to DIJKSTRA", artifact, algorithm);
                    return self.run(Algorithm::Dijkstra, source, target);
                }
                (err, _) => return Err(err),
            }
        }

        self.run(algorithm, source, target)
    }

    /// Fails if the artifact `algorithm` needs is missing or was built for another graph.
    fn check_artifact(&self, algorithm: Algorithm) -> Result<(), SearchError> {
        let Some(artifact) = algorithm.required_artifact() else {
            return Ok(());
        };

        let built_for = match artifact {
            Artifact::LandmarkTable => self.landmarks.map(LandmarkTable::built_for),
            Artifact::ContractionHierarchy => self.hierarchy.map(ContractionArtifacts::built_for),
        };

        match built_for {
            None => Err(SearchError::MissingArtifact(artifact)),
            Some(built_for) => self.graph.ensure_built_for(artifact, built_for),
        }
    }

    fn run(
        &self,
        algorithm: Algorithm,
        source: NodeIndex,
        target: NodeIndex,
    ) -> Result<ShortestPathResult, SearchError> {
        info!("BEGIN {} SEARCH from {:?} to {:?}", algorithm, source, target);

        let graph = self.graph;
        let options = &self.options;
        let straight = StraightLine::new(graph, self.weight_per_km);
        let missing = SearchError::MissingArtifact;

        match algorithm {
            Algorithm::Dijkstra => search(graph, source, target, &DijkstraStrategy, options),
            Algorithm::BidirDijkstra => {
                let strategy = BidirDijkstraStrategy::new(options.alternation);
                search(graph, source, target, &strategy, options)
            }
            Algorithm::AStar => search(graph, source, target, &AStarStrategy::new(straight), options),
            Algorithm::BidirAStar => {
                let strategy = BidirAStarStrategy::new(straight, options.alternation);
                search(graph, source, target, &strategy, options)
            }
            Algorithm::Alt => {
                let table = self.landmarks.ok_or(missing(Artifact::LandmarkTable))?;
                let strategy = AStarStrategy::new(table.heuristic_for(graph)?);
                search(graph, source, target, &strategy, options)
            }
            Algorithm::BidirAlt => {
                let table = self.landmarks.ok_or(missing(Artifact::LandmarkTable))?;
                let strategy =
                    BidirAStarStrategy::new(table.heuristic_for(graph)?, options.alternation);
                search(graph, source, target, &strategy, options)
            }
            Algorithm::ContractionHierarchy => {
                let artifacts = self
                    .hierarchy
                    .ok_or(missing(Artifact::ContractionHierarchy))?;
                let strategy = ChStrategy::new(artifacts);
                search(artifacts.graph(), source, target, &strategy, options)
            }
        }
    }
}
