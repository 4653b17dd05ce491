//! Parameters for the contraction algorithm

/// Parameters for the contraction algorithm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractionParams {
    pub(crate) priority_params: PriorityParams,
    /// Stop a witness search after this many settled nodes. `None` only bounds
    /// the search by cost, so no unnecessary shortcut is ever added.
    pub(crate) witness_settle_limit: Option<usize>,
    /// Percent of contracted nodes between two progress log lines
    pub(crate) progress_step: f64,
}

impl ContractionParams {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn priority_params(mut self, params: PriorityParams) -> Self {
        self.priority_params = params;
        self
    }

    pub fn witness_settle_limit(mut self, limit: Option<usize>) -> Self {
        self.witness_settle_limit = limit;
        self
    }

    pub fn progress_step(mut self, step: f64) -> Self {
        self.progress_step = step;
        self
    }
}

impl Default for ContractionParams {
    fn default() -> Self {
        ContractionParams {
            priority_params: Default::default(),
            witness_settle_limit: None,
            progress_step: 5.0,
        }
    }
}

/// Coefficients for the importance of a node
///
/// I(v) = edge_difference_coeff * ED(v)
///     + contracted_neighbors_coeff * CN(v)
///     + level_coeff * L(v)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityParams {
    pub edge_difference_coeff: i32,
    pub contracted_neighbors_coeff: i32,
    pub level_coeff: i32,
}

impl PriorityParams {
    pub fn new(
        edge_difference_coeff: i32,
        contracted_neighbors_coeff: i32,
        level_coeff: i32,
    ) -> Self {
        PriorityParams {
            edge_difference_coeff,
            contracted_neighbors_coeff,
            level_coeff,
        }
    }

    pub fn edge_difference_coeff(mut self, coeff: i32) -> Self {
        self.edge_difference_coeff = coeff;
        self
    }

    pub fn contracted_neighbors_coeff(mut self, coeff: i32) -> Self {
        self.contracted_neighbors_coeff = coeff;
        self
    }

    pub fn level_coeff(mut self, coeff: i32) -> Self {
        self.level_coeff = coeff;
        self
    }
}

// Unweighted sum of the three terms. Geisberger's thesis weighs them
// 190 / 120 / 1, which usually gives faster queries on road networks.
impl Default for PriorityParams {
    fn default() -> Self {
        PriorityParams {
            edge_difference_coeff: 1,
            contracted_neighbors_coeff: 1,
            level_coeff: 1,
        }
    }
}
