//! MaxCover landmark selection.
//!
//! An edge `u -> v` of weight `w` is covered by landmark `L` if the landmark
//! distances across it differ by exactly `w` (within a tolerance), either
//! `|d(L, v) - d(L, u)|` or `|d(u, L) - d(v, L)|`. Covered edges have reduced
//! cost 0 under `L`, so more covered edges mean tighter ALT bounds.
//!
//! The result is a local optimum of a greedy swap search. It depends on the
//! candidate pool and on the seed and is not guaranteed to be the best
//! possible landmark set.
use std::time::Instant;

use log::{debug, info};
use rand::{rngs::StdRng, Rng};
use rustc_hash::FxHashSet;

use crate::{
    constants::Weight,
    control::Control,
    error::PreprocessError,
    graph::{EdgeIndex, Graph, NodeIndex},
};

use super::{avoid, LandmarkParams, LandmarkTable};

/// Number of original edges covered by at least one landmark of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub covered: usize,
    pub total: usize,
}

impl Coverage {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.covered as f64 / self.total as f64
        }
    }
}

impl std::fmt::Display for Coverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} edges covered ({:.2}%)",
            self.covered,
            self.total,
            self.ratio() * 100.0
        )
    }
}

/// Counts the original edges of `graph` covered by the landmarks of `table`.
pub fn coverage(graph: &Graph, table: &LandmarkTable, tolerance: Weight) -> Coverage {
    let covered = graph
        .edge_indices()
        .filter(|e| !graph.is_shortcut(*e))
        .filter(|e| (0..table.len()).any(|i| covers(graph, table, i, *e, tolerance)))
        .count();

    Coverage {
        covered,
        total: graph.num_original_edges(),
    }
}

fn covers(graph: &Graph, table: &LandmarkTable, i: usize, edge_idx: EdgeIndex, tolerance: Weight) -> bool {
    let edge = graph.edge(edge_idx);
    let (u, v) = (edge.source.index(), edge.target.index());
    let tight = |a: Weight, b: Weight| {
        a.is_finite() && b.is_finite() && ((a - b).abs() - edge.weight).abs() <= tolerance
    };

    let from = table.distances_from(i);
    let to = table.distances_to(i);
    tight(from[v], from[u]) || tight(to[u], to[v])
}

pub(super) fn select(
    graph: &Graph,
    params: &LandmarkParams,
    rng: &mut StdRng,
    control: &mut Control,
) -> Result<LandmarkTable, PreprocessError> {
    let k = params.count;
    let now = Instant::now();

    let pool = build_pool(graph, params, rng, control)?;
    info!(
        "MaxCover pool of {} candidates built in {:?}",
        pool.len(),
        now.elapsed()
    );

    let covers_of: Vec<Vec<usize>> = (0..pool.len())
        .map(|i| {
            graph
                .edge_indices()
                .filter(|e| !graph.is_shortcut(*e))
                .filter(|e| covers(graph, &pool, i, *e, params.cover_tolerance))
                .map(|e| e.index())
                .collect()
        })
        .collect();

    // The first k pool entries are the initial avoid landmarks.
    let mut chosen: Vec<usize> = (0..k).collect();
    let mut counter = vec![0usize; graph.num_edges()];
    for i in &chosen {
        for e in &covers_of[*i] {
            counter[*e] += 1;
        }
    }
    let mut covered = counter.iter().filter(|c| **c > 0).count();
    debug!("MaxCover initial coverage: {}", covered);

    let mut rounds = 0;
    'search: loop {
        if control.is_cancelled() {
            return Err(PreprocessError::Cancelled);
        }
        rounds += 1;

        for slot in 0..k {
            for candidate in 0..pool.len() {
                if chosen.contains(&candidate) {
                    continue;
                }

                let delta = swap_gain(&mut counter, &covers_of[chosen[slot]], &covers_of[candidate]);
                if delta > 0 {
                    debug!(
                        "MaxCover swap {:?} -> {:?}: +{} edges",
                        pool.landmarks()[chosen[slot]],
                        pool.landmarks()[candidate],
                        delta
                    );
                    apply_swap(&mut counter, &covers_of[chosen[slot]], &covers_of[candidate]);
                    chosen[slot] = candidate;
                    covered += delta as usize;
                    continue 'search;
                }
            }
        }

        break;
    }

    info!(
        "MaxCover converged after {} rounds: {} of {} edges covered",
        rounds,
        covered,
        graph.num_original_edges()
    );
    Ok(pool.subset(&chosen))
}

/// Change in covered edges if `out` is replaced by `incoming`. Leaves `counter` untouched.
fn swap_gain(counter: &mut [usize], out: &[usize], incoming: &[usize]) -> isize {
    let mut lost = 0isize;
    for e in out {
        counter[*e] -= 1;
        if counter[*e] == 0 {
            lost += 1;
        }
    }

    // Edges only `out` covered count as lost and, if `incoming` covers them too, as gained
    let gained = incoming.iter().filter(|e| counter[**e] == 0).count() as isize;

    for e in out {
        counter[*e] += 1;
    }

    gained - lost
}

fn apply_swap(counter: &mut [usize], out: &[usize], incoming: &[usize]) {
    for e in out {
        counter[*e] -= 1;
    }
    for e in incoming {
        counter[*e] += 1;
    }
}

/// Candidate pool of about `pool_factor * k` nodes. Starts from one avoid
/// run, then repeatedly drops a random part of the current set and regrows it
/// with avoid. The first `k` entries are the landmarks of the first run.
fn build_pool(
    graph: &Graph,
    params: &LandmarkParams,
    rng: &mut StdRng,
    control: &mut Control,
) -> Result<LandmarkTable, PreprocessError> {
    let k = params.count;
    let n = graph.num_nodes();
    let target = (params.pool_factor.max(1) * k).min(n);

    let mut current = avoid::select(graph, LandmarkTable::empty(graph), k, rng, control)?;
    let mut pool = current.clone();
    let mut in_pool: FxHashSet<NodeIndex> = pool.landmarks().iter().copied().collect();

    let mut attempts = 0;
    while pool.len() < target && attempts < params.max_pool_attempts {
        if control.is_cancelled() {
            return Err(PreprocessError::Cancelled);
        }
        attempts += 1;

        // Keep every landmark with probability 1/2, drop at least one
        let mut keep: Vec<usize> = (0..current.len()).filter(|_| rng.gen_bool(0.5)).collect();
        if keep.len() == current.len() {
            keep.remove(rng.gen_range(0..keep.len()));
        }
        let pruned = current.subset(&keep);

        current = avoid::select(graph, pruned, k, rng, control)?;
        for (i, landmark) in current.landmarks().iter().enumerate() {
            if pool.len() < target && in_pool.insert(*landmark) {
                pool.push_computed(&current, i);
            }
        }
        control.report(pool.len(), target);
    }

    debug!("MaxCover pool after {} attempts: {:?}", attempts, pool.landmarks());
    Ok(pool)
}
