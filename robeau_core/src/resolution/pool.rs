//! Weighted-random pools.

use rand::Rng;
use tracing::{debug, error, warn};

use robeau_graph::Edge;

/// Random candidates sharing a pool id. Exactly one of them fires.
#[derive(Debug, Clone)]
pub struct RandomPool {
    pub id: i64,
    pub edges: Vec<Edge>,
}

/// Group random candidates by pool id, in order of first appearance.
pub fn group_pools(edges: impl IntoIterator<Item = Edge>) -> Vec<RandomPool> {
    let mut pools: Vec<RandomPool> = Vec::new();
    for edge in edges {
        let id = edge.pool_id();
        match pools.iter_mut().find(|pool| pool.id == id) {
            Some(pool) => pool.edges.push(edge),
            None => pools.push(RandomPool { id, edges: vec![edge] }),
        }
    }
    pools
}

/// Pick one edge of a non-empty pool with probability proportional to its
/// `randomWeight`.
///
/// Falls back to a uniform choice when any weight is missing or unusable,
/// or when the cumulative scan finds nothing because of float rounding.
pub fn choose_weighted<'a, R: Rng + ?Sized>(pool: &'a [Edge], rng: &mut R) -> &'a Edge {
    debug_assert!(!pool.is_empty());
    if pool.len() == 1 {
        return &pool[0];
    }

    let weights: Option<Vec<f64>> = pool
        .iter()
        .map(|edge| edge.params.random_weight.filter(|w| w.is_finite() && *w >= 0.0))
        .collect();

    let Some(mut weights) = weights else {
        warn!(pool = pool.len(), "Missing weight in random pool, choosing uniformly");
        return choose_uniform(pool, rng);
    };

    let mut total: f64 = weights.iter().sum();
    if !total.is_finite() {
        // Huge weights overflow the sum; their ratios survive scaling
        let max = weights.iter().copied().fold(0.0, f64::max);
        for weight in &mut weights {
            *weight /= max;
        }
        total = weights.iter().sum();
    }
    if total <= 0.0 {
        warn!(pool = pool.len(), "Random pool has no weight, choosing uniformly");
        return choose_uniform(pool, rng);
    }

    let draw = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for (edge, weight) in pool.iter().zip(&weights) {
        cumulative += weight;
        if cumulative > draw {
            return edge;
        }
    }

    error!(draw, total, "Failed to select a connection, choosing uniformly");
    choose_uniform(pool, rng)
}

fn choose_uniform<'a, R: Rng + ?Sized>(pool: &'a [Edge], rng: &mut R) -> &'a Edge {
    &pool[rng.gen_range(0..pool.len())]
}

/// Draw one winner from each pool.
pub fn select_from_pools<R: Rng + ?Sized>(pools: &[RandomPool], rng: &mut R) -> Vec<Edge> {
    pools
        .iter()
        .map(|pool| {
            let winner = choose_weighted(&pool.edges, rng);
            debug!(pool = pool.id, node = %winner.end, "Selected pooled response");
            winner.clone()
        })
        .collect()
}
