use dvroute::concepts::topology::CostMatrix;
use dvroute::framework::{Metric, INF};

/// Global single-source Bellman-Ford over the whole cost matrix
pub fn shortest_paths_from(matrix: &CostMatrix, source: usize) -> Vec<Metric> {
    let n = matrix.node_count();
    let mut dist = vec![u32::MAX; n];
    dist[source] = 0;

    for _ in 0..n.saturating_sub(1) {
        let mut updated = false;
        for u in 0..n {
            if dist[u] == u32::MAX {
                continue;
            }
            for w in matrix.neighbours(u) {
                let candidate = dist[u] + matrix.cost(u, w) as u32;
                if candidate < dist[w] {
                    dist[w] = candidate;
                    updated = true;
                }
            }
        }
        if !updated {
            break;
        }
    }

    dist.into_iter()
        .map(|d| if d == u32::MAX { INF } else { d as Metric })
        .collect()
}

pub fn all_pairs(matrix: &CostMatrix) -> Vec<Vec<Metric>> {
    (0..matrix.node_count())
        .map(|source| shortest_paths_from(matrix, source))
        .collect()
}
