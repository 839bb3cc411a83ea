use serde::{Deserialize, Serialize};

use super::encoder::FeatureVector;

/// One neighbor of a query: catalog position and cosine distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub position: usize,
    pub distance: f64,
}

/// Brute-force cosine nearest-neighbor index over the catalog's feature rows
///
/// Read-only after construction, so any number of requests can query it at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityIndex {
    rows: Vec<FeatureVector>,
    norms: Vec<f64>,
}

impl SimilarityIndex {
    pub fn build(rows: Vec<FeatureVector>) -> Self {
        let norms = rows.iter().map(|row| l2_norm(row)).collect();
        Self { rows, norms }
    }

    /// The `k` closest rows, nearest first
    ///
    /// `k` is clamped to the catalog size. Equal distances keep catalog order.
    pub fn nearest(&self, query: &[f64], k: usize) -> Vec<Neighbor> {
        let query_norm = l2_norm(query);
        let mut neighbors: Vec<Neighbor> = self
            .rows
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(position, (row, norm))| Neighbor {
                position,
                distance: cosine_distance(query, query_norm, row, *norm),
            })
            .collect();

        // sort_by is stable, so ties stay in catalog order
        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        neighbors.truncate(k.min(self.rows.len()));
        neighbors
    }
}

fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// `1 - cos(a, b)`, with a zero vector treated as orthogonal to everything
fn cosine_distance(a: &[f64], a_norm: f64, b: &[f64], b_norm: f64) -> f64 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 1.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    (1.0 - dot / (a_norm * b_norm)).clamp(0.0, 2.0)
}
