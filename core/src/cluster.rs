//! Deterministic 1-D k-means for run-duration classification. Dot/dash and
//! gap classes are learned per recording instead of assuming the ITU 1:3:7
//! ratios hold, which keeps hand-keyed and jittery transmissions decodable.

/// Fitted model: centers ascending, labels indexed by center rank.
#[derive(Debug, Clone, Default)]
pub struct ClusterModel {
    pub centers: Vec<f32>,
    pub labels: Vec<usize>,
}

impl ClusterModel {
    /// Decision boundaries between adjacent clusters (center midpoints).
    pub fn boundaries(&self) -> Vec<f32> {
        self.centers
            .windows(2)
            .map(|w| (w[0] + w[1]) / 2.0)
            .collect()
    }
}

const MAX_ITERATIONS: usize = 64;

/// Lloyd's algorithm with quantile initialization over the distinct values.
/// Fully deterministic; `k` is capped by the number of distinct values.
pub fn kmeans_1d(values: &[f32], k: usize) -> ClusterModel {
    if values.is_empty() || k == 0 {
        return ClusterModel::default();
    }

    let mut unique = values.to_vec();
    unique.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    unique.dedup();
    let k = k.min(unique.len());

    let mut centers: Vec<f32> = if k == 1 {
        vec![values.iter().sum::<f32>() / values.len() as f32]
    } else {
        (0..k)
            .map(|i| unique[(unique.len() - 1) * i / (k - 1)])
            .collect()
    };
    let mut labels = vec![0usize; values.len()];

    for _ in 0..MAX_ITERATIONS {
        let mut sums = vec![0.0f64; k];
        let mut counts = vec![0usize; k];

        for (label, &v) in labels.iter_mut().zip(values) {
            let mut best = 0;
            let mut best_dist = f32::INFINITY;
            for (j, &c) in centers.iter().enumerate() {
                let dist = (v - c).abs();
                if dist < best_dist {
                    best = j;
                    best_dist = dist;
                }
            }
            *label = best;
            sums[best] += v as f64;
            counts[best] += 1;
        }

        let mut moved = false;
        for j in 0..k {
            if counts[j] > 0 {
                let next = (sums[j] / counts[j] as f64) as f32;
                if (next - centers[j]).abs() > f32::EPSILON {
                    moved = true;
                }
                centers[j] = next;
            }
        }
        if !moved {
            break;
        }
    }

    // Drop clusters that ended up empty, then order by center.
    let mut counts = vec![0usize; k];
    for &l in &labels {
        counts[l] += 1;
    }
    let mut order: Vec<usize> = (0..k).filter(|&j| counts[j] > 0).collect();
    order.sort_by(|&a, &b| centers[a].partial_cmp(&centers[b]).unwrap());
    let mut rank = vec![0usize; k];
    for (r, &j) in order.iter().enumerate() {
        rank[j] = r;
    }

    ClusterModel {
        centers: order.iter().map(|&j| centers[j]).collect(),
        labels: labels.into_iter().map(|l| rank[l]).collect(),
    }
}

/// Collapse adjacent clusters whose centers are within `max_ratio` of each
/// other. Morse duration classes sit at least 2.33x apart (3/1 and 7/3), so a
/// tighter pair of centers is a jitter artifact of forcing k too high, not a
/// real class boundary.
pub fn merge_close(model: &ClusterModel, max_ratio: f32) -> ClusterModel {
    if model.centers.len() <= 1 {
        return model.clone();
    }

    let mut counts = vec![0usize; model.centers.len()];
    for &l in &model.labels {
        counts[l] += 1;
    }

    let mut merged: Vec<(f32, usize)> = Vec::new(); // (center, member count)
    let mut map = vec![0usize; model.centers.len()];
    for (i, (&center, &count)) in model.centers.iter().zip(&counts).enumerate() {
        let mut absorbed = false;
        if let Some(last) = merged.last_mut() {
            if center < last.0 * max_ratio {
                let total = last.1 + count;
                last.0 = (last.0 * last.1 as f32 + center * count as f32) / total as f32;
                last.1 = total;
                map[i] = merged.len() - 1;
                absorbed = true;
            }
        }
        if !absorbed {
            map[i] = merged.len();
            merged.push((center, count));
        }
    }

    ClusterModel {
        centers: merged.iter().map(|m| m.0).collect(),
        labels: model.labels.iter().map(|&l| map[l]).collect(),
    }
}
