//! Seeded k-means over Oklab samples.
//!
//! Centroids are seeded with k-means++ from a `StdRng` built from a caller
//! seed, then refined with Lloyd iterations. Nothing else is random, so the
//! same samples, `k` and seed always give the same centroids.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::Oklab;

/// Outcome of one clustering run.
#[derive(Debug, Clone)]
pub struct KmeansResult {
    /// Cluster centers, in the order they were seeded.
    pub centroids: Vec<Oklab>,
    /// Number of samples assigned to each centroid in the final pass.
    pub counts: Vec<usize>,
    /// Lloyd iterations performed.
    pub iterations: usize,
    /// True when the last iteration changed no assignment.
    pub converged: bool,
}

/// Cluster `samples` into at most `k` groups.
///
/// Fewer than `k` centroids come back when the samples hold fewer than `k`
/// distinct colors. An empty `samples` slice or `k == 0` yields an empty
/// result.
pub fn run(samples: &[Oklab], k: usize, max_iterations: usize, seed: u64) -> KmeansResult {
    if samples.is_empty() || k == 0 {
        return KmeansResult {
            centroids: Vec::new(),
            counts: Vec::new(),
            iterations: 0,
            converged: true,
        };
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = seed_centroids(samples, k, &mut rng);
    let mut assignments = vec![usize::MAX; samples.len()];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations.max(1) {
        iterations += 1;

        let mut changed = false;
        for (sample, slot) in samples.iter().zip(assignments.iter_mut()) {
            let nearest = nearest_centroid(&centroids, *sample);
            if *slot != nearest {
                *slot = nearest;
                changed = true;
            }
        }

        if !changed {
            converged = true;
            break;
        }
        update_centroids(samples, &assignments, &mut centroids);
    }

    let mut counts = vec![0usize; centroids.len()];
    for &a in &assignments {
        counts[a] += 1;
    }

    tracing::debug!(
        samples = samples.len(),
        clusters = centroids.len(),
        iterations,
        converged,
        "k-means finished"
    );

    KmeansResult {
        centroids,
        counts,
        iterations,
        converged,
    }
}

/// k-means++ seeding: the first center is uniform, each following one is
/// drawn with probability proportional to its squared distance from the
/// nearest center chosen so far.
fn seed_centroids(samples: &[Oklab], k: usize, rng: &mut StdRng) -> Vec<Oklab> {
    let first = samples[rng.gen_range(0..samples.len())];
    let mut centroids = vec![first];
    let mut nearest: Vec<f32> = samples.iter().map(|s| s.distance_squared(first)).collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().map(|&d| d as f64).sum();
        if total <= 0.0 {
            // every sample coincides with a center already
            break;
        }

        let target = rng.gen::<f64>() * total;
        let mut acc = 0.0;
        let mut chosen = None;
        for (i, &d) in nearest.iter().enumerate() {
            acc += d as f64;
            if acc > target {
                chosen = Some(i);
                break;
            }
        }
        // Rounding can leave `acc` a hair under `target`
        let Some(chosen) = chosen.or_else(|| nearest.iter().rposition(|&d| d > 0.0)) else {
            break;
        };

        let center = samples[chosen];
        for (d, s) in nearest.iter_mut().zip(samples) {
            *d = d.min(s.distance_squared(center));
        }
        centroids.push(center);
    }

    centroids
}

/// Index of the closest centroid; ties go to the lowest index.
#[inline]
fn nearest_centroid(centroids: &[Oklab], sample: Oklab) -> usize {
    let mut best = 0;
    let mut best_dist = f32::MAX;
    for (i, c) in centroids.iter().enumerate() {
        let dist = sample.distance_squared(*c);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

/// Move each centroid to the mean of its samples. A centroid that lost all
/// of its samples stays where it was.
fn update_centroids(samples: &[Oklab], assignments: &[usize], centroids: &mut [Oklab]) {
    let mut sums = vec![[0.0f64; 3]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (sample, &a) in samples.iter().zip(assignments) {
        sums[a][0] += sample.l as f64;
        sums[a][1] += sample.a as f64;
        sums[a][2] += sample.b as f64;
        counts[a] += 1;
    }

    for ((centroid, sum), &n) in centroids.iter_mut().zip(&sums).zip(&counts) {
        if n > 0 {
            let n = n as f64;
            *centroid = Oklab::new(
                (sum[0] / n) as f32,
                (sum[1] / n) as f32,
                (sum[2] / n) as f32,
            );
        }
    }
}
