//! Lloyd's k-means over 2D coordinates, used to place synthetic feeders.

use rand::{SeedableRng, rngs::StdRng, seq::index};
use serde::{Deserialize, Serialize};

/// Fixed seed for choosing the initial centers.
pub const KMEANS_SEED: u64 = 42;

/// Upper bound on assignment/update rounds.
pub const MAX_ITERATIONS: usize = 50;

const REL_TOLERANCE: f64 = 1e-5;
const ABS_TOLERANCE: f64 = 1e-8;

/// A latitude/longitude pair treated as a point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Squared Euclidean distance in degree space.
    pub fn dist_sq(&self, other: &Coord) -> f64 {
        let dlat = self.lat - other.lat;
        let dlon = self.lon - other.lon;
        dlat * dlat + dlon * dlon
    }

    fn close_to(&self, other: &Coord) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= ABS_TOLERANCE + REL_TOLERANCE * b.abs();
        close(self.lat, other.lat) && close(self.lon, other.lon)
    }
}

/// Returns the index of the center nearest to `point`.
///
/// Ties go to the lowest index. Returns `None` when `centers` is empty.
pub fn nearest_center(point: &Coord, centers: &[Coord]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (j, c) in centers.iter().enumerate() {
        let d = point.dist_sq(c);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((j, d));
        }
    }
    best.map(|(j, _)| j)
}

/// Returns the arithmetic mean of `points`, or `None` if there are none.
pub fn centroid(points: &[Coord]) -> Option<Coord> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (lat, lon) = points
        .iter()
        .fold((0.0, 0.0), |(la, lo), p| (la + p.lat, lo + p.lon));
    Some(Coord::new(lat / n, lon / n))
}

/// Finds up to `k` cluster centers for `points`.
///
/// - No points or `k == 0`: empty result.
/// - `k >= points.len()`: the points themselves.
/// - Otherwise Lloyd's algorithm seeded from `k` distinct input points,
///   iterated until no center moves (within tolerance) or
///   [`MAX_ITERATIONS`] rounds have run.
///
/// The result depends only on the input: seeding uses [`KMEANS_SEED`].
///
/// # Examples
///
/// ```
/// use hazard_twin::twin::cluster::{Coord, kmeans_centers};
///
/// let pts = [Coord::new(0.0, 0.0), Coord::new(0.0, 0.1), Coord::new(10.0, 10.0)];
/// let centers = kmeans_centers(&pts, 2);
/// assert_eq!(centers.len(), 2);
/// assert_eq!(centers, kmeans_centers(&pts, 2));
/// ```
pub fn kmeans_centers(points: &[Coord], k: usize) -> Vec<Coord> {
    let n = points.len();
    if n == 0 || k == 0 {
        return Vec::new();
    }
    if k >= n {
        return points.to_vec();
    }

    let mut rng = StdRng::seed_from_u64(KMEANS_SEED);
    let mut centers: Vec<Coord> = index::sample(&mut rng, n, k)
        .into_iter()
        .map(|i| points[i])
        .collect();

    let mut labels = vec![0usize; n];
    for iteration in 0..MAX_ITERATIONS {
        for (label, p) in labels.iter_mut().zip(points) {
            // centers is non-empty here since k > 0
            *label = nearest_center(p, &centers).unwrap_or(0);
        }

        let mut sums = vec![(0.0_f64, 0.0_f64, 0usize); k];
        for (&label, p) in labels.iter().zip(points) {
            let s = &mut sums[label];
            s.0 += p.lat;
            s.1 += p.lon;
            s.2 += 1;
        }
        let updated: Vec<Coord> = sums
            .iter()
            .zip(&centers)
            .map(|(&(lat, lon, count), old)| {
                if count == 0 {
                    *old
                } else {
                    Coord::new(lat / count as f64, lon / count as f64)
                }
            })
            .collect();

        let converged = centers.iter().zip(&updated).all(|(a, b)| a.close_to(b));
        centers = updated;
        if converged {
            tracing::debug!(iteration, k, "k-means converged");
            break;
        }
    }
    centers
}
