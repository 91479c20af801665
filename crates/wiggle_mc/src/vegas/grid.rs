//! Rectilinear importance grid.
//!
//! Each dimension of the unit hypercube is divided into `bins` intervals of
//! equal probability but varying width. Sampling picks an interval uniformly
//! and a point uniformly inside it, so narrow intervals concentrate points.
//! After every iteration the interval edges move towards the regions that
//! contributed most to the variance (Lepage's damped refinement).

/// Importance grid over the unit hypercube.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    dims: usize,
    bins: usize,
    /// `dims * (bins + 1)` interval edges; row `j` holds dimension `j`.
    edges: Vec<f64>,
}

impl Grid {
    /// Uniform grid.
    pub fn uniform(dims: usize, bins: usize) -> Self {
        let mut grid = Self {
            dims,
            bins,
            edges: vec![0.0; dims * (bins + 1)],
        };
        grid.reset();
        grid
    }

    /// Restores equal-width intervals.
    pub fn reset(&mut self) {
        let bins = self.bins;
        for row in self.edges.chunks_mut(bins + 1) {
            for (k, edge) in row.iter_mut().enumerate() {
                *edge = k as f64 / bins as f64;
            }
        }
    }

    /// Number of dimensions.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.dims
    }

    /// Number of intervals per dimension.
    #[inline]
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Interval edges of dimension `dim` (`bins + 1` values from 0 to 1).
    #[inline]
    pub fn edges(&self, dim: usize) -> &[f64] {
        let stride = self.bins + 1;
        &self.edges[dim * stride..(dim + 1) * stride]
    }

    /// Maps uniform variates to grid coordinates.
    ///
    /// Writes the unit-cube position of the sample into `position` and the
    /// selected interval of each dimension into `interval`. Returns the
    /// Jacobian of the map.
    #[inline]
    pub fn map(&self, uniform: &[f64], position: &mut [f64], interval: &mut [usize]) -> f64 {
        let stride = self.bins + 1;
        let scale = self.bins as f64;
        let mut jacobian = 1.0;
        for j in 0..self.dims {
            let z = uniform[j] * scale;
            let k = (z as usize).min(self.bins - 1);
            let row = &self.edges[j * stride..(j + 1) * stride];
            let lower = row[k];
            let width = row[k + 1] - lower;
            position[j] = lower + (z - k as f64) * width;
            interval[j] = k;
            jacobian *= width * scale;
        }
        jacobian
    }

    /// Moves interval edges according to accumulated importance.
    ///
    /// `importance` holds `dims * bins` non-negative sums of squared weights.
    /// Dimensions with no finite positive importance keep their edges.
    pub fn refine(&mut self, importance: &[f64], alpha: f64) {
        let bins = self.bins;
        let stride = bins + 1;
        let mut smoothed = vec![0.0; bins];
        let mut weight = vec![0.0; bins];
        let mut new_edges = vec![0.0; stride];

        for j in 0..self.dims {
            let d = &importance[j * bins..(j + 1) * bins];

            // neighbour smoothing
            let mut old = d[0];
            let mut new = d[1];
            smoothed[0] = 0.5 * (old + new);
            let mut total = smoothed[0];
            for i in 1..bins - 1 {
                let rc = old + new;
                old = new;
                new = d[i + 1];
                smoothed[i] = (rc + new) / 3.0;
                total += smoothed[i];
            }
            smoothed[bins - 1] = 0.5 * (new + old);
            total += smoothed[bins - 1];

            if !(total.is_finite() && total > 0.0) {
                continue;
            }

            let mut total_weight = 0.0;
            for i in 0..bins {
                weight[i] = 0.0;
                if smoothed[i] > 0.0 {
                    let ratio = total / smoothed[i];
                    weight[i] = if ratio > 1.0 + 1e-12 {
                        ((ratio - 1.0) / ratio / ratio.ln()).powf(alpha)
                    } else {
                        1.0
                    };
                }
                total_weight += weight[i];
            }
            if !(total_weight.is_finite() && total_weight > 0.0) {
                continue;
            }

            let per_bin = total_weight / bins as f64;
            let row = &self.edges[j * stride..(j + 1) * stride];
            let mut x_new = 0.0;
            let mut accumulated = 0.0;
            let mut next = 1;
            for k in 0..bins {
                accumulated += weight[k];
                let x_old = x_new;
                x_new = row[k + 1];
                while accumulated > per_bin && next < bins {
                    accumulated -= per_bin;
                    new_edges[next] = x_new - (x_new - x_old) * accumulated / weight[k];
                    next += 1;
                }
            }
            // rounding can leave the last interior edge unset
            for edge in new_edges.iter_mut().take(bins).skip(next) {
                *edge = 1.0;
            }

            let row = &mut self.edges[j * stride..(j + 1) * stride];
            row[0] = 0.0;
            row[1..bins].copy_from_slice(&new_edges[1..bins]);
            row[bins] = 1.0;
        }
    }
}
