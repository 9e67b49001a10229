//! Derivative-free minimization used by the likelihood-based estimators.

use std::cmp::Ordering;

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// The objective value at the best point.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the convergence criterion was met within the budget.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Convergence tolerance on the spread of objective values across the
    /// simplex, relative to `1 + |f(best)|`.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Initial simplex step for coordinates that start at zero; non-zero
    /// coordinates step by this fraction of their magnitude.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

/// Simplex vertices with their objective values, kept sorted best-first.
struct Simplex {
    vertices: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| {
            self.values[a]
                .partial_cmp(&self.values[b])
                .unwrap_or(Ordering::Equal)
        });
        self.vertices = order.iter().map(|&i| self.vertices[i].clone()).collect();
        self.values = order.iter().map(|&i| self.values[i]).collect();
    }

    fn worst(&self) -> usize {
        self.values.len() - 1
    }

    /// Centroid of every vertex except the worst.
    fn centroid(&self) -> Vec<f64> {
        let dim = self.vertices[0].len();
        let count = self.worst() as f64;
        let mut c = vec![0.0; dim];
        for v in &self.vertices[..self.worst()] {
            for (cj, vj) in c.iter_mut().zip(v) {
                *cj += vj;
            }
        }
        c.iter_mut().for_each(|cj| *cj /= count);
        c
    }

    fn diameter(&self) -> f64 {
        let best = &self.vertices[0];
        self.vertices
            .iter()
            .map(|v| {
                v.iter()
                    .zip(best)
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max)
    }

    fn replace_worst(&mut self, point: Vec<f64>, value: f64) {
        let w = self.worst();
        self.vertices[w] = point;
        self.values[w] = value;
    }
}

/// Point `from + t * (to - from)`, clamped to the bounds.
fn along(from: &[f64], to: &[f64], t: f64, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    let point: Vec<f64> = from.iter().zip(to).map(|(f, g)| f + t * (g - f)).collect();
    clamp(point, bounds)
}

fn clamp(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(b) = bounds {
        for (x, &(lo, hi)) in point.iter_mut().zip(b) {
            *x = x.clamp(lo, hi);
        }
    }
    point
}

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// Non-finite objective values are treated as worse than any finite value,
/// so the simplex steers away from regions where the objective blows up.
///
/// # Example
/// ```
/// use anofox_estimate::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Minimize (x-2)^2 + (y-3)^2
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_finite() {
            v
        } else {
            f64::MAX
        }
    };

    let start = clamp(initial.to_vec(), bounds);
    let mut vertices = vec![start.clone()];
    for i in 0..n {
        let mut v = start.clone();
        v[i] += if start[i].abs() > 1e-10 {
            config.initial_step * start[i].abs()
        } else {
            config.initial_step
        };
        vertices.push(clamp(v, bounds));
    }
    let values = vertices.iter().map(|v| eval(v)).collect();
    let mut simplex = Simplex { vertices, values };

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        simplex.sort();
        let best = simplex.values[0];
        let worst = simplex.values[n];
        let second_worst = simplex.values[n - 1];

        if worst - best <= config.tolerance * (1.0 + best.abs())
            || simplex.diameter() < config.tolerance
        {
            converged = true;
            break;
        }
        iterations += 1;

        let centroid = simplex.centroid();
        let reflected = along(&centroid, &simplex.vertices[n], -config.alpha, bounds);
        let f_reflected = eval(&reflected);

        if f_reflected < best {
            let expanded = along(&centroid, &reflected, config.gamma, bounds);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex.replace_worst(expanded, f_expanded);
            } else {
                simplex.replace_worst(reflected, f_reflected);
            }
            continue;
        }

        if f_reflected < second_worst {
            simplex.replace_worst(reflected, f_reflected);
            continue;
        }

        let (contracted, f_contracted) = if f_reflected < worst {
            let c = along(&centroid, &reflected, config.rho, bounds);
            let f = eval(&c);
            (c, f)
        } else {
            let c = along(&centroid, &simplex.vertices[n], config.rho, bounds);
            let f = eval(&c);
            (c, f)
        };
        if f_contracted < f_reflected.min(worst) {
            simplex.replace_worst(contracted, f_contracted);
            continue;
        }

        // Shrink every vertex towards the best one.
        let anchor = simplex.vertices[0].clone();
        for i in 1..=n {
            let shrunk = along(&anchor, &simplex.vertices[i], config.sigma, bounds);
            simplex.values[i] = eval(&shrunk);
            simplex.vertices[i] = shrunk;
        }
    }

    simplex.sort();
    NelderMeadResult {
        optimal_point: simplex.vertices[0].clone(),
        optimal_value: simplex.values[0],
        iterations,
        converged,
    }
}
