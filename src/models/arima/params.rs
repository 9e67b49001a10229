//! Search-space parametrization of the ARMA coefficients.
//!
//! With enforcement on, each polynomial is searched through its partial
//! autocorrelations: `rₖ = tanh(αₖ)` keeps every reflection coefficient in
//! (−1, 1) and the Levinson recursion turns them into coefficients, so any
//! point the optimizer visits is stationary (AR) or invertible (MA).

/// Largest partial autocorrelation the constrained search can reach.
const MAX_PARTIAL: f64 = 0.999;

/// Map unconstrained values to the coefficients of a stable polynomial
/// `1 − c₁z − … − cₖzᵏ`.
pub(crate) fn unconstrained_to_coefficients(alpha: &[f64]) -> Vec<f64> {
    let k = alpha.len();
    let mut phi = vec![0.0; k];
    for (m, a) in alpha.iter().enumerate() {
        let r = a.tanh();
        let previous = phi.clone();
        phi[m] = r;
        for j in 0..m {
            phi[j] = previous[j] - r * previous[m - 1 - j];
        }
    }
    phi
}

/// Unconstrained value of a partial autocorrelation, clipped to the
/// searchable range.
pub(crate) fn partial_to_unconstrained(r: f64) -> f64 {
    r.clamp(-MAX_PARTIAL, MAX_PARTIAL).atanh()
}

/// How the optimizer's parameter vector maps to AR and MA coefficients.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParameterMap {
    pub p: usize,
    pub q: usize,
    pub enforce_stationarity: bool,
    pub enforce_invertibility: bool,
}

impl ParameterMap {
    /// Starting point from Yule-Walker AR estimates (and their partial
    /// autocorrelations), with MA terms at zero.
    pub fn initial(&self, ar: &[f64], partials: &[f64]) -> Vec<f64> {
        let mut start: Vec<f64> = if self.enforce_stationarity {
            partials.iter().map(|r| partial_to_unconstrained(*r)).collect()
        } else {
            ar.to_vec()
        };
        start.resize(self.p + self.q, 0.0);
        start
    }

    /// Box bounds for the search; constrained blocks stop just short of the
    /// unit circle.
    pub fn bounds(&self) -> Vec<(f64, f64)> {
        let limit = MAX_PARTIAL.atanh();
        let block = |enforced: bool| {
            if enforced {
                (-limit, limit)
            } else {
                (f64::NEG_INFINITY, f64::INFINITY)
            }
        };
        let mut bounds = vec![block(self.enforce_stationarity); self.p];
        bounds.extend(vec![block(self.enforce_invertibility); self.q]);
        bounds
    }

    /// AR and MA coefficients (MA in the `1 + θ₁B + …` convention).
    pub fn coefficients(&self, params: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let (a, m) = params.split_at(self.p);
        let ar = if self.enforce_stationarity {
            unconstrained_to_coefficients(a)
        } else {
            a.to_vec()
        };
        let ma = if self.enforce_invertibility {
            unconstrained_to_coefficients(m).iter().map(|c| -c).collect()
        } else {
            m.to_vec()
        };
        (ar, ma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::arima::yule_walker::{is_invertible, is_stationary, levinson_durbin};
    use approx::assert_relative_eq;

    #[test]
    fn single_coefficient_is_tanh() {
        assert!(unconstrained_to_coefficients(&[]).is_empty());
        assert_relative_eq!(unconstrained_to_coefficients(&[0.0])[0], 0.0);
        assert_relative_eq!(unconstrained_to_coefficients(&[0.4])[0], 0.4_f64.tanh(), epsilon = 1e-15);
        assert!((unconstrained_to_coefficients(&[10.0])[0] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn inverts_the_levinson_recursion() {
        // AR(2) autocovariances with φ = (0.5, 0.3)
        let (phi1, phi2) = (0.5, 0.3);
        let rho1 = phi1 / (1.0 - phi2);
        let rho2 = phi1 * rho1 + phi2;
        let (phi, partials) = levinson_durbin(&[1.0, rho1, rho2], 2);
        let alpha: Vec<f64> = partials.iter().map(|r| partial_to_unconstrained(*r)).collect();
        let back = unconstrained_to_coefficients(&alpha);
        assert_relative_eq!(back[0], phi[0], epsilon = 1e-12);
        assert_relative_eq!(back[1], phi[1], epsilon = 1e-12);
        assert_relative_eq!(back[1], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn every_point_maps_to_a_stable_model() {
        let map = ParameterMap {
            p: 2,
            q: 2,
            enforce_stationarity: true,
            enforce_invertibility: true,
        };
        let bounds = map.bounds();
        for params in [
            vec![1.0, -2.0, 3.0, 0.5],
            vec![-3.0, 2.0, -0.1, 4.0],
            vec![bounds[0].1, bounds[1].1, bounds[2].0, bounds[3].1],
        ] {
            let (ar, ma) = map.coefficients(&params);
            assert!(is_stationary(&ar), "AR {ar:?}");
            assert!(is_invertible(&ma), "MA {ma:?}");
        }
    }

    #[test]
    fn unenforced_blocks_pass_through() {
        let map = ParameterMap {
            p: 1,
            q: 1,
            enforce_stationarity: false,
            enforce_invertibility: false,
        };
        assert_eq!(map.coefficients(&[1.3, -1.7]), (vec![1.3], vec![-1.7]));
        assert_eq!(map.initial(&[0.6], &[0.6]), vec![0.6, 0.0]);
        assert!(map.bounds().iter().all(|(lo, hi)| lo.is_infinite() && hi.is_infinite()));
    }

    #[test]
    fn initial_point_reproduces_seed_coefficients() {
        let map = ParameterMap {
            p: 1,
            q: 1,
            enforce_stationarity: true,
            enforce_invertibility: true,
        };
        let start = map.initial(&[0.6], &[0.6]);
        let (ar, ma) = map.coefficients(&start);
        assert_relative_eq!(ar[0], 0.6, epsilon = 1e-12);
        assert_eq!(ma, vec![0.0]);
        // Seeds beyond the searchable range are pulled inside it.
        let (ar, _) = map.coefficients(&map.initial(&[1.0], &[1.0]));
        assert_relative_eq!(ar[0], MAX_PARTIAL, epsilon = 1e-12);
    }
}
