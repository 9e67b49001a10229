//! Yule-Walker AR estimates and the step-down stationarity test.

/// Biased sample autocovariances `γ(0..=max_lag)` of the demeaned series.
pub fn autocovariances(series: &[f64], max_lag: usize) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return vec![0.0; max_lag + 1];
    }
    let m = series.iter().sum::<f64>() / n as f64;
    (0..=max_lag)
        .map(|lag| {
            if lag >= n {
                return 0.0;
            }
            series[lag..]
                .iter()
                .zip(series)
                .map(|(a, b)| (a - m) * (b - m))
                .sum::<f64>()
                / n as f64
        })
        .collect()
}

/// Levinson-Durbin recursion on autocovariances `γ(0..=p)`.
///
/// Returns the AR(p) coefficients and the partial autocorrelations. A zero
/// `γ(0)` (constant series) gives all-zero coefficients.
pub fn levinson_durbin(acov: &[f64], p: usize) -> (Vec<f64>, Vec<f64>) {
    let mut phi = vec![0.0; p];
    let mut pacf = vec![0.0; p];
    if p == 0 || acov.len() <= p || acov[0] <= 0.0 {
        return (phi, pacf);
    }

    let mut error = acov[0];
    for k in 0..p {
        let mut num = acov[k + 1];
        for j in 0..k {
            num -= phi[j] * acov[k - j];
        }
        let reflection = num / error;
        pacf[k] = reflection;

        let previous = phi.clone();
        phi[k] = reflection;
        for j in 0..k {
            phi[j] = previous[j] - reflection * previous[k - 1 - j];
        }
        error *= 1.0 - reflection * reflection;
        if error <= 0.0 {
            break;
        }
    }
    (phi, pacf)
}

/// Yule-Walker AR(p) estimates.
pub fn yule_walker(series: &[f64], p: usize) -> Vec<f64> {
    levinson_durbin(&autocovariances(series, p), p).0
}

/// Whether `1 − φ₁z − … − φₚzᵖ` has all roots outside the unit circle.
///
/// Runs the Levinson recursion backwards: the polynomial is stable exactly
/// when every reflection coefficient has modulus below one.
pub fn is_stationary(coefficients: &[f64]) -> bool {
    let mut a = coefficients.to_vec();
    while let Some(&reflection) = a.last() {
        if !(reflection.abs() < 1.0) {
            return false;
        }
        let k = a.len();
        let scale = 1.0 - reflection * reflection;
        a = (0..k - 1)
            .map(|j| (a[j] + reflection * a[k - 2 - j]) / scale)
            .collect();
    }
    true
}

/// Whether `1 + θ₁z + … + θ_qz^q` has all roots outside the unit circle.
pub fn is_invertible(ma: &[f64]) -> bool {
    let negated: Vec<f64> = ma.iter().map(|t| -t).collect();
    is_stationary(&negated)
}
