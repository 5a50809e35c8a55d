//! Level measurement and gain normalization

/// Floor used when dividing by a measured level
pub const EPS: f32 = 1e-20;

/// Root-mean-square level: sqrt(mean(x^2))
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_of_squares / samples.len() as f64).sqrt() as f32
}

/// Scale an impulse response to unit L2 norm, in place
///
/// Zero, negative or non-finite norms leave the input untouched.
pub fn normalize_impulse(ir: &mut [f32]) {
    let norm = ir
        .iter()
        .map(|&s| (s as f64) * (s as f64))
        .sum::<f64>()
        .sqrt();

    if !norm.is_finite() || norm <= 0.0 {
        return;
    }

    let scale = (1.0 / norm) as f32;
    for s in ir.iter_mut() {
        *s *= scale;
    }
}

/// Rescale `signal` so its RMS equals `target_rms`
///
/// # Returns
/// The applied gain, or `None` when the signal RMS is at or below `EPS`
/// (signal left as-is)
pub fn match_rms(signal: &mut [f32], target_rms: f32) -> Option<f32> {
    let current = rms(signal);
    if current <= EPS {
        return None;
    }

    let gain = target_rms / current;
    for s in signal.iter_mut() {
        *s *= gain;
    }
    Some(gain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn l2(x: &[f32]) -> f32 {
        x.iter().map(|s| s * s).sum::<f32>().sqrt()
    }

    #[test]
    fn test_rms_of_constant() {
        assert!((rms(&[0.5; 100]) - 0.5).abs() < 1e-7);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_normalize_unit_norm() {
        let mut ir = vec![3.0, 4.0];
        normalize_impulse(&mut ir);
        assert!((ir[0] - 0.6).abs() < 1e-6);
        assert!((ir[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_is_noop() {
        let mut ir = vec![0.0; 16];
        normalize_impulse(&mut ir);
        assert!(ir.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_normalize_non_finite_is_noop() {
        let mut ir = vec![1.0, f32::NAN];
        normalize_impulse(&mut ir);
        assert_eq!(ir[0], 1.0);

        let mut ir = vec![f32::INFINITY, 1.0];
        normalize_impulse(&mut ir);
        assert_eq!(ir[1], 1.0);
    }

    #[test]
    fn test_match_rms() {
        let mut signal = vec![0.1, -0.1, 0.1, -0.1];
        let gain = match_rms(&mut signal, 0.5).unwrap();

        assert!((gain - 5.0).abs() < 1e-5);
        assert!((rms(&signal) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_match_rms_skips_silence() {
        let mut signal = vec![0.0; 32];
        assert_eq!(match_rms(&mut signal, 1.0), None);
        assert!(signal.iter().all(|&s| s == 0.0));
    }

    proptest! {
        #[test]
        fn prop_normalized_norm_is_one(ir in proptest::collection::vec(-10.0f32..10.0, 1..512)) {
            prop_assume!(l2(&ir) > 1e-3);
            let mut ir = ir;
            normalize_impulse(&mut ir);
            prop_assert!((l2(&ir) - 1.0).abs() < 1e-4);
        }
    }
}
