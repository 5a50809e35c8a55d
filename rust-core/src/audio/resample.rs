//! Linear-interpolation sample-rate conversion
//!
//! Used for user-supplied material (filters, music) whose rate differs from
//! the analysis rate. No anti-aliasing: interpolation reads between the two
//! nearest source samples and never reads past the last one.

/// Resample `data` from `src_rate` to `dst_rate`
///
/// # Returns
/// A copy when the rates match, otherwise `round(len / src * dst)` samples
/// (at least one for non-empty input)
pub fn resample(data: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if src_rate == dst_rate || data.is_empty() || src_rate == 0 || dst_rate == 0 {
        return data.to_vec();
    }

    let new_length = ((data.len() as f64 / src_rate as f64) * dst_rate as f64).round() as usize;
    let new_length = new_length.max(1);

    let ratio = src_rate as f64 / dst_rate as f64;
    let last = data.len() - 1;

    (0..new_length)
        .map(|i| {
            let position = i as f64 * ratio;
            let index = (position.floor() as usize).min(last);
            let next = (index + 1).min(last);
            let frac = (position - index as f64).clamp(0.0, 1.0) as f32;

            data[index] + (data[next] - data[index]) * frac
        })
        .collect()
}
