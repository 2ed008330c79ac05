//! Linear-interpolation resampling to an arbitrary target length.

use crate::error::ResampleError;

/// Resample `sequence` to exactly `target_len` values.
///
/// The index domain `[0, len - 1]` is split into `target_len` equal-width bins
/// and the sequence is linearly interpolated at the centre of each bin. A
/// single-element input yields `target_len` copies of that element.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`ResampleError::EmptyInput`] | `sequence` is empty |
/// | [`ResampleError::ZeroTargetLength`] | `target_len == 0` |
pub fn interpolate(sequence: &[f64], target_len: usize) -> Result<Vec<f64>, ResampleError> {
    if sequence.is_empty() {
        return Err(ResampleError::EmptyInput);
    }
    if target_len == 0 {
        return Err(ResampleError::ZeroTargetLength);
    }
    if let [only] = sequence {
        return Ok(vec![*only; target_len]);
    }

    let last = sequence.len() - 1;
    let step = last as f64 / target_len as f64;
    let resampled = (0..target_len)
        .map(|k| {
            let x = step / 2.0 + k as f64 * step;
            sample_at(sequence, x.clamp(0.0, last as f64))
        })
        .collect();
    Ok(resampled)
}

/// Linear interpolation of `sequence` at fractional index `x` in `[0, len - 1]`.
fn sample_at(sequence: &[f64], x: f64) -> f64 {
    let last = sequence.len() - 1;
    let left = (x.floor() as usize).min(last);
    if left == last {
        return sequence[last];
    }
    let frac = x - left as f64;
    sequence[left] + frac * (sequence[left + 1] - sequence[left])
}
