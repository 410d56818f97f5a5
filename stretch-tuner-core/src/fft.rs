//! # Fast Fourier Transform (FFT) Module
//!
//! Frame-level building blocks for the pitch estimator: a brick-wall low-pass
//! filter in the frequency domain, Hann windowing, mean removal and an
//! FFT-based linear autocorrelation.
//!
//! ## Features
//! - High-performance FFT using RustFFT
//! - Hann windowing for reduced edge discontinuities
//! - DC offset removal before correlation
//! - Autocorrelation without circular wrap-around

use rustfft::{FftPlanner, num_complex::Complex};

/// Removes the DC offset from a signal by making its average value zero.
///
/// # Arguments
/// * `signal` - Audio signal to process (modified in-place)
pub fn remove_mean(signal: &mut [f64]) {
    let len = signal.len();
    if len == 0 {
        return;
    }
    let avg = signal.iter().sum::<f64>() / len as f64;
    for sample in signal.iter_mut() {
        *sample -= avg;
    }
}

/// Applies a symmetric Hann window of the buffer's length.
///
/// The first and last samples are scaled to zero; a single-sample buffer is
/// left untouched.
pub fn apply_hann_window(buffer: &mut [f64]) {
    let n = buffer.len();
    if n < 2 {
        return;
    }
    let n_minus_1 = (n - 1) as f64;
    for (i, sample) in buffer.iter_mut().enumerate() {
        let multiplier = 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / n_minus_1).cos());
        *sample *= multiplier;
    }
}

/// Zeroes every frequency component above `cutoff_hz` and returns the
/// filtered signal, which has the same length as the input.
///
/// Bin `k` sits at `k * sample_rate / n` Hz; its negative-frequency mirror
/// `n - k` is cleared along with it so the output stays real.
pub fn low_pass_filter(signal: &[f64], cutoff_hz: f64, sample_rate: u32) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f64>::new();
    let mut buffer = to_complex(signal, n);
    planner.plan_fft_forward(n).process(&mut buffer);

    let bin_width = sample_rate as f64 / n as f64;
    for k in 0..=n / 2 {
        if k as f64 * bin_width > cutoff_hz {
            buffer[k] = Complex::new(0.0, 0.0);
            buffer[(n - k) % n] = Complex::new(0.0, 0.0);
        }
    }

    planner.plan_fft_inverse(n).process(&mut buffer);
    let scale = 1.0 / n as f64;
    buffer.iter().map(|c| c.re * scale).collect()
}

/// Computes the autocorrelation for lags `0..signal.len()`.
///
/// Equivalent to the non-negative half of the full linear correlation of the
/// signal with itself. The transform is padded to at least `2n - 1` points so
/// no lag wraps around.
pub fn autocorrelation(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let fft_size = (2 * n - 1).next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let mut buffer = to_complex(signal, fft_size);
    planner.plan_fft_forward(fft_size).process(&mut buffer);

    // Power spectral density: multiply by the complex conjugate.
    for value in buffer.iter_mut() {
        *value = Complex::new(value.norm_sqr(), 0.0);
    }

    planner.plan_fft_inverse(fft_size).process(&mut buffer);
    let scale = 1.0 / fft_size as f64;
    buffer.iter().take(n).map(|c| c.re * scale).collect()
}

fn to_complex(signal: &[f64], len: usize) -> Vec<Complex<f64>> {
    let mut buffer: Vec<Complex<f64>> = signal
        .iter()
        .map(|&sample| Complex { re: sample, im: 0.0 })
        .collect();
    buffer.resize(len, Complex::new(0.0, 0.0));
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn direct_autocorrelation(signal: &[f64]) -> Vec<f64> {
        (0..signal.len())
            .map(|lag| {
                signal
                    .iter()
                    .zip(&signal[lag..])
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let mut buffer = [1.0_f64; 11];
        apply_hann_window(&mut buffer);
        assert!(buffer[0].abs() < 1e-15);
        assert!((buffer[5] - 1.0).abs() < 1e-15);
        assert!(buffer[10].abs() < 1e-15);
        assert!((buffer[2] - buffer[8]).abs() < 1e-12);

        let mut single = [0.7];
        apply_hann_window(&mut single);
        assert_eq!(single, [0.7]);
    }

    #[test]
    fn mean_removal_centres_the_signal() {
        let mut signal = vec![1.0, 2.0, 3.0, 6.0];
        remove_mean(&mut signal);
        assert_eq!(signal, vec![-2.0, -1.0, 0.0, 3.0]);
    }

    #[test]
    fn autocorrelation_matches_direct_sum() {
        let signal: Vec<f64> = (0..37).map(|i| ((i * 7919) % 13) as f64 - 6.0).collect();
        let fast = autocorrelation(&signal);
        let direct = direct_autocorrelation(&signal);
        assert_eq!(fast.len(), signal.len());
        for (f, d) in fast.iter().zip(&direct) {
            assert!((f - d).abs() < 1e-9, "{} vs {}", f, d);
        }
    }

    #[test]
    fn low_pass_keeps_low_and_removes_high_tones() {
        let sample_rate = 8000;
        let n = 800;
        let low: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 200.0 * i as f64 / sample_rate as f64).sin())
            .collect();
        let mixed: Vec<f64> = low
            .iter()
            .enumerate()
            .map(|(i, s)| s + (2.0 * PI * 3000.0 * i as f64 / sample_rate as f64).sin())
            .collect();

        let filtered = low_pass_filter(&mixed, 1500.0, sample_rate);
        assert_eq!(filtered.len(), n);
        for (f, l) in filtered.iter().zip(&low) {
            assert!((f - l).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_inputs_stay_empty() {
        assert!(low_pass_filter(&[], 1500.0, 11025).is_empty());
        assert!(autocorrelation(&[]).is_empty());
    }
}
