//! # Pitch Detection Module
//!
//! Autocorrelation pitch estimation for a single mono frame. Each call is a
//! pure function of the frame, the sample rate and the settings; nothing is
//! carried from one frame to the next.
//!
//! ## Pipeline
//! 1. Low-pass pre-filter (frequency-domain brick wall)
//! 2. Hann window, then mean removal
//! 3. Autocorrelation, non-negative lags only
//! 4. Zero-padding of the correlation
//! 5. Peak search over the musically valid lag range
//! 6. Noise-floor check on the raw peak value
//! 7. Parabolic interpolation for sub-sample accuracy
//! 8. Lag to frequency

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::fft::{apply_hann_window, autocorrelation, low_pass_filter, remove_mean};

/// Tunable constants of the estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchConfig {
    /// Components above this frequency are removed before correlation (Hz).
    pub cutoff_hz: f64,
    /// Minimum raw correlation value at the peak for a frame to count as pitched.
    pub noise_floor: f64,
    /// Lowest detectable fundamental (Hz), about G0.
    pub min_frequency: f64,
    /// Highest detectable fundamental (Hz), about E8.
    pub max_frequency: f64,
    /// Length multiplier for the zero-padded correlation.
    pub zero_pad_factor: usize,
}

impl Default for PitchConfig {
    fn default() -> Self {
        PitchConfig {
            cutoff_hz: 1500.0,
            noise_floor: 1e-6,
            min_frequency: 24.0,
            max_frequency: 5000.0,
            zero_pad_factor: 8,
        }
    }
}

impl PitchConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |msg: &str| Err(ConfigurationError::InvalidSetting(msg.to_string()));
        if !(self.cutoff_hz.is_finite() && self.cutoff_hz > 0.0) {
            return invalid("cutoff_hz must be finite and positive");
        }
        if !(self.noise_floor.is_finite() && self.noise_floor >= 0.0) {
            return invalid("noise_floor must be finite and non-negative");
        }
        if !(self.min_frequency.is_finite() && self.min_frequency > 0.0) {
            return invalid("min_frequency must be finite and positive");
        }
        if !(self.max_frequency.is_finite() && self.max_frequency > self.min_frequency) {
            return invalid("max_frequency must be finite and above min_frequency");
        }
        if self.zero_pad_factor == 0 {
            return invalid("zero_pad_factor must be at least 1");
        }
        Ok(())
    }
}

/// Estimates the fundamental frequency of one frame.
///
/// # Arguments
/// * `frame` - Mono samples, finite values
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Estimator settings
///
/// # Returns
/// * `Some(frequency)` - Detected frequency in Hz
/// * `None` - No usable periodicity (silence, empty search range, weak peak)
pub fn detect_pitch(frame: &[f64], sample_rate: u32, config: &PitchConfig) -> Option<f64> {
    if frame.is_empty() || sample_rate == 0 {
        return None;
    }
    let rate = sample_rate as f64;
    let pad_factor = config.zero_pad_factor.max(1);

    let mut signal = low_pass_filter(frame, config.cutoff_hz, sample_rate);
    apply_hann_window(&mut signal);
    remove_mean(&mut signal);

    let corr = autocorrelation(&signal);
    // The correlation zero-padded to `padded_len`; the padding is never materialised.
    let padded_len = corr.len().saturating_mul(pad_factor);
    let padded = |i: usize| corr.get(i).copied().unwrap_or(0.0);

    let lag_min = (rate / config.max_frequency) as usize;
    let lag_max = ((rate / config.min_frequency) as usize).min(corr.len() - 1);
    let search_end = lag_max.saturating_mul(pad_factor).min(padded_len);
    if lag_min >= search_end {
        log::trace!("[PITCH] Empty lag window {}..{}", lag_min, search_end);
        return None;
    }

    let peak_idx = padded_argmax(&corr, lag_min, search_end);
    let peak_value = padded(peak_idx);
    if !peak_value.is_finite() || peak_value < config.noise_floor {
        log::trace!("[PITCH] Peak {:e} at lag {} below noise floor", peak_value, peak_idx);
        return None;
    }

    let refined_lag = if peak_idx >= 1 && peak_idx + 1 < padded_len {
        let neighbourhood = [padded(peak_idx - 1), peak_value, padded(peak_idx + 1)];
        (peak_idx - 1) as f64 + parabolic_interpolation(&neighbourhood, 1)
    } else {
        peak_idx as f64
    };
    let frequency = rate / refined_lag;

    log::trace!(
        "[PITCH] Peak at lag {} (refined {:.4}) -> {:.3} Hz",
        peak_idx,
        refined_lag,
        frequency
    );

    if frequency.is_finite() && frequency > 0.0 {
        Some(frequency)
    } else {
        None
    }
}

/// Index of the first maximum of the zero-padded correlation within
/// `start..end`. NaN values never win.
fn padded_argmax(corr: &[f64], start: usize, end: usize) -> usize {
    let real_end = end.min(corr.len());
    let mut best = start;
    let mut best_value = f64::NAN;
    for (i, &value) in corr.iter().enumerate().take(real_end).skip(start) {
        if value > best_value || best_value.is_nan() {
            best = i;
            best_value = value;
        }
    }
    // Every padded lag is zero, so only the first one can win.
    if end > real_end && (best_value < 0.0 || best_value.is_nan()) {
        best = real_end.max(start);
    }
    best
}

/// Fits a parabola through a peak and its two neighbours and returns the
/// fractional index of the vertex.
///
/// Peaks on either edge of the buffer, or a flat neighbourhood, return the
/// integer index unchanged.
pub fn parabolic_interpolation(values: &[f64], peak_idx: usize) -> f64 {
    if peak_idx < 1 || peak_idx + 1 >= values.len() {
        return peak_idx as f64;
    }

    let left = values[peak_idx - 1];
    let center = values[peak_idx];
    let right = values[peak_idx + 1];

    let denominator = left - 2.0 * center + right;
    if denominator == 0.0 {
        return peak_idx as f64;
    }
    let shift = 0.5 * (left - right) / denominator;
    peak_idx as f64 + shift
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, sample_rate: u32, duration: f64, amplitude: f64) -> Vec<f64> {
        let n = (sample_rate as f64 * duration) as usize;
        (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin())
            .collect()
    }

    #[test]
    fn detects_a4_sine() {
        let frame = sine(440.0, 11025, 0.75, 0.5);
        let pitch = detect_pitch(&frame, 11025, &PitchConfig::default()).unwrap();
        assert!((pitch - 440.0).abs() < 2.0, "detected {}", pitch);
    }

    #[test]
    fn detects_across_the_keyboard() {
        for freq in [110.0, 261.63, 659.26, 987.77] {
            let frame = sine(freq, 11025, 0.75, 0.3);
            let pitch = detect_pitch(&frame, 11025, &PitchConfig::default()).unwrap();
            let cents = 1200.0 * (pitch / freq).log2();
            assert!(cents.abs() < 10.0, "{} Hz detected as {} Hz", freq, pitch);
        }
    }

    #[test]
    fn silence_is_absent() {
        let frame = vec![0.0; 8268];
        assert_eq!(detect_pitch(&frame, 11025, &PitchConfig::default()), None);
    }

    #[test]
    fn very_quiet_signal_falls_below_noise_floor() {
        let frame = sine(440.0, 11025, 0.75, 1e-6);
        assert_eq!(detect_pitch(&frame, 11025, &PitchConfig::default()), None);
    }

    #[test]
    fn degenerate_frames_are_absent() {
        let config = PitchConfig::default();
        assert_eq!(detect_pitch(&[], 11025, &config), None);
        assert_eq!(detect_pitch(&[0.5], 11025, &config), None);
        assert_eq!(detect_pitch(&[0.5, -0.5], 11025, &config), None);
        assert_eq!(detect_pitch(&sine(440.0, 11025, 0.1, 0.5), 0, &config), None);
    }

    #[test]
    fn oversized_padding_factor_does_not_overflow() {
        let huge = PitchConfig {
            zero_pad_factor: usize::MAX / 2,
            ..PitchConfig::default()
        };
        let frame = sine(440.0, 11025, 0.75, 0.5);
        if let Some(pitch) = detect_pitch(&frame[..64], 11025, &huge) {
            assert!(pitch.is_finite() && pitch > 0.0);
        }
        assert_eq!(
            detect_pitch(&frame, 11025, &huge),
            detect_pitch(&frame, 11025, &PitchConfig::default())
        );
    }

    #[test]
    fn padded_argmax_reaches_into_the_padding() {
        let corr = [5.0, -1.0, -2.0, -0.5];
        assert_eq!(padded_argmax(&corr, 1, 4), 3);
        assert_eq!(padded_argmax(&corr, 1, 8), 4);
        assert_eq!(padded_argmax(&corr, 6, 8), 6);
        assert_eq!(padded_argmax(&[1.0, 0.5, 2.0], 0, 3), 2);
    }

    #[test]
    fn parabolic_interpolation_cases() {
        assert_eq!(parabolic_interpolation(&[1.0, 3.0, 1.0], 1), 1.0);
        assert_eq!(parabolic_interpolation(&[2.0, 2.0, 2.0], 1), 1.0);
        assert_eq!(parabolic_interpolation(&[3.0, 1.0], 0), 0.0);
        assert_eq!(parabolic_interpolation(&[1.0, 3.0], 1), 1.0);

        // Vertex of y = -(x - 1.25)^2 sampled at 0, 1, 2.
        let samples: Vec<f64> = (0..3).map(|x| -((x as f64 - 1.25).powi(2))).collect();
        assert!((parabolic_interpolation(&samples, 1) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn config_validation() {
        assert!(PitchConfig::default().validate().is_ok());
        let config = PitchConfig {
            min_frequency: 6000.0,
            ..PitchConfig::default()
        };
        assert!(config.validate().is_err());
        let config = PitchConfig {
            zero_pad_factor: 0,
            ..PitchConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
