//! # Stretch Curve Module
//!
//! A shape-preserving piecewise cubic (PCHIP) interpolant through the octave
//! stretch ratios. Between anchors the curve never overshoots the data, so a
//! notch in the measured stretch cannot turn into a wobble across an octave.
//! Outside the anchor range the end cubic segments are extended.

use crate::error::ConfigurationError;

/// MIDI positions of the stretch anchors: A0, then C1 through C8.
pub const OCTAVE_ANCHORS: [f64; 9] = [21.0, 24.0, 36.0, 48.0, 60.0, 72.0, 84.0, 96.0, 108.0];

/// Immutable monotone cubic interpolant over (MIDI position, ratio) points.
#[derive(Debug, Clone, PartialEq)]
pub struct StretchCurve {
    anchors: Vec<f64>,
    ratios: Vec<f64>,
    slopes: Vec<f64>,
}

impl StretchCurve {
    /// Builds the curve from the nine ratios at [`OCTAVE_ANCHORS`].
    pub fn from_octave_ratios(ratios: &[f64]) -> Result<Self, ConfigurationError> {
        if ratios.len() != OCTAVE_ANCHORS.len() {
            return Err(ConfigurationError::StretchCount {
                expected: OCTAVE_ANCHORS.len(),
                actual: ratios.len(),
            });
        }
        Self::new(&OCTAVE_ANCHORS, ratios)
    }

    /// A curve that leaves every note untouched.
    pub fn flat() -> Self {
        StretchCurve {
            anchors: OCTAVE_ANCHORS.to_vec(),
            ratios: vec![1.0; OCTAVE_ANCHORS.len()],
            slopes: vec![0.0; OCTAVE_ANCHORS.len()],
        }
    }

    /// Builds the curve from arbitrary anchors.
    ///
    /// Anchors must be strictly increasing, at least two, and paired with one
    /// finite positive ratio each.
    pub fn new(anchors: &[f64], ratios: &[f64]) -> Result<Self, ConfigurationError> {
        if anchors.len() < 2
            || anchors.len() != ratios.len()
            || anchors.iter().any(|a| !a.is_finite())
            || anchors.windows(2).any(|w| w[1] <= w[0])
        {
            return Err(ConfigurationError::InvalidAnchors);
        }
        if let Some((index, &value)) = ratios
            .iter()
            .enumerate()
            .find(|(_, r)| !r.is_finite() || **r <= 0.0)
        {
            return Err(ConfigurationError::InvalidRatio { index, value });
        }

        Ok(StretchCurve {
            anchors: anchors.to_vec(),
            ratios: ratios.to_vec(),
            slopes: pchip_slopes(anchors, ratios),
        })
    }

    /// Evaluates the stretch ratio at a (possibly fractional) MIDI position.
    ///
    /// Positions outside the anchor range are extrapolated from the nearest
    /// end segment. At an anchor the anchor's own ratio is returned exactly.
    pub fn evaluate(&self, midi_position: f64) -> f64 {
        let last = self.anchors.len() - 1;
        let segment = self
            .anchors
            .partition_point(|&a| a <= midi_position)
            .saturating_sub(1)
            .min(last - 1);

        let h = self.anchors[segment + 1] - self.anchors[segment];
        let t = midi_position - self.anchors[segment];
        if t == h {
            return self.ratios[segment + 1];
        }

        let y0 = self.ratios[segment];
        let y1 = self.ratios[segment + 1];
        let d0 = self.slopes[segment];
        let d1 = self.slopes[segment + 1];
        let delta = (y1 - y0) / h;

        let c2 = (3.0 * delta - 2.0 * d0 - d1) / h;
        let c3 = (d0 + d1 - 2.0 * delta) / (h * h);
        y0 + t * (d0 + t * (c2 + t * c3))
    }
}

/// Fritsch-Carlson derivatives: weighted harmonic mean of the neighbouring
/// secant slopes inside, zero at local extrema, three-point rule at the ends.
fn pchip_slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = y
        .windows(2)
        .zip(&h)
        .map(|(w, h)| (w[1] - w[0]) / h)
        .collect();

    if n == 2 {
        return vec![delta[0], delta[0]];
    }

    let mut slopes = vec![0.0; n];
    for k in 1..n - 1 {
        let (m0, m1) = (delta[k - 1], delta[k]);
        if m0 == 0.0 || m1 == 0.0 || m0.signum() != m1.signum() {
            continue;
        }
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        slopes[k] = (w1 + w2) / (w1 / m0 + w2 / m1);
    }

    slopes[0] = edge_slope(h[0], h[1], delta[0], delta[1]);
    slopes[n - 1] = edge_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    slopes
}

fn edge_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stretched() -> [f64; 9] {
        [0.985, 0.99, 0.995, 0.998, 1.0, 1.002, 1.006, 1.012, 1.02]
    }

    #[test]
    fn passes_through_every_anchor() {
        let curve = StretchCurve::from_octave_ratios(&stretched()).unwrap();
        for (anchor, ratio) in OCTAVE_ANCHORS.iter().zip(stretched()) {
            assert_eq!(curve.evaluate(*anchor), ratio);
        }
    }

    #[test]
    fn monotone_data_stays_monotone_between_anchors() {
        let curve = StretchCurve::from_octave_ratios(&stretched()).unwrap();
        let mut previous = curve.evaluate(21.0);
        for step in 1..=870 {
            let value = curve.evaluate(21.0 + step as f64 * 0.1);
            assert!(value >= previous - 1e-12, "dip at step {}", step);
            previous = value;
        }
    }

    #[test]
    fn no_overshoot_around_a_plateau() {
        let ratios = [1.0, 1.0, 1.0, 1.0, 1.01, 1.01, 1.01, 1.01, 1.01];
        let curve = StretchCurve::from_octave_ratios(&ratios).unwrap();
        for step in 0..=870 {
            let value = curve.evaluate(21.0 + step as f64 * 0.1);
            assert!((1.0 - 1e-12..=1.01 + 1e-12).contains(&value));
        }
    }

    #[test]
    fn flat_curve_extrapolates_flat() {
        let curve = StretchCurve::flat();
        assert_eq!(curve.evaluate(7.0), 1.0);
        assert_eq!(curve.evaluate(130.0), 1.0);
        let from_ratios = StretchCurve::from_octave_ratios(&[1.0; 9]).unwrap();
        assert_eq!(from_ratios.evaluate(7.0), 1.0);
        assert_eq!(from_ratios.evaluate(66.5), 1.0);
    }

    #[test]
    fn extrapolation_continues_the_end_segment() {
        let curve = StretchCurve::new(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!((curve.evaluate(-1.0) - 0.0).abs() < 1e-12);
        assert!((curve.evaluate(3.0) - 4.0).abs() < 1e-12);

        let two_points = StretchCurve::new(&[0.0, 2.0], &[1.0, 2.0]).unwrap();
        assert!((two_points.evaluate(1.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(matches!(
            StretchCurve::from_octave_ratios(&[1.0; 8]),
            Err(ConfigurationError::StretchCount { expected: 9, actual: 8 })
        ));
        assert!(matches!(
            StretchCurve::from_octave_ratios(&[1.0; 10]),
            Err(ConfigurationError::StretchCount { expected: 9, actual: 10 })
        ));
        assert!(matches!(
            StretchCurve::new(&[0.0, 0.0, 1.0], &[1.0; 3]),
            Err(ConfigurationError::InvalidAnchors)
        ));
        assert!(matches!(
            StretchCurve::new(&[0.0, 1.0], &[1.0, f64::NAN]),
            Err(ConfigurationError::InvalidRatio { index: 1, .. })
        ));
    }
}
