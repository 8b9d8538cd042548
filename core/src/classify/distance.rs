use serde::{Deserialize, Serialize};

use crate::prelude::{ClassifyError, ClassifyResult};

/// Pinhole proportionality model mapping apparent size to distance.
///
/// `focal_length_w` and `focal_length_h` are effective focal lengths in
/// pixels for the horizontal and vertical axes; `real_width` and
/// `real_height` are the physical extents of the target. The constants are
/// calibration data for one camera/target pairing and are never derived at
/// runtime. Defaults match the 2019 vision tape calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangingModel {
    pub focal_length_w: f64,
    pub focal_length_h: f64,
    pub real_width: f64,
    pub real_height: f64,
}

impl Default for RangingModel {
    fn default() -> Self {
        Self {
            focal_length_w: 393.903,
            focal_length_h: 370.815,
            real_width: 3.313,
            real_height: 5.825,
        }
    }
}

impl RangingModel {
    /// Distance estimate averaging the width- and height-derived values.
    /// Zero apparent extents cannot be ranged and are rejected.
    pub fn estimate(&self, apparent_width: f64, apparent_height: f64) -> ClassifyResult<f64> {
        if apparent_width == 0.0 || apparent_height == 0.0 {
            return Err(ClassifyError::InvalidMeasurement(format!(
                "apparent size {}x{}",
                apparent_width, apparent_height
            )));
        }
        let from_width = self.focal_length_w * self.real_width / apparent_width;
        let from_height = self.focal_length_h * self.real_height / apparent_height;
        Ok((from_width + from_height) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_averages_both_axes() {
        let model = RangingModel::default();
        let expected_w = 393.903 * 3.313 / 40.0;
        let expected_h = 370.815 * 5.825 / 60.0;
        let distance = model.estimate(40.0, 60.0).unwrap();
        assert!((distance - (expected_w + expected_h) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn width_term_inverts_the_projection() {
        // Apparent width of a target at distance d is focal * real / d, so
        // feeding that width back in must recover d on the width term.
        let model = RangingModel::default();
        let d = 165.65;
        let apparent_w = model.focal_length_w * model.real_width / d;
        let apparent_h = model.focal_length_h * model.real_height / d;
        let distance = model.estimate(apparent_w, apparent_h).unwrap();
        assert!((distance - d).abs() < 1e-9);
    }

    #[test]
    fn zero_extent_is_rejected() {
        let model = RangingModel::default();
        assert!(matches!(
            model.estimate(0.0, 10.0),
            Err(ClassifyError::InvalidMeasurement(_))
        ));
        assert!(matches!(
            model.estimate(10.0, 0.0),
            Err(ClassifyError::InvalidMeasurement(_))
        ));
    }
}
