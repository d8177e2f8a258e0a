//! Pluggable color vision deficiency simulators
//!
//! Three published dichromacy reductions are implemented: the Viénot 1999
//! single-matrix projection, the Brettel 1997 two half-plane projection, and
//! the Machado 2009 linear-RGB matrices. All of them honor the same pixel
//! contract: an (H, W, 3) RGB array in, a same-shaped array out, with the
//! result blended against the original by severity in linear light.

use crate::io::error::Result;
use crate::simulate::model::{
    ANCHOR_475, ANCHOR_485, ANCHOR_575, ANCHOR_660, BRETTEL_LMS, LmsModel, Mat3, VIENOT_LMS,
    cross, lerp_vec, linear_to_srgb, mul_vec, srgb_to_linear,
};
use clap::ValueEnum;
use ndarray::Array3;
use std::fmt;

/// Type of color vision deficiency to simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Deficiency {
    /// Missing or anomalous long-wavelength (L) cones
    Protan,
    /// Missing or anomalous medium-wavelength (M) cones
    Deutan,
    /// Missing or anomalous short-wavelength (S) cones
    Tritan,
}

impl Deficiency {
    /// Lowercase name used in directory suffixes and CLI values
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Protan => "protan",
            Self::Deutan => "deutan",
            Self::Tritan => "tritan",
        }
    }

    /// Index of the cone axis removed by this deficiency (L, M, S order)
    const fn missing_axis(self) -> usize {
        match self {
            Self::Protan => 0,
            Self::Deutan => 1,
            Self::Tritan => 2,
        }
    }
}

impl fmt::Display for Deficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simulation algorithm applied to each image
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SimulatorKind {
    /// Viénot, Brettel and Mollon 1999 single-matrix reduction
    Vienot,
    /// Brettel, Viénot and Mollon 1997 two half-plane reduction
    Brettel,
    /// Machado, Oliveira and Fernandes 2009 linear-RGB matrices
    Machado,
}

impl SimulatorKind {
    /// Lowercase name used in directory suffixes and CLI values
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vienot => "vienot",
            Self::Brettel => "brettel",
            Self::Machado => "machado",
        }
    }

    /// Simulate a deficiency over an RGB pixel array
    ///
    /// Severity 0 reproduces the input; severity 1 is full dichromacy;
    /// intermediate values blend the two in linear light.
    ///
    /// # Errors
    ///
    /// Returns an error if `severity` is outside `0.0..=1.0` or the array is
    /// not of shape (H, W, 3)
    pub fn simulate(
        self,
        pixels: &Array3<u8>,
        deficiency: Deficiency,
        severity: f32,
    ) -> Result<Array3<u8>> {
        let severity = validate_severity(severity)?;
        let (height, width, channels) = pixels.dim();
        if channels != 3 {
            return Err(crate::io::error::invalid_parameter(
                "pixels",
                &format!("{height}x{width}x{channels}"),
                &"expected a (height, width, 3) RGB array",
            ));
        }

        let transform = PixelTransform::new(self, deficiency);
        let mut output = Array3::zeros((height, width, 3));

        for row in 0..height {
            for col in 0..width {
                let sample = |c: usize| pixels.get((row, col, c)).copied().unwrap_or(0);
                let original = [
                    srgb_to_linear(sample(0)),
                    srgb_to_linear(sample(1)),
                    srgb_to_linear(sample(2)),
                ];
                let simulated = transform.apply(original);
                let blended = lerp_vec(original, simulated, severity);
                for (c, value) in blended.iter().enumerate() {
                    if let Some(cell) = output.get_mut((row, col, c)) {
                        *cell = linear_to_srgb(*value);
                    }
                }
            }
        }

        Ok(output)
    }
}

impl fmt::Display for SimulatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a CLI severity value and widen it for pixel math
///
/// # Errors
///
/// Returns an error if the value is not a finite number in `0.0..=1.0`
pub fn validate_severity(severity: f32) -> Result<f64> {
    if severity.is_finite() && (0.0..=1.0).contains(&severity) {
        Ok(f64::from(severity))
    } else {
        Err(crate::io::error::invalid_parameter(
            "severity",
            &severity,
            &"severity must lie in 0.0..=1.0",
        ))
    }
}

// Per-pixel dichromat reduction, resolved once per image.
enum PixelTransform {
    Projection { model: LmsModel, reduction: Mat3 },
    HalfPlanes(BrettelParams),
    RgbMatrix(Mat3),
}

impl PixelTransform {
    fn new(kind: SimulatorKind, deficiency: Deficiency) -> Self {
        match kind {
            SimulatorKind::Vienot => Self::Projection {
                model: VIENOT_LMS,
                reduction: vienot_reduction(deficiency),
            },
            SimulatorKind::Brettel => Self::HalfPlanes(BrettelParams::new(deficiency)),
            SimulatorKind::Machado => Self::RgbMatrix(machado_matrix(deficiency)),
        }
    }

    fn apply(&self, rgb_linear: [f64; 3]) -> [f64; 3] {
        match self {
            Self::Projection { model, reduction } => {
                let lms = mul_vec(&model.from_rgb, rgb_linear);
                mul_vec(&model.to_rgb, mul_vec(reduction, lms))
            }
            Self::HalfPlanes(params) => params.apply(rgb_linear),
            Self::RgbMatrix(matrix) => mul_vec(matrix, rgb_linear),
        }
    }
}

// Viénot 1999 reduction matrices, paired with VIENOT_LMS.
const fn vienot_reduction(deficiency: Deficiency) -> Mat3 {
    match deficiency {
        Deficiency::Protan => [
            [0.0, 2.02344, -2.52581],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        Deficiency::Deutan => [
            [1.0, 0.0, 0.0],
            [0.494_207, 0.0, 1.24827],
            [0.0, 0.0, 1.0],
        ],
        Deficiency::Tritan => [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-0.395_913, 0.801_109, 0.0],
        ],
    }
}

// Machado 2009 full-severity matrices in linear RGB.
const fn machado_matrix(deficiency: Deficiency) -> Mat3 {
    match deficiency {
        Deficiency::Protan => [
            [0.152_286, 1.052_583, -0.204_868],
            [0.114_503, 0.786_281, 0.099_216],
            [-0.003_882, -0.048_116, 1.051_998],
        ],
        Deficiency::Deutan => [
            [0.367_322, 0.860_646, -0.227_968],
            [0.280_085, 0.672_501, 0.047_413],
            [-0.011_820, 0.042_940, 0.968_881],
        ],
        Deficiency::Tritan => [
            [1.255_528, -0.076_749, -0.178_779],
            [-0.078_411, 0.930_809, 0.147_602],
            [0.004_733, 0.691_367, 0.303_900],
        ],
    }
}

// Brettel 1997 projection state: two wing planes meeting along the white
// axis, each extended through a monochromatic anchor. A pixel projects onto
// the plane whose side of the white axis it falls on.
struct BrettelParams {
    plane_long: [f64; 3],
    plane_short: [f64; 3],
    inflection: f64,
    missing: usize,
    ratio_num: usize,
    ratio_den: usize,
}

impl BrettelParams {
    fn new(deficiency: Deficiency) -> Self {
        let white = BRETTEL_LMS.white();
        let (anchor_long, anchor_short) = match deficiency {
            Deficiency::Protan | Deficiency::Deutan => (ANCHOR_575, ANCHOR_475),
            Deficiency::Tritan => (ANCHOR_660, ANCHOR_485),
        };
        // The side test compares the two retained cone responses against the
        // white point's ratio of the same pair.
        let (ratio_num, ratio_den) = match deficiency {
            Deficiency::Protan => (2, 1),
            Deficiency::Deutan => (2, 0),
            Deficiency::Tritan => (1, 0),
        };

        Self {
            plane_long: cross(white, anchor_long),
            plane_short: cross(white, anchor_short),
            inflection: component(white, ratio_num) / component(white, ratio_den),
            missing: deficiency.missing_axis(),
            ratio_num,
            ratio_den,
        }
    }

    fn apply(&self, rgb_linear: [f64; 3]) -> [f64; 3] {
        let mut lms = mul_vec(&BRETTEL_LMS.from_rgb, rgb_linear);

        let ratio = component(lms, self.ratio_num) / component(lms, self.ratio_den);
        let plane = if ratio < self.inflection {
            self.plane_long
        } else {
            self.plane_short
        };

        // Solve plane . lms = 0 for the missing cone response.
        let (a, b) = match self.missing {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        let solved = -component(plane, a).mul_add(component(lms, a), component(plane, b) * component(lms, b))
            / component(plane, self.missing);
        if let Some(cell) = lms.get_mut(self.missing) {
            *cell = solved;
        }

        mul_vec(&BRETTEL_LMS.to_rgb, lms)
    }
}

// Bounds-checked component access; indices come from the fixed axis tables.
fn component(v: [f64; 3], index: usize) -> f64 {
    v.get(index).copied().unwrap_or(0.0)
}
