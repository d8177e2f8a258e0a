//! Color models and small matrix utilities for deficiency simulation
//!
//! Simulation operates in linear RGB or in LMS cone-response space. The two
//! LMS transforms below are the ones published alongside the corresponding
//! reduction algorithms, so each simulator uses the matrix pair its
//! coefficients were derived for.

/// Row-major 3x3 transform matrix
pub type Mat3 = [[f64; 3]; 3];

/// Identity transform
pub const IDENTITY: Mat3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Paired forward and inverse transforms between linear RGB and LMS space
#[derive(Debug, Clone, Copy)]
pub struct LmsModel {
    /// Linear RGB to LMS transform
    pub from_rgb: Mat3,
    /// LMS to linear RGB transform
    pub to_rgb: Mat3,
}

impl LmsModel {
    /// LMS response of the RGB white point under this model
    pub const fn white(&self) -> [f64; 3] {
        [
            self.from_rgb[0][0] + self.from_rgb[0][1] + self.from_rgb[0][2],
            self.from_rgb[1][0] + self.from_rgb[1][1] + self.from_rgb[1][2],
            self.from_rgb[2][0] + self.from_rgb[2][1] + self.from_rgb[2][2],
        ]
    }
}

/// Smith–Pokorny cone fundamentals as scaled for the Viénot 1999 reduction
///
/// The protan/deutan/tritan reduction coefficients in the simulator module
/// were published against exactly this transform
pub const VIENOT_LMS: LmsModel = LmsModel {
    from_rgb: [
        [17.8824, 43.5161, 4.11935],
        [3.45565, 27.1554, 3.86714],
        [0.029_956_6, 0.184309, 1.46709],
    ],
    to_rgb: [
        [0.080_944_447_9, -0.130_504_409, 0.116_721_066],
        [-0.010_248_533_5, 0.054_019_326_6, -0.113_614_708],
        [-0.000_365_296_938, -0.004_121_614_69, 0.693_511_405],
    ],
};

/// Smith–Pokorny transform used with the Brettel 1997 half-plane anchors
pub const BRETTEL_LMS: LmsModel = LmsModel {
    from_rgb: [
        [0.050_599_83, 0.085_853_69, 0.009_524_20],
        [0.018_930_33, 0.089_253_08, 0.013_700_54],
        [0.002_922_02, 0.009_757_32, 0.071_459_79],
    ],
    to_rgb: [
        [30.830_854, -29.832_659, 1.610_474],
        [-6.481_468, 17.715_578, -2.532_642],
        [-0.375_690, -1.199_062, 14.273_846],
    ],
};

// Monochromatic anchor stimuli in BRETTEL_LMS space. Each dichromat
// projection plane passes through the white axis and one anchor.
/// LMS response of 475 nm light (protan/deutan short-wavelength anchor)
pub const ANCHOR_475: [f64; 3] = [0.08008, 0.1579, 0.5897];
/// LMS response of 485 nm light (tritan short-wavelength anchor)
pub const ANCHOR_485: [f64; 3] = [0.1284, 0.2237, 0.3636];
/// LMS response of 575 nm light (protan/deutan long-wavelength anchor)
pub const ANCHOR_575: [f64; 3] = [0.9856, 0.7325, 0.001_079];
/// LMS response of 660 nm light (tritan long-wavelength anchor)
pub const ANCHOR_660: [f64; 3] = [0.0914, 0.007_009, 0.0001];

/// Apply a 3x3 transform to a column vector
pub fn mul_vec(m: &Mat3, v: [f64; 3]) -> [f64; 3] {
    [
        m[0][2].mul_add(v[2], m[0][0].mul_add(v[0], m[0][1] * v[1])),
        m[1][2].mul_add(v[2], m[1][0].mul_add(v[0], m[1][1] * v[1])),
        m[2][2].mul_add(v[2], m[2][0].mul_add(v[0], m[2][1] * v[1])),
    ]
}

/// Cross product of two vectors
pub fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1].mul_add(b[2], -(a[2] * b[1])),
        a[2].mul_add(b[0], -(a[0] * b[2])),
        a[0].mul_add(b[1], -(a[1] * b[0])),
    ]
}

/// Blend two vectors component-wise, `t` = 0 yields `a`, `t` = 1 yields `b`
pub fn lerp_vec(a: [f64; 3], b: [f64; 3], t: f64) -> [f64; 3] {
    [
        (b[0] - a[0]).mul_add(t, a[0]),
        (b[1] - a[1]).mul_add(t, a[1]),
        (b[2] - a[2]).mul_add(t, a[2]),
    ]
}

/// Decode an 8-bit sRGB sample to linear light
pub fn srgb_to_linear(value: u8) -> f64 {
    let v = f64::from(value) / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode linear light back to a clamped 8-bit sRGB sample
pub fn linear_to_srgb(value: f64) -> u8 {
    let v = value.clamp(0.0, 1.0);
    let encoded = if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055f64.mul_add(v.powf(1.0 / 2.4), -0.055)
    };
    (encoded * 255.0).round() as u8
}
