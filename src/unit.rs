use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ContractError, Result};

/// Resolution assumed for screens when nothing else is known.
pub const SCREEN_DPI: f32 = 96.0;

/// Linear unit of measure used for all barcode dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Unit {
    Centimeter,
    Millimeter,
    Inch,
    #[default]
    Pixel,
}

const IN2CM: f64 = 2.54;
const CM2MM: f64 = 10.0;

// indexed by [source][target] for centimeter, millimeter and inch
const RATIOS: [[f64; 3]; 3] = [
    [1.0, CM2MM, 1.0 / IN2CM],
    [1.0 / CM2MM, 1.0, 1.0 / (IN2CM * CM2MM)],
    [IN2CM, IN2CM * CM2MM, 1.0],
];

// pixel results within this many f32 steps of an integer are not rounded up
const PIXEL_TOLERANCE_ULPS: f64 = 4.0;

impl Unit {
    fn index(self) -> usize {
        match self {
            Unit::Centimeter => 0,
            Unit::Millimeter => 1,
            Unit::Inch | Unit::Pixel => 2,
        }
    }

    /// Short name as used in CSS and most UIs.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Unit::Centimeter => "cm",
            Unit::Millimeter => "mm",
            Unit::Inch => "in",
            Unit::Pixel => "px",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Returned when parsing a [`Unit`] from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown unit {0:?}")]
pub struct ParseUnitError(String);

impl FromStr for Unit {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cm" | "centimeter" => Ok(Unit::Centimeter),
            "mm" | "millimeter" => Ok(Unit::Millimeter),
            "in" | "inch" => Ok(Unit::Inch),
            "px" | "pixel" => Ok(Unit::Pixel),
            _ => Err(ParseUnitError(s.to_string())),
        }
    }
}

fn check_dpi(dpi: f32) -> Result<()> {
    if dpi > 0.0 {
        Ok(())
    } else {
        Err(ContractError::InvalidDpi(dpi).into())
    }
}

fn ceil_pixels(pixels: f64) -> f64 {
    let nearest = pixels.round();
    let tolerance = nearest.abs().max(1.0) * f32::EPSILON as f64 * PIXEL_TOLERANCE_ULPS;
    if (pixels - nearest).abs() <= tolerance {
        nearest
    } else {
        pixels.ceil()
    }
}

/// Convert `value` from one unit to another.
///
/// Pixels are related to inches by `dpi`. Results in pixels are rounded up
/// so a canvas computed from them never is too small.
pub fn convert(value: f32, from: Unit, to: Unit, dpi: f32) -> Result<f32> {
    check_dpi(dpi)?;
    if from == to {
        return Ok(value);
    }

    let mut converted = value as f64;
    if from == Unit::Pixel {
        converted /= dpi as f64;
    }
    converted *= RATIOS[from.index()][to.index()];
    if to == Unit::Pixel {
        converted = ceil_pixels(converted * dpi as f64);
    }
    Ok(converted as f32)
}

/// Factor turning lengths in `from` at `from_dpi` into lengths in `to` at
/// `to_dpi`, without any rounding.
pub fn scale_factor(from: Unit, from_dpi: f32, to: Unit, to_dpi: f32) -> Result<f64> {
    check_dpi(from_dpi)?;
    check_dpi(to_dpi)?;
    if from == Unit::Pixel && to == Unit::Pixel {
        return Ok(to_dpi as f64 / from_dpi as f64);
    }
    let mut factor = RATIOS[from.index()][to.index()];
    if from == Unit::Pixel {
        factor /= from_dpi as f64;
    }
    if to == Unit::Pixel {
        factor *= to_dpi as f64;
    }
    Ok(factor)
}

/// Rescale a value for a device with a different resolution.
///
/// Only pixel values change, physical units keep their size.
pub fn convert_dpi(value: f32, unit: Unit, from_dpi: f32, to_dpi: f32) -> Result<f32> {
    check_dpi(from_dpi)?;
    check_dpi(to_dpi)?;
    if unit != Unit::Pixel || from_dpi == to_dpi {
        return Ok(value);
    }
    Ok(ceil_pixels(value as f64 * to_dpi as f64 / from_dpi as f64) as f32)
}

#[cfg(test)]
fn assert_close(expected: f32, actual: f32, epsilon: f32) {
    assert!(
        (expected - actual).abs() <= epsilon,
        "{actual} not within {epsilon} of {expected}"
    );
}

#[test]
fn test_conversions() {
    use Unit::*;
    let eps = 0.0002;
    assert_close(234.0, convert(234.0, Centimeter, Centimeter, 96.0).unwrap(), eps);
    assert_close(2340.0, convert(234.0, Centimeter, Millimeter, 96.0).unwrap(), eps);
    assert_close(100.0, convert(254.0, Centimeter, Inch, 96.0).unwrap(), eps);
    assert_close(234.5, convert(2345.0, Millimeter, Centimeter, 96.0).unwrap(), eps);
    assert_close(92.322835, convert(2345.0, Millimeter, Inch, 96.0).unwrap(), eps);
    assert_close(1432.56, convert(564.0, Inch, Centimeter, 96.0).unwrap(), 0.001);
    assert_close(14325.6, convert(564.0, Inch, Millimeter, 96.0).unwrap(), 0.01);
    assert_close(1.0, convert(96.0, Pixel, Inch, 96.0).unwrap(), eps);
    assert_eq!(convert(123.0, Pixel, Pixel, 96.0).unwrap(), 123.0);
}

#[test]
fn test_to_pixels() {
    use Unit::*;
    for dpi in [96.0, 312.0] {
        assert_eq!(convert(1.0, Inch, Pixel, dpi).unwrap(), dpi);
        let cm = convert(1.0, Inch, Centimeter, dpi).unwrap();
        assert_eq!(convert(cm, Centimeter, Pixel, dpi).unwrap(), dpi);
        let mm = convert(1.0, Inch, Millimeter, dpi).unwrap();
        assert_eq!(convert(mm, Millimeter, Pixel, dpi).unwrap(), dpi);

        let cm = convert(dpi, Pixel, Centimeter, dpi).unwrap();
        assert_close(1.0, convert(cm, Centimeter, Inch, dpi).unwrap(), 0.0002);
    }

    // 1mm is 3.78px at 96 dpi
    assert_eq!(convert(1.0, Millimeter, Pixel, 96.0).unwrap(), 4.0);
    // slightly more than an inch is more than its pixels
    assert_eq!(convert(1.000001, Inch, Pixel, 96.0).unwrap(), 97.0);
    assert_eq!(convert(1.0001, Inch, Pixel, 96.0).unwrap(), 97.0);
    assert_eq!(convert_dpi(96.0, Pixel, 96.0, 96.0001).unwrap(), 97.0);
}

#[test]
fn test_chained_conversions() {
    use Unit::*;
    let values = [2987645.0, 0.0001, 1.0, 10.0, 500.0, 1.00231];
    let epsilons = [1.0, 0.0001, 0.0001, 0.0001, 0.0001, 0.0001];
    let chain = [
        Inch, Millimeter, Centimeter, Inch, Centimeter, Millimeter, Centimeter, Inch, Centimeter,
        Inch,
    ];
    for (value, eps) in values.into_iter().zip(epsilons) {
        let converted = chain
            .windows(2)
            .try_fold(value, |v, units| convert(v, units[0], units[1], 96.0))
            .unwrap();
        assert_close(value, converted, eps);
    }
}

#[test]
fn test_dpi_conversions() {
    assert_eq!(convert_dpi(123.0, Unit::Inch, 96.0, 300.0).unwrap(), 123.0);
    assert_eq!(convert_dpi(123.0, Unit::Centimeter, 96.0, 300.0).unwrap(), 123.0);
    assert_eq!(convert_dpi(96.0, Unit::Pixel, 96.0, 300.0).unwrap(), 300.0);
    assert_eq!(convert_dpi(331.0, Unit::Pixel, 96.0, 300.0).unwrap(), 1035.0);
}

#[test]
fn test_scale_factor() {
    assert_eq!(scale_factor(Unit::Pixel, 96.0, Unit::Pixel, 96.0).unwrap(), 1.0);
    assert_eq!(scale_factor(Unit::Pixel, 96.0, Unit::Pixel, 300.0).unwrap(), 3.125);
    let factor = scale_factor(Unit::Inch, 96.0, Unit::Millimeter, 96.0).unwrap();
    assert!((factor - 25.4).abs() < 1e-9);
}

#[test]
fn test_invalid_dpi() {
    assert_eq!(
        convert(1.0, Unit::Inch, Unit::Pixel, 0.0),
        Err(ContractError::InvalidDpi(0.0).into())
    );
    assert!(convert_dpi(1.0, Unit::Pixel, 96.0, -1.0).is_err());
}

#[test]
fn test_parse() {
    assert_eq!("MM".parse(), Ok(Unit::Millimeter));
    assert_eq!(Unit::Inch.to_string().parse(), Ok(Unit::Inch));
    assert!("furlong".parse::<Unit>().is_err());
}
