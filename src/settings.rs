use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::builder::{Color, Font};
use crate::error::Result;
use crate::unit::{self, Unit, SCREEN_DPI};

bitflags! {
    /// Where the human readable text is printed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct TextPosition: u8 {
        const TOP = 1;
        const BOTTOM = 2;
        const ALL = Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl Default for TextPosition {
    fn default() -> Self {
        TextPosition::BOTTOM
    }
}

/// The supported symbologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BarcodeType {
    Standard25,
    Interleaved25,
    Code39,
    #[default]
    Code128,
    Ean8,
    Ean13,
    Upca,
    Upce,
    PostNet,
}

impl BarcodeType {
    pub const ALL: [BarcodeType; 9] = [
        BarcodeType::Standard25,
        BarcodeType::Interleaved25,
        BarcodeType::Code39,
        BarcodeType::Code128,
        BarcodeType::Ean8,
        BarcodeType::Ean13,
        BarcodeType::Upca,
        BarcodeType::Upce,
        BarcodeType::PostNet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BarcodeType::Standard25 => "Standard25",
            BarcodeType::Interleaved25 => "Interleaved25",
            BarcodeType::Code39 => "Code39",
            BarcodeType::Code128 => "Code128",
            BarcodeType::Ean8 => "Ean8",
            BarcodeType::Ean13 => "Ean13",
            BarcodeType::Upca => "Upca",
            BarcodeType::Upce => "Upce",
            BarcodeType::PostNet => "PostNet",
        }
    }
}

impl fmt::Display for BarcodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing a [`BarcodeType`] from an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown barcode type {0:?}")]
pub struct ParseBarcodeTypeError(String);

impl FromStr for BarcodeType {
    type Err = ParseBarcodeTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BarcodeType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseBarcodeTypeError(s.to_string()))
    }
}

/// Everything needed to render a barcode.
///
/// All lengths are given in [`unit`](Self::unit). Which of the widths are
/// used depends on the symbology: module based ones use `module_width`,
/// thickness based ones `narrow_width` and `wide_width`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    pub kind: BarcodeType,
    pub data: String,
    pub unit: Unit,
    pub dpi: f32,
    pub bar_height: f32,
    /// How much longer EAN and UPC guard bars are.
    pub guard_extra_height: f32,
    pub module_width: f32,
    pub narrow_width: f32,
    pub wide_width: f32,
    pub offset_width: f32,
    pub offset_height: f32,
    pub quiet_zone: f32,
    pub back_color: Color,
    pub bar_color: Color,
    pub font_color: Color,
    pub font: Font,
    pub text_position: TextPosition,
    /// Only used by symbologies where the check digit is optional.
    pub use_checksum: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kind: BarcodeType::Code128,
            data: "12345".to_string(),
            unit: Unit::Pixel,
            dpi: SCREEN_DPI,
            bar_height: 50.0,
            guard_extra_height: 10.0,
            module_width: 1.0,
            narrow_width: 1.0,
            wide_width: 3.0,
            offset_width: 5.0,
            offset_height: 5.0,
            quiet_zone: 0.0,
            back_color: Color::WHITE,
            bar_color: Color::BLACK,
            font_color: Color::BLACK,
            font: Font::default(),
            text_position: TextPosition::BOTTOM,
            use_checksum: false,
        }
    }
}

impl Settings {
    pub fn new(kind: BarcodeType, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: data.into(),
            ..Self::default()
        }
    }

    pub fn with_text_position(mut self, text_position: TextPosition) -> Self {
        self.text_position = text_position;
        self
    }

    pub fn with_checksum(mut self, use_checksum: bool) -> Self {
        self.use_checksum = use_checksum;
        self
    }

    pub fn with_unit(mut self, unit: Unit, dpi: f32) -> Self {
        self.unit = unit;
        self.dpi = dpi;
        self
    }

    fn lengths_mut(&mut self) -> [&mut f32; 8] {
        [
            &mut self.bar_height,
            &mut self.guard_extra_height,
            &mut self.module_width,
            &mut self.narrow_width,
            &mut self.wide_width,
            &mut self.offset_width,
            &mut self.offset_height,
            &mut self.quiet_zone,
        ]
    }

    /// Express all lengths in another unit.
    pub fn convert_units(&mut self, to: Unit) -> Result<()> {
        let (from, dpi) = (self.unit, self.dpi);
        for length in self.lengths_mut() {
            *length = unit::convert(*length, from, to, dpi)?;
        }
        self.unit = to;
        Ok(())
    }

    /// Change the resolution, pixel lengths are scaled to keep their
    /// physical size.
    pub fn convert_dpi(&mut self, to: f32) -> Result<()> {
        let (unit, from) = (self.unit, self.dpi);
        for length in self.lengths_mut() {
            *length = unit::convert_dpi(*length, unit, from, to)?;
        }
        self.dpi = to;
        Ok(())
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.kind, BarcodeType::Code128);
    assert_eq!(settings.data, "12345");
    assert_eq!(settings.text_position, TextPosition::BOTTOM);
    assert!(!settings.use_checksum);
}

#[test]
fn test_text_position() {
    assert_eq!(TextPosition::ALL, TextPosition::TOP | TextPosition::BOTTOM);
    assert!(TextPosition::ALL.contains(TextPosition::TOP));
    assert!(!TextPosition::empty().intersects(TextPosition::ALL));
}

#[test]
fn test_parse_type() {
    for kind in BarcodeType::ALL {
        assert_eq!(kind.to_string().parse(), Ok(kind));
    }
    assert_eq!("postnet".parse(), Ok(BarcodeType::PostNet));
    assert!("qr".parse::<BarcodeType>().is_err());
}

#[test]
fn test_convert_units() {
    let mut settings = Settings::default();
    settings.convert_units(Unit::Inch).unwrap();
    assert_eq!(settings.unit, Unit::Inch);
    assert!((settings.bar_height - 50.0 / 96.0).abs() < 1e-6);

    settings.convert_units(Unit::Pixel).unwrap();
    assert_eq!(settings.bar_height, 50.0);
    assert_eq!(settings.wide_width, 3.0);
}

#[test]
fn test_convert_dpi() {
    let mut settings = Settings::default();
    settings.convert_dpi(300.0).unwrap();
    assert_eq!(settings.dpi, 300.0);
    assert_eq!(settings.bar_height, 157.0);
    assert_eq!(settings.module_width, 4.0);

    let mut settings = Settings::default();
    settings.convert_units(Unit::Millimeter).unwrap();
    let before = settings.clone();
    settings.convert_dpi(300.0).unwrap();
    assert_eq!(settings.bar_height, before.bar_height);
}
