use super::{
    draw_pattern, draw_symbols, encode_left, encode_right, EanUpc, CENTER_GUARD, EAN13_PARITY,
    LEFT_GUARD, RIGHT_GUARD,
};
use crate::barcode::{ModuleBased, Style, Symbology};
use crate::builder::Builder;
use crate::checksum::{Checksum, Modulo10};
use crate::encode::digit;
use crate::error::Result;

/// EAN-13 driver.
///
/// The first digit is not drawn as bars but selects the parity pattern of
/// the left half.
#[derive(Debug, Clone)]
pub struct Ean13 {
    pub style: Style,
    pub module_width: f32,
    pub guard_extra_height: f32,
    checksum: Option<&'static dyn Checksum>,
}

impl Ean13 {
    pub fn new(style: Style, module_width: f32, guard_extra_height: f32) -> Self {
        Self {
            style,
            module_width,
            guard_extra_height,
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: &'static dyn Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }
}

impl ModuleBased for Ean13 {
    fn module_width(&self) -> f32 {
        self.module_width
    }
}

impl EanUpc for Ean13 {
    const LENGTH: usize = 13;

    fn guard_extra_height(&self) -> f32 {
        self.guard_extra_height
    }

    fn checksum(&self) -> &dyn Checksum {
        self.checksum.unwrap_or(&Modulo10)
    }

    fn symbol_width(&self) -> Result<f32> {
        Ok(self.module_width * 95.0 + self.style.text_width()?)
    }
}

impl Symbology for Ean13 {
    fn style(&self) -> &Style {
        &self.style
    }

    fn validate(&self, data: &str) -> Result<String> {
        self.encode(data).map(|e| e.normalized())
    }

    fn width(&self, data: &str) -> Result<f32> {
        self.encode(data).map(|e| e.width)
    }

    fn height(&self) -> Result<f32> {
        self.layout_height()
    }

    fn draw(&self, builder: &mut dyn Builder, data: &str) -> Result<()> {
        let encoded = self.encode(data)?;
        let digits = encoded.digits.as_str();
        let texts = [&digits[..1], &digits[1..7], &digits[7..]];
        let parity = EAN13_PARITY.get(digit(texts[0].chars().next().unwrap_or('0'))? as usize)?;
        let left = encode_left(texts[1], &parity)?;
        let right = encode_right(texts[2])?;

        let style = &self.style;
        let m = self.module_width;
        let guard_height = style.bar_height + self.guard_extra();
        let (mut x, y) = self.begin(builder, encoded.width)?;
        let mut text_x = [x, 0.0, 0.0];
        x += style.text_width()?;
        x = draw_pattern(builder, style, m, (x, y), guard_height, LEFT_GUARD)?;
        text_x[1] = x;
        x = draw_symbols(builder, style, m, (x, y), style.bar_height, &left);
        x = draw_pattern(builder, style, m, (x, y), guard_height, CENTER_GUARD)?;
        text_x[2] = x;
        x = draw_symbols(builder, style, m, (x, y), style.bar_height, &right);
        x = draw_pattern(builder, style, m, (x, y), guard_height, RIGHT_GUARD)?;

        style.draw_text(builder, false, &text_x, y - style.text_height()?, &texts)?;
        self.draw_supplement(builder, &encoded, x)
    }
}

#[cfg(test)]
use crate::builder::{Color, Recorder};
#[cfg(test)]
use crate::error::FormatError;

#[test]
fn test_check_digit() {
    let code = Ean13::new(Style::default(), 1.0, 10.0);
    assert_eq!(code.validate("400638133393").unwrap(), "4006381333931");
    assert_eq!(code.validate("4006381333931").unwrap(), "4006381333931");
    assert_eq!(code.validate("750103131130").unwrap(), "7501031311309");
    assert_eq!(
        code.validate("4006381333932"),
        Err(FormatError::InvalidCheckDigit { expected: '1' }.into())
    );
    assert_eq!(
        code.validate("40063813339"),
        Err(FormatError::InvalidLength {
            expected: "12 or 13",
            found: 11
        }
        .into())
    );
    assert_eq!(code.validate("40063813339a"), Err(FormatError::NonNumeric.into()));
}

#[test]
fn test_draw() {
    let code = Ean13::new(Style::default(), 1.0, 10.0);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "400638133393").unwrap();

    // 95 modules, the leading digit, offsets and two quiet zones of 11
    let width = 95.0 + 11.0 + 10.0 + 22.0;
    assert_eq!(recorder.canvas().map(|(w, _)| w), Some(width));
    assert!((code.height().unwrap() - 72.8).abs() < 1e-4);

    let bars: Vec<_> = recorder.rectangles(Color::BLACK).collect();
    // three guards and twelve digits, two bars each
    assert_eq!(bars.len(), 30);
    assert_eq!(bars[0], (27.0, 5.0, 1.0, 60.0));
    // 4 selects parity 101100, the first 0 is odd, the second even
    assert_eq!(bars[2], (33.0, 5.0, 2.0, 50.0));
    assert_eq!(bars[4], (38.0, 5.0, 1.0, 50.0));
    assert_eq!(bars[5], (41.0, 5.0, 3.0, 50.0));

    let texts: Vec<_> = recorder.texts().map(|(text, x, _)| (text, x)).collect();
    assert_eq!(
        texts,
        vec![("4", 16.0), ("006381", 30.0), ("333931", 77.0)]
    );
}

#[test]
fn test_supplement() {
    let code = Ean13::new(Style::default(), 1.0, 10.0);
    let plain = code.width("4006381333931").unwrap();
    assert_eq!(code.width("40063813339312").unwrap(), plain + 11.0 + 20.0);
    assert_eq!(code.width("400638133393152495").unwrap(), plain + 11.0 + 47.0);
    assert_eq!(
        code.validate("4006381333931123"),
        Err(FormatError::SupplementLength(3).into())
    );
    let normalized = code.validate("40063813339312").unwrap();
    assert_eq!(normalized, "400638133393112");
    assert_eq!(code.validate(&normalized).unwrap(), normalized);

    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "40063813339312").unwrap();
    let (text, x, y) = recorder.texts().last().unwrap();
    assert_eq!(text, "12");
    // centered above the supplement bars, which start 11 modules after the
    // right guard
    assert_eq!(x, 122.0 + 11.0 + 10.0);
    assert!((y - 5.0).abs() < 1e-4);
}
