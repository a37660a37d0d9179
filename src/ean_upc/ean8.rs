use super::{
    draw_pattern, draw_symbols, encode_left, encode_right, EanUpc, CENTER_GUARD, LEFT_GUARD,
    RIGHT_GUARD,
};
use crate::barcode::{ModuleBased, Style, Symbology};
use crate::bits::BitSequence;
use crate::builder::Builder;
use crate::checksum::{Checksum, Modulo10};
use crate::error::Result;

/// EAN-8 driver.
#[derive(Debug, Clone)]
pub struct Ean8 {
    pub style: Style,
    pub module_width: f32,
    pub guard_extra_height: f32,
    checksum: Option<&'static dyn Checksum>,
}

impl Ean8 {
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

impl ModuleBased for Ean8 {
    fn module_width(&self) -> f32 {
        self.module_width
    }
}

impl EanUpc for Ean8 {
    const LENGTH: usize = 8;

    fn guard_extra_height(&self) -> f32 {
        self.guard_extra_height
    }

    fn checksum(&self) -> &dyn Checksum {
        self.checksum.unwrap_or(&Modulo10)
    }

    fn symbol_width(&self) -> Result<f32> {
        Ok(self.module_width * 67.0)
    }
}

impl Symbology for Ean8 {
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
        let texts = [&encoded.digits[..4], &encoded.digits[4..]];
        let odd: BitSequence = std::iter::repeat(true).take(4).collect();
        let left = encode_left(texts[0], &odd)?;
        let right = encode_right(texts[1])?;

        let style = &self.style;
        let m = self.module_width;
        let guard_height = style.bar_height + self.guard_extra();
        let (mut x, y) = self.begin(builder, encoded.width)?;
        let mut text_x = [0.0; 2];
        x = draw_pattern(builder, style, m, (x, y), guard_height, LEFT_GUARD)?;
        text_x[0] = x;
        x = draw_symbols(builder, style, m, (x, y), style.bar_height, &left);
        x = draw_pattern(builder, style, m, (x, y), guard_height, CENTER_GUARD)?;
        text_x[1] = x;
        x = draw_symbols(builder, style, m, (x, y), style.bar_height, &right);
        x = draw_pattern(builder, style, m, (x, y), guard_height, RIGHT_GUARD)?;

        style.draw_text(builder, false, &text_x, y - style.text_height()?, &texts)?;
        self.draw_supplement(builder, &encoded, x)
    }
}

#[cfg(test)]
use crate::builder::{Color, Recorder};
#[cfg(test)]
use crate::settings::TextPosition;

#[test]
fn test_draw() {
    let code = Ean8::new(Style::default(), 1.0, 10.0);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "1234567").unwrap();

    assert_eq!(code.width("1234567").unwrap(), 67.0 + 10.0 + 22.0);
    let bars: Vec<_> = recorder.rectangles(Color::BLACK).collect();
    assert_eq!(bars.len(), 6 + 8 * 2);
    let texts: Vec<_> = recorder.texts().map(|(text, x, _)| (text, x)).collect();
    assert_eq!(texts, vec![("1234", 19.0), ("5670", 52.0)]);
}

#[test]
fn test_without_text() {
    let mut style = Style::default();
    style.text_position = TextPosition::empty();
    let code = Ean8::new(style, 1.0, 10.0);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "12345670").unwrap();

    // guards are as high as the other bars
    assert_eq!(code.height().unwrap(), 60.0);
    assert!(recorder.rectangles(Color::BLACK).all(|(_, _, _, h)| h == 50.0));
    assert_eq!(recorder.texts().count(), 0);
}

#[test]
fn test_text_on_top() {
    let mut style = Style::default();
    style.text_position = TextPosition::ALL;
    let code = Ean8::new(style, 1.0, 10.0);
    assert!(!code.validate("1234567").unwrap_err().is_format());
}
