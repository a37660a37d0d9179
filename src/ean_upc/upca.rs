use super::{
    draw_pattern, draw_symbols, encode_left, encode_right, EanUpc, CENTER_GUARD, LEFT_GUARD,
    RIGHT_GUARD,
};
use crate::barcode::{ModuleBased, Style, Symbology};
use crate::bits::{pop_back, pop_front, BitSequence};
use crate::builder::Builder;
use crate::checksum::{Checksum, Modulo10};
use crate::error::{ContractError, Result};

/// UPC-A driver.
///
/// The number system and the check digit are printed beside the bars, and
/// their symbols are drawn as high as the guards.
#[derive(Debug, Clone)]
pub struct Upca {
    pub style: Style,
    pub module_width: f32,
    pub guard_extra_height: f32,
    checksum: Option<&'static dyn Checksum>,
}

impl Upca {
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

impl ModuleBased for Upca {
    fn module_width(&self) -> f32 {
        self.module_width
    }
}

impl EanUpc for Upca {
    const LENGTH: usize = 12;

    fn guard_extra_height(&self) -> f32 {
        self.guard_extra_height
    }

    fn checksum(&self) -> &dyn Checksum {
        self.checksum.unwrap_or(&Modulo10)
    }

    fn symbol_width(&self) -> Result<f32> {
        Ok(self.module_width * 95.0 + self.style.text_width()? * 2.0)
    }
}

impl Symbology for Upca {
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
        let texts = [&digits[..1], &digits[1..6], &digits[6..11], &digits[11..]];
        let odd: BitSequence = std::iter::repeat(true).take(6).collect();
        let mut left = encode_left(&digits[..6], &odd)?;
        let mut right = encode_right(&digits[6..])?;
        let (first, last) = match (pop_front(&mut left), pop_back(&mut right)) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ContractError::InvalidPattern(digits.to_string()).into()),
        };

        let style = &self.style;
        let m = self.module_width;
        let text_width = style.text_width()?;
        let guard_height = style.bar_height + self.guard_extra();
        let (mut x, y) = self.begin(builder, encoded.width)?;
        let mut text_x = [x, 0.0, 0.0, 0.0];
        x += text_width;
        x = draw_pattern(builder, style, m, (x, y), guard_height, LEFT_GUARD)?;
        x = draw_symbols(builder, style, m, (x, y), guard_height, &[first]);
        text_x[1] = x;
        x = draw_symbols(builder, style, m, (x, y), style.bar_height, &left);
        x = draw_pattern(builder, style, m, (x, y), guard_height, CENTER_GUARD)?;
        text_x[2] = x;
        x = draw_symbols(builder, style, m, (x, y), style.bar_height, &right);
        x = draw_symbols(builder, style, m, (x, y), guard_height, &[last]);
        x = draw_pattern(builder, style, m, (x, y), guard_height, RIGHT_GUARD)?;
        text_x[3] = x;

        style.draw_text(builder, false, &text_x, y - style.text_height()?, &texts)?;
        self.draw_supplement(builder, &encoded, x + text_width)
    }
}

#[cfg(test)]
use crate::builder::{Color, Recorder};

#[test]
fn test_draw() {
    let code = Upca::new(Style::default(), 1.0, 10.0);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "03600029145").unwrap();

    assert_eq!(code.width("03600029145").unwrap(), 95.0 + 22.0 + 10.0 + 22.0);
    let texts: Vec<_> = recorder.texts().map(|(text, x, _)| (text, x)).collect();
    assert_eq!(
        texts,
        vec![("0", 16.0), ("36000", 37.0), ("29145", 77.0), ("2", 122.0)]
    );

    let bars: Vec<_> = recorder.rectangles(Color::BLACK).collect();
    assert_eq!(bars.len(), 30);
    let tall = bars.iter().filter(|(_, _, _, h)| *h == 60.0).count();
    // three guards and the outer two digits
    assert_eq!(tall, 6 + 4);
}

#[test]
fn test_supplement_position() {
    let code = Upca::new(Style::default(), 1.0, 10.0);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "0360002914512").unwrap();
    // after the check digit text and the gap
    let (text, x, _) = recorder.texts().last().unwrap();
    assert_eq!(text, "12");
    assert_eq!(x, 122.0 + 11.0 + 11.0 + 10.0);
}
