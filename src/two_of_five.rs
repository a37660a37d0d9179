//! The 2 of 5 family: Standard (Industrial) and Interleaved.
//!
//! Each digit has five elements, two of them wide. Standard 2 of 5 puts
//! the information in the bars only, Interleaved 2 of 5 encodes a second
//! digit in the spaces between the bars of the first.
use crate::barcode::{draw_modules, OptionalChecksum, Style, Symbology, ThicknessBased};
use crate::bits::BitSequence;
use crate::builder::Builder;
use crate::checksum::{Checksum, Modulo10};
use crate::encode::{check_numeric, Digits, SymbolEncoder, Table};
use crate::error::{FormatError, Result};

// set bits are wide
const PATTERNS: [u16; 10] = [
    0b00110, 0b10001, 0b01001, 0b11000, 0b00101, 0b10100, 0b01100, 0b00011, 0b10010, 0b01010,
];

const DIGITS: Table = Table::new(5, &PATTERNS);

const STANDARD_START: &str = "11011010";
const STANDARD_END: &str = "11010110";
const INTERLEAVED_START: &str = "1010";
const INTERLEAVED_END: &str = "1101";

/// Data with the check digit appended if requested.
fn with_check_digit(
    data: &str,
    use_checksum: bool,
    checksum: Option<&'static dyn Checksum>,
) -> Result<String> {
    if data.is_empty() {
        return Err(FormatError::NoData.into());
    }
    check_numeric(data)?;
    let mut digits = data.to_string();
    if use_checksum {
        digits.push_str(&checksum.unwrap_or(&Modulo10).calculate(data)?);
    }
    Ok(digits)
}

/// Draw the start or end pattern, one narrow width per module.
fn draw_guard(
    builder: &mut dyn Builder,
    style: &Style,
    narrow: f32,
    x: f32,
    y: f32,
    pattern: &str,
) -> Result<f32> {
    let guard = BitSequence::from_pattern(pattern)?;
    Ok(draw_modules(
        builder,
        style.bar_color,
        x,
        y,
        narrow,
        style.bar_height,
        &guard,
    ))
}

/// Standard 2 of 5 driver.
#[derive(Debug, Clone)]
pub struct Standard25 {
    pub style: Style,
    pub narrow_width: f32,
    pub wide_width: f32,
    pub use_checksum: bool,
    checksum: Option<&'static dyn Checksum>,
}

impl Standard25 {
    pub fn new(style: Style, narrow_width: f32, wide_width: f32) -> Self {
        Self {
            style,
            narrow_width,
            wide_width,
            use_checksum: true,
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: &'static dyn Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Five bars, each followed by a narrow space.
    fn symbol_width(&self) -> f32 {
        self.wide_width * 2.0 + self.narrow_width * 8.0
    }

    fn guard_width(&self) -> f32 {
        self.narrow_width * (STANDARD_START.len() + STANDARD_END.len()) as f32
    }

    fn encode(&self, data: &str) -> Result<(String, f32)> {
        let digits = with_check_digit(data, self.use_checksum, self.checksum)?;
        let style = &self.style;
        let width = self.symbol_width() * digits.len() as f32
            + self.guard_width()
            + style.offset_width * 2.0
            + style.quiet_zone * 2.0;
        Ok((digits, width))
    }
}

impl ThicknessBased for Standard25 {
    fn narrow_width(&self) -> f32 {
        self.narrow_width
    }

    fn wide_width(&self) -> f32 {
        self.wide_width
    }
}

impl OptionalChecksum for Standard25 {
    fn use_checksum(&self) -> bool {
        self.use_checksum
    }

    fn set_use_checksum(&mut self, use_checksum: bool) {
        self.use_checksum = use_checksum;
    }
}

impl Symbology for Standard25 {
    fn style(&self) -> &Style {
        &self.style
    }

    fn validate(&self, data: &str) -> Result<String> {
        self.encode(data).map(|(digits, _)| digits)
    }

    fn width(&self, data: &str) -> Result<f32> {
        self.encode(data).map(|(_, width)| width)
    }

    fn draw(&self, builder: &mut dyn Builder, data: &str) -> Result<()> {
        let (digits, width) = self.encode(data)?;
        let symbols = Digits(&DIGITS).encode(&digits)?;
        let style = &self.style;
        let height = style.total_height()?;
        style.begin(builder, width, height);

        let narrow = self.narrow_width;
        let mut x = style.offset_width + style.quiet_zone;
        let y = style.offset_height + style.extra_top_height()?;
        x = draw_guard(builder, style, narrow, x, y, STANDARD_START)?;
        for symbol in &symbols {
            for wide in symbol.iter() {
                let bar = if wide { self.wide_width } else { narrow };
                builder.draw_rectangle(style.bar_color, x, y, bar, style.bar_height);
                x += bar + narrow;
            }
        }
        draw_guard(builder, style, narrow, x, y, STANDARD_END)?;

        style.draw_text(builder, true, &[width / 2.0], y - style.text_height()?, &[&digits])
    }
}

/// Interleaved 2 of 5 driver.
///
/// Digits are encoded in pairs, so the number of digits including the
/// check digit has to be even.
#[derive(Debug, Clone)]
pub struct Interleaved25 {
    pub style: Style,
    pub narrow_width: f32,
    pub wide_width: f32,
    pub use_checksum: bool,
    checksum: Option<&'static dyn Checksum>,
}

impl Interleaved25 {
    pub fn new(style: Style, narrow_width: f32, wide_width: f32) -> Self {
        Self {
            style,
            narrow_width,
            wide_width,
            use_checksum: true,
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: &'static dyn Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Width taken by one digit, either as bars or as spaces.
    fn symbol_width(&self) -> f32 {
        self.wide_width * 2.0 + self.narrow_width * 3.0
    }

    fn guard_width(&self) -> f32 {
        self.narrow_width * (INTERLEAVED_START.len() + INTERLEAVED_END.len()) as f32
    }

    fn encode(&self, data: &str) -> Result<(String, f32)> {
        let count = data.chars().count() + self.use_checksum as usize;
        if count % 2 != 0 {
            return Err(FormatError::OddElementCount.into());
        }
        let digits = with_check_digit(data, self.use_checksum, self.checksum)?;
        let style = &self.style;
        let width = self.symbol_width() * digits.len() as f32
            + self.guard_width()
            + style.offset_width * 2.0
            + style.quiet_zone * 2.0;
        Ok((digits, width))
    }
}

impl ThicknessBased for Interleaved25 {
    fn narrow_width(&self) -> f32 {
        self.narrow_width
    }

    fn wide_width(&self) -> f32 {
        self.wide_width
    }
}

impl OptionalChecksum for Interleaved25 {
    fn use_checksum(&self) -> bool {
        self.use_checksum
    }

    fn set_use_checksum(&mut self, use_checksum: bool) {
        self.use_checksum = use_checksum;
    }
}

impl Symbology for Interleaved25 {
    fn style(&self) -> &Style {
        &self.style
    }

    fn validate(&self, data: &str) -> Result<String> {
        self.encode(data).map(|(digits, _)| digits)
    }

    fn width(&self, data: &str) -> Result<f32> {
        self.encode(data).map(|(_, width)| width)
    }

    fn draw(&self, builder: &mut dyn Builder, data: &str) -> Result<()> {
        let (digits, width) = self.encode(data)?;
        let symbols = Digits(&DIGITS).encode(&digits)?;
        let style = &self.style;
        let height = style.total_height()?;
        style.begin(builder, width, height);

        let element = |wide: bool| if wide { self.wide_width } else { self.narrow_width };
        let mut x = style.offset_width + style.quiet_zone;
        let y = style.offset_height + style.extra_top_height()?;
        x = draw_guard(builder, style, self.narrow_width, x, y, INTERLEAVED_START)?;
        for pair in symbols.chunks_exact(2) {
            for (bar, space) in pair[0].iter().zip(pair[1].iter()) {
                let bar = element(bar);
                builder.draw_rectangle(style.bar_color, x, y, bar, style.bar_height);
                x += bar + element(space);
            }
        }
        draw_guard(builder, style, self.narrow_width, x, y, INTERLEAVED_END)?;

        style.draw_text(builder, true, &[width / 2.0], y - style.text_height()?, &[&digits])
    }
}

#[cfg(test)]
use crate::builder::{Color, Recorder};

#[test]
fn test_patterns() {
    for d in 0..10 {
        let symbol = DIGITS.get(d).unwrap();
        assert_eq!(symbol.iter().filter(|b| *b).count(), 2);
    }
    assert_eq!(DIGITS.get(0).unwrap().to_string(), "00110");
    assert_eq!(DIGITS.get(9).unwrap().to_string(), "01010");
}

#[test]
fn test_standard() {
    let mut code = Standard25::new(Style::default(), 1.0, 3.0);
    code.set_use_checksum(false);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "12").unwrap();

    // two digits of 14 and 16 guard modules
    assert_eq!(code.width("12").unwrap(), 14.0 * 2.0 + 16.0 + 10.0);
    let bars: Vec<_> = recorder.rectangles(Color::BLACK).collect();
    // start and end have three bars each
    assert_eq!(bars.len(), 3 + 5 * 2 + 3);
    // the first digit starts after the start pattern with a wide bar
    assert_eq!(bars[3], (13.0, 5.0, 3.0, 50.0));
    assert_eq!(bars[4].0, 17.0);
}

#[test]
fn test_standard_checksum() {
    let code = Standard25::new(Style::default(), 1.0, 3.0);
    assert!(code.use_checksum());
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "1234567").unwrap();
    let texts: Vec<_> = recorder.texts().map(|(text, _, _)| text).collect();
    assert_eq!(texts, vec!["12345670"]);

    assert_eq!(code.validate("1234567").unwrap(), "12345670");
    assert_eq!(code.validate("TEST"), Err(FormatError::NonNumeric.into()));
}

#[test]
fn test_interleaved() {
    let mut code = Interleaved25::new(Style::default(), 1.0, 3.0);
    code.set_use_checksum(false);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "12").unwrap();

    assert_eq!(code.width("12").unwrap(), 9.0 * 2.0 + 8.0 + 10.0);
    let bars: Vec<_> = recorder.rectangles(Color::BLACK).collect();
    // start has two bars, end two, the pair five
    assert_eq!(bars.len(), 2 + 5 + 2);
    // 1 is wide first in the bars, 2 narrow first in the spaces
    assert_eq!(bars[2], (9.0, 5.0, 3.0, 50.0));
    assert_eq!(bars[3].0, 13.0);
}

#[test]
fn test_interleaved_odd() {
    let mut code = Interleaved25::new(Style::default(), 1.0, 3.0);
    code.set_use_checksum(false);
    assert_eq!(code.validate("123"), Err(FormatError::OddElementCount.into()));
    code.set_use_checksum(true);
    // 3 * 3 + 2 + 1 * 3 = 14
    assert_eq!(code.validate("123").unwrap(), "1236");
    assert_eq!(code.validate("1234"), Err(FormatError::OddElementCount.into()));
}
