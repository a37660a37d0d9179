use super::encode_left;
use crate::barcode::{draw_modules, Style};
use crate::bits::BitSequence;
use crate::builder::Builder;
use crate::checksum::{Checksum, Supplement5Checksum};
use crate::encode::{check_numeric, Table};
use crate::error::{FormatError, Result};
use crate::settings::TextPosition;

/// Parity of a 2 digit supplement, selected by its value modulo 4.
const PARITY_2: Table = Table::new(2, &[0b11, 0b10, 0b01, 0b00]);

/// Parity of a 5 digit supplement, selected by its check value.
const PARITY_5: Table = Table::new(
    5,
    &[
        0b00111, 0b01011, 0b01101, 0b01110, 0b10011, 0b11001, 0b11100, 0b10101, 0b10110, 0b11010,
    ],
);

const LEFT_GUARD: &str = "1011";
const SEPARATOR: &str = "01";

/// The small 2 or 5 digit barcode to the right of an EAN/UPC symbol.
#[derive(Debug, Clone)]
pub(crate) struct Supplement {
    style: Style,
    module_width: f32,
}

impl Supplement {
    /// Derive the layout from the main symbol.
    ///
    /// The bars end with the guard bars of the main symbol, text is printed
    /// above them.
    pub(crate) fn for_base(base: &Style, module_width: f32, guard_extra: f32) -> Result<Self> {
        let mut style = base.clone();
        style.bar_height = base.bar_height + guard_extra - base.text_height()?;
        if base.text_position == TextPosition::BOTTOM {
            style.text_position = TextPosition::TOP;
        }
        style.quiet_zone = 0.0;
        Ok(Self {
            style,
            module_width,
        })
    }

    fn parity(data: &str) -> Result<BitSequence> {
        let number = |s: &str| s.parse::<usize>().map_err(|_| FormatError::NonNumeric);
        match data.len() {
            2 => PARITY_2.get(number(data)? % 4),
            5 => PARITY_5.get(number(&Supplement5Checksum.calculate(data)?)?),
            length => Err(FormatError::SupplementLength(length).into()),
        }
    }

    /// Width of the bars only.
    pub(crate) fn width(&self, data: &str) -> Result<f32> {
        check_numeric(data)?;
        let modules = match data.len() {
            2 => 20.0,
            5 => 47.0,
            length => return Err(FormatError::SupplementLength(length).into()),
        };
        Ok(modules * self.module_width)
    }

    /// All modules of the supplement, starting with the left guard.
    fn encode(data: &str) -> Result<BitSequence> {
        let symbols = encode_left(data, &Self::parity(data)?)?;
        let separator = BitSequence::from_pattern(SEPARATOR)?;
        let mut bits = BitSequence::from_pattern(LEFT_GUARD)?;
        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 {
                bits.extend(&separator);
            }
            bits.extend(symbol);
        }
        Ok(bits)
    }

    /// Draw at `x`, `y` is the top of the canvas.
    ///
    /// The canvas has been prepared by the main symbol.
    pub(crate) fn draw(&self, builder: &mut dyn Builder, data: &str, x: f32, y: f32) -> Result<()> {
        let text_x = x + self.width(data)? / 2.0;
        let bits = Self::encode(data)?;
        let style = &self.style;
        let text_height = style.text_height()?;
        let y = y + style.offset_height + text_height;
        draw_modules(
            builder,
            style.bar_color,
            x,
            y,
            self.module_width,
            style.bar_height,
            &bits,
        );

        style.draw_text(builder, true, &[text_x], y - text_height, &[data])
    }
}

#[cfg(test)]
use crate::builder::{Color, Recorder};

#[test]
fn test_parity() {
    // 12 % 4 = 0, both odd
    assert_eq!(Supplement::parity("12").unwrap().to_string(), "11");
    assert_eq!(Supplement::parity("07").unwrap().to_string(), "00");
    // 5 * 3 + 9 * 9 + 4 * 3 + 2 * 9 + 5 * 3 = 141
    assert_eq!(Supplement::parity("52495").unwrap().to_string(), "01011");
    assert_eq!(
        Supplement::parity("123"),
        Err(FormatError::SupplementLength(3).into())
    );
}

#[test]
fn test_layout() {
    let base = Style::default();
    let supplement = Supplement::for_base(&base, 1.0, 10.0).unwrap();
    assert_eq!(supplement.style.text_position, TextPosition::TOP);
    assert_eq!(supplement.style.quiet_zone, 0.0);
    assert!((supplement.style.bar_height - 47.2).abs() < 1e-4);
    assert_eq!(supplement.width("12").unwrap(), 20.0);
    assert_eq!(supplement.width("12345").unwrap(), 47.0);
    assert_eq!(
        supplement.width("1a"),
        Err(FormatError::NonNumeric.into())
    );
}

#[test]
fn test_draw() {
    let mut base = Style::default();
    base.text_position = TextPosition::empty();
    let supplement = Supplement::for_base(&base, 1.0, 0.0).unwrap();
    let mut recorder = Recorder::new();
    supplement.draw(&mut recorder, "12", 100.0, 0.0).unwrap();

    let bars: Vec<_> = recorder.rectangles(Color::BLACK).collect();
    // guard 1011, 1 odd 0011001, separator, 2 odd 0010011
    assert_eq!(bars.len(), 2 + 2 + 1 + 2);
    assert_eq!(bars[0], (100.0, 5.0, 1.0, 50.0));
    assert_eq!(bars[1], (102.0, 5.0, 2.0, 50.0));
    assert_eq!(bars[4], (112.0, 5.0, 1.0, 50.0));
    assert_eq!(recorder.texts().count(), 0);
}

#[test]
fn test_encoding() {
    // 1 * 3 + 2 * 9 + 3 * 3 + 4 * 9 + 5 * 3 = 81, parity of 1 is 01011
    assert_eq!(
        Supplement::encode("12345").unwrap().to_string(),
        [
            "1011",    // guard
            "0110011", // 1 even
            "01",
            "0010011", // 2 odd
            "01",
            "0100001", // 3 even
            "01",
            "0100011", // 4 odd
            "01",
            "0110001", // 5 odd
        ]
        .concat()
    );
    // 12 % 4 = 0, both odd
    assert_eq!(
        Supplement::encode("12").unwrap().to_string(),
        "10110011001010010011"
    );
}
