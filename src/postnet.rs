//! PostNet, the height modulated code of the US Postal Service.
use crate::barcode::{Style, Symbology, ThicknessBased};
use crate::bits::{concat, BitSequence};
use crate::builder::Builder;
use crate::checksum::{Checksum, PostNetChecksum};
use crate::encode::{check_numeric, Digits, SymbolEncoder, Table};
use crate::error::{FormatError, Result};

// set bits are full height bars
const PATTERNS: [u16; 10] = [
    0b11000, 0b00011, 0b00101, 0b00110, 0b01001, 0b01010, 0b01100, 0b10001, 0b10010, 0b10100,
];

const DIGITS: Table = Table::new(5, &PATTERNS);

/// PostNet driver.
///
/// Every bar is `wide_width` wide and bars are `narrow_width` apart.
#[derive(Debug, Clone)]
pub struct PostNet {
    pub style: Style,
    pub narrow_width: f32,
    pub wide_width: f32,
    checksum: Option<&'static dyn Checksum>,
}

impl PostNet {
    pub fn new(style: Style, narrow_width: f32, wide_width: f32) -> Self {
        Self {
            style,
            narrow_width,
            wide_width,
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: &'static dyn Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// The data with its check digit, its bits without the frame bars and
    /// the total width.
    fn encode(&self, data: &str) -> Result<(String, BitSequence, f32)> {
        if data.is_empty() {
            return Err(FormatError::NoData.into());
        }
        check_numeric(data)?;
        let length = data.len();
        if !matches!(length, 5 | 9 | 11) {
            return Err(FormatError::InvalidLength {
                expected: "5, 9 or 11",
                found: length,
            }
            .into());
        }
        let check = self.checksum.unwrap_or(&PostNetChecksum).calculate(data)?;
        let checked = format!("{data}{check}");
        let bits = concat(&Digits(&DIGITS).encode(&checked)?);

        let style = &self.style;
        let count = bits.len() as f32;
        let width = self.wide_width * (count + 2.0)
            + self.narrow_width * (count + 1.0)
            + style.offset_width * 2.0
            + style.quiet_zone * 2.0;
        Ok((checked, bits, width))
    }
}

impl ThicknessBased for PostNet {
    fn narrow_width(&self) -> f32 {
        self.narrow_width
    }

    fn wide_width(&self) -> f32 {
        self.wide_width
    }
}

impl Symbology for PostNet {
    fn style(&self) -> &Style {
        &self.style
    }

    fn validate(&self, data: &str) -> Result<String> {
        self.encode(data).map(|(checked, _, _)| checked)
    }

    fn width(&self, data: &str) -> Result<f32> {
        self.encode(data).map(|(_, _, width)| width)
    }

    fn draw(&self, builder: &mut dyn Builder, data: &str) -> Result<()> {
        let (_, bits, width) = self.encode(data)?;
        let style = &self.style;
        let height = style.total_height()?;
        style.begin(builder, width, height);

        let full = style.bar_height;
        let half = full / 2.0;
        let mut x = style.offset_width + style.quiet_zone;
        let y = style.offset_height + style.extra_top_height()?;
        let framed = std::iter::once(true)
            .chain(bits.iter())
            .chain(std::iter::once(true));
        for tall in framed {
            if tall {
                builder.draw_rectangle(style.bar_color, x, y, self.wide_width, full);
            } else {
                builder.draw_rectangle(style.bar_color, x, y + half, self.wide_width, half);
            }
            x += self.wide_width + self.narrow_width;
        }

        style.draw_text(builder, true, &[width / 2.0], y - style.text_height()?, &[data])
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
}

#[test]
fn test_lengths() {
    let code = PostNet::new(Style::default(), 1.0, 3.0);
    assert_eq!(code.validate("12345").unwrap(), "123455");
    assert!(code.validate("123456789").is_ok());
    assert!(code.validate("12345678901").is_ok());
    assert_eq!(
        code.validate("1234"),
        Err(FormatError::InvalidLength {
            expected: "5, 9 or 11",
            found: 4
        }
        .into())
    );
    assert_eq!(code.validate("1234a"), Err(FormatError::NonNumeric.into()));
}

#[test]
fn test_draw() {
    let code = PostNet::new(Style::default(), 1.0, 3.0);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "12345").unwrap();

    // six digits of five bits plus two frame bars
    let bars: Vec<_> = recorder.rectangles(Color::BLACK).collect();
    assert_eq!(bars.len(), 32);
    assert_eq!(code.width("12345").unwrap(), 3.0 * 32.0 + 31.0 + 10.0);
    assert_eq!(bars[0], (5.0, 5.0, 3.0, 50.0));
    // 1 is 00011, starting with a half bar
    assert_eq!(bars[1], (9.0, 30.0, 3.0, 25.0));
    assert_eq!(bars[4], (21.0, 5.0, 3.0, 50.0));

    // the check digit is not printed
    let texts: Vec<_> = recorder.texts().map(|(text, _, _)| text).collect();
    assert_eq!(texts, vec!["12345"]);
}
