//! The EAN/UPC family.
//!
//! All four symbologies share the digit tables, the guard patterns and the
//! handling of check digits and supplements. Data may end with a 2 or 5
//! digit supplement, which is drawn as a small extra barcode to the right.
mod ean13;
mod ean8;
mod supplement;
mod upca;
mod upce;

pub use ean13::Ean13;
pub use ean8::Ean8;
pub use upca::Upca;
pub use upce::{from_upca, Upce};

use crate::barcode::{draw_modules, ModuleBased, Style, Symbology};
use crate::bits::BitSequence;
use crate::builder::Builder;
use crate::checksum::Checksum;
use crate::encode::{check_numeric, Digits, SymbolEncoder, Table, TableEncoder};
use crate::error::{ContractError, FormatError, Result};
use crate::settings::TextPosition;
use supplement::Supplement;

const LEFT_ODD: Table = Table::new(
    7,
    &[
        0b0001101, 0b0011001, 0b0010011, 0b0111101, 0b0100011, 0b0110001, 0b0101111, 0b0111011,
        0b0110111, 0b0001011,
    ],
);

const LEFT_EVEN: Table = Table::new(
    7,
    &[
        0b0100111, 0b0110011, 0b0011011, 0b0100001, 0b0011101, 0b0111001, 0b0000101, 0b0010001,
        0b0001001, 0b0010111,
    ],
);

const RIGHT: Table = Table::new(
    7,
    &[
        0b1110010, 0b1100110, 0b1101100, 0b1000010, 0b1011100, 0b1001110, 0b1010000, 0b1000100,
        0b1001000, 0b1110100,
    ],
);

/// Parity of the left half of EAN-13, selected by the first digit.
const EAN13_PARITY: Table = Table::new(
    6,
    &[
        0b111111, 0b110100, 0b110010, 0b110001, 0b101100, 0b100110, 0b100011, 0b101010, 0b101001,
        0b100101,
    ],
);

const LEFT_GUARD: &str = "101";
const CENTER_GUARD: &str = "01010";
const RIGHT_GUARD: &str = "101";

/// Space between the main symbol and the supplement, in modules.
const SUPPLEMENT_GAP: f32 = 11.0;

/// Left half symbols, a set parity bit selects odd parity.
fn encode_left(digits: &str, parity: &BitSequence) -> Result<Vec<BitSequence>> {
    digits
        .chars()
        .zip(parity.iter())
        .map(|(c, odd)| {
            let table = if odd { &LEFT_ODD } else { &LEFT_EVEN };
            Digits(table).encode_char(c)
        })
        .collect()
}

fn encode_right(digits: &str) -> Result<Vec<BitSequence>> {
    Digits(&RIGHT).encode(digits)
}

/// Split off a trailing supplement.
///
/// `full` is the length of the main part including its check digit, which
/// may be left out.
fn split_supplement(data: &str, full: usize) -> (&str, Option<&str>) {
    let length = data.len();
    if !data.is_ascii() || length <= full {
        return (data, None);
    }
    let at = if length == full + 2 || length == full + 5 {
        full
    } else if length == full + 1 || length == full + 4 {
        full - 1
    } else {
        full
    };
    let (main, supplement) = data.split_at(at);
    (main, Some(supplement))
}

/// Draw a sequence of modules from a `0`/`1` pattern.
fn draw_pattern(
    builder: &mut dyn Builder,
    style: &Style,
    module_width: f32,
    (x, y): (f32, f32),
    height: f32,
    pattern: &str,
) -> Result<f32> {
    let bits = BitSequence::from_pattern(pattern)?;
    Ok(draw_modules(
        builder,
        style.bar_color,
        x,
        y,
        module_width,
        height,
        &bits,
    ))
}

fn draw_symbols(
    builder: &mut dyn Builder,
    style: &Style,
    module_width: f32,
    (x, y): (f32, f32),
    height: f32,
    symbols: &[BitSequence],
) -> f32 {
    symbols.iter().fold(x, |x, symbol| {
        draw_modules(builder, style.bar_color, x, y, module_width, height, symbol)
    })
}

/// Validated data of an EAN/UPC symbol.
struct Encoded<'a> {
    /// The main digits including the check digit.
    digits: String,
    supplement: Option<(Supplement, &'a str)>,
    width: f32,
}

impl Encoded<'_> {
    /// The main digits followed by the supplement.
    fn normalized(&self) -> String {
        match &self.supplement {
            Some((_, supplement)) => format!("{}{supplement}", self.digits),
            None => self.digits.clone(),
        }
    }
}

/// Behavior shared by the EAN/UPC drivers.
trait EanUpc: Symbology + ModuleBased {
    /// Number of digits including the check digit.
    const LENGTH: usize;

    fn guard_extra_height(&self) -> f32;

    fn checksum(&self) -> &dyn Checksum;

    /// Width without quiet zones, offsets and supplement.
    fn symbol_width(&self) -> Result<f32>;

    fn quiet_zone(&self) -> f32 {
        self.module_width() * 11.0
    }

    /// Extra height of the guard bars, zero without text.
    fn guard_extra(&self) -> f32 {
        if self.style().text_position.is_empty() {
            0.0
        } else {
            self.guard_extra_height()
        }
    }

    /// Guard bars and text below the bars overlap.
    fn layout_height(&self) -> Result<f32> {
        let style = self.style();
        let extra = self.guard_extra().max(style.text_height()?);
        Ok(style.offset_height * 2.0 + style.bar_height + extra)
    }

    /// Check the main digits and append the check digit if missing.
    fn check_digits(&self, data: &str) -> Result<String> {
        if data.is_empty() {
            return Err(FormatError::NoData.into());
        }
        check_numeric(data)?;
        let length = data.len();
        if length + 1 < Self::LENGTH || length > Self::LENGTH {
            return Err(FormatError::InvalidLength {
                expected: length_description(Self::LENGTH),
                found: length,
            }
            .into());
        }
        if length == Self::LENGTH {
            let (payload, digit) = data.split_at(length - 1);
            let expected = self.checksum().calculate(payload)?;
            if digit != expected {
                let expected = expected.chars().next().unwrap_or('0');
                return Err(FormatError::InvalidCheckDigit { expected }.into());
            }
            Ok(data.to_string())
        } else {
            Ok(format!("{data}{}", self.checksum().calculate(data)?))
        }
    }

    fn encode<'a>(&self, data: &'a str) -> Result<Encoded<'a>> {
        let style = self.style();
        if style.text_position.contains(TextPosition::TOP) {
            return Err(ContractError::TextPosition("EAN/UPC text must be at the bottom").into());
        }
        let (main, supplement) = split_supplement(data, Self::LENGTH);
        let digits = self.check_digits(main)?;
        let mut width = self.symbol_width()?
            + style.offset_width * 2.0
            + self.quiet_zone() * 2.0;
        let supplement = match supplement {
            Some(data) => {
                let supplement =
                    Supplement::for_base(style, self.module_width(), self.guard_extra())?;
                width += self.module_width() * SUPPLEMENT_GAP + supplement.width(data)?;
                Some((supplement, data))
            }
            None => None,
        };
        log::trace!(
            "encoded {digits} with supplement {:?}",
            supplement.as_ref().map(|(_, data)| *data)
        );
        Ok(Encoded {
            digits,
            supplement,
            width,
        })
    }

    /// Begin drawing, returns the top left corner of the symbol.
    fn begin(&self, builder: &mut dyn Builder, width: f32) -> Result<(f32, f32)> {
        let style = self.style();
        style.begin(builder, width, self.layout_height()?);
        Ok((style.offset_width + self.quiet_zone(), style.offset_height))
    }

    /// Draw the supplement, if any, to the right of `x`.
    fn draw_supplement(&self, builder: &mut dyn Builder, encoded: &Encoded, x: f32) -> Result<()> {
        match &encoded.supplement {
            Some((supplement, data)) => {
                let x = x + self.module_width() * SUPPLEMENT_GAP;
                supplement.draw(builder, data, x, 0.0)
            }
            None => Ok(()),
        }
    }
}

fn length_description(length: usize) -> &'static str {
    match length {
        8 => "7 or 8",
        12 => "11 or 12",
        _ => "12 or 13",
    }
}

#[test]
fn test_tables() {
    for table in [LEFT_ODD, LEFT_EVEN, RIGHT] {
        for d in 0..10 {
            // two bars in seven modules
            assert_eq!(table.get(d).unwrap().bars().len(), 2);
        }
    }
    // right symbols are the inverted odd ones
    for d in 0..10 {
        let odd = LEFT_ODD.get(d).unwrap();
        let right = RIGHT.get(d).unwrap();
        assert!(odd.iter().zip(right.iter()).all(|(a, b)| a != b));
    }
    assert_eq!(EAN13_PARITY.get(4).unwrap().to_string(), "101100");
}

#[test]
fn test_encode_left() {
    let parity = BitSequence::from_pattern("10").unwrap();
    let symbols = encode_left("00", &parity).unwrap();
    assert_eq!(symbols[0].to_string(), "0001101");
    assert_eq!(symbols[1].to_string(), "0100111");
}

#[test]
fn test_split_supplement() {
    assert_eq!(split_supplement("4006381333931", 13), ("4006381333931", None));
    assert_eq!(
        split_supplement("400638133393112", 13),
        ("4006381333931", Some("12"))
    );
    assert_eq!(
        split_supplement("40063813339312", 13),
        ("400638133393", Some("12"))
    );
    assert_eq!(
        split_supplement("400638133393152495", 13),
        ("4006381333931", Some("52495"))
    );
    assert_eq!(
        split_supplement("40063813339352495", 13),
        ("400638133393", Some("52495"))
    );
    assert_eq!(
        split_supplement("4006381333931123", 13),
        ("4006381333931", Some("123"))
    );
    // normalized data splits at the same place again
    let (main, supplement) = split_supplement("40063813339312", 13);
    let normalized = format!("{}1{}", main, supplement.unwrap());
    assert_eq!(
        split_supplement(&normalized, 13),
        ("4006381333931", Some("12"))
    );
}
