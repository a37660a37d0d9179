//! Code 128 as defined in ISO/IEC 15417.
//!
//! Data is first coded into a string of characters and markers, see
//! [`code`]. The markers are private characters above the ASCII range and
//! stand for the start, code switch and function symbols.
mod coder;
mod table;

use crate::barcode::{draw_modules, ModuleBased, Style, Symbology};
use crate::bits::BitSequence;
use crate::builder::Builder;
use crate::checksum::Checksum;
use crate::encode::SymbolEncoder;
use crate::error::{ContractError, FormatError, Result};

pub use coder::{code, MAX_LENGTH};
use table::{symbol_values, Code128Encoder, STOP, STOP_WIDTH};

pub const START_A: char = '\u{C8}';
pub const START_B: char = '\u{C9}';
pub const START_C: char = '\u{CA}';
pub const CODE_A: char = '\u{CB}';
pub const CODE_B: char = '\u{CC}';
pub const CODE_C: char = '\u{CD}';
pub const FNC1: char = '\u{CE}';
pub const FNC2: char = '\u{CF}';
pub const FNC3: char = '\u{D0}';
pub const FNC4: char = '\u{D1}';
pub const SHIFT: char = '\u{D2}';

/// One of the three character sets of Code 128.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeSet {
    A = 0,
    B = 1,
    C = 2,
}

impl CodeSet {
    pub fn from_start(marker: char) -> Option<Self> {
        match marker {
            START_A => Some(CodeSet::A),
            START_B => Some(CodeSet::B),
            START_C => Some(CodeSet::C),
            _ => None,
        }
    }

    pub fn from_switch(marker: char) -> Option<Self> {
        match marker {
            CODE_A => Some(CodeSet::A),
            CODE_B => Some(CodeSet::B),
            CODE_C => Some(CodeSet::C),
            _ => None,
        }
    }

    pub fn start(self) -> char {
        match self {
            CodeSet::A => START_A,
            CodeSet::B => START_B,
            CodeSet::C => START_C,
        }
    }

    pub fn switch(self) -> char {
        match self {
            CodeSet::A => CODE_A,
            CodeSet::B => CODE_B,
            CodeSet::C => CODE_C,
        }
    }

    fn start_value(self) -> u8 {
        103 + self as u8
    }

    /// Symbol value of a single character or marker in this set.
    ///
    /// Digit pairs of set C are not covered.
    pub fn value(self, c: char) -> Option<u8> {
        let value = match (self, c) {
            (CodeSet::A, ' '..='_') => c as u8 - b' ',
            (CodeSet::A, '\0'..='\x1f') => c as u8 + 64,
            (CodeSet::B, ' '..='\x7f') => c as u8 - b' ',
            (CodeSet::A | CodeSet::B, FNC3) => 96,
            (CodeSet::A | CodeSet::B, FNC2) => 97,
            (CodeSet::A | CodeSet::B, SHIFT) => 98,
            (CodeSet::A | CodeSet::B, CODE_C) => 99,
            (CodeSet::A | CodeSet::C, CODE_B) => 100,
            (CodeSet::B, FNC4) => 100,
            (CodeSet::B | CodeSet::C, CODE_A) => 101,
            (CodeSet::A, FNC4) => 101,
            (_, FNC1) => 102,
            _ => return None,
        };
        Some(value)
    }

    /// The character(s) standing for `value` in this set.
    pub fn symbol(self, value: u8) -> Option<String> {
        let c = match (self, value) {
            (CodeSet::C, 0..=99) => return Some(format!("{value:02}")),
            (CodeSet::A, 0..=63) | (CodeSet::B, 0..=95) => (value + b' ') as char,
            (CodeSet::A, 64..=95) => (value - 64) as char,
            (CodeSet::A | CodeSet::B, 96) => FNC3,
            (CodeSet::A | CodeSet::B, 97) => FNC2,
            (CodeSet::A | CodeSet::B, 98) => SHIFT,
            (CodeSet::A | CodeSet::B, 99) => CODE_C,
            (CodeSet::A | CodeSet::C, 100) => CODE_B,
            (CodeSet::B, 100) => FNC4,
            (CodeSet::B | CodeSet::C, 101) => CODE_A,
            (CodeSet::A, 101) => FNC4,
            (_, 102) => FNC1,
            _ => return None,
        };
        Some(c.to_string())
    }
}

/// Weighted modulo 103 sum over a coded string.
///
/// The check symbol is returned in the code set active at the end of the
/// string, so it can simply be appended.
#[derive(Debug, Clone, Copy, Default)]
pub struct Code128Checksum;

impl Checksum for Code128Checksum {
    fn calculate(&self, coded: &str) -> Result<String> {
        if coded.is_empty() {
            return Err(FormatError::NoData.into());
        }
        let (values, set) = symbol_values(coded)?;
        let sum: u64 = values
            .iter()
            .enumerate()
            .map(|(i, value)| i.max(1) as u64 * *value as u64)
            .sum();
        let check = (sum % 103) as u8;
        set.symbol(check)
            .ok_or_else(|| ContractError::SymbolOutOfRange {
                symbol: check as usize,
                size: 103,
            }
            .into())
    }
}

/// Code 128 driver.
#[derive(Debug, Clone)]
pub struct Code128 {
    pub style: Style,
    pub module_width: f32,
    checksum: Option<&'static dyn Checksum>,
}

struct Encoded {
    coded: String,
    symbols: Vec<BitSequence>,
    modules: usize,
    width: f32,
}

impl Code128 {
    pub fn new(style: Style, module_width: f32) -> Self {
        Self {
            style,
            module_width,
            checksum: None,
        }
    }

    /// Replace the check symbol algorithm.
    pub fn with_checksum(mut self, checksum: &'static dyn Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    fn stop_width(&self) -> f32 {
        self.module_width * STOP_WIDTH as f32
    }

    fn encode(&self, data: &str) -> Result<Encoded> {
        let mut coded = code(data)?;
        let check = self.checksum.unwrap_or(&Code128Checksum).calculate(&coded)?;
        coded.push_str(&check);

        let symbols = Code128Encoder.encode(&coded)?;
        let modules: usize = symbols.iter().map(BitSequence::len).sum();
        let style = &self.style;
        let width = self.module_width * modules as f32
            + self.stop_width()
            + style.offset_width * 2.0
            + style.quiet_zone * 2.0;
        Ok(Encoded {
            coded,
            symbols,
            modules,
            width,
        })
    }
}

impl ModuleBased for Code128 {
    fn module_width(&self) -> f32 {
        self.module_width
    }
}

impl Symbology for Code128 {
    fn style(&self) -> &Style {
        &self.style
    }

    /// Returns the coded data, see [`code`], with the check symbol.
    fn validate(&self, data: &str) -> Result<String> {
        self.encode(data).map(|e| e.coded)
    }

    fn width(&self, data: &str) -> Result<f32> {
        self.encode(data).map(|e| e.width)
    }

    fn draw(&self, builder: &mut dyn Builder, data: &str) -> Result<()> {
        let encoded = self.encode(data)?;
        let style = &self.style;
        let height = style.total_height()?;
        log::trace!(
            "code 128 with {} modules, {} x {height}",
            encoded.modules,
            encoded.width
        );
        style.begin(builder, encoded.width, height);

        let text_x = encoded.width / 2.0;
        let mut x = style.offset_width + style.quiet_zone;
        let y = style.offset_height + style.extra_top_height()?;
        for symbol in &encoded.symbols {
            x = draw_modules(
                builder,
                style.bar_color,
                x,
                y,
                self.module_width,
                style.bar_height,
                symbol,
            );
        }
        let stop = BitSequence::from_word(STOP, STOP_WIDTH);
        draw_modules(
            builder,
            style.bar_color,
            x,
            y,
            self.module_width,
            style.bar_height,
            &stop,
        );

        style.draw_text(builder, true, &[text_x], y - style.text_height()?, &[data])
    }
}

#[cfg(test)]
use crate::bits::concat;
#[cfg(test)]
use crate::builder::{Color, Recorder};

#[cfg(test)]
fn modules(coded: &str) -> String {
    let symbols = Code128Encoder.encode(coded).unwrap();
    format!(
        "{}{}",
        concat(&symbols),
        BitSequence::from_word(STOP, STOP_WIDTH)
    )
}

#[test]
fn test_value_symbol_inverse() {
    for set in [CodeSet::A, CodeSet::B, CodeSet::C] {
        for value in 0..=102 {
            let symbol = set.symbol(value).unwrap();
            if set == CodeSet::C && value < 100 {
                continue;
            }
            let c = symbol.chars().next().unwrap();
            assert_eq!(set.value(c), Some(value), "{set:?} {value}");
        }
    }
    assert_eq!(CodeSet::C.symbol(7).unwrap(), "07");
    assert_eq!(CodeSet::A.value('a'), None);
    assert_eq!(CodeSet::C.value('1'), None);
}

#[test]
fn test_checksum() {
    // 104 + 1 * 33 + 2 * 34 + 3 * 35 = 310, 310 % 103 = 1
    let coded = format!("{START_B}ABC");
    assert_eq!(Code128Checksum.calculate(&coded).unwrap(), "!");

    // 105 + 1 * 12 + 2 * 34 = 185, 185 % 103 = 82
    let coded = format!("{START_C}1234");
    assert_eq!(Code128Checksum.calculate(&coded).unwrap(), "82");

    // 103 + 64 = 167, 167 % 103 = 64, the NUL character in code set A
    let coded = format!("{START_A}\0");
    assert_eq!(Code128Checksum.calculate(&coded).unwrap(), "\0");
}

#[test]
fn test_draw() {
    let code = Code128::new(Style::default(), 1.0);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "1234").unwrap();

    // start, two pairs, check symbol and stop
    let width = 11.0 * 4.0 + 13.0 + 10.0;
    assert_eq!(code.width("1234").unwrap(), width);
    let (canvas_width, _) = recorder.canvas().unwrap();
    assert_eq!(canvas_width, width);

    let bars: Vec<_> = recorder.rectangles(Color::BLACK).collect();
    // three bars per symbol, four for the stop pattern
    assert_eq!(bars.len(), 3 * 4 + 4);
    assert_eq!(bars[0], (5.0, 5.0, 2.0, 50.0));
    let last = bars[bars.len() - 1];
    assert_eq!(last.0 + last.2, width - 5.0);

    let texts: Vec<_> = recorder.texts().collect();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].0, "1234");
    assert_eq!(texts[0].1, width / 2.0);
}

#[test]
fn test_invalid_data() {
    let code = Code128::new(Style::default(), 1.0);
    let mut recorder = Recorder::new();
    assert_eq!(
        code.draw(&mut recorder, "smörgås"),
        Err(FormatError::InvalidCharacter('ö').into())
    );
    assert!(recorder.instructions().is_empty());
}

#[test]
fn test_encoding() {
    let code = Code128::new(Style::default(), 1.0);

    // three digits do not pay for a switch to set C
    let coded = code.validate("testing123").unwrap();
    assert_eq!(coded, format!("{START_B}testing123S"));
    assert_eq!(
        modules(&coded),
        [
            "11010010000", // start B
            "10011110100", // t
            "10110010000", // e
            "10111100100", // s
            "10011110100", // t
            "10000110100", // i
            "11000010100", // n
            "10011010000", // g
            "10011100110", // 1
            "11001110010", // 2
            "11001011100", // 3
            "11011101000", // check 51
            "1100011101011",
        ]
        .concat()
    );

    let coded = code.validate("testing1234").unwrap();
    assert_eq!(coded, format!("{START_B}testing{CODE_C}123482"));
    assert_eq!(
        modules(&coded),
        [
            "11010010000", // start B
            "10011110100", // t
            "10110010000", // e
            "10111100100", // s
            "10011110100", // t
            "10000110100", // i
            "11000010100", // n
            "10011010000", // g
            "10111011110", // code C
            "10110011100", // 12
            "10001011000", // 34
            "10010011110", // check 82
            "1100011101011",
        ]
        .concat()
    );
}
