//! Code 39 (3 of 9) with full ASCII support.
//!
//! Characters outside of the basic set are written as two symbol
//! sequences, e.g. `a` becomes `+A`.
use crate::barcode::{draw_elements, OptionalChecksum, Style, Symbology, ThicknessBased};
use crate::bits::BitSequence;
use crate::builder::Builder;
use crate::checksum::Checksum;
use crate::encode::{SymbolEncoder, Table, TableEncoder};
use crate::error::{Error, FormatError, Result};

/// The basic character set, in check value order.
pub const ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

const GUARD: char = '*';

// nine elements and the gap after the symbol, set bits are wide
const PATTERNS: [u16; 44] = [
    0b0001101000, 0b1001000010, 0b0011000010, 0b1011000000, 0b0001100010, 0b1001100000,
    0b0011100000, 0b0001001010, 0b1001001000, 0b0011001000, 0b1000010010, 0b0010010010,
    0b1010010000, 0b0000110010, 0b1000110000, 0b0010110000, 0b0000011010, 0b1000011000,
    0b0010011000, 0b0000111000, 0b1000000110, 0b0010000110, 0b1010000100, 0b0000100110,
    0b1000100100, 0b0010100100, 0b0000001110, 0b1000001100, 0b0010001100, 0b0000101100,
    0b1100000010, 0b0110000010, 0b1110000000, 0b0100100010, 0b1100100000, 0b0110100000,
    0b0100001010, 0b1100001000, 0b0110001000, 0b0101010000, 0b0101000100, 0b0100010100,
    0b0001010100, 0b0100101000,
];

const SYMBOLS: Table = Table::new(10, &PATTERNS);

/// Basic set representation of every ASCII character.
const FULL_ASCII: [&str; 128] = [
    "%U", "$A", "$B", "$C", "$D", "$E", "$F", "$G", "$H", "$I", "$J", "$K", "$L", "$M", "$N", "$O",
    "$P", "$Q", "$R", "$S", "$T", "$U", "$V", "$W", "$X", "$Y", "$Z", "%A", "%B", "%C", "%D", "%E",
    " ", "/A", "/B", "/C", "/D", "/E", "/F", "/G", "/H", "/I", "/J", "/K", "/L", "-", ".", "/O",
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "/Z", "%F", "%G", "%H", "%I", "%J",
    "%V", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "%K", "%L", "%M", "%N", "%O",
    "%W", "+A", "+B", "+C", "+D", "+E", "+F", "+G", "+H", "+I", "+J", "+K", "+L", "+M", "+N", "+O",
    "+P", "+Q", "+R", "+S", "+T", "+U", "+V", "+W", "+X", "+Y", "+Z", "%P", "%Q", "%R", "%S", "%T",
];

/// Rewrite ASCII data with the basic character set.
pub fn translate(data: &str) -> Result<String> {
    data.chars()
        .map(|c| {
            FULL_ASCII
                .get(c as usize)
                .copied()
                .ok_or_else(|| Error::from(FormatError::InvalidCharacter(c)))
        })
        .collect()
}

fn check_value(c: char) -> Result<usize> {
    ALPHABET
        .find(c)
        .ok_or_else(|| FormatError::InvalidCharacter(c).into())
}

/// Looks up basic set characters and the `*` guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct Code39Encoder;

impl TableEncoder for Code39Encoder {
    fn table(&self) -> &Table {
        &SYMBOLS
    }

    fn index(&self, c: char) -> Result<usize> {
        if c == GUARD {
            Ok(ALPHABET.len())
        } else {
            check_value(c)
        }
    }
}

/// Sum of the check values modulo 43.
#[derive(Debug, Clone, Copy, Default)]
pub struct Code39Checksum;

impl Checksum for Code39Checksum {
    fn calculate(&self, data: &str) -> Result<String> {
        if data.is_empty() {
            return Err(FormatError::NoData.into());
        }
        let mut sum = 0;
        for c in data.chars() {
            sum += check_value(c)?;
        }
        // the index is below 43
        let check = ALPHABET.as_bytes()[sum % 43] as char;
        Ok(check.to_string())
    }
}

/// Code 39 driver.
#[derive(Debug, Clone)]
pub struct Code39 {
    pub style: Style,
    pub narrow_width: f32,
    pub wide_width: f32,
    pub use_checksum: bool,
    checksum: Option<&'static dyn Checksum>,
}

impl Code39 {
    pub fn new(style: Style, narrow_width: f32, wide_width: f32) -> Self {
        Self {
            style,
            narrow_width,
            wide_width,
            use_checksum: false,
            checksum: None,
        }
    }

    /// Replace the check character algorithm.
    pub fn with_checksum(mut self, checksum: &'static dyn Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Three wide and six narrow elements plus a narrow gap.
    fn symbol_width(&self) -> f32 {
        self.wide_width * 3.0 + self.narrow_width * 7.0
    }

    /// The translated data with its check character, the symbols between
    /// and including the guards, and the total width.
    fn encode(&self, data: &str) -> Result<(String, Vec<BitSequence>, f32)> {
        if let Some(c) = data.chars().find(|c| !c.is_ascii()) {
            return Err(FormatError::InvalidCharacter(c).into());
        }
        let mut translated = translate(data)?;
        if self.use_checksum {
            let check = self.checksum.unwrap_or(&Code39Checksum).calculate(&translated)?;
            translated.push_str(&check);
        }
        let guard = Code39Encoder.encode_char(GUARD)?;
        let mut symbols = vec![guard.clone()];
        symbols.extend(Code39Encoder.encode(&translated)?);
        symbols.push(guard);

        let style = &self.style;
        let width = self.symbol_width() * symbols.len() as f32
            + style.offset_width * 2.0
            + style.quiet_zone * 2.0;
        Ok((translated, symbols, width))
    }
}

impl ThicknessBased for Code39 {
    fn narrow_width(&self) -> f32 {
        self.narrow_width
    }

    fn wide_width(&self) -> f32 {
        self.wide_width
    }
}

impl OptionalChecksum for Code39 {
    fn use_checksum(&self) -> bool {
        self.use_checksum
    }

    fn set_use_checksum(&mut self, use_checksum: bool) {
        self.use_checksum = use_checksum;
    }
}

impl Symbology for Code39 {
    fn style(&self) -> &Style {
        &self.style
    }

    /// Returns the data in the basic character set, with the check
    /// character if enabled.
    fn validate(&self, data: &str) -> Result<String> {
        self.encode(data).map(|(translated, _, _)| translated)
    }

    fn width(&self, data: &str) -> Result<f32> {
        self.encode(data).map(|(_, _, width)| width)
    }

    fn draw(&self, builder: &mut dyn Builder, data: &str) -> Result<()> {
        let (_, symbols, width) = self.encode(data)?;
        let style = &self.style;
        let height = style.total_height()?;
        style.begin(builder, width, height);

        let thickness = (self.narrow_width, self.wide_width);
        let mut x = style.offset_width + style.quiet_zone;
        let y = style.offset_height + style.extra_top_height()?;
        for symbol in &symbols {
            x = draw_elements(
                builder,
                style.bar_color,
                x,
                y,
                thickness,
                style.bar_height,
                symbol,
            );
        }

        style.draw_text(builder, true, &[width / 2.0], y - style.text_height()?, &[data])
    }
}

#[cfg(test)]
use crate::builder::{Color, Recorder};

#[test]
fn test_patterns() {
    for (i, c) in ALPHABET.chars().chain(Some(GUARD)).enumerate() {
        let symbol = Code39Encoder.encode_char(c).unwrap();
        // three of nine elements are wide, the gap is narrow
        assert_eq!(symbol.iter().filter(|b| *b).count(), 3, "{c}");
        assert_eq!(symbol.get(9), Some(false), "{c}");
        assert_eq!(Code39Encoder.index(c).unwrap(), i);
    }
    assert_eq!(Code39Encoder.encode_char('A').unwrap().to_string(), "1000010010");
    assert_eq!(Code39Encoder.encode_char('*').unwrap().to_string(), "0100101000");
    assert!(Code39Encoder.encode_char('a').is_err());
}

#[test]
fn test_translate() {
    assert_eq!(translate("Code-39").unwrap(), "C+O+D+E-39");
    assert_eq!(translate("a*\0").unwrap(), "+A/J%U");
    assert_eq!(translate("\x7f").unwrap(), "%T");
    assert_eq!(translate("ü"), Err(FormatError::InvalidCharacter('ü').into()));
}

#[test]
fn test_checksum() {
    // 1 + 2 + 3 + 10 + 11 + 12 = 39
    assert_eq!(Code39Checksum.calculate("123ABC").unwrap(), "$");
    assert_eq!(Code39Checksum.calculate("AB").unwrap(), "L");
    // 36 + 37 + 38 + 39 + 40 + 41 + 42 = 273, 273 % 43 = 15
    assert_eq!(Code39Checksum.calculate("-. $/+%").unwrap(), "F");
    assert!(Code39Checksum.calculate("*").is_err());
}

#[test]
fn test_draw() {
    let code = Code39::new(Style::default(), 1.0, 3.0);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "AB").unwrap();

    // two symbols and two guards of 16 each
    assert_eq!(code.width("AB").unwrap(), 16.0 * 4.0 + 10.0);
    let bars: Vec<_> = recorder.rectangles(Color::BLACK).collect();
    assert_eq!(bars.len(), 5 * 4);
    // the guard starts with a narrow bar followed by a wide space
    assert_eq!(bars[0], (5.0, 5.0, 1.0, 50.0));
    assert_eq!(bars[1].0, 9.0);
}

#[test]
fn test_optional_checksum() {
    let mut code = Code39::new(Style::default(), 1.0, 3.0);
    let plain = code.width("AB").unwrap();
    code.set_use_checksum(true);
    assert_eq!(code.width("AB").unwrap(), plain + 16.0);

    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "AB").unwrap();
    let texts: Vec<_> = recorder.texts().map(|(text, _, _)| text).collect();
    assert_eq!(texts, vec!["AB"]);
}

#[test]
fn test_encoding() {
    let mut code = Code39::new(Style::default(), 1.0, 3.0);
    code.set_use_checksum(true);
    // 29 + 14 + 28 + 29 + 18 + 23 + 16 + 1 + 2 + 3 = 163, 163 % 43 = 34
    assert_eq!(code.validate("TESTING123").unwrap(), "TESTING123Y");

    let (_, symbols, _) = code.encode("TESTING123").unwrap();
    let symbols: Vec<String> = symbols.iter().map(ToString::to_string).collect();
    assert_eq!(
        symbols,
        [
            "0100101000", // *
            "0000101100", // T
            "1000110000", // E
            "0010001100", // S
            "0000101100", // T
            "0010011000", // I
            "0000100110", // N
            "0000011010", // G
            "1001000010", // 1
            "0011000010", // 2
            "1011000000", // 3
            "1100100000", // Y
            "0100101000", // *
        ]
    );
}
