use crate::bits::BitSequence;
use crate::error::{ContractError, FormatError, Result};

/// A symbol table of fixed width bit patterns, packed into words.
///
/// The most significant used bit of a word is printed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    width: u8,
    words: &'static [u16],
}

impl Table {
    pub const fn new(width: u8, words: &'static [u16]) -> Self {
        Self { width, words }
    }

    /// Number of bits in each pattern.
    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Bit pattern of `symbol`.
    pub fn get(&self, symbol: usize) -> Result<BitSequence> {
        self.words
            .get(symbol)
            .map(|word| BitSequence::from_word(*word, self.width))
            .ok_or_else(|| {
                ContractError::SymbolOutOfRange {
                    symbol,
                    size: self.words.len(),
                }
                .into()
            })
    }
}

/// Encodes a complete string into one bit sequence per symbol.
pub trait SymbolEncoder {
    fn encode(&self, data: &str) -> Result<Vec<BitSequence>>;
}

/// Encodes characters one by one through a lookup table.
pub trait TableEncoder {
    fn table(&self) -> &Table;

    /// Position of `c` in the table.
    fn index(&self, c: char) -> Result<usize>;

    fn encode_char(&self, c: char) -> Result<BitSequence> {
        self.table().get(self.index(c)?)
    }
}

impl<T: TableEncoder> SymbolEncoder for T {
    fn encode(&self, data: &str) -> Result<Vec<BitSequence>> {
        data.chars().map(|c| self.encode_char(c)).collect()
    }
}

/// A table indexed by decimal digits.
#[derive(Debug, Clone, Copy)]
pub struct Digits(pub &'static Table);

impl TableEncoder for Digits {
    fn table(&self) -> &Table {
        self.0
    }

    fn index(&self, c: char) -> Result<usize> {
        digit(c).map(usize::from)
    }
}

/// The value of a decimal digit.
pub fn digit(c: char) -> Result<u8> {
    c.to_digit(10)
        .map(|d| d as u8)
        .ok_or_else(|| FormatError::NonNumeric.into())
}

/// Fails unless `data` consists of decimal digits only.
pub fn check_numeric(data: &str) -> Result<()> {
    if data.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FormatError::NonNumeric.into())
    }
}

#[cfg(test)]
const TEST_TABLE: Table = Table::new(3, &[0b001, 0b010, 0b100]);

#[test]
fn test_table() {
    assert_eq!(TEST_TABLE.get(2).unwrap().to_string(), "100");
    assert_eq!(
        TEST_TABLE.get(3),
        Err(ContractError::SymbolOutOfRange { symbol: 3, size: 3 }.into())
    );
}

#[test]
fn test_digits() {
    let encoded = Digits(&TEST_TABLE).encode("201").unwrap();
    let patterns: Vec<_> = encoded.iter().map(|s| s.to_string()).collect();
    assert_eq!(patterns, ["100", "001", "010"]);
    assert_eq!(
        Digits(&TEST_TABLE).encode("2a"),
        Err(FormatError::NonNumeric.into())
    );
    assert!(Digits(&TEST_TABLE).encode("9").is_err());
}
