use super::CodeSet;
use crate::bits::BitSequence;
use crate::encode::{SymbolEncoder, Table};
use crate::error::{ContractError, Result};

const PATTERNS: [u16; 106] = [
    0x6cc, 0x66c, 0x666, 0x498, 0x48c, 0x44c, 0x4c8, 0x4c4, 0x464, 0x648, 0x644, 0x624, 0x59c,
    0x4dc, 0x4ce, 0x5cc, 0x4ec, 0x4e6, 0x672, 0x65c, 0x64e, 0x6e4, 0x674, 0x76e, 0x74c, 0x72c,
    0x726, 0x764, 0x734, 0x732, 0x6d8, 0x6c6, 0x636, 0x518, 0x458, 0x446, 0x588, 0x468, 0x462,
    0x688, 0x628, 0x622, 0x5b8, 0x58e, 0x46e, 0x5d8, 0x5c6, 0x476, 0x776, 0x68e, 0x62e, 0x6e8,
    0x6e2, 0x6ee, 0x758, 0x746, 0x716, 0x768, 0x762, 0x71a, 0x77a, 0x642, 0x78a, 0x530, 0x50c,
    0x4b0, 0x486, 0x42c, 0x426, 0x590, 0x584, 0x4d0, 0x4c2, 0x434, 0x432, 0x612, 0x650, 0x7ba,
    0x614, 0x47a, 0x53c, 0x4bc, 0x49e, 0x5e4, 0x4f4, 0x4f2, 0x7a4, 0x794, 0x792, 0x6de, 0x6f6,
    0x7b6, 0x578, 0x51e, 0x45e, 0x5e8, 0x5e2, 0x7a8, 0x7a2, 0x5de, 0x5ee, 0x75e, 0x7ae, 0x684,
    0x690, 0x69c,
];

pub(crate) const SYMBOLS: Table = Table::new(11, &PATTERNS);

/// Stop pattern including the final bar.
pub(crate) const STOP: u16 = 0x18eb;
pub(crate) const STOP_WIDTH: u8 = 13;

/// Turn a coded string into symbol values.
///
/// The string starts with a start marker and may contain switch markers,
/// in code set C digits are consumed in pairs. Also returns the code set
/// active at the end.
pub(crate) fn symbol_values(coded: &str) -> Result<(Vec<u8>, CodeSet)> {
    let mut chars = coded.chars();
    let start = chars
        .next()
        .ok_or(ContractError::InvalidCoding('\0'))?;
    let mut set = CodeSet::from_start(start).ok_or(ContractError::InvalidCoding(start))?;
    let mut values = vec![set.start_value()];

    while let Some(c) = chars.next() {
        let value = match set {
            CodeSet::C if c.is_ascii_digit() => {
                let second = chars
                    .next()
                    .filter(char::is_ascii_digit)
                    .ok_or(ContractError::InvalidCoding(c))?;
                pair_value(c, second)
            }
            _ => set.value(c).ok_or(ContractError::InvalidCoding(c))?,
        };
        values.push(value);
        if let Some(next) = CodeSet::from_switch(c) {
            set = next;
        }
    }
    Ok((values, set))
}

fn pair_value(first: char, second: char) -> u8 {
    // both are ascii digits
    (first as u8 - b'0') * 10 + (second as u8 - b'0')
}

/// Encodes coded strings, see [`symbol_values`].
///
/// The stop pattern is not included.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Code128Encoder;

impl SymbolEncoder for Code128Encoder {
    fn encode(&self, data: &str) -> Result<Vec<BitSequence>> {
        let (values, _) = symbol_values(data)?;
        values
            .into_iter()
            .map(|value| SYMBOLS.get(value as usize))
            .collect()
    }
}

#[cfg(test)]
use super::{CODE_B, CODE_C, START_A, START_B, START_C};

#[test]
fn test_patterns() {
    // spot checks against the published table
    let expected = [
        (0, "11011001100"),
        (16, "10011101100"),
        (64, "10100001100"),
        (99, "10111011110"),
        (103, "11010000100"),
        (104, "11010010000"),
        (105, "11010011100"),
    ];
    for (value, pattern) in expected {
        assert_eq!(SYMBOLS.get(value).unwrap().to_string(), pattern);
    }
    assert_eq!(
        BitSequence::from_word(STOP, STOP_WIDTH).to_string(),
        "1100011101011"
    );
}

#[test]
fn test_symbol_size() {
    for value in 0..SYMBOLS.len() {
        let symbol = SYMBOLS.get(value).unwrap();
        let bars = symbol.bars();
        // three bars, starting dark and ending light
        assert_eq!(bars.len(), 3);
        assert_eq!(symbol.get(0), Some(true));
        assert_eq!(symbol.get(10), Some(false));
    }
}

#[test]
fn test_symbol_values() {
    let coded = format!("{START_B}ab{CODE_C}1234{CODE_B}z");
    let (values, set) = symbol_values(&coded).unwrap();
    assert_eq!(values, vec![104, 65, 66, 99, 12, 34, 100, 90]);
    assert_eq!(set, CodeSet::B);

    let (values, set) = symbol_values(&format!("{START_A}\n")).unwrap();
    assert_eq!(values, vec![103, 74]);
    assert_eq!(set, CodeSet::A);
}

#[test]
fn test_invalid_coding() {
    assert!(symbol_values("abc").is_err());
    assert!(symbol_values(&format!("{START_C}123")).is_err());
    assert!(symbol_values(&format!("{START_A}a")).is_err());
    assert!(symbol_values(&format!("{START_A}A{START_B}")).is_err());
    assert_eq!(
        Code128Encoder.encode(&format!("{START_C}12")).unwrap().len(),
        2
    );
}
