use std::fmt;

use crate::error::{ContractError, Result};

/// An ordered sequence of bits as printed by a symbology.
///
/// Depending on the symbology a `true` is either a dark module or a wide
/// element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitSequence {
    bits: Vec<bool>,
}

/// A run of dark modules followed by light ones.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Bar {
    /// Number of dark modules.
    pub width: usize,
    /// Number of light modules after the bar.
    pub space: usize,
}

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a string of `'0'` and `'1'`.
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(ContractError::InvalidPattern(pattern.to_string()).into());
        }
        let bits = pattern
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(ContractError::InvalidPattern(pattern.to_string())),
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { bits })
    }

    /// Parse a list of patterns, e.g. a symbol table.
    pub fn to_matrix(patterns: &[&str]) -> Result<Vec<Self>> {
        patterns.iter().map(|p| Self::from_pattern(p)).collect()
    }

    /// The lowest `width` bits of `word`, most significant first.
    pub fn from_word(word: u16, width: u8) -> Self {
        let bits = (0..width).rev().map(|i| word & (1 << i) != 0).collect();
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn extend(&mut self, other: &BitSequence) {
        self.bits.extend_from_slice(&other.bits);
    }

    /// Runs of set bits, each with the unset bits following it.
    ///
    /// Leading unset bits are reported as a bar of width zero.
    pub fn bars(&self) -> Vec<Bar> {
        let mut bars: Vec<Bar> = Vec::new();
        for bit in self.iter() {
            match bars.last_mut() {
                Some(bar) if bit && bar.space == 0 => bar.width += 1,
                Some(bar) if !bit => bar.space += 1,
                None if !bit => bars.push(Bar { width: 0, space: 1 }),
                _ => bars.push(Bar { width: 1, space: 0 }),
            }
        }
        bars
    }
}

/// Concatenate a list of sequences.
pub fn concat(sequences: &[BitSequence]) -> BitSequence {
    let mut result = BitSequence::new();
    for seq in sequences {
        result.extend(seq);
    }
    result
}

/// Take the first sequence out of the list.
pub fn pop_front(sequences: &mut Vec<BitSequence>) -> Option<BitSequence> {
    if sequences.is_empty() {
        None
    } else {
        Some(sequences.remove(0))
    }
}

/// Take the last sequence out of the list.
pub fn pop_back(sequences: &mut Vec<BitSequence>) -> Option<BitSequence> {
    sequences.pop()
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
use pretty_assertions::assert_eq;

#[test]
fn test_from_pattern() {
    let seq = BitSequence::from_pattern("1011").unwrap();
    assert_eq!(seq.iter().collect::<Vec<_>>(), vec![true, false, true, true]);
    assert_eq!(seq.to_string(), "1011");
    assert_eq!(
        BitSequence::from_pattern("10a1"),
        Err(ContractError::InvalidPattern("10a1".into()).into())
    );
    assert!(BitSequence::from_pattern("").is_err());
}

#[test]
fn test_from_word() {
    assert_eq!(BitSequence::from_word(0x18eb, 13).to_string(), "1100011101011");
    assert_eq!(BitSequence::from_word(0b0001101, 7).to_string(), "0001101");
}

#[test]
fn test_pop() {
    let mut seqs = BitSequence::to_matrix(&["1", "10", "100"]).unwrap();
    assert_eq!(pop_front(&mut seqs).unwrap().to_string(), "1");
    assert_eq!(pop_back(&mut seqs).unwrap().to_string(), "100");
    assert_eq!(pop_back(&mut seqs).unwrap().to_string(), "10");
    assert_eq!(pop_front(&mut seqs), None);
    assert_eq!(pop_back(&mut seqs), None);
}

#[test]
fn test_bars() {
    let bars = BitSequence::from_word(0b10000011010, 11).bars();
    assert_eq!(
        bars,
        vec![
            Bar { width: 1, space: 5 },
            Bar { width: 2, space: 1 },
            Bar { width: 1, space: 1 },
        ]
    );
    let bars = BitSequence::from_pattern("0011101").unwrap().bars();
    assert_eq!(
        bars,
        vec![
            Bar { width: 0, space: 2 },
            Bar { width: 3, space: 1 },
            Bar { width: 1, space: 0 },
        ]
    );
}
