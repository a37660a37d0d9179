//! Check digit algorithms.
//!
//! Every algorithm is a pure function of its input. Symbologies use their
//! default algorithm unless another one is injected with `with_checksum`.
use std::fmt;

use crate::encode::digit;
use crate::error::{FormatError, Result};

/// Computes the check character(s) for some data.
pub trait Checksum: fmt::Debug + Send + Sync {
    fn calculate(&self, data: &str) -> Result<String>;
}

fn digits(data: &str) -> Result<Vec<u32>> {
    if data.is_empty() {
        return Err(FormatError::NoData.into());
    }
    data.chars().map(|c| digit(c).map(u32::from)).collect()
}

/// The weight 3, weight 1 scheme of EAN, UPC and 2 of 5.
///
/// Starting at the rightmost digit, digits are weighted 3 and 1 in turn.
#[derive(Debug, Clone, Copy, Default)]
pub struct Modulo10;

impl Checksum for Modulo10 {
    fn calculate(&self, data: &str) -> Result<String> {
        let sum: u32 = digits(data)?
            .iter()
            .rev()
            .enumerate()
            .map(|(i, d)| if i % 2 == 0 { 3 * d } else { *d })
            .sum();
        Ok(((10 - sum % 10) % 10).to_string())
    }
}

/// Digit sum padded to the next multiple of ten.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostNetChecksum;

impl Checksum for PostNetChecksum {
    fn calculate(&self, data: &str) -> Result<String> {
        let sum: u32 = digits(data)?.iter().sum();
        Ok(((10 - sum % 10) % 10).to_string())
    }
}

/// Selects the parity pattern of a five digit EAN supplement.
///
/// Weights 3 and 9 alternate from the rightmost digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Supplement5Checksum;

impl Checksum for Supplement5Checksum {
    fn calculate(&self, data: &str) -> Result<String> {
        let sum: u32 = digits(data)?
            .iter()
            .rev()
            .enumerate()
            .map(|(i, d)| if i % 2 == 0 { 3 * d } else { 9 * d })
            .sum();
        Ok((sum % 10).to_string())
    }
}

#[test]
fn test_modulo10() {
    let cases = [
        ("007567816412", "5"),
        ("123456789123", "1"),
        ("000000000000", "0"),
        ("111111111111", "6"),
        ("576415430248", "3"),
        ("456", "5"),
        ("9", "3"),
        ("1234567", "0"),
        ("5512345", "7"),
    ];
    for (data, expected) in cases {
        assert_eq!(Modulo10.calculate(data).unwrap(), expected, "{data}");
    }
}

#[test]
fn test_modulo10_errors() {
    assert_eq!(Modulo10.calculate(""), Err(FormatError::NoData.into()));
    assert_eq!(Modulo10.calculate("12a"), Err(FormatError::NonNumeric.into()));
}

#[test]
fn test_postnet() {
    assert_eq!(PostNetChecksum.calculate("12345").unwrap(), "5");
    assert_eq!(PostNetChecksum.calculate("55555").unwrap(), "5");
    assert_eq!(PostNetChecksum.calculate("19").unwrap(), "0");
}

#[test]
fn test_supplement5() {
    // 5*3 + 2*9 + 4*3 + 9*9 + 5*3 = 141
    assert_eq!(Supplement5Checksum.calculate("52495").unwrap(), "1");
    assert_eq!(Supplement5Checksum.calculate("00000").unwrap(), "0");
}

#[test]
fn test_deterministic() {
    let first = Modulo10.calculate("4006381333931").unwrap();
    assert_eq!(Modulo10.calculate("4006381333931").unwrap(), first);
}
