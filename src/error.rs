use thiserror::Error;

/// The data can not be represented by the chosen symbology.
///
/// These errors depend on user input and are expected to be shown to the
/// user, see [`Barcode::test_render`](crate::Barcode::test_render).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// There is nothing to encode.
    #[error("No data to render.")]
    NoData,
    /// Only the digits `0` to `9` are allowed.
    #[error("Data must be numeric.")]
    NonNumeric,
    /// The number of characters does not fit the symbology.
    #[error("Data length invalid, expected {expected}, found {found}.")]
    InvalidLength { expected: &'static str, found: usize },
    /// The last digit does not match the computed check digit.
    #[error("Invalid check digit, expected {expected}.")]
    InvalidCheckDigit { expected: char },
    /// A character is not part of the symbology's character set.
    #[error("Invalid character {0:?}.")]
    InvalidCharacter(char),
    /// Interleaved symbols need an even number of digits.
    #[error("Number of digits to encode (including the checksum) must be even.")]
    OddElementCount,
    /// UPC-E supports number system 0 and 1 only.
    #[error("Invalid number system {0}, only 0 and 1 are supported.")]
    UpceNumberSystem(char),
    /// The UPC-A code can not be compressed to UPC-E.
    #[error("Data can't be converted to UPC-E.")]
    UpceConversion,
    /// A supplement has 2 or 5 digits.
    #[error("Supplement length invalid, must be 2 or 5, found {0}.")]
    SupplementLength(usize),
    /// The input is longer than the encoder accepts.
    #[error("Data too long, at most {max} characters are supported, found {found}.")]
    TooLong { max: usize, found: usize },
}

/// The API was used incorrectly.
///
/// Unlike [`FormatError`] these errors hint at a bug in the calling code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    /// Resolutions must be positive.
    #[error("dpi must be positive, got {0}")]
    InvalidDpi(f32),
    /// Bit patterns consist of `'0'` and `'1'` only.
    #[error("invalid bit pattern {0:?}")]
    InvalidPattern(String),
    /// A symbol index outside of the encoding table.
    #[error("symbol {symbol} out of range for table of size {size}")]
    SymbolOutOfRange { symbol: usize, size: usize },
    /// A coded Code 128 string was malformed.
    #[error("malformed coded data at {0:?}")]
    InvalidCoding(char),
    /// The symbology can not print text at this position.
    #[error("unsupported text position {0}")]
    TextPosition(&'static str),
}

/// Any error of this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl Error {
    /// Whether the error is caused by the data and not by API misuse.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[test]
fn test_messages() {
    assert_eq!(FormatError::NoData.to_string(), "No data to render.");
    let err: Error = FormatError::InvalidCharacter('é').into();
    assert!(err.is_format());
    assert_eq!(err.to_string(), "Invalid character 'é'.");
    let err: Error = ContractError::InvalidDpi(0.0).into();
    assert!(!err.is_format());
}
