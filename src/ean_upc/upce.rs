use super::{draw_pattern, draw_symbols, encode_left, EanUpc, LEFT_GUARD};
use crate::barcode::{ModuleBased, Style, Symbology};
use crate::builder::Builder;
use crate::checksum::{Checksum, Modulo10};
use crate::encode::{check_numeric, digit, Table};
use crate::error::{FormatError, Result};

/// Parity of the six digits, by number system and check digit.
const PARITY: [Table; 2] = [
    Table::new(
        6,
        &[
            0b000111, 0b001011, 0b001101, 0b001110, 0b010011, 0b011001, 0b011100, 0b010101,
            0b010110, 0b011010,
        ],
    ),
    Table::new(
        6,
        &[
            0b111000, 0b110100, 0b110010, 0b110001, 0b101100, 0b100110, 0b100011, 0b101010,
            0b101001, 0b100101,
        ],
    ),
];

const RIGHT_GUARD: &str = "010101";

/// Compress a 12 digit UPC-A code into the six digits of UPC-E.
///
/// Only codes with enough zeros in the manufacturer or product number can
/// be compressed.
pub fn from_upca(upca: &str) -> Result<String> {
    check_numeric(upca)?;
    if upca.len() != 12 {
        return Err(FormatError::InvalidLength {
            expected: "12",
            found: upca.len(),
        }
        .into());
    }
    let manufacturer = &upca[1..6];
    let product = &upca[6..11];
    let product_number: u32 = product.parse().map_err(|_| FormatError::NonNumeric)?;

    if matches!(&manufacturer[2..], "000" | "100" | "200") && product_number < 1000 {
        Ok(format!(
            "{}{}{}",
            &manufacturer[..2],
            &product[2..],
            &manufacturer[2..3]
        ))
    } else if &manufacturer[3..] == "00" && product_number < 100 {
        Ok(format!("{}{}3", &manufacturer[..3], &product[3..]))
    } else if &manufacturer[4..] == "0" && product_number < 10 {
        Ok(format!("{}{}4", &manufacturer[..4], &product[4..]))
    } else if (5..10).contains(&product_number) {
        Ok(format!("{manufacturer}{}", &product[4..]))
    } else {
        Err(FormatError::UpceConversion.into())
    }
}

/// UPC-E driver.
///
/// Takes UPC-A data, with or without check digit, and draws its compressed
/// form.
#[derive(Debug, Clone)]
pub struct Upce {
    pub style: Style,
    pub module_width: f32,
    pub guard_extra_height: f32,
    checksum: Option<&'static dyn Checksum>,
}

impl Upce {
    pub fn new(style: Style, module_width: f32, guard_extra_height: f32) -> Self {
        Self {
            style,
            module_width,
            guard_extra_height,
            checksum: None,
        }
    }

    pub fn with_checksum(mut self, checksum: &'static dyn Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// The number system, the compressed digits and the check digit.
    fn compress(upca: &str) -> Result<(char, String, char)> {
        let mut chars = upca.chars();
        let number_system = chars.next().unwrap_or('0');
        if !matches!(number_system, '0' | '1') {
            return Err(FormatError::UpceNumberSystem(number_system).into());
        }
        let check = chars.last().unwrap_or('0');
        Ok((number_system, from_upca(upca)?, check))
    }
}

impl ModuleBased for Upce {
    fn module_width(&self) -> f32 {
        self.module_width
    }
}

impl EanUpc for Upce {
    const LENGTH: usize = 12;

    fn guard_extra_height(&self) -> f32 {
        self.guard_extra_height
    }

    fn checksum(&self) -> &dyn Checksum {
        self.checksum.unwrap_or(&Modulo10)
    }

    fn symbol_width(&self) -> Result<f32> {
        Ok(self.module_width * 51.0 + self.style.text_width()? * 2.0)
    }
}

impl Symbology for Upce {
    fn style(&self) -> &Style {
        &self.style
    }

    fn validate(&self, data: &str) -> Result<String> {
        let encoded = self.encode(data)?;
        Self::compress(&encoded.digits)?;
        Ok(encoded.normalized())
    }

    fn width(&self, data: &str) -> Result<f32> {
        let encoded = self.encode(data)?;
        Self::compress(&encoded.digits)?;
        Ok(encoded.width)
    }

    fn height(&self) -> Result<f32> {
        self.layout_height()
    }

    fn draw(&self, builder: &mut dyn Builder, data: &str) -> Result<()> {
        let encoded = self.encode(data)?;
        let (number_system, upce, check) = Self::compress(&encoded.digits)?;
        let parity = PARITY[digit(number_system)? as usize].get(digit(check)? as usize)?;
        let symbols = encode_left(&upce, &parity)?;

        let style = &self.style;
        let m = self.module_width;
        let text_width = style.text_width()?;
        let guard_height = style.bar_height + self.guard_extra();
        let (mut x, y) = self.begin(builder, encoded.width)?;
        let mut text_x = [x, 0.0, 0.0];
        x += text_width;
        x = draw_pattern(builder, style, m, (x, y), guard_height, LEFT_GUARD)?;
        text_x[1] = x;
        x = draw_symbols(builder, style, m, (x, y), style.bar_height, &symbols);
        x = draw_pattern(builder, style, m, (x, y), guard_height, RIGHT_GUARD)?;
        text_x[2] = x;

        let texts = [number_system.to_string(), upce, check.to_string()];
        let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
        style.draw_text(builder, false, &text_x, y - style.text_height()?, &texts)?;
        self.draw_supplement(builder, &encoded, x + text_width)
    }
}

#[cfg(test)]
use crate::builder::{Color, Recorder};

#[test]
fn test_from_upca() {
    // manufacturer ending in 000, 100 or 200
    assert_eq!(from_upca("012000003455").unwrap(), "123450");
    // manufacturer ending in 00
    assert_eq!(from_upca("012300000642").unwrap(), "123643");
    // manufacturer ending in 0
    assert_eq!(from_upca("012340000056").unwrap(), "123454");
    // product 5 to 9
    assert_eq!(from_upca("012345000058").unwrap(), "123455");
    assert_eq!(
        from_upca("012345678905"),
        Err(FormatError::UpceConversion.into())
    );
    // letters in the manufacturer number are not compressed away
    assert_eq!(from_upca("0AB000003455"), Err(FormatError::NonNumeric.into()));
    assert_eq!(from_upca("01200ö003455"), Err(FormatError::NonNumeric.into()));
    assert_eq!(
        from_upca("01200000345"),
        Err(FormatError::InvalidLength {
            expected: "12",
            found: 11
        }
        .into())
    );
}

#[test]
fn test_draw() {
    let code = Upce::new(Style::default(), 1.0, 10.0);
    let mut recorder = Recorder::new();
    code.draw(&mut recorder, "12345600006").unwrap();

    assert_eq!(code.width("12345600006").unwrap(), 51.0 + 22.0 + 10.0 + 22.0);
    let texts: Vec<_> = recorder.texts().map(|(text, x, _)| (text, x)).collect();
    assert_eq!(texts, vec![("1", 16.0), ("234566", 30.0), ("3", 78.0)]);
    // two guards of two and three bars, six digits
    assert_eq!(recorder.rectangles(Color::BLACK).count(), 2 + 3 + 12);
}

#[test]
fn test_reject() {
    let code = Upce::new(Style::default(), 1.0, 10.0);
    assert_eq!(
        code.validate("21234500006"),
        Err(FormatError::UpceNumberSystem('2').into())
    );
    assert_eq!(
        code.validate("01234567890"),
        Err(FormatError::UpceConversion.into())
    );
    let mut recorder = Recorder::new();
    assert!(code.draw(&mut recorder, "01234567890").is_err());
    assert!(recorder.instructions().is_empty());
}
