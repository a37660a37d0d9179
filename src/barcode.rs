//! Geometry shared by all symbologies and dispatch over them.
use crate::bits::BitSequence;
use crate::builder::{Builder, Color, Font, NullBuilder, Scaled};
use crate::code128::Code128;
use crate::code39::Code39;
use crate::ean_upc::{Ean13, Ean8, Upca, Upce};
use crate::error::{ContractError, Error, FormatError, Result};
use crate::postnet::PostNet;
use crate::settings::{BarcodeType, Settings, TextPosition};
use crate::two_of_five::{Interleaved25, Standard25};
use crate::unit::{self, Unit};

/// Layout properties every symbology has.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub unit: Unit,
    pub dpi: f32,
    pub bar_height: f32,
    pub offset_width: f32,
    pub offset_height: f32,
    pub quiet_zone: f32,
    pub back_color: Color,
    pub bar_color: Color,
    pub font_color: Color,
    pub font: Font,
    pub text_position: TextPosition,
}

impl Style {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            unit: settings.unit,
            dpi: settings.dpi,
            bar_height: settings.bar_height,
            offset_width: settings.offset_width,
            offset_height: settings.offset_height,
            quiet_zone: settings.quiet_zone,
            back_color: settings.back_color,
            bar_color: settings.bar_color,
            font_color: settings.font_color,
            font: settings.font.clone(),
            text_position: settings.text_position,
        }
    }

    fn has_text(&self) -> bool {
        !self.text_position.is_empty()
    }

    /// Height of a line of text, zero without text.
    pub fn text_height(&self) -> Result<f32> {
        if !self.has_text() {
            return Ok(0.0);
        }
        unit::convert(self.font.height(self.dpi), Unit::Pixel, self.unit, self.dpi)
    }

    /// Room reserved for a single digit printed beside the bars, zero
    /// without text.
    pub fn text_width(&self) -> Result<f32> {
        if !self.has_text() {
            return Ok(0.0);
        }
        unit::convert(self.font.size / 72.0, Unit::Inch, self.unit, self.dpi)
    }

    /// Height taken by text above and below the bars.
    pub fn extra_height(&self) -> Result<f32> {
        let text_height = self.text_height()?;
        if self.text_position == TextPosition::ALL {
            Ok(text_height * 2.0)
        } else {
            Ok(text_height)
        }
    }

    /// Height taken by text above the bars.
    pub fn extra_top_height(&self) -> Result<f32> {
        if self.text_position.contains(TextPosition::TOP) {
            self.text_height()
        } else {
            Ok(0.0)
        }
    }

    pub fn total_height(&self) -> Result<f32> {
        Ok(self.offset_height * 2.0 + self.bar_height + self.extra_height()?)
    }

    /// Prepare the canvas and fill its background.
    pub(crate) fn begin(&self, builder: &mut dyn Builder, width: f32, height: f32) {
        builder.prepare(width, height);
        builder.draw_rectangle(self.back_color, 0.0, 0.0, width, height);
    }

    /// Print `texts` at `xs` above and/or below the bars.
    ///
    /// `y` is the top of the text line above the bars.
    pub(crate) fn draw_text(
        &self,
        builder: &mut dyn Builder,
        centered: bool,
        xs: &[f32],
        y: f32,
        texts: &[&str],
    ) -> Result<()> {
        let text_height = self.text_height()?;
        let mut lines = Vec::with_capacity(2);
        if self.text_position.contains(TextPosition::TOP) {
            lines.push(y);
        }
        if self.text_position.contains(TextPosition::BOTTOM) {
            lines.push(y + text_height + self.bar_height);
        }
        for line in lines {
            for (x, text) in xs.iter().zip(texts) {
                builder.draw_string(&self.font, self.font_color, centered, text, *x, line);
            }
        }
        Ok(())
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Draw a symbol where every bit is one module, set bits are dark.
///
/// Adjacent dark modules are merged into one rectangle. Returns the x
/// coordinate after the symbol.
pub(crate) fn draw_modules(
    builder: &mut dyn Builder,
    color: Color,
    x: f32,
    y: f32,
    module_width: f32,
    height: f32,
    symbol: &BitSequence,
) -> f32 {
    let mut x = x;
    for bar in symbol.bars() {
        if bar.width > 0 {
            let width = bar.width as f32 * module_width;
            builder.draw_rectangle(color, x, y, width, height);
        }
        x += (bar.width + bar.space) as f32 * module_width;
    }
    x
}

/// Draw a symbol of alternating bars and spaces, starting with a bar.
///
/// A set bit is a wide element, an unset bit a narrow one.
pub(crate) fn draw_elements(
    builder: &mut dyn Builder,
    color: Color,
    x: f32,
    y: f32,
    (narrow, wide): (f32, f32),
    height: f32,
    symbol: &BitSequence,
) -> f32 {
    let mut x = x;
    for (i, bit) in symbol.iter().enumerate() {
        let width = if bit { wide } else { narrow };
        if i % 2 == 0 {
            builder.draw_rectangle(color, x, y, width, height);
        }
        x += width;
    }
    x
}

/// Behavior common to all symbologies.
pub trait Symbology {
    fn style(&self) -> &Style;

    /// Check whether `data` can be encoded, without drawing.
    ///
    /// Returns the data as it is encoded, including check characters.
    fn validate(&self, data: &str) -> Result<String>;

    /// Total width of the rendered barcode.
    fn width(&self, data: &str) -> Result<f32>;

    /// Total height of the rendered barcode.
    fn height(&self) -> Result<f32> {
        self.style().total_height()
    }

    /// Emit all drawing instructions.
    ///
    /// Nothing is emitted if the data can not be encoded.
    fn draw(&self, builder: &mut dyn Builder, data: &str) -> Result<()>;
}

/// Symbologies built from modules of equal width.
pub trait ModuleBased {
    fn module_width(&self) -> f32;
}

/// Symbologies built from narrow and wide elements.
pub trait ThicknessBased {
    fn narrow_width(&self) -> f32;
    fn wide_width(&self) -> f32;
}

/// Symbologies where the check character can be left out.
pub trait OptionalChecksum {
    fn use_checksum(&self) -> bool;
    fn set_use_checksum(&mut self, use_checksum: bool);
}

/// Any of the supported symbologies, configured and ready to render.
#[derive(Debug, Clone)]
pub enum Barcode {
    Standard25(Standard25),
    Interleaved25(Interleaved25),
    Code39(Code39),
    Code128(Code128),
    Ean8(Ean8),
    Ean13(Ean13),
    Upca(Upca),
    Upce(Upce),
    PostNet(PostNet),
}

impl Barcode {
    /// Create the symbology selected by `settings`, configured with all
    /// settings that apply to it.
    pub fn from_settings(settings: &Settings) -> Self {
        let style = Style::from_settings(settings);
        let module = settings.module_width;
        let (narrow, wide) = (settings.narrow_width, settings.wide_width);
        let guard = settings.guard_extra_height;
        let mut barcode = match settings.kind {
            BarcodeType::Standard25 => Barcode::Standard25(Standard25::new(style, narrow, wide)),
            BarcodeType::Interleaved25 => {
                Barcode::Interleaved25(Interleaved25::new(style, narrow, wide))
            }
            BarcodeType::Code39 => Barcode::Code39(Code39::new(style, narrow, wide)),
            BarcodeType::Code128 => Barcode::Code128(Code128::new(style, module)),
            BarcodeType::Ean8 => Barcode::Ean8(Ean8::new(style, module, guard)),
            BarcodeType::Ean13 => Barcode::Ean13(Ean13::new(style, module, guard)),
            BarcodeType::Upca => Barcode::Upca(Upca::new(style, module, guard)),
            BarcodeType::Upce => Barcode::Upce(Upce::new(style, module, guard)),
            BarcodeType::PostNet => Barcode::PostNet(PostNet::new(style, narrow, wide)),
        };
        if let Some(optional) = barcode.optional_checksum_mut() {
            optional.set_use_checksum(settings.use_checksum);
        }
        barcode
    }

    pub fn kind(&self) -> BarcodeType {
        match self {
            Barcode::Standard25(_) => BarcodeType::Standard25,
            Barcode::Interleaved25(_) => BarcodeType::Interleaved25,
            Barcode::Code39(_) => BarcodeType::Code39,
            Barcode::Code128(_) => BarcodeType::Code128,
            Barcode::Ean8(_) => BarcodeType::Ean8,
            Barcode::Ean13(_) => BarcodeType::Ean13,
            Barcode::Upca(_) => BarcodeType::Upca,
            Barcode::Upce(_) => BarcodeType::Upce,
            Barcode::PostNet(_) => BarcodeType::PostNet,
        }
    }

    pub fn symbology(&self) -> &dyn Symbology {
        match self {
            Barcode::Standard25(b) => b,
            Barcode::Interleaved25(b) => b,
            Barcode::Code39(b) => b,
            Barcode::Code128(b) => b,
            Barcode::Ean8(b) => b,
            Barcode::Ean13(b) => b,
            Barcode::Upca(b) => b,
            Barcode::Upce(b) => b,
            Barcode::PostNet(b) => b,
        }
    }

    pub fn optional_checksum_mut(&mut self) -> Option<&mut dyn OptionalChecksum> {
        match self {
            Barcode::Standard25(b) => Some(b),
            Barcode::Interleaved25(b) => Some(b),
            Barcode::Code39(b) => Some(b),
            _ => None,
        }
    }

    /// Render `data` to `builder`.
    ///
    /// Lengths are converted if the builder works in another unit or
    /// resolution than the barcode.
    pub fn render(&self, builder: &mut dyn Builder, data: &str) -> Result<()> {
        if data.is_empty() {
            return Err(FormatError::NoData.into());
        }
        let style = self.symbology().style();
        log::trace!("rendering {} of {data:?}", self.kind());
        let factor = unit::scale_factor(style.unit, style.dpi, builder.unit(), builder.dpi())?;
        if factor == 1.0 {
            self.symbology().draw(builder, data)
        } else {
            log::trace!("scaling {} by {factor}", self.kind());
            self.symbology()
                .draw(&mut Scaled::new(builder, factor as f32), data)
        }
    }

    /// Check whether `data` would render.
    ///
    /// Returns the message of the format error if it would not, contract
    /// errors are passed on.
    pub fn test_render(&self, data: &str) -> Result<Option<String>, ContractError> {
        match self.render(&mut NullBuilder, data) {
            Ok(()) => Ok(None),
            Err(Error::Format(err)) => {
                log::warn!("{} can not render {data:?}: {err}", self.kind());
                Ok(Some(err.to_string()))
            }
            Err(Error::Contract(err)) => Err(err),
        }
    }

    /// See [`Symbology::validate`].
    pub fn validate(&self, data: &str) -> Result<String> {
        self.symbology().validate(data)
    }

    pub fn width(&self, data: &str) -> Result<f32> {
        self.symbology().width(data)
    }

    pub fn height(&self) -> Result<f32> {
        self.symbology().height()
    }
}

/// Renders the barcode described by a [`Settings`] record.
#[derive(Debug, Clone)]
pub struct Generator {
    settings: Settings,
}

impl Generator {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn barcode(&self) -> Barcode {
        Barcode::from_settings(&self.settings)
    }

    pub fn render(&self, builder: &mut dyn Builder) -> Result<()> {
        self.barcode().render(builder, &self.settings.data)
    }

    /// See [`Barcode::test_render`].
    pub fn test_render(&self) -> Result<Option<String>, ContractError> {
        self.barcode().test_render(&self.settings.data)
    }
}

#[cfg(test)]
use crate::builder::Recorder;

#[test]
fn test_text_geometry() {
    let close = |a: f32, b: f32| (a - b).abs() < 1e-4;
    let mut style = Style::default();
    // 8pt with a line height of 1.2 at 96 dpi
    assert!(close(style.text_height().unwrap(), 12.8));
    assert_eq!(style.text_width().unwrap(), 11.0);
    assert_eq!(style.extra_top_height().unwrap(), 0.0);
    assert!(close(style.total_height().unwrap(), 10.0 + 50.0 + 12.8));

    style.text_position = TextPosition::ALL;
    assert!(close(style.extra_height().unwrap(), 25.6));
    assert!(close(style.extra_top_height().unwrap(), 12.8));

    style.text_position = TextPosition::empty();
    assert_eq!(style.text_height().unwrap(), 0.0);
    assert_eq!(style.total_height().unwrap(), 60.0);
}

#[test]
fn test_draw_modules() {
    let mut recorder = Recorder::new();
    let symbol = BitSequence::from_pattern("0110100").unwrap();
    let x = draw_modules(&mut recorder, Color::BLACK, 10.0, 0.0, 2.0, 5.0, &symbol);
    assert_eq!(x, 24.0);
    assert_eq!(
        recorder.rectangles(Color::BLACK).collect::<Vec<_>>(),
        vec![(12.0, 0.0, 4.0, 5.0), (18.0, 0.0, 2.0, 5.0)]
    );
}

#[test]
fn test_draw_elements() {
    let mut recorder = Recorder::new();
    let symbol = BitSequence::from_pattern("1001").unwrap();
    let x = draw_elements(&mut recorder, Color::BLACK, 0.0, 0.0, (1.0, 3.0), 5.0, &symbol);
    assert_eq!(x, 8.0);
    assert_eq!(
        recorder.rectangles(Color::BLACK).collect::<Vec<_>>(),
        vec![(0.0, 0.0, 3.0, 5.0), (4.0, 0.0, 1.0, 5.0)]
    );
}

#[test]
fn test_empty_data() {
    let barcode = Barcode::from_settings(&Settings::default());
    assert_eq!(
        barcode.test_render(""),
        Ok(Some("No data to render.".to_string()))
    );
}

#[test]
fn test_from_settings() {
    for kind in BarcodeType::ALL {
        let settings = Settings::new(kind, "0");
        assert_eq!(Barcode::from_settings(&settings).kind(), kind);
    }
    let settings = Settings::new(BarcodeType::Code39, "A").with_checksum(true);
    match Barcode::from_settings(&settings) {
        Barcode::Code39(code) => assert!(code.use_checksum()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_validate_normalizes() {
    for (kind, data, normalized) in [
        (BarcodeType::Ean13, "750103131130", "7501031311309"),
        (BarcodeType::Ean8, "9638507", "96385074"),
        (BarcodeType::Upca, "03600029145", "036000291452"),
        (BarcodeType::Upce, "12345600006", "123456000063"),
        (BarcodeType::Standard25, "1234567", "1234567"),
        (BarcodeType::Code39, "Code-39", "C+O+D+E-39"),
        (BarcodeType::PostNet, "12345", "123455"),
    ] {
        let barcode = Barcode::from_settings(&Settings::new(kind, data));
        assert_eq!(barcode.validate(data).unwrap(), normalized, "{kind}");
    }
}
