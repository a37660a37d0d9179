//! The drawing surface barcodes are rendered to.
//!
//! A barcode never rasterizes anything itself. It emits a canvas size,
//! filled rectangles and text placements to a [`Builder`], which may be an
//! image writer, an HTML emitter or the [`Recorder`] of this crate.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::unit::{Unit, SCREEN_DPI};

/// An RGBA color, passed through to the builder untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// The font used for human readable text.
///
/// Glyphs are never measured, only the line height takes part in layout.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Font {
    pub family: String,
    /// Size in points (1/72 inch).
    pub size: f32,
    /// Line height as a multiple of the size.
    pub line_height: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            ..Self::default()
        }
    }

    /// Height of one line of text in pixels.
    pub fn height(&self, dpi: f32) -> f32 {
        self.size * self.line_height * dpi / 72.0
    }
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "Verdana".to_string(),
            size: 8.0,
            line_height: 1.2,
        }
    }
}

/// Receives the drawing instructions of a barcode.
///
/// Coordinates are given in [`unit`](Self::unit) at [`dpi`](Self::dpi), the
/// origin is the top left corner. The first call per rendering is always
/// [`prepare`](Self::prepare), followed by the background rectangle.
pub trait Builder {
    fn unit(&self) -> Unit {
        Unit::Pixel
    }

    fn dpi(&self) -> f32 {
        SCREEN_DPI
    }

    /// Set up a canvas of the given size.
    fn prepare(&mut self, width: f32, height: f32);

    fn draw_rectangle(&mut self, color: Color, x: f32, y: f32, width: f32, height: f32);

    /// Place `text` at `x`, or centered on `x` if `centered` is set.
    fn draw_string(&mut self, font: &Font, color: Color, centered: bool, text: &str, x: f32, y: f32);
}

/// Discards everything, used to check whether data can be rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBuilder;

impl Builder for NullBuilder {
    fn prepare(&mut self, _width: f32, _height: f32) {}

    fn draw_rectangle(&mut self, _color: Color, _x: f32, _y: f32, _width: f32, _height: f32) {}

    fn draw_string(&mut self, _: &Font, _: Color, _: bool, _: &str, _: f32, _: f32) {}
}

/// A single call made to a [`Builder`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction {
    Prepare {
        width: f32,
        height: f32,
    },
    Rectangle {
        color: Color,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Text {
        font: Font,
        color: Color,
        centered: bool,
        text: String,
        x: f32,
        y: f32,
    },
}

/// Builder collecting all instructions for later inspection.
///
/// ```rust
/// use linear_barcodes::{BarcodeType, DrawInstruction, Generator, Recorder, Settings};
///
/// let settings = Settings::new(BarcodeType::Ean8, "1234567");
/// let mut recorder = Recorder::new();
/// Generator::new(settings).render(&mut recorder).unwrap();
/// assert!(matches!(recorder.instructions()[0], DrawInstruction::Prepare { .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Recorder {
    unit: Unit,
    dpi: f32,
    instructions: Vec<DrawInstruction>,
}

impl Recorder {
    /// Record in pixels at screen resolution.
    pub fn new() -> Self {
        Self::with_unit(Unit::Pixel, SCREEN_DPI)
    }

    pub fn with_unit(unit: Unit, dpi: f32) -> Self {
        Self {
            unit,
            dpi,
            instructions: Vec::new(),
        }
    }

    pub fn instructions(&self) -> &[DrawInstruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<DrawInstruction> {
        self.instructions
    }

    /// The canvas size of the last prepare call.
    pub fn canvas(&self) -> Option<(f32, f32)> {
        self.instructions.iter().rev().find_map(|i| match i {
            DrawInstruction::Prepare { width, height } => Some((*width, *height)),
            _ => None,
        })
    }

    /// All rectangles drawn in `color`.
    pub fn rectangles(&self, color: Color) -> impl Iterator<Item = (f32, f32, f32, f32)> + '_ {
        self.instructions.iter().filter_map(move |i| match i {
            DrawInstruction::Rectangle {
                color: c,
                x,
                y,
                width,
                height,
            } if *c == color => Some((*x, *y, *width, *height)),
            _ => None,
        })
    }

    /// All text placements as `(text, x, y)`.
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32, f32)> + '_ {
        self.instructions.iter().filter_map(|i| match i {
            DrawInstruction::Text { text, x, y, .. } => Some((text.as_str(), *x, *y)),
            _ => None,
        })
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder for Recorder {
    fn unit(&self) -> Unit {
        self.unit
    }

    fn dpi(&self) -> f32 {
        self.dpi
    }

    fn prepare(&mut self, width: f32, height: f32) {
        self.instructions
            .push(DrawInstruction::Prepare { width, height });
    }

    fn draw_rectangle(&mut self, color: Color, x: f32, y: f32, width: f32, height: f32) {
        self.instructions.push(DrawInstruction::Rectangle {
            color,
            x,
            y,
            width,
            height,
        });
    }

    fn draw_string(&mut self, font: &Font, color: Color, centered: bool, text: &str, x: f32, y: f32) {
        self.instructions.push(DrawInstruction::Text {
            font: font.clone(),
            color,
            centered,
            text: text.to_string(),
            x,
            y,
        });
    }
}

/// Forwards to another builder, scaling every length by a constant factor.
pub(crate) struct Scaled<'a> {
    inner: &'a mut dyn Builder,
    factor: f32,
}

impl<'a> Scaled<'a> {
    pub(crate) fn new(inner: &'a mut dyn Builder, factor: f32) -> Self {
        Self { inner, factor }
    }
}

impl Builder for Scaled<'_> {
    fn unit(&self) -> Unit {
        self.inner.unit()
    }

    fn dpi(&self) -> f32 {
        self.inner.dpi()
    }

    fn prepare(&mut self, width: f32, height: f32) {
        self.inner.prepare(width * self.factor, height * self.factor);
    }

    fn draw_rectangle(&mut self, color: Color, x: f32, y: f32, width: f32, height: f32) {
        let f = self.factor;
        self.inner
            .draw_rectangle(color, x * f, y * f, width * f, height * f);
    }

    fn draw_string(&mut self, font: &Font, color: Color, centered: bool, text: &str, x: f32, y: f32) {
        self.inner
            .draw_string(font, color, centered, text, x * self.factor, y * self.factor);
    }
}

#[test]
fn test_font_height() {
    let font = Font::new("Verdana", 10.0);
    assert_eq!(font.height(72.0), 12.0);
    assert_eq!(Font::default().height(96.0), 8.0 * 1.2 * 96.0 / 72.0);
}

#[test]
fn test_scaled() {
    let mut recorder = Recorder::new();
    let mut scaled = Scaled::new(&mut recorder, 2.0);
    scaled.prepare(10.0, 5.0);
    scaled.draw_rectangle(Color::BLACK, 1.0, 2.0, 3.0, 4.0);
    assert_eq!(recorder.canvas(), Some((20.0, 10.0)));
    assert_eq!(
        recorder.rectangles(Color::BLACK).collect::<Vec<_>>(),
        vec![(2.0, 4.0, 6.0, 8.0)]
    );
}
