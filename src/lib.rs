//! This crate encodes data as one-dimensional barcodes and lays them out as
//! drawing primitives.
//!
//! Supported symbologies are Code 128, Code 39 (full ASCII), EAN-13, EAN-8,
//! UPC-A and UPC-E with 2 or 5 digit supplements, Standard and Interleaved
//! 2 of 5, and PostNet.
//!
//! Rendering produces a canvas size, filled rectangles and text placements
//! which are passed to a [`Builder`]. Rasterizing, font metrics and image
//! formats are left to the builder.
//!
//! ## Example
//!
//! ```rust
//! use linear_barcodes::{BarcodeType, Color, Generator, Recorder, Settings};
//!
//! let settings = Settings::new(BarcodeType::Code128, "Hello!");
//! let mut recorder = Recorder::new();
//! Generator::new(settings).render(&mut recorder).unwrap();
//!
//! let (width, height) = recorder.canvas().unwrap();
//! for (x, y, w, h) in recorder.rectangles(Color::BLACK) {
//!     // draw a bar at x, y of size w x h
//! #   assert!(x + w <= width && y + h <= height);
//! }
//! ```
//!
//! ## Errors
//!
//! Data which can not be encoded results in a [`FormatError`], nothing is
//! drawn in that case. Use [`Barcode::test_render`] to check data up front.
//! A [`ContractError`] signals wrong use of the API, such as a non-positive
//! resolution.
//!
//! ## Units
//!
//! All lengths of [`Settings`] are in one [`Unit`] at one resolution. If the
//! builder works in another unit, lengths are converted while rendering.
//! Pixel lengths are rounded up to whole pixels on conversion.

pub mod bits;
pub mod checksum;
pub mod code128;
pub mod code39;
pub mod ean_upc;
pub mod encode;
pub mod postnet;
pub mod two_of_five;
pub mod unit;

mod barcode;
mod builder;
mod error;
mod settings;

pub use barcode::{
    Barcode, Generator, ModuleBased, OptionalChecksum, Style, Symbology, ThicknessBased,
};
pub use bits::{Bar, BitSequence};
pub use builder::{Builder, Color, DrawInstruction, Font, NullBuilder, Recorder};
pub use checksum::{Checksum, Modulo10, PostNetChecksum, Supplement5Checksum};
pub use code128::{Code128, Code128Checksum};
pub use code39::{Code39, Code39Checksum};
pub use ean_upc::{Ean13, Ean8, Upca, Upce};
pub use error::{ContractError, Error, FormatError, Result};
pub use postnet::PostNet;
pub use settings::{BarcodeType, ParseBarcodeTypeError, Settings, TextPosition};
pub use two_of_five::{Interleaved25, Standard25};
pub use unit::{convert, convert_dpi, ParseUnitError, Unit, SCREEN_DPI};
