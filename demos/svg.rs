use std::error::Error;
use std::io::Read;

use linear_barcodes::{BarcodeType, Builder, Color, Font, Generator, Settings};

/// Writes the drawing instructions as an SVG document.
#[derive(Default)]
struct Svg {
    body: String,
    width: f32,
    height: f32,
}

fn rgb(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Builder for Svg {
    fn prepare(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn draw_rectangle(&mut self, color: Color, x: f32, y: f32, width: f32, height: f32) {
        self.body += &format!(
            r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"/>"#,
            rgb(color)
        );
    }

    fn draw_string(&mut self, font: &Font, color: Color, centered: bool, text: &str, x: f32, y: f32) {
        let anchor = if centered { "middle" } else { "start" };
        self.body += &format!(
            r#"<text x="{x}" y="{y}" font-family="{}" font-size="{}pt" fill="{}" text-anchor="{anchor}" dominant-baseline="hanging">{}</text>"#,
            escape(&font.family),
            font.size,
            rgb(color),
            escape(text)
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let kind: BarcodeType = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => BarcodeType::Code128,
    };

    let mut data = String::new();
    if atty::isnt(atty::Stream::Stdin) {
        std::io::stdin().read_to_string(&mut data)?;
    }
    let data = data.trim_end_matches(['\r', '\n']);

    let mut svg = Svg::default();
    Generator::new(Settings::new(kind, data)).render(&mut svg)?;
    println!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}">{}</svg>"#,
        svg.width, svg.height, svg.body
    );
    Ok(())
}

#[test]
fn test_escape() {
    assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    assert_eq!(escape("1234"), "1234");
}

#[test]
fn test_text_is_escaped() {
    let mut svg = Svg::default();
    Generator::new(Settings::new(BarcodeType::Code128, "<&>"))
        .render(&mut svg)
        .unwrap();
    assert!(svg.body.contains(">&lt;&amp;&gt;</text>"));
    assert!(!svg.body.contains("<&>"));
}