use linear_barcodes::{
    Barcode, BarcodeType, Color, ContractError, DrawInstruction, FormatError, Generator,
    Recorder, Settings, TextPosition, Unit,
};
use pretty_assertions::assert_eq;

const SAMPLES: [(BarcodeType, &str); 9] = [
    (BarcodeType::Code128, "testing123"),
    (BarcodeType::Code39, "TESTING123"),
    (BarcodeType::Ean13, "123456789456"),
    (BarcodeType::Ean8, "1234567"),
    (BarcodeType::Interleaved25, "12345678"),
    (BarcodeType::PostNet, "123456789"),
    (BarcodeType::Standard25, "12345678"),
    (BarcodeType::Upca, "12345678912"),
    (BarcodeType::Upce, "12345600006"),
];

#[test]
fn test_render_samples() {
    for (kind, data) in SAMPLES {
        let generator = Generator::new(Settings::new(kind, data));
        assert_eq!(generator.test_render(), Ok(None), "{kind}");

        let mut recorder = Recorder::new();
        generator.render(&mut recorder).unwrap();
        let (width, height) = recorder.canvas().unwrap();
        assert!(width > 0.0 && height > 0.0, "{kind}");

        let barcode = generator.barcode();
        assert_eq!(barcode.width(data).unwrap(), width, "{kind}");
        assert_eq!(barcode.height().unwrap(), height, "{kind}");

        // every bar lies on the canvas
        for (x, y, w, h) in recorder.rectangles(Color::BLACK) {
            assert!(x >= 0.0 && x + w <= width + 1e-3, "{kind} {x} {w}");
            assert!(y >= 0.0 && y + h <= height + 1e-3, "{kind} {y} {h}");
        }
    }
}

#[test]
fn test_instruction_order() {
    let mut recorder = Recorder::new();
    Generator::new(Settings::new(BarcodeType::Code39, "A"))
        .render(&mut recorder)
        .unwrap();
    let instructions = recorder.instructions();
    assert!(matches!(instructions[0], DrawInstruction::Prepare { .. }));
    match &instructions[1] {
        DrawInstruction::Rectangle {
            color, x, y, ..
        } => {
            assert_eq!(*color, Color::WHITE);
            assert_eq!((*x, *y), (0.0, 0.0));
        }
        other => panic!("expected the background, got {other:?}"),
    }
    assert!(matches!(
        instructions.last(),
        Some(DrawInstruction::Text { .. })
    ));
}

#[test]
fn test_format_errors() {
    let generator = Generator::new(Settings::new(BarcodeType::Standard25, "TEST"));
    assert_eq!(
        generator.test_render(),
        Ok(Some(FormatError::NonNumeric.to_string()))
    );

    // 12345678905 has no UPC-E form
    let generator = Generator::new(Settings::new(BarcodeType::Upce, "12345678905"));
    assert_eq!(
        generator.test_render(),
        Ok(Some(FormatError::UpceConversion.to_string()))
    );

    let generator = Generator::new(Settings::new(BarcodeType::Code128, ""));
    assert_eq!(
        generator.test_render(),
        Ok(Some("No data to render.".to_string()))
    );
}

#[test]
fn test_contract_errors() {
    let settings = Settings::new(BarcodeType::Ean13, "123456789456")
        .with_text_position(TextPosition::TOP);
    let barcode = Barcode::from_settings(&settings);
    assert!(matches!(
        barcode.test_render("123456789456"),
        Err(ContractError::TextPosition(_))
    ));

    let mut settings = Settings::new(BarcodeType::Code128, "x");
    settings.dpi = 0.0;
    let mut recorder = Recorder::new();
    let err = Generator::new(settings).render(&mut recorder).unwrap_err();
    assert!(!err.is_format());
}

#[test]
fn test_nothing_drawn_on_error() {
    for (kind, data) in [
        (BarcodeType::Ean8, "12345678"),
        (BarcodeType::Interleaved25, "123"),
        (BarcodeType::PostNet, "1234"),
        (BarcodeType::Code39, "naïve"),
    ] {
        let mut recorder = Recorder::new();
        let err = Generator::new(Settings::new(kind, data))
            .render(&mut recorder)
            .unwrap_err();
        assert!(err.is_format(), "{kind}");
        assert!(recorder.instructions().is_empty(), "{kind}");
    }
}

#[test]
fn test_checksum_setting() {
    let plain = Generator::new(Settings::new(BarcodeType::Interleaved25, "1234567"));
    assert_eq!(
        plain.test_render(),
        Ok(Some(FormatError::OddElementCount.to_string()))
    );

    let checked = Generator::new(
        Settings::new(BarcodeType::Interleaved25, "1234567").with_checksum(true),
    );
    assert_eq!(checked.test_render(), Ok(None));
    let mut recorder = Recorder::new();
    checked.render(&mut recorder).unwrap();
    let texts: Vec<_> = recorder.texts().map(|(text, _, _)| text).collect();
    assert_eq!(texts, vec!["12345670"]);
}

#[test]
fn test_builder_resolution() {
    let generator = Generator::new(Settings::new(BarcodeType::Code128, "1234"));
    let mut screen = Recorder::new();
    generator.render(&mut screen).unwrap();
    let mut print = Recorder::with_unit(Unit::Pixel, 192.0);
    generator.render(&mut print).unwrap();

    let (width, height) = screen.canvas().unwrap();
    assert_eq!(print.canvas(), Some((width * 2.0, height * 2.0)));
    let first = |r: &Recorder| r.rectangles(Color::BLACK).next().unwrap();
    let (x, y, w, h) = first(&screen);
    assert_eq!(first(&print), (x * 2.0, y * 2.0, w * 2.0, h * 2.0));
}

#[test]
fn test_settings_in_millimeters() {
    let mut settings = Settings::new(BarcodeType::Code128, "1234");
    settings.convert_units(Unit::Millimeter).unwrap();
    assert_eq!(settings.unit, Unit::Millimeter);

    let mut recorder = Recorder::new();
    Generator::new(settings).render(&mut recorder).unwrap();
    let mut reference = Recorder::new();
    Generator::new(Settings::new(BarcodeType::Code128, "1234"))
        .render(&mut reference)
        .unwrap();

    let (width, _) = recorder.canvas().unwrap();
    let (expected, _) = reference.canvas().unwrap();
    assert!((width - expected).abs() < 0.5, "{width} {expected}");
}

#[test]
fn test_supplement_rendering() {
    let generator = Generator::new(Settings::new(BarcodeType::Ean13, "12345678945612"));
    let mut recorder = Recorder::new();
    generator.render(&mut recorder).unwrap();
    let texts: Vec<_> = recorder.texts().map(|(text, _, _)| text).collect();
    assert_eq!(texts.last(), Some(&"12"));

    let generator = Generator::new(Settings::new(BarcodeType::Upca, "1234567891252495"));
    assert_eq!(generator.test_render(), Ok(None));
}
