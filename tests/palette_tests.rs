use livechart::ChartError;
use livechart::core::{DEFAULT_COLOR, PaletteColor, is_valid_hex_color};

#[test]
fn accepts_short_and_long_hex_forms() {
    for candidate in ["#abc", "#A1B2C3", "#000", "#ffffff", "#0F0"] {
        assert!(is_valid_hex_color(candidate), "{candidate} should be valid");
    }
}

#[test]
fn rejects_everything_else() {
    for candidate in ["red", "#12", "123456", "#12345", "#1234567", "#ggg", ""] {
        assert!(
            !is_valid_hex_color(candidate),
            "{candidate} should be invalid"
        );
    }
}

#[test]
fn strict_parse_reports_the_rejected_input() {
    let err = PaletteColor::parse("red").unwrap_err();
    assert!(matches!(err, ChartError::InvalidColor(input) if input == "red"));

    let color = PaletteColor::parse("#abc").expect("valid color");
    assert_eq!(color.as_str(), "#abc");
}

#[test]
fn sanitize_falls_back_to_default() {
    assert_eq!(PaletteColor::sanitize("123456").as_str(), DEFAULT_COLOR);
    assert_eq!(PaletteColor::sanitize("#A1B2C3").as_str(), "#A1B2C3");
}
