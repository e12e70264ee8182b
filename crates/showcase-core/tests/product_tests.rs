// Product descriptor and theme colour parsing.

use glam::Vec3;
use showcase_core::*;

#[test]
fn parses_six_and_three_digit_hex() {
    assert_eq!(parse_hex_color("#ff0000"), Some(Vec3::new(1.0, 0.0, 0.0)));
    assert_eq!(parse_hex_color("00ff00"), Some(Vec3::new(0.0, 1.0, 0.0)));
    assert_eq!(parse_hex_color("#fff"), Some(Vec3::ONE));
    assert_eq!(parse_hex_color("  #000  "), Some(Vec3::ZERO));
}

#[test]
fn rejects_malformed_hex() {
    for bad in ["", "#", "#12345", "#gggggg", "rgb(1,2,3)", "#1234567"] {
        assert_eq!(parse_hex_color(bad), None, "{:?}", bad);
    }
}

#[test]
fn bad_theme_falls_back_to_neutral() {
    let p = ProductDescriptor::new("Tonic", "tonic.png", "not-a-colour", "");
    assert_eq!(p.theme_color, Vec3::from(NEUTRAL_THEME));
    assert_eq!(p.name, "Tonic");
}
