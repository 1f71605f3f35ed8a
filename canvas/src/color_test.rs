use super::*;

#[test]
fn parse_long_form() {
    assert_eq!(Color::parse("#ff8000"), Ok(Color::rgb(255, 128, 0)));
}

#[test]
fn parse_short_form_expands_each_digit() {
    assert_eq!(Color::parse("#f80"), Ok(Color::rgb(255, 136, 0)));
}

#[test]
fn parse_is_case_insensitive_and_trims() {
    assert_eq!(Color::parse("  #FFaa00 "), Ok(Color::rgb(255, 170, 0)));
}

#[test]
fn parse_rejects_missing_hash() {
    assert!(Color::parse("ffffff").is_err());
}

#[test]
fn parse_rejects_wrong_length() {
    assert!(Color::parse("#ffff").is_err());
    assert!(Color::parse("#").is_err());
}

#[test]
fn parse_rejects_sign_and_non_hex() {
    assert!(Color::parse("#+f+f+f").is_err());
    assert!(Color::parse("#gggggg").is_err());
    assert!(Color::parse("#ééé").is_err());
}

#[test]
fn display_is_lowercase_long_form() {
    assert_eq!(Color::rgb(171, 205, 239).to_string(), "#abcdef");
    assert_eq!(Color::BLACK.to_string(), "#000000");
}

#[test]
fn serde_uses_hex_string() {
    let json = serde_json::to_string(&Color::WHITE).unwrap();
    assert_eq!(json, "\"#ffffff\"");
    let back: Color = serde_json::from_str("\"#0F0\"").unwrap();
    assert_eq!(back, Color::rgb(0, 255, 0));
}

#[test]
fn serde_rejects_invalid_string() {
    assert!(serde_json::from_str::<Color>("\"red\"").is_err());
}

#[test]
fn luminance_extremes() {
    assert!(Color::BLACK.luminance().abs() < 1e-9);
    assert!((Color::WHITE.luminance() - 1.0).abs() < 1e-9);
}
