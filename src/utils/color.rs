//! `#rrggbb` colour parsing.
//!
//! Colours are authored in sRGB hex and lit in linear space.

use glam::{Vec3, Vec4};

/// Parses `#rrggbb` (leading `#` optional) into sRGB components in `[0, 1]`.
#[must_use]
pub fn parse_hex(hex: &str) -> Option<Vec3> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Vec3::new(
        f32::from(channel(0)?) / 255.0,
        f32::from(channel(2)?) / 255.0,
        f32::from(channel(4)?) / 255.0,
    ))
}

#[inline]
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Parses a hex colour into linear RGBA with opaque alpha. Invalid input
/// yields magenta so a typo is visible rather than fatal.
#[must_use]
pub fn hex_to_linear(hex: &str) -> Vec4 {
    match parse_hex(hex) {
        Some(srgb) => Vec4::new(
            srgb_to_linear(srgb.x),
            srgb_to_linear(srgb.y),
            srgb_to_linear(srgb.z),
            1.0,
        ),
        None => {
            log::warn!("Invalid colour `{hex}`");
            Vec4::new(1.0, 0.0, 1.0, 1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        let a = parse_hex("#ff6347").unwrap();
        let b = parse_hex("ff6347").unwrap();
        assert_eq!(a, b);
        assert!((a.x - 1.0).abs() < 1e-6);
        assert!((a.y - 99.0 / 255.0).abs() < 1e-6);
        assert!((a.z - 71.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed() {
        assert!(parse_hex("#fff").is_none());
        assert!(parse_hex("#gg0000").is_none());
        assert!(parse_hex("#ff00ff00").is_none());
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        let white = hex_to_linear("#ffffff");
        let black = hex_to_linear("#000000");
        assert!((white.x - 1.0).abs() < 1e-5);
        assert!(black.x.abs() < 1e-6);
        assert!((white.w - 1.0).abs() < f32::EPSILON);
    }
}
