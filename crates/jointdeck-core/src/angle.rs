//! Fixed-width angle display formatting.
//!
//! Joint positions are stored in radians but displayed in degrees. Readouts
//! are padded to a constant column width so slider labels stay visually
//! aligned while values change sign and magnitude.

/// Minimum character width of the numeric portion of a formatted angle.
///
/// Wide enough for `-180.0`; larger magnitudes simply widen the field.
pub const ANGLE_FIELD_WIDTH: usize = 7;

/// Format an angle given in radians as a right-aligned degree string.
///
/// The value is converted to degrees, rounded to one decimal place, padded
/// on the left to [`ANGLE_FIELD_WIDTH`] characters, and suffixed with `°`.
/// Non-finite inputs are not masked; they format as their textual form
/// (`NaN`, `inf`), padded the same way.
///
/// ```
/// use jointdeck_core::angle::format_angle;
///
/// assert_eq!(format_angle(0.0), "    0.0°");
/// assert_eq!(format_angle(std::f32::consts::PI), "  180.0°");
/// ```
#[must_use]
pub fn format_angle(radians: f32) -> String {
    format!(
        "{:>width$.1}°",
        radians.to_degrees(),
        width = ANGLE_FIELD_WIDTH
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    // -- exact renderings --

    #[test]
    fn zero_renders_padded() {
        assert_eq!(format_angle(0.0), "    0.0°");
    }

    #[test]
    fn pi_renders_as_180() {
        assert_eq!(format_angle(PI), "  180.0°");
    }

    #[test]
    fn negative_pi_renders_as_minus_180() {
        assert_eq!(format_angle(-PI), " -180.0°");
    }

    #[test]
    fn half_radian_rounds_to_one_decimal() {
        // 0.5 rad = 28.6479° → 28.6
        assert_eq!(format_angle(0.5), "   28.6°");
    }

    #[test]
    fn small_negative_keeps_sign() {
        // -0.01 rad = -0.5729° → -0.6
        assert_eq!(format_angle(-0.01), "   -0.6°");
    }

    #[test]
    fn quarter_pi_renders_as_45() {
        assert_eq!(format_angle(PI / 4.0), "   45.0°");
    }

    // -- width behavior --

    #[test]
    fn minimum_length_is_field_width_plus_suffix() {
        for &radians in &[0.0, 0.1, -0.1, PI, -PI, 2.0 * PI, 1.234, -2.5] {
            let formatted = format_angle(radians);
            assert!(
                formatted.chars().count() >= ANGLE_FIELD_WIDTH + 1,
                "too short: {formatted:?}"
            );
            assert!(formatted.ends_with('°'));
        }
    }

    #[test]
    fn oversized_magnitudes_widen_instead_of_truncating() {
        // 100 rad = 5729.6°, still fits; 10_000 rad = 572957.8°, overflows
        // the minimum field and must not be cut off.
        assert_eq!(format_angle(10_000.0), "572957.8°");
    }

    #[test]
    fn numeric_portion_matches_rounded_degrees() {
        for i in -720..=720 {
            #[allow(clippy::cast_precision_loss)]
            let radians = (i as f32) * 0.01;
            let formatted = format_angle(radians);
            let numeric: f32 = formatted
                .trim_end_matches('°')
                .trim_start()
                .parse()
                .unwrap();
            let expected = (radians.to_degrees() * 10.0).round() / 10.0;
            assert!(
                (numeric - expected).abs() < 0.051,
                "{radians} rad → {formatted:?}, expected {expected}"
            );
        }
    }

    // -- non-finite inputs --

    #[test]
    fn nan_formats_as_text() {
        assert_eq!(format_angle(f32::NAN), "    NaN°");
    }

    #[test]
    fn infinity_formats_as_text() {
        assert_eq!(format_angle(f32::INFINITY), "    inf°");
        assert_eq!(format_angle(f32::NEG_INFINITY), "   -inf°");
    }
}
