//! Packed LED colors.
//!
//! The native driver stores one `u32` per LED laid out as `0xWWRRGGBB`.
//! [`Color`] is our unpacked view of that word; conversion happens at the
//! buffer boundary so the rest of the crate can work with named components.

/// One LED color, including the dedicated white channel of SK6812 RGBW parts.
///
/// # Rust concept: derive macros
/// `Clone, Copy` make this cheaply copyable (it's just four bytes).
/// `Default` gives us black, which is what a freshly initialized strip shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgbw(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, w: 0 }
    }

    pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    /// Pack into the driver's `0xWWRRGGBB` word.
    pub const fn to_packed(self) -> u32 {
        ((self.w as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn from_packed(value: u32) -> Self {
        Self {
            w: (value >> 24) as u8,
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        }
    }

    /// Scale every component by `brightness` (0-255).
    ///
    /// Matches the driver's render path: `(c * (brightness + 1)) >> 8`, so
    /// 255 leaves the color untouched and 0 turns it off.
    pub fn scale(self, brightness: u8) -> Self {
        Self {
            r: scale_component(self.r, brightness),
            g: scale_component(self.g, brightness),
            b: scale_component(self.b, brightness),
            w: scale_component(self.w, brightness),
        }
    }

    /// Create a color from a hue value (0-360), with full saturation and brightness.
    ///
    /// # Rust concept: match expressions
    /// Rust's `match` is exhaustive: the compiler ensures we handle all cases.
    pub fn from_hue(hue: u16) -> Self {
        let hue = hue % 360;
        let sector = hue / 60;
        let fraction = ((hue % 60) as f32) / 60.0;
        let rising = (fraction * 255.0) as u8;
        let falling = ((1.0 - fraction) * 255.0) as u8;

        match sector {
            0 => Self::new(255, rising, 0),  // Red → Yellow
            1 => Self::new(falling, 255, 0), // Yellow → Green
            2 => Self::new(0, 255, rising),  // Green → Cyan
            3 => Self::new(0, falling, 255), // Cyan → Blue
            4 => Self::new(rising, 0, 255),  // Blue → Magenta
            _ => Self::new(255, 0, falling), // Magenta → Red
        }
    }
}

#[inline]
pub(crate) fn scale_component(value: u8, brightness: u8) -> u8 {
    ((value as u16 * (brightness as u16 + 1)) >> 8) as u8
}

impl From<u32> for Color {
    fn from(value: u32) -> Self {
        Color::from_packed(value)
    }
}

impl From<Color> for u32 {
    fn from(c: Color) -> Self {
        c.to_packed()
    }
}

/// Create a Color from RGB values.
pub const fn color(r: u8, g: u8, b: u8) -> Color {
    Color::new(r, g, b)
}

/// Create a Color that also drives the white LED of RGBW strips.
pub const fn color_rgbw(r: u8, g: u8, b: u8, w: u8) -> Color {
    Color::rgbw(r, g, b, w)
}

/// Rainbow wheel over 0-255 positions: green → red → blue → green.
pub fn wheel(pos: u8) -> Color {
    match pos {
        0..=84 => Color::new(pos * 3, 255 - pos * 3, 0),
        85..=169 => {
            let pos = pos - 85;
            Color::new(255 - pos * 3, 0, pos * 3)
        }
        _ => {
            let pos = pos - 170;
            Color::new(0, pos * 3, 255 - pos * 3)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn packs_as_wwrrggbb() {
        assert_eq!(Color::rgbw(0x11, 0x22, 0x33, 0x44).to_packed(), 0x4411_2233);
        assert_eq!(color(255, 0, 0).to_packed(), 0x00ff_0000);
    }

    #[test]
    fn unpacks_every_byte() {
        let c = Color::from_packed(0xa1b2_c3d4);
        assert_eq!(c, Color::rgbw(0xb2, 0xc3, 0xd4, 0xa1));
        assert_eq!(u32::from(c), 0xa1b2_c3d4);
    }

    #[test]
    fn default_is_black() {
        assert_eq!(Color::default(), Color::BLACK);
        assert_eq!(Color::BLACK.to_packed(), 0);
    }

    #[rstest]
    #[case(255, 200, 200)]
    #[case(0, 200, 0)]
    #[case(127, 200, 100)]
    #[case(127, 255, 127)]
    #[case(25, 200, 20)]
    fn scale_matches_driver(#[case] brightness: u8, #[case] value: u8, #[case] expected: u8) {
        assert_eq!(scale_component(value, brightness), expected);
    }

    #[test]
    fn scale_full_brightness_is_identity() {
        let c = Color::rgbw(1, 128, 255, 77);
        assert_eq!(c.scale(255), c);
    }

    #[test]
    fn scale_zero_is_black() {
        assert_eq!(Color::rgbw(255, 255, 255, 255).scale(0), Color::BLACK);
    }

    #[rstest]
    #[case(0, Color::new(0, 255, 0))]
    #[case(84, Color::new(252, 3, 0))]
    #[case(85, Color::new(255, 0, 0))]
    #[case(170, Color::new(0, 0, 255))]
    #[case(255, Color::new(0, 255, 0))]
    fn wheel_positions(#[case] pos: u8, #[case] expected: Color) {
        assert_eq!(wheel(pos), expected);
    }

    #[rstest]
    #[case(0, 255, 0, 0)] // Red
    #[case(120, 0, 255, 0)] // Green
    #[case(240, 0, 0, 255)] // Blue
    fn from_hue_primaries(#[case] hue: u16, #[case] r: u8, #[case] g: u8, #[case] b: u8) {
        assert_eq!(Color::from_hue(hue), Color::new(r, g, b));
    }

    #[test]
    fn from_hue_wraps_at_360() {
        assert_eq!(Color::from_hue(90), Color::from_hue(450));
    }
}
