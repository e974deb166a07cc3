//! Rgb: 24-bit pixel color.

/// True-color RGB representation.
///
/// Uses 3 bytes per pixel, matching the channel depth of typical LED
/// matrix panels.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (0, 0, 0). Also the "off" color burnouts revert to.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// White (255, 255, 255)
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Red (255, 0, 0)
    pub const RED: Self = Self::new(255, 0, 0);
    /// Green (0, 255, 0)
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Blue (0, 0, 255)
    pub const BLUE: Self = Self::new(0, 0, 255);
    /// Default transparent sentinel for sprite buffers (magenta).
    pub const TRANSPARENT: Self = Self::new(255, 0, 255);

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Scale every channel linearly by `intensity`.
    ///
    /// `intensity` is clamped to `0.0..=1.0`; `1.0` returns the color
    /// unchanged and `0.0` returns black.
    #[must_use]
    pub fn scaled(self, intensity: f32) -> Self {
        let k = if intensity.is_nan() { 0.0 } else { intensity.clamp(0.0, 1.0) };
        let scale = |c: u8| (f32::from(c) * k).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    /// Convert from a 24-bit hex color (e.g., 0xFF5500)
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_u32(0xFF5500), Rgb::new(255, 0x55, 0));
        assert_eq!(Rgb::from(0x00_00FF), Rgb::BLUE);
    }

    #[test]
    fn test_rgb_debug_format() {
        assert_eq!(format!("{:?}", Rgb::new(255, 16, 1)), "#ff1001");
    }

    #[test]
    fn test_rgb_scaled() {
        let c = Rgb::new(200, 100, 50);
        assert_eq!(c.scaled(1.0), c);
        assert_eq!(c.scaled(0.5), Rgb::new(100, 50, 25));
        assert_eq!(c.scaled(0.0), Rgb::BLACK);
        // Out-of-range intensities clamp.
        assert_eq!(c.scaled(3.0), c);
        assert_eq!(c.scaled(-1.0), Rgb::BLACK);
    }
}
