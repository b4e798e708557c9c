use glam::{Vec3, Vec4};

/// Linear RGB color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec3);

impl Color {
    pub const WHITE: Color = Color(Vec3::ONE);

    /// Converts a 0xRRGGBB sRGB color to linear RGB.
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xff) as f32 / 255.0;
        let g = ((hex >> 8) & 0xff) as f32 / 255.0;
        let b = (hex & 0xff) as f32 / 255.0;

        Color(Vec3::new(
            srgb_to_linear(r),
            srgb_to_linear(g),
            srgb_to_linear(b),
        ))
    }

    pub fn scaled(self, intensity: f32) -> Vec3 {
        self.0 * intensity
    }

    pub fn to_vec4(self) -> Vec4 {
        self.0.extend(1.0)
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.0.x as f64,
            g: self.0.y as f64,
            b: self.0.z as f64,
            a: 1.0,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_extremes_map_to_unit_range() {
        assert_eq!(Color::from_hex(0xffffff).0, Vec3::ONE);
        assert_eq!(Color::from_hex(0x000000).0, Vec3::ZERO);
    }

    #[test]
    fn hex_channels_are_decoded_in_order() {
        let red = Color::from_hex(0xff0000);
        assert_eq!(red.0, Vec3::new(1.0, 0.0, 0.0));

        let blue = Color::from_hex(0x0000ff);
        assert_eq!(blue.0, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn mid_grey_is_darker_in_linear_space() {
        let grey = Color::from_hex(0x808080);
        assert!((grey.0.x - 0.2158605).abs() < 1e-4);
    }
}
