use sdl2::pixels::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
        Rgba { r, g, b, a: 255 }
    }

    /// Hue in degrees, saturation and brightness in percent.
    pub fn from_hsb(hue: f32, sat: f32, bri: f32) -> Rgba {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = (sat / 100.0).clamp(0.0, 1.0);
        let v = (bri / 100.0).clamp(0.0, 1.0);
        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = v - c;
        let to8 = |f: f32| ((f + m) * 255.0).round() as u8;
        Rgba::rgb(to8(r), to8(g), to8(b))
    }

    /// Packed as SDL's `ARGB8888`.
    pub fn to_argb(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Color {
        Color::RGBA(c.r, c.g, c.b, c.a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorScheme {
    Grayscale,
    Rainbow,
    PurpleIce,
    Custom { hue_from: f32, hue_to: f32 },
}

/// Linear remap of `v` from `[0, 255]` onto `[lo, hi]`.
fn ramp(v: u8, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * v as f32 / 255.0
}

impl ColorScheme {
    pub const NAMES: [&'static str; 4] = ["grayscale", "rainbow", "purpleice", "custom"];

    /// `hues` is only consulted for `custom`.
    pub fn from_name(name: &str, hues: (f32, f32)) -> Option<ColorScheme> {
        match name {
            "grayscale" => Some(ColorScheme::Grayscale),
            "rainbow" => Some(ColorScheme::Rainbow),
            "purpleice" => Some(ColorScheme::PurpleIce),
            "custom" => Some(ColorScheme::Custom { hue_from: hues.0, hue_to: hues.1 }),
            _ => None,
        }
    }

    pub fn color(&self, magnitude: u8) -> Rgba {
        match *self {
            ColorScheme::Grayscale => Rgba::rgb(magnitude, magnitude, magnitude),
            ColorScheme::Rainbow => Rgba::from_hsb(ramp(magnitude, 240.0, 0.0), 100.0, ramp(magnitude, 20.0, 100.0)),
            ColorScheme::PurpleIce => Rgba::from_hsb(ramp(magnitude, 240.0, 310.0), 80.0, ramp(magnitude, 0.0, 90.0)),
            ColorScheme::Custom { hue_from, hue_to } => {
                Rgba::from_hsb(ramp(magnitude, hue_from, hue_to), 80.0, ramp(magnitude, 0.0, 90.0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsb_primaries() {
        assert_eq!(Rgba::from_hsb(0.0, 100.0, 100.0), Rgba::rgb(255, 0, 0));
        assert_eq!(Rgba::from_hsb(120.0, 100.0, 100.0), Rgba::rgb(0, 255, 0));
        assert_eq!(Rgba::from_hsb(240.0, 100.0, 100.0), Rgba::rgb(0, 0, 255));
        assert_eq!(Rgba::from_hsb(360.0, 100.0, 100.0), Rgba::rgb(255, 0, 0));
        assert_eq!(Rgba::from_hsb(77.0, 0.0, 100.0), Rgba::rgb(255, 255, 255));
    }

    #[test]
    fn argb_packing() {
        let c = Rgba { r: 0x11, g: 0x22, b: 0x33, a: 0x44 };
        assert_eq!(c.to_argb(), 0x4411_2233);
        assert_eq!(Rgba::TRANSPARENT.to_argb(), 0);
    }

    #[test]
    fn purpleice_brightens_with_magnitude() {
        let s = ColorScheme::PurpleIce;
        assert_eq!(s.color(0), Rgba::rgb(0, 0, 0));
        let loud = s.color(255);
        // hue 310 at 90% brightness: red and blue dominate
        assert!(loud.r > loud.g && loud.b > loud.g);
        let sum = |c: Rgba| c.r as u32 + c.g as u32 + c.b as u32;
        assert!(sum(s.color(128)) < sum(loud));
    }

    #[test]
    fn names_round_trip() {
        for name in ColorScheme::NAMES {
            assert!(ColorScheme::from_name(name, (0.0, 0.0)).is_some());
        }
        assert_eq!(
            ColorScheme::from_name("custom", (10.0, 20.0)),
            Some(ColorScheme::Custom { hue_from: 10.0, hue_to: 20.0 })
        );
        assert!(ColorScheme::from_name("sepia", (0.0, 0.0)).is_none());
    }
}
