use image::{ImageBuffer, Rgba, Rgba32FImage};

/// The single color applied to every pixel of a batch run.
///
/// Channels are plain floats, conventionally in [0, 1] but never clamped here;
/// out-of-range values from programmatic callers flow through untouched and
/// only get quantized by the final PNG encode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl TargetColor {
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// 8 uppercase hex digits (RRGGBBAA), used in output file names
    pub fn hex_code(&self) -> String {
        let quantize = |c: f32| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        format!(
            "{:02X}{:02X}{:02X}{:02X}",
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a)
        )
    }
}

/// Overwrite every pixel's RGB with the target color, keeping the alpha shape:
/// `out.a = target.a * in.a`. Pure per-pixel map, dimensions preserved.
pub fn recolor(image: &Rgba32FImage, target: &TargetColor) -> Rgba32FImage {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let source_alpha = image.get_pixel(x, y)[3];
        Rgba([target.r, target.g, target.b, target.a * source_alpha])
    })
}
