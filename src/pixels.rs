//! Pixel synthesis for the gradient-with-border icon pattern

use anyhow::{anyhow, Result};
use std::str::FromStr;

/// An opaque 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    /// Parse a CSS colour string such as `#667eea`, `rgb(1, 2, 3)` or `white`.
    /// Any alpha component is ignored.
    pub fn parse(color: &str) -> Result<Rgb> {
        let srgb = css_color::Srgb::from_str(color)
            .map_err(|_| anyhow!("Invalid color: {}", color))?;
        Ok(Rgb([
            (srgb.red * 255.).round() as u8,
            (srgb.green * 255.).round() as u8,
            (srgb.blue * 255.).round() as u8,
        ]))
    }
}

/// Horizontal linear gradient between two colours
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub start: Rgb,
    pub end: Rgb,
}

impl Gradient {
    /// Colour at `ratio`, truncating each channel towards zero
    pub fn at(&self, ratio: f64) -> Rgb {
        let channel = |i: usize| {
            let a = self.start.0[i] as f64;
            let b = self.end.0[i] as f64;
            (a + (b - a) * ratio) as u8
        };
        Rgb([channel(0), channel(1), channel(2)])
    }
}

impl Default for Gradient {
    /// #667eea to #764ba2
    fn default() -> Self {
        Self {
            start: Rgb([102, 126, 234]),
            end: Rgb([118, 75, 162]),
        }
    }
}

/// Everything that determines the look of an icon apart from its size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconStyle {
    pub gradient: Gradient,
    /// Border width in pixels on every edge
    pub border: u32,
    pub border_color: Rgb,
}

impl Default for IconStyle {
    fn default() -> Self {
        Self {
            gradient: Gradient::default(),
            border: 2,
            border_color: Rgb::WHITE,
        }
    }
}

impl IconStyle {
    fn in_border(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        let b = self.border;
        x < b || y < b || x >= width.saturating_sub(b) || y >= height.saturating_sub(b)
    }

    /// Colour of the pixel at (x, y) in a `width` x `height` icon
    pub fn pixel(&self, x: u32, y: u32, width: u32, height: u32) -> Rgb {
        if self.in_border(x, y, width, height) {
            self.border_color
        } else {
            // Divides by the full width, so the last interior column never
            // quite reaches the end colour.
            self.gradient.at(x as f64 / width as f64)
        }
    }
}

/// Largest width or height a PNG header may declare
pub const MAX_DIMENSION: u32 = (1 << 31) - 1;

/// Row-major RGB8 pixel data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Render the icon pattern. Width and height must be non-zero.
    pub fn synthesize(width: u32, height: u32, style: &IconStyle) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("Icon dimensions must be positive, got {}x{}", width, height);
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            anyhow::bail!(
                "Icon dimensions {}x{} exceed the PNG limit of {}",
                width,
                height,
                MAX_DIMENSION
            );
        }

        let mut data = Vec::with_capacity(width as usize * height as usize * 3);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&style.pixel(x, y, width, height).0);
            }
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB bytes of row `y`
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * 3;
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Rgb([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_length() {
        for size in [16, 48, 128] {
            let buf = PixelBuffer::synthesize(size, size, &IconStyle::default()).unwrap();
            assert_eq!(buf.as_raw().len(), (size * size * 3) as usize);
        }
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(PixelBuffer::synthesize(0, 16, &IconStyle::default()).is_err());
        assert!(PixelBuffer::synthesize(16, 0, &IconStyle::default()).is_err());
        assert!(PixelBuffer::synthesize(1, MAX_DIMENSION + 1, &IconStyle::default()).is_err());
    }

    #[test]
    fn test_border_is_white() {
        let buf = PixelBuffer::synthesize(16, 16, &IconStyle::default()).unwrap();
        for i in 0..16 {
            for edge in [0, 1, 14, 15] {
                assert_eq!(buf.pixel(i, edge), Rgb::WHITE, "pixel ({}, {})", i, edge);
                assert_eq!(buf.pixel(edge, i), Rgb::WHITE, "pixel ({}, {})", edge, i);
            }
        }
    }

    #[test]
    fn test_first_interior_column() {
        // ratio = 2 / 16 = 0.125
        let buf = PixelBuffer::synthesize(16, 16, &IconStyle::default()).unwrap();
        assert_eq!(buf.pixel(2, 2), Rgb([104, 119, 225]));
        assert_eq!(buf.pixel(2, 13), Rgb([104, 119, 225]));
    }

    #[test]
    fn test_last_interior_column_truncates() {
        // ratio = 13 / 16 = 0.8125: g = 84.5625, b = 175.5
        let buf = PixelBuffer::synthesize(16, 16, &IconStyle::default()).unwrap();
        assert_eq!(buf.pixel(13, 7), Rgb([115, 84, 175]));
        assert_ne!(buf.pixel(13, 7), Gradient::default().end);
    }

    #[test]
    fn test_rows_share_gradient() {
        let buf = PixelBuffer::synthesize(48, 48, &IconStyle::default()).unwrap();
        for y in 3..45 {
            assert_eq!(buf.row(y), buf.row(2));
        }
    }

    #[test]
    fn test_gradient_endpoints() {
        let gradient = Gradient::default();
        assert_eq!(gradient.at(0.0), gradient.start);
        assert_eq!(gradient.at(1.0), gradient.end);
    }

    #[test]
    fn test_custom_border() {
        let style = IconStyle {
            border: 0,
            ..IconStyle::default()
        };
        let buf = PixelBuffer::synthesize(16, 16, &style).unwrap();
        assert_eq!(buf.pixel(0, 0), Gradient::default().start);

        let style = IconStyle {
            border: 8,
            border_color: Rgb([0, 0, 0]),
            ..IconStyle::default()
        };
        let buf = PixelBuffer::synthesize(16, 16, &style).unwrap();
        assert!(buf.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(Rgb::parse("#667eea").unwrap(), Rgb([102, 126, 234]));
        assert_eq!(Rgb::parse("#764ba2").unwrap(), Rgb([118, 75, 162]));
        assert_eq!(Rgb::parse("#fff").unwrap(), Rgb::WHITE);
        assert!(Rgb::parse("not-a-color").is_err());
    }
}
