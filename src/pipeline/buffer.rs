use std::path::Path;

use image::{ImageError, RgbImage};
use minifb::Window;

use crate::core::Color;

/// Something polygons can be painted into.
pub trait Buffer {
    fn new(width: usize, height: usize) -> Self
    where
        Self: Sized;
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn clear(&mut self, color: Color);
    /// Out of bounds writes are ignored.
    fn set_pixel(&mut self, x: usize, y: usize, color: Color);

    /// Paint `x0..=x1` on row `y`; the caller keeps the span on screen.
    fn fill_span(&mut self, y: usize, x0: usize, x1: usize, color: Color) {
        for x in x0..=x1 {
            self.set_pixel(x, y, color);
        }
    }

    fn present_window(&self, _window: &mut Window) -> Result<(), minifb::Error> {
        Ok(()) // Default does nothin
    }
}

/// `0x00RRGGBB` pixels, the layout minifb presents directly.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
}

impl Buffer for FrameBuffer {
    fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self, color: Color) {
        self.data.fill(color.to_u32());
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.data[x + y * self.width] = color.to_u32();
        }
    }

    fn fill_span(&mut self, y: usize, x0: usize, x1: usize, color: Color) {
        if y >= self.height || x0 > x1 || x0 >= self.width {
            return;
        }
        let x1 = x1.min(self.width - 1);
        let row = y * self.width;
        self.data[row + x0..=row + x1].fill(color.to_u32());
    }

    fn present_window(&self, window: &mut Window) -> Result<(), minifb::Error> {
        window.update_with_buffer(&self.data, self.width, self.height)
    }
}

impl FrameBuffer {
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(Color::from_u32(self.data[x + y * self.width]))
        } else {
            None
        }
    }

    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            image::Rgb(Color::from_u32(self.data[x as usize + y as usize * self.width]).to_rgb8())
        })
    }

    /// Write the buffer out; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ImageError> {
        self.to_image().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_and_set() {
        let mut buf = FrameBuffer::new(4, 3);
        buf.clear(Color::BACKGROUND);
        assert!(buf.data.iter().all(|&p| p == Color::BACKGROUND.to_u32()));

        buf.set_pixel(3, 2, Color::WHITE);
        buf.set_pixel(4, 0, Color::WHITE);
        buf.set_pixel(0, 3, Color::WHITE);
        assert_eq!(buf.pixel(3, 2), Some(Color::WHITE));
        assert_eq!(buf.data.iter().filter(|&&p| p == Color::WHITE.to_u32()).count(), 1);
        assert_eq!(buf.pixel(4, 0), None);
    }

    #[test]
    fn spans_are_clipped_to_the_row() {
        let mut buf = FrameBuffer::new(5, 2);
        buf.fill_span(1, 3, 100, Color::WHITE);
        assert_eq!(buf.pixel(2, 1), Some(Color::BLACK));
        assert_eq!(buf.pixel(3, 1), Some(Color::WHITE));
        assert_eq!(buf.pixel(4, 1), Some(Color::WHITE));
        assert_eq!(buf.pixel(0, 0), Some(Color::BLACK));

        buf.fill_span(5, 0, 1, Color::WHITE);
        buf.fill_span(0, 9, 12, Color::WHITE);
        assert_eq!(buf.pixel(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn converts_to_rgb_image() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.set_pixel(1, 0, Color::new(1, 2, 3));
        let img = buf.to_image();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(1, 0).0, [1, 2, 3]);
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0]);
    }
}
