//! In-memory display
//!
//! Mirrors the LCD controller's addressing: a window is selected, then pixels
//! stream into it left to right, top to bottom, wrapping back to the window's
//! first pixel when it is full. Text is kept as an overlay rather than
//! rasterized.

use std::collections::BTreeMap;

use glam::IVec2;

use super::Display;
use crate::Color;
use crate::sim::Region;

/// A string drawn at a fixed position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub fg: Color,
    pub bg: Color,
}

#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: i32,
    height: i32,
    pixels: Vec<Color>,
    window: Region,
    cursor: IVec2,
    /// Text overlay keyed by (row, column) of its top-left corner
    texts: BTreeMap<(i32, i32), TextRun>,
    writes: u64,
}

impl Framebuffer {
    pub fn new(width: i32, height: i32, fill: Color) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        let full = Region::new(IVec2::ZERO, IVec2::new(width - 1, height - 1));
        Self {
            width,
            height,
            pixels: vec![fill; len],
            window: full,
            cursor: IVec2::ZERO,
            texts: BTreeMap::new(),
            writes: 0,
        }
    }

    /// Screen-sized framebuffer
    pub fn screen(fill: Color) -> Self {
        Self::new(crate::consts::SCREEN_WIDTH, crate::consts::SCREEN_HEIGHT, fill)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Raw RGB565 bytes in native endianness
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Pixel writes since creation
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn texts(&self) -> impl Iterator<Item = (IVec2, &TextRun)> {
        self.texts
            .iter()
            .map(|(&(row, col), run)| (IVec2::new(col, row), run))
    }

    pub fn text_at(&self, pos: IVec2) -> Option<&TextRun> {
        self.texts.get(&(pos.y, pos.x))
    }
}

impl Display for Framebuffer {
    fn bounds(&self) -> Region {
        Region::new(IVec2::ZERO, IVec2::new(self.width - 1, self.height - 1))
    }

    fn set_window(&mut self, region: &Region) {
        self.window = region.clip(&self.bounds());
        self.cursor = self.window.top_left;
    }

    fn write_pixel(&mut self, color: Color) {
        if self.window.is_empty() {
            return;
        }
        let IVec2 { x, y } = self.cursor;
        self.pixels[(y * self.width + x) as usize] = color;
        self.writes += 1;

        self.cursor.x += 1;
        if self.cursor.x > self.window.bottom_right.x {
            self.cursor.x = self.window.top_left.x;
            self.cursor.y += 1;
            if self.cursor.y > self.window.bottom_right.y {
                self.cursor.y = self.window.top_left.y;
            }
        }
    }

    fn draw_text(&mut self, pos: IVec2, text: &str, fg: Color, bg: Color) {
        self.texts.insert(
            (pos.y, pos.x),
            TextRun {
                text: text.to_string(),
                fg,
                bg,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_streams_row_major() {
        let mut fb = Framebuffer::new(4, 4, Color::BLACK);
        fb.set_window(&Region::new(IVec2::new(1, 1), IVec2::new(2, 2)));
        for c in [Color::RED, Color::GREEN, Color::BLUE, Color::WHITE] {
            fb.write_pixel(c);
        }
        assert_eq!(fb.pixel(1, 1), Some(Color::RED));
        assert_eq!(fb.pixel(2, 1), Some(Color::GREEN));
        assert_eq!(fb.pixel(1, 2), Some(Color::BLUE));
        assert_eq!(fb.pixel(2, 2), Some(Color::WHITE));
        assert_eq!(fb.pixel(0, 0), Some(Color::BLACK));
        assert_eq!(fb.writes(), 4);
    }

    #[test]
    fn test_window_wraps_when_full() {
        let mut fb = Framebuffer::new(2, 2, Color::BLACK);
        fb.set_window(&Region::new(IVec2::ZERO, IVec2::new(0, 0)));
        fb.write_pixel(Color::RED);
        fb.write_pixel(Color::GREEN);
        assert_eq!(fb.pixel(0, 0), Some(Color::GREEN));
        assert_eq!(fb.pixel(1, 0), Some(Color::BLACK));
    }

    #[test]
    fn test_window_clipped_to_screen() {
        let mut fb = Framebuffer::new(4, 4, Color::BLACK);
        fb.set_window(&Region::new(IVec2::new(3, 3), IVec2::new(6, 6)));
        fb.write_pixel(Color::RED);
        assert_eq!(fb.pixel(3, 3), Some(Color::RED));

        fb.set_window(&Region::new(IVec2::new(10, 10), IVec2::new(12, 12)));
        fb.write_pixel(Color::BLUE);
        assert_eq!(fb.writes(), 1);
    }

    #[test]
    fn test_text_overlay_replaces_same_position() {
        let mut fb = Framebuffer::screen(Color::BLACK);
        let pos = IVec2::new(52, 70);
        fb.draw_text(pos, "0", Color::WHITE, Color::BLACK);
        fb.draw_text(pos, "1", Color::WHITE, Color::BLACK);
        assert_eq!(fb.text_at(pos).map(|t| t.text.as_str()), Some("1"));
        assert_eq!(fb.texts().count(), 1);
    }

    #[test]
    fn test_as_bytes_is_two_bytes_per_pixel() {
        let fb = Framebuffer::new(3, 2, Color::WHITE);
        assert_eq!(fb.as_bytes().len(), 12);
        assert!(fb.as_bytes().iter().all(|&b| b == 0xff));
    }
}
