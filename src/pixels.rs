//! Per-channel LED buffer.
//!
//! A flat array of packed `0xWWRRGGBB` words, one per LED, exactly what the
//! driver copies out at render time. The length is fixed when the channel
//! is configured.

use crate::color::Color;
use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    leds: Vec<u32>,
}

impl PixelBuffer {
    /// All-black buffer of `len` LEDs.
    pub fn new(len: usize) -> Self {
        Self { leds: vec![0; len] }
    }

    pub fn len(&self) -> usize {
        self.leds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.get_packed(index).map(Color::from_packed)
    }

    pub fn get_packed(&self, index: usize) -> Option<u32> {
        self.leds.get(index).copied()
    }

    /// Set one LED. Writes past the end are dropped, the same way the
    /// animations expect a chase that steps off the end of the strip to be
    /// harmless.
    pub fn set(&mut self, index: usize, color: Color) {
        self.set_packed(index, color.to_packed());
    }

    pub fn set_packed(&mut self, index: usize, value: u32) {
        match self.leds.get_mut(index) {
            Some(slot) => *slot = value,
            None => tracing::trace!("Ignoring write to LED {} of {}", index, self.leds.len()),
        }
    }

    pub fn set_rgb(&mut self, index: usize, r: u8, g: u8, b: u8) {
        self.set(index, Color::new(r, g, b));
    }

    pub fn fill(&mut self, color: Color) {
        self.leds.fill(color.to_packed());
    }

    pub fn clear(&mut self) {
        self.leds.fill(0);
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.leds.iter().map(|&v| Color::from_packed(v))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.leds
    }

    /// Bitmap upload. Copies as many words as fit; extra input is ignored
    /// and a short input leaves the tail untouched.
    pub fn copy_from_slice(&mut self, words: &[u32]) {
        let n = words.len().min(self.leds.len());
        self.leds[..n].copy_from_slice(&words[..n]);
    }

    /// Colors in `range`, clamped to the buffer.
    pub fn get_range(&self, range: Range<usize>) -> Vec<Color> {
        let end = range.end.min(self.leds.len());
        let start = range.start.min(end);
        self.leds[start..end]
            .iter()
            .map(|&v| Color::from_packed(v))
            .collect()
    }

    /// Write `colors` starting at `start`, dropping anything past the end.
    pub fn set_range(&mut self, start: usize, colors: &[Color]) {
        for (offset, &c) in colors.iter().enumerate() {
            self.set(start + offset, c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::color;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_black() {
        let buf = PixelBuffer::new(4);
        assert_eq!(buf.len(), 4);
        assert!(buf.iter().all(|c| c == Color::BLACK));
    }

    #[test]
    fn set_and_get() {
        let mut buf = PixelBuffer::new(3);
        buf.set(1, color(1, 2, 3));
        buf.set_rgb(2, 255, 0, 0);
        assert_eq!(buf.get(1), Some(color(1, 2, 3)));
        assert_eq!(buf.get_packed(2), Some(0x00ff_0000));
        assert_eq!(buf.as_slice(), &[0, 0x0001_0203, 0x00ff_0000]);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut buf = PixelBuffer::new(2);
        buf.set(2, color(9, 9, 9));
        buf.set_packed(100, 1);
        assert_eq!(buf.get(2), None);
        assert_eq!(buf.as_slice(), &[0, 0]);
    }

    #[test]
    fn fill_and_clear() {
        let mut buf = PixelBuffer::new(3);
        buf.fill(color(0, 0, 32));
        assert_eq!(buf.as_slice(), &[0x20, 0x20, 0x20]);
        buf.clear();
        assert_eq!(buf.as_slice(), &[0, 0, 0]);
    }

    #[test]
    fn copy_from_slice_truncates() {
        let mut buf = PixelBuffer::new(3);
        buf.copy_from_slice(&[1, 2, 3, 4, 5]);
        assert_eq!(buf.as_slice(), &[1, 2, 3]);

        buf.copy_from_slice(&[9]);
        assert_eq!(buf.as_slice(), &[9, 2, 3]);
    }

    #[test]
    fn ranges_clamp_to_buffer() {
        let mut buf = PixelBuffer::new(4);
        buf.set_range(2, &[color(1, 0, 0), color(2, 0, 0), color(3, 0, 0)]);
        assert_eq!(buf.get_range(1..10), vec![Color::BLACK, color(1, 0, 0), color(2, 0, 0)]);
        assert_eq!(buf.get_range(6..8), Vec::<Color>::new());
    }
}
