//! 2D addressing for strips wired up as a matrix.
//!
//! A [`MatrixMap`] holds, for every `(x, y)` cell, the strip index of the
//! LED sitting there. Panels are wired either row by row in the same
//! direction (`Normal`) or snaking back on every other row (`Zigzag`);
//! the map can then be mirrored or rotated to match how the panel is
//! mounted.

use crate::color::Color;
use crate::error::Ws281xError;
use crate::strip::Leds;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How consecutive rows are chained together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Every row runs left to right.
    #[default]
    Normal,
    /// Odd rows run right to left.
    Zigzag,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatrixMap {
    width: usize,
    height: usize,
    map: Vec<usize>,
}

impl MatrixMap {
    pub fn new(width: usize, height: usize, layout: Layout) -> Self {
        let map = (0..height)
            .flat_map(|y| {
                (0..width).map(move |x| match layout {
                    Layout::Zigzag if y % 2 == 1 => width * y + (width - 1 - x),
                    _ => width * y + x,
                })
            })
            .collect();
        Self { width, height, map }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (and LEDs) covered.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Strip index of the LED at `(x, y)`, or `None` off the edge.
    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.map.get(self.cell(x, y)).copied()
    }

    /// Flip left to right.
    pub fn mirror_x(&mut self) {
        let mut map = vec![0; self.map.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                map[self.cell(self.width - x - 1, y)] = self.map[self.cell(x, y)];
            }
        }
        self.map = map;
    }

    /// Rotate 90 degrees clockwise. Only square matrices can rotate in place.
    pub fn rotate_90(&mut self) -> Result<(), Ws281xError> {
        if self.width != self.height {
            return Err(Ws281xError::MatrixNotSquare {
                width: self.width,
                height: self.height,
            });
        }

        let mut map = vec![0; self.map.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                map[self.cell(self.width - y - 1, x)] = self.map[self.cell(x, y)];
            }
        }
        self.map = map;
        Ok(())
    }

    /// Copy a row-major `width * height` frame onto the strip.
    ///
    /// Cells beyond the end of `frame` are left alone.
    pub fn draw(&self, leds: &mut impl Leds, frame: &[Color]) {
        for (cell, &color) in frame.iter().enumerate().take(self.map.len()) {
            leds.set(self.map[cell], color);
        }
    }

    fn cell(&self, x: usize, y: usize) -> usize {
        self.width * y + x
    }
}

/// Colored dots marching along the bottom row while earlier rows scroll
/// up, one row per step.
#[derive(Clone, Debug)]
pub struct RisingDots {
    width: usize,
    height: usize,
    grid: Vec<Color>,
    dots: Vec<(usize, Color)>,
}

impl RisingDots {
    pub fn new(width: usize, height: usize, colors: &[Color]) -> Self {
        let dots = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| (i % width.max(1), c))
            .collect();
        Self {
            width,
            height,
            grid: vec![Color::BLACK; width * height],
            dots,
        }
    }

    /// Shift every row up by one, then advance the dots on the bottom row.
    pub fn step(&mut self) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let w = self.width;
        self.grid.copy_within(w.., 0);

        let bottom = (self.height - 1) * w;
        for (pos, color) in self.dots.iter_mut() {
            *pos = (*pos + 1) % w;
            self.grid[bottom + *pos] = *color;
        }
    }

    /// Row-major frame, ready for [`MatrixMap::draw`].
    pub fn frame(&self) -> &[Color] {
        &self.grid
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::color;
    use crate::config::StripConfig;
    use crate::sim::SimulatedBackend;
    use crate::strip::Strip;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn rows(map: &MatrixMap) -> Vec<Vec<usize>> {
        (0..map.height())
            .map(|y| (0..map.width()).map(|x| map.index(x, y).unwrap()).collect())
            .collect()
    }

    // ── Layouts ────────────────────────────────────────────────────

    #[rstest]
    #[case(0, 0, 0)]
    #[case(3, 0, 3)]
    #[case(0, 1, 4)]
    #[case(3, 2, 11)]
    fn normal_layout_is_row_major(#[case] x: usize, #[case] y: usize, #[case] expected: usize) {
        let map = MatrixMap::new(4, 3, Layout::Normal);
        assert_eq!(map.index(x, y), Some(expected));
    }

    #[rstest]
    #[case(0, 0, 0)]
    #[case(3, 0, 3)]
    // odd rows: (width * y - 1) + (width - x)
    #[case(0, 1, 7)]
    #[case(3, 1, 4)]
    #[case(1, 2, 9)]
    fn zigzag_reverses_odd_rows(#[case] x: usize, #[case] y: usize, #[case] expected: usize) {
        let map = MatrixMap::new(4, 3, Layout::Zigzag);
        assert_eq!(map.index(x, y), Some(expected));
    }

    #[rstest]
    #[case(4, 0)]
    #[case(0, 3)]
    #[case(9, 9)]
    fn off_the_edge_is_none(#[case] x: usize, #[case] y: usize) {
        let map = MatrixMap::new(4, 3, Layout::Normal);
        assert_eq!(map.index(x, y), None);
    }

    // ── Transforms ─────────────────────────────────────────────────

    #[test]
    fn mirror_flips_each_row() {
        let mut map = MatrixMap::new(3, 2, Layout::Zigzag);
        map.mirror_x();
        assert_eq!(rows(&map), vec![vec![2, 1, 0], vec![3, 4, 5]]);
    }

    #[test]
    fn rotate_turns_clockwise() {
        let mut map = MatrixMap::new(3, 3, Layout::Normal);
        map.rotate_90().unwrap();
        assert_eq!(
            rows(&map),
            vec![vec![6, 3, 0], vec![7, 4, 1], vec![8, 5, 2]]
        );
    }

    #[test]
    fn four_rotations_are_identity() {
        let original = MatrixMap::new(4, 4, Layout::Zigzag);
        let mut map = original.clone();
        for _ in 0..4 {
            map.rotate_90().unwrap();
        }
        assert_eq!(map, original);
    }

    #[test]
    fn rotate_needs_a_square() {
        let mut map = MatrixMap::new(4, 3, Layout::Normal);
        assert!(matches!(
            map.rotate_90(),
            Err(Ws281xError::MatrixNotSquare { width: 4, height: 3 })
        ));
        assert_eq!(map, MatrixMap::new(4, 3, Layout::Normal));
    }

    // ── Drawing ────────────────────────────────────────────────────

    #[test]
    fn draw_places_cells_through_the_map() {
        let sim = SimulatedBackend::new();
        let mut strip = Strip::new(StripConfig::single(4, 18), sim.clone()).unwrap();
        let map = MatrixMap::new(2, 2, Layout::Zigzag);

        let frame = [color(1, 0, 0), color(2, 0, 0), color(3, 0, 0), color(4, 0, 0)];
        map.draw(&mut strip, &frame);
        strip.show().unwrap();

        // second row is wired backwards
        assert_eq!(
            sim.last_frame().unwrap().leds[0],
            vec![0x01_0000, 0x02_0000, 0x04_0000, 0x03_0000]
        );
    }

    #[test]
    fn dots_march_and_rise() {
        let red = color(0x20, 0, 0);
        let blue = color(0, 0, 0x20);
        let mut dots = RisingDots::new(3, 2, &[red, blue]);

        dots.step();
        assert_eq!(
            dots.frame(),
            &[Color::BLACK, Color::BLACK, Color::BLACK, Color::BLACK, red, blue]
        );

        // the bottom row isn't cleared; cells no dot reaches keep their color
        dots.step();
        assert_eq!(dots.frame(), &[Color::BLACK, red, blue, blue, red, red]);
    }

    #[test]
    fn empty_dots_do_nothing() {
        let mut dots = RisingDots::new(0, 0, &[color(1, 1, 1)]);
        dots.step();
        assert!(dots.frame().is_empty());
    }
}
