//! Ring clock for a 12-LED strip laid out in a circle.
//!
//! Red is the second hand, smeared across its neighbours as it moves
//! through each five-second slot. Blue marks minutes (in fives), green
//! marks the hour.

use crate::color::Color;
use chrono::Timelike;

const HAND: u8 = 200;

/// Colors for each LED of an `n`-LED ring at `time`.
pub fn clock_frame(time: &impl Timelike, n: usize) -> Vec<Color> {
    if n == 0 {
        return Vec::new();
    }

    let last = n - 1;
    let hour = (time.hour() % 12) as usize;
    let minute = (time.minute() / 5) as usize;
    let second = (time.second() / 5) as usize;
    // nanosecond() exceeds 1e9 during a leap second
    let micros = (time.nanosecond() / 1_000).min(999_999) as f64;
    let slot_us = (time.second() % 5) as f64 * 1_000_000.0 + micros;

    let next = if second < last { second + 1 } else { 0 };
    let prev = if second > 0 { second - 1 } else { last };

    (0..n)
        .map(|i| {
            let mut red: i64 = 0;
            let mut green = 0;
            let mut blue = 0;

            if i == second {
                red = if slot_us < 2_500_000.0 {
                    (0.0000508 * slot_us) as i64 + 126
                } else {
                    382 - (0.0000508 * slot_us) as i64
                };
            }
            if i == next {
                red = (0.0000256 * slot_us) as i64;
            }
            if i == prev {
                red = 128 - (0.0000256 * slot_us) as i64;
            }
            if i == minute {
                blue = HAND;
            }
            if i == hour {
                green = HAND;
            }

            Color::new(red.clamp(0, 255) as u8, green, blue)
        })
        .collect()
}

/// Dim the ring outside 09:00-18:59.
pub fn clock_brightness(hour: u32) -> u8 {
    if (9..19).contains(&hour) { 200 } else { 25 }
}
