//! Strip color layouts.
//!
//! Each layout is the native `strip_type` word: four bytes holding the bit
//! shift (into the `0xWWRRGGBB` LED word) of the component sent in each wire
//! slot. For GRB parts the first slot reads bits 8..16, so green goes out
//! first even though the buffer stores red in the high byte.

use crate::color::scale_component;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mask over the white-shift byte; any set bit means a 4-color strip.
pub const SK6812_SHIFT_WMASK: u32 = 0xf000_0000;

/// Output gamma table the driver looks every slot up in after brightness
/// scaling. The stock `gamma.h` ships the identity curve.
pub const GAMMA: [u8; 256] = identity_gamma();

const fn identity_gamma() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8;
        i += 1;
    }
    table
}

/// Names go through [`FromStr`] when deserializing, so config files accept
/// the same case-insensitive spellings and aliases as the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum StripType {
    #[default]
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    Bgr,
    Rgbw,
    Rbgw,
    Grbw,
    Gbrw,
    Brgw,
    Bgrw,
}

/// Bit shifts of each wire slot, in transmission order (first, second,
/// third, and the optional white slot).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shifts {
    pub r: u32,
    pub g: u32,
    pub b: u32,
    pub w: u32,
}

impl StripType {
    pub const WS2812: StripType = StripType::Grb;
    pub const SK6812: StripType = StripType::Grb;
    pub const SK6812W: StripType = StripType::Grbw;

    pub const ALL: [StripType; 12] = [
        StripType::Rgb,
        StripType::Rbg,
        StripType::Grb,
        StripType::Gbr,
        StripType::Brg,
        StripType::Bgr,
        StripType::Rgbw,
        StripType::Rbgw,
        StripType::Grbw,
        StripType::Gbrw,
        StripType::Brgw,
        StripType::Bgrw,
    ];

    /// The native `WS2811_STRIP_*` / `SK6812_STRIP_*` constant.
    pub const fn raw(self) -> u32 {
        match self {
            StripType::Rgb => 0x0010_0800,
            StripType::Rbg => 0x0010_0008,
            StripType::Grb => 0x0008_1000,
            StripType::Gbr => 0x0008_0010,
            StripType::Brg => 0x0000_1008,
            StripType::Bgr => 0x0000_0810,
            StripType::Rgbw => 0x1810_0800,
            StripType::Rbgw => 0x1810_0008,
            StripType::Grbw => 0x1808_1000,
            StripType::Gbrw => 0x1808_0010,
            StripType::Brgw => 0x1800_1008,
            StripType::Bgrw => 0x1800_0810,
        }
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.raw() == raw)
    }

    pub const fn shifts(self) -> Shifts {
        let raw = self.raw();
        Shifts {
            w: (raw >> 24) & 0xff,
            r: (raw >> 16) & 0xff,
            g: (raw >> 8) & 0xff,
            b: raw & 0xff,
        }
    }

    pub const fn has_white(self) -> bool {
        self.raw() & SK6812_SHIFT_WMASK != 0
    }

    pub const fn bytes_per_led(self) -> usize {
        if self.has_white() { 4 } else { 3 }
    }

    /// Wire bytes for one LED word, brightness applied.
    ///
    /// Only the first [`bytes_per_led`](Self::bytes_per_led) entries are
    /// transmitted; the rest are left at zero.
    pub fn encode(self, led: u32, brightness: u8) -> ([u8; 4], usize) {
        let s = self.shifts();
        let slot = |shift: u32| {
            GAMMA[scale_component(((led >> shift) & 0xff) as u8, brightness) as usize]
        };
        let len = self.bytes_per_led();

        let mut out = [slot(s.r), slot(s.g), slot(s.b), 0];
        if len == 4 {
            out[3] = slot(s.w);
        }
        (out, len)
    }

    fn name(self) -> &'static str {
        match self {
            StripType::Rgb => "rgb",
            StripType::Rbg => "rbg",
            StripType::Grb => "grb",
            StripType::Gbr => "gbr",
            StripType::Brg => "brg",
            StripType::Bgr => "bgr",
            StripType::Rgbw => "rgbw",
            StripType::Rbgw => "rbgw",
            StripType::Grbw => "grbw",
            StripType::Gbrw => "gbrw",
            StripType::Brgw => "brgw",
            StripType::Bgrw => "bgrw",
        }
    }
}

impl fmt::Display for StripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StripType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "ws2812" | "sk6812" => return Ok(StripType::Grb),
            "sk6812w" => return Ok(StripType::Grbw),
            _ => {}
        }

        Self::ALL
            .into_iter()
            .find(|t| t.name() == lower)
            .ok_or_else(|| format!("unknown strip type '{s}'"))
    }
}

impl TryFrom<String> for StripType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
