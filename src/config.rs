//! Hardware configuration for the two PWM channels.
//!
//! Mirrors the fields the native `ws2811_t` / `ws2811_channel_t` structs
//! expose, minus the pointers the driver owns. Configs can come from CLI
//! flags or a JSON file; anything missing falls back to the defaults below.

use crate::error::Ws281xError;
use crate::strip_type::StripType;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of PWM channels the native driver exposes.
pub const PWM_CHANNELS: usize = 2;

/// Default signal frequency. WS2811 parts can go as low as 400 kHz.
pub const TARGET_FREQ: u32 = 800_000;
pub const MIN_FREQ: u32 = 400_000;

pub const DEFAULT_DMA: u8 = 10;
pub const MAX_DMA: u8 = 14;

/// Upper bound on LEDs per channel. At 800 kHz a frame this long already
/// takes about two seconds to clock out.
pub const MAX_LED_COUNT: usize = 65_536;

/// PWM-capable pins per channel. 0 means "unused".
pub const CHANNEL_GPIOS: [[u8; 5]; PWM_CHANNELS] = [[0, 12, 18, 40, 52], [0, 13, 19, 41, 53]];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// GPIO pin with the PWM alternate function, 0 if unused
    pub gpio: u8,
    /// Invert the output (NPN transistor level shifters)
    pub invert: bool,
    /// Number of LEDs, 0 if the channel is unused
    pub count: usize,
    /// Brightness applied at render time (0-255)
    pub brightness: u8,
    pub strip_type: StripType,
}

impl ChannelConfig {
    pub fn new(count: usize, gpio: u8) -> Self {
        Self {
            count,
            gpio,
            ..Self::default()
        }
    }

    pub fn is_used(&self) -> bool {
        self.count > 0
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            gpio: 0,
            invert: false,
            count: 0,
            brightness: 255,
            strip_type: StripType::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// Output frequency in Hz
    pub freq: u32,
    /// DMA channel not already in use
    pub dma: u8,
    /// Up to two entries in a config file; missing ones are unused channels.
    #[serde(deserialize_with = "channels_from_list")]
    pub channels: [ChannelConfig; PWM_CHANNELS],
}

fn channels_from_list<'de, D>(deserializer: D) -> Result<[ChannelConfig; PWM_CHANNELS], D::Error>
where
    D: Deserializer<'de>,
{
    let list = Vec::<ChannelConfig>::deserialize(deserializer)?;
    if list.len() > PWM_CHANNELS {
        return Err(de::Error::invalid_length(list.len(), &"at most 2 channels"));
    }

    let mut channels = [ChannelConfig::default(); PWM_CHANNELS];
    for (slot, ch) in channels.iter_mut().zip(list) {
        *slot = ch;
    }
    Ok(channels)
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            freq: TARGET_FREQ,
            dma: DEFAULT_DMA,
            channels: [ChannelConfig::default(); PWM_CHANNELS],
        }
    }
}

impl StripConfig {
    /// One strip on channel 0, everything else at defaults.
    pub fn single(count: usize, gpio: u8) -> Self {
        let mut config = Self::default();
        config.channels[0] = ChannelConfig::new(count, gpio);
        config
    }

    pub fn with_freq(mut self, freq: u32) -> Self {
        self.freq = freq;
        self
    }

    pub fn with_dma(mut self, dma: u8) -> Self {
        self.dma = dma;
        self
    }

    /// Replace one channel wholesale.
    pub fn with_channel(
        mut self,
        index: usize,
        channel: ChannelConfig,
    ) -> Result<Self, Ws281xError> {
        let slot = self
            .channels
            .get_mut(index)
            .ok_or(Ws281xError::InvalidChannel(index))?;
        *slot = channel;
        Ok(self)
    }

    pub fn with_brightness(mut self, brightness: u8) -> Self {
        for ch in self.channels.iter_mut() {
            ch.brightness = brightness;
        }
        self
    }

    pub fn with_strip_type(mut self, strip_type: StripType) -> Self {
        for ch in self.channels.iter_mut() {
            ch.strip_type = strip_type;
        }
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        for ch in self.channels.iter_mut() {
            ch.invert = invert;
        }
        self
    }

    /// Total LEDs across both channels.
    pub fn led_count(&self) -> usize {
        self.channels.iter().map(|c| c.count).sum()
    }

    /// Index of the first channel with LEDs.
    pub fn first_used_channel(&self) -> Option<usize> {
        self.channels.iter().position(ChannelConfig::is_used)
    }

    /// Reject settings the driver would fail on (or silently misbehave with).
    pub fn validate(&self) -> Result<(), Ws281xError> {
        if !(MIN_FREQ..=TARGET_FREQ).contains(&self.freq) {
            return Err(Ws281xError::InvalidFrequency(self.freq));
        }
        if self.dma > MAX_DMA {
            return Err(Ws281xError::InvalidDma(self.dma));
        }

        for (index, ch) in self.channels.iter().enumerate() {
            if ch.count > MAX_LED_COUNT {
                return Err(Ws281xError::InvalidCount {
                    channel: index,
                    count: ch.count,
                });
            }

            let allowed = &CHANNEL_GPIOS[index];
            let pin_ok = allowed.contains(&ch.gpio) && !(ch.is_used() && ch.gpio == 0);
            if !pin_ok {
                return Err(Ws281xError::InvalidGpio {
                    channel: index,
                    pin: ch.gpio,
                });
            }
        }

        if self.first_used_channel().is_none() {
            return Err(Ws281xError::NoChannels);
        }

        Ok(())
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, Ws281xError> {
        let text = std::fs::read_to_string(path)?;
        let config: StripConfig = serde_json::from_str(&text)?;
        tracing::debug!("Loaded strip config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}

// ── Tests ──────────────────────────────────────────────────────────
