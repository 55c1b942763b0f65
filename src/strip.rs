//! High-level strip handle.
//!
//! `Strip` owns the backend, one pixel buffer per PWM channel, and the
//! per-channel settings. Creating one runs the native `init`; dropping it
//! runs `fini`. Everything in between is buffer edits plus `show()`.

use crate::backend::Backend;
use crate::color::Color;
use crate::config::{ChannelConfig, PWM_CHANNELS, StripConfig};
use crate::error::Ws281xError;
use crate::pixels::PixelBuffer;

// ── Channel ────────────────────────────────────────────────────────

/// One PWM channel: its settings and its LED buffer.
#[derive(Clone, Debug)]
pub struct Channel {
    config: ChannelConfig,
    pixels: PixelBuffer,
}

impl Channel {
    fn new(config: ChannelConfig) -> Self {
        Self {
            pixels: PixelBuffer::new(config.count),
            config,
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn brightness(&self) -> u8 {
        self.config.brightness
    }
}

// ── Drawing surface ────────────────────────────────────────────────

/// Anything an animation can draw on: a strip's active channel or a view
/// onto one specific channel.
pub trait Leds {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn set(&mut self, index: usize, color: Color);

    fn fill(&mut self, color: Color) {
        for i in 0..self.len() {
            self.set(i, color);
        }
    }

    /// Push the buffer to the LEDs.
    fn show(&mut self) -> Result<(), Ws281xError>;
}

// ── Strip ──────────────────────────────────────────────────────────

pub struct Strip<B: Backend> {
    backend: B,
    freq: u32,
    dma: u8,
    channels: [Channel; PWM_CHANNELS],
    active: usize,
}

impl<B: Backend> Strip<B> {
    /// Validate `config`, then run the backend's `init`.
    ///
    /// # Rust concept: Result and the ? operator
    /// Initialization can fail (not root, unsupported board, GPIO busy).
    /// The native status code comes back as `Ws281xError::Native` and the
    /// caller decides what to do with it.
    pub fn new(config: StripConfig, mut backend: B) -> Result<Self, Ws281xError> {
        config.validate()?;
        let active = config.first_used_channel().ok_or(Ws281xError::NoChannels)?;

        backend.init(&config)?;

        tracing::info!(
            "Strip ready: {} LEDs on GPIO {} ({}), {} Hz, DMA {}",
            config.channels[active].count,
            config.channels[active].gpio,
            config.channels[active].strip_type,
            config.freq,
            config.dma
        );

        Ok(Self {
            backend,
            freq: config.freq,
            dma: config.dma,
            channels: config.channels.map(Channel::new),
            active,
        })
    }

    /// Route the single-strip methods (`set_pixel_color` and friends) to
    /// another configured channel. On error the active channel is unchanged.
    pub fn set_active_channel(&mut self, index: usize) -> Result<(), Ws281xError> {
        match self.channels.get(index) {
            Some(ch) if ch.config.is_used() => {
                self.active = index;
                Ok(())
            }
            _ => Err(Ws281xError::InvalidChannel(index)),
        }
    }

    pub fn active_channel(&self) -> usize {
        self.active
    }

    /// The configuration this strip was created with, brightness included.
    pub fn config(&self) -> StripConfig {
        StripConfig {
            freq: self.freq,
            dma: self.dma,
            channels: [self.channels[0].config, self.channels[1].config],
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn num_pixels(&self) -> usize {
        self.channels[self.active].pixels.len()
    }

    pub fn set_pixel_color(&mut self, n: usize, color: Color) {
        self.channels[self.active].pixels.set(n, color);
    }

    pub fn set_pixel_color_rgb(&mut self, n: usize, r: u8, g: u8, b: u8) {
        self.set_pixel_color(n, Color::new(r, g, b));
    }

    pub fn set_pixel_color_packed(&mut self, n: usize, value: u32) {
        self.channels[self.active].pixels.set_packed(n, value);
    }

    pub fn get_pixel_color(&self, n: usize) -> Option<Color> {
        self.channels[self.active].pixels.get(n)
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.channels[self.active].pixels
    }

    pub fn pixels_mut(&mut self) -> &mut PixelBuffer {
        &mut self.channels[self.active].pixels
    }

    /// Brightness (0-255) the driver applies at render time. Unlike
    /// rescaling the buffer this is lossless: the stored colors keep full
    /// precision and only the transmitted bytes are dimmed.
    pub fn set_brightness(&mut self, brightness: u8) {
        self.channels[self.active].config.brightness = brightness;
    }

    pub fn brightness(&self) -> u8 {
        self.channels[self.active].config.brightness
    }

    /// Black out the active channel's buffer. Takes effect on the next `show`.
    pub fn clear(&mut self) {
        self.channels[self.active].pixels.clear();
    }

    /// Render every channel.
    pub fn show(&mut self) -> Result<(), Ws281xError> {
        self.backend.render(&self.channels)
    }

    /// Wait for the previous render's DMA transfer to finish.
    pub fn wait(&mut self) -> Result<(), Ws281xError> {
        self.backend.wait()
    }

    pub fn channel(&self, index: usize) -> Result<&Channel, Ws281xError> {
        self.channels
            .get(index)
            .ok_or(Ws281xError::InvalidChannel(index))
    }

    /// Mutable access to one channel for multi-strand setups.
    pub fn channel_mut(&mut self, index: usize) -> Result<ChannelView<'_, B>, Ws281xError> {
        if index >= PWM_CHANNELS {
            return Err(Ws281xError::InvalidChannel(index));
        }
        Ok(ChannelView { strip: self, index })
    }
}

impl<B: Backend> Drop for Strip<B> {
    fn drop(&mut self) {
        tracing::debug!("Releasing strip");
        self.backend.fini();
    }
}

impl<B: Backend> Leds for Strip<B> {
    fn len(&self) -> usize {
        self.num_pixels()
    }

    fn set(&mut self, index: usize, color: Color) {
        self.set_pixel_color(index, color);
    }

    fn fill(&mut self, color: Color) {
        self.pixels_mut().fill(color);
    }

    fn show(&mut self) -> Result<(), Ws281xError> {
        Strip::show(self)
    }
}

// ── Channel view ───────────────────────────────────────────────────

/// A borrowed handle on one channel of a [`Strip`].
///
/// `show()` renders the whole strip; the native driver always sends both
/// channels in one pass.
pub struct ChannelView<'a, B: Backend> {
    strip: &'a mut Strip<B>,
    index: usize,
}

impl<B: Backend> ChannelView<'_, B> {
    pub fn pixels(&self) -> &PixelBuffer {
        &self.strip.channels[self.index].pixels
    }

    pub fn pixels_mut(&mut self) -> &mut PixelBuffer {
        &mut self.strip.channels[self.index].pixels
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.strip.channels[self.index].config.brightness = brightness;
    }

    pub fn brightness(&self) -> u8 {
        self.strip.channels[self.index].config.brightness
    }
}

impl<B: Backend> Leds for ChannelView<'_, B> {
    fn len(&self) -> usize {
        self.pixels().len()
    }

    fn set(&mut self, index: usize, color: Color) {
        self.pixels_mut().set(index, color);
    }

    fn fill(&mut self, color: Color) {
        self.pixels_mut().fill(color);
    }

    fn show(&mut self) -> Result<(), Ws281xError> {
        self.strip.show()
    }
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::color;
    use crate::error::{NativeCode, NativeOp};
    use crate::sim::SimulatedBackend;
    use crate::strip_type::StripType;
    use pretty_assertions::assert_eq;

    fn strip(count: usize) -> (Strip<SimulatedBackend>, SimulatedBackend) {
        let sim = SimulatedBackend::new();
        let strip = Strip::new(StripConfig::single(count, 18), sim.clone()).unwrap();
        (strip, sim)
    }

    // ── Single-channel tests ───────────────────────────────────────

    #[test]
    fn new_strip_is_black() {
        let (strip, _) = strip(8);
        assert_eq!(strip.num_pixels(), 8);
        assert!(strip.pixels().iter().all(|c| c == Color::BLACK));
    }

    #[test]
    fn invalid_config_never_reaches_backend() {
        let sim = SimulatedBackend::new();
        let result = Strip::new(StripConfig::single(8, 13), sim.clone());
        assert!(matches!(result, Err(Ws281xError::InvalidGpio { .. })));
        assert_eq!(sim.config(), None);
        assert_eq!(sim.fini_count(), 0);
    }

    #[test]
    fn pixel_accessors() {
        let (mut strip, _) = strip(4);
        strip.set_pixel_color(0, color(1, 2, 3));
        strip.set_pixel_color_rgb(1, 4, 5, 6);
        strip.set_pixel_color_packed(2, 0x0007_0809);
        strip.set_pixel_color(99, color(9, 9, 9));

        assert_eq!(strip.get_pixel_color(0), Some(color(1, 2, 3)));
        assert_eq!(strip.get_pixel_color(1), Some(color(4, 5, 6)));
        assert_eq!(strip.get_pixel_color(2), Some(color(7, 8, 9)));
        assert_eq!(strip.get_pixel_color(4), None);
    }

    #[test]
    fn show_renders_current_buffer() {
        let (mut strip, sim) = strip(2);
        strip.set_pixel_color(1, color(0, 0, 255));
        strip.show().unwrap();
        strip.clear();
        strip.show().unwrap();

        let frames = sim.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].leds[0], vec![0, 0xff]);
        assert_eq!(frames[1].leds[0], vec![0, 0]);
    }

    #[test]
    fn brightness_dims_wire_not_buffer() {
        let (mut strip, sim) = strip(1);
        strip.set_pixel_color(0, color(200, 100, 50));
        strip.set_brightness(127);
        strip.show().unwrap();

        assert_eq!(strip.brightness(), 127);
        assert_eq!(strip.get_pixel_color(0), Some(color(200, 100, 50)));
        assert_eq!(sim.last_frame().unwrap().wire[0], vec![100, 50, 25]);
    }

    #[test]
    fn render_failure_is_reported() {
        let (mut strip, sim) = strip(1);
        sim.fail_render_with(-1);
        let err = strip.show().unwrap_err();
        assert!(matches!(
            err,
            Ws281xError::Native {
                op: NativeOp::Render,
                code: NativeCode::Dma
            }
        ));
        assert_eq!(sim.frame_count(), 0);
    }

    #[test]
    fn drop_runs_fini_once() {
        let (strip, sim) = strip(1);
        drop(strip);
        assert_eq!(sim.fini_count(), 1);
    }

    #[test]
    fn wait_reaches_backend() {
        let (mut strip, sim) = strip(1);
        strip.wait().unwrap();
        assert_eq!(sim.wait_count(), 1);
    }

    // ── Multi-channel tests ────────────────────────────────────────

    #[test]
    fn two_channels_render_together() {
        let sim = SimulatedBackend::new();
        let mut second = ChannelConfig::new(2, 13);
        second.strip_type = StripType::Grbw;
        let config = StripConfig::single(3, 18).with_channel(1, second).unwrap();
        let mut strip = Strip::new(config, sim.clone()).unwrap();

        strip.set_pixel_color(0, color(1, 1, 1));
        {
            let mut ch1 = strip.channel_mut(1).unwrap();
            ch1.set(1, Color::rgbw(0, 0, 0, 255));
            ch1.show().unwrap();
        }

        let frame = sim.last_frame().unwrap();
        assert_eq!(frame.leds[0], vec![0x0001_0101, 0, 0]);
        assert_eq!(frame.leds[1], vec![0, 0xff00_0000]);
        assert_eq!(frame.wire[1], vec![0, 0, 0, 0, 0, 0, 0, 255]);
    }

    #[test]
    fn active_channel_must_be_configured() {
        let (mut strip, sim) = strip(4);
        assert!(matches!(
            strip.set_active_channel(1),
            Err(Ws281xError::InvalidChannel(1))
        ));
        // the strip is still up and still drawing on channel 0
        assert_eq!(sim.fini_count(), 0);
        assert_eq!(strip.active_channel(), 0);
        strip.set_pixel_color(0, color(1, 2, 3));
        strip.show().unwrap();
        assert_eq!(sim.last_frame().unwrap().leds[0][0], 0x0001_0203);
    }

    #[test]
    fn active_channel_routes_pixel_writes() {
        let sim = SimulatedBackend::new();
        let config = StripConfig::single(2, 18)
            .with_channel(1, ChannelConfig::new(3, 13))
            .unwrap();
        let mut strip = Strip::new(config, sim.clone()).unwrap();

        strip.set_active_channel(1).unwrap();
        assert_eq!(strip.active_channel(), 1);
        assert_eq!(strip.num_pixels(), 3);

        strip.set_pixel_color(2, color(9, 8, 7));
        strip.set_brightness(127);
        strip.show().unwrap();

        let frame = sim.last_frame().unwrap();
        assert_eq!(frame.leds[0], vec![0, 0]);
        assert_eq!(frame.leds[1], vec![0, 0, 0x0009_0807]);
        assert_eq!(strip.channel(0).unwrap().brightness(), 255);
        assert_eq!(strip.channel(1).unwrap().brightness(), 127);
    }

    #[test]
    fn channel_view_brightness_dims_only_that_channel() {
        let sim = SimulatedBackend::new();
        let config = StripConfig::single(1, 18)
            .with_channel(1, ChannelConfig::new(1, 13))
            .unwrap()
            .with_strip_type(StripType::Rgb);
        let mut strip = Strip::new(config, sim.clone()).unwrap();

        strip.set_pixel_color(0, color(200, 200, 200));
        {
            let mut ch1 = strip.channel_mut(1).unwrap();
            ch1.set(0, color(200, 200, 200));
            ch1.set_brightness(127);
            assert_eq!(ch1.brightness(), 127);
            ch1.show().unwrap();
        }

        let frame = sim.last_frame().unwrap();
        assert_eq!(frame.wire[0], vec![200, 200, 200]);
        assert_eq!(frame.wire[1], vec![100, 100, 100]);
        // the buffer keeps full precision
        assert_eq!(frame.leds[1], vec![0x00c8_c8c8]);
    }

    #[test]
    fn wait_failure_names_the_call() {
        let (mut strip, sim) = strip(1);
        sim.fail_wait_with(-1);
        let err = strip.wait().unwrap_err();
        assert!(matches!(
            err,
            Ws281xError::Native {
                op: NativeOp::Wait,
                code: NativeCode::Dma
            }
        ));
        assert_eq!(err.to_string(), "ws2811_wait failed: DMA error (code -1)");
    }

    #[test]
    fn channel_index_is_checked() {
        let (mut strip, _) = strip(4);
        assert!(strip.channel(2).is_err());
        assert!(strip.channel_mut(2).is_err());
        assert_eq!(strip.channel(0).unwrap().pixels().len(), 4);
    }

    #[test]
    fn config_reflects_brightness_changes() {
        let (mut strip, _) = strip(4);
        strip.set_brightness(10);
        assert_eq!(strip.config().channels[0].brightness, 10);
    }
}
