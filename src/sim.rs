//! In-memory backend that records what would have been sent to the strip.
//!
//! Cloning a [`SimulatedBackend`] shares the recording, so a test can hand
//! one clone to a `Strip` and keep the other to inspect frames afterwards,
//! even after the strip has been dropped.

use crate::backend::Backend;
use crate::config::{PWM_CHANNELS, StripConfig};
use crate::error::{NativeOp, Ws281xError, check};
use crate::strip::Channel;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Frames kept by default. Older ones are dropped so a long-running
/// simulated strip doesn't grow without bound.
pub const DEFAULT_FRAME_LIMIT: usize = 1024;

/// One rendered frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Buffer contents per channel at render time (`0xWWRRGGBB`).
    pub leds: [Vec<u32>; PWM_CHANNELS],
    /// Bytes per channel in wire order, brightness applied.
    pub wire: [Vec<u8>; PWM_CHANNELS],
}

#[derive(Debug)]
struct Recording {
    config: Option<StripConfig>,
    frames: VecDeque<Frame>,
    frame_limit: usize,
    rendered: usize,
    waits: usize,
    fini_calls: usize,
    fail_init: Option<i32>,
    fail_render: Option<i32>,
    fail_wait: Option<i32>,
}

impl Default for Recording {
    fn default() -> Self {
        Self {
            config: None,
            frames: VecDeque::new(),
            frame_limit: DEFAULT_FRAME_LIMIT,
            rendered: 0,
            waits: 0,
            fini_calls: 0,
            fail_init: None,
            fail_render: None,
            fail_wait: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SimulatedBackend {
    inner: Arc<Mutex<Recording>>,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the most recent `limit` frames (0 keeps none).
    pub fn with_frame_limit(self, limit: usize) -> Self {
        {
            let mut rec = self.lock();
            rec.frame_limit = limit;
            trim(&mut rec);
        }
        self
    }

    /// Make `init` return `code`, as the native library does when it can't
    /// reach the hardware.
    pub fn failing_init(code: i32) -> Self {
        let sim = Self::new();
        sim.lock().fail_init = Some(code);
        sim
    }

    /// Make every subsequent `render` return `code`.
    pub fn fail_render_with(&self, code: i32) {
        self.lock().fail_render = Some(code);
    }

    /// Make every subsequent `wait` return `code`.
    pub fn fail_wait_with(&self, code: i32) {
        self.lock().fail_wait = Some(code);
    }

    /// The retained frames, oldest first.
    pub fn frames(&self) -> Vec<Frame> {
        self.lock().frames.iter().cloned().collect()
    }

    /// Frames rendered since creation, including ones already dropped.
    pub fn frame_count(&self) -> usize {
        self.lock().rendered
    }

    pub fn last_frame(&self) -> Option<Frame> {
        self.lock().frames.back().cloned()
    }

    pub fn wait_count(&self) -> usize {
        self.lock().waits
    }

    pub fn fini_count(&self) -> usize {
        self.lock().fini_calls
    }

    /// Configuration seen by the last successful `init`.
    pub fn config(&self) -> Option<StripConfig> {
        self.lock().config
    }

    fn lock(&self) -> MutexGuard<'_, Recording> {
        // A poisoned recording only happens after a test already panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn trim(rec: &mut Recording) {
    while rec.frames.len() > rec.frame_limit {
        rec.frames.pop_front();
    }
}

fn encode_channel(channel: &Channel) -> Vec<u8> {
    let strip_type = channel.config().strip_type;
    let brightness = channel.config().brightness;
    let mut wire = Vec::with_capacity(channel.pixels().len() * strip_type.bytes_per_led());
    for &led in channel.pixels().as_slice() {
        let (bytes, len) = strip_type.encode(led, brightness);
        wire.extend_from_slice(&bytes[..len]);
    }
    wire
}

impl Backend for SimulatedBackend {
    fn init(&mut self, config: &StripConfig) -> Result<(), Ws281xError> {
        let mut rec = self.lock();
        check(NativeOp::Init, rec.fail_init.unwrap_or(0))?;
        rec.config = Some(*config);
        tracing::debug!(
            "Simulated strip initialized: {} LEDs @ {} Hz, DMA {}",
            config.led_count(),
            config.freq,
            config.dma
        );
        Ok(())
    }

    fn render(&mut self, channels: &[Channel]) -> Result<(), Ws281xError> {
        let mut rec = self.lock();
        check(NativeOp::Render, rec.fail_render.unwrap_or(0))?;

        let mut frame = Frame {
            leds: Default::default(),
            wire: Default::default(),
        };
        for (i, ch) in channels.iter().take(PWM_CHANNELS).enumerate() {
            frame.leds[i] = ch.pixels().as_slice().to_vec();
            frame.wire[i] = encode_channel(ch);
        }

        tracing::trace!("Frame {}: {:02x?}", rec.rendered, frame.wire);
        rec.rendered += 1;
        rec.frames.push_back(frame);
        trim(&mut rec);
        Ok(())
    }

    fn wait(&mut self) -> Result<(), Ws281xError> {
        let mut rec = self.lock();
        check(NativeOp::Wait, rec.fail_wait.unwrap_or(0))?;
        rec.waits += 1;
        Ok(())
    }

    fn fini(&mut self) {
        self.lock().fini_calls += 1;
    }
}

// ── Tests ──────────────────────────────────────────────────────────
