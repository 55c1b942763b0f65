//! Rust binding for `libws2811`, the userspace WS281x/SK6812 driver for
//! Raspberry Pi, plus the strand-test animations built on it.
//!
//! This module provides what the binary and demos share:
//! - Strip creation with the right backend for the build
//! - Signal handling for clean shutdown
//! - Re-exports of the color, config, and strip types
//!
//! The native binding only compiles with the `hardware` feature. Without
//! it every strip runs on [`sim::SimulatedBackend`], which is also what
//! the tests use.

pub mod animations;
pub mod backend;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod matrix;
#[cfg(feature = "hardware")]
pub mod native;
pub mod pixels;
pub mod sim;
pub mod strip;
pub mod strip_type;

pub use backend::Backend;
pub use color::{Color, color, color_rgbw, wheel};
pub use config::{ChannelConfig, PWM_CHANNELS, StripConfig};
pub use error::{NativeCode, NativeOp, Ws281xError};
pub use matrix::{Layout, MatrixMap};
pub use pixels::PixelBuffer;
pub use strip::{Channel, ChannelView, Leds, Strip};
pub use strip_type::StripType;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ── Strip initialization ───────────────────────────────────────────

/// The backend `create_strip` uses for this build.
#[cfg(feature = "hardware")]
pub type DefaultBackend = native::NativeBackend;
#[cfg(not(feature = "hardware"))]
pub type DefaultBackend = sim::SimulatedBackend;

/// Initialize a strip on real hardware, or on the simulator when built
/// without the `hardware` feature.
///
/// # Rust concept: Result and the ? operator
/// This returns `Result` because initialization can fail (e.g., not
/// running as root, or DMA channel already taken). The caller uses `?`
/// to propagate errors upward.
pub fn create_strip(config: StripConfig) -> Result<Strip<DefaultBackend>, Ws281xError> {
    if cfg!(not(feature = "hardware")) {
        tracing::warn!("Built without the 'hardware' feature; rendering to the simulator");
    }

    Strip::new(config, DefaultBackend::default())
}

// ── Shutdown ───────────────────────────────────────────────────────

/// Set up a Ctrl+C handler that sets `running` to false.
///
/// # Rust concept: Arc and AtomicBool
/// We need to share the `running` flag between the main loop and the
/// signal handler. `Arc` (Atomic Reference Counting) lets multiple owners
/// share data. `AtomicBool` is a thread-safe boolean, so no mutex is needed
/// for a single bool.
pub fn setup_signal_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────
