//! FFI binding to `libws2811`.
//!
//! The struct layouts mirror `ws2811.h`. The driver allocates each
//! channel's `leds` array during `ws2811_init` and frees it in
//! `ws2811_fini`; we only ever copy into it.
//!
//! Only compiled with the `hardware` feature, since linking needs the
//! native library installed (see `build.rs`).

use crate::backend::Backend;
use crate::config::{PWM_CHANNELS, StripConfig};
use crate::error::{NativeOp, Ws281xError, check};
use crate::strip::Channel;
use std::ffi::{c_int, c_void};
use std::ptr;

#[repr(C)]
#[allow(non_camel_case_types)]
struct ws2811_channel_t {
    gpionum: c_int,
    invert: c_int,
    count: c_int,
    brightness: c_int,
    strip_type: c_int,
    leds: *mut u32,
}

#[repr(C)]
#[allow(non_camel_case_types)]
struct ws2811_t {
    device: *mut c_void,
    rpi_hw: *const c_void,
    freq: u32,
    dmanum: c_int,
    channel: [ws2811_channel_t; PWM_CHANNELS],
}

#[link(name = "ws2811")]
unsafe extern "C" {
    fn ws2811_init(ws2811: *mut ws2811_t) -> c_int;
    fn ws2811_fini(ws2811: *mut ws2811_t);
    fn ws2811_render(ws2811: *mut ws2811_t) -> c_int;
    fn ws2811_wait(ws2811: *mut ws2811_t) -> c_int;
}

impl ws2811_channel_t {
    const fn unused() -> Self {
        Self {
            gpionum: 0,
            invert: 0,
            count: 0,
            brightness: 0,
            strip_type: 0,
            leds: ptr::null_mut(),
        }
    }
}

/// Drives real hardware through `libws2811`. Needs root.
///
/// The native struct is boxed so its address stays put for the lifetime
/// of the driver's device state.
pub struct NativeBackend {
    raw: Box<ws2811_t>,
    initialized: bool,
}

impl NativeBackend {
    pub fn new() -> Self {
        Self {
            raw: Box::new(ws2811_t {
                device: ptr::null_mut(),
                rpi_hw: ptr::null(),
                freq: 0,
                dmanum: 0,
                channel: [ws2811_channel_t::unused(), ws2811_channel_t::unused()],
            }),
            initialized: false,
        }
    }
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for NativeBackend {
    fn init(&mut self, config: &StripConfig) -> Result<(), Ws281xError> {
        self.raw.freq = config.freq;
        self.raw.dmanum = config.dma as c_int;

        let channels = self.raw.channel.iter_mut().zip(config.channels.iter());
        for (index, (native, ch)) in channels.enumerate() {
            native.gpionum = ch.gpio as c_int;
            native.invert = ch.invert as c_int;
            native.count = c_int::try_from(ch.count).map_err(|_| Ws281xError::InvalidCount {
                channel: index,
                count: ch.count,
            })?;
            native.brightness = ch.brightness as c_int;
            native.strip_type = ch.strip_type.raw() as c_int;
            native.leds = ptr::null_mut();
        }

        // SAFETY: `raw` is a fully initialized ws2811_t that outlives the call.
        let code = unsafe { ws2811_init(&mut *self.raw) };
        check(NativeOp::Init, code)?;

        self.initialized = true;
        tracing::debug!("ws2811_init ok (freq {}, dma {})", config.freq, config.dma);
        Ok(())
    }

    fn render(&mut self, channels: &[Channel]) -> Result<(), Ws281xError> {
        for (native, ch) in self.raw.channel.iter_mut().zip(channels) {
            native.brightness = ch.brightness() as c_int;

            if native.leds.is_null() || native.count <= 0 {
                continue;
            }

            // SAFETY: ws2811_init allocated `count` LED words for this channel
            // and nothing else touches them until the next render/fini.
            let leds = unsafe { std::slice::from_raw_parts_mut(native.leds, native.count as usize) };
            let src = ch.pixels().as_slice();
            let n = leds.len().min(src.len());
            leds[..n].copy_from_slice(&src[..n]);
        }

        // SAFETY: called only after a successful init (Strip guarantees it).
        let code = unsafe { ws2811_render(&mut *self.raw) };
        check(NativeOp::Render, code)
    }

    fn wait(&mut self) -> Result<(), Ws281xError> {
        // SAFETY: as for render.
        let code = unsafe { ws2811_wait(&mut *self.raw) };
        check(NativeOp::Wait, code)
    }

    fn fini(&mut self) {
        if !self.initialized {
            return;
        }
        // SAFETY: init succeeded and fini has not run yet. The driver frees
        // the LED arrays, so drop our view of them too.
        unsafe { ws2811_fini(&mut *self.raw) };
        for ch in self.raw.channel.iter_mut() {
            ch.leds = ptr::null_mut();
        }
        self.initialized = false;
        tracing::debug!("ws2811_fini done");
    }
}

impl Drop for NativeBackend {
    fn drop(&mut self) {
        self.fini();
    }
}
