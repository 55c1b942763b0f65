//! # Low-level Buffer Example
//!
//! Animates eight dim colors marching along the strip by writing packed
//! `0xRRGGBB` words straight into the channel buffer, no color helpers.
//!
//! ## Run it
//! ```sh
//! cargo build --release --features hardware --example lowlevel
//! sudo ./target/release/examples/lowlevel
//! ```
//!
//! ## Rust concepts introduced
//! - `const` arrays
//! - Wrapping arithmetic for a counter that may overflow
//! - `?` in `main` with `Box<dyn Error>`

use std::thread;
use std::time::Duration;
use ws281x_rs::{StripConfig, create_strip, is_running, setup_signal_handler};

const LED_COUNT: usize = 16;
const LED_GPIO: u8 = 18;
const LED_DMA: u8 = 5;

const DOT_COLORS: [u32; 8] = [
    0x200000, // red
    0x201000, // orange
    0x202000, // yellow
    0x002000, // green
    0x002020, // lightblue
    0x000020, // blue
    0x100010, // purple
    0x200010, // pink
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().compact().init();

    let config = StripConfig::single(LED_COUNT, LED_GPIO).with_dma(LED_DMA);
    let mut strip = create_strip(config)?;
    let running = setup_signal_handler()?;
    let mut offset: usize = 0;

    while is_running(&running) {
        let buffer = strip.pixels_mut();
        for i in 0..LED_COUNT {
            buffer.set_packed(i, DOT_COLORS[(i + offset) % DOT_COLORS.len()]);
        }

        strip.show()?;
        thread::sleep(Duration::from_millis(250));

        offset = offset.wrapping_add(1);
    }

    println!("\nShutting down cleanly.");
    Ok(())
}
