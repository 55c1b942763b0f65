//! # SK6812 White Test
//!
//! Wipes an RGBW strip through red, green, blue, the dedicated white LED,
//! composite RGB white, and everything on at once.
//!
//! ## Run it
//! ```sh
//! cargo build --release --features hardware --example sk6812_white
//! sudo ./target/release/examples/sk6812_white
//! ```

use std::thread;
use std::time::Duration;
use ws281x_rs::animations::color_wipe;
use ws281x_rs::{StripConfig, StripType, color, color_rgbw, create_strip, is_running, setup_signal_handler};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().compact().init();

    let config = StripConfig::single(30, 18).with_strip_type(StripType::SK6812W);
    let mut strip = create_strip(config)?;
    let running = setup_signal_handler()?;

    let colors = [
        color(255, 0, 0),
        color(0, 255, 0),
        color(0, 0, 255),
        color_rgbw(0, 0, 0, 255),
        color(255, 255, 255),
        color_rgbw(255, 255, 255, 255),
    ];

    while is_running(&running) {
        for c in colors {
            color_wipe(&mut strip, c, Duration::ZERO, &running)?;
            thread::sleep(Duration::from_secs(2));
        }
    }

    println!("\nShutting down cleanly.");
    Ok(())
}
