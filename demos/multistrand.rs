//! # Two-channel Example
//!
//! Drives an SK6812 RGBW strip on PWM channel 0 (GPIO 18) and a WS2812
//! strip on channel 1 (GPIO 13) from one driver instance, wiping colors
//! across each in turn.
//!
//! ## Run it
//! ```sh
//! cargo build --release --features hardware --example multistrand
//! sudo ./target/release/examples/multistrand
//! ```

use std::time::Duration;
use ws281x_rs::animations::color_wipe;
use ws281x_rs::{
    ChannelConfig, Color, StripConfig, StripType, color, color_rgbw, create_strip, is_running,
    setup_signal_handler,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().compact().init();

    let mut rgbw = ChannelConfig::new(16, 18);
    rgbw.strip_type = StripType::SK6812W;
    let mut rgb = ChannelConfig::new(16, 13);
    rgb.strip_type = StripType::WS2812;

    let config = StripConfig::default()
        .with_channel(0, rgbw)?
        .with_channel(1, rgb)?;
    let mut strip = create_strip(config)?;
    let running = setup_signal_handler()?;
    let wait = Duration::from_millis(50);

    // (strip 1, strip 2) pairs, one wipe each per step
    let steps: [(Color, Color); 6] = [
        (color(255, 0, 0), color(255, 0, 0)),
        (color(0, 255, 0), color(0, 255, 0)),
        (color(0, 0, 255), color(0, 0, 255)),
        (color_rgbw(0, 0, 0, 255), color(255, 0, 0)),
        (color(255, 255, 255), color(0, 255, 0)),
        (color_rgbw(255, 255, 255, 255), color(0, 0, 255)),
    ];

    while is_running(&running) {
        for (first, second) in steps {
            color_wipe(&mut strip.channel_mut(0)?, first, wait, &running)?;
            color_wipe(&mut strip.channel_mut(1)?, second, wait, &running)?;
        }
    }

    println!("\nShutting down cleanly.");
    Ok(())
}
