//! # Ring Clock Example
//!
//! Twelve LEDs in a circle showing the time: red seconds, blue minutes,
//! green hours. Dims itself outside 09:00-18:59.
//!
//! ## Run it
//! ```sh
//! cargo build --release --features hardware --example clock
//! sudo ./target/release/examples/clock
//! ```

use chrono::{Local, Timelike};
use std::thread;
use std::time::Duration;
use ws281x_rs::clock::{clock_brightness, clock_frame};
use ws281x_rs::{StripConfig, StripType, create_strip, is_running, setup_signal_handler};

const LED_COUNT: usize = 12;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().compact().init();

    let config = StripConfig::single(LED_COUNT, 18).with_strip_type(StripType::WS2812);
    let mut strip = create_strip(config)?;
    let running = setup_signal_handler()?;

    while is_running(&running) {
        let now = Local::now();
        strip.set_brightness(clock_brightness(now.hour()));

        for (i, c) in clock_frame(&now, strip.num_pixels()).into_iter().enumerate() {
            strip.set_pixel_color(i, c);
        }
        strip.show()?;
        thread::sleep(Duration::from_millis(100));
    }

    strip.clear();
    strip.show()?;
    println!("\nShutting down cleanly.");
    Ok(())
}
