//! # Matrix Example
//!
//! Treats the strip as a small LED matrix: eight colored dots march along
//! the bottom row while the rows above scroll upward, 15 frames a second.
//!
//! ## Run it
//! ```sh
//! cargo build --release --features hardware --example matrix
//! sudo ./target/release/examples/matrix --layout zigzag --rotate
//! ```
//!
//! ## Rust concepts introduced
//! - Reusing the crate's `ValueEnum` types in a demo's own `clap` parser
//! - Separating state (`RisingDots`) from wiring (`MatrixMap`)

use clap::Parser;
use std::thread;
use std::time::Duration;
use ws281x_rs::matrix::RisingDots;
use ws281x_rs::{
    Color, Layout, MatrixMap, StripConfig, StripType, create_strip, is_running,
    setup_signal_handler,
};

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

#[derive(Parser)]
#[command(name = "matrix")]
#[command(about = "Rising dots on a WS281x LED matrix")]
struct Args {
    #[arg(long, default_value = "8")]
    width: usize,

    #[arg(long, default_value = "8")]
    height: usize,

    /// How the rows are wired
    #[arg(long, value_enum, default_value = "normal")]
    layout: Layout,

    /// Flip left to right
    #[arg(long)]
    mirror: bool,

    /// Rotate 90 degrees clockwise (square matrices only)
    #[arg(long)]
    rotate: bool,

    #[arg(long, default_value = "18")]
    gpio: u8,

    #[arg(long, default_value = "5")]
    dma: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().compact().init();
    let args = Args::parse();

    let mut map = MatrixMap::new(args.width, args.height, args.layout);
    if args.mirror {
        map.mirror_x();
    }
    if args.rotate {
        map.rotate_90()?;
    }

    let config = StripConfig::single(map.len(), args.gpio)
        .with_dma(args.dma)
        .with_strip_type(StripType::Rgb);
    let mut strip = create_strip(config)?;
    let running = setup_signal_handler()?;

    let colors: Vec<Color> = DOT_COLORS.iter().map(|&c| Color::from_packed(c)).collect();
    let mut dots = RisingDots::new(args.width, args.height, &colors);

    while is_running(&running) {
        dots.step();
        map.draw(&mut strip, dots.frame());
        strip.show()?;

        thread::sleep(Duration::from_secs(1) / 15);
    }

    println!("\nShutting down cleanly.");
    Ok(())
}
