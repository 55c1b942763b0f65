//! WS281x strand test
//!
//! Cycles a strip through color wipes, theater chases, rainbows, and the
//! timed effects (pulsing, strobe, snow sparkle, bouncing balls) until
//! Ctrl+C.
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/ws281x-rs --count 16 --gpio 18 --strip-type grb --clear
//! ./target/release/ws281x-rs --simulate --animation rainbow
//! ```

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ws281x_rs::animations::{self, Program};
use ws281x_rs::config::{DEFAULT_DMA, TARGET_FREQ};
use ws281x_rs::sim::SimulatedBackend;
use ws281x_rs::{
    Backend, ChannelConfig, Color, Strip, StripConfig, StripType, is_running, setup_signal_handler,
};

/// WS281x LED strip strand test
#[derive(Parser)]
#[command(name = "ws281x-rs")]
#[command(about = "Strand test animations for WS281x/SK6812 LED strips")]
#[command(version)]
struct Args {
    /// JSON strip configuration; overrides the per-strip flags below
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of LED pixels
    #[arg(long, default_value = "16")]
    count: usize,

    /// GPIO pin connected to the pixels (must support PWM)
    #[arg(long, default_value = "18")]
    gpio: u8,

    /// LED signal frequency in hertz
    #[arg(long, default_value_t = TARGET_FREQ)]
    freq: u32,

    /// DMA channel to use for generating the signal
    #[arg(long, default_value_t = DEFAULT_DMA)]
    dma: u8,

    /// 0 for darkest, 255 for brightest
    #[arg(long, default_value = "255")]
    brightness: u8,

    /// Invert the signal (NPN transistor level shift)
    #[arg(long)]
    invert: bool,

    /// PWM channel; 1 for GPIOs 13, 19, 41 or 53
    #[arg(long, default_value = "0")]
    channel: usize,

    /// Color layout, e.g. grb, rgbw, ws2812, sk6812w
    #[arg(long, default_value = "grb")]
    strip_type: StripType,

    /// Render to the in-memory simulator instead of the hardware
    #[arg(long)]
    simulate: bool,

    /// Clear the display on exit
    #[arg(short, long)]
    clear: bool,

    /// Animations to loop (default: the full strand test)
    #[arg(long, value_enum)]
    animation: Vec<Program>,
}

impl Args {
    fn strip_config(&self) -> Result<StripConfig, Box<dyn std::error::Error>> {
        if let Some(path) = &self.config {
            return Ok(StripConfig::load(path)?);
        }

        let channel = ChannelConfig {
            gpio: self.gpio,
            invert: self.invert,
            count: self.count,
            brightness: self.brightness,
            strip_type: self.strip_type,
        };
        Ok(StripConfig::default()
            .with_freq(self.freq)
            .with_dma(self.dma)
            .with_channel(self.channel, channel)?)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    let args = Args::parse();

    if let Err(e) = run_main(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run_main(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.strip_config()?;

    tracing::info!("WS281x strand test v{}", env!("CARGO_PKG_VERSION"));

    if args.simulate {
        return run(config, SimulatedBackend::new(), args);
    }
    run_default(config, args)
}

#[cfg(feature = "hardware")]
fn run_default(config: StripConfig, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    run(config, ws281x_rs::native::NativeBackend::new(), args)
}

#[cfg(not(feature = "hardware"))]
fn run_default(config: StripConfig, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    tracing::warn!("Built without the 'hardware' feature; simulating");
    run(config, SimulatedBackend::new(), args)
}

fn run<B: Backend>(
    config: StripConfig,
    backend: B,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut strip = Strip::new(config, backend)?;

    let running = setup_signal_handler()?;
    let mut rng = SmallRng::from_entropy();

    let programs = if args.animation.is_empty() {
        Program::STRANDTEST.to_vec()
    } else {
        args.animation.clone()
    };

    tracing::info!("Press Ctrl-C to quit.");
    if !args.clear {
        tracing::info!("Use \"-c\" argument to clear LEDs on exit");
    }

    'outer: while is_running(&running) {
        for program in &programs {
            if !is_running(&running) {
                break 'outer;
            }
            tracing::info!("{:?} animation", program);
            program.run(&mut strip, &mut rng, &running)?;
        }
    }

    if args.clear {
        // The shared flag is already cleared; the wipe needs its own.
        let wipe = AtomicBool::new(true);
        animations::color_wipe(&mut strip, Color::BLACK, Duration::from_millis(10), &wipe)?;
    }

    tracing::info!("Shutting down cleanly.");
    Ok(())
}
