//! Strand-test animations.
//!
//! Every animation draws on anything implementing [`Leds`], sleeps between
//! frames, and returns early once `running` is cleared (Ctrl+C). Render
//! failures are propagated; a strip that can't render won't recover by
//! trying the next frame.
//!
//! ## Rust concepts
//! - `impl Trait` arguments for generic, monomorphized helpers
//! - `step_by` for strided iteration
//! - `rand::Rng` for the randomized effects

use crate::color::{Color, wheel};
use crate::error::Ws281xError;
use crate::is_running;
use crate::strip::Leds;
use clap::ValueEnum;
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::{Duration, Instant};

const WHITE: Color = Color::new(255, 255, 255);
const SNOW: Color = Color::new(0x10, 0x10, 0x10);

const GRAVITY: f64 = -9.81;
const START_HEIGHT: f64 = 1.0;

// ── Strand test ────────────────────────────────────────────────────

/// Wipe color across display a pixel at a time.
pub fn color_wipe(
    leds: &mut impl Leds,
    color: Color,
    wait: Duration,
    running: &AtomicBool,
) -> Result<(), Ws281xError> {
    for i in 0..leds.len() {
        if !is_running(running) {
            break;
        }
        leds.set(i, color);
        leds.show()?;
        thread::sleep(wait);
    }
    Ok(())
}

/// Light every third pixel, shifting by one each frame.
fn chase_frames(
    leds: &mut impl Leds,
    wait: Duration,
    running: &AtomicBool,
    mut color_at: impl FnMut(usize) -> Color,
) -> Result<(), Ws281xError> {
    let n = leds.len();
    for q in 0..3 {
        if !is_running(running) {
            break;
        }
        for i in (0..n).step_by(3) {
            leds.set(i + q, color_at(i));
        }
        leds.show()?;
        thread::sleep(wait);
        for i in (0..n).step_by(3) {
            leds.set(i + q, Color::BLACK);
        }
    }
    Ok(())
}

/// Movie theater light style chaser.
pub fn theater_chase(
    leds: &mut impl Leds,
    color: Color,
    wait: Duration,
    iterations: usize,
    running: &AtomicBool,
) -> Result<(), Ws281xError> {
    for _ in 0..iterations {
        if !is_running(running) {
            break;
        }
        chase_frames(leds, wait, running, |_| color)?;
    }
    Ok(())
}

/// Rainbow that fades across all pixels at once.
pub fn rainbow(
    leds: &mut impl Leds,
    wait: Duration,
    iterations: usize,
    running: &AtomicBool,
) -> Result<(), Ws281xError> {
    let n = leds.len();
    for j in 0..256 * iterations {
        if !is_running(running) {
            break;
        }
        for i in 0..n {
            leds.set(i, wheel(((i + j) & 255) as u8));
        }
        leds.show()?;
        thread::sleep(wait);
    }
    Ok(())
}

/// Rainbow spread evenly over the whole strip.
pub fn rainbow_cycle(
    leds: &mut impl Leds,
    wait: Duration,
    iterations: usize,
    running: &AtomicBool,
) -> Result<(), Ws281xError> {
    let n = leds.len();
    if n == 0 {
        return Ok(());
    }
    for j in 0..256 * iterations {
        if !is_running(running) {
            break;
        }
        for i in 0..n {
            leds.set(i, wheel(((i * 256 / n + j) & 255) as u8));
        }
        leds.show()?;
        thread::sleep(wait);
    }
    Ok(())
}

/// Theater chase where each lit pixel takes its own rainbow color.
pub fn theater_chase_rainbow(
    leds: &mut impl Leds,
    wait: Duration,
    running: &AtomicBool,
) -> Result<(), Ws281xError> {
    for j in 0..256 {
        if !is_running(running) {
            break;
        }
        chase_frames(leds, wait, running, |i| wheel(((i + j) % 255) as u8))?;
    }
    Ok(())
}

/// Warm sine wave rolling along the strip.
pub fn pulsing_light(
    leds: &mut impl Leds,
    wait: Duration,
    running: &AtomicBool,
) -> Result<(), Ws281xError> {
    let n = leds.len();
    for position in 1..=n * 2 {
        if !is_running(running) {
            break;
        }
        for j in 0..n {
            leds.set(j, pulse_color(j + position));
        }
        leds.show()?;
        thread::sleep(wait);
    }
    Ok(())
}

fn pulse_color(phase: usize) -> Color {
    let level = (phase as f64).sin() * 127.0 + 128.0;
    let dim = (level * 100.0 / 255.0).round() as u8;
    Color::new(level.round() as u8, dim, dim)
}

// ── Timed effects ──────────────────────────────────────────────────

/// Bursts of full-white flashes with random gaps between them.
pub fn strobe(
    leds: &mut impl Leds,
    wait: Duration,
    strobe_count: usize,
    pulse_count: usize,
    rng: &mut impl Rng,
    running: &AtomicBool,
) -> Result<(), Ws281xError> {
    for _ in 0..strobe_count {
        for _ in 0..pulse_count {
            if !is_running(running) {
                return Ok(());
            }
            leds.fill(WHITE);
            leds.show()?;
            thread::sleep(Duration::from_millis(rng.gen_range(0..45)));
            leds.fill(Color::BLACK);
            leds.show()?;
        }
        thread::sleep(wait);
    }
    Ok(())
}

/// Dim background with a single white pixel flickering on.
///
/// `base_delay_ms` is the range the pause before the sparkle is drawn from
/// (100..=1000 in the strand test). An empty range pauses for its start.
pub fn snow_sparkle(
    leds: &mut impl Leds,
    sparkle_delay: Duration,
    base_delay_ms: RangeInclusive<u64>,
    rng: &mut impl Rng,
    running: &AtomicBool,
) -> Result<(), Ws281xError> {
    let n = leds.len();
    if n == 0 || !is_running(running) {
        return Ok(());
    }

    let pixel = rng.gen_range(0..n);
    let speed_delay = if base_delay_ms.is_empty() {
        Duration::from_millis(*base_delay_ms.start())
    } else {
        Duration::from_millis(rng.gen_range(base_delay_ms))
    };

    leds.fill(SNOW);
    leds.show()?;
    thread::sleep(speed_delay);

    leds.set(pixel, WHITE);
    leds.show()?;
    thread::sleep(sparkle_delay);
    Ok(())
}

// ── Bouncing balls ─────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Ball {
    last_bounce: f64,
    impact_velocity: f64,
    dampening: f64,
    height: f64,
}

/// Bouncing-ball physics, advanced by wall-clock seconds.
///
/// Kept separate from drawing so the motion can be checked without a strip.
#[derive(Clone, Debug)]
pub struct BouncingBalls {
    balls: Vec<Ball>,
    launch_velocity: f64,
}

impl BouncingBalls {
    pub fn new(ball_count: usize) -> Self {
        let launch_velocity = (-2.0 * GRAVITY * START_HEIGHT).sqrt();
        let squared = (ball_count * ball_count).max(1) as f64;
        let balls = (0..ball_count)
            .map(|i| Ball {
                last_bounce: 0.0,
                impact_velocity: launch_velocity,
                dampening: 0.90 - i as f64 / squared,
                height: START_HEIGHT,
            })
            .collect();
        Self {
            balls,
            launch_velocity,
        }
    }

    /// Move every ball to time `now` (seconds since the animation began).
    pub fn step(&mut self, now: f64) {
        for ball in self.balls.iter_mut() {
            let t = now - ball.last_bounce;
            ball.height = 0.5 * GRAVITY * t * t + ball.impact_velocity * t;

            if ball.height < 0.0 {
                ball.height = 0.0;
                ball.impact_velocity *= ball.dampening;
                ball.last_bounce = now;

                if ball.impact_velocity < 0.01 {
                    ball.impact_velocity = self.launch_velocity;
                }
            }
        }
    }

    pub fn heights(&self) -> Vec<f64> {
        self.balls.iter().map(|b| b.height).collect()
    }

    /// Pixel index of each ball on a strip of `len` LEDs.
    pub fn positions(&self, len: usize) -> Vec<usize> {
        let top = len.saturating_sub(1);
        self.balls
            .iter()
            .map(|b| {
                let p = (b.height * top as f64 / START_HEIGHT).round();
                (p.max(0.0) as usize).min(top)
            })
            .collect()
    }
}

/// Balls dropping under gravity, each losing a little energy per bounce.
pub fn bouncing_balls(
    leds: &mut impl Leds,
    playtime: Duration,
    ball_count: usize,
    wait: Duration,
    running: &AtomicBool,
) -> Result<(), Ws281xError> {
    let mut balls = BouncingBalls::new(ball_count);
    // First ball blue, the rest spread around the hue circle.
    let colors: Vec<Color> = (0..ball_count)
        .map(|i| Color::from_hue((240 + i * 360 / ball_count) as u16))
        .collect();
    let start = Instant::now();

    while start.elapsed() < playtime && is_running(running) {
        balls.step(start.elapsed().as_secs_f64());
        for (p, color) in balls.positions(leds.len()).into_iter().zip(&colors) {
            leds.set(p, *color);
        }
        leds.show()?;
        leds.fill(Color::BLACK);
        thread::sleep(wait);
    }
    Ok(())
}

// ── Programs ───────────────────────────────────────────────────────

/// The named strand-test programs, selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Program {
    ColorWipe,
    TheaterChase,
    Rainbow,
    RainbowCycle,
    TheaterChaseRainbow,
    Pulsing,
    Strobe,
    SnowSparkle,
    BouncingBalls,
}

/// Length of the timed segments (pulsing, strobe, sparkle, balls).
pub const SEGMENT: Duration = Duration::from_secs(15);

impl Program {
    /// The full strand test, in order.
    pub const STRANDTEST: [Program; 9] = [
        Program::ColorWipe,
        Program::TheaterChase,
        Program::Rainbow,
        Program::RainbowCycle,
        Program::TheaterChaseRainbow,
        Program::Pulsing,
        Program::Strobe,
        Program::SnowSparkle,
        Program::BouncingBalls,
    ];

    /// Play this program once with the strand test's timings.
    ///
    /// Returns straight away on a channel with no LEDs; the timed segments
    /// would otherwise spin for their whole length drawing nothing.
    pub fn run(
        self,
        leds: &mut impl Leds,
        rng: &mut impl Rng,
        running: &AtomicBool,
    ) -> Result<(), Ws281xError> {
        if leds.is_empty() {
            tracing::debug!("Skipping {:?}: no LEDs", self);
            return Ok(());
        }

        let ms = Duration::from_millis;
        match self {
            Program::ColorWipe => {
                for c in [Color::new(255, 0, 0), Color::new(0, 255, 0), Color::new(0, 0, 255)] {
                    color_wipe(leds, c, ms(50), running)?;
                }
            }
            Program::TheaterChase => {
                for c in [
                    Color::new(127, 127, 127),
                    Color::new(127, 0, 0),
                    Color::new(0, 0, 127),
                ] {
                    theater_chase(leds, c, ms(50), 10, running)?;
                }
            }
            Program::Rainbow => rainbow(leds, ms(20), 1, running)?,
            Program::RainbowCycle => rainbow_cycle(leds, ms(20), 5, running)?,
            Program::TheaterChaseRainbow => theater_chase_rainbow(leds, ms(50), running)?,
            Program::Pulsing => {
                let start = Instant::now();
                while start.elapsed() < SEGMENT && is_running(running) {
                    pulsing_light(leds, ms(50), running)?;
                }
            }
            Program::Strobe => {
                let start = Instant::now();
                while start.elapsed() < SEGMENT && is_running(running) {
                    strobe(leds, ms(400), 7, 12, rng, running)?;
                }
            }
            Program::SnowSparkle => {
                let start = Instant::now();
                while start.elapsed() < SEGMENT && is_running(running) {
                    snow_sparkle(leds, ms(20), 100..=1000, rng, running)?;
                }
            }
            Program::BouncingBalls => bouncing_balls(leds, SEGMENT, 2, ms(10), running)?,
        }
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────────
