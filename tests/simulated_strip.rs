//! End-to-end runs against the simulated backend: config file in, wire
//! bytes out.

use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;
use ws281x_rs::animations::Program;
use ws281x_rs::sim::SimulatedBackend;
use ws281x_rs::{Leds, NativeCode, NativeOp, Strip, StripConfig, StripType, Ws281xError, color};

#[test]
fn json_config_drives_wire_encoding() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("strip.json");
    std::fs::write(
        &path,
        r#"{
            "channels": [
                { "gpio": 18, "count": 2, "strip_type": "ws2812", "brightness": 127 },
                { "gpio": 13, "count": 1, "strip_type": "rgbw" }
            ]
        }"#,
    )
    .unwrap();

    let config = StripConfig::load(&path).unwrap();
    assert_eq!(config.channels[0].strip_type, StripType::Grb);

    let sim = SimulatedBackend::new();
    let mut strip = Strip::new(config, sim.clone()).unwrap();
    strip.set_pixel_color(0, color(200, 100, 0));
    strip
        .channel_mut(1)
        .unwrap()
        .set(0, ws281x_rs::color_rgbw(1, 2, 3, 4));
    strip.show().unwrap();

    let frame = sim.last_frame().unwrap();
    // GRB at half brightness
    assert_eq!(frame.wire[0], vec![50, 100, 0, 0, 0, 0]);
    assert_eq!(frame.wire[1], vec![1, 2, 3, 4]);

    drop(strip);
    assert_eq!(sim.fini_count(), 1);
}

#[test]
fn one_entry_config_with_uppercase_type() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("strip.json");
    std::fs::write(
        &path,
        r#"{ "channels": [ { "gpio": 18, "count": 1, "strip_type": "SK6812W" } ] }"#,
    )
    .unwrap();

    let config = StripConfig::load(&path).unwrap();
    assert_eq!(config.channels[0].strip_type, StripType::Grbw);
    assert!(!config.channels[1].is_used());

    let sim = SimulatedBackend::new();
    let mut strip = Strip::new(config, sim.clone()).unwrap();
    strip.set_pixel_color(0, ws281x_rs::color_rgbw(1, 2, 3, 4));
    strip.show().unwrap();
    // GRBW
    assert_eq!(sim.last_frame().unwrap().wire[0], vec![2, 1, 3, 4]);
}

#[test]
fn color_wipe_program_fills_strip_three_times() {
    let sim = SimulatedBackend::new();
    let mut strip = Strip::new(StripConfig::single(3, 18), sim.clone()).unwrap();
    let running = AtomicBool::new(true);
    let mut rng = SmallRng::seed_from_u64(1);

    Program::ColorWipe.run(&mut strip, &mut rng, &running).unwrap();

    let frames = sim.frames();
    assert_eq!(frames.len(), 9);
    assert_eq!(frames[2].leds[0], vec![0xff0000; 3]);
    assert_eq!(frames[5].leds[0], vec![0x00ff00; 3]);
    assert_eq!(frames[8].leds[0], vec![0x0000ff; 3]);
}

#[test]
fn programs_return_immediately_when_stopped() {
    let sim = SimulatedBackend::new();
    let mut strip = Strip::new(StripConfig::single(4, 18), sim.clone()).unwrap();
    let running = AtomicBool::new(false);
    let mut rng = SmallRng::seed_from_u64(1);

    for program in Program::STRANDTEST {
        program.run(&mut strip, &mut rng, &running).unwrap();
    }
    assert_eq!(sim.frame_count(), 0);
}

#[test]
fn native_init_failure_is_a_runtime_error() {
    let result = Strip::new(
        StripConfig::single(4, 18),
        SimulatedBackend::failing_init(-28112),
    );
    match result {
        Err(Ws281xError::Native { op, code }) => {
            assert_eq!(op, NativeOp::Init);
            assert_eq!(code, NativeCode::MailboxOpen);
            assert_eq!(code.raw(), -28112);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("init should have failed"),
    }
}
