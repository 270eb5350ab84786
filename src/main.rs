//! Xorg Duel headless runner
//!
//! Plays one scripted match with no window: a sweeping aim drives player 1,
//! frame times jitter like a real display, and audio cues go to the log.
//! Prints the last in-match snapshot as JSON when the match is over.
//!
//! Usage: xorg-duel [--seed N] [--settings PATH] [--frames N]
//!                  [--players 1|2] [--input pointer|gamepad]

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use xorg_duel::audio::{AudioRouter, LogSink};
use xorg_duel::consts::SIM_DT;
use xorg_duel::sim::{GamePhase, GameState, GamepadState, PointerState, TickInput, tick};
use xorg_duel::{FixedStepper, InputDevice, Settings, SettingsError};

/// Frame times the fake display cycles through (60, 30 and 144 Hz)
const FRAME_PATTERN: [f32; 4] = [1.0 / 60.0, 1.0 / 60.0, 1.0 / 30.0, 1.0 / 144.0];
/// Frame budget if the match never finishes
const DEFAULT_MAX_FRAMES: u64 = 20_000;
/// Scripted trigger: held for this many ticks out of every `PRESS_PERIOD`
const PRESS_TICKS: u64 = 3;
const PRESS_PERIOD: u64 = 20;

#[derive(Parser, Debug)]
#[command(name = "xorg-duel")]
#[command(about = "Play one scripted Xorg Duel match headless and print the final snapshot")]
struct Args {
    /// Seed for the match RNG
    #[arg(long, default_value_t = 0x5EED)]
    seed: u64,

    /// Settings file (JSON); defaults are used when missing or invalid
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Give up after this many display frames
    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    frames: u64,

    /// Human players (overrides the settings file)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    players: Option<u8>,

    /// Player 1 device: pointer (mouse) or gamepad (controller)
    #[arg(long, value_parser = parse_input_device)]
    input: Option<InputDevice>,
}

fn parse_input_device(name: &str) -> Result<InputDevice, String> {
    InputDevice::from_str(name).ok_or_else(|| format!("unknown input device '{name}'"))
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), SettingsError> {
    env_logger::init();

    let args = Args::parse();
    let seed = args.seed;
    let max_frames = args.frames;
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(count) = args.players {
        settings.match_config.player_count = count;
    }
    if let Some(device) = args.input {
        settings.match_config.p1_input = device;
    }

    log::info!("Xorg Duel (headless) starting with seed {}", seed);

    let mut state = GameState::with_tuning(seed, settings.tuning.clone());
    let mut audio = AudioRouter::with_settings(Box::new(LogSink), &settings);
    let mut stepper = FixedStepper::default();

    audio.sync_music(state.phase);
    state.start_match(settings.match_config)?;

    let mut last_snapshot = state.snapshot();
    let mut frame: u64 = 0;
    while state.phase != GamePhase::Menu && frame < max_frames {
        let frame_dt = FRAME_PATTERN[(frame % FRAME_PATTERN.len() as u64) as usize];
        for _ in 0..stepper.advance(frame_dt) {
            let input = scripted_input(&state);
            tick(&mut state, &input, SIM_DT);
        }

        let events = state.drain_events();
        audio.handle_events(&events);
        audio.sync_music(state.phase);

        if state.phase != GamePhase::Menu {
            last_snapshot = state.snapshot();
        }
        frame += 1;
    }

    if state.phase != GamePhase::Menu {
        log::warn!("Frame budget of {} ran out mid-match", max_frames);
    }
    log::info!(
        "Finished after {} frames / {} ticks: {} - {}",
        frame,
        state.time_ticks,
        last_snapshot.score.p1,
        last_snapshot.score.p2
    );

    println!("{}", serde_json::to_string_pretty(&last_snapshot)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts embed the library directly
}

/// Aim sweeping around the arena rim, tapping the trigger periodically.
/// Drives whichever device player 1 is configured for.
fn scripted_input(state: &GameState) -> TickInput {
    let t = state.time_ticks as f32 * SIM_DT;
    let aim = Vec2::from_angle(t * 0.7);
    let pressed = state.time_ticks % PRESS_PERIOD < PRESS_TICKS;

    let mut input = TickInput::default();
    match state.config.p1_input {
        InputDevice::Pointer => {
            input.pointer = Some(PointerState {
                target: aim * state.arena_radius,
                pressed,
            });
        }
        InputDevice::Gamepad => {
            if let Some(slot) = TickInput::gamepad_slot(1, InputDevice::Gamepad) {
                input.gamepads[slot] = Some(GamepadState {
                    stick: aim,
                    buttons: [pressed, false],
                });
            }
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["xorg-duel"]).unwrap();
        assert_eq!(args.seed, 0x5EED);
        assert_eq!(args.frames, DEFAULT_MAX_FRAMES);
        assert!(args.settings.is_none());
        assert!(args.players.is_none());
        assert!(args.input.is_none());
    }

    #[test]
    fn test_typed_flags() {
        let args = Args::try_parse_from([
            "xorg-duel",
            "--seed",
            "42",
            "--players",
            "2",
            "--input",
            "controller",
            "--settings",
            "duel.json",
        ])
        .unwrap();
        assert_eq!(args.seed, 42);
        assert_eq!(args.players, Some(2));
        assert_eq!(args.input, Some(InputDevice::Gamepad));
        assert_eq!(args.settings, Some(PathBuf::from("duel.json")));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(Args::try_parse_from(["xorg-duel", "--seed", "abc"]).is_err());
        assert!(Args::try_parse_from(["xorg-duel", "--frames", "-5"]).is_err());
        assert!(Args::try_parse_from(["xorg-duel", "--players", "3"]).is_err());
        assert!(Args::try_parse_from(["xorg-duel", "--players", "0"]).is_err());
        assert!(Args::try_parse_from(["xorg-duel", "--input", "wheel"]).is_err());
        assert!(Args::try_parse_from(["xorg-duel", "--speed", "9"]).is_err());
    }
}
