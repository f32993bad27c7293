//! Vibenator headless runner
//!
//! Plays one autopilot run per weapon kind and logs the outcome. Rendering
//! and keyboard input belong to the host application; this binary exercises
//! the simulation core on its own.
//!
//! Usage: `vibenator [balance.json] [seed]` (set `RUST_LOG=info` for wave logs)

use std::process::ExitCode;

use vibenator_core::autopilot;
use vibenator_core::consts::FRAMES_PER_SECOND;
use vibenator_core::Balance;
use vibenator_core::sim::{GameEvent, Session, WeaponKind};

/// Stop a run that outlives this many waves
const MAX_WAVES: u32 = 50;
/// Frame budget per wave before giving up on it (5 minutes)
const MAX_FRAMES_PER_WAVE: u32 = FRAMES_PER_SECOND * 60 * 5;

struct RunSummary {
    weapon: WeaponKind,
    wave: u32,
    score: u64,
    finished: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Vibenator (headless) starting...");

    let mut args = std::env::args().skip(1);
    let balance = match args.next() {
        Some(path) => match load_balance(&path) {
            Ok(balance) => balance,
            Err(err) => {
                log::error!("{}", err);
                return ExitCode::FAILURE;
            }
        },
        None => Balance::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5eed);

    for weapon in WeaponKind::ALL {
        let summary = play(&balance, seed, weapon);
        println!(
            "{:<12} wave {:>3}  score {:>8}{}",
            summary.weapon.as_str(),
            summary.wave,
            summary.score,
            if summary.finished { "" } else { "  (stopped)" }
        );
    }

    ExitCode::SUCCESS
}

fn load_balance(path: &str) -> Result<Balance, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read balance file '{}': {}", path, e))?;
    Balance::from_json(&json).map_err(|e| format!("{}: {}", path, e))
}

/// Play until game over (or the wave/frame caps), always taking the first offered upgrade
fn play(balance: &Balance, seed: u64, weapon: WeaponKind) -> RunSummary {
    let mut session = Session::new(balance.clone(), seed);
    session.start_run(weapon);
    let mut frame = session.snapshot();

    loop {
        let mut frames = 0;
        let event = loop {
            let input = autopilot::steer(&frame, balance);
            frame = session.advance_frame(&input);
            if let Some(event) = frame.event {
                break Some(event);
            }
            frames += 1;
            if frames >= MAX_FRAMES_PER_WAVE {
                break None;
            }
        };

        match event {
            Some(GameEvent::GameOver { score }) => {
                return RunSummary {
                    weapon,
                    wave: session.wave(),
                    score,
                    finished: true,
                };
            }
            Some(GameEvent::WaveCleared { .. }) if session.wave() < MAX_WAVES => {
                let offer = session.offer_upgrades(2);
                if let Some(choice) = offer.first() {
                    session.choose_upgrade(choice.as_str());
                }
                if let Err(err) = session.start_next_wave() {
                    log::error!("{}", err);
                    break;
                }
                frame = session.snapshot();
            }
            _ => break,
        }
    }

    RunSummary {
        weapon,
        wave: session.wave(),
        score: session.score(),
        finished: false,
    }
}
