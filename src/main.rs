//! Ink Barrier headless driver
//!
//! Runs one round without a display: loads a level, draws a scripted
//! barrier between the spawn zones and the target, then steps the round at
//! 60 frames per second until it is won or lost.
//!
//! Usage: `ink-barrier [level.json] [tuning.json]`

use std::error::Error;

use glam::Vec2;

use ink_barrier::Tuning;
use ink_barrier::sim::{Extend, LevelDescriptor, Round, RoundEvent, RoundPhase};

const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many simulated seconds
const MAX_SECONDS: u32 = 30;
/// Spacing between scripted pointer samples
const STROKE_STEP: f32 = 20.0;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(path) => LevelDescriptor::load(path)?,
        None => LevelDescriptor::sample(),
    };
    let tuning = match args.next() {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    log::info!("Ink Barrier (headless) starting, seed {seed}");

    let mut round = Round::new(level, tuning, 1, seed);
    draw_scripted_barrier(&mut round);

    if round.phase() != RoundPhase::ActivePursuit {
        log::warn!("scripted barrier was not accepted; nothing to simulate");
    } else {
        for _ in 0..MAX_SECONDS * 60 {
            round.update(FRAME_DT);
            for event in round.drain_events() {
                match event {
                    RoundEvent::CountdownTick { remaining } => log::info!("{remaining}s left"),
                    RoundEvent::Won => log::info!("target protected"),
                    RoundEvent::Lost => log::info!("target reached"),
                    _ => {}
                }
            }
            if round.phase().is_terminal() {
                break;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&round.snapshot())?);
    Ok(())
}

/// Horizontal stroke halfway between the spawn zones and the target
fn draw_scripted_barrier(round: &mut Round) {
    let level = round.level();
    let nests = level.spawn_zones.len().max(1) as f32;
    let nest_y = level.spawn_zones.iter().map(|z| z.y).sum::<f32>() / nests;
    let y = if level.spawn_zones.is_empty() {
        level.target.y - 100.0
    } else {
        (nest_y + level.target.y) / 2.0
    };
    let width = round.tuning().canvas_width;

    let mut x = STROKE_STEP * 2.0;
    while x < width && !round.pointer_down(Vec2::new(x, y)) {
        x += STROKE_STEP;
    }

    while x < width - STROKE_STEP * 2.0 {
        x += STROKE_STEP;
        match round.pointer_move(Vec2::new(x, y)) {
            Extend::Blocked => log::debug!("stroke blocked at ({x:.0}, {y:.0})"),
            Extend::OutOfInk | Extend::Idle => break,
            _ => {}
        }
    }
    round.pointer_up();

    for event in round.drain_events() {
        log::info!("{event:?}");
    }
}
