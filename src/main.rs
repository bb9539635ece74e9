//! Wave Arena entry point
//!
//! Headless demo driver: runs the deterministic sim for a while with a
//! scripted gunner and prints a run summary. Useful for soak-testing wave
//! pacing and as a smoke check that the sim holds together end to end.

use glam::Vec3;

use wave_arena::consts::SIM_DT;
use wave_arena::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use wave_arena::{Tuning, dist_xz, normalize_xz};

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let seconds: f32 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(60.0);
    log::info!("Wave Arena (headless) starting, seed {seed}, {seconds} s");

    let mut state = GameState::new(seed, Tuning::default());
    let ticks = (seconds / SIM_DT) as usize;
    let mut kills = 0u64;

    for _ in 0..ticks {
        let input = scripted_input(&state);
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            match event {
                GameEvent::WaveStarted { wave } => log::info!("wave {wave} started"),
                GameEvent::BossSpawned { kind, .. } => log::info!("boss spawned: {kind:?}"),
                GameEvent::EnemyDied { .. } => kills += 1,
                GameEvent::GameOver { score, wave } => {
                    log::info!("game over at wave {wave} with {score} points");
                }
                _ => {}
            }
        }
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!("seed {seed}: wave {}, score {}, {kills} kills", state.wave, state.score);
}

/// Dumb but serviceable: strafe around the center and shoot at the nearest
/// enemy
fn scripted_input(state: &GameState) -> TickInput {
    let nearest = state
        .registry
        .enemies
        .iter()
        .min_by(|a, b| {
            dist_xz(a.pos, state.player.pos)
                .total_cmp(&dist_xz(b.pos, state.player.pos))
        })
        .map(|e| e.pos);

    let aim = nearest
        .map(|p| normalize_xz(p - state.player.pos))
        .unwrap_or(Vec3::new(0.0, 0.0, 1.0));

    // back away from whatever is closest
    let retreat = nearest
        .map(|p| normalize_xz(state.player.pos - p))
        .unwrap_or(Vec3::ZERO);
    let speed = wave_arena::consts::PLAYER_SPEED * state.player_speed_mul();
    let player_pos = state.player.pos + retreat * speed * SIM_DT;

    TickInput {
        player_pos,
        aim,
        shoot: nearest.is_some(),
        ..Default::default()
    }
}
