//! Eight Ball headless driver
//!
//! Plays a full seeded match with the demo shot picker and prints the
//! result as JSON. Pass a settings JSON path as the first argument to
//! override the defaults; `RUST_LOG` controls log output.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use eight_ball::Settings;
use eight_ball::consts::SIM_DT;
use eight_ball::sim::{
    EventSink, MatchEvent, MatchPhase, MatchState, TickInput, dispatch, pick_shot, tick,
};

/// Give up on a match that has not finished after this many shots
const MAX_SHOTS: u32 = 1_000;
/// Safety cap on ticks for a single shot
const MAX_TICKS_PER_SHOT: u32 = 100_000;

/// Logs lifecycle events as they happen
struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &MatchEvent) {
        match event {
            MatchEvent::MatchStarted { starting_player } => {
                log::info!("player {starting_player} breaks");
            }
            MatchEvent::BallPotted { ball, kind } => log::info!("ball {ball} ({kind:?}) potted"),
            MatchEvent::MotionStarted => log::debug!("shot taken"),
            MatchEvent::MotionStopped { first_touched } => {
                log::debug!("table settled, first contact {first_touched:?}");
            }
            MatchEvent::MatchEnded { winner, players } => {
                log::info!("player {winner} ({}) wins", players[*winner].name);
            }
        }
    }
}

fn main() {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    log::info!("Eight Ball (headless) starting, seed {}", settings.seed);
    let mut state = MatchState::new(&settings);
    let mut shot_rng = Pcg32::seed_from_u64(settings.seed.wrapping_add(1));
    let mut sink = LogSink;
    let mut sinks: [&mut dyn EventSink; 1] = [&mut sink];

    dispatch(&state.start(), &mut sinks);

    let mut shots = 0;
    while state.phase != MatchPhase::Ended && shots < MAX_SHOTS {
        let Some(shot) = pick_shot(&state, &mut shot_rng) else {
            break;
        };
        dispatch(
            &tick(&mut state, &TickInput { strike: Some(shot) }, SIM_DT),
            &mut sinks,
        );
        shots += 1;

        let mut ticks = 0;
        while state.phase == MatchPhase::InMotion && ticks < MAX_TICKS_PER_SHOT {
            dispatch(&tick(&mut state, &TickInput::default(), SIM_DT), &mut sinks);
            ticks += 1;
        }
    }

    match state.result() {
        Some(result) => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("failed to serialize result: {e}"),
        },
        None => {
            let active = state.turns.active_player();
            log::warn!(
                "no winner after {shots} shots; {} still needs {} balls",
                active.name,
                state.ball_state.remaining_in_group(active.group)
            );
        }
    }
}
