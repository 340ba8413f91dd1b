//! Blank Page entry point
//!
//! Runs the game headless: levels are played with no input and audio is
//! logged. A windowed front end drives `App::frame` the same way.

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use blank_page::audio::LogAudio;
#[cfg(not(target_arch = "wasm32"))]
use blank_page::level::DirLoader;
#[cfg(not(target_arch = "wasm32"))]
use blank_page::renderer::build_draw_list;
#[cfg(not(target_arch = "wasm32"))]
use blank_page::sim::TickInput;
#[cfg(not(target_arch = "wasm32"))]
use blank_page::{App, FrameOutcome, LevelError, LevelSession, Settings};

#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;
/// Headless run length
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 60 * 30;

#[cfg(not(target_arch = "wasm32"))]
fn run(settings: &Settings) -> Result<(), LevelError> {
    let loader = DirLoader::new(&settings.level_dir);
    let session = LevelSession::start(Box::new(loader), settings.levels.clone())?;
    let mut app = App::new(session, settings);
    let mut audio = LogAudio::new(settings);

    let mut input = TickInput {
        intro_finished: true,
        ..Default::default()
    };

    for frame in 0..MAX_FRAMES {
        if app.frame(&input, FRAME_DT, &mut audio)? == FrameOutcome::Exit {
            log::info!("Session over after {} frames", frame + 1);
            return Ok(());
        }
        input.intro_finished = false;
    }

    let draw = build_draw_list(&app.state);
    log::info!(
        "Stopped after {} frames on '{}': player {:?} at {:?}, {} sprites",
        MAX_FRAMES,
        app.state.level().name,
        app.state.player.state,
        app.state.player.pos,
        draw.instance_count()
    );
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Blank Page starting...");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "settings.json".to_string());
    let settings = Settings::load(&path);

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No web front end; the library is driven by the embedding page
}
