//! Top-level frame driver: intro, then play until the levels run out

use crate::audio::AudioSink;
use crate::level::{LevelError, LevelSession};
use crate::settings::Settings;
use crate::sim::{SimulationState, TickInput, TickOutcome, tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Intro clip playing; gameplay input is ignored
    Intro,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// Every level is done; close the window
    Exit,
}

#[derive(Debug)]
pub struct App {
    pub phase: AppPhase,
    pub state: SimulationState,
}

impl App {
    pub fn new(session: LevelSession, settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Starting with seed {}", seed);

        let state = SimulationState::new(
            session,
            settings.tuning.clone().sanitized(),
            settings.viewport(),
            seed,
        );
        let phase = if settings.play_intro {
            AppPhase::Intro
        } else {
            AppPhase::Playing
        };
        Self { phase, state }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == AppPhase::Playing
    }

    /// Run one rendered frame and hand queued audio to `audio`
    pub fn frame(
        &mut self,
        input: &TickInput,
        dt: f32,
        audio: &mut dyn AudioSink,
    ) -> Result<FrameOutcome, LevelError> {
        let outcome = match self.phase {
            AppPhase::Intro => {
                // A click skips the intro but is not fired as a shot
                if input.intro_finished || !input.shots.is_empty() {
                    log::info!("Intro finished");
                    self.phase = AppPhase::Playing;
                }
                FrameOutcome::Continue
            }
            AppPhase::Playing => match tick(&mut self.state, input, dt)? {
                TickOutcome::Running => FrameOutcome::Continue,
                TickOutcome::Exhausted => {
                    log::info!("All levels complete");
                    FrameOutcome::Exit
                }
            },
        };

        if self.is_playing() {
            for cue in self.state.drain_cues() {
                audio.dispatch(&cue);
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCue, MusicCommand, RecordingAudio, SoundEffect};
    use crate::level::{LevelDef, MemoryLoader};
    use crate::sim::{Key, PlayerState};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn def(tiles: Vec<i32>) -> LevelDef {
        LevelDef {
            tiles,
            width: 3,
            music: "m.ogg".into(),
            max_goo: 2,
        }
    }

    fn app(play_intro: bool) -> App {
        let loader = MemoryLoader::new().with("a", def(vec![1, 1, 1, 0, -1, 0, 0, 0, 0]));
        let session = LevelSession::start(Box::new(loader), vec!["a".into()]).unwrap();
        let settings = Settings {
            play_intro,
            seed: Some(3),
            ..Default::default()
        };
        App::new(session, &settings)
    }

    #[test]
    fn test_intro_holds_input_until_finished() {
        let mut app = app(true);
        let mut audio = RecordingAudio::default();
        let idle = TickInput::with_keys(&[Key::Right]);

        for _ in 0..10 {
            app.frame(&idle, DT, &mut audio).unwrap();
        }
        assert_eq!(app.phase, AppPhase::Intro);
        assert_eq!(app.state.time_ticks, 0);
        assert!(audio.cues.is_empty());

        let done = TickInput {
            intro_finished: true,
            ..Default::default()
        };
        app.frame(&done, DT, &mut audio).unwrap();
        assert!(app.is_playing());
        assert_eq!(
            audio.cues,
            vec![AudioCue::Music(MusicCommand::Play {
                track: "m.ogg".into()
            })]
        );
    }

    #[test]
    fn test_click_skips_intro_without_shooting() {
        let mut app = app(true);
        let mut audio = RecordingAudio::default();
        let click = TickInput {
            shots: vec![Vec2::new(10.0, 10.0)],
            ..Default::default()
        };
        app.frame(&click, DT, &mut audio).unwrap();
        assert!(app.is_playing());
        assert_eq!(app.state.player.live_projectiles(), 0);
        assert_eq!(audio.count(SoundEffect::Shoot), 0);
    }

    #[test]
    fn test_no_intro_starts_playing() {
        let mut app = app(false);
        let mut audio = RecordingAudio::default();
        app.frame(&TickInput::default(), DT, &mut audio).unwrap();
        assert_eq!(app.state.time_ticks, 1);
        assert_eq!(audio.cues.len(), 1);
    }

    #[test]
    fn test_exit_after_last_level() {
        let mut app = app(false);
        let mut audio = RecordingAudio::default();
        app.state.player.finish();

        let space = TickInput::with_keys(&[Key::Action]);
        assert_eq!(
            app.frame(&space, DT, &mut audio).unwrap(),
            FrameOutcome::Exit
        );
        assert_eq!(app.state.player.state, PlayerState::Finished);
    }
}
