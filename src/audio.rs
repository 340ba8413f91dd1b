//! Audio cues emitted by the simulation
//!
//! The simulation never talks to an audio device. It queues `AudioCue`s on
//! the simulation state and the frame driver hands them to an `AudioSink`,
//! fire-and-forget.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Goo fired
    Shoot,
    /// Player launched off a splat
    Bounce,
    /// Goo stuck to terrain
    Splat,
    /// Player landed in lava
    Death,
    /// Player reached the princess
    Finished,
}

impl SoundEffect {
    /// Asset file name the presentation layer is expected to provide
    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Shoot => "shoot.wav",
            SoundEffect::Bounce => "bounce.wav",
            SoundEffect::Splat => "splat.wav",
            SoundEffect::Death => "death.wav",
            SoundEffect::Finished => "finished.wav",
        }
    }
}

/// Background music control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MusicCommand {
    /// Queue `track`, rewind and start it (looping)
    Play { track: String },
    Pause,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCue {
    Sound(SoundEffect),
    Music(MusicCommand),
}

/// Receiver for audio cues. Implementations must not block.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    fn music(&mut self, command: &MusicCommand);

    fn dispatch(&mut self, cue: &AudioCue) {
        match cue {
            AudioCue::Sound(effect) => self.play(*effect),
            AudioCue::Music(command) => self.music(command),
        }
    }
}

/// Sink that only logs, used when no audio backend is linked
#[derive(Debug, Clone)]
pub struct LogAudio {
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl LogAudio {
    pub fn new(settings: &Settings) -> Self {
        Self {
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            muted: false,
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        if self.muted || self.sfx_volume <= 0.0 {
            return;
        }
        log::debug!("sfx {} @ {:.2}", effect.file_name(), self.sfx_volume);
    }

    fn music(&mut self, command: &MusicCommand) {
        match command {
            MusicCommand::Play { track } if !self.muted => {
                log::info!("Music: {} @ {:.2}", track, self.music_volume)
            }
            MusicCommand::Play { .. } => {}
            MusicCommand::Pause => log::info!("Music paused"),
        }
    }
}

/// Sink that records every cue, for tests and replays
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub cues: Vec<AudioCue>,
}

impl RecordingAudio {
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.cues
            .iter()
            .filter(|c| **c == AudioCue::Sound(effect))
            .count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.cues.push(AudioCue::Sound(effect));
    }

    fn music(&mut self, command: &MusicCommand) {
        self.cues.push(AudioCue::Music(command.clone()));
    }
}
