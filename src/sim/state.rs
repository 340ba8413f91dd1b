//! Simulation state
//!
//! Everything one tick reads or writes lives in `SimulationState`, which is
//! passed explicitly to `tick`. There is no other mutable world state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::player::Player;
use crate::audio::{AudioCue, MusicCommand};
use crate::level::{Level, LevelSession};
use crate::tuning::Tuning;
use crate::{camera_offset, world_to_screen};

/// Message shown over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Died,
    LevelComplete,
    GameWon,
}

impl Overlay {
    pub fn text(self) -> Option<&'static str> {
        match self {
            Overlay::None => None,
            Overlay::Died => Some("YOU DIED. PRESS SPACE"),
            Overlay::LevelComplete => Some("Weeeee, press space for next level"),
            Overlay::GameWon => Some("You won the game ^_^"),
        }
    }
}

/// Complete world state
#[derive(Debug)]
pub struct SimulationState {
    pub session: LevelSession,
    pub player: Player,
    /// Camera offset, recomputed from the player every tick
    pub offset: Vec2,
    pub viewport: Vec2,
    pub tuning: Tuning,
    pub overlay: Overlay,
    /// Last known pointer position in screen space
    pub pointer: Option<Vec2>,
    /// Audio cues queued since the last drain
    pub cues: Vec<AudioCue>,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl SimulationState {
    /// Create a new state on the session's current level
    pub fn new(session: LevelSession, tuning: Tuning, viewport: Vec2, seed: u64) -> Self {
        let player = Player::spawn(session.level().grid());
        let mut state = Self {
            session,
            player,
            offset: Vec2::ZERO,
            viewport,
            tuning,
            overlay: Overlay::None,
            pointer: None,
            cues: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.start_player();
        state
    }

    #[inline]
    pub fn level(&self) -> &Level {
        self.session.level()
    }

    /// Fresh player on the current level: restarts the music, clears the
    /// overlay and refills the magazine.
    pub fn start_player(&mut self) {
        self.player = Player::spawn(self.session.level().grid());
        self.overlay = Overlay::None;
        self.offset = Vec2::ZERO;
        self.cues.push(AudioCue::Music(MusicCommand::Play {
            track: self.session.level().music.clone(),
        }));
        log::info!(
            "Player spawned on '{}' at {:?}",
            self.session.level().name,
            self.player.pos
        );
    }

    /// Player position relative to the camera
    pub fn player_screen_pos(&self) -> Vec2 {
        world_to_screen(self.player.pos, self.offset)
    }

    pub fn update_offset(&mut self) {
        self.offset = camera_offset(self.player.pos, self.viewport);
    }

    /// Fraction of goo left in the magazine
    pub fn ammo_fraction(&self) -> f32 {
        self.player.ammo_fraction(self.level().max_goo)
    }

    /// Take all queued audio cues
    pub fn drain_cues(&mut self) -> Vec<AudioCue> {
        std::mem::take(&mut self.cues)
    }
}
