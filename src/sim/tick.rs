//! Variable-step simulation tick
//!
//! One call per rendered frame with the elapsed time since the previous
//! frame. All integration is `value += rate * dt`, so results depend on the
//! frame rate.

use std::collections::HashSet;

use glam::Vec2;

use super::player::PlayerState;
use super::state::{Overlay, SimulationState};
use crate::audio::{AudioCue, MusicCommand, SoundEffect};
use crate::level::{Advance, LevelError};

/// Keys the simulation cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Walk left (A)
    Left,
    /// Walk right (D)
    Right,
    /// Respawn / next level (Space)
    Action,
}

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keys currently held
    pub held: HashSet<Key>,
    /// Pointer moved to this screen position
    pub pointer: Option<Vec2>,
    /// Shoot presses since the last tick, in screen coordinates
    pub shots: Vec<Vec2>,
    /// The intro clip reported end-of-stream
    pub intro_finished: bool,
}

impl TickInput {
    pub fn with_keys(keys: &[Key]) -> Self {
        Self {
            held: keys.iter().copied().collect(),
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// -1 for left, 1 for right, 0 for neither. Left wins when both are held.
    pub fn horizontal(&self) -> f32 {
        if self.is_held(Key::Left) {
            -1.0
        } else if self.is_held(Key::Right) {
            1.0
        } else {
            0.0
        }
    }
}

/// Whether the session keeps running after this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// Advanced past the last level
    Exhausted,
}

/// Fire a goo at a screen-space target. Returns false when nothing was fired.
pub fn shoot(state: &mut SimulationState, target: Vec2) -> bool {
    let screen_pos = state.player_screen_pos();
    let max_goo = state.level().max_goo;
    if !state.player.shoot(target, screen_pos, max_goo) {
        return false;
    }
    state.cues.push(AudioCue::Sound(SoundEffect::Shoot));
    log::debug!(
        "Shot {}/{} towards {:?}",
        state.player.live_projectiles(),
        max_goo,
        target
    );
    true
}

/// Advance the game state by `dt` seconds
pub fn tick(
    state: &mut SimulationState,
    input: &TickInput,
    dt: f32,
) -> Result<TickOutcome, LevelError> {
    state.time_ticks += 1;

    if let Some(pointer) = input.pointer {
        state.pointer = Some(pointer);
    }
    for &target in &input.shots {
        shoot(state, target);
    }

    state
        .session
        .animate_tiles(state.tuning.tile_frame_secs, dt);

    match state.player.state {
        PlayerState::Dead => {
            if input.is_held(Key::Action) {
                log::info!("Respawning on '{}'", state.level().name);
                state.start_player();
                return Ok(TickOutcome::Running);
            }

            state.player.fall_dead(&state.tuning, dt);
            state.update_offset();
            let SimulationState {
                player,
                session,
                tuning,
                cues,
                ..
            } = state;
            player.update_projectiles(session.level().grid(), tuning, dt, false, cues);
        }

        PlayerState::Finished => {
            if input.is_held(Key::Action) {
                return match state.session.advance()? {
                    Advance::Exhausted => Ok(TickOutcome::Exhausted),
                    Advance::Loaded => {
                        state.start_player();
                        Ok(TickOutcome::Running)
                    }
                };
            }
            state.player.spin(&state.tuning, dt);
        }

        PlayerState::Normal => step_normal(state, input, dt),
    }

    Ok(TickOutcome::Running)
}

fn step_normal(state: &mut SimulationState, input: &TickInput, dt: f32) {
    let SimulationState {
        session,
        player,
        tuning,
        cues,
        rng,
        overlay,
        ..
    } = state;
    let grid = session.level().grid();

    player.steer(input.horizontal(), tuning, dt);
    let contacts = player.integrate(grid, tuning, dt);

    if contacts.died {
        player.die(tuning, rng);
        *overlay = Overlay::Died;
        cues.push(AudioCue::Music(MusicCommand::Pause));
        cues.push(AudioCue::Sound(SoundEffect::Death));
        log::info!("Player died at {:?}", player.pos);
    } else if contacts.finished {
        player.finish();
        *overlay = if session.has_next() {
            Overlay::LevelComplete
        } else {
            Overlay::GameWon
        };
        cues.push(AudioCue::Music(MusicCommand::Pause));
        cues.push(AudioCue::Sound(SoundEffect::Finished));
        log::info!("Level '{}' complete", session.level().name);
    } else {
        player.animate(tuning, dt);
    }

    state.update_offset();
    let screen_x = state.player_screen_pos().x;
    if let Some(pointer) = state.pointer {
        state.player.flip_x = pointer.x < screen_x;
    }

    let bounce = state.player.state == PlayerState::Normal;
    let SimulationState {
        session,
        player,
        tuning,
        cues,
        ..
    } = state;
    player.update_projectiles(session.level().grid(), tuning, dt, bounce, cues);
}
