//! Game session: one cave plus the run's phase and clock
//!
//! The physics layer owns the flying object; each tick it hands over the
//! object's collision points and the session decides whether the run goes on.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::cave::{Cave, PointState};
use crate::config::GameConfig;
use crate::error::CaveError;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Flying
    InGame,
    /// Hit a wall
    GameOver,
    /// Reached the goal quad
    Won,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub config: GameConfig,
    pub cave: Cave,
    pub phase: GamePhase,
    /// Seconds spent in the current run
    pub time: f64,
}

impl Session {
    /// Start a session with a freshly generated cave
    pub fn new(config: GameConfig) -> Result<Self, CaveError> {
        let cave = Cave::from_game_config(&config)?;
        Ok(Self {
            config,
            cave,
            phase: GamePhase::InGame,
            time: 0.0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    /// Where the object (re)spawns
    pub fn spawn_location(&self) -> DVec2 {
        self.cave.spawn_location()
    }

    /// Advance by `dt` seconds, checking `collision_points` in order.
    ///
    /// The first point that crashes or finishes decides the outcome; later
    /// points are not looked at. Does nothing once the run has ended.
    pub fn tick(&mut self, dt: f64, collision_points: &[DVec2]) -> GamePhase {
        if self.phase != GamePhase::InGame {
            return self.phase;
        }
        self.time += dt;

        for &p in collision_points {
            match self.cave.get_point_state(p) {
                PointState::Inside => {}
                PointState::Crash => {
                    log::info!("Crashed after {:.2}s at {:.0}%", self.time, self.cave.progress() * 100.0);
                    self.phase = GamePhase::GameOver;
                    break;
                }
                PointState::Finish => {
                    log::info!("Reached the goal in {:.2}s", self.time);
                    self.phase = GamePhase::Won;
                    break;
                }
            }
        }
        self.phase
    }

    /// Restart the run in the same cave
    pub fn reset(&mut self) {
        self.cave.reset();
        self.phase = GamePhase::InGame;
        self.time = 0.0;
    }

    /// Replace the cave with a fresh one for `seed` and restart
    pub fn new_cave(&mut self, seed: u64) -> Result<(), CaveError> {
        let config = GameConfig { seed, ..self.config.clone() };
        self.cave = Cave::from_game_config(&config)?;
        self.config = config;
        self.reset();
        Ok(())
    }
}
