use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::player::Body;
use crate::{Cell, Heading, Rgb, Seat};

/// Data-driven configuration for the game.
///
/// Grid dimensions come from the physical panel layout: a chain of
/// `panel_cols` x `panel_rows` matrices, `chain_length` wide and `parallel`
/// high.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Rows on a single matrix panel.
    pub panel_rows: i32,
    /// Columns on a single matrix panel.
    pub panel_cols: i32,
    /// Panels chained horizontally.
    pub chain_length: i32,
    /// Panels stacked vertically.
    pub parallel: i32,
    /// Movement cadence: time between movement steps.
    pub tick_interval_ms: u64,
    /// Sleep between input polls inside the tick loop.
    pub input_poll_ms: u64,
    /// Distance of the spawn rows from the top/bottom walls.
    pub spawn_margin: i32,
    /// Body strategy for both players.
    pub body: Body,
    /// Hold time for the "Get Ready" banner.
    pub ready_hold_ms: u64,
    /// Hold time for each countdown number and "GO!!!".
    pub count_hold_ms: u64,
    /// Hold time for the result banner.
    pub result_hold_ms: u64,
    /// Hold time per crash animation frame.
    pub crash_frame_ms: u64,
    pub player1_color: Rgb,
    pub player2_color: Rgb,
    pub wall_color: Rgb,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            panel_rows: 64,
            panel_cols: 64,
            chain_length: 1,
            parallel: 1,
            tick_interval_ms: 140,
            input_poll_ms: 5,
            spawn_margin: 5,
            body: Body::Point,
            ready_hold_ms: 3000,
            count_hold_ms: 1000,
            result_hold_ms: 3000,
            crash_frame_ms: 100,
            player1_color: Rgb::GREEN,
            player2_color: Rgb::BLUE,
            wall_color: Rgb::RED,
        }
    }
}

impl GameConfig {
    /// Load config from an explicit path, the environment, or
    /// `config/lightcycles.toml`, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        if let Some(path) = path
            && let Ok(contents) = std::fs::read_to_string(path)
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        if let Ok(path) = std::env::var("LIGHTCYCLES_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        if let Ok(contents) = std::fs::read_to_string("config/lightcycles.toml")
            && let Ok(config) = toml::from_str::<Self>(&contents)
        {
            return config;
        }
        Self::default()
    }

    /// Full board width across the panel chain.
    pub fn width(&self) -> i32 {
        self.panel_cols * self.chain_length
    }

    /// Full board height across stacked panels.
    pub fn height(&self) -> i32 {
        self.panel_rows * self.parallel
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn input_poll(&self) -> Duration {
        Duration::from_millis(self.input_poll_ms)
    }

    /// Spawn position and initial heading for a seat: player 1 top-middle
    /// facing down, player 2 bottom-middle facing up.
    pub fn spawn(&self, seat: Seat) -> (Cell, Heading) {
        let x = self.width() / 2;
        match seat {
            Seat::One => (Cell::new(x, self.spawn_margin), Heading::Down),
            Seat::Two => (
                Cell::new(x, self.height() - 1 - self.spawn_margin),
                Heading::Up,
            ),
        }
    }

    pub fn seat_color(&self, seat: Seat) -> Rgb {
        match seat {
            Seat::One => self.player1_color,
            Seat::Two => self.player2_color,
        }
    }
}
