use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::engine::TickEngine;
use crate::grid::Grid;
use crate::player::{Body, Player};
use crate::{Cell, FrameSink, InputSource, Rect, Rgb, RoundOutcome, Seat};

/// Lifecycle phase of the controller, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Idle,
    Countdown,
    Playing,
    Outcome,
}

/// Owns the grid and both players, and drives the tick engine through the
/// Idle -> Countdown -> Playing -> Outcome loop against a frame sink.
/// Everything is reset between rounds; nothing is process-global.
pub struct RoundController {
    config: GameConfig,
    grid: Grid,
    players: [Player; 2],
}

impl RoundController {
    pub fn new(config: GameConfig) -> Self {
        assert!(
            config.spawn_margin >= config.body.spawn_clearance(),
            "spawn margin {} too small for {:?} body (needs {})",
            config.spawn_margin,
            config.body,
            config.body.spawn_clearance()
        );
        let grid = Grid::new(config.width(), config.height());
        let players = Seat::BOTH.map(|seat| {
            let (pos, heading) = config.spawn(seat);
            Player::new(seat, pos, heading, config.seat_color(seat), config.body)
        });
        Self {
            config,
            grid,
            players,
        }
    }

    /// Run rounds until the input source requests quit. The game itself
    /// never terminates; the quit hook exists for the front end's sake.
    pub fn run(&mut self, input: &mut dyn InputSource, sink: &mut dyn FrameSink) {
        loop {
            if !self.wait_for_start(input, sink) {
                break;
            }
            self.countdown(sink);
            let Some(outcome) = self.play(input, sink) else {
                break;
            };
            self.show_outcome(outcome, sink);
        }
        info!("round loop stopped");
    }

    /// Idle: hold the controls banner until either seat sends a direction.
    fn wait_for_start(&mut self, input: &mut dyn InputSource, sink: &mut dyn FrameSink) -> bool {
        debug!(phase = ?RoundPhase::Idle, "awaiting start");
        sink.clear();
        sink.draw_text(
            "P1: i j k l\nP2: w a s d\nany direction\nto start",
            self.config.wall_color,
        );
        loop {
            if input.quit_requested() {
                return false;
            }
            if Seat::BOTH
                .iter()
                .any(|&seat| input.poll_intent(seat).is_some())
            {
                return true;
            }
            thread::sleep(self.config.input_poll());
        }
    }

    /// Fixed banner sequence with fixed display durations.
    fn countdown(&mut self, sink: &mut dyn FrameSink) {
        debug!(phase = ?RoundPhase::Countdown, "counting down");
        let ready = self.config.ready_hold_ms;
        let count = self.config.count_hold_ms;
        for (text, hold_ms) in [
            ("Get Ready", ready),
            ("3", count),
            ("2", count),
            ("1", count),
            ("GO!!!", count),
        ] {
            sink.clear();
            sink.draw_text(text, self.config.wall_color);
            thread::sleep(Duration::from_millis(hold_ms));
        }
    }

    /// Fresh field: free interior, walled border, players back at spawn with
    /// their spawn cells occupied and drawn.
    fn reset_round(&mut self, sink: &mut dyn FrameSink) {
        self.grid.reset();
        sink.clear();
        let w = self.grid.width();
        let h = self.grid.height();
        let wall = self.config.wall_color;
        sink.draw_region(Rect::new(0, 0, w as u32, 1), wall);
        sink.draw_region(Rect::new(0, h - 1, w as u32, 1), wall);
        sink.draw_region(Rect::new(0, 0, 1, h as u32), wall);
        sink.draw_region(Rect::new(w - 1, 0, 1, h as u32), wall);

        for seat in Seat::BOTH {
            let (pos, heading) = self.config.spawn(seat);
            let player = &mut self.players[seat.index()];
            player.reset(pos, heading);
            self.grid.occupy(pos);
            sink.draw_cell(pos, player.color);
            if player.body != Body::Point {
                sink.draw_region(player.body.footprint(pos), player.color);
            }
        }
    }

    /// Playing: poll input every iteration, step the engine on the fixed
    /// cadence, until the round is decided. Returns None on quit.
    fn play(
        &mut self,
        input: &mut dyn InputSource,
        sink: &mut dyn FrameSink,
    ) -> Option<RoundOutcome> {
        debug!(phase = ?RoundPhase::Playing, "round started");
        self.reset_round(sink);
        let mut engine = TickEngine::new();
        let mut last_step = Instant::now();
        loop {
            // Sample: at most one pending intent per seat, applied
            // immediately. Input runs every iteration; movement does not.
            for seat in Seat::BOTH {
                if let Some(heading) = input.poll_intent(seat) {
                    engine.apply_intent(&mut self.players, seat, heading);
                }
            }
            // Movement stays on the fixed cadence. A heading-only change
            // never forces an extra step.
            if last_step.elapsed() >= self.config.tick_interval() {
                let outcome = engine.step(&mut self.grid, &mut self.players, sink);
                last_step = Instant::now();
                if outcome.is_terminal() {
                    return Some(outcome);
                }
            }
            if input.quit_requested() {
                return None;
            }
            thread::sleep(self.config.input_poll());
        }
    }

    /// Outcome: crash animation at the losing cell(s), then a result banner.
    fn show_outcome(&mut self, outcome: RoundOutcome, sink: &mut dyn FrameSink) {
        debug!(phase = ?RoundPhase::Outcome, ?outcome, "round over");
        self.crash_animation(sink);
        let (text, color) = match outcome {
            RoundOutcome::Winner(seat) => (
                format!("{}\nWins!", seat.label()),
                self.config.seat_color(seat),
            ),
            RoundOutcome::Tie => ("TIE!".to_string(), self.config.wall_color),
            RoundOutcome::InProgress => return,
        };
        sink.clear();
        sink.draw_text(&text, color);
        thread::sleep(Duration::from_millis(self.config.result_hold_ms));
    }

    /// Expanding rings centered on each crashed cycle's frozen cell. Sinks
    /// clip anything that spills past the panel edge.
    fn crash_animation(&mut self, sink: &mut dyn FrameSink) {
        let crashed: Vec<Cell> = self
            .players
            .iter()
            .filter(|p| p.crashed)
            .map(|p| p.pos)
            .collect();
        for size in (3..13).step_by(2) {
            for &center in &crashed {
                self.ring(sink, center, size);
            }
            thread::sleep(Duration::from_millis(self.config.crash_frame_ms));
        }
    }

    fn ring(&self, sink: &mut dyn FrameSink, center: Cell, size: i32) {
        let half = (size - 1) / 2;
        let x = center.x - half;
        let y = center.y - half;
        let s = size as u32;
        sink.draw_region(Rect::new(x, y, s, s), Rgb::WHITE);
        let outline = self.config.wall_color;
        sink.draw_region(Rect::new(x, y, s, 1), outline);
        sink.draw_region(Rect::new(x, y + size - 1, s, 1), outline);
        sink.draw_region(Rect::new(x, y, 1, s), outline);
        sink.draw_region(Rect::new(x + size - 1, y, 1, s), outline);
    }
}
