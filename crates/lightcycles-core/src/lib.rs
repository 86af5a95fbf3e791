pub mod config;
pub mod engine;
pub mod grid;
pub mod player;
pub mod round;

use serde::{Deserialize, Serialize};

/// One of the two fixed player slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::One, Seat::Two];

    /// Index into per-seat arrays.
    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    pub fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Seat::One => "Player 1",
            Seat::Two => "Player 2",
        }
    }
}

/// Cardinal heading on the 2D grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Single-step displacement for this heading.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    /// The direct opposite heading. A cycle may never reverse into itself.
    pub fn reverse(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    /// Unit offset perpendicular to the direction of travel.
    pub fn perpendicular(self) -> (i32, i32) {
        let (dx, dy) = self.delta();
        (dy.abs(), dx.abs())
    }
}

/// A single grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Cell {
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// One step in the given heading.
    pub fn step(self, heading: Heading) -> Cell {
        let (dx, dy) = heading.delta();
        self.offset(dx, dy)
    }
}

/// RGB color sent to the frame sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Axis-aligned rectangle, top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Result of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    InProgress,
    Winner(Seat),
    Tie,
}

impl RoundOutcome {
    pub fn is_terminal(self) -> bool {
        self != RoundOutcome::InProgress
    }
}

/// Non-blocking source of direction intents, one per seat.
///
/// Implementations must return immediately: absence of input is a valid
/// outcome, not an error. A transiently unavailable device reports
/// "no intent this tick" rather than failing.
pub trait InputSource {
    /// Latest buffered intent for the seat, if any. Consumes the intent.
    fn poll_intent(&mut self, seat: Seat) -> Option<Heading>;

    /// Whether the front end asked to terminate the outer round loop.
    /// The game itself has no quit concept; this exists so scoped resources
    /// (raw terminal mode) can unwind cleanly.
    fn quit_requested(&mut self) -> bool {
        false
    }
}

/// Fire-and-forget pixel output. In the reference deployment this is an LED
/// matrix panel; tests record the calls instead. Coordinates may spill past
/// the visible panel (crash rings near a wall); implementations clip.
pub trait FrameSink {
    fn clear(&mut self);
    fn draw_cell(&mut self, cell: Cell, color: Rgb);
    fn draw_region(&mut self, rect: Rect, color: Rgb);
    fn draw_text(&mut self, text: &str, color: Rgb);
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::collections::VecDeque;

    use crate::{Cell, FrameSink, Heading, InputSource, Rect, Rgb, Seat};

    /// Input source that replays a fixed per-seat script, one entry per poll.
    /// Once a script runs out the seat reports no input, and once both are
    /// exhausted the source requests quit so round loops terminate in tests.
    pub struct ScriptedInput {
        scripts: [VecDeque<Option<Heading>>; 2],
    }

    impl ScriptedInput {
        pub fn new(
            seat_one: impl IntoIterator<Item = Option<Heading>>,
            seat_two: impl IntoIterator<Item = Option<Heading>>,
        ) -> Self {
            Self {
                scripts: [
                    seat_one.into_iter().collect(),
                    seat_two.into_iter().collect(),
                ],
            }
        }

        /// A source that never produces input and immediately requests quit.
        pub fn empty() -> Self {
            Self::new([], [])
        }
    }

    impl InputSource for ScriptedInput {
        fn poll_intent(&mut self, seat: Seat) -> Option<Heading> {
            self.scripts[seat.index()].pop_front().flatten()
        }

        fn quit_requested(&mut self) -> bool {
            self.scripts.iter().all(VecDeque::is_empty)
        }
    }

    /// Frame sink that records every call for assertions.
    #[derive(Default)]
    pub struct RecordingSink {
        pub cells: Vec<(Cell, Rgb)>,
        pub regions: Vec<(Rect, Rgb)>,
        pub texts: Vec<String>,
        pub clears: usize,
    }

    impl FrameSink for RecordingSink {
        fn clear(&mut self) {
            self.clears += 1;
        }

        fn draw_cell(&mut self, cell: Cell, color: Rgb) {
            self.cells.push((cell, color));
        }

        fn draw_region(&mut self, rect: Rect, color: Rgb) {
            self.regions.push((rect, color));
        }

        fn draw_text(&mut self, text: &str, color: Rgb) {
            self.texts.push(text.to_string());
        }
    }

    /// Sink that discards everything, for tests that only care about logic.
    pub struct NullSink;

    impl FrameSink for NullSink {
        fn clear(&mut self) {}
        fn draw_cell(&mut self, _cell: Cell, _color: Rgb) {}
        fn draw_region(&mut self, _rect: Rect, _color: Rgb) {}
        fn draw_text(&mut self, _text: &str, _color: Rgb) {}
    }
}
