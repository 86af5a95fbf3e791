use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{Cell, Heading, Rect, Rgb, Seat};

/// How a cycle occupies the board.
///
/// `Point` is the classic one-cell marker. `Sprite` models a 5x5 icon that
/// probes ahead of its leading edge and lays its trail behind the icon. Both
/// expose the same contract (advance-candidate, probe set, trail cell), so
/// the tick engine is identical for either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Body {
    Point,
    Sprite,
}

impl Body {
    /// Half-extent of the 5x5 icon.
    const SPRITE_HALF: i32 = 2;

    /// Cells tested against the grid for a proposed move. Pure: never
    /// touches the grid itself.
    pub fn probe_cells(self, pos: Cell, heading: Heading) -> Vec<Cell> {
        match self {
            Body::Point => vec![pos.step(heading)],
            Body::Sprite => {
                // One cell past the leading edge, across the icon's width.
                let (dx, dy) = heading.delta();
                let ahead = Self::SPRITE_HALF + 1;
                let center = pos.offset(dx * ahead, dy * ahead);
                let (px, py) = heading.perpendicular();
                vec![
                    center.offset(-px, -py),
                    center,
                    center.offset(px, py),
                ]
            },
        }
    }

    /// The single cell committed to the grid when a move lands. Always lags
    /// the icon so the body's own footprint is never self-occupying.
    pub fn trail_cell(self, candidate: Cell, heading: Heading) -> Cell {
        match self {
            Body::Point => candidate,
            Body::Sprite => {
                let (dx, dy) = heading.delta();
                let behind = Self::SPRITE_HALF + 1;
                candidate.offset(-dx * behind, -dy * behind)
            },
        }
    }

    /// Drawn footprint centered on the position.
    pub fn footprint(self, pos: Cell) -> Rect {
        match self {
            Body::Point => Rect::new(pos.x, pos.y, 1, 1),
            Body::Sprite => {
                let h = Self::SPRITE_HALF;
                Rect::new(pos.x - h, pos.y - h, 5, 5)
            },
        }
    }

    /// Minimum distance a spawn position must keep from the border so that
    /// probe cells stay on the grid.
    pub fn spawn_clearance(self) -> i32 {
        match self {
            Body::Point => 1,
            Body::Sprite => Self::SPRITE_HALF + 1,
        }
    }
}

/// One player's cycle: position, heading, crashed flag, identity.
///
/// Mutated once per tick by the engine; frozen permanently once crashed.
#[derive(Debug, Clone)]
pub struct Player {
    pub seat: Seat,
    pub pos: Cell,
    pub heading: Heading,
    pub crashed: bool,
    pub color: Rgb,
    pub body: Body,
}

impl Player {
    pub fn new(seat: Seat, pos: Cell, heading: Heading, color: Rgb, body: Body) -> Self {
        Self {
            seat,
            pos,
            heading,
            crashed: false,
            color,
            body,
        }
    }

    /// Apply a direction intent. A reversal into the cycle's own tail is a
    /// defined no-op, not an error; anything else takes effect immediately,
    /// independent of the movement cadence. Returns whether the heading
    /// changed.
    pub fn set_heading(&mut self, heading: Heading) -> bool {
        if self.crashed {
            return false;
        }
        if heading == self.heading.reverse() {
            trace!(seat = self.seat.label(), ?heading, "self-reversal rejected");
            return false;
        }
        let changed = heading != self.heading;
        self.heading = heading;
        changed
    }

    /// The cell this cycle would move to this tick.
    pub fn advance_candidate(&self) -> Cell {
        self.pos.step(self.heading)
    }

    /// Collision probe set for the proposed move.
    pub fn probe_cells(&self) -> Vec<Cell> {
        self.body.probe_cells(self.pos, self.heading)
    }

    /// Trail cell to commit when the move to `candidate` lands.
    pub fn trail_cell(&self, candidate: Cell) -> Cell {
        self.body.trail_cell(candidate, self.heading)
    }

    /// Idempotent. The position freezes at the pre-crash cell.
    pub fn mark_crashed(&mut self) {
        self.crashed = true;
    }

    /// Reinitialize for a new round, keeping seat, color and body.
    pub fn reset(&mut self, pos: Cell, heading: Heading) {
        self.pos = pos;
        self.heading = heading;
        self.crashed = false;
    }
}
