use tracing::{debug, info};

use crate::grid::Grid;
use crate::player::{Body, Player};
use crate::{Cell, FrameSink, Heading, RoundOutcome, Seat};

/// Per-tick movement and collision resolution for both cycles.
///
/// The engine does not own the grid or the players; the round controller
/// does, and passes them in. One `step()` is one tick: propose both moves,
/// resolve both collisions against the grid as it stood at the start of the
/// tick, then commit the survivors. Collisions are personal: a cell one
/// player enters this tick cannot crash the other player until the next
/// tick. The engine is terminal once the outcome leaves `InProgress`.
pub struct TickEngine {
    tick: u64,
    outcome: RoundOutcome,
}

impl TickEngine {
    pub fn new() -> Self {
        Self {
            tick: 0,
            outcome: RoundOutcome::InProgress,
        }
    }

    /// Ticks executed so far this round.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    /// Apply a sampled direction intent to one seat. Runs on every input
    /// poll, which may be far more often than movement steps. Returns
    /// whether the heading actually changed.
    pub fn apply_intent(
        &mut self,
        players: &mut [Player; 2],
        seat: Seat,
        heading: Heading,
    ) -> bool {
        if self.outcome.is_terminal() {
            return false;
        }
        players[seat.index()].set_heading(heading)
    }

    /// Execute one movement tick. No-op once the round is decided.
    pub fn step(
        &mut self,
        grid: &mut Grid,
        players: &mut [Player; 2],
        sink: &mut dyn FrameSink,
    ) -> RoundOutcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }
        self.tick += 1;

        // Propose and resolve against the pre-tick grid. Nothing is
        // committed until both players have been tested.
        let mut landed: [Option<Cell>; 2] = [None, None];
        let mut crashed_now = [false; 2];
        for (i, player) in players.iter().enumerate() {
            let blocked = player.probe_cells().iter().any(|&c| grid.is_blocked(c));
            if blocked {
                crashed_now[i] = true;
            } else {
                landed[i] = Some(player.advance_candidate());
            }
        }

        // Commit survivors: lay the trail cell, move, render.
        for (i, player) in players.iter_mut().enumerate() {
            if crashed_now[i] {
                player.mark_crashed();
                info!(
                    seat = player.seat.label(),
                    x = player.pos.x,
                    y = player.pos.y,
                    tick = self.tick,
                    "cycle crashed"
                );
                continue;
            }
            let candidate = landed[i].expect("non-crashed player must have a landing cell");
            let trail = player.trail_cell(candidate);
            grid.occupy(trail);
            player.pos = candidate;
            sink.draw_cell(trail, player.color);
            if player.body != Body::Point {
                sink.draw_region(player.body.footprint(candidate), player.color);
            }
        }

        self.outcome = match crashed_now {
            [true, true] => RoundOutcome::Tie,
            [true, false] => RoundOutcome::Winner(Seat::Two),
            [false, true] => RoundOutcome::Winner(Seat::One),
            [false, false] => RoundOutcome::InProgress,
        };
        if self.outcome.is_terminal() {
            info!(outcome = ?self.outcome, tick = self.tick, "round decided");
        } else {
            debug!(tick = self.tick, "tick committed");
        }
        self.outcome
    }
}

impl Default for TickEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{NullSink, RecordingSink};
    use crate::Rgb;

    /// Grid plus both players with their spawn cells already occupied, the
    /// way the round controller sets a round up.
    fn arena(
        size: i32,
        p1: (Cell, Heading),
        p2: (Cell, Heading),
        body: Body,
    ) -> (Grid, [Player; 2]) {
        let mut grid = Grid::new(size, size);
        let players = [
            Player::new(Seat::One, p1.0, p1.1, Rgb::GREEN, body),
            Player::new(Seat::Two, p2.0, p2.1, Rgb::BLUE, body),
        ];
        grid.occupy(p1.0);
        grid.occupy(p2.0);
        (grid, players)
    }

    #[test]
    fn straight_cycles_advance_without_crashing() {
        let (mut grid, mut players) = arena(
            8,
            (Cell::new(4, 1), Heading::Down),
            (Cell::new(4, 6), Heading::Up),
            Body::Point,
        );
        let mut engine = TickEngine::new();
        let outcome = engine.step(&mut grid, &mut players, &mut NullSink);
        assert_eq!(outcome, RoundOutcome::InProgress);
        assert_eq!(players[0].pos, Cell::new(4, 2));
        assert_eq!(players[1].pos, Cell::new(4, 5));
        assert!(grid.is_blocked(Cell::new(4, 2)));
        assert!(grid.is_blocked(Cell::new(4, 5)));
    }

    #[test]
    fn heading_into_a_border_wall_crashes_on_the_first_tick() {
        let (mut grid, mut players) = arena(
            8,
            (Cell::new(4, 1), Heading::Up),
            (Cell::new(4, 6), Heading::Up),
            Body::Point,
        );
        let mut engine = TickEngine::new();
        let outcome = engine.step(&mut grid, &mut players, &mut NullSink);
        assert_eq!(outcome, RoundOutcome::Winner(Seat::Two));
        assert!(players[0].crashed);
        assert_eq!(players[0].pos, Cell::new(4, 1), "crash freezes position");
        assert!(!players[1].crashed);
    }

    #[test]
    fn both_blocked_same_tick_is_a_tie() {
        // Head-on, one cell apart: each candidate is the other's occupied cell.
        let (mut grid, mut players) = arena(
            8,
            (Cell::new(4, 3), Heading::Down),
            (Cell::new(4, 4), Heading::Up),
            Body::Point,
        );
        let mut engine = TickEngine::new();
        let outcome = engine.step(&mut grid, &mut players, &mut NullSink);
        assert_eq!(outcome, RoundOutcome::Tie);
        assert!(players[0].crashed && players[1].crashed);
    }

    #[test]
    fn commit_of_one_player_cannot_crash_the_other_same_tick() {
        // Both enter (4,3) this tick. The cell is free in the pre-tick
        // snapshot, so neither crashes; sequential commit would have killed
        // whichever player resolved second.
        let (mut grid, mut players) = arena(
            8,
            (Cell::new(3, 3), Heading::Right),
            (Cell::new(4, 4), Heading::Up),
            Body::Point,
        );
        let mut engine = TickEngine::new();
        let outcome = engine.step(&mut grid, &mut players, &mut NullSink);
        assert_eq!(outcome, RoundOutcome::InProgress);
        assert_eq!(players[0].pos, Cell::new(4, 3));
        assert_eq!(players[1].pos, Cell::new(4, 3));
        // Next tick both run into occupied cells laid this tick.
    }

    #[test]
    fn trail_laid_last_tick_blocks_this_tick() {
        let (mut grid, mut players) = arena(
            8,
            (Cell::new(2, 2), Heading::Right),
            (Cell::new(3, 4), Heading::Up),
            Body::Point,
        );
        let mut engine = TickEngine::new();
        // Tick 1: P1 enters (3,2); P2 enters (3,3).
        assert_eq!(
            engine.step(&mut grid, &mut players, &mut NullSink),
            RoundOutcome::InProgress
        );
        // Tick 2: P2 runs into (3,2), laid by P1 on tick 1.
        let outcome = engine.step(&mut grid, &mut players, &mut NullSink);
        assert_eq!(outcome, RoundOutcome::Winner(Seat::One));
    }

    #[test]
    fn terminal_engine_ignores_steps_and_intents() {
        let (mut grid, mut players) = arena(
            8,
            (Cell::new(4, 1), Heading::Up),
            (Cell::new(4, 6), Heading::Up),
            Body::Point,
        );
        let mut engine = TickEngine::new();
        let outcome = engine.step(&mut grid, &mut players, &mut NullSink);
        assert!(outcome.is_terminal());
        let tick = engine.tick();
        let frozen = players[1].pos;

        assert!(!engine.apply_intent(&mut players, Seat::Two, Heading::Left));
        assert_eq!(
            engine.step(&mut grid, &mut players, &mut NullSink),
            outcome
        );
        assert_eq!(engine.tick(), tick, "terminal engine must not tick");
        assert_eq!(players[1].pos, frozen);
    }

    #[test]
    fn reversal_intent_is_rejected_through_the_engine() {
        let (_, mut players) = arena(
            8,
            (Cell::new(4, 1), Heading::Down),
            (Cell::new(4, 6), Heading::Up),
            Body::Point,
        );
        let mut engine = TickEngine::new();
        assert!(!engine.apply_intent(&mut players, Seat::One, Heading::Up));
        assert_eq!(players[0].heading, Heading::Down);
        assert!(engine.apply_intent(&mut players, Seat::One, Heading::Left));
    }

    #[test]
    fn commits_draw_trail_cells_in_the_player_color() {
        let (mut grid, mut players) = arena(
            8,
            (Cell::new(4, 1), Heading::Down),
            (Cell::new(4, 6), Heading::Up),
            Body::Point,
        );
        let mut engine = TickEngine::new();
        let mut sink = RecordingSink::default();
        engine.step(&mut grid, &mut players, &mut sink);
        assert!(sink.cells.contains(&(Cell::new(4, 2), Rgb::GREEN)));
        assert!(sink.cells.contains(&(Cell::new(4, 5), Rgb::BLUE)));
    }

    #[test]
    fn sprite_cycle_crashes_when_its_probes_reach_the_wall() {
        let (mut grid, mut players) = arena(
            16,
            (Cell::new(8, 8), Heading::Right),
            (Cell::new(4, 4), Heading::Down),
            Body::Sprite,
        );
        let mut engine = TickEngine::new();
        // Probes run 3 cells ahead of the icon center; the right wall is at
        // x=15, so the crash lands when the center reaches x=12.
        for _ in 0..4 {
            assert_eq!(
                engine.step(&mut grid, &mut players, &mut NullSink),
                RoundOutcome::InProgress
            );
        }
        assert_eq!(players[0].pos, Cell::new(12, 8));
        let outcome = engine.step(&mut grid, &mut players, &mut NullSink);
        assert!(players[0].crashed);
        assert_eq!(outcome, RoundOutcome::Winner(Seat::Two));
    }

    #[test]
    fn sprite_trail_commits_lag_the_icon() {
        let (mut grid, mut players) = arena(
            16,
            (Cell::new(8, 8), Heading::Right),
            (Cell::new(4, 4), Heading::Down),
            Body::Sprite,
        );
        let mut engine = TickEngine::new();
        engine.step(&mut grid, &mut players, &mut NullSink);
        engine.step(&mut grid, &mut players, &mut NullSink);
        // Centers entered x=9 and x=10; trails landed 3 behind, at 6 and 7.
        assert!(grid.is_blocked(Cell::new(6, 8)));
        assert!(grid.is_blocked(Cell::new(7, 8)));
        assert!(!grid.is_blocked(Cell::new(10, 8)), "icon cell is not trail");
    }

    #[test]
    fn probe_does_not_mutate_the_grid() {
        let (mut grid, mut players) = arena(
            8,
            (Cell::new(4, 1), Heading::Up),
            (Cell::new(4, 6), Heading::Up),
            Body::Point,
        );
        let before = grid.clone();
        let mut engine = TickEngine::new();
        engine.step(&mut grid, &mut players, &mut NullSink);
        // P1 crashed: its probe cell (the wall) and candidate must be
        // untouched, only P2's trail commit changed the grid.
        assert_eq!(before.is_blocked(Cell::new(4, 0)), grid.is_blocked(Cell::new(4, 0)));
        assert!(!grid.is_blocked(Cell::new(4, 2)));
        assert!(grid.is_blocked(Cell::new(4, 5)));
    }
}
