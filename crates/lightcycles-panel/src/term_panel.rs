use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use tracing::warn;

use lightcycles_core::{Cell, FrameSink, Rect, Rgb};

/// Terminal cell renderer standing in for the LED matrix: one character per
/// cell on an alternate screen. Drawing is fire-and-forget; coordinates that
/// spill past the panel (crash rings near a wall) are clipped.
pub struct TerminalPanel {
    out: Stdout,
    width: i32,
    height: i32,
}

impl TerminalPanel {
    pub fn new(width: i32, height: i32) -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        Ok(Self { out, width, height })
    }

    fn color(rgb: Rgb) -> Color {
        Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }

    fn cell_op(&mut self, cell: Cell, color: Rgb) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(cell.x as u16, cell.y as u16),
            SetForegroundColor(Self::color(color)),
            Print('█'),
            ResetColor
        )
    }

    fn region_op(&mut self, rect: Rect, color: Rgb) -> io::Result<()> {
        let x0 = rect.x.max(0);
        let x1 = (rect.x + rect.width as i32).min(self.width);
        let y0 = rect.y.max(0);
        let y1 = (rect.y + rect.height as i32).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return Ok(());
        }
        queue!(self.out, SetForegroundColor(Self::color(color)))?;
        let row: String = "█".repeat((x1 - x0) as usize);
        for y in y0..y1 {
            queue!(self.out, MoveTo(x0 as u16, y as u16), Print(&row))?;
        }
        queue!(self.out, ResetColor)
    }

    fn text_op(&mut self, text: &str, color: Rgb) -> io::Result<()> {
        let lines: Vec<&str> = text.lines().collect();
        let top = ((self.height / 2) - lines.len() as i32 / 2).max(0);
        queue!(self.out, SetForegroundColor(Self::color(color)))?;
        for (i, line) in lines.iter().enumerate() {
            let x = ((self.width - line.len() as i32) / 2).max(0);
            queue!(
                self.out,
                MoveTo(x as u16, (top + i as i32) as u16),
                Print(line)
            )?;
        }
        queue!(self.out, ResetColor)
    }

    /// Drawing never reports errors upstream; a failed write is logged and
    /// dropped, matching the fire-and-forget sink contract.
    fn finish(&mut self, result: io::Result<()>) {
        if let Err(e) = result.and_then(|()| self.out.flush()) {
            warn!(error = %e, "panel write failed");
        }
    }
}

impl FrameSink for TerminalPanel {
    fn clear(&mut self) {
        let result = queue!(self.out, Clear(ClearType::All));
        self.finish(result);
    }

    fn draw_cell(&mut self, cell: Cell, color: Rgb) {
        if cell.x < 0 || cell.x >= self.width || cell.y < 0 || cell.y >= self.height {
            return;
        }
        let result = self.cell_op(cell, color);
        self.finish(result);
    }

    fn draw_region(&mut self, rect: Rect, color: Rgb) {
        let result = self.region_op(rect, color);
        self.finish(result);
    }

    fn draw_text(&mut self, text: &str, color: Rgb) {
        let result = self.text_op(text, color);
        self.finish(result);
    }
}

impl Drop for TerminalPanel {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, Show, LeaveAlternateScreen) {
            warn!(error = %e, "failed to leave alternate screen");
        }
    }
}
