use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

use crate::config::{COLOR_BACKGROUND, GridSize};
use crate::snake::Position;
use crate::surface::{FrameBuffer, Rgb, Surface, SurfaceError};

/// Upper half-block glyph: foreground paints the upper cell, background the lower.
pub const GLYPH_HALF_UPPER: &str = "▀";

/// Concrete terminal type used by the runtime.
pub type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// Owns terminal lifecycle (raw mode + alternate screen) for one game session.
///
/// On drop, this type restores terminal state best-effort.
pub struct TerminalSession {
    terminal: AppTerminal,
}

impl TerminalSession {
    /// Enters raw mode, switches to alternate screen, and creates a ratatui terminal.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        if let Err(error) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(error);
        }

        let backend = CrosstermBackend::new(stdout);
        match Terminal::new(backend) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(error) => {
                let _ = restore_terminal();
                Err(error)
            }
        }
    }

    /// Returns mutable access to the inner ratatui terminal.
    pub fn terminal_mut(&mut self) -> &mut AppTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Leaves raw mode and the alternate screen. Safe to call more than once.
pub fn restore_terminal() -> io::Result<()> {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, Show, LeaveAlternateScreen)
}

/// Message shown once the game stopped but the input thread still waits
/// for a key.
pub const EXIT_PROMPT: &str = "Press any key to exit";

/// Leaves the alternate screen and asks the player for a key press.
///
/// Raw mode stays on so the pending read wakes up on any single key.
pub fn show_exit_prompt() -> io::Result<()> {
    write_exit_prompt(&mut io::stdout())
}

fn write_exit_prompt<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, Show)?;
    write!(out, "{EXIT_PROMPT}\r\n")?;
    out.flush()
}

/// Terminal preview of the LED grid.
///
/// Grid row 0 is drawn at the bottom. Two grid rows share one terminal row
/// through the upper half-block glyph, so cells come out roughly square.
pub struct TerminalSurface {
    session: TerminalSession,
    buffer: FrameBuffer,
}

impl TerminalSurface {
    pub fn enter(grid: GridSize) -> Result<Self, SurfaceError> {
        Ok(Self {
            session: TerminalSession::enter()?,
            buffer: FrameBuffer::new(grid),
        })
    }
}

impl Surface for TerminalSurface {
    fn width(&self) -> u16 {
        self.buffer.width()
    }

    fn height(&self) -> u16 {
        self.buffer.height()
    }

    fn set_color(&mut self, position: Position, color: Rgb) {
        self.buffer.set_color(position, color);
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        let buffer = &self.buffer;
        self.session
            .terminal_mut()
            .draw(|frame| draw_grid(frame, buffer))?;
        Ok(())
    }
}

fn draw_grid(frame: &mut Frame<'_>, buffer: &FrameBuffer) {
    let area = frame.area();
    let grid = buffer.grid();
    let rows = grid.height.div_ceil(2);

    let target = centered_area(area, grid.width, rows);
    let out = frame.buffer_mut();

    for row in 0..rows {
        let upper_y = i32::from(grid.height) - 1 - 2 * i32::from(row);
        for column in 0..grid.width {
            let Some((x, y)) = grid_to_terminal(target, column, row) else {
                continue;
            };

            let x_cell = i32::from(column);
            let upper = buffer.color_at(Position {
                x: x_cell,
                y: upper_y,
            });
            // Odd heights leave the lowest terminal row half empty.
            let lower = buffer.color_at(Position {
                x: x_cell,
                y: upper_y - 1,
            });

            let style = Style::new()
                .fg(to_terminal_color(upper.unwrap_or(COLOR_BACKGROUND)))
                .bg(to_terminal_color(lower.unwrap_or(COLOR_BACKGROUND)));
            out.set_string(x, y, GLYPH_HALF_UPPER, style);
        }
    }
}

fn centered_area(area: Rect, width: u16, rows: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(rows) / 2,
        width: width.min(area.width),
        height: rows.min(area.height),
    }
}

fn grid_to_terminal(target: Rect, column: u16, row: u16) -> Option<(u16, u16)> {
    let x = target.x.saturating_add(column);
    let y = target.y.saturating_add(row);
    if x >= target.right() || y >= target.bottom() {
        return None;
    }

    Some((x, y))
}

fn to_terminal_color(color: Rgb) -> Color {
    let (r, g, b) = color.to_rgb8();
    Color::Rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;
    use ratatui::style::Color;

    use crate::config::{COLOR_BODY, COLOR_HEAD};

    use super::{
        EXIT_PROMPT, centered_area, grid_to_terminal, to_terminal_color, write_exit_prompt,
    };

    #[test]
    fn grid_is_centered_in_terminal() {
        let target = centered_area(Rect::new(0, 0, 80, 24), 4, 5);
        assert_eq!(target, Rect::new(38, 9, 4, 5));
    }

    #[test]
    fn small_terminal_clips_grid() {
        let target = centered_area(Rect::new(0, 0, 3, 2), 8, 10);

        assert_eq!(grid_to_terminal(target, 2, 1), Some((2, 1)));
        assert_eq!(grid_to_terminal(target, 3, 0), None);
        assert_eq!(grid_to_terminal(target, 0, 2), None);
    }

    #[test]
    fn colors_map_to_true_color() {
        assert_eq!(to_terminal_color(COLOR_HEAD), Color::Rgb(255, 0, 0));
        assert_eq!(to_terminal_color(COLOR_BODY), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn exit_prompt_is_printed_on_the_main_screen() {
        let mut out = Vec::new();

        write_exit_prompt(&mut out).expect("writing to a vec cannot fail");

        let text = String::from_utf8(out).expect("prompt is utf-8");
        let prompt_at = text.find(EXIT_PROMPT).expect("prompt is written");
        // ESC [ ? 1049 l leaves the alternate screen.
        let leave_at = text.find("\x1b[?1049l").expect("alternate screen is left");
        assert!(leave_at < prompt_at);
        assert!(text.ends_with("\r\n"));
    }
}
