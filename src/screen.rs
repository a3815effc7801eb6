//! Character-cell output.
//!
//! Everything the UI shows goes through [`ScreenSurface`]: text written at
//! absolute cells, bordered panes, and the visible cursor. [`BufferSurface`]
//! keeps the cells in memory; [`TerminalSurface`] presents such a buffer on
//! the real terminal through ratatui.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::warn;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
};
use std::io::{self, Stdout};
use unicode_width::UnicodeWidthChar;

use crate::config::FilepaneConfig;

const STATUS_PANE_HEIGHT: u16 = 8;
const PROMPT_PANE_HEIGHT: u16 = 3;

/// Fixed pane geometry of the screen grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub width: u16,
    pub height: u16,
    pub tree: Rect,
    pub status: Rect,
    pub prompt: Rect,
    pub page_lines: usize,
}

impl ScreenLayout {
    pub fn new(width: u16, page_lines: u16) -> Self {
        let tree = Rect::new(0, 0, width, page_lines + 2);
        let status = Rect::new(0, tree.bottom(), width, STATUS_PANE_HEIGHT);
        let prompt = Rect::new(0, status.bottom(), width, PROMPT_PANE_HEIGHT);
        Self {
            width,
            height: prompt.bottom() + 1,
            tree,
            status,
            prompt,
            page_lines: page_lines as usize,
        }
    }

    pub fn from_config(config: &FilepaneConfig) -> Self {
        Self::new(config.screen.width, config.tree.page_lines)
    }
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self::new(120, 16)
    }
}

/// Longest prefix of `text` that fits in `width` cells.
pub fn clip_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (index, c) in text.char_indices() {
        used += c.width().unwrap_or(0);
        if used > width {
            return &text[..index];
        }
    }
    text
}

/// Keeps the end of `text`, marking a cut with a leading `…`.
pub fn shorten_left(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut kept = Vec::new();
    let mut used = 1;
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        kept.push(c);
    }
    std::iter::once('…').chain(kept.into_iter().rev()).collect()
}

pub trait ScreenSurface {
    fn area(&self) -> Rect;

    /// Writes `text` starting at cell (x, y). Text past the right edge is
    /// dropped; rows outside the surface are ignored.
    fn write_at(&mut self, x: u16, y: u16, text: &str);

    fn set_cursor(&mut self, x: u16, y: u16);

    fn clear(&mut self);

    fn flush(&mut self) -> Result<()>;

    fn blank(&mut self, x: u16, y: u16, width: u16) {
        self.write_at(x, y, &" ".repeat(width as usize));
    }

    /// Frames `rect` with double-line box glyphs and blanks its interior.
    fn draw_box(&mut self, rect: Rect) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let inner = (rect.width - 2) as usize;
        self.write_at(rect.x, rect.y, &format!("╔{}╗", "═".repeat(inner)));
        let body = format!("║{}║", " ".repeat(inner));
        for y in rect.y + 1..rect.bottom() - 1 {
            self.write_at(rect.x, y, &body);
        }
        self.write_at(
            rect.x,
            rect.bottom() - 1,
            &format!("╚{}╝", "═".repeat(inner)),
        );
    }
}

/// In-memory cell grid.
pub struct BufferSurface {
    buffer: Buffer,
    cursor: Position,
    style: Style,
}

impl BufferSurface {
    pub fn new(width: u16, height: u16) -> Self {
        let mut surface = Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            cursor: Position::ORIGIN,
            style: Style::default().fg(Color::White).bg(Color::DarkGray),
        };
        surface.clear();
        surface
    }

    pub fn for_layout(layout: &ScreenLayout) -> Self {
        Self::new(layout.width, layout.height)
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn row_text(&self, y: u16) -> String {
        self.text_at(0, y, self.buffer.area.width)
    }

    pub fn text_at(&self, x: u16, y: u16, width: u16) -> String {
        (x..x.saturating_add(width))
            .filter_map(|col| self.buffer.cell((col, y)))
            .map(|cell| cell.symbol())
            .collect()
    }
}

impl ScreenSurface for BufferSurface {
    fn area(&self) -> Rect {
        self.buffer.area
    }

    fn write_at(&mut self, x: u16, y: u16, text: &str) {
        let area = self.buffer.area;
        if y >= area.bottom() || x >= area.right() {
            return;
        }
        let room = (area.right() - x) as usize;
        self.buffer.set_stringn(x, y, text, room, self.style);
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Position::new(x, y);
    }

    fn clear(&mut self) {
        self.buffer.reset();
        let area = self.buffer.area;
        self.buffer.set_style(area, self.style);
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The real terminal: raw mode, alternate screen, and a [`BufferSurface`]
/// canvas copied into each ratatui frame on flush.
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    canvas: BufferSurface,
}

impl TerminalSurface {
    pub fn open(layout: &ScreenLayout) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        let size = terminal.size()?;
        if size.width < layout.width || size.height < layout.height {
            warn!(
                "terminal is {}x{}, layout needs {}x{}; output will be clipped",
                size.width, size.height, layout.width, layout.height
            );
        }
        Ok(Self {
            terminal,
            canvas: BufferSurface::for_layout(layout),
        })
    }

    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl ScreenSurface for TerminalSurface {
    fn area(&self) -> Rect {
        self.canvas.area()
    }

    fn write_at(&mut self, x: u16, y: u16, text: &str) {
        self.canvas.write_at(x, y, text);
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        self.canvas.set_cursor(x, y);
    }

    fn clear(&mut self) {
        self.canvas.clear();
    }

    fn flush(&mut self) -> Result<()> {
        let canvas = &self.canvas;
        self.terminal.draw(|frame| {
            // Smaller terminals get the top-left part of the layout.
            let visible = frame.area().intersection(canvas.area());
            let target = frame.buffer_mut();
            for y in visible.top()..visible.bottom() {
                for x in visible.left()..visible.right() {
                    if let (Some(src), Some(dst)) =
                        (canvas.buffer.cell((x, y)), target.cell_mut((x, y)))
                    {
                        *dst = src.clone();
                    }
                }
            }
            if visible.contains(canvas.cursor) {
                frame.set_cursor_position(canvas.cursor);
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_fixed_grid() {
        let layout = ScreenLayout::default();
        assert_eq!(layout.tree, Rect::new(0, 0, 120, 18));
        assert_eq!(layout.status, Rect::new(0, 18, 120, 8));
        assert_eq!(layout.prompt, Rect::new(0, 26, 120, 3));
        assert_eq!(layout.height, 30);
        assert_eq!(layout.page_lines, 16);
    }

    #[test]
    fn draw_box_frames_the_rect() {
        let mut surface = BufferSurface::new(6, 4);
        surface.draw_box(Rect::new(0, 0, 6, 4));
        assert_eq!(surface.row_text(0), "╔════╗");
        assert_eq!(surface.row_text(1), "║    ║");
        assert_eq!(surface.row_text(2), "║    ║");
        assert_eq!(surface.row_text(3), "╚════╝");
    }

    #[test]
    fn write_at_clips_at_right_edge() {
        let mut surface = BufferSurface::new(5, 1);
        surface.write_at(3, 0, "abcdef");
        assert_eq!(surface.row_text(0), "   ab");
    }

    #[test]
    fn clip_to_width_counts_cells() {
        assert_eq!(clip_to_width("abcdef", 4), "abcd");
        assert_eq!(clip_to_width("ab中d", 3), "ab");
        assert_eq!(clip_to_width("ab", 10), "ab");
    }

    #[test]
    fn shorten_left_keeps_the_tail() {
        assert_eq!(shorten_left("/home/user/projects", 8), "…rojects");
        assert_eq!(shorten_left("/tmp", 8), "/tmp");
    }

    #[test]
    fn write_outside_rows_is_ignored() {
        let mut surface = BufferSurface::new(5, 1);
        surface.write_at(0, 3, "abc");
        assert_eq!(surface.row_text(0), "     ");
    }
}
