//! Single-line input field driven by raw key events.
//!
//! The editor owns the authoritative state: the typed characters and the
//! cursor offset from the anchor cell. The terminal cursor is only ever
//! written from that state, never read back.

use anyhow::{Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;
use ratatui::layout::Position;
use std::collections::VecDeque;
use unicode_width::UnicodeWidthChar;

use crate::screen::ScreenSurface;

pub trait KeySource {
    /// Blocks until the next key press.
    fn next_key(&mut self) -> Result<KeyEvent>;
}

/// Key presses from the terminal in raw mode.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> Result<KeyEvent> {
        loop {
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                return Ok(key);
            }
        }
    }
}

/// A fixed sequence of key presses, for driving the editor without a terminal.
#[derive(Debug, Default)]
pub struct ScriptedKeys {
    keys: VecDeque<KeyEvent>,
}

impl ScriptedKeys {
    /// `'\n'` becomes Enter and `'\u{8}'` Backspace; every other character
    /// is typed as-is.
    pub fn typed(text: &str) -> Self {
        let mut keys = Self::default();
        keys.push_text(text);
        keys
    }

    pub fn push_text(&mut self, text: &str) {
        for c in text.chars() {
            let code = match c {
                '\n' => KeyCode::Enter,
                '\u{8}' => KeyCode::Backspace,
                other => KeyCode::Char(other),
            };
            self.push(KeyEvent::new(code, KeyModifiers::NONE));
        }
    }

    pub fn push(&mut self, key: KeyEvent) {
        self.keys.push_back(key);
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self) -> Result<KeyEvent> {
        match self.keys.pop_front() {
            Some(key) => Ok(key),
            None => bail!("key script exhausted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Line(String),
    /// Ctrl-C, or Ctrl-D on an empty line.
    Interrupted,
}

fn char_width(c: char) -> u16 {
    c.width().unwrap_or(0) as u16
}

fn display_width(text: &str) -> u16 {
    text.chars().map(char_width).sum()
}

pub struct LineEditor {
    anchor: Position,
    max_width: u16,
    buffer: String,
    offset: u16,
}

impl LineEditor {
    pub fn new(anchor: Position, max_width: u16) -> Self {
        Self {
            anchor,
            max_width,
            buffer: String::new(),
            offset: 0,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Screen cell of the visible cursor.
    pub fn cursor(&self) -> Position {
        Position::new(self.anchor.x + self.offset, self.anchor.y)
    }

    pub fn read_line<S, K>(&mut self, surface: &mut S, keys: &mut K) -> Result<EditOutcome>
    where
        S: ScreenSurface,
        K: KeySource,
    {
        self.place_cursor(surface)?;
        loop {
            let key = keys.next_key()?;
            if let Some(outcome) = self.handle_key(key, surface)? {
                return Ok(outcome);
            }
        }
    }

    /// Applies one key press. Returns the outcome once the line is finished.
    pub fn handle_key<S: ScreenSurface>(
        &mut self,
        key: KeyEvent,
        surface: &mut S,
    ) -> Result<Option<EditOutcome>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Enter => return Ok(Some(EditOutcome::Line(self.buffer.clone()))),
            KeyCode::Char('c') if ctrl => {
                debug!("input interrupted");
                return Ok(Some(EditOutcome::Interrupted));
            }
            KeyCode::Char('d') if ctrl && self.buffer.is_empty() => {
                debug!("input closed");
                return Ok(Some(EditOutcome::Interrupted));
            }
            KeyCode::Backspace => self.backspace(surface),
            KeyCode::Char(c) if !ctrl && !alt && !c.is_control() => self.insert(c, surface),
            _ => {}
        }

        self.resync_if_drifted(surface);
        self.place_cursor(surface)?;
        Ok(None)
    }

    fn insert<S: ScreenSurface>(&mut self, c: char, surface: &mut S) {
        let width = char_width(c);
        // The cursor cell must stay inside the field.
        if self.offset + width >= self.max_width {
            return;
        }
        if width > 0 {
            let mut glyph = [0u8; 4];
            surface.write_at(
                self.anchor.x + self.offset,
                self.anchor.y,
                c.encode_utf8(&mut glyph),
            );
        }
        self.buffer.push(c);
        self.offset += width;
    }

    fn backspace<S: ScreenSurface>(&mut self, surface: &mut S) {
        match self.buffer.pop() {
            None => surface.blank(self.anchor.x, self.anchor.y, 1),
            Some(c) => {
                let width = char_width(c);
                if width <= self.offset {
                    self.offset -= width;
                    surface.blank(self.anchor.x + self.offset, self.anchor.y, width);
                } else {
                    self.rewind(surface);
                }
            }
        }
    }

    fn resync_if_drifted<S: ScreenSurface>(&mut self, surface: &mut S) {
        let out_of_field = self.max_width > 0 && self.offset >= self.max_width;
        if out_of_field || self.offset != display_width(&self.buffer) {
            debug!(
                "input field out of sync (offset {}, buffer {:?}); clearing",
                self.offset, self.buffer
            );
            self.rewind(surface);
        }
    }

    fn rewind<S: ScreenSurface>(&mut self, surface: &mut S) {
        surface.blank(self.anchor.x, self.anchor.y, self.max_width);
        self.buffer.clear();
        self.offset = 0;
    }

    fn place_cursor<S: ScreenSurface>(&self, surface: &mut S) -> Result<()> {
        let cursor = self.cursor();
        surface.set_cursor(cursor.x, cursor.y);
        surface.flush()
    }
}
