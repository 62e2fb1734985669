//! Terminal backend (crossterm)
//!
//! Two display pixels share one character cell: the upper pixel is the
//! foreground of a `▀`, the lower one its background. Keyboard keys stand in
//! for the four switches. A terminal has no key-up event, so a press holds
//! its switch down for a fixed number of timer firings.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use glam::IVec2;

use super::{ButtonSource, Display, Framebuffer};
use crate::Color;
use crate::audio::{SoundEffect, ToneSink};
use crate::sim::Region;
use crate::sim::buttons::{P1_FORWARD, P1_REVERSE, P2_FORWARD, P2_REVERSE};

const HALF_BLOCK: char = '\u{2580}';

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.to_rgb();
    TermColor::Rgb { r, g, b }
}

/// Raw mode + alternate screen for as long as this lives
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All)) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = execute!(out, ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Framebuffer mirrored onto the terminal
pub struct TerminalDisplay {
    fb: Framebuffer,
    out: Stdout,
    /// Union of windows written since the last present
    dirty: Option<Region>,
}

impl TerminalDisplay {
    pub fn new(background: Color) -> Self {
        Self {
            fb: Framebuffer::screen(background),
            out: io::stdout(),
            dirty: None,
        }
    }

    /// Send every touched cell row, then the text overlay
    pub fn present(&mut self) -> io::Result<()> {
        if let Some(dirty) = self.dirty.take() {
            let first_row = dirty.top_left.y / 2;
            let last_row = dirty.bottom_right.y / 2;
            for row in first_row..=last_row {
                self.draw_cell_row(row)?;
            }
        }
        for (pos, run) in self.fb.texts() {
            queue!(
                self.out,
                MoveTo(pos.x as u16, (pos.y / 2) as u16),
                SetForegroundColor(term_color(run.fg)),
                SetBackgroundColor(term_color(run.bg)),
                Print(&run.text)
            )?;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    fn draw_cell_row(&mut self, row: i32) -> io::Result<()> {
        queue!(self.out, MoveTo(0, row as u16))?;
        let mut last: Option<(Color, Color)> = None;
        for x in 0..self.fb.width() {
            let upper = self.fb.pixel(x, row * 2).unwrap_or_default();
            let lower = self.fb.pixel(x, row * 2 + 1).unwrap_or_default();
            if last != Some((upper, lower)) {
                queue!(
                    self.out,
                    SetForegroundColor(term_color(upper)),
                    SetBackgroundColor(term_color(lower))
                )?;
                last = Some((upper, lower));
            }
            queue!(self.out, Print(HALF_BLOCK))?;
        }
        Ok(())
    }
}

impl Display for TerminalDisplay {
    fn bounds(&self) -> Region {
        self.fb.bounds()
    }

    fn set_window(&mut self, region: &Region) {
        let clipped = region.clip(&self.fb.bounds());
        if !clipped.is_empty() {
            self.dirty = Some(match self.dirty {
                Some(d) => d.union(&clipped),
                None => clipped,
            });
        }
        self.fb.set_window(region);
    }

    fn write_pixel(&mut self, color: Color) {
        self.fb.write_pixel(color);
    }

    fn draw_text(&mut self, pos: IVec2, text: &str, fg: Color, bg: Color) {
        self.fb.draw_text(pos, text, fg, bg);
    }
}

/// Switch bit for a key, if it is one of the game keys
fn key_switch(code: KeyCode) -> Option<u8> {
    match code {
        KeyCode::Char('1') | KeyCode::Char('d') => Some(P1_FORWARD),
        KeyCode::Char('2') | KeyCode::Char('a') => Some(P1_REVERSE),
        KeyCode::Char('3') | KeyCode::Char('l') => Some(P2_FORWARD),
        KeyCode::Char('4') | KeyCode::Char('j') => Some(P2_REVERSE),
        _ => None,
    }
}

/// Keyboard as a switch register
#[derive(Debug, Clone)]
pub struct TerminalButtons {
    /// Pressed switches, active-high
    pressed: u8,
    /// Firings left before `pressed` is released
    hold_left: u32,
    hold_firings: u32,
    quit: bool,
}

impl TerminalButtons {
    pub fn new(hold_firings: u32) -> Self {
        Self {
            pressed: 0,
            hold_left: 0,
            hold_firings,
            quit: false,
        }
    }

    /// `q`, Esc or Ctrl-C was pressed
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Apply one key event
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            code => {
                if let Some(bit) = key_switch(code) {
                    self.pressed = bit;
                    self.hold_left = self.hold_firings;
                }
            }
        }
    }

    /// Currently held switches, active-high
    pub fn read_pressed(&self) -> u8 {
        self.pressed
    }

    /// Count down one firing of the current hold
    fn age(&mut self) {
        if self.hold_left > 0 {
            self.hold_left -= 1;
            if self.hold_left == 0 {
                self.pressed = 0;
            }
        }
    }

    fn poll_events(&mut self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }
}

impl ButtonSource for TerminalButtons {
    fn read_buttons(&mut self) -> u8 {
        self.age();
        if let Err(e) = self.poll_events() {
            log::warn!("Keyboard poll failed: {}", e);
        }
        !self.pressed
    }
}

/// Plays tones as terminal bells
///
/// Like the buzzer, one tone at a time: a request arriving while the last
/// tone is still sounding is skipped.
#[derive(Debug, Default)]
pub struct TerminalBell {
    rung: u64,
    /// When the current tone stops sounding
    busy_until: Option<Instant>,
}

impl TerminalBell {
    fn ring(&mut self, out: &mut impl Write, effect: SoundEffect, now: Instant) -> io::Result<bool> {
        if self.busy_until.is_some_and(|until| now < until) {
            log::trace!("Bell busy, skipping {:?}", effect);
            return Ok(false);
        }
        self.busy_until = Some(now + Duration::from_millis(effect.duration_ms().into()));
        self.rung += 1;
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(true)
    }

    pub fn rung(&self) -> u64 {
        self.rung
    }
}

impl ToneSink for TerminalBell {
    fn play(&mut self, effect: SoundEffect) {
        if let Err(e) = self.ring(&mut io::stdout(), effect, Instant::now()) {
            log::warn!("Bell failed: {}", e);
        }
    }
}
