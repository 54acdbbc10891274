//! TerminalRenderer: flushes the HUD framebuffer to a real terminal.
//!
//! Draws diff against the previous frame and swap buffers, so steady-state
//! frames only write the cells that changed.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crossterm::{
    cursor,
    event::{
        DisableFocusChange, EnableFocusChange, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{FrameBuffer, Tone};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
    enhanced_keys: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(8 * 1024),
            enhanced_keys: false,
        }
    }

    /// Enter raw mode and the alternate screen.
    ///
    /// Returns whether the terminal will report key releases.
    pub fn enter(&mut self) -> Result<bool> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.enhanced_keys = terminal::supports_keyboard_enhancement().unwrap_or(false);

        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.buf.queue(EnableFocusChange)?;
        if self.enhanced_keys {
            self.buf.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        } else {
            log::debug!("keyboard enhancement unsupported, synthesizing key releases");
        }
        self.flush_buf()?;
        Ok(self.enhanced_keys)
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        if self.enhanced_keys {
            self.buf.queue(PopKeyboardEnhancementFlags)?;
        }
        self.buf.queue(DisableFocusChange)?;
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode().context("disable raw mode")?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (terminal resize).
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw `fb`, then swap it with the previous frame.
    ///
    /// Callers keep one framebuffer and pass it in every frame; after the
    /// call it holds stale contents and must be fully re-rendered.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let mut prev = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                self.buf.clear();
                encode_diff_into(&prev, fb, &mut self.buf)?;
                prev
            }
            _ => {
                self.buf.clear();
                encode_full_into(fb, &mut self.buf)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush_buf()?;

        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    pub fn ring_bell(&mut self, times: u32) -> Result<()> {
        if times == 0 {
            return Ok(());
        }
        self.buf.clear();
        for _ in 0..times {
            self.buf.queue(Print('\x07'))?;
        }
        self.flush_buf()
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut tone = None;
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            if tone != Some(cell.tone) {
                apply_tone_into(out, cell.tone)?;
                tone = Some(cell.tone);
            }
            out.queue(Print(cell.ch))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the changed runs between `prev` and `next` into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut tone = None;
    for (x, y, len) in changed_runs(prev, next) {
        out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            let cell = next.get(x + dx, y).unwrap_or_default();
            if tone != Some(cell.tone) {
                apply_tone_into(out, cell.tone)?;
                tone = Some(cell.tone);
            }
            out.queue(Print(cell.ch))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_tone_into(out: &mut Vec<u8>, tone: Tone) -> Result<()> {
    let (fg, bg, bold) = palette(tone);
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(fg))?;
    out.queue(SetBackgroundColor(bg))?;
    if bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    Ok(())
}

fn palette(tone: Tone) -> (Color, Color, bool) {
    let black = Color::Rgb { r: 0, g: 0, b: 0 };
    match tone {
        Tone::Plain => (Color::Rgb { r: 220, g: 220, b: 220 }, black, false),
        Tone::Title => (Color::Rgb { r: 120, g: 200, b: 255 }, black, true),
        Tone::Label => (Color::Rgb { r: 140, g: 140, b: 160 }, black, false),
        Tone::Value => (Color::Rgb { r: 240, g: 240, b: 120 }, black, true),
        Tone::Banner => (black, Color::Rgb { r: 230, g: 200, b: 60 }, true),
        Tone::Hint => (Color::Rgb { r: 90, g: 90, b: 100 }, black, false),
    }
}

/// `(x, y, len)` runs of cells that differ, row by row.
fn changed_runs<'a>(
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
) -> impl Iterator<Item = (u16, u16, u16)> + 'a {
    let w = next.width();
    (0..next.height()).flat_map(move |y| {
        let differs = move |x: u16| prev.get(x, y) != next.get(x, y);
        let mut x = 0;
        std::iter::from_fn(move || {
            while x < w && !differs(x) {
                x += 1;
            }
            if x >= w {
                return None;
            }
            let start = x;
            while x < w && differs(x) {
                x += 1;
            }
            Some((start, y, x - start))
        })
    })
}
