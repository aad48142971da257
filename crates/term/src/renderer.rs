//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame after [`TerminalRenderer::enter`] or a resize repaints
//! everything; later frames repaint only glyphs that changed. Output is
//! clipped to the terminal size, so an undersized window never wraps.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal,
};

use crate::fb::{Attrs, CellStyle, FrameBuffer, Glyph, Rgb};

/// Fallback viewport when the terminal size is unknown
const DEFAULT_VIEWPORT: (u16, u16) = (80, 24);

pub struct TerminalRenderer {
    stdout: io::Stdout,
    viewport: (u16, u16),
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            viewport: terminal::size().unwrap_or(DEFAULT_VIEWPORT),
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.viewport = terminal::size()?;
        self.last = None;
        self.buf.clear();
        queue!(
            self.buf,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap
        )?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        queue!(
            self.buf,
            ResetColor,
            SetAttribute(Attribute::Reset),
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// New terminal size; the next draw repaints everything.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport = (cols, rows);
        self.last = None;
    }

    pub fn draw(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        match self.last.as_mut() {
            Some(prev) => {
                encode_diff_into(prev, fb, self.viewport, &mut self.buf)?;
                prev.clone_from(fb);
            }
            None => {
                encode_full_into(fb, self.viewport, &mut self.buf)?;
                self.last = Some(fb.clone());
            }
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

/// Repaint every glyph of `fb` that fits in `viewport` (columns, rows).
pub fn encode_full_into(
    fb: &FrameBuffer,
    viewport: (u16, u16),
    out: &mut Vec<u8>,
) -> io::Result<()> {
    queue!(out, terminal::Clear(terminal::ClearType::All))?;

    let mut pen = Pen::default();
    let (cols, rows) = clip(fb, viewport);
    for y in 0..rows {
        for (x, &glyph) in (0..cols).zip(fb.row(y)) {
            pen.put(out, x, y, glyph)?;
        }
    }
    pen.finish(out)
}

/// Repaint the glyphs of `next` that differ from `prev`. Frames of different
/// sizes fall back to a full repaint.
pub fn encode_diff_into(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    viewport: (u16, u16),
    out: &mut Vec<u8>,
) -> io::Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        return encode_full_into(next, viewport, out);
    }

    let mut pen = Pen::default();
    let (cols, rows) = clip(next, viewport);
    for y in 0..rows {
        let (old, new) = (prev.row(y), next.row(y));
        if old == new {
            continue;
        }
        for ((x, &was), &glyph) in (0..cols).zip(old).zip(new) {
            if was != glyph {
                pen.put(out, x, y, glyph)?;
            }
        }
    }
    pen.finish(out)
}

fn clip(fb: &FrameBuffer, (cols, rows): (u16, u16)) -> (u16, u16) {
    (fb.width().min(cols), fb.height().min(rows))
}

/// Where the terminal cursor is and which style it paints with, so that
/// neighbouring glyphs skip redundant escapes.
#[derive(Debug, Default)]
struct Pen {
    cursor: Option<(u16, u16)>,
    style: Option<CellStyle>,
}

impl Pen {
    fn put(&mut self, out: &mut Vec<u8>, x: u16, y: u16, glyph: Glyph) -> io::Result<()> {
        if self.cursor != Some((x, y)) {
            queue!(out, cursor::MoveTo(x, y))?;
        }
        self.restyle(out, glyph.style)?;
        queue!(out, Print(glyph.ch))?;
        self.cursor = x.checked_add(1).map(|next| (next, y));
        Ok(())
    }

    fn restyle(&mut self, out: &mut Vec<u8>, style: CellStyle) -> io::Result<()> {
        let prev = self.style;
        if prev == Some(style) {
            return Ok(());
        }

        // SGR reset also clears both colors.
        let attrs_changed = prev.map_or(true, |p| p.attrs != style.attrs);
        if attrs_changed {
            queue!(out, SetAttribute(Attribute::Reset))?;
            if style.attrs.contains(Attrs::BOLD) {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            if style.attrs.contains(Attrs::DIM) {
                queue!(out, SetAttribute(Attribute::Dim))?;
            }
        }
        if attrs_changed || prev.map(|p| p.fg) != Some(style.fg) {
            queue!(out, SetForegroundColor(color(style.fg)))?;
        }
        if attrs_changed || prev.map(|p| p.bg) != Some(style.bg) {
            queue!(out, SetBackgroundColor(color(style.bg)))?;
        }

        self.style = Some(style);
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> io::Result<()> {
        if self.style.take().is_some() {
            queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE: (u16, u16) = (200, 60);

    fn text(out: &[u8]) -> String {
        String::from_utf8_lossy(out).into_owned()
    }

    /// `MoveTo` is the only escape ending in `H`.
    fn cursor_moves(out: &[u8]) -> usize {
        text(out).matches('H').count()
    }

    #[test]
    fn identical_frames_encode_nothing() {
        let a = FrameBuffer::new(8, 3);
        let mut out = Vec::new();
        encode_diff_into(&a, &a.clone(), WIDE, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn adjacent_changes_share_one_cursor_move() {
        let a = FrameBuffer::new(5, 1);
        let mut b = a.clone();
        b.put_str(1, 0, "XXX", CellStyle::default());

        let mut out = Vec::new();
        encode_diff_into(&a, &b, WIDE, &mut out).unwrap();
        assert_eq!(cursor_moves(&out), 1);
        assert!(text(&out).contains("XXX"));
    }

    #[test]
    fn separated_changes_move_the_cursor_again() {
        let a = FrameBuffer::new(5, 2);
        let mut b = a.clone();
        b.put_char(0, 0, 'X', CellStyle::default());
        b.put_char(3, 0, 'X', CellStyle::default());
        b.put_char(0, 1, 'X', CellStyle::default());

        let mut out = Vec::new();
        encode_diff_into(&a, &b, WIDE, &mut out).unwrap();
        assert_eq!(cursor_moves(&out), 3);
    }

    #[test]
    fn unchanged_style_is_emitted_once() {
        let fb = FrameBuffer::new(8, 3);
        let mut out = Vec::new();
        encode_full_into(&fb, WIDE, &mut out).unwrap();
        assert_eq!(text(&out).matches("38;2;").count(), 1);
        assert_eq!(cursor_moves(&out), 3);
    }

    #[test]
    fn output_is_clipped_to_the_viewport() {
        let mut fb = FrameBuffer::new(10, 3);
        fb.fill_rect(0, 0, 10, 3, 'X', CellStyle::default());

        let mut out = Vec::new();
        encode_full_into(&fb, (4, 2), &mut out).unwrap();
        assert_eq!(text(&out).matches('X').count(), 8);
    }

    #[test]
    fn resized_frame_falls_back_to_full_repaint() {
        let a = FrameBuffer::new(4, 1);
        let b = FrameBuffer::new(6, 1);
        let mut out = Vec::new();
        encode_diff_into(&a, &b, WIDE, &mut out).unwrap();
        assert!(text(&out).contains("\u{1b}[2J"));
    }

    #[test]
    fn diff_is_smaller_than_full_redraw() {
        let a = FrameBuffer::new(40, 20);
        let mut b = a.clone();
        b.put_char(3, 3, '#', CellStyle::default().bold());

        let mut diff = Vec::new();
        let mut full = Vec::new();
        encode_diff_into(&a, &b, WIDE, &mut diff).unwrap();
        encode_full_into(&b, WIDE, &mut full).unwrap();
        assert!(!diff.is_empty());
        assert!(diff.len() < full.len());
    }
}
