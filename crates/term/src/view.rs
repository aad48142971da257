//! PlayerView: maps a `PlayerSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{shape_from_kind, Phase, PlayerSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{ShapeKind, TOTAL_HEIGHT, VANISH_HEIGHT, VISIBLE_HEIGHT, WIDTH};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_W: u16 = 10;

/// Draws one player's board with its side panel.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for PlayerView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl PlayerView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Bordered board size in terminal cells
    pub fn board_size(&self) -> (u16, u16) {
        (
            WIDTH as u16 * self.cell_w + 2,
            VISIBLE_HEIGHT as u16 * self.cell_h + 2,
        )
    }

    /// Board plus side panel
    pub fn size(&self) -> (u16, u16) {
        let (w, h) = self.board_size();
        (w + 1 + PANEL_W, h)
    }

    /// Draw `snap` with its top-left corner at (x, y).
    pub fn draw(&self, snap: &PlayerSnapshot, label: &str, x: u16, y: u16, fb: &mut FrameBuffer) {
        let (frame_w, frame_h) = self.board_size();
        let bg = CellStyle::fg(Rgb::new(90, 90, 100)).on(BOARD_BG).dim();

        fb.fill_rect(
            x + 1,
            y + 1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            CellStyle::default().on(BOARD_BG),
        );
        draw_border(fb, x, y, frame_w, frame_h, CellStyle::fg(Rgb::new(200, 200, 200)));

        for row in VANISH_HEIGHT..TOTAL_HEIGHT {
            for col in 0..WIDTH {
                match snap.cell(col, row).flatten() {
                    Some(kind) => self.draw_block(fb, x, y, col, row, kind, false),
                    None => self.fill_board_cell(fb, x, y, col, row, '·', bg),
                }
            }
        }

        if let Some(ghost) = snap.ghost {
            let tint = Rgb::of_kind(ghost.kind()).mix(BOARD_BG, 0.6);
            let style = CellStyle::fg(tint).on(BOARD_BG);
            for (col, row) in ghost.cells() {
                self.fill_board_cell(fb, x, y, col, row, '░', style);
            }
        }

        if let Some(active) = snap.active {
            for (col, row) in active.cells() {
                self.draw_block(fb, x, y, col, row, active.kind(), true);
            }
        }

        self.draw_cover(fb, snap, x, y);

        if snap.phase == Phase::GameOver {
            draw_banner(fb, x, y + frame_h / 2, frame_w, "GAME OVER");
        }

        self.draw_panel(fb, snap, label, x + frame_w + 1, y);
    }

    /// Row cover of the clear and top-out animations, sweeping left to right.
    fn draw_cover(&self, fb: &mut FrameBuffer, snap: &PlayerSnapshot, x: u16, y: u16) {
        if snap.clearing_rows.is_empty() {
            return;
        }
        let covered = (snap.clearing_progress * WIDTH as f32).ceil() as i32;
        let style = match snap.phase {
            Phase::GameOverAnimation => CellStyle::fg(Rgb::new(120, 120, 130)).on(BOARD_BG),
            _ => CellStyle::fg(Rgb::WHITE).on(BOARD_BG).bold(),
        };
        for &row in &snap.clearing_rows {
            for col in 0..covered.min(WIDTH) {
                self.fill_board_cell(fb, x, y, col, row as i32, '▓', style);
            }
        }
    }

    fn draw_panel(&self, fb: &mut FrameBuffer, snap: &PlayerSnapshot, label: &str, x: u16, y: u16) {
        let heading = CellStyle::default().bold();
        let value = CellStyle::fg(Rgb::new(200, 200, 200));

        fb.put_str(x, y, label, heading);
        fb.put_str(x, y + 2, "NEXT", heading);
        draw_preview(fb, snap.next, x, y + 3);
        fb.put_str(x, y + 6, "LINES", heading);
        fb.put_u32(x, y + 7, snap.lines_cleared, value);
        fb.put_str(x, y + 9, "PIECES", heading);
        fb.put_u32(x, y + 10, snap.pieces_locked, value);
    }

    fn draw_block(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        col: i32,
        row: i32,
        kind: ShapeKind,
        bold: bool,
    ) {
        let style = CellStyle::fg(Rgb::of_kind(kind)).on(BOARD_BG);
        let style = if bold { style.bold() } else { style };
        self.fill_board_cell(fb, x, y, col, row, '█', style);
    }

    /// Fill matrix cell (col, row); rows in the vanish zone are skipped.
    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        col: i32,
        row: i32,
        ch: char,
        style: CellStyle,
    ) {
        let row = row - VANISH_HEIGHT;
        if !(0..WIDTH).contains(&col) || !(0..VISIBLE_HEIGHT).contains(&row) {
            return;
        }
        let px = x + 1 + col as u16 * self.cell_w;
        let py = y + 1 + row as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }
}

fn draw_preview(fb: &mut FrameBuffer, kind: ShapeKind, x: u16, y: u16) {
    let style = CellStyle::fg(Rgb::of_kind(kind));
    let grid = &shape_from_kind(kind).grids[0];
    for (col, row) in grid.cells() {
        let px = x + col as u16 * 2;
        fb.put_str(px, y + row as u16, "██", style);
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

/// Centered text across a frame of width `w`
pub(crate) fn draw_banner(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, text: &str) {
    let text_w = text.chars().count() as u16;
    let tx = x.saturating_add(w.saturating_sub(text_w) / 2);
    fb.put_str(tx, y, text, CellStyle::fg(Rgb::WHITE).bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Player;
    use crate::types::Action;

    fn render(snap: &PlayerSnapshot) -> FrameBuffer {
        let view = PlayerView::default();
        let (w, h) = view.size();
        let mut fb = FrameBuffer::new(w, h);
        view.draw(snap, "P1", 0, 0, &mut fb);
        fb
    }

    #[test]
    fn size_accounts_for_border_and_panel() {
        let view = PlayerView::default();
        assert_eq!(view.board_size(), (22, 22));
        assert_eq!(view.size(), (33, 22));
    }

    #[test]
    fn locked_cells_are_drawn_on_the_bottom_row() {
        let mut player = Player::new(9);
        player.action(Action::HardDrop);
        let fb = render(&player.snapshot());

        let bottom = fb.row_text(VISIBLE_HEIGHT as u16);
        assert!(bottom.contains('█'), "bottom row: {bottom}");
    }

    #[test]
    fn panel_shows_label_and_counters() {
        let mut player = Player::new(9);
        player.action(Action::HardDrop);
        let fb = render(&player.snapshot());

        assert!(fb.row_text(0).contains("P1"));
        assert!(fb.row_text(6).contains("LINES"));
        assert!(fb.row_text(10).contains('1'));
    }

    #[test]
    fn game_over_banner() {
        let snap = PlayerSnapshot {
            phase: Phase::GameOver,
            ..PlayerSnapshot::default()
        };
        let fb = render(&snap);
        assert!(fb.row_text(11).contains("GAME OVER"));
    }
}
