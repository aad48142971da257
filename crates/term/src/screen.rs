//! Screens own what they show and render it into their own framebuffer.

use crate::core::{Match, PlayerSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{ControllerState, PLAYERS};
use crate::view::{draw_banner, PlayerView};

const GAP: u16 = 2;
const LABELS: [&str; PLAYERS] = ["P1", "P2"];

pub trait Screen {
    /// Advance the screen's contents by one frame
    fn update(&mut self, dt: f32, controls: &ControllerState);

    /// Redraw into the screen's framebuffer
    fn draw(&mut self);

    fn framebuffer(&self) -> &FrameBuffer;
}

/// Every player of a [`Match`] side by side.
pub struct VersusScreen {
    game: Match,
    view: PlayerView,
    snapshots: [PlayerSnapshot; PLAYERS],
    fb: FrameBuffer,
}

impl VersusScreen {
    pub fn new(game: Match) -> Self {
        let view = PlayerView::default();
        let (w, h) = Self::layout_size(&view);
        Self {
            game,
            view,
            snapshots: std::array::from_fn(|_| PlayerSnapshot::default()),
            fb: FrameBuffer::new(w, h),
        }
    }

    fn layout_size(view: &PlayerView) -> (u16, u16) {
        let (w, h) = view.size();
        (w * PLAYERS as u16 + GAP * (PLAYERS as u16 - 1), h + 1)
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub fn restart(&mut self, seed: u64) {
        self.game.restart(seed);
    }
}

impl Screen for VersusScreen {
    fn update(&mut self, dt: f32, controls: &ControllerState) {
        self.game.update(dt, controls);
    }

    fn draw(&mut self) {
        self.fb.clear();

        let (view_w, view_h) = self.view.size();
        let (board_w, _) = self.view.board_size();
        for (slot, (player, snap)) in self
            .game
            .players()
            .iter()
            .zip(self.snapshots.iter_mut())
            .enumerate()
        {
            player.snapshot_into(snap);
            let x = slot as u16 * (view_w + GAP);
            self.view.draw(snap, LABELS[slot], x, 0, &mut self.fb);
        }

        if let Some(slot) = self.game.winner() {
            let x = slot as u16 * (view_w + GAP);
            draw_banner(&mut self.fb, x, view_h / 2 + 2, board_w, "WINNER");
        }
        if self.game.is_over() {
            let hint = CellStyle::fg(Rgb::new(160, 160, 160));
            self.fb.put_str(0, view_h, "r: restart  q: quit", hint);
        }
    }

    fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, ActionSet};

    #[test]
    fn draws_both_players_side_by_side() {
        let mut screen = VersusScreen::new(Match::new(3));
        screen.draw();

        let top = screen.framebuffer().row_text(0);
        assert!(top.contains("P1"));
        assert!(top.contains("P2"));
    }

    #[test]
    fn update_forwards_controls_to_the_match() {
        let mut screen = VersusScreen::new(Match::new(3));
        let mut controls = ControllerState::default();
        controls.players[1] = [Action::HardDrop].into_iter().collect::<ActionSet>();

        screen.update(0.016, &controls);
        assert_eq!(screen.game().players()[0].pieces_locked(), 0);
        assert_eq!(screen.game().players()[1].pieces_locked(), 1);
    }
}
