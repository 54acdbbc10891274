//! HUD state and layout.
//!
//! `Hud` is the state the presentation and feedback sinks write into;
//! [`HudView`] lays it out into a [`FrameBuffer`]. Both are pure.

use tui_blockfall_core::MusicState;

use crate::fb::{FrameBuffer, Tone};
use crate::types::{Cue, Overlay, Snapshot};

/// Everything the terminal shows.
#[derive(Debug, Clone, Default)]
pub struct Hud {
    pub snapshot: Snapshot,
    pub paused: bool,
    pub game_over: bool,
    pub music: MusicState,
    pub last_cue: Option<Cue>,
    /// Bell rings requested since the last draw
    pub bells_pending: u32,
    /// Pulses that could not be played
    pub pulses_dropped: u32,
    /// Whether the terminal reports key releases
    pub release_events: bool,
    /// Something changed since the last draw
    pub dirty: bool,
}

impl Hud {
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    pub fn set_overlay(&mut self, overlay: Overlay, visible: bool) {
        let slot = match overlay {
            Overlay::Paused => &mut self.paused,
            Overlay::GameOver => &mut self.game_over,
        };
        if *slot != visible {
            *slot = visible;
            self.dirty = true;
        }
    }

    pub fn publish(&mut self, snapshot: &Snapshot) {
        if self.snapshot != *snapshot {
            self.snapshot = *snapshot;
            self.dirty = true;
        }
    }

    /// Take the pending bell count.
    pub fn take_bells(&mut self) -> u32 {
        std::mem::take(&mut self.bells_pending)
    }
}

const PANEL_WIDTH: u16 = 34;
const PANEL_HEIGHT: u16 = 14;
const VALUE_COLUMN: u16 = 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct HudView;

impl HudView {
    /// Lay the HUD out centered in a `width` x `height` viewport.
    pub fn render_into(&self, hud: &Hud, width: u16, height: u16, fb: &mut FrameBuffer) {
        fb.resize(width, height);
        fb.clear();

        let x = width.saturating_sub(PANEL_WIDTH) / 2;
        let y = height.saturating_sub(PANEL_HEIGHT) / 2;

        fb.put_str(x, y, "B L O C K F A L L", Tone::Title);

        let snap = &hud.snapshot;
        let counters = [("Score", snap.score), ("Lines", snap.lines), ("Level", snap.level)];
        for (row, (label, value)) in (2u16..).zip(counters) {
            fb.put_str(x, y + row, label, Tone::Label);
            fb.put_number(x + VALUE_COLUMN, y + row, value, Tone::Value);
        }

        fb.put_str(x, y + 6, "Music", Tone::Label);
        fb.put_str(x + 7, y + 6, hud.music.as_str(), Tone::Plain);
        fb.put_str(x, y + 7, "Cue", Tone::Label);
        fb.put_str(
            x + 7,
            y + 7,
            hud.last_cue.map_or("-", |cue| cue.as_str()),
            Tone::Plain,
        );

        if hud.game_over {
            fb.put_str(x, y + 9, "[ GAME OVER ]  r to restart", Tone::Banner);
        } else if hud.paused {
            fb.put_str(x, y + 9, "[ PAUSED ]  p to resume", Tone::Banner);
        }

        fb.put_str(x, y + 11, "<- -> move  v soft  ^ rotate", Tone::Hint);
        fb.put_str(x, y + 12, "spc drop  c hold  p pause  q quit", Tone::Hint);
        if !hud.release_events {
            fb.put_str(x, y + 13, "(no key-release events: taps only)", Tone::Hint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(hud: &Hud) -> FrameBuffer {
        let mut fb = FrameBuffer::new(0, 0);
        HudView.render_into(hud, PANEL_WIDTH, PANEL_HEIGHT, &mut fb);
        fb
    }

    #[test]
    fn test_counters_rendered() {
        let mut hud = Hud::new();
        hud.publish(&Snapshot {
            score: 4_200,
            lines: 17,
            level: 2,
            game_over: false,
        });
        let fb = render(&hud);
        // Last digit lands in VALUE_COLUMN.
        assert_eq!(fb.row_text(2), format!("Score{:>12}", 4_200));
        assert_eq!(fb.row_text(3), format!("Lines{:>12}", 17));
        assert_eq!(fb.row_text(4), format!("Level{:>12}", 2));
    }

    #[test]
    fn test_game_over_banner_wins_over_paused() {
        let mut hud = Hud::new();
        hud.set_overlay(Overlay::Paused, true);
        assert!(render(&hud).row_text(9).contains("PAUSED"));
        hud.set_overlay(Overlay::GameOver, true);
        assert!(render(&hud).row_text(9).contains("GAME OVER"));
    }

    #[test]
    fn test_music_and_cue_labels() {
        let mut hud = Hud::new();
        hud.music = MusicState::Paused;
        hud.last_cue = Some(Cue::LineClear);
        let fb = render(&hud);
        assert_eq!(fb.row_text(6), "Music  paused");
        assert_eq!(fb.row_text(7), "Cue    clear");
    }

    #[test]
    fn test_publish_marks_dirty_only_on_change() {
        let mut hud = Hud::new();
        hud.dirty = false;
        hud.publish(&Snapshot::default());
        assert!(!hud.dirty);
        hud.set_overlay(Overlay::Paused, false);
        assert!(!hud.dirty);
        hud.set_overlay(Overlay::Paused, true);
        assert!(hud.dirty);
    }
}
