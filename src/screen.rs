use std::{
    error::Error,
    io::{stdout, Write},
};

use crossterm::{cursor, style::Styler, QueueableCommand};

use crate::state::{MachineState, SCREEN_HEIGHT, SCREEN_WIDTH, VRAM_SIZE};

/// Terminal renderer that redraws only the cells that changed since the last frame.
pub struct Screen {
    pixels: [u8; VRAM_SIZE],
    first_render: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Screen {
            pixels: [0u8; VRAM_SIZE],
            first_render: true,
        }
    }
}

impl Screen {
    /// Consumes the draw flag and redraws if it was set. Returns whether a frame was drawn.
    pub fn present(&mut self, state: &mut MachineState) -> Result<bool, Box<dyn Error>> {
        match self.next_frame(state) {
            Some(changed) => {
                self.render_pixels(&changed)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Takes the draw flag; yields the cells to redraw when it was set or
    /// nothing has been drawn yet.
    pub fn next_frame(&mut self, state: &mut MachineState) -> Option<Vec<(usize, usize, bool)>> {
        if !state.take_draw_flag() && !self.first_render {
            return None;
        }
        Some(self.changed_pixels(&state.vram))
    }

    /// Records `vram` as the current frame and returns the cells that differ
    /// from the previous one as `(x, y, lit)`. The first frame reports every cell.
    pub fn changed_pixels(&mut self, vram: &[u8; VRAM_SIZE]) -> Vec<(usize, usize, bool)> {
        let mut changed = Vec::new();
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                let index = x + y * SCREEN_WIDTH;
                if self.first_render || self.pixels[index] != vram[index] {
                    changed.push((x, y, vram[index] == 1));
                }
            }
        }

        self.pixels = *vram;
        self.first_render = false;
        changed
    }

    fn render_pixels(&self, changed: &[(usize, usize, bool)]) -> Result<(), Box<dyn Error>> {
        let mut stdout = stdout();
        for &(x, y, lit) in changed {
            stdout.queue(cursor::MoveTo(x as u16, y as u16))?;
            if lit {
                write!(stdout, "{}", "█")?;
            } else {
                write!(stdout, "{}", "█".hidden())?;
            }
        }
        stdout.queue(cursor::MoveTo(0, SCREEN_HEIGHT as u16 + 1))?;
        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_reports_everything() {
        let mut screen = Screen::default();
        let vram = [0u8; VRAM_SIZE];
        assert_eq!(screen.changed_pixels(&vram).len(), VRAM_SIZE);
        assert!(screen.changed_pixels(&vram).is_empty());
    }

    #[test]
    fn next_frame_follows_draw_flag() {
        let mut screen = Screen::default();
        let mut state = MachineState::new();

        assert_eq!(screen.next_frame(&mut state).map(|c| c.len()), Some(VRAM_SIZE));

        state.vram[5] = 1;
        assert_eq!(screen.next_frame(&mut state), None);

        state.draw_flag = true;
        assert_eq!(screen.next_frame(&mut state), Some(vec![(5, 0, true)]));
        assert!(!state.draw_flag);
        assert_eq!(screen.next_frame(&mut state), None);
    }

    #[test]
    fn later_frames_report_only_differences() {
        let mut screen = Screen::default();
        let mut vram = [0u8; VRAM_SIZE];
        screen.changed_pixels(&vram);

        vram[3 + 2 * SCREEN_WIDTH] = 1;
        assert_eq!(screen.changed_pixels(&vram), vec![(3, 2, true)]);

        vram[3 + 2 * SCREEN_WIDTH] = 0;
        assert_eq!(screen.changed_pixels(&vram), vec![(3, 2, false)]);
    }
}
