use crossterm::event::KeyCode;

use crate::state::{MachineState, KEY_COUNT};

// use numpad as hex keyboard
pub const KEY_MAP: &[KeyCode; KEY_COUNT] = &[
    KeyCode::Char('0'),
    KeyCode::Char('1'),
    KeyCode::Char('2'),
    KeyCode::Char('3'),
    KeyCode::Char('4'),
    KeyCode::Char('5'),
    KeyCode::Char('6'),
    KeyCode::Char('7'),
    KeyCode::Char('8'),
    KeyCode::Char('9'),
    KeyCode::Char('/'),
    KeyCode::Char('*'),
    KeyCode::Char('-'),
    KeyCode::Char('+'),
    KeyCode::Enter,
    KeyCode::Char('.'),
];

pub fn key_index(code: KeyCode) -> Option<u8> {
    KEY_MAP.iter().position(|&key| key == code).map(|i| i as u8)
}

/// Terminals only report presses, so a key counts as held for a fixed
/// number of frames after its last event.
pub struct Keypad {
    remaining: [u32; KEY_COUNT],
    hold_frames: u32,
}

impl Keypad {
    pub fn new(hold_frames: u32) -> Self {
        Keypad {
            remaining: [0; KEY_COUNT],
            hold_frames: hold_frames.max(1),
        }
    }

    /// Registers a key event. A machine waiting in `FX0A` resumes with this key.
    pub fn press(&mut self, code: KeyCode, state: &mut MachineState) -> Option<u8> {
        let index = key_index(code)?;
        self.remaining[index as usize] = self.hold_frames;
        state.set_key(index as usize, true);
        state.resume(index);
        Some(index)
    }

    /// Ages held keys by one frame and writes the result into the keypad.
    pub fn tick(&mut self, state: &mut MachineState) {
        for (index, remaining) in self.remaining.iter_mut().enumerate() {
            *remaining = remaining.saturating_sub(1);
            state.set_key(index, *remaining > 0);
        }
    }
}
