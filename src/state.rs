use crate::error::MachineError;

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const PROGRAM_CAPACITY: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const VRAM_SIZE: usize = SCREEN_WIDTH * SCREEN_HEIGHT;
pub const STACK_SIZE: usize = 16;
pub const KEY_COUNT: usize = 16;
/// Bytes per glyph in the font table.
pub const GLYPH_SIZE: u16 = 5;

/// Hexadecimal digit sprites 0-F, loaded at address 0.
pub const FONT_SET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Whether the machine executes instructions or sits in `FX0A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Running,
    /// Waiting for a key; the index of the pressed key goes into `V[register]`.
    AwaitingKey { register: usize },
}

pub struct MachineState {
    pub memory: [u8; MEMORY_SIZE],
    pub registers: [u8; 16],
    pub address_register: u16,
    pub pc: u16,
    pub sp: usize,
    pub stack: [u16; STACK_SIZE],
    pub vram: [u8; VRAM_SIZE],
    pub keypad: [u8; KEY_COUNT],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub opcode: u16,
    pub draw_flag: bool,
    /// Set by the step in which the sound timer ticks from 1 to 0.
    pub beep: bool,
    pub mode: Mode,
}

impl Default for MachineState {
    fn default() -> Self {
        let mut memory = [0u8; MEMORY_SIZE];
        memory[..FONT_SET.len()].copy_from_slice(&FONT_SET);

        MachineState {
            memory,
            registers: [0u8; 16],
            address_register: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0u16; STACK_SIZE],
            vram: [0u8; VRAM_SIZE],
            keypad: [0u8; KEY_COUNT],
            delay_timer: 0,
            sound_timer: 0,
            opcode: 0,
            draw_flag: false,
            beep: false,
            mode: Mode::Running,
        }
    }
}

impl MachineState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Copies `program` into memory at 0x200. Registers, pc and stack are left alone.
    pub fn load(&mut self, program: &[u8]) -> Result<(), MachineError> {
        if program.len() > PROGRAM_CAPACITY {
            return Err(MachineError::Capacity {
                size: program.len(),
                capacity: PROGRAM_CAPACITY,
            });
        }

        let start = PROGRAM_START as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        log::debug!("loaded {} program bytes at {:#05x}", program.len(), start);
        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        self.mode != Mode::Running
    }

    /// Completes a pending `FX0A`: stores `key` in the waiting register and
    /// resumes execution. Returns false when nothing was waiting.
    pub fn resume(&mut self, key: u8) -> bool {
        match self.mode {
            Mode::AwaitingKey { register } => {
                self.registers[register] = key & 0xF;
                self.mode = Mode::Running;
                log::debug!("resumed with key {:X} into V{:X}", key & 0xF, register);
                true
            }
            Mode::Running => false,
        }
    }

    pub fn set_key(&mut self, index: usize, pressed: bool) {
        if let Some(key) = self.keypad.get_mut(index) {
            *key = pressed as u8;
        }
    }

    pub fn clear_keys(&mut self) {
        self.keypad = [0u8; KEY_COUNT];
    }

    /// True after the step in which the sound timer reached 1 and ran out;
    /// an audio collaborator starts its cue then.
    pub fn sound_cue(&self) -> bool {
        self.beep
    }

    /// Returns the draw flag and clears it; renderers call this once per frame.
    pub fn take_draw_flag(&mut self) -> bool {
        std::mem::replace(&mut self.draw_flag, false)
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.vram[(x % SCREEN_WIDTH) + (y % SCREEN_HEIGHT) * SCREEN_WIDTH] == 1
    }

    pub fn read(&self, address: u16) -> u8 {
        self.memory[address as usize % MEMORY_SIZE]
    }

    pub fn write(&mut self, address: u16, value: u8) {
        self.memory[address as usize % MEMORY_SIZE] = value;
    }

    /// Reads the big-endian word at `address`.
    pub fn read_word(&self, address: u16) -> u16 {
        u16::from_be_bytes([self.read(address), self.read(address.wrapping_add(1))])
    }

    pub fn push(&mut self, address: u16) {
        self.stack[self.sp] = address;
        self.sp = (self.sp + 1) % STACK_SIZE;
    }

    pub fn pop(&mut self) -> u16 {
        self.sp = (self.sp + STACK_SIZE - 1) % STACK_SIZE;
        self.stack[self.sp]
    }
}
