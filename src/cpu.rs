use rand::{rngs::StdRng, SeedableRng};

use crate::error::MachineError;
use crate::opcode::decode;
use crate::state::{MachineState, Mode};

/// What a call to [`Cpu::run_cycles`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cycles {
    pub executed: usize,
    /// Whether any of the executed steps produced a sound cue.
    pub sound_cue: bool,
}

/// Drives a [`MachineState`] one instruction at a time.
pub struct Cpu {
    pub state: MachineState,
    rng: StdRng,
}

impl Default for Cpu {
    fn default() -> Self {
        Cpu {
            state: Default::default(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl Cpu {
    pub fn new() -> Self {
        Default::default()
    }

    /// A machine whose `CXNN` results are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Cpu {
            state: Default::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn load(&mut self, program: &[u8]) -> Result<(), MachineError> {
        self.state.load(program)
    }

    pub fn resume(&mut self, key: u8) -> bool {
        self.state.resume(key)
    }

    /// Executes one instruction cycle. Does nothing while waiting for a key.
    ///
    /// An unknown opcode leaves `pc` where it was and is returned as
    /// [`MachineError::InvalidOpcode`].
    pub fn step(&mut self) -> Result<(), MachineError> {
        if self.state.is_stopped() {
            return Ok(());
        }

        let state = &mut self.state;
        let pc = state.pc;
        state.opcode = state.read_word(pc);

        let instruction = decode(state.opcode).map_err(|err| {
            log::error!("{} at {:#05x}", err, pc);
            MachineError::at(err, pc)
        })?;
        log::trace!("{:#05x}: {:04X} {}", pc, state.opcode, instruction);
        instruction.execute(state, &mut self.rng);

        if state.delay_timer > 0 {
            state.delay_timer -= 1;
        }
        state.beep = state.sound_timer == 1;
        if state.beep {
            log::debug!("sound cue at {:#05x}", pc);
        }
        if state.sound_timer > 0 {
            state.sound_timer -= 1;
        }

        Ok(())
    }

    /// Runs up to `cycles` steps, stopping early once the machine waits for a key.
    pub fn run_cycles(&mut self, cycles: usize) -> Result<Cycles, MachineError> {
        let mut summary = Cycles::default();
        for _ in 0..cycles {
            if self.state.mode != Mode::Running {
                break;
            }
            self.step()?;
            summary.executed += 1;
            summary.sound_cue |= self.state.sound_cue();
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_with(program: &[u8]) -> Cpu {
        let mut cpu = Cpu::with_seed(7);
        cpu.load(program).unwrap();
        cpu
    }

    #[test]
    fn step_fetches_big_endian_and_advances() {
        let mut cpu = cpu_with(&[0x6A, 0x3C]);
        cpu.step().unwrap();
        assert_eq!(cpu.state.opcode, 0x6A3C);
        assert_eq!(cpu.state.registers[0xA], 0x3C);
        assert_eq!(cpu.state.pc, 0x202);
    }

    #[test]
    fn stopped_machine_is_frozen() {
        let mut cpu = cpu_with(&[0xF1, 0x0A, 0x61, 0x05]);
        cpu.state.delay_timer = 5;
        cpu.step().unwrap();
        assert!(cpu.state.is_stopped());
        assert_eq!(cpu.state.delay_timer, 4);

        cpu.step().unwrap();
        cpu.step().unwrap();
        assert_eq!(cpu.state.pc, 0x202);
        assert_eq!(cpu.state.delay_timer, 4);

        assert!(cpu.resume(0xC));
        assert_eq!(cpu.state.registers[1], 0xC);
        cpu.step().unwrap();
        assert_eq!(cpu.state.registers[1], 0x05);
        assert_eq!(cpu.state.pc, 0x204);
    }

    #[test]
    fn run_cycles_stops_at_key_wait() {
        let mut cpu = cpu_with(&[0x60, 0x01, 0xF2, 0x0A, 0x12, 0x04]);
        assert_eq!(cpu.run_cycles(10).unwrap().executed, 2);
        assert_eq!(cpu.state.mode, Mode::AwaitingKey { register: 2 });
    }

    #[test]
    fn sound_timer_decays_to_zero() {
        let mut cpu = cpu_with(&[0x12, 0x00]);
        cpu.state.sound_timer = 2;
        cpu.step().unwrap();
        assert!(!cpu.state.sound_cue());
        cpu.step().unwrap();
        assert!(cpu.state.sound_cue());
        assert_eq!(cpu.state.sound_timer, 0);
        cpu.step().unwrap();
        assert!(!cpu.state.sound_cue());
        assert_eq!(cpu.state.sound_timer, 0);
    }

    #[test]
    fn one_tick_sound_timer_still_cues() {
        // LD V0, 1; LD ST, V0; JP 0x204
        let mut cpu = cpu_with(&[0x60, 0x01, 0xF0, 0x18, 0x12, 0x04]);
        cpu.step().unwrap();
        assert!(!cpu.state.sound_cue());
        cpu.step().unwrap();
        assert!(cpu.state.sound_cue());
        assert_eq!(cpu.state.sound_timer, 0);
        cpu.step().unwrap();
        assert!(!cpu.state.sound_cue());
    }

    #[test]
    fn run_cycles_reports_sound_cue() {
        let mut cpu = cpu_with(&[0x60, 0x01, 0xF0, 0x18, 0x12, 0x04]);
        let summary = cpu.run_cycles(3).unwrap();
        assert_eq!(
            summary,
            Cycles {
                executed: 3,
                sound_cue: true
            }
        );
        assert!(!cpu.run_cycles(3).unwrap().sound_cue);
    }

    #[test]
    fn invalid_opcode_reports_pc() {
        let mut cpu = cpu_with(&[0x60, 0x01, 0x00, 0x00]);
        cpu.step().unwrap();
        assert_eq!(
            cpu.step(),
            Err(MachineError::InvalidOpcode {
                opcode: 0x0000,
                pc: 0x202
            })
        );
        assert_eq!(cpu.state.pc, 0x202);
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let mut a = cpu_with(&[0xC0, 0xFF]);
        let mut b = cpu_with(&[0xC0, 0xFF]);
        a.step().unwrap();
        b.step().unwrap();
        assert_eq!(a.state.registers[0], b.state.registers[0]);
    }
}
