//! Instruction semantics. Each function applies one instruction to the
//! machine state, including its own program counter update.

use rand::Rng;

use crate::opcode::Instruction;
use crate::state::{MachineState, Mode, GLYPH_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::util::get_bit;

const FLAG: usize = 0xF;

impl Instruction {
    pub fn execute<R: Rng>(self, state: &mut MachineState, rng: &mut R) {
        use Instruction::*;

        match self {
            ClearScreen => clear_screen(state),
            ReturnFromSub => return_from_sub(state),
            JumpAddr { nnn } => jump_addr(state, nnn),
            CallSub { nnn } => call_sub(state, nnn),
            SkipIfVxEqualToNN { x, nn } => skip_if_vx_equal_to_nn(state, x, nn),
            SkipIfVxNotEqualToNN { x, nn } => skip_if_vx_not_equal_to_nn(state, x, nn),
            SkipIfVxEqualToVy { x, y } => skip_if_vx_equal_to_vy(state, x, y),
            SetVxToImmediate { x, nn } => set_vx_to_immediate(state, x, nn),
            AddNNToVx { x, nn } => add_nn_to_vx(state, x, nn),
            AssignVyToVx { x, y } => alu(state, x, y, |_, vy| vy),
            VxOrVy { x, y } => alu(state, x, y, |vx, vy| vx | vy),
            VxAndVy { x, y } => alu(state, x, y, |vx, vy| vx & vy),
            VxXorVy { x, y } => alu(state, x, y, |vx, vy| vx ^ vy),
            AddVyToVx { x, y } => add_vy_to_vx(state, x, y),
            SubVyFromVx { x, y } => sub_vy_from_vx(state, x, y),
            ShiftVxRight { x } => shift_vx_right(state, x),
            SubVxFromVy { x, y } => sub_vx_from_vy(state, x, y),
            ShiftVxLeft { x } => shift_vx_left(state, x),
            SkipIfVxNotEqualToVy { x, y } => skip_if_vx_not_equal_to_vy(state, x, y),
            SetMemoryNNN { nnn } => set_memory_nnn(state, nnn),
            JumpAddrSum { nnn } => jump_addr_sum(state, nnn),
            RandToVx { x, nn } => rand_to_vx(state, x, nn, rng.gen()),
            Draw { x, y, n } => draw(state, x, y, n),
            SkipIfKeyPressed { x } => skip_if_key_pressed(state, x),
            SkipIfKeyNotPressed { x } => skip_if_key_not_pressed(state, x),
            SetVxToDelay { x } => set_vx_to_delay(state, x),
            WaitForKeyPress { x } => wait_for_key_press(state, x),
            SetDelayToVx { x } => set_delay_to_vx(state, x),
            SetSoundToVx { x } => set_sound_to_vx(state, x),
            AddVxToI { x } => add_vx_to_i(state, x),
            SetIToSpriteAddr { x } => set_i_to_sprite_addr(state, x),
            SetBcd { x } => set_bcd(state, x),
            DumpRegisters { x } => dump_registers(state, x),
            LoadRegisters { x } => load_registers(state, x),
        }
    }
}

fn next(state: &mut MachineState) {
    state.pc = state.pc.wrapping_add(2);
}

/// Skips the following instruction when `condition` holds.
fn skip_if(state: &mut MachineState, condition: bool) {
    let step = if condition { 4 } else { 2 };
    state.pc = state.pc.wrapping_add(step);
}

pub fn skip_if_vx_equal_to_nn(state: &mut MachineState, x: usize, nn: u8) {
    let condition = state.registers[x] == nn;
    skip_if(state, condition);
}

pub fn skip_if_vx_not_equal_to_nn(state: &mut MachineState, x: usize, nn: u8) {
    let condition = state.registers[x] != nn;
    skip_if(state, condition);
}

pub fn skip_if_vx_equal_to_vy(state: &mut MachineState, x: usize, y: usize) {
    let condition = state.registers[x] == state.registers[y];
    skip_if(state, condition);
}

pub fn skip_if_vx_not_equal_to_vy(state: &mut MachineState, x: usize, y: usize) {
    let condition = state.registers[x] != state.registers[y];
    skip_if(state, condition);
}

pub fn skip_if_key_pressed(state: &mut MachineState, x: usize) {
    let condition = state.keypad[x] != 0;
    skip_if(state, condition);
}

pub fn skip_if_key_not_pressed(state: &mut MachineState, x: usize) {
    let condition = state.keypad[x] == 0;
    skip_if(state, condition);
}

pub fn clear_screen(state: &mut MachineState) {
    state.vram.iter_mut().for_each(|pixel| *pixel = 0);
    next(state);
}

/// Returns to the instruction after the matching call.
pub fn return_from_sub(state: &mut MachineState) {
    state.pc = state.pop();
    next(state);
}

pub fn jump_addr(state: &mut MachineState, nnn: u16) {
    state.pc = nnn;
}

/// Pushes the address of the call itself; `return_from_sub` adds the 2.
pub fn call_sub(state: &mut MachineState, nnn: u16) {
    state.push(state.pc);
    state.pc = nnn;
}

pub fn set_vx_to_immediate(state: &mut MachineState, x: usize, nn: u8) {
    state.registers[x] = nn;
    next(state);
}

pub fn add_nn_to_vx(state: &mut MachineState, x: usize, nn: u8) {
    let reg = &mut state.registers[x];
    *reg = reg.wrapping_add(nn);
    next(state);
}

/// Flagless register-to-register operations: assign, or, and, xor.
pub fn alu(state: &mut MachineState, x: usize, y: usize, op: impl Fn(u8, u8) -> u8) {
    let reg_y = state.registers[y];
    let reg_x = &mut state.registers[x];
    *reg_x = op(*reg_x, reg_y);
    next(state);
}

/// VF is 1 on carry. VF is written last, so with x = 0xF it holds the flag.
pub fn add_vy_to_vx(state: &mut MachineState, x: usize, y: usize) {
    let (result, carry) = state.registers[x].overflowing_add(state.registers[y]);
    state.registers[x] = result;
    state.registers[FLAG] = carry as u8;
    next(state);
}

/// VF is 0 on borrow, 1 otherwise.
pub fn sub_vy_from_vx(state: &mut MachineState, x: usize, y: usize) {
    let (result, borrow) = state.registers[x].overflowing_sub(state.registers[y]);
    state.registers[x] = result;
    state.registers[FLAG] = !borrow as u8;
    next(state);
}

pub fn sub_vx_from_vy(state: &mut MachineState, x: usize, y: usize) {
    let (result, borrow) = state.registers[y].overflowing_sub(state.registers[x]);
    state.registers[x] = result;
    state.registers[FLAG] = !borrow as u8;
    next(state);
}

pub fn shift_vx_right(state: &mut MachineState, x: usize) {
    let reg_x = state.registers[x];
    state.registers[x] = reg_x >> 1;
    state.registers[FLAG] = reg_x & 1;
    next(state);
}

pub fn shift_vx_left(state: &mut MachineState, x: usize) {
    let reg_x = state.registers[x];
    state.registers[x] = reg_x << 1;
    state.registers[FLAG] = reg_x >> 7;
    next(state);
}

pub fn set_memory_nnn(state: &mut MachineState, nnn: u16) {
    state.address_register = nnn;
    next(state);
}

pub fn jump_addr_sum(state: &mut MachineState, nnn: u16) {
    state.pc = nnn.wrapping_add(state.registers[0] as u16);
}

pub fn rand_to_vx(state: &mut MachineState, x: usize, nn: u8, random: u8) {
    state.registers[x] = random & nn;
    next(state);
}

/// XORs an `n`-row sprite read from `I` onto the screen at (Vx, Vy),
/// wrapping at the screen edges. VF reports whether any lit pixel was cleared.
pub fn draw(state: &mut MachineState, x: usize, y: usize, n: u8) {
    let x = state.registers[x] as usize;
    let y = state.registers[y] as usize;
    state.registers[FLAG] = 0;

    for row in 0..n as usize {
        let sprite_row = state.read(state.address_register.wrapping_add(row as u16));
        for col in 0..8 {
            if !get_bit(sprite_row, 7 - col) {
                continue;
            }

            let target_x = (x + col) % SCREEN_WIDTH;
            let target_y = (y + row) % SCREEN_HEIGHT;
            let pixel = &mut state.vram[target_x + target_y * SCREEN_WIDTH];
            if *pixel == 1 {
                state.registers[FLAG] = 1;
            }
            *pixel ^= 1;
        }
    }

    state.draw_flag = true;
    next(state);
}

pub fn set_vx_to_delay(state: &mut MachineState, x: usize) {
    state.registers[x] = state.delay_timer;
    next(state);
}

/// Retires immediately; the step loop stays frozen until `MachineState::resume`.
pub fn wait_for_key_press(state: &mut MachineState, x: usize) {
    state.mode = Mode::AwaitingKey { register: x };
    log::debug!("waiting for key into V{:X}", x);
    next(state);
}

pub fn set_delay_to_vx(state: &mut MachineState, x: usize) {
    state.delay_timer = state.registers[x];
    next(state);
}

pub fn set_sound_to_vx(state: &mut MachineState, x: usize) {
    state.sound_timer = state.registers[x];
    next(state);
}

pub fn add_vx_to_i(state: &mut MachineState, x: usize) {
    state.address_register = state
        .address_register
        .wrapping_add(state.registers[x] as u16);
    next(state);
}

pub fn set_i_to_sprite_addr(state: &mut MachineState, x: usize) {
    state.address_register = state.registers[x] as u16 * GLYPH_SIZE;
    next(state);
}

pub fn set_bcd(state: &mut MachineState, x: usize) {
    let reg = state.registers[x];
    let i = state.address_register;
    state.write(i, reg / 100);
    state.write(i.wrapping_add(1), (reg / 10) % 10);
    state.write(i.wrapping_add(2), reg % 10);
    next(state);
}

/// Stores V0 through Vx inclusive at I.
pub fn dump_registers(state: &mut MachineState, x: usize) {
    for i in 0..=x {
        state.write(state.address_register.wrapping_add(i as u16), state.registers[i]);
    }
    next(state);
}

pub fn load_registers(state: &mut MachineState, x: usize) {
    for i in 0..=x {
        state.registers[i] = state.read(state.address_register.wrapping_add(i as u16));
    }
    next(state);
}
