//! Maps fetched words to instructions.
//!
//! Every 16-bit value decodes to exactly one [`Instruction`] or to
//! [`InvalidOpcode`]. Operand fields are extracted up front so the
//! instruction functions never look at the raw word again.

use std::fmt;

use crate::error::InvalidOpcode;
use crate::util::nibbles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,
    ReturnFromSub,
    JumpAddr { nnn: u16 },
    CallSub { nnn: u16 },
    SkipIfVxEqualToNN { x: usize, nn: u8 },
    SkipIfVxNotEqualToNN { x: usize, nn: u8 },
    SkipIfVxEqualToVy { x: usize, y: usize },
    SetVxToImmediate { x: usize, nn: u8 },
    AddNNToVx { x: usize, nn: u8 },
    AssignVyToVx { x: usize, y: usize },
    VxOrVy { x: usize, y: usize },
    VxAndVy { x: usize, y: usize },
    VxXorVy { x: usize, y: usize },
    AddVyToVx { x: usize, y: usize },
    SubVyFromVx { x: usize, y: usize },
    ShiftVxRight { x: usize },
    SubVxFromVy { x: usize, y: usize },
    ShiftVxLeft { x: usize },
    SkipIfVxNotEqualToVy { x: usize, y: usize },
    SetMemoryNNN { nnn: u16 },
    JumpAddrSum { nnn: u16 },
    RandToVx { x: usize, nn: u8 },
    Draw { x: usize, y: usize, n: u8 },
    SkipIfKeyPressed { x: usize },
    SkipIfKeyNotPressed { x: usize },
    SetVxToDelay { x: usize },
    WaitForKeyPress { x: usize },
    SetDelayToVx { x: usize },
    SetSoundToVx { x: usize },
    AddVxToI { x: usize },
    SetIToSpriteAddr { x: usize },
    SetBcd { x: usize },
    DumpRegisters { x: usize },
    LoadRegisters { x: usize },
}

pub fn decode(op: u16) -> Result<Instruction, InvalidOpcode> {
    use Instruction::*;

    let (group, x, y, n) = nibbles(op);
    let (x, y) = (x as usize, y as usize);
    let nn = op as u8;
    let nnn = op & 0x0FFF;

    let instruction = match group {
        0x0 => match nn {
            0xE0 => ClearScreen,
            0xEE => ReturnFromSub,
            _ => return Err(InvalidOpcode(op)),
        },
        0x1 => JumpAddr { nnn },
        0x2 => CallSub { nnn },
        0x3 => SkipIfVxEqualToNN { x, nn },
        0x4 => SkipIfVxNotEqualToNN { x, nn },
        0x5 => SkipIfVxEqualToVy { x, y },
        0x6 => SetVxToImmediate { x, nn },
        0x7 => AddNNToVx { x, nn },
        0x8 => match n {
            0x0 => AssignVyToVx { x, y },
            0x1 => VxOrVy { x, y },
            0x2 => VxAndVy { x, y },
            0x3 => VxXorVy { x, y },
            0x4 => AddVyToVx { x, y },
            0x5 => SubVyFromVx { x, y },
            0x6 => ShiftVxRight { x },
            0x7 => SubVxFromVy { x, y },
            0xE => ShiftVxLeft { x },
            _ => return Err(InvalidOpcode(op)),
        },
        0x9 => SkipIfVxNotEqualToVy { x, y },
        0xA => SetMemoryNNN { nnn },
        0xB => JumpAddrSum { nnn },
        0xC => RandToVx { x, nn },
        0xD => Draw { x, y, n },
        0xE => match n {
            0xE => SkipIfKeyPressed { x },
            0x1 => SkipIfKeyNotPressed { x },
            _ => return Err(InvalidOpcode(op)),
        },
        0xF => match nn {
            0x07 => SetVxToDelay { x },
            0x0A => WaitForKeyPress { x },
            0x15 => SetDelayToVx { x },
            0x18 => SetSoundToVx { x },
            0x1E => AddVxToI { x },
            0x29 => SetIToSpriteAddr { x },
            0x33 => SetBcd { x },
            0x55 => DumpRegisters { x },
            0x65 => LoadRegisters { x },
            _ => return Err(InvalidOpcode(op)),
        },
        _ => return Err(InvalidOpcode(op)),
    };

    Ok(instruction)
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            ReturnFromSub => write!(f, "RET"),
            JumpAddr { nnn } => write!(f, "JP {:#05x}", nnn),
            CallSub { nnn } => write!(f, "CALL {:#05x}", nnn),
            SkipIfVxEqualToNN { x, nn } => write!(f, "SE V{:X}, {:#04x}", x, nn),
            SkipIfVxNotEqualToNN { x, nn } => write!(f, "SNE V{:X}, {:#04x}", x, nn),
            SkipIfVxEqualToVy { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            SetVxToImmediate { x, nn } => write!(f, "LD V{:X}, {:#04x}", x, nn),
            AddNNToVx { x, nn } => write!(f, "ADD V{:X}, {:#04x}", x, nn),
            AssignVyToVx { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            VxOrVy { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            VxAndVy { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            VxXorVy { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddVyToVx { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            SubVyFromVx { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftVxRight { x } => write!(f, "SHR V{:X}", x),
            SubVxFromVy { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftVxLeft { x } => write!(f, "SHL V{:X}", x),
            SkipIfVxNotEqualToVy { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            SetMemoryNNN { nnn } => write!(f, "LD I, {:#05x}", nnn),
            JumpAddrSum { nnn } => write!(f, "JP V0, {:#05x}", nnn),
            RandToVx { x, nn } => write!(f, "RND V{:X}, {:#04x}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipIfKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipIfKeyNotPressed { x } => write!(f, "SKNP V{:X}", x),
            SetVxToDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitForKeyPress { x } => write!(f, "LD V{:X}, K", x),
            SetDelayToVx { x } => write!(f, "LD DT, V{:X}", x),
            SetSoundToVx { x } => write!(f, "LD ST, V{:X}", x),
            AddVxToI { x } => write!(f, "ADD I, V{:X}", x),
            SetIToSpriteAddr { x } => write!(f, "LD F, V{:X}", x),
            SetBcd { x } => write!(f, "LD B, V{:X}", x),
            DumpRegisters { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegisters { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn decodes_operand_fields() {
        assert_eq!(decode(0x6A3C), Ok(SetVxToImmediate { x: 0xA, nn: 0x3C }));
        assert_eq!(decode(0xD124), Ok(Draw { x: 1, y: 2, n: 4 }));
        assert_eq!(decode(0x2214), Ok(CallSub { nnn: 0x214 }));
        assert_eq!(decode(0xB123), Ok(JumpAddrSum { nnn: 0x123 }));
        assert_eq!(decode(0x8AB7), Ok(SubVxFromVy { x: 0xA, y: 0xB }));
    }

    #[test]
    fn group_zero_only_knows_cls_and_ret() {
        assert_eq!(decode(0x00E0), Ok(ClearScreen));
        assert_eq!(decode(0x00EE), Ok(ReturnFromSub));
        assert_eq!(decode(0x0000), Err(InvalidOpcode(0x0000)));
        assert_eq!(decode(0x0123), Err(InvalidOpcode(0x0123)));
    }

    #[test]
    fn unlisted_sub_variants_are_invalid() {
        for op in [0x8008, 0x800F, 0x00E1, 0xE19F, 0xF100, 0xFFFF] {
            assert_eq!(decode(op), Err(InvalidOpcode(op)), "{:#06x}", op);
        }
    }

    #[test]
    fn every_word_decodes_or_fails() {
        let valid = (0..=u16::MAX).filter(|&op| decode(op).is_ok()).count();
        let expected = 0x10 * 2 // 0_E0, 0_EE
            + 0x1000 * 2 // 1NNN, 2NNN
            + 0x1000 * 2 // 3XNN, 4XNN
            + 0x1000 // 5XY_
            + 0x1000 * 2 // 6XNN, 7XNN
            + 0x100 * 9 // 8XY_
            + 0x1000 // 9XY_
            + 0x1000 * 4 // ANNN, BNNN, CXNN, DXYN
            + 0x100 * 2 // EX_E, EX_1
            + 0x10 * 9; // FX__
        assert_eq!(valid, expected);
    }

    #[test]
    fn renders_mnemonics() {
        assert_eq!(decode(0x00E0).unwrap().to_string(), "CLS");
        assert_eq!(decode(0x1204).unwrap().to_string(), "JP 0x204");
        assert_eq!(decode(0x611E).unwrap().to_string(), "LD V1, 0x1e");
        assert_eq!(decode(0xD124).unwrap().to_string(), "DRW V1, V2, 4");
        assert_eq!(decode(0xF355).unwrap().to_string(), "LD [I], V3");
    }
}
