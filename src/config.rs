use std::{error::Error, fs, path::PathBuf};

use clap::Parser;
use log::LevelFilter;

use crate::logger::parse_level;

/// Program run when neither a ROM nor `--hex` is given: draws a small
/// sprite from a subroutine, then spins.
pub const DEMO_PROGRAM: &str = concat!(
    "611E", // set v1 to 30          . 512
    "620E", // set v2 to 14          . 514
    "A21C", // sprite is at 540      . 516
    "00E0", // clear screen          . 518
    "6301", // set v3                . 520
    "6402", //                       . 522
    "5340", // skip next if v3 == v4 . 524
    "2214", // call sub              . 526
    "120C", // jmp to 524            . 528
    "0000", //                       . 530
    "7301", // v3 += 1               . 532
    "D124", // draw x = v1, y = v2, 4 bytes . 534
    "00EE", // return from sub       . 536
    "0000", //                       . 538
    "183C", //                       . 540
    "7EFF", //                       . 542
    "0000", //                       . 544
);

#[derive(Debug, Parser)]
#[command(name = "chip8-vm", version, about = "Runs CHIP-8 programs in the terminal")]
pub struct Config {
    /// Program image to load at 0x200
    #[arg(conflicts_with = "hex")]
    pub rom: Option<PathBuf>,

    /// Inline program as hex digits, e.g. 00E01200
    #[arg(long)]
    pub hex: Option<String>,

    /// Wall-clock length of one frame in milliseconds
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// Instructions executed per frame; timers decay once per instruction
    #[arg(long, default_value_t = 1)]
    pub cycles_per_frame: usize,

    /// Frames a key stays pressed after a key event
    #[arg(long, default_value_t = 6)]
    pub key_hold_frames: u32,

    /// Seed for CXNN; random when absent
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "chip8.log")]
    pub log_file: PathBuf,

    #[arg(long, default_value = "warn", value_parser = parse_level)]
    pub log_level: LevelFilter,
}

impl Config {
    /// Reads the program bytes this configuration points at.
    pub fn program(&self) -> Result<Vec<u8>, Box<dyn Error>> {
        if let Some(path) = &self.rom {
            return Ok(fs::read(path)?);
        }

        let code = self.hex.as_deref().unwrap_or(DEMO_PROGRAM);
        let code: String = code.chars().filter(|c| !c.is_whitespace()).collect();
        match hex::decode(&code) {
            Ok(decoded) => Ok(decoded),
            Err(error) => Err(format!("cant decode program {:?}", error).into()),
        }
    }
}
