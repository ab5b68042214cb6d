use std::io::{stdout, Write};
use std::{error::Error, thread, time};

use clap::Parser;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::{cursor, execute, terminal};

use chip8_vm::config::Config;
use chip8_vm::keypad::Keypad;
use chip8_vm::screen::Screen;
use chip8_vm::{logger, Cpu};

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    logger::init(&config.log_file, config.log_level)?;

    let program = config.program()?;
    let mut cpu = match config.seed {
        Some(seed) => Cpu::with_seed(seed),
        None => Cpu::new(),
    };
    cpu.load(&program)?;
    log::info!("starting with {} program bytes", program.len());

    let mut out = stdout();
    terminal::enable_raw_mode()?;
    execute!(out, terminal::Clear(terminal::ClearType::All), cursor::Hide)?;

    let result = run(&mut cpu, &config);

    execute!(out, cursor::Show, cursor::MoveToNextLine(1))?;
    terminal::disable_raw_mode()?;

    if let Err(error) = &result {
        log::error!("machine stopped: {}", error);
    }
    result
}

/// Runs frames until Escape / Ctrl-C or a machine fault.
fn run(cpu: &mut Cpu, config: &Config) -> Result<(), Box<dyn Error>> {
    let frame = time::Duration::from_millis(config.frame_ms);
    let mut screen = Screen::default();
    let mut keypad = Keypad::new(config.key_hold_frames);

    loop {
        let started = time::Instant::now();

        keypad.tick(&mut cpu.state);
        while poll(time::Duration::from_millis(0))? {
            if let Event::Key(KeyEvent { code, modifiers }) = read()? {
                let ctrl_c =
                    code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL);
                if code == KeyCode::Esc || ctrl_c {
                    return Ok(());
                }
                keypad.press(code, &mut cpu.state);
            }
        }

        if cpu.run_cycles(config.cycles_per_frame)?.sound_cue {
            let mut stdout = stdout();
            stdout.write_all(b"\x07")?;
            stdout.flush()?;
        }
        screen.present(&mut cpu.state)?;

        if let Some(rest) = frame.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
}
