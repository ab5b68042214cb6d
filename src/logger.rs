use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use log::{LevelFilter, Log, Metadata, Record};

/// Appends log records to a file; the terminal belongs to the screen.
struct Logger {
    file: Mutex<File>,
    level: LevelFilter,
}

static INSTANCE: OnceLock<Logger> = OnceLock::new();

impl Logger {
    fn line(record: &Record) -> String {
        format!("{:<5} {}: {}\n", record.level(), record.target(), record.args())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(Logger::line(record).as_bytes());
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Installs the file logger as the `log` backend. Later calls fail and leave the file alone.
pub fn init(path: &Path, level: LevelFilter) -> Result<(), Box<dyn Error>> {
    if INSTANCE.get().is_some() {
        return Err("logger already installed".into());
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    let logger = INSTANCE.get_or_init(|| Logger {
        file: Mutex::new(file),
        level,
    });
    log::set_logger(logger)?;
    log::set_max_level(logger.level);
    Ok(())
}

pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level `{}`", level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn formats_level_and_target() {
        let line = Logger::line(
            &Record::builder()
                .level(Level::Warn)
                .target("chip8_vm::cpu")
                .args(format_args!("hello {}", 1))
                .build(),
        );
        assert_eq!(line, "WARN  chip8_vm::cpu: hello 1\n");
    }

    // The only test that installs the process-wide logger.
    #[test]
    fn init_installs_once_and_writes_to_file() {
        let path = std::env::temp_dir().join(format!("chip8-vm-{}.log", std::process::id()));
        init(&path, LevelFilter::Info).unwrap();
        log::info!("machine ready");
        log::debug!("not recorded");

        assert!(init(&path, LevelFilter::Trace).is_err());
        log::logger().flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("INFO  chip8_vm::logger::tests: machine ready"));
        assert!(!written.contains("not recorded"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn parses_levels() {
        assert_eq!(parse_level("trace"), Ok(LevelFilter::Trace));
        assert_eq!(parse_level("OFF"), Ok(LevelFilter::Off));
        assert!(parse_level("loud").is_err());
    }
}
