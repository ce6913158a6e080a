use esp_println::println;
use log::{LevelFilter, Log, Metadata, Record};

static LOGGER: EspLogger = EspLogger;

/// Sends log output to the UART through esp-println.
struct EspLogger;

pub fn init_logger(level: LevelFilter) {
    // Only ever called once from main, before anything else runs
    unsafe {
        log::set_logger_racy(&LOGGER).unwrap_or_default();
    }

    log::set_max_level(level);
}

impl Log for EspLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}
