#![no_std]
#![no_main]

use embedded_hal::i2c::{ErrorType, I2c};
use esp32c3_hal::{
    clock::ClockControl,
    i2c::I2C,
    pac::Peripherals,
    prelude::*,
    systimer::SystemTimer,
    timer::TimerGroup,
    Delay, Rtc, IO,
};
use panic_halt as _;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use shared_bus::BusManagerSimple;

use ht16k33_backpack_common::{
    animation::{ClockFace, Scanner, Thinking, Ticker, CLOCK_PERIOD, SCANNER_PERIOD, THINKING_PERIOD},
    bicolor::BiColor,
    common::time::{Duration, Instant, RealTimeClock},
    matrix::EightByEight,
    seven_segment_display::SevenSegmentDisplay,
    ht16k33::DEFAULT_ADDRESS,
    DisplayConfig, DisplayResult, LedBackpack,
};

mod esp_logger;

// No address jumpers bridged on the matrix
const MATRIX_ADDR: u8 = DEFAULT_ADDRESS;
const BICOLOR_ADDR: u8 = 0x71;
const SEVEN_SEGMENT_ADDR: u8 = 0x72;

// The board has no wall clock, the clock starts at noon on every boot
const CLOCK_START: Duration = Duration::secs(12 * 60 * 60);
// How long the spinner runs at start up before the clock takes over
const THINKING_TIME: Duration = Duration::secs(3);

#[riscv_rt::entry]
fn main() -> ! {
    esp_logger::init_logger(log::LevelFilter::Info);

    let peripherals = Peripherals::take().unwrap();
    let mut system = peripherals.SYSTEM.split();
    let clocks = ClockControl::boot_defaults(system.clock_control).freeze();

    // Disable the RTC and TIMG watchdog timers
    let mut rtc = Rtc::new(peripherals.RTC_CNTL);
    let timer_group0 = TimerGroup::new(peripherals.TIMG0, &clocks);
    let mut wdt0 = timer_group0.wdt;
    let timer_group1 = TimerGroup::new(peripherals.TIMG1, &clocks);
    let mut wdt1 = timer_group1.wdt;

    rtc.swd.disable();
    rtc.rwdt.disable();
    wdt0.disable();
    wdt1.disable();

    let io = IO::new(peripherals.GPIO, peripherals.IO_MUX);

    let i2c = I2C::new(
        peripherals.I2C0,
        io.pins.gpio1,
        io.pins.gpio0,
        400u32.kHz(),
        &mut system.peripheral_clock_control,
        &clocks,
    );

    let i2c_bus = BusManagerSimple::new(i2c);

    let mut devices = Devices {
        matrix: EightByEight::new(i2c_bus.acquire_i2c(), MATRIX_ADDR),
        bicolor: BiColor::new(i2c_bus.acquire_i2c(), BICOLOR_ADDR),
        seven_segment: SevenSegmentDisplay::new(i2c_bus.acquire_i2c(), SEVEN_SEGMENT_ADDR),
    };

    // Delay to allow the backpacks to power up
    Delay::new(&clocks).delay_ms(500u32);

    if let Err(err) = devices.initialize() {
        error!("Failed to initialize the displays: {:?}", err);
        devices.turn_off();
        panic!("Fatal error in initialize: {:?}", err);
    }

    info!("Displays initialized");

    if let Err(err) = devices.run() {
        error!("Fatal error in run: {:?}", err);
        devices.turn_off();
        panic!("Fatal error in run: {:?}", err);
    }

    unreachable!()
}

struct Devices<I2C> {
    matrix: EightByEight<I2C>,
    bicolor: BiColor<I2C>,
    seven_segment: SevenSegmentDisplay<I2C>,
}

impl<I2C> Devices<I2C>
where
    I2C: I2c,
{
    fn initialize(&mut self) -> DisplayResult<(), I2C::Error> {
        let config = DisplayConfig::default();

        self.matrix.initialize(config)?;
        self.bicolor.initialize(config)?;
        self.seven_segment.initialize(config)?;

        Ok(())
    }

    /// Runs the enabled animations. Only returns on a bus error.
    fn run(&mut self) -> DisplayResult<(), I2C::Error> {
        let start = Time.now();

        let mut matrix_scanner = Scanner::new();
        let mut bicolor_scanner = Scanner::new();
        let mut thinking = Thinking::new();
        let clock = ClockFace::new(CLOCK_START);

        let mut scanner_ticker = Ticker::new(SCANNER_PERIOD, start);
        let mut thinking_ticker = Ticker::new(THINKING_PERIOD, start);
        let mut clock_ticker = Ticker::new(CLOCK_PERIOD, start);

        loop {
            let now = Time.now();

            if scanner_ticker.is_due(now) {
                if cfg!(feature = "scanner") {
                    matrix_scanner.render(&mut self.matrix)?;
                }

                if cfg!(feature = "bicolor") {
                    bicolor_scanner.render_bicolor(&mut self.bicolor)?;
                }
            }

            let show_clock = cfg!(feature = "clock")
                && (!cfg!(feature = "thinking") || now - start >= THINKING_TIME);

            if show_clock {
                if clock_ticker.is_due(now) {
                    clock.render(&mut self.seven_segment, now)?;
                }
            } else if cfg!(feature = "thinking") && thinking_ticker.is_due(now) {
                thinking.render(&mut self.seven_segment)?;
            }
        }
    }

    fn turn_off(&mut self) {
        // Ignore errors while turning the displays off, the bus may be gone
        shut_down(&mut self.matrix).unwrap_or_default();
        shut_down(&mut self.bicolor).unwrap_or_default();
        shut_down(&mut self.seven_segment).unwrap_or_default();
    }
}

fn shut_down<D: LedBackpack>(display: &mut D) -> DisplayResult<(), <D::Bus as ErrorType>::Error> {
    display.shut_down()?;
    Ok(())
}

struct Time;

impl RealTimeClock for Time {
    fn now(&self) -> Instant {
        Instant::from_ticks(SystemTimer::now())
    }
}
