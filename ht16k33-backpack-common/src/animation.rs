//! Simple animations for the backpacks, each advanced one frame at a time by
//! the caller at its own period. None of them keep a copy of what is on the
//! display; every frame is written out in full.
use embedded_hal::i2c::I2c;

use crate::{
    bicolor::{self, BiColor, Color},
    common::{time::{Duration, Instant}, DisplayResult},
    matrix::{self, EightByEight, MATRIX_SIZE},
    seven_segment_display::{segment, SevenSegmentDisplay, MAX_DIGITS},
};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

/// One full sweep across the matrix and back per second.
pub const SCANNER_PERIOD: Duration = Duration::micros(62_500);
pub const THINKING_PERIOD: Duration = Duration::millis(100);
/// Often enough that the colon changes close to the second boundary.
pub const CLOCK_PERIOD: Duration = Duration::millis(250);

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Tracks when something that runs every `period` is next due.
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    /// Creates a ticker that is due right away at `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next: now,
        }
    }

    /// Returns whether the ticker is due at `now`, and if so schedules the
    /// next tick. Missed ticks are skipped rather than caught up on.
    pub fn is_due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }

        self.next += self.period;

        if self.next <= now {
            self.next = now + self.period;
        }

        true
    }
}

/// A horizontal and a vertical line crossing at a cursor that bounces along
/// the diagonal of an 8x8 matrix.
pub struct Scanner {
    position: usize,
    forward: bool,
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            position: 0,
            forward: true,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The rows of the current frame: the cursor row is fully lit, every other
    /// row only has the cursor column lit.
    pub fn frame(&self) -> [u8; MATRIX_SIZE] {
        let mut frame = [matrix::column_mask(self.position); MATRIX_SIZE];
        frame[self.position] = 0xFF;
        frame
    }

    /// Moves the cursor one step, turning around at either edge.
    pub fn advance(&mut self) {
        if self.forward {
            self.position += 1;
        } else {
            self.position -= 1;
        }

        if self.position == MATRIX_SIZE - 1 {
            self.forward = false;
        } else if self.position == 0 {
            self.forward = true;
        }
    }

    /// Writes the current frame to `matrix` and advances.
    pub fn render<I2C>(&mut self, matrix: &mut EightByEight<I2C>) -> DisplayResult<(), I2C::Error>
    where
        I2C: I2c,
    {
        for (row, bits) in self.frame().into_iter().enumerate() {
            matrix.set_row_from_bits(row, bits)?;
        }

        self.advance();
        Ok(())
    }

    /// Writes the current frame to a bicolor `square` and advances. The cursor
    /// column is green and the cursor row is red, so they cross in yellow.
    pub fn render_bicolor<I2C>(&mut self, square: &mut BiColor<I2C>) -> DisplayResult<(), I2C::Error>
    where
        I2C: I2c,
    {
        let row = bicolor::row_mask(self.position);

        for column in 0..bicolor::MATRIX_SIZE {
            let green = if column == self.position { 0xFF } else { 0x00 };
            square.set_column(column, green, Color::Green)?;
            square.set_column(column, row, Color::Red)?;
        }

        self.advance();
        Ok(())
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// A single segment chasing around the top and sides of every digit at once,
/// to show that something is being worked on.
pub struct Thinking {
    segments: u8,
}

impl Thinking {
    pub fn new() -> Self {
        Self { segments: segment::TOP }
    }

    pub fn segments(&self) -> u8 {
        self.segments
    }

    /// Moves to the next segment of the outer ring (top, right, bottom, left),
    /// starting over at the top after the left top segment.
    pub fn advance(&mut self) {
        self.segments = if self.segments >= segment::LEFT_TOP {
            segment::TOP
        } else {
            self.segments << 1
        };
    }

    /// Writes the current frame to every digit of `display` and advances.
    pub fn render<I2C>(&mut self, display: &mut SevenSegmentDisplay<I2C>) -> DisplayResult<(), I2C::Error>
    where
        I2C: I2c,
    {
        for position in 0..MAX_DIGITS {
            display.set_digit(position, self.segments)?;
        }

        self.advance();
        Ok(())
    }
}

impl Default for Thinking {
    fn default() -> Self {
        Self::new()
    }
}

/// A 24 hour HH:MM clock. There is no wall clock on the board, so the time of
/// day is an offset from the time since boot.
pub struct ClockFace {
    start_seconds: u64,
}

impl ClockFace {
    /// Creates a clock that reads `time_of_day` at the zero instant.
    pub fn new(time_of_day: Duration) -> Self {
        Self {
            start_seconds: time_of_day.to_secs() % SECONDS_PER_DAY,
        }
    }

    /// Hours, minutes and seconds at `now`.
    pub fn time_of_day(&self, now: Instant) -> (u8, u8, u8) {
        let seconds = (self.start_seconds + now.duration_since_epoch().to_secs()) % SECONDS_PER_DAY;

        (
            (seconds / SECONDS_PER_HOUR) as u8,
            ((seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u8,
            (seconds % SECONDS_PER_MINUTE) as u8,
        )
    }

    /// Shows the time at `now` on `display`. The colon blinks, lit on even
    /// seconds.
    pub fn render<I2C>(&self, display: &mut SevenSegmentDisplay<I2C>, now: Instant) -> DisplayResult<(), I2C::Error>
    where
        I2C: I2c,
    {
        let (hours, minutes, seconds) = self.time_of_day(now);
        let digits = [hours / 10, hours % 10, minutes / 10, minutes % 10];

        for (position, digit) in digits.into_iter().enumerate() {
            display.write_character(position, char::from(b'0' + digit))?;
        }

        if seconds % 2 == 0 {
            display.turn_on_colon()
        } else {
            display.turn_off_colon()
        }
    }
}
