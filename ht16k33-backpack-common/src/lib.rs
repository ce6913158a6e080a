#![cfg_attr(not(test), no_std)]

pub mod animation;
pub mod bicolor;
pub mod common;
pub mod emulated_i2c;
pub mod ht16k33;
pub mod matrix;
pub mod seven_segment_display;

pub use common::{DisplayError, DisplayResult};
pub use ht16k33::{BitOp, BlinkRate, DisplayConfig, LedBackpack};

#[cfg(test)]
pub(crate) mod mocks;
