//! Timing constants for the simulator.
//!
//! These use `std::time::Duration`, which the `no_std` engine crate does not
//! have, so they live here.

use std::time::Duration;

use cluster_common::config::UPDATE_INTERVAL_MS;

/// One engine tick. The main loop sleeps if a frame completes early.
pub const FRAME_TIME: Duration = Duration::from_millis(UPDATE_INTERVAL_MS as u64);

/// Hold time after which a key press becomes a long click.
pub const LONG_CLICK_TIME: Duration = Duration::from_millis(800);

/// How long the boot screen stays up.
pub const BOOT_TIME: Duration = Duration::from_millis(1500);
