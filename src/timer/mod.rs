//! Timer and scheduling utilities for the link driver.
//!
//! The protocol scheduler is callback-chained: every call to
//! [`Cc2500::tick`](crate::driver::Cc2500::tick) returns the number of
//! milliseconds until the next tick, and the platform arms exactly one timer
//! callback from that value. This module provides the two ways of driving
//! that chain: an interrupt service routine using `critical_section::with`
//! (`timer-isr` feature), or a blocking delay loop (`delay-loop` feature).
//!
//! It also contains reload-value calculators for configuring a hardware
//! timer to a 1 ms base tick:
//! - `compute_reload_value`: runtime calculator
//! - `const_reload_value`: compile-time calculator
//!
//! Common prescalers for a 1 ms tick:
//!
//! | F_CPU  | PRESCALER | RELOAD |
//! |--------|-----------|--------|
//! |  8 MHz |        64 |    125 |
//! | 16 MHz |        64 |    250 |
//! | 16 MHz |       128 |    125 |

use libm::round;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

/// Base tick of the scheduling timer, in milliseconds. All delays returned
/// by the scheduler are integer multiples of this.
pub const TICK_MS: u32 = 1;
/// 1,000 milliseconds = 1 second
pub const MILLISECONDS_PER_SECOND: u32 = 1_000;

/// Computes the reload value for a hardware timer in periodic mode.
///
/// # Arguments
/// - `f_cpu`: CPU frequency in Hz
/// - `prescaler`: timer prescaler (e.g., 64, 128, 256)
/// - `tick_ms`: desired tick interval in milliseconds (1.0 for the link timer)
///
/// # Returns
/// Reload/compare value for the timer period register (rounds to nearest)
pub fn compute_reload_value(f_cpu: u32, prescaler: u32, tick_ms: f32) -> u16 {
    let ticks_per_second = f_cpu as f32 / prescaler as f32;
    let ticks_per_tick = ticks_per_second * (tick_ms / MILLISECONDS_PER_SECOND as f32);
    round(ticks_per_tick as f64) as u16
}

/// Compile-time reload value for a 1 ms hardware timer tick.
///
/// # Arguments
/// - `f_cpu`: CPU frequency in Hz
/// - `prescaler`: timer prescaler (e.g., 64, 128, 256)
///
/// # Returns
/// Reload/compare value for the timer period register (truncating)
pub const fn const_reload_value(f_cpu: u32, prescaler: u32) -> u16 {
    ((f_cpu / prescaler) / MILLISECONDS_PER_SECOND) as u16
}
