//! # cc2500-tx
//!
//! A portable, no_std Rust driver for the Texas Instruments CC2500 2.4 GHz
//! transceiver on the transmitter side of a frequency-hopping RC control
//! link, as found in hobby radio transmitter modules.
//!
//! This driver implements:
//! - register-level chip control over `embedded-hal` SPI and digital I/O
//! - deterministic 47-channel hopping-table generation from a 2-byte identity
//! - per-channel frequency-synthesizer calibration captured once at bring-up
//! - CRC16-protected 30-byte bind and control frames
//! - the timer-chained bind → transmit ⇄ receive protocol state machine
//! - an independent round-robin double-buffered analog sampler
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support (host-side testing) |
//! | `delay-loop`          | Blocking scheduler loop using `embedded_hal::delay::DelayNs` |
//! | `timer-isr` (default) | `critical_section`-based global-instance ISR helpers |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Usage
//!
//! ```ignore
//! use cc2500_tx::consts::DEFAULT_TX_ID;
//! use cc2500_tx::driver::Cc2500;
//!
//! let mut radio = Cc2500::new(spi, pa_pin, ce_pin, sticks, DEFAULT_TX_ID);
//! radio.init(&mut delay)?;
//! radio.set_power(6)?;
//! let mut next_ms = radio.start_bind()?;
//! // arm a one-shot timer for `next_ms`; in its callback:
//! //     next_ms = radio.tick()?;  // and re-arm
//! ```
//!
//! Or, with the `delay-loop` feature, hand the chain to a blocking loop:
//!
//! ```ignore
//! cc2500_tx::timer::run_link_loop(&mut radio, &mut delay)?;
//! ```
//!
//! ## Integration notes
//!
//! - The scheduler runs entirely in callback context and never blocks; only
//!   bring-up contains fixed settle delays.
//! - Exactly one timer callback is outstanding at any time: each tick
//!   returns the delay for the next one. Steady state is a fixed 9 ms
//!   transmit/receive period.
//! - The register configuration, hopping sequence, frame layouts, and CRC
//!   table are a wire-level contract with the receiver; see
//!   [`consts`] and [`crc`].
//! - Receive-side frame validation is not implemented here;
//!   [`driver::Cc2500::on_radio_irq`] is a placeholder.
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded
//! environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

#[cfg(any(feature = "log", feature = "defmt-0-3"))]
macro_rules! diag {
    ($($arg:tt)*) => {{
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
        #[cfg(feature = "defmt-0-3")]
        ::defmt::info!($($arg)*);
    }};
}

#[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
macro_rules! diag {
    ($($arg:tt)*) => {{}};
}


pub mod adc;
pub mod consts;
pub mod crc;
pub mod driver;
pub mod hop;
pub mod packet;
pub mod timer;
