use crate::driver::{Cc2500, ChannelSource, Error};
use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

/// Runs the bind/normal protocol chain as a blocking loop.
///
/// This is a simple alternative to interrupt-driven scheduling for
/// single-purpose firmware: the bind phase is started, then each scheduler
/// tick is followed by a blocking delay of the interval the scheduler asked
/// for. Timing jitter from the busy-wait is well inside the receive window
/// on any reasonable target.
///
/// # Arguments
/// - `driver`: A brought-up [`Cc2500`] (call [`Cc2500::init`] first).
/// - `delay`: A delay provider implementing `embedded_hal::delay::DelayNs`.
///
/// # Example
/// ```ignore
/// let mut radio = Cc2500::new(spi, pa, ce, sticks, tx_id);
/// radio.init(&mut delay)?;
/// run_link_loop(&mut radio, &mut delay)?;
/// ```
///
/// # Notes
/// - This loop never returns except on a bus error; it is intended for
///   firmware whose whole job is driving the link.
/// - For anything concurrent, prefer the `timer-isr` helpers.
pub fn run_link_loop<D, SPI, PA, CE, SRC, SPIE, PINE>(
    driver: &mut Cc2500<SPI, PA, CE, SRC>,
    delay: &mut D,
) -> Result<Infallible, Error<SPIE, PINE>>
where
    D: DelayNs,
    SPI: SpiDevice<Error = SPIE>,
    PA: OutputPin<Error = PINE>,
    CE: OutputPin<Error = PINE>,
    SRC: ChannelSource,
{
    let mut next_ms = driver.start_bind()?;
    loop {
        delay.delay_ms(next_ms as u32);
        next_ms = driver.tick()?;
    }
}
