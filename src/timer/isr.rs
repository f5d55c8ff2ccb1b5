use crate::adc::{ConversionHardware, Sampler};
use crate::driver::{Cc2500, ChannelSource};
use core::cell::RefCell;
use critical_section::Mutex;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

/// Initializes the global static driver cell for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```ignore
/// static RADIO: Mutex<RefCell<Option<Cc2500<Spi, Pa, Ce, Sticks>>>> =
///     global_link_init::<Spi, Pa, Ce, Sticks>();
/// ```
pub const fn global_link_init<SPI, PA, CE, SRC>()
-> Mutex<RefCell<Option<Cc2500<SPI, PA, CE, SRC>>>> {
    Mutex::new(RefCell::new(None))
}

/// Places a constructed driver into the global cell.
///
/// # Arguments
/// * The global static driver cell
/// * The driver, already brought up with [`Cc2500::init`]
///
/// # Example
/// ```ignore
/// fn main() {
///     let mut radio = Cc2500::new(spi, pa, ce, sticks, tx_id);
///     radio.init(&mut delay).unwrap();
///     global_link_setup(&RADIO, radio);
/// }
/// ```
pub fn global_link_setup<SPI, PA, CE, SRC>(
    global_driver: &'static Mutex<RefCell<Option<Cc2500<SPI, PA, CE, SRC>>>>,
    driver: Cc2500<SPI, PA, CE, SRC>,
) {
    critical_section::with(|cs| {
        let _ = global_driver.borrow(cs).replace(Some(driver));
    });
}

/// Runs one scheduler tick from the timer interrupt and returns the delay
/// in milliseconds to arm for the next one.
///
/// Returns `None` if the driver is not initialized or the bus transaction
/// failed; per the fail-open policy the caller should re-arm at the frame
/// period and carry on.
///
/// # Example
/// ```ignore
/// #[interrupt]
/// fn TIM2() {
///     let next = global_link_tick(&RADIO).unwrap_or(FRAME_PERIOD_MS);
///     arm_timer_ms(next);
/// }
/// ```
pub fn global_link_tick<SPI, PA, CE, SRC, SPIE, PINE>(
    global_driver: &'static Mutex<RefCell<Option<Cc2500<SPI, PA, CE, SRC>>>>,
) -> Option<u8>
where
    SPI: SpiDevice<Error = SPIE>,
    PA: OutputPin<Error = PINE>,
    CE: OutputPin<Error = PINE>,
    SRC: ChannelSource,
{
    critical_section::with(|cs| {
        global_driver
            .borrow(cs)
            .borrow_mut()
            .as_mut()
            .and_then(|driver| driver.tick().ok())
    })
}

/// Initializes the global static sampler cell for use with
/// `critical_section`.
pub const fn global_sampler_init<A>() -> Mutex<RefCell<Option<Sampler<A>>>> {
    Mutex::new(RefCell::new(None))
}

/// Places a constructed sampler into the global cell.
pub fn global_sampler_setup<A>(
    global_sampler: &'static Mutex<RefCell<Option<Sampler<A>>>>,
    sampler: Sampler<A>,
) {
    critical_section::with(|cs| {
        let _ = global_sampler.borrow(cs).replace(Some(sampler));
    });
}

/// Runs the sampler's capture/advance step from the conversion-complete
/// interrupt.
///
/// # Example
/// ```ignore
/// #[interrupt]
/// fn ADC1() {
///     global_sampler_isr(&SAMPLER);
/// }
/// ```
pub fn global_sampler_isr<A: ConversionHardware>(
    global_sampler: &'static Mutex<RefCell<Option<Sampler<A>>>>,
) {
    critical_section::with(|cs| {
        if let Some(sampler) = global_sampler.borrow(cs).borrow_mut().as_mut() {
            sampler.on_interrupt();
        }
    });
}

/// Reads the most recent settled value for a sample channel from any
/// context.
pub fn global_sampler_value<A: ConversionHardware>(
    global_sampler: &'static Mutex<RefCell<Option<Sampler<A>>>>,
    channel: u8,
) -> Option<u16> {
    critical_section::with(|cs| {
        global_sampler
            .borrow(cs)
            .borrow()
            .as_ref()
            .map(|sampler| sampler.value(channel))
    })
}
