//! Round-robin double-buffered analog sampler.
//!
//! Independent of the radio path, this module cycles a single ADC through
//! four logical input channels entirely from conversion-complete interrupt
//! context. The multiplexer needs one full conversion to settle after a
//! channel switch, so the reading immediately following a switch is stale
//! and must be discarded: the sampler captures a value only on every other
//! interrupt, alternating capture and settle phases with a toggle flag.
//!
//! Stored values are whole aligned 16-bit reads, so other contexts may read
//! them without synchronization; staleness by one sample is acceptable.
//!
//! The actual ADC peripheral is reached through the [`ConversionHardware`]
//! seam, keeping the capture/advance logic portable and testable.

/// Number of logical input channels scanned round-robin.
pub const NUM_SAMPLE_CHANNELS: usize = 4;

/// Platform seam for the ADC peripheral.
///
/// Implementations wrap the target's ADC registers. All three operations are
/// called from interrupt context and must not block.
pub trait ConversionHardware {
    /// Reads the 16-bit result of the completed conversion.
    fn read_result(&mut self) -> u16;
    /// Clears the end-of-conversion and watchdog status flags.
    fn acknowledge(&mut self);
    /// Programs the control register to start converting `channel`.
    fn start(&mut self, channel: u8);
}

/// Interrupt-driven sampler keeping the 4 most recent channel readings.
///
/// [`on_interrupt()`](Sampler::on_interrupt) is the conversion-complete
/// handler; [`value()`](Sampler::value) is the accessor for other contexts.
#[derive(Debug)]
pub struct Sampler<A> {
    hw: A,
    values: [u16; NUM_SAMPLE_CHANNELS],
    channel: u8,
    take_next: bool,
}

impl<A: ConversionHardware> Sampler<A> {
    /// Creates the sampler in the settle phase for channel 0.
    ///
    /// The caller starts the first conversion when enabling the peripheral;
    /// its result is treated as unsettled and discarded.
    pub fn new(hw: A) -> Self {
        Self {
            hw,
            values: [0; NUM_SAMPLE_CHANNELS],
            channel: 0,
            take_next: false,
        }
    }

    /// Conversion-complete interrupt handler.
    ///
    /// On a capture phase, stores the result for the current channel and
    /// advances to the next one; on a settle phase, the result is the
    /// unsettled post-switch reading and is dropped. Either way the status
    /// flags are cleared, the next conversion is started, and the phase
    /// toggles. Each channel's stored value therefore refreshes once every
    /// two interrupts, never from a just-switched multiplexer.
    pub fn on_interrupt(&mut self) {
        if self.take_next {
            let value = self.hw.read_result();
            self.values[self.channel as usize] = value;
            self.channel = (self.channel + 1) & (NUM_SAMPLE_CHANNELS as u8 - 1);
        }
        self.hw.acknowledge();
        self.hw.start(self.channel);

        self.take_next = !self.take_next;
    }

    /// Returns the most recent settled reading for `channel` (0..4).
    pub fn value(&self, channel: u8) -> u16 {
        self.values[channel as usize % NUM_SAMPLE_CHANNELS]
    }

    /// Consumes the sampler, returning the hardware seam.
    pub fn release(self) -> A {
        self.hw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted ADC: serves results from a queue and records control traffic.
    struct ScriptedAdc {
        results: Vec<u16>,
        cursor: usize,
        acknowledged: u32,
        started: Vec<u8>,
    }

    impl ScriptedAdc {
        fn new(results: &[u16]) -> Self {
            Self {
                results: results.to_vec(),
                cursor: 0,
                acknowledged: 0,
                started: Vec::new(),
            }
        }
    }

    impl ConversionHardware for ScriptedAdc {
        fn read_result(&mut self) -> u16 {
            let value = self.results[self.cursor];
            self.cursor += 1;
            value
        }

        fn acknowledge(&mut self) {
            self.acknowledged += 1;
        }

        fn start(&mut self, channel: u8) {
            self.started.push(channel);
        }
    }

    #[test]
    fn test_first_interrupt_discards_unsettled_reading() {
        let mut sampler = Sampler::new(ScriptedAdc::new(&[0xAAAA]));
        sampler.on_interrupt();
        // settle phase: nothing captured, conversion restarted on channel 0
        assert_eq!(sampler.value(0), 0);
        assert_eq!(sampler.hw.cursor, 0);
        assert_eq!(sampler.hw.started, vec![0]);
    }

    #[test]
    fn test_capture_every_second_interrupt() {
        let mut sampler = Sampler::new(ScriptedAdc::new(&[100, 200, 300, 400]));
        for _ in 0..8 {
            sampler.on_interrupt();
        }
        assert_eq!(sampler.value(0), 100);
        assert_eq!(sampler.value(1), 200);
        assert_eq!(sampler.value(2), 300);
        assert_eq!(sampler.value(3), 400);
    }

    #[test]
    fn test_channel_cycle_and_restart_pattern() {
        let mut sampler = Sampler::new(ScriptedAdc::new(&[1, 2, 3, 4, 5]));
        for _ in 0..10 {
            sampler.on_interrupt();
        }
        // settle/capture pairs walk the channels 0,1,2,3 and wrap
        assert_eq!(sampler.hw.started, vec![0, 1, 1, 2, 2, 3, 3, 0, 0, 1]);
        // flags cleared on every interrupt, captured or not
        assert_eq!(sampler.hw.acknowledged, 10);
        // channel 0 was refreshed on the wrap
        assert_eq!(sampler.value(0), 5);
    }

    #[test]
    fn test_value_accessor_wraps_index() {
        let mut sampler = Sampler::new(ScriptedAdc::new(&[7]));
        sampler.on_interrupt();
        sampler.on_interrupt();
        assert_eq!(sampler.value(0), 7);
        assert_eq!(sampler.value(4), 7);
    }
}
