//! CC2500 transmitter driver: register interface, bring-up, and the
//! bind/normal protocol scheduler.
//!
//! This module provides the [`Cc2500`] struct, which owns the SPI device, the
//! power-amplifier and chip-enable lines, and the whole protocol state of the
//! link: hopping table, per-channel synthesizer calibration, and the
//! bind-send / transmit / receive cycle.
//!
//! ## Scheduling model
//!
//! Control flow is an enum-tagged state ([`LinkState`]) plus a single
//! [`tick()`](Cc2500::tick) entry point.
//! Each tick performs the action of the current state and returns the delay
//! in milliseconds until the next tick; the platform timer arms exactly one
//! callback from that value, so at most one transition is ever outstanding.
//! Re-invoking a start entry point simply overwrites the state; an orphaned
//! callback that still fires acts on the current state, which is safe because
//! every transition is idempotent with respect to the state fields.
//!
//! Steady state is a fixed 9 ms period: transmit, 6 ms later enter the
//! receive window on the next hop channel, 3 ms later transmit again. The
//! bind phase uses the same 9 ms spacing.
//!
//! ## Fault stance
//!
//! Bus transaction errors propagate as [`Error`]; nothing in this layer
//! retries. A chip that never reports its identity blocks bring-up forever
//! (deliberate fail-safe), a failed reset verification is logged and ignored,
//! and a silently failed register write is indistinguishable from a normal
//! low-signal condition. This is a best-effort control link: the worst case
//! is loss of signal, not silent corruption, and no upstream component is
//! notified of transceiver malfunction beyond diagnostics.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
//! # use embedded_hal_mock::eh1::digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
//! use cc2500_tx::consts::DEFAULT_TX_ID;
//! use cc2500_tx::driver::{Cc2500, ChannelSource};
//!
//! struct Sticks;
//! impl ChannelSource for Sticks {
//!     fn channel_value(&mut self, _index: u8) -> u16 {
//!         0x400
//!     }
//! }
//!
//! # let spi: SpiMock<u8> = SpiMock::new(&[]);
//! # let pa = PinMock::new(&[PinTransaction::set(PinState::Low)]);
//! # let ce = PinMock::new(&[PinTransaction::set(PinState::High)]);
//! let mut radio = Cc2500::new(spi, pa, ce, Sticks, DEFAULT_TX_ID);
//! // radio.init(&mut delay)?;
//! // let mut next_ms = radio.start_bind()?;
//! // ... arm a timer for `next_ms`, call radio.tick() when it fires ...
//! # radio.spi.done();
//! # radio.pa.done();
//! # radio.ce.done();
//! ```

use crate::consts::{
    ADDR, BIND_FRAME_COUNT, CHANNR, CHIP_PARTNUM, CHIP_VERSION, FOCCFG, FRAME_PERIOD_MS, FREQ1,
    FSCAL1, FSCAL2, FSCAL3, FSCTRL0, MCSM0, NUM_CHANNELS, PACKET_LEN, PARTNUM, PATABLE, PA_TABLE,
    PKTCTRL1, PROBE_RETRY_MS, RADIO_CONFIG, READ_BURST, READ_SINGLE, RESET_SENTINEL_FREQ1,
    RXFIFO, RX_WINDOW_MS, SCAL, SFRX, SFTX, SIDLE, SRES, SRX, START_DELAY_MS, STX, TXFIFO,
    TX_HOLD_MS, VERSION, WRITE_BURST, WRITE_SINGLE,
};
use crate::hop::{CalibrationTable, build_hopping_table};
use crate::packet::{advance_bind_cursor, build_bind_frame, build_control_frame};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Operation, SpiDevice};

/// Driver error, wrapping the transport errors of the hardware seams.
///
/// The protocol layer itself never produces recoverable errors (see the
/// module docs); everything here originates from the SPI device or a GPIO
/// line implementation.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Error<SPI, PIN> {
    /// The SPI transaction failed.
    #[error("SPI bus transaction failed")]
    Spi(SPI),
    /// A GPIO line could not be driven.
    #[error("GPIO line error")]
    Pin(PIN),
}

/// Protocol state of the transmitter, advanced by [`Cc2500::tick`].
///
/// There is no terminal state: after the bind phase the driver cycles
/// between the two normal states indefinitely.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum LinkState {
    /// Broadcasting bind frames on the fixed addressing channel so a
    /// receiver can learn the transmitter identity and hopping table.
    /// Initial state after bring-up.
    #[default]
    BindSend,
    /// About to transmit a control frame on the current hop channel.
    NormalTransmit,
    /// About to open the receive window on the next hop channel.
    NormalReceive,
}

/// Provider of the eight 12-bit control channel values carried by every
/// control frame.
///
/// Mixing, trims, and failsafe substitution happen outside this driver;
/// the scheduler only samples the final values at frame-build time.
pub trait ChannelSource {
    /// Returns the current value for control channel `index` (0..8).
    /// Values are 12-bit; higher bits are discarded by the frame packing.
    fn channel_value(&mut self, index: u8) -> u16;
}

/// Transmitter-side driver for the TI CC2500 2.4 GHz radio.
///
/// Owns the register interface, the hopping and calibration tables, and the
/// protocol scheduler state. All mutation happens from the context that calls
/// [`tick()`](Cc2500::tick) (typically a millisecond-timer callback); no other
/// component writes this state.
///
/// ## Type parameters
///
/// - `SPI`: an [`embedded_hal::spi::SpiDevice`]. Every register access is one
///   chip-select-framed transaction, which gives the burst operations the
///   required atomicity for free.
/// - `PA`: output pin gating the external power amplifier.
/// - `CE`: output pin for the radio chip-enable line.
/// - `SRC`: the [`ChannelSource`] sampled on every control frame.
#[derive(Debug)]
pub struct Cc2500<SPI, PA, CE, SRC> {
    /// The SPI device for the register interface.
    pub spi: SPI,
    /// Power-amplifier enable line, asserted only while transmitting.
    pub pa: PA,
    /// Chip-enable line, asserted at construction and left alone.
    pub ce: CE,
    /// Source of the control channel values.
    pub channels: SRC,
    /// Current protocol state.
    pub state: LinkState,
    tx_id: [u8; 2],
    hop_table: [u8; NUM_CHANNELS],
    cal_table: CalibrationTable,
    channr: u8,
    chanskip: u8,
    rxnum: u8,
    bind_cursor: u8,
    bind_count: u16,
}

impl<SPI, PA, CE, SRC, SPIE, PINE> Cc2500<SPI, PA, CE, SRC>
where
    SPI: SpiDevice<Error = SPIE>,
    PA: OutputPin<Error = PINE>,
    CE: OutputPin<Error = PINE>,
    SRC: ChannelSource,
{
    /// Creates the driver and puts the control lines into their resting
    /// state: power amplifier off, chip enable asserted.
    ///
    /// `tx_id` is the two-byte transmitter identity that seeds the hopping
    /// table and appears in every frame. Pass a persisted per-unit value
    /// where one exists; [`DEFAULT_TX_ID`](crate::consts::DEFAULT_TX_ID) is
    /// a placeholder.
    ///
    /// Pin configuration errors at this point are ignored (fail-open, as
    /// with the rest of the GPIO handling).
    pub fn new(spi: SPI, pa: PA, ce: CE, channels: SRC, tx_id: [u8; 2]) -> Self {
        #[allow(unused_mut)]
        let mut pa = pa;
        #[allow(unused_mut)]
        let mut ce = ce;
        let _ = pa.set_low();
        let _ = ce.set_high();
        Self {
            spi,
            pa,
            ce,
            channels,
            state: LinkState::BindSend,
            tx_id,
            hop_table: [0; NUM_CHANNELS],
            cal_table: [[0; 3]; NUM_CHANNELS],
            channr: 0,
            chanskip: 0,
            rxnum: 0,
            bind_cursor: 0,
            bind_count: 0,
        }
    }

    /// Writes one configuration register.
    pub fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Error<SPIE, PINE>> {
        self.spi
            .write(&[reg | WRITE_SINGLE, value])
            .map_err(Error::Spi)
    }

    /// Reads one configuration register.
    pub fn read_reg(&mut self, reg: u8) -> Result<u8, Error<SPIE, PINE>> {
        let mut buf = [reg | READ_SINGLE, 0];
        self.spi.transfer_in_place(&mut buf).map_err(Error::Spi)?;
        Ok(buf[1])
    }

    /// Reads one status register (0x30..=0x3B). These share address space
    /// with the strobe commands and must be read with the burst modifier.
    pub fn read_status(&mut self, reg: u8) -> Result<u8, Error<SPIE, PINE>> {
        let mut buf = [reg | READ_BURST, 0];
        self.spi.transfer_in_place(&mut buf).map_err(Error::Spi)?;
        Ok(buf[1])
    }

    /// Issues a strobe command and returns the chip status byte.
    ///
    /// The status byte is passed straight through; a failed transaction is
    /// not distinguished from a normal one beyond the transport error.
    pub fn strobe(&mut self, command: u8) -> Result<u8, Error<SPIE, PINE>> {
        let mut buf = [command];
        self.spi.transfer_in_place(&mut buf).map_err(Error::Spi)?;
        Ok(buf[0])
    }

    /// Burst-reads `buf.len()` bytes from the RX FIFO in one transaction.
    pub fn read_fifo(&mut self, buf: &mut [u8]) -> Result<(), Error<SPIE, PINE>> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[RXFIFO | READ_BURST]),
                Operation::Read(buf),
            ])
            .map_err(Error::Spi)
    }

    /// Burst-writes `data` to the TX FIFO in one transaction.
    pub fn write_fifo(&mut self, data: &[u8]) -> Result<(), Error<SPIE, PINE>> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[TXFIFO | WRITE_BURST]),
                Operation::Write(data),
            ])
            .map_err(Error::Spi)
    }

    /// Checks the chip identity registers once.
    ///
    /// Returns [`nb::Error::WouldBlock`] while the readback does not match a
    /// CC2500; bring-up loops on this until the chip answers.
    pub fn probe(&mut self) -> nb::Result<(), Error<SPIE, PINE>> {
        let part = self.read_status(PARTNUM).map_err(nb::Error::Other)?;
        let version = self.read_status(VERSION).map_err(nb::Error::Other)?;
        if part == CHIP_PARTNUM && version == CHIP_VERSION {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Brings the radio up from power-on to the point where bind frames can
    /// be sent.
    ///
    /// 1. Polls the identity registers until they match a CC2500. This loop
    ///    is unbounded: on a permanently absent chip the driver blocks here
    ///    forever rather than starting a transmitter in an unknown state.
    /// 2. Resets the chip and verifies the [`FREQ1`] sentinel. Failure is
    ///    logged and bring-up continues.
    /// 3. Applies [`RADIO_CONFIG`] in order.
    /// 4. Generates the hopping table from the transmitter identity.
    /// 5. Walks all 47 hop channels once, capturing the synthesizer
    ///    calibration triple for each (1 ms settle per channel).
    /// 6. Returns to idle and switches to directed packet addressing for
    ///    the bind phase.
    ///
    /// The only blocking waits in the driver are the fixed settle delays in
    /// this routine; the steady-state path never blocks.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<SPIE, PINE>> {
        diag!("cc2500: bring-up starting");
        loop {
            match self.probe() {
                Ok(()) => break,
                Err(nb::Error::WouldBlock) => {
                    diag!("cc2500: bad radio identity");
                    delay.delay_ms(PROBE_RETRY_MS as u32);
                }
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        diag!("cc2500: found radio");

        if !self.reset(delay)? {
            diag!("cc2500: reset verification failed");
        }

        for &(reg, value) in RADIO_CONFIG.iter() {
            self.write_reg(reg, value)?;
        }
        let _ = self.strobe(SIDLE)?;

        self.hop_table = build_hopping_table(self.tx_id);
        self.chanskip = 1;

        for i in 0..NUM_CHANNELS {
            let _ = self.strobe(SIDLE)?;
            self.write_reg(CHANNR, self.hop_table[i])?;
            let _ = self.strobe(SCAL)?;
            delay.delay_ms(1);
            self.cal_table[i] = [
                self.read_reg(FSCAL3)?,
                self.read_reg(FSCAL2)?,
                self.read_reg(FSCAL1)?,
            ];
        }
        delay.delay_ms(10);
        let _ = self.strobe(SIDLE)?;
        delay.delay_ms(10);

        self.configure_addressing(true)?;
        diag!("cc2500: bring-up complete");
        Ok(())
    }

    /// Sets the transmit power to one of 8 discrete levels (0..=7, clamped).
    pub fn set_power(&mut self, level: u8) -> Result<(), Error<SPIE, PINE>> {
        let level = level.min(7);
        self.write_reg(PATABLE, PA_TABLE[level as usize])
    }

    /// Arms the bind phase: channel 0 selected, counters cleared.
    ///
    /// Returns the lead-in delay in milliseconds before the first
    /// [`tick()`](Cc2500::tick). Calling this again simply overwrites the
    /// protocol state.
    pub fn start_bind(&mut self) -> Result<u8, Error<SPIE, PINE>> {
        diag!("cc2500: starting bind send");
        self.state = LinkState::BindSend;
        self.bind_count = 0;
        self.bind_cursor = 0;
        self.channr = 0;
        self.select_channel(0)?;
        Ok(START_DELAY_MS)
    }

    /// Skips the bind phase and arms the normal transmit/receive cycle with
    /// directed (non-bind) addressing.
    ///
    /// Returns the lead-in delay in milliseconds before the first tick.
    pub fn start_normal(&mut self) -> Result<u8, Error<SPIE, PINE>> {
        diag!("cc2500: starting normal send");
        self.configure_addressing(false)?;
        self.state = LinkState::NormalTransmit;
        Ok(START_DELAY_MS)
    }

    /// Advances the protocol state machine by one step and returns the delay
    /// in milliseconds until the next tick.
    ///
    /// The caller arms exactly one timer callback from the returned value;
    /// this is the sole concurrency discipline of the scheduler. The handler
    /// never blocks.
    pub fn tick(&mut self) -> Result<u8, Error<SPIE, PINE>> {
        match self.state {
            LinkState::BindSend => {
                self.send_bind_frame()?;
                self.bind_count += 1;
                if self.bind_count >= BIND_FRAME_COUNT {
                    diag!("cc2500: bind phase complete");
                    self.state = LinkState::NormalTransmit;
                }
                Ok(FRAME_PERIOD_MS)
            }
            LinkState::NormalTransmit => {
                self.send_control_frame()?;
                self.state = LinkState::NormalReceive;
                Ok(TX_HOLD_MS)
            }
            LinkState::NormalReceive => {
                self.enter_receive()?;
                self.state = LinkState::NormalTransmit;
                Ok(RX_WINDOW_MS)
            }
        }
    }

    /// Radio interrupt entry point.
    ///
    /// Intentionally a no-op: receive-side validation of incoming frames is
    /// not implemented in this driver. A complete link adds CRC checking of
    /// the RX FIFO contents here.
    pub fn on_radio_irq(&mut self) {}

    /// Resets the chip and checks the post-reset register sentinel.
    fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<bool, Error<SPIE, PINE>> {
        let _ = self.strobe(SRES)?;
        delay.delay_ms(1);
        Ok(self.read_reg(FREQ1)? == RESET_SENTINEL_FREQ1)
    }

    /// Switches packet addressing: bind frames are received on the fixed
    /// bind address, normal frames on the first identity byte.
    fn configure_addressing(&mut self, bind: bool) -> Result<(), Error<SPIE, PINE>> {
        self.write_reg(FSCTRL0, 0)?;
        self.write_reg(MCSM0, 0x08)?;
        self.write_reg(ADDR, if bind { 0x03 } else { self.tx_id[0] })?;
        self.write_reg(PKTCTRL1, 0x0D)?; // address check, no broadcast, autoflush, append status
        self.write_reg(FOCCFG, 0x16)?;
        Ok(())
    }

    /// Idles the synthesizer, reloads the stored calibration for the hop
    /// slot, and selects its physical channel.
    fn select_channel(&mut self, index: usize) -> Result<(), Error<SPIE, PINE>> {
        let _ = self.strobe(SIDLE)?;
        self.write_reg(FSCAL3, self.cal_table[index][0])?;
        self.write_reg(FSCAL2, self.cal_table[index][1])?;
        self.write_reg(FSCAL1, self.cal_table[index][2])?;
        self.write_reg(CHANNR, self.hop_table[index])?;
        Ok(())
    }

    /// Gates the PA on, flushes the TX FIFO, loads the frame, and strobes
    /// the transmitter.
    fn transmit(&mut self, frame: &[u8; PACKET_LEN]) -> Result<(), Error<SPIE, PINE>> {
        self.pa.set_high().map_err(Error::Pin)?;
        let _ = self.strobe(SFTX)?;
        self.write_fifo(frame)?;
        let _ = self.strobe(STX)?;
        Ok(())
    }

    /// Sends one bind frame on the fixed addressing channel and advances
    /// the rolling hop-table cursor.
    fn send_bind_frame(&mut self) -> Result<(), Error<SPIE, PINE>> {
        let frame = build_bind_frame(self.tx_id, &self.hop_table, self.bind_cursor, self.rxnum);
        self.bind_cursor = advance_bind_cursor(self.bind_cursor);
        let _ = self.strobe(SIDLE)?;
        self.write_reg(CHANNR, 0)?;
        self.transmit(&frame)
    }

    /// Samples the channel source and sends one control frame on the
    /// current hop channel.
    fn send_control_frame(&mut self) -> Result<(), Error<SPIE, PINE>> {
        let mut values = [0u16; 8];
        for (i, value) in values.iter_mut().enumerate() {
            *value = self.channels.channel_value(i as u8);
        }
        let frame =
            build_control_frame(self.tx_id, self.chanskip, self.channr, self.rxnum, &values);
        let _ = self.strobe(SIDLE)?;
        let _ = self.strobe(SFRX)?;
        self.transmit(&frame)
    }

    /// Drops the PA, hops to the next channel, and opens the receive window.
    fn enter_receive(&mut self) -> Result<(), Error<SPIE, PINE>> {
        self.pa.set_low().map_err(Error::Pin)?;
        self.channr =
            ((self.channr as u16 + self.chanskip as u16) % NUM_CHANNELS as u16) as u8;
        let _ = self.strobe(SIDLE)?;
        self.select_channel(self.channr as usize)?;
        let _ = self.strobe(SRX)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{
        BIND_FRAME_COUNT, DEFAULT_TX_ID, FRAME_PERIOD_MS, RX_WINDOW_MS, TX_HOLD_MS,
    };
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    struct FixedChannels;

    impl ChannelSource for FixedChannels {
        fn channel_value(&mut self, index: u8) -> u16 {
            0x100 + index as u16
        }
    }

    fn fixed_values() -> [u16; 8] {
        let mut values = [0u16; 8];
        for (i, value) in values.iter_mut().enumerate() {
            *value = 0x100 + i as u16;
        }
        values
    }

    /// One chip-select-framed write, as the SpiDevice mock expects it.
    fn expect_write(expectations: &mut Vec<SpiTransaction<u8>>, bytes: Vec<u8>) {
        expectations.push(SpiTransaction::transaction_start());
        expectations.push(SpiTransaction::write_vec(bytes));
        expectations.push(SpiTransaction::transaction_end());
    }

    /// One chip-select-framed full-duplex transfer.
    fn expect_xfer(expectations: &mut Vec<SpiTransaction<u8>>, tx: Vec<u8>, rx: Vec<u8>) {
        expectations.push(SpiTransaction::transaction_start());
        expectations.push(SpiTransaction::transfer_in_place(tx, rx));
        expectations.push(SpiTransaction::transaction_end());
    }

    fn expect_strobe(expectations: &mut Vec<SpiTransaction<u8>>, command: u8) {
        expect_xfer(expectations, vec![command], vec![0x0F]);
    }

    fn expect_frame_write(expectations: &mut Vec<SpiTransaction<u8>>, frame: &[u8]) {
        expectations.push(SpiTransaction::transaction_start());
        expectations.push(SpiTransaction::write_vec(vec![TXFIFO | WRITE_BURST]));
        expectations.push(SpiTransaction::write_vec(frame.to_vec()));
        expectations.push(SpiTransaction::transaction_end());
    }

    fn new_driver(
        spi_expectations: &[SpiTransaction<u8>],
        pa_expectations: &[PinTransaction],
    ) -> Cc2500<SpiMock<u8>, PinMock, PinMock, FixedChannels> {
        let spi = SpiMock::new(spi_expectations);
        let mut pa = vec![PinTransaction::set(PinState::Low)];
        pa.extend_from_slice(pa_expectations);
        let pa = PinMock::new(&pa);
        let ce = PinMock::new(&[PinTransaction::set(PinState::High)]);
        Cc2500::new(spi, pa, ce, FixedChannels, DEFAULT_TX_ID)
    }

    fn done(mut driver: Cc2500<SpiMock<u8>, PinMock, PinMock, FixedChannels>) {
        driver.spi.done();
        driver.pa.done();
        driver.ce.done();
    }

    #[test]
    fn test_new_sets_control_lines() {
        let driver = new_driver(&[], &[]);
        assert_eq!(driver.state, LinkState::BindSend);
        done(driver);
    }

    #[test]
    fn test_register_accessors_frame_transactions() {
        let mut expectations = Vec::new();
        expect_write(&mut expectations, vec![CHANNR, 0x2A]);
        expect_xfer(&mut expectations, vec![FREQ1 | READ_SINGLE, 0], vec![0, 0xC4]);
        expect_xfer(&mut expectations, vec![PARTNUM | READ_BURST, 0], vec![0, 0x80]);
        expect_xfer(&mut expectations, vec![SIDLE], vec![0x3F]);

        let mut driver = new_driver(&expectations, &[]);
        driver.write_reg(CHANNR, 0x2A).unwrap();
        assert_eq!(driver.read_reg(FREQ1).unwrap(), 0xC4);
        assert_eq!(driver.read_status(PARTNUM).unwrap(), 0x80);
        assert_eq!(driver.strobe(SIDLE).unwrap(), 0x3F);
        done(driver);
    }

    #[test]
    fn test_fifo_burst_access() {
        let mut expectations = Vec::new();
        expect_frame_write(&mut expectations, &[1, 2, 3]);
        expectations.push(SpiTransaction::transaction_start());
        expectations.push(SpiTransaction::write_vec(vec![RXFIFO | READ_BURST]));
        expectations.push(SpiTransaction::read_vec(vec![9, 8]));
        expectations.push(SpiTransaction::transaction_end());

        let mut driver = new_driver(&expectations, &[]);
        driver.write_fifo(&[1, 2, 3]).unwrap();
        let mut buf = [0u8; 2];
        driver.read_fifo(&mut buf).unwrap();
        assert_eq!(buf, [9, 8]);
        done(driver);
    }

    #[test]
    fn test_probe_blocks_until_identity_matches() {
        let mut expectations = Vec::new();
        expect_xfer(&mut expectations, vec![PARTNUM | READ_BURST, 0], vec![0, 0x00]);
        expect_xfer(&mut expectations, vec![VERSION | READ_BURST, 0], vec![0, 0x00]);
        expect_xfer(&mut expectations, vec![PARTNUM | READ_BURST, 0], vec![0, 0x80]);
        expect_xfer(&mut expectations, vec![VERSION | READ_BURST, 0], vec![0, 0x03]);

        let mut driver = new_driver(&expectations, &[]);
        assert!(matches!(driver.probe(), Err(nb::Error::WouldBlock)));
        assert!(driver.probe().is_ok());
        done(driver);
    }

    #[test]
    fn test_set_power_clamps_to_table_end() {
        let mut expectations = Vec::new();
        expect_write(&mut expectations, vec![PATABLE, PA_TABLE[2]]);
        expect_write(&mut expectations, vec![PATABLE, PA_TABLE[7]]);

        let mut driver = new_driver(&expectations, &[]);
        driver.set_power(2).unwrap();
        driver.set_power(200).unwrap();
        done(driver);
    }

    #[test]
    fn test_init_applies_full_bring_up_sequence() {
        let hop = build_hopping_table(DEFAULT_TX_ID);
        let mut expectations = Vec::new();

        // identity poll: one miss, then a match
        expect_xfer(&mut expectations, vec![PARTNUM | READ_BURST, 0], vec![0, 0x00]);
        expect_xfer(&mut expectations, vec![VERSION | READ_BURST, 0], vec![0, 0x00]);
        expect_xfer(&mut expectations, vec![PARTNUM | READ_BURST, 0], vec![0, 0x80]);
        expect_xfer(&mut expectations, vec![VERSION | READ_BURST, 0], vec![0, 0x03]);

        // reset strobe and sentinel readback
        expect_strobe(&mut expectations, SRES);
        expect_xfer(&mut expectations, vec![FREQ1 | READ_SINGLE, 0], vec![0, 0xC4]);

        // the fixed configuration table, in order
        for &(reg, value) in RADIO_CONFIG.iter() {
            expect_write(&mut expectations, vec![reg, value]);
        }
        expect_strobe(&mut expectations, SIDLE);

        // calibration walk over all 47 hop channels
        for (i, &channel) in hop.iter().enumerate() {
            expect_strobe(&mut expectations, SIDLE);
            expect_write(&mut expectations, vec![CHANNR, channel]);
            expect_strobe(&mut expectations, SCAL);
            let base = i as u8;
            expect_xfer(
                &mut expectations,
                vec![FSCAL3 | READ_SINGLE, 0],
                vec![0, base],
            );
            expect_xfer(
                &mut expectations,
                vec![FSCAL2 | READ_SINGLE, 0],
                vec![0, base.wrapping_add(1)],
            );
            expect_xfer(
                &mut expectations,
                vec![FSCAL1 | READ_SINGLE, 0],
                vec![0, base.wrapping_add(2)],
            );
        }
        expect_strobe(&mut expectations, SIDLE);

        // bind addressing
        expect_write(&mut expectations, vec![FSCTRL0, 0x00]);
        expect_write(&mut expectations, vec![MCSM0, 0x08]);
        expect_write(&mut expectations, vec![ADDR, 0x03]);
        expect_write(&mut expectations, vec![PKTCTRL1, 0x0D]);
        expect_write(&mut expectations, vec![FOCCFG, 0x16]);

        let mut driver = new_driver(&expectations, &[]);
        driver.init(&mut NoopDelay).unwrap();

        assert_eq!(driver.hop_table, hop);
        assert_eq!(driver.chanskip, 1);
        assert_eq!(driver.cal_table[0], [0, 1, 2]);
        assert_eq!(driver.cal_table[46], [46, 47, 48]);
        done(driver);
    }

    #[test]
    fn test_bind_tick_sends_frame_and_keeps_cadence() {
        let hop = build_hopping_table(DEFAULT_TX_ID);
        let frame = build_bind_frame(DEFAULT_TX_ID, &hop, 0, 0);

        let mut expectations = Vec::new();
        expect_strobe(&mut expectations, SIDLE);
        expect_write(&mut expectations, vec![CHANNR, 0]);
        expect_strobe(&mut expectations, SFTX);
        expect_frame_write(&mut expectations, &frame);
        expect_strobe(&mut expectations, STX);

        let mut driver = new_driver(&expectations, &[PinTransaction::set(PinState::High)]);
        driver.hop_table = hop;
        driver.state = LinkState::BindSend;

        assert_eq!(driver.tick().unwrap(), FRAME_PERIOD_MS);
        assert_eq!(driver.state, LinkState::BindSend);
        assert_eq!(driver.bind_cursor, 5);
        assert_eq!(driver.bind_count, 1);
        done(driver);
    }

    #[test]
    fn test_bind_phase_ends_after_frame_count() {
        let hop = build_hopping_table(DEFAULT_TX_ID);
        // 499 frames sent so far, cursor mid-sequence
        let frame = build_bind_frame(DEFAULT_TX_ID, &hop, 45, 0);

        let mut expectations = Vec::new();
        expect_strobe(&mut expectations, SIDLE);
        expect_write(&mut expectations, vec![CHANNR, 0]);
        expect_strobe(&mut expectations, SFTX);
        expect_frame_write(&mut expectations, &frame);
        expect_strobe(&mut expectations, STX);

        let mut driver = new_driver(&expectations, &[PinTransaction::set(PinState::High)]);
        driver.hop_table = hop;
        driver.bind_count = BIND_FRAME_COUNT - 1;
        driver.bind_cursor = 45;

        assert_eq!(driver.tick().unwrap(), FRAME_PERIOD_MS);
        assert_eq!(driver.state, LinkState::NormalTransmit);
        assert_eq!(driver.bind_cursor, 0); // wrapped at 50
        done(driver);
    }

    #[test]
    fn test_normal_cycle_alternates_with_pa_gating() {
        let hop = build_hopping_table(DEFAULT_TX_ID);
        let tx_frame = build_control_frame(DEFAULT_TX_ID, 1, 0, 0, &fixed_values());

        let mut expectations = Vec::new();
        // transmit half
        expect_strobe(&mut expectations, SIDLE);
        expect_strobe(&mut expectations, SFRX);
        expect_strobe(&mut expectations, SFTX);
        expect_frame_write(&mut expectations, &tx_frame);
        expect_strobe(&mut expectations, STX);
        // receive half: hop to channel 1, reload calibration, listen
        expect_strobe(&mut expectations, SIDLE);
        expect_strobe(&mut expectations, SIDLE);
        expect_write(&mut expectations, vec![FSCAL3, 0]);
        expect_write(&mut expectations, vec![FSCAL2, 0]);
        expect_write(&mut expectations, vec![FSCAL1, 0]);
        expect_write(&mut expectations, vec![CHANNR, hop[1]]);
        expect_strobe(&mut expectations, SRX);

        let pa_expectations = [
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ];
        let mut driver = new_driver(&expectations, &pa_expectations);
        driver.hop_table = hop;
        driver.chanskip = 1;
        driver.state = LinkState::NormalTransmit;

        assert_eq!(driver.tick().unwrap(), TX_HOLD_MS);
        assert_eq!(driver.state, LinkState::NormalReceive);

        assert_eq!(driver.tick().unwrap(), RX_WINDOW_MS);
        assert_eq!(driver.state, LinkState::NormalTransmit);
        assert_eq!(driver.channr, 1);

        // full period is 9 ms either way
        assert_eq!(TX_HOLD_MS + RX_WINDOW_MS, FRAME_PERIOD_MS);
        done(driver);
    }

    #[test]
    fn test_channel_index_wraps_mod_47() {
        let mut expectations = Vec::new();
        expect_strobe(&mut expectations, SIDLE);
        expect_strobe(&mut expectations, SIDLE);
        expect_write(&mut expectations, vec![FSCAL3, 0]);
        expect_write(&mut expectations, vec![FSCAL2, 0]);
        expect_write(&mut expectations, vec![FSCAL1, 0]);
        expect_write(&mut expectations, vec![CHANNR, 0]);
        expect_strobe(&mut expectations, SRX);

        let mut driver = new_driver(&expectations, &[PinTransaction::set(PinState::Low)]);
        driver.state = LinkState::NormalReceive;
        driver.channr = 46;
        driver.chanskip = 1;

        let _ = driver.tick().unwrap();
        assert_eq!(driver.channr, 0);
        done(driver);
    }

    #[test]
    fn test_start_bind_resets_protocol_state() {
        let mut expectations = Vec::new();
        expect_strobe(&mut expectations, SIDLE);
        expect_write(&mut expectations, vec![FSCAL3, 0]);
        expect_write(&mut expectations, vec![FSCAL2, 0]);
        expect_write(&mut expectations, vec![FSCAL1, 0]);
        expect_write(&mut expectations, vec![CHANNR, 0]);

        let mut driver = new_driver(&expectations, &[]);
        driver.state = LinkState::NormalReceive;
        driver.bind_count = 321;
        driver.bind_cursor = 35;
        driver.channr = 12;

        assert_eq!(driver.start_bind().unwrap(), START_DELAY_MS);
        assert_eq!(driver.state, LinkState::BindSend);
        assert_eq!(driver.bind_count, 0);
        assert_eq!(driver.bind_cursor, 0);
        assert_eq!(driver.channr, 0);
        done(driver);
    }

    #[test]
    fn test_start_normal_switches_addressing() {
        let mut expectations = Vec::new();
        expect_write(&mut expectations, vec![FSCTRL0, 0x00]);
        expect_write(&mut expectations, vec![MCSM0, 0x08]);
        expect_write(&mut expectations, vec![ADDR, DEFAULT_TX_ID[0]]);
        expect_write(&mut expectations, vec![PKTCTRL1, 0x0D]);
        expect_write(&mut expectations, vec![FOCCFG, 0x16]);

        let mut driver = new_driver(&expectations, &[]);
        assert_eq!(driver.start_normal().unwrap(), START_DELAY_MS);
        assert_eq!(driver.state, LinkState::NormalTransmit);
        done(driver);
    }
}
