//! Constants used across the CC2500 transmitter driver.
//!
//! This module defines the CC2500 register map, strobe commands, status-byte
//! masks, and the fixed configuration tables that make up the wire-level
//! contract of the link:
//!
//! - **Register configuration**: the ordered [`RADIO_CONFIG`] table applied at
//!   bring-up. The receiver is built against the same RF/modem/packet settings,
//!   so this table must be reproduced byte-for-byte.
//! - **PA attenuation**: the 8-entry [`PA_TABLE`] behind the power setter.
//! - **Frame layout**: packet length and hopping-table sizing shared by the
//!   bind and control frame builders.
//! - **Cadence**: the millisecond delays that chain the transmit/receive
//!   scheduler at a fixed 9 ms period.
//!
//! Register addresses follow the datasheet numbering. Status registers
//! (0x30..=0x3B) must be read with the burst modifier set; the driver's
//! `read_status` accessor handles this.

/// Modifier bits for a single-register write (none set).
pub const WRITE_SINGLE: u8 = 0x00;
/// Modifier bit for a burst write (auto-incrementing address).
pub const WRITE_BURST: u8 = 0x40;
/// Modifier bit for a single-register read.
pub const READ_SINGLE: u8 = 0x80;
/// Modifier bits for a burst read. Also required when addressing the
/// status registers (0x30..=0x3B) to distinguish them from strobes.
pub const READ_BURST: u8 = 0xC0;

/// GDO2 output pin configuration
pub const IOCFG2: u8 = 0x00;
/// GDO1 output pin configuration
pub const IOCFG1: u8 = 0x01;
/// GDO0 output pin configuration
pub const IOCFG0: u8 = 0x02;
/// RX FIFO and TX FIFO thresholds
pub const FIFOTHR: u8 = 0x03;
/// Sync word, high byte
pub const SYNC1: u8 = 0x04;
/// Sync word, low byte
pub const SYNC0: u8 = 0x05;
/// Packet length
pub const PKTLEN: u8 = 0x06;
/// Packet automation control
pub const PKTCTRL1: u8 = 0x07;
/// Packet automation control
pub const PKTCTRL0: u8 = 0x08;
/// Device address
pub const ADDR: u8 = 0x09;
/// Channel number
pub const CHANNR: u8 = 0x0A;
/// Frequency synthesizer control
pub const FSCTRL1: u8 = 0x0B;
/// Frequency synthesizer control
pub const FSCTRL0: u8 = 0x0C;
/// Frequency control word, high byte
pub const FREQ2: u8 = 0x0D;
/// Frequency control word, middle byte
pub const FREQ1: u8 = 0x0E;
/// Frequency control word, low byte
pub const FREQ0: u8 = 0x0F;
/// Modem configuration
pub const MDMCFG4: u8 = 0x10;
/// Modem configuration
pub const MDMCFG3: u8 = 0x11;
/// Modem configuration
pub const MDMCFG2: u8 = 0x12;
/// Modem configuration
pub const MDMCFG1: u8 = 0x13;
/// Modem configuration
pub const MDMCFG0: u8 = 0x14;
/// Modem deviation setting
pub const DEVIATN: u8 = 0x15;
/// Main radio control state machine configuration
pub const MCSM2: u8 = 0x16;
/// Main radio control state machine configuration
pub const MCSM1: u8 = 0x17;
/// Main radio control state machine configuration
pub const MCSM0: u8 = 0x18;
/// Frequency offset compensation configuration
pub const FOCCFG: u8 = 0x19;
/// Bit synchronization configuration
pub const BSCFG: u8 = 0x1A;
/// AGC control
pub const AGCCTRL2: u8 = 0x1B;
/// AGC control
pub const AGCCTRL1: u8 = 0x1C;
/// AGC control
pub const AGCCTRL0: u8 = 0x1D;
/// High byte Event 0 timeout
pub const WOREVT1: u8 = 0x1E;
/// Low byte Event 0 timeout
pub const WOREVT0: u8 = 0x1F;
/// Wake On Radio control
pub const WORCTRL: u8 = 0x20;
/// Front end RX configuration
pub const FREND1: u8 = 0x21;
/// Front end TX configuration
pub const FREND0: u8 = 0x22;
/// Frequency synthesizer calibration
pub const FSCAL3: u8 = 0x23;
/// Frequency synthesizer calibration
pub const FSCAL2: u8 = 0x24;
/// Frequency synthesizer calibration
pub const FSCAL1: u8 = 0x25;
/// Frequency synthesizer calibration
pub const FSCAL0: u8 = 0x26;
/// RC oscillator configuration
pub const RCCTRL1: u8 = 0x27;
/// RC oscillator configuration
pub const RCCTRL0: u8 = 0x28;
/// Frequency synthesizer calibration control
pub const FSTEST: u8 = 0x29;
/// Production test
pub const PTEST: u8 = 0x2A;
/// AGC test
pub const AGCTEST: u8 = 0x2B;
/// Various test settings
pub const TEST2: u8 = 0x2C;
/// Various test settings
pub const TEST1: u8 = 0x2D;
/// Various test settings
pub const TEST0: u8 = 0x2E;

/// Part number (status register, read with burst modifier)
pub const PARTNUM: u8 = 0x30;
/// Current version number (status register)
pub const VERSION: u8 = 0x31;
/// Frequency offset estimate (status register)
pub const FREQEST: u8 = 0x32;
/// Demodulator estimate for link quality (status register)
pub const LQI: u8 = 0x33;
/// Received signal strength indication (status register)
pub const RSSI: u8 = 0x34;
/// Control state machine state (status register)
pub const MARCSTATE: u8 = 0x35;
/// Current GDOx status and packet status (status register)
pub const PKTSTATUS: u8 = 0x38;
/// Underflow and number of bytes in the TX FIFO (status register)
pub const TXBYTES: u8 = 0x3A;
/// Overflow and number of bytes in the RX FIFO (status register)
pub const RXBYTES: u8 = 0x3B;

/// PA power setting table (multi-byte memory location)
pub const PATABLE: u8 = 0x3E;
/// TX FIFO (write access)
pub const TXFIFO: u8 = 0x3F;
/// RX FIFO (read access)
pub const RXFIFO: u8 = 0x3F;

/// Strobe: reset chip
pub const SRES: u8 = 0x30;
/// Strobe: enable and calibrate the frequency synthesizer
pub const SFSTXON: u8 = 0x31;
/// Strobe: turn off the crystal oscillator
pub const SXOFF: u8 = 0x32;
/// Strobe: calibrate the frequency synthesizer and turn it off
pub const SCAL: u8 = 0x33;
/// Strobe: enable RX
pub const SRX: u8 = 0x34;
/// Strobe: enable TX
pub const STX: u8 = 0x35;
/// Strobe: exit RX/TX, turn off the frequency synthesizer
pub const SIDLE: u8 = 0x36;
/// Strobe: AFC adjustment of the frequency synthesizer
pub const SAFC: u8 = 0x37;
/// Strobe: start automatic RX polling (Wake-on-Radio)
pub const SWOR: u8 = 0x38;
/// Strobe: enter power-down mode when CSn goes high
pub const SPWD: u8 = 0x39;
/// Strobe: flush the RX FIFO
pub const SFRX: u8 = 0x3A;
/// Strobe: flush the TX FIFO
pub const SFTX: u8 = 0x3B;
/// Strobe: reset the real-time clock
pub const SWORRST: u8 = 0x3C;
/// Strobe: no operation
pub const SNOP: u8 = 0x3D;

/// Chip-ready bit (active low) in the status byte returned by every strobe.
pub const STATUS_CHIP_RDY_N: u8 = 0x80;
/// State field of the status byte.
pub const STATUS_STATE_MASK: u8 = 0x70;
/// FIFO-bytes-available field of the status byte.
pub const STATUS_FIFO_BYTES_MASK: u8 = 0x0F;

/// Number of entries in the hopping table, and the modulus for all
/// channel-index arithmetic.
pub const NUM_CHANNELS: usize = 47;

/// On-air frame size for both the bind and control frame, in bytes.
pub const PACKET_LEN: usize = 30;

/// Physical channel numbers the hopping table generator must avoid.
pub const RESERVED_CHANNELS: [u8; 3] = [0x00, 0x5A, 0xDC];

/// Modulus for the generated channel values (number of usable physical
/// channels given the configured channel spacing).
pub const CHANNEL_MODULUS: u8 = 0xEB;

/// The bind cursor wraps at 50, not at [`NUM_CHANNELS`]. Hop positions 47..50
/// are transmitted as zero-fill; receivers built to this link ignore them.
pub const BIND_CURSOR_WRAP: u8 = 50;

/// Number of hop-table bytes carried per bind frame.
pub const BIND_HOPS_PER_FRAME: u8 = 5;

/// Bind frames sent before switching to the normal transmit/receive cycle
/// (500 frames at 9 ms is about 4.5 s of bind broadcast).
pub const BIND_FRAME_COUNT: u16 = 500;

/// Full transmit/receive period, and the bind frame spacing, in milliseconds.
pub const FRAME_PERIOD_MS: u8 = 9;
/// Delay from transmit strobe to receive-window entry, in milliseconds.
pub const TX_HOLD_MS: u8 = 6;
/// Receive-window length before the next transmit, in milliseconds.
pub const RX_WINDOW_MS: u8 = 3;
/// Lead-in delay between a start entry point and the first scheduler tick.
pub const START_DELAY_MS: u8 = 2;
/// Spacing between chip-identity probe attempts during bring-up.
pub const PROBE_RETRY_MS: u8 = 200;

/// Expected PARTNUM readback for a CC2500.
pub const CHIP_PARTNUM: u8 = 0x80;
/// Expected VERSION readback for a CC2500.
pub const CHIP_VERSION: u8 = 0x03;
/// FREQ1 reads back as this value after a successful reset strobe.
pub const RESET_SENTINEL_FREQ1: u8 = 0xC4;

/// Placeholder transmitter identity used when the caller has no persisted
/// unique identifier to supply. Both bytes seed the hopping table and appear
/// in every frame, so a production build should derive a per-unit value.
pub const DEFAULT_TX_ID: [u8; 2] = [15, 20];

/// Fixed register configuration applied in order at bring-up.
///
/// This is the entire RF/modem/packet setup of the link and is part of the
/// wire-level contract: a receiver built to this link uses the same settings,
/// so the table must not be reordered or edited.
pub static RADIO_CONFIG: [(u8, u8); 34] = [
    (IOCFG0, 0x01),   // GDO0 high on RX FIFO filled or end of packet
    (MCSM1, 0x0C),    // stay in RX on packet receive, CCA always, TX -> IDLE
    (MCSM0, 0x18),    // XOSC expire 64, calibrate on IDLE -> TX or RX
    (PKTLEN, 0x1E),   // packet length 30
    (PKTCTRL1, 0x04), // append RSSI+LQI, no address check, no autoflush
    (PKTCTRL0, 0x01), // variable length mode, no CRC, FIFO enable
    (PATABLE, 0xFF),  // initial PA setting, overridden by set_power
    (FSCTRL1, 0x0A),  // IF 253.90625 kHz assuming a 26 MHz crystal
    (FSCTRL0, 0x00),  // frequency offset 0
    (FREQ2, 0x5C),    // frequency control, high
    (FREQ1, 0x76),    // frequency control, middle
    (FREQ0, 0x27),    // frequency control, low
    (MDMCFG4, 0x7B),  // data rate control
    (MDMCFG3, 0x61),  // data rate control
    (MDMCFG2, 0x13),  // 30/32 sync bits, GFSK, DC filter enabled
    (MDMCFG1, 0x23),  // channel spacing exponent 3, 4-byte preamble
    (MDMCFG0, 0x7A),  // channel spacing 299.926757 kHz for 26 MHz crystal
    (DEVIATN, 0x51),  // deviation 25.128906 kHz for 26 MHz crystal
    (FOCCFG, 0x16),   // frequency offset compensation
    (BSCFG, 0x6C),    // bit sync configuration
    (AGCCTRL2, 0x03), // target amplitude 33 dB
    (AGCCTRL1, 0x40), // AGC control
    (AGCCTRL0, 0x91), // AGC control
    (FREND1, 0x56),   // front end RX configuration
    (FREND0, 0x10),   // front end TX configuration
    (FSCAL3, 0xA9),   // frequency synthesizer calibration
    (FSCAL2, 0x0A),   // frequency synthesizer calibration
    (FSCAL1, 0x00),   // frequency synthesizer calibration
    (FSCAL0, 0x11),   // frequency synthesizer calibration
    (TEST2, 0x88),    // test settings
    (TEST1, 0x31),    // test settings
    (TEST0, 0x0B),    // test settings
    (FIFOTHR, 0x07),  // TX FIFO threshold 33, RX FIFO threshold 32
    (ADDR, 0x00),     // device address 0 (broadcast) until bind addressing
];

/// PA attenuation table for the 8 discrete power levels of `set_power`,
/// from -12 dBm (level 0) up to +1.5 dBm (level 7).
pub static PA_TABLE: [u8; 8] = [
    0xC5, // -12 dBm
    0x97, // -10 dBm
    0x6E, // -8 dBm
    0x7F, // -6 dBm
    0xA9, // -4 dBm
    0xBB, // -2 dBm
    0xFE, // 0 dBm
    0xFF, // +1.5 dBm
];
