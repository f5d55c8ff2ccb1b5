//! Bind and control frame construction.
//!
//! Both frames are a fixed 30 bytes: a length byte (29), a body, and a
//! big-endian CRC16 over bytes `[3, 28)`. Frames are built fresh on the
//! stack for every transmission and handed straight to the TX FIFO.
//!
//! ## Control frame
//!
//! ```text
//! [0]      length (29)
//! [1..3]   transmitter identity
//! [3]      0x02
//! [4]      (chanskip << 6) | channr
//! [5]      chanskip >> 2
//! [6]      receiver number
//! [7..9]   reserved, zero
//! [9..21]  eight 12-bit control values, two packed per three bytes
//! [28..30] CRC16 over [3, 28), big-endian
//! ```
//!
//! ## Bind frame
//!
//! ```text
//! [0]      length (29)
//! [1..3]   0x03, 0x01
//! [3..5]   transmitter identity
//! [5]      hop cursor
//! [6..11]  five hop-table entries from the cursor (zero-fill past 46)
//! [11]     0x02
//! [12]     receiver number
//! [28..30] CRC16 over [3, 28), big-endian
//! ```
//!
//! The 12-bit values are packed with explicit shifts and masks rather than
//! overlaid structures so the layout is identical on every target.

use crate::consts::{BIND_CURSOR_WRAP, BIND_HOPS_PER_FRAME, NUM_CHANNELS, PACKET_LEN};
use crate::crc::crc16;

/// First byte of the CRC-covered range.
const CRC_START: usize = 3;
/// One past the last byte of the CRC-covered range.
const CRC_END: usize = PACKET_LEN - 2;

/// Builds one steady-state control frame.
///
/// `channr` is the current hopping-table index (already reduced modulo 47),
/// `chanskip` the per-cycle stride the receiver needs to follow the hop
/// sequence, and `values` the eight 12-bit control channel values.
pub fn build_control_frame(
    tx_id: [u8; 2],
    chanskip: u8,
    channr: u8,
    rxnum: u8,
    values: &[u16; 8],
) -> [u8; PACKET_LEN] {
    let mut packet = [0u8; PACKET_LEN];

    packet[0] = (PACKET_LEN - 1) as u8;
    packet[1] = tx_id[0];
    packet[2] = tx_id[1];
    packet[3] = 0x02;
    packet[4] = (chanskip << 6) | channr;
    packet[5] = chanskip >> 2;
    packet[6] = rxnum;
    // packet[7]: frame type, 0 = control; packet[8]: reserved

    let mut ofs = 9;
    for pair in values.chunks(2) {
        let (lo, hi) = (pair[0], pair[1]);
        packet[ofs] = lo as u8;
        packet[ofs + 1] = (((lo >> 8) & 0x0F) as u8) | ((hi << 4) as u8);
        packet[ofs + 2] = (hi >> 4) as u8;
        ofs += 3;
    }

    seal(&mut packet);
    packet
}

/// Builds one bind frame carrying five hopping-table entries from `cursor`.
///
/// Cursor positions at or past the 47-entry table read as zero; the cursor
/// arithmetic wraps at 50, so the wrap window transmits zero-fill rather
/// than stale bytes.
pub fn build_bind_frame(
    tx_id: [u8; 2],
    hop_table: &[u8; NUM_CHANNELS],
    cursor: u8,
    rxnum: u8,
) -> [u8; PACKET_LEN] {
    let mut packet = [0u8; PACKET_LEN];

    packet[0] = (PACKET_LEN - 1) as u8;
    packet[1] = 0x03;
    packet[2] = 0x01;
    packet[3] = tx_id[0];
    packet[4] = tx_id[1];
    packet[5] = cursor;
    for i in 0..BIND_HOPS_PER_FRAME as usize {
        let position = cursor as usize + i;
        if position < NUM_CHANNELS {
            packet[6 + i] = hop_table[position];
        }
    }
    packet[11] = 0x02;
    packet[12] = rxnum;

    seal(&mut packet);
    packet
}

/// Advances the bind cursor by five positions, wrapping at 50.
///
/// The wrap modulus is deliberately not the table length; see
/// [`BIND_CURSOR_WRAP`].
pub fn advance_bind_cursor(cursor: u8) -> u8 {
    let next = cursor + BIND_HOPS_PER_FRAME;
    if next >= BIND_CURSOR_WRAP {
        next - BIND_CURSOR_WRAP
    } else {
        next
    }
}

/// Computes the CRC over the covered range and writes it big-endian into
/// the last two bytes.
fn seal(packet: &mut [u8; PACKET_LEN]) {
    let crc = crc16(&packet[CRC_START..CRC_END]);
    packet[PACKET_LEN - 2] = (crc >> 8) as u8;
    packet[PACKET_LEN - 1] = crc as u8;
}
