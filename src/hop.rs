//! Deterministic hopping-table generation.
//!
//! The transmitter and receiver agree on a pseudo-random sequence of 47
//! physical channels derived from the two-byte transmitter identity. The
//! receiver learns the table from bind frames, so the generator here must
//! match the receiver's copy bit for bit: same spacing normalization, same
//! reserved-channel bumps, same modulus.
//!
//! Generation is a pure function of the identity. The per-channel synthesizer
//! calibration captured during bring-up is stored alongside as a
//! [`CalibrationTable`], one triple of FSCAL bytes per hop slot.

use crate::consts::{CHANNEL_MODULUS, NUM_CHANNELS, RESERVED_CHANNELS};

/// FSCAL3/FSCAL2/FSCAL1 readback triples, one per hopping-table position.
///
/// Populated once during bring-up by walking the hopping table with a
/// calibration strobe, then reapplied on every channel change so the
/// synthesizer never has to recalibrate in the steady-state path.
pub type CalibrationTable = [[u8; 3]; NUM_CHANNELS];

/// Builds the 47-entry channel hopping table from the transmitter identity.
///
/// `tx_id[0] & 0x07` seeds the first channel; `tx_id[1]` supplies the raw
/// channel spacing. The spacing is normalized to avoid degenerate tables:
/// a spacing below 2 is raised by 2, a spacing above 0xE9 is lowered by
/// 0xE7, and a spacing that is a multiple of 47 is bumped by 1 (such a
/// spacing would revisit the same channels every pass).
///
/// Each subsequent entry advances by the spacing modulo 235. An entry that
/// lands on a reserved physical channel (0, 90, 220) is emitted bumped by
/// one, but the running channel value keeps the unbumped value so the rest
/// of the sequence is unaffected.
pub fn build_hopping_table(tx_id: [u8; 2]) -> [u8; NUM_CHANNELS] {
    let mut channel = tx_id[0] & 0x07;
    let mut spacing = tx_id[1];

    if spacing < 0x02 {
        spacing += 0x02;
    }
    if spacing > 0xE9 {
        spacing -= 0xE7;
    }
    if spacing % NUM_CHANNELS as u8 == 0 {
        spacing += 1;
    }

    let mut table = [0u8; NUM_CHANNELS];
    table[0] = channel;
    for slot in table.iter_mut().skip(1) {
        channel = ((channel as u16 + spacing as u16) % CHANNEL_MODULUS as u16) as u8;
        let mut value = channel;
        if RESERVED_CHANNELS.contains(&value) {
            value += 1;
        }
        *slot = value;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_identity_vector() {
        // spacing 20 is already in range and not a multiple of 47
        let table = build_hopping_table([15, 20]);
        assert_eq!(table[0], 7);
        assert_eq!(&table[0..5], &[7, 27, 47, 67, 87]);
    }

    #[test]
    fn test_table_shape_and_reserved_exclusion() {
        for seed in [0u8, 1, 37, 128, 255] {
            for spacing in [0u8, 1, 20, 47, 94, 233, 234, 255] {
                let table = build_hopping_table([seed, spacing]);
                assert_eq!(table.len(), NUM_CHANNELS);
                assert_eq!(table[0], seed & 0x07);
                for &entry in &table[1..] {
                    assert!(entry <= 234, "entry {} out of range", entry);
                    assert!(
                        !RESERVED_CHANNELS.contains(&entry),
                        "reserved channel {} emitted",
                        entry
                    );
                }
            }
        }
    }

    #[test]
    fn test_low_spacing_is_raised() {
        // raw spacing 0 normalizes to 2: 2, 4, 6, ...
        let table = build_hopping_table([0x02, 0]);
        assert_eq!(&table[0..4], &[2, 4, 6, 8]);
    }

    #[test]
    fn test_high_spacing_is_lowered() {
        // raw spacing 234 normalizes to 3
        let table = build_hopping_table([0x01, 234]);
        assert_eq!(&table[0..4], &[1, 4, 7, 10]);
    }

    #[test]
    fn test_multiple_of_47_is_bumped() {
        // raw spacing 47 normalizes to 48; without the bump every entry
        // would be congruent to the seed modulo 47
        let table = build_hopping_table([0x00, 47]);
        assert_eq!(&table[0..3], &[0, 48, 96]);
    }

    #[test]
    fn test_reserved_bump_does_not_feed_back() {
        // seed 2, spacing 2: entry 44 lands on 90 and is emitted as 91,
        // but the next entry continues from the unbumped 90
        let table = build_hopping_table([0x02, 2]);
        assert_eq!(table[43], 88);
        assert_eq!(table[44], 91);
        assert_eq!(table[45], 92);
        assert_eq!(table[46], 94);
    }
}
