//! Byte frequency counting.

use std::io::{self, Read};

use crate::config::{ALPH_SIZE, BITS_PER_WORD};

/// Occurrence count of every byte value in an input.
///
/// The sentinel is not counted here; tree construction adds it.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPH_SIZE],
}

impl FrequencyTable {
    /// Count the bytes of an in-memory slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; ALPH_SIZE];
        for &b in data {
            counts[b as usize] += 1;
        }
        Self { counts }
    }

    /// Count the bytes of a reader in a single pass.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut counts = [0u64; ALPH_SIZE];
        let mut buf = [0u8; 8192];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            for &b in &buf[..n] {
                counts[b as usize] += 1;
            }
        }
        Ok(Self { counts })
    }

    /// Wrap counts that were stored in a header.
    pub fn from_counts(counts: [u64; ALPH_SIZE]) -> Self {
        Self { counts }
    }

    /// Count for byte `b`.
    pub fn get(&self, b: u8) -> u64 {
        self.counts[b as usize]
    }

    /// All 256 counts, indexed by byte value.
    pub fn counts(&self) -> &[u64; ALPH_SIZE] {
        &self.counts
    }

    /// Number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Byte values that occur, with their counts, in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(b, &c)| (b as u8, c))
    }

    /// Size of the uncompressed input in bits.
    pub fn original_bits(&self) -> u64 {
        self.total() * u64::from(BITS_PER_WORD)
    }
}

impl std::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_example() {
        let table = FrequencyTable::from_bytes(b"AAAAABBBCC");
        assert_eq!(table.get(b'A'), 5);
        assert_eq!(table.get(b'B'), 3);
        assert_eq!(table.get(b'C'), 2);
        assert_eq!(table.get(b'D'), 0);
        assert_eq!(table.total(), 10);
        assert_eq!(table.original_bits(), 80);
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            vec![(b'A', 5), (b'B', 3), (b'C', 2)]
        );
    }

    #[test]
    fn test_reader_matches_slice() {
        let data: Vec<u8> = (0..20_000u32).map(|i| (i * 7 % 251) as u8).collect();
        let from_reader = FrequencyTable::from_reader(&data[..]).unwrap();
        assert_eq!(from_reader, FrequencyTable::from_bytes(&data));
    }

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(&[]);
        assert_eq!(table.total(), 0);
        assert_eq!(table.iter().count(), 0);
    }
}
