//! Bit-granular channel over byte streams.
//!
//! Bits are packed MSB-first: the first bit written lands in the high bit
//! of the first byte. Multi-bit values are also written MSB-first, so a
//! 32-bit field reads back exactly as it was written regardless of the
//! current byte alignment.

use std::io::{self, Read, Write};

use crate::error::Result;

/// Source of bits.
pub trait BitRead {
    /// Read `n` bits (`n <= 32`) as an unsigned integer, MSB-first.
    ///
    /// Returns `Ok(None)` if the stream ends before `n` bits are available.
    fn read_bits(&mut self, n: u32) -> Result<Option<u32>>;

    /// Read a single bit.
    fn read_bit(&mut self) -> Result<Option<bool>> {
        Ok(self.read_bits(1)?.map(|b| b == 1))
    }
}

/// Sink for bits.
pub trait BitWrite {
    /// Write the low `n` bits (`n <= 32`) of `value`, MSB-first.
    fn write_bits(&mut self, n: u32, value: u32) -> Result<()>;

    /// Write a single bit.
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(1, u32::from(bit))
    }

    /// Bits accepted so far.
    fn bits_written(&self) -> u64;
}

/// Bit reader over any [`Read`].
///
/// Reads one byte at a time; wrap unbuffered sources in a
/// [`std::io::BufReader`].
pub struct BitReader<R> {
    inner: R,
    cur: u8,
    remaining: u32,
}

impl<R: Read> BitReader<R> {
    /// Create a reader positioned at the first bit of `inner`.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cur: 0,
            remaining: 0,
        }
    }

    /// Give back the underlying reader. Unread bits of the current byte
    /// are dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> BitRead for BitReader<R> {
    fn read_bits(&mut self, n: u32) -> Result<Option<u32>> {
        debug_assert!(n <= 32);
        let mut value = 0u32;
        for _ in 0..n {
            if self.remaining == 0 {
                match self.next_byte()? {
                    Some(byte) => {
                        self.cur = byte;
                        self.remaining = 8;
                    }
                    None => return Ok(None),
                }
            }
            self.remaining -= 1;
            let bit = (self.cur >> self.remaining) & 1;
            value = (value << 1) | u32::from(bit);
        }
        Ok(Some(value))
    }
}

/// Bit writer over any [`Write`].
///
/// The trailing partial byte is zero-padded and written by
/// [`BitWriter::finish`]. Dropping an unfinished writer pads and flushes
/// on a best-effort basis, ignoring errors.
pub struct BitWriter<W: Write> {
    inner: Option<W>,
    cur: u8,
    filled: u32,
    written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a writer that packs bits into `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(inner),
            cur: 0,
            filled: 0,
            written: 0,
        }
    }

    /// Pad the last byte, flush, and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.flush_partial()?;
        let mut inner = self
            .inner
            .take()
            .ok_or_else(|| io::Error::other("bit writer already released"))?;
        inner.flush()?;
        Ok(inner)
    }

    fn flush_partial(&mut self) -> io::Result<()> {
        if self.filled > 0 {
            let byte = self.cur << (8 - self.filled);
            self.cur = 0;
            self.filled = 0;
            if let Some(inner) = self.inner.as_mut() {
                inner.write_all(&[byte])?;
            }
        }
        Ok(())
    }
}

impl<W: Write> BitWrite for BitWriter<W> {
    fn write_bits(&mut self, n: u32, value: u32) -> Result<()> {
        debug_assert!(n <= 32);
        for pos in (0..n).rev() {
            self.cur = (self.cur << 1) | ((value >> pos) & 1) as u8;
            self.filled += 1;
            if self.filled == 8 {
                let byte = self.cur;
                self.cur = 0;
                self.filled = 0;
                if let Some(inner) = self.inner.as_mut() {
                    inner.write_all(&[byte])?;
                }
            }
        }
        self.written += u64::from(n);
        Ok(())
    }

    fn bits_written(&self) -> u64 {
        self.written
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            let _ = self.flush_partial();
            if let Some(inner) = self.inner.as_mut() {
                let _ = inner.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first_packing() {
        let mut w = BitWriter::new(Vec::new());
        w.write_bits(3, 0b101).unwrap();
        w.write_bits(9, 0x100).unwrap();
        assert_eq!(w.bits_written(), 12);
        let out = w.finish().unwrap();
        assert_eq!(out, vec![0b1011_0000, 0b0000_0000]);
    }

    #[test]
    fn test_unaligned_int_roundtrip() {
        let mut w = BitWriter::new(Vec::new());
        w.write_bit(true).unwrap();
        w.write_bits(32, 0xFACE_8200).unwrap();
        w.write_bits(9, 256).unwrap();
        let out = w.finish().unwrap();

        let mut r = BitReader::new(&out[..]);
        assert_eq!(r.read_bit().unwrap(), Some(true));
        assert_eq!(r.read_bits(32).unwrap(), Some(0xFACE_8200));
        assert_eq!(r.read_bits(9).unwrap(), Some(256));
    }

    #[test]
    fn test_end_of_stream_is_none() {
        let data = [0xFFu8];
        let mut r = BitReader::new(&data[..]);
        assert_eq!(r.read_bits(8).unwrap(), Some(0xFF));
        assert_eq!(r.read_bit().unwrap(), None);

        let mut r = BitReader::new(&data[..]);
        assert_eq!(r.read_bits(16).unwrap(), None);
    }

    #[test]
    fn test_drop_flushes_partial_byte() {
        let mut out = Vec::new();
        {
            let mut w = BitWriter::new(&mut out);
            w.write_bits(2, 0b11).unwrap();
        }
        assert_eq!(out, vec![0b1100_0000]);
    }
}
