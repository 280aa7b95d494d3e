//! Compression and decompression driver.
//!
//! Compression is two passes over the same input: [`HuffProcessor::analyze`]
//! counts bytes, builds the tree and projects the output size, then
//! [`HuffProcessor::compress`] writes the stream. Decompression is a single
//! pass.
//!
//! # Stream layout
//!
//! ```text
//! [32] magic number
//! [32] header format tag
//! counts: [32 x 256] byte counts
//! tree:   [32] node count, then the pre-order tree
//! [..] codes of the input bytes, then the code of the sentinel
//! ```

use std::io::{BufReader, Read, Write};

use crate::bitio::{BitRead, BitReader, BitWrite, BitWriter};
use crate::config::{HeaderFormat, ALPH_SIZE, BITS_PER_INT, MAGIC_NUMBER, PSEUDO_EOF};
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::huffman::{CodeTable, HuffmanTree};
use crate::report::{LogReporter, Reporter};

/// Result of analyzing an input: the tree to compress it with and the
/// projected size.
#[derive(Debug, Clone)]
pub struct Analysis {
    format: HeaderFormat,
    freq: FrequencyTable,
    tree: HuffmanTree,
    codes: CodeTable,
    projected_bits: u64,
}

impl Analysis {
    /// Header form the stream will use.
    pub fn format(&self) -> HeaderFormat {
        self.format
    }

    /// Byte counts of the analyzed input.
    pub fn frequencies(&self) -> &FrequencyTable {
        &self.freq
    }

    /// Tree built from the counts.
    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    /// Codes extracted from the tree.
    pub fn code_table(&self) -> &CodeTable {
        &self.codes
    }

    /// Size of the input in bits.
    pub fn original_bits(&self) -> u64 {
        self.freq.original_bits()
    }

    /// Exact size of the compressed stream in bits, before byte padding.
    pub fn projected_bits(&self) -> u64 {
        self.projected_bits
    }

    /// `original_bits - projected_bits`; zero or negative means compression
    /// does not pay off.
    pub fn saved_bits(&self) -> i64 {
        self.original_bits() as i64 - self.projected_bits as i64
    }
}

/// Bits taken by the header of the given form, excluding magic and tag.
fn header_bits(format: HeaderFormat, tree: &HuffmanTree) -> u64 {
    match format {
        HeaderFormat::StoreCounts => ALPH_SIZE as u64 * u64::from(BITS_PER_INT),
        HeaderFormat::StoreTree => u64::from(BITS_PER_INT) + tree.serialized_bits(),
    }
}

/// Huffman compressor and decompressor.
pub struct HuffProcessor<P = LogReporter> {
    reporter: P,
}

impl HuffProcessor<LogReporter> {
    /// Create a processor that reports through the `log` facade.
    pub fn new() -> Self {
        Self {
            reporter: LogReporter,
        }
    }
}

impl Default for HuffProcessor<LogReporter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Reporter> HuffProcessor<P> {
    /// Create a processor with a custom status sink.
    pub fn with_reporter(reporter: P) -> Self {
        Self { reporter }
    }

    /// Count the input, build its tree and project the compressed size.
    ///
    /// # Errors
    /// Returns `Error::CountOverflow` if `format` is
    /// [`HeaderFormat::StoreCounts`] and a count does not fit in 32 bits,
    /// and `Error::Io` if reading fails.
    pub fn analyze<R: Read>(&mut self, input: R, format: HeaderFormat) -> Result<Analysis> {
        let freq = FrequencyTable::from_reader(input)?;
        if format == HeaderFormat::StoreCounts {
            if let Some((byte, count)) = freq.iter().find(|&(_, c)| c > u64::from(u32::MAX)) {
                return Err(Error::CountOverflow { byte, count });
            }
        }
        log::trace!("byte frequency: {:?}", freq);

        let tree = HuffmanTree::from_frequencies(&freq);
        let codes = tree.code_table();
        log::trace!("huffman tree:\n{}", tree);

        let projected_bits = 2 * u64::from(BITS_PER_INT)
            + header_bits(format, &tree)
            + codes.encoded_bits(&freq);

        let analysis = Analysis {
            format,
            freq,
            tree,
            codes,
            projected_bits,
        };
        log::debug!(
            "analyzed {} bytes: {} symbols, {} -> {} bits ({:?})",
            analysis.freq.total(),
            analysis.codes.len(),
            analysis.original_bits(),
            analysis.projected_bits,
            format,
        );
        self.reporter.update(&format!(
            "analysis complete: {} bits saved",
            analysis.saved_bits()
        ));
        Ok(analysis)
    }

    /// Write the compressed form of `input`, which must be the same bytes
    /// that produced `analysis`.
    ///
    /// Nothing is written when `analysis.saved_bits() <= 0` unless `force`
    /// is set. The stream is assembled in memory and handed to `output` in
    /// one write, so a failed call leaves `output` untouched unless the
    /// final write itself fails. Returns the number of bits written (0 when
    /// skipped), not counting the zero padding of the final byte.
    ///
    /// # Errors
    /// Returns `Error::UnknownSymbol` if `input` holds a byte the analysis
    /// never saw, and `Error::Io` on read or write failures.
    pub fn compress<R: Read, W: Write>(
        &mut self,
        analysis: &Analysis,
        input: R,
        mut output: W,
        force: bool,
    ) -> Result<u64> {
        if analysis.saved_bits() <= 0 && !force {
            self.reporter.update(&format!(
                "compressed output would not be smaller ({} bits saved); skipping",
                analysis.saved_bits()
            ));
            return Ok(0);
        }

        let mut out = BitWriter::new(Vec::new());
        out.write_bits(BITS_PER_INT, MAGIC_NUMBER)?;
        out.write_bits(BITS_PER_INT, analysis.format.tag())?;

        match analysis.format {
            HeaderFormat::StoreCounts => {
                for (byte, &count) in analysis.freq.counts().iter().enumerate() {
                    let count = u32::try_from(count).map_err(|_| Error::CountOverflow {
                        byte: byte as u8,
                        count,
                    })?;
                    out.write_bits(BITS_PER_INT, count)?;
                }
            }
            HeaderFormat::StoreTree => {
                out.write_bits(BITS_PER_INT, analysis.tree.node_count() as u32)?;
                analysis.tree.write_to(&mut out)?;
            }
        }

        for byte in BufReader::new(input).bytes() {
            let byte = byte?;
            let code = analysis
                .codes
                .get(u16::from(byte))
                .ok_or(Error::UnknownSymbol(byte))?;
            write_code(&mut out, code)?;
        }
        write_code(&mut out, analysis.codes.eof_code())?;

        let written = out.bits_written();
        let stream = out.finish()?;
        output.write_all(&stream)?;
        output.flush()?;

        log::debug!("compressed: {} bits written", written);
        self.reporter
            .update(&format!("compression complete: {written} bits written"));
        Ok(written)
    }

    /// Decode a compressed stream into `output`.
    ///
    /// The decoded bytes are buffered and only written once the sentinel
    /// is reached, so a failed call leaves `output` untouched. Returns the
    /// number of bits written to `output`.
    ///
    /// # Errors
    /// - `Error::FormatMismatch` if the magic number is wrong.
    /// - `Error::CorruptHeader` for an unknown format tag or a malformed tree.
    /// - `Error::Truncated` if the stream ends early.
    /// - `Error::Io` on read or write failures.
    pub fn decompress<R: Read, W: Write>(&mut self, input: R, mut output: W) -> Result<u64> {
        let mut bits = BitReader::new(BufReader::new(input));

        let magic = read_int(&mut bits)?;
        if magic != MAGIC_NUMBER {
            self.reporter.show_error(&format!(
                "not a compressed stream: magic number {magic:#010x} does not match"
            ));
            return Err(Error::FormatMismatch {
                expected: MAGIC_NUMBER,
                found: magic,
            });
        }

        let format = HeaderFormat::try_from(read_int(&mut bits)?)?;
        let tree = match format {
            HeaderFormat::StoreCounts => {
                let mut counts = [0u64; ALPH_SIZE];
                for count in counts.iter_mut() {
                    *count = u64::from(read_int(&mut bits)?);
                }
                HuffmanTree::from_frequencies(&FrequencyTable::from_counts(counts))
            }
            HeaderFormat::StoreTree => {
                let stored_nodes = read_int(&mut bits)?;
                let tree = HuffmanTree::read_from(&mut bits)?;
                if stored_nodes as usize != tree.node_count() {
                    log::warn!(
                        "header claims {} tree nodes, rebuilt {}",
                        stored_nodes,
                        tree.node_count()
                    );
                }
                tree
            }
        };
        log::trace!("decoding with tree:\n{}", tree);

        let mut decoded = Vec::new();
        loop {
            let symbol = tree.decode_symbol(&mut bits)?;
            if symbol == PSEUDO_EOF {
                break;
            }
            decoded.push(symbol as u8);
        }

        output.write_all(&decoded)?;
        output.flush()?;

        let written = decoded.len() as u64 * 8;
        log::debug!("decompressed {} bytes ({:?} header)", decoded.len(), format);
        self.reporter
            .update(&format!("decompression complete: {written} bits written"));
        Ok(written)
    }
}

fn read_int<B: BitRead>(bits: &mut B) -> Result<u32> {
    bits.read_bits(BITS_PER_INT)?.ok_or(Error::Truncated)
}

fn write_code<B: BitWrite>(out: &mut B, code: &[u8]) -> Result<()> {
    for &bit in code {
        out.write_bit(bit == 1)?;
    }
    Ok(())
}

/// Compress a byte slice, writing the stream even if it is not smaller.
pub fn compress(data: &[u8], format: HeaderFormat) -> Result<Vec<u8>> {
    let mut processor = HuffProcessor::new();
    let analysis = processor.analyze(data, format)?;
    let mut out = Vec::new();
    processor.compress(&analysis, data, &mut out, true)?;
    Ok(out)
}

/// Decompress a stream held in memory.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    HuffProcessor::new().decompress(data, &mut out)?;
    Ok(out)
}
