//! Error types for Huffman compression.

use thiserror::Error;

/// Error variants for codec operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A caller broke an API contract (e.g. queued an absent node).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The header could not be turned back into a Huffman tree.
    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    /// The stream does not start with the expected magic number.
    #[error("format mismatch: expected magic {expected:#010x}, found {found:#010x}")]
    FormatMismatch {
        /// Magic number this codec writes.
        expected: u32,
        /// Value actually read from the stream.
        found: u32,
    },

    /// The stream ended before the end-of-stream sentinel was decoded.
    #[error("stream truncated before the end-of-stream marker")]
    Truncated,

    /// The input holds a byte that the analyzed code table has no code for.
    #[error("byte {0} has no code in the analyzed table")]
    UnknownSymbol(u8),

    /// A frequency does not fit in the 32-bit counts header.
    #[error("count {count} for byte {byte} does not fit in a 32-bit header field")]
    CountOverflow {
        /// Byte value whose count overflowed.
        byte: u8,
        /// The offending count.
        count: u64,
    },

    /// An I/O error occurred on the underlying stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for codec operations.
pub type Result<T> = std::result::Result<T, Error>;
