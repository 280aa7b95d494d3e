//! # Huffman Byte-Stream Compression
//!
//! *Shorter codes for frequent bytes, losslessly reversed.*
//!
//! ## Intuition First
//!
//! Plain text spends 8 bits on every byte, whether it is the letter `e` or a
//! control character that never shows up. Huffman coding hands out codes by
//! frequency: common bytes get short codes, rare bytes long ones. Because
//! every code is a path to a leaf of a binary tree, no code is a prefix of
//! another and the bitstream needs no separators.
//!
//! ## The Problem
//!
//! The decoder needs the same tree the encoder used. This crate ships one of
//! two headers with every stream:
//! - **Counts**: all 256 byte counts. The decoder re-runs the tree build, so
//!   the build must be fully deterministic: equal weights are resolved by
//!   insertion order, never by heap layout.
//! - **Tree**: the tree itself in pre-order, `1 + 9 bits` per leaf and `1`
//!   per internal node. Usually far smaller than 8 KiB of counts.
//!
//! A 257th symbol, the pseudo-EOF sentinel, ends every stream so the decoder
//! knows where the data stops inside the last padded byte.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon     Entropy as the fundamental limit
//! 1952  Huffman     Minimum-redundancy prefix codes (MIT term paper)
//! 1977  Ziv-Lempel  Dictionary coding, later paired with Huffman
//! 1993  Katz        DEFLATE: LZ77 + Huffman, still everywhere
//! ```
//!
//! ## Complexity Analysis
//!
//! - **Time**: $O(n)$ to count and encode; $O(k^2)$ to build the tree over
//!   $k \le 257$ symbols with a sorted-insert queue.
//! - **Space**: $O(k)$ for the tree and code table; decoding buffers the
//!   output so a corrupt stream never leaves partial data behind.
//!
//! ## Failure Modes
//!
//! 1. **Small inputs**: headers dominate; [`HuffProcessor::compress`] skips
//!    writing unless forced when nothing would be saved.
//! 2. **Corrupt streams**: reported as [`Error::FormatMismatch`],
//!    [`Error::CorruptHeader`] or [`Error::Truncated`].
//!
//! ## Example
//!
//! ```rust
//! use huffpack::{HeaderFormat, HuffProcessor};
//!
//! let data = b"abracadabra abracadabra abracadabra abracadabra";
//! let mut processor = HuffProcessor::new();
//! let analysis = processor.analyze(&data[..], HeaderFormat::StoreTree)?;
//!
//! let mut stream = Vec::new();
//! let bits = processor.compress(&analysis, &data[..], &mut stream, true)?;
//! assert_eq!(bits, analysis.projected_bits());
//!
//! let mut restored = Vec::new();
//! processor.decompress(&stream[..], &mut restored)?;
//! assert_eq!(restored, data);
//! # Ok::<(), huffpack::Error>(())
//! ```
//!
//! ## References
//!
//! - Huffman, D. A. (1952). "A Method for the Construction of Minimum-Redundancy Codes."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitio;
pub mod codec;
pub mod config;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod queue;
pub mod report;

pub use codec::{compress, decompress, Analysis, HuffProcessor};
pub use config::HeaderFormat;
pub use error::Error;
pub use frequency::FrequencyTable;
pub use huffman::{CodeTable, HuffmanTree, Node};
pub use queue::PriorityQueue;
pub use report::{LogReporter, Reporter};
