//! Fixed stream constants shared by encoder and decoder.
//!
//! Both ends of a stream must agree on every value here, so they are
//! compile-time constants rather than runtime settings.

use crate::error::{Error, Result};

/// Bits in one input symbol (a byte).
pub const BITS_PER_WORD: u32 = 8;

/// Bits in every fixed-width integer field of the stream.
pub const BITS_PER_INT: u32 = 32;

/// Number of literal byte values.
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;

/// The pseudo-end-of-file sentinel symbol.
pub const PSEUDO_EOF: u16 = ALPH_SIZE as u16;

/// Total alphabet size: every byte value plus the sentinel.
pub const SYMBOL_COUNT: usize = ALPH_SIZE + 1;

/// Width of a leaf value in a serialized tree; one wider than a byte so the
/// sentinel fits.
pub const LEAF_VALUE_BITS: u32 = BITS_PER_WORD + 1;

/// First 32 bits of every compressed stream.
pub const MAGIC_NUMBER: u32 = 0xFACE_8200;

/// Upper bound on nodes in a tree over the full alphabet (`2n - 1`).
pub const MAX_TREE_NODES: usize = 2 * SYMBOL_COUNT - 1;

/// How the Huffman tree travels inside a compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderFormat {
    /// 256 32-bit counts; the decoder rebuilds the tree from them.
    StoreCounts,
    /// A 32-bit node count followed by the pre-order tree.
    StoreTree,
}

impl HeaderFormat {
    /// Tag for [`HeaderFormat::StoreCounts`] (`"stac"`).
    pub const STORE_COUNTS_TAG: u32 = 0x7374_6163;
    /// Tag for [`HeaderFormat::StoreTree`] (`"stre"`).
    pub const STORE_TREE_TAG: u32 = 0x7374_7265;

    /// The 32-bit tag written after the magic number.
    pub fn tag(self) -> u32 {
        match self {
            HeaderFormat::StoreCounts => Self::STORE_COUNTS_TAG,
            HeaderFormat::StoreTree => Self::STORE_TREE_TAG,
        }
    }
}

impl TryFrom<u32> for HeaderFormat {
    type Error = Error;

    fn try_from(tag: u32) -> Result<Self> {
        match tag {
            Self::STORE_COUNTS_TAG => Ok(HeaderFormat::StoreCounts),
            Self::STORE_TREE_TAG => Ok(HeaderFormat::StoreTree),
            other => Err(Error::CorruptHeader(format!(
                "unknown header format tag {other:#010x}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_resolve_to_formats() {
        for format in [HeaderFormat::StoreCounts, HeaderFormat::StoreTree] {
            assert_eq!(HeaderFormat::try_from(format.tag()).unwrap(), format);
        }
    }

    #[test]
    fn test_unknown_tag_is_corrupt_header() {
        let err = HeaderFormat::try_from(0xDEAD_BEEF).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader(_)));
    }

    #[test]
    fn test_leaf_width_holds_sentinel() {
        assert!(u32::from(PSEUDO_EOF) < 1 << LEAF_VALUE_BITS);
    }
}
