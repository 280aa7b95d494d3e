//! Huffman tree and code table.
//!
//! The tree is built bottom-up from byte counts, or rebuilt top-down from
//! its pre-order serialization:
//!
//! ```text
//! tree := '1' symbol(9 bits) | '0' tree tree
//! ```
//!
//! Codes are root-to-leaf paths, `0` for left and `1` for right. Only
//! leaves carry symbols, so the code set is prefix-free.

use std::fmt;

use crate::bitio::{BitRead, BitWrite};
use crate::config::{LEAF_VALUE_BITS, MAX_TREE_NODES, PSEUDO_EOF, SYMBOL_COUNT};
use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::queue::{PriorityQueue, Weighted};

/// Huffman tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A symbol and its frequency.
    Leaf {
        /// Byte value, or [`PSEUDO_EOF`].
        symbol: u16,
        /// Occurrence count; zero for trees rebuilt from a serialized header.
        weight: u64,
    },
    /// Two subtrees; `weight` is the sum of theirs.
    Internal {
        /// Subtree reached by a `0` bit.
        left: Box<Node>,
        /// Subtree reached by a `1` bit.
        right: Box<Node>,
        /// Sum of both children's weights.
        weight: u64,
    },
}

impl Node {
    /// Create a leaf.
    pub fn leaf(symbol: u16, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    /// Join two subtrees under a new internal node, `left` on the 0 branch.
    pub fn merge(left: Node, right: Node) -> Self {
        let weight = left.weight() + right.weight();
        Node::Internal {
            left: Box::new(left),
            right: Box::new(right),
            weight,
        }
    }

    /// True for leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn count(&self) -> (usize, usize) {
        match self {
            Node::Leaf { .. } => (1, 1),
            Node::Internal { left, right, .. } => {
                let (ln, ll) = left.count();
                let (rn, rl) = right.count();
                (1 + ln + rn, ll + rl)
            }
        }
    }
}

impl Weighted for Node {
    fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } => *weight,
            Node::Internal { weight, .. } => *weight,
        }
    }
}

/// A prefix-free code tree over bytes plus the end-of-stream sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Build a tree from byte counts.
    ///
    /// One leaf per byte with a non-zero count is queued in byte order,
    /// followed by the sentinel with weight 1. The two lightest nodes are
    /// then joined (first extracted on the left) until one remains.
    pub fn from_frequencies(freq: &FrequencyTable) -> Self {
        let mut queue = PriorityQueue::new();
        for (byte, count) in freq.iter() {
            queue.push(Node::leaf(u16::from(byte), count));
        }
        let first = queue.push_pop(Node::leaf(PSEUDO_EOF, 1));

        Self {
            root: Self::combine(first, queue),
        }
    }

    /// Build a tree from an already filled queue. No sentinel is added.
    ///
    /// Returns `None` if the queue is empty.
    pub fn from_queue(mut queue: PriorityQueue<Node>) -> Option<Self> {
        let first = queue.extract_min()?;
        Some(Self {
            root: Self::combine(first, queue),
        })
    }

    /// `min` is the lightest node, already taken out of `queue`.
    fn combine(mut min: Node, mut queue: PriorityQueue<Node>) -> Node {
        while let Some(next) = queue.extract_min() {
            min = queue.push_pop(Node::merge(min, next));
        }
        min
    }

    /// Rebuild a tree from its pre-order serialization.
    ///
    /// Uses an explicit stack, so a hostile header cannot exhaust the call
    /// stack. Rebuilt leaves carry weight zero.
    ///
    /// # Errors
    /// - `Error::Truncated` if the reader runs out of bits.
    /// - `Error::CorruptHeader` if a leaf value is out of range or repeated,
    ///   the tree has more nodes than the alphabet allows, or it lacks the
    ///   sentinel.
    pub fn read_from<B: BitRead>(reader: &mut B) -> Result<Self> {
        // Internal nodes still waiting for children; `Some` once the left
        // subtree is complete.
        let mut pending: Vec<Option<Node>> = Vec::new();
        let mut seen = [false; SYMBOL_COUNT];
        let mut nodes = 0usize;

        loop {
            let bit = reader.read_bit()?.ok_or(Error::Truncated)?;
            nodes += 1;
            if nodes > MAX_TREE_NODES {
                return Err(Error::CorruptHeader(format!(
                    "tree has more than {MAX_TREE_NODES} nodes"
                )));
            }
            if !bit {
                pending.push(None);
                continue;
            }

            let value = reader
                .read_bits(LEAF_VALUE_BITS)?
                .ok_or(Error::Truncated)?;
            if value > u32::from(PSEUDO_EOF) {
                return Err(Error::CorruptHeader(format!(
                    "leaf value {value} outside the alphabet"
                )));
            }
            let symbol = value as u16;
            if std::mem::replace(&mut seen[symbol as usize], true) {
                return Err(Error::CorruptHeader(format!(
                    "symbol {symbol} appears twice"
                )));
            }

            let mut node = Node::leaf(symbol, 0);
            loop {
                let Some(slot) = pending.last_mut() else {
                    if !seen[PSEUDO_EOF as usize] {
                        return Err(Error::CorruptHeader(
                            "tree has no end-of-stream leaf".into(),
                        ));
                    }
                    return Ok(Self { root: node });
                };
                match slot.take() {
                    None => {
                        *slot = Some(node);
                        break;
                    }
                    Some(left) => {
                        pending.pop();
                        node = Node::merge(left, node);
                    }
                }
            }
        }
    }

    /// Write the pre-order serialization of the tree.
    pub fn write_to<B: BitWrite>(&self, writer: &mut B) -> Result<()> {
        Self::write_node(&self.root, writer)
    }

    fn write_node<B: BitWrite>(node: &Node, writer: &mut B) -> Result<()> {
        match node {
            Node::Leaf { symbol, .. } => {
                writer.write_bit(true)?;
                writer.write_bits(LEAF_VALUE_BITS, u32::from(*symbol))
            }
            Node::Internal { left, right, .. } => {
                writer.write_bit(false)?;
                Self::write_node(left, writer)?;
                Self::write_node(right, writer)
            }
        }
    }

    /// Extract the code of every leaf.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = vec![None; SYMBOL_COUNT];
        Self::build_codes(&self.root, Vec::new(), &mut codes);
        CodeTable { codes }
    }

    fn build_codes(node: &Node, prefix: Vec<u8>, codes: &mut [Option<Vec<u8>>]) {
        match node {
            Node::Leaf { symbol, .. } => {
                codes[*symbol as usize] = Some(prefix);
            }
            Node::Internal { left, right, .. } => {
                let mut left_prefix = prefix.clone();
                left_prefix.push(0);
                Self::build_codes(left, left_prefix, codes);

                let mut right_prefix = prefix;
                right_prefix.push(1);
                Self::build_codes(right, right_prefix, codes);
            }
        }
    }

    /// Decode one symbol by walking from the root, one bit per edge.
    ///
    /// A tree that is a single leaf consumes no bits.
    pub fn decode_symbol<B: BitRead>(&self, reader: &mut B) -> Result<u16> {
        let mut curr = &self.root;
        loop {
            match curr {
                Node::Leaf { symbol, .. } => return Ok(*symbol),
                Node::Internal { left, right, .. } => {
                    let bit = reader.read_bit()?.ok_or(Error::Truncated)?;
                    curr = if bit { right } else { left };
                }
            }
        }
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Total number of nodes, internal and leaf.
    pub fn node_count(&self) -> usize {
        self.root.count().0
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.root.count().1
    }

    /// Size of the pre-order serialization: one flag bit per node plus a
    /// leaf value per leaf.
    pub fn serialized_bits(&self) -> u64 {
        let (nodes, leaves) = self.root.count();
        nodes as u64 + leaves as u64 * u64::from(LEAF_VALUE_BITS)
    }

    fn fmt_node(node: &Node, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match node {
            Node::Leaf { symbol, weight } => {
                writeln!(f, "{:indent$}{weight}; {symbol}", "", indent = depth + 1)
            }
            Node::Internal { left, right, weight } => {
                Self::fmt_node(left, depth + 1, f)?;
                writeln!(f, "{:indent$}[{weight}]", "", indent = depth + 1)?;
                Self::fmt_node(right, depth + 1, f)
            }
        }
    }
}

/// Sideways dump: left subtree above its parent, right below.
impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::fmt_node(&self.root, 0, f)
    }
}

/// Symbol to bit-code mapping extracted from a [`HuffmanTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Vec<u8>>>,
}

impl CodeTable {
    /// Code for `symbol` as a sequence of 0/1 values, if it has one.
    pub fn get(&self, symbol: u16) -> Option<&[u8]> {
        self.codes.get(symbol as usize)?.as_deref()
    }

    /// Code of the end-of-stream sentinel.
    pub fn eof_code(&self) -> &[u8] {
        self.get(PSEUDO_EOF).unwrap_or_default()
    }

    /// Symbols that have codes, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &[u8])> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.as_deref().map(|c| (s as u16, c)))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    /// True if no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bits needed to encode an input with these counts, sentinel included.
    pub fn encoded_bits(&self, freq: &FrequencyTable) -> u64 {
        let body: u64 = freq
            .iter()
            .map(|(b, count)| {
                let len = self.get(u16::from(b)).map_or(0, <[u8]>::len);
                count * len as u64
            })
            .sum();
        body + self.eof_code().len() as u64
    }

    /// True if no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&[u8]> = self.iter().map(|(_, c)| c).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !b.starts_with(a))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitio::{BitReader, BitWriter};
    use proptest::prelude::*;

    fn code(table: &CodeTable, byte: u8) -> Vec<u8> {
        table.get(u16::from(byte)).unwrap().to_vec()
    }

    #[test]
    fn test_example_tree_shape() {
        // Queue: EOF(1) C(2) B(3) A(5). EOF+C -> 3 queues after B(3);
        // B+3 -> 6; A+6 -> root.
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"AAAAABBBCC"));
        let table = tree.code_table();

        assert_eq!(code(&table, b'A'), vec![0]);
        assert_eq!(code(&table, b'B'), vec![1, 0]);
        assert_eq!(table.eof_code(), &[1, 1, 0]);
        assert_eq!(code(&table, b'C'), vec![1, 1, 1]);
        assert_eq!(tree.root().weight(), 11);
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.serialized_bits(), 7 + 4 * 9);
    }

    #[test]
    fn test_empty_input_is_single_sentinel_leaf() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(&[]));
        assert!(tree.root().is_leaf());
        let table = tree.code_table();
        assert_eq!(table.len(), 1);
        assert!(table.eof_code().is_empty());

        let mut r = BitReader::new(&[0u8; 0][..]);
        assert_eq!(tree.decode_symbol(&mut r).unwrap(), PSEUDO_EOF);
    }

    #[test]
    fn test_single_byte_input() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"zzzz"));
        let table = tree.code_table();
        assert_eq!(table.eof_code(), &[0]);
        assert_eq!(code(&table, b'z'), vec![1]);
    }

    #[test]
    fn test_from_queue() {
        let mut pq = PriorityQueue::new();
        pq.push(Node::leaf(100, 3));
        pq.push(Node::leaf(88, 10));
        pq.push(Node::leaf(200, 5));
        let tree = HuffmanTree::from_queue(pq).unwrap();
        let table = tree.code_table();
        // 100(3) and 200(5) join first; that subtree (8) sits left of 88(10).
        assert_eq!(table.get(100), Some(&[0u8, 0][..]));
        assert_eq!(table.get(200), Some(&[0u8, 1][..]));
        assert_eq!(table.get(88), Some(&[1u8][..]));

        assert!(HuffmanTree::from_queue(PriorityQueue::new()).is_none());
    }

    #[test]
    fn test_serialize_example_bits() {
        let mut pq = PriorityQueue::new();
        pq.push(Node::leaf(1, 1));
        pq.push(Node::leaf(PSEUDO_EOF, 1));
        let tree = HuffmanTree::from_queue(pq).unwrap();

        let mut w = BitWriter::new(Vec::new());
        tree.write_to(&mut w).unwrap();
        assert_eq!(w.bits_written(), tree.serialized_bits());
        let out = w.finish().unwrap();
        // 0 1 000000001 1 100000000 + padding
        assert_eq!(out, vec![0b0100_0000, 0b0011_1000, 0b0000_0000]);
    }

    #[test]
    fn test_rebuild_matches_codes() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(data));

        let mut w = BitWriter::new(Vec::new());
        tree.write_to(&mut w).unwrap();
        let bytes = w.finish().unwrap();

        let rebuilt = HuffmanTree::read_from(&mut BitReader::new(&bytes[..])).unwrap();
        assert_eq!(rebuilt.code_table(), tree.code_table());
        assert_eq!(rebuilt.node_count(), tree.node_count());
    }

    fn rebuild(bits: &[(u32, u32)]) -> Result<HuffmanTree> {
        let mut w = BitWriter::new(Vec::new());
        for &(n, v) in bits {
            w.write_bits(n, v).unwrap();
        }
        let bytes = w.finish().unwrap();
        HuffmanTree::read_from(&mut BitReader::new(&bytes[..]))
    }

    #[test]
    fn test_rebuild_rejects_out_of_range_leaf() {
        let err = rebuild(&[(1, 1), (9, 300)]).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader(_)));
    }

    #[test]
    fn test_rebuild_rejects_duplicate_leaf() {
        let err = rebuild(&[(1, 0), (1, 1), (9, 256), (1, 1), (9, 256)]).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader(_)));
    }

    #[test]
    fn test_rebuild_requires_sentinel() {
        let err = rebuild(&[(1, 0), (1, 1), (9, 7), (1, 1), (9, 8)]).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader(_)));
    }

    #[test]
    fn test_rebuild_truncated() {
        // Internal node, then nothing but padding zeros: runs out of bits.
        let err = HuffmanTree::read_from(&mut BitReader::new(&[0u8][..])).unwrap_err();
        assert!(matches!(err, Error::Truncated));
    }

    #[test]
    fn test_rebuild_bounds_node_count() {
        let zeros = vec![0u8; 1024];
        let err = HuffmanTree::read_from(&mut BitReader::new(&zeros[..])).unwrap_err();
        assert!(matches!(err, Error::CorruptHeader(_)));
    }

    #[test]
    fn test_display_lists_every_leaf() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"AAAAABBBCC"));
        let dump = tree.to_string();
        assert_eq!(dump.lines().count(), tree.node_count());
        assert!(dump.contains("5; 65"));
        assert!(dump.contains("1; 256"));
    }

    proptest! {
        #[test]
        fn prop_codes_prefix_free_and_deterministic(data in prop::collection::vec(any::<u8>(), 0..512)) {
            let freq = FrequencyTable::from_bytes(&data);
            let a = HuffmanTree::from_frequencies(&freq).code_table();
            let b = HuffmanTree::from_frequencies(&freq).code_table();
            prop_assert!(a.is_prefix_free());
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.len(), freq.iter().count() + 1);
        }
    }
}
