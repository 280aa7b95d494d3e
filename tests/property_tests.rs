use huffpack::bitio::{BitReader, BitWriter};
use huffpack::{compress, decompress, FrequencyTable, HeaderFormat, HuffProcessor, HuffmanTree};
use proptest::prelude::*;

fn format_strategy() -> impl Strategy<Value = HeaderFormat> {
    prop_oneof![Just(HeaderFormat::StoreCounts), Just(HeaderFormat::StoreTree)]
}

proptest! {
    #[test]
    fn test_roundtrip(
        input in prop::collection::vec(any::<u8>(), 0..2048),
        format in format_strategy(),
    ) {
        let stream = compress(&input, format).unwrap();
        let output = decompress(&stream).unwrap();
        prop_assert_eq!(input, output);
    }

    #[test]
    fn test_roundtrip_skewed(
        // Few distinct bytes with lopsided counts give deep, unbalanced trees.
        input in prop::collection::vec(prop_oneof![
            8 => Just(b'e'),
            4 => Just(b't'),
            2 => Just(b'a'),
            1 => any::<u8>(),
        ], 0..4096),
        format in format_strategy(),
    ) {
        let stream = compress(&input, format).unwrap();
        prop_assert_eq!(decompress(&stream).unwrap(), input);
    }

    #[test]
    fn test_written_bits_match_projection(
        input in prop::collection::vec(any::<u8>(), 0..1024),
        format in format_strategy(),
    ) {
        let mut processor = HuffProcessor::new();
        let analysis = processor.analyze(&input[..], format).unwrap();
        let mut stream = Vec::new();
        let written = processor.compress(&analysis, &input[..], &mut stream, true).unwrap();

        prop_assert_eq!(written, analysis.projected_bits());
        prop_assert_eq!(stream.len() as u64, written.div_ceil(8));
        prop_assert_eq!(
            analysis.saved_bits(),
            analysis.original_bits() as i64 - written as i64
        );
    }

    #[test]
    fn test_tree_serialization_roundtrip(input in prop::collection::vec(any::<u8>(), 0..1024)) {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(&input));

        let mut writer = BitWriter::new(Vec::new());
        tree.write_to(&mut writer).unwrap();
        let bytes = writer.finish().unwrap();

        let rebuilt = HuffmanTree::read_from(&mut BitReader::new(&bytes[..])).unwrap();
        prop_assert_eq!(rebuilt.code_table(), tree.code_table());
    }

    #[test]
    fn test_garbage_never_panics(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decompress(&input);
    }
}
