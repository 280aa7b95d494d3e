#![no_main]
use huffpack::{compress, decompress, HeaderFormat};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, bool)| {
    let (bytes, as_tree) = data;

    // Arbitrary bytes must be rejected cleanly, never panic.
    let _ = decompress(&bytes);

    let format = if as_tree {
        HeaderFormat::StoreTree
    } else {
        HeaderFormat::StoreCounts
    };
    let stream = compress(&bytes, format).unwrap();
    assert_eq!(decompress(&stream).unwrap(), bytes);
});
