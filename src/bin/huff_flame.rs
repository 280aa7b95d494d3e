use huffpack::{compress, decompress, HeaderFormat};

fn main() {
    let input = (0..100_000u32)
        .map(|i| b"etaoin shrdlu"[(i % 13) as usize])
        .collect::<Vec<_>>();

    for _ in 0..200 {
        for format in [HeaderFormat::StoreCounts, HeaderFormat::StoreTree] {
            let stream = compress(&input, format).unwrap();
            let output = decompress(&stream).unwrap();
            assert_eq!(output.len(), input.len());
        }
    }
}
