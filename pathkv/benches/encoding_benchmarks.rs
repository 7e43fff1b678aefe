use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pathkv::encoding::{Base64Codec, DataCodec, FormatDetector, HexCodec, JsonCodec};
use rand::Rng;

/// Benchmarks for the CLI's binary/text sub-encodings: codec
/// encode/decode throughput and format-detection cost.

fn generate_test_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

fn generate_text_data(size: usize) -> Vec<u8> {
    let text = "The quick brown fox jumps over the lazy dog. ";
    let mut data = Vec::with_capacity(size);
    while data.len() < size {
        data.extend_from_slice(text.as_bytes());
    }
    data.truncate(size);
    data
}

fn bench_codec_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_encoding");
    let sizes = vec![64, 256, 1024, 4096, 16384, 65536];

    for size in sizes {
        let data = generate_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("base64_encode", size), &data, |b, data| {
            let codec = Base64Codec::new();
            b.iter(|| codec.encode(black_box(data)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("hex_encode", size), &data, |b, data| {
            let codec = HexCodec::new();
            b.iter(|| codec.encode(black_box(data)).unwrap());
        });

        let text_data = generate_text_data(size);
        group.bench_with_input(
            BenchmarkId::new("json_encode", size),
            &text_data,
            |b, data| {
                let codec = JsonCodec::new();
                b.iter(|| codec.encode(black_box(data)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_codec_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_decoding");
    let sizes = vec![64, 256, 1024, 4096, 16384, 65536];

    for size in sizes {
        let data = generate_test_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        let base64_codec = Base64Codec::new();
        let hex_codec = HexCodec::new();
        let json_codec = JsonCodec::new();

        let base64_encoded = base64_codec.encode(&data).unwrap();
        let hex_encoded = hex_codec.encode(&data).unwrap();
        let text_data = generate_text_data(size);
        let json_encoded = json_codec.encode(&text_data).unwrap();

        group.bench_with_input(
            BenchmarkId::new("base64_decode", size),
            &base64_encoded,
            |b, encoded| {
                let codec = Base64Codec::new();
                b.iter(|| codec.decode(black_box(encoded)).unwrap());
            },
        );

        group.bench_with_input(
            BenchmarkId::new("hex_decode", size),
            &hex_encoded,
            |b, encoded| {
                let codec = HexCodec::new();
                b.iter(|| codec.decode(black_box(encoded)).unwrap());
            },
        );

        group.bench_with_input(
            BenchmarkId::new("json_decode", size),
            &json_encoded,
            |b, encoded| {
                let codec = JsonCodec::new();
                b.iter(|| codec.decode(black_box(encoded)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_format_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_detection");

    let base64_codec = Base64Codec::new();
    let hex_codec = HexCodec::new();
    let json_codec = JsonCodec::new();
    let detector = FormatDetector::new();

    let sizes = vec![64, 256, 1024, 4096];

    for size in sizes {
        let data = generate_test_data(size);
        let text_data = generate_text_data(size);

        let base64_encoded = base64_codec.encode(&data).unwrap();
        let hex_encoded = hex_codec.encode(&data).unwrap();
        let json_encoded = json_codec.encode(&text_data).unwrap();

        group.bench_with_input(
            BenchmarkId::new("detect_base64", size),
            &base64_encoded,
            |b, encoded| b.iter(|| detector.detect(black_box(encoded))),
        );

        group.bench_with_input(
            BenchmarkId::new("detect_hex", size),
            &hex_encoded,
            |b, encoded| b.iter(|| detector.detect(black_box(encoded))),
        );

        group.bench_with_input(
            BenchmarkId::new("detect_json", size),
            &json_encoded,
            |b, encoded| b.iter(|| detector.detect(black_box(encoded))),
        );

        let ambiguous_data = "41414141"; // could be hex or base64
        group.bench_function(format!("detect_ambiguous_{size}"), |b| {
            b.iter(|| detector.detect(black_box(ambiguous_data)));
        });
    }

    group.finish();
}

criterion_group!(
    encoding_benches,
    bench_codec_encoding,
    bench_codec_decoding,
    bench_format_detection,
);

criterion_main!(encoding_benches);
