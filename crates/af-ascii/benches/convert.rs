use af_ascii::sampler::convert;
use af_core::charset::Palette;
use af_core::config::ConversionConfig;
use af_core::frame::FrameBuffer;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn noise_frame(width: u32, height: u32) -> FrameBuffer {
    let mut fb = FrameBuffer::new(width, height);
    let mut seed = 0x1234_5678_u32;
    for px in fb.data.chunks_exact_mut(4) {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        px.copy_from_slice(&seed.to_le_bytes());
        px[3] = 255;
    }
    fb
}

fn bench_convert(c: &mut Criterion) {
    let frame = noise_frame(1920, 1080);

    let mut group = c.benchmark_group("convert_1080p");
    for (name, grayscale, factor) in [
        ("gray_0.11", true, 0.11),
        ("color_0.11", false, 0.11),
        ("color_0.30", false, 0.30),
    ] {
        let config = ConversionConfig {
            resolution_factor: factor,
            palette: Palette::Detailed,
            inverted: false,
            grayscale,
        };
        group.bench_function(name, |b| {
            b.iter(|| convert(black_box(&frame), black_box(&config)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
