use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use ttml_cues::{SilenceOptions, TtmlParser, parse_duration, write};

const LONG_SUBTITLES: &str = include_str!("../tests/test_data/long_subtitles.ttml");

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("TTML Parse Performance");
    let parser = TtmlParser::new();

    group.bench_function("500 cues", |b| {
        b.iter(|| {
            let _ = parser.parse_str(black_box(LONG_SUBTITLES));
        })
    });

    group.bench_function("Time notations", |b| {
        b.iter(|| {
            for value in ["1.5s", "2500ms", "01:02:03.456", "bogus"] {
                black_box(parse_duration(black_box(value)));
            }
        })
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let text = (1..=500)
        .map(|i| format!("Subtitle line {i} & more"))
        .collect::<Vec<_>>()
        .join("\n");

    let mut writer = write(&text, SilenceOptions::default());
    for index in 0..writer.len() {
        let end_ms = (index as i64 + 1) * 1500;
        if writer.record(index, end_ms).is_err() {
            return;
        }
    }

    c.bench_function("TTML Render 502 rows", |b| {
        b.iter(|| {
            let _ = black_box(&writer).render();
        })
    });
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
