use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scribe_core::{Document, compose_row};

fn c_source(lines: usize) -> String {
    let mut out = String::with_capacity(lines * 48);
    for i in 0..lines {
        match i % 4 {
            0 => out.push_str("int value = 0x1F; // running total\n"),
            1 => out.push_str("\tif (value > 3.14) return \"done\";\n"),
            2 => out.push_str("#include <stdio.h>\n"),
            _ => out.push_str("/* block */ static char buf[128];\n"),
        }
    }
    out.pop();
    out
}

fn bench_open_and_highlight(c: &mut Criterion) {
    let text = c_source(10_000);
    c.bench_function("open_highlight/10k_lines", |b| {
        b.iter(|| {
            let mut doc = Document::from_text(black_box(&text), 8);
            doc.set_filename("bench.c");
            black_box(doc.num_rows());
        })
    });
}

fn bench_random_typing(c: &mut Criterion) {
    let text = c_source(10_000);
    c.bench_function("typing_random/100_inserts", |b| {
        b.iter_batched(
            || {
                let mut doc = Document::from_text(&text, 8);
                doc.set_filename("bench.c");
                (doc, StdRng::seed_from_u64(7))
            },
            |(mut doc, mut rng)| {
                for _ in 0..100 {
                    let row = rng.gen_range(0..doc.num_rows());
                    let col = rng.gen_range(0..=doc.row(row).map(|r| r.raw_len()).unwrap_or(0));
                    doc.insert_char(row, col, 'x');
                }
                black_box(doc.is_dirty());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_comment_cascade(c: &mut Criterion) {
    // Opening a block comment at the top of a document with no closer
    // forces the carry to walk every row.
    let mut text = String::from("start here\n");
    for _ in 0..5_000 {
        text.push_str("plain filler row\n");
    }
    c.bench_function("comment_cascade/5k_rows", |b| {
        b.iter_batched(
            || {
                let mut doc = Document::from_text(&text, 8);
                doc.set_filename("bench.c");
                doc
            },
            |mut doc| {
                doc.insert_char(0, 0, '*');
                doc.insert_char(0, 0, '/');
                black_box(doc.row(0).map(|r| r.ends_in_open_comment()));
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_compose_window(c: &mut Criterion) {
    let mut doc = Document::from_text(&c_source(10_000), 8);
    doc.set_filename("bench.c");
    let start = 5_000;
    let count = 60;

    c.bench_function("compose_window/60_rows", |b| {
        b.iter(|| {
            for idx in start..start + count {
                if let Some(row) = doc.row(idx) {
                    black_box(compose_row(row, 0, 120));
                }
            }
        })
    });
}

criterion_group!(
    benches,
    bench_open_and_highlight,
    bench_random_typing,
    bench_comment_cascade,
    bench_compose_window
);
criterion_main!(benches);
