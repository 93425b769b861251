use std::hint::black_box;

use chrono::{NaiveDate, NaiveDateTime};
use criterion::{criterion_group, criterion_main, Criterion};
use timex_recognizer::{culture, DateExtractor, DateTimeExtractor, DateTimeModel, DateTimeOptions};

const SENTENCES: &[&str] = &[
    "I'll be back tomorrow at 5pm",
    "revenue for Q1 2023 was flat compared to the first half of 2022",
    "the workshop runs from May 1 to May 7, 9am-5pm each day",
    "we met 3 days ago and will meet again next Friday for 2 hours",
    "nothing temporal in this sentence at all, just words and 1234 numbers",
];

fn reference() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap()
}

fn bench_model(c: &mut Criterion) {
    let en = culture::for_name("en-us").unwrap();
    let model = DateTimeModel::new(en, DateTimeOptions::NONE);
    let reference = reference();

    c.bench_function("model_parse_sentences", |b| {
        b.iter(|| {
            for sentence in SENTENCES {
                black_box(model.parse(black_box(sentence), reference));
            }
        })
    });
}

fn bench_date_extractor(c: &mut Criterion) {
    let extractor = DateExtractor::new(culture::for_name("en-us").unwrap());
    let reference = reference();
    let text = SENTENCES.join(". ");

    c.bench_function("date_extract_paragraph", |b| {
        b.iter(|| black_box(extractor.extract(black_box(&text), reference)))
    });
}

fn bench_culture_build(c: &mut Criterion) {
    c.bench_function("culture_build_en_us", |b| {
        b.iter(|| black_box(culture::for_name("en-us").unwrap()))
    });
}

criterion_group!(benches, bench_model, bench_date_extractor, bench_culture_build);
criterion_main!(benches);
