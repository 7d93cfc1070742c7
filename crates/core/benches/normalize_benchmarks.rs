use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ephemq::compute::TimeInputs;
use ephemq::{NormalizeConfig, Operation, RawParams, RawValue, derive_times, normalize_list, normalize_request};

fn benchmark_time_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("time_derivation");
    let config = NormalizeConfig::default();

    for count in [10usize, 1_000, 100_000] {
        let start = RawValue::from(0.0);
        let stop = RawValue::from(86_400.0);
        let records = RawValue::from(count as i64);
        group.bench_with_input(BenchmarkId::new("by_count", count), &count, |b, _| {
            b.iter(|| {
                derive_times(
                    TimeInputs {
                        start: Some(black_box(&start)),
                        stop: Some(black_box(&stop)),
                        count: Some(black_box(&records)),
                        ..Default::default()
                    },
                    &config,
                )
                .unwrap()
            })
        });
    }

    // Duration given as text, the way query strings deliver it
    let start = RawValue::from("[0, 1000, 5000]");
    let stop = RawValue::from("[900, 4000, 9000]");
    let duration = RawValue::from("[0.5, 1.0, 2.0]");
    group.bench_function("segmented_text", |b| {
        b.iter(|| {
            derive_times(
                TimeInputs {
                    start: Some(black_box(&start)),
                    stop: Some(black_box(&stop)),
                    duration: Some(black_box(&duration)),
                    ..Default::default()
                },
                &config,
            )
            .unwrap()
        })
    });

    let explicit = RawValue::from(
        (0..1_000)
            .map(|i| (i as f64 * 0.25).to_string())
            .collect::<Vec<_>>()
            .join(", "),
    );
    group.bench_function("explicit_text_1000", |b| {
        b.iter(|| {
            derive_times(
                TimeInputs {
                    ets: Some(black_box(&explicit)),
                    ..Default::default()
                },
                &config,
            )
            .unwrap()
        })
    });

    group.finish();
}

fn benchmark_list_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_normalization");
    let config = NormalizeConfig::default();

    let text = RawValue::from(r#"["smithed", "reconstructed", \"predicted\"]"#);
    group.bench_function("delimited_text", |b| {
        b.iter(|| normalize_list(Some(black_box(&text)), &config))
    });

    let nested = RawValue::from(vec![
        RawValue::from("ck"),
        RawValue::from(vec!["spk", "fk"]),
        RawValue::from(1.5),
    ]);
    group.bench_function("nested_list", |b| {
        b.iter(|| normalize_list(Some(black_box(&nested)), &config))
    });

    group.finish();
}

fn benchmark_request_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_normalization");
    let config = NormalizeConfig::default();

    let params = RawParams::from_query_pairs([
        ("target", "LUNAR RECONNAISSANCE ORBITER"),
        ("observer", "MOON"),
        ("frame", "J2000"),
        ("abcorr", "None"),
        ("mission", "lroc"),
        ("startEts", "302228504.36824864"),
        ("stopEts", "302228604.36824864"),
        ("numRecords", "100"),
        ("ckQualities", "smithed,reconstructed"),
    ])
    .unwrap();

    group.bench_function("get_target_states", |b| {
        b.iter(|| normalize_request(Operation::GetTargetStates, black_box(&params), &config).unwrap())
    });

    let pairs: Vec<(String, String)> = (0..50)
        .map(|i| ("kernelList".to_string(), format!("kernel_{}.bc", i)))
        .chain([("target".to_string(), "MOON".to_string())])
        .collect();
    group.bench_function("query_pairs_repeated_keys", |b| {
        b.iter(|| RawParams::from_query_pairs(black_box(pairs.clone())).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_time_derivation,
    benchmark_list_normalization,
    benchmark_request_normalization
);
criterion_main!(benches);
