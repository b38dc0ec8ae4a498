use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use insurance_prep::prelude::*;
use polars::prelude::*;
use rand::prelude::*;

fn create_records(n_rows: usize) -> DataFrame {
    let mut rng = rand::thread_rng();

    let genders: Vec<&str> = (0..n_rows)
        .map(|_| if rng.gen_bool(0.5) { "Male" } else { "Female" })
        .collect();
    let vehicle_ages: Vec<&str> = (0..n_rows)
        .map(|_| *["< 1 Year", "1-2 Year", "> 2 Years"].choose(&mut rng).unwrap())
        .collect();
    let damage: Vec<&str> = (0..n_rows)
        .map(|_| if rng.gen_bool(0.5) { "Yes" } else { "No" })
        .collect();
    // Roughly 2% missing premiums
    let premiums: Vec<Option<f64>> = (0..n_rows)
        .map(|_| (!rng.gen_bool(0.02)).then(|| rng.gen_range(2630.0..120_000.0)))
        .collect();

    let columns = vec![
        Series::new("id".into(), (1..=n_rows as i64).collect::<Vec<_>>()),
        Series::new("Gender".into(), genders),
        Series::new("Age".into(), (0..n_rows).map(|_| rng.gen_range(16i64..90)).collect::<Vec<_>>()),
        Series::new("Driving_License".into(), (0..n_rows).map(|_| rng.gen_range(0i64..2)).collect::<Vec<_>>()),
        Series::new("Region_Code".into(), (0..n_rows).map(|_| rng.gen_range(0..53) as f64).collect::<Vec<_>>()),
        Series::new("Previously_Insured".into(), (0..n_rows).map(|_| rng.gen_range(0i64..2)).collect::<Vec<_>>()),
        Series::new("Vehicle_Age".into(), vehicle_ages),
        Series::new("Vehicle_Damage".into(), damage),
        Series::new("Annual_Premium".into(), premiums),
        Series::new("Policy_Sales_Channel".into(), (0..n_rows).map(|_| rng.gen_range(1..164) as f64).collect::<Vec<_>>()),
        Series::new("Vintage".into(), (0..n_rows).map(|_| rng.gen_range(10i64..300)).collect::<Vec<_>>()),
        Series::new("Response".into(), (0..n_rows).map(|_| rng.gen_range(0i64..2)).collect::<Vec<_>>()),
    ];

    DataFrame::new(columns.into_iter().map(|s| s.into_column()).collect()).unwrap()
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    group.sample_size(10);

    for n_rows in [10_000, 100_000].iter() {
        let df = create_records(*n_rows);

        group.bench_with_input(BenchmarkId::new("fit", n_rows), &df, |b, df| {
            b.iter(|| Fitter::new().fit(black_box(df)).unwrap())
        });
    }

    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");

    let bundle = Fitter::new().fit(&create_records(50_000)).unwrap();
    let applier = Applier::new(&bundle);

    for n_rows in [10_000, 100_000].iter() {
        let df = create_records(*n_rows);

        group.bench_with_input(BenchmarkId::new("train", n_rows), &df, |b, df| {
            b.iter(|| applier.apply_train(black_box(df)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("eval", n_rows), &df, |b, df| {
            b.iter(|| applier.apply_eval(black_box(df)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fit, bench_apply);
criterion_main!(benches);
