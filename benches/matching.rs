use codspeed_criterion_compat::{Criterion, criterion_group, criterion_main};
use lost_years::prelude::*;
use polars::df;

const COUNTRIES: [&str; 5] = ["USA", "CAN", "SWE", "DEUTNP", "FRATNP"];

fn setup_hld_table() -> RefTable {
    let mut rows = Vec::new();
    for country in COUNTRIES {
        for year in (1900..=2020).step_by(10) {
            for age in 0..=100 {
                for sex in ["M", "F"] {
                    rows.push(RefRow {
                        age,
                        year,
                        sex: Some(sex),
                        country: Some(country.to_string()),
                        life_expectancy: LifeExpectancy::Single((100 - age) as f64 * 0.8),
                    });
                }
            }
        }
    }
    RefTable::new(SourceKind::Hld, "synthetic".to_string(), rows)
}

fn setup_ssa_table() -> RefTable {
    let mut rows = Vec::new();
    for year in 1900..=2100 {
        for age in 0..=119 {
            rows.push(RefRow {
                age,
                year,
                sex: None,
                country: None,
                life_expectancy: LifeExpectancy::BySex {
                    male: (119 - age) as f64 * 0.6,
                    female: (119 - age) as f64 * 0.65,
                },
            });
        }
    }
    RefTable::new(SourceKind::Ssa, "synthetic".to_string(), rows)
}

fn bench_single_lookup(c: &mut Criterion) {
    let hld = setup_hld_table();
    let ssa = setup_ssa_table();
    let hld_spec = MatchSpec::hld();
    let ssa_spec = MatchSpec::ssa();

    let exact = QueryRecord::builder()
        .country("SWE")
        .sex("F")
        .age(47.3)
        .year(1963.0)
        .build();
    c.bench_function("hld_lookup_exact_country", |b| {
        b.iter(|| Matcher::new(&hld_spec, Some(&hld)).lookup(&exact))
    });

    // Falls through to the substring scan
    let partial = QueryRecord::builder()
        .country("DEU")
        .sex("M")
        .age(30.0)
        .year(1990.0)
        .build();
    c.bench_function("hld_lookup_substring_country", |b| {
        b.iter(|| Matcher::new(&hld_spec, Some(&hld)).lookup(&partial))
    });

    let national = QueryRecord::builder().sex("M").age(65.0).year(2031.0).build();
    c.bench_function("ssa_lookup_single", |b| {
        b.iter(|| Matcher::new(&ssa_spec, Some(&ssa)).lookup(&national))
    });
}

fn bench_bulk_enrichment(c: &mut Criterion) {
    let loader = RefTableLoader::preloaded(setup_hld_table());

    let n = 500;
    let country_vec: Vec<&str> = (0..n).map(|i| COUNTRIES[i % COUNTRIES.len()]).collect();
    let age_vec: Vec<i64> = (0..n).map(|i| (i % 90) as i64).collect();
    let sex_vec: Vec<&str> = (0..n).map(|i| if i % 2 == 0 { "M" } else { "F" }).collect();
    let year_vec: Vec<i64> = (0..n).map(|i| 1900 + (i % 120) as i64).collect();
    let people = df! {
        "country" => country_vec,
        "age" => age_vec,
        "sex" => sex_vec,
        "year" => year_vec,
    }
    .unwrap();

    c.bench_function("hld_enrich_500_rows", |b| {
        b.iter(|| lost_years_hld().df(&people).loader(&loader).call().unwrap())
    });
}

criterion_group!(benches, bench_single_lookup, bench_bulk_enrichment);
criterion_main!(benches);
