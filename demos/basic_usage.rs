//! # Lost Years Basic Usage Example
//!
//! This example demonstrates enriching a small table of people with life
//! expectancy from each reference source.
//!
//! Run with `RUST_LOG=debug cargo run --example basic_usage` to see the
//! loader and matcher logs.

use env_logger::{Builder, Env};
use lost_years::prelude::*;
use polars::prelude::*;

fn main() -> LostYearsResult<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    println!("Lost Years Basic Usage Example");
    println!("==============================");
    println!();

    let people = df! {
        "name" => ["Ana", "Ben", "Chloe", "Dev"],
        "country" => ["USA", "SWE", "CAN", "DEU"],
        "age" => [34.5, 61.0, 8.0, 45.0],
        "sex" => ["F", "male", "f", "M"],
        "year" => [2019, 1990, 2015, 2005],
    }?;
    println!("Input:\n{people}");

    // An injected SSA table
    println!("SSA (preloaded table)...");
    let ssa_table = refdf!(SourceKind::Ssa;
        "age" => [0, 30, 35, 60, 65],
        "year" => [2020, 2020, 2020, 2020, 2020],
        "male_life_expectancy" => [74.1, 46.5, 42.0, 21.4, 17.9],
        "female_life_expectancy" => [79.8, 51.2, 46.6, 24.5, 20.6],
    )?;
    let ssa_loader = RefTableLoader::preloaded(ssa_table);
    let out = lost_years_ssa().df(&people).loader(&ssa_loader).call()?;
    println!("{out}");

    // Resource files under $LOST_YEARS_DATA_DIR or data/; nulls when absent
    println!("WHO (bundled resource)...");
    let out = lost_years_who().df(&people).call()?;
    println!("{out}");

    // Any resource path, with renamed query columns
    println!("HLD (custom resource and column names)...");
    let mut renamed = people.clone();
    renamed.rename("country", "nation".into())?;
    let config = DataSourceConfig::builder()
        .source(SourceKind::Hld)
        .path(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/hld_sample.csv"))
        .build();
    let hld_loader = RefTableLoader::new(config);
    let cols = ColumnConfig::builder().country("nation").build();
    let out = lost_years_hld()
        .df(&renamed)
        .cols(cols)
        .loader(&hld_loader)
        .call()?;
    println!("{out}");

    Ok(())
}
