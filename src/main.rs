use std::env;
use std::path::Path;

use anyhow::Result;
use chrono::Utc;

use bankforge::export::{export_csv, export_defect_report, export_sql};
use bankforge::{
    generate_dataset, AppConfig, MutationSimulator, SqliteStore, TableKind,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("generate");
    let config = match args.get(2) {
        Some(path) => AppConfig::load(Path::new(path))?,
        None => AppConfig::default(),
    };

    match mode {
        "generate" => run_generate(&config),
        "simulate" => run_simulate(&config),
        other => {
            eprintln!("❌ Unknown mode: {other}");
            eprintln!("   Usage: bankforge generate [config.json]");
            eprintln!("          bankforge simulate [config.json]");
            std::process::exit(1);
        }
    }
}

fn run_generate(config: &AppConfig) -> Result<()> {
    println!("{}", "=".repeat(80));
    println!("🏦 BANKING DUMMY DATA GENERATOR WITH BAD DATA");
    println!("{}", "=".repeat(80));

    let output = generate_dataset(&config.generator)?;
    output.summary.print_summary();

    let output_dir = Path::new(&config.generator.output_directory);
    if config.generator.output_formats.iter().any(|f| f == "csv") {
        println!("\n📄 Exporting CSV files...");
        export_csv(&output.dataset, output_dir)?;
    }
    if config.generator.output_formats.iter().any(|f| f == "sql") {
        println!("\n🗒️  Generating SQL files...");
        export_sql(&output.dataset, output_dir)?;
    }
    export_defect_report(&output.report, output_dir)?;

    // Load the persisted copy the simulator will mutate later.
    let db_path = config.database_path();
    println!("\n💾 Importing dataset into {db_path}...");
    let mut store = SqliteStore::open(Path::new(&db_path))?;
    let imported = store.import_dataset(&output.dataset)?;
    println!("✓ Imported {imported} rows");

    println!("\n✅ Generation complete");
    Ok(())
}

fn run_simulate(config: &AppConfig) -> Result<()> {
    let db_path = config.database_path();
    let store = SqliteStore::open(Path::new(&db_path))?;

    // A fresh database has nothing to mutate; generate and import first.
    if store.count(TableKind::Customers)? == 0 {
        println!("📦 Store at {db_path} is empty, generating a dataset first...");
        drop(store);
        run_generate(config)?;
        return run_simulate(config);
    }

    let today = Utc::now().date_naive();
    let mut simulator = MutationSimulator::new(&store, &config.simulator, today)?;
    let report = simulator.run()?;
    report.print_summary();

    Ok(())
}
