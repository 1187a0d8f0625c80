// 📤 Export - delimited files, SQL scripts, and the defect report
//
// The serialized view drops the corruption bookkeeping columns; the defect
// report is where that information lives. Column order is the sorted field
// order of the serialized records, identical across CSV and SQL.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::corruption::DefectReport;
use crate::model::{Dataset, TableKind};

const BOOKKEEPING_COLUMNS: [&str; 2] = ["is_bad_data", "bad_data_type"];

/// Write every non-empty table as `<table>.csv` in the output directory.
pub fn export_csv(dataset: &Dataset, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let mut written = Vec::new();
    for kind in TableKind::ALL {
        let rows = dataset.rows_for(kind);
        if rows.is_empty() {
            continue;
        }

        let columns = columns_of(&rows);
        let path = output_dir.join(format!("{kind}.csv"));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        writer.write_record(&columns)?;
        for row in &rows {
            let record: Vec<String> = columns
                .iter()
                .map(|column| csv_value(row.get(column.as_str())))
                .collect();
            writer.write_record(&record)?;
        }
        writer.flush()?;

        println!("Exported {} records to {}", rows.len(), path.display());
        written.push(path);
    }

    Ok(written)
}

/// Write every non-empty table as `<table>.sql`, one INSERT per record.
pub fn export_sql(dataset: &Dataset, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let sql_dir = output_dir.join("sql");
    fs::create_dir_all(&sql_dir)
        .with_context(|| format!("failed to create {}", sql_dir.display()))?;

    let mut written = Vec::new();
    for kind in TableKind::ALL {
        let rows = dataset.rows_for(kind);
        if rows.is_empty() {
            continue;
        }

        let columns = columns_of(&rows);
        let bad_count = dataset.bad_count_of(kind);
        let mut script = String::new();
        script.push_str(&format!("-- INSERT statements for {kind}\n"));
        script.push_str(&format!(
            "-- Total records: {}, flagged records: {} ({:.2}%)\n\n",
            rows.len(),
            bad_count,
            bad_count as f64 / rows.len() as f64 * 100.0
        ));

        let column_list = columns.join(", ");
        for row in &rows {
            let values: Vec<String> = columns
                .iter()
                .map(|column| sql_value(row.get(column.as_str())))
                .collect();
            script.push_str(&format!(
                "INSERT INTO {kind} ({column_list}) VALUES ({});\n",
                values.join(", ")
            ));
        }

        let path = sql_dir.join(format!("{kind}.sql"));
        fs::write(&path, script).with_context(|| format!("failed to write {}", path.display()))?;
        println!(
            "Generated SQL file {} with {} INSERT statements",
            path.display(),
            rows.len()
        );
        written.push(path);
    }

    Ok(written)
}

/// Write the aggregate defect report as pretty JSON.
pub fn export_defect_report(report: &DefectReport, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let path = output_dir.join("bad_data_report.json");
    let file = fs::File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)?;

    println!("Detailed bad data report saved to {}", path.display());
    Ok(path)
}

/// Serialized column names minus the bookkeeping pair, sorted.
fn columns_of(rows: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(map) = row {
            for key in map.keys() {
                if BOOKKEEPING_COLUMNS.contains(&key.as_str()) {
                    continue;
                }
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns.sort();
    columns
}

fn csv_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => other.to_string(),
    }
}

fn sql_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::Bool(flag)) => if *flag { "1" } else { "0" }.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) => format!("'{}'", text.replace('\'', "''")),
        Some(other) => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BadDataRates, FanOut, GeneratorConfig};
    use crate::orchestrator::generate_dataset;
    use chrono::NaiveDate;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bankforge_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn tiny_output() -> crate::orchestrator::GenerationOutput {
        let config = GeneratorConfig {
            seed: 9,
            anchor_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            num_customers: 5,
            num_branches: 2,
            num_employees: 4,
            num_merchants: 3,
            exchange_rate_days: 2,
            accounts_per_customer: FanOut::new(1, 1),
            cards_per_customer: FanOut::new(0, 1),
            transactions_per_account: FanOut::new(1, 2),
            loans_per_customer: FanOut::new(0, 1),
            audit_logs_per_user: FanOut::new(1, 1),
            user_logins_per_customer: FanOut::new(1, 1),
            fraud_alerts_per_transaction: 0.2,
            num_investment_accounts: Some(2),
            bad_data_rates: BadDataRates::clean(),
            ..GeneratorConfig::default()
        };
        generate_dataset(&config).unwrap()
    }

    #[test]
    fn test_csv_export_writes_headers_without_bookkeeping() {
        let output = tiny_output();
        let dir = scratch_dir("csv");
        let files = export_csv(&output.dataset, &dir).unwrap();
        assert!(!files.is_empty());

        let customers_csv = fs::read_to_string(dir.join("customers.csv")).unwrap();
        let header = customers_csv.lines().next().unwrap();
        assert!(header.contains("customer_id"));
        assert!(!header.contains("is_bad_data"));
        assert!(!header.contains("bad_data_type"));
        assert_eq!(
            customers_csv.lines().count(),
            output.dataset.customers.len() + 1
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_sql_export_escapes_quotes() {
        assert_eq!(
            sql_value(Some(&Value::String("O'Brien".to_string()))),
            "'O''Brien'"
        );
        assert_eq!(sql_value(Some(&Value::Bool(true))), "1");
        assert_eq!(sql_value(None), "NULL");
    }

    #[test]
    fn test_report_export_round_trips() {
        let output = tiny_output();
        let dir = scratch_dir("report");
        let path = export_defect_report(&output.report, &dir).unwrap();

        let raw = fs::read_to_string(path).unwrap();
        let parsed: DefectReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.tables.len(), output.report.tables.len());

        let _ = fs::remove_dir_all(&dir);
    }
}
