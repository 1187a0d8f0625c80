// 🎼 Generation Orchestrator - runs every generator in dependency order
//
// Root tables first (customers, branches, merchants, exchange rates), then
// each dependent table with the finished parent pools threaded in. Any
// structural failure aborts the whole pass; a partial dataset never reaches
// a serializer. Each table draws from its own RNG stream derived from the
// run seed, so adding records to one table never shifts another table's
// output.

use std::time::Instant;

use anyhow::{ensure, Result};
use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::GeneratorConfig;
use crate::corruption::{DefectInjector, DefectLedger, DefectReport};
use crate::generators::account::AccountGenerator;
use crate::generators::audit::AuditLogGenerator;
use crate::generators::branch::BranchGenerator;
use crate::generators::card::CardGenerator;
use crate::generators::customer::CustomerGenerator;
use crate::generators::employee::EmployeeGenerator;
use crate::generators::exchange::ExchangeRateGenerator;
use crate::generators::fraud::FraudAlertGenerator;
use crate::generators::investment::InvestmentAccountGenerator;
use crate::generators::loan::LoanGenerator;
use crate::generators::login::UserLoginGenerator;
use crate::generators::merchant::MerchantGenerator;
use crate::generators::transaction::TransactionGenerator;
use crate::model::{Dataset, TableKind};

// ============================================================================
// SUMMARY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub table: String,
    pub total_records: usize,
    pub bad_records: usize,
}

/// Per-table record counts plus elapsed wall time for the pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub tables: Vec<TableSummary>,
    pub elapsed_ms: u128,
}

impl GenerationSummary {
    pub fn total_records(&self) -> usize {
        self.tables.iter().map(|t| t.total_records).sum()
    }

    pub fn total_bad_records(&self) -> usize {
        self.tables.iter().map(|t| t.bad_records).sum()
    }

    /// Print the statistics block shown after a generation run.
    pub fn print_summary(&self) {
        println!("{}", "=".repeat(60));
        println!("BAD DATA STATISTICS");
        println!("{}", "=".repeat(60));

        for table in &self.tables {
            let percentage = if table.total_records > 0 {
                table.bad_records as f64 / table.total_records as f64 * 100.0
            } else {
                0.0
            };
            println!(
                "{:<20} {:>9} records | {:>7} bad ({:6.2}%)",
                table.table, table.total_records, table.bad_records, percentage
            );
        }

        let total = self.total_records();
        let bad = self.total_bad_records();
        let percentage = if total > 0 {
            bad as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        println!("{}", "-".repeat(60));
        println!(
            "{:<20} {:>9} records | {:>7} bad ({:6.2}%)",
            "TOTAL", total, bad, percentage
        );
        println!("Elapsed: {:.2}s", self.elapsed_ms as f64 / 1000.0);
        println!("{}", "=".repeat(60));
    }
}

/// Everything one generation pass hands to the outside world.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    pub dataset: Dataset,
    pub report: DefectReport,
    pub summary: GenerationSummary,
}

// ============================================================================
// RNG STREAMS
// ============================================================================

/// Independent ChaCha8 stream for one table, derived from the run seed.
pub(crate) fn table_rng(seed: u64, table: TableKind) -> ChaCha8Rng {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(table.as_str().as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    ChaCha8Rng::seed_from_u64(u64::from_le_bytes(bytes))
}

fn require_parents(table: TableKind, parent: TableKind, count: usize) -> Result<()> {
    ensure!(
        count > 0,
        "{table}: parent pool '{parent}' is empty, aborting generation"
    );
    Ok(())
}

// ============================================================================
// THE PASS
// ============================================================================

/// Run the full generation pass described by the configuration.
pub fn generate_dataset(config: &GeneratorConfig) -> Result<GenerationOutput> {
    config.validate()?;

    let start = Instant::now();
    let today = config.anchor();
    let rates = &config.bad_data_rates;
    let switches = &config.defect_classes;
    let mut ledger = DefectLedger::new();
    let mut dataset = Dataset::default();

    let injector_for = |rate: f64| DefectInjector::new(rate, switches);

    // Customers and their 1:1 detail rows.
    {
        let mut rng = table_rng(config.seed, TableKind::Customers);
        let mut customer_injector = injector_for(rates.customers);
        let mut detail_injector = injector_for(rates.customer_details);
        let (customers, details) = CustomerGenerator::new(config.num_customers, today).generate(
            &mut rng,
            &mut customer_injector,
            &mut detail_injector,
        );
        ledger.absorb(customer_injector.take_ledger());
        ledger.absorb(detail_injector.take_ledger());
        dataset.customers = customers;
        dataset.customer_details = details;
        announce(&dataset, TableKind::Customers);
        announce(&dataset, TableKind::CustomerDetails);
    }

    // Independent root tables.
    {
        let mut rng = table_rng(config.seed, TableKind::Branches);
        let mut injector = injector_for(rates.branches);
        dataset.branches =
            BranchGenerator::new(config.num_branches, today).generate(&mut rng, &mut injector);
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::Branches);
    }
    {
        let mut rng = table_rng(config.seed, TableKind::Merchants);
        let mut injector = injector_for(rates.merchants);
        dataset.merchants =
            MerchantGenerator::new(config.num_merchants, today).generate(&mut rng, &mut injector);
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::Merchants);
    }
    {
        let mut rng = table_rng(config.seed, TableKind::ExchangeRates);
        let mut injector = injector_for(rates.exchange_rates);
        dataset.exchange_rates = ExchangeRateGenerator::new(config.exchange_rate_days, today)
            .generate(&mut rng, &mut injector);
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::ExchangeRates);
    }

    // Accounts fan out from customers.
    {
        require_parents(TableKind::Accounts, TableKind::Customers, dataset.customers.len())?;
        let mut rng = table_rng(config.seed, TableKind::Accounts);
        let mut injector = injector_for(rates.accounts);
        dataset.accounts = AccountGenerator::new(config.accounts_per_customer, today).generate(
            &dataset.customers,
            &mut rng,
            &mut injector,
        );
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::Accounts);
    }

    // Employees need branches for the manager hierarchy.
    {
        require_parents(TableKind::Employees, TableKind::Branches, dataset.branches.len())?;
        let mut rng = table_rng(config.seed, TableKind::Employees);
        let mut injector = injector_for(rates.employees);
        dataset.employees = EmployeeGenerator::new(config.num_employees, today).generate(
            &dataset.branches,
            &mut rng,
            &mut injector,
        );
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::Employees);
    }

    // Cards pick among each customer's accounts.
    {
        require_parents(TableKind::Cards, TableKind::Accounts, dataset.accounts.len())?;
        let mut rng = table_rng(config.seed, TableKind::Cards);
        let mut injector = injector_for(rates.cards);
        dataset.cards = CardGenerator::new(config.cards_per_customer, today).generate(
            &dataset.customers,
            &dataset.accounts,
            &mut rng,
            &mut injector,
        );
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::Cards);
    }

    // Transactions per account, optionally through a card.
    {
        require_parents(TableKind::Transactions, TableKind::Accounts, dataset.accounts.len())?;
        let mut rng = table_rng(config.seed, TableKind::Transactions);
        let mut injector = injector_for(rates.transactions);
        dataset.transactions = TransactionGenerator::new(config.transactions_per_account, today)
            .generate(&dataset.accounts, &dataset.cards, &mut rng, &mut injector);
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::Transactions);
    }

    // Loans plus their payment schedules.
    {
        require_parents(TableKind::Loans, TableKind::Accounts, dataset.accounts.len())?;
        let mut rng = table_rng(config.seed, TableKind::Loans);
        let mut loan_injector = injector_for(rates.loans);
        let mut payment_injector = injector_for(rates.loan_payments);
        let (loans, payments) = LoanGenerator::new(config.loans_per_customer, today).generate(
            &dataset.customers,
            &dataset.accounts,
            &mut rng,
            &mut loan_injector,
            &mut payment_injector,
        );
        ledger.absorb(loan_injector.take_ledger());
        ledger.absorb(payment_injector.take_ledger());
        dataset.loans = loans;
        dataset.loan_payments = payments;
        announce(&dataset, TableKind::Loans);
        announce(&dataset, TableKind::LoanPayments);
    }

    // Audit logs span customers and employees.
    {
        let actors: Vec<String> = dataset
            .customers
            .iter()
            .map(|c| c.customer_id.clone())
            .chain(dataset.employees.iter().map(|e| e.employee_id.clone()))
            .collect();
        require_parents(TableKind::AuditLogs, TableKind::Customers, actors.len())?;
        let mut rng = table_rng(config.seed, TableKind::AuditLogs);
        let mut injector = injector_for(rates.audit_logs);
        dataset.audit_logs = AuditLogGenerator::new(config.audit_logs_per_user, today).generate(
            &actors,
            &mut rng,
            &mut injector,
        );
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::AuditLogs);
    }

    // Investment accounts ride on existing deposit accounts.
    {
        require_parents(
            TableKind::InvestmentAccounts,
            TableKind::Accounts,
            dataset.accounts.len(),
        )?;
        let mut rng = table_rng(config.seed, TableKind::InvestmentAccounts);
        let mut injector = injector_for(rates.investment_accounts);
        dataset.investment_accounts =
            InvestmentAccountGenerator::new(config.num_investment_accounts, today).generate(
                &dataset.customers,
                &dataset.accounts,
                &mut rng,
                &mut injector,
            );
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::InvestmentAccounts);
    }

    // Fraud alerts sample the transaction stream.
    {
        require_parents(
            TableKind::FraudAlerts,
            TableKind::Transactions,
            dataset.transactions.len(),
        )?;
        let mut rng = table_rng(config.seed, TableKind::FraudAlerts);
        let mut injector = injector_for(rates.fraud_alerts);
        dataset.fraud_alerts = FraudAlertGenerator::new(config.fraud_alerts_per_transaction, today)
            .generate(&dataset.transactions, &dataset.accounts, &mut rng, &mut injector);
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::FraudAlerts);
    }

    // Login history per customer.
    {
        require_parents(TableKind::UserLogins, TableKind::Customers, dataset.customers.len())?;
        let mut rng = table_rng(config.seed, TableKind::UserLogins);
        let mut injector = injector_for(rates.user_logins);
        dataset.user_logins = UserLoginGenerator::new(config.user_logins_per_customer, today)
            .generate(&dataset.customers, &mut rng, &mut injector);
        ledger.absorb(injector.take_ledger());
        announce(&dataset, TableKind::UserLogins);
    }

    let elapsed_ms = start.elapsed().as_millis();
    let generated_at = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    let report = DefectReport::build(&dataset, &ledger, &generated_at);

    let tables = TableKind::ALL
        .iter()
        .map(|kind| TableSummary {
            table: kind.as_str().to_string(),
            total_records: dataset.len_of(*kind),
            bad_records: dataset.bad_count_of(*kind),
        })
        .collect();

    Ok(GenerationOutput {
        dataset,
        report,
        summary: GenerationSummary { tables, elapsed_ms },
    })
}

fn announce(dataset: &Dataset, kind: TableKind) {
    println!(
        "Generated {} {} ({} with bad data)",
        dataset.len_of(kind),
        kind,
        dataset.bad_count_of(kind)
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BadDataRates, DefectClassSwitches, FanOut};
    use crate::corruption::DefectClass;
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            seed: 7,
            anchor_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            num_customers: 40,
            num_branches: 5,
            num_employees: 20,
            num_merchants: 15,
            exchange_rate_days: 10,
            accounts_per_customer: FanOut::new(1, 3),
            cards_per_customer: FanOut::new(0, 2),
            transactions_per_account: FanOut::new(2, 6),
            loans_per_customer: FanOut::new(0, 1),
            audit_logs_per_user: FanOut::new(1, 3),
            user_logins_per_customer: FanOut::new(2, 5),
            fraud_alerts_per_transaction: 0.05,
            num_investment_accounts: Some(10),
            bad_data_rates: BadDataRates::clean(),
            defect_classes: DefectClassSwitches::default(),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_clean_run_has_no_bad_records_and_resolving_keys() {
        let output = generate_dataset(&small_config()).unwrap();
        let dataset = &output.dataset;

        for kind in TableKind::ALL {
            assert_eq!(dataset.bad_count_of(kind), 0, "{kind} has bad records");
        }

        let customers: HashSet<&str> =
            dataset.customers.iter().map(|c| c.customer_id.as_str()).collect();
        let accounts: HashSet<&str> =
            dataset.accounts.iter().map(|a| a.account_id.as_str()).collect();
        let branches: HashSet<&str> =
            dataset.branches.iter().map(|b| b.branch_id.as_str()).collect();
        let transactions: HashSet<&str> = dataset
            .transactions
            .iter()
            .map(|t| t.transaction_id.as_str())
            .collect();
        let loans: HashSet<&str> = dataset.loans.iter().map(|l| l.loan_id.as_str()).collect();

        for detail in &dataset.customer_details {
            assert!(customers.contains(detail.customer_id.as_str()));
        }
        for account in &dataset.accounts {
            assert!(customers.contains(account.customer_id.as_str()));
        }
        for employee in &dataset.employees {
            assert!(branches.contains(employee.branch_id.as_str()));
        }
        for card in &dataset.cards {
            assert!(customers.contains(card.customer_id.as_str()));
            assert!(accounts.contains(card.account_id.as_str()));
        }
        for transaction in &dataset.transactions {
            assert!(accounts.contains(transaction.account_id.as_str()));
        }
        for loan in &dataset.loans {
            assert!(customers.contains(loan.customer_id.as_str()));
            assert!(accounts.contains(loan.account_id.as_str()));
        }
        for payment in &dataset.loan_payments {
            assert!(loans.contains(payment.loan_id.as_str()));
        }
        for alert in &dataset.fraud_alerts {
            assert!(transactions.contains(alert.transaction_id.as_str()));
            assert!(accounts.contains(alert.account_id.as_str()));
            assert!(customers.contains(alert.customer_id.as_str()));
        }
        for login in &dataset.user_logins {
            assert!(customers.contains(login.customer_id.as_str()));
        }
        for investment in &dataset.investment_accounts {
            assert!(customers.contains(investment.customer_id.as_str()));
            assert!(accounts.contains(investment.account_id.as_str()));
        }
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let config = small_config();
        let first = generate_dataset(&config).unwrap();
        let second = generate_dataset(&config).unwrap();

        let a = serde_json::to_string(&first.dataset).unwrap();
        let b = serde_json::to_string(&second.dataset).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_half_rate_missing_only_customers() {
        let mut config = small_config();
        config.num_customers = 100;
        config.bad_data_rates = BadDataRates::clean();
        config.bad_data_rates.customers = 0.5;
        config.defect_classes = DefectClassSwitches::only(DefectClass::MissingData);

        let output = generate_dataset(&config).unwrap();
        let bad = output.dataset.bad_count_of(TableKind::Customers);
        // Binomial(100, 0.5), four standard deviations.
        assert!((30..=70).contains(&bad), "bad customer count {bad}");

        for customer in &output.dataset.customers {
            if customer.is_bad_data {
                assert_eq!(customer.bad_data_type, Some(DefectClass::MissingData));
            }
        }

        let report_entry = &output.report.tables["customers"];
        assert_eq!(report_entry.bad_records, bad);
        assert_eq!(report_entry.bad_by_type.len(), 1);
        assert!(report_entry.bad_by_type.contains_key("missing_data"));
        assert!(!report_entry.examples.is_empty());
    }

    #[test]
    fn test_empty_parent_pool_aborts_with_table_name() {
        let mut config = small_config();
        config.accounts_per_customer = FanOut::new(0, 0);

        let err = generate_dataset(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("parent pool"), "unexpected error: {message}");
        assert!(message.contains("accounts"), "unexpected error: {message}");
    }

    #[test]
    fn test_summary_counts_match_dataset() {
        let output = generate_dataset(&small_config()).unwrap();
        assert_eq!(
            output.summary.total_records(),
            output.dataset.total_records()
        );
        for table in &output.summary.tables {
            assert!(table.bad_records <= table.total_records);
        }
    }
}
