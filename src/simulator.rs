// 🔁 Mutation Simulator - weighted random change workload over the store
//
// One iteration per requested operation: draw a kind from the normalized
// weight table, synthesize or sample the rows it needs, apply it through the
// store gateway, and log the outcome. A missing parent or vanished row is a
// reported failure, never a crash; `stop_on_error` turns the first failure
// into an early stop. Later operations may depend on rows earlier ones
// created, so the loop is strictly sequential.

use anyhow::{bail, ensure, Result};
use chrono::NaiveDate;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SimulatorConfig;
use crate::generators::{account, card, customer, fraud, loan, login, transaction};
use crate::model::TableKind;
use crate::store::StoreGateway;
use crate::vocab;

/// How many candidate ids one sampling round pulls from the store.
const SAMPLE_WINDOW: usize = 100;

// ============================================================================
// OPERATIONS
// ============================================================================

/// The fixed set of mutating operations the simulator can replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    InsertCustomer,
    UpdateCustomer,
    InsertAccount,
    UpdateAccount,
    InsertTransaction,
    UpdateTransaction,
    InsertCard,
    UpdateCard,
    InsertLoan,
    UpdateLoan,
    InsertFraudAlert,
    InsertLogin,
}

impl OperationKind {
    pub const ALL: [OperationKind; 12] = [
        OperationKind::InsertCustomer,
        OperationKind::UpdateCustomer,
        OperationKind::InsertAccount,
        OperationKind::UpdateAccount,
        OperationKind::InsertTransaction,
        OperationKind::UpdateTransaction,
        OperationKind::InsertCard,
        OperationKind::UpdateCard,
        OperationKind::InsertLoan,
        OperationKind::UpdateLoan,
        OperationKind::InsertFraudAlert,
        OperationKind::InsertLogin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::InsertCustomer => "INSERT_CUSTOMER",
            OperationKind::UpdateCustomer => "UPDATE_CUSTOMER",
            OperationKind::InsertAccount => "INSERT_ACCOUNT",
            OperationKind::UpdateAccount => "UPDATE_ACCOUNT",
            OperationKind::InsertTransaction => "INSERT_TRANSACTION",
            OperationKind::UpdateTransaction => "UPDATE_TRANSACTION",
            OperationKind::InsertCard => "INSERT_CARD",
            OperationKind::UpdateCard => "UPDATE_CARD",
            OperationKind::InsertLoan => "INSERT_LOAN",
            OperationKind::UpdateLoan => "UPDATE_LOAN",
            OperationKind::InsertFraudAlert => "INSERT_FRAUD_ALERT",
            OperationKind::InsertLogin => "INSERT_LOGIN",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one applied operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRecord {
    pub op_id: Uuid,
    pub kind: OperationKind,
    pub success: bool,
    /// Id of the row inserted or updated, when one was reached.
    pub target_id: Option<String>,
    pub detail: String,
}

/// Final tally plus the full operation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub requested: usize,
    pub executed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub stopped_early: bool,
    pub log: Vec<OperationRecord>,
}

impl SimulationReport {
    pub fn print_summary(&self) {
        println!("{}", "=".repeat(70));
        println!("OPERATIONS COMPLETE");
        println!("{}", "=".repeat(70));
        println!("Total Executed: {}", self.executed);
        println!("Successful: {}", self.succeeded);
        println!("Failed: {}", self.failed);
        if self.stopped_early {
            println!("Stopped early after the first failure (stop_on_error)");
        }
        println!("{}", "=".repeat(70));
    }
}

// ============================================================================
// SIMULATOR
// ============================================================================

pub struct MutationSimulator<'a, S: StoreGateway> {
    store: &'a S,
    config: &'a SimulatorConfig,
    rng: ChaCha8Rng,
    today: NaiveDate,
}

impl<'a, S: StoreGateway> MutationSimulator<'a, S> {
    pub fn new(store: &'a S, config: &'a SimulatorConfig, today: NaiveDate) -> Result<Self> {
        config.validate()?;
        Ok(MutationSimulator {
            store,
            config,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            today,
        })
    }

    /// Run the configured number of operations and return the report.
    pub fn run(&mut self) -> Result<SimulationReport> {
        let weights = self.config.operation_weights.pairs();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();

        let mut report = SimulationReport {
            requested: self.config.operations,
            executed: 0,
            succeeded: 0,
            failed: 0,
            stopped_early: false,
            log: Vec::with_capacity(self.config.operations),
        };

        println!("{}", "=".repeat(70));
        println!("SIMULATING {} OPERATIONS", self.config.operations);
        println!("{}", "=".repeat(70));

        for index in 0..self.config.operations {
            let kind = self.draw_kind(&weights, total);
            let outcome = self.apply(kind);
            report.executed += 1;

            match outcome {
                Ok((target_id, detail)) => {
                    println!("[{}/{}] {kind}: {detail}", index + 1, self.config.operations);
                    report.succeeded += 1;
                    report.log.push(OperationRecord {
                        op_id: Uuid::new_v4(),
                        kind,
                        success: true,
                        target_id,
                        detail,
                    });
                }
                Err(error) => {
                    let detail = format!("{error:#}");
                    println!(
                        "[{}/{}] {kind} failed: {detail}",
                        index + 1,
                        self.config.operations
                    );
                    report.failed += 1;
                    report.log.push(OperationRecord {
                        op_id: Uuid::new_v4(),
                        kind,
                        success: false,
                        target_id: None,
                        detail,
                    });
                    if self.config.stop_on_error {
                        report.stopped_early = true;
                        break;
                    }
                }
            }
        }

        Ok(report)
    }

    fn draw_kind(&mut self, weights: &[(OperationKind, f64)], total: f64) -> OperationKind {
        let mut draw = self.rng.gen::<f64>() * total;
        for (kind, weight) in weights {
            if draw < *weight {
                return *kind;
            }
            draw -= *weight;
        }
        weights[weights.len() - 1].0
    }

    /// Sample one existing row id of the given table, or fail the operation.
    fn sample_row(&mut self, table: TableKind) -> Result<String> {
        let ids = self.store.sample_ids(table, SAMPLE_WINDOW)?;
        ensure!(!ids.is_empty(), "no {table} rows available");
        Ok(ids[self.rng.gen_range(0..ids.len())].clone())
    }

    fn apply(&mut self, kind: OperationKind) -> Result<(Option<String>, String)> {
        match kind {
            OperationKind::InsertCustomer => {
                let new_customer = customer::synthesize(&mut self.rng, self.today);
                self.store.insert_customer(&new_customer)?;
                let id = new_customer.customer_id;
                Ok((Some(id.clone()), format!("inserted customer {id}")))
            }
            OperationKind::UpdateCustomer => {
                let customer_id = self.sample_row(TableKind::Customers)?;
                let phone = customer::build_phone(&mut self.rng);
                let email = format!(
                    "{}.{}@email.com",
                    crate::generators::pick(&mut self.rng, vocab::FIRST_NAMES).to_lowercase(),
                    self.rng.gen_range(1000..=9999)
                );
                if !self.store.update_customer_contact(&customer_id, &phone, &email)? {
                    bail!("customer {customer_id} disappeared before update");
                }
                Ok((
                    Some(customer_id.clone()),
                    format!("updated contact details of customer {customer_id}"),
                ))
            }
            OperationKind::InsertAccount => {
                let customer_id = self.sample_row(TableKind::Customers)?;
                let opened_base = (self.today - chrono::Duration::days(30))
                    .and_hms_opt(0, 0, 0)
                    .unwrap_or_default();
                let new_account = account::synthesize(&mut self.rng, &customer_id, opened_base);
                self.store.insert_account(&new_account)?;
                let id = new_account.account_id;
                Ok((
                    Some(id.clone()),
                    format!("inserted account {id} for customer {customer_id}"),
                ))
            }
            OperationKind::UpdateAccount => {
                let account_id = self.sample_row(TableKind::Accounts)?;
                let delta: f64 = (self.rng.gen_range(-5_000.0_f64..=5_000.0_f64) * 100.0).round() / 100.0;
                if !self.store.adjust_account_balance(&account_id, delta)? {
                    bail!("account {account_id} disappeared before update");
                }
                Ok((
                    Some(account_id.clone()),
                    format!("adjusted balance of account {account_id} by {delta:.2}"),
                ))
            }
            OperationKind::InsertTransaction => {
                let account_id = self.sample_row(TableKind::Accounts)?;
                let new_transaction =
                    transaction::synthesize(&mut self.rng, self.today, &account_id);
                self.store.insert_transaction(&new_transaction)?;
                let id = new_transaction.transaction_id;
                Ok((
                    Some(id.clone()),
                    format!("inserted transaction {id} on account {account_id}"),
                ))
            }
            OperationKind::UpdateTransaction => {
                let transaction_id = self.sample_row(TableKind::Transactions)?;
                let status = crate::generators::pick(&mut self.rng, vocab::TRANSACTION_STATUS);
                if !self.store.set_transaction_status(&transaction_id, status)? {
                    bail!("transaction {transaction_id} disappeared before update");
                }
                Ok((
                    Some(transaction_id.clone()),
                    format!("moved transaction {transaction_id} to status {status}"),
                ))
            }
            OperationKind::InsertCard => {
                let account_id = self.sample_row(TableKind::Accounts)?;
                let Some(customer_id) = self.store.account_owner(&account_id)? else {
                    bail!("account {account_id} has no owning customer");
                };
                let new_card =
                    card::synthesize(&mut self.rng, self.today, &customer_id, &account_id);
                self.store.insert_card(&new_card)?;
                let id = new_card.card_id;
                Ok((
                    Some(id.clone()),
                    format!("inserted card {id} on account {account_id}"),
                ))
            }
            OperationKind::UpdateCard => {
                let card_id = self.sample_row(TableKind::Cards)?;
                let status = crate::generators::pick(&mut self.rng, vocab::CARD_STATUS);
                if !self.store.set_card_status(&card_id, status)? {
                    bail!("card {card_id} disappeared before update");
                }
                Ok((
                    Some(card_id.clone()),
                    format!("moved card {card_id} to status {status}"),
                ))
            }
            OperationKind::InsertLoan => {
                let customer_id = self.sample_row(TableKind::Customers)?;
                let Some(account_id) = self.store.account_for_customer(&customer_id)? else {
                    bail!("customer {customer_id} has no account to attach a loan to");
                };
                let new_loan =
                    loan::synthesize(&mut self.rng, self.today, &customer_id, &account_id);
                self.store.insert_loan(&new_loan)?;
                let id = new_loan.loan_id;
                Ok((
                    Some(id.clone()),
                    format!("inserted loan {id} for customer {customer_id}"),
                ))
            }
            OperationKind::UpdateLoan => {
                let loan_id = self.sample_row(TableKind::Loans)?;
                let status = crate::generators::pick(&mut self.rng, vocab::LOAN_STATUS);
                if !self.store.set_loan_status(&loan_id, status)? {
                    bail!("loan {loan_id} disappeared before update");
                }
                Ok((
                    Some(loan_id.clone()),
                    format!("moved loan {loan_id} to status {status}"),
                ))
            }
            OperationKind::InsertFraudAlert => {
                let Some((transaction_id, account_id, amount)) =
                    self.store.completed_transaction()?
                else {
                    bail!("no completed transactions to raise an alert on");
                };
                let Some(customer_id) = self.store.account_owner(&account_id)? else {
                    bail!("account {account_id} has no owning customer");
                };
                let new_alert = fraud::synthesize(
                    &mut self.rng,
                    self.today,
                    &transaction_id,
                    &account_id,
                    &customer_id,
                    amount,
                );
                self.store.insert_fraud_alert(&new_alert)?;
                let id = new_alert.alert_id;
                Ok((
                    Some(id.clone()),
                    format!("inserted fraud alert {id} on transaction {transaction_id}"),
                ))
            }
            OperationKind::InsertLogin => {
                let customer_id = self.sample_row(TableKind::Customers)?;
                let new_login = login::synthesize(&mut self.rng, self.today, &customer_id);
                self.store.insert_user_login(&new_login)?;
                let id = new_login.login_id;
                Ok((
                    Some(id.clone()),
                    format!("inserted login {id} for customer {customer_id}"),
                ))
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BadDataRates, FanOut, GeneratorConfig, OperationWeights};
    use crate::orchestrator::generate_dataset;
    use crate::store::SqliteStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn loaded_store() -> SqliteStore {
        let config = GeneratorConfig {
            seed: 5,
            anchor_date: Some(today()),
            num_customers: 25,
            num_branches: 3,
            num_employees: 10,
            num_merchants: 5,
            exchange_rate_days: 5,
            accounts_per_customer: FanOut::new(1, 2),
            cards_per_customer: FanOut::new(1, 2),
            transactions_per_account: FanOut::new(3, 6),
            loans_per_customer: FanOut::new(1, 1),
            audit_logs_per_user: FanOut::new(1, 2),
            user_logins_per_customer: FanOut::new(1, 3),
            fraud_alerts_per_transaction: 0.1,
            num_investment_accounts: Some(5),
            bad_data_rates: BadDataRates::clean(),
            ..GeneratorConfig::default()
        };
        let dataset = generate_dataset(&config).unwrap().dataset;
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.import_dataset(&dataset).unwrap();
        store
    }

    #[test]
    fn test_exclusive_weight_runs_exactly_that_operation() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = SimulatorConfig {
            seed: 1,
            operations: 50,
            stop_on_error: false,
            operation_weights: OperationWeights::only(OperationKind::InsertCustomer),
        };

        let report = MutationSimulator::new(&store, &config, today())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(report.executed, 50);
        assert_eq!(report.log.len(), 50);
        assert!(report
            .log
            .iter()
            .all(|record| record.kind == OperationKind::InsertCustomer));
        // Inserting a customer needs no parent, so even an empty store works.
        assert_eq!(report.succeeded, 50);
        assert_eq!(store.count(TableKind::Customers).unwrap(), 50);
    }

    #[test]
    fn test_missing_parents_fail_non_fatally() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = SimulatorConfig {
            seed: 2,
            operations: 20,
            stop_on_error: false,
            operation_weights: OperationWeights::only(OperationKind::InsertAccount),
        };

        let report = MutationSimulator::new(&store, &config, today())
            .unwrap()
            .run()
            .unwrap();

        // Every attempt fails (no customers), but the run still completes.
        assert_eq!(report.executed, 20);
        assert_eq!(report.failed, 20);
        assert_eq!(report.succeeded, 0);
        assert!(!report.stopped_early);
        for record in &report.log {
            assert!(!record.success);
            assert!(record.detail.contains("no customers rows available"));
        }
    }

    #[test]
    fn test_stop_on_error_halts_at_first_failure() {
        let store = SqliteStore::open_in_memory().unwrap();
        let config = SimulatorConfig {
            seed: 3,
            operations: 20,
            stop_on_error: true,
            operation_weights: OperationWeights::only(OperationKind::UpdateLoan),
        };

        let report = MutationSimulator::new(&store, &config, today())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(report.executed, 1);
        assert_eq!(report.failed, 1);
        assert!(report.stopped_early);
    }

    #[test]
    fn test_mixed_workload_against_loaded_store_succeeds() {
        let store = loaded_store();
        let config = SimulatorConfig {
            seed: 4,
            operations: 100,
            stop_on_error: false,
            operation_weights: OperationWeights::default(),
        };

        let before = store.count(TableKind::Customers).unwrap();
        let report = MutationSimulator::new(&store, &config, today())
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(report.executed, 100);
        assert_eq!(report.failed, 0, "failures: {:?}", report.log);
        assert!(store.count(TableKind::Customers).unwrap() >= before);
        for record in &report.log {
            assert!(record.target_id.is_some());
        }
    }

    #[test]
    fn test_weighted_draw_only_picks_positive_weights() {
        let store = loaded_store();
        let mut weights = OperationWeights::only(OperationKind::InsertLogin);
        weights.update_account = 1.0;
        let config = SimulatorConfig {
            seed: 6,
            operations: 60,
            stop_on_error: false,
            operation_weights: weights,
        };

        let report = MutationSimulator::new(&store, &config, today())
            .unwrap()
            .run()
            .unwrap();

        for record in &report.log {
            assert!(matches!(
                record.kind,
                OperationKind::InsertLogin | OperationKind::UpdateAccount
            ));
        }
    }
}
