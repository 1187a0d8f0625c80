// ⚙️ Configuration - typed knobs for generation and simulation
//
// One explicit field per table and per switch, so a typo in a config file is
// a deserialization error instead of a silently ignored key. Validation runs
// before any generation starts; a bad rate or fan-out never produces a
// partial dataset.

use anyhow::{bail, ensure, Context, Result};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::corruption::DefectClass;
use crate::simulator::OperationKind;

// ============================================================================
// FAN-OUT RANGES
// ============================================================================

/// Inclusive min/max number of child entities per parent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FanOut {
    pub min: u32,
    pub max: u32,
}

impl FanOut {
    pub const fn new(min: u32, max: u32) -> Self {
        FanOut { min, max }
    }

    pub fn validate(&self, what: &str) -> Result<()> {
        ensure!(
            self.min <= self.max,
            "{what}: fan-out min {} exceeds max {}",
            self.min,
            self.max
        );
        Ok(())
    }

    /// Draw a count uniformly from the range.
    pub fn sample(&self, rng: &mut rand_chacha::ChaCha8Rng) -> u32 {
        use rand::Rng;
        rng.gen_range(self.min..=self.max)
    }
}

// ============================================================================
// BAD DATA RATES
// ============================================================================

/// Per-table corruption probability in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BadDataRates {
    pub customers: f64,
    pub customer_details: f64,
    pub accounts: f64,
    pub cards: f64,
    pub transactions: f64,
    pub branches: f64,
    pub employees: f64,
    pub merchants: f64,
    pub loans: f64,
    pub loan_payments: f64,
    pub audit_logs: f64,
    pub exchange_rates: f64,
    pub investment_accounts: f64,
    pub fraud_alerts: f64,
    pub user_logins: f64,
}

impl Default for BadDataRates {
    fn default() -> Self {
        BadDataRates {
            customers: 0.20,
            customer_details: 0.20,
            accounts: 0.15,
            cards: 0.25,
            transactions: 0.10,
            branches: 0.05,
            employees: 0.08,
            merchants: 0.12,
            loans: 0.15,
            loan_payments: 0.20,
            audit_logs: 0.05,
            exchange_rates: 0.03,
            investment_accounts: 0.10,
            fraud_alerts: 0.05,
            user_logins: 0.08,
        }
    }
}

impl BadDataRates {
    /// All rates zeroed; handy for clean datasets in tests.
    pub fn clean() -> Self {
        BadDataRates {
            customers: 0.0,
            customer_details: 0.0,
            accounts: 0.0,
            cards: 0.0,
            transactions: 0.0,
            branches: 0.0,
            employees: 0.0,
            merchants: 0.0,
            loans: 0.0,
            loan_payments: 0.0,
            audit_logs: 0.0,
            exchange_rates: 0.0,
            investment_accounts: 0.0,
            fraud_alerts: 0.0,
            user_logins: 0.0,
        }
    }

    fn named(&self) -> [(&'static str, f64); 15] {
        [
            ("customers", self.customers),
            ("customer_details", self.customer_details),
            ("accounts", self.accounts),
            ("cards", self.cards),
            ("transactions", self.transactions),
            ("branches", self.branches),
            ("employees", self.employees),
            ("merchants", self.merchants),
            ("loans", self.loans),
            ("loan_payments", self.loan_payments),
            ("audit_logs", self.audit_logs),
            ("exchange_rates", self.exchange_rates),
            ("investment_accounts", self.investment_accounts),
            ("fraud_alerts", self.fraud_alerts),
            ("user_logins", self.user_logins),
        ]
    }

    pub fn any_positive(&self) -> bool {
        self.named().iter().any(|(_, r)| *r > 0.0)
    }

    fn validate(&self) -> Result<()> {
        for (table, rate) in self.named() {
            ensure!(
                (0.0..=1.0).contains(&rate),
                "bad_data_rates.{table}: rate {rate} outside [0, 1]"
            );
        }
        Ok(())
    }
}

// ============================================================================
// DEFECT CLASS SWITCHES
// ============================================================================

/// Enables/disables individual defect classes. Disabling a class
/// redistributes its share over the remaining enabled classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefectClassSwitches {
    pub missing_data: bool,
    pub invalid_format: bool,
    pub out_of_range: bool,
    pub inconsistent_data: bool,
    pub malformed_data: bool,
}

impl Default for DefectClassSwitches {
    fn default() -> Self {
        DefectClassSwitches {
            missing_data: true,
            invalid_format: true,
            out_of_range: true,
            inconsistent_data: true,
            malformed_data: true,
        }
    }
}

impl DefectClassSwitches {
    /// Only the named class enabled.
    pub fn only(class: DefectClass) -> Self {
        DefectClassSwitches {
            missing_data: class == DefectClass::MissingData,
            invalid_format: class == DefectClass::InvalidFormat,
            out_of_range: class == DefectClass::OutOfRange,
            inconsistent_data: class == DefectClass::InconsistentData,
            malformed_data: class == DefectClass::MalformedData,
        }
    }

    pub fn enabled_classes(&self) -> Vec<DefectClass> {
        let mut enabled = Vec::new();
        if self.missing_data {
            enabled.push(DefectClass::MissingData);
        }
        if self.invalid_format {
            enabled.push(DefectClass::InvalidFormat);
        }
        if self.out_of_range {
            enabled.push(DefectClass::OutOfRange);
        }
        if self.inconsistent_data {
            enabled.push(DefectClass::InconsistentData);
        }
        if self.malformed_data {
            enabled.push(DefectClass::MalformedData);
        }
        enabled
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_classes().is_empty()
    }
}

// ============================================================================
// GENERATOR CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed for the run; each table derives its own RNG stream from it.
    pub seed: u64,
    /// Anchor for all "today" references; defaults to the current date.
    /// Fixing it together with the seed makes runs reproducible.
    pub anchor_date: Option<NaiveDate>,

    pub num_customers: usize,
    pub num_branches: usize,
    pub num_employees: usize,
    pub num_merchants: usize,
    pub exchange_rate_days: usize,

    pub accounts_per_customer: FanOut,
    pub cards_per_customer: FanOut,
    pub transactions_per_account: FanOut,
    pub loans_per_customer: FanOut,
    pub audit_logs_per_user: FanOut,
    pub user_logins_per_customer: FanOut,

    /// Fraction of transactions that receive a fraud alert.
    pub fraud_alerts_per_transaction: f64,
    /// Investment account count; None derives 30% of customers with accounts.
    pub num_investment_accounts: Option<usize>,

    pub bad_data_rates: BadDataRates,
    pub defect_classes: DefectClassSwitches,

    pub output_directory: String,
    /// Export formats to emit: "csv" and/or "sql".
    pub output_formats: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed: 42,
            anchor_date: None,
            num_customers: 1000,
            num_branches: 50,
            num_employees: 200,
            num_merchants: 500,
            exchange_rate_days: 365,
            accounts_per_customer: FanOut::new(1, 3),
            cards_per_customer: FanOut::new(0, 2),
            transactions_per_account: FanOut::new(5, 50),
            loans_per_customer: FanOut::new(0, 2),
            audit_logs_per_user: FanOut::new(5, 50),
            user_logins_per_customer: FanOut::new(8, 30),
            fraud_alerts_per_transaction: 0.05,
            num_investment_accounts: None,
            bad_data_rates: BadDataRates::default(),
            defect_classes: DefectClassSwitches::default(),
            output_directory: "output".to_string(),
            output_formats: vec!["csv".to_string(), "sql".to_string()],
        }
    }
}

impl GeneratorConfig {
    /// The date all generators treat as "today".
    pub fn anchor(&self) -> NaiveDate {
        self.anchor_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn validate(&self) -> Result<()> {
        self.bad_data_rates.validate()?;

        self.accounts_per_customer.validate("accounts_per_customer")?;
        self.cards_per_customer.validate("cards_per_customer")?;
        self.transactions_per_account
            .validate("transactions_per_account")?;
        self.loans_per_customer.validate("loans_per_customer")?;
        self.audit_logs_per_user.validate("audit_logs_per_user")?;
        self.user_logins_per_customer
            .validate("user_logins_per_customer")?;

        ensure!(
            (0.0..=1.0).contains(&self.fraud_alerts_per_transaction),
            "fraud_alerts_per_transaction: rate {} outside [0, 1]",
            self.fraud_alerts_per_transaction
        );

        if self.bad_data_rates.any_positive() && !self.defect_classes.any_enabled() {
            bail!("bad data requested but every defect class is disabled");
        }

        for format in &self.output_formats {
            ensure!(
                format == "csv" || format == "sql",
                "unknown output format {format:?} (expected \"csv\" or \"sql\")"
            );
        }

        Ok(())
    }
}

// ============================================================================
// SIMULATOR CONFIG
// ============================================================================

/// Weight per mutation operation kind. Weights are relative; they are
/// normalized before sampling and need not sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationWeights {
    pub insert_customer: f64,
    pub update_customer: f64,
    pub insert_account: f64,
    pub update_account: f64,
    pub insert_transaction: f64,
    pub update_transaction: f64,
    pub insert_card: f64,
    pub update_card: f64,
    pub insert_loan: f64,
    pub update_loan: f64,
    pub insert_fraud_alert: f64,
    pub insert_login: f64,
}

impl Default for OperationWeights {
    fn default() -> Self {
        OperationWeights {
            insert_customer: 0.10,
            update_customer: 0.15,
            insert_account: 0.10,
            update_account: 0.20,
            insert_transaction: 0.20,
            update_transaction: 0.10,
            insert_card: 0.05,
            update_card: 0.05,
            insert_loan: 0.03,
            update_loan: 0.02,
            insert_fraud_alert: 0.03,
            insert_login: 0.12,
        }
    }
}

impl OperationWeights {
    /// Only the named operation weighted.
    pub fn only(kind: OperationKind) -> Self {
        let mut weights = OperationWeights {
            insert_customer: 0.0,
            update_customer: 0.0,
            insert_account: 0.0,
            update_account: 0.0,
            insert_transaction: 0.0,
            update_transaction: 0.0,
            insert_card: 0.0,
            update_card: 0.0,
            insert_loan: 0.0,
            update_loan: 0.0,
            insert_fraud_alert: 0.0,
            insert_login: 0.0,
        };
        *weights.slot_mut(kind) = 1.0;
        weights
    }

    fn slot_mut(&mut self, kind: OperationKind) -> &mut f64 {
        match kind {
            OperationKind::InsertCustomer => &mut self.insert_customer,
            OperationKind::UpdateCustomer => &mut self.update_customer,
            OperationKind::InsertAccount => &mut self.insert_account,
            OperationKind::UpdateAccount => &mut self.update_account,
            OperationKind::InsertTransaction => &mut self.insert_transaction,
            OperationKind::UpdateTransaction => &mut self.update_transaction,
            OperationKind::InsertCard => &mut self.insert_card,
            OperationKind::UpdateCard => &mut self.update_card,
            OperationKind::InsertLoan => &mut self.insert_loan,
            OperationKind::UpdateLoan => &mut self.update_loan,
            OperationKind::InsertFraudAlert => &mut self.insert_fraud_alert,
            OperationKind::InsertLogin => &mut self.insert_login,
        }
    }

    /// Operation kinds paired with their raw weights.
    pub fn pairs(&self) -> [(OperationKind, f64); 12] {
        [
            (OperationKind::InsertCustomer, self.insert_customer),
            (OperationKind::UpdateCustomer, self.update_customer),
            (OperationKind::InsertAccount, self.insert_account),
            (OperationKind::UpdateAccount, self.update_account),
            (OperationKind::InsertTransaction, self.insert_transaction),
            (OperationKind::UpdateTransaction, self.update_transaction),
            (OperationKind::InsertCard, self.insert_card),
            (OperationKind::UpdateCard, self.update_card),
            (OperationKind::InsertLoan, self.insert_loan),
            (OperationKind::UpdateLoan, self.update_loan),
            (OperationKind::InsertFraudAlert, self.insert_fraud_alert),
            (OperationKind::InsertLogin, self.insert_login),
        ]
    }

    pub fn validate(&self) -> Result<()> {
        let mut total = 0.0;
        for (kind, weight) in self.pairs() {
            ensure!(
                weight.is_finite() && weight >= 0.0,
                "operation_weights.{}: weight {weight} must be non-negative",
                kind.as_str()
            );
            total += weight;
        }
        ensure!(total > 0.0, "operation weights sum to zero; nothing to simulate");
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub seed: u64,
    /// Fixed number of operations to attempt.
    pub operations: usize,
    /// Terminate the run at the first failed operation.
    pub stop_on_error: bool,
    pub operation_weights: OperationWeights,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        SimulatorConfig {
            seed: 42,
            operations: 20,
            stop_on_error: false,
            operation_weights: OperationWeights::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.operations > 0, "operations must be positive");
        self.operation_weights.validate()
    }
}

// ============================================================================
// TOP-LEVEL CONFIG FILE
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub simulator: SimulatorConfig,
    pub database_path: Option<String>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn database_path(&self) -> String {
        self.database_path
            .clone()
            .unwrap_or_else(|| format!("{}/bankforge.db", self.generator.output_directory))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
        assert!(SimulatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rate_outside_unit_interval_rejected() {
        let mut config = GeneratorConfig::default();
        config.bad_data_rates.cards = 1.5;
        assert!(config.validate().is_err());

        config.bad_data_rates.cards = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_fan_out_rejected() {
        let mut config = GeneratorConfig::default();
        config.accounts_per_customer = FanOut::new(4, 2);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("accounts_per_customer"));
    }

    #[test]
    fn test_no_enabled_classes_with_positive_rates_rejected() {
        let mut config = GeneratorConfig::default();
        config.defect_classes = DefectClassSwitches {
            missing_data: false,
            invalid_format: false,
            out_of_range: false,
            inconsistent_data: false,
            malformed_data: false,
        };
        assert!(config.validate().is_err());

        // With all rates at zero the empty switch set is fine.
        config.bad_data_rates = BadDataRates::clean();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let mut config = SimulatorConfig::default();
        config.operation_weights = OperationWeights {
            insert_customer: 0.0,
            update_customer: 0.0,
            insert_account: 0.0,
            update_account: 0.0,
            insert_transaction: 0.0,
            update_transaction: 0.0,
            insert_card: 0.0,
            update_card: 0.0,
            insert_loan: 0.0,
            update_loan: 0.0,
            insert_fraud_alert: 0.0,
            insert_login: 0.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = SimulatorConfig::default();
        config.operation_weights.insert_card = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_only_switch_helpers() {
        let switches = DefectClassSwitches::only(DefectClass::OutOfRange);
        assert_eq!(switches.enabled_classes(), vec![DefectClass::OutOfRange]);

        let weights = OperationWeights::only(OperationKind::InsertCustomer);
        let total: f64 = weights.pairs().iter().map(|(_, w)| w).sum();
        assert_eq!(total, 1.0);
        assert_eq!(weights.insert_customer, 1.0);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.generator.num_customers, config.generator.num_customers);
        assert_eq!(parsed.simulator.operations, config.simulator.operations);
    }
}
