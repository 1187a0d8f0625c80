// 🚨 Fraud Alert Generator - alerts raised against sampled transactions
//
// A configurable fraction of transactions gets an alert; severity and score
// derive from the transaction amount. Terminal alert statuses carry a
// resolution date.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{fmt_datetime, parse_date_or, pick, random_id, random_time, round2, unique_id};
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Account, FraudAlert, TableKind, Transaction};
use crate::vocab;

pub struct FraudAlertGenerator {
    alert_rate: f64,
    today: NaiveDate,
}

impl FraudAlertGenerator {
    pub fn new(alert_rate: f64, today: NaiveDate) -> Self {
        FraudAlertGenerator { alert_rate, today }
    }

    pub fn generate(
        &self,
        transactions: &[Transaction],
        accounts: &[Account],
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<FraudAlert> {
        let owner_of: HashMap<&str, &str> = accounts
            .iter()
            .map(|a| (a.account_id.as_str(), a.customer_id.as_str()))
            .collect();

        let target = ((transactions.len() as f64) * self.alert_rate) as usize;
        let picked = rand::seq::index::sample(rng, transactions.len(), target.min(transactions.len()));

        let mut alerts = Vec::with_capacity(picked.len());
        let mut alert_ids = HashSet::new();

        for index in picked.iter() {
            let transaction = &transactions[index];
            let Some(customer_id) = owner_of.get(transaction.account_id.as_str()) else {
                continue;
            };

            let alert_id = unique_id(rng, &mut alert_ids, "ALT", 10_000_000, 99_999_999);
            let mut alert = build_alert(
                rng,
                self.today,
                alert_id,
                transaction,
                customer_id,
            );
            injector.maybe_corrupt(&mut alert, rng);
            alerts.push(alert);
        }

        alerts
    }
}

/// Build one clean alert for an existing transaction; the simulator feeds
/// in the linkage it sampled from the store.
pub fn synthesize(
    rng: &mut ChaCha8Rng,
    today: NaiveDate,
    transaction_id: &str,
    account_id: &str,
    customer_id: &str,
    amount: f64,
) -> FraudAlert {
    let alert_id = random_id(rng, "ALT", 10_000_000, 99_999_999);
    let transaction = Transaction {
        transaction_id: transaction_id.to_string(),
        account_id: account_id.to_string(),
        card_id: None,
        transaction_type: "Purchase".to_string(),
        amount: Some(amount),
        currency: "USD".to_string(),
        transaction_date: Some(super::fmt_date(today - Duration::days(rng.gen_range(1..=30)))),
        transaction_time: None,
        description: None,
        status: Some("Completed".to_string()),
        created_at: String::new(),
        is_bad_data: false,
        bad_data_type: None,
    };
    build_alert(rng, today, alert_id, &transaction, customer_id)
}

fn build_alert(
    rng: &mut ChaCha8Rng,
    today: NaiveDate,
    alert_id: String,
    transaction: &Transaction,
    customer_id: &str,
) -> FraudAlert {
    let fallback = today - Duration::days(rng.gen_range(1..=30));
    let transaction_date = transaction
        .transaction_date
        .as_deref()
        .map(|raw| parse_date_or(raw, fallback))
        .unwrap_or(fallback);

    // Raised 1 to 72 hours after the transaction.
    let raised = transaction_date
        .and_time(random_time(rng))
        + Duration::hours(rng.gen_range(1..=72));

    let amount = transaction.amount.unwrap_or(0.0).abs();
    let (severity, severity_score) = match amount {
        a if a > 10_000.0 => ("CRITICAL", rng.gen_range(80..=100)),
        a if a > 5_000.0 => ("HIGH", rng.gen_range(60..=79)),
        a if a > 1_000.0 => ("MEDIUM", rng.gen_range(40..=59)),
        _ => ("LOW", rng.gen_range(20..=39)),
    };

    let alert_status = pick(rng, vocab::ALERT_STATUSES).to_string();
    let resolved = matches!(
        alert_status.as_str(),
        "RESOLVED" | "FALSE_POSITIVE" | "CONFIRMED_FRAUD"
    );
    let resolution_date = resolved.then(|| {
        fmt_datetime(raised + Duration::days(rng.gen_range(1..=30)))
    });
    let financial_loss = (alert_status == "CONFIRMED_FRAUD")
        .then(|| round2(amount * rng.gen_range(0.1..=1.5)));

    FraudAlert {
        alert_id,
        transaction_id: transaction.transaction_id.clone(),
        account_id: transaction.account_id.clone(),
        customer_id: customer_id.to_string(),
        alert_timestamp: fmt_datetime(raised),
        detection_method: Some(pick(rng, vocab::DETECTION_METHODS).to_string()),
        fraud_reason: Some(pick(rng, vocab::FRAUD_REASONS).to_string()),
        fraud_type: pick(rng, vocab::FRAUD_TYPES).to_string(),
        severity: Some(severity.to_string()),
        severity_score,
        alert_status: alert_status.clone(),
        financial_loss,
        is_false_positive: alert_status == "FALSE_POSITIVE",
        resolution_date,
        created_at: fmt_datetime(raised),
        is_bad_data: false,
        bad_data_type: None,
    }
}

impl Corruptible for FraudAlert {
    const TABLE: TableKind = TableKind::FraudAlerts;
    const SUPPORTED: &'static [DefectClass] = &DefectClass::ALL;

    fn record_id(&self) -> &str {
        &self.alert_id
    }

    fn mark(&mut self, class: DefectClass) {
        self.is_bad_data = true;
        self.bad_data_type = Some(class);
    }

    fn corrupt(&mut self, class: DefectClass, rng: &mut ChaCha8Rng) {
        match class {
            DefectClass::MissingData => {
                self.fraud_reason = None;
                self.severity = None;
                self.detection_method = None;
            }
            DefectClass::InvalidFormat => {
                self.alert_timestamp = "2024/13/45 25:61:61".to_string();
                self.fraud_reason = Some("INVALID_REASON_XYZ".to_string());
            }
            DefectClass::OutOfRange => {
                self.severity_score = -rng.gen_range(1..=100);
                self.financial_loss = Some(-500_000.0);
            }
            DefectClass::InconsistentData => {
                // Resolved with no resolution date.
                self.alert_status = "RESOLVED".to_string();
                self.resolution_date = None;
            }
            DefectClass::MalformedData => {
                self.fraud_reason = Some("<script>alert('xss')</script>".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn transaction(id: usize, account: &str, amount: f64) -> Transaction {
        Transaction {
            transaction_id: format!("TXN{id:09}"),
            account_id: account.to_string(),
            card_id: None,
            transaction_type: "Purchase".to_string(),
            amount: Some(amount),
            currency: "USD".to_string(),
            transaction_date: Some("2025-05-01".to_string()),
            transaction_time: None,
            description: None,
            status: Some("Completed".to_string()),
            created_at: "2025-05-01 10:00:00".to_string(),
            is_bad_data: false,
            bad_data_type: None,
        }
    }

    fn account(id: &str, customer: &str) -> Account {
        Account {
            account_id: id.to_string(),
            customer_id: customer.to_string(),
            account_number: Some("1234567890".to_string()),
            account_type: "Checking".to_string(),
            balance: Some(100.0),
            currency: Some("USD".to_string()),
            status: Some("Active".to_string()),
            opened_date: "2024-01-01".to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
            is_bad_data: false,
            bad_data_type: None,
        }
    }

    #[test]
    fn test_alert_count_follows_rate() {
        let mut rng = ChaCha8Rng::seed_from_u64(111);
        let transactions: Vec<Transaction> =
            (0..200).map(|i| transaction(i, "ACC0000001", 500.0)).collect();
        let accounts = vec![account("ACC0000001", "C00000001")];

        let alerts = FraudAlertGenerator::new(0.10, today()).generate(
            &transactions,
            &accounts,
            &mut rng,
            &mut DefectInjector::disabled(),
        );
        assert_eq!(alerts.len(), 20);
    }

    #[test]
    fn test_severity_scales_with_amount() {
        let mut rng = ChaCha8Rng::seed_from_u64(112);
        let big = synthesize(&mut rng, today(), "TXN1", "ACC1", "C1", 20_000.0);
        assert_eq!(big.severity.as_deref(), Some("CRITICAL"));
        assert!(big.severity_score >= 80);

        let small = synthesize(&mut rng, today(), "TXN2", "ACC1", "C1", 50.0);
        assert_eq!(small.severity.as_deref(), Some("LOW"));
        assert!(small.severity_score < 40);
    }

    #[test]
    fn test_resolved_alerts_have_resolution_dates() {
        let mut rng = ChaCha8Rng::seed_from_u64(113);
        for _ in 0..100 {
            let alert = synthesize(&mut rng, today(), "TXN1", "ACC1", "C1", 1_500.0);
            let terminal = matches!(
                alert.alert_status.as_str(),
                "RESOLVED" | "FALSE_POSITIVE" | "CONFIRMED_FRAUD"
            );
            assert_eq!(alert.resolution_date.is_some(), terminal);
        }
    }
}
