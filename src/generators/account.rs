// 💳 Account Generator - bank accounts fanned out per customer

use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{
    fmt_date, fmt_datetime, parse_datetime_or, pick, random_id, round2, unique_id, weighted_pick,
};
use crate::config::FanOut;
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Account, Customer, TableKind};
use crate::vocab;

pub struct AccountGenerator {
    fan_out: FanOut,
    today: NaiveDate,
}

impl AccountGenerator {
    pub fn new(fan_out: FanOut, today: NaiveDate) -> Self {
        AccountGenerator { fan_out, today }
    }

    pub fn generate(
        &self,
        customers: &[Customer],
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<Account> {
        let mut accounts = Vec::new();
        let mut account_ids = HashSet::new();

        for customer in customers {
            let opened_base =
                parse_datetime_or(&customer.created_at, self.today.and_hms_opt(0, 0, 0).unwrap_or_default());

            for _ in 0..self.fan_out.sample(rng) {
                let account_id = unique_id(rng, &mut account_ids, "ACC", 1_000_000, 9_999_999);
                let mut account =
                    build_account(rng, account_id, customer.customer_id.clone(), opened_base);
                injector.maybe_corrupt(&mut account, rng);
                accounts.push(account);
            }
        }

        accounts
    }
}

/// Build one clean account for an existing customer; the account opens
/// within 30 days of `opened_base`.
pub fn synthesize(
    rng: &mut ChaCha8Rng,
    customer_id: &str,
    opened_base: NaiveDateTime,
) -> Account {
    let account_id = random_id(rng, "ACC", 1_000_000, 9_999_999);
    build_account(rng, account_id, customer_id.to_string(), opened_base)
}

fn build_account(
    rng: &mut ChaCha8Rng,
    account_id: String,
    customer_id: String,
    opened_base: NaiveDateTime,
) -> Account {
    let account_type = pick(rng, vocab::ACCOUNT_TYPES);
    let opened = opened_base + Duration::days(rng.gen_range(0..=30));

    Account {
        account_id,
        customer_id,
        account_number: Some(format!("{}", rng.gen_range(1_000_000_000u64..=9_999_999_999))),
        account_type: account_type.to_string(),
        balance: Some(balance_for(rng, account_type)),
        currency: Some(pick(rng, vocab::CURRENCIES).to_string()),
        status: Some(
            weighted_pick(rng, vocab::ACCOUNT_STATUS, &[0.8, 0.05, 0.05, 0.05, 0.05]).to_string(),
        ),
        opened_date: fmt_date(opened.date()),
        created_at: fmt_datetime(opened),
        is_bad_data: false,
        bad_data_type: None,
    }
}

/// Opening balance bands per account type; non-negative unless corrupted.
fn balance_for(rng: &mut ChaCha8Rng, account_type: &str) -> f64 {
    let value = match account_type {
        "Savings" => rng.gen_range(100.0..=50_000.0),
        "Checking" => rng.gen_range(500.0..=100_000.0),
        "Money Market" => rng.gen_range(1_000.0..=250_000.0),
        _ => rng.gen_range(5_000.0..=1_000_000.0),
    };
    round2(value)
}

impl Corruptible for Account {
    const TABLE: TableKind = TableKind::Accounts;
    const SUPPORTED: &'static [DefectClass] = &DefectClass::ALL;

    fn record_id(&self) -> &str {
        &self.account_id
    }

    fn mark(&mut self, class: DefectClass) {
        self.is_bad_data = true;
        self.bad_data_type = Some(class);
    }

    fn corrupt(&mut self, class: DefectClass, rng: &mut ChaCha8Rng) {
        match class {
            DefectClass::MissingData => {
                let mut slots = [0usize, 1, 2, 3];
                slots.shuffle(rng);
                for slot in slots.iter().take(rng.gen_range(1..=3)) {
                    match slot {
                        0 => self.account_number = None,
                        1 => self.balance = None,
                        2 => self.currency = None,
                        _ => self.status = None,
                    }
                }
            }
            DefectClass::InvalidFormat => {
                if rng.gen_bool(0.5) {
                    self.account_number =
                        Some(pick(rng, vocab::INVALID_ACCOUNT_NUMBERS).to_string());
                } else {
                    // Not an ISO 4217 code.
                    self.currency = Some("XYZ".to_string());
                }
            }
            DefectClass::OutOfRange => {
                if rng.gen_bool(0.5) {
                    self.balance = Some(pick(
                        rng,
                        &[-10_000.00, 9_999_999_999.99, -0.01, 1_000_000_000.00],
                    ));
                } else {
                    // Opened in the future.
                    self.opened_date = format!(
                        "{}-{:02}-{:02}",
                        rng.gen_range(2100..=2150),
                        rng.gen_range(1..=12),
                        rng.gen_range(1..=28)
                    );
                }
            }
            DefectClass::InconsistentData => {
                // Closed account still holding funds.
                self.status = Some("Closed".to_string());
                if !matches!(self.balance, Some(b) if b > 0.0) {
                    self.balance = Some(round2(rng.gen_range(1_000.0..=10_000.0)));
                }
            }
            DefectClass::MalformedData => {
                let payload = pick(rng, vocab::ADVERSARIAL_PAYLOADS);
                if rng.gen_bool(0.5) {
                    self.account_type.push_str(payload);
                } else {
                    match &mut self.status {
                        Some(status) => status.push_str(payload),
                        None => self.account_type.push_str(payload),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::customer::CustomerGenerator;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn sample_customers(rng: &mut ChaCha8Rng, count: usize) -> Vec<Customer> {
        let (customers, _) = CustomerGenerator::new(count, today()).generate(
            rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );
        customers
    }

    #[test]
    fn test_fan_out_respected_per_customer() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let customers = sample_customers(&mut rng, 100);
        let accounts = AccountGenerator::new(FanOut::new(1, 3), today()).generate(
            &customers,
            &mut rng,
            &mut DefectInjector::disabled(),
        );

        for customer in &customers {
            let owned = accounts
                .iter()
                .filter(|a| a.customer_id == customer.customer_id)
                .count();
            assert!(
                (1..=3).contains(&owned),
                "{} has {owned} accounts",
                customer.customer_id
            );
        }
    }

    #[test]
    fn test_every_account_links_to_a_customer() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let customers = sample_customers(&mut rng, 40);
        let accounts = AccountGenerator::new(FanOut::new(1, 2), today()).generate(
            &customers,
            &mut rng,
            &mut DefectInjector::disabled(),
        );

        let known: HashSet<&str> = customers.iter().map(|c| c.customer_id.as_str()).collect();
        for account in &accounts {
            assert!(known.contains(account.customer_id.as_str()));
        }
    }

    #[test]
    fn test_clean_balances_are_non_negative() {
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let customers = sample_customers(&mut rng, 30);
        let accounts = AccountGenerator::new(FanOut::new(1, 3), today()).generate(
            &customers,
            &mut rng,
            &mut DefectInjector::disabled(),
        );

        for account in &accounts {
            assert!(account.balance.unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_out_of_range_balance_leaves_valid_domain() {
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let base = today().and_hms_opt(9, 0, 0).unwrap();
        for _ in 0..40 {
            let mut account = synthesize(&mut rng, "C00000001", base);
            account.corrupt(DefectClass::OutOfRange, &mut rng);
            let bad_balance = matches!(account.balance, Some(b) if b < 0.0 || b > 1_000_000.0);
            let bad_date =
                NaiveDate::parse_from_str(&account.opened_date, "%Y-%m-%d")
                    .map(|d| d > today())
                    .unwrap_or(true);
            assert!(bad_balance || bad_date);
        }
    }
}
