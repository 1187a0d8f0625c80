// 💸 Transaction Generator - account activity within each account's lifespan
//
// Card-present types (Purchase, Refund) attach a card id when the account
// has one. Output is insertion order; downstream consumers sort if they
// care.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{fmt_date, fmt_datetime, parse_date_or, pick, random_id, random_time, round2, unique_id, weighted_pick};
use crate::config::FanOut;
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Account, Card, TableKind, Transaction};
use crate::vocab;

pub struct TransactionGenerator {
    fan_out: FanOut,
    today: NaiveDate,
}

impl TransactionGenerator {
    pub fn new(fan_out: FanOut, today: NaiveDate) -> Self {
        TransactionGenerator { fan_out, today }
    }

    pub fn generate(
        &self,
        accounts: &[Account],
        cards: &[Card],
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<Transaction> {
        let mut transactions = Vec::new();
        let mut transaction_ids = HashSet::new();

        for account in accounts {
            // Skip accounts whose opened date was corrupted into the future
            // or into something unparsable.
            let opened = parse_date_or(&account.opened_date, self.today + Duration::days(1));
            let lifespan = (self.today - opened).num_days();
            if lifespan <= 0 {
                continue;
            }

            let account_cards: Vec<&Card> = cards
                .iter()
                .filter(|c| c.account_id == account.account_id)
                .collect();

            for _ in 0..self.fan_out.sample(rng) {
                let date = opened + Duration::days(rng.gen_range(0..=lifespan));
                let transaction_type = if account_cards.is_empty() {
                    weighted_pick(
                        rng,
                        &["Deposit", "Withdrawal", "Transfer", "Payment"],
                        &[0.3, 0.3, 0.25, 0.15],
                    )
                } else {
                    weighted_pick(
                        rng,
                        vocab::TRANSACTION_TYPES,
                        &[0.15, 0.2, 0.15, 0.2, 0.25, 0.05],
                    )
                };

                let card_id = if !account_cards.is_empty()
                    && matches!(transaction_type, "Purchase" | "Refund")
                {
                    Some(account_cards[rng.gen_range(0..account_cards.len())].card_id.clone())
                } else {
                    None
                };

                let transaction_id =
                    unique_id(rng, &mut transaction_ids, "TXN", 100_000_000, 999_999_999);
                let mut transaction = build_transaction(
                    rng,
                    transaction_id,
                    account.account_id.clone(),
                    card_id,
                    &account.account_type,
                    account.currency.as_deref().unwrap_or("USD"),
                    transaction_type,
                    date,
                );
                injector.maybe_corrupt(&mut transaction, rng);
                transactions.push(transaction);
            }
        }

        transactions
    }
}

/// Build one clean transaction for an existing account; dated within the
/// last 30 days.
pub fn synthesize(rng: &mut ChaCha8Rng, today: NaiveDate, account_id: &str) -> Transaction {
    let transaction_id = random_id(rng, "TXN", 100_000_000, 999_999_999);
    let transaction_type = pick(rng, vocab::TRANSACTION_TYPES);
    let date = today - Duration::days(rng.gen_range(0..=30));
    build_transaction(
        rng,
        transaction_id,
        account_id.to_string(),
        None,
        "Checking",
        "USD",
        transaction_type,
        date,
    )
}

#[allow(clippy::too_many_arguments)]
fn build_transaction(
    rng: &mut ChaCha8Rng,
    transaction_id: String,
    account_id: String,
    card_id: Option<String>,
    account_type: &str,
    currency: &str,
    transaction_type: &str,
    date: NaiveDate,
) -> Transaction {
    let time = random_time(rng);
    let descriptions = vocab::transaction_descriptions(transaction_type);

    Transaction {
        transaction_id,
        account_id,
        card_id,
        transaction_type: transaction_type.to_string(),
        amount: Some(amount_for(rng, account_type, transaction_type)),
        currency: currency.to_string(),
        transaction_date: Some(fmt_date(date)),
        transaction_time: Some(time.format("%H:%M:%S").to_string()),
        description: Some(pick(rng, descriptions).to_string()),
        status: Some(
            weighted_pick(rng, vocab::TRANSACTION_STATUS, &[0.9, 0.05, 0.03, 0.02]).to_string(),
        ),
        created_at: fmt_datetime(date.and_time(time)),
        is_bad_data: false,
        bad_data_type: None,
    }
}

/// Amount bands per transaction type, scaled by the account type.
fn amount_for(rng: &mut ChaCha8Rng, account_type: &str, transaction_type: &str) -> f64 {
    let base = match transaction_type {
        "Deposit" | "Transfer" => rng.gen_range(100.0..=10_000.0),
        "Payment" => rng.gen_range(50.0..=5_000.0),
        _ => rng.gen_range(10.0..=1_000.0),
    };

    let scaled = match account_type {
        "Savings" => base * rng.gen_range(0.5..=2.0),
        "Certificate of Deposit" => base * rng.gen_range(2.0..=5.0),
        _ => base,
    };

    round2(scaled)
}

impl Corruptible for Transaction {
    const TABLE: TableKind = TableKind::Transactions;
    const SUPPORTED: &'static [DefectClass] = &DefectClass::ALL;

    fn record_id(&self) -> &str {
        &self.transaction_id
    }

    fn mark(&mut self, class: DefectClass) {
        self.is_bad_data = true;
        self.bad_data_type = Some(class);
    }

    fn corrupt(&mut self, class: DefectClass, rng: &mut ChaCha8Rng) {
        match class {
            DefectClass::MissingData => {
                let mut slots = [0usize, 1, 2, 3, 4];
                slots.shuffle(rng);
                for slot in slots.iter().take(rng.gen_range(1..=3)) {
                    match slot {
                        0 => self.amount = None,
                        1 => self.description = None,
                        2 => self.status = None,
                        3 => self.transaction_date = None,
                        _ => self.transaction_time = None,
                    }
                }
            }
            DefectClass::InvalidFormat => match rng.gen_range(0..3) {
                0 => self.transaction_date = Some(pick(rng, vocab::INVALID_DATES).to_string()),
                1 => self.description = Some(pick(rng, vocab::INVALID_DESCRIPTIONS).to_string()),
                _ => self.currency = "XXX".to_string(),
            },
            DefectClass::OutOfRange => {
                if rng.gen_bool(0.5) {
                    // Posted in the future.
                    self.transaction_date = Some(format!(
                        "{}-{:02}-{:02}",
                        rng.gen_range(2100..=2150),
                        rng.gen_range(1..=12),
                        rng.gen_range(1..=28)
                    ));
                } else {
                    self.amount = Some(pick(
                        rng,
                        &[-10_000.00, 99_999_999.99, -0.01, 1_000_000_000.00],
                    ));
                }
            }
            DefectClass::InconsistentData => {
                // Failed transaction carrying a negative settled amount.
                self.status = Some("Failed".to_string());
                let amount = self.amount.unwrap_or(100.0);
                self.amount = Some(-amount.abs());
            }
            DefectClass::MalformedData => {
                let payload = pick(rng, vocab::ADVERSARIAL_PAYLOADS);
                match rng.gen_range(0..3) {
                    0 => match &mut self.description {
                        Some(description) => description.push_str(payload),
                        None => self.transaction_type.push_str(payload),
                    },
                    1 => self.transaction_type.push_str(payload),
                    _ => match &mut self.status {
                        Some(status) => status.push_str(payload),
                        None => self.transaction_type.push_str(payload),
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::account::AccountGenerator;
    use crate::generators::customer::CustomerGenerator;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_transactions_stay_within_account_lifespan() {
        let mut rng = ChaCha8Rng::seed_from_u64(41);
        let (customers, _) = CustomerGenerator::new(20, today()).generate(
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );
        let accounts = AccountGenerator::new(FanOut::new(1, 2), today()).generate(
            &customers,
            &mut rng,
            &mut DefectInjector::disabled(),
        );
        let transactions = TransactionGenerator::new(FanOut::new(2, 5), today()).generate(
            &accounts,
            &[],
            &mut rng,
            &mut DefectInjector::disabled(),
        );

        for transaction in &transactions {
            let account = accounts
                .iter()
                .find(|a| a.account_id == transaction.account_id)
                .expect("dangling account_id");
            let opened = NaiveDate::parse_from_str(&account.opened_date, "%Y-%m-%d").unwrap();
            let date = NaiveDate::parse_from_str(
                transaction.transaction_date.as_deref().unwrap(),
                "%Y-%m-%d",
            )
            .unwrap();
            assert!(date >= opened && date <= today());
        }
    }

    #[test]
    fn test_card_id_only_on_card_present_types() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let (customers, _) = CustomerGenerator::new(30, today()).generate(
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );
        let accounts = AccountGenerator::new(FanOut::new(1, 2), today()).generate(
            &customers,
            &mut rng,
            &mut DefectInjector::disabled(),
        );
        let cards = crate::generators::card::CardGenerator::new(FanOut::new(1, 2), today())
            .generate(&customers, &accounts, &mut rng, &mut DefectInjector::disabled());
        let transactions = TransactionGenerator::new(FanOut::new(5, 10), today()).generate(
            &accounts,
            &cards,
            &mut rng,
            &mut DefectInjector::disabled(),
        );

        for transaction in &transactions {
            if let Some(card_id) = &transaction.card_id {
                assert!(matches!(
                    transaction.transaction_type.as_str(),
                    "Purchase" | "Refund"
                ));
                let card = cards
                    .iter()
                    .find(|c| &c.card_id == card_id)
                    .expect("dangling card_id");
                assert_eq!(card.account_id, transaction.account_id);
            }
        }
    }
}
