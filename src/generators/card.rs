// 💳 Card Generator - payment cards tied to a customer's accounts
//
// Card numbers are Luhn-valid (15 digits for American Express, 16 for the
// rest) unless the invalid-format class replaces them.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{fmt_datetime, parse_datetime_or, pick, random_id, round2, unique_id, weighted_pick};
use crate::config::FanOut;
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Account, Card, Customer, TableKind};
use crate::vocab;

pub struct CardGenerator {
    fan_out: FanOut,
    today: NaiveDate,
}

impl CardGenerator {
    pub fn new(fan_out: FanOut, today: NaiveDate) -> Self {
        CardGenerator { fan_out, today }
    }

    pub fn generate(
        &self,
        customers: &[Customer],
        accounts: &[Account],
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<Card> {
        let mut cards = Vec::new();
        let mut card_ids = HashSet::new();

        for customer in customers {
            let owned: Vec<&Account> = accounts
                .iter()
                .filter(|a| a.customer_id == customer.customer_id)
                .collect();
            if owned.is_empty() {
                continue;
            }

            for _ in 0..self.fan_out.sample(rng) {
                let account = owned[rng.gen_range(0..owned.len())];
                let card_id = unique_id(rng, &mut card_ids, "CRD", 1_000_000, 9_999_999);
                let issued = parse_datetime_or(
                    &account.created_at,
                    self.today.and_hms_opt(0, 0, 0).unwrap_or_default(),
                ) + Duration::days(rng.gen_range(0..=60));

                let mut card = build_card(
                    rng,
                    self.today,
                    card_id,
                    customer.customer_id.clone(),
                    account.account_id.clone(),
                    fmt_datetime(issued),
                );
                injector.maybe_corrupt(&mut card, rng);
                cards.push(card);
            }
        }

        cards
    }
}

/// Build one clean card for an existing customer/account pair.
pub fn synthesize(
    rng: &mut ChaCha8Rng,
    today: NaiveDate,
    customer_id: &str,
    account_id: &str,
) -> Card {
    let card_id = random_id(rng, "CRD", 1_000_000, 9_999_999);
    let issued = today.and_hms_opt(0, 0, 0).unwrap_or_default();
    build_card(
        rng,
        today,
        card_id,
        customer_id.to_string(),
        account_id.to_string(),
        fmt_datetime(issued),
    )
}

fn build_card(
    rng: &mut ChaCha8Rng,
    today: NaiveDate,
    card_id: String,
    customer_id: String,
    account_id: String,
    created_at: String,
) -> Card {
    let card_type = pick(rng, vocab::CARD_TYPES);
    let network = pick(rng, vocab::CARD_NETWORKS);
    let credit_score = rng.gen_range(600..=850);
    let expiry = today + Duration::days(rng.gen_range(365..=365 * 5));

    Card {
        card_id,
        customer_id,
        account_id,
        card_number: Some(luhn_number(rng, network)),
        card_type: card_type.to_string(),
        card_network: network.to_string(),
        expiration_date: Some(expiry.format("%m/%y").to_string()),
        cvv: Some(format!("{}", rng.gen_range(100..=999))),
        credit_limit: Some(credit_limit(rng, card_type, credit_score)),
        status: weighted_pick(rng, vocab::CARD_STATUS, &[0.85, 0.05, 0.05, 0.05]).to_string(),
        created_at,
        is_bad_data: false,
        bad_data_type: None,
    }
}

/// Luhn-valid card number for the network.
fn luhn_number(rng: &mut ChaCha8Rng, network: &str) -> String {
    let (prefix, length) = if network == "American Express" {
        (format!("3{}", pick(rng, &['4', '7'])), 15)
    } else {
        (format!("{}", pick(rng, &['4', '5'])), 16)
    };

    let mut digits: Vec<u32> = prefix.chars().filter_map(|c| c.to_digit(10)).collect();
    while digits.len() < length - 1 {
        digits.push(rng.gen_range(0..10));
    }

    // Check digit: double every second digit from the right (the check digit
    // position counts as the rightmost).
    let mut sum = 0;
    for (i, digit) in digits.iter().rev().enumerate() {
        let mut d = *digit;
        if i % 2 == 0 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    digits.push((10 - sum % 10) % 10);

    digits.iter().map(|d| d.to_string()).collect()
}

/// Credit limit scaled by credit score; zero for non-credit cards.
fn credit_limit(rng: &mut ChaCha8Rng, card_type: &str, credit_score: u32) -> f64 {
    if card_type != "Credit" {
        return 0.0;
    }
    let base = match credit_score {
        800..=850 => 25_000.0,
        750..=799 => 15_000.0,
        700..=749 => 10_000.0,
        650..=699 => 5_000.0,
        600..=649 => 2_000.0,
        _ => 1_000.0,
    };
    round2(base * rng.gen_range(0.8..=1.2))
}

impl Corruptible for Card {
    const TABLE: TableKind = TableKind::Cards;
    const SUPPORTED: &'static [DefectClass] = &DefectClass::ALL;

    fn record_id(&self) -> &str {
        &self.card_id
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
                        0 => self.card_number = None,
                        1 => self.expiration_date = None,
                        2 => self.cvv = None,
                        _ => self.credit_limit = None,
                    }
                }
            }
            DefectClass::InvalidFormat => match rng.gen_range(0..3) {
                0 => self.card_number = Some(pick(rng, vocab::INVALID_CARD_NUMBERS).to_string()),
                1 => {
                    self.expiration_date = Some(pick(rng, vocab::INVALID_EXPIRY_DATES).to_string())
                }
                _ => self.cvv = Some(pick(rng, vocab::INVALID_CVVS).to_string()),
            },
            DefectClass::OutOfRange => {
                if rng.gen_bool(0.5) {
                    // Long-expired card.
                    self.expiration_date = Some(format!(
                        "{:02}/{:02}",
                        rng.gen_range(1..=12),
                        rng.gen_range(0..=9)
                    ));
                } else {
                    self.credit_limit = Some(pick(
                        rng,
                        &[-5_000.00, 99_999_999.99, -0.01, 100_000_000.00],
                    ));
                }
            }
            DefectClass::InconsistentData => {
                // Network no issuer recognizes, contradicting the card type.
                self.card_network = "InvalidNetwork".to_string();
            }
            DefectClass::MalformedData => {
                let payload = pick(rng, vocab::ADVERSARIAL_PAYLOADS);
                match rng.gen_range(0..3) {
                    0 => self.card_type.push_str(payload),
                    1 => self.card_network.push_str(payload),
                    _ => self.status.push_str(payload),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luhn_checks(number: &str) -> bool {
        let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != number.len() {
            return false;
        }
        let mut sum = 0;
        for (i, digit) in digits.iter().rev().enumerate() {
            let mut d = *digit;
            if i % 2 == 1 {
                d *= 2;
                if d > 9 {
                    d -= 9;
                }
            }
            sum += d;
        }
        sum % 10 == 0
    }

    #[test]
    fn test_generated_numbers_pass_luhn() {
        use rand::SeedableRng;
        let mut rng = ChaCha8Rng::seed_from_u64(31);

        for _ in 0..100 {
            let visa = luhn_number(&mut rng, "Visa");
            assert_eq!(visa.len(), 16);
            assert!(luhn_checks(&visa), "failed for {visa}");

            let amex = luhn_number(&mut rng, "American Express");
            assert_eq!(amex.len(), 15);
            assert!(amex.starts_with("34") || amex.starts_with("37"));
            assert!(luhn_checks(&amex), "failed for {amex}");
        }
    }

    #[test]
    fn test_non_credit_cards_have_zero_limit() {
        use rand::SeedableRng;
        let mut rng = ChaCha8Rng::seed_from_u64(32);
        assert_eq!(credit_limit(&mut rng, "Debit", 800), 0.0);
        assert_eq!(credit_limit(&mut rng, "Prepaid", 700), 0.0);
        assert!(credit_limit(&mut rng, "Credit", 800) >= 20_000.0);
    }
}
