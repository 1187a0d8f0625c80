// 👤 Customer Generator - root of the entity graph
//
// Produces customers plus their 1:1 customer_details companion rows, paired
// in parent order. Both tables corrupt independently through their own
// injector.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{datetime_days_back, fmt_date, fmt_datetime, pick, random_id, unique_id, weighted_pick};
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Customer, CustomerDetail, TableKind};
use crate::vocab;

pub struct CustomerGenerator {
    count: usize,
    today: NaiveDate,
}

impl CustomerGenerator {
    pub fn new(count: usize, today: NaiveDate) -> Self {
        CustomerGenerator { count, today }
    }

    pub fn generate(
        &self,
        rng: &mut ChaCha8Rng,
        customer_injector: &mut DefectInjector,
        detail_injector: &mut DefectInjector,
    ) -> (Vec<Customer>, Vec<CustomerDetail>) {
        let mut customers = Vec::with_capacity(self.count);
        let mut details = Vec::with_capacity(self.count);
        let mut customer_ids = HashSet::new();
        let mut detail_ids = HashSet::new();

        for _ in 0..self.count {
            let customer_id = unique_id(rng, &mut customer_ids, "C", 10_000_000, 99_999_999);
            let mut customer = build_customer(rng, self.today, customer_id.clone());
            customer_injector.maybe_corrupt(&mut customer, rng);

            let created_at = customer.created_at.clone();
            customers.push(customer);

            let detail_id = unique_id(rng, &mut detail_ids, "DTL", 10_000_000, 99_999_999);
            let mut detail = build_detail(rng, detail_id, customer_id, created_at);
            detail_injector.maybe_corrupt(&mut detail, rng);
            details.push(detail);
        }

        (customers, details)
    }
}

/// Build one clean customer; the simulator uses this directly for inserts.
pub fn synthesize(rng: &mut ChaCha8Rng, today: NaiveDate) -> Customer {
    let customer_id = random_id(rng, "C", 10_000_000, 99_999_999);
    build_customer(rng, today, customer_id)
}

fn build_customer(rng: &mut ChaCha8Rng, today: NaiveDate, customer_id: String) -> Customer {
    let first_name = pick(rng, vocab::FIRST_NAMES).to_string();
    let last_name = pick(rng, vocab::LAST_NAMES).to_string();
    let email = build_email(rng, &first_name, &last_name);
    let phone = build_phone(rng);

    // 18 to 80 years old.
    let dob = today - Duration::days(rng.gen_range(18 * 365..=80 * 365));

    let city = pick(rng, vocab::CITIES);
    let zip_code = match vocab::zip_for_city(city) {
        Some(zip) => zip.to_string(),
        None => format!("{}", rng.gen_range(10_000..=99_999)),
    };
    let street = format!(
        "{} {} {}",
        rng.gen_range(1..=9999),
        pick(rng, vocab::STREET_NAMES),
        pick(rng, vocab::STREET_TYPES)
    );

    let created_at = datetime_days_back(rng, today, 0, 365 * 5);

    Customer {
        customer_id,
        first_name,
        last_name,
        email: Some(email),
        phone: Some(phone),
        date_of_birth: fmt_date(dob),
        street: Some(street),
        city: Some(city.to_string()),
        state: pick(rng, vocab::STATES).to_string(),
        zip_code,
        country: "USA".to_string(),
        created_at: fmt_datetime(created_at),
        is_bad_data: false,
        bad_data_type: None,
    }
}

fn build_detail(
    rng: &mut ChaCha8Rng,
    detail_id: String,
    customer_id: String,
    created_at: String,
) -> CustomerDetail {
    CustomerDetail {
        detail_id,
        customer_id,
        employment_status: Some(pick(rng, vocab::EMPLOYMENT_TYPES).to_string()),
        annual_income: Some(annual_income(rng)),
        credit_score: Some(rng.gen_range(300..=850)),
        marital_status: pick(rng, vocab::MARITAL_STATUSES).to_string(),
        education_level: pick(rng, vocab::EDUCATION_LEVELS).to_string(),
        created_at,
        is_bad_data: false,
        bad_data_type: None,
    }
}

pub(crate) fn build_email(rng: &mut ChaCha8Rng, first_name: &str, last_name: &str) -> String {
    format!(
        "{}.{}@{}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        pick(rng, vocab::EMAIL_DOMAINS)
    )
}

pub(crate) fn build_phone(rng: &mut ChaCha8Rng) -> String {
    format!(
        "+1-{}-{}-{}",
        rng.gen_range(200..=999),
        rng.gen_range(200..=999),
        rng.gen_range(1000..=9999)
    )
}

/// Income drawn from weighted brackets, skewed toward the middle.
fn annual_income(rng: &mut ChaCha8Rng) -> f64 {
    let (low, high) = weighted_pick(
        rng,
        &[
            (20_000u32, 50_000u32),
            (50_000, 100_000),
            (100_000, 200_000),
            (200_000, 500_000),
        ],
        &[0.3, 0.4, 0.2, 0.1],
    );
    rng.gen_range(low..=high) as f64
}

// ============================================================================
// CORRUPTION
// ============================================================================

impl Corruptible for Customer {
    const TABLE: TableKind = TableKind::Customers;
    const SUPPORTED: &'static [DefectClass] = &DefectClass::ALL;

    fn record_id(&self) -> &str {
        &self.customer_id
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
                        0 => self.email = None,
                        1 => self.phone = None,
                        2 => self.street = None,
                        _ => self.city = None,
                    }
                }
            }
            DefectClass::InvalidFormat => {
                if rng.gen_bool(0.5) {
                    self.email = Some(pick(rng, vocab::INVALID_EMAILS).to_string());
                } else {
                    self.phone = Some(pick(rng, vocab::INVALID_PHONES).to_string());
                }
            }
            DefectClass::OutOfRange => {
                if rng.gen_bool(0.5) {
                    // Born in the future.
                    self.date_of_birth = format!(
                        "{}-{:02}-{:02}",
                        rng.gen_range(2100..=2199),
                        rng.gen_range(1..=12),
                        rng.gen_range(1..=28)
                    );
                } else {
                    self.date_of_birth = "1899-01-01".to_string();
                }
            }
            DefectClass::InconsistentData => {
                // State code unrelated to any address.
                self.state = "XX".to_string();
            }
            DefectClass::MalformedData => {
                let payload = pick(rng, vocab::ADVERSARIAL_PAYLOADS);
                match rng.gen_range(0..3) {
                    0 => self.first_name.push_str(payload),
                    1 => self.last_name.push_str(payload),
                    _ => match &mut self.email {
                        Some(email) => email.push_str(payload),
                        None => self.first_name.push_str(payload),
                    },
                }
            }
        }
    }
}

impl Corruptible for CustomerDetail {
    const TABLE: TableKind = TableKind::CustomerDetails;
    const SUPPORTED: &'static [DefectClass] = &[
        DefectClass::MissingData,
        DefectClass::InvalidFormat,
        DefectClass::OutOfRange,
        DefectClass::InconsistentData,
    ];

    fn record_id(&self) -> &str {
        &self.detail_id
    }

    fn mark(&mut self, class: DefectClass) {
        self.is_bad_data = true;
        self.bad_data_type = Some(class);
    }

    fn corrupt(&mut self, class: DefectClass, rng: &mut ChaCha8Rng) {
        match class {
            DefectClass::MissingData => {
                let mut slots = [0usize, 1, 2];
                slots.shuffle(rng);
                for slot in slots.iter().take(rng.gen_range(1..=3)) {
                    match slot {
                        0 => self.employment_status = None,
                        1 => self.annual_income = None,
                        _ => self.credit_score = None,
                    }
                }
            }
            DefectClass::InvalidFormat => {
                self.employment_status = Some("InvalidStatus123".to_string());
            }
            DefectClass::OutOfRange => {
                if rng.gen_bool(0.5) {
                    self.credit_score = Some(pick(rng, &[-100i64, 0, 1000, 9999]));
                } else {
                    self.annual_income = Some(pick(rng, &[-50_000.0, -1.0, 999_999_999.0]));
                }
            }
            DefectClass::InconsistentData => {
                // High earner with no employment.
                self.employment_status = Some("Unemployed".to_string());
                self.annual_income = Some(rng.gen_range(100_000..=500_000) as f64);
            }
            DefectClass::MalformedData => {}
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_generates_paired_details_in_parent_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let generator = CustomerGenerator::new(50, today());
        let (customers, details) = generator.generate(
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );

        assert_eq!(customers.len(), 50);
        assert_eq!(details.len(), 50);
        for (customer, detail) in customers.iter().zip(&details) {
            assert_eq!(customer.customer_id, detail.customer_id);
        }
    }

    #[test]
    fn test_customer_ids_unique() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let generator = CustomerGenerator::new(200, today());
        let (customers, _) = generator.generate(
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );

        let ids: HashSet<&str> = customers.iter().map(|c| c.customer_id.as_str()).collect();
        assert_eq!(ids.len(), customers.len());
    }

    #[test]
    fn test_clean_customers_have_adult_birth_dates() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let generator = CustomerGenerator::new(100, today());
        let (customers, _) = generator.generate(
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );

        let adult_cutoff = today() - Duration::days(18 * 365);
        for customer in &customers {
            let dob = NaiveDate::parse_from_str(&customer.date_of_birth, "%Y-%m-%d").unwrap();
            assert!(dob <= adult_cutoff, "{} too young", customer.customer_id);
        }
    }

    #[test]
    fn test_missing_data_blanks_only_contact_fields() {
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        let mut customer = synthesize(&mut rng, today());
        let dob_before = customer.date_of_birth.clone();
        let state_before = customer.state.clone();

        customer.corrupt(DefectClass::MissingData, &mut rng);
        customer.mark(DefectClass::MissingData);

        let blanked = [
            customer.email.is_none(),
            customer.phone.is_none(),
            customer.street.is_none(),
            customer.city.is_none(),
        ];
        assert!(blanked.iter().any(|b| *b));
        assert_eq!(customer.date_of_birth, dob_before);
        assert_eq!(customer.state, state_before);
    }

    #[test]
    fn test_out_of_range_birth_date_is_invalid() {
        let mut rng = ChaCha8Rng::seed_from_u64(15);
        for _ in 0..50 {
            let mut customer = synthesize(&mut rng, today());
            customer.corrupt(DefectClass::OutOfRange, &mut rng);
            let dob = NaiveDate::parse_from_str(&customer.date_of_birth, "%Y-%m-%d").unwrap();
            let valid_low = today() - Duration::days(80 * 365 + 366);
            let valid_high = today() - Duration::days(18 * 365);
            assert!(
                dob < valid_low || dob > valid_high,
                "corrupted dob {dob} still inside the valid range"
            );
        }
    }
}
