// 🏢 Branch Generator - standalone branch directory

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{datetime_days_back, fmt_date, fmt_datetime, pick, unique_id};
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Branch, TableKind};
use crate::vocab;

pub struct BranchGenerator {
    count: usize,
    today: NaiveDate,
}

impl BranchGenerator {
    pub fn new(count: usize, today: NaiveDate) -> Self {
        BranchGenerator { count, today }
    }

    pub fn generate(
        &self,
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<Branch> {
        let mut branches = Vec::with_capacity(self.count);
        let mut branch_ids = HashSet::new();

        for _ in 0..self.count {
            let branch_id = unique_id(rng, &mut branch_ids, "BR", 1000, 9999);
            let city = pick(rng, vocab::CITIES);
            let code = branch_code(rng, city);
            let opening = datetime_days_back(rng, self.today, 365, 365 * 20);
            let created = datetime_days_back(rng, self.today, 0, 30);

            let mut branch = Branch {
                branch_id,
                branch_name: format!("{city} {} Branch", pick(rng, vocab::BRANCH_QUALIFIERS)),
                branch_code: code.clone(),
                branch_type: Some(pick(rng, vocab::BRANCH_TYPES).to_string()),
                street: format!(
                    "{} {} St",
                    rng.gen_range(1..=9999),
                    pick(rng, &["Main", "Oak", "Broadway"])
                ),
                city: city.to_string(),
                state: pick(rng, vocab::STATES).to_string(),
                zip_code: format!("{}", rng.gen_range(10_000..=99_999)),
                country: "USA".to_string(),
                phone: Some(format!(
                    "({}) {}-{}",
                    rng.gen_range(200..=999),
                    rng.gen_range(200..=999),
                    rng.gen_range(1000..=9999)
                )),
                email: Some(format!(
                    "branch.{}@{}",
                    code.to_lowercase(),
                    pick(rng, &["bank.com", "financial.com", "banking-services.com"])
                )),
                manager_name: Some(format!(
                    "{} {}",
                    pick(rng, vocab::FIRST_NAMES),
                    pick(rng, vocab::LAST_NAMES)
                )),
                opening_date: fmt_date(opening.date()),
                created_at: fmt_datetime(created),
                is_bad_data: false,
                bad_data_type: None,
            };

            injector.maybe_corrupt(&mut branch, rng);
            branches.push(branch);
        }

        branches
    }
}

fn branch_code(rng: &mut ChaCha8Rng, city: &str) -> String {
    let letters: String = city
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect();
    format!("{}{}", letters.to_uppercase(), rng.gen_range(100..=999))
}

impl Corruptible for Branch {
    const TABLE: TableKind = TableKind::Branches;
    const SUPPORTED: &'static [DefectClass] = &[
        DefectClass::MissingData,
        DefectClass::InvalidFormat,
        DefectClass::InconsistentData,
    ];

    fn record_id(&self) -> &str {
        &self.branch_id
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
                for slot in slots.iter().take(rng.gen_range(1..=2)) {
                    match slot {
                        0 => self.manager_name = None,
                        1 => self.phone = None,
                        2 => self.email = None,
                        _ => self.branch_type = None,
                    }
                }
            }
            DefectClass::InvalidFormat => {
                self.phone = Some("invalid-phone".to_string());
            }
            DefectClass::InconsistentData => {
                self.state = "XX".to_string();
            }
            DefectClass::OutOfRange | DefectClass::MalformedData => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_branch_codes_start_with_city_letters() {
        let mut rng = ChaCha8Rng::seed_from_u64(51);
        let code = branch_code(&mut rng, "San Jose");
        assert!(code.starts_with("SAN"));
        assert_eq!(code.len(), 6);
    }

    #[test]
    fn test_generates_requested_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(52);
        let branches = BranchGenerator::new(25, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .generate(&mut rng, &mut DefectInjector::disabled());
        assert_eq!(branches.len(), 25);
    }
}
