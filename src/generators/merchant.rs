// 🏬 Merchant Generator - standalone merchant directory

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{datetime_days_back, fmt_datetime, pick, unique_id, weighted_pick};
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Merchant, TableKind};
use crate::vocab;

pub struct MerchantGenerator {
    count: usize,
    today: NaiveDate,
}

impl MerchantGenerator {
    pub fn new(count: usize, today: NaiveDate) -> Self {
        MerchantGenerator { count, today }
    }

    pub fn generate(
        &self,
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<Merchant> {
        let mut merchants = Vec::with_capacity(self.count);
        let mut merchant_ids = HashSet::new();

        for _ in 0..self.count {
            let merchant_id = unique_id(rng, &mut merchant_ids, "MER", 100_000, 999_999);
            let category = pick(rng, vocab::MERCHANT_CATEGORIES);
            let name = merchant_name(rng, category);
            let slug = name.replace(' ', "").to_lowercase();
            let created = datetime_days_back(rng, self.today, 0, 365 * 5);

            let mut merchant = Merchant {
                merchant_id,
                merchant_name: name.clone(),
                category: Some(category.to_string()),
                mcc_code: Some(pick(rng, vocab::mcc_codes(category)).to_string()),
                street: format!(
                    "{} {} Ave",
                    rng.gen_range(1..=9999),
                    pick(rng, &["Commerce", "Market", "Business"])
                ),
                city: pick(rng, vocab::CITIES).to_string(),
                state: pick(rng, &["CA", "NY", "TX", "FL", "IL"]).to_string(),
                zip_code: format!("{}", rng.gen_range(10_000..=99_999)),
                country: "USA".to_string(),
                phone: Some(format!(
                    "({}) {}-{}",
                    rng.gen_range(200..=999),
                    rng.gen_range(200..=999),
                    rng.gen_range(1000..=9999)
                )),
                email: Some(format!("info@{slug}.com")),
                website: format!("www.{slug}.com"),
                status: weighted_pick(
                    rng,
                    &["Active", "Inactive", "Suspended"],
                    &[0.9, 0.07, 0.03],
                )
                .to_string(),
                created_at: fmt_datetime(created),
                is_bad_data: false,
                bad_data_type: None,
            };

            injector.maybe_corrupt(&mut merchant, rng);
            merchants.push(merchant);
        }

        merchants
    }
}

fn merchant_name(rng: &mut ChaCha8Rng, category: &str) -> String {
    let (prefixes, suffixes) = vocab::merchant_name_parts(category);
    format!("{} {}", pick(rng, prefixes), pick(rng, suffixes))
}

impl Corruptible for Merchant {
    const TABLE: TableKind = TableKind::Merchants;
    const SUPPORTED: &'static [DefectClass] = &[
        DefectClass::MissingData,
        DefectClass::InvalidFormat,
        DefectClass::InconsistentData,
    ];

    fn record_id(&self) -> &str {
        &self.merchant_id
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
                for slot in slots.iter().take(2) {
                    match slot {
                        0 => self.mcc_code = None,
                        1 => self.phone = None,
                        2 => self.email = None,
                        _ => self.category = None,
                    }
                }
            }
            DefectClass::InvalidFormat => {
                // MCC codes are four digits.
                self.mcc_code = Some("ABCD".to_string());
            }
            DefectClass::InconsistentData => {
                // Reserved code no category maps to.
                self.mcc_code = Some("0000".to_string());
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
    fn test_mcc_matches_category_when_clean() {
        let mut rng = ChaCha8Rng::seed_from_u64(71);
        let merchants = MerchantGenerator::new(100, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .generate(&mut rng, &mut DefectInjector::disabled());

        for merchant in &merchants {
            let category = merchant.category.as_deref().unwrap();
            let mcc = merchant.mcc_code.as_deref().unwrap();
            assert!(vocab::mcc_codes(category).contains(&mcc));
        }
    }
}
