// 💱 Exchange Rate Generator - daily history per currency pair
//
// One row per pair per day: the pair's anchor mid rate with up to 2% daily
// variation, and a buy/sell spread of 0.1% to 0.5% around the mid.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{fmt_date, fmt_datetime, pick, round4};
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{ExchangeRate, TableKind};
use crate::vocab;

pub struct ExchangeRateGenerator {
    days: usize,
    today: NaiveDate,
}

impl ExchangeRateGenerator {
    pub fn new(days: usize, today: NaiveDate) -> Self {
        ExchangeRateGenerator { days, today }
    }

    pub fn generate(
        &self,
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<ExchangeRate> {
        let mut rates = Vec::with_capacity(self.days * vocab::CURRENCY_PAIRS.len());
        let start = self.today - Duration::days(self.days as i64);

        for day_offset in 0..self.days {
            let date = start + Duration::days(day_offset as i64);

            for (base, target, anchor) in vocab::CURRENCY_PAIRS {
                let mid = round4(anchor * (1.0 + rng.gen_range(-0.02..=0.02)));
                let spread = rng.gen_range(0.001..=0.005);

                let mut rate = ExchangeRate {
                    rate_id: format!("EXR{}{base}{target}", date.format("%Y%m%d")),
                    base_currency: base.to_string(),
                    target_currency: target.to_string(),
                    buy_rate: Some(round4(mid * (1.0 - spread / 2.0))),
                    sell_rate: Some(round4(mid * (1.0 + spread / 2.0))),
                    mid_rate: Some(mid),
                    rate_date: fmt_date(date),
                    source: pick(rng, vocab::RATE_SOURCES).to_string(),
                    created_at: fmt_datetime(date.and_hms_opt(0, 0, 0).unwrap_or_default()),
                    is_bad_data: false,
                    bad_data_type: None,
                };

                injector.maybe_corrupt(&mut rate, rng);
                rates.push(rate);
            }
        }

        rates
    }
}

impl Corruptible for ExchangeRate {
    const TABLE: TableKind = TableKind::ExchangeRates;
    const SUPPORTED: &'static [DefectClass] = &[
        DefectClass::MissingData,
        DefectClass::InvalidFormat,
        DefectClass::OutOfRange,
        DefectClass::InconsistentData,
    ];

    fn record_id(&self) -> &str {
        &self.rate_id
    }

    fn mark(&mut self, class: DefectClass) {
        self.is_bad_data = true;
        self.bad_data_type = Some(class);
    }

    fn corrupt(&mut self, class: DefectClass, rng: &mut ChaCha8Rng) {
        match class {
            DefectClass::MissingData => {
                self.buy_rate = None;
                self.sell_rate = None;
                self.mid_rate = None;
            }
            DefectClass::InvalidFormat => {
                // Month 13 does not exist.
                self.rate_date = format!("{}-13-45", rng.gen_range(2020..=2030));
            }
            DefectClass::OutOfRange => {
                self.buy_rate = Some(-0.5);
            }
            DefectClass::InconsistentData => {
                // Selling below buying.
                if let Some(buy) = self.buy_rate {
                    self.sell_rate = Some(round4(buy * 0.9));
                }
            }
            DefectClass::MalformedData => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_one_row_per_pair_per_day() {
        let mut rng = ChaCha8Rng::seed_from_u64(101);
        let rates = ExchangeRateGenerator::new(30, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .generate(&mut rng, &mut DefectInjector::disabled());
        assert_eq!(rates.len(), 30 * vocab::CURRENCY_PAIRS.len());
    }

    #[test]
    fn test_clean_spread_keeps_sell_above_buy() {
        let mut rng = ChaCha8Rng::seed_from_u64(102);
        let rates = ExchangeRateGenerator::new(10, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .generate(&mut rng, &mut DefectInjector::disabled());

        for rate in &rates {
            assert!(rate.sell_rate.unwrap() >= rate.buy_rate.unwrap());
        }
    }
}
