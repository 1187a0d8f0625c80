// 📈 Investment Account Generator - brokerage sub-accounts for customers
//
// Each investment account links a customer to one of their own deposit
// accounts. When no explicit count is configured, roughly 30% of customers
// with accounts get one.

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{datetime_days_back, fmt_date, fmt_datetime, pick, round2, round4, unique_id};
use crate::corruption::{Corruptible, DefectClass, DefectInjector};
use crate::model::{Account, Customer, InvestmentAccount, TableKind};
use crate::vocab;

pub struct InvestmentAccountGenerator {
    count: Option<usize>,
    today: NaiveDate,
}

impl InvestmentAccountGenerator {
    pub fn new(count: Option<usize>, today: NaiveDate) -> Self {
        InvestmentAccountGenerator { count, today }
    }

    pub fn generate(
        &self,
        customers: &[Customer],
        accounts: &[Account],
        rng: &mut ChaCha8Rng,
        injector: &mut DefectInjector,
    ) -> Vec<InvestmentAccount> {
        // Customers that own at least one account, with their account pool.
        let eligible: Vec<(&Customer, Vec<&Account>)> = customers
            .iter()
            .map(|c| {
                let owned: Vec<&Account> = accounts
                    .iter()
                    .filter(|a| a.customer_id == c.customer_id)
                    .collect();
                (c, owned)
            })
            .filter(|(_, owned)| !owned.is_empty())
            .collect();
        if eligible.is_empty() {
            return Vec::new();
        }

        let count = self.count.unwrap_or(eligible.len() * 3 / 10);
        let mut investments = Vec::with_capacity(count);
        let mut investment_ids = HashSet::new();

        for _ in 0..count {
            let (customer, owned) = &eligible[rng.gen_range(0..eligible.len())];
            let account = owned[rng.gen_range(0..owned.len())];

            let investment_id = unique_id(rng, &mut investment_ids, "INV", 1_000_000, 9_999_999);
            let opened = datetime_days_back(rng, self.today, 30, 365 * 5);
            let balance = round2(rng.gen_range(1_000.0..=500_000.0));

            let mut investment = InvestmentAccount {
                investment_account_id: investment_id,
                customer_id: customer.customer_id.clone(),
                account_id: account.account_id.clone(),
                investment_type: Some(pick(rng, vocab::INVESTMENT_TYPES).to_string()),
                risk_tolerance: Some(pick(rng, vocab::RISK_TOLERANCE).to_string()),
                account_status: pick(rng, vocab::INVESTMENT_ACCOUNT_STATUSES).to_string(),
                investment_strategy: pick(rng, vocab::INVESTMENT_STRATEGIES).to_string(),
                primary_asset_class: pick(rng, vocab::ASSET_CLASSES).to_string(),
                opening_date: fmt_date(opened.date()),
                current_balance: balance,
                total_deposits: round2(balance * rng.gen_range(0.7..=1.3)),
                ytd_return_rate: round4(rng.gen_range(-0.15..=0.25)),
                annual_return_rate: round4(rng.gen_range(-0.15..=0.25)),
                management_fee_rate: Some(round4(rng.gen_range(0.001..=0.025))),
                total_value: round2(balance * (1.0 + rng.gen_range(-0.1..=0.1))),
                is_managed_account: rng.gen_bool(0.5),
                created_at: fmt_datetime(datetime_days_back(rng, self.today, 0, 30)),
                is_bad_data: false,
                bad_data_type: None,
            };

            injector.maybe_corrupt(&mut investment, rng);
            investments.push(investment);
        }

        investments
    }
}

impl Corruptible for InvestmentAccount {
    const TABLE: TableKind = TableKind::InvestmentAccounts;
    const SUPPORTED: &'static [DefectClass] = &DefectClass::ALL;

    fn record_id(&self) -> &str {
        &self.investment_account_id
    }

    fn mark(&mut self, class: DefectClass) {
        self.is_bad_data = true;
        self.bad_data_type = Some(class);
    }

    fn corrupt(&mut self, class: DefectClass, rng: &mut ChaCha8Rng) {
        match class {
            DefectClass::MissingData => {
                self.investment_type = None;
                self.risk_tolerance = None;
                self.management_fee_rate = None;
            }
            DefectClass::InvalidFormat => {
                self.investment_type = Some("INVALID_TYPE_XYZ".to_string());
                self.risk_tolerance = Some("EXTREME".to_string());
            }
            DefectClass::OutOfRange => {
                self.current_balance = -1_000_000.0;
                self.annual_return_rate = rng.gen_range(5.0..=10.0);
            }
            DefectClass::InconsistentData => {
                // Capital preservation mandate chasing speculative bets.
                self.risk_tolerance = Some("Conservative".to_string());
                self.investment_strategy = "Speculative".to_string();
            }
            DefectClass::MalformedData => {
                self.account_status = pick(rng, vocab::ADVERSARIAL_PAYLOADS).to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FanOut;
    use crate::generators::account::AccountGenerator;
    use crate::generators::customer::CustomerGenerator;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_links_stay_within_the_owning_customer() {
        let mut rng = ChaCha8Rng::seed_from_u64(131);
        let (customers, _) = CustomerGenerator::new(40, today()).generate(
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );
        let accounts = AccountGenerator::new(FanOut::new(1, 3), today()).generate(
            &customers,
            &mut rng,
            &mut DefectInjector::disabled(),
        );
        let investments = InvestmentAccountGenerator::new(Some(25), today()).generate(
            &customers,
            &accounts,
            &mut rng,
            &mut DefectInjector::disabled(),
        );

        assert_eq!(investments.len(), 25);
        for investment in &investments {
            let account = accounts
                .iter()
                .find(|a| a.account_id == investment.account_id)
                .expect("dangling account_id");
            assert_eq!(account.customer_id, investment.customer_id);
        }
    }

    #[test]
    fn test_no_eligible_customers_means_no_investments() {
        let mut rng = ChaCha8Rng::seed_from_u64(132);
        let (customers, _) = CustomerGenerator::new(10, today()).generate(
            &mut rng,
            &mut DefectInjector::disabled(),
            &mut DefectInjector::disabled(),
        );
        let investments = InvestmentAccountGenerator::new(None, today()).generate(
            &customers,
            &[],
            &mut rng,
            &mut DefectInjector::disabled(),
        );
        assert!(investments.is_empty());
    }
}
